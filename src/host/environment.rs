//! Host environment seams.
//!
//! The parts of the embedding environment the host talks to but does not
//! own: user notifications, the directory permission prompt and page
//! metadata.

use crate::core::{Error, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::path::PathBuf;
use tracing::error;

/// Message shown when the directory prompt has to be repeated.
pub const DIRECTORY_RETRY_MESSAGE: &str =
    "Access to local files is required to continue. Please select the data directory again.";

/// Blocking user notifications.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Notifier that writes alerts to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&self, message: &str) {
        error!(message, "User alert");
    }
}

/// Asks the user for a root directory.
#[async_trait]
pub trait DirectoryAccess: Send + Sync {
    async fn request_root_directory(&self) -> Result<PathBuf>;
}

/// Grants a preselected directory, provided it exists.
#[derive(Clone, Debug)]
pub struct FixedDirectory {
    path: PathBuf,
}

impl FixedDirectory {
    /// Create a grant for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DirectoryAccess for FixedDirectory {
    async fn request_root_directory(&self) -> Result<PathBuf> {
        let metadata = tokio::fs::metadata(&self.path).await?;
        if !metadata.is_dir() {
            return Err(Error::DirectoryAccess(format!(
                "{} is not a directory",
                self.path.display()
            )));
        }
        Ok(self.path.clone())
    }
}

/// Page title and favicon.
pub trait PageMetadata: Send + Sync {
    fn set_title(&self, title: &str);
    fn set_favicon(&self, href: &str);
}

/// Page metadata kept in memory.
#[derive(Debug, Default)]
pub struct PageInfo {
    title: RwLock<Option<String>>,
    favicon: RwLock<Option<String>>,
}

impl PageInfo {
    /// Create empty page info.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current title.
    pub fn title(&self) -> Option<String> {
        self.title.read().clone()
    }

    /// Current favicon.
    pub fn favicon(&self) -> Option<String> {
        self.favicon.read().clone()
    }
}

impl PageMetadata for PageInfo {
    fn set_title(&self, title: &str) {
        *self.title.write() = Some(title.to_string());
    }

    fn set_favicon(&self, href: &str) {
        *self.favicon.write() = Some(href.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_directory_grants_existing_dir() {
        let dir = std::env::temp_dir();
        let granted = FixedDirectory::new(&dir).request_root_directory().await.unwrap();
        assert_eq!(granted, dir);
    }

    #[tokio::test]
    async fn test_fixed_directory_rejects_missing_path() {
        let access = FixedDirectory::new("/definitely/not/here/mapshell");
        assert!(access.request_root_directory().await.is_err());
    }

    #[test]
    fn test_page_info() {
        let page = PageInfo::new();
        page.set_title("Harbour");
        page.set_favicon("icons/anchor.png");
        assert_eq!(page.title().as_deref(), Some("Harbour"));
        assert_eq!(page.favicon().as_deref(), Some("icons/anchor.png"));
    }
}
