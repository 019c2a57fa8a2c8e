//! Host Module
//!
//! The plugin host and the environment it runs in:
//! - Map host (load, shared state, queries, large view)
//! - Environment seams (notifications, directory prompt, page metadata)

pub mod environment;
pub mod shell;

pub use environment::{
    DirectoryAccess, FixedDirectory, LogNotifier, Notifier, PageInfo, PageMetadata,
    DIRECTORY_RETRY_MESSAGE,
};
pub use shell::MapHost;
