//! Process-wide transition styles.
//!
//! Style rules are reference counted. [`install`] returns a guard; the rule
//! stays installed until the last guard for its name is dropped.

use parking_lot::{const_mutex, Mutex};
use std::collections::BTreeMap;

struct InstalledRule {
    css: String,
    holders: usize,
}

static RULES: Mutex<BTreeMap<String, InstalledRule>> = const_mutex(BTreeMap::new());

/// Keeps a style rule installed while alive.
#[derive(Debug)]
pub struct StyleGuard {
    name: String,
}

impl StyleGuard {
    /// Rule name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for StyleGuard {
    fn drop(&mut self) {
        let mut rules = RULES.lock();
        let remove = match rules.get_mut(&self.name) {
            Some(rule) => {
                rule.holders -= 1;
                rule.holders == 0
            }
            None => false,
        };
        if remove {
            rules.remove(&self.name);
        }
    }
}

/// Install a named rule, or add a holder to an installed one.
///
/// The first installation's CSS wins while the rule is held.
pub fn install(name: &str, css: &str) -> StyleGuard {
    let mut rules = RULES.lock();
    rules
        .entry(name.to_string())
        .and_modify(|rule| rule.holders += 1)
        .or_insert_with(|| InstalledRule {
            css: css.to_string(),
            holders: 1,
        });
    StyleGuard {
        name: name.to_string(),
    }
}

/// Whether a rule is installed.
pub fn is_installed(name: &str) -> bool {
    RULES.lock().contains_key(name)
}

/// All installed rules, in name order.
#[cfg(test)]
pub(crate) fn stylesheet() -> String {
    RULES
        .lock()
        .values()
        .map(|rule| rule.css.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// CSS for a cross-fade view transition named `name`.
pub fn cross_fade_css(name: &str, duration_ms: u64) -> String {
    format!(
        "::view-transition-old({name}), ::view-transition-new({name}) {{ animation-duration: {duration_ms}ms; }}"
    )
}
