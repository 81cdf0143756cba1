//! Navigation primitives the guards depend on.

use std::sync::Mutex;

/// Routing surface.
///
/// `replace` must not add a history entry, so "back" never returns to a
/// guarded view the user was bounced from.
pub trait Navigator: Send + Sync {
    fn push(&self, path: &str);
    fn replace(&self, path: &str);
    fn back(&self);
    fn current(&self) -> Option<String>;
}

/// History stack kept in memory.
#[derive(Debug, Default)]
pub struct MemoryNavigator {
    history: Mutex<Vec<String>>,
    log: Mutex<Vec<Navigation>>,
}

/// A navigation performed through a [`MemoryNavigator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Push(String),
    Replace(String),
    Back,
}

impl MemoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at `path` without recording a navigation.
    pub fn starting_at(path: &str) -> Self {
        Self {
            history: Mutex::new(vec![path.to_string()]),
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn history(&self) -> Vec<String> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }

    /// Every navigation performed so far, in order.
    pub fn navigations(&self) -> Vec<Navigation> {
        self.log.lock().map(|l| l.clone()).unwrap_or_default()
    }

    fn record(&self, navigation: Navigation) {
        if let Ok(mut log) = self.log.lock() {
            log.push(navigation);
        }
    }
}

impl Navigator for MemoryNavigator {
    fn push(&self, path: &str) {
        if let Ok(mut history) = self.history.lock() {
            history.push(path.to_string());
        }
        self.record(Navigation::Push(path.to_string()));
    }

    fn replace(&self, path: &str) {
        if let Ok(mut history) = self.history.lock() {
            match history.last_mut() {
                Some(top) => *top = path.to_string(),
                None => history.push(path.to_string()),
            }
        }
        self.record(Navigation::Replace(path.to_string()));
    }

    fn back(&self) {
        if let Ok(mut history) = self.history.lock() {
            if history.len() > 1 {
                history.pop();
            }
        }
        self.record(Navigation::Back);
    }

    fn current(&self) -> Option<String> {
        self.history.lock().ok().and_then(|h| h.last().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_does_not_grow_history() {
        let nav = MemoryNavigator::starting_at("/profile");
        nav.push("/users");
        nav.replace("/login");

        assert_eq!(nav.history(), vec!["/profile", "/login"]);
        nav.back();
        assert_eq!(nav.current().as_deref(), Some("/profile"));
        assert_eq!(
            nav.navigations(),
            vec![
                Navigation::Push("/users".into()),
                Navigation::Replace("/login".into()),
                Navigation::Back,
            ]
        );
    }

    #[test]
    fn back_stops_at_first_entry() {
        let nav = MemoryNavigator::starting_at("/login");
        nav.back();
        assert_eq!(nav.current().as_deref(), Some("/login"));
    }
}
