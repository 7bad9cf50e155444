use std::cell::Cell;
use std::rc::Rc;

/// Marks a section that must not be entered again while it is running.
///
/// Clones share the flag.
#[derive(Debug, Clone, Default)]
pub struct ReentrancyFlag {
    active: Rc<Cell<bool>>,
}

/// Clears its flag when dropped, on every exit path.
#[derive(Debug)]
#[must_use = "the flag is cleared as soon as the guard is dropped"]
pub struct ReentrancyGuard {
    active: Rc<Cell<bool>>,
}

impl ReentrancyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` when already inside.
    pub fn enter(&self) -> Option<ReentrancyGuard> {
        if self.active.replace(true) {
            return None;
        }
        Some(ReentrancyGuard {
            active: Rc::clone(&self.active),
        })
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

impl Drop for ReentrancyGuard {
    fn drop(&mut self) {
        self.active.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_enter_is_refused() {
        let flag = ReentrancyFlag::new();
        let guard = flag.enter();
        assert!(guard.is_some());
        assert!(flag.is_active());
        assert!(flag.enter().is_none());
        drop(guard);
        assert!(!flag.is_active());
        assert!(flag.enter().is_some());
    }

    #[test]
    fn cleared_on_early_return() {
        fn work(flag: &ReentrancyFlag, bail: bool) -> Option<()> {
            let _guard = flag.enter()?;
            if bail {
                return None;
            }
            Some(())
        }
        let flag = ReentrancyFlag::new();
        assert_eq!(work(&flag, true), None);
        assert!(!flag.is_active());
        assert_eq!(work(&flag, false), Some(()));
    }

    #[test]
    fn cleared_on_panic() {
        let flag = ReentrancyFlag::new();
        let inner = flag.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = inner.enter();
            panic!("boom");
        }));
        assert!(result.is_err());
        assert!(!flag.is_active());
    }
}
