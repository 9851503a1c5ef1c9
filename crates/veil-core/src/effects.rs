use std::cell::RefCell;
use std::rc::Rc;

/// A cleanup (or continuation) that runs at most once, however many clones
/// hold it and however many times `run` is called.
#[derive(Clone)]
pub struct Dispose(Rc<RefCell<Option<Box<dyn FnOnce()>>>>);

impl Dispose {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Rc::new(RefCell::new(Some(Box::new(f)))))
    }

    pub fn noop() -> Self {
        Self(Rc::new(RefCell::new(None)))
    }

    /// Runs at most once. Returns whether this call ran it.
    pub fn run(&self) -> bool {
        // Release the borrow first: `f` may hold a clone of this guard.
        let f = self.0.borrow_mut().take();
        match f {
            Some(f) => {
                f();
                true
            }
            None => false,
        }
    }

    pub fn is_spent(&self) -> bool {
        self.0.borrow().is_none()
    }
}

impl std::fmt::Debug for Dispose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispose")
            .field("spent", &self.is_spent())
            .finish()
    }
}

/// Helper to build a cleanup inline.
pub fn on_unmount(f: impl FnOnce() + 'static) -> Dispose {
    Dispose::new(f)
}
