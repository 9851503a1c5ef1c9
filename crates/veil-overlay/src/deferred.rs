//! Single-resolution result of a user interaction.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::oneshot;

/// Future side. If the resolver is dropped unresolved (the overlay was torn
/// down without an answer) it completes with `T::default()`.
#[must_use = "a dialog result does nothing unless awaited"]
#[derive(Debug)]
pub struct Deferred<T> {
    rx: oneshot::Receiver<T>,
}

/// Resolving side. The first `resolve` wins; later calls are ignored.
#[derive(Debug)]
pub struct Resolver<T> {
    tx: RefCell<Option<oneshot::Sender<T>>>,
}

pub fn deferred<T>() -> (Resolver<T>, Deferred<T>) {
    let (tx, rx) = oneshot::channel();
    (
        Resolver {
            tx: RefCell::new(Some(tx)),
        },
        Deferred { rx },
    )
}

impl<T> Resolver<T> {
    /// Returns false if this resolver has already been used.
    pub fn resolve(&self, value: T) -> bool {
        let tx = self.tx.borrow_mut().take();
        match tx {
            Some(tx) => {
                // The receiver may be gone if the caller stopped waiting.
                let _ = tx.send(value);
                true
            }
            None => false,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.tx.borrow().is_none()
    }
}

impl<T: Default> Deferred<T> {
    /// Non-blocking check. `Some` once resolved (or abandoned).
    pub fn try_take(&mut self) -> Option<T> {
        match self.rx.try_recv() {
            Ok(Some(v)) => Some(v),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(T::default()),
        }
    }
}

impl<T: Default> Future for Deferred<T> {
    type Output = T;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(v)) => Poll::Ready(v),
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(T::default()),
            Poll::Pending => Poll::Pending,
        }
    }
}
