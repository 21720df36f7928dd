use parking_lot::{Mutex, MutexGuard};
use std::{fmt, sync::Arc};

/// A receiver shared between threads.
///
/// [`ConcurrentTimeline`](crate::concurrent_timeline::ConcurrentTimeline) locks the receiver for
/// the duration of every forward or inverse effect it runs. Clones share the same receiver.
///
/// # Examples
///
/// ```
/// use command_timeline::shared_context::SharedContext;
///
/// let counter = SharedContext::new(5);
/// let handle = counter.clone();
/// handle.modify(|value| *value += 1);
/// assert_eq!(*counter.lock(), 6);
/// assert_eq!(counter.with(|value| *value * 2), 12);
/// ```
pub struct SharedContext<R> {
    inner: Arc<Mutex<R>>,
}

impl<R> SharedContext<R> {
    pub fn new(receiver: R) -> Self {
        Self {
            inner: Arc::new(Mutex::new(receiver)),
        }
    }

    /// Blocks until the receiver is available.
    pub fn lock(&self) -> MutexGuard<'_, R> {
        self.inner.lock()
    }

    #[must_use]
    pub fn try_lock(&self) -> Option<MutexGuard<'_, R>> {
        self.inner.try_lock()
    }

    /// Runs `f` with the receiver locked and returns its result.
    pub fn with<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&R) -> T,
    {
        f(&self.lock())
    }

    pub fn modify<F>(&self, f: F)
    where
        F: FnOnce(&mut R),
    {
        f(&mut self.lock());
    }

    /// Takes the receiver back if this is the last handle to it.
    ///
    /// # Errors
    ///
    /// Returns the handle unchanged while other clones are alive.
    pub fn try_into_inner(self) -> Result<R, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl<R> Clone for SharedContext<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Default> Default for SharedContext<R> {
    fn default() -> Self {
        Self::new(R::default())
    }
}

impl<R: fmt::Debug> fmt::Debug for SharedContext<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_lock() {
            Some(receiver) => write!(f, "SharedContext({:?})", *receiver),
            None => write!(f, "SharedContext(<locked>)"),
        }
    }
}

impl<R> From<Arc<Mutex<R>>> for SharedContext<R> {
    fn from(inner: Arc<Mutex<R>>) -> Self {
        Self { inner }
    }
}

impl<R> AsRef<Arc<Mutex<R>>> for SharedContext<R> {
    fn as_ref(&self) -> &Arc<Mutex<R>> {
        &self.inner
    }
}
