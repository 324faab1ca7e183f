use crate::channel::{Rendezvous, Snapshot};
use crate::error::{TryListenError, TrySpeakError};
use std::sync::Arc;

/// The speaking half of a rendezvous channel.
pub struct Speaker<T> {
    inner: Arc<Rendezvous<T>>,
}

impl<T> Clone for Speaker<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Speaker<T> {
    /// Hands `value` to exactly one listener, blocking until one is available.
    pub fn speak(&self, value: T) {
        self.inner.speak(value)
    }

    /// Hands `value` to an already registered listener without blocking.
    pub fn try_speak(&self, value: T) -> Result<(), TrySpeakError<T>> {
        self.inner.try_speak(value)
    }

    /// Returns the channel counters.
    pub fn snapshot(&self) -> Snapshot {
        self.inner.snapshot()
    }

    /// Returns true if both handles talk through the same channel.
    pub fn same_channel(&self, listener: &Listener<T>) -> bool {
        Arc::ptr_eq(&self.inner, &listener.inner)
    }
}

/// The listening half of a rendezvous channel.
pub struct Listener<T> {
    inner: Arc<Rendezvous<T>>,
}

impl<T> Clone for Listener<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Listener<T> {
    /// Receives one value, blocking until a speaker provides it.
    pub fn listen(&self) -> T {
        self.inner.listen()
    }

    /// Receives one value only if a blocked speaker can deliver it.
    pub fn try_listen(&self) -> Result<T, TryListenError> {
        self.inner.try_listen()
    }

    /// Returns the channel counters.
    pub fn snapshot(&self) -> Snapshot {
        self.inner.snapshot()
    }

    /// A blocking iterator over received values.
    ///
    /// Each call to `next` is one [`listen`](Listener::listen); the iterator
    /// never ends on its own.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { listener: self }
    }
}

/// Blocking iterator returned by [`Listener::iter`].
pub struct Iter<'a, T> {
    listener: &'a Listener<T>,
}

impl<T> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        Some(self.listener.listen())
    }
}

pub(crate) fn endpoints<T>(channel: Rendezvous<T>) -> (Speaker<T>, Listener<T>) {
    let inner = Arc::new(channel);
    (
        Speaker {
            inner: inner.clone(),
        },
        Listener { inner },
    )
}
