use core::fmt;

/// Error returned by [`try_speak`](crate::Rendezvous::try_speak).
///
/// The undelivered value is handed back to the caller.
#[derive(PartialEq, Eq)]
pub enum TrySpeakError<T> {
    /// No listener is registered, so the value would have to wait.
    NoListener(T),
}

impl<T> TrySpeakError<T> {
    /// Returns the value that could not be delivered.
    pub fn into_inner(self) -> T {
        match self {
            TrySpeakError::NoListener(value) => value,
        }
    }
}

impl<T> fmt::Debug for TrySpeakError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrySpeakError::NoListener(_) => write!(f, "NoListener(..)"),
        }
    }
}

impl<T> fmt::Display for TrySpeakError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrySpeakError::NoListener(_) => write!(f, "no listener is waiting to receive"),
        }
    }
}

impl<T> std::error::Error for TrySpeakError<T> {}

/// Error returned by [`try_listen`](crate::Rendezvous::try_listen).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryListenError {
    /// No unclaimed speaker is blocked on the channel.
    NoSpeaker,
}

impl fmt::Display for TryListenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TryListenError::NoSpeaker => write!(f, "no speaker is waiting to deliver"),
        }
    }
}

impl std::error::Error for TryListenError {}
