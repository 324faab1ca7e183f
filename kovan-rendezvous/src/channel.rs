use crate::error::{TryListenError, TrySpeakError};
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use tracing::trace;

const UNNAMED: &str = "rendezvous";

/// Everything the lock guards.
struct State<T> {
    /// Listeners that registered but have not been assigned a value yet.
    pending_listeners: usize,
    /// Values assigned to a listener but not yet picked up, oldest first.
    queue: VecDeque<T>,
    /// Values owed to `try_listen` callers. Plain listeners leave that many
    /// queued values alone.
    reserved: usize,
    /// Speakers inside a wait on `speak_ready`, woken-but-not-rescheduled included.
    blocked_speakers: usize,
    /// Listeners inside a wait on `listen_ready` or `claim_ready`.
    blocked_listeners: usize,
}

impl<T> State<T> {
    const fn new() -> Self {
        Self {
            pending_listeners: 0,
            queue: VecDeque::new(),
            reserved: 0,
            blocked_speakers: 0,
            blocked_listeners: 0,
        }
    }

    /// Whether a queued value is not owed to a `try_listen` caller.
    fn has_unreserved(&self) -> bool {
        self.queue.len() > self.reserved
    }
}

/// A point-in-time copy of the channel counters, taken under the lock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Listeners registered and not yet matched with a speaker.
    pub pending_listeners: usize,
    /// Values handed over by speakers that no listener has dequeued yet.
    pub queued: usize,
    /// Values owed to `try_listen` callers that have not picked them up.
    pub reserved: usize,
    /// Speakers currently blocked waiting for a listener.
    pub blocked_speakers: usize,
    /// Listeners currently blocked waiting for a value.
    pub blocked_listeners: usize,
}

/// A rendezvous channel.
///
/// Any number of threads may [`speak`](Rendezvous::speak) and any number may
/// [`listen`](Rendezvous::listen). Every spoken value is received by exactly
/// one listener, and a speaker does not return before a listener has been
/// assigned its value. A speaker and a listener are never both left waiting:
/// as soon as both sides exist they are paired off.
///
/// Which speaker is paired with which listener is unspecified.
///
/// # Example
///
/// ```rust
/// use kovan_rendezvous::Rendezvous;
/// use std::thread;
///
/// let channel = Rendezvous::new();
///
/// thread::scope(|s| {
///     s.spawn(|| channel.speak(42u32));
///     assert_eq!(channel.listen(), 42);
/// });
/// ```
pub struct Rendezvous<T> {
    state: Mutex<State<T>>,
    /// Signalled when a listener registers.
    speak_ready: Condvar,
    /// Signalled when a value free for plain listeners is queued.
    listen_ready: Condvar,
    /// Signalled when a value owed to a `try_listen` caller is queued.
    claim_ready: Condvar,
    label: Option<String>,
}

impl<T> Rendezvous<T> {
    /// Creates a new, unlabelled channel.
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(State::new()),
            speak_ready: Condvar::new(),
            listen_ready: Condvar::new(),
            claim_ready: Condvar::new(),
            label: None,
        }
    }

    /// Creates a new channel whose hand-off queue starts with room for `cap` values.
    pub fn with_capacity(cap: usize) -> Self {
        Self::from_parts(None, cap)
    }

    pub(crate) fn from_parts(label: Option<String>, cap: usize) -> Self {
        Self {
            state: Mutex::new(State {
                queue: VecDeque::with_capacity(cap),
                ..State::new()
            }),
            label,
            ..Self::new()
        }
    }

    /// Returns the label given through [`Builder::label`](crate::Builder::label).
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    fn name(&self) -> &str {
        self.label.as_deref().unwrap_or(UNNAMED)
    }

    // Trace events are emitted before the state changes they describe, so a
    // panicking subscriber never leaves a step half-applied behind the poison.
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Transfers `value` to exactly one listener.
    ///
    /// Blocks until a listener is available. Returns once the value has been
    /// assigned to that listener; it can no longer be lost or received twice.
    ///
    /// Blocks forever if no listener ever arrives.
    pub fn speak(&self, value: T) {
        let mut state = self.lock();
        while state.pending_listeners == 0 {
            state = self.wait_for_listener(state);
        }
        self.deliver(&mut state, value);
    }

    /// Transfers `value` only if a listener is already registered.
    ///
    /// Never blocks. When no listener is waiting the value is handed back in
    /// [`TrySpeakError::NoListener`] and the channel is left untouched.
    pub fn try_speak(&self, value: T) -> Result<(), TrySpeakError<T>> {
        let mut state = self.lock();
        if state.pending_listeners == 0 {
            return Err(TrySpeakError::NoListener(value));
        }
        self.deliver(&mut state, value);
        Ok(())
    }

    /// Receives the value of exactly one speaker.
    ///
    /// Blocks until a speaker has handed over a value. Blocks forever if no
    /// speaker ever arrives.
    pub fn listen(&self) -> T {
        let mut state = self.lock();
        self.register(&mut state);
        self.receive(state)
    }

    /// Receives a value only if a blocked speaker is available to deliver it.
    ///
    /// The listener is registered only when there are more blocked speakers
    /// than pending listeners, so at least one of them is bound to deliver,
    /// and one value from those deliveries is reserved for this caller: a
    /// plain [`listen`](Rendezvous::listen) arriving meanwhile cannot take it.
    /// The call may still wait briefly for that speaker to be rescheduled, but
    /// never for a speaker to arrive.
    pub fn try_listen(&self) -> Result<T, TryListenError> {
        let mut state = self.lock();
        if state.blocked_speakers <= state.pending_listeners {
            return Err(TryListenError::NoSpeaker);
        }
        self.register(&mut state);
        state.reserved += 1;
        Ok(self.claim(state))
    }

    /// Returns the channel counters as seen under the lock.
    pub fn snapshot(&self) -> Snapshot {
        let state = self.lock();
        Snapshot {
            pending_listeners: state.pending_listeners,
            queued: state.queue.len(),
            reserved: state.reserved,
            blocked_speakers: state.blocked_speakers,
            blocked_listeners: state.blocked_listeners,
        }
    }

    /// Number of listeners registered and not yet matched with a speaker.
    pub fn pending_listeners(&self) -> usize {
        self.lock().pending_listeners
    }

    fn wait_for_listener<'a>(
        &self,
        mut state: MutexGuard<'a, State<T>>,
    ) -> MutexGuard<'a, State<T>> {
        debug_assert_eq!(state.pending_listeners, 0);
        trace!(
            channel = self.name(),
            blocked_speakers = state.blocked_speakers + 1,
            "speaker waiting for a listener"
        );

        state.blocked_speakers += 1;
        let mut state = self
            .speak_ready
            .wait(state)
            .unwrap_or_else(PoisonError::into_inner);
        state.blocked_speakers -= 1;
        trace!(
            channel = self.name(),
            pending_listeners = state.pending_listeners,
            "speaker woken"
        );
        state
    }

    /// Claims one registered listener and queues `value` for it.
    fn deliver(&self, state: &mut State<T>, value: T) {
        trace!(
            channel = self.name(),
            pending_listeners = state.pending_listeners - 1,
            queued = state.queue.len() + 1,
            "speaker matched"
        );

        state.pending_listeners -= 1;
        state.queue.push_back(value);
        // The newest value is free for plain listeners only once every
        // reservation is covered by the queue.
        if state.has_unreserved() {
            self.listen_ready.notify_one();
        } else {
            self.claim_ready.notify_one();
        }
    }

    fn register(&self, state: &mut State<T>) {
        trace!(
            channel = self.name(),
            pending_listeners = state.pending_listeners + 1,
            "listener registered"
        );

        state.pending_listeners += 1;
        // No-op when no speaker waits; a later speaker sees the counter.
        self.speak_ready.notify_one();
    }

    /// Takes a value not owed to a `try_listen` caller.
    fn receive(&self, mut state: MutexGuard<'_, State<T>>) -> T {
        loop {
            if state.has_unreserved() {
                trace!(
                    channel = self.name(),
                    queued = state.queue.len() - 1,
                    "listener received"
                );
                if let Some(value) = state.queue.pop_front() {
                    return value;
                }
            }

            trace!(
                channel = self.name(),
                blocked_listeners = state.blocked_listeners + 1,
                "listener waiting for a value"
            );
            state.blocked_listeners += 1;
            state = self
                .listen_ready
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
            state.blocked_listeners -= 1;
        }
    }

    /// Takes any queued value on behalf of a reservation.
    ///
    /// Popping one value and one reservation together keeps the number of
    /// unreserved values unchanged, so plain listeners lose nothing.
    fn claim(&self, mut state: MutexGuard<'_, State<T>>) -> T {
        loop {
            if !state.queue.is_empty() {
                trace!(
                    channel = self.name(),
                    queued = state.queue.len() - 1,
                    reserved = state.reserved - 1,
                    "reserved listener received"
                );
                if let Some(value) = state.queue.pop_front() {
                    state.reserved -= 1;
                    return value;
                }
            }

            trace!(
                channel = self.name(),
                reserved = state.reserved,
                "reserved listener waiting for a value"
            );
            state.blocked_listeners += 1;
            state = self
                .claim_ready
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
            state.blocked_listeners -= 1;
        }
    }
}

impl<T> Default for Rendezvous<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Rendezvous<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rendezvous")
            .field("label", &self.label)
            .field("state", &self.snapshot())
            .finish()
    }
}
