use crate::channel::Rendezvous;
use crate::handle::{self, Listener, Speaker};

/// Configures a [`Rendezvous`] before creating it.
///
/// ```rust
/// use kovan_rendezvous::Builder;
///
/// let channel = Builder::new().label("comm").queue_capacity(8).build::<u32>();
/// assert_eq!(channel.label(), Some("comm"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    /// Name attached to the channel's tracing events.
    label: Option<String>,
    /// Initial capacity of the hand-off queue.
    queue_capacity: usize,
}

impl Builder {
    /// Creates a builder with no label and an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the label used in tracing events.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Preallocates room for `cap` values in the hand-off queue.
    ///
    /// The queue only ever holds values already assigned to a listener, so
    /// this is a hint for bursts of simultaneous matches, not a bound.
    pub fn queue_capacity(mut self, cap: usize) -> Self {
        self.queue_capacity = cap;
        self
    }

    /// Builds the channel.
    pub fn build<T>(self) -> Rendezvous<T> {
        Rendezvous::from_parts(self.label, self.queue_capacity)
    }

    /// Builds the channel and splits it into shareable endpoints.
    pub fn endpoints<T>(self) -> (Speaker<T>, Listener<T>) {
        handle::endpoints(self.build())
    }
}
