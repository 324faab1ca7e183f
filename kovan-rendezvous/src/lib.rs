#![doc(
    html_logo_url = "https://raw.githubusercontent.com/vertexclique/kovan/master/art/kovan-square.svg"
)]
//! Rendezvous channels: speakers and listeners exchanging values one-to-one.
//!
//! A [`Rendezvous`] lets any number of speaker threads and any number of
//! listener threads hand values to each other in strict handshakes. A
//! speaker's call completes only once a listener has been assigned its value,
//! and a listener's call completes only once it holds one. Unlike the other
//! Kovan channels there is no buffer to fill: values only move when both
//! sides are present.
//!
//! # Key Features
//!
//! - **Exactly-once delivery**: every spoken value reaches exactly one listener.
//! - **No stranded pairs**: a speaker and a listener are never both left waiting.
//! - **Blocking without spinning**: waiting threads sleep on condition variables.
//! - **Non-blocking variants**: [`Rendezvous::try_speak`] and [`Rendezvous::try_listen`].
//! - **Endpoints**: cloneable [`Speaker`] and [`Listener`] handles via [`rendezvous()`].
//!
//! # Example
//!
//! ```rust
//! use kovan_rendezvous::rendezvous;
//! use std::thread;
//!
//! let (speaker, listener) = rendezvous::<u32>();
//!
//! let handles: Vec<_> = (1..=3)
//!     .map(|word| {
//!         let speaker = speaker.clone();
//!         thread::spawn(move || speaker.speak(word))
//!     })
//!     .collect();
//!
//! let mut heard: Vec<u32> = (0..3).map(|_| listener.listen()).collect();
//! for h in handles {
//!     h.join().unwrap();
//! }
//!
//! heard.sort();
//! assert_eq!(heard, vec![1, 2, 3]);
//! ```
//!
//! # Tracing
//!
//! Block, wake and match transitions are emitted as `trace` level
//! [`tracing`] events carrying the channel label and its counters.

#![warn(missing_docs)]

mod builder;
mod channel;
mod error;
mod handle;

pub use builder::Builder;
pub use channel::{Rendezvous, Snapshot};
pub use error::{TryListenError, TrySpeakError};
pub use handle::{Iter, Listener, Speaker};

/// Creates a rendezvous channel and returns its two endpoints.
pub fn rendezvous<T>() -> (Speaker<T>, Listener<T>) {
    handle::endpoints(Rendezvous::new())
}
