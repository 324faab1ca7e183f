//! Test fixture owning one fresh channel plus the speaker and listener threads
//! spawned against it.

#![allow(dead_code)]

use kovan_rendezvous::{Rendezvous, Snapshot};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const TIMEOUT: Duration = Duration::from_secs(20);

pub struct Harness {
    pub channel: Arc<Rendezvous<u32>>,
    spoken: Arc<AtomicUsize>,
    heard: Arc<AtomicUsize>,
    speakers: Vec<JoinHandle<()>>,
    listeners: Vec<JoinHandle<u32>>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_channel(Rendezvous::new())
    }

    pub fn with_channel(channel: Rendezvous<u32>) -> Self {
        Self {
            channel: Arc::new(channel),
            spoken: Arc::new(AtomicUsize::new(0)),
            heard: Arc::new(AtomicUsize::new(0)),
            speakers: Vec::new(),
            listeners: Vec::new(),
        }
    }

    pub fn spawn_speaker(&mut self, word: u32) {
        let channel = self.channel.clone();
        let spoken = self.spoken.clone();
        self.speakers.push(thread::spawn(move || {
            channel.speak(word);
            spoken.fetch_add(1, Ordering::SeqCst);
        }));
    }

    pub fn spawn_listener(&mut self) {
        let channel = self.channel.clone();
        let heard = self.heard.clone();
        self.listeners.push(thread::spawn(move || {
            let word = channel.listen();
            heard.fetch_add(1, Ordering::SeqCst);
            word
        }));
    }

    /// Speakers whose `speak` call has returned.
    pub fn spoken(&self) -> usize {
        self.spoken.load(Ordering::SeqCst)
    }

    /// Listeners whose `listen` call has returned.
    pub fn heard(&self) -> usize {
        self.heard.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.channel.snapshot()
    }

    /// Polls until `cond` holds, failing the test after a generous timeout.
    pub fn eventually(&self, what: &str, cond: impl Fn(&Self) -> bool) {
        let deadline = Instant::now() + TIMEOUT;
        while !cond(self) {
            assert!(
                Instant::now() < deadline,
                "timed out waiting for {what}: spoken={} heard={} {:?}",
                self.spoken(),
                self.heard(),
                self.snapshot()
            );
            thread::sleep(Duration::from_millis(1));
        }
    }

    /// Polls until the channel counters equal `expected`.
    pub fn settle_at(&self, expected: Snapshot) {
        self.eventually("channel to settle", |h| h.snapshot() == expected);
    }

    pub fn join_speakers(&mut self) {
        for h in self.speakers.drain(..) {
            h.join().unwrap();
        }
    }

    /// Joins every listener and returns what they received, sorted.
    pub fn join_listeners(&mut self) -> Vec<u32> {
        let mut words: Vec<u32> = self.listeners.drain(..).map(|h| h.join().unwrap()).collect();
        words.sort_unstable();
        words
    }
}
