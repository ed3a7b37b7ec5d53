//! Mock adapters for integration tests.
//!
//! Scripted transport, a clock that only moves when slept on, and an
//! event sink that records everything, all shareable with the test body
//! after being moved into a scheduler.

use pmstation::app::events::AppEvent;
use pmstation::app::ports::{ClockPort, EventSink};
use pmstation::transport::Transport;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

// ── Scripted transport ────────────────────────────────────────

/// One scripted reply to `read_exact_within`.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Deliver these bytes (possibly fewer than requested).
    Bytes(Vec<u8>),
    /// Report a driver error.
    Fault,
}

#[derive(Debug, Default)]
pub struct TransportLog {
    pub script: VecDeque<Reply>,
    pub reads: Vec<(usize, u32)>,
}

/// Transport that replays a script; an exhausted script reads nothing.
#[derive(Clone, Default)]
pub struct MockTransport(pub Arc<Mutex<TransportLog>>);

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, reply: Reply) {
        self.0.lock().unwrap().script.push_back(reply);
    }

    pub fn push_frame(&self, frame: &[u8]) {
        self.push(Reply::Bytes(frame.to_vec()));
    }

    /// `(requested_len, timeout_ms)` for every read so far.
    pub fn reads(&self) -> Vec<(usize, u32)> {
        self.0.lock().unwrap().reads.clone()
    }
}

impl Transport for MockTransport {
    type Error = &'static str;

    fn read_exact_within(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, Self::Error> {
        let mut log = self.0.lock().unwrap();
        log.reads.push((buf.len(), timeout_ms));
        match log.script.pop_front() {
            Some(Reply::Bytes(bytes)) => {
                let n = buf.len().min(bytes.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                Ok(n)
            }
            Some(Reply::Fault) => Err("uart driver fault"),
            None => Ok(0),
        }
    }
}

// ── Fake clock ────────────────────────────────────────────────

/// Clock whose time only advances through `sleep_ms`.
#[derive(Clone, Default)]
pub struct FakeClock {
    now_ms: Arc<Mutex<u32>>,
    sleeps: Arc<Mutex<Vec<u32>>>,
}

#[allow(dead_code)]
impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(ms: u32) -> Self {
        let clock = Self::default();
        *clock.now_ms.lock().unwrap() = ms;
        clock
    }

    pub fn sleeps(&self) -> Vec<u32> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl ClockPort for FakeClock {
    fn uptime_ms(&self) -> u32 {
        *self.now_ms.lock().unwrap()
    }

    fn sleep_ms(&mut self, ms: u32) {
        *self.now_ms.lock().unwrap() += ms;
        self.sleeps.lock().unwrap().push(ms);
    }
}

// ── Recording sink ────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct RecordingSink(pub Arc<Mutex<Vec<AppEvent>>>);

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AppEvent> {
        self.0.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.0.lock().unwrap().push(event.clone());
    }
}
