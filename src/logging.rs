//! Tracing setup for the terminal front-end.
//!
//! The TUI owns stdout, so formatted log lines are sent over a channel and
//! shown in the log pane instead.

use crate::constants::LOG_PANE_LINES;
use std::collections::VecDeque;
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use tracing_subscriber::EnvFilter;

struct ChannelWriter {
    sender: Sender<String>,
}

impl io::Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(text) = String::from_utf8(buf.to_vec()) {
            let _ = self.sender.send(text);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init(default_filter: &str) -> Receiver<String> {
    let (sender, receiver) = mpsc::channel();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // Already installed (tests, repeated init): keep the existing one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_writer(move || ChannelWriter {
            sender: sender.clone(),
        })
        .try_init();

    receiver
}

/// Most recent log lines for the log pane.
#[derive(Debug, Default)]
pub struct LogBuffer {
    lines: VecDeque<String>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain_from(&mut self, receiver: &Receiver<String>) {
        for chunk in receiver.try_iter() {
            self.push(&chunk);
        }
    }

    pub fn push(&mut self, chunk: &str) {
        for line in chunk.lines().filter(|l| !l.trim().is_empty()) {
            if self.lines.len() == LOG_PANE_LINES {
                self.lines.pop_front();
            }
            self.lines.push_back(line.to_string());
        }
    }

    /// The newest `count` lines, oldest first.
    pub fn tail(&self, count: usize) -> impl Iterator<Item = &str> {
        let skip = self.lines.len().saturating_sub(count);
        self.lines.iter().skip(skip).map(String::as_str)
    }
}
