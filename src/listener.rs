//! Job-log sinks. Everything the user sees about a step (the echoed command
//! line, the tool's own output, fatal diagnostics) goes through a
//! [`TaskListener`].

use std::io::{self, Write};

pub trait TaskListener {
    /// Raw log stream.
    fn logger(&mut self) -> &mut dyn Write;

    /// Writes a `FATAL:` line and returns the stream for further detail.
    fn fatal_error(&mut self, msg: &str) -> &mut dyn Write {
        write_prefixed(self.logger(), "FATAL", msg);
        self.logger()
    }
}

fn write_prefixed(out: &mut dyn Write, prefix: &str, msg: &str) {
    if let Err(e) = writeln!(out, "{}: {}", prefix, msg) {
        log::warn!("Could not write to job log: {}", e);
    }
}

/// Listener over any writer: stdout for the CLI, a `Vec<u8>` in tests.
pub struct StreamListener<W: Write> {
    out: W,
}

impl<W: Write> StreamListener<W> {
    pub fn new(out: W) -> Self {
        StreamListener { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TaskListener for StreamListener<W> {
    fn logger(&mut self) -> &mut dyn Write {
        &mut self.out
    }
}

impl StreamListener<Vec<u8>> {
    /// Captured log as text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.out).into_owned()
    }
}

impl Default for StreamListener<Vec<u8>> {
    fn default() -> Self {
        StreamListener::new(Vec::new())
    }
}

impl StreamListener<io::Stdout> {
    pub fn stdout() -> Self {
        StreamListener::new(io::stdout())
    }
}
