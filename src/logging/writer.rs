//! Sanitizing writer for `tracing_subscriber`
//!
//! Wraps any [`MakeWriter`] so every rendered log line passes through a
//! [`Sanitizer`] before reaching its sink. Lines are buffered until `\n`;
//! a buffer that grows past twice the sanitizer's size limit without a newline
//! is replaced by the truncation marker.

use crate::sanitization::{Sanitizer, ERROR_MARKER, TRUNCATION_MARKER};
use std::io::{self, Write};
use std::sync::Arc;
use tracing::dispatcher::{self, Dispatch};
use tracing_subscriber::fmt::MakeWriter;

/// A `MakeWriter` whose writers sanitize each line
#[derive(Debug)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
    sanitizer: Arc<Sanitizer>,
}

impl<M> SanitizingMakeWriter<M> {
    pub fn new(inner: M, sanitizer: Arc<Sanitizer>) -> Self {
        Self { inner, sanitizer }
    }
}

impl<M: Clone> Clone for SanitizingMakeWriter<M> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            sanitizer: Arc::clone(&self.sanitizer),
        }
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter::new(self.inner.make_writer(), Arc::clone(&self.sanitizer))
    }
}

/// Line-buffering writer produced by [`SanitizingMakeWriter`]
///
/// Anything still buffered is sanitized and written on flush or drop.
pub struct SanitizingWriter<W: Write> {
    inner: W,
    sanitizer: Arc<Sanitizer>,
    buffer: Vec<u8>,
}

impl<W: Write> SanitizingWriter<W> {
    pub fn new(inner: W, sanitizer: Arc<Sanitizer>) -> Self {
        Self {
            inner,
            sanitizer,
            buffer: Vec::new(),
        }
    }

    /// Sanitize one line with tracing silenced on this thread
    ///
    /// The sanitizer's own diagnostics would otherwise be rendered through
    /// this writer again while it is still writing.
    fn clean(&self, line: &str) -> String {
        dispatcher::with_default(&Dispatch::none(), || self.sanitizer.sanitize_text(line))
            .unwrap_or_else(|_| ERROR_MARKER.to_string())
    }

    fn flush_lines(&mut self) -> io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&line[..line.len() - 1]);
            let sanitized = self.clean(&text);
            self.inner.write_all(sanitized.as_bytes())?;
            self.inner.write_all(b"\n")?;
        }
        Ok(())
    }

    fn flush_remaining(&mut self) -> io::Result<()> {
        self.flush_lines()?;
        if !self.buffer.is_empty() {
            let text = String::from_utf8_lossy(&self.buffer).into_owned();
            self.buffer.clear();
            let sanitized = self.clean(&text);
            self.inner.write_all(sanitized.as_bytes())?;
        }
        Ok(())
    }
}

impl<W: Write> Write for SanitizingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        self.flush_lines()?;

        let hard_cap = self
            .sanitizer
            .config()
            .max_input_size_bytes
            .saturating_mul(2);
        if self.buffer.len() > hard_cap {
            self.buffer.clear();
            self.inner.write_all(TRUNCATION_MARKER.as_bytes())?;
            self.inner.write_all(b"\n")?;
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_remaining()?;
        self.inner.flush()
    }
}

impl<W: Write> Drop for SanitizingWriter<W> {
    fn drop(&mut self) {
        let _ = self.flush_remaining();
    }
}
