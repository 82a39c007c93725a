//! Output sinks for dump text
//!
//! The exporter pushes every fragment through an [`OutputSink`] in the order
//! it is generated. A failed write ends the current exporter call.

use std::io::Write;

use thiserror::Error;

/// Errors reported by an output sink
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sink is closed")]
    Closed,

    #[error("Sink rejected output: {0}")]
    Rejected(String),
}

/// Destination for generated dump text
pub trait OutputSink: Send {
    fn write_chunk(&mut self, chunk: &str) -> Result<(), SinkError>;
}

/// Collects the dump in memory
#[derive(Debug, Default, Clone)]
pub struct StringSink {
    buffer: String,
}

impl StringSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> &str {
        &self.buffer
    }

    pub fn into_string(self) -> String {
        self.buffer
    }

    /// Drop everything written so far
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl OutputSink for StringSink {
    fn write_chunk(&mut self, chunk: &str) -> Result<(), SinkError> {
        self.buffer.push_str(chunk);
        Ok(())
    }
}

/// Writes the dump to any `io::Write`, such as a buffered file
pub struct WriterSink<W: Write + Send> {
    writer: W,
    bytes_written: u64,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            bytes_written: 0,
        }
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Flush and hand back the writer
    pub fn finish(mut self) -> Result<W, SinkError> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write + Send> OutputSink for WriterSink<W> {
    fn write_chunk(&mut self, chunk: &str) -> Result<(), SinkError> {
        self.writer.write_all(chunk.as_bytes())?;
        self.bytes_written += chunk.len() as u64;
        Ok(())
    }
}
