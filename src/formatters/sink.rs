//! Output sinks.
//!
//! An [`OutputSink`] owns the buffered writer a formatter renders into. It is
//! opened before traversal starts and released when dropped, on success and
//! on error alike.

use crate::error::{LensError, Result};
use crate::options::Destination;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::sync::{Arc, Mutex};

/// Buffered writer for formatted output.
pub struct OutputSink {
    label: String,
    writer: BufWriter<Box<dyn Write + Send>>,
}

impl OutputSink {
    /// Opens `destination` for writing. Files are created or truncated.
    pub fn open(destination: &Destination) -> Result<Self> {
        let writer: Box<dyn Write + Send> = match destination {
            Destination::Stdout => Box::new(io::stdout()),
            Destination::File(path) => {
                let file = File::create(path).map_err(|e| LensError::sink(destination.to_string(), e))?;
                Box::new(file)
            }
        };

        tracing::debug!("Opened output sink {}", destination);

        Ok(Self::from_writer(destination.to_string(), writer))
    }

    /// Wraps an arbitrary writer.
    pub fn from_writer(label: impl Into<String>, writer: Box<dyn Write + Send>) -> Self {
        Self {
            label: label.into(),
            writer: BufWriter::new(writer),
        }
    }

    /// A sink writing into memory, plus a handle for reading what was written.
    pub fn memory() -> (Self, SharedBuffer) {
        let buffer = SharedBuffer::default();
        (
            Self::from_writer("<memory>", Box::new(buffer.clone())),
            buffer,
        )
    }

    pub fn write_str(&mut self, text: &str) -> Result<()> {
        self.writer
            .write_all(text.as_bytes())
            .map_err(|e| LensError::sink(self.label.clone(), e))
    }

    /// Writes `line` followed by a newline.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        self.write_str(line)?;
        self.write_str("\n")
    }

    pub fn blank_line(&mut self) -> Result<()> {
        self.write_str("\n")
    }

    /// Flushes buffered output to the destination.
    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| LensError::sink(self.label.clone(), e))
    }
}

/// Cloneable in-memory byte buffer.
#[derive(Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Everything written so far, decoded lossily as UTF-8.
    pub fn contents(&self) -> String {
        self.bytes
            .lock()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut bytes = self
            .bytes
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "buffer lock poisoned"))?;
        bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
