//! Raw link capture files.
//!
//! A capture is a flat sequence of records, one per chunk handed over by the
//! link:
//!
//! ```text
//! +----------------------+-----------------+-------------------+
//! | elapsed ms (u32, LE) | length (u16 LE) | bytes (length)    |
//! +----------------------+-----------------+-------------------+
//! ```
//!
//! Captures hold bytes exactly as received, before any framing, so feeding
//! them back through a [`Decoder`](crate::Decoder) reproduces the session.

use std::fs::File;
use std::io::{self, BufWriter, ErrorKind, Read, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use bytes::Bytes;

use crate::protocol::{Error, Result};

/// Record header size: timestamp and length
pub const RECORD_HEADER_SIZE: usize = 6;

/// Longest chunk a single record can hold. Longer chunks are split.
pub const MAX_RECORD_LEN: usize = u16::MAX as usize;

/// One chunk read back from a capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRecord {
    /// Milliseconds since the capture started
    pub timestamp_ms: u32,
    /// Bytes as received from the link
    pub data: Bytes,
}

/// Writes capture records to any byte sink.
#[derive(Debug)]
pub struct CaptureWriter<W: Write> {
    inner: W,
    started: Instant,
}

impl<W: Write> CaptureWriter<W> {
    /// Start a capture; timestamps count from now.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            started: Instant::now(),
        }
    }

    /// Record a chunk stamped with the time since the capture started.
    pub fn record(&mut self, data: &[u8]) -> Result<()> {
        let elapsed = self.started.elapsed().as_millis();
        self.record_at(u32::try_from(elapsed).unwrap_or(u32::MAX), data)
    }

    /// Record a chunk with an explicit timestamp. Empty chunks write nothing.
    pub fn record_at(&mut self, timestamp_ms: u32, data: &[u8]) -> Result<()> {
        for chunk in data.chunks(MAX_RECORD_LEN) {
            let mut header = [0u8; RECORD_HEADER_SIZE];
            header[0..4].copy_from_slice(&timestamp_ms.to_le_bytes());
            // chunks() bounds the length to u16::MAX.
            header[4..6].copy_from_slice(&(chunk.len() as u16).to_le_bytes());
            self.inner.write_all(&header)?;
            self.inner.write_all(chunk)?;
        }
        self.inner.flush()?;
        Ok(())
    }

    /// Get the underlying sink
    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Thread-safe, file-backed capture recorder.
#[derive(Clone)]
pub struct CaptureRecorder {
    inner: Arc<Mutex<CaptureWriter<BufWriter<File>>>>,
}

impl CaptureRecorder {
    /// Create a recorder that writes to the provided path, truncating any existing file.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(CaptureWriter::new(BufWriter::new(file)))),
        })
    }

    /// Record a chunk with the current elapsed time.
    pub fn record(&self, data: &[u8]) -> Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("capture recorder poisoned"))?;
        guard.record(data)
    }
}

impl std::fmt::Debug for CaptureRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureRecorder").finish_non_exhaustive()
    }
}

/// Reads capture records back from any byte source.
#[derive(Debug)]
pub struct CaptureReader<R: Read> {
    inner: R,
    done: bool,
}

impl<R: Read> CaptureReader<R> {
    /// Read records from `inner`
    pub fn new(inner: R) -> Self {
        Self { inner, done: false }
    }

    /// Get the underlying source
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn read_record(&mut self) -> Result<Option<CaptureRecord>> {
        let mut header = [0u8; RECORD_HEADER_SIZE];
        match read_full(&mut self.inner, &mut header)? {
            0 => return Ok(None),
            RECORD_HEADER_SIZE => {}
            got => {
                return Err(Error::TruncatedCapture {
                    needed: RECORD_HEADER_SIZE,
                    got,
                });
            }
        }

        let timestamp_ms = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        let len = usize::from(u16::from_le_bytes([header[4], header[5]]));
        let mut data = vec![0u8; len];
        let got = read_full(&mut self.inner, &mut data)?;
        if got < len {
            return Err(Error::TruncatedCapture { needed: len, got });
        }

        Ok(Some(CaptureRecord {
            timestamp_ms,
            data: Bytes::from(data),
        }))
    }
}

impl<R: Read> Iterator for CaptureReader<R> {
    type Item = Result<CaptureRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Fill `buf` unless the source ends first; returns the bytes read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}
