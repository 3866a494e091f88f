//! Drive a [`Decoder`] from a blocking byte source.
//!
//! Serial ports, TCP sockets and capture replays all hand out bytes in
//! arbitrary chunks. [`FrameReader`] pulls from any [`Read`] implementation
//! and yields decoder outcomes as they complete.

use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

use tracing::debug;

use crate::protocol::{Decoder, Outcome, Result};

/// Default read chunk size in bytes
pub const DEFAULT_READ_SIZE: usize = 512;

/// Iterator of decoded outcomes over a byte source.
///
/// Only completed frames (delivered or rejected) are yielded. End of input
/// ends the iteration; any partial frame stays inside the decoder.
#[derive(Debug)]
pub struct FrameReader<R: Read> {
    inner: R,
    decoder: Decoder,
    buf: Vec<u8>,
    ready: VecDeque<Outcome>,
    done: bool,
}

impl<R: Read> FrameReader<R> {
    /// Read from `inner`, decoding with `decoder`
    pub fn new(inner: R, decoder: Decoder) -> Self {
        Self::with_read_size(inner, decoder, DEFAULT_READ_SIZE)
    }

    /// Read from `inner` in chunks of at most `read_size` bytes
    pub fn with_read_size(inner: R, decoder: Decoder, read_size: usize) -> Self {
        Self {
            inner,
            decoder,
            buf: vec![0u8; read_size.max(1)],
            ready: VecDeque::new(),
            done: false,
        }
    }

    /// Get the decoder
    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// Get the mutable decoder
    pub fn decoder_mut(&mut self) -> &mut Decoder {
        &mut self.decoder
    }

    /// Split back into source and decoder
    pub fn into_inner(self) -> (R, Decoder) {
        (self.inner, self.decoder)
    }
}

impl<R: Read> Iterator for FrameReader<R> {
    type Item = Result<Outcome>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(outcome) = self.ready.pop_front() {
                return Some(Ok(outcome));
            }
            if self.done {
                return None;
            }

            match self.inner.read(&mut self.buf) {
                Ok(0) => {
                    debug!(state = ?self.decoder.state(), "byte source exhausted");
                    self.done = true;
                }
                Ok(n) => self.ready.extend(self.decoder.feed(&self.buf[..n])),
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => {
                    self.done = true;
                    return Some(Err(err.into()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{MspCode, ParserState, Role, encode};
    use std::io::{self, Cursor};

    /// Reader that fails once after handing out its data.
    struct FlakyReader {
        data: Cursor<Vec<u8>>,
        interrupted: bool,
    }

    impl Read for FlakyReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(ErrorKind::Interrupted.into());
            }
            let n = self.data.read(buf)?;
            if n == 0 {
                return Err(io::Error::new(ErrorKind::BrokenPipe, "link lost"));
            }
            Ok(n)
        }
    }

    #[test]
    fn test_reads_frames_across_chunk_boundaries() {
        let mut stream = Vec::new();
        for code in [MspCode::Status, MspCode::Attitude, MspCode::Analog] {
            stream.extend(encode(Role::FlightController, code, &[0x11; 9]).unwrap());
        }
        let reader =
            FrameReader::with_read_size(Cursor::new(stream), Decoder::new(Role::GroundStation), 4);

        let codes: Vec<_> = reader
            .map(|outcome| outcome.unwrap().into_frame().unwrap().code())
            .collect();
        assert_eq!(codes, [MspCode::Status, MspCode::Attitude, MspCode::Analog]);
    }

    #[test]
    fn test_partial_frame_left_in_decoder() {
        let bytes = encode(Role::FlightController, MspCode::RawImu, &[1; 18]).unwrap();
        let mut reader =
            FrameReader::new(Cursor::new(bytes[..10].to_vec()), Decoder::new(Role::GroundStation));

        assert!(reader.next().is_none());
        assert_eq!(reader.decoder().state(), ParserState::Payload);
    }

    #[test]
    fn test_io_error_ends_iteration() {
        let bytes = encode(Role::FlightController, MspCode::Status, &[]).unwrap();
        let source = FlakyReader {
            data: Cursor::new(bytes),
            interrupted: false,
        };
        let mut reader = FrameReader::new(source, Decoder::new(Role::GroundStation));

        assert!(matches!(reader.next(), Some(Ok(Outcome::Frame(_)))));
        assert!(matches!(reader.next(), Some(Err(crate::Error::Io(_)))));
        assert!(reader.next().is_none());
    }
}
