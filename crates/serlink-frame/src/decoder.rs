use bytes::{BufMut, Bytes, BytesMut};
use memchr::memchr2;

use crate::codec::{END, ESC, ESC_END, ESC_ESC};

/// Streaming SLIP decoder.
///
/// Holds the unescaped bytes of the in-progress frame plus the pending-escape
/// flag, so frames and escape sequences may be split across any number of
/// [`decode`](Decoder::decode) calls. Decoding never fails: an escape octet
/// followed by anything other than a valid completion degrades to literal
/// bytes, and the next delimiter resynchronizes the stream.
#[derive(Debug, Default)]
pub struct Decoder {
    buf: BytesMut,
    pending_escape: bool,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the state machine over `chunk`, yielding each datagram completed
    /// within it. State carries over to the next call.
    ///
    /// The iterator is lazy; dropping it before exhaustion leaves the rest of
    /// the chunk unprocessed.
    pub fn decode<'d, 'c>(&'d mut self, chunk: &'c [u8]) -> Datagrams<'d, 'c> {
        Datagrams {
            decoder: self,
            chunk,
            pos: 0,
        }
    }

    /// True if a partial frame or an unfinished escape sequence is buffered.
    pub fn has_partial(&self) -> bool {
        !self.buf.is_empty() || self.pending_escape
    }

    /// Drop any buffered partial frame and return to the initial state.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.pending_escape = false;
    }
}

/// Iterator over the datagrams completed within one chunk.
///
/// Returned by [`Decoder::decode`].
pub struct Datagrams<'d, 'c> {
    decoder: &'d mut Decoder,
    chunk: &'c [u8],
    pos: usize,
}

impl Iterator for Datagrams<'_, '_> {
    type Item = Bytes;

    fn next(&mut self) -> Option<Bytes> {
        let decoder = &mut *self.decoder;
        while self.pos < self.chunk.len() {
            if decoder.pending_escape {
                let byte = self.chunk[self.pos];
                self.pos += 1;
                match byte {
                    // A repeated escape octet keeps the escape pending.
                    ESC => {}
                    ESC_END => {
                        decoder.pending_escape = false;
                        decoder.buf.put_u8(END);
                    }
                    ESC_ESC => {
                        decoder.pending_escape = false;
                        decoder.buf.put_u8(ESC);
                    }
                    END => {
                        decoder.pending_escape = false;
                        if !decoder.buf.is_empty() {
                            return Some(decoder.buf.split().freeze());
                        }
                    }
                    // Not a valid completion: take the byte literally.
                    other => {
                        decoder.pending_escape = false;
                        decoder.buf.put_u8(other);
                    }
                }
                continue;
            }

            match memchr2(END, ESC, &self.chunk[self.pos..]) {
                Some(rel) => {
                    let at = self.pos + rel;
                    if at > self.pos {
                        decoder.buf.extend_from_slice(&self.chunk[self.pos..at]);
                    }
                    let control = self.chunk[at];
                    self.pos = at + 1;
                    if control == ESC {
                        decoder.pending_escape = true;
                    } else if !decoder.buf.is_empty() {
                        // Delimiter with an empty accumulator emits nothing.
                        return Some(decoder.buf.split().freeze());
                    }
                }
                None => {
                    decoder
                        .buf
                        .extend_from_slice(&self.chunk[self.pos..]);
                    self.pos = self.chunk.len();
                }
            }
        }
        None
    }
}
