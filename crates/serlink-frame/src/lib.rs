//! SLIP byte-stuffing frame codec.
//!
//! This is the core value-add layer of serlink. Datagrams travel inside
//! delimited frames:
//!
//! ```text
//! FRAME   ::= 0xC0 ESCAPED_PAYLOAD 0xC0
//! ESCAPED_PAYLOAD ::= each literal 0xC0 -> 0xDB 0xDC
//!                     each literal 0xDB -> 0xDB 0xDD
//!                     all other bytes unchanged
//! ```
//!
//! Encoding is a total function: every byte sequence, including the empty
//! one, has a frame. Decoding is a streaming state machine that tolerates
//! arbitrary chunk boundaries and malformed escape sequences: bad input
//! degrades to literal bytes and the next delimiter resynchronizes the
//! decoder, so neither operation has an error type.

pub mod codec;
pub mod decoder;

pub use codec::{encode_frame, encoded_len, END, ESC, ESC_END, ESC_ESC};
pub use decoder::{Datagrams, Decoder};
