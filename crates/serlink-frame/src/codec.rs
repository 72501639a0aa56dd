use bytes::{BufMut, Bytes, BytesMut};
use memchr::memchr2_iter;

/// Frame delimiter (0xC0). Opens and closes every frame.
pub const END: u8 = 0xC0;
/// Escape introducer (0xDB).
pub const ESC: u8 = 0xDB;
/// Second byte of an escaped delimiter (0xDB 0xDC -> literal 0xC0).
pub const ESC_END: u8 = 0xDC;
/// Second byte of an escaped escape (0xDB 0xDD -> literal 0xDB).
pub const ESC_ESC: u8 = 0xDD;

/// Exact wire size of the frame for `datagram`, delimiters included.
pub fn encoded_len(datagram: &[u8]) -> usize {
    // Each END/ESC in the payload expands to two bytes; plus both delimiters.
    let escapes = memchr2_iter(END, ESC, datagram).count();
    datagram.len() + escapes + 2
}

/// Encode a datagram into a delimited, escaped frame.
///
/// The payload is scanned for reserved octets, each replaced by its two-byte
/// escape sequence, and the result is wrapped in [`END`] delimiters. Every
/// input encodes, including the empty datagram (which becomes `C0 C0`);
/// there are no error conditions.
pub fn encode_frame(datagram: &[u8]) -> Bytes {
    let mut out = BytesMut::with_capacity(encoded_len(datagram));
    out.put_u8(END);
    let mut start = 0usize;
    for pos in memchr2_iter(END, ESC, datagram) {
        if pos > start {
            out.extend_from_slice(&datagram[start..pos]);
        }
        match datagram[pos] {
            END => out.extend_from_slice(&[ESC, ESC_END]),
            ESC => out.extend_from_slice(&[ESC, ESC_ESC]),
            _ => unreachable!(),
        }
        start = pos + 1;
    }
    if start < datagram.len() {
        out.extend_from_slice(&datagram[start..]);
    }
    out.put_u8(END);
    out.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_payload_is_wrapped_only() {
        let frame = encode_frame(b"abc");
        assert_eq!(frame.as_ref(), &[END, b'a', b'b', b'c', END]);
    }

    #[test]
    fn empty_datagram_is_two_delimiters() {
        let frame = encode_frame(&[]);
        assert_eq!(frame.as_ref(), &[END, END]);
    }

    #[test]
    fn reserved_octets_are_escaped() {
        let frame = encode_frame(&[END, ESC, 0x01]);
        assert_eq!(
            frame.as_ref(),
            &[END, ESC, ESC_END, ESC, ESC_ESC, 0x01, END]
        );
    }

    #[test]
    fn escaped_payload_contains_no_bare_delimiter() {
        let payload: Vec<u8> = (0u8..=255).collect();
        let frame = encode_frame(&payload);
        let interior = &frame[1..frame.len() - 1];
        assert!(!interior.contains(&END));
    }

    #[test]
    fn all_delimiters_payload_becomes_escape_pairs() {
        let payload = vec![END; 64];
        let frame = encode_frame(&payload);
        assert_eq!(frame.len(), 2 + 64 * 2);
        for pair in frame[1..frame.len() - 1].chunks(2) {
            assert_eq!(pair, &[ESC, ESC_END]);
        }
    }

    #[test]
    fn encoded_len_matches_encoding() {
        for payload in [
            &[][..],
            &b"plain"[..],
            &[END][..],
            &[ESC][..],
            &[END, ESC, END, 0x42][..],
        ] {
            assert_eq!(encoded_len(payload), encode_frame(payload).len());
        }
    }
}
