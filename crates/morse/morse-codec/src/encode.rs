//! ASCII → Morse.
//!
//! Every recognised symbol is emitted as its token followed by one space
//! (the letter gap). A literal space becomes three spaces (the word gap).
//! Lowercase letters, punctuation and control bytes are dropped without
//! error. The output always ends with `\n`.

use crate::table::{MAX_TOKEN_LEN, token_for};
use tracing::trace;

/// Separator emitted after every token.
const LETTER_GAP: &[u8] = b" ";

/// Emitted for every literal space in the input.
const WORD_GAP: &[u8] = b"   ";

/// Upper bound on the encoded size of `input_len` bytes, newline included.
///
/// Each input byte costs at most one longest token plus its gap; the extra
/// slot covers the trailing newline.
#[inline]
pub fn encoded_len_bound(input_len: usize) -> usize {
    (input_len + 1) * (MAX_TOKEN_LEN + 1)
}

/// Encodes `input` into Morse.
///
/// # Example
/// ```
/// assert_eq!(morse_codec::encode(b"SOS"), b"... --- ... \n");
/// ```
pub fn encode(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len_bound(input.len()));

    for &byte in input {
        if let Some(token) = token_for(byte) {
            out.extend_from_slice(token.as_bytes());
            out.extend_from_slice(LETTER_GAP);
        } else if byte == b' ' {
            out.extend_from_slice(WORD_GAP);
        } else {
            trace!(byte, "encode: skipping unmapped byte");
        }
    }

    out.push(b'\n');
    out
}
