//! Morse → ASCII.
//!
//! The input is split into tokens: a run of symbol bytes followed by the run
//! of separator bytes after it. A separator is any byte `<= b' '`, so tabs,
//! newlines and NULs count the same as spaces.
//!
//! ```text
//! input:   "...    ---\n"
//! tokens:  ("...", gap 4)  ("---", gap 1)
//! output:  "S" + " " + "O" + "\n"
//! ```
//!
//! Each token that matches a table entry emits its ASCII symbol; tokens that
//! match nothing are skipped. The gap then emits one space for every full
//! three separators, so a letter gap (1) emits nothing and a letter gap plus
//! a word gap (1 + 3) emits exactly one space.
//!
//! The caller's buffer is never modified.

use crate::table::lookup;
use tracing::trace;

/// Separators per emitted space.
const WORD_GAP_LEN: usize = 3;

#[inline(always)]
fn is_separator(byte: u8) -> bool {
    byte <= b' '
}

/// Upper bound on the decoded size of `input_len` bytes, newline included.
///
/// Every output byte consumes at least one input byte, so decoding never
/// expands; the extra slot covers the trailing newline.
#[inline]
pub fn decoded_len_bound(input_len: usize) -> usize {
    input_len + 1
}

/// One Morse token and the separator run that followed it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    /// Symbol bytes. Empty when the input starts with separators.
    pub symbols: &'a [u8],
    /// Number of separator bytes after `symbols`.
    pub gap: usize,
}

impl Token<'_> {
    /// Spaces this token's gap stands for.
    #[inline]
    pub fn word_gaps(&self) -> usize {
        self.gap / WORD_GAP_LEN
    }
}

/// Lazy iterator over the tokens of a Morse byte stream.
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Tokens<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let input: &'a [u8] = self.input;
        let rest = &input[self.pos..];
        if rest.is_empty() {
            return None;
        }

        let len = rest
            .iter()
            .position(|&b| is_separator(b))
            .unwrap_or(rest.len());
        let gap = rest[len..].iter().take_while(|&&b| is_separator(b)).count();
        self.pos += len + gap;

        Some(Token {
            symbols: &rest[..len],
            gap,
        })
    }
}

/// Decodes a Morse byte stream into ASCII.
///
/// # Example
/// ```
/// assert_eq!(morse_codec::decode(b"... --- ..."), b"SOS\n");
/// ```
pub fn decode(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(decoded_len_bound(input.len()));

    for token in Tokens::new(input) {
        match lookup(token.symbols) {
            Some(ascii) => out.push(ascii),
            None if token.symbols.is_empty() => {}
            None => trace!(symbols = ?token.symbols, "decode: no table entry"),
        }

        let spaces = token.word_gaps();
        if spaces > 0 {
            trace!(gap = token.gap, spaces, "decode: word gap");
            out.resize(out.len() + spaces, b' ');
        }
    }

    out.push(b'\n');
    out
}
