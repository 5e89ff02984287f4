// The lookup table is a plain `static` array: it is immutable, needs no
// initialisation at runtime, and can be shared by any number of threads
// without locking.
//
// Order matters. Letters come first (index = byte - b'A'), then digits
// (index = 26 + byte - b'0'), then the word separator. Decoding scans in
// this order and stops at the first exact match.

/// One ASCII symbol and its Morse token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MorseEntry {
    pub ascii: u8,
    pub token: &'static str,
}

const fn entry(ascii: u8, token: &'static str) -> MorseEntry {
    MorseEntry { ascii, token }
}

/// Number of letters in the table.
pub const LETTERS: usize = 26;

/// Longest token in the table (digits are five symbols).
pub const MAX_TOKEN_LEN: usize = 5;

/// ASCII ↔ Morse lookup table, 37 entries.
pub static MORSE_TABLE: [MorseEntry; 37] = [
    entry(b'A', ".-"),
    entry(b'B', "-..."),
    entry(b'C', "-.-."),
    entry(b'D', "-.."),
    entry(b'E', "."),
    entry(b'F', "..-."),
    entry(b'G', "--."),
    entry(b'H', "...."),
    entry(b'I', ".."),
    entry(b'J', ".---"),
    entry(b'K', "-.-"),
    entry(b'L', ".-.."),
    entry(b'M', "--"),
    entry(b'N', "-."),
    entry(b'O', "---"),
    entry(b'P', ".--."),
    entry(b'Q', "--.-"),
    entry(b'R', ".-."),
    entry(b'S', "..."),
    entry(b'T', "-"),
    entry(b'U', "..-"),
    entry(b'V', "...-"),
    entry(b'W', ".--"),
    entry(b'X', "-..-"),
    entry(b'Y', "-.--"),
    entry(b'Z', "--.."),
    entry(b'0', "-----"),
    entry(b'1', ".----"),
    entry(b'2', "..---"),
    entry(b'3', "...--"),
    entry(b'4', "....-"),
    entry(b'5', "....."),
    entry(b'6', "-...."),
    entry(b'7', "--..."),
    entry(b'8', "---.."),
    entry(b'9', "----."),
    entry(b' ', "  "),
];

/// Token for an uppercase letter or a digit. Everything else, including
/// lowercase letters and the space, yields `None`.
#[inline]
pub fn token_for(byte: u8) -> Option<&'static str> {
    match byte {
        b'A'..=b'Z' => Some(MORSE_TABLE[(byte - b'A') as usize].token),
        b'0'..=b'9' => Some(MORSE_TABLE[LETTERS + (byte - b'0') as usize].token),
        _ => None,
    }
}

/// First table entry whose token equals `symbols` exactly.
#[inline]
pub fn lookup(symbols: &[u8]) -> Option<u8> {
    MORSE_TABLE
        .iter()
        .find(|e| e.token.as_bytes() == symbols)
        .map(|e| e.ascii)
}
