//! Encode/decode scenarios across the whole codec.
//!
//! ```bash
//! cargo test -p morse-codec --test roundtrip
//! ```

use morse_codec::{decode, encode};

/// Drops the trailing newline each direction appends.
fn strip_newline(mut v: Vec<u8>) -> Vec<u8> {
    assert_eq!(v.pop(), Some(b'\n'), "output must end with a newline");
    v
}

#[test]
fn sos_encodes_to_three_tokens() {
    assert_eq!(encode(b"SOS"), b"... --- ... \n");
}

#[test]
fn sos_decodes_from_letter_gaps() {
    assert_eq!(decode(b"... --- ..."), b"SOS\n");
}

/// Two words separated by one space: the encoder emits the letter gap after
/// the last S plus three word-gap spaces, and the decoder turns that run of
/// four back into exactly one space.
#[test]
fn two_words_survive_the_round_trip() {
    let morse = encode(b"SOS SOS");
    assert_eq!(morse, b"... --- ...    ... --- ... \n");
    assert_eq!(decode(&morse), b"SOS SOS\n");
}

#[test]
fn letters_digits_and_spaces_round_trip() {
    let samples: &[&[u8]] = &[
        b"HELLO WORLD",
        b"CQ CQ DE DL1ABC",
        b"0123456789",
        b"THE QUICK BROWN FOX JUMPS OVER THE LAZY DOG",
        b"A",
        b"73 ES GL",
    ];

    for &s in samples {
        let back = strip_newline(decode(&strip_newline(encode(s))));
        assert_eq!(back, s, "round trip of {:?}", String::from_utf8_lossy(s));
    }
}

#[test]
fn repeated_spaces_are_preserved() {
    let back = strip_newline(decode(&strip_newline(encode(b"A  B"))));
    assert_eq!(back, b"A  B");
}

#[test]
fn unmapped_input_is_dropped_before_the_round_trip() {
    let back = strip_newline(decode(&strip_newline(encode(b"Hello, World"))));
    assert_eq!(back, b"H W");
}
