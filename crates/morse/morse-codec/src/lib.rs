#![forbid(unsafe_code)]

pub mod decode;
pub mod encode;
pub mod table;

pub use decode::{Token, Tokens, decode, decoded_len_bound};
pub use encode::{encode, encoded_len_bound};
pub use table::{MORSE_TABLE, MorseEntry};
