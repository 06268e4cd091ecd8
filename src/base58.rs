//! Base58 encoding for device identifiers.
//!
//! Uses the Bitcoin alphabet, which drops `0`, `O`, `I` and `l` so the output
//! survives being read aloud or pasted into chat. Conversion is done with
//! schoolbook arithmetic over a little-endian digit buffer, so inputs of any
//! length are supported without a bignum dependency.

use thiserror::Error;

/// The 58-character alphabet. Index 0 (`1`) is the zero digit.
pub const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

const INVALID: u8 = 0xFF;

const DECODE_MAP: [u8; 128] = {
    let mut map = [INVALID; 128];
    let mut i = 0;
    while i < ALPHABET.len() {
        map[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    map
};

/// Errors produced while decoding a Base58 string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Base58Error {
    /// A character outside the alphabet was found.
    #[error("invalid base58 character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },
}

/// Encode bytes as Base58.
///
/// Every leading zero byte becomes a leading `1`, so `[0, 1]` and `[1]`
/// encode differently. Empty input encodes to an empty string.
pub fn encode(input: &[u8]) -> String {
    let zeros = input.iter().take_while(|&&b| b == 0).count();

    // log(256) / log(58) is about 1.37
    let mut digits: Vec<u8> = Vec::with_capacity((input.len() - zeros) * 138 / 100 + 1);
    for &byte in &input[zeros..] {
        let mut carry = u32::from(byte);
        for digit in digits.iter_mut() {
            carry += u32::from(*digit) << 8;
            *digit = (carry % 58) as u8;
            carry /= 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }

    let mut out = String::with_capacity(zeros + digits.len());
    out.extend(std::iter::repeat('1').take(zeros));
    out.extend(digits.iter().rev().map(|&d| char::from(ALPHABET[d as usize])));
    out
}

/// Decode a Base58 string back into bytes.
///
/// Leading `1` characters become leading zero bytes.
pub fn decode(input: &str) -> Result<Vec<u8>, Base58Error> {
    let zeros = input.bytes().take_while(|&c| c == ALPHABET[0]).count();

    let mut bytes: Vec<u8> = Vec::with_capacity(input.len());
    for (position, character) in input.chars().enumerate().skip(zeros) {
        let value = digit_value(character)
            .ok_or(Base58Error::InvalidCharacter { character, position })?;

        let mut carry = u32::from(value);
        for byte in bytes.iter_mut() {
            carry += u32::from(*byte) * 58;
            *byte = (carry & 0xFF) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            bytes.push((carry & 0xFF) as u8);
            carry >>= 8;
        }
    }

    let mut out = vec![0u8; zeros];
    out.extend(bytes.iter().rev());
    Ok(out)
}

fn digit_value(character: char) -> Option<u8> {
    let index = usize::try_from(u32::from(character)).ok()?;
    match DECODE_MAP.get(index) {
        Some(&INVALID) | None => None,
        Some(&value) => Some(value),
    }
}
