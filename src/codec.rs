//! Base64 over UTF-8 text, used to build HTTP Basic-Auth header values.
//!
//! Encoding uses the standard alphabet (`A-Z a-z 0-9 + /`) with `=` padding
//! and no line wrapping. Decoding is best-effort: characters outside the
//! alphabet are dropped, each group of four symbols is decoded on its own,
//! and bytes that do not form valid UTF-8 are replaced with U+FFFD. It never
//! fails.

use base64::{
    Engine, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig, general_purpose::STANDARD},
};

/// Engine used for decoding a single, already stripped, group of symbols.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

const PAD: u8 = b'=';

fn is_symbol(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'+' || byte == b'/'
}

/// Encodes the UTF-8 bytes of `text` as standard, padded Base64.
///
/// # Examples
///
/// ```
/// use dnsimple_api::codec::encode_base64;
///
/// assert_eq!(encode_base64("alice:secret"), "YWxpY2U6c2VjcmV0");
/// assert_eq!(encode_base64("f"), "Zg==");
/// ```
pub fn encode_base64(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

/// Decodes Base64 back into text.
///
/// Anything that isn't part of the alphabet or padding is ignored. A group
/// that ends early (padding, or fewer than four symbols at the end of the
/// input) yields only the bytes its symbols fully cover, and a group with a
/// single symbol yields nothing.
pub fn decode_base64(text: &str) -> String {
    let filtered: Vec<u8> = text
        .bytes()
        .filter(|b| is_symbol(*b) || *b == PAD)
        .collect();

    let mut bytes = Vec::with_capacity(filtered.len() / 4 * 3);
    for group in filtered.chunks(4) {
        let symbols: Vec<u8> = group.iter().copied().take_while(|b| *b != PAD).collect();
        if symbols.len() < 2 {
            continue;
        }
        if let Err(err) = LENIENT.decode_vec(&symbols, &mut bytes) {
            tracing::trace!("skipping undecodable base64 group: {err}");
        }
    }

    String::from_utf8_lossy(&bytes).into_owned()
}

/// Builds the value of an `Authorization` header for HTTP Basic-Auth.
pub fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", encode_base64(&format!("{username}:{password}")))
}
