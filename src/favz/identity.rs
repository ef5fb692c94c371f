//! Stable identifiers for favorites.
//!
//! An id is a pure function of `(title, author)`:
//!
//! ```text
//! "{title}-{author}" -> percent-encode (encodeURIComponent rules)
//!                    -> base64 (standard alphabet)
//!                    -> keep [A-Za-z0-9]
//!                    -> first 32 chars
//! ```
//!
//! Percent-encoding first keeps the base64 step working on plain ASCII, so
//! titles in any script produce an id. The truncation means two pairs that
//! share a long enough prefix map to the same id; duplicates are then rejected
//! by the store as if they were the same book.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt::Write as _;

pub const ID_MAX_LEN: usize = 32;
const SEPARATOR: char = '-';

pub fn generate_id(title: &str, author: &str) -> String {
    let joined = format!("{}{}{}", title, SEPARATOR, author);
    let encoded = STANDARD.encode(encode_uri_component(&joined));
    encoded
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(ID_MAX_LEN)
        .collect()
}

fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        if is_unreserved(byte) {
            out.push(byte as char);
        } else {
            let _ = write!(out, "%{:02X}", byte);
        }
    }
    out
}

fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(
            byte,
            b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')'
        )
}
