//! Public checklist hash tokens.

use rand::RngCore;
use std::fmt::Write;

/// Random lowercase hex token of exactly `length` characters
pub fn generate_unique_hash(length: usize) -> String {
    let mut bytes = vec![0u8; length.div_ceil(2)];
    rand::rng().fill_bytes(&mut bytes);

    let mut hash = String::with_capacity(bytes.len() * 2);
    for byte in &bytes {
        let _ = write!(hash, "{byte:02x}");
    }
    hash.truncate(length);
    hash
}

/// Whether `candidate` looks like a hash this service could have issued
pub fn is_well_formed(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate.len() <= 64
        && candidate.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
}
