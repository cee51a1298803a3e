//! Content hashing used for change detection and cache keys.
//!
//! FNV-1a in both widths: the 32-bit digest is the change-detection
//! checksum carried by every record, the 64-bit digest keys cache
//! entries. Neither is cryptographic.

const FNV32_OFFSET: u32 = 0x811c9dc5;
const FNV32_PRIME: u32 = 0x01000193;
const FNV64_OFFSET: u64 = 0xcbf29ce484222325;
const FNV64_PRIME: u64 = 0x100000001b3;

/// 32-bit FNV-1a digest of the full file content.
pub fn content_checksum(content: &str) -> u32 {
    let mut hash = FNV32_OFFSET;
    for byte in content.as_bytes() {
        hash ^= *byte as u32;
        hash = hash.wrapping_mul(FNV32_PRIME);
    }
    hash
}

/// 64-bit FNV-1a digest, used for signature hashes in cache keys.
pub fn stable_hash64(input: &str) -> u64 {
    let mut hash = FNV64_OFFSET;
    for byte in input.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(FNV64_PRIME);
    }
    hash
}

#[cfg(test)]
#[path = "../tests/src/checksum_tests.rs"]
mod tests;
