//! Keccak-256 hashing and function selectors.

use sha3::{Digest, Keccak256};

/// Compute the Keccak-256 hash of arbitrary data.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// First four bytes of the hash of a canonical function signature,
/// e.g. `"owner()"` or `"ticketExpired(uint256)"`.
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}
