//! Hash-derived entity IDs.
//!
//! IDs look like `tsk-4k2x9m0q`: an entity prefix, a dash, and base36 digits
//! derived from a hash of the entity's content, creation time and a nonce.
//! Callers retry with increasing nonces when an ID is already taken.

use chrono::{DateTime, Utc};
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use sha2::{Digest, Sha256};

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Number of hash bytes fed into the base36 encoder (64 bits, ~12 digits).
const HASH_BYTES: usize = 8;

/// ID prefix for tasks.
pub const TASK_PREFIX: &str = "tsk";
/// ID prefix for links.
pub const LINK_PREFIX: &str = "lnk";
/// ID prefix for comments.
pub const COMMENT_PREFIX: &str = "cmt";

/// Renders `data` as a big-endian number in exactly `length` base36 digits,
/// keeping the least significant ones.
pub fn encode_base36(data: &[u8], length: usize) -> String {
    let radix = BigUint::from(36u32);
    let mut rest = BigUint::from_bytes_be(data);
    let mut out = vec![b'0'; length];
    for slot in out.iter_mut().rev() {
        if rest.is_zero() {
            break;
        }
        let digit = (&rest % &radix).to_usize().unwrap_or(0);
        *slot = DIGITS[digit];
        rest /= &radix;
    }
    out.into_iter().map(char::from).collect()
}

/// Creates a hash-based ID.
///
/// `seed` is any content that distinguishes the entity (title, url, ...).
pub fn generate_hash_id(
    prefix: &str,
    seed: &str,
    timestamp: DateTime<Utc>,
    length: usize,
    nonce: u32,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    hasher.update(timestamp.timestamp_millis().to_be_bytes());
    hasher.update(nonce.to_be_bytes());
    let digest = hasher.finalize();
    format!("{prefix}-{}", encode_base36(&digest[..HASH_BYTES], length))
}

/// Birthday bound for `rows` IDs drawn from a space of `36^digits`.
fn collision_probability(rows: usize, digits: usize) -> f64 {
    let space = 36f64.powf(digits as f64);
    let rows = rows as f64;
    1.0 - (-(rows * rows) / (2.0 * space)).exp()
}

/// Determines the shortest ID length that keeps the collision probability at
/// or below `max_collision_prob` for a table of `num_items` rows.
pub fn compute_adaptive_length(
    num_items: usize,
    min_length: usize,
    max_length: usize,
    max_collision_prob: f64,
) -> usize {
    (min_length..=max_length)
        .find(|&length| collision_probability(num_items, length) <= max_collision_prob)
        .unwrap_or(max_length)
}

/// Default adaptive ID configuration constants.
pub mod adaptive_defaults {
    /// Collision probability threshold (1%).
    pub const MAX_COLLISION_PROB: f64 = 0.01;
    /// Minimum hash length.
    pub const MIN_LENGTH: usize = 6;
    /// Maximum hash length.
    pub const MAX_LENGTH: usize = 12;
    /// Attempts with increasing nonces before giving up.
    pub const MAX_ATTEMPTS: u32 = 10;
}
