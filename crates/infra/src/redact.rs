//! Log redaction helpers
//!
//! Account identifiers are personal data; log lines carry a salted hash
//! token instead of the raw value.

use sha2::{Digest, Sha256};

const ACCOUNT_HASH_SALT: &[u8] = b"tminus-scheduling-account-salt";

/// Deterministic, salted token for an account identifier.
pub fn redact_account(account_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(ACCOUNT_HASH_SALT);
    hasher.update(account_id.as_bytes());
    let digest = hasher.finalize();
    let hash = hex::encode(&digest[..8]);
    format!("account_hash={hash}")
}
