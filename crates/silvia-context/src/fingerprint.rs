// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canonical cache keys for LLM contexts.

use sha2::{Digest, Sha256};
use silvia_core::types::Turn;

/// Fingerprint of a turn sequence: SHA-256 of its JSON array
/// `[{"role":..,"content":..},..]`, hex-encoded.
///
/// Order-sensitive. Any difference in role, content, or length changes the key.
pub fn context_key(turns: &[Turn]) -> String {
    // Serializing Vec<Turn> of plain strings cannot fail.
    let canonical = serde_json::to_vec(turns).unwrap_or_default();
    hex::encode(Sha256::digest(&canonical))
}
