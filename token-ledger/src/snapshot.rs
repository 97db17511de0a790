//! Point-in-time snapshots of the full token state
//!
//! # Format
//!
//! A bincode-encoded envelope holding a format version, the SHA-256 digest of
//! the payload and the payload itself (the bincode-encoded [`Token`]). State
//! uses ordered maps throughout, so the same state always encodes to the
//! same bytes and the same digest.

use crate::{token::Token, Error, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Current envelope version
pub const SNAPSHOT_VERSION: u16 = 1;

#[derive(Serialize, Deserialize)]
struct Envelope {
    version: u16,
    checksum: [u8; 32],
    payload: Vec<u8>,
}

/// SHA-256 of a byte slice
pub fn checksum(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.finalize().into()
}

/// Encode a token into snapshot bytes
pub fn encode(token: &Token) -> Result<Vec<u8>> {
    let payload = bincode::serialize(token)?;
    let envelope = Envelope {
        version: SNAPSHOT_VERSION,
        checksum: checksum(&payload),
        payload,
    };
    Ok(bincode::serialize(&envelope)?)
}

/// Decode snapshot bytes, verifying the checksum and every invariant
pub fn decode(bytes: &[u8]) -> Result<Token> {
    let envelope: Envelope = bincode::deserialize(bytes)
        .map_err(|e| Error::Snapshot(format!("unreadable envelope: {}", e)))?;

    if envelope.version != SNAPSHOT_VERSION {
        return Err(Error::Snapshot(format!(
            "unsupported version {} (expected {})",
            envelope.version, SNAPSHOT_VERSION
        )));
    }

    if checksum(&envelope.payload) != envelope.checksum {
        return Err(Error::Snapshot("checksum mismatch".to_string()));
    }

    let token: Token = bincode::deserialize(&envelope.payload)?;
    token
        .check_invariants()
        .map_err(|e| Error::Snapshot(format!("restored state is inconsistent: {}", e)))?;
    Ok(token)
}

/// Write a snapshot to `path`, returning the payload checksum
pub fn save(token: &Token, path: impl AsRef<Path>) -> Result<[u8; 32]> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let bytes = encode(token)?;
    std::fs::write(path, &bytes)?;

    let digest = checksum(&bincode::serialize(token)?);
    tracing::info!(
        path = %path.display(),
        bytes = bytes.len(),
        checksum = %hex::encode(digest),
        "Snapshot written"
    );
    Ok(digest)
}

/// Read and verify a snapshot from `path`
pub fn load(path: impl AsRef<Path>) -> Result<Token> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let token = decode(&bytes)?;
    tracing::info!(path = %path.display(), events = token.events().len(), "Snapshot loaded");
    Ok(token)
}
