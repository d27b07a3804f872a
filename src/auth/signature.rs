// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signed-message verification.
//!
//! Proves ownership of a wallet address from a compact recoverable ECDSA
//! signature over an arbitrary message, using the chain's signed-message
//! envelope: the magic prefix and the message are both varint-length-prefixed,
//! the envelope is double-SHA256 hashed, the public key is recovered from the
//! 65-byte compact signature, and the address derived from the recovered key
//! must equal the claimed address.
//!
//! ## Failure semantics
//!
//! Structurally malformed input (bad base64, wrong length, header byte out of
//! range) raises [`SignatureError`], which the boundary layer reports as a
//! 500-class failure, distinguishable from a legitimate mismatch. Everything
//! downstream of structural parsing (unrecoverable scalars, address mismatch)
//! verifies as `false`.

use base64ct::{Base64, Encoding};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::models::WalletAddress;

/// Magic prefix of the signed-message envelope.
const MESSAGE_MAGIC: &[u8] = b"Bitcoin Signed Message:\n";

/// Version byte for derived pay-to-pubkey-hash addresses.
const VERSION_P2PKH: u8 = 0x00;

/// Compact signature header bytes: 27..=30 uncompressed, 31..=34 compressed.
const HEADER_MIN: u8 = 27;
const HEADER_MAX: u8 = 34;
const HEADER_COMPRESSED: u8 = 31;

/// Structurally malformed signature input.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("malformed signature: {0}")]
    Malformed(String),
}

/// Verify that `signature` was produced over `message` by the key owning
/// `address`.
///
/// Returns `Ok(false)` when the signature is well-formed but does not match
/// the (address, message) pair; returns [`SignatureError`] when the signature
/// string itself cannot be parsed.
pub fn verify_signed_message(
    address: &WalletAddress,
    message: &str,
    signature: &str,
) -> Result<bool, SignatureError> {
    let bytes = Base64::decode_vec(signature.trim())
        .map_err(|e| SignatureError::Malformed(format!("invalid base64: {e}")))?;

    if bytes.len() != 65 {
        return Err(SignatureError::Malformed(format!(
            "expected 65 bytes, got {}",
            bytes.len()
        )));
    }

    let header = bytes[0];
    if !(HEADER_MIN..=HEADER_MAX).contains(&header) {
        return Err(SignatureError::Malformed(format!(
            "header byte {header} out of range"
        )));
    }
    let compressed = header >= HEADER_COMPRESSED;
    let mut recovery_byte = if compressed {
        header - HEADER_COMPRESSED
    } else {
        header - HEADER_MIN
    };

    let mut sig = match Signature::from_slice(&bytes[1..]) {
        Ok(sig) => sig,
        Err(e) => {
            tracing::debug!("signature scalars out of range: {e}");
            return Ok(false);
        }
    };

    // Recovery expects a low-S signature; flipping S flips the key parity.
    if let Some(normalized) = sig.normalize_s() {
        sig = normalized;
        recovery_byte ^= 1;
    }
    let Some(recovery_id) = RecoveryId::from_byte(recovery_byte) else {
        return Ok(false);
    };

    let digest = magic_hash(message);
    let key = match VerifyingKey::recover_from_prehash(&digest, &sig, recovery_id) {
        Ok(key) => key,
        Err(e) => {
            tracing::debug!("public key recovery failed: {e}");
            return Ok(false);
        }
    };

    let encoded = key.to_encoded_point(compressed);
    Ok(p2pkh_address(encoded.as_bytes()) == address.as_str())
}

/// Double-SHA256 of the varint-length-prefixed magic and message.
fn magic_hash(message: &str) -> [u8; 32] {
    let message = message.as_bytes();
    let mut envelope = Vec::with_capacity(MESSAGE_MAGIC.len() + message.len() + 18);
    write_varint(&mut envelope, MESSAGE_MAGIC.len() as u64);
    envelope.extend_from_slice(MESSAGE_MAGIC);
    write_varint(&mut envelope, message.len() as u64);
    envelope.extend_from_slice(message);

    let first = Sha256::digest(&envelope);
    Sha256::digest(first).into()
}

/// Append the chain's variable-length integer encoding of `n`.
fn write_varint(buf: &mut Vec<u8>, n: u64) {
    match n {
        0..=0xfc => buf.push(n as u8),
        0xfd..=0xffff => {
            buf.push(0xfd);
            buf.extend_from_slice(&(n as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            buf.push(0xfe);
            buf.extend_from_slice(&(n as u32).to_le_bytes());
        }
        _ => {
            buf.push(0xff);
            buf.extend_from_slice(&n.to_le_bytes());
        }
    }
}

/// Derive the base58check P2PKH address for a SEC1-encoded public key.
fn p2pkh_address(pubkey: &[u8]) -> String {
    let sha = Sha256::digest(pubkey);
    let hash160 = Ripemd160::digest(sha);

    let mut payload = Vec::with_capacity(21);
    payload.push(VERSION_P2PKH);
    payload.extend_from_slice(&hash160);
    bs58::encode(payload).with_check().into_string()
}
