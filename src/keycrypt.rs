//! Key-based authenticated encryption producing textual tokens
//!
//! This module implements the crypto layer underneath the file
//! transforms:
//! - a pre-shared 256-bit key, handled in textual form (base64url)
//! - NaCl secretbox (XSalsa20Poly1305) for authenticated encryption
//!
//! A token is the base64url (no padding) encoding of:
//! - nonce: 24 bytes
//! - sealed box: variable length (includes 16-byte Poly1305 MAC)
//!
//! Tokens are a single line free of whitespace and padding. Decryption
//! authenticates: a wrong key or a tampered token is rejected, never
//! decrypted into garbage.

use crate::error::{ErrorCategory, ErrorKind, Result, ShroudError};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use crypto_secretbox::aead::{Aead, KeyInit};
use crypto_secretbox::{Nonce, XSalsa20Poly1305};
use rand::TryRng;
use rand::rngs::SysRng;
use std::fmt;
use zeroize::Zeroizing;

/// Length of the key in bytes
const KEY_LEN: usize = 32;

/// Length of the nonce in bytes
const NONCE_LEN: usize = 24;

/// Length of the Poly1305 MAC carried by the sealed box, in bytes
const MAC_LEN: usize = 16;

/// A pre-shared secret key.
///
/// The textual form (43 characters of base64url) is what
/// `generate-password` prints and what the password file holds. Key
/// bytes are wiped from memory on drop.
pub struct Key {
    bytes: Zeroizing<[u8; KEY_LEN]>,
}

impl Key {
    /// Generate a fresh random key.
    ///
    /// Fails only when the operating system cannot supply randomness.
    pub fn generate() -> Result<Self> {
        let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
        fill_random(&mut *bytes)?;
        Ok(Self { bytes })
    }

    /// Parse a key from its textual form.
    pub fn from_text(text: &str) -> Result<Self> {
        let decoded = Zeroizing::new(URL_SAFE_NO_PAD.decode(text).map_err(|e| {
            ShroudError::with_kind_and_source(
                ErrorCategory::User,
                ErrorKind::KeyInvalid,
                "password is not valid base64url key text",
                e,
            )
        })?);
        if decoded.len() != KEY_LEN {
            return Err(ShroudError::with_kind(
                ErrorCategory::User,
                ErrorKind::KeyInvalid,
                format!(
                    "password decodes to {} bytes; expected a {}-byte key",
                    decoded.len(),
                    KEY_LEN
                ),
            ));
        }
        let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
        bytes.copy_from_slice(&decoded);
        Ok(Self { bytes })
    }

    /// The textual form of the key.
    pub fn to_text(&self) -> Zeroizing<String> {
        Zeroizing::new(URL_SAFE_NO_PAD.encode(&*self.bytes))
    }
}

// Debug output never reveals key material.
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Key(..)")
    }
}

/// Encrypt plaintext into a token using a random nonce
pub fn encrypt(key: &Key, plaintext: &[u8]) -> Result<String> {
    let mut nonce = [0u8; NONCE_LEN];
    fill_random(&mut nonce)?;

    encrypt_with_nonce(key, plaintext, &nonce)
}

/// Encrypt plaintext into a token using the provided nonce
///
/// Exists so tests can produce deterministic tokens. Real callers go
/// through [`encrypt`], which draws a fresh nonce every time; reusing
/// a nonce under the same key breaks the cipher's guarantees.
pub fn encrypt_with_nonce(key: &Key, plaintext: &[u8], nonce: &[u8; NONCE_LEN]) -> Result<String> {
    let cipher = XSalsa20Poly1305::new(&(*key.bytes).into());

    let nonce_obj = Nonce::from(*nonce);
    let sealed_box = cipher.encrypt(&nonce_obj, plaintext).map_err(|e| {
        ShroudError::new(ErrorCategory::Internal, format!("encryption failed: {}", e))
    })?;

    let mut raw = Vec::with_capacity(NONCE_LEN + sealed_box.len());
    raw.extend_from_slice(nonce);
    raw.extend_from_slice(&sealed_box);

    Ok(URL_SAFE_NO_PAD.encode(&raw))
}

/// Decrypt a token back into plaintext
pub fn decrypt(key: &Key, token: &str) -> Result<Vec<u8>> {
    let raw = URL_SAFE_NO_PAD.decode(token).map_err(|e| {
        ShroudError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::TokenDecode,
            format!("base64 decoding of token failed: {}", e),
            e,
        )
    })?;

    if raw.len() < NONCE_LEN + MAC_LEN {
        return Err(ShroudError::with_kind(
            ErrorCategory::User,
            ErrorKind::TokenDecode,
            "token too short to hold a nonce and sealed box; likely truncated",
        ));
    }

    let nonce: [u8; NONCE_LEN] = raw[..NONCE_LEN].try_into().map_err(|_| {
        ShroudError::with_kind(
            ErrorCategory::Internal,
            ErrorKind::TokenDecode,
            "failed to read nonce from token",
        )
    })?;
    let sealed_box = &raw[NONCE_LEN..];

    let cipher = XSalsa20Poly1305::new(&(*key.bytes).into());
    let nonce_obj = Nonce::from(nonce);
    let plaintext = cipher.decrypt(&nonce_obj, sealed_box).map_err(|_| {
        ShroudError::with_kind(
            ErrorCategory::User,
            ErrorKind::AuthenticationFailed,
            "corrupt input, tampered-with data, or wrong password",
        )
    })?;

    Ok(plaintext)
}

fn fill_random(dest: &mut [u8]) -> Result<()> {
    SysRng.try_fill_bytes(dest).map_err(|e| {
        ShroudError::new(
            ErrorCategory::Internal,
            format!("failed to read OS randomness: {}", e),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_key_text_shape() {
        let key = Key::generate().unwrap();
        let text = key.to_text();

        // 32 bytes encode to 43 base64url characters without padding.
        assert_eq!(text.len(), 43);
        assert!(
            text.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_generated_keys_are_distinct() {
        let k1 = Key::generate().unwrap();
        let k2 = Key::generate().unwrap();

        assert_ne!(k1.to_text().as_str(), k2.to_text().as_str());
    }

    #[test]
    fn test_debug_output_redacts_key_material() {
        let key = Key::generate().unwrap();
        let debug = format!("{:?}", key);

        assert_eq!(debug, "Key(..)");
        assert!(!debug.contains(key.to_text().as_str()));
    }

    #[test]
    fn test_key_text_roundtrip() {
        let key = Key::generate().unwrap();
        let restored = Key::from_text(&key.to_text()).unwrap();

        let token = encrypt(&key, b"payload").unwrap();
        let decrypted = decrypt(&restored, &token).unwrap();
        assert_eq!(decrypted, b"payload");
    }

    #[test]
    fn test_from_text_rejects_bad_base64() {
        let result = Key::from_text("not+a+key$$");
        let err = result.expect_err("expected key parse error");
        assert_eq!(err.kind, Some(ErrorKind::KeyInvalid));
    }

    #[test]
    fn test_from_text_rejects_wrong_length() {
        // "AAAA" is valid base64url but decodes to 3 bytes.
        let result = Key::from_text("AAAA");
        let err = result.expect_err("expected key length error");
        assert_eq!(err.kind, Some(ErrorKind::KeyInvalid));
    }

    #[test]
    fn test_empty_plaintext() {
        let key = Key::generate().unwrap();
        let plaintext = b"";

        let token = encrypt(&key, plaintext).unwrap();
        let decrypted = decrypt(&key, &token).unwrap();

        assert_eq!(plaintext, &decrypted[..]);
    }

    #[test]
    fn test_small_plaintext() {
        let key = Key::generate().unwrap();
        let plaintext = b"hello";

        let token = encrypt(&key, plaintext).unwrap();
        let decrypted = decrypt(&key, &token).unwrap();

        assert_eq!(plaintext, &decrypted[..]);
    }

    #[test]
    fn test_all_byte_values() {
        let key = Key::generate().unwrap();
        let plaintext: Vec<u8> = (0..=255).collect();

        let token = encrypt(&key, &plaintext).unwrap();
        let decrypted = decrypt(&key, &token).unwrap();

        assert_eq!(plaintext, decrypted);
    }

    #[test]
    fn test_large_plaintext() {
        let key = Key::generate().unwrap();
        let plaintext = vec![0x42u8; 128 * 1024]; // 128KB

        let token = encrypt(&key, &plaintext).unwrap();
        let decrypted = decrypt(&key, &token).unwrap();

        assert_eq!(plaintext, decrypted);
    }

    #[test]
    fn test_deterministic_encryption() {
        let key = Key::generate().unwrap();
        let plaintext = b"hello world";
        let nonce = [2u8; NONCE_LEN];

        let t1 = encrypt_with_nonce(&key, plaintext, &nonce).unwrap();
        let t2 = encrypt_with_nonce(&key, plaintext, &nonce).unwrap();

        // Same nonce produces identical tokens
        assert_eq!(t1, t2);
        assert_eq!(decrypt(&key, &t1).unwrap(), plaintext);
    }

    #[test]
    fn test_different_nonce_different_token() {
        let key = Key::generate().unwrap();
        let plaintext = b"hello world";

        let t1 = encrypt_with_nonce(&key, plaintext, &[2u8; NONCE_LEN]).unwrap();
        let t2 = encrypt_with_nonce(&key, plaintext, &[3u8; NONCE_LEN]).unwrap();

        assert_ne!(t1, t2);
        assert_eq!(decrypt(&key, &t1).unwrap(), plaintext);
        assert_eq!(decrypt(&key, &t2).unwrap(), plaintext);
    }

    #[test]
    fn test_random_nonces_give_distinct_tokens() {
        let key = Key::generate().unwrap();

        let t1 = encrypt(&key, b"same input").unwrap();
        let t2 = encrypt(&key, b"same input").unwrap();

        assert_ne!(t1, t2);
    }

    #[test]
    fn test_token_embeds_nonce() {
        let key = Key::generate().unwrap();
        let nonce = [7u8; NONCE_LEN];

        let token = encrypt_with_nonce(&key, b"data", &nonce).unwrap();

        // 24 nonce bytes are a multiple of 3, so they encode to exactly
        // the first 32 token characters.
        assert_eq!(&token[..32], URL_SAFE_NO_PAD.encode(nonce));
    }

    #[test]
    fn test_token_is_single_url_safe_line() {
        let key = Key::generate().unwrap();
        let token = encrypt(&key, &[0xFFu8; 100]).unwrap();

        assert!(!token.contains(' '));
        assert!(!token.contains('\n'));
        assert!(!token.contains('+'));
        assert!(!token.contains('/'));
        assert!(!token.contains('='));
    }

    #[test]
    fn test_wrong_key() {
        let token = encrypt(&Key::generate().unwrap(), b"secret data").unwrap();
        let result = decrypt(&Key::generate().unwrap(), &token);

        let err = result.expect_err("expected authentication failure");
        assert_eq!(err.kind, Some(ErrorKind::AuthenticationFailed));
    }

    #[test]
    fn test_tampered_token() {
        let key = Key::generate().unwrap();
        let token = encrypt(&key, b"secret data").unwrap();

        // Flip a character inside the nonce region; the token still
        // decodes but no longer authenticates.
        let mut chars: Vec<char> = token.chars().collect();
        chars[10] = if chars[10] == 'A' { 'B' } else { 'A' };
        let tampered: String = chars.into_iter().collect();

        let result = decrypt(&key, &tampered);
        let err = result.expect_err("expected authentication failure");
        assert_eq!(err.kind, Some(ErrorKind::AuthenticationFailed));
    }

    #[test]
    fn test_token_not_base64() {
        let result = decrypt(&Key::generate().unwrap(), "not a token $$$");
        let err = result.expect_err("expected token decode error");
        assert_eq!(err.kind, Some(ErrorKind::TokenDecode));
    }

    #[test]
    fn test_token_too_short() {
        // Valid base64url, but only 3 bytes once decoded.
        let result = decrypt(&Key::generate().unwrap(), "AAAA");
        let err = result.expect_err("expected truncated token error");
        assert_eq!(err.kind, Some(ErrorKind::TokenDecode));
    }
}
