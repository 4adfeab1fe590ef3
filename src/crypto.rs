use std::num::NonZeroU32;

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::{AesGcm, Key, Nonce, Tag};
use rand::RngCore;
use rand::rngs::OsRng;
use ring::pbkdf2;
use zeroize::Zeroizing;

use crate::error::{Result, VaultError};
use crate::models::EncryptedPayload;

pub const KEY_LEN: usize = 32;
pub const IV_LEN: usize = 16;
pub const SALT_LEN: usize = 32;
pub const TAG_LEN: usize = 16;
pub const DEFAULT_ITERATIONS: u32 = 600_000;

/// AES-256-GCM with a 16-byte IV.
type VaultCipher = AesGcm<Aes256, U16>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    pub iterations: NonZeroU32,
}

impl KdfParams {
    /// Returns `None` for a zero iteration count.
    pub fn with_iterations(iterations: u32) -> Option<Self> {
        NonZeroU32::new(iterations).map(|iterations| Self { iterations })
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: NonZeroU32::MIN.saturating_add(DEFAULT_ITERATIONS - 1),
        }
    }
}

/// PBKDF2-HMAC-SHA512. Deterministic for a given password and salt.
pub fn derive_key_with_params(
    password: &str,
    salt: &[u8],
    params: KdfParams,
) -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA512,
        params.iterations,
        salt,
        password.as_bytes(),
        &mut key[..],
    );
    key
}

fn fill_random(buf: &mut [u8]) -> Result<()> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| VaultError::Randomness(e.to_string()))
}

/// Encrypts under a fresh salt and IV on every call.
pub fn encrypt_with_password(
    plaintext: &str,
    password: &str,
    params: KdfParams,
) -> Result<EncryptedPayload> {
    let mut salt = [0u8; SALT_LEN];
    fill_random(&mut salt)?;
    let key = derive_key_with_params(password, &salt, params);

    let mut iv = [0u8; IV_LEN];
    fill_random(&mut iv)?;

    let cipher = VaultCipher::new(Key::<VaultCipher>::from_slice(&key[..]));
    let mut buffer = plaintext.as_bytes().to_vec();
    let tag = cipher
        .encrypt_in_place_detached(Nonce::<U16>::from_slice(&iv), b"", &mut buffer)
        .map_err(|_| VaultError::CorruptVault("plaintext too large to encrypt".into()))?;

    Ok(EncryptedPayload {
        salt: hex::encode(salt),
        iv: hex::encode(iv),
        auth_tag: hex::encode(tag),
        data: hex::encode(buffer),
    })
}

fn decode_field(value: &str, expected_len: Option<usize>) -> Result<Vec<u8>> {
    let bytes = hex::decode(value).map_err(|_| VaultError::Authentication)?;
    match expected_len {
        Some(len) if bytes.len() != len => Err(VaultError::Authentication),
        _ => Ok(bytes),
    }
}

/// Verifies the tag before returning anything. Malformed fields are reported as
/// `Authentication`, the same as a wrong password.
pub fn decrypt_with_password(
    payload: &EncryptedPayload,
    password: &str,
    params: KdfParams,
) -> Result<Zeroizing<Vec<u8>>> {
    let salt = decode_field(&payload.salt, Some(SALT_LEN))?;
    let iv = decode_field(&payload.iv, Some(IV_LEN))?;
    let tag = decode_field(&payload.auth_tag, Some(TAG_LEN))?;
    let mut buffer = Zeroizing::new(decode_field(&payload.data, None)?);

    let key = derive_key_with_params(password, &salt, params);
    let cipher = VaultCipher::new(Key::<VaultCipher>::from_slice(&key[..]));
    cipher
        .decrypt_in_place_detached(
            Nonce::<U16>::from_slice(&iv),
            b"",
            &mut buffer[..],
            Tag::from_slice(&tag),
        )
        .map_err(|_| VaultError::Authentication)?;
    Ok(buffer)
}

/// Decrypts and requires the plaintext to be UTF-8.
pub fn decrypt_to_string(
    payload: &EncryptedPayload,
    password: &str,
    params: KdfParams,
) -> Result<Zeroizing<String>> {
    let bytes = decrypt_with_password(payload, password, params)?;
    let text = std::str::from_utf8(&bytes)
        .map_err(|_| VaultError::CorruptVault("decrypted data is not UTF-8".into()))?;
    Ok(Zeroizing::new(text.to_owned()))
}
