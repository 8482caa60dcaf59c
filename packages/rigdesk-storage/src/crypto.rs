//! Column encryption and media URL signatures.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chacha20poly1305::{
	ChaCha20Poly1305, Key, KeyInit, Nonce,
	aead::{Aead, AeadCore, OsRng},
};

use crate::{Error, Result};

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;
const URL_SIGNING_CONTEXT: &str = "rigdesk 2024 media url signing";

/// Encrypts text columns with ChaCha20-Poly1305.
///
/// Stored values are base64 of `nonce || ciphertext`, with a fresh random nonce per value.
pub struct FieldCipher {
	cipher: ChaCha20Poly1305,
}
impl FieldCipher {
	pub fn from_base64_key(encoded: &str) -> Result<Self> {
		let key = STANDARD
			.decode(encoded.trim())
			.map_err(|err| Error::Crypto(format!("Field encryption key is not base64: {err}.")))?;

		if key.len() != KEY_LEN {
			return Err(Error::Crypto(format!(
				"Field encryption key must be {KEY_LEN} bytes, got {}.",
				key.len()
			)));
		}

		Ok(Self { cipher: ChaCha20Poly1305::new(Key::from_slice(&key)) })
	}

	pub fn encrypt(&self, plaintext: &str) -> Result<String> {
		let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);
		let ciphertext = self
			.cipher
			.encrypt(&nonce, plaintext.as_bytes())
			.map_err(|_| Error::Crypto("Failed to encrypt field.".to_string()))?;
		let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());

		out.extend_from_slice(nonce.as_slice());
		out.extend_from_slice(&ciphertext);

		Ok(STANDARD.encode(out))
	}

	pub fn decrypt(&self, stored: &str) -> Result<String> {
		let raw = STANDARD
			.decode(stored)
			.map_err(|err| Error::Crypto(format!("Encrypted field is not base64: {err}.")))?;

		if raw.len() <= NONCE_LEN {
			return Err(Error::Crypto("Encrypted field is truncated.".to_string()));
		}

		let (nonce, ciphertext) = raw.split_at(NONCE_LEN);
		let plaintext = self
			.cipher
			.decrypt(Nonce::from_slice(nonce), ciphertext)
			.map_err(|_| Error::Crypto("Failed to decrypt field.".to_string()))?;

		String::from_utf8(plaintext)
			.map_err(|_| Error::Crypto("Decrypted field is not UTF-8.".to_string()))
	}
}

/// Keyed BLAKE3 signatures over an object key and its expiry.
#[derive(Clone)]
pub struct UrlSigner {
	key: [u8; 32],
}
impl UrlSigner {
	pub fn new(secret: &str) -> Self {
		Self { key: blake3::derive_key(URL_SIGNING_CONTEXT, secret.as_bytes()) }
	}

	pub fn sign(&self, object_key: &str, expires: i64) -> String {
		self.mac(object_key, expires).to_hex().to_string()
	}

	/// Checks the signature and that `expires` is not before `now` (unix seconds).
	pub fn verify(&self, object_key: &str, expires: i64, signature: &str, now: i64) -> bool {
		if expires < now {
			return false;
		}

		let Ok(given) = blake3::Hash::from_hex(signature) else {
			return false;
		};

		// `blake3::Hash` equality is constant time.
		given == self.mac(object_key, expires)
	}

	fn mac(&self, object_key: &str, expires: i64) -> blake3::Hash {
		let mut hasher = blake3::Hasher::new_keyed(&self.key);

		hasher.update(object_key.as_bytes());
		hasher.update(b"\n");
		hasher.update(expires.to_string().as_bytes());

		hasher.finalize()
	}
}
