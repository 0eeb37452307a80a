//! Recoverable secp256k1 signatures

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey as Secp256k1PublicKey, Secp256k1, SecretKey};

use super::derivation::{KeyType, PrivateKey, PublicKey};
use crate::error::{Result, SigningError};

/// Length of a recoverable signature: `r || s || v`
pub const SIGNATURE_BYTES: usize = 65;

/// Length of the digest accepted by [`sign_digest`]
pub const DIGEST_BYTES: usize = 32;

fn secret_key(private_key: &PrivateKey) -> Result<SecretKey> {
    if private_key.key_type() != KeyType::Secp256k1 {
        return Err(SigningError::InvalidKey(format!(
            "expected a secp256k1 key, got {:?}",
            private_key.key_type()
        ))
        .into());
    }

    SecretKey::from_slice(private_key.as_bytes())
        .map_err(|e| SigningError::InvalidKey(e.to_string()).into())
}

fn message(digest: &[u8]) -> Result<Message> {
    if digest.len() != DIGEST_BYTES {
        return Err(SigningError::SigningFailed(format!(
            "digest must be {} bytes, got {}",
            DIGEST_BYTES,
            digest.len()
        ))
        .into());
    }

    Message::from_digest_slice(digest).map_err(|e| SigningError::SigningFailed(e.to_string()).into())
}

/// Compute the compressed public key for a private key
pub fn public_key_from_private(private_key: &PrivateKey) -> Result<PublicKey> {
    let secp = Secp256k1::signing_only();
    let public_key = Secp256k1PublicKey::from_secret_key(&secp, &secret_key(private_key)?);
    Ok(PublicKey::new(public_key.serialize().to_vec(), KeyType::Secp256k1))
}

/// Expand a compressed secp256k1 public key to its 65-byte uncompressed form
pub fn uncompressed_public_key(public_key: &PublicKey) -> Result<[u8; 65]> {
    if public_key.key_type() != KeyType::Secp256k1 {
        return Err(SigningError::InvalidKey("not a secp256k1 public key".to_string()).into());
    }

    let public_key = Secp256k1PublicKey::from_slice(public_key.as_bytes())
        .map_err(|e| SigningError::InvalidKey(e.to_string()))?;
    Ok(public_key.serialize_uncompressed())
}

/// Sign a 32-byte digest, producing `r || s || v`
pub fn sign_digest(private_key: &PrivateKey, digest: &[u8]) -> Result<[u8; SIGNATURE_BYTES]> {
    let secret_key = secret_key(private_key)?;
    let message = message(digest)?;

    let secp = Secp256k1::signing_only();
    let (recovery_id, compact) = secp
        .sign_ecdsa_recoverable(&message, &secret_key)
        .serialize_compact();

    let mut signature = [0u8; SIGNATURE_BYTES];
    signature[..64].copy_from_slice(&compact);
    signature[64] = recovery_id.to_i32() as u8;
    Ok(signature)
}

/// Recover the compressed public key that produced a signature over a digest
pub fn recover_public_key(digest: &[u8], signature: &[u8]) -> Result<PublicKey> {
    if signature.len() != SIGNATURE_BYTES {
        return Err(SigningError::SigningFailed(format!(
            "signature must be {} bytes, got {}",
            SIGNATURE_BYTES,
            signature.len()
        ))
        .into());
    }

    let message = message(digest)?;
    let recovery_id = RecoveryId::from_i32(i32::from(signature[64]))
        .map_err(|e| SigningError::SigningFailed(e.to_string()))?;
    let signature = RecoverableSignature::from_compact(&signature[..64], recovery_id)
        .map_err(|e| SigningError::SigningFailed(e.to_string()))?;

    let secp = Secp256k1::verification_only();
    let public_key = secp
        .recover_ecdsa(&message, &signature)
        .map_err(|e| SigningError::SigningFailed(e.to_string()))?;

    Ok(PublicKey::new(public_key.serialize().to_vec(), KeyType::Secp256k1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash::sha256;
    use crate::error::Error;

    const PRIVATE_KEY: &str = "de7176242724956611e9a4f6dfb7a3b3b7eeeec0475b8bccdfec4e52a49c1466";
    const PUBLIC_KEY: &str = "029dc79308883267bb49f3924e9eb58d60bcecd17ad3f2f53681ecc5c668b2ba5f";

    fn private_key() -> PrivateKey {
        PrivateKey::new(hex::decode(PRIVATE_KEY).unwrap(), KeyType::Secp256k1)
    }

    #[test]
    fn test_public_key_from_private() {
        let public_key = public_key_from_private(&private_key()).unwrap();
        assert_eq!(hex::encode(public_key.as_bytes()), PUBLIC_KEY);

        let uncompressed = uncompressed_public_key(&public_key).unwrap();
        assert_eq!(uncompressed[0], 0x04);
        assert_eq!(&uncompressed[1..33], &public_key.as_bytes()[1..]);
    }

    #[test]
    fn test_sign_and_recover() {
        let digest = sha256(b"walletkit");
        let signature = sign_digest(&private_key(), &digest).unwrap();
        assert!(signature[64] <= 3);

        let recovered = recover_public_key(&digest, &signature).unwrap();
        assert_eq!(hex::encode(recovered.as_bytes()), PUBLIC_KEY);

        // RFC 6979 nonces make signing deterministic
        assert_eq!(signature, sign_digest(&private_key(), &digest).unwrap());
    }

    #[test]
    fn test_sign_rejects_wrong_key_type() {
        let key = PrivateKey::new(vec![7u8; 32], KeyType::Ed25519);
        assert!(matches!(
            sign_digest(&key, &[0u8; 32]),
            Err(Error::Signing(SigningError::InvalidKey(_)))
        ));
    }

    #[test]
    fn test_sign_rejects_short_digest() {
        assert!(matches!(
            sign_digest(&private_key(), b"short"),
            Err(Error::Signing(SigningError::SigningFailed(_)))
        ));
    }
}
