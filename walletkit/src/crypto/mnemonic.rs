//! BIP-39 seed derivation
//!
//! Accounts are created from the 64-byte seed of a recovery phrase; phrase
//! generation and storage belong to the caller.

use bip39::Mnemonic;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Length of a BIP-39 seed
pub const SEED_BYTES: usize = 64;

/// Derive the seed of a recovery phrase and optional passphrase
///
/// The phrase must be a valid English BIP-39 phrase; its checksum word is
/// verified before the seed is stretched.
pub fn mnemonic_to_seed(phrase: &str, passphrase: Option<&str>) -> Result<Zeroizing<[u8; SEED_BYTES]>> {
    let mnemonic = Mnemonic::parse_normalized(phrase).map_err(|e| Error::Mnemonic(e.to_string()))?;
    Ok(Zeroizing::new(mnemonic.to_seed_normalized(passphrase.unwrap_or_default())))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAPER_KEY: &str = "patient doctor olympic frog force glimpse endless antenna online dragon bargain someone";

    #[test]
    fn test_paper_key_seed() {
        let seed = mnemonic_to_seed(PAPER_KEY, None).unwrap();
        assert_eq!(
            hex::encode(&seed[..]),
            "36a86797ec562533b9a6d1fe98762866d5bc7ab5a8de743de681afbd3a1d55ac\
             d8d486d7220a1adff5cd5a4e3d6a3f74f6c520f6de63a962773a9241b59a46d9"
        );
    }

    #[test]
    fn test_passphrase_changes_seed() {
        let plain = mnemonic_to_seed(PAPER_KEY, None).unwrap();
        let empty = mnemonic_to_seed(PAPER_KEY, Some("")).unwrap();
        let salted = mnemonic_to_seed(PAPER_KEY, Some("avax")).unwrap();

        assert_eq!(plain[..], empty[..]);
        assert_ne!(plain[..], salted[..]);
    }

    #[test]
    fn test_rejects_invalid_phrase() {
        // Valid words, wrong checksum word
        let bad_checksum = ["abandon"; 12].join(" ");
        assert!(matches!(mnemonic_to_seed(&bad_checksum, None), Err(Error::Mnemonic(_))));

        assert!(matches!(mnemonic_to_seed("not a phrase", None), Err(Error::Mnemonic(_))));
    }
}
