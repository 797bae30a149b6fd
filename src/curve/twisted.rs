//! ed25519 and curve25519
//!
//! SLIP10 only defines hardened derivation for these curves. Any 32 bytes string is a valid
//! secret key, so master and child keys are taken from the HMAC output as is, without
//! resampling. Public keys are prefixed with `0x00` to fit the 33 bytes key field.

use curve25519_dalek::MontgomeryPoint;
use hmac::Mac as _;
use zeroize::{Zeroize, Zeroizing};

use super::{check_seed_len, CurveId, SecretKeyBytes, Slip10Curve};
use crate::{
    errors::{Error, InvalidInput},
    split_into_two_halves, ChainCode, ChildIndex, HmacSha512, PublicKeyBytes,
};

/// SLIP10 derivation on ed25519
pub struct Ed25519;

/// SLIP10 derivation on curve25519, public keys are X25519 keys
pub struct Curve25519;

impl Slip10Curve for Ed25519 {
    fn id(&self) -> CurveId {
        CurveId::Ed25519
    }

    fn generate_master(&self, seed: &[u8]) -> Result<(SecretKeyBytes, ChainCode), Error> {
        generate_master(CurveId::Ed25519, seed)
    }

    fn derive_private_child(
        &self,
        private_key: &[u8; 32],
        chain_code: &ChainCode,
        child_index: ChildIndex,
    ) -> Result<(SecretKeyBytes, ChainCode), Error> {
        derive_hardened(CurveId::Ed25519, private_key, chain_code, child_index)
    }

    fn privkey_is_valid(&self, private_key: &[u8]) -> bool {
        private_key.len() == 32
    }

    fn pubkey_is_valid(&self, public_key: &[u8]) -> bool {
        match strip_prefix(public_key) {
            Some(point) => ed25519_dalek::VerifyingKey::from_bytes(point).is_ok(),
            None => false,
        }
    }

    fn privkey_to_pubkey(&self, private_key: &[u8; 32]) -> Result<PublicKeyBytes, InvalidInput> {
        let signing_key = ed25519_dalek::SigningKey::from_bytes(private_key);
        Ok(with_prefix(signing_key.verifying_key().as_bytes()))
    }
}

impl Slip10Curve for Curve25519 {
    fn id(&self) -> CurveId {
        CurveId::Curve25519
    }

    fn generate_master(&self, seed: &[u8]) -> Result<(SecretKeyBytes, ChainCode), Error> {
        generate_master(CurveId::Curve25519, seed)
    }

    fn derive_private_child(
        &self,
        private_key: &[u8; 32],
        chain_code: &ChainCode,
        child_index: ChildIndex,
    ) -> Result<(SecretKeyBytes, ChainCode), Error> {
        derive_hardened(CurveId::Curve25519, private_key, chain_code, child_index)
    }

    fn privkey_is_valid(&self, private_key: &[u8]) -> bool {
        private_key.len() == 32
    }

    fn pubkey_is_valid(&self, public_key: &[u8]) -> bool {
        strip_prefix(public_key).is_some()
    }

    fn privkey_to_pubkey(&self, private_key: &[u8; 32]) -> Result<PublicKeyBytes, InvalidInput> {
        let point = MontgomeryPoint::mul_base_clamped(*private_key);
        Ok(with_prefix(point.as_bytes()))
    }
}

fn generate_master(curve: CurveId, seed: &[u8]) -> Result<(SecretKeyBytes, ChainCode), Error> {
    check_seed_len(seed)?;

    let mut i = HmacSha512::new_from_slice(curve.seed_tag())
        .expect("this never fails: hmac can handle keys of any size")
        .chain_update(seed)
        .finalize()
        .into_bytes();
    let halves = split(&i);
    i.as_mut_slice().zeroize();
    Ok(halves)
}

fn derive_hardened(
    curve: CurveId,
    private_key: &[u8; 32],
    chain_code: &ChainCode,
    child_index: ChildIndex,
) -> Result<(SecretKeyBytes, ChainCode), Error> {
    if !child_index.is_hardened() {
        return Err(Error::UnsupportedDerivation { curve });
    }

    let mut i = HmacSha512::new_from_slice(chain_code)
        .expect("this never fails: hmac can handle keys of any size")
        .chain_update([0x00])
        .chain_update(private_key)
        .chain_update(child_index.to_be_bytes())
        .finalize()
        .into_bytes();
    let halves = split(&i);
    i.as_mut_slice().zeroize();
    Ok(halves)
}

fn split(i: &hmac::digest::Output<HmacSha512>) -> (SecretKeyBytes, ChainCode) {
    let (i_left, i_right) = split_into_two_halves(i);
    let mut secret_key = Zeroizing::new([0u8; 32]);
    secret_key.copy_from_slice(i_left);
    (secret_key, (*i_right).into())
}

fn with_prefix(point: &[u8; 32]) -> PublicKeyBytes {
    let mut public_key = [0u8; 33];
    public_key[1..].copy_from_slice(point);
    public_key
}

fn strip_prefix(public_key: &[u8]) -> Option<&[u8; 32]> {
    match public_key {
        [0x00, point @ ..] => point.try_into().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_hardened_is_rejected() {
        for curve in [&Ed25519 as &dyn Slip10Curve, &Curve25519] {
            let err = curve
                .derive_private_child(&[1; 32], &[2; 32], ChildIndex::from(1))
                .unwrap_err();
            assert!(matches!(err, Error::UnsupportedDerivation { curve: c } if c == curve.id()));
        }
    }

    #[test]
    fn public_keys_are_prefixed() {
        for curve in [&Ed25519 as &dyn Slip10Curve, &Curve25519] {
            let public_key = curve.privkey_to_pubkey(&[3; 32]).unwrap();
            assert_eq!(public_key[0], 0x00);
            assert!(curve.pubkey_is_valid(&public_key));

            let mut prefixed = public_key;
            prefixed[0] = 0x02;
            assert!(!curve.pubkey_is_valid(&prefixed));
            assert!(!curve.pubkey_is_valid(&public_key[1..]));
        }
    }

    #[test]
    fn any_32_bytes_is_a_secret_key() {
        assert!(Ed25519.privkey_is_valid(&[0; 32]));
        assert!(Curve25519.privkey_is_valid(&[0xff; 32]));
        assert!(!Ed25519.privkey_is_valid(&[0; 33]));
    }
}
