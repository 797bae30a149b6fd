use core::marker::PhantomData;

use generic_ec::{Curve, Point, Scalar, SecretScalar};
use hmac::Mac as _;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, Zeroizing};

use super::{check_seed_len, CurveId, SecretKeyBytes, Slip10Curve};
use crate::{
    errors::{Error, InvalidInput},
    split_into_two_halves, ChainCode, ChildIndex, HmacSha512, NonHardenedIndex, PublicKeyBytes,
};

pub(super) static SECP256K1: Weierstrass<generic_ec::curves::Secp256k1> =
    Weierstrass::new(CurveId::Secp256k1);
pub(super) static SECP256R1: Weierstrass<generic_ec::curves::Secp256r1> =
    Weierstrass::new(CurveId::Secp256r1);

/// SLIP10 derivation on a short Weierstrass curve
///
/// Child keys are obtained by adding a shift $I_L$ to the parent key. Whenever $I_L$ is not a
/// valid scalar or the child key is zero, the shift is resampled from
/// `HMAC-SHA512(chain_code, 0x01 || I_R || index)`, exactly as required by SLIP10.
///
/// ## Constraints
/// Must be used with curves which operate on 32 bytes scalars and 33 bytes compressed points.
pub struct Weierstrass<E> {
    id: CurveId,
    _curve: PhantomData<fn() -> E>,
}

impl<E: Curve> Weierstrass<E> {
    const fn new(id: CurveId) -> Self {
        Self {
            id,
            _curve: PhantomData,
        }
    }

    fn secret_scalar(&self, bytes: &[u8]) -> Result<SecretScalar<E>, InvalidInput> {
        let mut scalar =
            Scalar::<E>::from_be_bytes(bytes).map_err(|_| InvalidInput::PrivateKey(self.id))?;
        let is_zero = bool::from(scalar.ct_eq(&Scalar::zero()));
        let scalar = SecretScalar::new(&mut scalar);
        if is_zero {
            return Err(InvalidInput::PrivateKey(self.id));
        }
        Ok(scalar)
    }

    /// Parses SEC1 compressed point, `0x02`/`0x03` prefix only
    fn point(&self, bytes: &[u8]) -> Result<Point<E>, InvalidInput> {
        if bytes.len() != 33 || !matches!(bytes[0], 0x02 | 0x03) {
            return Err(InvalidInput::PublicKey(self.id));
        }
        match Point::<E>::from_bytes(bytes) {
            Ok(point) if !point.is_zero() && point.to_bytes(true)[..] == *bytes => Ok(point),
            _ => Err(InvalidInput::PublicKey(self.id)),
        }
    }

    /// Applies shifts `I_L` until `apply` accepts one, returns its output and the chain code `I_R`
    fn resample_until<T>(
        &self,
        hmac: &HmacSha512,
        child_index: u32,
        mut i: hmac::digest::Output<HmacSha512>,
        mut apply: impl FnMut(Scalar<E>) -> Option<T>,
    ) -> (T, ChainCode) {
        loop {
            let (i_left, i_right) = split_into_two_halves(&i);

            if let Ok(shift) = Scalar::<E>::from_be_bytes(i_left) {
                if let Some(child) = apply(shift) {
                    let chain_code: ChainCode = (*i_right).into();
                    i.as_mut_slice().zeroize();
                    return (child, chain_code);
                }
            }

            tracing::debug!(curve = %self.id, child_index, "child key is undefined, resampling shift");
            i = hmac
                .clone()
                .chain_update([0x01])
                .chain_update(i_right)
                .chain_update(child_index.to_be_bytes())
                .finalize()
                .into_bytes()
        }
    }
}

impl<E: Curve> Slip10Curve for Weierstrass<E> {
    fn id(&self) -> CurveId {
        self.id
    }

    fn generate_master(&self, seed: &[u8]) -> Result<(SecretKeyBytes, ChainCode), Error> {
        check_seed_len(seed)?;

        let hmac = HmacSha512::new_from_slice(self.id.seed_tag())
            .expect("this never fails: hmac can handle keys of any size");
        let mut i = hmac.clone().chain_update(seed).finalize().into_bytes();

        let mut attempt = 0u32;
        loop {
            let (i_left, i_right) = split_into_two_halves(&i);

            if let Ok(mut sk) = Scalar::<E>::from_be_bytes(i_left) {
                if !bool::from(sk.ct_eq(&Scalar::zero())) {
                    let sk = SecretScalar::new(&mut sk);
                    let chain_code: ChainCode = (*i_right).into();
                    i.as_mut_slice().zeroize();
                    return Ok((encode_scalar(sk.as_ref()), chain_code));
                }
            }

            attempt += 1;
            tracing::debug!(curve = %self.id, attempt, "master key is out of range, resampling");
            i = hmac.clone().chain_update(&i[..]).finalize().into_bytes()
        }
    }

    fn derive_private_child(
        &self,
        private_key: &[u8; 32],
        chain_code: &ChainCode,
        child_index: ChildIndex,
    ) -> Result<(SecretKeyBytes, ChainCode), Error> {
        let parent = self.secret_scalar(private_key)?;

        let hmac = HmacSha512::new_from_slice(chain_code)
            .expect("this never fails: hmac can handle keys of any size");
        let i = match child_index {
            ChildIndex::Hardened(_) => hmac
                .clone()
                .chain_update([0x00])
                .chain_update(private_key)
                .chain_update(child_index.to_be_bytes())
                .finalize()
                .into_bytes(),
            ChildIndex::NonHardened(_) => {
                let parent_public_key = Point::generator() * &parent;
                hmac.clone()
                    .chain_update(&parent_public_key.to_bytes(true))
                    .chain_update(child_index.to_be_bytes())
                    .finalize()
                    .into_bytes()
            }
        };

        let (child, chain_code) = self.resample_until(&hmac, *child_index, i, |shift| {
            let mut child = &parent + shift;
            let is_zero = bool::from(child.ct_eq(&Scalar::zero()));
            let child = SecretScalar::new(&mut child);
            (!is_zero).then_some(child)
        });
        Ok((encode_scalar(child.as_ref()), chain_code))
    }

    fn derive_public_child(
        &self,
        public_key: &PublicKeyBytes,
        chain_code: &ChainCode,
        child_index: NonHardenedIndex,
    ) -> Result<(PublicKeyBytes, ChainCode), Error> {
        let parent = self.point(public_key)?;

        let hmac = HmacSha512::new_from_slice(chain_code)
            .expect("this never fails: hmac can handle keys of any size");
        let i = hmac
            .clone()
            .chain_update(&parent.to_bytes(true))
            .chain_update(child_index.to_be_bytes())
            .finalize()
            .into_bytes();

        let (child, chain_code) = self.resample_until(&hmac, *child_index, i, |shift| {
            let child = parent + Point::generator() * shift;
            (!child.is_zero()).then_some(child)
        });
        Ok((encode_point(&child), chain_code))
    }

    fn privkey_is_valid(&self, private_key: &[u8]) -> bool {
        private_key.len() == 32 && self.secret_scalar(private_key).is_ok()
    }

    fn pubkey_is_valid(&self, public_key: &[u8]) -> bool {
        self.point(public_key).is_ok()
    }

    fn privkey_to_pubkey(&self, private_key: &[u8; 32]) -> Result<PublicKeyBytes, InvalidInput> {
        let sk = self.secret_scalar(private_key)?;
        Ok(encode_point(&(Point::generator() * &sk)))
    }
}

fn encode_scalar<E: Curve>(scalar: &Scalar<E>) -> SecretKeyBytes {
    let mut bytes = Zeroizing::new([0u8; 32]);
    let mut encoded = scalar.to_be_bytes();
    bytes.copy_from_slice(&encoded[..]);
    encoded.as_mut().zeroize();
    bytes
}

fn encode_point<E: Curve>(point: &Point<E>) -> PublicKeyBytes {
    let mut bytes = [0u8; 33];
    bytes.copy_from_slice(&point.to_bytes(true)[..]);
    bytes
}
