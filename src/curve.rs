//! Curves supported by SLIP-10 and their derivation rules
//!
//! Every curve exposes the same capability set, [`Slip10Curve`]. Curves are split into two
//! families:
//! * Weierstrass curves (secp256k1, secp256r1) support both hardened and non-hardened
//!   derivation. Child keys are computed by adding a shift to the parent key, and the shift is
//!   resampled whenever it falls out of range. See [`Weierstrass`].
//! * ed25519 and curve25519 only support hardened derivation: child secret key is taken
//!   directly from the HMAC output. See [`Ed25519`] and [`Curve25519`].
//!
//! The derivation engine never names a concrete curve, it goes through [`CurveId::ops`].

use core::{fmt, str::FromStr};

use zeroize::Zeroizing;

use crate::{
    errors::{Error, InvalidInput},
    ChainCode, ChildIndex, NonHardenedIndex, PublicKeyBytes,
};

mod twisted;
mod weierstrass;

pub use self::{
    twisted::{Curve25519, Ed25519},
    weierstrass::Weierstrass,
};

/// Secret key bytes, wiped on drop
pub type SecretKeyBytes = Zeroizing<[u8; 32]>;

/// Seed must be 16-64 bytes long
const SEED_LEN: core::ops::RangeInclusive<usize> = 16..=64;

/// Identifier of a curve supported by SLIP-10
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "&'static str", try_from = "String")
)]
pub enum CurveId {
    /// Secp256k1 curve
    Secp256k1,
    /// Secp256r1 curve, also known as NIST P-256
    Secp256r1,
    /// Ed25519 curve
    Ed25519,
    /// Curve25519 (X25519 keys)
    Curve25519,
}

impl CurveId {
    /// All supported curves
    pub const ALL: [CurveId; 4] = [
        CurveId::Secp256k1,
        CurveId::Secp256r1,
        CurveId::Ed25519,
        CurveId::Curve25519,
    ];

    /// Returns implementation of the curve
    pub fn ops(self) -> &'static dyn Slip10Curve {
        match self {
            CurveId::Secp256k1 => &weierstrass::SECP256K1,
            CurveId::Secp256r1 => &weierstrass::SECP256R1,
            CurveId::Ed25519 => &Ed25519,
            CurveId::Curve25519 => &Curve25519,
        }
    }

    /// Whether non-hardened (and, hence, public) derivation is defined for the curve
    pub fn supports_non_hardened(self) -> bool {
        matches!(self, CurveId::Secp256k1 | CurveId::Secp256r1)
    }

    /// HMAC key used to derive the master key from the seed
    pub fn seed_tag(self) -> &'static [u8] {
        match self {
            CurveId::Secp256k1 => b"Bitcoin seed",
            CurveId::Secp256r1 => b"Nist256p1 seed",
            CurveId::Ed25519 => b"ed25519 seed",
            CurveId::Curve25519 => b"curve25519 seed",
        }
    }

    /// Canonical name
    pub fn as_str(self) -> &'static str {
        match self {
            CurveId::Secp256k1 => "secp256k1",
            CurveId::Secp256r1 => "secp256r1",
            CurveId::Ed25519 => "ed25519",
            CurveId::Curve25519 => "curve25519",
        }
    }
}

impl fmt::Display for CurveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurveId {
    type Err = InvalidInput;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "secp256k1" => Ok(CurveId::Secp256k1),
            "secp256r1" | "nist256p1" | "p256" | "p-256" => Ok(CurveId::Secp256r1),
            "ed25519" => Ok(CurveId::Ed25519),
            "curve25519" | "x25519" => Ok(CurveId::Curve25519),
            _ => Err(InvalidInput::UnknownCurve(s.to_owned())),
        }
    }
}

impl From<CurveId> for &'static str {
    fn from(curve: CurveId) -> Self {
        curve.as_str()
    }
}

impl TryFrom<String> for CurveId {
    type Error = InvalidInput;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Capability set of a curve supported by SLIP-10
///
/// All keys are passed in the form they're stored in a [Node](crate::Node): 32 bytes secret keys
/// and 33 bytes public keys.
pub trait Slip10Curve: Sync {
    /// Identifies the curve
    fn id(&self) -> CurveId;

    /// Derives master secret key and chain code from the seed
    ///
    /// Seed must be 16-64 bytes long, otherwise an error is returned
    fn generate_master(&self, seed: &[u8]) -> Result<(SecretKeyBytes, ChainCode), Error>;

    /// Derives child secret key and chain code from the parent secret key
    ///
    /// Returns [`Error::UnsupportedDerivation`] if the curve doesn't support non-hardened
    /// derivation and `child_index` is not hardened
    fn derive_private_child(
        &self,
        private_key: &[u8; 32],
        chain_code: &ChainCode,
        child_index: ChildIndex,
    ) -> Result<(SecretKeyBytes, ChainCode), Error>;

    /// Derives child public key and chain code from the parent public key
    ///
    /// Not defined by default: only Weierstrass curves support public derivation
    fn derive_public_child(
        &self,
        public_key: &PublicKeyBytes,
        chain_code: &ChainCode,
        child_index: NonHardenedIndex,
    ) -> Result<(PublicKeyBytes, ChainCode), Error> {
        let _ = (public_key, chain_code, child_index);
        Err(Error::UnsupportedDerivation { curve: self.id() })
    }

    /// Checks that bytes encode a secret key on the curve
    fn privkey_is_valid(&self, private_key: &[u8]) -> bool;

    /// Checks that bytes encode a public key on the curve
    fn pubkey_is_valid(&self, public_key: &[u8]) -> bool;

    /// Computes public key corresponding to the secret key
    fn privkey_to_pubkey(&self, private_key: &[u8; 32]) -> Result<PublicKeyBytes, InvalidInput>;
}

fn check_seed_len(seed: &[u8]) -> Result<(), InvalidInput> {
    if SEED_LEN.contains(&seed.len()) {
        Ok(())
    } else {
        Err(InvalidInput::SeedLength(seed.len()))
    }
}
