//! SLIP-10: Deterministic key generation for multiple curves
//!
//! [SLIP10][slip10-spec] is a specification for implementing HD wallets. It aims at supporting many
//! curves while being compatible with [BIP32][bip32-spec].
//!
//! Weierstrass arithmetic is provided by [generic-ec](generic_ec), ed25519 and curve25519 public
//! keys are computed with the dalek libraries.
//!
//! ### Curves support
//! All curves defined by SLIP10 are supported:
//! * secp256k1 and secp256r1 support both hardened and non-hardened derivation, private and public
//! * ed25519 and curve25519 support only hardened derivation, as required by the standard
//!
//! Extended keys (`xprv`/`xpub` strings) are defined only for secp256k1, see [`Node::to_base58`].
//! Keys on other curves are accessed as raw bytes.
//!
//! ### Features
//! * `serde`: (de)serialize [`CurveId`], [`Network`], [`DerivationPath`] as strings and child
//!   indexes as integers
//!
//! ### Examples
//!
//! Derive a master key from the seed, and then derive a child key m/1<sub>H</sub>/10:
//! ```rust
//! use hd_slip10::{CurveId, DerivationPath, Network, Node};
//!
//! let seed = b"16-64 bytes of high entropy".as_slice();
//! let master = Node::from_seed(seed, Network::Main, CurveId::Secp256k1)?;
//!
//! let path: DerivationPath = "m/1'/10".parse()?;
//! let child = master.child_at_path(&path)?;
//! assert_eq!(child.depth(), 2);
//!
//! let xpub = child.to_base58(hd_slip10::KeyKind::Public)?;
//! assert!(xpub.starts_with("xpub"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! [slip10-spec]: https://github.com/satoshilabs/slips/blob/master/slip-0010.md
//! [bip32-spec]: https://github.com/bitcoin/bips/blob/master/bip-0032.mediawiki

#![forbid(missing_docs, unsafe_code)]

use core::{fmt, ops};

use generic_array::{
    typenum::{U32, U64},
    GenericArray,
};

pub mod curve;
pub mod errors;
pub mod extended_key;
pub mod fingerprint;
pub mod node;
pub mod path;

pub use self::{
    curve::{CurveId, Slip10Curve},
    errors::Error,
    extended_key::KeyKind,
    fingerprint::{fingerprint, Fingerprint},
    node::{Network, Node, Position},
    path::{hardened_index_in_path, DerivationPath},
};

type HmacSha512 = hmac::Hmac<sha2::Sha512>;

/// Beginning of hardened child indexes
///
/// $H = 2^{31}$ defines the range of hardened indexes. All indexes $i$ such that $H \le i$ are hardened.
///
/// ## Example
/// Derive a child key with a path m/1<sub>H</sub>
/// ```rust
/// use hd_slip10::{CurveId, Network, Node};
///
/// # let seed = b"do not use this seed in prod :)".as_slice();
/// let master = Node::from_seed(seed, Network::Main, CurveId::Ed25519)?;
/// let hardened_child = master.derive_child(1 + hd_slip10::H)?;
/// assert!(hardened_child.child_index().is_hardened());
/// #
/// # Ok::<(), hd_slip10::Error>(())
/// ```
pub const H: u32 = 1 << 31;

/// Chain code of extended key as defined in SLIP-10
pub type ChainCode = [u8; 32];

/// Compressed public key: `0x02`/`0x03` prefix for Weierstrass curves, `0x00` for ed25519/curve25519
pub type PublicKeyBytes = [u8; 33];

/// Child index, whether hardened or not
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(into = "u32"))]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(from = "u32"))]
pub enum ChildIndex {
    /// Hardened index
    Hardened(HardenedIndex),
    /// Non-hardened index
    NonHardened(NonHardenedIndex),
}

/// Child index in range $2^{31} \le i < 2^{32}$ corresponding to a hardened wallet
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(into = "u32"))]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(try_from = "u32"))]
pub struct HardenedIndex(u32);

/// Child index in range $0 \le i < 2^{31}$ corresponding to a non-hardened wallet
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(into = "u32"))]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(try_from = "u32"))]
pub struct NonHardenedIndex(u32);

impl HardenedIndex {
    /// The smallest possible value of hardened index. Equals to $2^{31}$
    pub const MIN: Self = Self(H);
    /// The largest possible value of hardened index. Equals to $2^{32} - 1$
    pub const MAX: Self = Self(u32::MAX);

    /// Hardened index $H + i$ for $0 \le i < 2^{31}$
    pub fn from_offset(i: u32) -> Result<Self, errors::OutOfRange> {
        match i {
            H.. => Err(errors::OutOfRange),
            _ => Ok(Self(i + H)),
        }
    }

    /// Index without the hardened bit
    pub fn offset(&self) -> u32 {
        self.0 - H
    }
}
impl NonHardenedIndex {
    /// The smallest possible value of non-hardened index. Equals to $0$
    pub const MIN: Self = Self(0);
    /// The largest possible value of non-hardened index. Equals to $2^{31} - 1$
    pub const MAX: Self = Self(H - 1);
}
impl ChildIndex {
    /// Hardened index $H + i$, fails if $i \ge 2^{31}$
    pub fn hardened(i: u32) -> Result<Self, errors::OutOfRange> {
        HardenedIndex::from_offset(i).map(Self::Hardened)
    }

    /// Non-hardened index $i$, fails if $i \ge 2^{31}$
    pub fn normal(i: u32) -> Result<Self, errors::OutOfRange> {
        NonHardenedIndex::try_from(i).map(Self::NonHardened)
    }

    /// Whether the top bit is set
    pub fn is_hardened(&self) -> bool {
        matches!(self, Self::Hardened(_))
    }
}
impl ops::Deref for HardenedIndex {
    type Target = u32;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl ops::Deref for NonHardenedIndex {
    type Target = u32;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl ops::Deref for ChildIndex {
    type Target = u32;
    fn deref(&self) -> &Self::Target {
        match self {
            Self::Hardened(i) => i,
            Self::NonHardened(i) => i,
        }
    }
}
impl From<u32> for ChildIndex {
    fn from(value: u32) -> Self {
        match value {
            H.. => Self::Hardened(HardenedIndex(value)),
            _ => Self::NonHardened(NonHardenedIndex(value)),
        }
    }
}
impl From<&u32> for ChildIndex {
    fn from(value: &u32) -> Self {
        Self::from(*value)
    }
}
impl From<&ChildIndex> for ChildIndex {
    fn from(value: &ChildIndex) -> Self {
        *value
    }
}
impl From<HardenedIndex> for ChildIndex {
    fn from(value: HardenedIndex) -> Self {
        Self::Hardened(value)
    }
}
impl From<NonHardenedIndex> for ChildIndex {
    fn from(value: NonHardenedIndex) -> Self {
        Self::NonHardened(value)
    }
}
impl TryFrom<u32> for HardenedIndex {
    type Error = errors::OutOfRange;
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match ChildIndex::from(value) {
            ChildIndex::Hardened(v) => Ok(v),
            _ => Err(errors::OutOfRange),
        }
    }
}
impl TryFrom<u32> for NonHardenedIndex {
    type Error = errors::OutOfRange;
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match ChildIndex::from(value) {
            ChildIndex::NonHardened(v) => Ok(v),
            _ => Err(errors::OutOfRange),
        }
    }
}
impl From<ChildIndex> for u32 {
    fn from(value: ChildIndex) -> Self {
        match value {
            ChildIndex::Hardened(v) => v.0,
            ChildIndex::NonHardened(v) => v.0,
        }
    }
}
impl From<HardenedIndex> for u32 {
    fn from(value: HardenedIndex) -> Self {
        value.0
    }
}
impl From<NonHardenedIndex> for u32 {
    fn from(value: NonHardenedIndex) -> Self {
        value.0
    }
}
impl core::str::FromStr for ChildIndex {
    type Err = core::num::ParseIntError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u32>().map(Into::into)
    }
}
impl core::str::FromStr for HardenedIndex {
    type Err = errors::ParseChildIndexError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let index = s
            .parse::<u32>()
            .map_err(errors::ParseChildIndexError::ParseInt)?;
        HardenedIndex::try_from(index).map_err(errors::ParseChildIndexError::IndexNotInRange)
    }
}
impl core::str::FromStr for NonHardenedIndex {
    type Err = errors::ParseChildIndexError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let index = s
            .parse::<u32>()
            .map_err(errors::ParseChildIndexError::ParseInt)?;
        NonHardenedIndex::try_from(index).map_err(errors::ParseChildIndexError::IndexNotInRange)
    }
}

/// Formats as a path segment: `7` or `7'`
impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hardened(i) => write!(f, "{}'", i.offset()),
            Self::NonHardened(i) => write!(f, "{}", i.0),
        }
    }
}

/// Splits array `I` of 64 bytes into two arrays `I_L = I[..32]` and `I_R = I[32..]`
fn split_into_two_halves(
    i: &GenericArray<u8, U64>,
) -> (&GenericArray<u8, U32>, &GenericArray<u8, U32>) {
    generic_array::sequence::Split::split(i)
}
