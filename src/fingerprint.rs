//! Public key fingerprints
//!
//! A fingerprint is the first 4 bytes of `RIPEMD160(SHA256(public_key))`. It identifies the parent
//! of a node in serialized extended keys and is not a security boundary: it's only ever computed
//! over public keys, so the hash implementations need not be constant time.

use core::fmt;

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Parent identifier embedded in extended keys
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 4]);

impl Fingerprint {
    /// Fingerprint of the root's parent
    pub const ZERO: Self = Self([0; 4]);

    /// Computes fingerprint of serialized public key
    ///
    /// Input is the 33 bytes public key exactly as stored in the [Node](crate::Node), including
    /// the `0x00` prefix for ed25519 and curve25519 keys.
    pub fn of_public_key(public_key: &[u8]) -> Self {
        let id = hash160(public_key);
        let mut fingerprint = [0u8; 4];
        fingerprint.copy_from_slice(&id[..4]);
        Self(fingerprint)
    }

    /// Raw bytes
    pub fn to_bytes(self) -> [u8; 4] {
        self.0
    }

    /// Whether all bytes are zero
    pub fn is_zero(&self) -> bool {
        self.0 == [0; 4]
    }
}

impl From<[u8; 4]> for Fingerprint {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl From<Fingerprint> for [u8; 4] {
    fn from(fingerprint: Fingerprint) -> Self {
        fingerprint.0
    }
}

impl AsRef<[u8]> for Fingerprint {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({self})")
    }
}

/// Computes fingerprint of serialized public key, see [`Fingerprint::of_public_key`]
pub fn fingerprint(public_key: &[u8]) -> Fingerprint {
    Fingerprint::of_public_key(public_key)
}

/// `RIPEMD160(SHA256(data))`
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let sha = Sha256::digest(data);
    Ripemd160::digest(sha).into()
}
