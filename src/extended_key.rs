//! Extended keys serialization
//!
//! Layout of a serialized extended key (78 bytes):
//!
//! | bytes | field |
//! |---|---|
//! | 4 | version, see the table below |
//! | 1 | depth |
//! | 4 | parent fingerprint |
//! | 4 | child index, big-endian |
//! | 32 | chain code |
//! | 33 | `0x00 ‖ private key` or compressed public key |
//!
//! | network | kind | version |
//! |---|---|---|
//! | main | private | `0488ADE4` (`xprv`) |
//! | main | public | `0488B21E` (`xpub`) |
//! | test | private | `04358394` (`tprv`) |
//! | test | public | `043587CF` (`tpub`) |
//!
//! Text form is Base58Check of these bytes. The encoding is only defined for secp256k1, keys on
//! other curves have to be exported as raw bytes.

use core::str::FromStr;

use zeroize::Zeroizing;

use crate::{
    curve::CurveId,
    errors::{ParsingError, SerializationError},
    fingerprint::Fingerprint,
    node::{Network, Node, Position},
    ChainCode,
};

/// Length of serialized extended key
pub const EXTENDED_KEY_LEN: usize = 78;

const MAIN_PRIVATE: [u8; 4] = [0x04, 0x88, 0xAD, 0xE4];
const MAIN_PUBLIC: [u8; 4] = [0x04, 0x88, 0xB2, 0x1E];
const TEST_PRIVATE: [u8; 4] = [0x04, 0x35, 0x83, 0x94];
const TEST_PUBLIC: [u8; 4] = [0x04, 0x35, 0x87, 0xCF];

/// Whether extended key carries private or public key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// `xprv`/`tprv`
    Private,
    /// `xpub`/`tpub`
    Public,
}

/// Version prefix for the network and key kind
pub fn version(network: Network, kind: KeyKind) -> [u8; 4] {
    match (network, kind) {
        (Network::Main, KeyKind::Private) => MAIN_PRIVATE,
        (Network::Main, KeyKind::Public) => MAIN_PUBLIC,
        (Network::Test, KeyKind::Private) => TEST_PRIVATE,
        (Network::Test, KeyKind::Public) => TEST_PUBLIC,
    }
}

fn parse_version(version: [u8; 4]) -> Option<(Network, KeyKind)> {
    match version {
        MAIN_PRIVATE => Some((Network::Main, KeyKind::Private)),
        MAIN_PUBLIC => Some((Network::Main, KeyKind::Public)),
        TEST_PRIVATE => Some((Network::Test, KeyKind::Private)),
        TEST_PUBLIC => Some((Network::Test, KeyKind::Public)),
        _ => None,
    }
}

impl Node {
    /// Serializes the node as 78 bytes extended key
    ///
    /// Returns an error if the node is not on secp256k1, or if `kind` is private and the node
    /// holds no private key.
    pub fn serialize(
        &self,
        kind: KeyKind,
    ) -> Result<Zeroizing<[u8; EXTENDED_KEY_LEN]>, SerializationError> {
        if self.curve() != CurveId::Secp256k1 {
            return Err(SerializationError::UnsupportedCurve(self.curve()));
        }

        let mut out = Zeroizing::new([0u8; EXTENDED_KEY_LEN]);
        out[0..4].copy_from_slice(&version(self.network(), kind));
        out[4] = self.depth();
        out[5..9].copy_from_slice(self.parent_fingerprint().as_ref());
        out[9..13].copy_from_slice(&self.index().to_be_bytes());
        out[13..45].copy_from_slice(self.chain_code());
        match kind {
            KeyKind::Private => {
                let private_key = self
                    .private_key()
                    .ok_or(SerializationError::MissingPrivateKey)?;
                out[45] = 0x00;
                out[46..78].copy_from_slice(private_key);
            }
            KeyKind::Public => out[45..78].copy_from_slice(self.public_key()),
        }
        Ok(out)
    }

    /// Serializes the node as Base58Check extended key, e.g. `xprv...` or `tpub...`
    pub fn to_base58(&self, kind: KeyKind) -> Result<Zeroizing<String>, SerializationError> {
        let bytes = self.serialize(kind)?;
        Ok(Zeroizing::new(
            bs58::encode(&bytes[..]).with_check().into_string(),
        ))
    }

    /// Parses 78 bytes extended key
    ///
    /// Resulting node is always on secp256k1.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, ParsingError> {
        let bytes: &[u8; EXTENDED_KEY_LEN] = bytes
            .try_into()
            .map_err(|_| ParsingError::Length(bytes.len()))?;

        let mut version = [0u8; 4];
        version.copy_from_slice(&bytes[0..4]);
        let (network, kind) = parse_version(version).ok_or(ParsingError::UnknownVersion(version))?;

        let mut parent_fingerprint = [0u8; 4];
        parent_fingerprint.copy_from_slice(&bytes[5..9]);
        let mut index = [0u8; 4];
        index.copy_from_slice(&bytes[9..13]);
        let position = Position {
            depth: bytes[4],
            index: u32::from_be_bytes(index),
            parent_fingerprint: Fingerprint::from(parent_fingerprint),
        };
        let mut chain_code: ChainCode = [0u8; 32];
        chain_code.copy_from_slice(&bytes[13..45]);

        let key = &bytes[45..78];
        let node = match kind {
            KeyKind::Private => {
                if key[0] != 0x00 {
                    return Err(ParsingError::NonZeroPadding(key[0]));
                }
                Node::from_private_parts(
                    CurveId::Secp256k1,
                    network,
                    position,
                    chain_code,
                    &key[1..],
                )
            }
            KeyKind::Public => {
                Node::from_public_parts(CurveId::Secp256k1, network, position, chain_code, key)
            }
        }
        .map_err(ParsingError::InvalidKey)?;

        tracing::debug!(
            %network,
            ?kind,
            depth = node.depth(),
            index = node.index(),
            "parsed extended key"
        );
        Ok(node)
    }

    /// Parses Base58Check extended key, e.g. `xprv...` or `tpub...`
    pub fn from_base58(s: &str) -> Result<Self, ParsingError> {
        let bytes = Zeroizing::new(bs58::decode(s).with_check(None).into_vec()?);
        Self::deserialize(&bytes)
    }
}

impl FromStr for Node {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::{Error, InvalidInput},
        H,
    };

    const SEED: &[u8] = b"do not use this seed in prod :)";

    #[test]
    fn version_table() {
        for network in [Network::Main, Network::Test] {
            for kind in [KeyKind::Private, KeyKind::Public] {
                assert_eq!(parse_version(version(network, kind)), Some((network, kind)));
            }
        }
        assert_eq!(parse_version([0, 0, 0, 0]), None);
    }

    #[test]
    fn only_secp256k1_is_serializable() {
        for curve in [CurveId::Secp256r1, CurveId::Ed25519, CurveId::Curve25519] {
            let node = Node::from_seed(SEED, Network::Main, curve).unwrap();
            assert_eq!(
                node.serialize(KeyKind::Public).unwrap_err(),
                SerializationError::UnsupportedCurve(curve)
            );
        }
    }

    #[test]
    fn private_serialization_requires_private_key() {
        let node = Node::from_seed(SEED, Network::Main, CurveId::Secp256k1)
            .unwrap()
            .public_only();
        assert_eq!(
            node.serialize(KeyKind::Private).unwrap_err(),
            SerializationError::MissingPrivateKey
        );
    }

    #[test]
    fn layout() {
        let root = Node::from_seed(SEED, Network::Test, CurveId::Secp256k1).unwrap();
        let child = root.derive_child(7 + H).unwrap();

        let bytes = child.serialize(KeyKind::Private).unwrap();
        assert_eq!(bytes[0..4], TEST_PRIVATE);
        assert_eq!(bytes[4], 1);
        assert_eq!(bytes[5..9], root.fingerprint().to_bytes());
        assert_eq!(bytes[9..13], (7 + H).to_be_bytes());
        assert_eq!(&bytes[13..45], child.chain_code());
        assert_eq!(bytes[45], 0);
        assert_eq!(&bytes[46..], child.private_key().unwrap());

        let bytes = child.serialize(KeyKind::Public).unwrap();
        assert_eq!(bytes[0..4], TEST_PUBLIC);
        assert_eq!(&bytes[45..], child.public_key());
    }

    #[test]
    fn round_trip_through_bytes() {
        let node = Node::from_seed(SEED, Network::Main, CurveId::Secp256k1)
            .unwrap()
            .child_at_path([H, 1, 2 + H])
            .unwrap();

        let restored = Node::deserialize(&node.serialize(KeyKind::Private).unwrap()[..]).unwrap();
        assert_eq!(restored.private_key(), node.private_key());
        assert_eq!(restored.public_key(), node.public_key());
        assert_eq!(restored.position(), node.position());

        let restored = Node::deserialize(&node.serialize(KeyKind::Public).unwrap()[..]).unwrap();
        assert!(restored.private_key().is_none());
        assert_eq!(restored.public_key(), node.public_key());
    }

    #[test]
    fn malformed_bytes() {
        let node = Node::from_seed(SEED, Network::Main, CurveId::Secp256k1).unwrap();
        let bytes = node.serialize(KeyKind::Private).unwrap();

        assert_eq!(
            Node::deserialize(&bytes[..77]).unwrap_err(),
            ParsingError::Length(77)
        );

        let mut unknown_version = *bytes;
        unknown_version[0..4].copy_from_slice(&[0x04, 0x9d, 0x78, 0x78]);
        assert_eq!(
            Node::deserialize(&unknown_version).unwrap_err(),
            ParsingError::UnknownVersion([0x04, 0x9d, 0x78, 0x78])
        );

        let mut bad_padding = *bytes;
        bad_padding[45] = 0x01;
        assert_eq!(
            Node::deserialize(&bad_padding).unwrap_err(),
            ParsingError::NonZeroPadding(0x01)
        );

        let mut zero_key = *bytes;
        zero_key[46..].fill(0);
        assert_eq!(
            Node::deserialize(&zero_key).unwrap_err(),
            ParsingError::InvalidKey(InvalidInput::PrivateKey(CurveId::Secp256k1))
        );

        let mut public = *node.serialize(KeyKind::Public).unwrap();
        public[45] = 0x05;
        assert_eq!(
            Node::deserialize(&public).unwrap_err(),
            ParsingError::InvalidKey(InvalidInput::PublicKey(CurveId::Secp256k1))
        );

        let mut inconsistent_root = *bytes;
        inconsistent_root[12] = 1;
        assert_eq!(
            Node::deserialize(&inconsistent_root).unwrap_err(),
            ParsingError::InvalidKey(InvalidInput::InconsistentRoot)
        );
    }

    #[test]
    fn parsing_error_converts_into_crate_error() {
        let err: Error = "xprv".parse::<Node>().unwrap_err().into();
        assert!(matches!(err, Error::Parsing(_)));
    }
}
