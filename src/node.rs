//! Nodes of the HD tree
//!
//! A [`Node`] is an extended key (a key plus its chain code) together with its position in the
//! tree. Nodes are immutable: every derivation returns a new node. Private key bytes are owned
//! by the node and wiped when it's dropped.

use core::{fmt, str::FromStr};

use zeroize::Zeroizing;

use crate::{
    curve::{CurveId, SecretKeyBytes},
    errors::{Error, InvalidInput, InvalidLength},
    fingerprint::Fingerprint,
    path::hardened_index_in_path,
    ChainCode, ChildIndex, PublicKeyBytes,
};

/// Selects version prefixes of serialized extended keys, doesn't affect derivation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "&'static str", try_from = "String")
)]
pub enum Network {
    /// Main network (`xprv`/`xpub`)
    #[default]
    Main,
    /// Test network (`tprv`/`tpub`)
    Test,
}

impl Network {
    /// Canonical name
    pub fn as_str(self) -> &'static str {
        match self {
            Network::Main => "main",
            Network::Test => "test",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = InvalidInput;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "main" | "mainnet" | "bitcoin" => Ok(Network::Main),
            "test" | "testnet" => Ok(Network::Test),
            _ => Err(InvalidInput::UnknownNetwork(s.to_owned())),
        }
    }
}

impl From<Network> for &'static str {
    fn from(network: Network) -> Self {
        network.as_str()
    }
}

impl TryFrom<String> for Network {
    type Error = InvalidInput;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Position of a node in the tree
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    /// Number of derivation steps from the root
    pub depth: u8,
    /// Index used to reach the node from its parent, hardened bit included
    pub index: u32,
    /// Fingerprint of the parent's public key
    pub parent_fingerprint: Fingerprint,
}

impl Position {
    /// Position of a root node
    pub const ROOT: Self = Self {
        depth: 0,
        index: 0,
        parent_fingerprint: Fingerprint::ZERO,
    };

    fn validate(self) -> Result<Self, InvalidInput> {
        if self.depth == 0 && (self.index != 0 || !self.parent_fingerprint.is_zero()) {
            return Err(InvalidInput::InconsistentRoot);
        }
        Ok(self)
    }
}

/// Vertex of the HD tree
///
/// Holds a chain code, a public key and, optionally, a private key. Node without a private key
/// (see [`Node::public_only`]) can only derive non-hardened children on Weierstrass curves.
///
/// With `serde` feature, the node is (de)serialized as a struct of raw parts. Deserialization
/// validates the keys exactly like [`Node::from_key_pair`] and [`Node::from_public_key`] do.
/// Serialized private node contains the private key, use [`Node::public_only`] to share a node.
#[derive(Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "NodeParts", try_from = "NodeParts")
)]
pub struct Node {
    chain_code: ChainCode,
    private_key: Option<SecretKeyBytes>,
    public_key: PublicKeyBytes,
    position: Position,
    network: Network,
    curve: CurveId,
}

impl Node {
    /// Derives the root node from the seed
    ///
    /// Seed must be 16-64 bytes long, otherwise an error is returned
    pub fn from_seed(seed: &[u8], network: Network, curve: CurveId) -> Result<Self, Error> {
        let ops = curve.ops();
        let (private_key, chain_code) = ops.generate_master(seed)?;
        let public_key = ops.privkey_to_pubkey(&private_key)?;
        tracing::trace!(%curve, %network, "derived master node");
        Ok(Self {
            chain_code,
            private_key: Some(private_key),
            public_key,
            position: Position::ROOT,
            network,
            curve,
        })
    }

    /// Constructs a node from a private key, public key is computed
    pub fn from_private_key(
        curve: CurveId,
        network: Network,
        position: Position,
        chain_code: ChainCode,
        private_key: &[u8],
    ) -> Result<Self, Error> {
        Ok(Self::from_private_parts(
            curve,
            network,
            position,
            chain_code,
            private_key,
        )?)
    }

    /// Constructs a node from a key pair
    ///
    /// Returns an error if the public key doesn't correspond to the private key
    pub fn from_key_pair(
        curve: CurveId,
        network: Network,
        position: Position,
        chain_code: ChainCode,
        private_key: &[u8],
        public_key: &[u8],
    ) -> Result<Self, Error> {
        let node = Self::from_private_parts(curve, network, position, chain_code, private_key)?;
        if node.public_key[..] != *public_key {
            return Err(InvalidInput::KeyPairMismatch.into());
        }
        Ok(node)
    }

    /// Constructs a public-only node
    pub fn from_public_key(
        curve: CurveId,
        network: Network,
        position: Position,
        chain_code: ChainCode,
        public_key: &[u8],
    ) -> Result<Self, Error> {
        Ok(Self::from_public_parts(
            curve, network, position, chain_code, public_key,
        )?)
    }

    pub(crate) fn from_private_parts(
        curve: CurveId,
        network: Network,
        position: Position,
        chain_code: ChainCode,
        private_key: &[u8],
    ) -> Result<Self, InvalidInput> {
        let position = position.validate()?;
        let ops = curve.ops();
        let private_key = secret_key_bytes(private_key)?;
        if !ops.privkey_is_valid(&private_key[..]) {
            return Err(InvalidInput::PrivateKey(curve));
        }
        let public_key = ops.privkey_to_pubkey(&private_key)?;
        Ok(Self {
            chain_code,
            private_key: Some(private_key),
            public_key,
            position,
            network,
            curve,
        })
    }

    pub(crate) fn from_public_parts(
        curve: CurveId,
        network: Network,
        position: Position,
        chain_code: ChainCode,
        public_key: &[u8],
    ) -> Result<Self, InvalidInput> {
        let position = position.validate()?;
        let public_key: PublicKeyBytes = public_key.try_into().map_err(|_| InvalidLength {
            expected: 33,
            actual: public_key.len(),
        })?;
        if !curve.ops().pubkey_is_valid(&public_key) {
            return Err(InvalidInput::PublicKey(curve));
        }
        Ok(Self {
            chain_code,
            private_key: None,
            public_key,
            position,
            network,
            curve,
        })
    }

    /// Derives a direct child
    ///
    /// Private derivation is used whenever the node holds a private key, public derivation
    /// otherwise. Returns an error if:
    /// * `child_index` is hardened and the node holds no private key
    /// * `child_index` is not hardened and the curve is ed25519 or curve25519
    /// * the node is at depth 255
    pub fn derive_child(&self, child_index: impl Into<ChildIndex>) -> Result<Self, Error> {
        let child_index = child_index.into();
        let depth = self
            .position
            .depth
            .checked_add(1)
            .ok_or(Error::DepthOverflow)?;
        let ops = self.curve.ops();

        let (private_key, public_key, chain_code) = match (&self.private_key, child_index) {
            (Some(private_key), _) => {
                let (child_sk, chain_code) =
                    ops.derive_private_child(private_key, &self.chain_code, child_index)?;
                let child_pk = ops.privkey_to_pubkey(&child_sk)?;
                (Some(child_sk), child_pk, chain_code)
            }
            (None, ChildIndex::Hardened(_)) => return Err(Error::PrivateDerivationRequired),
            (None, ChildIndex::NonHardened(i)) => {
                let (child_pk, chain_code) =
                    ops.derive_public_child(&self.public_key, &self.chain_code, i)?;
                (None, child_pk, chain_code)
            }
        };

        tracing::trace!(curve = %self.curve, depth, index = %child_index, "derived child node");
        Ok(Self {
            chain_code,
            private_key,
            public_key,
            position: Position {
                depth,
                index: child_index.into(),
                parent_fingerprint: self.fingerprint(),
            },
            network: self.network,
            curve: self.curve,
        })
    }

    /// Derives a descendant at the path
    ///
    /// Path is evaluated left to right. An empty path returns a copy of the node. The whole
    /// path is checked before derivation starts: on ed25519 and curve25519 any non-hardened step
    /// is an [`UnsupportedDerivation`](Error::UnsupportedDerivation) error, and on a public-only
    /// node any hardened step is a [`PrivateDerivationRequired`](Error::PrivateDerivationRequired)
    /// error.
    ///
    /// ### Example
    /// ```rust
    /// use hd_slip10::{CurveId, Network, Node};
    ///
    /// # let seed = b"16-64 bytes of high entropy".as_slice();
    /// let master = Node::from_seed(seed, Network::Main, CurveId::Secp256r1)?;
    /// let child = master.child_at_path([1 + hd_slip10::H, 10])?;
    /// assert_eq!(child.index(), 10);
    /// # Ok::<(), hd_slip10::Error>(())
    /// ```
    pub fn child_at_path<I>(&self, path: I) -> Result<Self, Error>
    where
        I: IntoIterator,
        I::Item: Into<ChildIndex>,
    {
        let path: Vec<ChildIndex> = path.into_iter().map(Into::into).collect();

        if !self.curve.supports_non_hardened() && path.iter().any(|i| !i.is_hardened()) {
            return Err(Error::UnsupportedDerivation { curve: self.curve });
        }
        if self.private_key.is_none() && hardened_index_in_path(&path) {
            return Err(Error::PrivateDerivationRequired);
        }

        let mut derived = self.clone();
        for child_index in path {
            derived = derived.derive_child(child_index)?;
        }
        Ok(derived)
    }

    /// Derives a descendant and returns its chain code and private key
    pub fn extended_privkey_at_path<I>(&self, path: I) -> Result<(ChainCode, SecretKeyBytes), Error>
    where
        I: IntoIterator,
        I::Item: Into<ChildIndex>,
    {
        let mut child = self.child_at_path(path)?;
        let private_key = child
            .private_key
            .take()
            .ok_or(Error::PrivateDerivationRequired)?;
        Ok((child.chain_code, private_key))
    }

    /// Derives a descendant and returns its chain code and public key
    pub fn extended_pubkey_at_path<I>(&self, path: I) -> Result<(ChainCode, PublicKeyBytes), Error>
    where
        I: IntoIterator,
        I::Item: Into<ChildIndex>,
    {
        let child = self.child_at_path(path)?;
        Ok((child.chain_code, child.public_key))
    }

    /// Lazily derives direct children at given indexes
    ///
    /// Each child is derived when the iterator is advanced, so a long batch can be stopped
    /// between any two children by simply dropping the iterator.
    ///
    /// ### Example
    /// Derive first 20 receiving keys of an account:
    /// ```rust
    /// use hd_slip10::{CurveId, Network, Node};
    ///
    /// # let seed = b"16-64 bytes of high entropy".as_slice();
    /// let path: hd_slip10::DerivationPath = "m/44'/0'/0'/0".parse()?;
    /// let account = Node::from_seed(seed, Network::Main, CurveId::Secp256k1)?
    ///     .child_at_path(&path)?
    ///     .public_only();
    /// let keys = account
    ///     .children(0..20u32)
    ///     .map(|child| child.map(|c| *c.public_key()))
    ///     .collect::<Result<Vec<_>, _>>()?;
    /// assert_eq!(keys.len(), 20);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn children<'a, I>(&'a self, indexes: I) -> impl Iterator<Item = Result<Self, Error>> + 'a
    where
        I: IntoIterator,
        I::Item: Into<ChildIndex>,
        I::IntoIter: 'a,
    {
        indexes.into_iter().map(|i| self.derive_child(i))
    }

    /// Returns a copy of the node without private key
    pub fn public_only(&self) -> Self {
        Self {
            chain_code: self.chain_code,
            private_key: None,
            public_key: self.public_key,
            position: self.position,
            network: self.network,
            curve: self.curve,
        }
    }

    /// Chain code
    pub fn chain_code(&self) -> &ChainCode {
        &self.chain_code
    }

    /// Private key, if the node holds it
    pub fn private_key(&self) -> Option<&[u8; 32]> {
        self.private_key.as_deref()
    }

    /// Compressed public key
    pub fn public_key(&self) -> &PublicKeyBytes {
        &self.public_key
    }

    /// Whether the node holds a private key
    pub fn is_private(&self) -> bool {
        self.private_key.is_some()
    }

    /// Depth in the tree, 0 for the root
    pub fn depth(&self) -> u8 {
        self.position.depth
    }

    /// Index used to reach the node from its parent, hardened bit included
    pub fn index(&self) -> u32 {
        self.position.index
    }

    /// Same as [`Node::index`], typed
    pub fn child_index(&self) -> ChildIndex {
        self.position.index.into()
    }

    /// Fingerprint of the parent's public key, zero for the root
    pub fn parent_fingerprint(&self) -> Fingerprint {
        self.position.parent_fingerprint
    }

    /// Position in the tree
    pub fn position(&self) -> Position {
        self.position
    }

    /// Network
    pub fn network(&self) -> Network {
        self.network
    }

    /// Curve
    pub fn curve(&self) -> CurveId {
        self.curve
    }

    /// Fingerprint of the node's public key
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of_public_key(&self.public_key)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("curve", &self.curve)
            .field("network", &self.network)
            .field("depth", &self.position.depth)
            .field("index", &self.position.index)
            .field("parent_fingerprint", &self.position.parent_fingerprint)
            .field("chain_code", &HexBytes(&self.chain_code))
            .field("public_key", &HexBytes(&self.public_key))
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct NodeParts {
    curve: CurveId,
    network: Network,
    depth: u8,
    index: u32,
    parent_fingerprint: [u8; 4],
    chain_code: ChainCode,
    public_key: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    private_key: Option<[u8; 32]>,
}

#[cfg(feature = "serde")]
impl Drop for NodeParts {
    fn drop(&mut self) {
        zeroize::Zeroize::zeroize(&mut self.private_key);
    }
}

#[cfg(feature = "serde")]
impl From<Node> for NodeParts {
    fn from(node: Node) -> Self {
        Self {
            curve: node.curve,
            network: node.network,
            depth: node.position.depth,
            index: node.position.index,
            parent_fingerprint: node.position.parent_fingerprint.to_bytes(),
            chain_code: node.chain_code,
            public_key: node.public_key.to_vec(),
            private_key: node.private_key.as_deref().copied(),
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<NodeParts> for Node {
    type Error = Error;
    fn try_from(parts: NodeParts) -> Result<Self, Self::Error> {
        let position = Position {
            depth: parts.depth,
            index: parts.index,
            parent_fingerprint: Fingerprint::from(parts.parent_fingerprint),
        };
        match &parts.private_key {
            Some(private_key) => Node::from_key_pair(
                parts.curve,
                parts.network,
                position,
                parts.chain_code,
                private_key,
                &parts.public_key,
            ),
            None => Node::from_public_key(
                parts.curve,
                parts.network,
                position,
                parts.chain_code,
                &parts.public_key,
            ),
        }
    }
}

struct HexBytes<'a>(&'a [u8]);

impl fmt::Debug for HexBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

fn secret_key_bytes(bytes: &[u8]) -> Result<SecretKeyBytes, InvalidInput> {
    if bytes.len() != 32 {
        return Err(InvalidLength {
            expected: 32,
            actual: bytes.len(),
        }
        .into());
    }
    let mut secret_key = Zeroizing::new([0u8; 32]);
    secret_key.copy_from_slice(bytes);
    Ok(secret_key)
}
