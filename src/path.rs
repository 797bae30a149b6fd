//! Derivation paths
//!
//! Textual form follows the BIP32 convention `m(/[0-9]+['hH]?)*`, e.g. `m/44'/0'/0'/0/0` or
//! `m/0h/1/2h/2`. Each segment is a decimal number below $2^{31}$, a trailing `'`, `h` or `H`
//! marks it hardened. A path is a sequence of [`ChildIndex`] that can be passed to
//! [`Node::child_at_path`](crate::Node::child_at_path).

use core::{fmt, str::FromStr};

use crate::{errors::PathSyntaxError, ChildIndex, H};

/// Sequence of child indexes leading from a node to its descendant
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "String", try_from = "String")
)]
pub struct DerivationPath(Vec<ChildIndex>);

impl DerivationPath {
    /// Empty path `m`
    pub fn master() -> Self {
        Self(Vec::new())
    }

    /// Iterates over child indexes
    pub fn iter(&self) -> core::iter::Copied<core::slice::Iter<'_, ChildIndex>> {
        self.0.iter().copied()
    }

    /// Number of derivation steps
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the path is `m`
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Child indexes
    pub fn as_slice(&self) -> &[ChildIndex] {
        &self.0
    }

    /// Appends a child index
    pub fn push(&mut self, child_index: impl Into<ChildIndex>) {
        self.0.push(child_index.into())
    }

    /// Returns the path extended by one child index
    pub fn child(&self, child_index: impl Into<ChildIndex>) -> Self {
        let mut path = self.clone();
        path.push(child_index);
        path
    }

    /// Whether any step is hardened
    pub fn has_hardened(&self) -> bool {
        hardened_index_in_path(self)
    }
}

/// Returns `true` iff any child index in the path has the top bit set
pub fn hardened_index_in_path<I>(path: I) -> bool
where
    I: IntoIterator,
    I::Item: Into<ChildIndex>,
{
    path.into_iter().any(|i| i.into().is_hardened())
}

impl FromStr for DerivationPath {
    type Err = PathSyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = s.split('/');
        if segments.next() != Some("m") {
            return Err(PathSyntaxError::MissingRoot);
        }
        segments
            .enumerate()
            .map(|(position, segment)| parse_segment(position, segment))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

fn parse_segment(position: usize, segment: &str) -> Result<ChildIndex, PathSyntaxError> {
    if segment.is_empty() {
        return Err(PathSyntaxError::EmptySegment(position));
    }
    let (digits, hardened) = match segment.strip_suffix(['\'', 'h', 'H']) {
        Some(digits) => (digits, true),
        None => (segment, false),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PathSyntaxError::InvalidSegment {
            position,
            segment: segment.to_owned(),
        });
    }

    // only overflow can fail here, all characters are digits
    let index = digits.parse::<u64>().unwrap_or(u64::MAX);
    let out_of_range = PathSyntaxError::IndexOutOfRange { position, index };
    let index = u32::try_from(index)
        .ok()
        .filter(|i| *i < H)
        .ok_or(out_of_range)?;

    Ok(if hardened {
        ChildIndex::from(index + H)
    } else {
        ChildIndex::from(index)
    })
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for child_index in &self.0 {
            write!(f, "/{child_index}")?;
        }
        Ok(())
    }
}

impl From<Vec<ChildIndex>> for DerivationPath {
    fn from(path: Vec<ChildIndex>) -> Self {
        Self(path)
    }
}

impl From<&[u32]> for DerivationPath {
    fn from(path: &[u32]) -> Self {
        path.iter().collect()
    }
}

impl<I: Into<ChildIndex>> FromIterator<I> for DerivationPath {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a DerivationPath {
    type Item = ChildIndex;
    type IntoIter = core::iter::Copied<core::slice::Iter<'a, ChildIndex>>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for DerivationPath {
    type Item = ChildIndex;
    type IntoIter = std::vec::IntoIter<ChildIndex>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl AsRef<[ChildIndex]> for DerivationPath {
    fn as_ref(&self) -> &[ChildIndex] {
        &self.0
    }
}

impl From<DerivationPath> for String {
    fn from(path: DerivationPath) -> Self {
        path.to_string()
    }
}

impl TryFrom<String> for DerivationPath {
    type Error = PathSyntaxError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
