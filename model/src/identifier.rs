//! Content-addressed identifiers for protocol entities.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

type Blake2b256 = Blake2b<U32>;

/// A 32-byte identifier, computed as the Blake2b-256 hash of an entity's
/// canonical (bincode) encoding. Used for blocks, results, collections,
/// transactions, and node identities alike.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Identifier([u8; 32]);

impl Identifier {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Hash an entity's canonical encoding into its identifier.
    pub fn of<T: Serialize>(entity: &T) -> Self {
        let bytes = bincode::serialize(entity).expect("entity is always bincode-serializable");
        Self::from_data(&bytes)
    }

    /// Hash raw bytes into an identifier.
    pub fn from_data(data: &[u8]) -> Self {
        let mut hasher = Blake2b256::new();
        hasher.update(data);
        let digest = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);
        Self(out)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl FromStr for Identifier {
    type Err = IdentifierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = hex::decode(s).map_err(|_| IdentifierParseError(s.to_string()))?;
        let bytes: [u8; 32] = raw
            .try_into()
            .map_err(|_| IdentifierParseError(s.to_string()))?;
        Ok(Self(bytes))
    }
}

/// Returned when a hex string does not decode to exactly 32 bytes.
#[derive(Debug, thiserror::Error)]
#[error("invalid identifier hex string: {0}")]
pub struct IdentifierParseError(pub String);

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Identifies which chain a block belongs to. Derived from the root block
/// header at startup; every descendant block carries the same value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainId(String);

impl ChainId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_of_is_deterministic() {
        let a = Identifier::of(&("block", 42u64));
        let b = Identifier::of(&("block", 42u64));
        assert_eq!(a, b);
        assert!(!a.is_zero());
    }

    #[test]
    fn identifier_of_differs_by_content() {
        let a = Identifier::of(&1u64);
        let b = Identifier::of(&2u64);
        assert_ne!(a, b);
    }

    #[test]
    fn round_trips_through_hex() {
        let id = Identifier::from_data(b"meridian");
        let parsed: Identifier = id.to_string().parse().expect("valid hex");
        assert_eq!(id, parsed);
    }

    #[test]
    fn rejects_short_hex() {
        assert!("abcd".parse::<Identifier>().is_err());
        assert!("zz".repeat(32).parse::<Identifier>().is_err());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn any_identifier_round_trips_through_hex(
                bytes in proptest::array::uniform32(any::<u8>())
            ) {
                let id = Identifier::new(bytes);
                let parsed: Identifier = id.to_string().parse().unwrap();
                prop_assert_eq!(id, parsed);
            }
        }
    }
}
