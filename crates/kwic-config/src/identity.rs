//! Stable configuration identity.
//!
//! Results are grouped by a hash of every matching-relevant field of a
//! [`KeywordConfig`], not by the keyword text. Two configurations that share
//! a word but differ in any setting therefore aggregate separately, and the
//! identity survives reordering of the keywords file.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};
use siphasher::sip::SipHasher24;

use crate::KeywordConfig;

/// Identity schema version. Bump when the hashed field set changes.
pub const IDENTITY_VERSION: u32 = 1;

/// Stable identity of a keyword configuration.
///
/// Displayed and serialized as a 16 digit hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConfigId(u64);

impl ConfigId {
    /// Returns the raw 64-bit hash value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl Serialize for ConfigId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Computes the identity hash for a configuration.
pub(crate) fn compute_id(config: &KeywordConfig) -> ConfigId {
    let mut hasher = SipHasher24::new();
    IDENTITY_VERSION.hash(&mut hasher);
    config.hash(&mut hasher);
    ConfigId(hasher.finish())
}
