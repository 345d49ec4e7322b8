use std::fmt;

use bc_crypto::memzero;
use bc_rand::RandomNumberGenerator;

use crate::{
    Quantity, Result,
    hazmat::{ct_eq, xor},
};

/// One XOR component of a secret.
///
/// A share on its own carries no information about the secret it was split
/// from. Its bytes are wiped when it is dropped, comparison runs in constant
/// time with respect to the contents, and `Debug` output never shows them.
#[derive(Clone, Default)]
pub struct Share(Vec<u8>);

impl Share {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self(data.into())
    }

    /// Draw a uniformly random share of `len` bytes.
    pub fn random(rng: &mut impl RandomNumberGenerator, len: usize) -> Self {
        Self(crate::hazmat::random_bytes(rng, len))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.clone()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Bytewise XOR with another share of the same length.
    pub fn xor(&self, other: &Share) -> Result<Share> {
        Ok(Share(xor(&self.0, &other.0)?))
    }

    /// Split this share into `share_count` further shares.
    ///
    /// This is the same operation as [`crate::split`] applied to the share's
    /// bytes, used when a party re-shares its own share among sub-parties.
    pub fn split(
        &self,
        share_count: usize,
        rng: &mut impl RandomNumberGenerator,
    ) -> Result<Quantity> {
        crate::split(&self.0, share_count, rng)
    }

    pub fn from_hex(text: impl AsRef<[u8]>) -> Result<Self> {
        Ok(Self(hex::decode(text)?))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl Drop for Share {
    fn drop(&mut self) {
        memzero(&mut self.0);
    }
}

impl PartialEq for Share {
    fn eq(&self, other: &Self) -> bool {
        ct_eq(&self.0, &other.0)
    }
}

impl Eq for Share {}

impl fmt::Debug for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Share")
            .field("len", &self.0.len())
            .finish_non_exhaustive()
    }
}

impl AsRef<[u8]> for Share {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Share {
    fn from(data: Vec<u8>) -> Self {
        Self(data)
    }
}

impl From<&[u8]> for Share {
    fn from(data: &[u8]) -> Self {
        Self(data.to_vec())
    }
}
