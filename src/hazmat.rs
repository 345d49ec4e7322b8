use bc_crypto::memzero;
use bc_rand::RandomNumberGenerator;

use crate::{Error, Result};

fn check_len(expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(Error::LengthMismatch { expected, found });
    }
    Ok(())
}

/// XOR `x` into `r`. Both slices must have the same length.
pub fn xor_into(r: &mut [u8], x: &[u8]) -> Result<()> {
    check_len(r.len(), x.len())?;
    r.iter_mut().zip(x.iter()).for_each(|(r, x)| *r ^= x);
    Ok(())
}

/// Return the bytewise XOR of `a` and `b`.
pub fn xor(a: &[u8], b: &[u8]) -> Result<Vec<u8>> {
    let mut r = a.to_vec();
    xor_into(&mut r, b)?;
    Ok(r)
}

/// Fold a sequence of equal-length byte vectors into one with XOR, left to
/// right. An empty sequence has no defined length and is rejected.
pub fn xor_reduce<'a, I>(vectors: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut iter = vectors.into_iter();
    let mut r = iter.next().ok_or(Error::IncompleteShares)?.to_vec();
    for x in iter {
        if let Err(e) = xor_into(&mut r, x) {
            memzero(&mut r);
            return Err(e);
        }
    }
    Ok(r)
}

/// Draw `len` bytes from `rng`.
///
/// The result is only as good as the generator: a predictable source voids
/// the hiding property of every share derived from it.
pub fn random_bytes(rng: &mut impl RandomNumberGenerator, len: usize) -> Vec<u8> {
    let mut r = vec![0u8; len];
    rng.fill_random_data(&mut r);
    r
}

/// Compare two byte slices in time independent of their contents. Only the
/// lengths may leak.
pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let diff = a.iter().zip(b.iter()).fold(0u8, |acc, (a, b)| acc | (a ^ b));
    std::hint::black_box(diff) == 0
}
