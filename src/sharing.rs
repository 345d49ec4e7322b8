use bc_crypto::{memzero, memzero_vec_vec_u8};
use bc_rand::RandomNumberGenerator;
use log::{debug, trace};

use crate::{
    Error, MIN_SHARE_COUNT, Quantity, Result, Share,
    hazmat::{xor_into, xor_reduce},
};

fn validate_share_count(share_count: usize) -> Result<()> {
    if share_count < MIN_SHARE_COUNT {
        return Err(Error::InvalidShareCount(share_count));
    }
    Ok(())
}

/// Split `secret` into `share_count` shares whose XOR is `secret`.
///
/// The first `share_count - 1` shares are drawn from `random_generator`; the
/// last one is the secret XORed with all of them. Any proper subset of the
/// shares is therefore independent of the secret, provided the generator is
/// cryptographically secure.
///
/// A secret of length zero is accepted and yields shares of length zero.
pub fn split(
    secret: &[u8],
    share_count: usize,
    random_generator: &mut impl RandomNumberGenerator,
) -> Result<Quantity> {
    validate_share_count(share_count)?;

    let mut last = secret.to_vec();
    let mut children = Vec::new();
    for _ in 1..share_count {
        let share = Share::random(random_generator, secret.len());
        if let Err(e) = xor_into(&mut last, share.as_bytes()) {
            memzero(&mut last);
            return Err(e);
        }
        children.push(Some(Quantity::Leaf(share)));
    }
    children.push(Some(Quantity::Leaf(Share::from(last))));

    debug!("split {} byte secret into {} shares", secret.len(), share_count);
    Ok(Quantity::Node(children))
}

enum Frame<'a> {
    Visit(&'a Quantity),
    Reduce(usize),
}

fn combine_onto(quantity: &Quantity, values: &mut Vec<Vec<u8>>) -> Result<()> {
    let mut work = vec![Frame::Visit(quantity)];
    while let Some(frame) = work.pop() {
        match frame {
            Frame::Visit(Quantity::Leaf(share)) => values.push(share.to_vec()),
            Frame::Visit(Quantity::Node(children)) => {
                work.push(Frame::Reduce(children.len()));
                for child in children.iter().rev() {
                    let child = child.as_ref().ok_or(Error::IncompleteShares)?;
                    work.push(Frame::Visit(child));
                }
            }
            Frame::Reduce(width) => {
                let mut operands = values.split_off(values.len() - width);
                let value = xor_reduce(operands.iter().map(Vec::as_slice));
                memzero_vec_vec_u8(&mut operands);
                values.push(value?);
            }
        }
    }
    Ok(())
}

/// Reconstruct the value represented by `quantity`.
///
/// Every node is reduced to the XOR of its children, bottom up. The
/// traversal keeps its own work stack rather than recursing per level.
pub fn combine(quantity: &Quantity) -> Result<Vec<u8>> {
    let mut values = Vec::new();
    if let Err(e) = combine_onto(quantity, &mut values) {
        memzero_vec_vec_u8(&mut values);
        return Err(e);
    }
    let value = values.pop().ok_or(Error::IncompleteShares)?;
    trace!("combined quantity of depth {} into {} bytes", quantity.depth(), value.len());
    Ok(value)
}

/// XOR two quantities of identical shape leaf by leaf.
///
/// Each party can apply this to its local shares of two secrets; combining
/// the result yields the XOR of the secrets without revealing either one.
pub fn combine_structures(a: &Quantity, b: &Quantity) -> Result<Quantity> {
    match (a, b) {
        (Quantity::Leaf(a), Quantity::Leaf(b)) => Ok(Quantity::Leaf(a.xor(b)?)),
        (Quantity::Node(a), Quantity::Node(b)) if a.len() == b.len() && !a.is_empty() => a
            .iter()
            .zip(b)
            .map(|pair| match pair {
                (Some(a), Some(b)) => combine_structures(a, b).map(Some),
                _ => Err(Error::ShapeMismatch),
            })
            .collect::<Result<Vec<_>>>()
            .map(Quantity::Node),
        _ => Err(Error::ShapeMismatch),
    }
}

#[cfg(test)]
mod tests {
    use bc_rand::{RandomNumberGenerator, SecureRandomNumberGenerator, make_fake_random_number_generator};
    use hex_literal::hex;

    use crate::{Error, Quantity, Share, combine, combine_structures, split, xor};

    #[test]
    fn test_split_and_combine() {
        let mut rng = make_fake_random_number_generator();
        let secret = hex!("0ff784df000c4380a5ed683f7e6e3dcf");
        for share_count in 2..=8 {
            let q = split(&secret, share_count, &mut rng).unwrap();
            assert_eq!(q.width(), Some(share_count));
            assert_eq!(q.depth(), 1);
            assert_eq!(combine(&q).unwrap(), secret);
        }
    }

    #[test]
    fn test_deadbeef_three_shares() {
        let mut rng = make_fake_random_number_generator();
        let secret = hex!("deadbeef");
        let mut q = split(&secret, 3, &mut rng).unwrap();
        let parts = q.to_parts().unwrap();
        assert_eq!(parts.len(), 3);
        let r3 = xor(&xor(&secret, &parts[0]).unwrap(), &parts[1]).unwrap();
        assert_eq!(parts[2], r3);
        assert_eq!(combine(&q).unwrap(), secret);

        // Two out of three shares cannot reconstruct.
        let r3 = q.take(2).unwrap();
        assert_eq!(combine(&q), Err(Error::IncompleteShares));
        q.insert(2, r3).unwrap();
        assert_eq!(combine(&q).unwrap(), secret);
    }

    #[test]
    fn test_invalid_share_count() {
        let mut rng = make_fake_random_number_generator();
        assert_eq!(split(&hex!("deadbeef"), 1, &mut rng), Err(Error::InvalidShareCount(1)));
        assert_eq!(split(&hex!("deadbeef"), 0, &mut rng), Err(Error::InvalidShareCount(0)));
    }

    #[test]
    fn test_many_shares() {
        let mut rng = make_fake_random_number_generator();
        let secret = hex!("deadbeef");
        let q = split(&secret, 10_000, &mut rng).unwrap();
        assert_eq!(q.width(), Some(10_000));
        assert_eq!(combine(&q).unwrap(), secret);
    }

    #[test]
    fn test_empty_secret() {
        let mut rng = make_fake_random_number_generator();
        let q = split(&[], 4, &mut rng).unwrap();
        assert!(q.to_parts().unwrap().iter().all(Vec::is_empty));
        assert_eq!(combine(&q).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_combine_leaf() {
        let q = Quantity::Leaf(Share::new(hex!("cafe")));
        assert_eq!(combine(&q).unwrap(), hex!("cafe"));
    }

    #[test]
    fn test_combine_length_mismatch() {
        let q = Quantity::Node(vec![
            Some(Quantity::Leaf(Share::new(hex!("cafe")))),
            Some(Quantity::Leaf(Share::new(hex!("ca")))),
        ]);
        assert_eq!(combine(&q), Err(Error::LengthMismatch { expected: 2, found: 1 }));
    }

    #[test]
    fn test_combine_empty_node() {
        assert_eq!(combine(&Quantity::Node(vec![])), Err(Error::IncompleteShares));
    }

    #[test]
    fn test_nested_combine() {
        let mut rng = make_fake_random_number_generator();
        let secret = rng.random_data(32);
        let mut q = split(&secret, 2, &mut rng).unwrap();
        q.split_leaf(&[0], 3, &mut rng).unwrap();
        q.split_leaf(&[0, 2], 2, &mut rng).unwrap();
        q.split_leaf(&[1], 4, &mut rng).unwrap();
        assert_eq!(q.depth(), 3);
        assert_eq!(q.to_parts().unwrap().len(), 1 + 1 + 2 + 4);
        assert_eq!(combine(&q).unwrap(), secret);
    }

    #[test]
    fn test_deep_nesting() {
        let mut rng = make_fake_random_number_generator();
        let secret = hex!("00112233445566778899aabbccddeeff");
        let mut q = split(&secret, 2, &mut rng).unwrap();
        let mut path = vec![1];
        for _ in 0..1_000 {
            q.split_leaf(&path, 2, &mut rng).unwrap();
            path.push(1);
        }
        assert_eq!(q.depth(), 1_001);
        assert_eq!(combine(&q).unwrap(), secret);
    }

    #[test]
    fn test_combine_structures() {
        let mut rng = make_fake_random_number_generator();
        let a = hex!("deadbeef");
        let b = hex!("01234567");
        let qa = split(&a, 3, &mut rng).unwrap();
        let qb = split(&b, 3, &mut rng).unwrap();
        let qc = combine_structures(&qa, &qb).unwrap();
        assert_eq!(qc.shape(), qa.shape());
        assert_eq!(combine(&qc).unwrap(), xor(&a, &b).unwrap());
    }

    #[test]
    fn test_combine_structures_nested() {
        let mut rng = make_fake_random_number_generator();
        let a = rng.random_data(20);
        let b = rng.random_data(20);
        let mut qa = split(&a, 3, &mut rng).unwrap();
        let mut qb = split(&b, 3, &mut rng).unwrap();
        qa.split_leaf(&[1], 2, &mut rng).unwrap();
        qb.split_leaf(&[1], 2, &mut rng).unwrap();
        let qc = combine_structures(&qa, &qb).unwrap();
        assert_eq!(combine(&qc).unwrap(), xor(&a, &b).unwrap());
    }

    #[test]
    fn test_combine_structures_mismatch() {
        let mut rng = make_fake_random_number_generator();
        let qa = split(&hex!("deadbeef"), 3, &mut rng).unwrap();
        let qb = split(&hex!("deadbeef"), 2, &mut rng).unwrap();
        assert_eq!(combine_structures(&qa, &qb), Err(Error::ShapeMismatch));

        let mut qc = split(&hex!("deadbeef"), 3, &mut rng).unwrap();
        qc.split_leaf(&[0], 2, &mut rng).unwrap();
        assert_eq!(combine_structures(&qa, &qc), Err(Error::ShapeMismatch));

        assert_eq!(
            combine_structures(&Quantity::vacant_node(0), &Quantity::vacant_node(0)),
            Err(Error::ShapeMismatch)
        );

        let mut qd = split(&hex!("deadbeef"), 3, &mut rng).unwrap();
        qd.take(1);
        assert_eq!(combine_structures(&qa, &qd), Err(Error::ShapeMismatch));

        let qe = split(&hex!("dead"), 3, &mut rng).unwrap();
        assert_eq!(
            combine_structures(&qa, &qe),
            Err(Error::LengthMismatch { expected: 4, found: 2 })
        );
    }

    // Each bit of a share, and of the XOR of any proper subset of shares,
    // should be set about half the time no matter what the secret is.
    #[test]
    fn test_subset_independence() {
        const TRIALS: usize = 2000;
        let mut rng = SecureRandomNumberGenerator;
        for secret in [hex!("00"), hex!("ff"), hex!("a5")] {
            let mut ones = [[0usize; 8]; 3];
            for _ in 0..TRIALS {
                let parts = split(&secret, 3, &mut rng).unwrap().to_parts().unwrap();
                let subsets = [
                    parts[2][0],
                    parts[1][0] ^ parts[2][0],
                    parts[0][0] ^ parts[1][0],
                ];
                for (counts, byte) in ones.iter_mut().zip(subsets) {
                    for (bit, count) in counts.iter_mut().enumerate() {
                        *count += ((byte >> bit) & 1) as usize;
                    }
                }
            }
            for count in ones.iter().flatten() {
                assert!((800..=1200).contains(count), "biased bit count {}", count);
            }
        }
    }
}
