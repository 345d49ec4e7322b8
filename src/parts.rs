use crate::{Error, Quantity, Result, Share, Shape};

/// Flatten `quantity` into its leaf bytes, depth first and left to right.
///
/// Together with [`Quantity::shape`] this is the transport form of a
/// quantity. Fails with [`Error::IncompleteShares`] if a position is vacant
/// or a node has no positions.
pub fn to_parts(quantity: &Quantity) -> Result<Vec<Vec<u8>>> {
    let mut parts = Vec::new();
    let mut work = vec![quantity];
    while let Some(quantity) = work.pop() {
        match quantity {
            Quantity::Leaf(share) => parts.push(share.to_vec()),
            Quantity::Node(children) if children.is_empty() => {
                return Err(Error::IncompleteShares);
            }
            Quantity::Node(children) => {
                for child in children.iter().rev() {
                    work.push(child.as_ref().ok_or(Error::IncompleteShares)?);
                }
            }
        }
    }
    Ok(parts)
}

fn build(shape: &Shape, parts: &mut impl Iterator<Item = Share>) -> Result<Quantity> {
    match shape {
        Shape::Leaf => parts.next().map(Quantity::Leaf).ok_or(Error::ShapeMismatch),
        Shape::Node(children) => children
            .iter()
            .map(|child| build(child, parts).map(Some))
            .collect::<Result<Vec<_>>>()
            .map(Quantity::Node),
    }
}

/// Rebuild a quantity from the parts produced by [`to_parts`] and its shape.
///
/// Fails with [`Error::ShapeMismatch`] if the number of parts differs from
/// the number of leaves in `shape` or `shape` has a node without children,
/// and with [`Error::LengthMismatch`] if the parts are not all the
/// same length.
pub fn from_parts<P: AsRef<[u8]>>(parts: &[P], shape: &Shape) -> Result<Quantity> {
    shape.validate()?;
    if shape.leaf_count() != parts.len() {
        return Err(Error::ShapeMismatch);
    }
    if let Some(first) = parts.first() {
        let expected = first.as_ref().len();
        if let Some(part) = parts.iter().find(|part| part.as_ref().len() != expected) {
            return Err(Error::LengthMismatch { expected, found: part.as_ref().len() });
        }
    }
    let mut shares = parts.iter().map(|part| Share::from(part.as_ref()));
    build(shape, &mut shares)
}
