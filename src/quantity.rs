use bc_rand::RandomNumberGenerator;
use log::debug;

use crate::{Error, Result, Share, Shape};

/// A secret that has been split into shares, possibly more than once.
///
/// A quantity is either a single [`Share`] or an ordered list of child
/// quantities whose values XOR to the value of the node. Positions in a node
/// may be vacant, which is how a party represents shares it has not yet
/// received; such a quantity cannot be combined until it is complete.
///
/// Two quantities are equal when they have the same shape and identical
/// bytes at every leaf.
///
/// `combine`, `to_parts`, `depth`, `is_complete` and dropping walk the tree
/// with their own work stack. `shape`, `combine_structures`, `from_parts`,
/// `clone` and `==` recurse once per level of nesting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Quantity {
    Leaf(Share),
    Node(Vec<Option<Quantity>>),
}

impl Quantity {
    pub fn leaf(share: impl Into<Share>) -> Self {
        Quantity::Leaf(share.into())
    }

    /// A node with `width` positions, all vacant.
    pub fn vacant_node(width: usize) -> Self {
        Quantity::Node((0..width).map(|_| None).collect())
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Quantity::Leaf(_))
    }

    /// The share of a leaf.
    pub fn share(&self) -> Option<&Share> {
        match self {
            Quantity::Leaf(share) => Some(share),
            Quantity::Node(_) => None,
        }
    }

    /// Number of positions in a node, vacant or not. `None` for a leaf.
    pub fn width(&self) -> Option<usize> {
        match self {
            Quantity::Leaf(_) => None,
            Quantity::Node(children) => Some(children.len()),
        }
    }

    /// Length of the longest path from this quantity to a leaf. A leaf has
    /// depth 0; vacant positions count as leaves.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut work = vec![(self, 0usize)];
        while let Some((quantity, depth)) = work.pop() {
            max = max.max(depth);
            if let Quantity::Node(children) = quantity {
                max = max.max(depth + 1);
                work.extend(children.iter().flatten().map(|child| (child, depth + 1)));
            }
        }
        max
    }

    /// Whether every position in the tree is occupied.
    pub fn is_complete(&self) -> bool {
        let mut work = vec![self];
        while let Some(quantity) = work.pop() {
            if let Quantity::Node(children) = quantity {
                for child in children {
                    match child {
                        Some(child) => work.push(child),
                        None => return false,
                    }
                }
            }
        }
        true
    }

    pub fn child(&self, index: usize) -> Option<&Quantity> {
        match self {
            Quantity::Node(children) => children.get(index)?.as_ref(),
            Quantity::Leaf(_) => None,
        }
    }

    /// The quantity reached by following `path`, a sequence of child indices
    /// starting at this quantity. The empty path addresses `self`.
    pub fn get(&self, path: &[usize]) -> Option<&Quantity> {
        path.iter().try_fold(self, |quantity, &index| quantity.child(index))
    }

    pub fn get_mut(&mut self, path: &[usize]) -> Option<&mut Quantity> {
        let mut quantity = self;
        for &index in path {
            quantity = match quantity {
                Quantity::Node(children) => children.get_mut(index)?.as_mut()?,
                Quantity::Leaf(_) => return None,
            };
        }
        Some(quantity)
    }

    /// Vacate position `index` of a node and return what was there.
    pub fn take(&mut self, index: usize) -> Option<Quantity> {
        match self {
            Quantity::Node(children) => children.get_mut(index)?.take(),
            Quantity::Leaf(_) => None,
        }
    }

    /// Place `child` at position `index` of a node, returning the previous
    /// occupant. Fails with [`Error::ShapeMismatch`] if `self` is a leaf or
    /// `index` is out of range.
    pub fn insert(&mut self, index: usize, child: Quantity) -> Result<Option<Quantity>> {
        match self {
            Quantity::Node(children) => {
                let slot = children.get_mut(index).ok_or(Error::ShapeMismatch)?;
                Ok(slot.replace(child))
            }
            Quantity::Leaf(_) => Err(Error::ShapeMismatch),
        }
    }

    /// Split the leaf at `path` into `share_count` shares, replacing it with a
    /// node whose value is the leaf's value.
    ///
    /// Fails with [`Error::ShapeMismatch`] if `path` does not lead to a leaf.
    /// On failure the tree is left unchanged.
    pub fn split_leaf(
        &mut self,
        path: &[usize],
        share_count: usize,
        random_generator: &mut impl RandomNumberGenerator,
    ) -> Result<()> {
        let target = self.get_mut(path).ok_or(Error::ShapeMismatch)?;
        let Quantity::Leaf(share) = target else {
            return Err(Error::ShapeMismatch);
        };
        let node = share.split(share_count, random_generator)?;
        debug!("split leaf at depth {} into {} shares", path.len(), share_count);
        *target = node;
        Ok(())
    }

    /// See [`crate::combine`].
    pub fn combine(&self) -> Result<Vec<u8>> {
        crate::combine(self)
    }

    /// See [`crate::combine_structures`].
    pub fn combine_structures(&self, other: &Quantity) -> Result<Quantity> {
        crate::combine_structures(self, other)
    }

    /// The topology of this quantity. Fails with
    /// [`Error::IncompleteShares`] if any position is vacant or a node has no
    /// positions.
    pub fn shape(&self) -> Result<Shape> {
        match self {
            Quantity::Leaf(_) => Ok(Shape::Leaf),
            Quantity::Node(children) if children.is_empty() => Err(Error::IncompleteShares),
            Quantity::Node(children) => children
                .iter()
                .map(|child| child.as_ref().ok_or(Error::IncompleteShares)?.shape())
                .collect::<Result<Vec<_>>>()
                .map(Shape::Node),
        }
    }

    /// See [`crate::to_parts`].
    pub fn to_parts(&self) -> Result<Vec<Vec<u8>>> {
        crate::to_parts(self)
    }

    /// See [`crate::from_parts`].
    pub fn from_parts<P: AsRef<[u8]>>(parts: &[P], shape: &Shape) -> Result<Quantity> {
        crate::from_parts(parts, shape)
    }
}

// Dropping a long chain of nested nodes would otherwise recurse once per level.
impl Drop for Quantity {
    fn drop(&mut self) {
        let Quantity::Node(children) = self else {
            return;
        };
        let mut work: Vec<Quantity> = children.drain(..).flatten().collect();
        while let Some(mut quantity) = work.pop() {
            if let Quantity::Node(children) = &mut quantity {
                work.extend(children.drain(..).flatten());
            }
        }
    }
}

impl From<Share> for Quantity {
    fn from(share: Share) -> Self {
        Quantity::Leaf(share)
    }
}
