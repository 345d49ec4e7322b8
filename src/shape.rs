#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The topology of a [`crate::Quantity`], without any share data.
///
/// Sent alongside the flattened parts so that a receiver can rebuild the tree
/// with [`crate::from_parts`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Shape {
    Leaf,
    Node(Vec<Shape>),
}

impl Shape {
    /// A node of `width` leaves, the shape produced by [`crate::split`].
    pub fn node(width: usize) -> Self {
        Shape::Node(vec![Shape::Leaf; width])
    }

    pub fn width(&self) -> Option<usize> {
        match self {
            Shape::Leaf => None,
            Shape::Node(children) => Some(children.len()),
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Shape::Leaf => 0,
            Shape::Node(children) => 1 + children.iter().map(Shape::depth).max().unwrap_or(0),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Shape::Leaf => 1,
            Shape::Node(children) => children.iter().map(Shape::leaf_count).sum(),
        }
    }

    /// Check that every node has at least one child. A node without children
    /// holds no value, and [`crate::Quantity::shape`] never reports one.
    pub fn validate(&self) -> Result<()> {
        match self {
            Shape::Leaf => Ok(()),
            Shape::Node(children) if children.is_empty() => Err(Error::ShapeMismatch),
            Shape::Node(children) => children.iter().try_for_each(Shape::validate),
        }
    }

    /// Flatten into the number of children of each node in pre-order, with
    /// 0 standing for a leaf.
    pub fn to_arities(&self) -> Vec<usize> {
        let mut arities = Vec::new();
        let mut work = vec![self];
        while let Some(shape) = work.pop() {
            match shape {
                Shape::Leaf => arities.push(0),
                Shape::Node(children) => {
                    arities.push(children.len());
                    work.extend(children.iter().rev());
                }
            }
        }
        arities
    }

    /// Inverse of [`Shape::to_arities`]. Fails with [`Error::ShapeMismatch`]
    /// if the list does not describe exactly one valid shape.
    pub fn from_arities(arities: &[usize]) -> Result<Shape> {
        let mut open: Vec<(Vec<Shape>, usize)> = Vec::new();
        let mut iter = arities.iter();
        while let Some(&arity) = iter.next() {
            if arity == 0 {
                let mut done = Shape::Leaf;
                loop {
                    let Some((children, width)) = open.last_mut() else {
                        if iter.next().is_some() {
                            return Err(Error::ShapeMismatch);
                        }
                        return Ok(done);
                    };
                    children.push(done);
                    if children.len() < *width {
                        break;
                    }
                    let Some((children, _)) = open.pop() else {
                        return Err(Error::ShapeMismatch);
                    };
                    done = Shape::Node(children);
                }
            } else {
                open.push((Vec::with_capacity(arity.min(arities.len())), arity));
            }
        }
        Err(Error::ShapeMismatch)
    }
}
