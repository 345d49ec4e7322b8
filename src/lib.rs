#![doc(html_root_url = "https://docs.rs/exclusive/0.2.0")]
#![warn(rust_2018_idioms)]

//! # Introduction
//!
//! Secret shares of byte vectors based on bitwise XOR, for use within secure
//! multi-party computation (MPC) protocol implementations.
//!
//! A secret is split into shares whose XOR is the secret. Any proper subset
//! of the shares is independent of the secret. Shares may themselves be
//! split again, which gives the nested sharing used by hierarchical and
//! replicated XOR schemes.
//!
//! # Getting Started
//!
//! ```toml
//! [dependencies]
//! exclusive = "0.2.0"
//! ```
//!
//! # Usage
//!
//! ```
//! use exclusive::{combine, split};
//!
//! let mut rng = bc_rand::SecureRandomNumberGenerator;
//! let secret = b"my secret";
//! let mut quantity = split(secret, 3, &mut rng).unwrap();
//!
//! // The second party re-shares its share between two sub-parties.
//! quantity.split_leaf(&[1], 2, &mut rng).unwrap();
//!
//! assert_eq!(combine(&quantity).unwrap(), secret);
//! ```
//!
//! # Randomness
//!
//! Every function that draws shares takes the random number generator as an
//! argument. The hiding property holds only if that generator is
//! cryptographically secure; deterministic generators are for tests.

/// The smallest number of shares a secret, or a share, can be split into.
pub const MIN_SHARE_COUNT: usize = 2;

mod error;
pub use error::{Error, Result};

mod hazmat;
pub use hazmat::{random_bytes, xor, xor_reduce};

mod share;
pub use share::Share;

mod shape;
pub use shape::Shape;

mod quantity;
pub use quantity::Quantity;

mod sharing;
pub use sharing::{combine, combine_structures, split};

mod parts;
pub use parts::{from_parts, to_parts};
