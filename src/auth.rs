//! Auth-domain values: ordered scope lists, state blobs, and token sets.

pub mod scope;
pub mod state;
pub mod token;

pub use scope::*;
pub use state::*;
pub use token::{secret::*, set::*};
