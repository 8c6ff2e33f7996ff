//! Canonical tagged identifiers for chain entities.
//!
//! Builds [`Item`]s that reference an address, an identity derived from a
//! public key, or a record (a transaction output owned by a script or an
//! address), each serialized to a single hex value plus a type tag.

pub mod core;
pub mod types;
pub mod utils;

pub use crate::core::address::{Address, AddressError, AddressParser, Network};
pub use crate::core::item::{Item, ItemError, ItemType};
pub use crate::core::out_point::OutPoint;
pub use crate::core::script::{Molecule, Script, ScriptHashType};
pub use crate::types::hash::H256;
