//! Chain entities and the item builder.
//!
//! - `Script` / `OutPoint`: the on-chain references items are built from
//! - `Address`: bech32 encoding of a lock script
//! - `Item`: tagged, hex-encoded identifier of an address, identity or record

pub mod address;
pub mod item;
pub mod out_point;
pub mod script;
