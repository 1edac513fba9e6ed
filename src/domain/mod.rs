//! Domain modules (vertical slices).
//!
//! Each slice owns its types in `mod.rs`, wire types in `wire.rs`, wire →
//! domain conversions in `convert.rs` and, when it talks to the backend, a
//! sub-client in `client.rs`.

pub mod cart;
pub mod catalog;
pub mod network;
pub mod pricing;
