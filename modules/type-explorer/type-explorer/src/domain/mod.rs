//! Domain layer for the type explorer.
//!
//! Contains the snapshot cache and its load orchestration.

pub mod cache;

pub use cache::{GET_TYPES_OPERATION, LoadHandle, TypeRegistryCache};
