//! Backends implementing the API traits.
//!
//! A backend owns project history: development streams, released versions,
//! workspace branches, and reviews. Workspaces live on branches named by the
//! branch-name codec, so a backend can recover every workspace from its
//! branch list alone.

pub mod memory;

pub use memory::{Change, InMemoryBackend};
