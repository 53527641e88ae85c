//! legend-sdlc service layer.
//!
//! The patch-release resources, the API contracts they delegate to, and an
//! in-memory branch-store backend. Workspace identity and branch naming live
//! in the `sdlc-core` crate; this crate wires them into request handling.

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod resources;
pub mod telemetry;

pub use error::{ErrorStatus, Result, SdlcError};
