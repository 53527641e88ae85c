//! Core domain logic for legend-sdlc: workspace specifications, the
//! workspace branch-name codec, and the naming grammars.
//!
//! Everything here is pure: no I/O, no shared state. The functions are safe
//! to call from any number of request handlers at once.
//!
//! # Crate layout
//!
//! - [`model`]: value types ([`WorkspaceSpecification`], [`VersionId`], ...).
//! - [`branch`]: encode a specification as a branch name and parse it back.
//! - [`naming`]: entity/package/classifier path predicates and release tags.

pub mod branch;
pub mod model;
pub mod naming;

pub use branch::{BranchNameError, parse_workspace_branch_name, workspace_branch_name};
pub use model::types::{
    DevelopmentStream, ValidationError, VersionId, WorkspaceAccessType, WorkspaceId,
    WorkspaceSpecification, WorkspaceType,
};
