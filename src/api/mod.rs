//! Collaborator contracts used by the resources.
//!
//! Every method addresses a workspace through a [`WorkspaceSpecification`]:
//! its type, access type (live, backup, or conflict resolution), development
//! stream, and owner. A USER specification without an owner refers to the
//! current user of the backend.
//!
//! # Key Invariants
//!
//! - Branch-backed implementations store each workspace under the name
//!   produced by [`sdlc_core::workspace_branch_name`] and discover workspaces
//!   only by parsing branch names back with
//!   [`sdlc_core::parse_workspace_branch_name`].
//! - Listing methods return live (`Workspace` access) workspaces only.

pub mod types;

use std::collections::BTreeSet;

use sdlc_core::{DevelopmentStream, VersionId, WorkspaceSpecification, WorkspaceType};

use crate::error::Result;
pub use types::{
    Comparison, EntityChangeType, EntityDiff, ProjectConfiguration, ProjectDependency, Review,
    Revision, RevisionId, Workspace, WorkspaceUpdateReport,
};

/// Workspace lifecycle within a development stream.
#[allow(clippy::missing_errors_doc)]
pub trait WorkspaceApi: Send + Sync {
    /// Live workspaces of the given types visible to the current user: their
    /// own USER workspaces plus every GROUP workspace.
    fn get_workspaces(
        &self,
        project_id: &str,
        stream: &DevelopmentStream,
        types: &[WorkspaceType],
    ) -> Result<Vec<Workspace>>;

    /// Live workspaces of the given types, for every user.
    fn get_all_workspaces(
        &self,
        project_id: &str,
        stream: &DevelopmentStream,
        types: &[WorkspaceType],
    ) -> Result<Vec<Workspace>>;

    /// Look up one workspace of any access type.
    fn get_workspace(&self, project_id: &str, spec: &WorkspaceSpecification) -> Result<Workspace>;

    /// Whether the workspace is based on something other than the stream head.
    fn is_workspace_outdated(&self, project_id: &str, spec: &WorkspaceSpecification)
    -> Result<bool>;

    /// Whether a conflict resolution workspace exists for this workspace.
    fn is_workspace_in_conflict_resolution_mode(
        &self,
        project_id: &str,
        spec: &WorkspaceSpecification,
    ) -> Result<bool>;

    /// Create a live workspace at the head of its stream.
    fn new_workspace(&self, project_id: &str, spec: &WorkspaceSpecification) -> Result<Workspace>;

    fn delete_workspace(&self, project_id: &str, spec: &WorkspaceSpecification) -> Result<()>;

    /// Bring a live workspace up to date with the head of its stream.
    fn update_workspace(
        &self,
        project_id: &str,
        spec: &WorkspaceSpecification,
    ) -> Result<WorkspaceUpdateReport>;
}

/// Backups taken when a workspace is updated.
#[allow(clippy::missing_errors_doc)]
pub trait BackupApi: Send + Sync {
    fn discard_backup_workspace(&self, project_id: &str, spec: &WorkspaceSpecification)
    -> Result<()>;

    /// Restore the backup into the live workspace, consuming the backup.
    /// Without `force`, refuses if the live workspace exists.
    fn recover_backup_workspace(
        &self,
        project_id: &str,
        spec: &WorkspaceSpecification,
        force: bool,
    ) -> Result<()>;
}

/// Entity-level comparisons.
#[allow(clippy::missing_errors_doc)]
pub trait ComparisonApi: Send + Sync {
    /// Workspace creation revision to current workspace revision.
    fn get_workspace_creation_comparison(
        &self,
        project_id: &str,
        spec: &WorkspaceSpecification,
    ) -> Result<Comparison>;

    /// Current stream revision to current workspace revision.
    fn get_workspace_project_comparison(
        &self,
        project_id: &str,
        spec: &WorkspaceSpecification,
    ) -> Result<Comparison>;

    /// Current stream revision to the review's workspace revision.
    fn get_review_comparison(
        &self,
        project_id: &str,
        stream: &DevelopmentStream,
        review_id: &str,
    ) -> Result<Comparison>;

    /// The review workspace's creation revision to its reviewed revision.
    fn get_review_workspace_creation_comparison(
        &self,
        project_id: &str,
        stream: &DevelopmentStream,
        review_id: &str,
    ) -> Result<Comparison>;
}

/// Upstream project dependencies.
#[allow(clippy::missing_errors_doc)]
pub trait DependenciesApi: Send + Sync {
    /// Dependencies declared at a workspace revision, optionally followed
    /// through the released versions of upstream projects.
    fn get_workspace_revision_upstream_projects(
        &self,
        project_id: &str,
        spec: &WorkspaceSpecification,
        revision_id: &str,
        transitive: bool,
    ) -> Result<BTreeSet<ProjectDependency>>;
}

/// Project configuration at various points in history.
#[allow(clippy::missing_errors_doc)]
pub trait ProjectConfigurationApi: Send + Sync {
    fn get_project_configuration(
        &self,
        project_id: &str,
        stream: &DevelopmentStream,
    ) -> Result<ProjectConfiguration>;

    fn get_project_revision_configuration(
        &self,
        project_id: &str,
        stream: &DevelopmentStream,
        revision_id: &str,
    ) -> Result<ProjectConfiguration>;

    /// Configuration at the head of a workspace of any access type.
    fn get_workspace_configuration(
        &self,
        project_id: &str,
        spec: &WorkspaceSpecification,
    ) -> Result<ProjectConfiguration>;

    fn get_workspace_revision_configuration(
        &self,
        project_id: &str,
        spec: &WorkspaceSpecification,
        revision_id: &str,
    ) -> Result<ProjectConfiguration>;

    fn get_version_configuration(
        &self,
        project_id: &str,
        version: &VersionId,
    ) -> Result<ProjectConfiguration>;

    /// Configuration the review started from.
    fn get_review_from_configuration(
        &self,
        project_id: &str,
        stream: &DevelopmentStream,
        review_id: &str,
    ) -> Result<ProjectConfiguration>;

    /// Configuration the review proposes.
    fn get_review_to_configuration(
        &self,
        project_id: &str,
        stream: &DevelopmentStream,
        review_id: &str,
    ) -> Result<ProjectConfiguration>;

    fn get_latest_project_structure_version(&self) -> u32;
}
