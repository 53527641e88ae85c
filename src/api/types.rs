//! Value types exchanged through the API traits.

use std::collections::BTreeSet;
use std::fmt;

use sdlc_core::{DevelopmentStream, VersionId, WorkspaceId, WorkspaceSpecification};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Revision
// ---------------------------------------------------------------------------

/// Identifier of a revision: 40 lowercase hex characters.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RevisionId(String);

impl RevisionId {
    /// Wrap an already-computed revision id.
    #[must_use]
    pub const fn from_hex(hex: String) -> Self {
        Self(hex)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for log messages.
    #[must_use]
    pub fn short(&self) -> &str {
        self.0.get(..12).unwrap_or(&self.0)
    }
}

impl fmt::Display for RevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single committed state of a stream or workspace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Revision {
    pub id: RevisionId,
    pub message: String,
    pub author: String,
}

// ---------------------------------------------------------------------------
// Workspace
// ---------------------------------------------------------------------------

/// A workspace as reported to clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Workspace {
    pub project_id: String,
    /// Fully resolved: USER workspaces always carry their owner.
    pub specification: WorkspaceSpecification,
}

impl Workspace {
    #[must_use]
    pub const fn workspace_id(&self) -> &WorkspaceId {
        self.specification.workspace_id()
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.specification.user_id()
    }
}

/// Outcome of bringing a workspace up to date with its stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkspaceUpdateReport {
    /// The workspace was already based on the stream head.
    NoOp,
    /// The workspace was replayed onto the stream head.
    Updated {
        /// New head of the workspace.
        revision_id: RevisionId,
    },
    /// The workspace and the stream changed the same entities. A conflict
    /// resolution workspace was created; the workspace itself is unchanged.
    Conflict {
        /// Entity paths changed on both sides.
        conflicting_paths: Vec<String>,
    },
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// How an entity differs between two revisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityChangeType {
    Create,
    Delete,
    Modify,
}

/// A single changed entity.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct EntityDiff {
    pub entity_path: String,
    pub change_type: EntityChangeType,
}

/// Entity-level difference between two revisions, ordered by path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub from_revision_id: RevisionId,
    pub to_revision_id: RevisionId,
    pub entity_diffs: Vec<EntityDiff>,
    pub project_configuration_updated: bool,
}

// ---------------------------------------------------------------------------
// Project configuration
// ---------------------------------------------------------------------------

/// A dependency on a released version of another project.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ProjectDependency {
    pub project_id: String,
    pub version_id: VersionId,
}

impl ProjectDependency {
    #[must_use]
    pub fn new(project_id: impl Into<String>, version_id: VersionId) -> Self {
        Self {
            project_id: project_id.into(),
            version_id,
        }
    }
}

impl fmt::Display for ProjectDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.project_id, self.version_id)
    }
}

/// Project-level settings stored alongside the entities of every revision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProjectConfiguration {
    pub project_id: String,
    pub project_structure_version: u32,
    pub group_id: String,
    pub artifact_id: String,
    pub project_dependencies: BTreeSet<ProjectDependency>,
}

/// Where a review's changes are headed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Review {
    pub id: String,
    pub project_id: String,
    pub workspace: WorkspaceSpecification,
    pub target: DevelopmentStream,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
