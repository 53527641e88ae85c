//! Workspace branch names.
//!
//! Every workspace lives on a branch whose name is computed from its
//! [`WorkspaceSpecification`]. The name is the only persisted form of a
//! specification, so the mapping has to survive a round trip: any branch
//! produced by [`workspace_branch_name`] parses back to the same
//! specification with [`parse_workspace_branch_name`].
//!
//! # Branch name layout
//!
//! ```text
//! [patch/<M.N.P>/]<token>[/<user>]/<workspace>
//!
//!                    USER          GROUP
//! WORKSPACE          workspace     group
//! BACKUP             backup        group-backup
//! CONFLICT_RES.      resolution    group-resolution
//! ```
//!
//! USER branches carry the owning user as the segment before the workspace
//! id; GROUP branches never do.

use thiserror::Error;

use crate::model::types::{
    DevelopmentStream, VersionId, WorkspaceAccessType, WorkspaceId, WorkspaceSpecification,
    WorkspaceType,
};

// ---------------------------------------------------------------------------
// Well-known segments
// ---------------------------------------------------------------------------

/// Leading segment of every patch-stream workspace branch.
pub const PATCH_PREFIX: &str = "patch";

/// Branch names that hold a project's main line and are never workspaces.
pub const MAIN_BRANCH_NAMES: &[&str] = &["main", "master"];

const SEPARATOR: char = '/';

/// The segment naming the workspace type and access type.
#[must_use]
pub const fn workspace_token(
    workspace_type: WorkspaceType,
    access_type: WorkspaceAccessType,
) -> &'static str {
    match (workspace_type, access_type) {
        (WorkspaceType::User, WorkspaceAccessType::Workspace) => "workspace",
        (WorkspaceType::User, WorkspaceAccessType::Backup) => "backup",
        (WorkspaceType::User, WorkspaceAccessType::ConflictResolution) => "resolution",
        (WorkspaceType::Group, WorkspaceAccessType::Workspace) => "group",
        (WorkspaceType::Group, WorkspaceAccessType::Backup) => "group-backup",
        (WorkspaceType::Group, WorkspaceAccessType::ConflictResolution) => "group-resolution",
    }
}

fn parse_workspace_token(token: &str) -> Option<(WorkspaceType, WorkspaceAccessType)> {
    WorkspaceType::ALL
        .into_iter()
        .flat_map(|t| WorkspaceAccessType::ALL.into_iter().map(move |a| (t, a)))
        .find(|&(t, a)| workspace_token(t, a) == token)
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from computing a branch name.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BranchNameError {
    /// A USER specification had no user id and none could be resolved.
    #[error("cannot determine the user for user workspace `{workspace_id}`")]
    MissingUserId {
        /// The workspace whose owner was unknown.
        workspace_id: String,
    },

    /// The resolved user id cannot appear in a branch name.
    #[error("invalid user id {user_id:?} for workspace `{workspace_id}`: {reason}")]
    InvalidUserId {
        /// The workspace being named.
        workspace_id: String,
        /// The offending user id.
        user_id: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Compute the branch name for `spec`.
///
/// For USER specifications without a pinned user id, `current_user` is
/// called (once) to resolve the owner. It is never called otherwise.
///
/// # Errors
/// Returns [`BranchNameError::MissingUserId`] if a USER specification has no
/// user id and `current_user` returns `None`, and
/// [`BranchNameError::InvalidUserId`] if the user id is empty or contains `/`.
///
/// # Example
/// ```
/// use sdlc_core::branch::workspace_branch_name;
/// use sdlc_core::model::types::{WorkspaceId, WorkspaceSpecification};
///
/// let spec = WorkspaceSpecification::user(WorkspaceId::new("wid1").unwrap());
/// let name = workspace_branch_name(&spec, || Some("userName".to_owned())).unwrap();
/// assert_eq!(name, "workspace/userName/wid1");
/// ```
pub fn workspace_branch_name<F>(
    spec: &WorkspaceSpecification,
    current_user: F,
) -> Result<String, BranchNameError>
where
    F: FnOnce() -> Option<String>,
{
    let mut name = String::new();
    if let Some(version) = spec.development_stream().patch_version() {
        name.push_str(PATCH_PREFIX);
        name.push(SEPARATOR);
        name.push_str(&version.to_string());
        name.push(SEPARATOR);
    }
    name.push_str(workspace_token(spec.workspace_type(), spec.access_type()));
    name.push(SEPARATOR);

    if spec.workspace_type() == WorkspaceType::User {
        let user_id = match spec.user_id() {
            Some(user_id) => user_id.to_owned(),
            None => current_user().ok_or_else(|| BranchNameError::MissingUserId {
                workspace_id: spec.workspace_id().to_string(),
            })?,
        };
        validate_user_id(spec, &user_id)?;
        name.push_str(&user_id);
        name.push(SEPARATOR);
    }

    name.push_str(spec.workspace_id().as_str());
    Ok(name)
}

fn validate_user_id(spec: &WorkspaceSpecification, user_id: &str) -> Result<(), BranchNameError> {
    let reason = if user_id.is_empty() {
        "user id must not be empty"
    } else if user_id.contains(SEPARATOR) {
        "user id must not contain '/'"
    } else {
        return Ok(());
    };
    Err(BranchNameError::InvalidUserId {
        workspace_id: spec.workspace_id().to_string(),
        user_id: user_id.to_owned(),
        reason,
    })
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Parse a branch name back into the specification it encodes.
///
/// Returns `None` for anything that is not a workspace branch: empty names,
/// the main-line branches, unknown tokens, malformed patch versions, and
/// wrong segment counts. `project_id` is only used as log context.
#[must_use]
pub fn parse_workspace_branch_name(
    project_id: &str,
    branch_name: &str,
) -> Option<WorkspaceSpecification> {
    match parse(branch_name) {
        Ok(spec) => Some(spec),
        Err(reason) => {
            tracing::debug!(
                project = project_id,
                branch = branch_name,
                reason,
                "not a workspace branch"
            );
            None
        }
    }
}

/// Returns `true` if `branch_name` is a workspace branch.
#[must_use]
pub fn is_workspace_branch_name(branch_name: &str) -> bool {
    parse(branch_name).is_ok()
}

fn parse(branch_name: &str) -> Result<WorkspaceSpecification, &'static str> {
    if branch_name.is_empty() {
        return Err("empty branch name");
    }
    if MAIN_BRANCH_NAMES.contains(&branch_name) {
        return Err("main line branch");
    }

    let segments: Vec<&str> = branch_name.split(SEPARATOR).collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err("empty segment");
    }

    let (stream, rest) = match segments.as_slice() {
        [PATCH_PREFIX, version, rest @ ..] => {
            let version: VersionId = version.parse().map_err(|_| "invalid patch version")?;
            (DevelopmentStream::Patch(version), rest)
        }
        [PATCH_PREFIX] => return Err("missing patch version"),
        rest => (DevelopmentStream::Project, rest),
    };

    let [token, rest @ ..] = rest else {
        return Err("missing workspace token");
    };
    let (workspace_type, access_type) =
        parse_workspace_token(token).ok_or("unknown workspace token")?;

    let (user_id, workspace_id) = match (workspace_type, rest) {
        (WorkspaceType::Group, [workspace_id]) => (None, *workspace_id),
        (WorkspaceType::User, [user_id, workspace_id]) => (Some(*user_id), *workspace_id),
        _ => return Err("wrong number of segments"),
    };
    let workspace_id = WorkspaceId::new(workspace_id).map_err(|_| "invalid workspace id")?;

    Ok(WorkspaceSpecification::new(
        workspace_id,
        workspace_type,
        access_type,
        stream,
        user_id.map(str::to_owned),
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_component() -> impl Strategy<Value = u32> {
        prop_oneof![0u32..=20, 0u32..=VersionId::MAX_COMPONENT]
    }

    fn arb_version() -> impl Strategy<Value = VersionId> {
        (arb_component(), arb_component(), arb_component())
            .prop_map(|(a, b, c)| VersionId::new(a, b, c).unwrap())
    }

    fn arb_stream() -> impl Strategy<Value = DevelopmentStream> {
        prop_oneof![
            Just(DevelopmentStream::Project),
            arb_version().prop_map(DevelopmentStream::Patch),
        ]
    }

    fn arb_spec() -> impl Strategy<Value = WorkspaceSpecification> {
        (
            "[A-Za-z0-9_.-]{1,24}",
            prop_oneof![Just(WorkspaceType::User), Just(WorkspaceType::Group)],
            prop_oneof![
                Just(WorkspaceAccessType::Workspace),
                Just(WorkspaceAccessType::Backup),
                Just(WorkspaceAccessType::ConflictResolution),
            ],
            arb_stream(),
            "[a-z][a-z0-9_.-]{0,15}",
        )
            .prop_map(|(id, workspace_type, access_type, stream, user)| {
                WorkspaceSpecification::new(
                    WorkspaceId::new(&id).unwrap(),
                    workspace_type,
                    access_type,
                    stream,
                    Some(user),
                )
            })
    }

    proptest! {
        #[test]
        fn prop_roundtrip(spec in arb_spec()) {
            let name = workspace_branch_name(&spec, || None).unwrap();
            prop_assert_eq!(parse_workspace_branch_name("project", &name), Some(spec));
        }

        #[test]
        fn prop_current_user_roundtrip(id in "[a-z0-9]{1,12}", user in "[a-z]{1,12}") {
            let spec = WorkspaceSpecification::user(WorkspaceId::new(&id).unwrap());
            let name = workspace_branch_name(&spec, || Some(user.clone())).unwrap();
            let parsed = parse_workspace_branch_name("project", &name).unwrap();
            prop_assert_eq!(parsed, spec.with_user_id(user));
        }

        #[test]
        fn prop_decode_never_panics(name in "\\PC{0,40}") {
            let _ = parse_workspace_branch_name("project", &name);
        }
    }
}
