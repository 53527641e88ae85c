//! Patch-release-version resources.
//!
//! Each resource validates its path parameters, builds the
//! [`WorkspaceSpecification`] it addresses, and delegates to an API trait
//! inside [`execute_with_logging`]. Resources come in USER and GROUP flavors
//! that differ only in the workspace type they pass down.

pub mod backup;
pub mod comparison;
pub mod dependency;
pub mod workspace;

use std::time::Instant;

use sdlc_core::{
    DevelopmentStream, VersionId, WorkspaceAccessType, WorkspaceId, WorkspaceSpecification,
    WorkspaceType,
};
use tracing::{info, info_span, warn};

use crate::error::{Result, validate_non_null};

pub use backup::PatchBackupResource;
pub use comparison::{PatchReviewComparisonResource, PatchWorkspaceComparisonResource};
pub use dependency::PatchWorkspaceRevisionDependenciesResource;
pub use workspace::PatchWorkspacesResource;

const PATCH_RELEASE_VERSION_REQUIRED: &str = "patchReleaseVersion may not be null";

/// Run `operation` inside an info span, logging its start, its completion
/// time, and any error status.
///
/// # Errors
/// Returns whatever `operation` returns.
pub fn execute_with_logging<T>(
    description: &str,
    operation: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let span = info_span!("sdlc_operation", operation = description);
    let _entered = span.enter();
    info!("starting {description}");
    let start = Instant::now();
    let result = operation();
    let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    match &result {
        Ok(_) => info!(elapsed_ms, "finished {description}"),
        Err(e) => warn!(
            elapsed_ms,
            status = e.status().code(),
            error = %e,
            "error {description}"
        ),
    }
    result
}

/// Parse a required patch release version path parameter.
fn patch_version(patch_release_version: Option<&str>, missing: &str) -> Result<VersionId> {
    let raw = validate_non_null(patch_release_version, missing)?;
    Ok(raw.parse()?)
}

fn patch_stream(patch_release_version: Option<&str>) -> Result<DevelopmentStream> {
    patch_version(patch_release_version, PATCH_RELEASE_VERSION_REQUIRED)
        .map(DevelopmentStream::Patch)
}

fn workspace_spec(
    workspace_id: &str,
    workspace_type: WorkspaceType,
    access_type: WorkspaceAccessType,
    stream: DevelopmentStream,
) -> Result<WorkspaceSpecification> {
    Ok(WorkspaceSpecification::new(
        WorkspaceId::new(workspace_id)?,
        workspace_type,
        access_type,
        stream,
        None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorStatus, SdlcError};

    #[test]
    fn missing_patch_version_is_bad_request() {
        let err = patch_stream(None).unwrap_err();
        assert_eq!(err.status(), ErrorStatus::BadRequest);
        assert_eq!(err.to_string(), PATCH_RELEASE_VERSION_REQUIRED);
    }

    #[test]
    fn unparseable_patch_version_is_bad_request() {
        for raw in ["", "1.2", "1.2.3.4", "v1.2.3", "01.2.3"] {
            let err = patch_stream(Some(raw)).unwrap_err();
            assert_eq!(err.status(), ErrorStatus::BadRequest, "{raw:?}");
        }
    }

    #[test]
    fn patch_stream_parses_version() {
        let stream = patch_stream(Some("1.2.3")).unwrap();
        assert_eq!(stream.patch_version().map(ToString::to_string).as_deref(), Some("1.2.3"));
    }

    #[test]
    fn execute_with_logging_passes_results_through() {
        assert_eq!(execute_with_logging("adding", || Ok(1 + 1)).unwrap(), 2);
        let err = execute_with_logging::<()>("failing", || Err(SdlcError::not_found("gone")))
            .unwrap_err();
        assert_eq!(err.status(), ErrorStatus::NotFound);
    }

    #[test]
    fn workspace_spec_rejects_slash() {
        let err = workspace_spec(
            "a/b",
            WorkspaceType::Group,
            WorkspaceAccessType::Workspace,
            DevelopmentStream::Project,
        )
        .unwrap_err();
        assert_eq!(err.status(), ErrorStatus::BadRequest);
    }
}
