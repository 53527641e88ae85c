use std::sync::Arc;

use sdlc_core::{WorkspaceAccessType, WorkspaceSpecification, WorkspaceType};

use super::{execute_with_logging, patch_stream, workspace_spec};
use crate::api::{Comparison, ComparisonApi, ProjectConfiguration, ProjectConfigurationApi};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

/// `.../patches/{version}/reviews/{review}/comparison`.
#[derive(Clone)]
pub struct PatchReviewComparisonResource {
    comparison_api: Arc<dyn ComparisonApi>,
    configuration_api: Arc<dyn ProjectConfigurationApi>,
}

impl PatchReviewComparisonResource {
    #[must_use]
    pub fn new(
        comparison_api: Arc<dyn ComparisonApi>,
        configuration_api: Arc<dyn ProjectConfigurationApi>,
    ) -> Self {
        Self {
            comparison_api,
            configuration_api,
        }
    }

    /// Current patch stream revision to the review's workspace revision.
    ///
    /// # Errors
    /// Bad request for a missing or malformed version; not found for an
    /// unknown review.
    pub fn review_comparison(
        &self,
        project_id: &str,
        patch_release_version: Option<&str>,
        review_id: &str,
    ) -> Result<Comparison> {
        let stream = patch_stream(patch_release_version)?;
        execute_with_logging(
            &format!(
                "getting comparison between the current workspace revision and current \
                 project revision for review {review_id} for project {project_id} for {stream}"
            ),
            || self.comparison_api.get_review_comparison(project_id, &stream, review_id),
        )
    }

    /// Same as [`review_comparison`](Self::review_comparison).
    ///
    /// # Errors
    /// See [`review_comparison`](Self::review_comparison).
    pub fn review_project_latest_comparison(
        &self,
        project_id: &str,
        patch_release_version: Option<&str>,
        review_id: &str,
    ) -> Result<Comparison> {
        self.review_comparison(project_id, patch_release_version, review_id)
    }

    /// The review workspace's creation revision to its reviewed revision.
    ///
    /// # Errors
    /// Bad request for a missing or malformed version; not found for an
    /// unknown review.
    pub fn review_workspace_creation_comparison(
        &self,
        project_id: &str,
        patch_release_version: Option<&str>,
        review_id: &str,
    ) -> Result<Comparison> {
        let stream = patch_stream(patch_release_version)?;
        execute_with_logging(
            &format!(
                "getting comparison between the review current workspace revision and review \
                 workspace creation revision for review {review_id} for project {project_id}"
            ),
            || {
                self.comparison_api
                    .get_review_workspace_creation_comparison(project_id, &stream, review_id)
            },
        )
    }

    /// # Errors
    /// Bad request for a missing or malformed version; not found for an
    /// unknown review.
    pub fn review_from_configuration(
        &self,
        project_id: &str,
        patch_release_version: Option<&str>,
        review_id: &str,
    ) -> Result<ProjectConfiguration> {
        let stream = patch_stream(patch_release_version)?;
        execute_with_logging(
            &format!(
                "getting [from] project configuration for review {review_id} of project \
                 {project_id} for {stream}"
            ),
            || {
                self.configuration_api
                    .get_review_from_configuration(project_id, &stream, review_id)
            },
        )
    }

    /// # Errors
    /// Bad request for a missing or malformed version; not found for an
    /// unknown review.
    pub fn review_to_configuration(
        &self,
        project_id: &str,
        patch_release_version: Option<&str>,
        review_id: &str,
    ) -> Result<ProjectConfiguration> {
        let stream = patch_stream(patch_release_version)?;
        execute_with_logging(
            &format!(
                "getting [to] project configuration for review {review_id} of project \
                 {project_id} for {stream}"
            ),
            || {
                self.configuration_api
                    .get_review_to_configuration(project_id, &stream, review_id)
            },
        )
    }
}

// ---------------------------------------------------------------------------
// Workspaces
// ---------------------------------------------------------------------------

/// `.../patches/{version}/workspaces/{workspace}/comparison` and its
/// `groupWorkspaces` counterpart.
#[derive(Clone)]
pub struct PatchWorkspaceComparisonResource {
    comparison_api: Arc<dyn ComparisonApi>,
    workspace_type: WorkspaceType,
}

impl PatchWorkspaceComparisonResource {
    #[must_use]
    pub fn user(comparison_api: Arc<dyn ComparisonApi>) -> Self {
        Self {
            comparison_api,
            workspace_type: WorkspaceType::User,
        }
    }

    #[must_use]
    pub fn group(comparison_api: Arc<dyn ComparisonApi>) -> Self {
        Self {
            comparison_api,
            workspace_type: WorkspaceType::Group,
        }
    }

    fn spec(
        &self,
        workspace_id: &str,
        patch_release_version: Option<&str>,
    ) -> Result<WorkspaceSpecification> {
        workspace_spec(
            workspace_id,
            self.workspace_type,
            WorkspaceAccessType::Workspace,
            patch_stream(patch_release_version)?,
        )
    }

    /// # Errors
    /// Bad request for invalid parameters; not found for an unknown workspace.
    pub fn workspace_creation_comparison(
        &self,
        project_id: &str,
        patch_release_version: Option<&str>,
        workspace_id: &str,
    ) -> Result<Comparison> {
        let spec = self.spec(workspace_id, patch_release_version)?;
        execute_with_logging(
            &format!(
                "getting comparison between current workspace revision and project revision \
                 at workspace creation, for {spec} for project {project_id}"
            ),
            || {
                self.comparison_api
                    .get_workspace_creation_comparison(project_id, &spec)
            },
        )
    }

    /// # Errors
    /// Bad request for invalid parameters; not found for an unknown workspace.
    pub fn project_latest_comparison(
        &self,
        project_id: &str,
        patch_release_version: Option<&str>,
        workspace_id: &str,
    ) -> Result<Comparison> {
        let spec = self.spec(workspace_id, patch_release_version)?;
        execute_with_logging(
            &format!(
                "getting comparison between current workspace revision and current project \
                 revision, for {spec} for project {project_id}"
            ),
            || {
                self.comparison_api
                    .get_workspace_project_comparison(project_id, &spec)
            },
        )
    }
}
