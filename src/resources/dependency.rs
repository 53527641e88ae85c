use std::collections::BTreeSet;
use std::sync::Arc;

use sdlc_core::{DevelopmentStream, WorkspaceAccessType, WorkspaceType};

use super::{execute_with_logging, patch_version, workspace_spec};
use crate::api::{DependenciesApi, ProjectDependency};
use crate::error::Result;

const PATCH_RELEASE_VERSION_ID_REQUIRED: &str = "patchReleaseVersionId may not be null";

/// `.../patches/{version}/workspaces/{workspace}/revisions/{revision}/upstreamProjects`
/// and its `groupWorkspaces` counterpart.
#[derive(Clone)]
pub struct PatchWorkspaceRevisionDependenciesResource {
    dependencies_api: Arc<dyn DependenciesApi>,
    workspace_type: WorkspaceType,
}

impl PatchWorkspaceRevisionDependenciesResource {
    #[must_use]
    pub fn user(dependencies_api: Arc<dyn DependenciesApi>) -> Self {
        Self {
            dependencies_api,
            workspace_type: WorkspaceType::User,
        }
    }

    #[must_use]
    pub fn group(dependencies_api: Arc<dyn DependenciesApi>) -> Self {
        Self {
            dependencies_api,
            workspace_type: WorkspaceType::Group,
        }
    }

    /// Upstream projects of a workspace revision.
    ///
    /// # Errors
    /// Bad request for invalid parameters; not found for an unknown
    /// workspace or revision, or (when `transitive`) an upstream project or
    /// version that does not exist.
    pub fn upstream_projects(
        &self,
        project_id: &str,
        patch_release_version_id: Option<&str>,
        workspace_id: &str,
        revision_id: &str,
        transitive: bool,
    ) -> Result<BTreeSet<ProjectDependency>> {
        let version = patch_version(patch_release_version_id, PATCH_RELEASE_VERSION_ID_REQUIRED)?;
        let spec = workspace_spec(
            workspace_id,
            self.workspace_type,
            WorkspaceAccessType::Workspace,
            DevelopmentStream::Patch(version),
        )?;
        execute_with_logging(
            &format!(
                "getting upstream dependencies of project {project_id} for patch release \
                 version {version}, {spec}, revision {revision_id} \
                 (fetch transitively = {transitive})"
            ),
            || {
                self.dependencies_api.get_workspace_revision_upstream_projects(
                    project_id,
                    &spec,
                    revision_id,
                    transitive,
                )
            },
        )
    }
}
