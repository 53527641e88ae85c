use std::sync::Arc;

use sdlc_core::{DevelopmentStream, WorkspaceAccessType, WorkspaceSpecification, WorkspaceType};

use super::{
    PATCH_RELEASE_VERSION_REQUIRED, execute_with_logging, patch_stream, patch_version,
    workspace_spec,
};
use crate::api::{Workspace, WorkspaceApi, WorkspaceUpdateReport};
use crate::error::Result;

/// Workspaces of a patch release stream:
/// `/projects/{project}/patches/{version}/workspaces` for USER and
/// `/projects/{project}/patches/{version}/groupWorkspaces` for GROUP.
#[derive(Clone)]
pub struct PatchWorkspacesResource {
    workspace_api: Arc<dyn WorkspaceApi>,
    workspace_type: WorkspaceType,
}

impl PatchWorkspacesResource {
    #[must_use]
    pub fn user(workspace_api: Arc<dyn WorkspaceApi>) -> Self {
        Self {
            workspace_api,
            workspace_type: WorkspaceType::User,
        }
    }

    #[must_use]
    pub fn group(workspace_api: Arc<dyn WorkspaceApi>) -> Self {
        Self {
            workspace_api,
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

    /// List workspaces of the patch stream.
    ///
    /// `widen` is the flavor's toggle. USER resource: `true` (the HTTP
    /// default) restricts to the current user's workspaces, `false` lists
    /// every workspace. GROUP resource: `false` (the HTTP default) lists group
    /// workspaces only, `true` adds every user's workspaces.
    ///
    /// # Errors
    /// Bad request for a missing or malformed version; not found for an
    /// unknown project or patch stream.
    pub fn list(
        &self,
        project_id: &str,
        patch_release_version: Option<&str>,
        widen: bool,
    ) -> Result<Vec<Workspace>> {
        let version = patch_version(patch_release_version, PATCH_RELEASE_VERSION_REQUIRED)?;
        let stream = DevelopmentStream::Patch(version);
        let api = &self.workspace_api;
        match self.workspace_type {
            WorkspaceType::User if widen => execute_with_logging(
                &format!(
                    "getting user workspaces for patch release version {version} \
                     for project {project_id}"
                ),
                || api.get_workspaces(project_id, &stream, &[WorkspaceType::User]),
            ),
            WorkspaceType::User => execute_with_logging(
                &format!(
                    "getting all workspaces for patch release version {version} \
                     for project {project_id}"
                ),
                || api.get_all_workspaces(project_id, &stream, &WorkspaceType::ALL),
            ),
            WorkspaceType::Group if widen => execute_with_logging(
                &format!(
                    "getting all group and user workspaces for project {project_id} \
                     for patch release version {version}"
                ),
                || api.get_all_workspaces(project_id, &stream, &WorkspaceType::ALL),
            ),
            WorkspaceType::Group => execute_with_logging(
                &format!(
                    "getting all group workspaces for project {project_id} \
                     for patch release version {version}"
                ),
                || api.get_workspaces(project_id, &stream, &[WorkspaceType::Group]),
            ),
        }
    }

    /// # Errors
    /// Bad request for invalid parameters; not found for an unknown workspace.
    pub fn get(
        &self,
        project_id: &str,
        patch_release_version: Option<&str>,
        workspace_id: &str,
    ) -> Result<Workspace> {
        let spec = self.spec(workspace_id, patch_release_version)?;
        execute_with_logging(
            &format!("getting {spec} for project {project_id}"),
            || self.workspace_api.get_workspace(project_id, &spec),
        )
    }

    /// # Errors
    /// Bad request for invalid parameters; not found for an unknown workspace.
    pub fn is_outdated(
        &self,
        project_id: &str,
        patch_release_version: Option<&str>,
        workspace_id: &str,
    ) -> Result<bool> {
        let spec = self.spec(workspace_id, patch_release_version)?;
        execute_with_logging(
            &format!("checking if {spec} of project {project_id} is outdated"),
            || self.workspace_api.is_workspace_outdated(project_id, &spec),
        )
    }

    /// # Errors
    /// Bad request for invalid parameters; not found for an unknown workspace.
    pub fn is_in_conflict_resolution_mode(
        &self,
        project_id: &str,
        patch_release_version: Option<&str>,
        workspace_id: &str,
    ) -> Result<bool> {
        let spec = self.spec(workspace_id, patch_release_version)?;
        execute_with_logging(
            &format!("checking if {spec} of project {project_id} is in conflict resolution mode"),
            || {
                self.workspace_api
                    .is_workspace_in_conflict_resolution_mode(project_id, &spec)
            },
        )
    }

    /// # Errors
    /// Bad request for invalid parameters; not found for an unknown project
    /// or patch stream; conflict if the workspace exists.
    pub fn create(
        &self,
        project_id: &str,
        patch_release_version: Option<&str>,
        workspace_id: &str,
    ) -> Result<Workspace> {
        let spec = self.spec(workspace_id, patch_release_version)?;
        execute_with_logging(
            &format!("creating new {spec} for project {project_id}"),
            || self.workspace_api.new_workspace(project_id, &spec),
        )
    }

    /// # Errors
    /// Bad request for invalid parameters; not found for an unknown workspace.
    pub fn delete(
        &self,
        project_id: &str,
        patch_release_version: Option<&str>,
        workspace_id: &str,
    ) -> Result<()> {
        let spec = self.spec(workspace_id, patch_release_version)?;
        execute_with_logging(
            &format!("deleting {spec} for project {project_id}"),
            || self.workspace_api.delete_workspace(project_id, &spec),
        )
    }

    /// # Errors
    /// Bad request for invalid parameters; not found for an unknown workspace;
    /// conflict if the workspace is already in conflict resolution mode.
    pub fn update(
        &self,
        project_id: &str,
        patch_release_version: Option<&str>,
        workspace_id: &str,
    ) -> Result<WorkspaceUpdateReport> {
        let spec = self.spec(workspace_id, patch_release_version)?;
        execute_with_logging(
            &format!("updating {spec} in project {project_id} to latest revision"),
            || self.workspace_api.update_workspace(project_id, &spec),
        )
    }
}
