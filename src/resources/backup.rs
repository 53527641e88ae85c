use std::sync::Arc;

use sdlc_core::{WorkspaceAccessType, WorkspaceSpecification, WorkspaceType};

use super::{execute_with_logging, patch_stream, workspace_spec};
use crate::api::{BackupApi, ProjectConfiguration, ProjectConfigurationApi, Workspace, WorkspaceApi};
use crate::error::Result;

/// Backup of a patch stream workspace:
/// `.../patches/{version}/workspaces/{workspace}/backup` and its
/// `groupWorkspaces` counterpart.
#[derive(Clone)]
pub struct PatchBackupResource {
    workspace_api: Arc<dyn WorkspaceApi>,
    backup_api: Arc<dyn BackupApi>,
    configuration_api: Arc<dyn ProjectConfigurationApi>,
    workspace_type: WorkspaceType,
}

impl PatchBackupResource {
    #[must_use]
    pub fn user(
        workspace_api: Arc<dyn WorkspaceApi>,
        backup_api: Arc<dyn BackupApi>,
        configuration_api: Arc<dyn ProjectConfigurationApi>,
    ) -> Self {
        Self {
            workspace_api,
            backup_api,
            configuration_api,
            workspace_type: WorkspaceType::User,
        }
    }

    #[must_use]
    pub fn group(
        workspace_api: Arc<dyn WorkspaceApi>,
        backup_api: Arc<dyn BackupApi>,
        configuration_api: Arc<dyn ProjectConfigurationApi>,
    ) -> Self {
        Self {
            workspace_api,
            backup_api,
            configuration_api,
            workspace_type: WorkspaceType::Group,
        }
    }

    fn backup_spec(
        &self,
        workspace_id: &str,
        patch_release_version: Option<&str>,
    ) -> Result<WorkspaceSpecification> {
        workspace_spec(
            workspace_id,
            self.workspace_type,
            WorkspaceAccessType::Backup,
            patch_stream(patch_release_version)?,
        )
    }

    /// # Errors
    /// Bad request for invalid parameters; not found if there is no backup.
    pub fn get(
        &self,
        project_id: &str,
        patch_release_version: Option<&str>,
        workspace_id: &str,
    ) -> Result<Workspace> {
        let spec = self.backup_spec(workspace_id, patch_release_version)?;
        execute_with_logging(
            &format!("getting {spec} for project {project_id}"),
            || self.workspace_api.get_workspace(project_id, &spec),
        )
    }

    /// # Errors
    /// Bad request for invalid parameters; not found if there is no backup.
    pub fn is_outdated(
        &self,
        project_id: &str,
        patch_release_version: Option<&str>,
        workspace_id: &str,
    ) -> Result<bool> {
        let spec = self.backup_spec(workspace_id, patch_release_version)?;
        execute_with_logging(
            &format!("checking if {spec} of project {project_id} is outdated"),
            || self.workspace_api.is_workspace_outdated(project_id, &spec),
        )
    }

    /// # Errors
    /// Bad request for invalid parameters; not found if there is no backup.
    pub fn discard(
        &self,
        project_id: &str,
        patch_release_version: Option<&str>,
        workspace_id: &str,
    ) -> Result<()> {
        let spec = self.backup_spec(workspace_id, patch_release_version)?;
        execute_with_logging(
            &format!("discarding {spec} in project {project_id}"),
            || self.backup_api.discard_backup_workspace(project_id, &spec),
        )
    }

    /// Restore the backup over the live workspace.
    ///
    /// # Errors
    /// Bad request for invalid parameters; not found if there is no backup;
    /// conflict if the live workspace exists and `force_recovery` is false.
    pub fn recover(
        &self,
        project_id: &str,
        patch_release_version: Option<&str>,
        workspace_id: &str,
        force_recovery: bool,
    ) -> Result<()> {
        let spec = self.backup_spec(workspace_id, patch_release_version)?;
        let live = spec.clone().with_access_type(WorkspaceAccessType::Workspace);
        let force = if force_recovery { "force " } else { "" };
        execute_with_logging(
            &format!("{force}recovering {live} from backup in project {project_id}"),
            || {
                self.backup_api
                    .recover_backup_workspace(project_id, &spec, force_recovery)
            },
        )
    }

    /// # Errors
    /// Bad request for invalid parameters; not found if there is no backup.
    pub fn project_configuration(
        &self,
        project_id: &str,
        patch_release_version: Option<&str>,
        workspace_id: &str,
    ) -> Result<ProjectConfiguration> {
        let spec = self.backup_spec(workspace_id, patch_release_version)?;
        execute_with_logging(
            &format!("getting project {project_id} configuration in {spec}"),
            || self.configuration_api.get_workspace_configuration(project_id, &spec),
        )
    }
}
