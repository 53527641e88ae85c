//! In-memory branch-store backend.
//!
//! Each project keeps its development streams as revision histories, its
//! released versions, its reviews, and a map of workspace branches keyed by
//! the encoded branch name. Nothing else indexes workspaces: listing parses
//! the branch names back, exactly as a git-hosted backend would.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use sdlc_core::naming::is_valid_entity_path;
use sdlc_core::{
    DevelopmentStream, VersionId, WorkspaceAccessType, WorkspaceSpecification, WorkspaceType,
    parse_workspace_branch_name, workspace_branch_name,
};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::api::{
    BackupApi, Comparison, ComparisonApi, DependenciesApi, EntityChangeType, EntityDiff,
    ProjectConfiguration, ProjectConfigurationApi, ProjectDependency, Review, Revision, RevisionId,
    Workspace, WorkspaceApi, WorkspaceUpdateReport,
};
use crate::error::{Result, SdlcError};

/// Project structure version reported when none is configured.
pub const DEFAULT_LATEST_PROJECT_STRUCTURE_VERSION: u32 = 13;

const DEFAULT_AUTHOR: &str = "sdlc";

type Entities = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Changes
// ---------------------------------------------------------------------------

/// One edit applied by [`InMemoryBackend::commit_to_stream`] or
/// [`InMemoryBackend::commit_to_workspace`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Change {
    /// Create or overwrite an entity.
    Put { path: String, content: String },
    /// Remove an existing entity.
    Delete { path: String },
    /// Replace the project's declared dependencies.
    Dependencies(BTreeSet<ProjectDependency>),
}

impl Change {
    #[must_use]
    pub fn put(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Put {
            path: path.into(),
            content: content.into(),
        }
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::Delete { path: path.into() }
    }

    #[must_use]
    pub fn dependencies(dependencies: impl IntoIterator<Item = ProjectDependency>) -> Self {
        Self::Dependencies(dependencies.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
struct Snapshot {
    revision: Revision,
    entities: Entities,
    configuration: ProjectConfiguration,
}

/// A workspace branch: the stream revision it was cut from plus its own
/// commits, newest last.
#[derive(Clone, Debug)]
struct Branch {
    base: Snapshot,
    commits: Vec<Snapshot>,
}

impl Branch {
    const fn fresh(base: Snapshot) -> Self {
        Self {
            base,
            commits: Vec::new(),
        }
    }

    fn head(&self) -> &Snapshot {
        self.commits.last().unwrap_or(&self.base)
    }

    fn find(&self, revision_id: &str) -> Option<&Snapshot> {
        std::iter::once(&self.base)
            .chain(&self.commits)
            .find(|s| s.revision.id.as_str() == revision_id)
    }
}

#[derive(Clone, Debug)]
struct ReviewRecord {
    review: Review,
    from: Snapshot,
    to: Snapshot,
}

#[derive(Debug, Default)]
struct ProjectState {
    /// Always contains [`DevelopmentStream::Project`]; histories are never empty.
    streams: BTreeMap<DevelopmentStream, Vec<Snapshot>>,
    versions: BTreeMap<VersionId, Snapshot>,
    branches: BTreeMap<String, Branch>,
    reviews: BTreeMap<String, ReviewRecord>,
}

impl ProjectState {
    fn history(&self, project_id: &str, stream: &DevelopmentStream) -> Result<&Vec<Snapshot>> {
        self.streams
            .get(stream)
            .filter(|history| !history.is_empty())
            .ok_or_else(|| unknown_stream(project_id, stream))
    }

    fn head(&self, project_id: &str, stream: &DevelopmentStream) -> Result<&Snapshot> {
        self.history(project_id, stream)?
            .last()
            .ok_or_else(|| unknown_stream(project_id, stream))
    }

    fn branch(&self, name: &str, spec: &WorkspaceSpecification) -> Result<&Branch> {
        self.branches
            .get(name)
            .ok_or_else(|| SdlcError::not_found(format!("unknown {spec}")))
    }

    fn version(&self, project_id: &str, version: &VersionId) -> Result<&Snapshot> {
        self.versions.get(version).ok_or_else(|| {
            SdlcError::not_found(format!(
                "version {version} of project {project_id} does not exist"
            ))
        })
    }

    fn review(
        &self,
        project_id: &str,
        stream: &DevelopmentStream,
        review_id: &str,
    ) -> Result<&ReviewRecord> {
        self.reviews
            .get(review_id)
            .filter(|record| record.review.target == *stream)
            .ok_or_else(|| {
                SdlcError::not_found(format!(
                    "unknown review {review_id} in project {project_id} for {stream}"
                ))
            })
    }
}

#[derive(Debug, Default)]
struct State {
    projects: BTreeMap<String, ProjectState>,
    /// Mixed into every revision id so identical commits stay distinct.
    sequence: u64,
}

impl State {
    fn project(&self, project_id: &str) -> Result<&ProjectState> {
        self.projects
            .get(project_id)
            .ok_or_else(|| unknown_project(project_id))
    }

    fn project_mut(&mut self, project_id: &str) -> Result<&mut ProjectState> {
        self.projects
            .get_mut(project_id)
            .ok_or_else(|| unknown_project(project_id))
    }

    fn commit(
        &mut self,
        parent: Option<&Snapshot>,
        message: &str,
        author: &str,
        entities: Entities,
        configuration: ProjectConfiguration,
    ) -> Snapshot {
        self.sequence += 1;
        let id = revision_id(
            parent.map(|p| &p.revision.id),
            self.sequence,
            message,
            &entities,
        );
        Snapshot {
            revision: Revision {
                id,
                message: message.to_owned(),
                author: author.to_owned(),
            },
            entities,
            configuration,
        }
    }
}

fn unknown_project(project_id: &str) -> SdlcError {
    SdlcError::not_found(format!("unknown project: {project_id}"))
}

fn unknown_stream(project_id: &str, stream: &DevelopmentStream) -> SdlcError {
    match stream.patch_version() {
        Some(version) => SdlcError::not_found(format!(
            "patch release version {version} does not exist for project {project_id}"
        )),
        None => unknown_project(project_id),
    }
}

fn unknown_revision(revision_id: &str, location: &dyn std::fmt::Display) -> SdlcError {
    SdlcError::not_found(format!("unknown revision {revision_id} in {location}"))
}

/// SHA-256 over the parent id, sequence number, message, and entities,
/// truncated to 40 hex characters.
fn revision_id(
    parent: Option<&RevisionId>,
    sequence: u64,
    message: &str,
    entities: &Entities,
) -> RevisionId {
    let mut hasher = Sha256::new();
    if let Some(parent) = parent {
        hasher.update(parent.as_str());
    }
    hasher.update(sequence.to_be_bytes());
    hasher.update(message);
    for (path, content) in entities {
        hasher.update(path);
        hasher.update([0]);
        hasher.update(content);
        hasher.update([0]);
    }
    let mut hex = format!("{:x}", hasher.finalize());
    hex.truncate(40);
    RevisionId::from_hex(hex)
}

fn apply_changes(
    changes: &[Change],
    entities: &mut Entities,
    configuration: &mut ProjectConfiguration,
) -> Result<()> {
    for change in changes {
        match change {
            Change::Put { path, content } => {
                if !is_valid_entity_path(path) {
                    return Err(SdlcError::bad_request(format!("invalid entity path: {path}")));
                }
                entities.insert(path.clone(), content.clone());
            }
            Change::Delete { path } => {
                if entities.remove(path).is_none() {
                    return Err(SdlcError::bad_request(format!(
                        "entity {path} does not exist"
                    )));
                }
            }
            Change::Dependencies(dependencies) => {
                configuration.project_dependencies.clone_from(dependencies);
            }
        }
    }
    Ok(())
}

/// Per-path changes from `base` to `target`: `Some(content)` for a create or
/// modify, `None` for a delete.
fn entity_changes(base: &Entities, target: &Entities) -> BTreeMap<String, Option<String>> {
    let mut changes: BTreeMap<String, Option<String>> = target
        .iter()
        .filter(|(path, content)| base.get(*path) != Some(*content))
        .map(|(path, content)| (path.clone(), Some(content.clone())))
        .collect();
    for path in base.keys().filter(|path| !target.contains_key(*path)) {
        changes.insert(path.clone(), None);
    }
    changes
}

fn compare(from: &Snapshot, to: &Snapshot) -> Comparison {
    let entity_diffs = entity_changes(&from.entities, &to.entities)
        .into_iter()
        .map(|(entity_path, content)| {
            let change_type = match content {
                None => EntityChangeType::Delete,
                Some(_) if from.entities.contains_key(&entity_path) => EntityChangeType::Modify,
                Some(_) => EntityChangeType::Create,
            };
            EntityDiff {
                entity_path,
                change_type,
            }
        })
        .collect();
    Comparison {
        from_revision_id: from.revision.id.clone(),
        to_revision_id: to.revision.id.clone(),
        entity_diffs,
        project_configuration_updated: from.configuration != to.configuration,
    }
}

// ---------------------------------------------------------------------------
// InMemoryBackend
// ---------------------------------------------------------------------------

/// A thread-safe backend holding all state in memory.
///
/// Projects, versions, and patch streams are created through the fixture
/// methods ([`create_project`](Self::create_project),
/// [`create_version`](Self::create_version),
/// [`create_patch`](Self::create_patch)); workspaces through the API traits.
#[derive(Debug)]
pub struct InMemoryBackend {
    current_user: Option<String>,
    latest_project_structure_version: u32,
    state: Mutex<State>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    /// An empty backend with no current user.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current_user: None,
            latest_project_structure_version: DEFAULT_LATEST_PROJECT_STRUCTURE_VERSION,
            state: Mutex::new(State::default()),
        }
    }

    /// The user that owns USER workspaces whose specification names no owner.
    #[must_use]
    pub fn with_current_user(mut self, user: impl Into<String>) -> Self {
        self.current_user = Some(user.into());
        self
    }

    #[must_use]
    pub const fn with_latest_project_structure_version(mut self, version: u32) -> Self {
        self.latest_project_structure_version = version;
        self
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&str> {
        self.current_user.as_deref()
    }

    fn state(&self) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| SdlcError::internal("in-memory backend state lock poisoned"))
    }

    fn author(&self) -> &str {
        self.current_user.as_deref().unwrap_or(DEFAULT_AUTHOR)
    }

    /// Encode the branch name for `spec` and decode it back, yielding the
    /// specification with its owner resolved.
    fn locate(
        &self,
        project_id: &str,
        spec: &WorkspaceSpecification,
    ) -> Result<(String, WorkspaceSpecification)> {
        let name = workspace_branch_name(spec, || self.current_user.clone())?;
        let resolved = parse_workspace_branch_name(project_id, &name).ok_or_else(|| {
            SdlcError::internal(format!("branch name {name:?} for {spec} does not decode"))
        })?;
        Ok((name, resolved))
    }

    fn list(
        &self,
        project_id: &str,
        stream: &DevelopmentStream,
        types: &[WorkspaceType],
        owner: Option<&str>,
    ) -> Result<Vec<Workspace>> {
        let state = self.state()?;
        let project = state.project(project_id)?;
        project.history(project_id, stream)?;
        let workspaces = project
            .branches
            .keys()
            .filter_map(|name| parse_workspace_branch_name(project_id, name))
            .filter(|spec| {
                spec.development_stream() == stream
                    && spec.access_type() == WorkspaceAccessType::Workspace
                    && types.contains(&spec.workspace_type())
            })
            .filter(|spec| match (spec.workspace_type(), owner) {
                (WorkspaceType::User, Some(owner)) => spec.user_id() == Some(owner),
                _ => true,
            })
            .map(|specification| Workspace {
                project_id: project_id.to_owned(),
                specification,
            })
            .collect();
        Ok(workspaces)
    }

    fn with_branch<T>(
        &self,
        project_id: &str,
        spec: &WorkspaceSpecification,
        f: impl FnOnce(&ProjectState, &Branch) -> Result<T>,
    ) -> Result<T> {
        let (name, resolved) = self.locate(project_id, spec)?;
        let state = self.state()?;
        let project = state.project(project_id)?;
        f(project, project.branch(&name, &resolved)?)
    }

    // -- fixtures --

    /// Create a project whose main line holds a single, empty revision.
    ///
    /// # Errors
    /// Returns [`SdlcError::Conflict`] if the project already exists.
    pub fn create_project(
        &self,
        project_id: &str,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<Revision> {
        let mut state = self.state()?;
        if state.projects.contains_key(project_id) {
            return Err(SdlcError::conflict(format!(
                "project {project_id} already exists"
            )));
        }
        let configuration = ProjectConfiguration {
            project_id: project_id.to_owned(),
            project_structure_version: self.latest_project_structure_version,
            group_id: group_id.to_owned(),
            artifact_id: artifact_id.to_owned(),
            project_dependencies: BTreeSet::new(),
        };
        let initial = state.commit(
            None,
            "initial project configuration",
            self.author(),
            Entities::new(),
            configuration,
        );
        let revision = initial.revision.clone();
        let mut project = ProjectState::default();
        project.streams.insert(DevelopmentStream::Project, vec![initial]);
        state.projects.insert(project_id.to_owned(), project);
        info!(project = project_id, revision = revision.id.short(), "created project");
        Ok(revision)
    }

    /// Release the current head of the main line as `version`.
    ///
    /// # Errors
    /// Returns [`SdlcError::NotFound`] for an unknown project and
    /// [`SdlcError::Conflict`] if the version was already released.
    pub fn create_version(&self, project_id: &str, version: VersionId) -> Result<Revision> {
        let mut state = self.state()?;
        let project = state.project_mut(project_id)?;
        if project.versions.contains_key(&version) {
            return Err(SdlcError::conflict(format!(
                "version {version} of project {project_id} already exists"
            )));
        }
        let head = project.head(project_id, &DevelopmentStream::Project)?.clone();
        let revision = head.revision.clone();
        project.versions.insert(version, head);
        info!(project = project_id, %version, "released version");
        Ok(revision)
    }

    /// Open a patch stream starting from released `version`.
    ///
    /// # Errors
    /// Returns [`SdlcError::NotFound`] if the project or version does not
    /// exist and [`SdlcError::Conflict`] if the patch stream already exists.
    pub fn create_patch(&self, project_id: &str, version: VersionId) -> Result<Revision> {
        let mut state = self.state()?;
        let project = state.project_mut(project_id)?;
        let stream = DevelopmentStream::Patch(version);
        if project.streams.contains_key(&stream) {
            return Err(SdlcError::conflict(format!(
                "patch release version {version} already exists for project {project_id}"
            )));
        }
        let released = project.version(project_id, &version)?.clone();
        let revision = released.revision.clone();
        project.streams.insert(stream, vec![released]);
        info!(project = project_id, %version, "created patch stream");
        Ok(revision)
    }

    /// Commit `changes` to the head of a development stream.
    ///
    /// # Errors
    /// Returns [`SdlcError::NotFound`] for an unknown project or stream and
    /// [`SdlcError::BadRequest`] for an invalid change.
    pub fn commit_to_stream(
        &self,
        project_id: &str,
        stream: &DevelopmentStream,
        message: &str,
        changes: &[Change],
    ) -> Result<Revision> {
        let author = self.author();
        let mut state = self.state()?;
        let head = state.project(project_id)?.head(project_id, stream)?.clone();
        let mut entities = head.entities.clone();
        let mut configuration = head.configuration.clone();
        apply_changes(changes, &mut entities, &mut configuration)?;
        let snapshot = state.commit(Some(&head), message, author, entities, configuration);
        let revision = snapshot.revision.clone();
        state
            .project_mut(project_id)?
            .streams
            .entry(*stream)
            .or_default()
            .push(snapshot);
        Ok(revision)
    }

    /// Commit `changes` to the head of a workspace of any access type.
    ///
    /// # Errors
    /// Returns [`SdlcError::NotFound`] for an unknown project or workspace and
    /// [`SdlcError::BadRequest`] for an invalid change.
    pub fn commit_to_workspace(
        &self,
        project_id: &str,
        spec: &WorkspaceSpecification,
        message: &str,
        changes: &[Change],
    ) -> Result<Revision> {
        let author = self.author();
        let (name, resolved) = self.locate(project_id, spec)?;
        let mut state = self.state()?;
        let head = state
            .project(project_id)?
            .branch(&name, &resolved)?
            .head()
            .clone();
        let mut entities = head.entities.clone();
        let mut configuration = head.configuration.clone();
        apply_changes(changes, &mut entities, &mut configuration)?;
        let snapshot = state.commit(Some(&head), message, author, entities, configuration);
        let revision = snapshot.revision.clone();
        if let Some(branch) = state.project_mut(project_id)?.branches.get_mut(&name) {
            branch.commits.push(snapshot);
        }
        Ok(revision)
    }

    /// Open a review of a live workspace against its stream.
    ///
    /// # Errors
    /// Returns [`SdlcError::NotFound`] for an unknown project or workspace.
    pub fn open_review(&self, project_id: &str, spec: &WorkspaceSpecification) -> Result<Review> {
        let live = spec.clone().with_access_type(WorkspaceAccessType::Workspace);
        let (name, resolved) = self.locate(project_id, &live)?;
        let mut state = self.state()?;
        let project = state.project_mut(project_id)?;
        let branch = project.branch(&name, &resolved)?;
        let (from, to) = (branch.base.clone(), branch.head().clone());
        let review = Review {
            id: (project.reviews.len() + 1).to_string(),
            project_id: project_id.to_owned(),
            target: *resolved.development_stream(),
            workspace: resolved,
        };
        project.reviews.insert(
            review.id.clone(),
            ReviewRecord {
                review: review.clone(),
                from,
                to,
            },
        );
        info!(project = project_id, review = %review.id, branch = %name, "opened review");
        Ok(review)
    }
}

// ---------------------------------------------------------------------------
// WorkspaceApi
// ---------------------------------------------------------------------------

impl WorkspaceApi for InMemoryBackend {
    fn get_workspaces(
        &self,
        project_id: &str,
        stream: &DevelopmentStream,
        types: &[WorkspaceType],
    ) -> Result<Vec<Workspace>> {
        match self.current_user.as_deref() {
            Some(user) => self.list(project_id, stream, types, Some(user)),
            None => {
                let groups: Vec<_> = types
                    .iter()
                    .copied()
                    .filter(|t| *t == WorkspaceType::Group)
                    .collect();
                self.list(project_id, stream, &groups, None)
            }
        }
    }

    fn get_all_workspaces(
        &self,
        project_id: &str,
        stream: &DevelopmentStream,
        types: &[WorkspaceType],
    ) -> Result<Vec<Workspace>> {
        self.list(project_id, stream, types, None)
    }

    fn get_workspace(&self, project_id: &str, spec: &WorkspaceSpecification) -> Result<Workspace> {
        let (name, resolved) = self.locate(project_id, spec)?;
        let state = self.state()?;
        state.project(project_id)?.branch(&name, &resolved)?;
        Ok(Workspace {
            project_id: project_id.to_owned(),
            specification: resolved,
        })
    }

    fn is_workspace_outdated(
        &self,
        project_id: &str,
        spec: &WorkspaceSpecification,
    ) -> Result<bool> {
        self.with_branch(project_id, spec, |project, branch| {
            let head = project.head(project_id, spec.development_stream())?;
            Ok(branch.base.revision.id != head.revision.id)
        })
    }

    fn is_workspace_in_conflict_resolution_mode(
        &self,
        project_id: &str,
        spec: &WorkspaceSpecification,
    ) -> Result<bool> {
        let live = spec.clone().with_access_type(WorkspaceAccessType::Workspace);
        let resolution = spec
            .clone()
            .with_access_type(WorkspaceAccessType::ConflictResolution);
        let (resolution_name, _) = self.locate(project_id, &resolution)?;
        self.with_branch(project_id, &live, |project, _| {
            Ok(project.branches.contains_key(&resolution_name))
        })
    }

    fn new_workspace(&self, project_id: &str, spec: &WorkspaceSpecification) -> Result<Workspace> {
        if spec.access_type() != WorkspaceAccessType::Workspace {
            return Err(SdlcError::bad_request(format!(
                "cannot create a {} directly",
                spec.access_type()
            )));
        }
        let (name, resolved) = self.locate(project_id, spec)?;
        let mut state = self.state()?;
        let project = state.project_mut(project_id)?;
        if project.branches.contains_key(&name) {
            return Err(SdlcError::conflict(format!(
                "{resolved} already exists in project {project_id}"
            )));
        }
        let head = project.head(project_id, resolved.development_stream())?.clone();
        project.branches.insert(name.clone(), Branch::fresh(head));
        info!(project = project_id, branch = %name, "created workspace");
        Ok(Workspace {
            project_id: project_id.to_owned(),
            specification: resolved,
        })
    }

    fn delete_workspace(&self, project_id: &str, spec: &WorkspaceSpecification) -> Result<()> {
        let (name, resolved) = self.locate(project_id, spec)?;
        let resolution_name = if resolved.access_type() == WorkspaceAccessType::Workspace {
            let resolution = resolved
                .clone()
                .with_access_type(WorkspaceAccessType::ConflictResolution);
            Some(self.locate(project_id, &resolution)?.0)
        } else {
            None
        };
        let mut state = self.state()?;
        let project = state.project_mut(project_id)?;
        if project.branches.remove(&name).is_none() {
            return Err(SdlcError::not_found(format!("unknown {resolved}")));
        }
        // The backup survives so the workspace can still be recovered.
        if let Some(resolution_name) = resolution_name
            && project.branches.remove(&resolution_name).is_some()
        {
            info!(project = project_id, branch = %resolution_name, "deleted conflict resolution");
        }
        info!(project = project_id, branch = %name, "deleted workspace");
        Ok(())
    }

    fn update_workspace(
        &self,
        project_id: &str,
        spec: &WorkspaceSpecification,
    ) -> Result<WorkspaceUpdateReport> {
        if spec.access_type() != WorkspaceAccessType::Workspace {
            return Err(SdlcError::bad_request(format!(
                "cannot update a {}",
                spec.access_type()
            )));
        }
        let author = self.author();
        let (name, resolved) = self.locate(project_id, spec)?;
        let (backup_name, _) = self.locate(
            project_id,
            &resolved.clone().with_access_type(WorkspaceAccessType::Backup),
        )?;
        let (resolution_name, _) = self.locate(
            project_id,
            &resolved
                .clone()
                .with_access_type(WorkspaceAccessType::ConflictResolution),
        )?;

        let mut state = self.state()?;
        let project = state.project(project_id)?;
        let branch = project.branch(&name, &resolved)?.clone();
        if project.branches.contains_key(&resolution_name) {
            return Err(SdlcError::conflict(format!(
                "{resolved} is in conflict resolution mode"
            )));
        }
        let head = project.head(project_id, resolved.development_stream())?.clone();
        if branch.base.revision.id == head.revision.id {
            return Ok(WorkspaceUpdateReport::NoOp);
        }

        let ours = branch.head();
        let workspace_changes = entity_changes(&branch.base.entities, &ours.entities);
        let stream_changes = entity_changes(&branch.base.entities, &head.entities);
        let conflicting_paths: Vec<String> = workspace_changes
            .iter()
            .filter(|(path, change)| {
                stream_changes
                    .get(*path)
                    .is_some_and(|theirs| theirs != *change)
            })
            .map(|(path, _)| path.clone())
            .collect();

        let mut entities = head.entities.clone();
        for (path, change) in &workspace_changes {
            if conflicting_paths.contains(path) {
                continue;
            }
            match change {
                Some(content) => entities.insert(path.clone(), content.clone()),
                None => entities.remove(path),
            };
        }
        let configuration_changed = ours.configuration != branch.base.configuration;
        let configuration = if configuration_changed {
            ours.configuration.clone()
        } else {
            head.configuration.clone()
        };

        if !conflicting_paths.is_empty() {
            let merged = state.commit(
                Some(&head),
                "apply non-conflicting workspace changes",
                author,
                entities,
                configuration,
            );
            let resolution = Branch {
                base: head,
                commits: vec![merged],
            };
            state
                .project_mut(project_id)?
                .branches
                .insert(resolution_name.clone(), resolution);
            warn!(
                project = project_id,
                branch = %name,
                resolution = %resolution_name,
                conflicts = conflicting_paths.len(),
                "workspace update has conflicts"
            );
            return Ok(WorkspaceUpdateReport::Conflict { conflicting_paths });
        }

        let updated = if workspace_changes.is_empty() && !configuration_changed {
            Branch::fresh(head)
        } else {
            let replayed = state.commit(
                Some(&head),
                "replay workspace changes",
                author,
                entities,
                configuration,
            );
            Branch {
                base: head,
                commits: vec![replayed],
            }
        };
        let revision_id = updated.head().revision.id.clone();
        let project = state.project_mut(project_id)?;
        project.branches.insert(backup_name.clone(), branch);
        project.branches.insert(name.clone(), updated);
        info!(
            project = project_id,
            branch = %name,
            backup = %backup_name,
            revision = revision_id.short(),
            "updated workspace"
        );
        Ok(WorkspaceUpdateReport::Updated { revision_id })
    }
}

// ---------------------------------------------------------------------------
// BackupApi
// ---------------------------------------------------------------------------

impl BackupApi for InMemoryBackend {
    fn discard_backup_workspace(
        &self,
        project_id: &str,
        spec: &WorkspaceSpecification,
    ) -> Result<()> {
        let backup = spec.clone().with_access_type(WorkspaceAccessType::Backup);
        let (name, resolved) = self.locate(project_id, &backup)?;
        let mut state = self.state()?;
        if state.project_mut(project_id)?.branches.remove(&name).is_none() {
            return Err(SdlcError::not_found(format!("unknown {resolved}")));
        }
        info!(project = project_id, branch = %name, "discarded backup");
        Ok(())
    }

    fn recover_backup_workspace(
        &self,
        project_id: &str,
        spec: &WorkspaceSpecification,
        force: bool,
    ) -> Result<()> {
        let (live_name, live) = self.locate(
            project_id,
            &spec.clone().with_access_type(WorkspaceAccessType::Workspace),
        )?;
        let (backup_name, backup) = self.locate(
            project_id,
            &spec.clone().with_access_type(WorkspaceAccessType::Backup),
        )?;
        let mut state = self.state()?;
        let project = state.project_mut(project_id)?;
        project.branch(&backup_name, &backup)?;
        if !force && project.branches.contains_key(&live_name) {
            return Err(SdlcError::conflict(format!(
                "{live} already exists; recover with force to overwrite it"
            )));
        }
        if let Some(restored) = project.branches.remove(&backup_name) {
            project.branches.insert(live_name.clone(), restored);
        }
        info!(project = project_id, branch = %live_name, force, "recovered workspace from backup");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ComparisonApi
// ---------------------------------------------------------------------------

impl ComparisonApi for InMemoryBackend {
    fn get_workspace_creation_comparison(
        &self,
        project_id: &str,
        spec: &WorkspaceSpecification,
    ) -> Result<Comparison> {
        self.with_branch(project_id, spec, |_, branch| {
            Ok(compare(&branch.base, branch.head()))
        })
    }

    fn get_workspace_project_comparison(
        &self,
        project_id: &str,
        spec: &WorkspaceSpecification,
    ) -> Result<Comparison> {
        self.with_branch(project_id, spec, |project, branch| {
            let head = project.head(project_id, spec.development_stream())?;
            Ok(compare(head, branch.head()))
        })
    }

    fn get_review_comparison(
        &self,
        project_id: &str,
        stream: &DevelopmentStream,
        review_id: &str,
    ) -> Result<Comparison> {
        let state = self.state()?;
        let project = state.project(project_id)?;
        let record = project.review(project_id, stream, review_id)?;
        Ok(compare(project.head(project_id, stream)?, &record.to))
    }

    fn get_review_workspace_creation_comparison(
        &self,
        project_id: &str,
        stream: &DevelopmentStream,
        review_id: &str,
    ) -> Result<Comparison> {
        let state = self.state()?;
        let record = state.project(project_id)?.review(project_id, stream, review_id)?;
        Ok(compare(&record.from, &record.to))
    }
}

// ---------------------------------------------------------------------------
// DependenciesApi
// ---------------------------------------------------------------------------

impl DependenciesApi for InMemoryBackend {
    fn get_workspace_revision_upstream_projects(
        &self,
        project_id: &str,
        spec: &WorkspaceSpecification,
        revision_id: &str,
        transitive: bool,
    ) -> Result<BTreeSet<ProjectDependency>> {
        let (name, resolved) = self.locate(project_id, spec)?;
        let state = self.state()?;
        let direct = state
            .project(project_id)?
            .branch(&name, &resolved)?
            .find(revision_id)
            .ok_or_else(|| unknown_revision(revision_id, &resolved))?
            .configuration
            .project_dependencies
            .clone();
        if !transitive {
            return Ok(direct);
        }

        let mut visited = BTreeSet::new();
        let mut pending: Vec<ProjectDependency> = direct.into_iter().collect();
        while let Some(dependency) = pending.pop() {
            if visited.contains(&dependency) {
                continue;
            }
            let upstream = state
                .project(&dependency.project_id)?
                .version(&dependency.project_id, &dependency.version_id)?;
            pending.extend(upstream.configuration.project_dependencies.iter().cloned());
            visited.insert(dependency);
        }
        Ok(visited)
    }
}

// ---------------------------------------------------------------------------
// ProjectConfigurationApi
// ---------------------------------------------------------------------------

impl ProjectConfigurationApi for InMemoryBackend {
    fn get_project_configuration(
        &self,
        project_id: &str,
        stream: &DevelopmentStream,
    ) -> Result<ProjectConfiguration> {
        let state = self.state()?;
        let head = state.project(project_id)?.head(project_id, stream)?;
        Ok(head.configuration.clone())
    }

    fn get_project_revision_configuration(
        &self,
        project_id: &str,
        stream: &DevelopmentStream,
        revision_id: &str,
    ) -> Result<ProjectConfiguration> {
        let state = self.state()?;
        state
            .project(project_id)?
            .history(project_id, stream)?
            .iter()
            .find(|s| s.revision.id.as_str() == revision_id)
            .map(|s| s.configuration.clone())
            .ok_or_else(|| unknown_revision(revision_id, &format!("{stream} of {project_id}")))
    }

    fn get_workspace_configuration(
        &self,
        project_id: &str,
        spec: &WorkspaceSpecification,
    ) -> Result<ProjectConfiguration> {
        self.with_branch(project_id, spec, |_, branch| {
            Ok(branch.head().configuration.clone())
        })
    }

    fn get_workspace_revision_configuration(
        &self,
        project_id: &str,
        spec: &WorkspaceSpecification,
        revision_id: &str,
    ) -> Result<ProjectConfiguration> {
        self.with_branch(project_id, spec, |_, branch| {
            branch
                .find(revision_id)
                .map(|s| s.configuration.clone())
                .ok_or_else(|| unknown_revision(revision_id, spec))
        })
    }

    fn get_version_configuration(
        &self,
        project_id: &str,
        version: &VersionId,
    ) -> Result<ProjectConfiguration> {
        let state = self.state()?;
        let snapshot = state.project(project_id)?.version(project_id, version)?;
        Ok(snapshot.configuration.clone())
    }

    fn get_review_from_configuration(
        &self,
        project_id: &str,
        stream: &DevelopmentStream,
        review_id: &str,
    ) -> Result<ProjectConfiguration> {
        let state = self.state()?;
        let record = state.project(project_id)?.review(project_id, stream, review_id)?;
        Ok(record.from.configuration.clone())
    }

    fn get_review_to_configuration(
        &self,
        project_id: &str,
        stream: &DevelopmentStream,
        review_id: &str,
    ) -> Result<ProjectConfiguration> {
        let state = self.state()?;
        let record = state.project(project_id)?.review(project_id, stream, review_id)?;
        Ok(record.to.configuration.clone())
    }

    fn get_latest_project_structure_version(&self) -> u32 {
        self.latest_project_structure_version
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
