//! Core workspace types for legend-sdlc.
//!
//! A [`WorkspaceSpecification`] names one workspace branch: who it belongs to
//! ([`WorkspaceType`]), which lifecycle view of it is meant
//! ([`WorkspaceAccessType`]), and which line of development it tracks
//! ([`DevelopmentStream`]). Specifications are plain values: two are the same
//! workspace exactly when their fields are equal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// WorkspaceType
// ---------------------------------------------------------------------------

/// Who a workspace belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkspaceType {
    /// Scoped to a single user; the user id is part of the branch name.
    User,
    /// Shared by everyone working on the project.
    Group,
}

impl WorkspaceType {
    /// Every workspace type, in declaration order.
    pub const ALL: [Self; 2] = [Self::User, Self::Group];

    /// Lowercase label used in log messages (`"user"` / `"group"`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Group => "group",
        }
    }
}

impl fmt::Display for WorkspaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WorkspaceType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "group" => Ok(Self::Group),
            _ => Err(ValidationError {
                kind: ErrorKind::WorkspaceType,
                value: s.to_owned(),
                reason: "expected one of: user, group".to_owned(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// WorkspaceAccessType
// ---------------------------------------------------------------------------

/// Which lifecycle view of a workspace a branch holds.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkspaceAccessType {
    /// The live workspace.
    #[default]
    Workspace,
    /// The copy kept while a workspace is being rewritten.
    Backup,
    /// The workspace rebuilt on the latest revision while conflicts are fixed.
    ConflictResolution,
}

impl WorkspaceAccessType {
    /// Every access type, in declaration order.
    pub const ALL: [Self; 3] = [Self::Workspace, Self::Backup, Self::ConflictResolution];

    /// Lowercase label used in log messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Workspace => "workspace",
            Self::Backup => "backup",
            Self::ConflictResolution => "conflict resolution",
        }
    }
}

impl fmt::Display for WorkspaceAccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WorkspaceAccessType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "workspace" => Ok(Self::Workspace),
            "backup" => Ok(Self::Backup),
            "resolution" | "conflict-resolution" | "conflict_resolution" => {
                Ok(Self::ConflictResolution)
            }
            _ => Err(ValidationError {
                kind: ErrorKind::WorkspaceAccessType,
                value: s.to_owned(),
                reason: "expected one of: workspace, backup, resolution".to_owned(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// VersionId
// ---------------------------------------------------------------------------

/// A `major.minor.patch` release version.
///
/// Each component is non-negative and fits in a signed 32-bit integer. The
/// textual form is strict: digits only, no sign, no leading zeros (a bare `0`
/// is fine), exactly three components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionId {
    major: u32,
    minor: u32,
    patch: u32,
}

impl VersionId {
    /// Largest value any component may take.
    pub const MAX_COMPONENT: u32 = i32::MAX.unsigned_abs();

    /// Create a version from its components.
    ///
    /// # Errors
    /// Returns an error if any component exceeds [`Self::MAX_COMPONENT`].
    pub fn new(major: u32, minor: u32, patch: u32) -> Result<Self, ValidationError> {
        for component in [major, minor, patch] {
            if component > Self::MAX_COMPONENT {
                return Err(ValidationError {
                    kind: ErrorKind::VersionId,
                    value: format!("{major}.{minor}.{patch}"),
                    reason: format!(
                        "component {component} exceeds the maximum of {}",
                        Self::MAX_COMPONENT
                    ),
                });
            }
        }
        Ok(Self {
            major,
            minor,
            patch,
        })
    }

    #[must_use]
    pub const fn major(&self) -> u32 {
        self.major
    }

    #[must_use]
    pub const fn minor(&self) -> u32 {
        self.minor
    }

    #[must_use]
    pub const fn patch(&self) -> u32 {
        self.patch
    }

    fn parse_component(whole: &str, component: &str) -> Result<u32, ValidationError> {
        let invalid = |reason: &str| ValidationError {
            kind: ErrorKind::VersionId,
            value: whole.to_owned(),
            reason: reason.to_owned(),
        };
        if component.is_empty() {
            return Err(invalid("version components must not be empty"));
        }
        if !component.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("version components must contain only digits (0-9)"));
        }
        if component.len() > 1 && component.starts_with('0') {
            return Err(invalid("version components must not have leading zeros"));
        }
        match component.parse::<u32>() {
            Ok(value) if value <= Self::MAX_COMPONENT => Ok(value),
            _ => Err(invalid("version component is out of range")),
        }
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for VersionId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('.');
        let (Some(major), Some(minor), Some(patch), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ValidationError {
                kind: ErrorKind::VersionId,
                value: s.to_owned(),
                reason: "expected exactly three components: major.minor.patch".to_owned(),
            });
        };
        Ok(Self {
            major: Self::parse_component(s, major)?,
            minor: Self::parse_component(s, minor)?,
            patch: Self::parse_component(s, patch)?,
        })
    }
}

impl TryFrom<String> for VersionId {
    type Error = ValidationError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<VersionId> for String {
    fn from(version: VersionId) -> Self {
        version.to_string()
    }
}

// ---------------------------------------------------------------------------
// DevelopmentStream
// ---------------------------------------------------------------------------

/// The line of development a workspace branches from.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(tag = "type", content = "version", rename_all = "snake_case")]
pub enum DevelopmentStream {
    /// The project's main line.
    #[default]
    Project,
    /// A patch release stream for the given version.
    Patch(VersionId),
}

impl DevelopmentStream {
    /// Shorthand for a patch stream.
    #[must_use]
    pub const fn patch(version: VersionId) -> Self {
        Self::Patch(version)
    }

    /// The patch release version, or `None` for the main line.
    #[must_use]
    pub const fn patch_version(&self) -> Option<&VersionId> {
        match self {
            Self::Project => None,
            Self::Patch(version) => Some(version),
        }
    }

    /// Returns `true` for a patch stream.
    #[must_use]
    pub const fn is_patch(&self) -> bool {
        matches!(self, Self::Patch(_))
    }
}

impl From<Option<VersionId>> for DevelopmentStream {
    fn from(version: Option<VersionId>) -> Self {
        version.map_or(Self::Project, Self::Patch)
    }
}

impl fmt::Display for DevelopmentStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Project => write!(f, "project"),
            Self::Patch(version) => write!(f, "patch {version}"),
        }
    }
}

// ---------------------------------------------------------------------------
// WorkspaceId
// ---------------------------------------------------------------------------

/// An opaque, caller-chosen workspace identifier.
///
/// Any non-empty string without a `/` is accepted; the slash is the branch
/// name segment separator.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorkspaceId(String);

impl WorkspaceId {
    /// Create a new `WorkspaceId`, validating format.
    ///
    /// # Errors
    /// Returns an error if the id is empty or contains `/`.
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        Self::validate(s)?;
        Ok(Self(s.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), ValidationError> {
        if s.is_empty() {
            return Err(ValidationError {
                kind: ErrorKind::WorkspaceId,
                value: s.to_owned(),
                reason: "workspace id must not be empty".to_owned(),
            });
        }
        if s.contains('/') {
            return Err(ValidationError {
                kind: ErrorKind::WorkspaceId,
                value: s.to_owned(),
                reason: "workspace id must not contain '/'".to_owned(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for WorkspaceId {
    type Err = ValidationError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for WorkspaceId {
    type Error = ValidationError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::validate(&s)?;
        Ok(Self(s))
    }
}

impl From<WorkspaceId> for String {
    fn from(id: WorkspaceId) -> Self {
        id.0
    }
}

// ---------------------------------------------------------------------------
// WorkspaceSpecification
// ---------------------------------------------------------------------------

/// Everything needed to name one workspace branch.
///
/// A GROUP specification never carries a user id; the constructors and
/// [`with_user_id`](Self::with_user_id) drop it. A USER specification may
/// leave the user id unset, meaning "the current user", which is resolved
/// when the branch name is computed.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct WorkspaceSpecification {
    workspace_id: WorkspaceId,
    workspace_type: WorkspaceType,
    access_type: WorkspaceAccessType,
    development_stream: DevelopmentStream,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
}

impl WorkspaceSpecification {
    /// Create a specification from all of its parts.
    ///
    /// `user_id` is discarded for [`WorkspaceType::Group`].
    #[must_use]
    pub fn new(
        workspace_id: WorkspaceId,
        workspace_type: WorkspaceType,
        access_type: WorkspaceAccessType,
        development_stream: DevelopmentStream,
        user_id: Option<String>,
    ) -> Self {
        let user_id = match workspace_type {
            WorkspaceType::User => user_id,
            WorkspaceType::Group => None,
        };
        Self {
            workspace_id,
            workspace_type,
            access_type,
            development_stream,
            user_id,
        }
    }

    /// A live USER workspace on the main line, owned by the current user.
    #[must_use]
    pub fn user(workspace_id: WorkspaceId) -> Self {
        Self::new(
            workspace_id,
            WorkspaceType::User,
            WorkspaceAccessType::Workspace,
            DevelopmentStream::Project,
            None,
        )
    }

    /// A live GROUP workspace on the main line.
    #[must_use]
    pub fn group(workspace_id: WorkspaceId) -> Self {
        Self::new(
            workspace_id,
            WorkspaceType::Group,
            WorkspaceAccessType::Workspace,
            DevelopmentStream::Project,
            None,
        )
    }

    /// A live USER workspace on a patch stream.
    #[must_use]
    pub fn patch_user(workspace_id: WorkspaceId, version: VersionId) -> Self {
        Self::user(workspace_id).with_development_stream(DevelopmentStream::Patch(version))
    }

    /// A live GROUP workspace on a patch stream.
    #[must_use]
    pub fn patch_group(workspace_id: WorkspaceId, version: VersionId) -> Self {
        Self::group(workspace_id).with_development_stream(DevelopmentStream::Patch(version))
    }

    #[must_use]
    pub const fn with_access_type(mut self, access_type: WorkspaceAccessType) -> Self {
        self.access_type = access_type;
        self
    }

    #[must_use]
    pub const fn with_development_stream(mut self, development_stream: DevelopmentStream) -> Self {
        self.development_stream = development_stream;
        self
    }

    /// Pin the owning user. Ignored for GROUP specifications.
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        if self.workspace_type == WorkspaceType::User {
            self.user_id = Some(user_id.into());
        }
        self
    }

    #[must_use]
    pub const fn workspace_id(&self) -> &WorkspaceId {
        &self.workspace_id
    }

    #[must_use]
    pub const fn workspace_type(&self) -> WorkspaceType {
        self.workspace_type
    }

    #[must_use]
    pub const fn access_type(&self) -> WorkspaceAccessType {
        self.access_type
    }

    #[must_use]
    pub const fn development_stream(&self) -> &DevelopmentStream {
        &self.development_stream
    }

    /// The owning user, if pinned. Always `None` for GROUP.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

impl fmt::Display for WorkspaceSpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.workspace_type, self.access_type)?;
        write!(f, " {}", self.workspace_id)?;
        if let Some(user) = &self.user_id {
            write!(f, " of {user}")?;
        }
        if let Some(version) = self.development_stream.patch_version() {
            write!(f, " for patch release version {version}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

/// The kind of value that failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A [`VersionId`] validation error.
    VersionId,
    /// A [`WorkspaceId`] validation error.
    WorkspaceId,
    /// An unknown [`WorkspaceType`] name.
    WorkspaceType,
    /// An unknown [`WorkspaceAccessType`] name.
    WorkspaceAccessType,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VersionId => write!(f, "VersionId"),
            Self::WorkspaceId => write!(f, "WorkspaceId"),
            Self::WorkspaceType => write!(f, "WorkspaceType"),
            Self::WorkspaceAccessType => write!(f, "WorkspaceAccessType"),
        }
    }
}

/// A validation error for legend-sdlc core types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    /// What kind of value was being validated.
    pub kind: ErrorKind,
    /// The invalid value.
    pub value: String,
    /// Human-readable explanation.
    pub reason: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {:?}: {}", self.kind, self.value, self.reason)
    }
}

impl std::error::Error for ValidationError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn wid(s: &str) -> WorkspaceId {
        WorkspaceId::new(s).unwrap()
    }

    // -- VersionId --

    #[test]
    fn version_id_parses_three_components() {
        let v: VersionId = "3.5.7".parse().unwrap();
        assert_eq!((v.major(), v.minor(), v.patch()), (3, 5, 7));
        assert_eq!(v.to_string(), "3.5.7");
    }

    #[test]
    fn version_id_accepts_zero_and_max() {
        assert!("0.0.0".parse::<VersionId>().is_ok());
        let max = format!("{0}.{0}.{0}", i32::MAX);
        assert!(max.parse::<VersionId>().is_ok());
    }

    #[test]
    fn version_id_rejects_out_of_range() {
        let over = format!("{}.0.0", i64::from(i32::MAX) + 1);
        let err = over.parse::<VersionId>().unwrap_err();
        assert_eq!(err.kind, ErrorKind::VersionId);
        assert!("12345678901.0.0".parse::<VersionId>().is_err());
    }

    #[test]
    fn version_id_rejects_wrong_component_count() {
        for bad in ["", "1", "1.2", "1.2.", "1.2.3.", "1.2.3.4", ".1.2"] {
            assert!(bad.parse::<VersionId>().is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn version_id_rejects_leading_zeros_and_signs() {
        for bad in ["01.2.3", "1.02.3", "1.2.03", "+1.2.3", "-1.2.3", "1.-2.3", "1_2_3"] {
            assert!(bad.parse::<VersionId>().is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn version_id_rejects_qualifiers() {
        assert!("1.2.3a".parse::<VersionId>().is_err());
        assert!("1.2.3-SNAPSHOT".parse::<VersionId>().is_err());
        assert!("not.a.version".parse::<VersionId>().is_err());
    }

    #[test]
    fn version_id_new_checks_bound() {
        assert!(VersionId::new(1, 2, 3).is_ok());
        assert!(VersionId::new(VersionId::MAX_COMPONENT + 1, 0, 0).is_err());
    }

    #[test]
    fn version_id_orders_by_component() {
        let a: VersionId = "1.10.0".parse().unwrap();
        let b: VersionId = "1.9.5".parse().unwrap();
        assert!(b < a);
    }

    #[test]
    fn version_id_serde_as_string() {
        let v: VersionId = "4.5.6".parse().unwrap();
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "\"4.5.6\"");
        let back: VersionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
        assert!(serde_json::from_str::<VersionId>("\"01.2.3\"").is_err());
    }

    // -- DevelopmentStream --

    #[test]
    fn development_stream_patch_version() {
        let v: VersionId = "1.0.0".parse().unwrap();
        assert_eq!(DevelopmentStream::Project.patch_version(), None);
        assert_eq!(DevelopmentStream::patch(v).patch_version(), Some(&v));
        assert_eq!(DevelopmentStream::from(None), DevelopmentStream::Project);
        assert!(DevelopmentStream::from(Some(v)).is_patch());
    }

    #[test]
    fn patch_streams_compare_by_version() {
        let a = DevelopmentStream::patch("1.2.3".parse().unwrap());
        let b = DevelopmentStream::patch("1.2.3".parse().unwrap());
        let c = DevelopmentStream::patch("1.2.4".parse().unwrap());
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, DevelopmentStream::Project);
    }

    // -- WorkspaceId --

    #[test]
    fn workspace_id_accepts_opaque_strings() {
        assert!(WorkspaceId::new("wid1").is_ok());
        assert!(WorkspaceId::new("My Workspace.v2").is_ok());
    }

    #[test]
    fn workspace_id_rejects_empty_and_slash() {
        assert_eq!(WorkspaceId::new("").unwrap_err().kind, ErrorKind::WorkspaceId);
        assert!(WorkspaceId::new("a/b").is_err());
    }

    // -- WorkspaceSpecification --

    #[test]
    fn group_specification_drops_user_id() {
        let spec = WorkspaceSpecification::new(
            wid("w"),
            WorkspaceType::Group,
            WorkspaceAccessType::Backup,
            DevelopmentStream::Project,
            Some("alice".to_owned()),
        );
        assert_eq!(spec.user_id(), None);
        assert_eq!(
            spec,
            WorkspaceSpecification::group(wid("w")).with_access_type(WorkspaceAccessType::Backup)
        );
        assert_eq!(WorkspaceSpecification::group(wid("w")).with_user_id("bob").user_id(), None);
    }

    #[test]
    fn user_specification_keeps_user_id() {
        let spec = WorkspaceSpecification::user(wid("w")).with_user_id("alice");
        assert_eq!(spec.user_id(), Some("alice"));
        assert_ne!(spec, WorkspaceSpecification::user(wid("w")));
    }

    #[test]
    fn specification_defaults() {
        let spec = WorkspaceSpecification::user(wid("w"));
        assert_eq!(spec.access_type(), WorkspaceAccessType::Workspace);
        assert_eq!(spec.development_stream(), &DevelopmentStream::Project);
        assert_eq!(spec.workspace_type(), WorkspaceType::User);
    }

    #[test]
    fn specification_display() {
        let spec = WorkspaceSpecification::patch_group(wid("w3"), "9.9.9".parse().unwrap())
            .with_access_type(WorkspaceAccessType::ConflictResolution);
        assert_eq!(
            spec.to_string(),
            "group conflict resolution w3 for patch release version 9.9.9"
        );
        let spec = WorkspaceSpecification::user(wid("w1")).with_user_id("alice");
        assert_eq!(spec.to_string(), "user workspace w1 of alice");
    }

    // -- enums --

    #[test]
    fn workspace_type_from_str() {
        assert_eq!("USER".parse::<WorkspaceType>().unwrap(), WorkspaceType::User);
        assert_eq!("group".parse::<WorkspaceType>().unwrap(), WorkspaceType::Group);
        assert!("team".parse::<WorkspaceType>().is_err());
    }

    #[test]
    fn access_type_from_str() {
        assert_eq!(
            "resolution".parse::<WorkspaceAccessType>().unwrap(),
            WorkspaceAccessType::ConflictResolution
        );
        assert_eq!(
            "Backup".parse::<WorkspaceAccessType>().unwrap(),
            WorkspaceAccessType::Backup
        );
        assert!("live".parse::<WorkspaceAccessType>().is_err());
    }

    #[test]
    fn validation_error_display() {
        let err = "1.2".parse::<VersionId>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("VersionId"));
        assert!(msg.contains("1.2"));
    }
}
