//! Naming grammars for entities, packages, classifiers, and release tags.
//!
//! Paths are `::`-separated. Package segments are word characters
//! (`[A-Za-z0-9_]`); the final element of an entity or classifier path may
//! also contain `$`. The `meta` root package is reserved for classifiers,
//! so user entities may not live under it.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::types::VersionId;

/// Prefix of every release tag.
pub const VERSION_TAG_PREFIX: &str = "release-";

const META_PACKAGE: &str = "meta";

static ENTITY_NAME: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"^[A-Za-z0-9_$]+$"));

static PACKAGE_PATH: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile(r"^[A-Za-z0-9_]+(::[A-Za-z0-9_]+)*$"));

static ENTITY_PATH: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile(r"^[A-Za-z0-9_]+(::[A-Za-z0-9_]+)*::[A-Za-z0-9_$]+$"));

static PACKAGEABLE_ELEMENT_PATH: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile(r"^[A-Za-z0-9_]+(::[A-Za-z0-9_]+)*(::[A-Za-z0-9_$]+)?$"));

static CLASSIFIER_PATH: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile(r"^meta(::[A-Za-z0-9_]+)*::[A-Za-z0-9_$]+$"));

/// A pattern that fails to compile matches nothing.
fn compile(pattern: &str) -> Option<Regex> {
    Regex::new(pattern).ok()
}

fn matches(grammar: Option<&Regex>, value: &str) -> bool {
    grammar.is_some_and(|re| re.is_match(value))
}

/// A bare entity name: letters, digits, `_`, and `$`.
#[must_use]
pub fn is_valid_entity_name(name: &str) -> bool {
    matches(ENTITY_NAME.as_ref(), name)
}

/// A package path followed by an entity name, outside the `meta` package.
#[must_use]
pub fn is_valid_entity_path(path: &str) -> bool {
    matches(ENTITY_PATH.as_ref(), path) && !in_meta_package(path)
}

/// One or more `::`-separated package segments.
#[must_use]
pub fn is_valid_package_path(path: &str) -> bool {
    matches(PACKAGE_PATH.as_ref(), path)
}

/// A package path, optionally ending in an entity name. `meta` is allowed.
#[must_use]
pub fn is_valid_packageable_element_path(path: &str) -> bool {
    matches(PACKAGEABLE_ELEMENT_PATH.as_ref(), path)
}

/// An element path rooted at the `meta` package.
#[must_use]
pub fn is_valid_classifier_path(path: &str) -> bool {
    matches(CLASSIFIER_PATH.as_ref(), path)
}

fn in_meta_package(path: &str) -> bool {
    path.split("::").next() == Some(META_PACKAGE)
}

// ---------------------------------------------------------------------------
// Release tags
// ---------------------------------------------------------------------------

/// The tag name for a released version: `release-M.N.P`.
#[must_use]
pub fn version_tag_name(version: &VersionId) -> String {
    format!("{VERSION_TAG_PREFIX}{version}")
}

/// Parse a release tag back into its version.
///
/// Returns `None` unless the name is exactly `release-` followed by a strict
/// `major.minor.patch` version.
#[must_use]
pub fn parse_version_tag_name(name: &str) -> Option<VersionId> {
    name.strip_prefix(VERSION_TAG_PREFIX)?.parse().ok()
}

/// Returns `true` if `name` is a release tag.
#[must_use]
pub fn is_version_tag_name(name: &str) -> bool {
    parse_version_tag_name(name).is_some()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
