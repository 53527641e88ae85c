//! Branch-name and naming-grammar vectors for legend-sdlc workspaces.

use sdlc_core::branch::{parse_workspace_branch_name, workspace_branch_name};
use sdlc_core::model::types::{
    DevelopmentStream, VersionId, WorkspaceAccessType, WorkspaceId, WorkspaceSpecification,
    WorkspaceType,
};
use sdlc_core::naming::{
    is_valid_classifier_path, is_valid_entity_name, is_valid_entity_path,
    is_valid_package_path, is_valid_packageable_element_path, is_version_tag_name,
};

const PROJECT: &str = "testProject";

fn user_name() -> Option<String> {
    Some("userName".to_owned())
}

fn patch(version: &str) -> DevelopmentStream {
    DevelopmentStream::Patch(version.parse::<VersionId>().unwrap())
}

fn spec(
    id: &str,
    workspace_type: WorkspaceType,
    access_type: WorkspaceAccessType,
    stream: DevelopmentStream,
    user: Option<&str>,
) -> WorkspaceSpecification {
    WorkspaceSpecification::new(
        WorkspaceId::new(id).unwrap(),
        workspace_type,
        access_type,
        stream,
        user.map(str::to_owned),
    )
}

fn branch(spec: &WorkspaceSpecification) -> String {
    workspace_branch_name(spec, user_name).unwrap()
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

#[test]
fn encodes_project_stream_branches() {
    use WorkspaceAccessType::{Backup, ConflictResolution, Workspace};
    use WorkspaceType::{Group, User};
    let main = DevelopmentStream::Project;

    assert_eq!(branch(&spec("wid1", User, Workspace, main, None)), "workspace/userName/wid1");
    assert_eq!(branch(&spec("wid2", User, Backup, main, None)), "backup/userName/wid2");
    assert_eq!(
        branch(&spec("wid3", User, ConflictResolution, main, None)),
        "resolution/userName/wid3"
    );

    assert_eq!(branch(&spec("wid1", Group, Workspace, main, None)), "group/wid1");
    assert_eq!(branch(&spec("wid2", Group, Backup, main, None)), "group-backup/wid2");
    assert_eq!(
        branch(&spec("wid3", Group, ConflictResolution, main, None)),
        "group-resolution/wid3"
    );
}

#[test]
fn encodes_patch_stream_branches() {
    use WorkspaceAccessType::{Backup, ConflictResolution, Workspace};
    use WorkspaceType::{Group, User};

    assert_eq!(
        branch(&spec("wid1", User, Workspace, patch("3.5.7"), None)),
        "patch/3.5.7/workspace/userName/wid1"
    );
    assert_eq!(
        branch(&spec("wid2", User, Backup, patch("0.0.1"), None)),
        "patch/0.0.1/backup/userName/wid2"
    );
    assert_eq!(
        branch(&spec("wid3", User, ConflictResolution, patch("10.5.1"), None)),
        "patch/10.5.1/resolution/userName/wid3"
    );

    assert_eq!(
        branch(&spec("wid1", Group, Workspace, patch("2.4.6"), None)),
        "patch/2.4.6/group/wid1"
    );
    assert_eq!(
        branch(&spec("wid2", Group, Backup, patch("1.0.0"), None)),
        "patch/1.0.0/group-backup/wid2"
    );
    assert_eq!(
        branch(&spec("wid3", Group, ConflictResolution, patch("99.102.3"), None)),
        "patch/99.102.3/group-resolution/wid3"
    );
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

#[test]
fn rejects_non_workspace_branches() {
    for name in ["", "main", "master", "other_branch_name"] {
        assert_eq!(parse_workspace_branch_name(PROJECT, name), None, "{name:?}");
    }
}

#[test]
fn rejects_malformed_workspace_branches() {
    for name in [
        "wirkspace/uid/wid",
        "workspice/uid/wid",
        "workspace",
        "workspace/",
        "workspace/wid",
        "workspace/uid/wid/other",
        "workspace//",
        "workspace/workspace/uid/wid",
        "workspace_uid_wid",
    ] {
        assert_eq!(parse_workspace_branch_name(PROJECT, name), None, "{name:?}");
    }
}

#[test]
fn rejects_malformed_group_branches() {
    for name in ["grp/wid", "group", "group/", "group/wid/other"] {
        assert_eq!(parse_workspace_branch_name(PROJECT, name), None, "{name:?}");
    }
}

#[test]
fn rejects_malformed_patch_branches() {
    for name in [
        "patch/not.a.version/workspace/uid/wid",
        "patch/12345678901.0.0/workspace/uid/wid",
        "patch/1/workspace/uid/wid",
        "patch/1.2/group/wid",
        "patch/1.2.3/patch/1.2.3/group/wid",
        "patch/1.2.3.4/workspace/uid/wid",
        "patch/1.2.3.4.5/groupd/wid",
        "patch/1_2_3/workspace/uid/wid",
        "pitch/1.2.3/workspace/uid/wid",
        "patch/1.2.3/workspice/uid/wid",
        "patch//workspace/uid/wid",
        "patch/01.02.03/workspace/uid/wid",
        "patch/2147483648.0.0/group/wid",
    ] {
        assert_eq!(parse_workspace_branch_name(PROJECT, name), None, "{name:?}");
    }
}

#[test]
fn decodes_project_stream_branches() {
    use WorkspaceAccessType::{Backup, ConflictResolution, Workspace};
    use WorkspaceType::{Group, User};
    let main = DevelopmentStream::Project;

    let cases = [
        ("workspace/uid1/wid1", spec("wid1", User, Workspace, main, Some("uid1"))),
        ("backup/uid2/wid2", spec("wid2", User, Backup, main, Some("uid2"))),
        ("resolution/uid3/wid3", spec("wid3", User, ConflictResolution, main, Some("uid3"))),
        ("group/wid1", spec("wid1", Group, Workspace, main, None)),
        ("group-backup/wid2", spec("wid2", Group, Backup, main, None)),
        ("group-resolution/wid3", spec("wid3", Group, ConflictResolution, main, None)),
    ];
    for (name, expected) in cases {
        assert_eq!(parse_workspace_branch_name(PROJECT, name), Some(expected), "{name:?}");
    }
}

#[test]
fn decodes_patch_stream_branches() {
    use WorkspaceAccessType::{Backup, ConflictResolution, Workspace};
    use WorkspaceType::{Group, User};

    let cases = [
        (
            "patch/1.2.3/workspace/uid1/wid1",
            spec("wid1", User, Workspace, patch("1.2.3"), Some("uid1")),
        ),
        (
            "patch/4.5.6/backup/uid2/wid2",
            spec("wid2", User, Backup, patch("4.5.6"), Some("uid2")),
        ),
        (
            "patch/41.25.63/resolution/uid3/wid3",
            spec("wid3", User, ConflictResolution, patch("41.25.63"), Some("uid3")),
        ),
        ("patch/3.2.1/group/wid1", spec("wid1", Group, Workspace, patch("3.2.1"), None)),
        ("patch/0.0.2/group-backup/wid2", spec("wid2", Group, Backup, patch("0.0.2"), None)),
        (
            "patch/9.9.9/group-resolution/wid3",
            spec("wid3", Group, ConflictResolution, patch("9.9.9"), None),
        ),
    ];
    for (name, expected) in cases {
        assert_eq!(parse_workspace_branch_name(PROJECT, name), Some(expected), "{name:?}");
    }
}

#[test]
fn round_trips_every_combination() {
    let streams = [DevelopmentStream::Project, patch("0.0.0"), patch("2147483647.1.0")];
    for workspace_type in WorkspaceType::ALL {
        for access_type in WorkspaceAccessType::ALL {
            for stream in streams {
                let original = spec("ws", workspace_type, access_type, stream, Some("alice"));
                let name = workspace_branch_name(&original, || None).unwrap();
                assert_eq!(parse_workspace_branch_name(PROJECT, &name), Some(original));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Naming grammars
// ---------------------------------------------------------------------------

#[test]
fn entity_names() {
    for name in [
        "randomEntityName",
        "entityNameAllows$",
        "entityNameAllows$And_",
        "entity_name_only_has_underscore",
        "test_String_$1_10$__String_MANY_",
        "test_String_$1_10$__String_$1_MANY$_",
        "test_String_$1_MANY$__String_1_",
    ] {
        assert!(is_valid_entity_name(name), "{name:?}");
    }
    for name in [
        "random::entity::path::entityName",
        "test_String_$1_10$__String_$1_*$_&",
        "entity_name_has_other_characters_*#@",
    ] {
        assert!(!is_valid_entity_name(name), "{name:?}");
    }
}

#[test]
fn entity_paths() {
    for path in [
        "random::entity::path",
        "model::test::function::test_String_$1_10$__String_MANY_",
        "model::test::function::test_String_$1_MANY$__String_1_",
    ] {
        assert!(is_valid_entity_path(path), "{path:?}");
    }
    for path in [
        "model",
        "model::",
        "model::*",
        "model::$test::$function",
        "meta::test::ValidClassName",
        "model::has::other::characters::test_String_$1_10$__String_$1_*$_&",
    ] {
        assert!(!is_valid_entity_path(path), "{path:?}");
    }
}

#[test]
fn package_paths() {
    for path in ["model", "random::entity::path", "meta", "meta::entity::path"] {
        assert!(is_valid_package_path(path), "{path:?}");
    }
    for path in [
        "model::",
        "model::*",
        "model::$test::$function",
        "model::test::function::test_String_$1_10$__String_MANY_",
    ] {
        assert!(!is_valid_package_path(path), "{path:?}");
    }
}

#[test]
fn packageable_element_paths() {
    for path in [
        "model",
        "meta::entity::path",
        "random::entity::path",
        "model::test::function::test_String_$1_10$__String_MANY_",
    ] {
        assert!(is_valid_packageable_element_path(path), "{path:?}");
    }
    for path in [
        "model::",
        "model::*",
        "model::$test::$function",
        "model::has::other::characters::test_String_$1_10$__String_$1_*$_&",
    ] {
        assert!(!is_valid_packageable_element_path(path), "{path:?}");
    }
}

#[test]
fn classifier_paths() {
    for path in [
        "meta::entity::path",
        "meta::pure::metamodel::function::ConcreteFunctionDefinition",
        "meta::entity::path::test_String_$1_10$__String_MANY_",
    ] {
        assert!(is_valid_classifier_path(path), "{path:?}");
    }
    for path in [
        "meta::",
        "meta::*",
        "random",
        "random::entity::path",
        "meta::$test::$function",
        "meta::has::other::characters::test_String_$1_10$__String_$1_*$_&",
    ] {
        assert!(!is_valid_classifier_path(path), "{path:?}");
    }
}

#[test]
fn version_tag_names() {
    let max = i32::MAX;
    for name in [
        "release-0.0.0".to_owned(),
        "release-1.2.3".to_owned(),
        "release-100023.24.35".to_owned(),
        format!("release-{max}.{max}.{max}"),
    ] {
        assert!(is_version_tag_name(&name), "{name:?}");
    }

    let over = i64::from(max) + 1;
    for name in [
        format!("release-{over}.2.3"),
        format!("release-1.{over}.3"),
        format!("release-1.2.{over}"),
        "release-2023.04.21".to_owned(),
        "release-20230421000000.0.0".to_owned(),
        "release--1.2.3".to_owned(),
        "release-1.-2.3".to_owned(),
        "release".to_owned(),
        "release-".to_owned(),
        "release-1".to_owned(),
        "release-1.2".to_owned(),
        "release-1.2.".to_owned(),
        "release-1.2.3.".to_owned(),
        "release-1.2.3.4".to_owned(),
        "release-1.2.3-SNAPSHOT".to_owned(),
        "release-1.2.3a".to_owned(),
        "1.2.3".to_owned(),
        "r-1.2.3".to_owned(),
        "release_1.2.3".to_owned(),
        "release/1.2.3".to_owned(),
        "release-01.02.03".to_owned(),
    ] {
        assert!(!is_version_tag_name(&name), "{name:?}");
    }
}
