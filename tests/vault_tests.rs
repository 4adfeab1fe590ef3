use std::collections::HashSet;
use std::fs;

use clipvault::storage::VAULT_FILE_NAME;
use clipvault::{
    AppData, Direction, KdfParams, Node, NodeUpdate, SearchHit, Session, VaultError, VaultFile,
    search,
};
use proptest::prelude::*;
use tempfile::TempDir;

fn fast_vault(dir: &TempDir) -> VaultFile {
    VaultFile::with_params(
        dir.path().join(VAULT_FILE_NAME),
        KdfParams::with_iterations(1_000).unwrap(),
    )
}

fn group_children<'a>(data: &'a AppData, id: &str) -> &'a [Node] {
    clipvault::tree::resolve_children(data, Some(id)).expect("group exists")
}

#[test]
fn test_end_to_end_scenario() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::new(fast_vault(&dir));
    assert!(!session.vault_exists());

    let data = session.setup("correct-horse").unwrap();
    assert!(session.vault_exists());
    assert!(data.groups.is_empty());

    let data = session.create_group(None, "Personal").unwrap();
    assert_eq!(data.groups.len(), 1);
    let group_id = data.groups[0].id().to_string();

    let data = session
        .create_item(Some(&group_id), "WiFi", "home router", "MySSID:pass123")
        .unwrap();
    let children = group_children(&data, &group_id);
    assert_eq!(children.len(), 1);
    match &children[0] {
        Node::Item(item) => {
            assert_eq!(item.name, "WiFi");
            assert_eq!(item.description, "home router");
            assert_eq!(item.content, "MySSID:pass123");
        }
        Node::Group(_) => panic!("expected an item"),
    }

    session.lock();
    let reopened = session.unlock("correct-horse").unwrap();
    assert_eq!(reopened, data);

    let on_disk = fs::read(session.vault().path()).unwrap();
    session.lock();
    assert!(matches!(
        session.unlock("wrong"),
        Err(VaultError::Authentication)
    ));
    assert!(!session.is_unlocked());
    assert_eq!(fs::read(session.vault().path()).unwrap(), on_disk);
}

#[test]
fn test_second_session_sees_persisted_tree() {
    let dir = TempDir::new().unwrap();
    let mut writer = Session::new(fast_vault(&dir));
    writer.setup("pw-12345678").unwrap();
    writer.create_group(None, "Work").unwrap();
    let expected = writer.create_group(None, "Home").unwrap();
    writer.lock();

    let mut reader = Session::new(fast_vault(&dir));
    assert_eq!(reader.unlock("pw-12345678").unwrap(), expected);
}

#[test]
fn test_delete_cascade_leaves_nothing_reachable() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::new(fast_vault(&dir));
    session.setup("pw").unwrap();

    let data = session.create_group(None, "Outer").unwrap();
    let outer = data.groups[0].id().to_string();
    let data = session.create_group(Some(&outer), "Inner").unwrap();
    let inner = group_children(&data, &outer)[0].id().to_string();
    session.create_item(Some(&inner), "deep", "", "x").unwrap();
    session.create_item(Some(&outer), "shallow", "", "y").unwrap();
    let data = session.create_group(None, "Sibling").unwrap();
    assert_eq!(data.node_ids().len(), 5);

    let data = session.delete_node(&outer).unwrap();
    assert_eq!(data.groups.len(), 1);
    assert_eq!(data.groups[0].name(), "Sibling");
    assert_eq!(data.node_ids().len(), 1);
    assert_eq!(session.load(), data);
}

#[test]
fn test_reorder_boundaries_are_noops() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::new(fast_vault(&dir));
    session.setup("pw").unwrap();
    session.create_group(None, "A").unwrap();
    session.create_group(None, "B").unwrap();
    let data = session.create_group(None, "C").unwrap();
    let first = data.groups[0].id().to_string();
    let last = data.groups[2].id().to_string();

    assert_eq!(session.reorder_node(&first, Direction::Up).unwrap(), data);
    assert_eq!(session.reorder_node(&last, Direction::Down).unwrap(), data);

    let moved = session.reorder_node(&first, Direction::Down).unwrap();
    let names: Vec<&str> = moved.groups.iter().map(Node::name).collect();
    assert_eq!(names, ["B", "A", "C"]);
}

#[test]
fn test_update_keeps_unsupplied_fields() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::new(fast_vault(&dir));
    session.setup("pw").unwrap();
    let data = session.create_item(None, "Token", "ci", "abc").unwrap();
    let id = data.groups[0].id().to_string();

    let data = session
        .update_node(
            &id,
            &NodeUpdate {
                name: Some("CI token".into()),
                ..Default::default()
            },
        )
        .unwrap();
    match &data.groups[0] {
        Node::Item(item) => {
            assert_eq!(item.name, "CI token");
            assert_eq!(item.description, "ci");
            assert_eq!(item.content, "abc");
            assert_eq!(item.id, id);
        }
        Node::Group(_) => panic!("expected an item"),
    }
}

fn names(hits: &[SearchHit<'_>]) -> Vec<String> {
    hits.iter().map(|hit| hit.node.name().to_owned()).collect()
}

#[test]
fn test_search_over_persisted_tree() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::new(fast_vault(&dir));
    session.setup("pw").unwrap();
    let data = session.create_group(None, "Work").unwrap();
    let work = data.groups[0].id().to_string();
    session.create_group(None, "Homework").unwrap();
    session.create_item(Some(&work), "Standup note", "", "x").unwrap();
    session.create_item(Some(&work), "Printer", "see note", "y").unwrap();
    session.create_item(Some(&work), "Parking", "", "z").unwrap();
    let data = session.load();

    assert_eq!(names(&search(&data.groups, "Wor", false)), ["Work", "Homework"]);
    assert_eq!(names(&search(&data.groups, "Wor->", false)), ["Work"]);

    let hits = search(&data.groups, "Work->note", false);
    assert_eq!(names(&hits), ["Standup note", "Printer"]);
    assert!(hits.iter().all(|hit| hit.path == ["Work"]));
}

#[test]
fn test_identical_saves_differ_on_disk() {
    let dir = TempDir::new().unwrap();
    let vault = fast_vault(&dir);
    let data = AppData::default();
    vault.save(&data, "pw").unwrap();
    let first = fs::read_to_string(vault.path()).unwrap();
    vault.save(&data, "pw").unwrap();
    let second = fs::read_to_string(vault.path()).unwrap();
    assert_ne!(first, second);
    assert_eq!(vault.load("pw").unwrap(), data);
}

#[test]
fn test_real_cost_round_trip() {
    let dir = TempDir::new().unwrap();
    let vault = VaultFile::new(dir.path().join(VAULT_FILE_NAME));
    let mut session = Session::new(vault);
    session.setup("correct-horse").unwrap();
    session.lock();
    assert!(session.unlock("correct-horse").unwrap().groups.is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_created_ids_are_unique(ops in prop::collection::vec((any::<bool>(), any::<prop::sample::Index>()), 1..40)) {
        let mut data = AppData::default();
        let mut groups: Vec<String> = Vec::new();
        for (make_group, parent_pick) in ops {
            let parent = if groups.is_empty() {
                None
            } else {
                Some(groups[parent_pick.index(groups.len())].clone())
            };
            let node = if make_group {
                clipvault::tree::new_group("g")
            } else {
                clipvault::tree::new_item("i", "", "")
            };
            let id = node.id().to_string();
            prop_assert!(clipvault::tree::insert_node(&mut data, parent.as_deref(), node));
            if make_group {
                groups.push(id);
            }
        }
        let ids = data.node_ids();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        prop_assert_eq!(unique.len(), ids.len());
    }
}
