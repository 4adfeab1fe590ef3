//! In-place structural operations on a decrypted tree.
//!
//! Unknown ids are not errors: every operation reports whether it changed the
//! tree and otherwise leaves it untouched.

use tracing::warn;

use crate::models::{AppData, Direction, GroupNode, ItemNode, Node, NodeUpdate, new_node_id};

/// Deepest nesting a new node may be created at. Keeps the serialized tree
/// within what the JSON reader accepts on the next load.
pub const MAX_DEPTH: usize = 48;

/// A node together with the sibling sequence that owns it.
#[derive(Debug, Clone, Copy)]
pub struct Found<'a> {
    pub node: &'a Node,
    pub siblings: &'a [Node],
    pub index: usize,
}

/// Depth-first, pre-order lookup by id.
pub fn find_node<'a>(nodes: &'a [Node], id: &str) -> Option<Found<'a>> {
    for (index, node) in nodes.iter().enumerate() {
        if node.id() == id {
            return Some(Found {
                node,
                siblings: nodes,
                index,
            });
        }
        if let Node::Group(group) = node
            && let Some(found) = find_node(&group.children, id)
        {
            return Some(found);
        }
    }
    None
}

/// Index path from the root sequence down to the node with `id`.
fn locate(nodes: &[Node], id: &str) -> Option<Vec<usize>> {
    for (index, node) in nodes.iter().enumerate() {
        if node.id() == id {
            return Some(vec![index]);
        }
        if let Node::Group(group) = node
            && let Some(mut path) = locate(&group.children, id)
        {
            path.insert(0, index);
            return Some(path);
        }
    }
    None
}

fn siblings_mut<'a>(nodes: &'a mut Vec<Node>, path: &[usize]) -> Option<(&'a mut Vec<Node>, usize)> {
    let (&last, parents) = path.split_last()?;
    let mut current = nodes;
    for &index in parents {
        current = match current.get_mut(index)? {
            Node::Group(group) => &mut group.children,
            Node::Item(_) => return None,
        };
    }
    (last < current.len()).then_some((current, last))
}

/// `None` means the forest root. Anything else must name an existing group.
pub fn resolve_children<'a>(data: &'a AppData, parent_id: Option<&str>) -> Option<&'a [Node]> {
    match parent_id {
        None => Some(&data.groups),
        Some(id) => find_node(&data.groups, id)
            .and_then(|found| found.node.as_group())
            .map(|group| group.children.as_slice()),
    }
}

fn resolve_children_mut<'a>(data: &'a mut AppData, parent_id: Option<&str>) -> Option<&'a mut Vec<Node>> {
    let Some(id) = parent_id else {
        return Some(&mut data.groups);
    };
    let path = locate(&data.groups, id)?;
    if path.len() >= MAX_DEPTH {
        warn!(parent_id = id, depth = path.len(), "Refusing to nest deeper");
        return None;
    }
    let (siblings, index) = siblings_mut(&mut data.groups, &path)?;
    match &mut siblings[index] {
        Node::Group(group) => Some(&mut group.children),
        Node::Item(_) => None,
    }
}

pub fn new_group(name: impl Into<String>) -> Node {
    Node::Group(GroupNode {
        id: new_node_id(),
        name: name.into(),
        children: Vec::new(),
    })
}

pub fn new_item(
    name: impl Into<String>,
    description: impl Into<String>,
    content: impl Into<String>,
) -> Node {
    Node::Item(ItemNode {
        id: new_node_id(),
        name: name.into(),
        description: description.into(),
        content: content.into(),
    })
}

/// Appends `node` as the last child of `parent_id`.
pub fn insert_node(data: &mut AppData, parent_id: Option<&str>, node: Node) -> bool {
    match resolve_children_mut(data, parent_id) {
        Some(children) => {
            children.push(node);
            true
        }
        None => false,
    }
}

/// Overwrites only the supplied fields. Groups have no description or content,
/// so only `name` applies to them.
pub fn apply_update(data: &mut AppData, id: &str, update: &NodeUpdate) -> bool {
    let Some(path) = locate(&data.groups, id) else {
        return false;
    };
    let Some((siblings, index)) = siblings_mut(&mut data.groups, &path) else {
        return false;
    };
    match &mut siblings[index] {
        Node::Group(group) => {
            if let Some(name) = &update.name {
                group.name = name.clone();
            }
        }
        Node::Item(item) => {
            if let Some(name) = &update.name {
                item.name = name.clone();
            }
            if let Some(description) = &update.description {
                item.description = description.clone();
            }
            if let Some(content) = &update.content {
                item.content = content.clone();
            }
        }
    }
    true
}

/// Removes the node and, for a group, its whole subtree.
pub fn remove_node(data: &mut AppData, id: &str) -> Option<Node> {
    let path = locate(&data.groups, id)?;
    let (siblings, index) = siblings_mut(&mut data.groups, &path)?;
    Some(siblings.remove(index))
}

/// Swaps with the adjacent sibling. Never wraps around.
pub fn reorder_node(data: &mut AppData, id: &str, direction: Direction) -> bool {
    let Some(path) = locate(&data.groups, id) else {
        return false;
    };
    let Some((siblings, index)) = siblings_mut(&mut data.groups, &path) else {
        return false;
    };
    let target = match direction {
        Direction::Up => index.checked_sub(1),
        Direction::Down => Some(index + 1).filter(|&i| i < siblings.len()),
    };
    match target {
        Some(target) => {
            siblings.swap(index, target);
            true
        }
        None => false,
    }
}
