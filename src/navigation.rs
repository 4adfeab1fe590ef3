//! Helpers for browsing a tree by a stack of group ids.

use crate::models::{AppData, Node, NodeId};

/// Names from the root down to and including the node.
pub fn path_to_node(nodes: &[Node], id: &str) -> Option<Vec<String>> {
    walk_to(nodes, id, &|node: &Node| node.name().to_owned())
}

/// Ids from the root down to and including the node. Suitable as a
/// navigation stack when the node is a group.
pub fn id_path_to_node(nodes: &[Node], id: &str) -> Option<Vec<NodeId>> {
    walk_to(nodes, id, &|node: &Node| node.id().to_owned())
}

fn walk_to<T>(nodes: &[Node], id: &str, label: &dyn Fn(&Node) -> T) -> Option<Vec<T>> {
    for node in nodes {
        if node.id() == id {
            return Some(vec![label(node)]);
        }
        if let Node::Group(group) = node
            && let Some(mut rest) = walk_to(&group.children, id, label)
        {
            rest.insert(0, label(node));
            return Some(rest);
        }
    }
    None
}

/// Children of the group reached by following `stack`. Each id is looked up
/// among the direct children of the previous level; any miss yields nothing.
pub fn children_at<'a>(data: &'a AppData, stack: &[NodeId]) -> &'a [Node] {
    let mut current: &[Node] = &data.groups;
    for group_id in stack {
        let next = current.iter().find_map(|node| match node {
            Node::Group(group) if group.id == *group_id => Some(group.children.as_slice()),
            _ => None,
        });
        match next {
            Some(children) => current = children,
            None => return &[],
        }
    }
    current
}

pub fn current_group_id(stack: &[NodeId]) -> Option<&NodeId> {
    stack.last()
}

/// Names along `stack`. Ids that do not resolve at their level are skipped.
pub fn navigation_path(data: &AppData, stack: &[NodeId]) -> Vec<String> {
    let mut path = Vec::new();
    let mut current: &[Node] = &data.groups;
    for group_id in stack {
        if let Some(node) = current.iter().find(|node| node.id() == group_id.as_str()) {
            path.push(node.name().to_owned());
            if let Node::Group(group) = node {
                current = &group.children;
            }
        }
    }
    path
}
