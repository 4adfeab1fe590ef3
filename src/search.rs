//! Read-only search over a loaded tree.
//!
//! A query is `group -> subgroup -> text`. Path segments match group names by
//! case-insensitive prefix; the trailing text matches group names, and item
//! names or descriptions, by case-insensitive substring. Results may overlap
//! and are not deduplicated.

use crate::models::{GroupNode, Node};

const PATH_SEPARATOR: &str = "->";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    pub group_path: Vec<String>,
    pub item_query: String,
}

pub fn parse_query(raw: &str) -> ParsedQuery {
    let parts: Vec<&str> = raw.split(PATH_SEPARATOR).collect();
    match parts.split_last() {
        Some((last, path)) if !path.is_empty() => ParsedQuery {
            group_path: path
                .iter()
                .map(|segment| segment.trim())
                .filter(|segment| !segment.is_empty())
                .map(str::to_owned)
                .collect(),
            item_query: last.trim().to_owned(),
        },
        _ => ParsedQuery {
            group_path: Vec::new(),
            item_query: raw.to_owned(),
        },
    }
}

/// A matched node and the names of its ancestors, root first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit<'a> {
    pub node: &'a Node,
    pub path: Vec<String>,
}

pub fn search<'a>(nodes: &'a [Node], query: &str, groups_only: bool) -> Vec<SearchHit<'a>> {
    let parsed = parse_query(query);
    let mut hits = Vec::new();
    if parsed.group_path.is_empty() {
        let needle = parsed.item_query.to_lowercase();
        search_children(nodes, &needle, groups_only, &mut Vec::new(), &mut hits);
    } else {
        let item_needle = parsed.item_query.to_lowercase();
        let segments: Vec<String> = parsed.group_path.iter().map(|s| s.to_lowercase()).collect();
        search_path(
            nodes,
            &segments,
            &item_needle,
            groups_only,
            &mut Vec::new(),
            &mut hits,
        );
    }
    hits
}

fn search_children<'a>(
    nodes: &'a [Node],
    needle: &str,
    groups_only: bool,
    path: &mut Vec<String>,
    hits: &mut Vec<SearchHit<'a>>,
) {
    for node in nodes {
        match node {
            Node::Group(group) => {
                if group.name.to_lowercase().contains(needle) {
                    hits.push(SearchHit {
                        node,
                        path: path.clone(),
                    });
                }
                path.push(group.name.clone());
                search_children(&group.children, needle, groups_only, path, hits);
                path.pop();
            }
            Node::Item(item) if !groups_only => {
                if item.name.to_lowercase().contains(needle)
                    || item.description.to_lowercase().contains(needle)
                {
                    hits.push(SearchHit {
                        node,
                        path: path.clone(),
                    });
                }
            }
            Node::Item(_) => {}
        }
    }
}

fn search_path<'a>(
    nodes: &'a [Node],
    segments: &[String],
    item_needle: &str,
    groups_only: bool,
    path: &mut Vec<String>,
    hits: &mut Vec<SearchHit<'a>>,
) {
    let Some((segment, rest)) = segments.split_first() else {
        return;
    };
    for node in nodes {
        let Node::Group(group) = node else {
            continue;
        };
        if !group.name.to_lowercase().starts_with(segment.as_str()) {
            descend(group, segments, item_needle, groups_only, path, hits);
        } else if !rest.is_empty() {
            descend(group, rest, item_needle, groups_only, path, hits);
        } else if item_needle.is_empty() {
            hits.push(SearchHit {
                node,
                path: path.clone(),
            });
        } else {
            path.push(group.name.clone());
            search_children(&group.children, item_needle, groups_only, path, hits);
            path.pop();
        }
    }
}

fn descend<'a>(
    group: &'a GroupNode,
    segments: &[String],
    item_needle: &str,
    groups_only: bool,
    path: &mut Vec<String>,
    hits: &mut Vec<SearchHit<'a>>,
) {
    path.push(group.name.clone());
    search_path(&group.children, segments, item_needle, groups_only, path, hits);
    path.pop();
}
