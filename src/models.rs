use serde::{Deserialize, Serialize};

pub type NodeId = String;

pub fn new_node_id() -> NodeId {
    uuid::Uuid::new_v4().to_string()
}

/// A tree element. Only groups own children and only items carry content.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Group(GroupNode),
    Item(ItemNode),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GroupNode {
    pub id: NodeId,
    pub name: String,
    #[serde(default)]
    pub children: Vec<Node>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ItemNode {
    pub id: NodeId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
}

impl Node {
    pub fn id(&self) -> &str {
        match self {
            Node::Group(group) => &group.id,
            Node::Item(item) => &item.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Node::Group(group) => &group.name,
            Node::Item(item) => &item.name,
        }
    }

    pub fn as_group(&self) -> Option<&GroupNode> {
        match self {
            Node::Group(group) => Some(group),
            Node::Item(_) => None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Node::Group(_))
    }
}

/// The forest root that is serialized into the vault.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct AppData {
    #[serde(default)]
    pub groups: Vec<Node>,
}

impl AppData {
    /// Every node id in pre-order.
    pub fn node_ids(&self) -> Vec<&str> {
        fn walk<'a>(nodes: &'a [Node], out: &mut Vec<&'a str>) {
            for node in nodes {
                out.push(node.id());
                if let Node::Group(group) = node {
                    walk(&group.children, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.groups, &mut out);
        out
    }
}

/// On-disk envelope: hex-encoded salt, iv, GCM tag and ciphertext.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedPayload {
    pub salt: String,
    pub iv: String,
    pub auth_tag: String,
    pub data: String,
}

/// Partial field update; `None` keeps the current value.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl NodeUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.content.is_none()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_json_matches_vault_shape() {
        let raw = r#"{"groups":[{"id":"g1","type":"group","name":"Work","children":[
            {"id":"i1","type":"item","name":"Token","description":"ci","content":"abc"}]}]}"#;
        let data: AppData = serde_json::from_str(raw).unwrap();
        let Node::Group(group) = &data.groups[0] else {
            panic!("expected group");
        };
        assert_eq!(group.name, "Work");
        assert_eq!(group.children[0].id(), "i1");

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["groups"][0]["type"], "group");
        assert_eq!(json["groups"][0]["children"][0]["type"], "item");
        assert_eq!(json["groups"][0]["children"][0]["content"], "abc");
    }

    #[test]
    fn item_without_description_defaults_to_empty() {
        let raw = r#"{"id":"i1","type":"item","name":"x","content":"y"}"#;
        let node: Node = serde_json::from_str(raw).unwrap();
        match node {
            Node::Item(item) => assert_eq!(item.description, ""),
            Node::Group(_) => panic!("expected item"),
        }
    }

    #[test]
    fn payload_uses_auth_tag_key() {
        let payload = EncryptedPayload {
            salt: "00".into(),
            iv: "11".into(),
            auth_tag: "22".into(),
            data: "33".into(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["authTag"], "22");
    }

    #[test]
    fn new_ids_are_distinct() {
        assert_ne!(new_node_id(), new_node_id());
    }
}
