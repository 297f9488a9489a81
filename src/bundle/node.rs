//! Translation tree nodes and their serde representation.

use std::fmt;

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::de::{
    self,
    DeserializeSeed,
    MapAccess,
    Visitor,
};
use serde::{
    Deserialize,
    Deserializer,
    Serialize,
    Serializer,
};

use crate::types::KeyPath;

/// One node of a locale's translation tree.
///
/// Groups keep their declaration order. Building a group from Rust code follows map semantics
/// (a repeated segment replaces the earlier one); deserializing rejects repeated segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Translation text, kept verbatim.
    Leaf(String),
    /// Named children.
    Group(IndexMap<String, Node>),
}

impl Node {
    #[must_use]
    pub fn leaf(text: impl Into<String>) -> Self {
        Self::Leaf(text.into())
    }

    /// Builds a group from `(segment, node)` pairs.
    ///
    /// # Examples
    /// ```
    /// use oneterm_i18n::bundle::Node;
    ///
    /// let root = Node::group([("menu", Node::group([("oneterm", Node::leaf("堡垒机"))]))]);
    /// assert_eq!(root.child("menu").and_then(|m| m.child("oneterm")), Some(&Node::leaf("堡垒机")));
    /// ```
    #[must_use]
    pub fn group<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Self)>,
        K: Into<String>,
    {
        Self::Group(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    #[must_use]
    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            Self::Leaf(text) => Some(text),
            Self::Group(_) => None,
        }
    }

    #[must_use]
    pub const fn as_group(&self) -> Option<&IndexMap<String, Self>> {
        match self {
            Self::Group(children) => Some(children),
            Self::Leaf(_) => None,
        }
    }

    /// Direct child of a group; always `None` for a leaf.
    #[must_use]
    pub fn child(&self, segment: &str) -> Option<&Self> {
        self.as_group()?.get(segment)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Leaf(text) => serializer.serialize_str(text),
            Self::Group(children) => children.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        NodeSeed { path: KeyPath::default() }.deserialize(deserializer)
    }
}

/// Deserializes one node while tracking its position, so errors name the offending path.
pub(crate) struct NodeSeed {
    /// Path of the node being read; empty for the root.
    pub(crate) path: KeyPath,
}

impl NodeSeed {
    /// Human readable location for error messages.
    fn location(&self) -> String {
        if self.path.is_empty() { "the bundle root".to_string() } else { format!("`{}`", self.path) }
    }
}

impl<'de> DeserializeSeed<'de> for NodeSeed {
    type Value = Node;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Node, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for NodeSeed {
    type Value = Node;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "a translation string or a group of translations at {}", self.location())
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Node, E> {
        Ok(Node::Leaf(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Node, E> {
        Ok(Node::Leaf(value))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Node, A::Error> {
        let mut children = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(segment) = map.next_key::<String>()? {
            if segment.is_empty() {
                return Err(de::Error::custom(format!(
                    "empty key segment under {}",
                    self.location()
                )));
            }
            let child_path = self.path.child(&segment);
            match children.entry(segment) {
                Entry::Occupied(_) => {
                    return Err(de::Error::custom(format!("duplicate key `{child_path}`")));
                }
                Entry::Vacant(slot) => {
                    let node = map.next_value_seed(Self { path: child_path })?;
                    slot.insert(node);
                }
            }
        }
        Ok(Node::Group(children))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use serde_json::json;

    use super::*;

    #[googletest::test]
    fn test_deserialize_nested_groups_in_declaration_order() {
        let node: Node =
            serde_json::from_str(r#"{"menu": {"workStation": "工作台", "oneterm": "堡垒机"}}"#)
                .unwrap();

        let menu = node.child("menu").and_then(Node::as_group).unwrap();
        let order: Vec<&str> = menu.keys().map(String::as_str).collect();
        assert_eq!(order, ["workStation", "oneterm"]);
        expect_that!(menu.get("oneterm").and_then(Node::as_leaf), some(eq("堡垒机")));
    }

    #[googletest::test]
    fn test_deserialize_keeps_newlines_verbatim() {
        let node: Node = serde_json::from_str(r#"{"tip": "BEGIN\n...\nEND"}"#).unwrap();

        expect_that!(node.child("tip").and_then(Node::as_leaf), some(eq("BEGIN\n...\nEND")));
    }

    #[googletest::test]
    fn test_deserialize_rejects_non_string_leaf_with_path() {
        let result = serde_json::from_str::<Node>(r#"{"log": {"count": 42}}"#);

        let message = result.unwrap_err().to_string();
        expect_that!(message, contains_substring("`log.count`"));
        expect_that!(message, contains_substring("integer"));
    }

    #[googletest::test]
    fn test_deserialize_rejects_arrays_and_null() {
        expect_that!(serde_json::from_str::<Node>(r#"{"items": ["a"]}"#), err(anything()));
        expect_that!(serde_json::from_str::<Node>(r#"{"nothing": null}"#), err(anything()));
        expect_that!(serde_json::from_str::<Node>(r#"{"flag": true}"#), err(anything()));
    }

    #[googletest::test]
    fn test_deserialize_rejects_duplicate_keys() {
        let result = serde_json::from_str::<Node>(r#"{"menu": {"oneterm": "a", "oneterm": "b"}}"#);

        expect_that!(
            result.unwrap_err().to_string(),
            contains_substring("duplicate key `menu.oneterm`")
        );
    }

    #[googletest::test]
    fn test_deserialize_rejects_empty_segment() {
        let result = serde_json::from_str::<Node>(r#"{"menu": {"": "x"}}"#);

        expect_that!(result.unwrap_err().to_string(), contains_substring("empty key segment"));
    }

    #[googletest::test]
    fn test_deserialize_from_value_and_serialize_back() {
        let value = json!({"guacamole": {"play": "点击播放"}});

        let node = Node::deserialize(&value).unwrap();

        assert_eq!(serde_json::to_value(&node).unwrap(), value);
    }
}
