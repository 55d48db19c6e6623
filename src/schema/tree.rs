use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;

use crate::visualizer::VisualizerKind;

use super::meta::{self, Annotation, MetaValue, Metadata};
use super::property::{Property, PropertySlot};
use super::value::{PropertyValue, Value};

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a [`Tree`], stable across mutation. Used as the compile cache key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreeId(u64);

impl TreeId {
    fn next() -> Self {
        Self(NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

pub struct PropertyNode {
    id: String,
    metadata: Metadata,
    slot: Rc<dyn PropertySlot>,
}

impl PropertyNode {
    pub fn new<T: PropertyValue>(id: impl Into<String>, property: &Property<T>) -> Self {
        Self {
            id: id.into(),
            metadata: Metadata::new(),
            slot: property.slot(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.metadata.insert(key, value);
        self
    }

    pub fn title(self, title: &str) -> Self {
        self.with(meta::TITLE, title)
    }

    pub fn description(self, description: &str) -> Self {
        self.with(meta::DESCRIPTION, description)
    }

    pub fn category(self, category: &str) -> Self {
        self.with(meta::CATEGORY, category)
    }

    pub fn subcategory(self, subcategory: &str) -> Self {
        self.with(meta::SUBCATEGORY, subcategory)
    }

    pub fn visualizer(self, kind: VisualizerKind) -> Self {
        self.with(meta::VISUALIZER, kind)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    pub fn slot(&self) -> &Rc<dyn PropertySlot> {
        &self.slot
    }

    pub fn value(&self) -> Value {
        self.slot.value()
    }
}

impl fmt::Debug for PropertyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyNode")
            .field("id", &self.id)
            .field("metadata", &self.metadata)
            .field("value", &self.slot.value())
            .finish()
    }
}

/// Ordered container of child nodes. Insertion order is display order.
///
/// Not `Clone`: a copy would share the original's cache identity.
#[derive(Debug)]
pub struct Tree {
    id: String,
    identity: TreeId,
    metadata: Metadata,
    children: IndexMap<String, Node>,
}

impl Tree {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            identity: TreeId::next(),
            metadata: Metadata::new(),
            children: IndexMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.metadata.insert(key, value);
        self
    }

    pub fn title(self, title: &str) -> Self {
        self.with(meta::TITLE, title)
    }

    pub fn description(self, description: &str) -> Self {
        self.with(meta::DESCRIPTION, description)
    }

    pub fn category(self, category: &str) -> Self {
        self.with(meta::CATEGORY, category)
    }

    pub fn subcategory(self, subcategory: &str) -> Self {
        self.with(meta::SUBCATEGORY, subcategory)
    }

    pub fn accordion(self) -> Self {
        self.with(meta::ANNOTATION, Annotation::Accordion)
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.insert(node);
        self
    }

    /// Adds `node`, replacing a child with the same id in place.
    pub fn insert(&mut self, node: impl Into<Node>) -> Option<Node> {
        let node = node.into();
        self.children.insert(node.id().to_owned(), node)
    }

    pub fn remove(&mut self, id: &str) -> Option<Node> {
        self.children.shift_remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.children.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.children.get_mut(id)
    }

    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.values()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn identity(&self) -> TreeId {
        self.identity
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    pub fn is_accordion(&self) -> bool {
        self.metadata.get::<Annotation>(meta::ANNOTATION) == Some(Annotation::Accordion)
    }
}

#[derive(Debug)]
pub enum Node {
    Property(PropertyNode),
    Tree(Tree),
}

/// How the compiler treats a node, decided once per node.
#[derive(Clone, Copy, Debug)]
pub enum NodeKind<'a> {
    Leaf(&'a PropertyNode),
    Group(&'a Tree),
    AccordionGroup(&'a Tree),
}

impl Node {
    pub fn id(&self) -> &str {
        match self {
            Self::Property(property) => property.id(),
            Self::Tree(tree) => tree.id(),
        }
    }

    pub fn metadata(&self) -> &Metadata {
        match self {
            Self::Property(property) => property.metadata(),
            Self::Tree(tree) => tree.metadata(),
        }
    }

    pub fn kind(&self) -> NodeKind<'_> {
        match self {
            Self::Property(property) => NodeKind::Leaf(property),
            Self::Tree(tree) if tree.is_accordion() => NodeKind::AccordionGroup(tree),
            Self::Tree(tree) => NodeKind::Group(tree),
        }
    }
}

impl From<PropertyNode> for Node {
    fn from(value: PropertyNode) -> Self {
        Self::Property(value)
    }
}

impl From<Tree> for Node {
    fn from(value: Tree) -> Self {
        Self::Tree(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn children_keep_insertion_order_and_replace_in_place() {
        let a = Property::new(1.0);
        let mut tree = Tree::new("root")
            .child(PropertyNode::new("b", &a))
            .child(PropertyNode::new("a", &a))
            .child(PropertyNode::new("c", &a));
        tree.insert(PropertyNode::new("a", &a).title("replaced"));

        let ids = tree.children().map(Node::id).collect::<Vec<_>>();
        assert_eq!(ids, ["b", "a", "c"]);
        assert_eq!(
            tree.get("a").and_then(|node| node.metadata().get::<&str>(meta::TITLE)),
            Some("replaced")
        );
    }

    #[test]
    fn every_tree_gets_its_own_identity() {
        let first = Tree::new("same");
        let second = Tree::new("same");
        assert_ne!(first.identity(), second.identity());
    }

    #[test]
    fn accordion_annotation_selects_the_node_kind() {
        let flag = Property::new(true);
        let tree = Tree::new("root")
            .child(Tree::new("plain"))
            .child(Tree::new("group").accordion())
            .child(PropertyNode::new("leaf", &flag));

        let kinds = tree
            .children()
            .map(|node| match node.kind() {
                NodeKind::Leaf(_) => "leaf",
                NodeKind::Group(_) => "group",
                NodeKind::AccordionGroup(_) => "accordion",
            })
            .collect::<Vec<_>>();
        assert_eq!(kinds, ["group", "accordion", "leaf"]);
    }
}
