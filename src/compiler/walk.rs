use indexmap::IndexMap;
use tracing::warn;

use crate::error::{CompileError, SchemaError};
use crate::schema::meta;
use crate::schema::{IconRef, Metadata, Node, NodeKind, PropertyNode, Tree};
use crate::visualizer::{self, RenderHandle, VisualizerKind, VisualizerRegistry, WidgetSpec};

use super::page::{CompiledEntry, CompiledPage, CompiledSchema, SubcategoryGroup};
use super::NestedTreePolicy;

pub const DEFAULT_CATEGORY: &str = "General";
pub const DEFAULT_SUBCATEGORY: &str = "General";

/// Bucket that nodes without their own category metadata fall into.
#[derive(Clone, Debug)]
struct Scope {
    category: String,
    subcategory: String,
}

impl Scope {
    fn root() -> Self {
        Self {
            category: DEFAULT_CATEGORY.to_owned(),
            subcategory: DEFAULT_SUBCATEGORY.to_owned(),
        }
    }

    fn bucket_for(&self, metadata: &Metadata) -> Scope {
        Scope {
            category: metadata
                .get::<String>(meta::CATEGORY)
                .unwrap_or_else(|| self.category.clone()),
            subcategory: metadata
                .get::<String>(meta::SUBCATEGORY)
                .unwrap_or_else(|| self.subcategory.clone()),
        }
    }
}

type Buckets = IndexMap<String, IndexMap<String, Vec<CompiledEntry>>>;

pub(super) struct Walk<'r> {
    registry: &'r mut VisualizerRegistry,
    policy: NestedTreePolicy,
    buckets: Buckets,
    indexed: Vec<CompiledEntry>,
}

impl<'r> Walk<'r> {
    pub(super) fn new(registry: &'r mut VisualizerRegistry, policy: NestedTreePolicy) -> Self {
        Self {
            registry,
            policy,
            buckets: IndexMap::new(),
            indexed: Vec::new(),
        }
    }

    pub(super) fn run(mut self, tree: &Tree) -> Result<(CompiledSchema, Vec<CompiledEntry>), CompileError> {
        if tree.is_accordion() {
            self.accordion_member(tree, &Scope::root())?;
        } else {
            let scope = match self.policy {
                NestedTreePolicy::Flatten => Scope::root(),
                NestedTreePolicy::Scoped => Scope::root().bucket_for(tree.metadata()),
            };
            self.tree(tree, &scope)?;
        }

        let pages = self
            .buckets
            .into_iter()
            .map(|(category, subcategories)| {
                let groups = subcategories
                    .into_iter()
                    .map(|(name, entries)| SubcategoryGroup::new(name, entries))
                    .collect();
                (category.clone(), CompiledPage::new(category, groups))
            })
            .collect();

        Ok((CompiledSchema::new(pages), self.indexed))
    }

    fn tree(&mut self, tree: &Tree, scope: &Scope) -> Result<(), CompileError> {
        for child in tree.children() {
            match child.kind() {
                NodeKind::Leaf(property) => {
                    if let Some(entry) = self.leaf(property)? {
                        let bucket = scope.bucket_for(property.metadata());
                        self.push(bucket, entry);
                    }
                }
                NodeKind::AccordionGroup(group) => self.accordion_member(group, scope)?,
                NodeKind::Group(nested) => {
                    let inner = match self.policy {
                        NestedTreePolicy::Flatten => scope.clone(),
                        NestedTreePolicy::Scoped => scope.bucket_for(nested.metadata()),
                    };
                    self.tree(nested, &inner)?;
                }
            }
        }

        Ok(())
    }

    fn accordion_member(&mut self, group: &Tree, scope: &Scope) -> Result<(), CompileError> {
        if let Some((entry, members)) = self.accordion(group)? {
            let bucket = scope.bucket_for(group.metadata());
            self.push(bucket, entry);
            self.indexed.extend(members);
        }
        Ok(())
    }

    fn push(&mut self, bucket: Scope, entry: CompiledEntry) {
        self.indexed.push(entry.clone());
        self.buckets
            .entry(bucket.category)
            .or_default()
            .entry(bucket.subcategory)
            .or_default()
            .push(entry);
    }

    fn leaf(&mut self, property: &PropertyNode) -> Result<Option<CompiledEntry>, CompileError> {
        let Some(kind) = property.metadata().get::<&VisualizerKind>(meta::VISUALIZER) else {
            warn!(property = property.id(), "property has no visualizer, skipping");
            return Ok(None);
        };

        let instance =
            self.registry
                .resolve(kind)
                .map_err(|error| CompileError::VisualizerConstruction {
                    kind: error.kind,
                    property: property.id().to_owned(),
                    reason: error.reason,
                })?;
        let widget = visualizer::visualize(instance.as_ref(), property)?;

        Ok(Some(entry_for(property.id(), property.metadata(), widget)))
    }

    /// Builds the collapsible entry for `group` along with the entries of its
    /// members, which are searchable on their own.
    fn accordion(
        &mut self,
        group: &Tree,
    ) -> Result<Option<(CompiledEntry, Vec<CompiledEntry>)>, CompileError> {
        if let Some(nested) = group.children().find(|child| matches!(child, Node::Tree(_))) {
            return Err(SchemaError::NestedAccordion {
                tree: group.id().to_owned(),
                child: nested.id().to_owned(),
            }
            .into());
        }

        if group.is_empty() {
            warn!(tree = group.id(), "accordion has no children, dropping it");
            return Ok(None);
        }

        let mut members = Vec::with_capacity(group.len());
        for child in group.children() {
            if let Node::Property(property) = child
                && let Some(entry) = self.leaf(property)?
            {
                members.push(entry);
            }
        }

        if members.is_empty() {
            warn!(tree = group.id(), "accordion has no visualized properties, dropping it");
            return Ok(None);
        }

        let body = members
            .iter()
            .map(|member| member.widget().clone())
            .collect();
        let entry = entry_for(
            group.id(),
            group.metadata(),
            RenderHandle::new(WidgetSpec::Accordion { body }),
        );

        Ok(Some((entry, members)))
    }
}

fn entry_for(id: &str, metadata: &Metadata, widget: RenderHandle) -> CompiledEntry {
    let title = metadata.get::<String>(meta::TITLE).unwrap_or_else(|| {
        warn!(node = id, "node has no title, falling back to its id");
        id.to_owned()
    });
    let description = metadata.get::<String>(meta::DESCRIPTION);
    let icon = metadata.get::<&IconRef>(meta::ICON).cloned();

    CompiledEntry::new(title, description, icon, widget)
}
