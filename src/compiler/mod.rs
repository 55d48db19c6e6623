//! Settings tree to page compiler.
//!
//! [`Compiler::compile`] walks a [`Tree`], asks the visualizer registry for a
//! widget per property, buckets the results by category and subcategory and
//! caches the output by tree identity. Successful compiles feed the shared
//! [`SearchIndex`].

mod page;
mod walk;

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::CompileError;
use crate::schema::{Tree, TreeId};
use crate::search::SearchIndex;
use crate::visualizer::{RenderHandle, VisualizerRegistry};

pub use page::{CompiledEntry, CompiledPage, CompiledSchema, SubcategoryGroup};
pub use walk::{DEFAULT_CATEGORY, DEFAULT_SUBCATEGORY};

/// What a plain (non-accordion) nested tree does to its descendants' buckets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NestedTreePolicy {
    /// Children are bucketed as if they sat directly in the parent.
    #[default]
    Flatten,
    /// The nested tree's `category`/`subcategory` become the default bucket
    /// for everything below it.
    Scoped,
}

impl NestedTreePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flatten => "flatten",
            Self::Scoped => "scoped",
        }
    }
}

impl fmt::Display for NestedTreePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NestedTreePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "flatten" => Ok(Self::Flatten),
            "scoped" => Ok(Self::Scoped),
            other => Err(format!(
                "unknown nested tree policy '{other}' (expected 'flatten' or 'scoped')"
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompileOptions {
    pub nested_trees: NestedTreePolicy,
    /// Emit compile and query durations at info level.
    pub log_timings: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            nested_trees: NestedTreePolicy::default(),
            log_timings: true,
        }
    }
}

pub struct Compiler {
    registry: VisualizerRegistry,
    search: SearchIndex,
    options: CompileOptions,
    cache: HashMap<TreeId, Rc<CompiledSchema>>,
}

impl Compiler {
    pub fn new(registry: VisualizerRegistry, search: SearchIndex, options: CompileOptions) -> Self {
        Self {
            registry,
            search,
            options,
            cache: HashMap::new(),
        }
    }

    pub fn with_options(options: CompileOptions) -> Self {
        Self::new(VisualizerRegistry::with_builtins(), SearchIndex::new(), options)
    }

    /// Compiles `tree`, or returns the output cached for its identity.
    ///
    /// Authoring errors abort the whole compile; nothing is cached and the
    /// search index is left as it was.
    pub fn compile(&mut self, tree: &Tree) -> Result<Rc<CompiledSchema>, CompileError> {
        if let Some(cached) = self.cache.get(&tree.identity()) {
            debug!(tree = tree.id(), "compile cache hit");
            return Ok(Rc::clone(cached));
        }

        let started = Instant::now();
        let (schema, indexed) =
            walk::Walk::new(&mut self.registry, self.options.nested_trees).run(tree)?;

        for entry in &indexed {
            self.search.index(entry);
        }

        let schema = Rc::new(schema);
        self.cache.insert(tree.identity(), Rc::clone(&schema));

        if self.options.log_timings {
            info!(
                tree = tree.id(),
                pages = schema.len(),
                entries = schema.entry_count(),
                elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
                "compiled settings tree"
            );
        }

        Ok(schema)
    }

    /// Runs a search across every tree compiled so far.
    pub fn query(&self, text: &str) -> Vec<RenderHandle> {
        let started = Instant::now();
        let results = self.search.query(text);
        if self.options.log_timings {
            debug!(
                query = text,
                results = results.len(),
                elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
                "searched settings"
            );
        }
        results
    }

    pub fn cached(&self, tree: &Tree) -> Option<Rc<CompiledSchema>> {
        self.cache.get(&tree.identity()).cloned()
    }

    /// Drops the cached output for `tree` so the next compile walks it again.
    /// Entries it already added to the search index stay there.
    pub fn evict(&mut self, tree: &Tree) -> bool {
        self.cache.remove(&tree.identity()).is_some()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn options(&self) -> CompileOptions {
        self.options
    }

    pub fn registry(&self) -> &VisualizerRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut VisualizerRegistry {
        &mut self.registry
    }

    pub fn search(&self) -> &SearchIndex {
        &self.search
    }

    pub fn search_mut(&mut self) -> &mut SearchIndex {
        &mut self.search
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::with_options(CompileOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;
    use crate::schema::meta;
    use crate::schema::{Property, PropertyNode};
    use crate::visualizer::{VisualizerKind, WidgetSpec};

    fn toggle(id: &str, property: &Property<bool>) -> PropertyNode {
        PropertyNode::new(id, property)
            .title(id)
            .visualizer(VisualizerKind::TOGGLE)
    }

    #[test]
    fn headers_are_synthesized_once_per_subcategory() {
        let flag = Property::new(false);
        let tree = Tree::new("root")
            .child(toggle("a", &flag).subcategory("First"))
            .child(toggle("b", &flag).subcategory("Second"))
            .child(toggle("c", &flag).subcategory("First"));

        let schema = Compiler::default().compile(&tree).unwrap();
        let page = schema.page(DEFAULT_CATEGORY).unwrap();

        let names = page.groups().iter().map(SubcategoryGroup::name).collect::<Vec<_>>();
        assert_eq!(names, ["First", "Second"]);
        let first = page.group("First").unwrap();
        assert_eq!(first.header().title(), "First");
        assert!(matches!(first.header().widget().spec(), WidgetSpec::Header));
        let titles = first.entries().iter().map(CompiledEntry::title).collect::<Vec<_>>();
        assert_eq!(titles, ["a", "c"]);
    }

    #[test]
    fn plain_nested_trees_flatten_by_default() {
        let flag = Property::new(true);
        let tree = Tree::new("root")
            .child(toggle("top", &flag))
            .child(
                Tree::new("nested")
                    .category("Ignored")
                    .child(toggle("inner", &flag)),
            );

        let schema = Compiler::default().compile(&tree).unwrap();
        assert_eq!(schema.category_names().collect::<Vec<_>>(), [DEFAULT_CATEGORY]);
        assert_eq!(schema.entry_count(), 2);
    }

    #[test]
    fn scoped_policy_hands_tree_category_to_children() {
        let flag = Property::new(true);
        let tree = Tree::new("root").child(
            Tree::new("video")
                .category("Video")
                .subcategory("Display")
                .child(toggle("vsync", &flag))
                .child(toggle("hdr", &flag).subcategory("Color")),
        );

        let mut compiler = Compiler::with_options(CompileOptions {
            nested_trees: NestedTreePolicy::Scoped,
            log_timings: false,
        });
        let schema = compiler.compile(&tree).unwrap();
        let page = schema.page("Video").unwrap();
        assert_eq!(page.group("Display").unwrap().entries().len(), 1);
        assert_eq!(page.group("Color").unwrap().entries().len(), 1);
    }

    #[test]
    fn missing_title_falls_back_to_id() {
        let flag = Property::new(true);
        let tree = Tree::new("root").child(
            PropertyNode::new("untitled", &flag).visualizer(VisualizerKind::TOGGLE),
        );

        let schema = Compiler::default().compile(&tree).unwrap();
        let entry = schema.first_page().unwrap().entries().next().unwrap();
        assert_eq!(entry.title(), "untitled");
        assert_eq!(entry.description(), None);
        assert_eq!(entry.icon(), None);
    }

    #[test]
    fn failed_compile_caches_nothing_and_indexes_nothing() {
        let level = Property::new(0.5);
        let tree = Tree::new("root")
            .child(
                PropertyNode::new("fine", &level)
                    .title("Fine")
                    .visualizer(VisualizerKind::SLIDER),
            )
            .child(
                PropertyNode::new("broken", &level)
                    .title("Broken")
                    .visualizer(VisualizerKind::SLIDER)
                    .with(meta::MIN, 2)
                    .with(meta::MAX, 1),
            );

        let mut compiler = Compiler::default();
        let error = compiler.compile(&tree).unwrap_err();
        assert!(matches!(error, CompileError::Schema(SchemaError::EmptyRange { .. })));
        assert!(compiler.cached(&tree).is_none());
        assert!(compiler.search().is_empty());
    }

    #[test]
    fn unregistered_kind_names_kind_and_property() {
        let flag = Property::new(true);
        let tree = Tree::new("root").child(
            PropertyNode::new("glow", &flag).visualizer(VisualizerKind::new("hologram")),
        );

        let error = Compiler::default().compile(&tree).unwrap_err();
        assert!(matches!(
            error,
            CompileError::VisualizerConstruction { ref kind, ref property, .. }
                if kind.as_str() == "hologram" && property == "glow"
        ));
    }

    #[test]
    fn evict_forces_a_fresh_walk() {
        let flag = Property::new(true);
        let tree = Tree::new("root").child(toggle("a", &flag));

        let mut compiler = Compiler::default();
        let first = compiler.compile(&tree).unwrap();
        assert!(compiler.evict(&tree));
        assert!(!compiler.evict(&tree));
        let second = compiler.compile(&tree).unwrap();

        assert!(!Rc::ptr_eq(&first, &second));
        // Append-only: the first walk's entry is still indexed.
        assert_eq!(compiler.search().len(), 2);
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("Scoped".parse::<NestedTreePolicy>(), Ok(NestedTreePolicy::Scoped));
        assert_eq!("flatten".parse::<NestedTreePolicy>(), Ok(NestedTreePolicy::Flatten));
        assert!("deep".parse::<NestedTreePolicy>().is_err());
    }
}
