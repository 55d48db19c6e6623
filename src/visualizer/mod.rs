//! Metadata-keyed visualizer dispatch.
//!
//! A property names the visualizer it wants through its `visualizer`
//! metadata. The registry maps that kind to a factory and keeps exactly one
//! instance per kind once it has been asked for.

mod builtin;
mod widget;

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use tracing::debug;

use crate::error::{SchemaError, VisualizerConstructionError};
use crate::schema::PropertyNode;

pub use builtin::{
    ButtonVisualizer, ColorVisualizer, DropdownVisualizer, KeybindVisualizer, RadioVisualizer,
    SliderVisualizer, TextVisualizer, ToggleVisualizer,
};
pub use widget::{HandleId, InputGuard, RenderHandle, WidgetSpec};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct VisualizerKind(Cow<'static, str>);

impl VisualizerKind {
    pub const TOGGLE: Self = Self::from_static("toggle");
    pub const SLIDER: Self = Self::from_static("slider");
    pub const TEXT: Self = Self::from_static("text");
    pub const DROPDOWN: Self = Self::from_static("dropdown");
    pub const RADIO: Self = Self::from_static("radio");
    pub const COLOR: Self = Self::from_static("color");
    pub const KEYBIND: Self = Self::from_static("keybind");
    pub const BUTTON: Self = Self::from_static("button");

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VisualizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turns a property into a widget the render backend can realize.
///
/// Implementations read the current value and metadata and return a handle
/// whose write-back goes through the property's slot.
pub trait Visualizer {
    fn visualize(&self, property: &PropertyNode) -> Result<RenderHandle, SchemaError>;
}

type Factory = Box<dyn Fn() -> Result<Rc<dyn Visualizer>, String>>;

pub struct VisualizerRegistry {
    factories: HashMap<VisualizerKind, Factory>,
    instances: HashMap<VisualizerKind, Rc<dyn Visualizer>>,
}

impl VisualizerRegistry {
    /// Registry with no kinds at all.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
            instances: HashMap::new(),
        }
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register_default::<ToggleVisualizer>(VisualizerKind::TOGGLE);
        registry.register_default::<SliderVisualizer>(VisualizerKind::SLIDER);
        registry.register_default::<TextVisualizer>(VisualizerKind::TEXT);
        registry.register_default::<DropdownVisualizer>(VisualizerKind::DROPDOWN);
        registry.register_default::<RadioVisualizer>(VisualizerKind::RADIO);
        registry.register_default::<ColorVisualizer>(VisualizerKind::COLOR);
        registry.register_default::<KeybindVisualizer>(VisualizerKind::KEYBIND);
        registry.register_default::<ButtonVisualizer>(VisualizerKind::BUTTON);
        registry
    }

    /// Registers a fallible constructor for `kind`, dropping any instance
    /// built by a previous registration.
    pub fn register<V, F>(&mut self, kind: VisualizerKind, factory: F)
    where
        V: Visualizer + 'static,
        F: Fn() -> Result<V, String> + 'static,
    {
        self.instances.remove(&kind);
        self.factories.insert(
            kind,
            Box::new(move || factory().map(|visualizer| Rc::new(visualizer) as Rc<dyn Visualizer>)),
        );
    }

    pub fn register_default<V>(&mut self, kind: VisualizerKind)
    where
        V: Visualizer + Default + 'static,
    {
        self.register(kind, || Ok(V::default()));
    }

    pub fn is_registered(&self, kind: &VisualizerKind) -> bool {
        self.factories.contains_key(kind)
    }

    /// Returns the shared instance for `kind`, constructing it on first use.
    pub fn resolve(
        &mut self,
        kind: &VisualizerKind,
    ) -> Result<Rc<dyn Visualizer>, VisualizerConstructionError> {
        if let Some(instance) = self.instances.get(kind) {
            return Ok(Rc::clone(instance));
        }

        let factory = self
            .factories
            .get(kind)
            .ok_or_else(|| VisualizerConstructionError {
                kind: kind.clone(),
                reason: "no visualizer registered under this kind".to_owned(),
            })?;
        let instance = factory().map_err(|reason| VisualizerConstructionError {
            kind: kind.clone(),
            reason,
        })?;

        debug!(kind = %kind, "constructed visualizer");
        self.instances.insert(kind.clone(), Rc::clone(&instance));
        Ok(instance)
    }

    /// Number of visualizers constructed so far.
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }
}

impl Default for VisualizerRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

pub fn visualize(
    instance: &dyn Visualizer,
    property: &PropertyNode,
) -> Result<RenderHandle, SchemaError> {
    instance.visualize(property)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::schema::{Property, Value};

    struct Counting;

    impl Visualizer for Counting {
        fn visualize(&self, _property: &PropertyNode) -> Result<RenderHandle, SchemaError> {
            Ok(RenderHandle::new(WidgetSpec::Toggle))
        }
    }

    #[test]
    fn resolve_constructs_each_kind_once() {
        let constructed = Rc::new(Cell::new(0));
        let counter = Rc::clone(&constructed);
        let kind = VisualizerKind::new("counting");

        let mut registry = VisualizerRegistry::empty();
        registry.register(kind.clone(), move || {
            counter.set(counter.get() + 1);
            Ok(Counting)
        });

        let first = registry.resolve(&kind).unwrap();
        let second = registry.resolve(&kind).unwrap();

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(constructed.get(), 1);
        assert_eq!(registry.instance_count(), 1);
    }

    #[test]
    fn unknown_kind_names_itself() {
        let mut registry = VisualizerRegistry::with_builtins();
        let error = registry
            .resolve(&VisualizerKind::new("hologram"))
            .err()
            .unwrap();
        assert_eq!(error.kind.as_str(), "hologram");
    }

    #[test]
    fn failing_factory_is_not_cached() {
        let kind = VisualizerKind::new("broken");
        let mut registry = VisualizerRegistry::empty();
        registry.register::<Counting, _>(kind.clone(), || Err("missing font atlas".to_owned()));

        let error = registry.resolve(&kind).err().unwrap();
        assert_eq!(error.reason, "missing font atlas");
        assert_eq!(registry.instance_count(), 0);
    }

    #[test]
    fn builtin_toggle_reads_the_current_value() {
        let enabled = Property::new(true);
        let node = PropertyNode::new("enabled", &enabled).visualizer(VisualizerKind::TOGGLE);

        let mut registry = VisualizerRegistry::default();
        let toggle = registry.resolve(&VisualizerKind::TOGGLE).unwrap();
        let handle = visualize(toggle.as_ref(), &node).unwrap();

        assert_eq!(handle.value(), Some(Value::Bool(true)));
    }
}
