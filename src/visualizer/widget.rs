use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::{InputRejected, ValueError};
use crate::schema::meta;
use crate::schema::{PropertyNode, PropertySlot, Value};

static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct HandleId(u64);

impl HandleId {
    fn next() -> Self {
        Self(NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Backend-neutral description of a widget.
#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum WidgetSpec {
    /// Synthesized subcategory header.
    Header,
    Toggle,
    Slider {
        min: f64,
        max: f64,
        step: Option<f64>,
    },
    Text {
        hint: Option<String>,
    },
    Dropdown {
        options: Vec<String>,
    },
    Radio {
        options: Vec<String>,
    },
    Color {
        alpha: bool,
    },
    Keybind,
    Button {
        text: String,
    },
    Accordion {
        body: Vec<RenderHandle>,
    },
}

impl WidgetSpec {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Toggle => "toggle",
            Self::Slider { .. } => "slider",
            Self::Text { .. } => "text",
            Self::Dropdown { .. } => "dropdown",
            Self::Radio { .. } => "radio",
            Self::Color { .. } => "color",
            Self::Keybind => "keybind",
            Self::Button { .. } => "button",
            Self::Accordion { .. } => "accordion",
        }
    }
}

/// Validation applied before a widget writes user input back.
#[derive(Clone, Debug, PartialEq)]
pub enum InputGuard {
    Any,
    Range { min: f64, max: f64 },
    OneOf(Vec<String>),
    ReadOnly,
}

impl InputGuard {
    fn check(&self, value: &Value) -> Result<(), InputRejected> {
        match self {
            Self::Any => Ok(()),
            Self::ReadOnly => Err(InputRejected::ReadOnly),
            Self::Range { min, max } => {
                let number = value.as_number().ok_or(ValueError {
                    expected: "number",
                    found: value.type_name(),
                })?;
                if number >= *min && number <= *max {
                    Ok(())
                } else {
                    Err(InputRejected::OutOfRange {
                        value: number,
                        min: *min,
                        max: *max,
                    })
                }
            }
            Self::OneOf(options) => {
                let text = value.as_str().ok_or(ValueError {
                    expected: "text",
                    found: value.type_name(),
                })?;
                if options.iter().any(|option| option == text) {
                    Ok(())
                } else {
                    Err(InputRejected::UnknownOption(text.to_owned()))
                }
            }
        }
    }
}

struct Binding {
    property: String,
    label: String,
    slot: Rc<dyn PropertySlot>,
    guard: InputGuard,
}

struct Widget {
    id: HandleId,
    spec: WidgetSpec,
    binding: Option<Binding>,
}

/// Shared reference to a compiled widget.
///
/// Equality is identity: two handles are equal when they point at the same
/// widget.
#[derive(Clone)]
pub struct RenderHandle(Rc<Widget>);

impl RenderHandle {
    /// A widget with no property behind it (headers, accordion shells).
    pub fn new(spec: WidgetSpec) -> Self {
        Self(Rc::new(Widget {
            id: HandleId::next(),
            spec,
            binding: None,
        }))
    }

    pub fn bound(spec: WidgetSpec, property: &PropertyNode, guard: InputGuard) -> Self {
        Self(Rc::new(Widget {
            id: HandleId::next(),
            spec,
            binding: Some(Binding {
                property: property.id().to_owned(),
                label: property
                    .metadata()
                    .get::<String>(meta::TITLE)
                    .unwrap_or_else(|| property.id().to_owned()),
                slot: Rc::clone(property.slot()),
                guard,
            }),
        }))
    }

    pub fn id(&self) -> HandleId {
        self.0.id
    }

    pub fn spec(&self) -> &WidgetSpec {
        &self.0.spec
    }

    pub fn property_id(&self) -> Option<&str> {
        self.0.binding.as_ref().map(|binding| binding.property.as_str())
    }

    /// Title of the bound property, or its id when it has none.
    pub fn label(&self) -> Option<&str> {
        self.0.binding.as_ref().map(|binding| binding.label.as_str())
    }

    pub fn guard(&self) -> Option<&InputGuard> {
        self.0.binding.as_ref().map(|binding| &binding.guard)
    }

    /// Current value of the bound property.
    pub fn value(&self) -> Option<Value> {
        self.0.binding.as_ref().map(|binding| binding.slot.value())
    }

    pub fn revision(&self) -> Option<u64> {
        self.0.binding.as_ref().map(|binding| binding.slot.revision())
    }

    /// Writes user input back to the property. Rejected input leaves the
    /// property untouched.
    pub fn commit(&self, value: Value) -> Result<(), InputRejected> {
        let binding = self.0.binding.as_ref().ok_or(InputRejected::ReadOnly)?;
        binding.guard.check(&value)?;
        binding.slot.set_value(&value)?;
        Ok(())
    }

    /// Runs the action behind a button. Returns `false` for other widgets.
    pub fn activate(&self) -> bool {
        let Some(binding) = &self.0.binding else {
            return false;
        };
        if !matches!(self.0.spec, WidgetSpec::Button { .. }) {
            return false;
        }

        binding.slot.invoke();
        true
    }

    /// Body of an accordion; empty for every other widget.
    pub fn children(&self) -> &[RenderHandle] {
        match &self.0.spec {
            WidgetSpec::Accordion { body } => body,
            _ => &[],
        }
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for RenderHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for RenderHandle {}

impl fmt::Debug for RenderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderHandle")
            .field("id", &self.0.id)
            .field("spec", &self.0.spec)
            .field("property", &self.property_id())
            .finish()
    }
}

impl Serialize for RenderHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("RenderHandle", 3)?;
        state.serialize_field("spec", self.spec())?;
        state.serialize_field("property", &self.property_id())?;
        state.serialize_field("value", &self.value())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Property;

    #[test]
    fn out_of_range_input_is_not_committed() {
        let volume = Property::new(50.0);
        let node = PropertyNode::new("volume", &volume);
        let handle = RenderHandle::bound(
            WidgetSpec::Slider {
                min: 0.0,
                max: 100.0,
                step: None,
            },
            &node,
            InputGuard::Range {
                min: 0.0,
                max: 100.0,
            },
        );

        assert!(matches!(
            handle.commit(Value::Number(140.0)),
            Err(InputRejected::OutOfRange { .. })
        ));
        assert_eq!(volume.get(), 50.0);
        assert_eq!(handle.label(), Some("volume"));

        handle.commit(Value::Number(75.0)).unwrap();
        assert_eq!(volume.get(), 75.0);
    }

    #[test]
    fn unknown_options_are_rejected() {
        let mode = Property::new("Fast".to_owned());
        let node = PropertyNode::new("mode", &mode);
        let options = vec!["Fast".to_owned(), "Fancy".to_owned()];
        let handle = RenderHandle::bound(
            WidgetSpec::Dropdown {
                options: options.clone(),
            },
            &node,
            InputGuard::OneOf(options),
        );

        assert_eq!(
            handle.commit(Value::Text("Ultra".to_owned())),
            Err(InputRejected::UnknownOption("Ultra".to_owned()))
        );
        handle.commit(Value::Text("Fancy".to_owned())).unwrap();
        assert_eq!(mode.get(), "Fancy");
    }

    #[test]
    fn guards_reject_values_of_the_wrong_shape() {
        let volume = Property::new(50.0);
        let slider = RenderHandle::bound(
            WidgetSpec::Slider {
                min: 0.0,
                max: 100.0,
                step: None,
            },
            &PropertyNode::new("volume", &volume),
            InputGuard::Range {
                min: 0.0,
                max: 100.0,
            },
        );
        assert_eq!(
            slider.guard().unwrap().check(&Value::Bool(true)),
            Err(InputRejected::Value(ValueError {
                expected: "number",
                found: "bool",
            }))
        );

        let mode = Property::new("Fast".to_owned());
        let dropdown = RenderHandle::bound(
            WidgetSpec::Dropdown {
                options: vec!["Fast".to_owned()],
            },
            &PropertyNode::new("mode", &mode),
            InputGuard::OneOf(vec!["Fast".to_owned()]),
        );
        assert_eq!(
            dropdown.guard().unwrap().check(&Value::Number(1.0)),
            Err(InputRejected::Value(ValueError {
                expected: "text",
                found: "number",
            }))
        );
    }

    #[test]
    fn unbound_handles_are_read_only() {
        let header = RenderHandle::new(WidgetSpec::Header);
        assert_eq!(header.commit(Value::Bool(true)), Err(InputRejected::ReadOnly));
        assert!(!header.activate());
        assert_eq!(header.value(), None);
    }

    #[test]
    fn handles_compare_by_identity() {
        let first = RenderHandle::new(WidgetSpec::Header);
        let second = RenderHandle::new(WidgetSpec::Header);
        assert_eq!(first, first.clone());
        assert_ne!(first, second);
    }
}
