use crate::error::SchemaError;
use crate::schema::meta;
use crate::schema::{PropertyNode, Value};

use super::widget::{InputGuard, RenderHandle, WidgetSpec};
use super::{Visualizer, VisualizerKind};

const DEFAULT_SLIDER_MIN: f64 = 0.0;
const DEFAULT_SLIDER_MAX: f64 = 1.0;

fn expect_value(
    kind: VisualizerKind,
    property: &PropertyNode,
    accepts: impl Fn(&Value) -> bool,
) -> Result<(), SchemaError> {
    let value = property.value();
    if accepts(&value) {
        Ok(())
    } else {
        Err(SchemaError::UnsupportedValue {
            kind,
            property: property.id().to_owned(),
            found: value.type_name(),
        })
    }
}

/// Option list for dropdowns and radio groups: either explicit `options`
/// metadata over a text value, or the variants of an enum value. Never both.
fn choice_options(kind: VisualizerKind, property: &PropertyNode) -> Result<Vec<String>, SchemaError> {
    let explicit = property.metadata().get::<&[String]>(meta::OPTIONS);
    let variants = property.slot().variants();

    let options = match (explicit, variants) {
        (Some(_), Some(_)) => {
            return Err(SchemaError::ConflictingOptions {
                property: property.id().to_owned(),
            });
        }
        (Some(explicit), None) => {
            expect_value(kind, property, |value| matches!(value, Value::Text(_)))?;
            explicit.to_vec()
        }
        (None, Some(variants)) => variants,
        (None, None) => Vec::new(),
    };

    if options.len() < 2 {
        return Err(SchemaError::TooFewOptions {
            property: property.id().to_owned(),
            count: options.len(),
        });
    }

    Ok(options)
}

#[derive(Debug, Default)]
pub struct ToggleVisualizer;

impl Visualizer for ToggleVisualizer {
    fn visualize(&self, property: &PropertyNode) -> Result<RenderHandle, SchemaError> {
        expect_value(VisualizerKind::TOGGLE, property, |value| {
            matches!(value, Value::Bool(_))
        })?;
        Ok(RenderHandle::bound(WidgetSpec::Toggle, property, InputGuard::Any))
    }
}

/// Numeric slider over `min..=max` metadata.
#[derive(Debug, Default)]
pub struct SliderVisualizer;

impl Visualizer for SliderVisualizer {
    fn visualize(&self, property: &PropertyNode) -> Result<RenderHandle, SchemaError> {
        expect_value(VisualizerKind::SLIDER, property, |value| {
            matches!(value, Value::Number(_))
        })?;

        let metadata = property.metadata();
        let min = metadata.get::<f64>(meta::MIN).unwrap_or(DEFAULT_SLIDER_MIN);
        let max = metadata.get::<f64>(meta::MAX).unwrap_or(DEFAULT_SLIDER_MAX);
        // NaN bounds fail this comparison too.
        if !(min < max) {
            return Err(SchemaError::EmptyRange {
                property: property.id().to_owned(),
                min: min.to_string(),
                max: max.to_string(),
            });
        }
        let step = metadata
            .get::<f64>(meta::STEP)
            .filter(|step| *step > 0.0);

        Ok(RenderHandle::bound(
            WidgetSpec::Slider { min, max, step },
            property,
            InputGuard::Range { min, max },
        ))
    }
}

#[derive(Debug, Default)]
pub struct TextVisualizer;

impl Visualizer for TextVisualizer {
    fn visualize(&self, property: &PropertyNode) -> Result<RenderHandle, SchemaError> {
        expect_value(VisualizerKind::TEXT, property, |value| {
            matches!(value, Value::Text(_))
        })?;
        let hint = property.metadata().get::<String>(meta::HINT);
        Ok(RenderHandle::bound(
            WidgetSpec::Text { hint },
            property,
            InputGuard::Any,
        ))
    }
}

#[derive(Debug, Default)]
pub struct DropdownVisualizer;

impl Visualizer for DropdownVisualizer {
    fn visualize(&self, property: &PropertyNode) -> Result<RenderHandle, SchemaError> {
        let options = choice_options(VisualizerKind::DROPDOWN, property)?;
        Ok(RenderHandle::bound(
            WidgetSpec::Dropdown {
                options: options.clone(),
            },
            property,
            InputGuard::OneOf(options),
        ))
    }
}

#[derive(Debug, Default)]
pub struct RadioVisualizer;

impl Visualizer for RadioVisualizer {
    fn visualize(&self, property: &PropertyNode) -> Result<RenderHandle, SchemaError> {
        let options = choice_options(VisualizerKind::RADIO, property)?;
        Ok(RenderHandle::bound(
            WidgetSpec::Radio {
                options: options.clone(),
            },
            property,
            InputGuard::OneOf(options),
        ))
    }
}

#[derive(Debug, Default)]
pub struct ColorVisualizer;

impl Visualizer for ColorVisualizer {
    fn visualize(&self, property: &PropertyNode) -> Result<RenderHandle, SchemaError> {
        expect_value(VisualizerKind::COLOR, property, |value| {
            matches!(value, Value::Color(_))
        })?;
        let alpha = property.metadata().get::<bool>(meta::ALPHA).unwrap_or(true);
        Ok(RenderHandle::bound(
            WidgetSpec::Color { alpha },
            property,
            InputGuard::Any,
        ))
    }
}

#[derive(Debug, Default)]
pub struct KeybindVisualizer;

impl Visualizer for KeybindVisualizer {
    fn visualize(&self, property: &PropertyNode) -> Result<RenderHandle, SchemaError> {
        expect_value(VisualizerKind::KEYBIND, property, |value| {
            matches!(value, Value::Key(_))
        })?;
        Ok(RenderHandle::bound(WidgetSpec::Keybind, property, InputGuard::Any))
    }
}

/// Push button running the property's action. The label comes from `text`
/// metadata, then the title.
#[derive(Debug, Default)]
pub struct ButtonVisualizer;

impl Visualizer for ButtonVisualizer {
    fn visualize(&self, property: &PropertyNode) -> Result<RenderHandle, SchemaError> {
        expect_value(VisualizerKind::BUTTON, property, |value| {
            matches!(value, Value::Action)
        })?;
        let metadata = property.metadata();
        let text = metadata
            .get::<String>(meta::TEXT)
            .or_else(|| metadata.get::<String>(meta::TITLE))
            .unwrap_or_else(|| property.id().to_owned());
        Ok(RenderHandle::bound(
            WidgetSpec::Button { text },
            property,
            InputGuard::ReadOnly,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::schema::{Action, EnumChoice, KeyBinding, Property, Rgba};

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Filter {
        Nearest,
        Linear,
        Anisotropic,
    }

    impl EnumChoice for Filter {
        fn variants() -> &'static [Self] {
            &[Self::Nearest, Self::Linear, Self::Anisotropic]
        }

        fn label(&self) -> &str {
            match self {
                Self::Nearest => "Nearest",
                Self::Linear => "Linear",
                Self::Anisotropic => "Anisotropic",
            }
        }
    }

    #[test]
    fn slider_reads_bounds_and_rejects_empty_ranges() {
        let gain = Property::new(3.0);
        let node = PropertyNode::new("gain", &gain)
            .with(meta::MIN, -12)
            .with(meta::MAX, 12)
            .with(meta::STEP, 0.5);
        let handle = SliderVisualizer.visualize(&node).unwrap();
        assert!(matches!(
            handle.spec(),
            WidgetSpec::Slider { min, max, step: Some(step) }
                if *min == -12.0 && *max == 12.0 && *step == 0.5
        ));

        let flat = PropertyNode::new("flat", &gain).with(meta::MIN, 5).with(meta::MAX, 5);
        assert!(matches!(
            SliderVisualizer.visualize(&flat),
            Err(SchemaError::EmptyRange { .. })
        ));
    }

    #[test]
    fn slider_defaults_to_unit_range() {
        let opacity = Property::new(0.5);
        let handle = SliderVisualizer
            .visualize(&PropertyNode::new("opacity", &opacity))
            .unwrap();
        assert_eq!(
            handle.guard(),
            Some(&InputGuard::Range { min: 0.0, max: 1.0 })
        );
    }

    #[test]
    fn dropdown_takes_options_from_metadata_or_enum() {
        let preset = Property::new("Balanced".to_owned());
        let explicit = PropertyNode::new("preset", &preset)
            .with(meta::OPTIONS, ["Quiet", "Balanced", "Loud"]);
        let handle = DropdownVisualizer.visualize(&explicit).unwrap();
        assert!(matches!(handle.spec(), WidgetSpec::Dropdown { options } if options.len() == 3));

        let filter = Property::new(Filter::Linear);
        let backed = PropertyNode::new("filter", &filter);
        let handle = RadioVisualizer.visualize(&backed).unwrap();
        assert!(matches!(
            handle.spec(),
            WidgetSpec::Radio { options } if options == &["Nearest", "Linear", "Anisotropic"]
        ));

        handle.commit(Value::Variant("Anisotropic".to_owned())).unwrap();
        assert_eq!(filter.get(), Filter::Anisotropic);
    }

    #[test]
    fn dropdown_rejects_both_option_sources() {
        let filter = Property::new(Filter::Nearest);
        let node = PropertyNode::new("filter", &filter).with(meta::OPTIONS, ["A", "B"]);
        assert_eq!(
            DropdownVisualizer.visualize(&node).err(),
            Some(SchemaError::ConflictingOptions {
                property: "filter".to_owned()
            })
        );
    }

    #[test]
    fn choices_need_two_options() {
        let only = Property::new("Solo".to_owned());
        let node = PropertyNode::new("only", &only).with(meta::OPTIONS, ["Solo"]);
        assert_eq!(
            RadioVisualizer.visualize(&node).err(),
            Some(SchemaError::TooFewOptions {
                property: "only".to_owned(),
                count: 1
            })
        );

        let bare = PropertyNode::new("bare", &only);
        assert!(matches!(
            DropdownVisualizer.visualize(&bare),
            Err(SchemaError::TooFewOptions { count: 0, .. })
        ));
    }

    #[test]
    fn visualizers_refuse_foreign_value_types() {
        let name = Property::new("player".to_owned());
        let node = PropertyNode::new("name", &name);
        assert!(matches!(
            ToggleVisualizer.visualize(&node),
            Err(SchemaError::UnsupportedValue { found: "text", .. })
        ));
        assert!(ColorVisualizer.visualize(&node).is_err());
        assert!(KeybindVisualizer.visualize(&node).is_err());
    }

    #[test]
    fn button_runs_its_action_and_prefers_text_metadata() {
        let runs = Rc::new(Cell::new(0));
        let counter = Rc::clone(&runs);
        let reset = Property::new(Action::new(move || counter.set(counter.get() + 1)));
        let node = PropertyNode::new("reset", &reset)
            .title("Reset layout")
            .with(meta::TEXT, "Reset");

        let handle = ButtonVisualizer.visualize(&node).unwrap();
        assert!(matches!(handle.spec(), WidgetSpec::Button { text } if text == "Reset"));
        assert!(handle.activate());
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn color_and_keybind_bind_their_values() {
        let accent = Property::new(Rgba::rgb(200, 80, 40));
        let color = ColorVisualizer
            .visualize(&PropertyNode::new("accent", &accent).with(meta::ALPHA, false))
            .unwrap();
        assert!(matches!(color.spec(), WidgetSpec::Color { alpha: false }));

        let jump = Property::new(KeyBinding::new("Space"));
        let keybind = KeybindVisualizer
            .visualize(&PropertyNode::new("jump", &jump))
            .unwrap();
        keybind
            .commit(Value::Key(KeyBinding::new("J").with_ctrl()))
            .unwrap();
        assert_eq!(jump.get().to_string(), "Ctrl+J");
    }
}
