use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::error::ValueError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// A captured keyboard shortcut. `key == None` means unbound.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct KeyBinding {
    pub key: Option<String>,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyBinding {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::default()
        }
    }

    pub fn unbound() -> Self {
        Self::default()
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn is_bound(&self) -> bool {
        self.key.is_some()
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(key) = &self.key else {
            return f.write_str("Unbound");
        };

        if self.ctrl {
            f.write_str("Ctrl+")?;
        }
        if self.alt {
            f.write_str("Alt+")?;
        }
        if self.shift {
            f.write_str("Shift+")?;
        }
        f.write_str(key)
    }
}

/// Zero-argument callback behind an action button.
#[derive(Clone)]
pub struct Action(Rc<dyn Fn()>);

impl Action {
    pub fn new(callback: impl Fn() + 'static) -> Self {
        Self(Rc::new(callback))
    }

    pub fn invoke(&self) {
        (self.0)();
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action(..)")
    }
}

/// Enum types usable as property values. Their variants become the options
/// of a dropdown or radio group.
pub trait EnumChoice: Clone + PartialEq + 'static {
    fn variants() -> &'static [Self];
    fn label(&self) -> &str;
}

/// Type-erased property value as seen by visualizers and widgets.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Bool(bool),
    Number(f64),
    Text(String),
    Color(Rgba),
    Key(KeyBinding),
    Variant(String),
    Action,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Color(_) => "color",
            Self::Key(_) => "key binding",
            Self::Variant(_) => "choice",
            Self::Action => "action",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Text of a `Text` or `Variant` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) | Self::Variant(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Rgba> {
        match self {
            Self::Color(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_key(&self) -> Option<&KeyBinding> {
        match self {
            Self::Key(value) => Some(value),
            _ => None,
        }
    }
}

/// Rust types that can live inside a [`Property`](super::Property).
pub trait PropertyValue: Clone + 'static {
    const TYPE_NAME: &'static str;

    fn to_value(&self) -> Value;

    fn from_value(value: &Value) -> Result<Self, ValueError>;

    /// Option labels for enum-backed values.
    fn variants() -> Option<Vec<String>> {
        None
    }

    fn invoke(&self) {}
}

fn mismatch<T: PropertyValue>(value: &Value) -> ValueError {
    ValueError {
        expected: T::TYPE_NAME,
        found: value.type_name(),
    }
}

impl PropertyValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        value.as_bool().ok_or_else(|| mismatch::<Self>(value))
    }
}

impl PropertyValue for f64 {
    const TYPE_NAME: &'static str = "number";

    fn to_value(&self) -> Value {
        Value::Number(*self)
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        value.as_number().ok_or_else(|| mismatch::<Self>(value))
    }
}

impl PropertyValue for f32 {
    const TYPE_NAME: &'static str = "number";

    fn to_value(&self) -> Value {
        Value::Number(f64::from(*self))
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        value
            .as_number()
            .map(|number| number as f32)
            .ok_or_else(|| mismatch::<Self>(value))
    }
}

impl PropertyValue for i64 {
    const TYPE_NAME: &'static str = "number";

    fn to_value(&self) -> Value {
        Value::Number(*self as f64)
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        value
            .as_number()
            .map(|number| number.round() as i64)
            .ok_or_else(|| mismatch::<Self>(value))
    }
}

impl PropertyValue for String {
    const TYPE_NAME: &'static str = "text";

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| mismatch::<Self>(value))
    }
}

impl PropertyValue for Rgba {
    const TYPE_NAME: &'static str = "color";

    fn to_value(&self) -> Value {
        Value::Color(*self)
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        value.as_color().ok_or_else(|| mismatch::<Self>(value))
    }
}

impl PropertyValue for KeyBinding {
    const TYPE_NAME: &'static str = "key binding";

    fn to_value(&self) -> Value {
        Value::Key(self.clone())
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        value.as_key().cloned().ok_or_else(|| mismatch::<Self>(value))
    }
}

impl PropertyValue for Action {
    const TYPE_NAME: &'static str = "action";

    fn to_value(&self) -> Value {
        Value::Action
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        Err(mismatch::<Self>(value))
    }

    fn invoke(&self) {
        Action::invoke(self);
    }
}

impl<T: EnumChoice> PropertyValue for T {
    const TYPE_NAME: &'static str = "choice";

    fn to_value(&self) -> Value {
        Value::Variant(self.label().to_owned())
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        let label = value.as_str().ok_or_else(|| mismatch::<Self>(value))?;
        <T as EnumChoice>::variants()
            .iter()
            .find(|variant| variant.label() == label)
            .cloned()
            .ok_or(ValueError {
                expected: Self::TYPE_NAME,
                found: "unknown variant",
            })
    }

    fn variants() -> Option<Vec<String>> {
        Some(
            <T as EnumChoice>::variants()
                .iter()
                .map(|variant| variant.label().to_owned())
                .collect(),
        )
    }
}
