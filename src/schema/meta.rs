use indexmap::IndexMap;
use serde::Serialize;

use crate::visualizer::VisualizerKind;

pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";
pub const CATEGORY: &str = "category";
pub const SUBCATEGORY: &str = "subcategory";
pub const ICON: &str = "icon";
pub const VISUALIZER: &str = "visualizer";
pub const ANNOTATION: &str = "annotation";
pub const MIN: &str = "min";
pub const MAX: &str = "max";
pub const STEP: &str = "step";
pub const OPTIONS: &str = "options";
pub const TEXT: &str = "text";
pub const HINT: &str = "hint";
pub const ALPHA: &str = "alpha";

/// Reference to an image asset, resolved by the render backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct IconRef(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Annotation {
    /// Render the annotated tree as a single collapsible group.
    Accordion,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetaValue {
    Str(String),
    Number(f64),
    Bool(bool),
    StrList(Vec<String>),
    Icon(IconRef),
    Visualizer(VisualizerKind),
    Annotation(Annotation),
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<f64> for MetaValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for MetaValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for MetaValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<String>> for MetaValue {
    fn from(value: Vec<String>) -> Self {
        Self::StrList(value)
    }
}

impl From<&[&str]> for MetaValue {
    fn from(value: &[&str]) -> Self {
        Self::StrList(value.iter().map(|item| (*item).to_owned()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for MetaValue {
    fn from(value: [&str; N]) -> Self {
        Self::StrList(value.iter().map(|item| (*item).to_owned()).collect())
    }
}

impl From<IconRef> for MetaValue {
    fn from(value: IconRef) -> Self {
        Self::Icon(value)
    }
}

impl From<VisualizerKind> for MetaValue {
    fn from(value: VisualizerKind) -> Self {
        Self::Visualizer(value)
    }
}

impl From<Annotation> for MetaValue {
    fn from(value: Annotation) -> Self {
        Self::Annotation(value)
    }
}

/// Typed view into a [`MetaValue`]. A mismatch yields `None`.
pub trait FromMeta<'a>: Sized {
    fn from_meta(value: &'a MetaValue) -> Option<Self>;
}

impl<'a> FromMeta<'a> for &'a str {
    fn from_meta(value: &'a MetaValue) -> Option<Self> {
        match value {
            MetaValue::Str(text) => Some(text),
            _ => None,
        }
    }
}

impl FromMeta<'_> for String {
    fn from_meta(value: &MetaValue) -> Option<Self> {
        <&str>::from_meta(value).map(str::to_owned)
    }
}

impl FromMeta<'_> for f64 {
    fn from_meta(value: &MetaValue) -> Option<Self> {
        match value {
            MetaValue::Number(number) => Some(*number),
            _ => None,
        }
    }
}

impl FromMeta<'_> for bool {
    fn from_meta(value: &MetaValue) -> Option<Self> {
        match value {
            MetaValue::Bool(flag) => Some(*flag),
            _ => None,
        }
    }
}

impl<'a> FromMeta<'a> for &'a [String] {
    fn from_meta(value: &'a MetaValue) -> Option<Self> {
        match value {
            MetaValue::StrList(items) => Some(items),
            _ => None,
        }
    }
}

impl<'a> FromMeta<'a> for &'a IconRef {
    fn from_meta(value: &'a MetaValue) -> Option<Self> {
        match value {
            MetaValue::Icon(icon) => Some(icon),
            _ => None,
        }
    }
}

impl<'a> FromMeta<'a> for &'a VisualizerKind {
    fn from_meta(value: &'a MetaValue) -> Option<Self> {
        match value {
            MetaValue::Visualizer(kind) => Some(kind),
            _ => None,
        }
    }
}

impl FromMeta<'_> for Annotation {
    fn from_meta(value: &MetaValue) -> Option<Self> {
        match value {
            MetaValue::Annotation(annotation) => Some(*annotation),
            _ => None,
        }
    }
}

/// Ordered key/value metadata attached to every node.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Metadata {
    entries: IndexMap<String, MetaValue>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Option<MetaValue> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<MetaValue> {
        self.entries.shift_remove(key)
    }

    pub fn raw(&self, key: &str) -> Option<&MetaValue> {
        self.entries.get(key)
    }

    pub fn get<'a, T: FromMeta<'a>>(&'a self, key: &str) -> Option<T> {
        self.entries.get(key).and_then(T::from_meta)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_lookup_returns_none_on_mismatch() {
        let mut meta = Metadata::new();
        meta.insert(TITLE, "Volume");
        meta.insert(MIN, 0);

        assert_eq!(meta.get::<&str>(TITLE), Some("Volume"));
        assert_eq!(meta.get::<f64>(MIN), Some(0.0));
        assert_eq!(meta.get::<f64>(TITLE), None);
        assert_eq!(meta.get::<bool>("missing"), None);
    }

    #[test]
    fn insertion_order_is_kept_and_overwrites_in_place() {
        let mut meta = Metadata::new();
        meta.insert("b", 1);
        meta.insert("a", 2);
        meta.insert("b", 3);

        let keys = meta.iter().map(|(key, _)| key).collect::<Vec<_>>();
        assert_eq!(keys, ["b", "a"]);
        assert_eq!(meta.get::<f64>("b"), Some(3.0));
    }

    #[test]
    fn options_accept_array_literals() {
        let mut meta = Metadata::new();
        meta.insert(OPTIONS, ["Low", "High"]);
        assert_eq!(
            meta.get::<&[String]>(OPTIONS),
            Some(&["Low".to_owned(), "High".to_owned()][..])
        );
    }
}
