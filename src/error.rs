//! Error taxonomy for schema compilation and widget write-back.

use thiserror::Error;

use crate::visualizer::VisualizerKind;

/// Schema authoring mistakes. These abort compilation of the whole schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// An accordion group contained something other than properties.
    #[error("accordion '{tree}' contains nested tree '{child}'; accordions may only hold properties")]
    NestedAccordion { tree: String, child: String },

    /// A choice visualizer was given both an explicit option list and an enum-backed value.
    #[error("property '{property}' declares explicit options but its value is enum-backed")]
    ConflictingOptions { property: String },

    /// A choice or numeric visualizer cannot offer at least two values.
    #[error("property '{property}' needs at least two options, got {count}")]
    TooFewOptions { property: String, count: usize },

    /// Slider bounds that do not describe a usable range.
    #[error("property '{property}' has an empty slider range [{min}, {max}]")]
    EmptyRange { property: String, min: String, max: String },

    /// A visualizer was paired with a value it cannot edit.
    #[error("visualizer '{kind}' cannot edit property '{property}' holding a {found} value")]
    UnsupportedValue {
        kind: VisualizerKind,
        property: String,
        found: &'static str,
    },
}

/// The registry could not produce a visualizer for a kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot construct visualizer '{kind}': {reason}")]
pub struct VisualizerConstructionError {
    pub kind: VisualizerKind,
    pub reason: String,
}

/// Failure of a single `compile` call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("cannot construct visualizer '{kind}' for property '{property}': {reason}")]
    VisualizerConstruction {
        kind: VisualizerKind,
        property: String,
        reason: String,
    },
}

/// A requested page is not part of the compiled schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown settings page '{page}' (available: {})", .available.join(", "))]
pub struct UnknownPageError {
    pub page: String,
    pub available: Vec<String>,
}

/// A property was handed a value of the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected a {expected} value, got {found}")]
pub struct ValueError {
    pub expected: &'static str,
    pub found: &'static str,
}

/// User input that a widget refused to commit.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputRejected {
    #[error("{value} is outside [{min}, {max}]")]
    OutOfRange { value: f64, min: f64, max: f64 },

    #[error("'{0}' is not one of the offered options")]
    UnknownOption(String),

    #[error("widget is read-only")]
    ReadOnly,

    #[error(transparent)]
    Value(#[from] ValueError),
}
