//! Compiles annotated settings trees into grouped, searchable pages of
//! widgets.
//!
//! Build a [`Tree`] of [`Property`] leaves tagged with metadata, hand it to a
//! [`Compiler`], and drive a render host through [`adapter`].

pub mod accordion;
pub mod adapter;
pub mod compiler;
pub mod demo;
pub mod error;
pub mod schema;
pub mod search;
pub mod visualizer;

pub use accordion::AccordionState;
pub use adapter::{PresentationAdapter, get_page};
pub use compiler::{
    CompileOptions, CompiledEntry, CompiledPage, CompiledSchema, Compiler, NestedTreePolicy,
    SubcategoryGroup,
};
pub use error::{
    CompileError, InputRejected, SchemaError, UnknownPageError, ValueError,
    VisualizerConstructionError,
};
pub use schema::{Node, Property, PropertyNode, Tree};
pub use search::SearchIndex;
pub use visualizer::{RenderHandle, Visualizer, VisualizerKind, VisualizerRegistry, WidgetSpec};
