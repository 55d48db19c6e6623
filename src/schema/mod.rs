//! In-memory settings graph: trees of typed properties plus free-form metadata.

pub mod meta;
mod property;
mod tree;
mod value;

pub use meta::{Annotation, FromMeta, IconRef, MetaValue, Metadata};
pub use property::{Property, PropertySlot};
pub use tree::{Node, NodeKind, PropertyNode, Tree, TreeId};
pub use value::{Action, EnumChoice, KeyBinding, PropertyValue, Rgba, Value};
