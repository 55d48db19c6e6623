use indexmap::IndexMap;
use serde::Serialize;

use crate::error::UnknownPageError;
use crate::schema::IconRef;
use crate::visualizer::{RenderHandle, WidgetSpec};

/// One row of a compiled page: a property widget or an accordion group.
#[derive(Clone, Debug, Serialize)]
pub struct CompiledEntry {
    title: String,
    description: Option<String>,
    icon: Option<IconRef>,
    widget: RenderHandle,
}

impl CompiledEntry {
    pub(crate) fn new(
        title: String,
        description: Option<String>,
        icon: Option<IconRef>,
        widget: RenderHandle,
    ) -> Self {
        Self {
            title,
            description,
            icon,
            widget,
        }
    }

    fn header(subcategory: &str) -> Self {
        Self::new(
            subcategory.to_owned(),
            None,
            None,
            RenderHandle::new(WidgetSpec::Header),
        )
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn icon(&self) -> Option<&IconRef> {
        self.icon.as_ref()
    }

    pub fn widget(&self) -> &RenderHandle {
        &self.widget
    }

    pub fn is_accordion(&self) -> bool {
        matches!(self.widget.spec(), WidgetSpec::Accordion { .. })
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SubcategoryGroup {
    name: String,
    header: CompiledEntry,
    entries: Vec<CompiledEntry>,
}

impl SubcategoryGroup {
    pub(crate) fn new(name: String, entries: Vec<CompiledEntry>) -> Self {
        Self {
            header: CompiledEntry::header(&name),
            name,
            entries,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn header(&self) -> &CompiledEntry {
        &self.header
    }

    pub fn entries(&self) -> &[CompiledEntry] {
        &self.entries
    }
}

/// Everything that belongs to one category, grouped by subcategory.
#[derive(Clone, Debug, Serialize)]
pub struct CompiledPage {
    category: String,
    groups: Vec<SubcategoryGroup>,
}

impl CompiledPage {
    pub(crate) fn new(category: String, groups: Vec<SubcategoryGroup>) -> Self {
        Self { category, groups }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn groups(&self) -> &[SubcategoryGroup] {
        &self.groups
    }

    pub fn group(&self, subcategory: &str) -> Option<&SubcategoryGroup> {
        self.groups.iter().find(|group| group.name == subcategory)
    }

    /// Property and accordion entries in display order, headers excluded.
    pub fn entries(&self) -> impl Iterator<Item = &CompiledEntry> {
        self.groups.iter().flat_map(|group| group.entries.iter())
    }

    pub fn entry_count(&self) -> usize {
        self.groups.iter().map(|group| group.entries.len()).sum()
    }
}

/// Compiled output for one tree: category name to page.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct CompiledSchema {
    pages: IndexMap<String, CompiledPage>,
}

impl CompiledSchema {
    pub(crate) fn new(pages: IndexMap<String, CompiledPage>) -> Self {
        Self { pages }
    }

    pub fn page(&self, name: &str) -> Result<&CompiledPage, UnknownPageError> {
        self.pages.get(name).ok_or_else(|| UnknownPageError {
            page: name.to_owned(),
            available: self.category_names().map(str::to_owned).collect(),
        })
    }

    pub fn first_page(&self) -> Option<&CompiledPage> {
        self.pages.values().next()
    }

    pub fn pages(&self) -> impl Iterator<Item = &CompiledPage> {
        self.pages.values()
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn entry_count(&self) -> usize {
        self.pages.values().map(CompiledPage::entry_count).sum()
    }
}
