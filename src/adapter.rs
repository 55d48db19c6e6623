//! Seam between compiled output and a render host.
//!
//! A host implements [`PresentationAdapter`] and is driven with pages and
//! search results; it never sees how they were built.

use tracing::warn;

use crate::compiler::{CompiledPage, CompiledSchema, Compiler};
use crate::error::UnknownPageError;
use crate::visualizer::RenderHandle;

pub trait PresentationAdapter {
    /// Swap the visible surface to `page`.
    fn show_page(&mut self, page: &CompiledPage);

    /// Swap the visible surface to a flat result list.
    fn on_search_result(&mut self, widgets: Vec<RenderHandle>);
}

pub fn get_page<'a>(schema: &'a CompiledSchema, name: &str) -> Result<&'a CompiledPage, UnknownPageError> {
    schema.page(name)
}

/// Shows the page called `name`.
pub fn show_initial_page(
    adapter: &mut impl PresentationAdapter,
    schema: &CompiledSchema,
    name: &str,
) -> Result<(), UnknownPageError> {
    adapter.show_page(get_page(schema, name)?);
    Ok(())
}

/// Shows the page called `name`, or the first page when there is no such
/// page. Returns the category actually shown.
pub fn show_page_or_first<'a>(
    adapter: &mut impl PresentationAdapter,
    schema: &'a CompiledSchema,
    name: &str,
) -> Option<&'a str> {
    let page = match get_page(schema, name) {
        Ok(page) => page,
        Err(error) => {
            warn!(%error, "falling back to the first page");
            schema.first_page()?
        }
    };
    adapter.show_page(page);
    Some(page.category())
}

/// Runs `text` against the compiler's search index and hands the result to
/// the adapter.
pub fn search(adapter: &mut impl PresentationAdapter, compiler: &Compiler, text: &str) -> usize {
    let results = compiler.query(text);
    let count = results.len();
    adapter.on_search_result(results);
    count
}
