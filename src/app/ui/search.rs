use std::collections::HashMap;
use std::rc::Rc;

use eframe::egui::text::LayoutJob;
use eframe::egui::{Color32, RichText, TextFormat, TextStyle, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use settings_forge::visualizer::{HandleId, RenderHandle};

use crate::util::plural;

use super::super::{SearchMatchCache, SearchRow, ViewModel};

const MATCH_COLOR: Color32 = Color32::from_rgb(246, 206, 104);

/// Character positions of `query` inside `text`. Typo matches found by the
/// index may have none.
fn fuzzy_match_indices(matcher: &SkimMatcherV2, text: &str, query: &str) -> Vec<usize> {
    matcher
        .fuzzy_indices(text, query)
        .or_else(|| matcher.fuzzy_indices(&text.to_lowercase(), &query.to_lowercase()))
        .map(|(_, indices)| indices)
        .unwrap_or_default()
}

fn highlighted(ui: &Ui, text: &str, indices: &[usize]) -> LayoutJob {
    let plain = TextFormat {
        font_id: TextStyle::Body.resolve(ui.style()),
        color: ui.visuals().strong_text_color(),
        ..Default::default()
    };
    let matched = TextFormat {
        color: MATCH_COLOR,
        ..plain.clone()
    };

    let mut job = LayoutJob::default();
    for (index, ch) in text.chars().enumerate() {
        let format = if indices.contains(&index) {
            matched.clone()
        } else {
            plain.clone()
        };
        job.append(ch.encode_utf8(&mut [0; 4]), 0.0, format);
    }
    job
}

impl ViewModel {
    fn search_rows(&mut self, query: &str) -> Rc<HashMap<HandleId, SearchRow>> {
        let indexed = self.compiler.search().len();
        if let Some(cache) = &self.search_match_cache
            && cache.query == query
            && cache.indexed == indexed
        {
            return Rc::clone(&cache.rows);
        }

        let matcher = SkimMatcherV2::default();
        let rows = self
            .compiler
            .search()
            .hits(query)
            .into_iter()
            .map(|hit| {
                let row = SearchRow {
                    title: hit.title.to_owned(),
                    description: hit.description.map(str::to_owned),
                    highlight: fuzzy_match_indices(&matcher, hit.title, query),
                };
                (hit.widget.id(), row)
            })
            .collect::<HashMap<_, _>>();

        let rows = Rc::new(rows);
        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            indexed,
            rows: Rc::clone(&rows),
        });
        rows
    }

    pub(in crate::app) fn draw_search_results(
        &mut self,
        ui: &mut Ui,
        query: &str,
        widgets: &[RenderHandle],
    ) {
        ui.heading(format!("Results for \"{query}\""));
        ui.label(RichText::new(plural(widgets.len(), "match", "matches")).weak());
        ui.separator();

        if widgets.is_empty() {
            ui.label("No settings match. Searches tolerate up to two typos.");
            return;
        }

        let rows = self.search_rows(query);
        for widget in widgets {
            let Some(row) = rows.get(&widget.id()) else {
                continue;
            };

            ui.label(highlighted(ui, &row.title, &row.highlight));
            if let Some(description) = &row.description {
                ui.label(RichText::new(description.as_str()).weak().small());
            }
            self.draw_widget(ui, &row.title, row.description.as_deref(), widget);
            ui.add_space(8.0);
        }
    }
}
