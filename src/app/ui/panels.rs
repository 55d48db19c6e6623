use std::rc::Rc;

use eframe::egui::{self, Align, Context, Layout, RichText, Ui};
use settings_forge::error::CompileError;
use settings_forge::schema::EnumChoice;

use crate::util::plural;

use super::super::{Surface, ViewModel};

impl ViewModel {
    pub(in crate::app) fn show(&mut self, ctx: &Context) -> Result<(), CompileError> {
        let mut search_changed = false;
        let mut recompile_requested = false;

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Settings");
                    ui.separator();
                    let search_response = ui
                        .add(
                            egui::TextEdit::singleline(&mut self.search)
                                .hint_text("Search settings")
                                .desired_width(240.0),
                        )
                        .on_hover_text("Matches titles and descriptions, tolerating small typos.");
                    search_changed = search_response.changed();

                    if ui
                        .button("Recompile")
                        .on_hover_text("Drop cached pages and search entries, then compile again.")
                        .clicked()
                    {
                        recompile_requested = true;
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.summary_text());
                    });
                });
            });

        if search_changed {
            self.run_search();
        }
        if recompile_requested {
            self.recompile()?;
        }

        egui::TopBottomPanel::bottom("status_bar")
            .resizable(false)
            .show(ctx, |ui| self.draw_status(ui));

        egui::SidePanel::left("categories")
            .resizable(true)
            .default_width(190.0)
            .show(ctx, |ui| self.draw_categories(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match &self.surface {
                    Surface::Page(name) => {
                        let name = name.clone();
                        self.draw_page(ui, &name);
                    }
                    Surface::SearchResults { query, widgets } => {
                        let (query, widgets) = (query.clone(), widgets.clone());
                        self.draw_search_results(ui, &query, &widgets);
                    }
                });
        });

        Ok(())
    }

    fn summary_text(&self) -> String {
        format!(
            "{}, {}, {} indexed, {}",
            plural(self.schema.len(), "page", "pages"),
            plural(self.schema.entry_count(), "entry", "entries"),
            self.compiler.search().len(),
            plural(self.compiler.registry().instance_count(), "visualizer", "visualizers"),
        )
    }

    fn draw_status(&mut self, ui: &mut Ui) {
        let mut dismissed = false;
        ui.horizontal(|ui| match &self.status {
            Some(status) => {
                ui.label(RichText::new(status.as_str()).color(ui.visuals().warn_fg_color));
                if ui.small_button("Dismiss").clicked() {
                    dismissed = true;
                }
            }
            None => {
                ui.label(RichText::new("Changes apply immediately.").weak());
            }
        });

        if dismissed {
            self.status = None;
        }
    }

    fn draw_categories(&mut self, ui: &mut Ui) {
        ui.heading("Categories");
        ui.separator();

        let schema = Rc::clone(&self.schema);
        let mut opened = None;
        for page in schema.pages() {
            let selected = matches!(&self.surface, Surface::Page(name) if name == page.category());
            let label = format!("{} ({})", page.category(), page.entry_count());
            if ui.selectable_label(selected, label).clicked() {
                opened = Some(page.category());
            }
        }
        if let Some(name) = opened {
            self.open_page(name);
        }

        ui.add_space(12.0);
        egui::CollapsingHeader::new("Live values")
            .default_open(false)
            .show(ui, |ui| {
                let settings = &self.settings;
                ui.label(format!("Master volume: {:.0}", settings.master_volume.get()));
                ui.label(format!("Window mode: {}", settings.window_mode.get().label()));
                ui.label(format!("Texture filter: {}", settings.texture_filter.get().label()));
                ui.label(format!("Crosshair: {}", settings.crosshair_color.get().to_hex()));
                ui.label(format!("Jump: {}", settings.jump.get()));
                ui.label(format!("Sprint: {}", settings.sprint.get()));
                ui.label(format!("Sensitivity: {:.1}", settings.sensitivity.get()));
                ui.label(format!("Unsaved notes: {}", settings.notes.with(String::len)));
                let edits = settings.master_volume.revision()
                    + settings.vsync.revision()
                    + settings.jump.revision()
                    + settings.sprint.revision();
                ui.label(RichText::new(format!("Edits to tracked values: {edits}")).weak());
            });
    }

    fn draw_page(&mut self, ui: &mut Ui, name: &str) {
        let schema = Rc::clone(&self.schema);
        let page = match schema.page(name) {
            Ok(page) => page,
            Err(error) => {
                ui.label(error.to_string());
                return;
            }
        };

        ui.heading(page.category());
        for group in page.groups() {
            ui.add_space(10.0);
            let header = group.header();
            self.draw_widget(ui, header.title(), header.description(), header.widget());
            ui.separator();
            for entry in group.entries() {
                self.draw_entry(ui, entry);
                ui.add_space(4.0);
            }
        }
    }
}
