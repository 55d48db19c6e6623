use eframe::egui::{self, Event, Key, Response, RichText, Ui};
use settings_forge::compiler::CompiledEntry;
use settings_forge::schema::{KeyBinding, Rgba, Value};
use settings_forge::visualizer::{RenderHandle, WidgetSpec};
use tracing::warn;

use crate::util::{from_color32, key_binding, to_color32};

use super::super::ViewModel;

const ACCORDION_ANIMATION_SECS: f32 = 0.18;

impl ViewModel {
    pub(in crate::app) fn draw_entry(&mut self, ui: &mut Ui, entry: &CompiledEntry) {
        self.draw_widget(ui, entry.title(), entry.description(), entry.widget());
    }

    /// Realizes one compiled widget.
    pub(in crate::app) fn draw_widget(
        &mut self,
        ui: &mut Ui,
        title: &str,
        description: Option<&str>,
        handle: &RenderHandle,
    ) {
        let response = match handle.spec() {
            WidgetSpec::Header => ui.label(RichText::new(title).strong().size(15.0)),
            WidgetSpec::Toggle => {
                let mut checked = handle
                    .value()
                    .and_then(|value| value.as_bool())
                    .unwrap_or_default();
                let response = ui.checkbox(&mut checked, title);
                if response.changed() {
                    self.commit(title, handle, Value::Bool(checked));
                }
                response
            }
            WidgetSpec::Slider { min, max, step } => {
                self.draw_slider(ui, title, handle, (*min, *max), *step)
            }
            WidgetSpec::Text { hint } => {
                let mut text = current_text(handle);
                let response = ui
                    .horizontal(|ui| {
                        ui.label(title);
                        let mut edit = egui::TextEdit::singleline(&mut text);
                        if let Some(hint) = hint {
                            edit = edit.hint_text(hint.as_str());
                        }
                        ui.add(edit)
                    })
                    .inner;
                if response.changed() {
                    self.commit(title, handle, Value::Text(text));
                }
                response
            }
            WidgetSpec::Dropdown { options } => {
                let current = current_text(handle);
                let mut chosen = None;
                let response = ui
                    .horizontal(|ui| {
                        ui.label(title);
                        egui::ComboBox::from_id_salt(handle.id().get())
                            .selected_text(current.as_str())
                            .show_ui(ui, |ui| {
                                for option in options {
                                    if ui.selectable_label(*option == current, option.as_str()).clicked() {
                                        chosen = Some(option.clone());
                                    }
                                }
                            })
                            .response
                    })
                    .inner;
                self.commit_choice(title, handle, &current, chosen);
                response
            }
            WidgetSpec::Radio { options } => {
                let current = current_text(handle);
                let mut chosen = None;
                let response = ui
                    .horizontal(|ui| {
                        ui.label(title);
                        for option in options {
                            if ui.radio(*option == current, option.as_str()).clicked() {
                                chosen = Some(option.clone());
                            }
                        }
                    })
                    .response;
                self.commit_choice(title, handle, &current, chosen);
                response
            }
            WidgetSpec::Color { alpha } => {
                let current = handle
                    .value()
                    .and_then(|value| value.as_color())
                    .unwrap_or(Rgba::rgb(255, 255, 255));
                let (response, picked) = ui
                    .horizontal(|ui| {
                        let picked = if *alpha {
                            let mut color = to_color32(current);
                            let response = ui.color_edit_button_srgba(&mut color);
                            (response, from_color32(color))
                        } else {
                            let mut rgb = [current.r, current.g, current.b];
                            let response = ui.color_edit_button_srgb(&mut rgb);
                            (response, Rgba::rgb(rgb[0], rgb[1], rgb[2]))
                        };
                        ui.label(title);
                        picked
                    })
                    .inner;
                if response.changed() && picked != current {
                    self.commit(title, handle, Value::Color(picked));
                }
                response
            }
            WidgetSpec::Keybind => self.draw_keybind(ui, title, handle),
            WidgetSpec::Button { text } => {
                let response = ui
                    .horizontal(|ui| {
                        ui.label(title);
                        ui.button(text.as_str())
                    })
                    .inner;
                if response.clicked() && handle.activate() {
                    self.status = Some(format!("{title}: done"));
                }
                response
            }
            WidgetSpec::Accordion { .. } => self.draw_accordion(ui, title, handle),
        };

        if let Some(description) = description {
            response.on_hover_text(description);
        }
    }

    fn draw_keybind(&mut self, ui: &mut Ui, title: &str, handle: &RenderHandle) -> Response {
        let binding = handle
            .value()
            .and_then(|value| value.as_key().cloned())
            .unwrap_or_default();
        let capturing = self.capturing_key == Some(handle.id());
        let label = if capturing {
            "Press a key...".to_owned()
        } else {
            binding.to_string()
        };

        let response = ui
            .horizontal(|ui| {
                ui.label(title);
                ui.add(egui::Button::new(label).selected(capturing))
            })
            .inner
            .on_hover_text("Click, then press a key. Escape cancels, Backspace unbinds.");

        if response.clicked() {
            self.capturing_key = if capturing { None } else { Some(handle.id()) };
            return response;
        }
        if !capturing {
            return response;
        }

        let pressed = ui.input(|input| {
            input.events.iter().find_map(|event| match event {
                Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } => Some((*key, *modifiers)),
                _ => None,
            })
        });
        if let Some((key, modifiers)) = pressed {
            self.capturing_key = None;
            match key {
                Key::Escape => {}
                Key::Backspace => self.commit(title, handle, Value::Key(KeyBinding::unbound())),
                _ => self.commit(title, handle, Value::Key(key_binding(key, modifiers))),
            }
        }

        response
    }

    fn draw_accordion(&mut self, ui: &mut Ui, title: &str, handle: &RenderHandle) -> Response {
        let mut state = self.accordions.get(&handle.id()).copied().unwrap_or_default();

        let marker = if state.target_open() { "▼" } else { "▶" };
        let header = ui.add(
            egui::Button::new(RichText::new(format!("{marker} {title}")).strong()).frame(false),
        );
        if header.clicked() {
            state = state.click();
        }

        let openness = ui.ctx().animate_bool_with_time(
            header.id.with("accordion_openness"),
            state.target_open(),
            ACCORDION_ANIMATION_SECS,
        );
        let target = if state.target_open() { 1.0 } else { 0.0 };
        if state.is_animating() && (openness - target).abs() <= f32::EPSILON {
            state = state.settle();
        }

        if state.body_visible() {
            ui.indent(header.id.with("accordion_body"), |ui| {
                ui.multiply_opacity(openness);
                for child in handle.children() {
                    self.draw_widget(ui, child.label().unwrap_or_default(), None, child);
                }
            });
        }

        self.accordions.insert(handle.id(), state);
        header
    }

    fn commit_choice(&mut self, title: &str, handle: &RenderHandle, current: &str, chosen: Option<String>) {
        if let Some(option) = chosen
            && option != current
        {
            self.commit(title, handle, Value::Text(option));
        }
    }

    pub(in crate::app) fn commit(&mut self, title: &str, handle: &RenderHandle, value: Value) {
        if let Err(error) = handle.commit(value) {
            warn!(
                property = handle.property_id().unwrap_or(title),
                %error,
                "input rejected"
            );
            self.status = Some(format!("{title}: {error}"));
        }
    }
}

fn current_text(handle: &RenderHandle) -> String {
    handle
        .value()
        .and_then(|value| value.as_str().map(str::to_owned))
        .unwrap_or_default()
}
