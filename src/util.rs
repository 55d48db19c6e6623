use eframe::egui::{Color32, Key, Modifiers};
use settings_forge::schema::{KeyBinding, Rgba};

pub fn to_color32(color: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

pub fn from_color32(color: Color32) -> Rgba {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    Rgba::rgba(r, g, b, a)
}

/// Binding for a key press. Bare modifier presses never reach this: egui
/// reports them through `Modifiers`, not as keys.
pub fn key_binding(key: Key, modifiers: Modifiers) -> KeyBinding {
    let mut binding = KeyBinding::new(key.name());
    binding.ctrl = modifiers.ctrl || modifiers.mac_cmd;
    binding.shift = modifiers.shift;
    binding.alt = modifiers.alt;
    binding
}

pub fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}
