//! Sample game-style settings used by the host binary and the tests.

use crate::schema::meta;
use crate::schema::{Action, EnumChoice, IconRef, KeyBinding, Property, PropertyNode, Rgba, Tree};
use crate::visualizer::VisualizerKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowMode {
    Windowed,
    Borderless,
    Fullscreen,
}

impl EnumChoice for WindowMode {
    fn variants() -> &'static [Self] {
        &[Self::Windowed, Self::Borderless, Self::Fullscreen]
    }

    fn label(&self) -> &str {
        match self {
            Self::Windowed => "Windowed",
            Self::Borderless => "Borderless",
            Self::Fullscreen => "Fullscreen",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureFilter {
    Nearest,
    Bilinear,
    Trilinear,
    Anisotropic,
}

impl EnumChoice for TextureFilter {
    fn variants() -> &'static [Self] {
        &[
            Self::Nearest,
            Self::Bilinear,
            Self::Trilinear,
            Self::Anisotropic,
        ]
    }

    fn label(&self) -> &str {
        match self {
            Self::Nearest => "Nearest",
            Self::Bilinear => "Bilinear",
            Self::Trilinear => "Trilinear",
            Self::Anisotropic => "Anisotropic",
        }
    }
}

const DEFAULT_JUMP: &str = "Space";
const DEFAULT_SPRINT: &str = "Shift";

/// Application-side handles to every demo value. The tree built by
/// [`DemoSettings::tree`] shares these cells.
#[derive(Clone, Debug)]
pub struct DemoSettings {
    pub master_volume: Property<f64>,
    pub music_volume: Property<f64>,
    pub mute_unfocused: Property<bool>,
    pub output_device: Property<String>,
    pub window_mode: Property<WindowMode>,
    pub vsync: Property<bool>,
    pub render_scale: Property<f64>,
    pub texture_filter: Property<TextureFilter>,
    pub ambient_occlusion: Property<bool>,
    pub crosshair_color: Property<Rgba>,
    pub player_name: Property<String>,
    pub sensitivity: Property<f64>,
    pub invert_y: Property<bool>,
    pub jump: Property<KeyBinding>,
    pub sprint: Property<KeyBinding>,
    pub reset_keys: Property<Action>,
    pub notes: Property<String>,
}

impl DemoSettings {
    pub fn new() -> Self {
        let jump = Property::new(KeyBinding::new(DEFAULT_JUMP));
        let sprint = Property::new(KeyBinding::new(DEFAULT_SPRINT));
        let reset_keys = {
            let (jump, sprint) = (jump.clone(), sprint.clone());
            Property::new(Action::new(move || {
                jump.set(KeyBinding::new(DEFAULT_JUMP));
                sprint.set(KeyBinding::new(DEFAULT_SPRINT));
            }))
        };

        Self {
            master_volume: Property::new(80.0),
            music_volume: Property::new(60.0),
            mute_unfocused: Property::new(true),
            output_device: Property::new("System default".to_owned()),
            window_mode: Property::new(WindowMode::Borderless),
            vsync: Property::new(true),
            render_scale: Property::new(1.0),
            texture_filter: Property::new(TextureFilter::Trilinear),
            ambient_occlusion: Property::new(false),
            crosshair_color: Property::new(Rgba::rgb(80, 220, 120)),
            player_name: Property::new("Player".to_owned()),
            sensitivity: Property::new(2.5),
            invert_y: Property::new(false),
            jump,
            sprint,
            reset_keys,
            notes: Property::new(String::new()),
        }
    }

    pub fn tree(&self) -> Tree {
        Tree::new("settings")
            .title("Settings")
            .child(
                PropertyNode::new("master_volume", &self.master_volume)
                    .title("Master Volume")
                    .description("Loudness of everything the game plays")
                    .category("Audio")
                    .subcategory("Master")
                    .visualizer(VisualizerKind::SLIDER)
                    .with(meta::MIN, 0)
                    .with(meta::MAX, 100)
                    .with(meta::STEP, 1)
                    .with(meta::ICON, IconRef("icons/volume.png".to_owned())),
            )
            .child(
                PropertyNode::new("music_volume", &self.music_volume)
                    .title("Music Volume")
                    .category("Audio")
                    .subcategory("Master")
                    .visualizer(VisualizerKind::SLIDER)
                    .with(meta::MIN, 0)
                    .with(meta::MAX, 100)
                    .with(meta::STEP, 1),
            )
            .child(
                PropertyNode::new("mute_unfocused", &self.mute_unfocused)
                    .title("Mute When Unfocused")
                    .category("Audio")
                    .subcategory("Behavior")
                    .visualizer(VisualizerKind::TOGGLE),
            )
            .child(
                PropertyNode::new("output_device", &self.output_device)
                    .title("Output Device")
                    .category("Audio")
                    .subcategory("Output")
                    .visualizer(VisualizerKind::DROPDOWN)
                    .with(meta::OPTIONS, ["System default", "Headphones", "Speakers"]),
            )
            .child(self.display())
            .child(
                Tree::new("advanced_graphics")
                    .title("Advanced")
                    .description("Rendering features with a performance cost")
                    .category("Video")
                    .subcategory("Quality")
                    .accordion()
                    .child(
                        PropertyNode::new("texture_filter", &self.texture_filter)
                            .title("Texture Filtering")
                            .visualizer(VisualizerKind::DROPDOWN),
                    )
                    .child(
                        PropertyNode::new("ambient_occlusion", &self.ambient_occlusion)
                            .title("Ambient Occlusion")
                            .description("Soft contact shadows")
                            .visualizer(VisualizerKind::TOGGLE),
                    ),
            )
            .child(
                PropertyNode::new("crosshair_color", &self.crosshair_color)
                    .title("Crosshair Color")
                    .category("Interface")
                    .subcategory("Crosshair")
                    .visualizer(VisualizerKind::COLOR)
                    .with(meta::ALPHA, false),
            )
            .child(
                PropertyNode::new("player_name", &self.player_name)
                    .title("Player Name")
                    .description("Shown to other players")
                    .category("Interface")
                    .subcategory("Profile")
                    .visualizer(VisualizerKind::TEXT)
                    .with(meta::HINT, "Your name"),
            )
            .child(
                PropertyNode::new("notes", &self.notes)
                    .title("Internal Notes")
                    .category("Interface"),
            )
            .child(
                PropertyNode::new("sensitivity", &self.sensitivity)
                    .title("Mouse Sensitivity")
                    .category("Controls")
                    .subcategory("Mouse")
                    .visualizer(VisualizerKind::SLIDER)
                    .with(meta::MIN, 0.1)
                    .with(meta::MAX, 10)
                    .with(meta::STEP, 0.1),
            )
            .child(
                PropertyNode::new("invert_y", &self.invert_y)
                    .title("Invert Y Axis")
                    .category("Controls")
                    .subcategory("Mouse")
                    .visualizer(VisualizerKind::TOGGLE),
            )
            .child(
                Tree::new("movement_keys")
                    .title("Movement")
                    .category("Controls")
                    .subcategory("Keybinds")
                    .accordion()
                    .child(
                        PropertyNode::new("jump", &self.jump)
                            .title("Jump")
                            .visualizer(VisualizerKind::KEYBIND),
                    )
                    .child(
                        PropertyNode::new("sprint", &self.sprint)
                            .title("Sprint")
                            .visualizer(VisualizerKind::KEYBIND),
                    ),
            )
            .child(
                PropertyNode::new("reset_keys", &self.reset_keys)
                    .title("Reset Keybinds")
                    .description("Restore the default movement keys")
                    .category("Controls")
                    .subcategory("Keybinds")
                    .visualizer(VisualizerKind::BUTTON)
                    .with(meta::TEXT, "Reset"),
            )
    }

    /// Plain nested group. Flattened by default; with scoped nesting its
    /// metadata becomes the bucket of `render_scale`.
    fn display(&self) -> Tree {
        Tree::new("display")
            .category("Video")
            .subcategory("Display")
            .child(
                PropertyNode::new("window_mode", &self.window_mode)
                    .title("Window Mode")
                    .category("Video")
                    .subcategory("Display")
                    .visualizer(VisualizerKind::RADIO),
            )
            .child(
                PropertyNode::new("vsync", &self.vsync)
                    .title("VSync")
                    .description("Synchronize frames with the monitor refresh rate")
                    .category("Video")
                    .subcategory("Display")
                    .visualizer(VisualizerKind::TOGGLE),
            )
            .child(
                PropertyNode::new("render_scale", &self.render_scale)
                    .title("Render Scale")
                    .visualizer(VisualizerKind::SLIDER)
                    .with(meta::MIN, 0.5)
                    .with(meta::MAX, 2)
                    .with(meta::STEP, 0.05),
            )
    }
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self::new()
    }
}
