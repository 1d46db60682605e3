//! The on-screen control panel.
//!
//! A single row at the bottom of the window: a text field with a Create
//! button, a color picker with a gradient swatch, and the particle count.

use crate::color::Color;
use crate::input::MAX_DRAFT_LEN;

/// What the user asked for this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelAction {
    /// The text field was edited.
    Edit(String),
    Submit(String),
    SetColor(Color),
}

/// Panel widget state.
pub struct ControlPanel {
    text: String,
    color: [u8; 3],
}

impl ControlPanel {
    pub fn new(text: &str, color: Color) -> Self {
        Self {
            text: text.to_string(),
            color: color.to_array(),
        }
    }

    /// Mirror text submitted from elsewhere, such as the keyboard draft.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn show(&mut self, ctx: &egui::Context, particle_count: usize, paused: bool) -> Option<PanelAction> {
        let mut action = None;

        egui::Window::new("textdust")
            .title_bar(false)
            .resizable(false)
            .collapsible(false)
            .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -16.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let edit = ui.add(
                        egui::TextEdit::singleline(&mut self.text)
                            .hint_text("Type something...")
                            .char_limit(MAX_DRAFT_LEN)
                            .desired_width(220.0),
                    );
                    if edit.changed() {
                        action = Some(PanelAction::Edit(self.text.clone()));
                    }
                    let entered = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if ui.button("Create").clicked() || entered {
                        action = Some(PanelAction::Submit(self.text.clone()));
                    }

                    ui.separator();

                    if ui.color_edit_button_srgb(&mut self.color).changed() {
                        action = Some(PanelAction::SetColor(Color::from(self.color)));
                    }
                    gradient_swatch(ui, Color::from(self.color));
                });

                ui.horizontal(|ui| {
                    ui.label(format!("Particles: {}", particle_count));
                    if paused {
                        ui.separator();
                        ui.weak("Paused (Esc)");
                    }
                });
            });

        action
    }
}

/// A small diagonal gradient from `color` to a darker shade of it.
fn gradient_swatch(ui: &mut egui::Ui, color: Color) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(36.0, 18.0), egui::Sense::hover());
    let start = to_color32(color);
    let end = to_color32(color.shade(-20));
    let mid = to_color32(color.shade(-10));

    let mut mesh = egui::Mesh::default();
    mesh.colored_vertex(rect.left_top(), start);
    mesh.colored_vertex(rect.right_top(), mid);
    mesh.colored_vertex(rect.left_bottom(), mid);
    mesh.colored_vertex(rect.right_bottom(), end);
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(2, 1, 3);
    ui.painter().add(egui::Shape::mesh(mesh));
}

fn to_color32(color: Color) -> egui::Color32 {
    let [r, g, b] = color.to_array();
    egui::Color32::from_rgb(r, g, b)
}
