// src/ui.rs

use glam::Vec3;

/// What the overlay shows; copied out of the scene each frame.
pub struct HudState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub grounded: bool,
    pub cursor_grabbed: bool,
}

pub fn build_ui(ctx: &egui::Context, hud: &HudState) {
    egui::Window::new("Player")
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(10.0, 10.0))
        .resizable(false)
        .show(ctx, |ui| {
            ui.vertical(|ui| {
                let p = hud.position;
                let v = hud.velocity;
                ui.label(format!("Position: {:6.2} {:6.2} {:6.2}", p.x, p.y, p.z));
                ui.label(format!("Velocity: {:6.2} {:6.2} {:6.2}", v.x, v.y, v.z));
                ui.label(format!("Speed: {:.2}", Vec3::new(v.x, 0.0, v.z).length()));
                ui.label(if hud.grounded { "Grounded" } else { "Airborne" });
                ui.separator();

                ui.label("W/A/S/D or arrows: Move");
                ui.label("Space: Jump");
                ui.label("Mouse (when grabbed): Look");
                if hud.cursor_grabbed {
                    ui.label("Escape: Release cursor");
                } else {
                    ui.label("Click or Escape: Grab cursor");
                }
            });
        });
}
