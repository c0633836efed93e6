//! egui side panel for the viewer.
//!
//! Displays the load status line and one slider per movable joint.
//! Sliders work in degrees, the joints themselves in radians; the label
//! next to each slider shows the fixed-width formatted angle.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use jointdeck_core::{ViewerConfig, format_angle};

use crate::loader::ViewerStatus;
use crate::panel::{self, JointPanel, SLIDER_STEP_DEG};
use crate::spawner::JointValue;

/// System that renders the egui side panel each frame.
#[allow(clippy::needless_pass_by_value)]
pub fn side_panel_system(
    mut contexts: EguiContexts,
    config: Res<ViewerConfig>,
    status: Res<ViewerStatus>,
    mut panel: ResMut<JointPanel>,
    mut joints: Query<&mut JointValue>,
) {
    if !config.show_panel {
        return;
    }

    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    egui::SidePanel::left("joint_panel")
        .default_width(300.0)
        .resizable(true)
        .show(ctx, |ui| {
            ui.heading("jointdeck");
            ui.separator();

            status_section(ui, &status);
            ui.separator();

            joints_section(ui, &mut panel, &mut joints);
        });
}

fn status_section(ui: &mut egui::Ui, status: &ViewerStatus) {
    ui.label("Status");
    if status.is_failed() {
        ui.colored_label(egui::Color32::from_rgb(200, 60, 60), status.text());
    } else {
        ui.label(status.text());
    }

    if let ViewerStatus::Ready { warnings, .. } = status {
        for warning in warnings {
            ui.small(warning);
        }
    }
}

fn joints_section(
    ui: &mut egui::Ui,
    panel: &mut ResMut<JointPanel>,
    joints: &mut Query<&mut JointValue>,
) {
    ui.label("Joints");

    if panel.controls.is_empty() {
        ui.label("No movable joints.");
        return;
    }

    if ui.button("Reset pose").clicked() {
        panel::reset_pose(panel, |entity, value| {
            if let Ok(mut joint) = joints.get_mut(entity) {
                joint.set(value);
            }
        });
    }

    egui::Grid::new("joints_grid")
        .num_columns(5)
        .spacing([8.0, 4.0])
        .striped(true)
        .show(ui, |ui| {
            for control in &mut panel.controls {
                ui.label(&control.name);
                ui.weak(format_angle(control.lower_deg.to_radians()));

                let slider = egui::Slider::new(
                    &mut control.value_deg,
                    control.lower_deg..=control.upper_deg,
                )
                .step_by(SLIDER_STEP_DEG)
                .show_value(false);
                if ui.add(slider).changed() {
                    if let Ok(mut value) = joints.get_mut(control.entity) {
                        value.set(control.value_deg.to_radians());
                    }
                }

                ui.weak(format_angle(control.upper_deg.to_radians()));
                ui.monospace(format_angle(control.value_deg.to_radians()));
                ui.end_row();
            }
        });
}
