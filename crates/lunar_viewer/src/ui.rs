//! egui navigation panel: state readout, selected block attributes and
//! back/reset/mode buttons.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use lunar_bevy::input::queue_hover;
use lunar_bevy::systems::navigation::apply_nav_commands;
use lunar_bevy::{GridNavigator, NavStatus, PendingCommands};
use lunar_grid::{NavCommand, RenderMode, ZoomDirection};

/// Plugin for the navigation panel.
pub struct NavigationPanelPlugin;

impl Plugin for NavigationPanelPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_systems(EguiPrimaryContextPass, render_navigation_panel)
      .add_systems(
        Update,
        drop_pointer_over_panel
          .after(queue_hover)
          .before(apply_nav_commands),
      );
  }
}

/// Clicks and hovers over the panel must not reach the globe.
fn drop_pointer_over_panel(mut contexts: EguiContexts, mut pending: ResMut<PendingCommands>) {
  let Ok(ctx) = contexts.ctx_mut() else {
    return;
  };
  if ctx.is_pointer_over_area() || ctx.wants_pointer_input() {
    pending.retain(|command| !matches!(command, NavCommand::Drill(_) | NavCommand::Hover(_)));
  }
}

fn row(ui: &mut egui::Ui, label: &str, value: String) {
  ui.horizontal(|ui| {
    ui.label(label);
    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
      ui.label(value);
    });
  });
}

fn render_navigation_panel(
  mut contexts: EguiContexts,
  status: Res<NavStatus>,
  navigator: Res<GridNavigator>,
  mut pending: ResMut<PendingCommands>,
) {
  let Ok(ctx) = contexts.ctx_mut() else {
    return;
  };
  let navigator = &navigator.0;

  egui::Window::new("Navigation")
    .anchor(egui::Align2::LEFT_TOP, egui::vec2(10.0, 10.0))
    .resizable(false)
    .collapsible(false)
    .show(ctx, |ui| {
      ui.set_min_width(220.0);

      row(ui, "Level:", status.level.to_string());
      row(ui, "Depth:", status.stack_depth.to_string());
      row(
        ui,
        "Cell:",
        status.selected_token.clone().unwrap_or_else(|| "-".into()),
      );
      row(ui, "Zoom:", navigator.zoom_level().to_string());
      let last = navigator.cache().stats().last_pass;
      row(ui, "Last pass:", format!("{} cells, {} us", last.cells_drawn, last.duration_us));

      if let Some(block) = &status.block {
        ui.separator();
        ui.strong(format!("Block {}", block.token));
        row(ui, "Position:", format!("{:.4}, {:.4}", block.at.lat, block.at.lng));
        row(ui, "FeO:", format!("{:.1} %", block.attributes.feo));
        row(ui, "TiO2:", format!("{:.1} %", block.attributes.tio2));
        row(ui, "Water ice:", format!("{:.1} %", block.attributes.water_ice));
        row(ui, "Surface:", format!("{:.0} K", block.attributes.surface_temp_k));
        row(ui, "Price:", format!("${:.2}", block.attributes.price));
      }

      ui.separator();
      ui.horizontal(|ui| {
        if ui
          .add_enabled(status.can_go_back, egui::Button::new("Back"))
          .clicked()
        {
          pending.push(NavCommand::GoBack);
        }
        if ui.button("Reset").clicked() {
          pending.push(NavCommand::Reset);
        }
        let mode = match navigator.render_mode() {
          RenderMode::Fill => "Lines",
          RenderMode::Line => "Fill",
        };
        if ui.button(mode).clicked() {
          pending.push(NavCommand::ToggleRenderMode);
        }
      });
      ui.horizontal(|ui| {
        if ui.button("Zoom +").clicked() {
          pending.push(NavCommand::Zoom(ZoomDirection::In));
        }
        if ui.button("Zoom -").clicked() {
          pending.push(NavCommand::Zoom(ZoomDirection::Out));
        }
      });
    });
}
