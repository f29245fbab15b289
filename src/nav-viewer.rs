//! Navigation demo viewer
//!
//! Interactive showcase of the `rnav` widgets built on egui:
//! - Schedule: a Gantt chart of generated tasks on a timeline, one row per resource
//! - Scatter: clustered samples on two number axes with a trend line
//!
//! Wheel pans, Ctrl+wheel zooms horizontally, Alt+wheel zooms vertically,
//! dragging pans and Shift+drag (or a right-button drag) zooms to a region.
//! Settings persist across sessions through eframe storage.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;
use serde::{Deserialize, Serialize};

use rnav::{AxisModel, NavigationConfig};

mod app;

use app::scatter::ScatterDemo;
use app::schedule::ScheduleDemo;
use app::{SettingsCoordinator, ACTIVE_DEMO_KEY};

const SCHEDULE_ROWS: usize = 200;

/// Application entry point: installs logging and launches the viewer.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Navigation Viewer"),
        ..Default::default()
    };

    eframe::run_native(
        "Navigation Viewer",
        options,
        Box::new(|cc| {
            let app = NavViewerApp::new(cc)?;
            Ok(Box::new(app))
        }),
    )
    .map_err(|err| anyhow::anyhow!("viewer failed: {err}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum Demo {
    Schedule,
    Scatter,
}

struct NavViewerApp {
    config: NavigationConfig,
    active: Demo,
    schedule: ScheduleDemo,
    scatter: ScatterDemo,
    show_settings: bool,
}

impl NavViewerApp {
    /// Creates the viewer with settings loaded from persistent storage.
    fn new(cc: &eframe::CreationContext) -> anyhow::Result<Self> {
        let config = SettingsCoordinator::load_config(cc.storage);
        let active = SettingsCoordinator::load_setting_or(cc.storage, ACTIVE_DEMO_KEY, Demo::Schedule);

        Ok(Self {
            schedule: ScheduleDemo::build(&config, SCHEDULE_ROWS)?,
            scatter: ScatterDemo::build(&config)?,
            config,
            active,
            show_settings: false,
        })
    }

    fn apply_config(&mut self, config: NavigationConfig) {
        let dark_mode_changed = config.dark_mode != self.config.dark_mode;
        self.schedule.set_config(config.clone());
        self.scatter.view.set_config(config.clone());
        if dark_mode_changed {
            self.schedule.set_dark_mode(config.dark_mode);
            self.scatter.set_dark_mode(config.dark_mode);
        }
        self.config = config;
    }

    fn apply_visuals(&self, ctx: &egui::Context) {
        let mut visuals = if self.config.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        self.schedule.view.theme().apply_to_visuals(&mut visuals);
        ctx.set_visuals(visuals);
    }

    fn top_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.active, Demo::Schedule, "Schedule");
            ui.selectable_value(&mut self.active, Demo::Scatter, "Scatter");
            ui.separator();
            if ui.button("Reset view").clicked() {
                match self.active {
                    Demo::Schedule => self.schedule.reset(),
                    Demo::Scatter => self.scatter.view.reset(),
                }
            }
            ui.toggle_value(&mut self.show_settings, "Settings");
        });
    }

    fn status_bar(&self, ui: &mut egui::Ui) {
        let text = match self.active {
            Demo::Schedule => {
                let view = &self.schedule.view;
                let range = view.h_axis().visible_range();
                let hover = view.hover_value().map(|(time, row)| {
                    let item = view.v_axis().label(row.max(0.0) as usize);
                    format!("{} | {item}", time.format("%Y-%m-%d %H:%M"))
                });
                format!(
                    "{} .. {}   {} selected   {}",
                    range.start.format("%Y-%m-%d %H:%M"),
                    range.end.format("%Y-%m-%d %H:%M"),
                    self.schedule.tasks.selected().count(),
                    hover.unwrap_or_default()
                )
            }
            Demo::Scatter => {
                let view = &self.scatter.view;
                let (x, y) = (view.h_axis().visible_range(), view.v_axis().visible_range());
                let hover = view
                    .hover_value()
                    .map(|(x, y)| format!("x={x:.1} y={y:.1}"))
                    .unwrap_or_default();
                format!("x {:.0}..{:.0}  y {:.0}..{:.0}   {hover}", x.start, x.end, y.start, y.end)
            }
        };
        ui.label(text);
    }

    fn settings_window(&mut self, ctx: &egui::Context) {
        let mut open = self.show_settings;
        let mut config = self.config.clone();
        egui::Window::new("Settings").open(&mut open).show(ctx, |ui| {
            ui.checkbox(&mut config.dark_mode, "Dark mode");
            ui.add(egui::Slider::new(&mut config.zoom_sensitivity, 0.0005..=0.01).text("Zoom sensitivity"));
            ui.add(egui::Slider::new(&mut config.wheel_pan_scale, 0.1..=5.0).text("Wheel pan scale"));
            ui.add(egui::Slider::new(&mut config.item_thickness, 40.0..=200.0).text("Item ruler width"));
            if ui.button("Restore defaults").clicked() {
                config = NavigationConfig::default();
            }
        });
        self.show_settings = open;
        if config != self.config {
            self.apply_config(config);
        }
    }
}

impl eframe::App for NavViewerApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        SettingsCoordinator::save_config(storage, &self.config);
        SettingsCoordinator::save_setting(storage, ACTIVE_DEMO_KEY, &self.active);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);

        egui::TopBottomPanel::top("demo_tabs").show(ctx, |ui| self.top_bar(ui));
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.status_bar(ui));

        if self.show_settings {
            self.settings_window(ctx);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| match self.active {
                Demo::Schedule => {
                    self.schedule.show(ui);
                }
                Demo::Scatter => {
                    self.scatter.view.show(ui);
                }
            });
    }
}
