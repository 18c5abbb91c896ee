//! Interactive plant viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the current genome, the
//! [`Plant`] growing from it and everything it has drawn so far, and
//! implements [`eframe::App`] to render and control growth and crossover
//! through an egui UI.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use eframe::App;
use garden_core::{
    codec::{GenomeFormatError, export_genom, import_genom},
    config::{GrowthConfig, SmashConfig},
    genome::{DEFAULT_GENERATIONS, Gene, GenomeShapeError, PlantGenom},
    math::Color,
    plant::Plant,
    smash::{self, SmashError, SmashMethod},
};
use glam::Vec2;
use rand::{Rng, SeedableRng, rngs::StdRng};
use thiserror::Error;
use tracing::{info, warn};

use crate::canvas::{CANVAS_SIZE, Canvas};

/// Brightness difference between the base disc and its shadow/highlight.
const BEVEL_DELTA: i32 = 20;

/// Upper bound on growth steps for "Grow to end".
const FAST_STEP_LIMIT: usize = 10_000;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid genome in {}: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: GenomeFormatError,
    },
    #[error(transparent)]
    Shape(#[from] GenomeShapeError),
    #[error(transparent)]
    Smash(#[from] SmashError),
}

/// Reads a genome table from `path`.
pub fn load_genom(path: &Path) -> Result<PlantGenom, ViewerError> {
    let text = fs::read_to_string(path).map_err(|source| ViewerError::Io {
        path: path.to_owned(),
        source,
    })?;
    import_genom(&text).map_err(|source| ViewerError::Format {
        path: path.to_owned(),
        source,
    })
}

/// Writes `genom` to `path` in the table format.
pub fn save_genom(path: &Path, genom: &PlantGenom) -> Result<(), ViewerError> {
    fs::write(path, export_genom(genom)).map_err(|source| ViewerError::Io {
        path: path.to_owned(),
        source,
    })
}

/// Start-up options, usually filled from the command line.
///
/// ### Fields
/// - `seed` - Seed for genome generation, growth and crossover; OS entropy
///   when `None`.
/// - `genome_path` - Genome table to load first; a random genome otherwise.
/// - `start_pos` - World position of the plant's base.
/// - `steps_per_frame` - Growth steps taken per frame while running.
#[derive(Clone, Debug)]
pub struct ViewerSettings {
    pub seed: Option<u64>,
    pub genome_path: Option<PathBuf>,
    pub start_pos: Vec2,
    pub steps_per_frame: usize,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            seed: None,
            genome_path: None,
            start_pos: Vec2::new(0.0, 220.0),
            steps_per_frame: 4,
        }
    }
}

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The growth core: a shared [`PlantGenom`] and the [`Plant`] grown from it.
/// - The retained [`Canvas`]: every circle emitted so far, rasterised once.
/// - Crossover: a [`SmashConfig`] and the paths of the partner genomes.
/// - UI state (pan/zoom, run toggle, file paths, the editable gene table,
///   status line).
///
/// The typical per-frame update is:
/// 1. Handle UI interactions / input.
/// 2. If `running` is `true`, call [`Viewer::step_once`] `steps_per_frame` times.
/// 3. Paint the canvas texture.
pub struct Viewer {
    genom: Arc<PlantGenom>,
    plant: Plant,
    canvas: Canvas,

    growth_cfg: GrowthConfig,
    smash_cfg: SmashConfig,
    start_pos: Vec2,

    rng: StdRng,

    running: bool,
    steps_per_frame: usize,
    zoom: f32,
    pan: egui::Vec2,

    genome_path: String,
    partner_path: String,
    /// Working copy of `genom.table()` edited in the side panel.
    table_edit: Vec<Vec<i32>>,
    status: String,
}

impl Viewer {
    /// Creates a viewer growing the genome named in `settings`, or a random
    /// one if none was given or it failed to load.
    pub fn new(settings: ViewerSettings) -> Self {
        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut status = String::from("ready");
        let genom = match settings.genome_path.as_deref() {
            Some(path) => match load_genom(path) {
                Ok(genom) => {
                    info!(path = %path.display(), "genome loaded");
                    genom
                }
                Err(err) => {
                    warn!(%err, "falling back to a random genome");
                    status = err.to_string();
                    PlantGenom::random(DEFAULT_GENERATIONS, &mut rng)
                }
            },
            None => PlantGenom::random(DEFAULT_GENERATIONS, &mut rng),
        };
        let genom = Arc::new(genom);

        let growth_cfg = GrowthConfig::default();
        let plant = Plant::with_config(
            Arc::clone(&genom),
            settings.start_pos,
            growth_cfg,
            StdRng::seed_from_u64(rng.random()),
        );

        let table_edit = genom.table();

        Self {
            genom,
            plant,
            canvas: Canvas::new(CANVAS_SIZE, CANVAS_SIZE, Color::WHITE),
            growth_cfg,
            smash_cfg: SmashConfig::default(),
            start_pos: settings.start_pos,
            rng,
            running: false,
            steps_per_frame: settings.steps_per_frame.max(1),
            zoom: 0.6,
            pan: egui::vec2(0.0, 0.0),
            genome_path: settings
                .genome_path
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            partner_path: String::new(),
            table_edit,
            status,
        }
    }

    /// Starts a fresh growth run of the current genome with the current
    /// growth config, clearing the canvas.
    fn regrow(&mut self) {
        self.plant = Plant::with_config(
            Arc::clone(&self.genom),
            self.start_pos,
            self.growth_cfg,
            StdRng::seed_from_u64(self.rng.random()),
        );
        self.canvas.clear();
    }

    /// Replaces the genome and regrows.
    fn set_genom(&mut self, genom: PlantGenom) {
        self.table_edit = genom.table();
        self.genom = Arc::new(genom);
        self.regrow();
    }

    fn randomize(&mut self) {
        let genom = PlantGenom::random(DEFAULT_GENERATIONS, &mut self.rng);
        self.set_genom(genom);
        self.status = String::from("random genome");
    }

    /// Advances growth by one step and paints the emitted circles.
    fn step_once(&mut self) {
        if self.plant.is_growing() {
            for circle in self.plant.get_circles() {
                self.canvas.draw_circle(&circle, BEVEL_DELTA);
            }
        }
    }

    /// Grows the rest of the plant in one go.
    fn grow_to_end(&mut self) {
        for circle in self.plant.grow_to_end(FAST_STEP_LIMIT) {
            self.canvas.draw_circle(&circle, BEVEL_DELTA);
        }
        self.running = false;
        self.status = if self.plant.is_growing() {
            format!("stopped after {FAST_STEP_LIMIT} steps")
        } else {
            format!("grown: {} circles", self.canvas.painted())
        };
    }

    /// Rebuilds the genome from the edited gene table and regrows.
    fn apply_table_edit(&mut self) -> Result<String, ViewerError> {
        let genom = PlantGenom::from_table(&self.table_edit)?;
        self.set_genom(genom);
        info!("genome table applied");
        Ok(String::from("genome table applied"))
    }

    fn load_from_path(&mut self) -> Result<String, ViewerError> {
        let path = PathBuf::from(self.genome_path.trim());
        let genom = load_genom(&path)?;
        self.set_genom(genom);
        info!(path = %path.display(), "genome loaded");
        Ok(format!("loaded {}", path.display()))
    }

    fn save_to_path(&self) -> Result<String, ViewerError> {
        let path = PathBuf::from(self.genome_path.trim());
        save_genom(&path, &self.genom)?;
        info!(path = %path.display(), "genome saved");
        Ok(format!("saved {}", path.display()))
    }

    /// Folds the current genome with every partner file, left to right, and
    /// grows the child. Partner paths are separated by `;`.
    fn smash_with_partners(&mut self) -> Result<String, ViewerError> {
        let paths: Vec<PathBuf> = self
            .partner_path
            .split(';')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .collect();

        let mut genomes = Vec::with_capacity(paths.len() + 1);
        genomes.push((*self.genom).clone());
        for path in &paths {
            genomes.push(load_genom(path)?);
        }

        let child = smash::mass_smash(&genomes, &self.smash_cfg, &mut self.rng)?;
        self.set_genom(child);
        info!(
            partners = paths.len(),
            method = self.smash_cfg.method.label(),
            "genomes smashed"
        );
        Ok(format!("smashed with {} partner(s)", paths.len()))
    }

    /// Shows the outcome of a file or crossover action in the status line.
    fn report(&mut self, result: Result<String, ViewerError>) {
        self.status = match result {
            Ok(message) => message,
            Err(err) => {
                warn!(%err, "action failed");
                err.to_string()
            }
        };
    }

    /// Converts a world-space position to screen-space.
    ///
    /// World coordinates are scaled by `zoom`, offset by `pan`, and then
    /// centered inside the given `rect`. Both spaces have `y` pointing down,
    /// so no flip is needed.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        egui::pos2(
            center.x + p.x * self.zoom + self.pan.x,
            center.y + p.y * self.zoom + self.pan.y,
        )
    }

    /// Inverse of [`Viewer::world_to_screen`].
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let x = (p.x - center.x - self.pan.x) / self.zoom;
        let y = (p.y - center.y - self.pan.y) / self.zoom;
        Vec2::new(x, y)
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Helper to draw a labeled `usize` [`egui::DragValue`].
    fn labeled_drag_usize(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut usize,
        range: std::ops::RangeInclusive<usize>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (run controls, stepping, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Grow" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                if ui.button("Step").clicked() {
                    self.step_once();
                }

                if ui.button("Grow to end").clicked() {
                    self.grow_to_end();
                }

                if ui.button("Regrow").clicked() {
                    self.regrow();
                }

                if ui.button("Random genome").clicked() {
                    self.randomize();
                }

                ui.add(
                    egui::DragValue::new(&mut self.steps_per_frame)
                        .prefix("steps/frame = ")
                        .range(1..=200)
                        .speed(1.0),
                );

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 0.1..=10.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar (progress, counters, last action).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.add(
                    egui::ProgressBar::new(self.plant.progress())
                        .desired_width(160.0)
                        .show_percentage(),
                );
                ui.label(format!(
                    "drawn = {} / ~{}",
                    self.plant.drawn(),
                    self.plant.total()
                ));
                ui.label(format!("frontier = {}", self.plant.frontier().len()));
                ui.separator();
                ui.label(self.status.as_str());
            });
        });
    }

    /// Builds the right-hand panel: growth parameters, genome files and
    /// crossover.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Growth");
                Self::labeled_drag_f32(
                    ui,
                    "step_len:",
                    &mut self.growth_cfg.step_len,
                    0.1..=20.0,
                    0.1,
                );
                Self::labeled_drag_f32(
                    ui,
                    "color_drift:",
                    &mut self.growth_cfg.color_drift,
                    0.0..=20.0,
                    0.1,
                );
                Self::labeled_drag_f32(
                    ui,
                    "tropism:",
                    &mut self.growth_cfg.tropism,
                    0.0..=0.2,
                    0.001,
                );
                if ui.button("Reset growth cfg").clicked() {
                    self.growth_cfg = GrowthConfig::default();
                }

                ui.separator();
                ui.heading("Genome file");
                ui.text_edit_singleline(&mut self.genome_path);
                ui.horizontal(|ui| {
                    if ui.button("Load").clicked() {
                        let result = self.load_from_path();
                        self.report(result);
                    }
                    if ui.button("Save").clicked() {
                        let result = self.save_to_path();
                        self.report(result);
                    }
                });

                ui.separator();
                ui.heading("Smash");
                ui.label("Partner genomes (; separated):");
                ui.text_edit_singleline(&mut self.partner_path);
                egui::ComboBox::from_label("method")
                    .selected_text(self.smash_cfg.method.label())
                    .show_ui(ui, |ui| {
                        for method in SmashMethod::ALL {
                            ui.selectable_value(&mut self.smash_cfg.method, method, method.label());
                        }
                    });
                ui.add(egui::Slider::new(&mut self.smash_cfg.weight, 0.0..=1.0).text("weight"));
                Self::labeled_drag_usize(
                    ui,
                    "mutations:",
                    &mut self.smash_cfg.mutations,
                    0..=180,
                    1.0,
                );
                if ui.button("Smash").clicked() {
                    let result = self.smash_with_partners();
                    self.report(result);
                }

                ui.separator();
                egui::CollapsingHeader::new("Genome table").show(ui, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("Apply").clicked() {
                            let result = self.apply_table_edit();
                            self.report(result);
                        }
                        if ui.button("Revert").clicked() {
                            self.table_edit = self.genom.table();
                        }
                    });
                    egui::ScrollArea::both().show(ui, |ui| {
                        egui::Grid::new("genome_table").striped(true).show(ui, |ui| {
                            ui.label("");
                            for generation in 0..self.genom.len() {
                                ui.label(format!("gen {generation}"));
                            }
                            ui.end_row();

                            for (gene, row) in Gene::ALL.iter().zip(self.table_edit.iter_mut()) {
                                ui.label(gene.name());
                                for value in row.iter_mut() {
                                    ui.add(egui::DragValue::new(value).speed(1.0));
                                }
                                ui.end_row();
                            }
                        });
                    });
                });
            });
    }

    /// Builds the central panel where the plant is drawn.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Pan with drag.
            if response.dragged() {
                self.pan += response.drag_delta();
            }

            // Zoom around the mouse cursor.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                let world_before = self.screen_to_world(pointer_screen, rect);

                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(0.1, 10.0);

                let screen_after = self.world_to_screen(world_before, rect);
                self.pan += pointer_screen - screen_after;
            }

            // Auto-run growth if requested.
            if self.running {
                for _ in 0..self.steps_per_frame {
                    self.step_once();
                }
                if !self.plant.is_growing() {
                    self.running = false;
                }
                ctx.request_repaint();
            }

            // Paint the retained canvas as one textured rectangle.
            let (world_min, world_max) = self.canvas.world_bounds();
            let canvas_rect = egui::Rect::from_min_max(
                self.world_to_screen(world_min, rect),
                self.world_to_screen(world_max, rect),
            );
            let texture = self.canvas.texture_id(ctx);
            painter.image(
                texture,
                canvas_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );

            // Mark the base of the plant.
            painter.circle_stroke(
                self.world_to_screen(self.start_pos, rect),
                4.0,
                egui::Stroke::new(1.5, egui::Color32::DARK_GRAY),
            );
        });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
