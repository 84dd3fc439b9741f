use std::path::PathBuf;
use std::time::{Duration, Instant};

use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, StrokeKind, Vec2};
use log::warn;

use crate::graph_utils::graph::{GraphRegistry, MarkerColor, NODE_HALF_SIZE, NODE_SIZE};
use crate::graph_utils::interaction::{InteractionMode, InteractionOutcome};
use crate::persistence::persist;
use crate::persistence::settings::AppSettings;
use crate::persistence::text_format;

const CANVAS_BG: Color32 = Color32::from_rgb(0xf4, 0xf4, 0xf4);
const NODE_FILL: Color32 = Color32::from_rgb(0xe1, 0xe1, 0xe1);
const SELECTED_FILL: Color32 = Color32::from_rgb(0xad, 0xd8, 0xe6);
const NOTICE_TTL: Duration = Duration::from_secs(4);

#[derive(Clone, Copy, PartialEq, Eq)]
enum NoticeStyle {
    Subtle,
    Prominent,
    Error,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum FileAction {
    Export,
    Import,
}

impl FileAction {
    fn title(self) -> &'static str {
        match self {
            FileAction::Export => "Export to File",
            FileAction::Import => "Import from File",
        }
    }
}

pub struct RouteApp {
    graph: GraphRegistry,
    settings: AppSettings,
    notice: Option<(String, NoticeStyle, Instant)>,
    file_action: Option<FileAction>,
    file_path: String,
    // Last clipboard export, shown until dismissed
    clipboard_preview: Option<String>,
}

fn marker_fill(color: MarkerColor) -> Color32 {
    Color32::from_rgb(color.r, color.g, color.b)
}

impl RouteApp {
    pub fn new(settings: AppSettings) -> Self {
        Self {
            graph: GraphRegistry::new(),
            settings,
            notice: None,
            file_action: None,
            file_path: String::new(),
            clipboard_preview: None,
        }
    }

    fn notify(&mut self, msg: impl Into<String>, style: NoticeStyle) {
        self.notice = Some((msg.into(), style, Instant::now()));
    }

    fn persist_settings(&mut self) {
        if let Err(e) = self.settings.save() {
            warn!("saving settings failed: {}", e);
        }
    }

    fn open_file_action(&mut self, action: FileAction) {
        self.file_path = match (action, &self.settings.last_file) {
            (FileAction::Import, Some(p)) => p.display().to_string(),
            _ => persist::default_export_path(&self.settings).display().to_string(),
        };
        self.file_action = Some(action);
    }

    fn run_file_action(&mut self, action: FileAction) {
        let path = PathBuf::from(self.file_path.trim());
        let result = match action {
            FileAction::Export => persist::save_to_path(&self.graph, &path),
            FileAction::Import => persist::load_from_path(&mut self.graph, &path),
        };
        match result {
            Ok(()) => {
                let verb = if action == FileAction::Export { "Exported to" } else { "Imported" };
                self.notify(format!("{} {}", verb, path.display()), NoticeStyle::Prominent);
                self.settings.last_file = Some(path);
                self.persist_settings();
            }
            Err(e) => {
                let verb = if action == FileAction::Export { "export" } else { "import" };
                self.notify(format!("Failed to {}: {:#}", verb, e), NoticeStyle::Error);
            }
        }
    }

    pub fn menu_copy_to_clipboard(&mut self, ctx: &egui::Context) {
        let text = text_format::export(&self.graph);
        ctx.copy_text(text.clone());
        self.clipboard_preview = Some(text);
    }

    pub fn menu_reset(&mut self) {
        self.graph.clear();
        self.notify("Graph cleared", NoticeStyle::Subtle);
    }

    pub fn menu_toggle_distances(&mut self) {
        self.settings.show_distances = !self.settings.show_distances;
        self.persist_settings();
    }

    fn report(&mut self, outcome: InteractionOutcome) {
        match outcome {
            InteractionOutcome::Connected { from, to, distance } => {
                self.notify(format!("Connected {} - {} ({:.2})", from, to, distance), NoticeStyle::Subtle)
            }
            InteractionOutcome::ConnectRejected { from, to } => {
                self.notify(format!("Nodes {} and {} are already connected", from, to), NoticeStyle::Subtle)
            }
            InteractionOutcome::RouteMarked { from, to } => {
                self.notify(format!("Marked route {} - {}", from, to), NoticeStyle::Subtle)
            }
            _ => {}
        }
    }

    fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let available = ui.available_rect_before_wrap();
        let resp = ui.allocate_rect(available, Sense::click());
        let origin = available.min;
        let painter = ui.painter_at(available);
        painter.rect_filled(available, 0.0, CANVAS_BG);

        let to_screen = |x: i64, y: i64| origin + Vec2::new(x as f32, y as f32);
        let edge_stroke = Stroke::new(1.0, Color32::BLACK);
        for &(a, b) in self.graph.edges() {
            let (Some(na), Some(nb)) = (self.graph.node(a), self.graph.node(b)) else { continue };
            let (ax, ay) = na.center();
            let (bx, by) = nb.center();
            let pa = to_screen(ax, ay);
            let pb = to_screen(bx, by);
            painter.line_segment([pa, pb], edge_stroke);
            if self.settings.show_distances {
                if let Some(d) = self.graph.distance(a, b) {
                    let mid = Pos2::new((pa.x + pb.x) * 0.5, (pa.y + pb.y) * 0.5);
                    painter.text(mid, Align2::LEFT_TOP, format!("{:.2}", d), FontId::proportional(12.0), Color32::BLACK);
                }
            }
        }

        let selected = self.graph.selected();
        let route_start = self.graph.route_start();
        let size = Vec2::splat(NODE_SIZE as f32);
        for node in self.graph.nodes() {
            let rect = Rect::from_min_size(to_screen(i64::from(node.x), i64::from(node.y)), size);
            let fill = if selected == Some(node.id) {
                SELECTED_FILL
            } else {
                node.marker.map(marker_fill).unwrap_or(NODE_FILL)
            };
            let outline = if route_start == Some(node.id) {
                Stroke::new(2.0, Color32::BLACK)
            } else {
                Stroke::new(1.0, Color32::DARK_GRAY)
            };
            painter.rect_filled(rect, 2.0, fill);
            painter.rect_stroke(rect, 2.0, outline, StrokeKind::Inside);
            painter.text(rect.center(), Align2::CENTER_CENTER, node.id.to_string(), FontId::proportional(11.0), Color32::BLACK);
        }

        let mode = if resp.clicked_by(egui::PointerButton::Primary) {
            InteractionMode::ConfirmAndRelease
        } else if resp.clicked_by(egui::PointerButton::Secondary) {
            InteractionMode::ConfirmAndContinue
        } else if resp.clicked_by(egui::PointerButton::Middle) {
            InteractionMode::MarkRoute
        } else {
            return;
        };
        let Some(pos) = resp.interact_pointer_pos() else { return };
        let local = pos - origin;
        let (px, py) = (local.x.floor() as i32, local.y.floor() as i32);
        match self.graph.node_at(px, py) {
            Some(id) => {
                let outcome = self.graph.interact(id, mode);
                self.report(outcome);
            }
            // Clicks on empty canvas mark the centre of the new node
            None if mode == InteractionMode::ConfirmAndRelease => {
                self.graph.create_node(px.saturating_sub(NODE_HALF_SIZE), py.saturating_sub(NODE_HALF_SIZE));
            }
            None => {}
        }
    }
}

impl eframe::App for RouteApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.graph.cancel_pending();
        }
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::S))) {
            self.open_file_action(FileAction::Export);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O))) {
            self.open_file_action(FileAction::Import);
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Copy to Clipboard").clicked() {
                        self.menu_copy_to_clipboard(ctx);
                        ui.close();
                    }
                    if ui.add(egui::Button::new("Export to File…").shortcut_text(ctx.format_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::S)))).clicked() {
                        self.open_file_action(FileAction::Export);
                        ui.close();
                    }
                    if ui.add(egui::Button::new("Import from File…").shortcut_text(ctx.format_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O)))).clicked() {
                        self.open_file_action(FileAction::Import);
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Reset").clicked() {
                        self.menu_reset();
                        ui.close();
                    }
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                let label = if self.settings.show_distances { "Hide Distance" } else { "Show Distance" };
                if ui.button(label).clicked() {
                    self.menu_toggle_distances();
                }
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!(
                    "{} nodes | {} edges | {} routes",
                    self.graph.node_count(),
                    self.graph.edge_count(),
                    self.graph.routes().len()
                ));
                if let Some(id) = self.graph.selected() {
                    ui.separator();
                    ui.label(format!("selected: {}", id));
                }
                if let Some(id) = self.graph.route_start() {
                    ui.separator();
                    ui.label(format!("route from: {}", id));
                }
                if let Some((msg, style, at)) = &self.notice {
                    if *style == NoticeStyle::Error || at.elapsed() < NOTICE_TTL {
                        ui.separator();
                        match style {
                            NoticeStyle::Error => ui.colored_label(Color32::RED, msg),
                            NoticeStyle::Prominent => ui.strong(msg),
                            NoticeStyle::Subtle => ui.small(msg),
                        };
                    }
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| self.draw_canvas(ui));

        if let Some(action) = self.file_action {
            let mut open = true;
            let mut submit = false;
            let mut cancel = false;
            egui::Window::new(action.title())
                .open(&mut open)
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label("Path:");
                    ui.text_edit_singleline(&mut self.file_path);
                    ui.add_space(6.0);
                    ui.horizontal(|ui| {
                        let verb = if action == FileAction::Export { "Export" } else { "Import" };
                        if ui.button(verb).clicked() { submit = true; }
                        if ui.button("Cancel").clicked() { cancel = true; }
                    });
                });
            if submit {
                self.run_file_action(action);
            }
            if submit || cancel || !open {
                self.file_action = None;
            }
        }

        if let Some(text) = self.clipboard_preview.as_deref() {
            let mut open = true;
            egui::Window::new("Copied to Clipboard!")
                .open(&mut open)
                .collapsible(false)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().max_height(320.0).show(ui, |ui| {
                        ui.monospace(text);
                    });
                });
            if !open {
                self.clipboard_preview = None;
            }
        }

        // Keep repainting while a transient notice is visible so it can expire
        if let Some((_, style, at)) = &self.notice {
            if *style != NoticeStyle::Error && at.elapsed() < NOTICE_TTL {
                ctx.request_repaint_after(Duration::from_millis(250));
            }
        }
    }
}
