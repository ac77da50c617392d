//! Graphtrace GUI - Interactive Graph Digitizer
//! Load a plot image, calibrate its axes from three picked points, and work
//! with snapping guideline aids that lock onto the computed axis lines

use eframe::egui;
use std::collections::HashMap;
use std::path::PathBuf;

mod collection;
mod document;
mod geometry;
mod guideline;
mod scenario;
mod scene;
mod transform;

use collection::GuidelineCollection;
use document::{ColorPalette, CoordsType, DocumentModel};
use geometry::{GraphPoint, SceneRect, ScenePoint};
use guideline::{GuidelineId, GuidelineShape};
use scene::{Scene, SurfaceKind};
use transform::Transformation;

/// Fixed working area in scene units; loaded images are fitted into it
const SCENE_WIDTH: f64 = 800.0;
const SCENE_HEIGHT: f64 = 600.0;

/// Pointer pick distance for guideline hover/press, in scene units
const PICK_TOLERANCE: f64 = 6.0;

fn scene_rect() -> SceneRect {
    SceneRect::new(0.0, 0.0, SCENE_WIDTH, SCENE_HEIGHT)
}

fn graphtrace_icon() -> egui::IconData {
    // Simple generated icon (64x64): dark background, axis cross and a few
    // sample "curve" dots. Avoids external assets and works cross-platform.
    let w: u32 = 64;
    let h: u32 = 64;
    let mut rgba = vec![0u8; (w * h * 4) as usize];
    let axis_x = 16.0_f32;
    let axis_y = 48.0_f32;

    for y in 0..h {
        for x in 0..w {
            let fx = x as f32;
            let fy = y as f32;

            // Base background.
            let mut r = 20u8;
            let mut g = 24u8;
            let mut b = 30u8;

            // Axis cross.
            if (fx - axis_x).abs() < 1.5 || (fy - axis_y).abs() < 1.5 {
                r = 90;
                g = 140;
                b = 220;
            }

            // Curve dots climbing away from the origin.
            for (cx, cy) in [(26.0, 40.0), (36.0, 30.0), (46.0, 18.0)] {
                let dx = fx - cx;
                let dy = fy - cy;
                if dx * dx + dy * dy < 9.0 {
                    r = 240;
                    g = 150;
                    b = 50;
                }
            }

            let idx = ((y * w + x) * 4) as usize;
            rgba[idx] = r;
            rgba[idx + 1] = g;
            rgba[idx + 2] = b;
            rgba[idx + 3] = 255;
        }
    }

    egui::IconData {
        rgba,
        width: w,
        height: h,
    }
}

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_title("Graphtrace - Graph Digitizer")
            .with_icon(graphtrace_icon()),
        ..Default::default()
    };

    eframe::run_native(
        "Graphtrace",
        options,
        Box::new(|cc| Ok(Box::new(GraphtraceApp::new(cc)))),
    )
}

/// The interaction tool currently driving the canvas
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ActiveTool {
    /// Interact with guidelines (hover, deploy, lock)
    Guidelines,
    /// Pick axis calibration points
    Calibrate,
}

/// Scene implementation for the GUI: records which surface renders each
/// guideline so the canvas can tell edge templates from deployed lines
#[derive(Default)]
struct AppScene {
    attached: HashMap<GuidelineId, SurfaceKind>,
}

impl Scene for AppScene {
    fn attach(&mut self, id: GuidelineId, surface: SurfaceKind) {
        self.attached.insert(id, surface);
    }

    fn detach(&mut self, id: GuidelineId) {
        self.attached.remove(&id);
    }
}

/// One picked axis point: scene position plus the graph coordinates the
/// user types in
struct CalibrationPoint {
    scene: ScenePoint,
    graph_x_text: String,
    graph_y_text: String,
}

struct GraphtraceApp {
    /// Path of the loaded plot image, if any
    image_path: Option<PathBuf>,
    /// Read-only document state the guideline collection consumes
    document: DocumentModel,
    /// The guideline collection (owns the state machines)
    guidelines: GuidelineCollection,
    /// Scene attachment bookkeeping
    scene: AppScene,
    /// Current canvas tool
    tool: ActiveTool,
    /// Global guideline visibility toggle
    guidelines_visible: bool,
    /// Show the live state-dump diagnostics window
    show_dump_window: bool,
    /// Picked calibration points (up to three)
    calibration: Vec<CalibrationPoint>,
    /// Last calibration failure, shown in the side panel
    calibration_error: Option<String>,
    /// Guideline currently under the pointer
    hovered: Option<GuidelineId>,
    /// Zoom level
    zoom: f32,
    /// Pan offset
    pan_offset: egui::Vec2,
}

impl GraphtraceApp {
    fn new(cc: &eframe::CreationContext<'_>) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let document = DocumentModel::default();
        let mut scene = AppScene::default();
        let mut guidelines = GuidelineCollection::new();
        guidelines.initialize(scene_rect(), &document, &mut scene);

        Self {
            image_path: None,
            document,
            guidelines,
            scene,
            tool: ActiveTool::Guidelines,
            guidelines_visible: true,
            show_dump_window: false,
            calibration: Vec::new(),
            calibration_error: None,
            hovered: None,
            zoom: 1.0,
            pan_offset: egui::Vec2::ZERO,
        }
    }

    fn open_image(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "bmp", "gif"])
            .pick_file()
        {
            log::info!("opening plot image {}", path.display());
            self.image_path = Some(path);
            self.reset_calibration();
        }
    }

    /// Drop the calibration but keep the image: templates go back to hiding
    fn reset_calibration(&mut self) {
        self.calibration.clear();
        self.calibration_error = None;
        self.document.transformation = Transformation::undefined();
        self.guidelines
            .update_with_latest_transformation(&self.document, &mut self.scene);
    }

    /// Close the document: image gone, collection cleared and re-seeded
    fn close_document(&mut self) {
        self.image_path = None;
        self.calibration.clear();
        self.calibration_error = None;
        self.document = DocumentModel::default();
        self.guidelines.clear(&mut self.scene);
        self.guidelines
            .initialize(scene_rect(), &self.document, &mut self.scene);
        self.hovered = None;
    }

    /// Try to build the transformation from the three picked points
    fn apply_calibration(&mut self) {
        if self.calibration.len() != 3 {
            self.calibration_error = Some("Pick three axis points first".to_string());
            return;
        }

        let mut graph = [GraphPoint::new(0.0, 0.0); 3];
        let mut scene_pts = [ScenePoint::new(0.0, 0.0); 3];
        for (i, point) in self.calibration.iter().enumerate() {
            let (Ok(gx), Ok(gy)) = (
                point.graph_x_text.trim().parse::<f64>(),
                point.graph_y_text.trim().parse::<f64>(),
            ) else {
                self.calibration_error =
                    Some(format!("Point {} has non-numeric graph coordinates", i + 1));
                return;
            };
            graph[i] = GraphPoint::new(gx, gy);
            scene_pts[i] = point.scene;
        }

        match Transformation::from_three_points(graph, scene_pts) {
            Some(transformation) => {
                self.calibration_error = None;
                self.document.transformation = transformation;
                self.guidelines
                    .update_with_latest_transformation(&self.document, &mut self.scene);
                log::info!("axis calibration applied");
            }
            None => {
                self.calibration_error =
                    Some("Graph points are collinear; pick three spanning points".to_string());
            }
        }
    }

    fn set_tool(&mut self, tool: ActiveTool) {
        if self.tool != tool {
            self.tool = tool;
            // Guidelines only participate while their tool is selected
            self.guidelines
                .handle_active_change(tool == ActiveTool::Guidelines, &mut self.scene);
        }
    }

    fn set_guidelines_visible(&mut self, visible: bool) {
        if self.guidelines_visible != visible {
            self.guidelines_visible = visible;
            self.guidelines.handle_visible_change(visible);
        }
    }

    fn set_color(&mut self, color: ColorPalette) {
        if self.document.guideline_color != color {
            self.document.guideline_color = color;
            self.guidelines.update_color(&self.document, &mut self.scene);
        }
    }

    fn set_coords_type(&mut self, coords_type: CoordsType) {
        if self.document.coords_type != coords_type {
            self.document.coords_type = coords_type;
            self.guidelines
                .update_with_latest_transformation(&self.document, &mut self.scene);
        }
    }

    /// Track pointer proximity and forward hover enter/leave transitions
    fn update_hover(&mut self, scene_pos: Option<ScenePoint>) {
        let hit = scene_pos.and_then(|p| self.guidelines.hit_test(p, PICK_TOLERANCE));
        if hit != self.hovered {
            if let Some(old) = self.hovered {
                self.guidelines.handle_hover_leave(old);
            }
            if let Some(new) = hit {
                self.guidelines.handle_hover_enter(new);
            }
            self.hovered = hit;
        }
    }

    fn handle_canvas_click(&mut self, scene_pos: ScenePoint) {
        match self.tool {
            ActiveTool::Guidelines => {
                if let Some(id) = self.guidelines.hit_test(scene_pos, PICK_TOLERANCE) {
                    self.guidelines
                        .handle_mouse_press(id, scene_pos, &mut self.scene);
                }
            }
            ActiveTool::Calibrate => {
                if self.calibration.len() < 3 {
                    self.calibration.push(CalibrationPoint {
                        scene: scene_pos,
                        graph_x_text: String::new(),
                        graph_y_text: String::new(),
                    });
                }
            }
        }
    }
}

impl eframe::App for GraphtraceApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("📂 Open Image...").clicked() {
                        self.open_image();
                        ui.close_menu();
                    }
                    if ui.button("Close Document").clicked() {
                        self.close_document();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("View", |ui| {
                    let mut visible = self.guidelines_visible;
                    if ui.checkbox(&mut visible, "Guidelines").clicked() {
                        self.set_guidelines_visible(visible);
                        ui.close_menu();
                    }
                    if ui.checkbox(&mut self.show_dump_window, "Diagnostics").clicked() {
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Reset Zoom").clicked() {
                        self.zoom = 1.0;
                        self.pan_offset = egui::Vec2::ZERO;
                        ui.close_menu();
                    }
                });
            });
        });

        // Diagnostics window: the live sorted state dump
        if self.show_dump_window {
            egui::Window::new("Guideline Diagnostics")
                .default_width(380.0)
                .resizable(true)
                .show(ctx, |ui| {
                    ui.monospace(self.guidelines.state_dump());
                });
        }

        // Left panel: tools, color, calibration
        egui::SidePanel::left("tool_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                ui.heading("Tools");
                let mut tool = self.tool;
                ui.radio_value(&mut tool, ActiveTool::Guidelines, "Guidelines");
                ui.radio_value(&mut tool, ActiveTool::Calibrate, "Calibrate Axes");
                self.set_tool(tool);

                ui.separator();
                ui.heading("Guidelines");

                let mut color = self.document.guideline_color;
                egui::ComboBox::from_label("Color")
                    .selected_text(color.label())
                    .show_ui(ui, |ui| {
                        for candidate in ColorPalette::ALL {
                            ui.selectable_value(&mut color, candidate, candidate.label());
                        }
                    });
                self.set_color(color);

                let mut coords_type = self.document.coords_type;
                egui::ComboBox::from_label("Coordinates")
                    .selected_text(match coords_type {
                        CoordsType::Cartesian => "Cartesian",
                        CoordsType::Polar => "Polar",
                    })
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut coords_type, CoordsType::Cartesian, "Cartesian");
                        ui.selectable_value(&mut coords_type, CoordsType::Polar, "Polar");
                    });
                self.set_coords_type(coords_type);

                ui.separator();
                ui.heading("Axis Calibration");
                ui.small("Pick three points with the Calibrate tool, then enter their graph coordinates.");
                ui.add_space(4.0);

                let mut apply_requested = false;
                for (i, point) in self.calibration.iter_mut().enumerate() {
                    ui.horizontal(|ui| {
                        ui.label(format!(
                            "P{} ({:.0}, {:.0})",
                            i + 1,
                            point.scene.x,
                            point.scene.y
                        ));
                        ui.add(
                            egui::TextEdit::singleline(&mut point.graph_x_text)
                                .desired_width(50.0)
                                .hint_text("x"),
                        );
                        ui.add(
                            egui::TextEdit::singleline(&mut point.graph_y_text)
                                .desired_width(50.0)
                                .hint_text("y"),
                        );
                    });
                }

                ui.horizontal(|ui| {
                    if ui.button("✓ Apply").clicked() {
                        apply_requested = true;
                    }
                    if ui.button("✗ Reset").clicked() {
                        self.reset_calibration();
                    }
                });
                if apply_requested {
                    self.apply_calibration();
                }

                if let Some(error) = &self.calibration_error {
                    ui.colored_label(egui::Color32::from_rgb(230, 110, 110), error);
                }

                ui.separator();
                if self.document.transformation.is_defined() {
                    ui.colored_label(
                        egui::Color32::from_rgb(120, 200, 120),
                        "Transformation defined",
                    );
                    ui.small("Press a lurking edge guideline to deploy it; press a deployed guideline near an axis to lock it.");
                } else {
                    ui.colored_label(
                        egui::Color32::from_rgb(200, 170, 90),
                        "No transformation yet",
                    );
                    ui.small("Guideline templates stay hidden until the axes are calibrated.");
                }
            });

        // Central panel: the digitizing canvas
        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());

            // Handle panning
            if response.dragged() {
                self.pan_offset += response.drag_delta();
            }

            // Handle zoom with scroll
            let scroll_delta = ctx.input(|i| i.raw_scroll_delta);
            if response.hovered() && scroll_delta.y != 0.0 {
                self.zoom = (self.zoom + scroll_delta.y * 0.001).clamp(0.3, 3.0);
            }

            let rect = response.rect;

            // Draw background
            painter.rect_filled(rect, 0.0, egui::Color32::from_rgb(25, 28, 32));

            // Scene-to-screen mapping for this frame
            let zoom = self.zoom;
            let origin = rect.center()
                + self.pan_offset
                + egui::vec2(
                    -(SCENE_WIDTH as f32) * 0.5 * zoom,
                    -(SCENE_HEIGHT as f32) * 0.5 * zoom,
                );
            let to_screen = |p: ScenePoint| -> egui::Pos2 {
                origin + egui::vec2(p.x as f32 * zoom, p.y as f32 * zoom)
            };
            let from_screen = |p: egui::Pos2| -> ScenePoint {
                let v = p - origin;
                ScenePoint::new((v.x / zoom) as f64, (v.y / zoom) as f64)
            };

            // Working area and plot image
            let scene = scene_rect();
            let scene_screen = egui::Rect::from_two_pos(
                to_screen(ScenePoint::new(scene.left, scene.top)),
                to_screen(ScenePoint::new(scene.right(), scene.bottom())),
            );
            painter.rect_filled(scene_screen, 0.0, egui::Color32::from_rgb(35, 39, 46));
            if let Some(path) = &self.image_path {
                let uri = format!("file://{}", path.display());
                egui::Image::from_uri(uri).paint_at(ui, scene_screen);
            }

            // Edge strips hosting the template guidelines
            let regions = self.guidelines.edge_regions();
            for strip in [regions.left, regions.right, regions.top, regions.bottom] {
                let strip_screen = egui::Rect::from_two_pos(
                    to_screen(ScenePoint::new(strip.left, strip.top)),
                    to_screen(ScenePoint::new(strip.right(), strip.bottom())),
                );
                painter.rect_filled(strip_screen, 0.0, egui::Color32::from_rgb(30, 34, 42));
            }

            // Pointer dispatch: hover transitions first, then presses
            let pointer_scene = response.hover_pos().map(from_screen);
            self.update_hover(pointer_scene);
            if response.clicked() {
                if let Some(pos) = response.interact_pointer_pos() {
                    self.handle_canvas_click(from_screen(pos));
                }
            }

            // Draw the guidelines
            for g in self.guidelines.guidelines() {
                if !g.do_paint() {
                    continue;
                }
                let (cr, cg, cb) = g.color().rgb();
                let color = egui::Color32::from_rgb(cr, cg, cb);
                let width = (if g.is_hovered() { 2.5 } else { 1.2 }) * zoom;
                let stroke = egui::Stroke::new(width, color);

                match g.shape() {
                    GuidelineShape::Line { a, b } => {
                        painter.line_segment([to_screen(a), to_screen(b)], stroke);
                    }
                    GuidelineShape::Ellipse { center, rx, ry } => {
                        draw_ellipse(&painter, to_screen(center), rx, ry, zoom, stroke);
                    }
                }
            }

            // Calibration markers
            for (i, point) in self.calibration.iter().enumerate() {
                let p = to_screen(point.scene);
                painter.circle_filled(p, 5.0 * zoom, egui::Color32::from_rgb(240, 150, 50));
                painter.text(
                    p + egui::vec2(8.0 * zoom, -8.0 * zoom),
                    egui::Align2::LEFT_BOTTOM,
                    format!("P{}", i + 1),
                    egui::FontId::proportional(12.0 * zoom),
                    egui::Color32::WHITE,
                );
            }

            if self.image_path.is_none() {
                painter.text(
                    scene_screen.center(),
                    egui::Align2::CENTER_CENTER,
                    "No plot image loaded.\nFile → Open Image...",
                    egui::FontId::proportional(18.0),
                    egui::Color32::GRAY,
                );
            }
        });

        // Bottom panel: status
        egui::TopBottomPanel::bottom("info_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let image = self
                    .image_path
                    .as_ref()
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "no image".to_string());
                ui.label(image);
                ui.separator();
                ui.label(format!("{} guidelines", self.guidelines.len()));
                ui.separator();
                if let Some(g) = self.hovered.and_then(|id| self.guidelines.guideline(id)) {
                    ui.label(g.state_name());
                } else {
                    ui.label("-");
                }
                ui.separator();
                ui.label(format!("zoom {:.0}%", self.zoom * 100.0));
            });
        });
    }
}

/// Stroke an ellipse as a closed polyline; egui has no ellipse primitive
fn draw_ellipse(
    painter: &egui::Painter,
    center: egui::Pos2,
    rx: f64,
    ry: f64,
    zoom: f32,
    stroke: egui::Stroke,
) {
    const SEGMENTS: usize = 64;
    let points: Vec<egui::Pos2> = (0..SEGMENTS)
        .map(|i| {
            let angle = (i as f32 / SEGMENTS as f32) * std::f32::consts::TAU;
            center
                + egui::vec2(
                    rx as f32 * zoom * angle.cos(),
                    ry as f32 * zoom * angle.sin(),
                )
        })
        .collect();
    painter.add(egui::Shape::closed_line(points, stroke));
}
