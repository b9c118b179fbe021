use glam::{Mat4, Vec3};
use serde_json::Value;

use crate::input::{InputEvent, MouseButton};
use crate::mesh::{MeshId, Topology};
use crate::options::Options;
use crate::renderer::{uniforms, DebugGui, ShaderProgram, ShadingBackend, UniformValue};
use crate::util::frame_timing::FrameStats;
use crate::viewport::{ViewportRect, ViewportRole};
use crate::SceneEngine;

/// Read-only rows drawn above the option fields (FPS, frame time).
const STAT_ROWS: usize = 2;

/// Gap between a row's bars and the row edges, in NDC units.
const ROW_INSET: f32 = 0.004;
/// Depth of the hover highlight. Value bars sit in front of it.
const HIGHLIGHT_DEPTH: f32 = 0.5;
const FILL_DEPTH: f32 = 0.25;

/// Control type of a panel field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Boolean checkbox.
    Toggle,
    /// Bounded number.
    Slider {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
        /// Increment per click or scroll notch.
        step: f64,
    },
}

/// One editable option row.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelField {
    /// Options section (e.g. `camera`).
    pub section: String,
    /// Field within the section (e.g. `yaw`).
    pub field: String,
    /// Display label.
    pub label: String,
    /// Control type.
    pub kind: FieldKind,
    /// Last refreshed value.
    pub value: Value,
}

/// An edit the viewer should apply with
/// [`SceneEngine::set_option`](crate::SceneEngine::set_option).
#[derive(Debug, Clone, PartialEq)]
pub struct PanelEdit {
    /// Options section.
    pub section: String,
    /// Field within the section.
    pub field: String,
    /// New value.
    pub value: Value,
}

/// Schema-driven control panel.
#[derive(Debug, Clone)]
pub struct ControlPanel {
    fields: Vec<PanelField>,
    stats: FrameStats,
    rect: ViewportRect,
    framebuffer_height: u32,
    cursor: Option<(f32, f32)>,
    hovered: Option<usize>,
    summary: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlPanel {
    /// Build the field list from the options schema.
    #[must_use]
    pub fn new() -> Self {
        let schema = serde_json::to_value(Options::json_schema())
            .unwrap_or(Value::Null);
        let fields = fields_from_schema(&schema);
        log::debug!("control panel built with {} fields", fields.len());
        Self {
            fields,
            stats: FrameStats::default(),
            rect: ViewportRect::default(),
            framebuffer_height: 1,
            cursor: None,
            hovered: None,
            summary: String::new(),
        }
    }

    /// Option rows in display order.
    #[must_use]
    pub fn fields(&self) -> &[PanelField] {
        &self.fields
    }

    /// Snapshot option values, frame statistics and the panel rectangle.
    pub fn refresh(&mut self, engine: &SceneEngine) {
        let values = serde_json::to_value(engine.options()).unwrap_or(Value::Null);
        for field in &mut self.fields {
            if let Some(v) = values.get(&field.section).and_then(|s| s.get(&field.field)) {
                field.value = v.clone();
            }
        }
        self.stats = engine.frame_stats();
        self.rect = engine.layout().viewport(ViewportRole::Panel).rect;
        self.framebuffer_height = engine.layout().size().height();
    }

    /// Feed a pointer event. Returns an edit when the event changes a
    /// field; events outside the panel quadrant are ignored.
    pub fn handle_cursor(&mut self, event: InputEvent) -> Option<PanelEdit> {
        match event {
            InputEvent::CursorMoved { x, y } => {
                self.cursor = Some((x, y));
                self.hovered = self.row_at(x, y);
                None
            }
            InputEvent::MouseButton {
                button: MouseButton::Left,
                pressed: true,
            } => {
                let (x, _) = self.cursor?;
                let index = self.hovered?;
                match self.fields[index].kind {
                    FieldKind::Toggle => {
                        let on = self.fields[index].value.as_bool().unwrap_or(false);
                        Some(self.edit(index, Value::Bool(!on)))
                    }
                    FieldKind::Slider { .. } => {
                        // Left half steps down, right half steps up.
                        let mid = self.rect.x as f32 + self.rect.width as f32 / 2.0;
                        let notch = if x < mid { -1.0 } else { 1.0 };
                        self.nudge(index, notch)
                    }
                }
            }
            InputEvent::Scroll { delta } if delta != 0.0 => {
                let index = self.hovered?;
                self.nudge(index, f64::from(delta.signum()))
            }
            _ => None,
        }
    }

    /// One-line description of the panel state, mirrored into the window
    /// title.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Field under the cursor, if any.
    #[must_use]
    pub fn hovered(&self) -> Option<&PanelField> {
        self.hovered.map(|i| &self.fields[i])
    }

    fn nudge(&mut self, index: usize, notches: f64) -> Option<PanelEdit> {
        let field = &self.fields[index];
        let FieldKind::Slider { min, max, step } = field.kind else {
            return None;
        };
        let current = field.value.as_f64()?;
        let next = ((current + notches * step) / step).round() * step;
        Some(self.edit(index, Value::from(next.clamp(min, max))))
    }

    fn edit(&mut self, index: usize, value: Value) -> PanelEdit {
        let field = &mut self.fields[index];
        field.value = value.clone();
        PanelEdit {
            section: field.section.clone(),
            field: field.field.clone(),
            value,
        }
    }

    /// Field row under window position `(x, y)` (top-left origin).
    fn row_at(&self, x: f32, y: f32) -> Option<usize> {
        let rows = self.fields.len() + STAT_ROWS;
        if self.rect.height == 0 || x < 0.0 || y < 0.0 {
            return None;
        }
        let top = self.framebuffer_height.saturating_sub(self.rect.y + self.rect.height);
        let (px, py) = (x as u32, y as u32);
        if px < self.rect.x
            || px >= self.rect.x + self.rect.width
            || py < top
            || py >= top + self.rect.height
        {
            return None;
        }
        let row = (py - top) as usize * rows / self.rect.height as usize;
        row.checked_sub(STAT_ROWS)
    }

    /// How much of a field's row its value bar covers, in `[0, 1]`.
    fn fill_fraction(field: &PanelField) -> f32 {
        match field.kind {
            FieldKind::Toggle => {
                if field.value.as_bool().unwrap_or(false) {
                    1.0
                } else {
                    0.0
                }
            }
            FieldKind::Slider { min, max, .. } => {
                let Some(v) = field.value.as_f64() else {
                    return 0.0;
                };
                if max <= min {
                    return 0.0;
                }
                ((v - min) / (max - min)).clamp(0.0, 1.0) as f32
            }
        }
    }

    /// Quad transform for field row `index` in the panel viewport's NDC,
    /// covering `width` of the row from its left edge.
    fn row_quad(&self, index: usize, width: f32, depth: f32) -> Mat4 {
        let rows = (self.fields.len() + STAT_ROWS) as f32;
        let row = (index + STAT_ROWS) as f32;
        let top = 2.0f32.mul_add(-row / rows, 1.0) - ROW_INSET;
        let bottom = 2.0f32.mul_add(-(row + 1.0) / rows, 1.0) + ROW_INSET;
        let left = -1.0 + ROW_INSET;
        let span = 2.0f32.mul_add(width, -2.0 * ROW_INSET).max(0.0);
        Mat4::from_translation(Vec3::new(left, bottom, depth))
            * Mat4::from_scale(Vec3::new(span, (top - bottom).max(0.0), 1.0))
    }

    fn draw_quad(backend: &mut dyn ShadingBackend, mesh: MeshId, mvp: Mat4) {
        backend.set_uniform(uniforms::MVP, UniformValue::Mat4(mvp));
        backend.draw(mesh, Topology::TriangleStrip);
    }
}

impl DebugGui for ControlPanel {
    fn draw(&mut self, backend: &mut dyn ShadingBackend) {
        let mut summary = format!(
            "FPS {:.0} | {:.2} ms",
            self.stats.fps, self.stats.frame_time_ms
        );
        if let Some(field) = self.hovered() {
            summary.push_str(&format!(" | {}: {}", field.label, format_value(&field.value)));
        }
        log::trace!("panel: {summary}");
        self.summary = summary;

        backend.use_program(ShaderProgram::Color);
        if let Some(index) = self.hovered {
            let mvp = self.row_quad(index, 1.0, HIGHLIGHT_DEPTH);
            Self::draw_quad(backend, MeshId::PanelRow, mvp);
        }
        for (index, field) in self.fields.iter().enumerate() {
            let fraction = Self::fill_fraction(field);
            if fraction > 0.0 {
                let mvp = self.row_quad(index, fraction, FILL_DEPTH);
                Self::draw_quad(backend, MeshId::PanelFill, mvp);
            }
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Number(n) => n.as_f64().map_or_else(|| n.to_string(), |f| format!("{f:.2}")),
        Value::Bool(b) => String::from(if *b { "on" } else { "off" }),
        other => other.to_string(),
    }
}

/// Walk the options schema and collect every boolean or bounded number.
fn fields_from_schema(schema: &Value) -> Vec<PanelField> {
    let Some(sections) = schema.pointer("/properties").and_then(Value::as_object) else {
        return Vec::new();
    };
    let mut fields = Vec::new();
    for (section, section_schema) in sections {
        let Some(props) = section_schema
            .pointer("/properties")
            .or_else(|| section_schema.pointer("/allOf/0/properties"))
            .and_then(Value::as_object)
        else {
            continue;
        };
        for (field, field_schema) in props {
            let kind = match field_schema.get("type").and_then(Value::as_str) {
                Some("boolean") => FieldKind::Toggle,
                Some("number" | "integer") => {
                    let bound = |key: &str| field_schema.get(key).and_then(Value::as_f64);
                    let (Some(min), Some(max)) = (bound("minimum"), bound("maximum")) else {
                        continue;
                    };
                    FieldKind::Slider {
                        min,
                        max,
                        step: bound("step").unwrap_or(0.01),
                    }
                }
                _ => continue,
            };
            let label = field_schema
                .get("title")
                .and_then(Value::as_str)
                .map_or_else(|| field.clone(), str::to_owned);
            fields.push(PanelField {
                section: section.clone(),
                field: field.clone(),
                label,
                kind,
                value: Value::Null,
            });
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::recorder::{Command, RecordingBackend};
    use crate::viewport::FramebufferSize;

    fn engine() -> SceneEngine {
        SceneEngine::new(
            FramebufferSize::new(800, 600),
            Options::default(),
            &mut RecordingBackend::new(),
        )
        .unwrap()
    }

    fn index_of(panel: &ControlPanel, section: &str, field: &str) -> usize {
        panel
            .fields()
            .iter()
            .position(|f| f.section == section && f.field == field)
            .unwrap()
    }

    /// Window-space centre of field row `index` for an 800x600 window.
    fn row_center(panel: &ControlPanel, index: usize) -> f32 {
        let rows = panel.fields().len() + STAT_ROWS;
        let row_height = 300.0 / rows as f32;
        (index + STAT_ROWS) as f32 * row_height + row_height / 2.0
    }

    #[test]
    fn fields_come_from_the_schema() {
        let panel = ControlPanel::new();
        let yaw = &panel.fields()[index_of(&panel, "camera", "yaw")];
        assert_eq!(yaw.label, "Camera Yaw");
        assert!(matches!(yaw.kind, FieldKind::Slider { step, .. } if step == 0.01));
        let enabled = &panel.fields()[index_of(&panel, "animation", "enabled")];
        assert_eq!(enabled.kind, FieldKind::Toggle);
        assert!(panel.fields().iter().all(|f| f.field != "attenuation"));
    }

    #[test]
    fn refresh_snapshots_current_values() {
        let mut panel = ControlPanel::new();
        panel.refresh(&engine());
        let zoom = &panel.fields()[index_of(&panel, "camera", "zoom")];
        assert_eq!(zoom.value.as_f64(), Some(15.0));
    }

    #[test]
    fn click_on_toggle_flips_it() {
        let mut engine = engine();
        let mut panel = ControlPanel::new();
        panel.refresh(&engine);
        let index = index_of(&panel, "animation", "enabled");
        let y = row_center(&panel, index);
        assert!(panel.handle_cursor(InputEvent::CursorMoved { x: 100.0, y }).is_none());
        let edit = panel
            .handle_cursor(InputEvent::MouseButton {
                button: MouseButton::Left,
                pressed: true,
            })
            .unwrap();
        assert_eq!(edit.value, Value::Bool(false));
        engine.set_option(&edit.section, &edit.field, edit.value).unwrap();
        assert!(!engine.options().animation.enabled);
    }

    #[test]
    fn scroll_steps_a_slider_within_range() {
        let mut panel = ControlPanel::new();
        panel.refresh(&engine());
        let index = index_of(&panel, "camera", "pitch");
        let y = row_center(&panel, index);
        let _ = panel.handle_cursor(InputEvent::CursorMoved { x: 50.0, y });
        let edit = panel.handle_cursor(InputEvent::Scroll { delta: 1.0 }).unwrap();
        assert!((edit.value.as_f64().unwrap() - 0.01).abs() < 1e-9);
    }

    #[test]
    fn events_outside_the_panel_are_ignored() {
        let mut panel = ControlPanel::new();
        panel.refresh(&engine());
        // Bottom-right quadrant.
        let _ = panel.handle_cursor(InputEvent::CursorMoved { x: 600.0, y: 500.0 });
        assert!(panel.hovered().is_none());
        assert!(panel
            .handle_cursor(InputEvent::MouseButton {
                button: MouseButton::Left,
                pressed: true,
            })
            .is_none());
    }

    #[test]
    fn draw_writes_the_summary() {
        let mut panel = ControlPanel::new();
        panel.refresh(&engine());
        panel.draw(&mut RecordingBackend::new());
        assert!(panel.summary().starts_with("FPS"));
    }

    fn panel_draws(backend: &RecordingBackend, mesh: MeshId) -> usize {
        backend.draws().iter().filter(|(m, _)| *m == mesh).count()
    }

    #[test]
    fn hovered_row_is_highlighted_once() {
        let mut panel = ControlPanel::new();
        panel.refresh(&engine());

        let mut backend = RecordingBackend::new();
        panel.draw(&mut backend);
        assert_eq!(panel_draws(&backend, MeshId::PanelRow), 0);

        let index = index_of(&panel, "camera", "zoom");
        let y = row_center(&panel, index);
        let _ = panel.handle_cursor(InputEvent::CursorMoved { x: 100.0, y });
        let mut backend = RecordingBackend::new();
        panel.draw(&mut backend);
        assert_eq!(panel_draws(&backend, MeshId::PanelRow), 1);
        assert!(backend
            .commands()
            .iter()
            .any(|c| matches!(c, Command::UseProgram(ShaderProgram::Color))));
    }

    #[test]
    fn value_bars_are_colour_strips_inside_the_panel() {
        let mut panel = ControlPanel::new();
        panel.refresh(&engine());
        let mut backend = RecordingBackend::new();
        panel.draw(&mut backend);

        let fills: Vec<_> = backend
            .draws()
            .into_iter()
            .filter(|(m, _)| *m == MeshId::PanelFill)
            .collect();
        assert!(!fills.is_empty());
        assert!(fills.iter().all(|(_, t)| *t == Topology::TriangleStrip));

        for value in backend.uniforms_named(uniforms::MVP) {
            let UniformValue::Mat4(mvp) = value else {
                unreachable!("MVP is always a matrix");
            };
            for corner in [Vec3::ZERO, Vec3::ONE] {
                let p = mvp.transform_point3(corner);
                assert!(p.x >= -1.0 && p.x <= 1.0 && p.y >= -1.0 && p.y <= 1.0);
            }
        }
    }

    #[test]
    fn toggle_bar_fills_its_row_only_when_on() {
        let mut panel = ControlPanel::new();
        panel.refresh(&engine());
        let index = index_of(&panel, "animation", "enabled");
        let field = &panel.fields()[index];
        assert!((ControlPanel::fill_fraction(field) - 1.0).abs() < f32::EPSILON);

        let mut off = field.clone();
        off.value = Value::Bool(false);
        assert!(ControlPanel::fill_fraction(&off).abs() < f32::EPSILON);

        let full = panel.row_quad(index, 1.0, FILL_DEPTH);
        let right = full.transform_point3(Vec3::ONE).x;
        assert!((right - (1.0 - ROW_INSET)).abs() < 1e-5);
    }

    #[test]
    fn slider_bar_tracks_the_value_within_its_range() {
        let mut panel = ControlPanel::new();
        panel.refresh(&engine());
        let mut field = panel.fields()[index_of(&panel, "camera", "zoom")].clone();
        let FieldKind::Slider { min, max, .. } = field.kind else {
            unreachable!("zoom is a slider");
        };
        field.value = Value::from(max + 100.0);
        assert!((ControlPanel::fill_fraction(&field) - 1.0).abs() < f32::EPSILON);
        field.value = Value::from((min + max) / 2.0);
        assert!((ControlPanel::fill_fraction(&field) - 0.5).abs() < 1e-6);
    }
}
