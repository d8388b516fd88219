//! Drawing surface for the circular progress bar.
//!
//! The widget only talks to the [`Canvas`] trait: stroke an arc of an oval,
//! measure a font, draw a line of text. [`CellCanvas`] implements it on a grid
//! of terminal cells and renders the result with lipgloss styles.
//!
//! Arcs follow the usual screen convention: angles are in degrees, `0` is
//! 3 o'clock and positive sweeps turn clockwise. The stroke is centered on the
//! oval inscribed in the rectangle passed to [`Canvas::draw_arc`].

use crate::attributes::AttributeError;
use crate::geometry::{arc_contains, Rect, MAX_SWEEP_ANGLE};
use crate::gradient::LinearGradient;
use lipgloss_extras::lipgloss;
use lipgloss::Color as LGColor;
use lipgloss_extras::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use unicode_width::UnicodeWidthChar;

/// Minimum half-thickness of a stroke so that hairlines still cover a cell.
const MIN_HALF_STROKE: f32 = 0.5;

/// Shape drawn at both ends of an open arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapType {
    /// The stroke ends exactly at the arc's end angle.
    Butt,
    /// A half disc of the stroke width is added at each end.
    #[default]
    Round,
    /// The stroke extends past each end by half its width.
    Square,
}

impl FromStr for CapType {
    type Err = AttributeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "butt" | "but" => Ok(CapType::Butt),
            "round" => Ok(CapType::Round),
            "square" => Ok(CapType::Square),
            _ => Err(AttributeError::UnknownCap(s.to_string())),
        }
    }
}

/// Style used for one drawing operation.
///
/// Each widget owns its paints and mutates them in place, so a paint must
/// never be shared between widgets.
#[derive(Debug, Clone)]
pub struct Paint {
    /// Stroke thickness, in cells.
    pub stroke_width: f32,
    /// Solid color, used when no shader is set.
    pub color: String,
    /// Optional gradient, takes precedence over `color`.
    pub shader: Option<LinearGradient>,
    /// Ends of open arcs.
    pub cap: CapType,
    /// Character used to fill stroked cells.
    pub glyph: char,
    /// Text height, in rows.
    pub text_size: f32,
    /// Draw text in bold.
    pub bold: bool,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            stroke_width: 1.0,
            color: "#FFFFFF".to_string(),
            shader: None,
            cap: CapType::Butt,
            glyph: '█',
            text_size: 1.0,
            bold: false,
        }
    }
}

impl Paint {
    fn color_at(&self, x: f32, y: f32) -> LGColor {
        match &self.shader {
            Some(shader) => shader.color_at(x, y),
            None => LGColor::from(self.color.as_str()),
        }
    }

    /// Vertical metrics of a single line of text drawn with this paint.
    pub fn font_metrics(&self) -> FontMetrics {
        FontMetrics {
            ascent: -self.text_size,
            descent: 0.0,
        }
    }
}

/// Distances from the baseline to the top and bottom of a line of text.
///
/// `ascent` is negative (above the baseline), `descent` positive or zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Distance from the baseline to the top of the glyphs.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the glyphs.
    pub descent: f32,
}

/// Drawing primitives the progress bar is rendered with.
pub trait Canvas {
    /// Strokes the arc of the oval inscribed in `oval`, from `start_angle` sweeping `sweep_angle` degrees.
    fn draw_arc(&mut self, oval: &Rect, start_angle: f32, sweep_angle: f32, paint: &Paint);

    /// Draws `text` horizontally centered on `x`, with its baseline at `y`.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, paint: &Paint);

    /// Metrics of text drawn with `paint`.
    fn font_metrics(&self, paint: &Paint) -> FontMetrics {
        paint.font_metrics()
    }
}

/// Content of a single terminal cell.
#[derive(Debug, Clone, Default)]
pub enum Cell {
    /// Nothing drawn, renders as a space.
    #[default]
    Empty,
    /// A styled character.
    Glyph {
        /// Character shown in the cell.
        ch: char,
        /// Foreground color.
        color: LGColor,
        /// Bold text.
        bold: bool,
    },
    /// Right half of a double-width character, renders as nothing.
    Spacer,
}

/// A [`Canvas`] backed by a grid of terminal cells.
#[derive(Debug, Clone)]
pub struct CellCanvas {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl CellCanvas {
    /// Creates an empty grid of `width` columns by `height` rows.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell at `(col, row)`, `None` outside the grid.
    pub fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.cells.get(row * self.width + col)
    }

    /// Character drawn at `(col, row)`, `None` for empty cells and spacers.
    pub fn glyph_at(&self, col: usize, row: usize) -> Option<char> {
        match self.cell(col, row)? {
            Cell::Glyph { ch, .. } => Some(*ch),
            _ => None,
        }
    }

    /// Characters of one row without styling, empty cells as spaces.
    pub fn row_text(&self, row: usize) -> String {
        (0..self.width)
            .filter_map(|col| match self.cell(col, row) {
                Some(Cell::Glyph { ch, .. }) => Some(*ch),
                Some(Cell::Empty) => Some(' '),
                _ => None,
            })
            .collect()
    }

    /// Renders the grid as styled lines joined with `\n`.
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.height);
        for row in 0..self.height {
            let mut line = String::new();
            for col in 0..self.width {
                match &self.cells[row * self.width + col] {
                    Cell::Empty => line.push(' '),
                    Cell::Spacer => {}
                    Cell::Glyph { ch, color, bold } => {
                        let styled = Style::new()
                            .foreground(color.clone())
                            .bold(*bold)
                            .render(&ch.to_string());
                        line.push_str(&styled);
                    }
                }
            }
            lines.push(line);
        }
        lines.join("\n")
    }

    fn put(&mut self, col: usize, row: usize, cell: Cell) {
        if col < self.width && row < self.height {
            self.cells[row * self.width + col] = cell;
        }
    }
}

impl Canvas for CellCanvas {
    fn draw_arc(&mut self, oval: &Rect, start_angle: f32, sweep_angle: f32, paint: &Paint) {
        if oval.is_empty() || sweep_angle == 0.0 {
            return;
        }

        let rx = oval.width() / 2.0;
        let ry = oval.height() / 2.0;
        let cx = oval.center_x();
        let cy = oval.center_y();
        let half = (paint.stroke_width / 2.0).max(MIN_HALF_STROKE);
        let open = sweep_angle.abs() < MAX_SWEEP_ANGLE;

        // Square caps lengthen the arc by half a stroke along the oval
        let (start, sweep) = if open && paint.cap == CapType::Square {
            let extend = (half / ((rx + ry) / 2.0)).to_degrees();
            let sign = sweep_angle.signum();
            (start_angle - extend * sign, sweep_angle + 2.0 * extend * sign)
        } else {
            (start_angle, sweep_angle)
        };

        let end_points = if open && paint.cap == CapType::Round {
            let point = |angle: f32| {
                let (sin, cos) = angle.to_radians().sin_cos();
                (cx + rx * cos, cy + ry * sin)
            };
            Some([point(start_angle), point(start_angle + sweep_angle)])
        } else {
            None
        };

        for row in 0..self.height {
            for col in 0..self.width {
                let px = col as f32 + 0.5;
                let py = row as f32 + 0.5;
                let dx = px - cx;
                let dy = py - cy;

                if !on_oval(dx, dy, rx, ry, half) {
                    continue;
                }

                let on_arc = arc_contains(dy.atan2(dx).to_degrees(), start, sweep);
                let on_cap = end_points.is_some_and(|points| {
                    points
                        .iter()
                        .any(|(ex, ey)| (px - ex).hypot(py - ey) <= half)
                });

                if on_arc || on_cap {
                    let cell = Cell::Glyph {
                        ch: paint.glyph,
                        color: paint.color_at(px, py),
                        bold: false,
                    };
                    self.put(col, row, cell);
                }
            }
        }
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, paint: &Paint) {
        let metrics = self.font_metrics(paint);
        // Text occupies a single row, placed at the middle of the glyph box
        let middle = y + (metrics.ascent + metrics.descent) / 2.0;
        let row = (middle - 0.5).round();
        if row < 0.0 || row >= self.height as f32 {
            return;
        }
        let row = row as usize;

        let text_width: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
        let mut col = (x - text_width as f32 / 2.0).round() as isize;
        let color = LGColor::from(paint.color.as_str());

        for ch in text.chars() {
            let w = ch.width().unwrap_or(0);
            if w == 0 {
                continue;
            }
            if col >= 0 {
                let c = col as usize;
                self.put(
                    c,
                    row,
                    Cell::Glyph {
                        ch,
                        color: color.clone(),
                        bold: paint.bold,
                    },
                );
                for extra in 1..w {
                    self.put(c + extra, row, Cell::Spacer);
                }
            }
            col += w as isize;
        }
    }
}

/// Reports whether the point `(dx, dy)`, relative to the oval's center, lies within `half` of its outline.
fn on_oval(dx: f32, dy: f32, rx: f32, ry: f32, half: f32) -> bool {
    let r = ((dx / rx).powi(2) + (dy / ry).powi(2)).sqrt();
    if r == 0.0 {
        return rx.min(ry) <= half;
    }
    // Distance along the ray from the center to the outline
    let dist = dx.hypot(dy) * (1.0 - 1.0 / r);
    dist.abs() <= half
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring_paint() -> Paint {
        Paint {
            glyph: '#',
            ..Paint::default()
        }
    }

    fn count_glyphs(canvas: &CellCanvas, glyph: char) -> usize {
        (0..canvas.height())
            .map(|row| canvas.row_text(row).chars().filter(|&c| c == glyph).count())
            .sum()
    }

    #[test]
    fn test_cap_type_from_str() {
        assert_eq!("butt".parse::<CapType>().unwrap(), CapType::Butt);
        assert_eq!("ROUND".parse::<CapType>().unwrap(), CapType::Round);
        assert_eq!("square".parse::<CapType>().unwrap(), CapType::Square);
        assert!("arrow".parse::<CapType>().is_err());
    }

    #[test]
    fn test_full_ring_leaves_center_empty() {
        let mut canvas = CellCanvas::new(20, 10);
        let oval = Rect::new(0.0, 0.0, 20.0, 10.0).inset(0.5, 0.5);
        canvas.draw_arc(&oval, 0.0, 360.0, &ring_paint());

        // 12, 3, 6 and 9 o'clock are all on the ring
        assert_eq!(canvas.glyph_at(10, 0), Some('#'));
        assert_eq!(canvas.glyph_at(19, 5), Some('#'));
        assert_eq!(canvas.glyph_at(10, 9), Some('#'));
        assert_eq!(canvas.glyph_at(0, 5), Some('#'));
        // The middle stays clear
        assert_eq!(canvas.glyph_at(10, 5), None);
    }

    #[test]
    fn test_quarter_arc_from_twelve_o_clock() {
        let mut canvas = CellCanvas::new(20, 10);
        let oval = Rect::new(0.0, 0.0, 20.0, 10.0).inset(0.5, 0.5);
        canvas.draw_arc(&oval, -90.0, 90.0, &ring_paint());

        // Top right quadrant only
        assert_eq!(canvas.glyph_at(15, 1), Some('#'));
        assert_eq!(canvas.glyph_at(3, 8), None);
        assert_eq!(canvas.glyph_at(3, 1), None);
        assert_eq!(canvas.glyph_at(15, 8), None);
    }

    #[test]
    fn test_longer_sweep_covers_more_cells() {
        let oval = Rect::new(0.0, 0.0, 20.0, 10.0).inset(0.5, 0.5);
        let mut quarter = CellCanvas::new(20, 10);
        quarter.draw_arc(&oval, -90.0, 90.0, &ring_paint());
        let mut half = CellCanvas::new(20, 10);
        half.draw_arc(&oval, -90.0, 180.0, &ring_paint());
        let mut full = CellCanvas::new(20, 10);
        full.draw_arc(&oval, -90.0, 360.0, &ring_paint());

        let q = count_glyphs(&quarter, '#');
        let h = count_glyphs(&half, '#');
        let f = count_glyphs(&full, '#');
        assert!(q > 0);
        assert!(h > q);
        assert!(f > h);
    }

    #[test]
    fn test_zero_sweep_and_empty_oval_draw_nothing() {
        let mut canvas = CellCanvas::new(10, 10);
        canvas.draw_arc(&Rect::new(0.0, 0.0, 10.0, 10.0), -90.0, 0.0, &ring_paint());
        canvas.draw_arc(&Rect::default(), -90.0, 360.0, &ring_paint());
        assert_eq!(count_glyphs(&canvas, '#'), 0);
    }

    #[test]
    fn test_round_cap_adds_cells() {
        let oval = Rect::new(0.0, 0.0, 40.0, 20.0).inset(1.5, 1.5);
        let butt = Paint {
            stroke_width: 3.0,
            cap: CapType::Butt,
            ..ring_paint()
        };
        let round = Paint {
            cap: CapType::Round,
            ..butt.clone()
        };
        let mut a = CellCanvas::new(40, 20);
        a.draw_arc(&oval, -90.0, 90.0, &butt);
        let mut b = CellCanvas::new(40, 20);
        b.draw_arc(&oval, -90.0, 90.0, &round);
        assert!(count_glyphs(&b, '#') > count_glyphs(&a, '#'));
    }

    #[test]
    fn test_square_cap_adds_cells() {
        let oval = Rect::new(0.0, 0.0, 40.0, 20.0).inset(1.5, 1.5);
        let butt = Paint {
            stroke_width: 3.0,
            cap: CapType::Butt,
            ..ring_paint()
        };
        let square = Paint {
            cap: CapType::Square,
            ..butt.clone()
        };
        let mut a = CellCanvas::new(40, 20);
        a.draw_arc(&oval, -90.0, 90.0, &butt);
        let mut b = CellCanvas::new(40, 20);
        b.draw_arc(&oval, -90.0, 90.0, &square);
        assert!(count_glyphs(&b, '#') > count_glyphs(&a, '#'));
    }

    #[test]
    fn test_draw_text_centered() {
        let mut canvas = CellCanvas::new(20, 9);
        let paint = Paint::default();
        // Baseline one row under the center row
        canvas.draw_text("42%", 10.0, 5.0, &paint);
        assert_eq!(canvas.row_text(4).trim(), "42%");
        let first = canvas.row_text(4).find('4').unwrap();
        assert!((8..=10).contains(&first));
    }

    #[test]
    fn test_tall_text_stays_in_middle_of_glyph_box() {
        for size in [1.0, 2.0, 4.0, 6.0] {
            let mut canvas = CellCanvas::new(20, 12);
            let paint = Paint {
                text_size: size,
                ..Paint::default()
            };
            // Baseline shifted down by half the glyph box around row 6
            canvas.draw_text("42%", 10.0, 6.0 + size / 2.0, &paint);
            assert_eq!(canvas.row_text(6).trim(), "42%", "text size {size}");
        }
    }

    #[test]
    fn test_draw_text_wide_chars() {
        let mut canvas = CellCanvas::new(10, 3);
        canvas.draw_text("日本", 5.0, 2.0, &Paint::default());
        assert_eq!(canvas.row_text(1).trim(), "日本");
        assert!(matches!(canvas.cell(4, 1), Some(Cell::Spacer)));
    }

    #[test]
    fn test_draw_text_outside_grid_is_ignored() {
        let mut canvas = CellCanvas::new(10, 3);
        canvas.draw_text("x", 5.0, 20.0, &Paint::default());
        canvas.draw_text("y", 5.0, -4.0, &Paint::default());
        for row in 0..3 {
            assert_eq!(canvas.row_text(row).trim(), "");
        }
    }

    #[test]
    fn test_render_dimensions() {
        let mut canvas = CellCanvas::new(12, 6);
        let oval = Rect::new(0.0, 0.0, 12.0, 6.0).inset(0.5, 0.5);
        canvas.draw_arc(&oval, 0.0, 360.0, &ring_paint());
        let rendered = canvas.render();
        let lines: Vec<&str> = rendered.split('\n').collect();
        assert_eq!(lines.len(), 6);
        for line in lines {
            assert_eq!(lipgloss::width_visible(line), 12);
        }
    }

    #[test]
    fn test_gradient_paint_draws_every_arc_cell() {
        let oval = Rect::new(0.0, 0.0, 20.0, 10.0).inset(0.5, 0.5);
        let paint = Paint {
            shader: Some(LinearGradient::new(oval, -90.0, "#000000", "#FFFFFF")),
            ..ring_paint()
        };
        let mut solid = CellCanvas::new(20, 10);
        solid.draw_arc(&oval, -90.0, 200.0, &ring_paint());
        let mut shaded = CellCanvas::new(20, 10);
        shaded.draw_arc(&oval, -90.0, 200.0, &paint);
        assert_eq!(count_glyphs(&solid, '#'), count_glyphs(&shaded, '#'));
    }
}
