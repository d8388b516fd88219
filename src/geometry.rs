//! Geometry shared by the circular progress widget and its canvas.
//!
//! Coordinates are measured in terminal cells: `x` grows to the right,
//! `y` grows downwards. Angles are in degrees, `0` points at 3 o'clock and
//! positive angles turn clockwise, so `-90` is 12 o'clock.

/// Full turn, in degrees.
pub const MAX_SWEEP_ANGLE: f32 = 360.0;

/// Progress value that maps to a full turn.
pub const MAX_PROGRESS: i32 = 100;

/// Maps a progress value onto the sweep of the foreground arc.
///
/// The mapping is linear: `0` is an empty arc and `100` a full circle.
///
/// # Examples
///
/// ```rust
/// use circle_progress::geometry::calc_sweep_angle;
///
/// assert_eq!(calc_sweep_angle(0), 0.0);
/// assert_eq!(calc_sweep_angle(50), 180.0);
/// assert_eq!(calc_sweep_angle(100), 360.0);
/// ```
pub fn calc_sweep_angle(progress: i32) -> f32 {
    MAX_SWEEP_ANGLE / MAX_PROGRESS as f32 * progress as f32
}

/// Axis-aligned rectangle with floating point edges.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Right edge.
    pub right: f32,
    /// Bottom edge.
    pub bottom: f32,
}

impl Rect {
    /// Creates a rectangle from its four edges.
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Horizontal extent.
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Vertical extent.
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Horizontal center.
    pub fn center_x(&self) -> f32 {
        (self.left + self.right) / 2.0
    }

    /// Vertical center.
    pub fn center_y(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }

    /// True when the rectangle encloses no area.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Moves every edge towards the center, `dx` horizontally and `dy` vertically.
    pub fn inset(&self, dx: f32, dy: f32) -> Self {
        Self::new(
            self.left + dx,
            self.top + dy,
            self.right - dx,
            self.bottom - dy,
        )
    }
}

/// Space reserved around the widget's content box, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    /// Rows above the content.
    pub top: u16,
    /// Columns right of the content.
    pub right: u16,
    /// Rows below the content.
    pub bottom: u16,
    /// Columns left of the content.
    pub left: u16,
}

impl Padding {
    /// Same padding on every side.
    pub fn uniform(value: u16) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Vertical padding applied to `top`/`bottom`, horizontal to `left`/`right`.
    pub fn symmetric(vertical: u16, horizontal: u16) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }
}

/// Returns `angle` normalized into `[0, 360)`.
pub(crate) fn normalize_angle(angle: f32) -> f32 {
    angle.rem_euclid(MAX_SWEEP_ANGLE)
}

/// Reports whether `angle` lies on the arc starting at `start` and turning `sweep` degrees.
///
/// Negative sweeps turn counter-clockwise; sweeps of a full turn or more cover every angle.
pub(crate) fn arc_contains(angle: f32, start: f32, sweep: f32) -> bool {
    if sweep.abs() >= MAX_SWEEP_ANGLE {
        return true;
    }
    let rel = normalize_angle(angle - start);
    if sweep >= 0.0 {
        rel <= sweep
    } else {
        normalize_angle(-rel) <= -sweep
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calc_sweep_angle_is_linear() {
        for p in 0..=100 {
            let expected = 3.6 * p as f32;
            assert!((calc_sweep_angle(p) - expected).abs() < 1e-3, "p = {p}");
        }
        assert_eq!(calc_sweep_angle(0), 0.0);
        assert_eq!(calc_sweep_angle(100), 360.0);
    }

    #[test]
    fn test_rect_center_and_inset() {
        let rect = Rect::new(0.0, 0.0, 20.0, 10.0);
        assert_eq!(rect.center_x(), 10.0);
        assert_eq!(rect.center_y(), 5.0);

        let inset = rect.inset(0.5, 0.5);
        assert_eq!(inset, Rect::new(0.5, 0.5, 19.5, 9.5));
        assert_eq!(inset.center_x(), rect.center_x());
    }

    #[test]
    fn test_rect_is_empty() {
        assert!(Rect::default().is_empty());
        assert!(Rect::new(0.0, 0.0, 4.0, 4.0).inset(3.0, 3.0).is_empty());
        assert!(!Rect::new(0.0, 0.0, 4.0, 4.0).is_empty());
    }

    #[test]
    fn test_arc_contains_clockwise() {
        // Quarter arc from 12 o'clock to 3 o'clock
        assert!(arc_contains(-90.0, -90.0, 90.0));
        assert!(arc_contains(-45.0, -90.0, 90.0));
        assert!(arc_contains(0.0, -90.0, 90.0));
        assert!(!arc_contains(45.0, -90.0, 90.0));
        assert!(!arc_contains(180.0, -90.0, 90.0));
    }

    #[test]
    fn test_arc_contains_counter_clockwise() {
        assert!(arc_contains(180.0, -90.0, -90.0));
        assert!(arc_contains(-135.0, -90.0, -90.0));
        assert!(!arc_contains(0.0, -90.0, -90.0));
    }

    #[test]
    fn test_arc_contains_full_turn() {
        for angle in [-180.0, -90.0, 0.0, 90.0, 179.0] {
            assert!(arc_contains(angle, -90.0, 360.0));
        }
    }

    #[test]
    fn test_padding_constructors() {
        let p = Padding::symmetric(1, 2);
        assert_eq!((p.top, p.right, p.bottom, p.left), (1, 2, 1, 2));
        assert_eq!(Padding::uniform(3), Padding::symmetric(3, 3));
    }
}
