//! Gradient shading for the foreground arc.
//!
//! Only the linear kind is drawn. A linear gradient runs from the top to the
//! bottom of the arc's bounding rectangle and is then rotated about the
//! rectangle's center by the arc's start angle, so the gradient axis follows
//! the direction in which the arc begins.

use crate::attributes::AttributeError;
use crate::geometry::Rect;
use lipgloss_extras::lipgloss;
use lipgloss::blending::blend_1d;
use lipgloss::Color as LGColor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of colors sampled along a gradient.
const GRADIENT_STEPS: usize = 64;

/// Shading strategy requested for the foreground arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    /// Solid foreground color.
    #[default]
    None,
    /// Linear gradient between the start and end colors.
    Linear,
    /// Radial gradient. Accepted but drawn as [`GradientKind::None`].
    Radial,
    /// Sweep gradient. Accepted but drawn as [`GradientKind::None`].
    Sweep,
}

impl GradientKind {
    /// Maps the integer codes used by attribute sets (`0..=3`).
    pub fn from_code(code: i64) -> Result<Self, AttributeError> {
        match code {
            0 => Ok(GradientKind::None),
            1 => Ok(GradientKind::Linear),
            2 => Ok(GradientKind::Radial),
            3 => Ok(GradientKind::Sweep),
            other => Err(AttributeError::UnknownGradient(other.to_string())),
        }
    }
}

impl FromStr for GradientKind {
    type Err = AttributeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "no_gradient" => Ok(GradientKind::None),
            "linear" | "linear_gradient" => Ok(GradientKind::Linear),
            "radial" | "radial_gradient" => Ok(GradientKind::Radial),
            "sweep" | "sweep_gradient" => Ok(GradientKind::Sweep),
            _ => Err(AttributeError::UnknownGradient(s.to_string())),
        }
    }
}

impl fmt::Display for GradientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GradientKind::None => "none",
            GradientKind::Linear => "linear",
            GradientKind::Radial => "radial",
            GradientKind::Sweep => "sweep",
        };
        f.write_str(name)
    }
}

/// A top-to-bottom gradient across a rectangle, rotated about its center.
#[derive(Debug, Clone)]
pub struct LinearGradient {
    bounds: Rect,
    rotation: f32,
    start_color: String,
    end_color: String,
    ramp: Vec<LGColor>,
}

impl LinearGradient {
    /// Builds a gradient spanning `bounds` vertically, rotated by `rotation` degrees.
    pub fn new(bounds: Rect, rotation: f32, start_color: &str, end_color: &str) -> Self {
        let ramp = blend_1d(
            GRADIENT_STEPS,
            vec![LGColor::from(start_color), LGColor::from(end_color)],
        );
        Self {
            bounds,
            rotation,
            start_color: start_color.to_string(),
            end_color: end_color.to_string(),
            ramp,
        }
    }

    /// Rectangle the gradient was built for.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Rotation about the center of [`LinearGradient::bounds`], in degrees.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Color at the top edge before rotation.
    pub fn start_color(&self) -> &str {
        &self.start_color
    }

    /// Color at the bottom edge before rotation.
    pub fn end_color(&self) -> &str {
        &self.end_color
    }

    /// Position of the point `(x, y)` along the gradient axis, clamped to `[0, 1]`.
    ///
    /// The point is rotated back into gradient space before projecting onto
    /// the vertical axis; points past either end take the end color.
    pub fn offset_at(&self, x: f32, y: f32) -> f32 {
        let height = self.bounds.height();
        if height <= 0.0 {
            return 0.0;
        }
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let dx = x - self.bounds.center_x();
        let dy = y - self.bounds.center_y();
        let local_y = self.bounds.center_y() - dx * sin + dy * cos;
        ((local_y - self.bounds.top) / height).clamp(0.0, 1.0)
    }

    /// Color at the point `(x, y)`.
    pub fn color_at(&self, x: f32, y: f32) -> LGColor {
        let last = self.ramp.len().saturating_sub(1);
        let idx = (self.offset_at(x, y) * last as f32).round() as usize;
        match self.ramp.get(idx.min(last)) {
            Some(color) => color.clone(),
            None => LGColor::from(self.start_color.as_str()),
        }
    }
}
