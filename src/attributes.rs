//! Attribute sets for configuring a circular progress bar declaratively.
//!
//! An attribute set is the markup-side description of a widget: every key is
//! optional and anything left out keeps the widget default. Sets are usually
//! loaded from JSON and turned into builder options with
//! [`Attributes::to_options`], or passed straight to
//! [`crate::circle::from_attributes`].
//!
//! ```rust
//! use circle_progress::attributes::Attributes;
//!
//! let attrs = Attributes::from_json(r##"{
//!     "progress_stroke_width": 2.0,
//!     "progress_start_angle": 0,
//!     "progress_shader": "linear"
//! }"##).unwrap();
//! assert_eq!(attrs.progress_stroke_width, Some(2.0));
//! ```

use crate::canvas::CapType;
use crate::circle::{
    with_animation_duration, with_background_color, with_cap, with_foreground_color,
    with_gradient_colors, with_start_angle, with_stroke_width, with_text_color, with_text_size,
    CircleOption,
};
use crate::gradient::GradientKind;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while reading an attribute set.
#[derive(Debug, Error)]
pub enum AttributeError {
    /// The attribute document is not valid JSON or has the wrong shape.
    #[error("malformed attribute set: {0}")]
    Malformed(#[from] serde_json::Error),
    /// `progress_shader` names a gradient kind that does not exist.
    #[error("unknown gradient kind `{0}`")]
    UnknownGradient(String),
    /// `progress_cap` names a cap type that does not exist.
    #[error("unknown cap type `{0}`")]
    UnknownCap(String),
    /// A length attribute is negative or not finite.
    #[error("`{name}` must be a non-negative length, got {value}")]
    InvalidLength {
        /// Attribute key.
        name: &'static str,
        /// Rejected value.
        value: f32,
    },
}

/// Gradient kind as written in an attribute set, either its code or its name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ShaderAttribute {
    /// Integer code, `0` (none) to `3` (sweep).
    Code(i64),
    /// Lowercase name such as `"linear"`.
    Name(String),
}

impl ShaderAttribute {
    /// Resolves the attribute into a [`GradientKind`].
    pub fn kind(&self) -> Result<GradientKind, AttributeError> {
        match self {
            ShaderAttribute::Code(code) => GradientKind::from_code(*code),
            ShaderAttribute::Name(name) => name.parse(),
        }
    }
}

/// Declarative configuration of a circular progress bar.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Attributes {
    /// Stroke width of both rings, in cells.
    pub progress_stroke_width: Option<f32>,
    /// Color of the background ring.
    pub progress_background_color: Option<String>,
    /// Color of the foreground arc when no gradient is active.
    pub progress_foreground_color: Option<String>,
    /// First gradient color.
    pub progress_start_color: Option<String>,
    /// Second gradient color.
    pub progress_end_color: Option<String>,
    /// Height of the centered text, in rows.
    pub progress_text_size: Option<f32>,
    /// Color of the centered text.
    pub progress_text_color: Option<String>,
    /// Angle the foreground arc starts at, in degrees.
    pub progress_start_angle: Option<f32>,
    /// Tween duration, in milliseconds.
    pub progress_animation_duration: Option<u64>,
    /// Gradient kind applied to the foreground arc.
    pub progress_shader: Option<ShaderAttribute>,
    /// Cap drawn at the ends of the foreground arc.
    pub progress_cap: Option<String>,
}

impl Attributes {
    /// Parses an attribute set from a JSON object.
    pub fn from_json(json: &str) -> Result<Self, AttributeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolved gradient kind, [`GradientKind::None`] when unset.
    pub fn gradient_kind(&self) -> Result<GradientKind, AttributeError> {
        self.progress_shader
            .as_ref()
            .map_or(Ok(GradientKind::None), ShaderAttribute::kind)
    }

    /// Converts the set into builder options, validating every value.
    ///
    /// The gradient kind is not an option: it is requested after
    /// construction so it can wait for the widget's geometry. See
    /// [`Attributes::gradient_kind`].
    pub fn to_options(&self) -> Result<Vec<CircleOption>, AttributeError> {
        let mut opts = Vec::new();

        if let Some(width) = self.progress_stroke_width {
            opts.push(with_stroke_width(check_length(
                "progress_stroke_width",
                width,
            )?));
        }
        if let Some(color) = &self.progress_background_color {
            opts.push(with_background_color(color.clone()));
        }
        if let Some(color) = &self.progress_foreground_color {
            opts.push(with_foreground_color(color.clone()));
        }
        if self.progress_start_color.is_some() || self.progress_end_color.is_some() {
            opts.push(with_gradient_colors(
                self.progress_start_color.clone(),
                self.progress_end_color.clone(),
            ));
        }
        if let Some(size) = self.progress_text_size {
            opts.push(with_text_size(check_length("progress_text_size", size)?));
        }
        if let Some(color) = &self.progress_text_color {
            opts.push(with_text_color(color.clone()));
        }
        if let Some(angle) = self.progress_start_angle {
            opts.push(with_start_angle(angle));
        }
        if let Some(millis) = self.progress_animation_duration {
            opts.push(with_animation_duration(Duration::from_millis(millis)));
        }
        if let Some(cap) = &self.progress_cap {
            opts.push(with_cap(cap.parse::<CapType>()?));
        }

        Ok(opts)
    }
}

fn check_length(name: &'static str, value: f32) -> Result<f32, AttributeError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(AttributeError::InvalidLength { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_has_no_options() {
        let attrs = Attributes::from_json("{}").unwrap();
        assert_eq!(attrs, Attributes::default());
        assert!(attrs.to_options().unwrap().is_empty());
        assert_eq!(attrs.gradient_kind().unwrap(), GradientKind::None);
    }

    #[test]
    fn test_full_set() {
        let attrs = Attributes::from_json(
            r##"{
                "progress_stroke_width": 2.0,
                "progress_background_color": "#FF4081",
                "progress_foreground_color": "#303F9F",
                "progress_start_color": "#303F9F",
                "progress_end_color": "#3F51B5",
                "progress_text_size": 1.0,
                "progress_text_color": "#303F9F",
                "progress_start_angle": 0,
                "progress_animation_duration": 250,
                "progress_shader": 1,
                "progress_cap": "butt"
            }"##,
        )
        .unwrap();

        assert_eq!(attrs.progress_animation_duration, Some(250));
        assert_eq!(attrs.gradient_kind().unwrap(), GradientKind::Linear);
        // start/end colors collapse into one option
        assert_eq!(attrs.to_options().unwrap().len(), 9);
    }

    #[test]
    fn test_shader_by_name() {
        let attrs = Attributes::from_json(r#"{"progress_shader": "sweep"}"#).unwrap();
        assert_eq!(attrs.gradient_kind().unwrap(), GradientKind::Sweep);
    }

    #[test]
    fn test_unknown_shader() {
        let attrs = Attributes::from_json(r#"{"progress_shader": 9}"#).unwrap();
        assert!(matches!(
            attrs.gradient_kind(),
            Err(AttributeError::UnknownGradient(code)) if code == "9"
        ));
    }

    #[test]
    fn test_unknown_cap() {
        let attrs = Attributes::from_json(r#"{"progress_cap": "arrow"}"#).unwrap();
        assert!(matches!(
            attrs.to_options(),
            Err(AttributeError::UnknownCap(_))
        ));
    }

    #[test]
    fn test_negative_length_rejected() {
        let attrs = Attributes::from_json(r#"{"progress_stroke_width": -1.0}"#).unwrap();
        let err = attrs.to_options().err().unwrap();
        assert_eq!(
            err.to_string(),
            "`progress_stroke_width` must be a non-negative length, got -1"
        );
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Attributes::from_json("{ not json"),
            Err(AttributeError::Malformed(_))
        ));
        assert!(matches!(
            Attributes::from_json(r#"{"progress_colour": "red"}"#),
            Err(AttributeError::Malformed(_))
        ));
    }
}
