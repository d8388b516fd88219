#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/circle-progress/")]

//! # circle-progress
//!
//! An animated circular progress indicator for terminal applications built
//! with [bubbletea-rs](https://github.com/joshka/bubbletea-rs).
//!
//! ## Overview
//!
//! The component follows the Elm Architecture pattern with `init()`,
//! `update()` and `view()` methods. It draws a background ring, a foreground
//! arc whose sweep follows the progress, and an optional line of text in the
//! middle. Setting a new progress plays a short decelerating animation; every
//! frame is a message that flows back through your application's `update`.
//!
//! ## Features
//!
//! - **Animated progress** with a single tween per widget, restarted cleanly
//!   when a new value arrives mid-animation
//! - **Linear gradients** rotated to follow the arc's start angle
//! - **Pluggable text** through a formatter closure
//! - **Declarative configuration** from JSON attribute sets
//! - **State snapshots** for recreating a widget without losing its progress
//!
//! ## Quick Start
//!
//! ```rust
//! use circle_progress::prelude::*;
//!
//! let mut ring = circle_new(&[
//!     with_size(24, 12),
//!     with_gradient(GradientKind::Linear, "#00574B".to_string(), "#008577".to_string()),
//! ]);
//!
//! let _frame = ring.set_progress(42);
//! assert_eq!(ring.progress(), 42);
//! ```
//!
//! ## Modules
//!
//! - [`circle`]: the progress ring component
//! - [`animation`]: the value tween and its easing curve
//! - [`canvas`]: drawing primitives and the terminal cell canvas
//! - [`gradient`]: gradient kinds and the linear gradient shader
//! - [`geometry`]: rectangles, padding and the progress to angle mapping
//! - [`attributes`]: JSON attribute sets and their errors
//! - [`fake_task`]: a worker thread producing fake progress for demos

pub mod animation;
pub mod attributes;
pub mod canvas;
pub mod circle;
pub mod fake_task;
pub mod geometry;
pub mod gradient;

pub use attributes::{AttributeError, Attributes};
pub use canvas::{Canvas, CapType, CellCanvas, Paint};
pub use circle::{
    default_text_decorator, from_attributes, new as circle_new, CircleOption, FrameMsg,
    Model as CircleProgress, SavedState, TextDecorator,
};
pub use fake_task::{FakeTask, ProgressPostedMsg};
pub use geometry::{calc_sweep_angle, Padding, Rect};
pub use gradient::{GradientKind, LinearGradient};

/// Commonly used types and builder functions.
pub mod prelude {
    pub use crate::attributes::{AttributeError, Attributes};
    pub use crate::canvas::{Canvas, CapType, CellCanvas, Paint};
    pub use crate::circle::{
        default_text_decorator, from_attributes, new as circle_new, with_animation_duration,
        with_background_color, with_cap, with_foreground_color, with_gradient,
        with_gradient_colors, with_padding, with_size, with_start_angle, with_stroke_characters,
        with_stroke_width, with_text_color, with_text_decorator, with_text_size, without_text,
        CircleOption, FrameMsg, Model as CircleProgress, SavedState, TextDecorator,
    };
    pub use crate::fake_task::{FakeTask, ProgressPostedMsg};
    pub use crate::geometry::{calc_sweep_angle, Padding, Rect};
    pub use crate::gradient::{GradientKind, LinearGradient};
}
