//! Circular progress bar component for Bubble Tea applications.
//!
//! The widget draws a full background ring, a foreground arc whose sweep is
//! proportional to the progress, and an optional line of text centered in
//! the ring. Progress changes are animated: [`Model::set_progress`] starts a
//! short decelerating tween and returns the command that delivers its first
//! frame.
//!
//! # Basic Usage
//!
//! ```rust
//! use circle_progress::circle::{new, with_size, with_stroke_width};
//!
//! // Create a progress ring with default settings
//! let ring = new(&[]);
//!
//! // Or customize it using the option pattern
//! let ring = new(&[with_size(24, 12), with_stroke_width(2.0)]);
//! assert_eq!(ring.current_progress(), 0);
//! ```
//!
//! # Animation and Control
//!
//! ```rust
//! use circle_progress::circle::new;
//!
//! let mut ring = new(&[]);
//!
//! // Returns the command for the first animation frame
//! let cmd = ring.set_progress(75);
//! assert_eq!(ring.progress(), 75);
//! ```
//!
//! # bubbletea-rs Integration
//!
//! ```rust
//! use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};
//! use circle_progress::circle::{new, with_size, Model as CircleProgress};
//!
//! struct App {
//!     ring: CircleProgress,
//! }
//!
//! impl BubbleTeaModel for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let mut ring = new(&[with_size(20, 10)]);
//!         let cmd = ring.set_progress(30);
//!         (Self { ring }, Some(cmd))
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         // Animation frames are routed back to the ring
//!         self.ring.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.ring.view()
//!     }
//! }
//! ```

use crate::animation::{frame_interval, Animation, DEFAULT_ANIMATION_DURATION};
use crate::attributes::{AttributeError, Attributes};
use crate::canvas::{Canvas, CapType, CellCanvas, Paint};
use crate::geometry::{calc_sweep_angle, Padding, Rect, MAX_PROGRESS, MAX_SWEEP_ANGLE};
use crate::gradient::{GradientKind, LinearGradient};
use bubbletea_rs::{tick as bubbletea_tick, Cmd, Model as BubbleTeaModel, Msg};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};

// Internal ID management for progress ring instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Default colors, matching a teal and pink material palette.
pub const COLOR_PRIMARY: &str = "#008577";
/// Darker variant of [`COLOR_PRIMARY`].
pub const COLOR_PRIMARY_DARK: &str = "#00574B";
/// Accent color.
pub const COLOR_ACCENT: &str = "#D81B60";

const DEFAULT_STROKE_WIDTH: f32 = 1.0;
const DEFAULT_TEXT_SIZE: f32 = 1.0;
const DEFAULT_START_ANGLE: f32 = -90.0;
const DEFAULT_WIDTH: u16 = 20;
const DEFAULT_HEIGHT: u16 = 10;

/// Formats the progress shown in the middle of the ring.
pub type TextDecorator = Arc<dyn Fn(i32) -> String + Send + Sync>;

/// The decorator installed by default, rendering `42` as `"42%"`.
pub fn default_text_decorator() -> TextDecorator {
    Arc::new(|progress| format!("{progress}%"))
}

/// Configuration options for a circular progress bar.
///
/// Options are applied in order by [`new`], so later options override
/// earlier ones.
pub enum CircleOption {
    /// Thickness of both rings, in cells.
    WithStrokeWidth(f32),
    /// Color of the background ring.
    WithBackgroundColor(String),
    /// Color of the foreground arc.
    WithForegroundColor(String),
    /// Gradient start and end colors; `None` keeps the current color.
    WithGradientColors(Option<String>, Option<String>),
    /// Requests a gradient of the given kind between two colors.
    WithGradient(GradientKind, String, String),
    /// Height of the centered text, in rows.
    WithTextSize(f32),
    /// Color of the centered text.
    WithTextColor(String),
    /// Angle the foreground arc starts at, in degrees.
    WithStartAngle(f32),
    /// Duration of the progress tween.
    WithAnimationDuration(Duration),
    /// Cap drawn at both ends of the foreground arc.
    WithCap(CapType),
    /// Characters for the foreground arc and the background ring.
    WithStrokeCharacters(char, char),
    /// Custom text formatter.
    WithTextDecorator(TextDecorator),
    /// Draws no text.
    WithoutText,
    /// Space kept free around the ring.
    WithPadding(Padding),
    /// Initial size, in columns and rows.
    WithSize(u16, u16),
}

impl CircleOption {
    fn apply(&self, m: &mut Model) {
        match self {
            CircleOption::WithStrokeWidth(width) => m.stroke_width = *width,
            CircleOption::WithBackgroundColor(color) => m.background_color = color.clone(),
            CircleOption::WithForegroundColor(color) => m.foreground_color = color.clone(),
            CircleOption::WithGradientColors(start, end) => {
                if let Some(start) = start {
                    m.start_color = start.clone();
                }
                if let Some(end) = end {
                    m.end_color = end.clone();
                }
            }
            CircleOption::WithGradient(kind, start, end) => {
                m.gradient_request = Some(GradientRequest {
                    kind: *kind,
                    start_color: start.clone(),
                    end_color: end.clone(),
                });
            }
            CircleOption::WithTextSize(size) => m.text_size = *size,
            CircleOption::WithTextColor(color) => m.text_color = color.clone(),
            CircleOption::WithStartAngle(angle) => m.start_angle = *angle,
            CircleOption::WithAnimationDuration(duration) => m.animation_duration = *duration,
            CircleOption::WithCap(cap) => m.cap = *cap,
            CircleOption::WithStrokeCharacters(foreground, background) => {
                m.foreground_glyph = *foreground;
                m.background_glyph = *background;
            }
            CircleOption::WithTextDecorator(decorator) => {
                m.text_progress_decorator = Some(Arc::clone(decorator));
            }
            CircleOption::WithoutText => m.text_progress_decorator = None,
            CircleOption::WithPadding(padding) => m.padding = *padding,
            CircleOption::WithSize(width, height) => {
                m.width = *width;
                m.height = *height;
            }
        }
    }
}

/// Sets the thickness of both rings.
pub fn with_stroke_width(width: f32) -> CircleOption {
    CircleOption::WithStrokeWidth(width)
}

/// Sets the background ring color.
pub fn with_background_color(color: String) -> CircleOption {
    CircleOption::WithBackgroundColor(color)
}

/// Sets the solid foreground arc color.
pub fn with_foreground_color(color: String) -> CircleOption {
    CircleOption::WithForegroundColor(color)
}

/// Sets the colors used by gradients requested from attribute sets.
pub fn with_gradient_colors(start: Option<String>, end: Option<String>) -> CircleOption {
    CircleOption::WithGradientColors(start, end)
}

/// Requests a gradient for the foreground arc.
///
/// The gradient is built once the widget has a size.
pub fn with_gradient(kind: GradientKind, start: String, end: String) -> CircleOption {
    CircleOption::WithGradient(kind, start, end)
}

/// Sets the text height.
pub fn with_text_size(size: f32) -> CircleOption {
    CircleOption::WithTextSize(size)
}

/// Sets the text color.
pub fn with_text_color(color: String) -> CircleOption {
    CircleOption::WithTextColor(color)
}

/// Sets the angle the foreground arc starts at. `-90` is 12 o'clock.
pub fn with_start_angle(angle: f32) -> CircleOption {
    CircleOption::WithStartAngle(angle)
}

/// Sets the progress tween duration.
pub fn with_animation_duration(duration: Duration) -> CircleOption {
    CircleOption::WithAnimationDuration(duration)
}

/// Sets the foreground arc cap.
pub fn with_cap(cap: CapType) -> CircleOption {
    CircleOption::WithCap(cap)
}

/// Sets the characters of the foreground arc and the background ring.
pub fn with_stroke_characters(foreground: char, background: char) -> CircleOption {
    CircleOption::WithStrokeCharacters(foreground, background)
}

/// Installs a custom text formatter.
pub fn with_text_decorator<F>(decorator: F) -> CircleOption
where
    F: Fn(i32) -> String + Send + Sync + 'static,
{
    CircleOption::WithTextDecorator(Arc::new(decorator))
}

/// Removes the centered text.
pub fn without_text() -> CircleOption {
    CircleOption::WithoutText
}

/// Sets the padding around the ring.
pub fn with_padding(padding: Padding) -> CircleOption {
    CircleOption::WithPadding(padding)
}

/// Sets the initial size in columns and rows.
pub fn with_size(width: u16, height: u16) -> CircleOption {
    CircleOption::WithSize(width, height)
}

/// Message driving one frame of the progress animation.
#[derive(Debug, Clone)]
pub struct FrameMsg {
    id: i64,
    tag: i64,
}

/// Snapshot of a widget carried across its recreation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SavedState {
    /// Last requested progress.
    pub progress: i32,
}

#[derive(Debug, Clone, PartialEq)]
struct GradientRequest {
    kind: GradientKind,
    start_color: String,
    end_color: String,
}

/// An animated circular progress bar.
#[derive(Clone)]
pub struct Model {
    id: i64,
    tag: i64,

    current_progress: i32,
    final_progress: i32,
    animation: Animation,
    animation_duration: Duration,

    stroke_width: f32,
    background_color: String,
    foreground_color: String,
    start_color: String,
    end_color: String,
    text_size: f32,
    text_color: String,
    start_angle: f32,
    cap: CapType,
    foreground_glyph: char,
    background_glyph: char,

    width: u16,
    height: u16,
    padding: Padding,
    rect: Rect,

    gradient_request: Option<GradientRequest>,

    paint_background: Paint,
    paint_foreground: Paint,
    paint_text: Paint,

    /// Formats the centered text; `None` draws no text.
    pub text_progress_decorator: Option<TextDecorator>,
}

/// Creates a circular progress bar with the given options.
pub fn new(opts: &[CircleOption]) -> Model {
    let mut m = Model {
        id: next_id(),
        tag: 0,
        current_progress: 0,
        final_progress: 0,
        animation: Animation::Idle,
        animation_duration: DEFAULT_ANIMATION_DURATION,
        stroke_width: DEFAULT_STROKE_WIDTH,
        background_color: COLOR_PRIMARY_DARK.to_string(),
        foreground_color: COLOR_PRIMARY_DARK.to_string(),
        start_color: COLOR_PRIMARY_DARK.to_string(),
        end_color: COLOR_ACCENT.to_string(),
        text_size: DEFAULT_TEXT_SIZE,
        text_color: COLOR_PRIMARY_DARK.to_string(),
        start_angle: DEFAULT_START_ANGLE,
        cap: CapType::Round,
        foreground_glyph: '█',
        background_glyph: '░',
        width: DEFAULT_WIDTH,
        height: DEFAULT_HEIGHT,
        padding: Padding::default(),
        rect: Rect::default(),
        gradient_request: None,
        paint_background: Paint::default(),
        paint_foreground: Paint::default(),
        paint_text: Paint::default(),
        text_progress_decorator: Some(default_text_decorator()),
    };

    for opt in opts {
        opt.apply(&mut m);
    }

    m.init_paints();
    m.layout();
    m.rebuild_gradient();
    m
}

/// Creates a circular progress bar from an attribute set.
///
/// The attribute set's gradient kind is requested with the set's start and
/// end colors, exactly as [`Model::set_gradient`] would.
pub fn from_attributes(attrs: &Attributes) -> Result<Model, AttributeError> {
    let kind = attrs.gradient_kind()?;
    let mut m = new(&attrs.to_options()?);
    let (start, end) = (m.start_color.clone(), m.end_color.clone());
    m.set_gradient(kind, start, end);
    Ok(m)
}

impl Model {
    /// Last requested progress.
    pub fn progress(&self) -> i32 {
        self.final_progress
    }

    /// Progress currently displayed, moving towards [`Model::progress`] while animating.
    pub fn current_progress(&self) -> i32 {
        self.current_progress
    }

    /// Sweep of the foreground arc for the displayed progress, in degrees.
    pub fn sweep_angle(&self) -> f32 {
        calc_sweep_angle(self.current_progress)
    }

    /// Rectangle the rings are drawn in, empty until the widget has a size.
    pub fn bounds(&self) -> Rect {
        self.rect
    }

    /// Angle the foreground arc starts at.
    pub fn start_angle(&self) -> f32 {
        self.start_angle
    }

    /// Gradient currently applied to the foreground arc.
    pub fn gradient(&self) -> Option<&LinearGradient> {
        self.paint_foreground.shader.as_ref()
    }

    /// True while a progress tween is playing.
    pub fn is_animating(&self) -> bool {
        self.animation.is_running()
    }

    /// Animates towards `progress`, replacing any tween in flight.
    ///
    /// Values outside `0..=100` are clamped. The returned command delivers the
    /// first [`FrameMsg`]; frames from earlier tweens are ignored afterwards.
    pub fn set_progress(&mut self, progress: i32) -> Cmd {
        let target = progress.clamp(0, MAX_PROGRESS);
        if target != progress {
            warn!(requested = progress, clamped = target, "progress out of range");
        }

        self.final_progress = target;
        if self.animation.is_running() {
            debug!(
                from = self.current_progress,
                to = target,
                "restarting progress animation"
            );
        }
        self.animation = Animation::start(self.current_progress, target);
        self.tag += 1;
        self.next_frame()
    }

    /// Sets the thickness of both rings.
    pub fn set_progress_stroke_width(&mut self, width: f32) {
        self.stroke_width = width;
        self.init_paints();
        // The rings are inset by half the stroke
        self.layout();
        self.rebuild_gradient();
    }

    /// Sets the background ring color.
    pub fn set_progress_background_color(&mut self, color: impl Into<String>) {
        self.background_color = color.into();
        self.init_paints();
    }

    /// Sets the solid foreground arc color.
    pub fn set_progress_foreground_color(&mut self, color: impl Into<String>) {
        self.foreground_color = color.into();
        self.init_paints();
    }

    /// Sets the text height.
    pub fn set_progress_text_size(&mut self, size: f32) {
        self.text_size = size;
        self.init_paints();
    }

    /// Sets the text color.
    pub fn set_progress_text_color(&mut self, color: impl Into<String>) {
        self.text_color = color.into();
        self.init_paints();
    }

    /// Sets the duration of later progress tweens.
    pub fn set_progress_animation_duration(&mut self, duration: Duration) {
        self.animation_duration = duration;
    }

    /// Requests a gradient for the foreground arc.
    ///
    /// [`GradientKind::Linear`] runs from `start_color` to `end_color` down the
    /// ring's rectangle, rotated by the start angle. Other kinds clear the
    /// gradient. When the widget has no size yet the gradient is built on the
    /// next [`Model::set_size`].
    pub fn set_gradient(
        &mut self,
        kind: GradientKind,
        start_color: impl Into<String>,
        end_color: impl Into<String>,
    ) {
        self.gradient_request = Some(GradientRequest {
            kind,
            start_color: start_color.into(),
            end_color: end_color.into(),
        });
        self.rebuild_gradient();
    }

    /// Replaces the text formatter; `None` draws no text.
    pub fn set_text_progress_decorator(&mut self, decorator: Option<TextDecorator>) {
        self.text_progress_decorator = decorator;
    }

    /// Sets the padding and recomputes the ring rectangle.
    pub fn set_padding(&mut self, padding: Padding) {
        self.padding = padding;
        self.layout();
        self.rebuild_gradient();
    }

    /// Resizes the widget. Zero-sized dimensions are ignored.
    pub fn set_size(&mut self, width: u16, height: u16) {
        if width == 0 || height == 0 {
            trace!(width, height, "ignoring empty size");
            return;
        }
        self.width = width;
        self.height = height;
        self.layout();
        self.rebuild_gradient();
    }

    /// Widget size in columns and rows.
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Snapshot of the requested progress.
    pub fn save_state(&self) -> SavedState {
        SavedState {
            progress: self.final_progress,
        }
    }

    /// Restores a snapshot by animating to its progress.
    pub fn restore_state(&mut self, state: &SavedState) -> Cmd {
        self.set_progress(state.progress)
    }

    /// Processes animation frames. Other messages are ignored.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(frame_msg) = msg.downcast_ref::<FrameMsg>() {
            if frame_msg.id != self.id || frame_msg.tag != self.tag {
                return None;
            }

            let value = self
                .animation
                .advance(frame_interval(), self.animation_duration)?;
            self.current_progress = value;

            if self.animation.is_running() {
                return Some(self.next_frame());
            }
        }

        None
    }

    /// Draws the rings and the text onto `canvas`.
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        canvas.draw_arc(&self.rect, 0.0, MAX_SWEEP_ANGLE, &self.paint_background);
        canvas.draw_arc(
            &self.rect,
            self.start_angle,
            self.sweep_angle(),
            &self.paint_foreground,
        );

        if let Some(decorate) = &self.text_progress_decorator {
            let text = decorate(self.current_progress);
            let metrics = canvas.font_metrics(&self.paint_text);
            // Shift the baseline so the text is centered vertically
            let baseline = self.rect.center_y() - (metrics.descent + metrics.ascent) / 2.0;
            canvas.draw_text(&text, self.rect.center_x(), baseline, &self.paint_text);
        }
    }

    /// Renders the widget at its current size.
    pub fn view(&self) -> String {
        let mut canvas = CellCanvas::new(self.width as usize, self.height as usize);
        self.draw(&mut canvas);
        canvas.render()
    }

    fn next_frame(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;

        bubbletea_tick(frame_interval(), move |_| Box::new(FrameMsg { id, tag }) as Msg)
    }

    fn init_paints(&mut self) {
        self.paint_background.stroke_width = self.stroke_width;
        self.paint_background.color = self.background_color.clone();
        self.paint_background.glyph = self.background_glyph;

        self.paint_foreground.stroke_width = self.stroke_width;
        self.paint_foreground.color = self.foreground_color.clone();
        self.paint_foreground.glyph = self.foreground_glyph;
        self.paint_foreground.cap = self.cap;

        self.paint_text.text_size = self.text_size;
        self.paint_text.color = self.text_color.clone();
        self.paint_text.bold = true;
    }

    fn layout(&mut self) {
        if self.width == 0 || self.height == 0 {
            return;
        }

        let x_padding = self.padding.left.saturating_add(self.padding.right);
        let y_padding = self.padding.top.saturating_add(self.padding.bottom);
        let free_w = self.width.saturating_sub(x_padding) as f32;
        let free_h = self.height.saturating_sub(y_padding) as f32;
        let left = self.padding.left as f32;
        let top = self.padding.top as f32;
        let half_stroke = self.stroke_width / 2.0;

        self.rect =
            Rect::new(left, top, left + free_w, top + free_h).inset(half_stroke, half_stroke);
    }

    fn rebuild_gradient(&mut self) {
        let shader = match &self.gradient_request {
            Some(request) if request.kind == GradientKind::Linear => {
                if self.rect.is_empty() {
                    trace!("deferring gradient until the widget has a size");
                    None
                } else {
                    debug!(rect = ?self.rect, angle = self.start_angle, "building linear gradient");
                    Some(LinearGradient::new(
                        self.rect,
                        self.start_angle,
                        &request.start_color,
                        &request.end_color,
                    ))
                }
            }
            Some(request) if request.kind != GradientKind::None => {
                debug!(kind = %request.kind, "gradient kind not drawn, using solid color");
                None
            }
            _ => None,
        };
        self.paint_foreground.shader = shader;
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("id", &self.id)
            .field("current_progress", &self.current_progress)
            .field("final_progress", &self.final_progress)
            .field("animation", &self.animation)
            .field("size", &(self.width, self.height))
            .field("rect", &self.rect)
            .field("has_decorator", &self.text_progress_decorator.is_some())
            .finish_non_exhaustive()
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        let model = new(&[]);
        (model, None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}

impl Default for Model {
    fn default() -> Self {
        new(&[])
    }
}
