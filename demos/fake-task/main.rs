//! Fake long-running task demo.
//!
//! Press enter (or space) to start a task that reports randomized progress
//! from a worker thread. The ring animates towards every reported value.
//! Logs go to `fake-task.log`; set `RUST_LOG=debug` to see animation restarts.

use bubbletea_rs::{batch, quit, Cmd, KeyMsg, Model as BubbleTeaModel, Msg, Program};
use circle_progress::circle::{COLOR_ACCENT, COLOR_PRIMARY, COLOR_PRIMARY_DARK};
use circle_progress::prelude::*;
use crossterm::event::{KeyCode, KeyModifiers};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;
use std::fs::File;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const PADDING: usize = 2;
const MAX_RING_HEIGHT: u16 = 16;
const HELP_LINES: u16 = 4;

struct App {
    ring: CircleProgress,
    task: FakeTask,
}

impl App {
    fn resize_ring(&mut self, width: u16, height: u16) {
        // Cells are about twice as tall as wide
        let ring_height = height
            .saturating_sub(HELP_LINES)
            .min(MAX_RING_HEIGHT)
            .min(width.saturating_sub(PADDING as u16) / 2);
        self.ring.set_size(ring_height * 2, ring_height);
    }
}

impl BubbleTeaModel for App {
    fn init() -> (Self, Option<Cmd>) {
        let mut ring = circle_new(&[
            with_size(MAX_RING_HEIGHT * 2, MAX_RING_HEIGHT),
            with_stroke_width(2.0),
            with_text_decorator(|progress| format!("{progress}%")),
        ]);
        ring.set_progress_text_color(COLOR_PRIMARY_DARK);
        ring.set_gradient(GradientKind::Linear, COLOR_PRIMARY_DARK, COLOR_PRIMARY);
        ring.set_progress_background_color(COLOR_ACCENT);

        (
            Self {
                ring,
                task: FakeTask::new(),
            },
            None,
        )
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            return match key_msg.key {
                KeyCode::Char('q') | KeyCode::Esc => Some(quit()),
                KeyCode::Char('c') if key_msg.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(quit())
                }
                KeyCode::Enter | KeyCode::Char(' ') => self.task.start(),
                _ => None,
            };
        }

        if let Some(window_msg) = msg.downcast_ref::<bubbletea_rs::WindowSizeMsg>() {
            self.resize_ring(window_msg.width as u16, window_msg.height as u16);
            return None;
        }

        if let Some(posted) = msg.downcast_ref::<ProgressPostedMsg>() {
            let frame = self.ring.set_progress(posted.progress);
            return Some(batch(vec![frame, self.task.listen()]));
        }

        self.ring.update(msg)
    }

    fn view(&self) -> String {
        let pad = " ".repeat(PADDING);
        let ring = self
            .ring
            .view()
            .lines()
            .map(|line| format!("{pad}{line}"))
            .collect::<Vec<_>>()
            .join("\n");

        let status = if self.task.is_running() {
            "working..."
        } else if self.ring.progress() == 100 {
            "done, press enter to run again"
        } else {
            "press enter to start a long task"
        };
        let help = Style::new()
            .foreground(lipgloss::Color::from("#626262"))
            .render(&format!("{status} • q: quit"));

        format!("\n{ring}\n\n{pad}{help}\n")
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let log_file = File::create("fake-task.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .init();

    info!("starting fake task demo");
    let program = Program::<App>::builder().build()?;
    program.run().await?;
    Ok(())
}
