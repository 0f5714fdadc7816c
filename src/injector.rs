// src/injector.rs - Boundary to whatever performs the OS-level input
use std::io::Write;

use anyhow::{Context, Result};
use tracing::info;

use crate::pipeline::Action;

/// Performs pointer actions. Implementations own the platform side; the pipeline only says
/// what to do and where.
pub trait InputInjector {
    fn move_to(&mut self, x: f64, y: f64) -> Result<()>;
    fn click(&mut self) -> Result<()>;
    fn double_click(&mut self) -> Result<()>;
    fn scroll(&mut self, amount: i32) -> Result<()>;
}

/// Sends `actions` to `injector` in order, stopping at the first failure.
pub fn dispatch(injector: &mut dyn InputInjector, actions: &[Action]) -> Result<()> {
    for action in actions {
        match *action {
            Action::MoveTo { x, y } => injector.move_to(x, y)?,
            Action::Click => injector.click()?,
            Action::DoubleClick => injector.double_click()?,
            Action::Scroll { amount } => injector.scroll(amount)?,
        }
    }
    Ok(())
}

/// Reports discrete actions through the log. Moves are too frequent to log individually and
/// are only tracked.
#[derive(Debug, Default)]
pub struct LogInjector {
    last_position: Option<(f64, f64)>,
}

impl LogInjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_position(&self) -> Option<(f64, f64)> {
        self.last_position
    }
}

impl InputInjector for LogInjector {
    fn move_to(&mut self, x: f64, y: f64) -> Result<()> {
        self.last_position = Some((x, y));
        Ok(())
    }

    fn click(&mut self) -> Result<()> {
        info!("Single Click! at {:?}", self.last_position);
        Ok(())
    }

    fn double_click(&mut self) -> Result<()> {
        info!("Double Click! at {:?}", self.last_position);
        Ok(())
    }

    fn scroll(&mut self, amount: i32) -> Result<()> {
        if amount >= 0 {
            info!("Scrolling Up ({})", amount);
        } else {
            info!("Scrolling Down ({})", amount);
        }
        Ok(())
    }
}

/// Writes one JSON object per action, for piping into an external injector process.
pub struct JsonLinesInjector<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesInjector<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, action: Action) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &action).context("Failed to serialize action")?;
        self.writer
            .write_all(b"\n")
            .and_then(|_| self.writer.flush())
            .context("Failed to write action")?;
        Ok(())
    }
}

impl<W: Write> InputInjector for JsonLinesInjector<W> {
    fn move_to(&mut self, x: f64, y: f64) -> Result<()> {
        self.emit(Action::MoveTo { x, y })
    }

    fn click(&mut self) -> Result<()> {
        self.emit(Action::Click)
    }

    fn double_click(&mut self) -> Result<()> {
        self.emit(Action::DoubleClick)
    }

    fn scroll(&mut self, amount: i32) -> Result<()> {
        self.emit(Action::Scroll { amount })
    }
}

/// Keeps every action it receives.
#[derive(Debug, Default)]
pub struct RecordingInjector {
    pub actions: Vec<Action>,
}

impl RecordingInjector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InputInjector for RecordingInjector {
    fn move_to(&mut self, x: f64, y: f64) -> Result<()> {
        self.actions.push(Action::MoveTo { x, y });
        Ok(())
    }

    fn click(&mut self) -> Result<()> {
        self.actions.push(Action::Click);
        Ok(())
    }

    fn double_click(&mut self) -> Result<()> {
        self.actions.push(Action::DoubleClick);
        Ok(())
    }

    fn scroll(&mut self, amount: i32) -> Result<()> {
        self.actions.push(Action::Scroll { amount });
        Ok(())
    }
}
