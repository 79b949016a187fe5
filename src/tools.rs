//! Drawing tools: the active tool kind and brush settings.
//!
//! DESIGN
//! ======
//! The active tool is an explicit [`ToolKind`] rather than something inferred
//! from the brush. The trigger adapter reads it to decide whether modify /
//! remove / pointer events belong to an erase gesture.

use serde::{Deserialize, Serialize};

pub const DEFAULT_COLOR: &str = "#000000";
pub const RED: &str = "#ff0000";
pub const THIN_WIDTH: f64 = 10.0;
pub const THICK_WIDTH: f64 = 20.0;
pub const ERASER_WIDTH: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Pen,
    Eraser,
}

/// Brush handed to the surface for the next stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    pub kind: ToolKind,
    pub color: String,
    pub width: f64,
}

impl Brush {
    #[must_use]
    pub fn pen(color: &str, width: f64) -> Self {
        Self { kind: ToolKind::Pen, color: color.to_owned(), width }
    }

    #[must_use]
    pub fn eraser() -> Self {
        Self { kind: ToolKind::Eraser, color: String::new(), width: ERASER_WIDTH }
    }
}

impl Default for Brush {
    fn default() -> Self {
        Self::pen(DEFAULT_COLOR, THIN_WIDTH)
    }
}

/// Remembers pen settings across eraser use.
#[derive(Debug, Clone)]
pub struct Toolbox {
    pen_color: String,
    pen_width: f64,
    active: ToolKind,
}

impl Toolbox {
    #[must_use]
    pub fn new() -> Self {
        Self { pen_color: DEFAULT_COLOR.to_owned(), pen_width: THIN_WIDTH, active: ToolKind::Pen }
    }

    #[must_use]
    pub fn active_kind(&self) -> ToolKind {
        self.active
    }

    /// Switch to the pen with `color`, keeping the current pen width.
    pub fn set_color(&mut self, color: &str) -> Brush {
        color.clone_into(&mut self.pen_color);
        self.select_pen()
    }

    /// Switch to the pen with `width`, keeping the current pen color.
    pub fn set_width(&mut self, width: f64) -> Brush {
        self.pen_width = width;
        self.select_pen()
    }

    pub fn select_pen(&mut self) -> Brush {
        self.active = ToolKind::Pen;
        self.brush()
    }

    pub fn select_eraser(&mut self) -> Brush {
        self.active = ToolKind::Eraser;
        self.brush()
    }

    /// Brush for the currently active tool.
    #[must_use]
    pub fn brush(&self) -> Brush {
        match self.active {
            ToolKind::Pen => Brush::pen(&self.pen_color, self.pen_width),
            ToolKind::Eraser => Brush::eraser(),
        }
    }
}

impl Default for Toolbox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tools_test.rs"]
mod tests;
