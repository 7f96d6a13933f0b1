//! Canvas configuration.
//!
//! Built once and handed to [`Canvas::initialize`](crate::Canvas::initialize).

use crate::error::{Error, Result};

/// How the canvas drives the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Continuously re-rendered session. Enters raw mode and hides the cursor.
    #[default]
    Interactive,
    /// A single render pass. The terminal stays in canonical, echoing mode.
    OneShot,
}

/// Geometry and behavior of a canvas.
///
/// `max_*` is the size of the virtual canvas; `min_*` is the smallest
/// terminal that will be drawn into. Below it an advisory is shown instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasConfig {
    pub min_width: u16,
    pub min_height: u16,
    pub max_width: u16,
    pub max_height: u16,
    pub mode: Mode,
    /// Draw a box-drawing frame around the canvas when it fits.
    pub show_border: bool,
    /// Capacity hint for the component registry.
    pub expected_components: u16,
}

impl CanvasConfig {
    /// Canvas of `max_width` × `max_height` with no minimum terminal size.
    pub fn new(max_width: u16, max_height: u16) -> Self {
        Self {
            max_width,
            max_height,
            ..Self::default()
        }
    }

    pub fn min_size(mut self, width: u16, height: u16) -> Self {
        self.min_width = width;
        self.min_height = height;
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn border(mut self, show: bool) -> Self {
        self.show_border = show;
        self
    }

    pub fn expected_components(mut self, count: u16) -> Self {
        self.expected_components = count;
        self
    }

    /// Reject configurations the renderer cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(Error::InvalidConfig(format!(
                "canvas must be non-empty, got {}x{}",
                self.max_width, self.max_height
            )));
        }
        Ok(())
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_width: 0,
            min_height: 0,
            max_width: 80,
            max_height: 24,
            mode: Mode::Interactive,
            show_border: false,
            expected_components: 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = CanvasConfig::new(20, 10)
            .min_size(10, 5)
            .mode(Mode::OneShot)
            .border(true)
            .expected_components(4);
        assert_eq!(config.max_width, 20);
        assert_eq!(config.max_height, 10);
        assert_eq!(config.min_width, 10);
        assert_eq!(config.min_height, 5);
        assert_eq!(config.mode, Mode::OneShot);
        assert!(config.show_border);
        assert_eq!(config.expected_components, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_canvas_rejected() {
        let err = CanvasConfig::new(0, 10).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(CanvasConfig::new(10, 0).validate().is_err());
    }
}
