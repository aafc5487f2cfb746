//! Responsive PDF page width and zoom handling.

use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 3.0;
pub const ZOOM_STEP: f32 = 0.25;

const MOBILE_BREAKPOINT: u32 = 640;
const DESKTOP_BREAKPOINT: u32 = 1024;
const MOBILE_GUTTER: u32 = 32;
const TABLET_RATIO: f32 = 0.85;
const DESKTOP_RATIO: f32 = 0.7;
const DESKTOP_MAX_WIDTH: f32 = 1000.0;
const MIN_PAGE_WIDTH: f32 = 200.0;
const BASE_FONT_SIZE_PX: f32 = 14.0;

/// Zoom factor shared by the PDF and text strategies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoomLevel(f32);

impl Default for ZoomLevel {
    fn default() -> Self {
        ZoomLevel(1.0)
    }
}

impl ZoomLevel {
    /// Clamp to the supported range; non-finite values fall back to 1.0.
    pub fn new(value: f32) -> Self {
        if !value.is_finite() {
            return Self::default();
        }
        ZoomLevel(value.clamp(MIN_ZOOM, MAX_ZOOM))
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    pub fn zoom_in(self) -> Self {
        Self::new(self.0 + ZOOM_STEP)
    }

    pub fn zoom_out(self) -> Self {
        Self::new(self.0 - ZOOM_STEP)
    }

    pub fn reset(self) -> Self {
        Self::default()
    }
}

/// Page width in pixels for the given viewport width.
pub fn pdf_page_width(viewport_width: u32, zoom: ZoomLevel) -> u32 {
    let base = if viewport_width < MOBILE_BREAKPOINT {
        viewport_width.saturating_sub(MOBILE_GUTTER) as f32
    } else if viewport_width < DESKTOP_BREAKPOINT {
        viewport_width as f32 * TABLET_RATIO
    } else {
        (viewport_width as f32 * DESKTOP_RATIO).min(DESKTOP_MAX_WIDTH)
    };

    (base * zoom.value()).max(MIN_PAGE_WIDTH).round() as u32
}

/// Font size in pixels for pre-formatted text at the given zoom.
pub fn text_font_size(zoom: ZoomLevel) -> f32 {
    BASE_FONT_SIZE_PX * zoom.value()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_clamps() {
        assert_eq!(ZoomLevel::new(10.0).value(), MAX_ZOOM);
        assert_eq!(ZoomLevel::new(0.1).value(), MIN_ZOOM);
        assert_eq!(ZoomLevel::new(f32::NAN).value(), 1.0);
        assert_eq!(ZoomLevel::new(MAX_ZOOM).zoom_in().value(), MAX_ZOOM);
        assert_eq!(ZoomLevel::default().zoom_out().value(), 0.75);
        assert_eq!(ZoomLevel::new(2.0).reset().value(), 1.0);
    }

    #[test]
    fn test_mobile_width() {
        assert_eq!(pdf_page_width(375, ZoomLevel::default()), 343);
    }

    #[test]
    fn test_tablet_width() {
        assert_eq!(pdf_page_width(800, ZoomLevel::default()), 680);
    }

    #[test]
    fn test_desktop_width_is_capped() {
        assert_eq!(pdf_page_width(1280, ZoomLevel::default()), 896);
        assert_eq!(pdf_page_width(2560, ZoomLevel::default()), 1000);
    }

    #[test]
    fn test_zoom_scales_width() {
        assert_eq!(pdf_page_width(2560, ZoomLevel::new(1.5)), 1500);
    }

    #[test]
    fn test_width_floor() {
        assert_eq!(pdf_page_width(0, ZoomLevel::default()), 200);
        assert_eq!(pdf_page_width(300, ZoomLevel::new(0.5)), 200);
    }

    #[test]
    fn test_text_font_size() {
        assert_eq!(text_font_size(ZoomLevel::default()), 14.0);
        assert_eq!(text_font_size(ZoomLevel::new(2.0)), 28.0);
    }
}
