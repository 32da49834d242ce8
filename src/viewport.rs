//! Resolution-independent scaling
//!
//! The playfield is 800 logical units wide at a fixed 4:3 aspect. The canvas
//! is fitted into whatever space the page offers and every logical distance
//! is multiplied by `scale` to get drawn pixels.

use glam::Vec2;

use crate::consts::*;

/// Drawn canvas size and the logical-to-pixel scale factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::fit(LOGICAL_WIDTH, LOGICAL_WIDTH / ASPECT_RATIO)
    }
}

impl Viewport {
    /// Fit a 4:3 canvas into the available area, limited by whichever side is tighter
    pub fn fit(available_width: f32, available_height: f32) -> Self {
        let available_width = available_width.max(1.0);
        let available_height = available_height.max(1.0);

        let (width, height) = if available_width / available_height > ASPECT_RATIO {
            (available_height * ASPECT_RATIO, available_height)
        } else {
            (available_width, available_width / ASPECT_RATIO)
        };

        Self {
            width,
            height,
            scale: width / LOGICAL_WIDTH,
        }
    }

    /// Convert a logical length to drawn pixels
    #[inline]
    pub fn px(&self, logical: f32) -> f32 {
        logical * self.scale
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }

    /// Top edge of the player base
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.height - self.px(BASE_HEIGHT)
    }

    /// Troopers falling past this line have landed
    #[inline]
    pub fn landing_y(&self) -> f32 {
        self.ground_y() - self.px(LANDING_OFFSET)
    }

    /// True if the point lies inside the drawn area (edges inclusive)
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= 0.0 && pos.x <= self.width && pos.y >= 0.0 && pos.y <= self.height
    }
}
