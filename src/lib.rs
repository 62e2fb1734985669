//! LCD Pong - a two-paddle ball game for a small bitmap display
//!
//! Core modules:
//! - `sim`: Shapes, layers, physics step and tick scheduler
//! - `renderer`: Dirty-region compositing renderer
//! - `platform`: Display/input/interrupt collaborators and host backends
//! - `audio`: Fire-and-forget tone requests
//! - `runtime`: Interrupt/foreground split
//! - `settings`: JSON-backed runtime configuration
//! - `logging`: `env_logger` setup

pub mod audio;
pub mod logging;
pub mod platform;
pub mod renderer;
pub mod runtime;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Display dimensions (portrait LCD)
    pub const SCREEN_WIDTH: i32 = 128;
    pub const SCREEN_HEIGHT: i32 = 160;

    /// Base timer firings per game tick
    pub const DEFAULT_TICK_DIVISOR: u16 = 15;
    /// Base timer rate of the watchdog interval interrupt
    pub const DEFAULT_BASE_RATE_HZ: u32 = 250;

    /// Paddle half extents (21 x 3 pixels)
    pub const PADDLE_HALF_WIDTH: i32 = 10;
    pub const PADDLE_HALF_HEIGHT: i32 = 1;
    /// Distance of each paddle's center from its screen edge
    pub const PADDLE_EDGE_OFFSET: i32 = 5;
    /// Paddle speed (pixels per game tick)
    pub const PADDLE_SPEED: i32 = 3;

    /// Net half extents
    pub const NET_HALF_WIDTH: i32 = 62;
    pub const NET_HALF_HEIGHT: i32 = 1;

    pub const BALL_RADIUS: i32 = 4;
    /// Ball velocity at startup (pixels per game tick)
    pub const BALL_VELOCITY: (i32, i32) = (2, 2);
    /// Offset of the ball spawn point from the screen center
    pub const SPAWN_OFFSET: (i32, i32) = (10, 5);

    /// Border band width of outlined rectangles
    pub const OUTLINE_WIDTH: i32 = 1;

    /// Score text row, relative to the screen center
    pub const SCORE_ROW_OFFSET: i32 = -10;
    /// Horizontal distance of each counter from the separator
    pub const SCORE_COLUMN_OFFSET: i32 = 12;
}

/// 16-bit RGB565 color, the LCD's native pixel format
#[repr(transparent)]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    bytemuck::Pod,
    bytemuck::Zeroable,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Color(pub u16);

impl Color {
    pub const BLACK: Color = Color(0x0000);
    pub const WHITE: Color = Color(0xffff);
    pub const RED: Color = Color(0xf800);
    pub const GREEN: Color = Color(0x07e0);
    pub const BLUE: Color = Color(0x001f);

    /// Pack 8-bit channels into RGB565
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color((((r as u16) >> 3) << 11) | (((g as u16) >> 2) << 5) | ((b as u16) >> 3))
    }

    /// Expand to 8-bit channels (low bits replicated from the high bits)
    pub fn to_rgb(self) -> (u8, u8, u8) {
        let r = ((self.0 >> 11) & 0x1f) as u8;
        let g = ((self.0 >> 5) & 0x3f) as u8;
        let b = (self.0 & 0x1f) as u8;
        ((r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2))
    }
}

/// Center of the display
#[inline]
pub fn screen_center() -> IVec2 {
    IVec2::new(consts::SCREEN_WIDTH / 2, consts::SCREEN_HEIGHT / 2)
}

/// Where the ball starts and where it returns after a goal
#[inline]
pub fn spawn_point() -> IVec2 {
    screen_center() + IVec2::new(consts::SPAWN_OFFSET.0, consts::SPAWN_OFFSET.1)
}
