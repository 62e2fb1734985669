//! Platform abstraction layer
//!
//! The game core talks to hardware only through these traits:
//! - `Display`: windowed pixel streaming and text
//! - `ButtonSource`: raw switch register
//! - `CriticalSection`: exclusive access to state shared with the tick context
//!
//! Host implementations: an in-memory `Framebuffer` and a crossterm
//! terminal backend.

pub mod framebuffer;
pub mod terminal;

pub use framebuffer::Framebuffer;

use std::cell::RefCell;
use std::sync::Mutex;

use glam::IVec2;

use crate::Color;
use crate::sim::Region;
use crate::sim::buttons::RELEASED;

/// Display controller
pub trait Display {
    /// Addressable area
    fn bounds(&self) -> Region {
        Region::screen()
    }

    /// Select the window that following `write_pixel` calls fill
    fn set_window(&mut self, region: &Region);

    /// Write the next pixel of the window, row-major
    fn write_pixel(&mut self, color: Color);

    /// Draw a string with its top-left corner at `pos`
    fn draw_text(&mut self, pos: IVec2, text: &str, fg: Color, bg: Color);
}

/// Raw switch register (bit clear = pressed)
pub trait ButtonSource {
    fn read_buttons(&mut self) -> u8;
}

/// A switch register frozen at one value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeldButtons(pub u8);

impl Default for HeldButtons {
    fn default() -> Self {
        HeldButtons(RELEASED)
    }
}

impl ButtonSource for HeldButtons {
    fn read_buttons(&mut self) -> u8 {
        self.0
    }
}

/// Runs `f` with the tick context locked out
pub trait CriticalSection<T> {
    fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R;
}

impl<T> CriticalSection<T> for Mutex<T> {
    fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        // A panicked tick leaves plain data behind; keep going with it
        let mut guard = self.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}

/// Single-context stand-in: nothing can preempt, so a borrow suffices
impl<T> CriticalSection<T> for RefCell<T> {
    fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.borrow_mut())
    }
}
