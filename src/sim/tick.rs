//! Fixed-rate tick handler
//!
//! Runs in interrupt context. The base timer fires far faster than the game
//! should move, so only every Nth firing samples the buttons, steps the
//! physics and asks the foreground for a redraw.

use super::physics::{Impact, StepOutcome, advance};
use super::state::{GameState, PaddleDrive, Player};
use crate::audio::{SoundEffect, ToneSink};
use crate::consts::DEFAULT_TICK_DIVISOR;

/// Switch bits in the button register (active-low)
pub mod buttons {
    pub const P1_FORWARD: u8 = 1 << 0;
    pub const P1_REVERSE: u8 = 1 << 1;
    pub const P2_FORWARD: u8 = 1 << 2;
    pub const P2_REVERSE: u8 = 1 << 3;
    /// Register value with no switch held
    pub const RELEASED: u8 = 0x0f;
}

/// Decode an active-low switch register into a single paddle drive
///
/// Lower bits win when several switches are held.
pub fn decode_buttons(raw: u8) -> PaddleDrive {
    let pressed = !raw;
    if pressed & buttons::P1_FORWARD != 0 {
        PaddleDrive::Forward(Player::One)
    } else if pressed & buttons::P1_REVERSE != 0 {
        PaddleDrive::Reverse(Player::One)
    } else if pressed & buttons::P2_FORWARD != 0 {
        PaddleDrive::Forward(Player::Two)
    } else if pressed & buttons::P2_REVERSE != 0 {
        PaddleDrive::Reverse(Player::Two)
    } else {
        PaddleDrive::Idle
    }
}

/// Divides the base timer down to the game tick
#[derive(Debug, Clone)]
pub struct TickScheduler {
    divisor: u16,
    count: u16,
    firings: u64,
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_DIVISOR)
    }
}

impl TickScheduler {
    /// `divisor` base firings per game tick (clamped to at least 1)
    pub fn new(divisor: u16) -> Self {
        Self {
            divisor: divisor.max(1),
            count: 0,
            firings: 0,
        }
    }

    pub fn divisor(&self) -> u16 {
        self.divisor
    }

    /// Base timer firings seen so far
    pub fn firings(&self) -> u64 {
        self.firings
    }

    /// Handle one base timer firing
    ///
    /// `buttons` is the raw switch register sampled at this firing. Returns
    /// the physics outcome when this firing ran a game tick.
    pub fn on_interrupt(
        &mut self,
        state: &mut GameState,
        buttons: u8,
        tones: &mut impl ToneSink,
    ) -> Option<StepOutcome> {
        self.firings += 1;
        self.count += 1;
        if self.count < self.divisor {
            return None;
        }
        self.count = 0;
        Some(game_tick(state, buttons, tones))
    }
}

/// One game tick: latch input, step physics, post tones, request redraw
pub fn game_tick(state: &mut GameState, buttons: u8, tones: &mut impl ToneSink) -> StepOutcome {
    state.drive = decode_buttons(buttons);
    let outcome = advance(state);

    match outcome.impact {
        Some(Impact::Paddle(_)) => tones.play(SoundEffect::PaddleHit),
        Some(Impact::Wall) => tones.play(SoundEffect::WallHit),
        None => {}
    }

    state.redraw = true;
    log::trace!(
        "Tick {}: drive {:?}, outcome {:?}",
        state.ticks,
        state.drive,
        outcome
    );
    outcome
}
