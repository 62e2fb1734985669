//! Impact tones
//!
//! The physics step never waits for the buzzer. It posts a request and
//! moves on; whoever owns the tone hardware drains the queue later.

use std::collections::VecDeque;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball hits a paddle
    PaddleHit,
    /// Ball hits the top or bottom wall
    WallHit,
}

impl SoundEffect {
    /// How long the tone sounds; a new tone cannot start before it ends
    pub fn duration_ms(self) -> u32 {
        match self {
            SoundEffect::PaddleHit => 20,
            SoundEffect::WallHit => 20,
        }
    }
}

/// Anything that accepts a "play now" request without blocking
pub trait ToneSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Discards every request
#[derive(Debug, Clone, Copy, Default)]
pub struct Silence;

impl ToneSink for Silence {
    fn play(&mut self, _effect: SoundEffect) {}
}

impl ToneSink for Vec<SoundEffect> {
    fn play(&mut self, effect: SoundEffect) {
        self.push(effect);
    }
}

/// Default number of outstanding requests
pub const TONE_QUEUE_CAPACITY: usize = 8;

/// Bounded fire-and-forget request queue
#[derive(Debug, Clone)]
pub struct ToneQueue {
    pending: VecDeque<SoundEffect>,
    capacity: usize,
    muted: bool,
    dropped: u64,
}

impl Default for ToneQueue {
    fn default() -> Self {
        Self::new(TONE_QUEUE_CAPACITY)
    }
}

impl ToneQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(capacity),
            capacity,
            muted: false,
            dropped: 0,
        }
    }

    /// Mute/unmute; muted requests are discarded on arrival
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            self.pending.clear();
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Requests lost to a full queue
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Oldest request first
    pub fn pop(&mut self) -> Option<SoundEffect> {
        self.pending.pop_front()
    }

    /// Take every outstanding request
    pub fn drain(&mut self) -> impl Iterator<Item = SoundEffect> + '_ {
        self.pending.drain(..)
    }
}

impl ToneSink for ToneQueue {
    fn play(&mut self, effect: SoundEffect) {
        if self.muted {
            return;
        }
        if self.pending.len() >= self.capacity {
            self.dropped += 1;
            log::debug!("Tone queue full, dropping {:?}", effect);
            return;
        }
        self.pending.push_back(effect);
    }
}
