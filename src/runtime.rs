//! Interrupt/foreground split
//!
//! `Shared` is everything the timer interrupt writes. The interrupt side
//! calls `Shared::on_timer`; the foreground calls `foreground_pass` whenever
//! it wakes. Only the position commit runs inside the critical section.

use crate::Settings;
use crate::audio::{ToneQueue, ToneSink};
use crate::platform::{CriticalSection, Display};
use crate::renderer::Renderer;
use crate::sim::{GameState, StepOutcome, TickScheduler};

/// State owned by the tick context
#[derive(Debug, Clone)]
pub struct Shared {
    pub state: GameState,
    pub scheduler: TickScheduler,
    pub tones: ToneQueue,
    /// Set when the host wants both contexts to stop
    pub quit: bool,
}

impl Shared {
    pub fn new(settings: &Settings) -> Self {
        let mut tones = ToneQueue::default();
        tones.set_muted(!settings.sound);
        Self {
            state: GameState::new(settings.foreground),
            scheduler: TickScheduler::new(settings.tick_divisor),
            tones,
            quit: false,
        }
    }

    /// Interrupt handler body for one base timer firing
    pub fn on_timer(&mut self, buttons: u8) -> Option<StepOutcome> {
        self.scheduler
            .on_interrupt(&mut self.state, buttons, &mut self.tones)
    }

    /// Whether the foreground has work (or should stop)
    pub fn wake_pending(&self) -> bool {
        self.state.redraw || self.quit
    }
}

/// Paint the startup frame
pub fn initial_draw<G>(gate: &G, renderer: &mut Renderer, display: &mut impl Display)
where
    G: CriticalSection<Shared>,
{
    gate.with(|shared| renderer.draw_all(&shared.state.scene, display));
}

/// One foreground wake
///
/// Claims the redraw request and commits positions inside the critical
/// section, then repaints and redraws the score outside it. Returns false
/// when there was nothing to do.
pub fn foreground_pass<G>(gate: &G, renderer: &mut Renderer, display: &mut impl Display) -> bool
where
    G: CriticalSection<Shared>,
{
    if !gate.with(|shared| renderer.commit_pending(&mut shared.state)) {
        return false;
    }
    renderer.repaint(display);
    renderer.draw_score(display);
    true
}

/// Hand every queued tone to `sink`, playing them outside the critical section
pub fn play_pending_tones<G>(gate: &G, sink: &mut impl ToneSink) -> usize
where
    G: CriticalSection<Shared>,
{
    let effects: Vec<_> = gate.with(|shared| shared.tones.drain().collect());
    for &effect in &effects {
        sink.play(effect);
    }
    effects.len()
}
