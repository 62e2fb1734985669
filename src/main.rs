//! LCD Pong entry point
//!
//! Hosts the game on a desktop terminal. A timer thread plays the part of
//! the watchdog interrupt; the main thread is the foreground loop and sleeps
//! on a condition variable while no redraw is pending.
//!
//! Usage: `lcd-pong [settings.json]`

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};

use lcd_pong::Settings;
use lcd_pong::audio::Silence;
use lcd_pong::logging::{LoggingConfig, init_logging};
use lcd_pong::platform::terminal::{TerminalBell, TerminalButtons, TerminalDisplay, TerminalGuard};
use lcd_pong::platform::{ButtonSource, CriticalSection, Framebuffer, HeldButtons};
use lcd_pong::renderer::Renderer;
use lcd_pong::runtime::{Shared, foreground_pass, initial_draw, play_pending_tones};

/// Game ticks a key press keeps its switch held
const KEY_HOLD_TICKS: u32 = 2;

fn main() -> Result<()> {
    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = Settings::load_or_default(path.as_deref()).context("loading settings")?;

    init_logging(LoggingConfig {
        env_filter: settings.log_filter.clone(),
    });
    log::info!(
        "LCD Pong starting: {} Hz timer, game tick every {} firings ({:.1} Hz)",
        settings.base_rate_hz,
        settings.tick_divisor,
        settings.game_rate_hz()
    );

    match settings.headless_firings {
        Some(firings) => run_headless(&settings, firings),
        None => run_terminal(&settings),
    }
}

/// Run without a terminal: interrupt and foreground alternate on one thread
fn run_headless(settings: &Settings, firings: u32) -> Result<()> {
    let gate = RefCell::new(Shared::new(settings));
    let mut renderer = Renderer::new(settings.background, settings.foreground);
    let mut fb = Framebuffer::screen(settings.background);
    let mut buttons = HeldButtons::default();

    initial_draw(&gate, &mut renderer, &mut fb);
    for _ in 0..firings {
        let raw = buttons.read_buttons();
        gate.with(|shared| shared.on_timer(raw));
        foreground_pass(&gate, &mut renderer, &mut fb);
        play_pending_tones(&gate, &mut Silence);
    }

    let shared = gate.into_inner();
    log::info!(
        "Headless run done: {} game ticks, score {}-{}",
        shared.state.ticks,
        shared.state.score.p1,
        shared.state.score.p2
    );

    if let Some(path) = &settings.dump_path {
        std::fs::write(path, fb.as_bytes())
            .with_context(|| format!("writing framebuffer to {}", path.display()))?;
        log::info!("Framebuffer written to {}", path.display());
    }
    Ok(())
}

/// Interactive run on the terminal
fn run_terminal(settings: &Settings) -> Result<()> {
    let shared = Arc::new((Mutex::new(Shared::new(settings)), Condvar::new()));
    let guard = TerminalGuard::enter().context("entering terminal raw mode")?;

    let mut display = TerminalDisplay::new(settings.background);
    let mut renderer = Renderer::new(settings.background, settings.foreground);
    let mut bell = TerminalBell::default();

    initial_draw(&shared.0, &mut renderer, &mut display);
    display.present().context("drawing first frame")?;

    let timer = {
        let shared = Arc::clone(&shared);
        let period = settings.base_period();
        let hold = KEY_HOLD_TICKS * settings.tick_divisor as u32;
        thread::Builder::new()
            .name("timer".into())
            .spawn(move || timer_interrupt(&shared, period, hold))
            .context("spawning timer thread")?
    };

    let (gate, wake) = &*shared;
    let result = loop {
        let quit = {
            let locked = gate.lock().unwrap_or_else(PoisonError::into_inner);
            let locked = wake
                .wait_while(locked, |s| !s.wake_pending())
                .unwrap_or_else(PoisonError::into_inner);
            locked.quit
        };
        if quit {
            break Ok(());
        }

        foreground_pass(gate, &mut renderer, &mut display);
        if let Err(e) = display.present() {
            break Err(anyhow::Error::new(e).context("presenting frame"));
        }

        play_pending_tones(gate, &mut bell);
    };

    gate.with(|s| s.quit = true);
    if timer.join().is_err() {
        log::error!("Timer thread panicked");
    }

    let score = gate.with(|s| s.state.score);
    drop(guard);
    log::info!("Final score {}-{}", score.p1, score.p2);
    result
}

/// Base timer: one firing per `period`, never catching up on missed ones
fn timer_interrupt(shared: &(Mutex<Shared>, Condvar), period: std::time::Duration, hold: u32) {
    let (gate, wake) = shared;
    let mut buttons = TerminalButtons::new(hold);
    let mut next = Instant::now();

    loop {
        let raw = buttons.read_buttons();
        let quit_key = buttons.quit_requested();

        let (ticked, quit) = gate.with(|s| {
            if quit_key {
                s.quit = true;
            }
            (s.on_timer(raw).is_some(), s.quit)
        });
        if ticked || quit {
            wake.notify_one();
        }
        if quit {
            break;
        }

        next += period;
        let now = Instant::now();
        if next > now {
            thread::sleep(next - now);
        } else {
            // Overran the period: the missed firings are simply lost
            next = now;
        }
    }
}
