//! Game simulation module
//!
//! Everything the tick context touches lives here:
//! - Integer geometry only
//! - Fixed set of layers, created once
//! - No rendering or platform dependencies

pub mod layer;
pub mod physics;
pub mod shape;
pub mod state;
pub mod tick;

pub use layer::{Layer, LayerId, MovLayer, Scene, probe_layers};
pub use physics::{Impact, StepOutcome, advance, drive_paddle};
pub use shape::{Region, Shape};
pub use state::{Actors, GameState, PaddleDrive, Player, Score};
pub use tick::{TickScheduler, buttons, decode_buttons, game_tick};
