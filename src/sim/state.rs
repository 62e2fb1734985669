//! Game state and startup layout
//!
//! Everything the tick context and the renderer share lives in one record,
//! created once and passed by reference. Nothing here is reallocated after
//! `GameState::new`.

use glam::IVec2;

use super::layer::{Layer, LayerId, Scene};
use super::shape::{Region, Shape};
use crate::consts::*;
use crate::{Color, screen_center, spawn_point};

/// One of the two players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    /// Paddle near the bottom edge
    One,
    /// Paddle near the top edge
    Two,
}

/// Per-player goal counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    pub p1: u32,
    pub p2: u32,
}

impl Score {
    pub fn get(&self, player: Player) -> u32 {
        match player {
            Player::One => self.p1,
            Player::Two => self.p2,
        }
    }

    /// Credit one goal
    pub fn award(&mut self, player: Player) {
        match player {
            Player::One => self.p1 = self.p1.saturating_add(1),
            Player::Two => self.p2 = self.p2.saturating_add(1),
        }
    }

    pub fn total(&self) -> u64 {
        self.p1 as u64 + self.p2 as u64
    }
}

/// Which paddle is being driven this tick. Exactly one or none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaddleDrive {
    #[default]
    Idle,
    /// Move along the paddle's current velocity
    Forward(Player),
    /// Move against the paddle's current velocity
    Reverse(Player),
}

/// Mover indices of the three moving actors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actors {
    pub ball: usize,
    pub paddle1: usize,
    pub paddle2: usize,
}

impl Actors {
    pub fn paddle(&self, player: Player) -> usize {
        match player {
            Player::One => self.paddle1,
            Player::Two => self.paddle2,
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub scene: Scene,
    pub actors: Actors,
    /// Playfield boundary, fixed after startup
    fence: Region,
    /// Ball reset point after a goal
    pub spawn: IVec2,
    pub score: Score,
    /// Paddle input latched by the tick context
    pub drive: PaddleDrive,
    /// Set by the tick context, cleared by the foreground before rendering
    pub redraw: bool,
    /// Game ticks executed so far
    pub ticks: u64,
    /// Field outline layer (source of the fence)
    pub field: LayerId,
}

impl GameState {
    /// Startup layout: ball, field outline, both paddles and the net, in
    /// that paint order, all in `color`.
    pub fn new(color: Color) -> Self {
        let center = screen_center();
        let mut scene = Scene::new();

        let ball = scene.push_layer(Layer::new(
            Shape::circle(BALL_RADIUS),
            spawn_point(),
            color,
        ));
        let field = scene.push_layer(Layer::new(
            Shape::outline(SCREEN_WIDTH / 2 - 1, SCREEN_HEIGHT / 2 - 1),
            center,
            color,
        ));
        let paddle1 = scene.push_layer(Layer::new(
            Shape::rect(PADDLE_HALF_WIDTH, PADDLE_HALF_HEIGHT),
            IVec2::new(center.x, SCREEN_HEIGHT - PADDLE_EDGE_OFFSET),
            color,
        ));
        let paddle2 = scene.push_layer(Layer::new(
            Shape::rect(PADDLE_HALF_WIDTH, PADDLE_HALF_HEIGHT),
            IVec2::new(center.x, PADDLE_EDGE_OFFSET),
            color,
        ));
        scene.push_layer(Layer::new(
            Shape::rect(NET_HALF_WIDTH, NET_HALF_HEIGHT),
            center,
            color,
        ));

        let actors = Actors {
            ball: scene.push_mover(ball, IVec2::new(BALL_VELOCITY.0, BALL_VELOCITY.1)),
            paddle1: scene.push_mover(paddle1, IVec2::new(PADDLE_SPEED, 0)),
            paddle2: scene.push_mover(paddle2, IVec2::new(PADDLE_SPEED, 0)),
        };

        let fence = scene.layer(field).bounds();

        Self {
            scene,
            actors,
            fence,
            spawn: spawn_point(),
            score: Score::default(),
            drive: PaddleDrive::Idle,
            redraw: true,
            ticks: 0,
            field,
        }
    }

    #[inline]
    pub fn fence(&self) -> Region {
        self.fence
    }

    /// Ball layer id
    pub fn ball_layer(&self) -> LayerId {
        self.scene.mover(self.actors.ball).layer
    }

    /// Paddle layer id
    pub fn paddle_layer(&self, player: Player) -> LayerId {
        self.scene.mover(self.actors.paddle(player)).layer
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Color::WHITE)
    }
}
