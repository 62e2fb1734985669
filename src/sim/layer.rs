//! Layers and moving layers
//!
//! A `Scene` owns every drawable in paint-priority order. Lower index wins
//! when two shapes cover the same pixel. The set is fixed at startup.

use glam::IVec2;

use super::shape::{Region, Shape};
use crate::Color;

/// Stable index of a layer inside its scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(pub usize);

/// A positioned, colored shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layer {
    pub shape: Shape,
    /// Confirmed position before the last render
    pub pos_last: IVec2,
    /// Confirmed position (what is on screen)
    pub pos: IVec2,
    /// Pending position written by the physics step
    pub pos_next: IVec2,
    pub color: Color,
}

impl Layer {
    /// A layer resting at `pos` with all three positions equal
    pub fn new(shape: Shape, pos: IVec2, color: Color) -> Self {
        Self {
            shape,
            pos_last: pos,
            pos,
            pos_next: pos,
            color,
        }
    }

    /// Bounds at the confirmed position
    #[inline]
    pub fn bounds(&self) -> Region {
        self.shape.bounds_at(self.pos)
    }

    /// Pixels that may have changed since the last commit
    pub fn dirty_region(&self) -> Region {
        self.shape
            .bounds_at(self.pos_last)
            .union(&self.shape.bounds_at(self.pos))
    }

    /// `pos_last := pos; pos := pos_next`
    #[inline]
    pub fn commit(&mut self) {
        self.pos_last = self.pos;
        self.pos = self.pos_next;
    }
}

/// A layer that moves every game tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovLayer {
    pub layer: LayerId,
    /// Per-tick displacement, applied to `pos_next` only
    pub velocity: IVec2,
}

/// All layers in paint order plus the moving subset
#[derive(Debug, Clone, Default)]
pub struct Scene {
    layers: Vec<Layer>,
    movers: Vec<MovLayer>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer at the lowest priority so far
    pub fn push_layer(&mut self, layer: Layer) -> LayerId {
        self.layers.push(layer);
        LayerId(self.layers.len() - 1)
    }

    /// Give an existing layer a velocity. Returns the mover's index.
    pub fn push_mover(&mut self, layer: LayerId, velocity: IVec2) -> usize {
        debug_assert!(layer.0 < self.layers.len());
        self.movers.push(MovLayer { layer, velocity });
        self.movers.len() - 1
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn movers(&self) -> &[MovLayer] {
        &self.movers
    }

    #[inline]
    pub fn layer(&self, id: LayerId) -> &Layer {
        &self.layers[id.0]
    }

    #[inline]
    pub fn layer_mut(&mut self, id: LayerId) -> &mut Layer {
        &mut self.layers[id.0]
    }

    #[inline]
    pub fn mover(&self, index: usize) -> &MovLayer {
        &self.movers[index]
    }

    #[inline]
    pub fn mover_mut(&mut self, index: usize) -> &mut MovLayer {
        &mut self.movers[index]
    }

    /// Layer and velocity of a mover, borrowed together
    pub fn mover_parts_mut(&mut self, index: usize) -> (&mut Layer, &mut IVec2) {
        let mover = &mut self.movers[index];
        (&mut self.layers[mover.layer.0], &mut mover.velocity)
    }

    /// Rotate the position triple of every moving layer
    pub fn commit_movers(&mut self) {
        for mover in &self.movers {
            self.layers[mover.layer.0].commit();
        }
    }

    /// Color of the first layer covering `pixel` at its confirmed position
    pub fn probe(&self, pixel: IVec2) -> Option<Color> {
        probe_layers(&self.layers, pixel)
    }
}

/// Front-to-back scan; first containing layer wins
pub fn probe_layers(layers: &[Layer], pixel: IVec2) -> Option<Color> {
    layers
        .iter()
        .find(|l| l.shape.contains_at(l.pos, pixel))
        .map(|l| l.color)
}
