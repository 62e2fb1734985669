//! Shape geometry for the compositing renderer
//!
//! Every shape answers two questions for a given center position:
//! which axis-aligned box it covers, and whether it covers a pixel.
//! Shapes never move themselves; the position is always passed in.

use glam::IVec2;

use crate::consts::{OUTLINE_WIDTH, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Axis-aligned box with inclusive corners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub top_left: IVec2,
    pub bottom_right: IVec2,
}

impl Region {
    pub fn new(top_left: IVec2, bottom_right: IVec2) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    /// The whole display
    pub fn screen() -> Self {
        Self::new(IVec2::ZERO, IVec2::new(SCREEN_WIDTH - 1, SCREEN_HEIGHT - 1))
    }

    /// Smallest region covering both
    pub fn union(&self, other: &Region) -> Region {
        Region::new(
            self.top_left.min(other.top_left),
            self.bottom_right.max(other.bottom_right),
        )
    }

    /// Intersection; may be empty (see `is_empty`)
    pub fn clip(&self, other: &Region) -> Region {
        Region::new(
            self.top_left.max(other.top_left),
            self.bottom_right.min(other.bottom_right),
        )
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.top_left.x > self.bottom_right.x || self.top_left.y > self.bottom_right.y
    }

    #[inline]
    pub fn contains(&self, p: IVec2) -> bool {
        p.x >= self.top_left.x
            && p.x <= self.bottom_right.x
            && p.y >= self.top_left.y
            && p.y <= self.bottom_right.y
    }

    /// Shrink every side by `amount`
    pub fn inset(&self, amount: i32) -> Region {
        Region::new(
            self.top_left + IVec2::splat(amount),
            self.bottom_right - IVec2::splat(amount),
        )
    }

    pub fn width(&self) -> i32 {
        (self.bottom_right.x - self.top_left.x + 1).max(0)
    }

    pub fn height(&self) -> i32 {
        (self.bottom_right.y - self.top_left.y + 1).max(0)
    }

    /// Pixels in row-major order (the order a display window is streamed)
    pub fn pixels(&self) -> impl Iterator<Item = IVec2> + '_ {
        (self.top_left.y..=self.bottom_right.y).flat_map(move |y| {
            (self.top_left.x..=self.bottom_right.x).map(move |x| IVec2::new(x, y))
        })
    }
}

/// Closed set of drawable shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Filled rectangle, symmetric around its position
    Rect { half: IVec2 },
    /// Rectangle border only. Drawn, never collided against.
    RectOutline { half: IVec2 },
    /// Filled circle
    Circle { radius: i32 },
}

impl Shape {
    pub fn rect(half_width: i32, half_height: i32) -> Self {
        Shape::Rect {
            half: IVec2::new(half_width, half_height),
        }
    }

    pub fn outline(half_width: i32, half_height: i32) -> Self {
        Shape::RectOutline {
            half: IVec2::new(half_width, half_height),
        }
    }

    pub fn circle(radius: i32) -> Self {
        Shape::Circle { radius }
    }

    /// Bounding box when centered at `pos`
    pub fn bounds_at(&self, pos: IVec2) -> Region {
        let half = match *self {
            Shape::Rect { half } | Shape::RectOutline { half } => half,
            Shape::Circle { radius } => IVec2::splat(radius),
        };
        Region::new(pos - half, pos + half)
    }

    /// Whether `pixel` is covered when centered at `pos`
    pub fn contains_at(&self, pos: IVec2, pixel: IVec2) -> bool {
        match *self {
            Shape::Rect { .. } => self.bounds_at(pos).contains(pixel),
            Shape::RectOutline { .. } => {
                let bounds = self.bounds_at(pos);
                bounds.contains(pixel) && !bounds.inset(OUTLINE_WIDTH).contains(pixel)
            }
            Shape::Circle { radius } => {
                let d = pixel - pos;
                d.x * d.x + d.y * d.y <= radius * radius
            }
        }
    }
}
