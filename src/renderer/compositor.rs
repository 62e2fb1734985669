//! Position commit and repaint
//!
//! Rendering is split in two so the foreground can hold the critical
//! section for as little time as possible:
//! - `commit` rotates every mover's position triple and snapshots the
//!   layers. This is the only part that must exclude the tick context.
//! - `repaint` works purely from the snapshot.
//!
//! Colors depend only on the committed positions, so overlapping dirty
//! regions can be painted in any order with the same result.

use glam::IVec2;

use crate::Color;
use crate::consts::{SCORE_COLUMN_OFFSET, SCORE_ROW_OFFSET};
use crate::platform::Display;
use crate::screen_center;
use crate::sim::{GameState, Layer, Region, Scene, Score, probe_layers};

pub struct Renderer {
    background: Color,
    text_color: Color,
    /// Layers as of the last commit
    frame: Vec<Layer>,
    /// One region per mover, as of the last commit
    dirty: Vec<Region>,
    score: Score,
}

impl Renderer {
    pub fn new(background: Color, text_color: Color) -> Self {
        Self {
            background,
            text_color,
            frame: Vec::new(),
            dirty: Vec::new(),
            score: Score::default(),
        }
    }

    /// Regions the next `repaint` will cover
    pub fn dirty_regions(&self) -> &[Region] {
        &self.dirty
    }

    /// Rotate positions (`pos_last := pos; pos := pos_next`) and snapshot.
    ///
    /// Must run with the tick context locked out.
    pub fn commit(&mut self, scene: &mut Scene) {
        scene.commit_movers();
        self.snapshot(scene);
    }

    /// Claim a pending redraw: clear the flag, commit, copy the score.
    ///
    /// Returns false (and touches nothing) when no redraw was requested.
    /// Must run with the tick context locked out.
    pub fn commit_pending(&mut self, state: &mut GameState) -> bool {
        if !state.redraw {
            return false;
        }
        state.redraw = false;
        self.commit(&mut state.scene);
        self.score = state.score;
        true
    }

    fn snapshot(&mut self, scene: &Scene) {
        self.frame.clear();
        self.frame.extend_from_slice(scene.layers());
        self.dirty.clear();
        self.dirty.extend(
            scene
                .movers()
                .iter()
                .map(|m| scene.layer(m.layer).dirty_region()),
        );
    }

    /// Repaint every mover's dirty region from the last snapshot
    pub fn repaint(&self, display: &mut impl Display) {
        for region in &self.dirty {
            self.paint_region(region, display);
        }
    }

    /// Commit then repaint, for callers that cannot be preempted
    pub fn render(&mut self, scene: &mut Scene, display: &mut impl Display) {
        self.commit(scene);
        self.repaint(display);
    }

    /// Paint the whole screen from the current layer positions
    pub fn draw_all(&mut self, scene: &Scene, display: &mut impl Display) {
        self.snapshot(scene);
        let screen = display.bounds();
        self.paint_region(&screen, display);
    }

    /// Draw "p1 - p2" above the net, using the score from the last commit
    pub fn draw_score(&self, display: &mut impl Display) {
        let row = screen_center() + IVec2::new(0, SCORE_ROW_OFFSET);
        let (fg, bg) = (self.text_color, self.background);
        display.draw_text(
            row - IVec2::new(SCORE_COLUMN_OFFSET, 0),
            &self.score.p1.to_string(),
            fg,
            bg,
        );
        display.draw_text(row, "-", fg, bg);
        display.draw_text(
            row + IVec2::new(SCORE_COLUMN_OFFSET, 0),
            &self.score.p2.to_string(),
            fg,
            bg,
        );
    }

    /// Color of one pixel: first containing layer, else background
    pub fn color_at(&self, pixel: IVec2) -> Color {
        probe_layers(&self.frame, pixel).unwrap_or(self.background)
    }

    fn paint_region(&self, region: &Region, display: &mut impl Display) {
        let region = region.clip(&display.bounds());
        if region.is_empty() {
            return;
        }
        display.set_window(&region);
        for pixel in region.pixels() {
            display.write_pixel(self.color_at(pixel));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Framebuffer;
    use crate::sim::{Shape, Player};

    const BG: Color = Color::BLACK;

    fn fresh() -> (GameState, Renderer, Framebuffer) {
        let state = GameState::default();
        let mut renderer = Renderer::new(BG, Color::WHITE);
        let mut fb = Framebuffer::screen(Color::RED);
        renderer.draw_all(&state.scene, &mut fb);
        (state, renderer, fb)
    }

    #[test]
    fn test_draw_all_paints_every_pixel() {
        let (state, renderer, fb) = fresh();
        assert!(fb.pixels().iter().all(|&c| c != Color::RED));
        // Ball center, field border, screen corner outside the field
        let ball = state.scene.layer(state.ball_layer()).pos;
        assert_eq!(fb.pixel(ball.x, ball.y), Some(Color::WHITE));
        assert_eq!(fb.pixel(1, 40), Some(Color::WHITE));
        assert_eq!(fb.pixel(0, 0), Some(BG));
        assert_eq!(fb.pixel(30, 40), Some(BG));
        assert_eq!(renderer.color_at(IVec2::new(30, 40)), BG);
    }

    #[test]
    fn test_render_rotates_positions() {
        let (mut state, mut renderer, mut fb) = fresh();
        let id = state.ball_layer();
        let before = *state.scene.layer(id);
        state.scene.layer_mut(id).pos_next = before.pos + IVec2::new(2, 2);

        renderer.render(&mut state.scene, &mut fb);

        let after = state.scene.layer(id);
        assert_eq!(after.pos_last, before.pos);
        assert_eq!(after.pos, before.pos + IVec2::new(2, 2));
        assert_eq!(after.pos_next, after.pos);
    }

    #[test]
    fn test_repaint_moves_ball_pixels() {
        let (mut state, mut renderer, mut fb) = fresh();
        let id = state.ball_layer();
        let old = state.scene.layer(id).pos;
        let new = old + IVec2::new(10, 0);
        state.scene.layer_mut(id).pos_next = new;

        renderer.render(&mut state.scene, &mut fb);

        assert_eq!(fb.pixel(new.x, new.y), Some(Color::WHITE));
        // Leftmost pixel of the old disc is vacated
        assert_eq!(fb.pixel(old.x - 4, old.y), Some(BG));
    }

    #[test]
    fn test_repaint_leaves_outside_pixels_alone() {
        let (mut state, mut renderer, mut fb) = fresh();
        // Paint a marker the renderer must not touch
        fb.set_window(&Region::new(IVec2::new(20, 20), IVec2::new(20, 20)));
        fb.write_pixel(Color::GREEN);

        let id = state.ball_layer();
        let old = state.scene.layer(id).pos;
        state.scene.layer_mut(id).pos_next = old + IVec2::new(2, 2);
        renderer.render(&mut state.scene, &mut fb);

        assert_eq!(fb.pixel(20, 20), Some(Color::GREEN));
    }

    #[test]
    fn test_dirty_regions_cover_each_mover() {
        let (mut state, mut renderer, _fb) = fresh();
        renderer.commit(&mut state.scene);
        assert_eq!(renderer.dirty_regions().len(), 3);
        // Nothing moved: each region is the shape's bounds
        let p1 = state.scene.layer(state.paddle_layer(Player::One));
        assert_eq!(renderer.dirty_regions()[1], p1.bounds());
    }

    #[test]
    fn test_commit_pending_respects_flag() {
        let (mut state, mut renderer, _fb) = fresh();
        state.redraw = false;
        let id = state.ball_layer();
        state.scene.layer_mut(id).pos_next = IVec2::new(30, 30);

        assert!(!renderer.commit_pending(&mut state));
        assert_ne!(state.scene.layer(id).pos, IVec2::new(30, 30));

        state.redraw = true;
        assert!(renderer.commit_pending(&mut state));
        assert!(!state.redraw);
        assert_eq!(state.scene.layer(id).pos, IVec2::new(30, 30));
    }

    #[test]
    fn test_draw_score_positions() {
        let (mut state, mut renderer, mut fb) = fresh();
        state.score.p1 = 3;
        state.score.p2 = 12;
        renderer.commit_pending(&mut state);
        renderer.draw_score(&mut fb);

        assert_eq!(fb.text_at(IVec2::new(52, 70)).map(|t| t.text.as_str()), Some("3"));
        assert_eq!(fb.text_at(IVec2::new(64, 70)).map(|t| t.text.as_str()), Some("-"));
        assert_eq!(fb.text_at(IVec2::new(76, 70)).map(|t| t.text.as_str()), Some("12"));
    }

    #[test]
    fn test_off_screen_region_is_skipped() {
        let mut scene = Scene::new();
        let id = scene.push_layer(Layer::new(Shape::rect(1, 1), IVec2::new(-20, -20), Color::BLUE));
        scene.push_mover(id, IVec2::ZERO);
        let mut renderer = Renderer::new(BG, Color::WHITE);
        let mut fb = Framebuffer::screen(BG);

        renderer.render(&mut scene, &mut fb);

        assert_eq!(fb.writes(), 0);
    }
}
