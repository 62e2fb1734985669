//! Collision detection and response for the ball and paddles
//!
//! All geometry is axis-aligned and integer. Paddles slide horizontally and
//! bounce off the side walls while driven. The ball reflects vertically off
//! paddles and the top/bottom of the fence; crossing the left or right side
//! of the fence is a goal.
//!
//! Overshoot is corrected by adding twice the reflected velocity, not by
//! clamping. A velocity larger than the penetration depth can leave a shape
//! outside the fence for a tick.

use glam::IVec2;

use super::shape::Region;
use super::state::{GameState, PaddleDrive, Player};

/// What the ball bounced off this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impact {
    Paddle(Player),
    Wall,
}

/// Result of one physics step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepOutcome {
    /// Vertical reflection of the ball
    pub impact: Option<Impact>,
    /// Player credited with a goal
    pub goal: Option<Player>,
    /// A driven paddle bounced off a side wall
    pub paddle_bounced: bool,
}

/// Negate one velocity axis and push the position back by twice the new value
#[inline]
fn reflect_axis(velocity: &mut IVec2, pos: &mut IVec2, axis: usize) {
    velocity[axis] = -velocity[axis];
    pos[axis] += 2 * velocity[axis];
}

#[inline]
fn exceeds_horizontally(bounds: &Region, fence: &Region) -> bool {
    bounds.top_left.x < fence.top_left.x || bounds.bottom_right.x > fence.bottom_right.x
}

#[inline]
fn within_span(x: i32, span: &Region) -> bool {
    x >= span.top_left.x && x <= span.bottom_right.x
}

/// Slide one paddle's pending position by its velocity (or against it when
/// `reverse`), bouncing off the fence's side walls.
///
/// Returns true when the paddle's velocity was flipped.
pub fn drive_paddle(state: &mut GameState, player: Player, reverse: bool) -> bool {
    let fence = state.fence();
    let mover = state.actors.paddle(player);
    let (layer, velocity) = state.scene.mover_parts_mut(mover);

    let dir = if reverse { -1 } else { 1 };

    let mut new_pos = layer.pos_next;
    new_pos.x += dir * velocity.x;

    let bounds = layer.shape.bounds_at(new_pos);
    let bounced = exceeds_horizontally(&bounds, &fence);
    if bounced {
        velocity.x = -velocity.x;
        new_pos.x += 2 * dir * velocity.x;
    }

    layer.pos_next = new_pos;
    bounced
}

/// Advance paddles and ball by one game tick
///
/// Paddle drive is taken from `state.drive`. The ball is tested against the
/// paddles' confirmed (on-screen) positions.
pub fn advance(state: &mut GameState) -> StepOutcome {
    let mut outcome = StepOutcome::default();

    outcome.paddle_bounced = match state.drive {
        PaddleDrive::Idle => false,
        PaddleDrive::Forward(player) => drive_paddle(state, player, false),
        PaddleDrive::Reverse(player) => drive_paddle(state, player, true),
    };

    let fence = state.fence();
    let spawn = state.spawn;
    let p1 = state.scene.layer(state.paddle_layer(Player::One)).bounds();
    let p2 = state.scene.layer(state.paddle_layer(Player::Two)).bounds();

    let (ball, velocity) = state.scene.mover_parts_mut(state.actors.ball);
    let mut new_pos = ball.pos_next + *velocity;
    let bounds = ball.shape.bounds_at(new_pos);
    let center_x = (bounds.top_left.x + bounds.bottom_right.x) / 2;

    // Vertical axis: paddles, then top/bottom walls
    if within_span(center_x, &p1) && bounds.bottom_right.y > p1.top_left.y {
        reflect_axis(velocity, &mut new_pos, 1);
        outcome.impact = Some(Impact::Paddle(Player::One));
    } else if within_span(center_x, &p2) && bounds.top_left.y < p2.bottom_right.y {
        reflect_axis(velocity, &mut new_pos, 1);
        outcome.impact = Some(Impact::Paddle(Player::Two));
    } else if bounds.top_left.y < fence.top_left.y
        || bounds.bottom_right.y > fence.bottom_right.y
        || (within_span(center_x, &p2) && bounds.bottom_right.y > p1.top_left.y)
    {
        reflect_axis(velocity, &mut new_pos, 1);
        outcome.impact = Some(Impact::Wall);
    }

    // Horizontal axis: goals, never reflected
    if bounds.top_left.x < fence.top_left.x {
        outcome.goal = Some(Player::One);
    } else if bounds.bottom_right.x > fence.bottom_right.x {
        outcome.goal = Some(Player::Two);
    }
    if outcome.goal.is_some() {
        new_pos = spawn;
    }

    ball.pos_next = new_pos;

    if let Some(player) = outcome.goal {
        state.score.award(player);
        log::info!(
            "Goal for {:?}: score {}-{}",
            player,
            state.score.p1,
            state.score.p2
        );
    }
    if let Some(impact) = outcome.impact {
        log::debug!("Ball impact: {:?}", impact);
    }
    state.ticks += 1;

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::LayerId;

    fn ball_id(state: &GameState) -> LayerId {
        state.ball_layer()
    }

    /// Place a layer at rest (all three positions equal)
    fn park(state: &mut GameState, id: LayerId, pos: IVec2) {
        let layer = state.scene.layer_mut(id);
        layer.pos_last = pos;
        layer.pos = pos;
        layer.pos_next = pos;
    }

    fn set_ball_velocity(state: &mut GameState, v: IVec2) {
        let ball = state.actors.ball;
        state.scene.mover_mut(ball).velocity = v;
    }

    fn ball_velocity(state: &GameState) -> IVec2 {
        state.scene.mover(state.actors.ball).velocity
    }

    /// Move both paddles out of the ball's way
    fn paddles_aside(state: &mut GameState) {
        let p1 = state.paddle_layer(Player::One);
        let p2 = state.paddle_layer(Player::Two);
        park(state, p1, IVec2::new(12, 155));
        park(state, p2, IVec2::new(12, 5));
    }

    #[test]
    fn test_straight_line_without_collision() {
        let mut state = GameState::default();
        paddles_aside(&mut state);
        let spawn = state.spawn;

        let outcome = advance(&mut state);

        assert_eq!(outcome, StepOutcome::default());
        let ball = state.scene.layer(ball_id(&state));
        assert_eq!(ball.pos_next, spawn + IVec2::new(2, 2));
        // Confirmed position is untouched until the renderer commits
        assert_eq!(ball.pos, spawn);
    }

    #[test]
    fn test_goal_left_credits_player_one() {
        let mut state = GameState::default();
        paddles_aside(&mut state);
        let id = ball_id(&state);
        park(&mut state, id, IVec2::new(6, 80));
        set_ball_velocity(&mut state, IVec2::new(-2, 1));

        let outcome = advance(&mut state);

        assert_eq!(outcome.goal, Some(Player::One));
        assert_eq!(outcome.impact, None);
        assert_eq!(state.score.p1, 1);
        assert_eq!(state.score.p2, 0);
        assert_eq!(state.scene.layer(id).pos_next, state.spawn);
        assert_eq!(ball_velocity(&state), IVec2::new(-2, 1));
    }

    #[test]
    fn test_goal_right_credits_player_two() {
        let mut state = GameState::default();
        paddles_aside(&mut state);
        let id = ball_id(&state);
        park(&mut state, id, IVec2::new(122, 60));
        set_ball_velocity(&mut state, IVec2::new(2, 2));

        let outcome = advance(&mut state);

        assert_eq!(outcome.goal, Some(Player::Two));
        assert_eq!(state.score.p2, 1);
        assert_eq!(state.scene.layer(id).pos_next, state.spawn);
        assert_eq!(ball_velocity(&state), IVec2::new(2, 2));
    }

    #[test]
    fn test_paddle_one_reflects_ball() {
        let mut state = GameState::default();
        let id = ball_id(&state);
        // Paddle 1 top edge is y=154; ball bottom reaches 155 next tick
        park(&mut state, id, IVec2::new(64, 149));
        set_ball_velocity(&mut state, IVec2::new(2, 2));

        let outcome = advance(&mut state);

        assert_eq!(outcome.impact, Some(Impact::Paddle(Player::One)));
        assert_eq!(ball_velocity(&state), IVec2::new(2, -2));
        // 149 + 2, then corrected by 2 * -2
        assert_eq!(state.scene.layer(id).pos_next, IVec2::new(66, 147));
        assert_eq!(state.score.total(), 0);
    }

    #[test]
    fn test_paddle_two_reflects_ball() {
        let mut state = GameState::default();
        let id = ball_id(&state);
        // Paddle 2 bottom edge is y=6; ball top reaches 5 next tick
        park(&mut state, id, IVec2::new(60, 11));
        set_ball_velocity(&mut state, IVec2::new(1, -2));

        let outcome = advance(&mut state);

        assert_eq!(outcome.impact, Some(Impact::Paddle(Player::Two)));
        assert_eq!(ball_velocity(&state), IVec2::new(1, 2));
        assert_eq!(state.scene.layer(id).pos_next, IVec2::new(61, 13));
    }

    #[test]
    fn test_wall_reflects_when_paddle_misaligned() {
        let mut state = GameState::default();
        paddles_aside(&mut state);
        let id = ball_id(&state);
        park(&mut state, id, IVec2::new(100, 154));
        set_ball_velocity(&mut state, IVec2::new(2, 2));

        let outcome = advance(&mut state);

        assert_eq!(outcome.impact, Some(Impact::Wall));
        assert_eq!(ball_velocity(&state), IVec2::new(2, -2));
        let ball = state.scene.layer(id);
        assert_eq!(ball.pos_next, IVec2::new(102, 152));
        assert!(ball.shape.bounds_at(ball.pos_next).bottom_right.y <= state.fence().bottom_right.y);
    }

    #[test]
    fn test_paddles_use_confirmed_position() {
        let mut state = GameState::default();
        let id = ball_id(&state);
        park(&mut state, id, IVec2::new(30, 149));
        set_ball_velocity(&mut state, IVec2::new(0, 2));
        // Paddle 1 pending position is under the ball, confirmed is not
        let p1 = state.paddle_layer(Player::One);
        park(&mut state, p1, IVec2::new(100, 155));
        state.scene.layer_mut(p1).pos_next = IVec2::new(30, 155);

        let outcome = advance(&mut state);

        assert_eq!(outcome.impact, None);
        assert_eq!(state.scene.layer(id).pos_next, IVec2::new(30, 151));
    }

    #[test]
    fn test_forward_drive_bounces_off_right_wall() {
        let mut state = GameState::default();
        let p1 = state.paddle_layer(Player::One);
        // Right edge at 126; +3 would reach 129 > 127
        park(&mut state, p1, IVec2::new(116, 155));
        state.drive = PaddleDrive::Forward(Player::One);

        let outcome = advance(&mut state);

        assert!(outcome.paddle_bounced);
        let v = state.scene.mover(state.actors.paddle1).velocity;
        assert_eq!(v, IVec2::new(-3, 0));
        // 116 + 3, then corrected by 2 * -3
        let layer = state.scene.layer(p1);
        assert_eq!(layer.pos_next, IVec2::new(113, 155));
        let bounds = layer.shape.bounds_at(layer.pos_next);
        assert!(bounds.bottom_right.x <= state.fence().bottom_right.x);
    }

    #[test]
    fn test_reverse_drive_keeps_velocity() {
        let mut state = GameState::default();
        state.drive = PaddleDrive::Reverse(Player::Two);

        let outcome = advance(&mut state);
        advance(&mut state);

        assert!(!outcome.paddle_bounced);
        let v = state.scene.mover(state.actors.paddle2).velocity;
        assert_eq!(v, IVec2::new(3, 0));
        let layer = state.scene.layer(state.paddle_layer(Player::Two));
        assert_eq!(layer.pos_next, IVec2::new(58, 5));
    }

    #[test]
    fn test_reverse_drive_bounces_off_left_wall() {
        let mut state = GameState::default();
        let p2 = state.paddle_layer(Player::Two);
        // Left edge at 2; -3 would reach -1 < 1
        park(&mut state, p2, IVec2::new(12, 5));
        state.drive = PaddleDrive::Reverse(Player::Two);

        let outcome = advance(&mut state);

        assert!(outcome.paddle_bounced);
        let v = state.scene.mover(state.actors.paddle2).velocity;
        assert_eq!(v, IVec2::new(-3, 0));
        assert_eq!(state.scene.layer(p2).pos_next, IVec2::new(15, 5));
    }

    #[test]
    fn test_idle_drive_leaves_paddles() {
        let mut state = GameState::default();
        let before: Vec<_> = [Player::One, Player::Two]
            .iter()
            .map(|&p| state.scene.layer(state.paddle_layer(p)).pos_next)
            .collect();

        advance(&mut state);

        for (i, &p) in [Player::One, Player::Two].iter().enumerate() {
            assert_eq!(state.scene.layer(state.paddle_layer(p)).pos_next, before[i]);
        }
    }
}
