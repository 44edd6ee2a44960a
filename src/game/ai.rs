//! Per-role target selection.
//!
//! Targets are worked out in the frame of a team attacking towards +x with
//! its own goal on the left, then mirrored back for the team attacking -x.
//! Model features are always taken in field coordinates.

use super::{
    classifier::RoleModel,
    config::{ AiConfig, TeamConfig },
    field::Field,
    state::{ Mirror, PlayerState, Role },
    util::Vec2,
};

/// What one role needs to know to pick a target, in the attacking-right frame.
struct View<'a> {
    player: Vec2,
    ball: Vec2,
    field: &'a Field,
    ai: &'a AiConfig,
    /// `Some` when a model is loaded for the role, holding its verdict
    verdict: Option<bool>,
}

type RoleRule = fn(&View) -> Vec2;

fn goalkeeper(v: &View) -> Vec2 {
    if v.verdict == Some(true) {
        return v.ball;
    }
    let (top, bottom) = v.field.goal_mouth;
    Vec2::new(
        v.field.left() + v.ai.keeper_line_offset,
        v.ball.y.clamp(top, bottom),
    )
}

fn defender(v: &View) -> Vec2 {
    let engage = v.verdict.unwrap_or(v.ball.x < v.field.center.x);
    if engage {
        Vec2::new(v.ball.x - v.ai.defender_offset, v.ball.y)
    } else {
        v.player
    }
}

fn midfielder(v: &View) -> Vec2 {
    match v.verdict {
        Some(true) => Vec2::new(v.ball.x - v.ai.midfield_press, v.ball.y),
        Some(false) => Vec2::new(v.player.x, v.field.center.y),
        None if v.ball.x >= v.field.center.x => Vec2::new(v.ball.x - v.ai.midfield_support, v.ball.y),
        None => Vec2::new(v.ball.x - v.ai.midfield_cover, v.ball.y),
    }
}

fn forward(v: &View) -> Vec2 {
    let chase = v
        .verdict
        .unwrap_or((v.field.right() - v.ball.x).abs() < v.ai.forward_trigger);
    if chase {
        Vec2::new(v.ball.x + v.ai.forward_lead, v.ball.y)
    } else {
        Vec2::new(v.field.right() - v.ai.forward_staging, v.field.center.y)
    }
}

const RULES: [RoleRule; Role::COUNT] = [goalkeeper, defender, midfielder, forward];

/// Chooses where `player` should head this tick.
pub fn decide_target(
    player: &PlayerState,
    ball: Vec2,
    team: &TeamConfig,
    field: &Field,
    ai: &AiConfig,
    model: Option<&RoleModel>,
) -> Vec2 {
    let features = [ball.x - player.pos.x, ball.y - player.pos.y];
    let verdict = model.map(|m| m.predicts(features, ai.decision_threshold));

    let flip = team.direction < 0;
    let (mut player_pos, mut ball_pos) = (player.pos, ball);
    if flip {
        player_pos.mirror(field);
        ball_pos.mirror(field);
    }

    let view = View { player: player_pos, ball: ball_pos, field, ai, verdict };
    let mut target = RULES[player.role as usize](&view);
    if flip {
        target.mirror(field);
    }
    target
}
