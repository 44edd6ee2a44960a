use rand::Rng;
use serde::Serialize;
use tracing::info;
use super::{
    ai::decide_target,
    ball::{ step_ball, GoalSide },
    config::*,
    field::Field,
    kinematics::step_player,
    models::RoleModels,
    state::*,
    util::Vec2,
};

/// Things that happened during a tick that observers may want to react to.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MatchEvent {
    Goal { team: Team, score: TeamPair<u32> },
    PositionsReset,
}

/// Puts the ball on the center spot with a small random velocity and the
/// players back in kick-off formation.
pub fn eval_reset(state: &mut GameState, conf: &GameConfig, field: &Field, rng: &mut impl Rng) {
    let k = conf.ball.kickoff_speed;
    let vel = if k > 0.0 {
        Vec2::new(rng.random_range(-k..k), rng.random_range(-k..k))
    } else {
        Vec2::ZERO
    };
    state.ball = BallState { pos: field.center, vel };
    state.players = formation(conf, field);
}

/// Advances the match by one tick. Does nothing while paused.
pub fn eval_tick(
    state: &mut GameState,
    conf: &GameConfig,
    field: &Field,
    models: &RoleModels,
    rng: &mut impl Rng,
) -> Vec<MatchEvent> {
    if state.paused {
        return Vec::new();
    }
    let speed = state.speed;

    let ball = state.ball.pos;
    for p in state.players.iter_mut() {
        p.target = decide_target(p, ball, &conf.teams[p.team], field, &conf.ai, models.get(p.role));
    }

    for p in state.players.iter_mut() {
        step_player(p, &conf.player, field, speed);
    }

    let mut events = Vec::new();
    if let Some(side) = step_ball(&mut state.ball, &state.players, &conf.ball, &conf.player, field, speed) {
        // a ball over the left line is a goal for whoever attacks it
        let team = match side {
            GoalSide::Left => conf.left_defender().other(),
            GoalSide::Right => conf.left_defender(),
        };
        state.score[team] += 1;
        info!(tick = state.tick, ?team, a = state.score.a, b = state.score.b, "goal");
        events.push(MatchEvent::Goal { team, score: state.score });

        eval_reset(state, conf, field, rng);
        events.push(MatchEvent::PositionsReset);
    }

    state.tick += 1;
    events
}
