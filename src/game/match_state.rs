use rand::{ rngs::StdRng, SeedableRng };
use serde::Serialize;
use tracing::debug;
use super::{
    action::{ eval_reset, eval_tick, MatchEvent },
    classifier::RoleModel,
    config::{ ConfigError, GameConfig, TeamConfig },
    field::Field,
    models::RoleModels,
    state::*,
};

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct BallSnapshot {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct PlayerSnapshot {
    pub team: Team,
    pub role: Role,
    pub x: f32,
    pub y: f32,
}

/// Plain copy of everything a renderer needs after a tick.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub tick: u64,
    pub paused: bool,
    pub speed: f32,
    pub score: TeamPair<u32>,
    pub ball: BallSnapshot,
    pub players: Vec<PlayerSnapshot>,
}

/// One team's settings together with its slice of the roster.
#[derive(Debug, Clone, Copy)]
pub struct TeamView<'a> {
    pub team: Team,
    pub info: &'a TeamConfig,
    pub players: &'a [PlayerState],
}

/// A running match: the only owner and writer of the simulation state.
#[derive(Debug)]
pub struct MatchState {
    conf: GameConfig,
    field: Field,
    models: RoleModels,
    state: GameState,
    rng: StdRng,
}

impl MatchState {
    pub fn new(conf: GameConfig, seed: Option<u64>) -> Result<Self, ConfigError> {
        conf.validate()?;
        let field = Field::new(&conf);
        let state = GameState::new(&conf, &field);
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self { conf, field, models: RoleModels::default(), state, rng })
    }

    pub fn with_models(mut self, models: RoleModels) -> Self {
        self.models = models;
        self
    }

    pub fn tick(&mut self) -> Vec<MatchEvent> {
        eval_tick(&mut self.state, &self.conf, &self.field, &self.models, &mut self.rng)
    }

    pub fn pause(&mut self) {
        self.state.paused = true;
    }

    pub fn resume(&mut self) {
        self.state.paused = false;
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.state.paused = !self.state.paused;
        self.state.paused
    }

    /// Callers must pass a positive, finite multiplier.
    pub fn set_speed_multiplier(&mut self, speed: f32) {
        debug_assert!(speed > 0.0 && speed.is_finite(), "invalid speed multiplier {speed}");
        self.state.speed = speed;
    }

    /// Zeroes the score and restarts from kick-off formation.
    pub fn reset(&mut self) -> MatchEvent {
        self.state.score = TeamPair::new(0, 0);
        eval_reset(&mut self.state, &self.conf, &self.field, &mut self.rng);
        debug!(tick = self.state.tick, "match reset");
        MatchEvent::PositionsReset
    }

    pub fn install_model(&mut self, role: Role, model: RoleModel) {
        debug!(%role, "model installed");
        self.models.insert(role, model);
    }

    pub fn models(&self) -> &RoleModels {
        &self.models
    }

    pub fn config(&self) -> &GameConfig {
        &self.conf
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn team(&self, team: Team) -> TeamView<'_> {
        TeamView {
            team,
            info: &self.conf.teams[team],
            players: self.state.team_players(team),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn score(&self) -> TeamPair<u32> {
        self.state.score
    }

    pub fn snapshot(&self) -> Snapshot {
        let s = &self.state;
        Snapshot {
            tick: s.tick,
            paused: s.paused,
            speed: s.speed,
            score: s.score,
            ball: BallSnapshot {
                x: s.ball.pos.x,
                y: s.ball.pos.y,
                vx: s.ball.vel.x,
                vy: s.ball.vel.y,
            },
            players: s
                .players
                .iter()
                .map(|p| PlayerSnapshot { team: p.team, role: p.role, x: p.pos.x, y: p.pos.y })
                .collect(),
        }
    }
}
