use serde::{ Serialize, Deserialize };
use std::path::Path;
use thiserror::Error;
use super::state::{ Team, TeamPair };

pub const NUM_PLAYERS: u32 = 5;
pub const NUM_FEATURES: usize = 2;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unable to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("unable to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be positive and finite (got {value})")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must be finite and not negative (got {value})")]
    Negative { field: &'static str, value: f32 },
    #[error("{field} must be finite (got {value})")]
    NotFinite { field: &'static str, value: f32 },
    #[error("{field} must lie in [{min}, {max}] (got {value})")]
    OutOfRange { field: &'static str, value: f32, min: f32, max: f32 },
    #[error("team directions must be +1 and -1 (got a: {a}, b: {b})")]
    Directions { a: i8, b: i8 },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BallConfig {
    pub radius: f32,
    pub friction: f32,
    pub max_speed: f32,
    pub wall_damping: f32,
    /// speed added on top of the touching player's speed
    pub kick_boost: f32,
    /// per-axis bound of the random kick-off velocity
    pub kickoff_speed: f32,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius: 7.0,
            friction: 0.98,
            max_speed: 4.0,
            wall_damping: 0.8,
            kick_boost: 2.0,
            kickoff_speed: 1.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    pub radius: f32,
    pub max_speed: f32,
    pub arrive_radius: f32,
    pub braking: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            radius: 10.0,
            max_speed: 2.5,
            arrive_radius: 5.0,
            braking: 0.8,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FieldConfig {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            x: 50.0,
            y: 50.0,
            width: 700.0,
            height: 400.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GoalConfig {
    pub width: f32,
    pub height: f32,
    pub penalty_box_width: f32,
    pub penalty_box_height: f32,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            width: 10.0,
            height: 100.0,
            penalty_box_width: 60.0,
            penalty_box_height: 200.0,
        }
    }
}

/// Tunables for the scripted role behaviour. Offsets are measured along
/// the team's attacking direction.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AiConfig {
    pub decision_threshold: f32,
    pub keeper_line_offset: f32,
    pub defender_offset: f32,
    pub midfield_support: f32,
    pub midfield_cover: f32,
    pub midfield_press: f32,
    pub forward_trigger: f32,
    pub forward_lead: f32,
    pub forward_staging: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            decision_threshold: 0.5,
            keeper_line_offset: 20.0,
            defender_offset: 20.0,
            midfield_support: 30.0,
            midfield_cover: 60.0,
            midfield_press: 15.0,
            forward_trigger: 100.0,
            forward_lead: 10.0,
            forward_staging: 100.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TeamConfig {
    pub name: String,
    pub color: String,
    /// +1 attacks towards +x, -1 towards -x
    pub direction: i8,
}

impl TeamConfig {
    #[inline(always)]
    pub fn dir(&self) -> f32 {
        f32::from(self.direction)
    }
}

impl Default for TeamPair<TeamConfig> {
    fn default() -> Self {
        TeamPair::new(
            TeamConfig {
                name: "Red Team".into(),
                color: "#e53e3e".into(),
                direction: 1,
            },
            TeamConfig {
                name: "Blue Team".into(),
                color: "#3182ce".into(),
                direction: -1,
            },
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct GameConfig {
    pub ball: BallConfig,
    pub player: PlayerConfig,
    pub field: FieldConfig,
    pub goal: GoalConfig,
    pub ai: AiConfig,
    pub teams: TeamPair<TeamConfig>,
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

fn within(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value, min, max })
    }
}

impl GameConfig {
    /// Reads a JSON config; missing sections and fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let conf: Self = serde_json::from_str(&text)?;
        conf.validate()?;
        Ok(conf)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        finite("field.x", self.field.x)?;
        finite("field.y", self.field.y)?;
        positive("field.width", self.field.width)?;
        positive("field.height", self.field.height)?;
        positive("goal.height", self.goal.height)?;
        within("goal.height", self.goal.height, 0.0, self.field.height)?;
        positive("player.radius", self.player.radius)?;
        positive("player.max_speed", self.player.max_speed)?;
        non_negative("player.arrive_radius", self.player.arrive_radius)?;
        positive("ball.radius", self.ball.radius)?;
        positive("ball.max_speed", self.ball.max_speed)?;
        non_negative("ball.kick_boost", self.ball.kick_boost)?;
        non_negative("ball.kickoff_speed", self.ball.kickoff_speed)?;
        // agents and the ball must fit inside the field with room to move
        let smallest = self.field.width.min(self.field.height);
        within("player.radius", self.player.radius, 0.0, smallest / 2.0)?;
        within("ball.radius", self.ball.radius, 0.0, smallest / 2.0)?;
        within("ball.friction", self.ball.friction, 0.0, 1.0)?;
        within("ball.wall_damping", self.ball.wall_damping, 0.0, 1.0)?;
        within("player.braking", self.player.braking, 0.0, 1.0)?;
        within("ai.decision_threshold", self.ai.decision_threshold, 0.0, 1.0)?;

        let (a, b) = (self.teams[Team::A].direction, self.teams[Team::B].direction);
        if a.abs() != 1 || a != -b {
            return Err(ConfigError::Directions { a, b });
        }
        Ok(())
    }

    /// The team whose goal sits on the left edge, i.e. the one attacking +x.
    pub fn left_defender(&self) -> Team {
        if self.teams[Team::A].direction > 0 { Team::A } else { Team::B }
    }
}
