use serde::{ Serialize, Deserialize };
use super::util::Vec2;
use super::config::*;
use super::field::Field;
use std::fmt;
use std::ops::{ Index, IndexMut };

pub type PlayerId = u32;

pub const TOTAL_PLAYERS: usize = (NUM_PLAYERS * 2) as usize;

/// Serialized as its index, 0 or 1.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Team {
    A,
    B
}

impl From<Team> for u8 {
    fn from(team: Team) -> u8 {
        team as u8
    }
}

impl TryFrom<u8> for Team {
    type Error = String;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(Team::A),
            1 => Ok(Team::B),
            _ => Err(format!("team index {} is not 0 or 1", index)),
        }
    }
}

impl Team {
    pub const ALL: [Team; 2] = [Team::A, Team::B];

    #[inline(always)]
    pub fn other(self) -> Self {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Roster slots owned by this team.
    #[inline(always)]
    pub fn roster(self) -> std::ops::Range<usize> {
        let n = NUM_PLAYERS as usize;
        match self {
            Team::A => 0..n,
            Team::B => n..2 * n,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamPair<T> {
    pub a: T,
    pub b: T,
}

impl<T> TeamPair<T> {
    pub const fn new(a: T, b: T) -> Self {
        Self { a, b }
    }
}

impl<T> Index<Team> for TeamPair<T> {
    type Output = T;
    fn index(&self, index: Team) -> &Self::Output {
        match index {
            Team::A => &self.a,
            Team::B => &self.b
        }
    }
}

impl<T> IndexMut<Team> for TeamPair<T> {
    fn index_mut(&mut self, index: Team) -> &mut Self::Output {
        match index {
            Team::A => &mut self.a,
            Team::B => &mut self.b
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Role {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Role {
    pub const COUNT: usize = 4;
    pub const ALL: [Role; Role::COUNT] = [
        Role::Goalkeeper,
        Role::Defender,
        Role::Midfielder,
        Role::Forward,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Role::Goalkeeper => "goalkeeper",
            Role::Defender => "defender",
            Role::Midfielder => "midfielder",
            Role::Forward => "forward",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kick-off layout of one team: role and offset from the own goal line
/// (x, measured towards the opponent) and from the field's center line (y).
pub const FORMATION: [(Role, f32, f32); NUM_PLAYERS as usize] = [
    (Role::Goalkeeper, 100.0, 0.0),
    (Role::Defender, 200.0, -50.0),
    (Role::Defender, 200.0, 50.0),
    (Role::Midfielder, 350.0, -30.0),
    (Role::Forward, 350.0, 30.0),
];

/// Reflection across the field's vertical center line.
pub trait Mirror {
    fn mirror(&mut self, field: &Field);
}

#[inline(always)]
pub fn mirror_pos(pos: &mut Vec2, field: &Field) {
    pos.x = 2.0 * field.center.x - pos.x;
}

impl Mirror for Vec2 {
    fn mirror(&mut self, field: &Field) {
        mirror_pos(self, field);
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub id: PlayerId,
    pub team: Team,
    pub role: Role,
    pub pos: Vec2,
    pub vel: Vec2,
    pub target: Vec2,
}

impl PlayerState {
    pub fn speed(&self) -> f32 {
        self.vel.norm()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BallState {
    pub pos: Vec2,
    pub vel: Vec2,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GameState {
    pub tick: u64,
    pub ball: BallState,
    pub players: [PlayerState; TOTAL_PLAYERS],
    pub score: TeamPair<u32>,
    pub paused: bool,
    pub speed: f32,
}

/// Ten players in kick-off formation, team A in slots 0-4 and team B in 5-9.
pub fn formation(conf: &GameConfig, field: &Field) -> [PlayerState; TOTAL_PLAYERS] {
    std::array::from_fn(|i| {
        let team = if i < NUM_PLAYERS as usize { Team::A } else { Team::B };
        let (role, dx, dy) = FORMATION[i % NUM_PLAYERS as usize];
        let x = if conf.teams[team].direction > 0 {
            field.left() + dx
        } else {
            field.right() - dx
        };
        let pos = Vec2::new(x, field.center.y + dy);
        PlayerState {
            id: i as PlayerId,
            team,
            role,
            pos,
            vel: Vec2::ZERO,
            target: pos,
        }
    })
}

impl GameState {
    pub fn new(conf: &GameConfig, field: &Field) -> Self {
        Self {
            tick: 0,
            ball: BallState { pos: field.center, vel: Vec2::ZERO },
            players: formation(conf, field),
            score: TeamPair::new(0, 0),
            paused: false,
            speed: 1.0,
        }
    }

    /// Read-only view of one team's players; the roster stays the owner.
    #[inline(always)]
    pub fn team_players(&self, team: Team) -> &[PlayerState] {
        &self.players[team.roster()]
    }
}
