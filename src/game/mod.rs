pub mod action;
pub mod ai;
pub mod ball;
pub mod classifier;
pub mod config;
pub mod field;
pub mod kinematics;
pub mod match_state;
pub mod models;
pub mod state;
pub mod util;

pub use action::MatchEvent;
pub use classifier::RoleModel;
pub use config::{ ConfigError, GameConfig };
pub use field::Field;
pub use match_state::{ MatchState, Snapshot };
pub use models::{ load_models, ModelError, RoleModels };
pub use state::{ Role, Team, TeamPair };
