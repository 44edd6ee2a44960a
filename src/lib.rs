pub mod args;
pub mod engine;
pub mod game;
