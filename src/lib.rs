pub mod arena;
pub mod attack;
pub mod battlefield;
pub mod config;
pub mod constants;
pub mod defense;
pub mod error;
pub mod game_state;
pub mod location;
pub mod rating;
pub mod strategy;
pub mod template;

pub use battlefield::*;
pub use error::*;
pub use location::*;
pub use strategy::*;
