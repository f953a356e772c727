//! The room-based adventure engine.
//!
//! One resolver runs any [`world::AdventureMap`]; the individual games are
//! datasets in [`maps`].

pub mod maps;
pub mod resolver;
pub mod world;

pub use maps::{cave_puzzle, ruined_keep};
pub use resolver::AdventureSession;
pub use world::{
    AdventureMap, AdventureState, Direction, Interaction, Item, MapBuilder, MapError, Room,
};
