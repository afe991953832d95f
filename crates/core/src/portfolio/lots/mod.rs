mod lot_engine;
mod lots_model;

pub use lot_engine::*;
pub use lots_model::*;
