mod instruments_model;

pub use instruments_model::*;
