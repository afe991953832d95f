mod window_model;
mod window_service;

pub use window_model::*;
pub use window_service::*;

#[cfg(test)]
mod window_service_tests;
