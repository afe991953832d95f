mod calendar_traits;

pub use calendar_traits::*;
