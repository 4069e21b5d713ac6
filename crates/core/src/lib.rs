#![forbid(unsafe_code)]

pub mod metrics;
pub mod model;
pub mod time;
pub mod voice;

pub use time::Clock;
