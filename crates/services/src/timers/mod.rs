mod rest_timer;
mod session_timer;
mod ticker;

pub use rest_timer::{RestExpired, RestTimer};
pub use session_timer::SessionTimer;
pub use ticker::{Ticker, TimerEvent, TimerKind};
