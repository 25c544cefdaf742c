mod alarm;
mod clock;
mod engine;
mod render;
mod state;

pub use alarm::{wake_up_time, ManualScheduler, Scheduler};
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::TimerEngine;
pub use render::{format_remaining, progress, Controls, TimerView};
pub use state::{TimerSnapshot, TimerState};
