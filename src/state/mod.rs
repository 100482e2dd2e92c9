//! State module for tracking the crawl schedule
//!
//! # Components
//!
//! - `ScheduleState`: the single "a future pass is armed" flag shared by the
//!   scheduler and the timer task it spawns

mod schedule_state;

pub use schedule_state::ScheduleState;
