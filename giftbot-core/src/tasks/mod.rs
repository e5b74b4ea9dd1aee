pub mod giveaway_timers;

pub use giveaway_timers::{spawn_expiry_dispatch_task, TokioTimerScheduler};
