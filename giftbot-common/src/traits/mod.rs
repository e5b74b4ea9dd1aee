pub mod platform_traits;
pub mod scheduler_traits;
