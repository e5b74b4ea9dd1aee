// src/lib.rs

pub mod config;
pub mod health;
pub mod platforms;
pub mod services;
pub mod tasks;
pub mod test_utils;

pub use config::BotConfig;
pub use giftbot_common::error::Error;
