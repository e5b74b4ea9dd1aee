// File: src/services/mod.rs

pub mod command_service;
pub mod discord;
pub mod giveaway;
pub mod prefix_commands;

pub use command_service::CommandService;
pub use giveaway::GiveawayManager;
