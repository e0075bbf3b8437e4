pub mod briefing;
pub mod config;
pub mod foothold;
