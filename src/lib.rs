pub mod api;
pub mod briefing;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod parser;
pub mod schema;
pub mod sitac;

pub use cli::{Cli, Commands};
pub use config::AppConfig;
pub use error::{Result, SitacError};
pub use sitac::{load_sitac, Sitac};
