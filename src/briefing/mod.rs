//! Briefing / ATO planning documents stored as JSON files

mod model;
mod service;
mod store;

pub use model::*;
pub use service::BriefingService;
pub use store::{BriefingStore, BRIEFINGS_DIR};
