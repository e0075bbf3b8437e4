mod builder;
mod metrics;
mod model;

pub use builder::{build_sitac, load_sitac};
pub use metrics::{sitac_center, sitac_range};
pub use model::*;
