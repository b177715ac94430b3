mod activity;
mod plan;
mod report;
mod tracker;
mod types;

pub use activity::*;
pub use plan::*;
pub use report::*;
pub use tracker::*;
pub use types::*;
