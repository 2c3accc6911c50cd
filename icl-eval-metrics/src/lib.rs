pub mod calculators;
pub mod aggregators;
pub mod engine;
pub mod report;

pub use calculators::*;
pub use aggregators::*;
pub use engine::*;
pub use report::*;
