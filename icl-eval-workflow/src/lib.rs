pub mod backends;
pub mod config;
pub mod runner;

pub use backends::*;
pub use config::*;
pub use runner::*;
