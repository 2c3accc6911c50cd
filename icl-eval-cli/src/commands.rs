pub mod compare;
pub mod prompt;
pub mod score;
pub mod session;
pub mod sweeps;
