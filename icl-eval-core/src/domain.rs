pub mod ids;
pub mod task;
pub mod label;
pub mod example;
pub mod prompt;
pub mod evaluation;
pub mod run;

pub use ids::*;
pub use task::*;
pub use label::*;
pub use example::*;
pub use prompt::*;
pub use evaluation::*;
pub use run::*;
