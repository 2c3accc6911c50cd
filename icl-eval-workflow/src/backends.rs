//! HTTP generation and scoring backends.
//!
//! Each backend implements one of the core seam traits, so the runner never
//! sees a transport detail.

pub mod hf;
pub mod http;
pub mod ollama;

pub use hf::*;
pub use http::*;
pub use ollama::*;
