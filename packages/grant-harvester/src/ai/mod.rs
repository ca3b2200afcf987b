//! Text-generation providers.

pub mod gemini;

pub use gemini::GeminiGenerator;
