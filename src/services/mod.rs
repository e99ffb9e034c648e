pub mod fallback;
pub mod gemini;
pub mod normalize;
pub mod prompt;
