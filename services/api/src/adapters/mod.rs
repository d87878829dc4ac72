pub mod gemini;
pub mod identity;

pub use gemini::GeminiVisionAdapter;
pub use identity::GoogleIdentityAdapter;
