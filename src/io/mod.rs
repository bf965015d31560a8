pub mod confirm;
pub mod document;
pub mod vtt;

pub use confirm::*;
pub use document::*;
pub use vtt::*;
