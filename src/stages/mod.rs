pub mod clean;
pub mod merge;
pub mod shift;

pub use clean::*;
pub use merge::*;
pub use shift::*;
