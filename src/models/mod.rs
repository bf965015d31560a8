pub mod caption;
pub mod rule;

pub use caption::*;
pub use rule::*;
