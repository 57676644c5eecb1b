//! Domain models for the parley planning core.

pub mod decision;
pub mod evaluation;
pub mod plan;
pub mod round;
pub mod stability;

pub use decision::*;
pub use evaluation::*;
pub use plan::*;
pub use round::*;
pub use stability::*;
