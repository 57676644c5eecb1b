pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{CoreError, CoreResult};
