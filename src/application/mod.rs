// Application layer - the operation service, the capability ports it
// depends on, and the statement renderer.

pub mod error;
pub mod ports;
pub mod reporting;
pub mod service;

pub use error::*;
pub use ports::*;
pub use reporting::*;
pub use service::*;
