//! Request bindings and JSON response bodies.

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;
