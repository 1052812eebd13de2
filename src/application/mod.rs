// Application layer - payment admission, cycle queries, report assembly

pub mod admission;
pub mod error;
pub mod reporting;
pub mod service;

pub use admission::*;
pub use error::*;
pub use reporting::*;
pub use service::*;
