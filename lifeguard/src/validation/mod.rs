//! Runtime validation of attribute writes.

mod pipeline;

pub use pipeline::validate;
