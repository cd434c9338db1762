pub mod dataset;
pub mod error;
pub mod operations;

pub use dataset::*;
pub use error::{SplitError, SplitResult};
pub use operations::*;
