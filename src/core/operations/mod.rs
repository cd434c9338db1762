mod file_ops;
mod materialize;

pub use file_ops::FileOpError;
pub use materialize::{materialize, SplitOutcome};
