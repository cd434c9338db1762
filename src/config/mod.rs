mod app_config;

pub use app_config::{normalize_extension, parse_split_arg, SplitConfig, SplitRatio};
