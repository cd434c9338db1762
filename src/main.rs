use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

mod app;
mod config;
mod core;
mod logging;

use config::{normalize_extension, parse_split_arg, SplitConfig, SplitRatio};

#[derive(Parser, Debug)]
#[command(name = "yolo-split")]
#[command(about = "Split a flat folder of images and YOLO labels into train/val/test sets")]
struct Cli {
    /// Folder holding the images and their label files
    #[arg(short, long, value_name = "DIR")]
    input: Option<PathBuf>,

    /// Folder that receives <split>/images and <split>/labels
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Split as NAME=FRACTION, repeat in the order splits should be filled
    #[arg(short, long = "split", value_name = "NAME=FRACTION", value_parser = parse_split_arg)]
    splits: Vec<SplitRatio>,

    /// Recognized image extensions, comma separated
    #[arg(long, value_name = "EXT", value_delimiter = ',')]
    image_ext: Vec<String>,

    /// Label file extension
    #[arg(long, value_name = "EXT")]
    label_ext: Option<String>,

    /// JSON config file; command-line flags override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write a JSON summary of the run to this file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Also write logs to a timestamped file in this folder
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// List skipped files and every copy
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn resolve_config(&self) -> crate::core::SplitResult<SplitConfig> {
        let mut config = match &self.config {
            Some(path) => SplitConfig::load(path)?,
            None => SplitConfig::default(),
        };

        if let Some(input) = &self.input {
            config.input_dir = input.clone();
        }
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        if !self.splits.is_empty() {
            config.splits = self.splits.clone();
        }
        if !self.image_ext.is_empty() {
            config.image_extensions = self.image_ext.iter().map(|e| normalize_extension(e)).collect();
        }
        if let Some(label_ext) = &self.label_ext {
            config.label_extension = normalize_extension(label_ext);
        }

        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::setup_logging(cli.verbose, cli.log_dir.as_deref()) {
        eprintln!("Failed to set up logging: {}", e);
        return ExitCode::FAILURE;
    }

    let result = cli.resolve_config().and_then(|config| {
        let summary = app::run(&config)?;
        if let Some(report) = &cli.report {
            summary.save(report)?;
        }
        Ok(())
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_cli_defaults_match_config_defaults() {
        let cli = Cli::parse_from(["yolo-split"]);
        let config = cli.resolve_config().unwrap();
        let defaults = SplitConfig::default();

        assert_eq!(config.input_dir, defaults.input_dir);
        assert_eq!(config.splits, defaults.splits);
    }

    #[test]
    fn test_cli_flags_override_config_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("split.json");
        fs::write(
            &path,
            r#"{"input_dir": "from_file", "output_dir": "out_file", "label_extension": "lbl"}"#,
        )
        .unwrap();

        let cli = Cli::parse_from([
            "yolo-split",
            "--config",
            path.to_str().unwrap(),
            "--input",
            "from_cli",
            "--split",
            "train=0.8",
            "--split",
            "val=0.2",
            "--image-ext",
            ".PNG,jpg",
        ]);
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.input_dir, PathBuf::from("from_cli"));
        assert_eq!(config.output_dir, PathBuf::from("out_file"));
        assert_eq!(config.label_extension, "lbl");
        assert_eq!(
            config.splits,
            vec![SplitRatio::new("train", 0.8), SplitRatio::new("val", 0.2)]
        );
        assert_eq!(config.image_extensions, vec!["png", "jpg"]);
    }

    #[test]
    fn test_cli_rejects_malformed_split() {
        assert!(Cli::try_parse_from(["yolo-split", "--split", "train"]).is_err());
    }
}
