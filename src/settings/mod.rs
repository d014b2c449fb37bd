use std::path::PathBuf;

use clap::{Parser, Subcommand, value_parser};
use xrmotion_files::envelope::DEFAULT_EPSILON;
use xrmotion_files::motion::types::{ExportSettings, MOTION_VERSION_LATEST, MOTION_VERSION_MIN};

#[derive(Parser, Debug)]
#[command(name = "xrmotion")]
#[command(version)]
#[command(about = "Inspects, samples and refines chunked motion files")]
pub struct CliArgs {
    /// Fail on recoverable decoding errors instead of continuing with a warning
    #[arg(long, global = true, env = "XRMOTION_STRICT")]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Prints the chunk tree of each file
    Chunks {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Nested chunk streams below this depth are printed as opaque chunks
        #[arg(long, default_value_t = 8)]
        max_depth: usize,
    },
    /// Decodes each file and prints a summary of its motions
    Info {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Evaluates the channels of one bone
    Sample {
        file: PathBuf,
        #[arg(long)]
        motion: String,
        /// Bone index, object motions only have bone 0
        #[arg(long, default_value_t = 0)]
        bone: usize,
        /// Frame to evaluate, every frame of the clip if missing
        #[arg(long)]
        frame: Option<f32>,
    },
    /// Decodes a file, refines all channels and writes it again
    Refine {
        input: PathBuf,
        output: PathBuf,
        #[command(flatten)]
        export: ExportArgs,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct ExportArgs {
    /// Maximum deviation of a dropped key, 0 keeps every key
    #[arg(long, env = "XRMOTION_EPSILON", default_value_t = DEFAULT_EPSILON)]
    pub epsilon: f32,

    #[arg(
        long,
        env = "XRMOTION_FORMAT_VERSION",
        default_value_t = MOTION_VERSION_LATEST,
        value_parser = value_parser!(u16).range(MOTION_VERSION_MIN as i64..=MOTION_VERSION_LATEST as i64)
    )]
    pub format_version: u16,
}

impl From<&ExportArgs> for ExportSettings {
    fn from(args: &ExportArgs) -> Self {
        ExportSettings {
            format_version: args.format_version,
            epsilon: (args.epsilon > 0.0).then_some(args.epsilon),
        }
    }
}
