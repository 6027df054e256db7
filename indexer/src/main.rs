use anyhow::Result;
use ascent_core::{FitOptions, Norm};
use ascent_indexer::{build_index, BuildOptions};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "ascent-indexer")]
#[command(about = "Fit the TF-IDF vocabulary and vectorize an article corpus", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build artifacts from input JSON/JSONL files or a directory
    Build {
        /// Input path (file or directory)
        #[arg(long)]
        input: PathBuf,
        /// Output artifact directory
        #[arg(long)]
        output: PathBuf,
        /// Ignore terms found in fewer documents
        #[arg(long, default_value_t = 1)]
        min_df: u32,
        /// Ignore terms found in more than this fraction of documents
        #[arg(long, default_value_t = 1.0)]
        max_df: f32,
        /// Keep only the most frequent terms
        #[arg(long)]
        max_features: Option<usize>,
        /// Use 1 + ln(tf) term frequencies
        #[arg(long, default_value_t = false)]
        sublinear_tf: bool,
        /// Use ln(N/df) + 1 instead of the smoothed IDF
        #[arg(long, default_value_t = false)]
        no_smooth_idf: bool,
        /// Skip L2 normalization of document vectors
        #[arg(long, default_value_t = false)]
        no_norm: bool,
        /// Derive missing urls as <url-base><Title_With_Underscores>
        #[arg(long)]
        url_base: Option<String>,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, min_df, max_df, max_features, sublinear_tf, no_smooth_idf, no_norm, url_base } => {
            let fit = FitOptions {
                min_df,
                max_df,
                max_features,
                sublinear_tf,
                smooth_idf: !no_smooth_idf,
                norm: if no_norm { Norm::None } else { Norm::L2 },
            };
            build_index(&input, &output, &BuildOptions { fit, url_base })?;
            Ok(())
        }
    }
}
