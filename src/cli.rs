use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::score::Gender;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GenderArg {
    Male,
    Female,
}

impl From<GenderArg> for Gender {
    fn from(arg: GenderArg) -> Self {
        match arg {
            GenderArg::Male => Gender::Male,
            GenderArg::Female => Gender::Female,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "hepascore")]
#[command(about = "Liver-disease severity scoring with an offline-first asset cache", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute a severity score and its risk tier from lab values
    Score {
        /// Scoring formula: original, sodium-adjusted or three-factor
        #[arg(long, default_value = "original")]
        variant: String,

        /// Serum bilirubin (mg/dL)
        #[arg(long, default_value = "1.0")]
        bilirubin: f64,

        /// International normalized ratio
        #[arg(long, default_value = "1.0")]
        inr: f64,

        /// Serum creatinine (mg/dL)
        #[arg(long, default_value = "1.0")]
        creatinine: f64,

        /// Patient received dialysis twice in the past week
        #[arg(long)]
        dialysis: bool,

        /// Serum sodium (mEq/L); used by sodium-adjusted and three-factor
        #[arg(long, default_value = "137.0")]
        sodium: f64,

        /// Serum albumin (g/dL); used by three-factor
        #[arg(long, default_value = "3.5")]
        albumin: f64,

        /// Patient gender; used by three-factor
        #[arg(long, value_enum, default_value = "male")]
        gender: GenderArg,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Manage the offline asset cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Fetch every manifest entry into the current generation
    Provision {
        /// Cache config file (TOML)
        #[arg(short, long, default_value = "hepascore.toml")]
        config: PathBuf,

        /// Directory of assets standing in for the origin
        #[arg(long)]
        origin: PathBuf,
    },

    /// Delete every generation except the current one
    Promote {
        #[arg(short, long, default_value = "hepascore.toml")]
        config: PathBuf,
    },

    /// Serve one path through the cache-first policy
    Get {
        /// Root-relative asset path, e.g. /styles.css
        path: String,

        #[arg(short, long, default_value = "hepascore.toml")]
        config: PathBuf,

        #[arg(long)]
        origin: PathBuf,

        /// Treat the request as a full-page navigation
        #[arg(long)]
        navigate: bool,
    },

    /// Show entry count and stored bytes for the current generation
    Stats {
        #[arg(short, long, default_value = "hepascore.toml")]
        config: PathBuf,
    },
}
