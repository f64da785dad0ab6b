use anyhow::Result;
use clap::Parser;

use hepascore::cache::{AssetCache, FsOrigin, Request, ServeSource};
use hepascore::cli::{CacheCommands, Cli, Commands, OutputFormat};
use hepascore::config::CacheConfig;
use hepascore::score::{compute_score, LabInput, ScoreVariant};

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Score {
            variant,
            bilirubin,
            inr,
            creatinine,
            dialysis,
            sodium,
            albumin,
            gender,
            format,
        } => {
            let variant: ScoreVariant = variant.parse()?;
            let input = LabInput {
                bilirubin,
                inr,
                creatinine,
                dialysis,
                sodium,
                albumin,
                gender: gender.into(),
            };
            let result = compute_score(variant, &input);

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Text => {
                    println!("score: {}", result.value);
                    println!("risk: {} ({})", result.tier.label, result.tier.class);
                    println!("3-month mortality: {}", result.tier.mortality);
                }
            }
        }

        Commands::Cache { command } => handle_cache_command(command)?,
    }

    Ok(())
}

fn handle_cache_command(command: CacheCommands) -> Result<()> {
    match command {
        CacheCommands::Provision { config, origin } => {
            let config = CacheConfig::from_file(&config)?;
            let mut cache = AssetCache::open(config, FsOrigin::new(origin))?;
            cache.provision()?;
            println!(
                "provisioned generation {} ({} entries)",
                cache.config().generation,
                cache.stats().entries
            );
        }

        CacheCommands::Promote { config } => {
            let config = CacheConfig::from_file(&config)?;
            // Promotion never fetches; a missing origin directory is fine here.
            let cache = AssetCache::open(config, FsOrigin::new("."))?;
            let deleted = cache.promote()?;
            println!(
                "generation {} is current, deleted {} stale generation(s)",
                cache.config().generation,
                deleted
            );
        }

        CacheCommands::Get {
            path,
            config,
            origin,
            navigate,
        } => {
            let config = CacheConfig::from_file(&config)?;
            let mut cache = AssetCache::open(config, FsOrigin::new(origin))?;
            let request = if navigate {
                Request::navigate(path)
            } else {
                Request::get(path)
            };
            let served = cache.serve(&request)?;
            let source = match served.source {
                ServeSource::Cache => "cache",
                ServeSource::Network => "network",
                ServeSource::Fallback => "fallback",
                ServeSource::Origin => "origin",
            };
            println!(
                "{} {} bytes from {}",
                served.response.status,
                served.response.body.len(),
                source
            );
        }

        CacheCommands::Stats { config } => {
            let config = CacheConfig::from_file(&config)?;
            let cache = AssetCache::open(config, FsOrigin::new("."))?;
            let stats = cache.stats();
            println!(
                "generation {}: {} entries, {} bytes{}",
                cache.config().generation,
                stats.entries,
                stats.total_bytes,
                if cache.is_provisioned() {
                    ""
                } else {
                    " (not provisioned)"
                }
            );
        }
    }

    Ok(())
}
