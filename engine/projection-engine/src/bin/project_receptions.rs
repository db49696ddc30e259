//! Command-line front end for the reception projection model
//!
//! Usage: project-receptions --routes-l3 20 --routes-season 18 --tprr-l4 0.22 \
//!        --tprr-season 0.20 --catch-rate-season 0.75 --catch-rate-l4 0.70 \
//!        --matchup-factor 1.0 --line 4.5 [--strict] [--verbose]

use anyhow::Context;
use clap::Parser;
use projection_engine::poisson::poisson_pmf;
use projection_engine::{EngineConfig, ProjectionCalculator, ProjectionRequest, RangePolicy};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "project-receptions", about = "Project receptions and price a sportsbook line")]
struct Args {
    #[arg(long, allow_negative_numbers = true)]
    routes_l3: f64,

    #[arg(long, allow_negative_numbers = true)]
    routes_season: f64,

    #[arg(long, allow_negative_numbers = true)]
    tprr_l4: f64,

    #[arg(long, allow_negative_numbers = true)]
    tprr_season: f64,

    #[arg(long, allow_negative_numbers = true)]
    catch_rate_season: f64,

    #[arg(long, allow_negative_numbers = true)]
    catch_rate_l4: f64,

    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    matchup_factor: f64,

    #[arg(long, allow_negative_numbers = true)]
    line: f64,

    /// Reject out-of-range rates and negative matchup factors
    #[arg(long)]
    strict: bool,

    /// Print intermediates and the probability mass around the line
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let mut config = EngineConfig::from_env()?;
    if args.strict {
        config.range_policy = RangePolicy::Strict;
    }
    info!("Projecting with range policy {:?}", config.range_policy);

    let request = ProjectionRequest {
        routes_l3: args.routes_l3,
        routes_season: args.routes_season,
        tprr_l4: args.tprr_l4,
        tprr_season: args.tprr_season,
        catch_rate_season: args.catch_rate_season,
        catch_rate_l4: args.catch_rate_l4,
        matchup_factor: args.matchup_factor,
        line: args.line,
    };

    let calculator = ProjectionCalculator::new(config);
    let breakdown = calculator.breakdown(&request).context("Projection failed")?;
    let result = calculator.finalize(&breakdown);

    println!("{}", serde_json::to_string_pretty(&result)?);

    if args.verbose {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);

        if breakdown.lambda >= 0.0 {
            println!("k      P(X = k)");
            let max_k = breakdown.floor_line.saturating_add(3).min(200);
            for (k, p) in poisson_pmf(breakdown.lambda, max_k).iter().enumerate() {
                let marker = if k as u64 > breakdown.floor_line { "  over" } else { "" };
                println!("{:<6} {:.4}{}", k, p, marker);
            }
        }
    }

    Ok(())
}
