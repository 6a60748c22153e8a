//! CLI tool to convert a coordinate between two projections.
//!
//! Usage:
//!   cargo run --bin coord-convert -- --from Geographic --to HRAP -- -98.5 39.0
//!   cargo run --bin coord-convert -- --from UTM,13 --to Geographic -- 500000 4427757
//!
//! Projection descriptors use the same syntax as saved map
//! configuration: Geographic | HRAP | Unknown | UTM,<zone>[,...].

use anyhow::{bail, Context};
use projection::Projection;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut from_descriptor = String::from("Geographic");
    let mut to_descriptor = String::from("HRAP");
    let mut coords: Vec<f64> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--from" | "-f" => {
                i += 1;
                if i < args.len() {
                    from_descriptor = args[i].clone();
                }
            }
            "--to" | "-t" => {
                i += 1;
                if i < args.len() {
                    to_descriptor = args[i].clone();
                }
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--" => {}
            value => {
                let parsed: f64 = value
                    .parse()
                    .with_context(|| format!("not a coordinate: {value:?}"))?;
                coords.push(parsed);
            }
        }
        i += 1;
    }

    if coords.len() != 2 {
        print_help();
        bail!("expected exactly two coordinates, got {}", coords.len());
    }

    let from = Projection::parse(&from_descriptor)
        .with_context(|| format!("bad --from descriptor {from_descriptor:?}"))?;
    let to = Projection::parse(&to_descriptor)
        .with_context(|| format!("bad --to descriptor {to_descriptor:?}"))?;

    let (lon, lat) = from.inverse(coords[0], coords[1])?;
    let (x, y) = to.forward(lon, lat)?;

    println!("{} ({}, {})", from.name(), coords[0], coords[1]);
    println!("  -> geodetic ({:.6}, {:.6})", lon, lat);
    println!("  -> {} ({:.6}, {:.6})", to.name(), x, y);
    println!("  scale: {:.4} km/unit", to.kilometers_per_unit(x, y));

    Ok(())
}

fn print_help() {
    println!("coord-convert: convert a coordinate between projections");
    println!();
    println!("Usage: coord-convert [--from DESC] [--to DESC] -- X Y");
    println!();
    println!("  --from DESC   source projection descriptor (default Geographic)");
    println!("  --to DESC     destination projection descriptor (default HRAP)");
    println!("  X Y           coordinate in source projection units");
    println!();
    println!("Descriptors: Geographic | HRAP | Unknown | UTM,<zone>[,datum,...]");
}
