#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates a manor and prints its floor plan.

use std::fmt::Write as _;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{LevelFilter, Log, Metadata, Record};
use manor_core::{GenerationContext, LayoutKind};
use manor_system_generation::ManorGenerator;
use manor_world::Manor;

/// Generate a procedural manor floor plan.
#[derive(Parser, Debug)]
#[command(name = "manor", about = "Generate a procedural manor floor plan", long_about = None)]
struct Args {
    /// Layout silhouette: base, l, z, n, h, o, u or random
    #[arg(short = 'k', long = "kind", default_value = "random")]
    kind: LayoutKind,

    /// Seed for the random source; derived from the clock when omitted
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Print the semantic tile grid instead of the raw layout canvas
    #[arg(short = 't', long = "tiles")]
    tiles: bool,

    /// Furnish every room before printing
    #[arg(short = 'f', long = "furnish")]
    furnish: bool,

    /// Log pipeline details to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

/// Writes log records to stderr.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn install_logger(verbose: bool) -> Result<()> {
    log::set_logger(&LOGGER).map_err(|err| anyhow!("installing the logger: {err}"))?;
    log::set_max_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });
    Ok(())
}

fn clock_seed() -> Result<u64> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is set before the unix epoch")?;
    Ok(elapsed.as_secs() ^ u64::from(elapsed.subsec_nanos()))
}

/// One line per room and corridor: name, section, doors, windows, furniture.
fn summary(manor: &Manor) -> String {
    let mut out = String::new();
    for (id, _) in manor.layout().entries() {
        let props = manor.room_props(id);
        let _ = write!(out, "{id} {} ({:?})", props.name(), props.section());

        let doors = manor.adjoining_names(id);
        if !doors.is_empty() {
            let _ = write!(out, " doors: {}", doors.join(", "));
        }
        if !props.windows().is_empty() {
            let windows: Vec<String> = props.windows().iter().map(|d| format!("{d:?}")).collect();
            let _ = write!(out, " windows: {}", windows.join(", "));
        }
        if !props.furniture().is_empty() {
            let _ = write!(out, " furniture: {}", props.furniture().join(", "));
        }
        out.push('\n');
    }
    out
}

/// Entry point for the manor command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    install_logger(args.verbose)?;

    let seed = match args.seed {
        Some(seed) => seed,
        None => clock_seed()?,
    };
    let generator = ManorGenerator::default();
    let mut ctx = GenerationContext::new(seed);
    let mut manor = generator.generate_with(args.kind, &mut ctx);
    if args.furnish {
        let _ = generator.furnish(&mut manor, &mut ctx);
    }

    println!("seed {seed}, kind {}", args.kind);
    if args.tiles {
        println!("{}", manor.features());
    } else {
        println!("{}", manor.flatten());
    }
    print!("{}", summary(&manor));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use manor_system_generation::generate;

    #[test]
    fn arguments_parse_layout_kinds() {
        let args = Args::try_parse_from(["manor", "--kind", "h", "--seed", "7", "--tiles"])
            .expect("valid arguments");
        assert_eq!(args.kind, LayoutKind::H);
        assert_eq!(args.seed, Some(7));
        assert!(args.tiles);
        assert!(!args.furnish);

        assert!(Args::try_parse_from(["manor", "--kind", "x"]).is_err());
    }

    #[test]
    fn summary_lists_every_entry() {
        let manor = generate(LayoutKind::Base, 3);
        let text = summary(&manor);
        assert_eq!(text.lines().count(), manor.layout().len());
        assert!(text.contains("Entrance Hall"));
        assert!(text.contains("Main Corridor"));
    }
}
