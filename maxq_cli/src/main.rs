//! Query the toolkit from the command line: load some text kernels, then
//! convert a time, read the kernel pool, or convert units.
//!
//! Toolkit failures are printed as their short and long messages, and the
//! process exits with status 1.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use maxq::{EphemerisTime, SpiceConfig, SpiceContext, Units, UtcTimeFormat};
use tracing::debug;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory that kernel paths are relative to
    #[arg(short, long, env = maxq::CONTENT_ROOT_VAR, default_value = ".")]
    content_root: PathBuf,

    /// Text kernel or meta-kernel to load, in order
    #[arg(short, long = "kernel")]
    kernels: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Time string to ephemeris seconds past J2000
    Str2et { time: String },

    /// Ephemeris time to UTC
    Et2utc {
        #[arg(allow_negative_numbers = true)]
        et: f64,

        /// C, D, J, ISOC or ISOD
        #[arg(short, long, default_value = "C", value_parser = parse_format)]
        format: UtcTimeFormat,

        /// Decimal places of seconds
        #[arg(short, long, default_value_t = 3)]
        prec: u32,
    },

    /// Ephemeris time as a calendar date, without leapseconds
    Etcal {
        #[arg(allow_negative_numbers = true)]
        et: f64,
    },

    /// Print the pool variables whose names match a template
    Pool { template: String },

    /// Print the values of a body constant
    Bodvrd { body: String, item: String },

    /// Convert a value between units
    Convrt {
        #[arg(allow_negative_numbers = true)]
        value: f64,
        #[arg(value_parser = parse_units)]
        from: Units,
        #[arg(value_parser = parse_units)]
        to: Units,
    },

    /// List the files under a directory of the content root, or the loaded
    /// kernels if no directory is given
    Kernels { dir: Option<String> },
}

fn parse_units(s: &str) -> std::result::Result<Units, String> {
    Units::parse(s).ok_or_else(|| format!("unrecognized unit '{s}'"))
}

fn parse_format(s: &str) -> std::result::Result<UtcTimeFormat, String> {
    match s.to_ascii_uppercase().as_str() {
        "C" => Ok(UtcTimeFormat::Calendar),
        "D" => Ok(UtcTimeFormat::DayOfYear),
        "J" => Ok(UtcTimeFormat::JulianDate),
        "ISOC" => Ok(UtcTimeFormat::IsoCalendar),
        "ISOD" => Ok(UtcTimeFormat::IsoDayOfYear),
        _ => Err(format!("unrecognized format '{s}'")),
    }
}

/// Upper bound on values printed for a single variable
const MAX_VALUES: usize = 1000;

fn run(cli: Cli) -> Result<()> {
    let config = SpiceConfig::default().with_content_root(cli.content_root);
    let mut ctx = SpiceContext::with_config(config)?;
    maxq::furnsh_list(&mut ctx, &cli.kernels)?;
    debug!(count = cli.kernels.len(), "kernels loaded");

    match cli.command {
        Command::Str2et { time } => {
            let et = maxq::str2et(&mut ctx, &time)?;
            println!("{:.6}", et.seconds);
        }
        Command::Et2utc { et, format, prec } => {
            println!("{}", maxq::et2utc(&mut ctx, EphemerisTime::new(et), format, prec)?);
        }
        Command::Etcal { et } => {
            println!("{}", maxq::etcal(EphemerisTime::new(et)));
        }
        Command::Pool { template } => {
            let mut names = maxq::gnpool(&mut ctx, &template, 0, MAX_VALUES)?.unwrap_or_default();
            names.sort();
            for name in names {
                print_variable(&mut ctx, &name)?;
            }
        }
        Command::Bodvrd { body, item } => {
            let values = maxq::bodvrd(&mut ctx, &body, &item, MAX_VALUES)?;
            let values: Vec<String> = values.iter().map(f64::to_string).collect();
            println!("{}", values.join(" "));
        }
        Command::Convrt { value, from, to } => {
            println!("{}", maxq::convrt(&mut ctx, value, from, to)?);
        }
        Command::Kernels { dir: Some(dir) } => {
            for file in maxq::enumerate_kernels(&mut ctx, &dir, true)? {
                println!("{file}");
            }
        }
        Command::Kernels { dir: None } => {
            let total = maxq::ktotal(&mut ctx, maxq::KernelType::all())?;
            for which in 0..total {
                let Some(info) = maxq::kdata(&mut ctx, which, maxq::KernelType::all())? else {
                    continue;
                };
                if info.source.is_empty() {
                    println!("{} {}", info.file_type, info.file);
                } else {
                    println!("{} {} (from {})", info.file_type, info.file, info.source);
                }
            }
        }
    }
    Ok(())
}

fn print_variable(ctx: &mut SpiceContext, name: &str) -> Result<()> {
    let (n, ty) = maxq::dtpool(ctx, name)?.ok_or_else(|| anyhow!("variable {name} disappeared"))?;
    let values: Vec<String> = match ty {
        maxq::PoolType::Numeric => maxq::gdpool(ctx, name, 0, n)?
            .unwrap_or_default()
            .iter()
            .map(f64::to_string)
            .collect(),
        maxq::PoolType::Character => maxq::gcpool(ctx, name, 0, n)?
            .unwrap_or_default()
            .iter()
            .map(|s| format!("'{s}'"))
            .collect(),
    };
    println!("{name} = ( {} )", values.join(" "));
    Ok(())
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => match err.downcast_ref::<maxq::Error>() {
            Some(spice) if spice.is_toolkit_error() => {
                eprintln!("{}", spice.short());
                eprintln!("{}", spice.long());
                Ok(ExitCode::FAILURE)
            }
            _ => Err(err),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn arguments() {
        Cli::command().debug_assert();

        let cli = Cli::try_parse_from([
            "maxq", "-k", "a.tls", "-k", "b.tpc", "convrt", "-1.5", "kilometers", "meters",
        ])
        .unwrap();
        assert_eq!(cli.kernels, ["a.tls", "b.tpc"]);
        let Command::Convrt { value, from, to } = cli.command else {
            panic!("expected convrt");
        };
        assert_eq!((value, from, to), (-1.5, Units::Kilometers, Units::Meters));

        assert!(Cli::try_parse_from(["maxq", "convrt", "1", "furlongs", "m"]).is_err());
        assert_eq!(parse_format("isoc"), Ok(UtcTimeFormat::IsoCalendar));
    }
}
