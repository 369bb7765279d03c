//! auxlist command-line tool
//!
//! Benchmarks deep copy and round trips on random chains, writes sample
//! streams and inspects stream files.

use anyhow::Result;
use auxlist_wire::{CodecKind, SerializerConfig, TokenStrategy};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod generate;

fn codec_arg() -> Arg {
    Arg::new("codec")
        .long("codec")
        .default_value("bincode")
        .value_parser(value_parser!(CodecKind))
        .help("Payload codec: bincode or json")
}

fn count_arg() -> Arg {
    Arg::new("count")
        .long("count")
        .default_value("1000000")
        .value_parser(value_parser!(usize))
        .help("Number of nodes in the generated chain")
}

fn seed_arg() -> Arg {
    Arg::new("seed")
        .long("seed")
        .default_value("42")
        .value_parser(value_parser!(u64))
        .help("Random seed for reproducibility")
}

fn cli() -> Command {
    Command::new("auxlist")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Identity-preserving copy and serialization of auxiliary-pointer lists")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)"),
        )
        .arg(
            Arg::new("max-record-len")
                .long("max-record-len")
                .value_parser(value_parser!(u32))
                .global(true)
                .help("Largest record payload accepted, in bytes"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("bench")
                .about("Time deep copy, serialize and deserialize on a random chain")
                .arg(count_arg())
                .arg(seed_arg())
                .arg(codec_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("encode")
                .about("Write a random chain to a stream file")
                .arg(count_arg().default_value("1000"))
                .arg(seed_arg())
                .arg(codec_arg())
                .arg(
                    Arg::new("sequential")
                        .long("sequential")
                        .action(ArgAction::SetTrue)
                        .help("Use counter tokens for byte-identical output"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Destination file"),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Decode a stream file and check that it reconstructs")
                .arg(
                    Arg::new("input")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Stream file"),
                )
                .arg(codec_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn config_from(args: &ArgMatches, root: &ArgMatches) -> SerializerConfig {
    let mut config = SerializerConfig::new();
    if let Some(codec) = args.get_one::<CodecKind>("codec") {
        config = config.with_codec(*codec);
    }
    if args.try_get_one::<bool>("sequential").ok().flatten() == Some(&true) {
        config = config.with_tokens(TokenStrategy::Sequential);
    }
    if let Some(max) = root.get_one::<u32>("max-record-len") {
        config = config.with_max_record_len(*max);
    }
    config
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_count("verbose"));

    match matches.subcommand() {
        Some(("bench", args)) => {
            let count = *args.get_one::<usize>("count").unwrap_or(&1_000_000);
            let seed = *args.get_one::<u64>("seed").unwrap_or(&42);
            let config = config_from(args, &matches);

            let report = commands::bench(count, seed, config)?;
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.generate_text());
            }
            std::process::exit(if report.passed() { 0 } else { 1 });
        }
        Some(("encode", args)) => {
            let count = *args.get_one::<usize>("count").unwrap_or(&1000);
            let seed = *args.get_one::<u64>("seed").unwrap_or(&42);
            let config = config_from(args, &matches);
            let output = args
                .get_one::<PathBuf>("output")
                .ok_or_else(|| anyhow::anyhow!("--output is required"))?;

            let records = commands::encode(count, seed, config, output).await?;
            println!("Wrote {records} records to {}", output.display());
        }
        Some(("inspect", args)) => {
            let config = config_from(args, &matches);
            let input = args
                .get_one::<PathBuf>("input")
                .ok_or_else(|| anyhow::anyhow!("input path is required"))?;

            let report = commands::inspect(config, input).await?;
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.generate_text());
            }
            std::process::exit(if report.valid { 0 } else { 1 });
        }
        _ => {}
    }
    Ok(())
}
