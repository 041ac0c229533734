use std::io::{self, Read, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser as ClapParser};
use srtedit::{to_secs, Parser, SrtError, Subtext};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("An error occurred: {}", err);
            for cause in err.chain().skip(1) {
                eprintln!("    {}", cause);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(ClapParser)]
#[command(about = "Check, shift and resynchronise SRT subtitles")]
#[command(group(ArgGroup::new("action").args(["check", "move_by", "move_to", "sync"])))]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "The file to read from. If not supplied, the subtitles will be read from standard input.",
        default_value = "-"
    )]
    input: String,
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "The file to write to. If not supplied, the subtitles will be written to standard output.",
        default_value = "-"
    )]
    output: String,
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Write a backup of the original input to the specified file."
    )]
    backup: Option<String>,
    #[arg(
        short,
        long,
        help = "Only report ordering, duration and overlap problems; write nothing."
    )]
    check: bool,
    #[arg(
        short,
        long,
        value_name = "OFFSET",
        value_parser = parse_time,
        allow_hyphen_values = true,
        help = "Shift the subtitles by OFFSET ([-][[hh:]mm:]ss[,fff]); negative values move them earlier."
    )]
    move_by: Option<f64>,
    #[arg(
        short = 't',
        long,
        value_name = "TIME",
        value_parser = parse_time,
        allow_hyphen_values = true,
        help = "Shift the subtitles so that the first one starts at TIME."
    )]
    move_to: Option<f64>,
    #[arg(
        short,
        long,
        num_args = 2,
        value_names = ["START", "END"],
        value_parser = parse_time,
        allow_hyphen_values = true,
        help = "Stretch the subtitles so that the first one starts at START and the last one at END."
    )]
    sync: Option<Vec<f64>>,
    #[arg(
        short,
        long,
        value_name = "TIME",
        value_parser = parse_time,
        allow_hyphen_values = true,
        help = "Only move subtitles starting at or after TIME (with --move-by and --move-to)."
    )]
    from: Option<f64>,
    #[arg(
        short,
        long,
        value_name = "N",
        default_value_t = 1,
        help = "The sequence number of the first subtitle in the output."
    )]
    numbers_from: usize,
    #[arg(long, help = "Enable verbose debug and trace logs.")]
    debug: bool,
}

fn parse_time(value: &str) -> Result<f64, SrtError> {
    to_secs(value)
}

fn init_logging(debug: bool) {
    let directives = if debug {
        "srtedit=trace,info"
    } else {
        "srtedit=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Returns whether the result passed the integrity check.
fn run(cli: Cli) -> Result<bool> {
    let data = if cli.input == "-" {
        let mut buffer = Vec::new();
        io::stdin()
            .read_to_end(&mut buffer)
            .context("Failed to read from stdin")?;
        buffer
    } else {
        std::fs::read(&cli.input)
            .context(format!("Failed to open input file: '{}'", cli.input))?
    };

    if let Some(backup_path) = &cli.backup {
        std::fs::write(backup_path, &data)
            .context(format!("Failed to write backup file: '{}'", backup_path))?;
    }

    let mut subs = Parser::new()
        .parse(&srtedit::io::decode(&data))
        .context(format!("Failed to parse SRT file: '{}'", cli.input))?;

    if cli.from.is_some() && cli.move_by.is_none() && cli.move_to.is_none() {
        warn!("--from only applies to --move-by and --move-to, ignoring it");
    }
    let from = cli.from.unwrap_or(f64::NEG_INFINITY);

    if cli.check {
        return Ok(report(&subs, cli.numbers_from));
    }
    if let Some(offset) = cli.move_by {
        info!("Moving subtitles by {}s", offset);
        subs.move_by_from(offset, from)?;
    } else if let Some(pos) = cli.move_to {
        info!("Moving subtitles to {}s", pos);
        subs.move_all_to(pos, from)?;
    } else if let Some(range) = &cli.sync {
        info!("Syncing subtitles between {}s and {}s", range[0], range[1]);
        subs.sync_all(range[0], range[1])?;
    }

    if cli.output == "-" {
        let mut dst = io::stdout().lock();
        srtedit::write_subs(&mut dst, &subs, cli.numbers_from)
            .context("Failed to write to stdout")?;
        dst.flush().context("Failed to write to stdout")?;
    } else {
        srtedit::io::write(&cli.output, &subs, cli.numbers_from)
            .context(format!("Failed to write output file: '{}'", cli.output))?;
    }

    let violations = subs.check();
    for violation in &violations {
        warn!(
            "#{:04}: {}",
            violation.index + cli.numbers_from,
            violation.kind
        );
    }
    Ok(violations.is_empty())
}

/// Prints one line per integrity problem.
fn report(subs: &Subtext, numbers_from: usize) -> bool {
    let violations = subs.check();
    for violation in &violations {
        println!(
            "#{:04}: {}",
            violation.index + numbers_from,
            violation.kind
        );
    }
    violations.is_empty()
}
