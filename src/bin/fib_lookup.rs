use std::error::Error;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use fib_trie::errors::FibError;
use fib_trie::rib::config::{Config, Verbosity};
use fib_trie::rib::RouteTableBuilder;
use fib_trie::Stride;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Number of address bits per trie level
    #[arg(short, long, default_value_t = 1,
        value_parser = clap::value_parser!(u8).range(1..=3))]
    stride: u8,

    /// Resolve the addresses without printing a line for each
    #[arg(short, long, default_value_t = false)]
    quiet: bool,

    /// Print node and prefix counts per trie level
    #[arg(long, default_value_t = false)]
    stats: bool,

    /// Print the trie statistics as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Route dump, one `<prefix>/<len>|<path>|<next-hop>` per line
    routes: PathBuf,

    /// Addresses to look up, one per line
    ips: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    for path in [&cli.routes, &cli.ips] {
        if !path.is_file() {
            eprintln!("{}", FibError::FileNotFound(path.clone()));
            process::exit(1);
        }
    }

    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        Verbosity::Normal
    };
    let config = Config::new(Stride::try_from(cli.stride)?, verbosity);

    let fib = match RouteTableBuilder::new(config).build_from_path(&cli.routes)
    {
        Ok(fib) => fib,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    };
    let build = fib.build_report();
    println!(
        "finished building trie in {} msecs ({} routes, {} prefixes)...",
        build.duration.as_millis(),
        build.routes_read,
        build.routes_inserted
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&fib.stats())?);
    } else if cli.stats {
        println!("{}", fib.stats());
    }

    let stdout = io::stdout();
    let report = fib.lookup_ips_from_path(&cli.ips, BufWriter::new(stdout.lock()));
    match report {
        Ok(report) => {
            eprintln!("{}", report);
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    }
}
