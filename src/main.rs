mod cli;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use cli::{Cli, Commands};

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "tally=debug",
        _ => "tally=trace",
    };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Detect { file, json } => cli::detect::run(&file, config, json),
        Commands::Parse {
            file,
            mapping,
            map,
            format,
            summary,
        } => cli::parse::run(&file, config, mapping.as_deref(), &map, format, summary),
        Commands::Config { init } => cli::config::run(config, init),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
