use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "warp-h1",
    about = "WarpGrid incremental HTTP/1.x request inspector",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a captured HTTP request and report what the parser saw.
    ///
    /// The input is delivered to the parser in fragments of --chunk-size
    /// bytes, the way a socket reader would, so any split point can be
    /// reproduced. Without --chunk-size the whole file is fed at once.
    Inspect {
        /// Request file to parse, or `-` for stdin
        file: String,
        /// Feed the input in fragments of this many bytes
        #[arg(short, long)]
        chunk_size: Option<usize>,
        /// Parser configuration file (TOML)
        #[arg(long)]
        config: Option<String>,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Print the effective parser configuration as TOML
    Config {
        /// Parser configuration file (TOML)
        #[arg(long)]
        config: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("warp_h1=info".parse()?)
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect {
            file,
            chunk_size,
            config,
            format,
        } => commands::inspect::inspect(&file, chunk_size, config.as_deref(), &format),
        Commands::Config { config } => commands::config::show(config.as_deref()),
    }
}
