use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber;

#[derive(Debug, Clone)]
pub enum Command {
    Resolve {
        appliances_dir: String,
        defaults_path: Option<String>,
        appliances: Vec<String>,
        all: bool,
        output_path: Option<String>,
        skip_validation: bool,
    },
    Validate {
        appliances_dir: String,
    },
    List {
        appliances_dir: String,
    },
}

pub struct Args {
    pub command: Command,
    pub log_level: Level,
}

#[derive(Debug, Parser)]
#[command(
    name = "boxforge",
    version,
    about = "Resolve composed virtual-machine appliance definitions into build-ready configurations"
)]
struct Cli {
    #[arg(
        short = 'v',
        long = "verbose",
        help = "Sets the level of verbosity",
        action = ArgAction::Count,
        global = true
    )]
    verbose: u8,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Merge appliances with everything they are composed of
    Resolve {
        #[arg(
            short = 'd',
            long = "appliances-dir",
            value_name = "DIR",
            help = "Directory containing the .appl definitions",
            default_value = "appliances"
        )]
        appliances_dir: String,

        #[arg(
            long = "defaults",
            value_name = "FILE",
            help = "Overrides the built-in hardware, OS and version defaults"
        )]
        defaults: Option<String>,

        #[arg(
            long = "all",
            help = "Resolves every appliance in the appliances directory",
            conflicts_with = "appliances"
        )]
        all: bool,

        #[arg(
            short = 'o',
            long = "output",
            value_name = "PATH",
            help = "Output file for a single appliance, or output directory for several (default: stdout)"
        )]
        output: Option<String>,

        #[arg(
            long = "skip-validation",
            help = "Resolves without validating the appliance definitions first"
        )]
        skip_validation: bool,

        #[arg(value_name = "APPLIANCE", help = "Names of the appliances to resolve")]
        appliances: Vec<String>,
    },

    /// Check appliance definitions for broken references, cycles and invalid hardware
    Validate {
        #[arg(
            short = 'd',
            long = "appliances-dir",
            value_name = "DIR",
            help = "Directory containing the .appl definitions",
            default_value = "appliances"
        )]
        appliances_dir: String,
    },

    /// List appliances and the appliances they are composed of
    List {
        #[arg(
            short = 'd',
            long = "appliances-dir",
            value_name = "DIR",
            help = "Directory containing the .appl definitions",
            default_value = "appliances"
        )]
        appliances_dir: String,
    },
}

pub fn parse_args() -> Args {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .init();

    let command = match cli.command {
        CliCommand::Resolve {
            appliances_dir,
            defaults,
            all,
            output,
            skip_validation,
            appliances,
        } => Command::Resolve {
            appliances_dir,
            defaults_path: defaults,
            appliances,
            all,
            output_path: output,
            skip_validation,
        },
        CliCommand::Validate { appliances_dir } => Command::Validate { appliances_dir },
        CliCommand::List { appliances_dir } => Command::List { appliances_dir },
    };

    Args { command, log_level }
}
