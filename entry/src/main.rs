/// riptools: tools for Repeat-Induced Point mutation analysis
///
/// This is the entry point for the riptools CLI.
/// It is responsible for parsing the CLI arguments
/// and executing the appropriate subcommand [rip-tool].
///
/// This wrapper offers 2 different subcommands:
/// - derip
/// - rip-index
///
/// The first one builds a RIP-corrected consensus from a
/// multiple sequence alignment, the second one reports RIP
/// product, substrate and composite indices per sequence.
/// Both share two hidden submodules: 'rip-pack', the FASTA
/// alignment reader, and 'config', with universal constants
/// and default thresholds for the riptools suite.
///
/// To get help on the subcommands, you can run:
///
/// ```shell
/// riptools derip -- --help
/// ```
///
use clap::{Args, Parser, Subcommand};
use log::{error, info, Level};
use riptools::{lib, Tool};
use simple_logger::init_with_level;

#[derive(Parser)]
#[command(name = "riptools")]
#[command(about = "riptools: tools for Repeat-Induced Point mutation analysis")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(name = "derip")]
    Derip(RipArgs),
    #[command(name = "rip-index")]
    Index(RipArgs),
}

#[derive(Args)]
struct RipArgs {
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() {
    let start = std::time::Instant::now();
    init_with_level(Level::Info).unwrap();
    let cli = Cli::parse();

    let (tool, args) = match cli.command {
        Commands::Derip(args) => (Tool::Derip, args.args),
        Commands::Index(args) => (Tool::Index, args.args),
    };

    lib(tool, args).unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    let elapsed = start.elapsed();
    info!("Elapsed time: {:.3?}", elapsed);
}
