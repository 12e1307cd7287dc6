use clap::error::ErrorKind;
use clap::{Args, Parser, ValueHint::FilePath};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process;

#[derive(Debug, Args)]
#[group(conflicts_with = "PipelineInfo")]
pub struct PipelineArgs {
    /// Maximum number of items in each plugin's queue
    pub queue_size: NonZeroUsize,

    /// Names of the plugins to chain, in order
    #[arg(required = true)]
    pub plugins: Vec<String>,
}

#[derive(Debug, Args)]
#[group(conflicts_with = "PipelineArgs", multiple = false)]
pub struct PipelineInfo {
    /// Prints an example pipeline configuration file
    #[arg(short = 'e', long)]
    pub print_example_config: bool,
}

/// Run a chain of string-processing plugins fed from stdin.
#[derive(Debug, Parser)]
#[clap(author, version, about, long_about)]
pub struct Cli {
    #[command(flatten)]
    pub info: Option<PipelineInfo>,

    #[command(flatten)]
    pub args: Option<PipelineArgs>,

    /// A TOML file describing the pipeline to run
    #[arg(short, long, value_hint = FilePath, conflicts_with_all = ["PipelineArgs", "PipelineInfo"])]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Parses the command line, mapping every argument failure to the
    /// orchestrator's exit code 1 with the usage text on stdout.
    pub fn parse_or_exit() -> Self {
        match Self::try_parse() {
            Ok(cli) => cli,
            Err(e) => match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    let _ = e.print();
                    process::exit(0);
                }
                ErrorKind::MissingRequiredArgument => argument_failure("missing arguments"),
                _ => argument_failure("invalid arguments"),
            },
        }
    }
}

/// Reports a fatal argument problem and exits with code 1.
pub fn argument_failure(message: &str) -> ! {
    eprintln!("error: {message}");
    print_usage();
    process::exit(1);
}

/// The usage and plugin catalogue, printed on argument failures.
pub fn print_usage() {
    println!("Usage: analyzer <queue_size> <plugin1> <plugin2> ... <pluginN>");
    println!("       analyzer --config <FILE>");
    println!();
    println!("Arguments:");
    println!("  queue_size    Maximum number of items in each plugin's queue");
    println!("  plugin1..N    Names of plugins to load (built in, or shared libraries");
    println!("                looked up in output/ and the working directory)");
    println!();
    println!("Available plugins:");
    println!("  logger        - Logs all strings that pass through");
    println!("  typewriter    - Simulates typewriter effect with delays");
    println!("  uppercaser    - Converts strings to uppercase");
    println!("  rotator       - Move every character to the right.  Last character moves to");
    println!("the beginning.");
    println!("  flipper       - Reverses the order of characters");
    println!("  expander      - Expands each character with spaces");
    println!();
    println!("Example:");
    println!("  analyzer 20 uppercaser rotator logger");
    println!("  echo 'hello' | analyzer 20 uppercaser rotator logger");
    println!("  echo '<END>' | analyzer 20 uppercaser rotator logger");
}
