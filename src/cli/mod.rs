use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "litmus",
    version,
    about = "Scaffold unit tests for Razor components",
    long_about = "Read a component class (.cs) and its markup (.razor) and print test scenarios: default member values, non-null members after render, and @ref element attributes equal to their markup literals. Without file arguments, exactly one .cs and one .razor file are discovered in the working directory."
)]
pub struct Cli {
    /// Suppress status messages (generated output is still printed)
    #[arg(short, long, global = true, default_value_t = false)]
    pub quiet: bool,
    /// Increase diagnostic output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
    /// Path to a TOML configuration file (default: ./litmus.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate test scenarios for one component
    Generate {
        /// Component class file (.cs)
        #[arg(requires = "markup_file")]
        class_file: Option<PathBuf>,
        /// Component markup file (.razor)
        markup_file: Option<PathBuf>,
        /// Directory searched when no files are given
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        /// Include files matched by .gitignore/.ignore during discovery
        #[arg(long, default_value_t = false)]
        no_ignore: bool,
        /// Component name used in the tests (default: the declared class name)
        #[arg(long)]
        component: Option<String>,
        /// Output format (default: config `output.format`, else text)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
        /// Write the output to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show extracted members and @ref attributes without generating tests
    Inspect {
        /// Component class file (.cs)
        #[arg(requires = "markup_file")]
        class_file: Option<PathBuf>,
        /// Component markup file (.razor)
        markup_file: Option<PathBuf>,
        /// Directory searched when no files are given
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        /// Include files matched by .gitignore/.ignore during discovery
        #[arg(long, default_value_t = false)]
        no_ignore: bool,
        /// Output format (default: config `output.format`, else text)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Generate tests for every component pair under a directory
    Batch {
        /// Root directory to search for X.razor + X.razor.cs / X.cs pairs
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
        /// Include files matched by .gitignore/.ignore
        #[arg(long, default_value_t = false)]
        no_ignore: bool,
        /// Write <Component>Tests.cs files here instead of printing
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Print shell completion script
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
