//! Bugomattic CLI
//!
//! Command-line interface for the Bugomattic triage engine

mod commands;
mod output;

use bugomattic_core::{Result, init_tracing};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;
use tracing::error;

#[derive(Parser)]
#[command(name = "bugomattic")]
#[command(about = "Bugomattic: find where to report a problem")]
#[command(version = bugomattic_core::VERSION)]
#[command(
    long_about = "Bugomattic routes a problem to the right place to report it.\n\
It normalizes a reporting config of products, feature groups, features and tasks,\n\
searches the taxonomy, and prints the matching tasks with their links.\n\
\n\
Examples:\n  \
bugomattic validate reporting.json          # Check a reporting config\n  \
bugomattic search backup reporting.json     # Show the tree for a search term\n  \
bugomattic tasks Jetpack__Stats reporting.json  # List tasks for a feature\n  \
bugomattic config init                      # Initialize configuration file"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (.bugomatticrc.json/.bugomatticrc.toml/bugomattic.yaml)"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Generate shell completion script
    #[arg(
        long,
        value_enum,
        help = "Generate completion script for specified shell"
    )]
    generate_completion: Option<Shell>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the normalized form of a reporting config
    Normalize {
        #[arg(help = "Reporting config (default: reportingConfig from the config file)")]
        file: Option<PathBuf>,

        #[arg(short, long, default_value = "json", help = "Output format")]
        format: DataFormat,
    },

    /// Check that a reporting config loads and normalizes
    #[command(alias = "check")]
    Validate {
        #[arg(help = "Reporting config (default: reportingConfig from the config file)")]
        file: Option<PathBuf>,
    },

    /// Search the taxonomy by feature name or keyword
    Search {
        #[arg(help = "Search term (case-insensitive)")]
        term: String,

        #[arg(help = "Reporting config (default: reportingConfig from the config file)")]
        file: Option<PathBuf>,

        #[arg(
            short,
            long,
            default_value = "human",
            help = "Output format for the results"
        )]
        format: OutputFormat,
    },

    /// Print the taxonomy tree
    Tree {
        #[arg(help = "Reporting config (default: reportingConfig from the config file)")]
        file: Option<PathBuf>,

        /// Expand nodes by ID
        #[arg(
            short,
            long,
            help = "Expand a product or feature group (can be used multiple times)"
        )]
        expand: Vec<String>,

        /// Expand every branch
        #[arg(long, help = "Expand every product and feature group")]
        all: bool,

        #[arg(short, long, help = "Only show the paths to matching features")]
        search: Option<String>,
    },

    /// List the tasks of a product, feature group, or feature
    Tasks {
        #[arg(help = "Product, feature group, or feature ID")]
        node_id: String,

        #[arg(help = "Reporting config (default: reportingConfig from the config file)")]
        file: Option<PathBuf>,

        #[arg(short, long, default_value = "human", help = "Output format")]
        format: OutputFormat,
    },

    /// Read search terms from stdin and print the tree for each
    Interactive {
        #[arg(help = "Reporting config (default: reportingConfig from the config file)")]
        file: Option<PathBuf>,

        #[arg(long, help = "Rendered responses to keep (default: cache.maxEntries or 50)")]
        cache_size: Option<usize>,
    },

    /// Print a JSON Schema
    Schema {
        #[arg(long, help = "Print the tool config schema instead of the reporting config schema")]
        tool: bool,
    },

    /// Configuration file management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information
    #[command(alias = "ver")]
    Version {
        /// Show detailed version information
        #[arg(long, help = "Show detailed version and build information")]
        detailed: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Initialize a new configuration file
    Init {
        /// Configuration file format
        #[arg(long, default_value = "json", help = "Configuration file format")]
        format: ConfigFormat,

        /// Overwrite existing configuration file
        #[arg(long, help = "Overwrite existing configuration file")]
        force: bool,
    },

    /// Show current configuration
    Show {
        /// Fill unset values with their defaults
        #[arg(long, help = "Show resolved configuration with defaults applied")]
        resolved: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    /// Human-readable output with colors
    Human,
    /// JSON format for programmatic consumption
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DataFormat {
    Json,
    Yaml,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ConfigFormat {
    /// JSON configuration format
    Json,
    /// TOML configuration format
    Toml,
    /// YAML configuration format
    Yaml,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle shell completion generation
    if let Some(shell) = cli.generate_completion {
        generate_completion_script(shell);
        return Ok(());
    }

    let use_colors = !cli.no_color && std::env::var("NO_COLOR").is_err();
    colored::control::set_override(use_colors);

    let log_level = match cli.verbose {
        0 => "bugomattic=error",
        1 => "bugomattic=warn",
        2 => "bugomattic=info",
        3 => "bugomattic=debug",
        _ => "bugomattic=trace",
    };
    unsafe {
        std::env::set_var("RUST_LOG", log_level);
    }
    init_tracing();

    match run_command(cli, use_colors) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("bugomattic failed: {}", e);
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

fn generate_completion_script(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

fn run_command(cli: Cli, use_colors: bool) -> Result<()> {
    let ctx = commands::Context::new(cli.config, use_colors);

    match cli.command {
        Some(Commands::Normalize { file, format }) => commands::normalize_command(&ctx, file, format),

        Some(Commands::Validate { file }) => commands::validate_command(&ctx, file),

        Some(Commands::Search { term, file, format }) => {
            commands::search_command(&ctx, file, term, format)
        }

        Some(Commands::Tree {
            file,
            expand,
            all,
            search,
        }) => commands::tree_command(&ctx, file, expand, all, search),

        Some(Commands::Tasks {
            node_id,
            file,
            format,
        }) => commands::tasks_command(&ctx, file, node_id, format),

        Some(Commands::Interactive { file, cache_size }) => {
            commands::interactive_command(&ctx, file, cache_size)
        }

        Some(Commands::Schema { tool }) => commands::schema_command(tool),

        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { format, force } => commands::config::init_command(format, force),
            ConfigAction::Show { resolved } => commands::config::show_command(&ctx, resolved),
        },

        Some(Commands::Version { detailed }) => {
            if detailed {
                println!("bugomattic {}", bugomattic_core::VERSION);
                println!("Build information:");
                println!("  Target: {}", std::env::consts::ARCH);
                println!("  OS: {}", std::env::consts::OS);
                if let Ok(profile) = std::env::var("PROFILE") {
                    println!("  Profile: {profile}");
                }
            } else {
                println!("{}", bugomattic_core::VERSION);
            }
            Ok(())
        }

        None => {
            // No subcommand provided, show help
            let mut cmd = Cli::command();
            cmd.print_help()?;
            Ok(())
        }
    }
}
