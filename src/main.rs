use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use enginext::{BuildConfig, Config, Platform};
use std::path::PathBuf;

mod commands;

/// enginext - Resolve engine plugin dependencies and write the load manifest
#[derive(Parser)]
#[command(name = "enginext")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Target platform (defaults to build.platform from config, then the host platform)
    #[arg(long, global = true, value_enum)]
    platform: Option<Platform>,

    /// Build configuration (defaults to build.config from config)
    #[arg(long = "config", global = true, value_enum)]
    build_config: Option<BuildConfig>,

    /// Plugin registry directory (overrides registry.root)
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a project's plugins and write the load manifest
    Require {
        /// Path to the project descriptor (.cryproject)
        project_file: PathBuf,

        /// Leave plugins missing from the registry out of the manifest instead of failing
        #[arg(long)]
        allow_missing: bool,

        /// Manifest path (defaults to cryext.txt next to the project descriptor)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the manifest instead of writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the project's requirement tree
    Tree {
        /// Path to the project descriptor (.cryproject)
        project_file: PathBuf,
    },

    /// Explain why a plugin is part of the project's load order
    Why {
        /// Path to the project descriptor (.cryproject)
        project_file: PathBuf,

        /// Plugin id
        plugin: String,
    },

    /// List plugins in the registry
    List,

    /// Manage configuration
    #[command(name = "config")]
    Settings {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., registry.root)
        key: String,
        /// Configuration value
        value: String,
    },

    /// Print the configuration file path
    Path,
}

fn main() {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "enginext", &mut std::io::stdout());
        return;
    }

    let config = match Config::load() {
        Ok(config) => config,
        // `config` subcommands run on defaults when the file is unreadable
        Err(e) if matches!(cli.command, Commands::Settings { .. }) => {
            eprintln!("Warning: {}", e);
            eprintln!("Falling back to default configuration");
            Config::default()
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    };

    let filter = enginext::logging::verbosity_filter(cli.verbose)
        .map(String::from)
        .or_else(|| config.logging.filter.clone());
    enginext::init_logging(filter.as_deref());

    let ctx = commands::Context::new(config, cli.platform, cli.build_config, cli.registry);

    let result = match cli.command {
        Commands::Require {
            project_file,
            allow_missing,
            output,
            dry_run,
        } => commands::require::run(&ctx, &project_file, allow_missing, output, dry_run),
        Commands::Tree { project_file } => commands::tree::run(&ctx, &project_file),
        Commands::Why {
            project_file,
            plugin,
        } => commands::why::run(&ctx, &project_file, &plugin),
        Commands::List => commands::list::run(&ctx),
        Commands::Settings { action } => commands::config::run(&ctx, &action),
        Commands::Completions { .. } => Ok(()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let code = e
            .downcast_ref::<enginext::Error>()
            .map(enginext::Error::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}
