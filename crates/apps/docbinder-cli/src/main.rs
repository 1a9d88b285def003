//! Docbinder CLI binary entry point.

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use docbinder_cli::{
    cli::{Cli, Commands, NamedCommands, UserCommands},
    commands,
    config::{default_config_path, CliConfig},
    error::{CliError, CliResult},
    output::OutputFormat,
};

fn main() {
    let cli = Cli::parse();

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    rt.block_on(async_main(cli));
}

async fn async_main(cli: Cli) {
    // Initialize logging based on --verbose flag or RUST_LOG env var
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if cli.verbose || has_rust_log {
        let filter = if cli.verbose {
            EnvFilter::from_default_env().add_directive("docbinder=debug".parse().unwrap())
        } else {
            EnvFilter::from_default_env()
        };
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }

    match run(cli).await {
        Ok(output) => println!("{}", output),
        Err(e) => {
            print_error(&e);
            std::process::exit(e.exit_code());
        }
    }
}

/// Print the error, any field messages, and a recovery hint.
fn print_error(e: &CliError) {
    if let CliError::Ops(ops) = e {
        if let Some(errors) = ops.field_errors() {
            eprintln!("{}: the document was not saved", "Error".red().bold());
            for error in errors.iter() {
                match &error.field {
                    Some(field) => eprintln!("  {} {}", format!("{}:", field).yellow(), error.message),
                    None => eprintln!("  {}", error.message),
                }
            }
            if let Some(suggestion) = e.suggestion() {
                eprintln!("{}: {}", "Hint".cyan(), suggestion);
            }
            return;
        }
    }

    eprintln!("{}: {}", "Error".red().bold(), e);
    if let Some(suggestion) = e.suggestion() {
        eprintln!("{}: {}", "Hint".cyan(), suggestion);
    }
}

async fn run(cli: Cli) -> CliResult<String> {
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = CliConfig::load(&config_path)?;
    let format: OutputFormat = cli.format.into();
    let actor = cli.actor.as_deref();

    match cli.command {
        // Setup
        Commands::Init => commands::init(config, format, &config_path),
        Commands::User {
            action: UserCommands::Add(args),
        } => commands::user_add(config, format, args),
        Commands::Program {
            action: NamedCommands::Add { name },
        } => commands::program_add(config, format, &name),
        Commands::DocumentType {
            action: NamedCommands::Add { name },
        } => commands::type_add(config, format, &name),

        // Documents
        Commands::Upload(args) => commands::upload(config, format, actor, args).await,
        Commands::Edit(args) => commands::edit(config, format, actor, args).await,
        Commands::Delete { id, yes } => commands::delete(config, format, actor, id, yes).await,
        Commands::Show { id } => commands::show(config, format, actor, id),
        Commands::List(args) => commands::list(config, format, actor, args),
        Commands::Search(args) => commands::search(config, format, actor, args),

        // Maintenance
        Commands::Reindex => commands::reindex(config, format).await,
    }
}
