use anyhow::Result;
use clap::{Parser, Subcommand};
use db_archiver::managers::backup::BackupManager;
use db_archiver::managers::logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "db-archiver")]
#[command(about = "Stage, dump, and archive database backups", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "/etc/db-archiver/config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run backups for all enabled databases or a specific one
    Run {
        /// Specific database to back up (defaults to all enabled databases)
        #[arg(short, long)]
        database: Option<String>,

        /// Keep the raw dump directory after the archive is stored
        #[arg(long)]
        keep_raw: bool,
    },

    /// List all configured databases
    List,

    /// Validate configuration file
    Validate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load and validate configuration
    let config = db_archiver::config::load_config(&cli.config)?;

    // Validate needs no file logging
    if matches!(cli.command, Commands::Validate) {
        logging::init_console_logging();
        println!("Configuration is valid!");
        println!("Databases: {}", config.databases.len());
        return Ok(());
    }

    // Setup logging with file rotation (must keep guard alive)
    let logging_config = logging::LoggingConfig::from_config(
        &config.global.log_directory,
        &config.global.log_level,
        config.global.log_max_files,
        config.global.log_max_size_mb,
    );
    let _log_guard = logging::init_logging(&logging_config)?;

    match cli.command {
        Commands::Run { database, keep_raw } => {
            let manager = BackupManager::new(config, keep_raw);

            if let Some(name) = database {
                println!("Running backup for database: {}", name);
                match manager.backup_database(&name)? {
                    Some(archive) => {
                        println!("✓ Backup completed: {}", archive.display());
                    }
                    None => {
                        println!("Database '{}' is disabled, nothing to do", name);
                    }
                }
            } else {
                println!("Running backups for all enabled databases...");
                manager.backup_all()?;
                println!("✓ All backups completed successfully");
            }
        }

        Commands::List => {
            println!("Configured databases:");
            let mut names: Vec<_> = config.databases.keys().cloned().collect();
            names.sort();
            for name in names {
                let database = &config.databases[&name];
                println!("  {}", name);
                if !database.description.is_empty() {
                    println!("    Description: {}", database.description);
                }
                println!("    Engine: {:?}", database.engine);
                println!("    Database: {}", database.database);
                println!("    Enabled: {}", database.enabled);
                println!();
            }
        }

        Commands::Validate => unreachable!("handled before logging setup"),
    }

    Ok(())
}
