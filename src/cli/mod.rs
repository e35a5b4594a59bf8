// src/cli/mod.rs — CLI definition (clap derive)

pub mod chat;
pub mod migrate;
pub mod status;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tripmate", about = "AI travel planner and chat assistant", version)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive session (default)
    Chat,
    /// Serve the JSON HTTP API
    Serve {
        /// Port to listen on (overrides [api].port)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Show config, database and model status
    Status,
    /// Run or inspect database migrations
    Migrate {
        /// Only show applied migrations
        #[arg(long)]
        status: bool,
        /// Roll back the newest migration
        #[arg(long)]
        rollback: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_none() {
        let cli = Cli::try_parse_from(["tripmate"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_serve_with_port() {
        let cli = Cli::try_parse_from(["tripmate", "serve", "--port", "9000"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Serve { port: Some(9000) })));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["tripmate", "chat", "--config", "/tmp/c.toml", "-v"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some("/tmp/c.toml"));
        assert!(cli.verbose);
    }

    #[test]
    fn test_migrate_flags() {
        let cli = Cli::try_parse_from(["tripmate", "migrate", "--status"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Migrate {
                status: true,
                rollback: false
            })
        ));
    }
}
