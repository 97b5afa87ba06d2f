//! CLI argument definitions.

use clap::{Parser, Subcommand};

/// Hyperlocal multi-vendor marketplace backend
#[derive(Parser, Debug)]
#[command(name = "marketplace")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Create the Basic, Standard and Premium plans on an empty plan table
    SeedPlans,

    /// Mint a bearer token for a registered user (development only)
    Token(TokenArgs),
}

/// Arguments for the serve command; unset values fall back to the environment config
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

#[derive(Parser, Debug)]
pub struct TokenArgs {
    /// Email of an existing, active user
    #[arg(short, long)]
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_migrate_action() {
        let cli = Cli::parse_from(["marketplace", "migrate", "status"]);
        assert!(matches!(
            cli.command,
            Commands::Migrate(MigrateArgs {
                action: MigrateAction::Status
            })
        ));
    }

    #[test]
    fn serve_overrides_are_optional() {
        let cli = Cli::parse_from(["marketplace", "serve", "--port", "8080"]);
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, Some(8080));
                assert_eq!(args.host, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn token_requires_email() {
        assert!(Cli::try_parse_from(["marketplace", "token"]).is_err());
        let cli = Cli::parse_from(["marketplace", "seed-plans"]);
        assert!(matches!(cli.command, Commands::SeedPlans));
    }
}
