// CLI module for administrative operations requiring server access

pub mod admin;
pub mod migrate;

use clap::{Parser, Subcommand};

use crate::app_data::AppData;

/// castgate CLI
#[derive(Parser, Debug)]
#[command(name = "castgate")]
#[command(about = "Tenant-scoped authorization gate for the casting marketplace", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Create an administrator account with a generated password
    CreateAdmin {
        /// Email of the new administrator
        #[arg(long)]
        email: String,

        /// Grant SUPER_ADMIN instead of ADMIN
        #[arg(long)]
        super_admin: bool,
    },
}

impl Cli {
    /// Subcommand to run, `serve` when none was given
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}

/// Execute a command that needs AppData
///
/// `serve` and `migrate` are handled by the binary before AppData exists.
///
/// # Returns
/// * `Ok(())` - Command executed successfully
/// * `Err(...)` - Command execution failed
pub async fn execute_command(command: Commands, app_data: &AppData) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::CreateAdmin { email, super_admin } => {
            admin::create_admin(app_data, &email, super_admin).await?;
        }
        Commands::Serve | Commands::Migrate => {
            tracing::debug!("{:?} is handled by the binary", command);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["castgate"]).unwrap();
        assert_eq!(cli.command(), Commands::Serve);
    }

    #[test]
    fn test_create_admin_arguments() {
        let cli = Cli::try_parse_from(["castgate", "create-admin", "--email", "ops@example.com", "--super-admin"])
            .unwrap();
        assert_eq!(
            cli.command(),
            Commands::CreateAdmin {
                email: "ops@example.com".to_string(),
                super_admin: true,
            }
        );
    }

    #[test]
    fn test_create_admin_requires_email() {
        assert!(Cli::try_parse_from(["castgate", "create-admin"]).is_err());
    }
}
