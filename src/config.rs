// ⚙️ Configuration - command line flags, each backed by an env var

use crate::catalog::DEFAULT_CATALOG_URL;
use crate::client::DEFAULT_SERVER_URL;
use crate::credential::CredentialStore;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

// ============================================================================
// CLIENT
// ============================================================================

/// Reorder the pokemon catalog into a priority list and sync it with saved
/// instances.
#[derive(Debug, Parser)]
#[command(name = "pokeprio", version)]
pub struct ClientConfig {
    #[command(flatten)]
    pub catalog: CatalogSource,

    /// Instance API base URL
    #[arg(long = "server", env = "POKEPRIO_SERVER", default_value = DEFAULT_SERVER_URL)]
    pub server_url: String,

    /// Where the login credential is kept
    #[arg(long, env = "POKEPRIO_CREDENTIAL_FILE")]
    pub credential_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<ClientCommand>,
}

impl ClientConfig {
    pub fn credential_path(&self) -> PathBuf {
        self.credential_file
            .clone()
            .unwrap_or_else(CredentialStore::default_path)
    }
}

#[derive(Debug, Args)]
pub struct CatalogSource {
    /// Catalog endpoint returning {id: {name, ...}}
    #[arg(long, env = "POKEPRIO_CATALOG_URL", default_value = DEFAULT_CATALOG_URL)]
    pub catalog_url: String,

    /// Read the catalog from a local JSON file instead of the endpoint
    #[arg(long, env = "POKEPRIO_CATALOG_FILE")]
    pub catalog_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum ClientCommand {
    /// Interactive editor (default)
    Ui,
    /// Check a one-id-per-line file against the catalog
    Validate { file: PathBuf },
    /// Print the repaired order for a file, or rewrite it in place
    Fix {
        file: PathBuf,
        #[arg(long)]
        in_place: bool,
    },
    /// List saved instances
    Instances,
}

// ============================================================================
// SERVER
// ============================================================================

/// Password-gated instance API
#[derive(Debug, Parser)]
#[command(name = "priority-server", version)]
pub struct ServerConfig {
    /// SQLite database file holding the instance table
    #[arg(long, env = "PRIORITY_DATABASE", default_value = "instances.db")]
    pub database: PathBuf,

    /// Shared secret every API call must present
    #[arg(long, env = "PASSWORD", hide_env_values = true)]
    pub password: String,

    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Pooled database connections
    #[arg(long, env = "PRIORITY_POOL_SIZE", default_value_t = 4)]
    pub pool_size: u32,

    #[command(subcommand)]
    pub command: Option<ServerCommand>,
}

#[derive(Debug, Subcommand)]
pub enum ServerCommand {
    /// Serve the API (default)
    Serve,
    /// Create the instance table
    InitDb,
    /// Insert a new instance row
    AddInstance {
        name: String,
        #[arg(long = "type", default_value = crate::instance::INSTANCE_TYPE)]
        kind: String,
        /// Initial data blob (JSON object)
        #[arg(long, default_value = r#"{"pokemon_ids":[]}"#)]
        data: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_defaults() {
        let config = ClientConfig::try_parse_from(["pokeprio"]).unwrap();
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.catalog.catalog_url, DEFAULT_CATALOG_URL);
        assert!(config.command.is_none());
    }

    #[test]
    fn test_client_fix_command() {
        let config = ClientConfig::try_parse_from([
            "pokeprio",
            "--catalog-file",
            "catalog.json",
            "fix",
            "order.txt",
            "--in-place",
        ])
        .unwrap();

        assert_eq!(config.catalog.catalog_file, Some(PathBuf::from("catalog.json")));
        match config.command {
            Some(ClientCommand::Fix { file, in_place }) => {
                assert_eq!(file, PathBuf::from("order.txt"));
                assert!(in_place);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_server_flags() {
        let config = ServerConfig::try_parse_from([
            "priority-server",
            "--password",
            "secret",
            "--port",
            "8080",
            "add-instance",
            "Hundos",
        ])
        .unwrap();

        assert_eq!(config.password, "secret");
        assert_eq!(config.port, 8080);
        assert_eq!(config.pool_size, 4);
        match config.command {
            Some(ServerCommand::AddInstance { name, kind, .. }) => {
                assert_eq!(name, "Hundos");
                assert_eq!(kind, "pokemon_iv");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
