//! CLI commands

use anyhow::{Context, Result};
use chatdesk_http::types::ServerListQuery;
use chatdesk_http::{ApiClient, ResourceClient};
use clap::Subcommand;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{error, info};

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session
    Login {
        /// Account username
        #[arg(short, long)]
        username: String,

        /// Account password
        #[arg(short, long, env = "CHATDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show whether a session is stored
    Status,

    /// List server categories
    Categories,

    /// List servers
    Servers {
        /// Only servers in this category
        #[arg(long)]
        category: Option<String>,

        /// Maximum number of servers
        #[arg(long)]
        qty: Option<u32>,

        /// Only servers you are a member of
        #[arg(long)]
        by_user: bool,

        /// Only the server with this ID
        #[arg(long)]
        server_id: Option<u64>,

        /// Include member counts
        #[arg(long)]
        with_num_members: bool,
    },
}

impl Commands {
    pub async fn execute(self, client: &ApiClient) -> Result<()> {
        match self {
            Self::Login { username, password } => {
                client
                    .login(&username, &password)
                    .await
                    .context("login failed")?;
                println!("Logged in as {username}");
                Ok(())
            }
            Self::Logout => {
                client.logout().await?;
                println!("Logged out");
                Ok(())
            }
            Self::Status => {
                if client.session().is_authenticated().await? {
                    println!("Logged in");
                } else {
                    println!("Not logged in");
                }
                Ok(())
            }
            Self::Categories => print_resource(&client.categories_resource()).await,
            Self::Servers {
                category,
                qty,
                by_user,
                server_id,
                with_num_members,
            } => {
                let query = ServerListQuery {
                    category,
                    qty,
                    by_user,
                    by_serverid: server_id,
                    with_num_members,
                };
                print_resource(&client.servers_resource(&query)).await
            }
        }
    }
}

/// Fetch a list resource and print it as pretty JSON
async fn print_resource<T>(resource: &ResourceClient<T>) -> Result<()>
where
    T: DeserializeOwned + Clone + Serialize,
{
    if let Err(e) = resource.fetch_data().await {
        if let Some(recorded) = resource.error() {
            error!(kind = ?recorded.kind, status = ?recorded.status, "request rejected");
        }
        return Err(e).with_context(|| format!("failed to fetch {}", resource.path()));
    }

    let state = resource.state();
    info!(count = state.data.len(), path = resource.path(), "fetched");
    println!("{}", serde_json::to_string_pretty(&state.data)?);
    Ok(())
}
