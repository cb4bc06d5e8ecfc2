//! CLI commands

use anyhow::{Context, Result};
use cbg_core::adapters::FileStorage;
use cbg_core::{ApiConfig, Credential};
use cbg_http::{ApiClient, ClientError, Method};
use clap::Subcommand;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::navigator::TerminalNavigator;

#[derive(Subcommand)]
pub enum Commands {
    /// Store a session token obtained from the web login
    Login {
        /// Bearer token
        #[arg(long, env = "CBG_TOKEN", hide_env_values = true)]
        token: String,

        /// Id of the signed-in user
        #[arg(long)]
        user_id: Option<String>,

        /// Role of the signed-in user
        #[arg(long, requires = "user_id")]
        role: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show whether a session is stored
    Status,

    /// Send a raw request and print the JSON response
    Request {
        /// HTTP method
        #[arg(value_parser = parse_method)]
        method: Method,

        /// Path relative to the API base URL, e.g. /students
        path: String,

        /// JSON request body
        #[arg(long)]
        data: Option<String>,
    },

    /// List boarding students, or show one
    Students {
        /// Student id
        id: Option<String>,
    },

    /// List dormitories, or show one
    Dormitories {
        /// Dormitory id
        id: Option<String>,

        /// List the beds of the dormitory instead
        #[arg(long, requires = "id")]
        beds: bool,
    },

    /// List notifications
    Notifications {
        /// Only unread notifications
        #[arg(long)]
        unread: bool,

        /// Mark a notification as read
        #[arg(long, value_name = "ID")]
        mark_read: Option<String>,
    },
}

fn parse_method(value: &str) -> Result<Method, String> {
    Method::from_bytes(value.to_ascii_uppercase().as_bytes())
        .map_err(|_| format!("invalid HTTP method: {value}"))
}

impl Commands {
    pub async fn execute(self, config: &ApiConfig, session_path: &Path) -> Result<()> {
        let storage = Arc::new(FileStorage::new(session_path));
        let navigator = Arc::new(TerminalNavigator::new());
        let client = ApiClient::new(config, storage, navigator.clone())
            .context("Failed to create API client")?;

        match self {
            Commands::Login {
                token,
                user_id,
                role,
            } => {
                let mut credential = Credential::new(token);
                credential.user_id = user_id;
                credential.user_role = role;
                client.credentials().save(&credential)?;
                info!("Stored session at {}", session_path.display());
                println!("Signed in.");
                Ok(())
            }
            Commands::Logout => {
                client.logout()?;
                println!("Signed out.");
                Ok(())
            }
            Commands::Status => {
                match client.credentials().load()? {
                    Some(credential) => {
                        println!("Signed in");
                        if let Some(user_id) = &credential.user_id {
                            println!("  user: {user_id}");
                        }
                        if let Some(role) = &credential.user_role {
                            println!("  role: {role}");
                        }
                    }
                    None => println!("Not signed in"),
                }
                println!("  api:  {}", client.base_url());
                Ok(())
            }
            Commands::Request { method, path, data } => {
                let mut request = client.request(method, &path);
                if let Some(data) = data {
                    let body: Value =
                        serde_json::from_str(&data).context("--data is not valid JSON")?;
                    request = request.json(&body)?;
                }
                let response = client.send(request).await.map_err(|e| explain(e, &navigator))?;
                let text = response.text().await?;
                print_body(&text);
                Ok(())
            }
            Commands::Students { id } => {
                let value = match id {
                    Some(id) => to_json(client.get_student(&id).await),
                    None => to_json(client.list_students().await),
                };
                print_json(value.map_err(|e| explain(e, &navigator))?)
            }
            Commands::Dormitories { id, beds } => {
                let value = match (id, beds) {
                    (Some(id), true) => to_json(client.list_beds(&id).await),
                    (Some(id), false) => to_json(client.get_dormitory(&id).await),
                    (None, _) => to_json(client.list_dormitories().await),
                };
                print_json(value.map_err(|e| explain(e, &navigator))?)
            }
            Commands::Notifications { unread, mark_read } => {
                let value = match mark_read {
                    Some(id) => to_json(client.mark_notification_read(&id).await),
                    None => to_json(client.list_notifications(unread).await),
                };
                print_json(value.map_err(|e| explain(e, &navigator))?)
            }
        }
    }
}

fn to_json<T: serde::Serialize>(result: Result<T, ClientError>) -> Result<Value, ClientError> {
    Ok(serde_json::to_value(result?)?)
}

/// Turn a client error into the message shown to the user
fn explain(error: ClientError, navigator: &TerminalNavigator) -> anyhow::Error {
    if navigator.redirected() {
        return anyhow::Error::new(error).context("Session expired");
    }
    anyhow::Error::new(error)
}

fn print_json(value: Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn print_body(text: &str) {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(pretty) => println!("{pretty}"),
            Err(_) => println!("{text}"),
        },
        Err(_) if text.is_empty() => {}
        Err(_) => println!("{text}"),
    }
}
