//! Folio - command-line front end for the admin API.
//!
//! Wires the file-backed credential jar and session, the reqwest transport
//! and the authenticated client together, then runs one command.

mod cli;

use std::sync::Arc;

use folio_application::{ApiClient, AuthService, ClientSettings, CredentialStore, SessionState};
use folio_domain::HttpMethod;
use folio_infrastructure::{
    ClientConfig, FileCredentialStorage, FileSessionStorage, ReqwestTransport, SystemClock,
    TracingNavigator,
};
use serde_json::Value;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::Command;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let command = Command::parse(std::env::args().skip(1))?;
    let config = ClientConfig::from_env()?;
    tracing::debug!(
        base_url = %config.api_base_url,
        data_dir = %config.data_dir.display(),
        "Folio v{}",
        env!("CARGO_PKG_VERSION")
    );

    let clock = Arc::new(SystemClock::new());
    let credentials = Arc::new(CredentialStore::new(
        Arc::new(FileCredentialStorage::new(&config.data_dir, clock.clone())),
        clock,
    ));
    let session = Arc::new(SessionState::restore(Arc::new(FileSessionStorage::new(
        &config.data_dir,
    ))));
    let navigator = Arc::new(TracingNavigator::new(config.default_locale.localize("/")));
    let client = Arc::new(ApiClient::new(
        ClientSettings::new(config.api_base_url.clone()),
        Arc::new(ReqwestTransport::new()?),
        credentials,
        session.clone(),
        navigator,
    ));
    let auth = AuthService::new(client.clone(), session);

    run(command, &client, &auth).await
}

async fn run(
    command: Command,
    client: &ApiClient,
    auth: &AuthService,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Login { email, password } => match auth.login(&email, &password).await? {
            Some(identity) => println!("signed in as {}", identity.display_name()),
            None => println!("signed in"),
        },
        Command::Register { email, password } => {
            auth.register(&email, &password).await?;
            println!("registered {email}");
        }
        Command::Logout => {
            auth.logout()?;
            println!("signed out");
        }
        Command::WhoAmI => match auth.session().identity() {
            Some(identity) => println!("{}", serde_json::to_string_pretty(&identity)?),
            None => println!("not signed in"),
        },
        Command::Profile { user_id } => {
            let identity = auth.fetch_profile(&user_id).await?;
            println!("{}", serde_json::to_string_pretty(&identity)?);
        }
        Command::Call { method, path, body } => {
            let body = body.unwrap_or(Value::Null);
            let value: Value = match method {
                HttpMethod::Get => client.get(&path).await?,
                HttpMethod::Delete => client.delete(&path).await?,
                HttpMethod::Post => client.post(&path, &body).await?,
                HttpMethod::Patch => client.patch(&path, &body).await?,
                HttpMethod::Put => client.put(&path, &body).await?,
            };
            if !value.is_null() {
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
        }
    }
    Ok(())
}
