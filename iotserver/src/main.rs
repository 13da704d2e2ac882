use iot_axum::{AppState, auth::signed_token, start_server};
use iot_influx::Influx;
use iotserver::{AppConfig, Cli, Commands};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Every request is logged at info, so that is the floor unless RUST_LOG
    // says otherwise.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::import()?;
    let AppConfig {
        server,
        store,
        auth,
        query,
    } = AppConfig::load(&cli)?;

    match cli.command.unwrap_or_default() {
        Commands::Serve => {
            let validator = auth.validator()?;
            if validator.is_none() {
                tracing::warn!("authentication is disabled, /data is open to anyone");
            }
            let store = Influx::open(&store)?;
            start_server(server, AppState::new(store, query, validator)).await?;
        }
        Commands::MintToken { subject, lifetime } => {
            if auth.secret.is_empty() {
                anyhow::bail!("auth.secret must be set to mint tokens");
            }
            let token = signed_token::generate(&subject, auth.secret.as_bytes(), lifetime.into())?;
            println!("{token}");
        }
    }

    Ok(())
}
