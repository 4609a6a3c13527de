use anyhow::Context;
use premchat::{
    api::{ChatBackend, HttpBackend},
    app::App,
    chatbot::{Chatbot, Identities},
    config::load_config,
    logging::init_logging,
    storage::FileStorage,
    ui::run_ui,
};
use std::sync::Arc;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = load_config().context("Failed to load configuration")?;
    let _logger = init_logging(&config.log_level, &config.log_dir()?)
        .context("Failed to start logging")?;
    log::info!("Starting premchat against {}", config.base_url);

    let storage_path = config.storage_path()?;
    let storage = FileStorage::open(&storage_path)
        .with_context(|| format!("Failed to open storage at {}", storage_path.display()))?;
    let backend: Arc<dyn ChatBackend> = Arc::new(HttpBackend::from_config(&config)?);

    let chatbot = Chatbot::new(
        storage,
        Identities::from_config(&config),
        config.failure_policy,
    );
    let (tx, rx) = mpsc::unbounded_channel();
    let mut app = App::new(chatbot, backend, tx);

    run_ui(&mut app, rx).await.context("Terminal UI failed")?;
    log::info!("premchat exited");
    Ok(())
}
