use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use documntr::{AppConfig, CodeAnalyzer, DocumntrError, OpenAIClient};
#[cfg(feature = "history")]
use documntr::FileHistoryStore;

const CONFIG_PATH: &str = "documntr.toml";

#[tokio::main]
async fn main() -> documntr::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = if Path::new(CONFIG_PATH).exists() {
        AppConfig::from_env_or_file(CONFIG_PATH)?
    } else {
        AppConfig::from_env()
    };

    let model = Arc::new(OpenAIClient::from_config(&config.model)?);
    let analyzer = CodeAnalyzer::new(model);
    #[cfg(feature = "history")]
    let analyzer = if config.history.enabled {
        analyzer
            .with_history(Box::new(FileHistoryStore::new(&config.history.file_path)))
            .await?
    } else {
        analyzer
    };

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|err| DocumntrError::Config(format!("invalid listen address: {err}")))?;

    documntr::server::serve(Arc::new(analyzer), addr).await
}
