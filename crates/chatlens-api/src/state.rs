//! Application state wiring all services together.
//!
//! The session controller and analysis pipeline are generic over their
//! collaborator ports; AppState pins them to the concrete infra
//! implementations.

use std::path::PathBuf;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use chatlens_core::analysis::AnalysisPipeline;
use chatlens_core::session::{SessionBus, SessionController};
use chatlens_infra::bridge::BridgeChatClient;
use chatlens_infra::config::{
    API_KEY_ENV, BRIDGE_TOKEN_ENV, analysis_config, database_url, load_config, request_timeout,
    secret_from_env,
};
use chatlens_infra::embedding::OpenAiEmbedder;
use chatlens_infra::llm::OpenAiCompatibleProvider;
use chatlens_infra::llm::openai_compat::config::compatible;
use chatlens_infra::pairing::QrSvgRenderer;
use chatlens_infra::sqlite::embedding::SqliteEmbeddingRepository;
use chatlens_infra::sqlite::pool::DatabasePool;
use chatlens_types::config::ChatlensConfig;

/// Lifecycle events buffered between the bridge listener and the controller.
const LIFECYCLE_CHANNEL_CAPACITY: usize = 32;

pub type ConcreteSession = SessionController<BridgeChatClient>;

pub type ConcretePipeline = AnalysisPipeline<
    BridgeChatClient,
    OpenAiEmbedder,
    OpenAiCompatibleProvider,
    SqliteEmbeddingRepository,
>;

/// Shared application state used by both the CLI and the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<ConcreteSession>,
    pub pipeline: Arc<ConcretePipeline>,
    pub config: Arc<ChatlensConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Load `config.toml` and secrets from the environment, then wire services.
    pub async fn init(data_dir: PathBuf) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&data_dir).await?;
        let config = load_config(&data_dir).await;

        let api_key = secret_from_env(API_KEY_ENV).unwrap_or_else(|| {
            tracing::warn!("{API_KEY_ENV} is not set; embedding and analysis requests will fail");
            SecretString::from("")
        });
        let bridge_token = secret_from_env(BRIDGE_TOKEN_ENV);

        Self::build(config, data_dir, &api_key, bridge_token).await
    }

    /// Wire services from an already loaded configuration.
    ///
    /// Nothing is started: no listener, no client initialization.
    pub async fn build(
        config: ChatlensConfig,
        data_dir: PathBuf,
        api_key: &SecretString,
        bridge_token: Option<SecretString>,
    ) -> anyhow::Result<Self> {
        let db_pool = DatabasePool::new(&database_url(&config, &data_dir)).await?;
        let timeout = request_timeout(&config);

        let client = BridgeChatClient::new(&config.bridge.base_url, bridge_token, timeout)?;
        let session = Arc::new(SessionController::new(
            client,
            Box::new(QrSvgRenderer::default()),
            SessionBus::default(),
        ));

        let mut http = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            http = http.timeout(timeout);
        }
        let embedder = OpenAiEmbedder::new(
            http.build()?,
            SecretString::from(api_key.expose_secret()),
            config.embedding.base_url.clone(),
            config.embedding.model.clone(),
        );
        let provider = OpenAiCompatibleProvider::new(compatible(
            &config.completion.base_url,
            api_key.expose_secret(),
            &config.completion.model,
        ));

        let pipeline = AnalysisPipeline::new(
            Arc::clone(&session),
            embedder,
            provider,
            SqliteEmbeddingRepository::new(db_pool),
            analysis_config(&config),
        );

        Ok(Self {
            session,
            pipeline: Arc::new(pipeline),
            config: Arc::new(config),
            data_dir,
        })
    }

    /// Connect the bridge event stream to the controller and initialize the
    /// messaging client.
    ///
    /// A failed initialization is logged, not fatal: the bridge may come up
    /// later and the listener keeps reconnecting until `cancel` fires.
    pub async fn start_session(&self, cancel: CancellationToken) -> anyhow::Result<()> {
        let (tx, rx) = mpsc::channel(LIFECYCLE_CHANNEL_CAPACITY);

        let session = Arc::clone(&self.session);
        tokio::spawn(async move { session.drive(rx).await });

        self.session.client().spawn_listener(tx, cancel)?;

        if let Err(e) = self.session.start().await {
            tracing::warn!(error = %e, "messaging client did not initialize, waiting for bridge");
        }
        Ok(())
    }
}
