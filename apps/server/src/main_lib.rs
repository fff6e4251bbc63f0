use std::sync::Arc;
use std::time::Instant;

use crate::config::{Config, LogFormat, StorageKind};
use crate::domain_events::WebDomainEventSink;
use paragliding_core::{
    events::DomainEventSink,
    ticker::{TickerService, TickerServiceTrait},
    tracks::{InMemoryTrackRepository, TrackRepositoryTrait, TrackService, TrackServiceTrait},
    webhooks::{
        Dispatcher, HttpWebhookNotifier, InMemoryWebhookRepository, WebhookRepositoryTrait,
        WebhookService, WebhookServiceTrait,
    },
};
use paragliding_igc::HttpTrackSource;
use paragliding_storage_sqlite::{
    create_pool, init, run_migrations, spawn_writer, TrackRepository, WebhookRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    /// Kept so the sink outlives every service holding a clone of it.
    #[allow(dead_code)]
    pub domain_event_sink: Arc<dyn DomainEventSink>,
    pub track_service: Arc<dyn TrackServiceTrait>,
    pub ticker_service: Arc<dyn TickerServiceTrait>,
    pub webhook_service: Arc<dyn WebhookServiceTrait>,
    pub dispatcher: Arc<Dispatcher>,
    pub started_at: Instant,
}

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init(),
    }
}

type Repositories = (
    Arc<dyn TrackRepositoryTrait>,
    Arc<dyn WebhookRepositoryTrait>,
);

fn build_repositories(config: &Config) -> anyhow::Result<Repositories> {
    match config.storage {
        StorageKind::Memory => {
            tracing::warn!("Using in-memory storage; tracks and webhooks are lost on restart");
            let tracks: Arc<dyn TrackRepositoryTrait> = Arc::new(InMemoryTrackRepository::new());
            let webhooks: Arc<dyn WebhookRepositoryTrait> =
                Arc::new(InMemoryWebhookRepository::new());
            Ok((tracks, webhooks))
        }
        StorageKind::Sqlite => {
            let db_path = init(&config.db_path)?;
            tracing::info!("Database path in use: {}", db_path);
            let pool = create_pool(&db_path)?;
            run_migrations(&pool)?;
            let writer = spawn_writer((*pool).clone());
            let tracks: Arc<dyn TrackRepositoryTrait> =
                Arc::new(TrackRepository::new(pool.clone(), writer.clone()));
            let webhooks: Arc<dyn WebhookRepositoryTrait> =
                Arc::new(WebhookRepository::new(pool, writer));
            Ok((tracks, webhooks))
        }
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let (track_repository, webhook_repository) = build_repositories(config)?;

    // Domain event sink - two-phase initialization: created before the track
    // service, worker started once the dispatcher exists.
    let domain_event_sink = Arc::new(WebDomainEventSink::new());

    let track_source = Arc::new(HttpTrackSource::new(config.fetch_timeout));
    let track_service = Arc::new(TrackService::new(
        track_repository.clone(),
        track_source,
        domain_event_sink.clone(),
    )?);
    let ticker_service = Arc::new(TickerService::new(track_repository.clone()));
    let webhook_service = Arc::new(WebhookService::new(
        webhook_repository.clone(),
        track_repository.clone(),
    ));

    let notifier = Arc::new(HttpWebhookNotifier::new(config.webhook_timeout));
    let dispatcher = Arc::new(Dispatcher::new(
        track_repository,
        webhook_repository,
        notifier,
    )?);
    domain_event_sink.start_worker(dispatcher.clone());

    Ok(Arc::new(AppState {
        domain_event_sink,
        track_service,
        ticker_service,
        webhook_service,
        dispatcher,
        started_at: Instant::now(),
    }))
}
