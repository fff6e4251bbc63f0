use paragliding_server::{api::app_router, build_state, config::Config, init_tracing, scheduler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);
    let state = build_state(&config).await?;

    match &config.clock_sink_url {
        Some(sink_url) => {
            scheduler::start_clock_trigger(
                state.dispatcher.clone(),
                sink_url.clone(),
                config.clock_interval,
            );
        }
        None => tracing::info!("PG_CLOCK_SINK_URL not set; clock trigger disabled"),
    }

    let router = app_router(state, &config);
    tracing::info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
