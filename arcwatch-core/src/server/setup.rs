use crate::conf::ArcwatchConfig;
use crate::enrichment::{GeoError, GeoResolver, build_resolver};
use crate::event::RawEvent;
use crate::hub::BroadcastHub;
use crate::ingest::log_source::spawn_log_source;
use crate::ingest::{RawEventSink, RequestObserver, raw_event_channel};
use crate::pipeline::IngestionPipeline;
use crate::server::{AppState, HEALTH_PATH, VIEWER_CONFIG_PATH, ViewerSettings, build_router};
use crate::shutdown::Shutdown;
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),

    #[error(transparent)]
    Geo(#[from] GeoError),
}

/// A fully wired instance, ready to serve on a listener.
pub struct Arcwatch {
    cfg: ArcwatchConfig,
    pipeline: Arc<IngestionPipeline>,
    router: Router,
    sink: RawEventSink,
    rx: mpsc::Receiver<RawEvent>,
}

/// Wire hub, pipeline, observer and router. Nothing runs until [`Arcwatch::serve`].
pub fn build(cfg: ArcwatchConfig, resolver: Arc<dyn GeoResolver>) -> Arcwatch {
    let (sink, rx) = raw_event_channel(cfg.server.ingest_buffer);

    let hub = Arc::new(BroadcastHub::new(cfg.viewer.send_buffer));
    let pipeline = Arc::new(IngestionPipeline::new(
        resolver,
        cfg.history.capacity,
        hub,
    ));

    let observer = Arc::new(RequestObserver::new(
        sink.clone(),
        cfg.identity.trusted_networks(),
        [
            cfg.server.stream_path.as_str(),
            VIEWER_CONFIG_PATH,
            HEALTH_PATH,
        ],
    ));

    let state = AppState {
        pipeline: pipeline.clone(),
        observer,
        viewer: Arc::new(ViewerSettings::from_config(&cfg)),
    };

    let router = build_router(
        state,
        &cfg.server.stream_path,
        cfg.server.static_dir.as_deref(),
    );

    Arcwatch {
        cfg,
        pipeline,
        router,
        sink,
        rx,
    }
}

impl Arcwatch {
    pub fn pipeline(&self) -> &Arc<IngestionPipeline> {
        &self.pipeline
    }

    /// Serve until `shutdown` resolves, then stop the log reader, drain the
    /// pipeline and close every viewer.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Arcwatch {
            cfg,
            pipeline,
            router,
            sink,
            rx,
        } = self;

        let stop = Shutdown::new();

        let pipeline_task = tokio::spawn(pipeline.clone().run(rx, stop.signal()));
        let log_task = spawn_log_source(&cfg.log_source, sink, stop.signal()).await;

        info!(
            addr = ?listener.local_addr().ok(),
            stream_path = %cfg.server.stream_path,
            history_capacity = cfg.history.capacity,
            "arcwatch listening"
        );

        let trigger = stop.clone();
        let served = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            shutdown.await;
            info!("shutdown requested");
            // Closing the hub ends every open viewer stream.
            trigger.trigger();
        })
        .await;

        stop.trigger();

        if let Err(e) = pipeline_task.await {
            warn!(error = %e, "ingestion pipeline task failed");
        }
        if let Some(task) = log_task {
            if let Err(e) = task.await {
                warn!(error = %e, "log source task failed");
            }
        }

        info!("arcwatch stopped");
        served.map_err(ServerError::Serve)
    }
}

/// Load the resolver, bind, and serve until ctrl-c or SIGTERM.
pub async fn run(cfg: ArcwatchConfig) -> Result<(), ServerError> {
    let resolver = build_resolver(&cfg.geoip)?;

    let listener = TcpListener::bind(cfg.server.listen.as_str())
        .await
        .map_err(|source| ServerError::Bind {
            addr: cfg.server.listen.clone(),
            source,
        })?;

    build(cfg, resolver).serve(listener, shutdown_signal()).await
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install ctrl-c handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
