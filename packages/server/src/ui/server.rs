//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::get,
};
use roomcast_shared::time::{Clock, SystemClock};
use tokio::{net::TcpListener, sync::Mutex};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::ServerConfig,
    domain::{RoomRegistry, RoomRepository},
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    usecase::{BroadcastRouter, GetRoomDetailUseCase, ListRoomsUseCase},
};

use super::{
    gateway::Gateway,
    handler::{get_room_detail, get_rooms, health_check, websocket_handler},
    reaper::IdleReaper,
    signal::shutdown_signal,
    state::AppState,
};

pub type ServerError = Box<dyn std::error::Error + Send + Sync>;

/// Room coordinator server
///
/// ```ignore
/// let server = Server::new(ServerConfig::parse());
/// server.run().await?;
/// ```
pub struct Server {
    config: ServerConfig,
    clock: Arc<dyn Clock>,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the wall clock, e.g. with a manually advanced one
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Bind to the configured address and serve until Ctrl+C / SIGTERM
    pub async fn run(self) -> Result<(), ServerError> {
        let bind_addr = self.config.bind_addr();
        let listener = TcpListener::bind(&bind_addr).await?;
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    ///
    /// After the HTTP server has drained, the reaper and the gateway are
    /// stopped in that order.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let config = self.config;

        // 1. Repository (in-memory registry)
        let registry = RoomRegistry::new(config.max_players()?);
        let repository: Arc<dyn RoomRepository> =
            Arc::new(InMemoryRoomRepository::new(Arc::new(Mutex::new(registry))));

        // 2. Broadcast Router over the WebSocket MessagePusher
        let router = Arc::new(BroadcastRouter::new(Arc::new(WebSocketMessagePusher::new())));

        // 3. Gateway and reaper
        let (gateway, gateway_task) = Gateway::new(
            repository.clone(),
            router,
            self.clock,
            config.room_idle_timeout(),
        )
        .spawn();
        let reaper = match IdleReaper::new(gateway.clone(), config.reaper_interval()) {
            Ok(reaper) => reaper.start(),
            Err(e) => {
                if gateway.stop().is_ok() {
                    gateway_task.await.ok();
                }
                return Err(e.into());
            }
        };

        // 4. HTTP
        let app_state = Arc::new(AppState {
            gateway: gateway.clone(),
            list_rooms_usecase: Arc::new(ListRoomsUseCase::new(repository.clone())),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(repository)),
        });
        let cors = CorsLayer::new()
            .allow_origin(config.cors_allowed_origin.parse::<HeaderValue>()?)
            .allow_methods([Method::GET]);

        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        tracing::info!(
            "Roomcast server listening on {} (max {} players/room, idle timeout {:?}, sweep every {:?})",
            listener.local_addr()?,
            config.max_players_per_room,
            config.room_idle_timeout(),
            config.reaper_interval()
        );

        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await;

        reaper.stop().await;
        if gateway.stop().is_ok()
            && let Err(e) = gateway_task.await
        {
            tracing::error!("Gateway task failed: {}", e);
        }
        served?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}
