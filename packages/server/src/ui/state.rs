//! Shared state of the HTTP and WebSocket handlers.

use std::sync::Arc;

use crate::usecase::{GetRoomDetailUseCase, ListRoomsUseCase};

use super::gateway::GatewayHandle;

pub struct AppState {
    /// Every WebSocket frame goes through the gateway
    pub gateway: GatewayHandle,
    /// HTTP reads go straight to the repository snapshot
    pub list_rooms_usecase: Arc<ListRoomsUseCase>,
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
}
