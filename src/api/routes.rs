//--------------------------------------------------------------------------------------------------
// FUNCTIONS
//--------------------------------------------------------------------------------------------------
// | Name                  | Description                               | Return Type         |
// |-----------------------|-------------------------------------------|---------------------|
// | health                | Health check endpoint                     | Json                |
// | watch_match           | Websocket stream of a match's updates     | Response            |
// | save_match            | Create or update a match                  | ApiResult<Response> |
// | record_event          | Record an in-match event                  | ApiResult<Response> |
// | get_standings         | Persisted table of a league               | ApiResult<Response> |
//--------------------------------------------------------------------------------------------------

use std::sync::Arc;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Extension, Path,
    },
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use futures::{SinkExt, StreamExt};
use tracing::{debug, info};
use uuid::Uuid;

use super::{AppState, ApiError, ApiResult, HealthResponse, StandingsResponse};
use crate::inbounds::{
    dtos::{MatchEventRequest, MatchSavedRequest},
    handlers::{handle_match_event, handle_match_saved},
};
use crate::outbounds::queue_channel::QueueChannel;

/// Health check endpoint
pub async fn health(Extension(state): Extension<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        watched_matches: state.registry.match_count(),
    })
}

/// Upgrades to a websocket that receives every payload published for the match
pub async fn watch_match(
    ws: WebSocketUpgrade,
    Path(match_id): Path<Uuid>,
    Extension(state): Extension<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| stream_match(socket, match_id, state))
}

/// Pumps frames from the subscription queue to the socket until either side closes.
///
/// The subscription guard lives for the whole loop, so the registry entry is
/// removed as soon as the connection ends.
async fn stream_match(socket: WebSocket, match_id: Uuid, state: Arc<AppState>) {
    let (channel, mut frames) = QueueChannel::new(state.subscriber_buffer);
    let guard = state.registry.attach(match_id, Arc::new(channel));
    info!("Subscriber {} joined match {}", guard.subscriber_id(), match_id);

    let (mut sink, mut stream) = socket.split();
    loop {
        tokio::select! {
            frame = frames.recv() => {
                let Some(frame) = frame else { break };
                if sink.send(Message::Text(frame.to_string())).await.is_err() {
                    break;
                }
            }
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    // Clients only listen; anything else they send is ignored.
                    Some(Ok(other)) => debug!("Ignoring client message on match {}: {:?}", match_id, other),
                }
            }
        }
    }

    info!("Subscriber {} left match {}", guard.subscriber_id(), match_id);
    drop(guard);
}

/// Create or update a match
pub async fn save_match(
    Extension(state): Extension<Arc<AppState>>,
    Json(req): Json<MatchSavedRequest>,
) -> ApiResult<Response> {
    let response = handle_match_saved(req, &state.store, state.lifecycle.as_ref()).await?;
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Record an in-match event
pub async fn record_event(
    Extension(state): Extension<Arc<AppState>>,
    Json(req): Json<MatchEventRequest>,
) -> ApiResult<Response> {
    let response = handle_match_event(req, &state.store, state.lifecycle.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// Get the persisted standings of a league
pub async fn get_standings(
    Extension(state): Extension<Arc<AppState>>,
    Path(league_id): Path<Uuid>,
) -> ApiResult<Response> {
    let league = state.store.league(league_id);
    let standings = state.store.standings(league_id);

    if league.is_none() && standings.is_empty() {
        return Err(ApiError::NotFound(format!("League {} not found", league_id)));
    }

    let response = StandingsResponse {
        league_id,
        league_name: league.map(|l| l.name),
        standings,
    };
    Ok((StatusCode::OK, Json(response)).into_response())
}
