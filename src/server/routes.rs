//! API routes.
//!
//! Reads return their payload as-is. Mutations answer `{"success": true, ...payload}`
//! or `{"success": false, "error": reason}` with a status code chosen by error kind.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::engine::errors::{EngineError, ErrorKind};
use crate::engine::types::GameDocument;
use crate::engine::{achievement, daily, leaderboard, quest, shop, stats, tasks};
use crate::metrics;
use crate::server::SharedSession;

type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::StateConflict => StatusCode::CONFLICT,
        ErrorKind::InsufficientResource => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Persistence => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn reject(err: EngineError) -> (StatusCode, Json<Value>) {
    let status = status_for(err.kind());
    let reason = if err.is_rejection() {
        err.to_string()
    } else {
        format!("Failed to save game state: {}", err)
    };
    (status, Json(json!({ "success": false, "error": reason })))
}

fn bad_request(reason: String) -> (StatusCode, Json<Value>) {
    reject(EngineError::validation(reason))
}

fn to_value<T: Serialize>(payload: &T) -> Result<Value, (StatusCode, Json<Value>)> {
    serde_json::to_value(payload).map_err(|e| reject(EngineError::Json(e)))
}

/// Wrap a mutation result in the success envelope. Object payloads are flattened into it.
fn success<T: Serialize>(payload: &T) -> ApiResult {
    let mut body = json!({ "success": true });
    match to_value(payload)? {
        Value::Object(fields) => {
            if let Value::Object(envelope) = &mut body {
                envelope.extend(fields);
            }
        }
        Value::Null => {}
        other => body["data"] = other,
    }
    Ok(Json(body))
}

async fn read_view<T: Serialize>(
    session: &SharedSession,
    view: impl FnOnce(&GameDocument) -> T,
) -> ApiResult {
    let mut session = session.lock().await;
    let payload = session.read(view).await.map_err(reject)?;
    Ok(Json(to_value(&payload)?))
}

async fn apply<T: Serialize>(
    session: &SharedSession,
    action: &str,
    op: impl FnOnce(&mut GameDocument, NaiveDate) -> Result<T, EngineError>,
) -> ApiResult {
    let mut session = session.lock().await;
    let payload = session.mutate(action, op).await.map_err(reject)?;
    success(&payload)
}

// ============================================================================
// Request bodies
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CompleteTaskRequest {
    pub task_index: usize,
}

#[derive(Debug, Deserialize)]
pub struct AllocateStatRequest {
    pub stat: String,
}

#[derive(Debug, Deserialize)]
pub struct ItemRequest {
    pub item_name: String,
}

#[derive(Debug, Deserialize)]
pub struct ClaimAchievementRequest {
    pub index: usize,
}

#[derive(Debug, Deserialize)]
pub struct CompleteQuestRequest {
    pub quest_name: String,
}

#[derive(Debug, Deserialize)]
pub struct NewPersonalQuest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, (StatusCode, Json<Value>)> {
    payload
        .map(|Json(inner)| inner)
        .map_err(|e| bad_request(format!("Invalid request body: {}", e.body_text())))
}

fn path_id(id: Result<Path<u32>, PathRejection>) -> Result<u32, (StatusCode, Json<Value>)> {
    id.map(|Path(id)| id)
        .map_err(|e| bad_request(format!("Invalid quest id: {}", e.body_text())))
}

// ============================================================================
// Routers
// ============================================================================

pub fn health_routes() -> Router<SharedSession> {
    Router::new().route("/health", get(health))
}

pub fn player_routes() -> Router<SharedSession> {
    Router::new()
        .route("/api/player", get(get_player))
        .route("/api/allocate_stat", post(allocate_stat))
        .route("/api/stats", get(get_stats))
        .route("/api/leaderboard", get(get_leaderboard))
        .route("/api/metrics", get(get_metrics))
}

pub fn daily_routes() -> Router<SharedSession> {
    Router::new()
        .route("/api/daily_tasks", get(get_daily_tasks))
        .route("/api/complete_task", post(complete_task))
        .route("/api/update_timer", post(update_timer))
}

pub fn shop_routes() -> Router<SharedSession> {
    Router::new()
        .route("/api/shop", get(get_shop))
        .route("/api/inventory", get(get_inventory))
        .route("/api/buy_item", post(buy_item))
        .route("/api/use_item", post(use_item))
}

pub fn achievement_routes() -> Router<SharedSession> {
    Router::new()
        .route("/api/achievements", get(get_achievements))
        .route("/api/claim_achievement", post(claim_achievement))
}

pub fn quest_routes() -> Router<SharedSession> {
    Router::new()
        .route("/api/quests", get(get_quests))
        .route("/api/complete_quest", post(complete_quest))
        .route(
            "/api/personal_quests",
            get(get_personal_quests).post(add_personal_quest),
        )
        .route(
            "/api/personal_quests/:id/complete",
            post(complete_personal_quest),
        )
        .route("/api/personal_quests/:id", delete(delete_personal_quest))
}

// ============================================================================
// Handlers
// ============================================================================

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

async fn get_player(State(session): State<SharedSession>) -> ApiResult {
    read_view(&session, |doc| doc.player.clone()).await
}

async fn allocate_stat(
    State(session): State<SharedSession>,
    payload: Result<Json<AllocateStatRequest>, JsonRejection>,
) -> ApiResult {
    let req = body(payload)?;
    apply(&session, "allocate_stat", |doc, _| {
        stats::allocate_stat(doc, &req.stat)
    })
    .await
}

async fn get_stats(State(session): State<SharedSession>) -> ApiResult {
    read_view(&session, stats::get_stats).await
}

async fn get_leaderboard(State(session): State<SharedSession>) -> ApiResult {
    read_view(&session, leaderboard::get_leaderboard).await
}

async fn get_metrics() -> ApiResult {
    Ok(Json(to_value(&metrics::snapshot())?))
}

async fn get_daily_tasks(State(session): State<SharedSession>) -> ApiResult {
    read_view(&session, daily::daily_view).await
}

async fn complete_task(
    State(session): State<SharedSession>,
    payload: Result<Json<CompleteTaskRequest>, JsonRejection>,
) -> ApiResult {
    let req = body(payload)?;
    apply(&session, "complete_task", |doc, _| {
        tasks::complete_task(doc, req.task_index)
    })
    .await
}

async fn update_timer(State(session): State<SharedSession>) -> ApiResult {
    apply(&session, "update_timer", |doc, _| {
        let timer = daily::update_timer(doc);
        Ok(json!({ "timer": timer.to_string(), "timer_seconds": timer.total_secs() }))
    })
    .await
}

async fn get_shop(State(session): State<SharedSession>) -> ApiResult {
    read_view(&session, |doc| doc.shop.clone()).await
}

async fn get_inventory(State(session): State<SharedSession>) -> ApiResult {
    read_view(&session, |doc| doc.inventory.clone()).await
}

async fn buy_item(
    State(session): State<SharedSession>,
    payload: Result<Json<ItemRequest>, JsonRejection>,
) -> ApiResult {
    let req = body(payload)?;
    apply(&session, "buy_item", |doc, _| shop::buy_item(doc, &req.item_name)).await
}

async fn use_item(
    State(session): State<SharedSession>,
    payload: Result<Json<ItemRequest>, JsonRejection>,
) -> ApiResult {
    let req = body(payload)?;
    apply(&session, "use_item", |doc, _| shop::use_item(doc, &req.item_name)).await
}

async fn get_achievements(State(session): State<SharedSession>) -> ApiResult {
    read_view(&session, |doc| doc.achievements.clone()).await
}

async fn claim_achievement(
    State(session): State<SharedSession>,
    payload: Result<Json<ClaimAchievementRequest>, JsonRejection>,
) -> ApiResult {
    let req = body(payload)?;
    apply(&session, "claim_achievement", |doc, _| {
        let coins = achievement::claim_achievement(doc, req.index)?;
        Ok(json!({ "reward_coins": coins, "coins": doc.player.coins }))
    })
    .await
}

async fn get_quests(State(session): State<SharedSession>) -> ApiResult {
    read_view(&session, |doc| doc.quests.clone()).await
}

async fn complete_quest(
    State(session): State<SharedSession>,
    payload: Result<Json<CompleteQuestRequest>, JsonRejection>,
) -> ApiResult {
    let req = body(payload)?;
    apply(&session, "complete_quest", |doc, _| {
        quest::complete_quest(doc, &req.quest_name)
    })
    .await
}

async fn get_personal_quests(State(session): State<SharedSession>) -> ApiResult {
    read_view(&session, |doc| doc.personal_quest_list.clone()).await
}

async fn add_personal_quest(
    State(session): State<SharedSession>,
    payload: Result<Json<NewPersonalQuest>, JsonRejection>,
) -> ApiResult {
    let req = body(payload)?;
    apply(&session, "add_personal_quest", |doc, today| {
        let created =
            quest::add_personal_quest(doc, &req.name, req.description.as_deref(), today)?;
        Ok(json!({ "quest": created }))
    })
    .await
}

async fn complete_personal_quest(
    State(session): State<SharedSession>,
    id: Result<Path<u32>, PathRejection>,
) -> ApiResult {
    let id = path_id(id)?;
    apply(&session, "complete_personal_quest", |doc, today| {
        quest::complete_personal_quest(doc, id, today)
    })
    .await
}

async fn delete_personal_quest(
    State(session): State<SharedSession>,
    id: Result<Path<u32>, PathRejection>,
) -> ApiResult {
    let id = path_id(id)?;
    apply(&session, "delete_personal_quest", |doc, _| {
        let removed = quest::delete_personal_quest(doc, id)?;
        Ok(json!({ "deleted": removed.id }))
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds_map_to_statuses() {
        assert_eq!(status_for(ErrorKind::Validation), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::StateConflict), StatusCode::CONFLICT);
        assert_eq!(
            status_for(ErrorKind::InsufficientResource),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(ErrorKind::Persistence),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn success_flattens_object_payloads() {
        let Json(body) = success(&json!({ "coins": 5 })).unwrap();
        assert_eq!(body, json!({ "success": true, "coins": 5 }));

        let Json(body) = success(&vec![1, 2]).unwrap();
        assert_eq!(body, json!({ "success": true, "data": [1, 2] }));
    }

    #[test]
    fn rejection_carries_reason() {
        let (status, Json(body)) = reject(EngineError::insufficient("Insufficient coins"));
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, json!({ "success": false, "error": "Insufficient coins" }));
    }
}
