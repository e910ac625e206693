//! In-memory boards resource.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::http::error::AppError;
use crate::http::server::AppState;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewBoard {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Default)]
pub struct BoardStore {
    boards: DashMap<Uuid, Board>,
}

impl BoardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, name: impl Into<String>) -> Board {
        let board = Board {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: Utc::now(),
        };
        self.boards.insert(board.id, board.clone());
        board
    }

    pub fn get(&self, id: &Uuid) -> Option<Board> {
        self.boards.get(id).map(|b| b.value().clone())
    }

    pub fn remove(&self, id: &Uuid) -> Option<Board> {
        self.boards.remove(id).map(|(_, b)| b)
    }

    /// All boards, oldest first.
    pub fn list(&self) -> Vec<Board> {
        let mut boards: Vec<Board> = self.boards.iter().map(|b| b.value().clone()).collect();
        boards.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        boards
    }
}

fn board_id(raw: &str) -> Result<Uuid, AppError> {
    raw.parse().map_err(|_| AppError::not_found("Board not found"))
}

pub async fn list_boards(State(state): State<AppState>) -> Json<Vec<Board>> {
    Json(state.boards.list())
}

pub async fn create_board(
    State(state): State<AppState>,
    payload: Result<Json<NewBoard>, JsonRejection>,
) -> Result<(StatusCode, Json<Board>), AppError> {
    let Json(new_board) = payload?;
    let name = new_board.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Board name is required"));
    }

    let board = state.boards.insert(name);
    tracing::debug!(board_id = %board.id, "Board created");
    Ok((StatusCode::CREATED, Json(board)))
}

pub async fn get_board(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Board>, AppError> {
    let id = board_id(&id)?;
    state
        .boards
        .get(&id)
        .map(Json)
        .ok_or_else(|| AppError::not_found("Board not found"))
}

pub async fn delete_board(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = board_id(&id)?;
    state
        .boards
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| AppError::not_found("Board not found"))
}
