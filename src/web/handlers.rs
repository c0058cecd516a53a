use std::{convert::Infallible, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use warp::{
    http::StatusCode,
    reply::{Json, WithStatus},
};

use crate::{
    core::{analysis::AnalysisRequest, db::TournamentDb},
    error::Error,
};

/// A Json struct for plain confirmations
#[derive(Serialize, Deserialize, Debug)]
pub struct Message {
    pub message: String,
}

/// A Json struct returned after a save
#[derive(Serialize, Deserialize, Debug)]
pub struct Saved {
    pub message: String,
    pub id: i64,
}

/// A Json struct describing a failed request
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}

fn message(text: &str) -> Message {
    Message {
        message: text.to_string(),
    }
}

pub fn error_reply(err: &Error) -> WithStatus<Json> {
    match err {
        Error::NotFound(_) | Error::Gone(_) => log::debug!("{}", err),
        Error::Validation(_) => log::warn!("{}", err),
        _ => log::error!("{}", err),
    }

    warp::reply::with_status(
        warp::reply::json(&ErrorBody {
            error: err.client_message(),
        }),
        err.status(),
    )
}

pub fn to_http_output<T: Serialize>(
    result: Result<T, Error>,
) -> Result<WithStatus<Json>, Infallible> {
    match result {
        Ok(data) => Ok(warp::reply::with_status(
            warp::reply::json(&data),
            StatusCode::OK,
        )),
        Err(e) => Ok(error_reply(&e)),
    }
}

pub async fn list_tournaments(db: Arc<TournamentDb>) -> Result<WithStatus<Json>, Infallible> {
    to_http_output(db.get_tournaments().await)
}

pub async fn save_tournament(
    payload: Value,
    db: Arc<TournamentDb>,
) -> Result<WithStatus<Json>, Infallible> {
    to_http_output(db.save_tournament(&payload).await.map(|id| Saved {
        message: "Saved successfully".to_string(),
        id,
    }))
}

pub async fn get_tournament(id: i64, db: Arc<TournamentDb>) -> Result<WithStatus<Json>, Infallible> {
    to_http_output(db.get_tournament(id).await)
}

pub async fn delete_tournament(
    id: i64,
    db: Arc<TournamentDb>,
) -> Result<WithStatus<Json>, Infallible> {
    to_http_output(
        db.delete_tournament(id)
            .await
            .map(|_| message("Deleted successfully")),
    )
}

pub async fn restore_tournament(
    id: i64,
    db: Arc<TournamentDb>,
) -> Result<WithStatus<Json>, Infallible> {
    to_http_output(
        db.restore_tournament(id)
            .await
            .map(|_| message("Restored successfully")),
    )
}

pub async fn analyze(body: Value) -> Result<WithStatus<Json>, Infallible> {
    to_http_output(AnalysisRequest::from_json(&body).map(|request| request.analyze()))
}
