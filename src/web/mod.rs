use crate::core::settings::Settings;
use std::{convert::Infallible, path::PathBuf, sync::Arc};

use filters::api_filters;
use handlers::ErrorBody;
use warp::{
    http::{Method, StatusCode},
    reject::Rejection,
    Filter,
};

use crate::core::db::TournamentDb;

pub mod filters;
pub mod handlers;

async fn handle_rejection(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    let (code, msg) = if let Some(err) = err.find::<warp::filters::body::BodyDeserializeError>() {
        log::warn!("{}", err);
        (StatusCode::BAD_REQUEST, err.to_string())
    } else if let Some(err) = err.find::<warp::reject::UnsupportedMediaType>() {
        log::warn!("Unsupported Media Type: {}", err);
        (StatusCode::UNSUPPORTED_MEDIA_TYPE, err.to_string())
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not Found".to_string())
    } else if let Some(err) = err.find::<warp::reject::MethodNotAllowed>() {
        log::warn!("Method Not Allowed: {}", err);
        (StatusCode::METHOD_NOT_ALLOWED, err.to_string())
    } else {
        log::error!("Unhandled Rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error".to_string(),
        )
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&ErrorBody { error: msg }),
        code,
    ))
}

/// All routes: the JSON API, then static front-end files from `web_root`.
pub fn routes(
    db: Arc<TournamentDb>,
    web_root: PathBuf,
) -> impl Filter<Extract = (impl warp::Reply,), Error = Rejection> + Clone {
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec![
            "User-Agent",
            "Sec-Fetch-Mode",
            "Referer",
            "Origin",
            "Content-Type",
            "Access-Control-Request-Method",
            "Access-Control-Request-Headers",
        ])
        .allow_methods(&[Method::GET, Method::POST, Method::DELETE, Method::OPTIONS]);

    let frontend = warp::get().and(warp::fs::dir(web_root));

    api_filters(db)
        .or(frontend)
        .recover(handle_rejection)
        .with(cors)
        .with(warp::log("auctionboard::http"))
}

pub async fn run_http_server(db: Arc<TournamentDb>, settings: Arc<Settings>) -> anyhow::Result<()> {
    let port = settings.web_port();
    log::info!("Serving tournaments on http://0.0.0.0:{}", port);

    warp::serve(routes(db, settings.web_root()))
        .run(([0, 0, 0, 0], port))
        .await;

    Ok(())
}
