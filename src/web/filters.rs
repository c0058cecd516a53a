use std::{convert::Infallible, sync::Arc};

use warp::{reject::Rejection, Filter};

use crate::core::db::TournamentDb;

use super::handlers::{
    analyze, delete_tournament, get_tournament, list_tournaments, restore_tournament,
    save_tournament,
};

pub fn with_db(
    db: Arc<TournamentDb>,
) -> impl Filter<Extract = (Arc<TournamentDb>,), Error = Infallible> + Clone {
    warp::any().map(move || db.clone())
}

fn tournament_filters(
    db: Arc<TournamentDb>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = Rejection> + Clone {
    let list_tournaments = warp::path!("api" / "tournaments")
        .and(warp::get())
        .and(with_db(db.clone()))
        .and_then(list_tournaments);

    let save_tournament = warp::path!("api" / "tournaments")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_db(db.clone()))
        .and_then(save_tournament);

    let get_tournament = warp::path!("api" / "tournaments" / i64)
        .and(warp::get())
        .and(with_db(db.clone()))
        .and_then(get_tournament);

    let delete_tournament = warp::path!("api" / "tournaments" / i64)
        .and(warp::delete())
        .and(with_db(db.clone()))
        .and_then(delete_tournament);

    let restore_tournament = warp::path!("api" / "tournaments" / i64 / "restore")
        .and(warp::post())
        .and(with_db(db))
        .and_then(restore_tournament);

    list_tournaments
        .or(save_tournament)
        .or(get_tournament)
        .or(delete_tournament)
        .or(restore_tournament)
}

pub fn api_filters(
    db: Arc<TournamentDb>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = Rejection> + Clone {
    let analyze = warp::path!("analyze")
        .and(warp::post())
        .and(warp::body::json())
        .and_then(analyze);

    tournament_filters(db).or(analyze)
}
