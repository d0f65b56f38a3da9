use actix_web::{HttpResponse, get, web};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;
use crate::stats;

#[get("/api/statistics")]
pub async fn get_platform_statistics(
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let donations = app_state.db.all_donations().await?;
    Ok(HttpResponse::Ok().json(stats::platform_statistics(&donations)))
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    #[serde(default)]
    limit: Option<usize>,
}

#[get("/api/statistics/leaderboard")]
pub async fn get_donor_leaderboard(
    query: web::Query<LeaderboardQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let donations = app_state.db.all_donations().await?;
    let board = stats::donor_leaderboard(&donations, query.limit.unwrap_or(10));
    Ok(HttpResponse::Ok().json(board))
}
