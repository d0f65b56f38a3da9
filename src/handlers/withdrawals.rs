use actix_web::{HttpResponse, get, post, web};

use crate::error::AppError;
use crate::schema::NewWithdrawal;
use crate::state::AppState;

#[post("/api/withdrawals")]
pub async fn create_withdrawal(
    payload: web::Json<NewWithdrawal>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let saved = app_state.db.save_withdrawal(&payload).await?;
    Ok(HttpResponse::Ok().json(saved))
}

#[get("/api/withdrawals/charity/{charityId}")]
pub async fn get_charity_withdrawals(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let withdrawals = app_state
        .db
        .withdrawals_by_charity(path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(withdrawals))
}
