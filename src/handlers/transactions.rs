use actix_web::{HttpResponse, get, post, web};

use crate::error::AppError;
use crate::schema::NewTransaction;
use crate::state::AppState;

#[post("/api/transactions")]
pub async fn create_transaction(
    payload: web::Json<NewTransaction>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let saved = app_state.db.save_transaction(&payload).await?;
    Ok(HttpResponse::Ok().json(saved))
}

#[get("/api/transactions/user/{walletAddress}")]
pub async fn get_user_transactions(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let transactions = app_state
        .db
        .transactions_by_sender(&path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(transactions))
}
