use actix_web::{HttpResponse, get, post, web};

use crate::error::AppError;
use crate::schema::NewCampaign;
use crate::state::AppState;

#[post("/api/campaign")]
pub async fn create_campaign(
    payload: web::Json<NewCampaign>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    if payload.status.is_some() {
        log::debug!("Ignoring caller-supplied campaign status; creation forces ACTIVE");
    }
    let saved = app_state.db.save_campaign(&payload).await?;
    Ok(HttpResponse::Ok().json(saved))
}

// Must be registered before `get_campaigns_by_wallet` so "active" is not
// captured as a wallet address.
#[get("/api/campaign/active")]
pub async fn get_active_campaigns(
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let campaigns = app_state.db.active_campaigns().await?;
    Ok(HttpResponse::Ok().json(campaigns))
}

#[get("/api/campaign/{walletAddress}")]
pub async fn get_campaigns_by_wallet(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let campaigns = app_state.db.campaigns_by_wallet(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(campaigns))
}
