use actix_web::{HttpResponse, get, http::header, post, web};

use crate::certificate;
use crate::error::AppError;
use crate::export;
use crate::schema::NewDonation;
use crate::state::AppState;

#[post("/api/donations")]
pub async fn create_donation(
    payload: web::Json<NewDonation>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let saved = app_state.db.save_donation(&payload).await?;
    Ok(HttpResponse::Ok().json(saved))
}

#[get("/api/donations/user/{walletAddress}")]
pub async fn get_user_donations(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let donations = app_state.db.donations_by_donor(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(donations))
}

#[get("/api/donations/charity/{charityId}")]
pub async fn get_charity_donations(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let donations = app_state.db.donations_by_charity(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(donations))
}

#[get("/api/donations/campaign/{campaignId}")]
pub async fn get_campaign_donations(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let donations = app_state
        .db
        .donations_by_campaign(path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(donations))
}

/// Receipt lookup is a find: absence is a normal outcome, served as a JSON
/// `null` body rather than an error.
#[get("/api/donations/receipt/{txHash}")]
pub async fn get_donation_receipt(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let donation = app_state.db.donation_by_tx_hash(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(donation))
}

#[get("/api/donations/export/{walletAddress}")]
pub async fn export_donation_history(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let wallet = path.into_inner();
    let donations = app_state.db.donations_by_donor(&wallet).await?;
    let csv = export::donation_history_csv(&donations)
        .await
        .map_err(|e| AppError::ExternalDependency(e.to_string()))?;

    let prefix = wallet.get(..10).unwrap_or(&wallet);
    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=donation-history-{prefix}.csv"),
        ))
        .body(csv))
}

#[get("/api/donations/certificate/{txHash}")]
pub async fn get_donation_certificate(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let tx_hash = path.into_inner();
    let donation = app_state
        .db
        .donation_by_tx_hash(&tx_hash)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no donation with txHash {tx_hash}")))?;
    let document = certificate::render(&donation);

    let prefix = tx_hash.get(..10).unwrap_or(&tx_hash);
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=donation-certificate-{prefix}.txt"),
        ))
        .body(document))
}
