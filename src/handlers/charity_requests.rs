use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::Deserialize;
use tokio_stream::StreamExt;

use crate::error::AppError;
use crate::schema::{CharityRequestUpdate, NewCharityRequest, RequestStatus};
use crate::state::AppState;

struct UploadedFile {
    file_name: String,
    bytes: Vec<u8>,
}

async fn read_field_bytes(field: &mut Field) -> Result<Vec<u8>, AppError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk
            .map_err(|e| AppError::Validation(format!("invalid multipart payload: {e}")))?;
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

async fn read_field_text(field: &mut Field) -> Result<String, AppError> {
    let bytes = read_field_bytes(field).await?;
    String::from_utf8(bytes)
        .map_err(|_| AppError::Validation("multipart field is not valid UTF-8".into()))
}

async fn read_file(field: &mut Field) -> Result<UploadedFile, AppError> {
    let file_name = field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .unwrap_or("upload")
        .to_owned();
    let bytes = read_field_bytes(field).await?;
    Ok(UploadedFile { file_name, bytes })
}

fn field_name(field: &Field) -> Option<String> {
    field
        .content_disposition()
        .and_then(|cd| cd.get_name())
        .map(str::to_owned)
}

/// Registration submission: multipart form with the charity's details plus the
/// logo (optional) and verification document (required) as file parts.
#[post("/api/charity/register")]
pub async fn register_charity(
    mut payload: Multipart,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let mut wallet_address = String::new();
    let mut charity_name = String::new();
    let mut description = String::new();
    let mut email = String::new();
    let mut website_url: Option<String> = None;
    let mut logo: Option<UploadedFile> = None;
    let mut verification: Option<UploadedFile> = None;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::Validation(format!("invalid multipart payload: {e}")))?;
        let Some(name) = field_name(&field) else {
            continue;
        };
        match name.as_str() {
            "walletAddress" => wallet_address = read_field_text(&mut field).await?,
            "charityName" => charity_name = read_field_text(&mut field).await?,
            "description" => description = read_field_text(&mut field).await?,
            "email" => email = read_field_text(&mut field).await?,
            "websiteUrl" => website_url = Some(read_field_text(&mut field).await?),
            "logo" => logo = Some(read_file(&mut field).await?),
            "verification" => verification = Some(read_file(&mut field).await?),
            other => {
                log::debug!("Ignoring unknown multipart field {other}");
                read_field_bytes(&mut field).await?;
            }
        }
    }

    let verification = verification
        .filter(|f| !f.bytes.is_empty())
        .ok_or_else(|| AppError::Validation("verification document is required".into()))?;

    // Reject bad field input before any bytes reach the file store, so a
    // failed registration leaves no orphaned uploads. The file name stands in
    // for the document reference until the upload is actually stored.
    let mut request = NewCharityRequest {
        wallet_address,
        charity_name,
        description,
        email,
        verification_document_url: verification.file_name.clone(),
        website_url,
        logo_url: None,
    };
    request.validate()?;

    request.verification_document_url = app_state
        .files
        .store(&verification.bytes, &verification.file_name)
        .await
        .map_err(|e| AppError::ExternalDependency(e.to_string()))?;

    if let Some(file) = logo.filter(|f| !f.bytes.is_empty()) {
        request.logo_url = Some(
            app_state
                .files
                .store(&file.bytes, &file.file_name)
                .await
                .map_err(|e| AppError::ExternalDependency(e.to_string()))?,
        );
    }

    let saved = app_state.lifecycle.submit(request).await?;
    Ok(HttpResponse::Created().json(saved))
}

#[get("/api/charityRequests")]
pub async fn get_charity_requests(
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let requests = app_state.db.all_charity_requests().await?;
    Ok(HttpResponse::Ok().json(requests))
}

/// Lookup by id is a find: a missing request is served as a JSON `null` body.
#[get("/api/charityRequests/{id}")]
pub async fn get_charity_request(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let request = app_state.db.charity_request_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(request))
}

#[post("/api/charityRequests/{charityId}/approve")]
pub async fn approve_charity_request(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    app_state.lifecycle.approve(path.into_inner()).await?;
    Ok(HttpResponse::Ok().finish())
}

#[post("/api/charityRequests/{charityId}/reject")]
pub async fn reject_charity_request(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    app_state.lifecycle.reject(path.into_inner()).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Detail update: multipart form with any of the detail fields, a
/// `logoChanged` flag, and the replacement logo file when the flag is set.
#[put("/api/charityRequests/{id}")]
pub async fn update_charity_request(
    path: web::Path<i64>,
    mut payload: Multipart,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let mut update = CharityRequestUpdate::default();
    let mut logo_changed = false;
    let mut logo: Option<UploadedFile> = None;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::Validation(format!("invalid multipart payload: {e}")))?;
        let Some(name) = field_name(&field) else {
            continue;
        };
        match name.as_str() {
            "walletAddress" => update.wallet_address = Some(read_field_text(&mut field).await?),
            "charityName" => update.charity_name = Some(read_field_text(&mut field).await?),
            "description" => update.description = Some(read_field_text(&mut field).await?),
            "email" => update.email = Some(read_field_text(&mut field).await?),
            "websiteUrl" => update.website_url = Some(read_field_text(&mut field).await?),
            "logoChanged" => {
                logo_changed = read_field_text(&mut field).await?.trim() == "true";
            }
            "logo" => logo = Some(read_file(&mut field).await?),
            other => {
                log::debug!("Ignoring unknown multipart field {other}");
                read_field_bytes(&mut field).await?;
            }
        }
    }

    let new_logo = match logo.filter(|f| logo_changed && !f.bytes.is_empty()) {
        Some(file) => Some(
            app_state
                .files
                .store(&file.bytes, &file.file_name)
                .await
                .map_err(|e| AppError::ExternalDependency(e.to_string()))?,
        ),
        None => None,
    };

    let updated = app_state
        .lifecycle
        .update_details(path.into_inner(), update, logo_changed, new_logo)
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[derive(Debug, Deserialize)]
pub struct AdminStatusQuery {
    status: RequestStatus,
}

#[patch("/api/charityRequests/adminapprove/{id}")]
pub async fn admin_update_charity_request(
    path: web::Path<i64>,
    query: web::Query<AdminStatusQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let updated = app_state
        .lifecycle
        .update_by_admin(path.into_inner(), query.status)
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[delete("/api/charityRequests/delete/{id}")]
pub async fn delete_charity_request(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    app_state.lifecycle.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().finish())
}
