use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Lifecycle states of a registration request. PENDING is the initial state;
/// APPROVED and REJECTED are terminal for the unprivileged approve/reject
/// path. Only the admin override may move a request out of a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CharityRequest {
    pub id: i64,
    pub wallet_address: String,
    pub charity_name: String,
    pub description: String,
    pub email: String,
    pub verification_document_url: String,
    pub website_url: Option<String>,
    pub logo_url: Option<String>,
    pub status: RequestStatus,
    pub submitted_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewCharityRequest {
    pub wallet_address: String,
    pub charity_name: String,
    pub description: String,
    pub email: String,
    pub verification_document_url: String,
    pub website_url: Option<String>,
    pub logo_url: Option<String>,
}

impl NewCharityRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        for (name, value) in [
            ("walletAddress", &self.wallet_address),
            ("charityName", &self.charity_name),
            ("description", &self.description),
            ("email", &self.email),
            ("verificationDocumentUrl", &self.verification_document_url),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!(
                    "{name} must not be empty"
                )));
            }
        }
        Ok(())
    }
}

/// Field updates applied by `updateDetails`. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct CharityRequestUpdate {
    pub wallet_address: Option<String>,
    pub charity_name: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub website_url: Option<String>,
}
