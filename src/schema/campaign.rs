use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::schema::parse_amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum CampaignStatus {
    Active,
    Closed,
}

/// A fundraising effort tied to a charity wallet. `raised_amount` is derived:
/// reads recompute it from the donations referencing the campaign, so the
/// stored column never drifts out of sight of the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub goal_amount: String,
    pub raised_amount: String,
    pub wallet_address: String,
    pub duration_days: Option<i64>,
    pub status: CampaignStatus,
    pub charity_name: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCampaign {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub goal_amount: String,
    pub wallet_address: String,
    #[serde(default)]
    pub duration_days: Option<i64>,
    /// Accepted from callers for wire compatibility but ignored: creation
    /// always stores ACTIVE.
    #[serde(default)]
    pub status: Option<CampaignStatus>,
    #[serde(default)]
    pub charity_name: Option<String>,
}

impl NewCampaign {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title must not be empty".into()));
        }
        if self.wallet_address.trim().is_empty() {
            return Err(AppError::Validation(
                "walletAddress must not be empty".into(),
            ));
        }
        parse_amount("goalAmount", &self.goal_amount)?;
        Ok(())
    }
}
