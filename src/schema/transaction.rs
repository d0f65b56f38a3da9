use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::schema::parse_amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum TransactionType {
    Donation,
    Withdrawal,
    CharityRegistration,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Success,
    Failed,
}

/// A generalized ledger entry covering donations, withdrawals and
/// charity-registration events. `status` only ever moves forward:
/// pending -> success or pending -> failed, both terminal.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub tx_hash: String,
    pub from_address: String,
    pub to_address: Option<String>,
    pub amount: String,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub status: TransactionStatus,
    pub charity_id: Option<i64>,
    pub campaign_id: Option<i64>,
    pub block_number: Option<i64>,
    pub timestamp: NaiveDateTime,
    pub metadata: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub tx_hash: String,
    pub from_address: String,
    #[serde(default)]
    pub to_address: Option<String>,
    pub amount: String,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub status: TransactionStatus,
    #[serde(default)]
    pub charity_id: Option<i64>,
    #[serde(default)]
    pub campaign_id: Option<i64>,
    #[serde(default)]
    pub block_number: Option<i64>,
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub metadata: Option<String>,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.tx_hash.trim().is_empty() {
            return Err(AppError::Validation("txHash must not be empty".into()));
        }
        if self.from_address.trim().is_empty() {
            return Err(AppError::Validation(
                "fromAddress must not be empty".into(),
            ));
        }
        parse_amount("amount", &self.amount)?;
        Ok(())
    }
}
