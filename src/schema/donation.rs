use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::schema::parse_amount;

/// An immutable on-chain donation record. Never updated or deleted once
/// written; `tx_hash` is unique across the whole donation set.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: i64,
    pub tx_hash: String,
    pub donor_address: String,
    pub charity_id: i64,
    pub charity_name: Option<String>,
    pub campaign_id: Option<i64>,
    pub campaign_title: Option<String>,
    pub amount: String,
    #[serde(rename = "amountInUSD")]
    pub amount_in_usd: Option<String>,
    pub timestamp: NaiveDateTime,
    pub block_number: Option<i64>,
    pub message: Option<String>,
    pub is_anonymous: bool,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDonation {
    pub tx_hash: String,
    pub donor_address: String,
    pub charity_id: i64,
    #[serde(default)]
    pub charity_name: Option<String>,
    #[serde(default)]
    pub campaign_id: Option<i64>,
    #[serde(default)]
    pub campaign_title: Option<String>,
    pub amount: String,
    #[serde(default, rename = "amountInUSD")]
    pub amount_in_usd: Option<String>,
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub block_number: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
}

impl NewDonation {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.tx_hash.trim().is_empty() {
            return Err(AppError::Validation("txHash must not be empty".into()));
        }
        if self.donor_address.trim().is_empty() {
            return Err(AppError::Validation(
                "donorAddress must not be empty".into(),
            ));
        }
        parse_amount("amount", &self.amount)?;
        if let Some(usd) = &self.amount_in_usd {
            parse_amount("amountInUSD", usd)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn donation() -> NewDonation {
        NewDonation {
            tx_hash: "0xabc".into(),
            donor_address: "0xdonor".into(),
            charity_id: 1,
            charity_name: None,
            campaign_id: None,
            campaign_title: None,
            amount: "1.5".into(),
            amount_in_usd: None,
            timestamp: chrono::Utc::now().naive_utc(),
            block_number: None,
            message: None,
            is_anonymous: false,
        }
    }

    #[test]
    fn accepts_well_formed_input() {
        assert!(donation().validate().is_ok());
    }

    #[test]
    fn rejects_blank_tx_hash() {
        let mut d = donation();
        d.tx_hash = "  ".into();
        assert!(matches!(d.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn rejects_non_decimal_amount() {
        let mut d = donation();
        d.amount = "1.5e3garbage".into();
        assert!(matches!(d.validate(), Err(AppError::Validation(_))));
    }
}
