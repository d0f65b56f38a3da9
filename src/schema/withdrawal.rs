use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::schema::parse_amount;

/// A charity's withdrawal of funds. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Withdrawal {
    pub id: i64,
    pub tx_hash: String,
    pub charity_id: i64,
    pub charity_name: Option<String>,
    pub amount: String,
    pub fee: Option<String>,
    pub net_amount: Option<String>,
    pub timestamp: NaiveDateTime,
    pub block_number: Option<i64>,
    pub to_address: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWithdrawal {
    pub tx_hash: String,
    pub charity_id: i64,
    #[serde(default)]
    pub charity_name: Option<String>,
    pub amount: String,
    #[serde(default)]
    pub fee: Option<String>,
    #[serde(default)]
    pub net_amount: Option<String>,
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub block_number: Option<i64>,
    #[serde(default)]
    pub to_address: Option<String>,
}

impl NewWithdrawal {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.tx_hash.trim().is_empty() {
            return Err(AppError::Validation("txHash must not be empty".into()));
        }
        let amount = parse_amount("amount", &self.amount)?;
        let fee = self
            .fee
            .as_deref()
            .map(|f| parse_amount("fee", f))
            .transpose()?;
        let net = self
            .net_amount
            .as_deref()
            .map(|n| parse_amount("netAmount", n))
            .transpose()?;
        if let (Some(fee), Some(net)) = (fee, net) {
            if amount - fee != net {
                return Err(AppError::Validation(
                    "netAmount must equal amount minus fee".into(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn withdrawal() -> NewWithdrawal {
        NewWithdrawal {
            tx_hash: "0xdef".into(),
            charity_id: 7,
            charity_name: None,
            amount: "10.5".into(),
            fee: Some("0.5".into()),
            net_amount: Some("10".into()),
            timestamp: chrono::Utc::now().naive_utc(),
            block_number: None,
            to_address: None,
        }
    }

    #[test]
    fn net_amount_must_balance() {
        assert!(withdrawal().validate().is_ok());

        let mut w = withdrawal();
        w.net_amount = Some("9.99".into());
        assert!(matches!(w.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn net_amount_optional() {
        let mut w = withdrawal();
        w.net_amount = None;
        assert!(w.validate().is_ok());
    }
}
