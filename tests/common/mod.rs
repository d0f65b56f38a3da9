#![allow(dead_code)]

use charity_ledger::schema::{NewDonation, NewTransaction, TransactionStatus, TransactionType};
use charity_ledger::state::DbContext;

/// Fresh database in a temp directory. The directory guard must be kept alive
/// for the duration of the test.
pub async fn test_db() -> (tempfile::TempDir, DbContext) {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite://{}", dir.path().join("test.sqlite").display());
    let db = DbContext::new(&url).await.expect("test database");
    (dir, db)
}

pub fn donation(tx_hash: &str, donor: &str, amount: &str) -> NewDonation {
    NewDonation {
        tx_hash: tx_hash.into(),
        donor_address: donor.into(),
        charity_id: 1,
        charity_name: Some("Clean Water".into()),
        campaign_id: None,
        campaign_title: None,
        amount: amount.into(),
        amount_in_usd: None,
        timestamp: chrono::Utc::now().naive_utc(),
        block_number: None,
        message: None,
        is_anonymous: false,
    }
}

pub fn transaction(tx_hash: &str, from: &str) -> NewTransaction {
    NewTransaction {
        tx_hash: tx_hash.into(),
        from_address: from.into(),
        to_address: None,
        amount: "1".into(),
        tx_type: TransactionType::Donation,
        status: TransactionStatus::Pending,
        charity_id: Some(1),
        campaign_id: None,
        block_number: None,
        timestamp: chrono::Utc::now().naive_utc(),
        metadata: None,
    }
}
