use std::str::FromStr;

use anyhow::Context;
use chrono::Utc;
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};

use crate::error::AppError;
use crate::schema::{
    Campaign, CampaignStatus, CharityRequest, Donation, NewCampaign, NewCharityRequest,
    NewDonation, NewTransaction, NewWithdrawal, RequestStatus, Transaction, TransactionStatus,
    Withdrawal,
};

/// All access to the durable store goes through this context. Uniqueness of
/// `tx_hash` is enforced here by the UNIQUE constraints in the schema, and
/// status transitions by conditional updates, so concurrent callers cannot
/// observe two successes for the same hash or a backward transition.
#[derive(Clone)]
pub struct DbContext {
    pool: SqlitePool,
}

fn duplicate_or_db(err: sqlx::Error, entity: &'static str, tx_hash: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::DuplicateKey {
            entity,
            tx_hash: tx_hash.to_owned(),
        },
        _ => AppError::Database(err),
    }
}

impl DbContext {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .context("Failed to create SQLite connect options")?
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;
        sqlx::migrate!()
            .run(&pool)
            .await
            .context("Database migration error")?;
        Ok(Self { pool })
    }

    // --- donations -------------------------------------------------------

    pub async fn save_donation(&self, new: &NewDonation) -> Result<Donation, AppError> {
        new.validate()?;
        let saved = sqlx::query_as::<_, Donation>(
            r#"
            INSERT INTO donations (
                tx_hash, donor_address, charity_id, charity_name, campaign_id,
                campaign_title, amount, amount_in_usd, timestamp, block_number,
                message, is_anonymous, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *;
            "#,
        )
        .bind(&new.tx_hash)
        .bind(&new.donor_address)
        .bind(new.charity_id)
        .bind(&new.charity_name)
        .bind(new.campaign_id)
        .bind(&new.campaign_title)
        .bind(&new.amount)
        .bind(&new.amount_in_usd)
        .bind(new.timestamp)
        .bind(new.block_number)
        .bind(&new.message)
        .bind(new.is_anonymous)
        .bind(Utc::now().naive_utc())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| duplicate_or_db(e, "donation", &new.tx_hash))?;
        log::debug!("Recorded donation {}", saved.tx_hash);
        Ok(saved)
    }

    pub async fn donation_by_tx_hash(&self, tx_hash: &str) -> Result<Option<Donation>, AppError> {
        let donation =
            sqlx::query_as::<_, Donation>("SELECT * FROM donations WHERE tx_hash = ?")
                .bind(tx_hash)
                .fetch_optional(&self.pool)
                .await?;
        Ok(donation)
    }

    pub async fn donations_by_donor(&self, donor: &str) -> Result<Vec<Donation>, AppError> {
        let donations = sqlx::query_as::<_, Donation>(
            "SELECT * FROM donations WHERE donor_address = ? ORDER BY id",
        )
        .bind(donor)
        .fetch_all(&self.pool)
        .await?;
        Ok(donations)
    }

    pub async fn donations_by_charity(&self, charity_id: i64) -> Result<Vec<Donation>, AppError> {
        let donations = sqlx::query_as::<_, Donation>(
            "SELECT * FROM donations WHERE charity_id = ? ORDER BY id",
        )
        .bind(charity_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(donations)
    }

    pub async fn donations_by_campaign(
        &self,
        campaign_id: i64,
    ) -> Result<Vec<Donation>, AppError> {
        let donations = sqlx::query_as::<_, Donation>(
            "SELECT * FROM donations WHERE campaign_id = ? ORDER BY id",
        )
        .bind(campaign_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(donations)
    }

    pub async fn all_donations(&self) -> Result<Vec<Donation>, AppError> {
        let donations = sqlx::query_as::<_, Donation>("SELECT * FROM donations ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(donations)
    }

    // --- transactions ----------------------------------------------------

    pub async fn save_transaction(&self, new: &NewTransaction) -> Result<Transaction, AppError> {
        new.validate()?;
        let saved = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (
                tx_hash, from_address, to_address, amount, tx_type, status,
                charity_id, campaign_id, block_number, timestamp, metadata, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *;
            "#,
        )
        .bind(&new.tx_hash)
        .bind(&new.from_address)
        .bind(&new.to_address)
        .bind(&new.amount)
        .bind(new.tx_type)
        .bind(new.status)
        .bind(new.charity_id)
        .bind(new.campaign_id)
        .bind(new.block_number)
        .bind(new.timestamp)
        .bind(&new.metadata)
        .bind(Utc::now().naive_utc())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| duplicate_or_db(e, "transaction", &new.tx_hash))?;
        log::debug!("Recorded transaction {}", saved.tx_hash);
        Ok(saved)
    }

    pub async fn transaction_by_tx_hash(
        &self,
        tx_hash: &str,
    ) -> Result<Option<Transaction>, AppError> {
        let tx = sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE tx_hash = ?")
            .bind(tx_hash)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tx)
    }

    pub async fn transactions_by_sender(&self, from: &str) -> Result<Vec<Transaction>, AppError> {
        let txs = sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions WHERE from_address = ? ORDER BY id",
        )
        .bind(from)
        .fetch_all(&self.pool)
        .await?;
        Ok(txs)
    }

    /// Forward-only status transition: pending -> success | failed. The
    /// conditional update makes the check-and-set atomic, so a transaction
    /// that has already reached a terminal state is never rewritten.
    pub async fn update_transaction_status(
        &self,
        tx_hash: &str,
        status: TransactionStatus,
    ) -> Result<Transaction, AppError> {
        if status == TransactionStatus::Pending {
            return Err(AppError::Validation(
                "transaction status cannot move back to pending".into(),
            ));
        }
        let updated = sqlx::query_as::<_, Transaction>(
            "UPDATE transactions SET status = ? WHERE tx_hash = ? AND status = ? RETURNING *",
        )
        .bind(status)
        .bind(tx_hash)
        .bind(TransactionStatus::Pending)
        .fetch_optional(&self.pool)
        .await?;
        match updated {
            Some(tx) => Ok(tx),
            None => match self.transaction_by_tx_hash(tx_hash).await? {
                Some(tx) => Err(AppError::Conflict(format!(
                    "transaction {tx_hash} already settled as {:?}",
                    tx.status
                ))),
                None => Err(AppError::NotFound(format!(
                    "no transaction with txHash {tx_hash}"
                ))),
            },
        }
    }

    // --- withdrawals -----------------------------------------------------

    pub async fn save_withdrawal(&self, new: &NewWithdrawal) -> Result<Withdrawal, AppError> {
        new.validate()?;
        let saved = sqlx::query_as::<_, Withdrawal>(
            r#"
            INSERT INTO withdrawals (
                tx_hash, charity_id, charity_name, amount, fee, net_amount,
                timestamp, block_number, to_address, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *;
            "#,
        )
        .bind(&new.tx_hash)
        .bind(new.charity_id)
        .bind(&new.charity_name)
        .bind(&new.amount)
        .bind(&new.fee)
        .bind(&new.net_amount)
        .bind(new.timestamp)
        .bind(new.block_number)
        .bind(&new.to_address)
        .bind(Utc::now().naive_utc())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| duplicate_or_db(e, "withdrawal", &new.tx_hash))?;
        log::debug!("Recorded withdrawal {}", saved.tx_hash);
        Ok(saved)
    }

    pub async fn withdrawals_by_charity(
        &self,
        charity_id: i64,
    ) -> Result<Vec<Withdrawal>, AppError> {
        let withdrawals = sqlx::query_as::<_, Withdrawal>(
            "SELECT * FROM withdrawals WHERE charity_id = ? ORDER BY id",
        )
        .bind(charity_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(withdrawals)
    }

    // --- charity requests ------------------------------------------------

    pub async fn save_charity_request(
        &self,
        new: &NewCharityRequest,
    ) -> Result<CharityRequest, AppError> {
        new.validate()?;
        let saved = sqlx::query_as::<_, CharityRequest>(
            r#"
            INSERT INTO charity_requests (
                wallet_address, charity_name, description, email,
                verification_document_url, website_url, logo_url, status, submitted_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *;
            "#,
        )
        .bind(&new.wallet_address)
        .bind(&new.charity_name)
        .bind(&new.description)
        .bind(&new.email)
        .bind(&new.verification_document_url)
        .bind(&new.website_url)
        .bind(&new.logo_url)
        .bind(RequestStatus::Pending)
        .bind(Utc::now().naive_utc())
        .fetch_one(&self.pool)
        .await?;
        log::debug!("Stored charity request {}", saved.id);
        Ok(saved)
    }

    pub async fn all_charity_requests(&self) -> Result<Vec<CharityRequest>, AppError> {
        let requests =
            sqlx::query_as::<_, CharityRequest>("SELECT * FROM charity_requests ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(requests)
    }

    pub async fn charity_request_by_id(
        &self,
        id: i64,
    ) -> Result<Option<CharityRequest>, AppError> {
        let request =
            sqlx::query_as::<_, CharityRequest>("SELECT * FROM charity_requests WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(request)
    }

    /// Atomic compare-and-set from PENDING. Returns `None` when the request
    /// exists but is no longer pending, which serializes concurrent
    /// approve/reject calls per request id to exactly one winner.
    pub async fn transition_request_from_pending(
        &self,
        id: i64,
        to: RequestStatus,
    ) -> Result<Option<CharityRequest>, AppError> {
        let updated = sqlx::query_as::<_, CharityRequest>(
            "UPDATE charity_requests SET status = ? WHERE id = ? AND status = ? RETURNING *",
        )
        .bind(to)
        .bind(id)
        .bind(RequestStatus::Pending)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    /// Unconditional status write for the admin override.
    pub async fn set_request_status(
        &self,
        id: i64,
        status: RequestStatus,
    ) -> Result<Option<CharityRequest>, AppError> {
        let updated = sqlx::query_as::<_, CharityRequest>(
            "UPDATE charity_requests SET status = ? WHERE id = ? RETURNING *",
        )
        .bind(status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    pub async fn update_charity_request(
        &self,
        request: &CharityRequest,
    ) -> Result<CharityRequest, AppError> {
        let updated = sqlx::query_as::<_, CharityRequest>(
            r#"
            UPDATE charity_requests SET
                wallet_address = ?, charity_name = ?, description = ?,
                email = ?, website_url = ?, logo_url = ?
            WHERE id = ?
            RETURNING *;
            "#,
        )
        .bind(&request.wallet_address)
        .bind(&request.charity_name)
        .bind(&request.description)
        .bind(&request.email)
        .bind(&request.website_url)
        .bind(&request.logo_url)
        .bind(request.id)
        .fetch_one(&self.pool)
        .await?;
        Ok(updated)
    }

    pub async fn delete_charity_request(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM charity_requests WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- campaigns -------------------------------------------------------

    /// Creation always stores ACTIVE, whatever status the caller supplied.
    pub async fn save_campaign(&self, new: &NewCampaign) -> Result<Campaign, AppError> {
        new.validate()?;
        let saved = sqlx::query_as::<_, Campaign>(
            r#"
            INSERT INTO campaigns (
                title, description, goal_amount, raised_amount, wallet_address,
                duration_days, status, charity_name, created_at
            ) VALUES (?, ?, ?, '0', ?, ?, ?, ?, ?)
            RETURNING *;
            "#,
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.goal_amount)
        .bind(&new.wallet_address)
        .bind(new.duration_days)
        .bind(CampaignStatus::Active)
        .bind(&new.charity_name)
        .bind(Utc::now().naive_utc())
        .fetch_one(&self.pool)
        .await?;
        log::debug!("Created campaign {} ({})", saved.id, saved.title);
        Ok(saved)
    }

    pub async fn campaigns_by_wallet(&self, wallet: &str) -> Result<Vec<Campaign>, AppError> {
        let campaigns = sqlx::query_as::<_, Campaign>(
            "SELECT * FROM campaigns WHERE wallet_address = ? ORDER BY id",
        )
        .bind(wallet)
        .fetch_all(&self.pool)
        .await?;
        self.with_raised(campaigns).await
    }

    pub async fn active_campaigns(&self) -> Result<Vec<Campaign>, AppError> {
        let campaigns =
            sqlx::query_as::<_, Campaign>("SELECT * FROM campaigns WHERE status = ? ORDER BY id")
                .bind(CampaignStatus::Active)
                .fetch_all(&self.pool)
                .await?;
        self.with_raised(campaigns).await
    }

    /// `raised_amount` is derived from the ledger on every read rather than
    /// trusted from the stored row.
    async fn with_raised(&self, campaigns: Vec<Campaign>) -> Result<Vec<Campaign>, AppError> {
        let mut out = Vec::with_capacity(campaigns.len());
        for mut campaign in campaigns {
            let amounts: Vec<String> =
                sqlx::query_scalar("SELECT amount FROM donations WHERE campaign_id = ?")
                    .bind(campaign.id)
                    .fetch_all(&self.pool)
                    .await?;
            campaign.raised_amount = crate::stats::sum_amounts(amounts.iter().map(String::as_str))
                .normalize()
                .to_string();
            out.push(campaign);
        }
        Ok(out)
    }
}
