//! The charity-request state machine: PENDING -> APPROVED | REJECTED, both
//! terminal for the unprivileged path. Transitions are serialized per request
//! id by the store's compare-and-set, and the approval notification is
//! dispatched after the transition commits so a slow or failing transport can
//! never roll an approval back.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::error::AppError;
use crate::notify::Notification;
use crate::schema::{CharityRequest, CharityRequestUpdate, NewCharityRequest, RequestStatus};
use crate::state::DbContext;
use crate::storage::FileStore;

#[derive(Clone)]
pub struct LifecycleManager {
    db: DbContext,
    files: FileStore,
    mailer: mpsc::Sender<Notification>,
    notify_timeout: Duration,
}

impl LifecycleManager {
    pub fn new(
        db: DbContext,
        files: FileStore,
        mailer: mpsc::Sender<Notification>,
        notify_timeout: Duration,
    ) -> Self {
        Self {
            db,
            files,
            mailer,
            notify_timeout,
        }
    }

    /// Creates a new request in PENDING. The uploaded document references are
    /// already stored by the caller; this only records them.
    pub async fn submit(&self, new: NewCharityRequest) -> Result<CharityRequest, AppError> {
        let saved = self.db.save_charity_request(&new).await?;
        log::info!(
            "Charity request {} submitted by {}",
            saved.id,
            saved.wallet_address
        );
        Ok(saved)
    }

    pub async fn approve(&self, id: i64) -> Result<CharityRequest, AppError> {
        let approved = self.transition(id, RequestStatus::Approved).await?;
        log::info!("Charity request {id} approved");
        self.dispatch(Notification::approval(&approved.email)).await;
        Ok(approved)
    }

    pub async fn reject(&self, id: i64) -> Result<CharityRequest, AppError> {
        let rejected = self.transition(id, RequestStatus::Rejected).await?;
        log::info!("Charity request {id} rejected");
        Ok(rejected)
    }

    async fn transition(&self, id: i64, to: RequestStatus) -> Result<CharityRequest, AppError> {
        match self.db.transition_request_from_pending(id, to).await? {
            Some(request) => Ok(request),
            None => match self.db.charity_request_by_id(id).await? {
                Some(request) => Err(AppError::Conflict(format!(
                    "charity request {id} is already {:?}",
                    request.status
                ))),
                None => Err(AppError::NotFound(format!("no charity request with id {id}"))),
            },
        }
    }

    /// Privileged override: sets any status directly, including moving a
    /// request out of a terminal state. Authorization is the calling layer's
    /// concern.
    pub async fn update_by_admin(
        &self,
        id: i64,
        status: RequestStatus,
    ) -> Result<CharityRequest, AppError> {
        let updated = self
            .db
            .set_request_status(id, status)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no charity request with id {id}")))?;
        log::info!("Charity request {id} set to {status:?} by admin");
        Ok(updated)
    }

    /// Field updates are allowed in any state. When the logo is declared
    /// changed, a replacement must be supplied and the old stored reference is
    /// released before the new one is recorded.
    pub async fn update_details(
        &self,
        id: i64,
        update: CharityRequestUpdate,
        logo_changed: bool,
        new_logo: Option<String>,
    ) -> Result<CharityRequest, AppError> {
        if logo_changed && new_logo.is_none() {
            return Err(AppError::Validation(
                "logo declared changed but no replacement logo was supplied".into(),
            ));
        }

        let mut request = self
            .db
            .charity_request_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no charity request with id {id}")))?;

        if logo_changed {
            if let Some(old) = request.logo_url.take() {
                if let Err(err) = self.files.delete(&old).await {
                    log::warn!("Failed to release old logo {old}: {err:#}");
                }
            }
            request.logo_url = new_logo;
        }
        if let Some(wallet) = update.wallet_address {
            request.wallet_address = wallet;
        }
        if let Some(name) = update.charity_name {
            request.charity_name = name;
        }
        if let Some(description) = update.description {
            request.description = description;
        }
        if let Some(email) = update.email {
            request.email = email;
        }
        if let Some(website) = update.website_url {
            request.website_url = Some(website);
        }

        self.db.update_charity_request(&request).await
    }

    /// Permanent removal. Stored files are not cascaded; cleaning up orphaned
    /// uploads is the caller's responsibility.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.db.delete_charity_request(id).await? {
            return Err(AppError::NotFound(format!("no charity request with id {id}")));
        }
        log::info!("Charity request {id} deleted");
        Ok(())
    }

    /// Best-effort, at-least-once intent: a full queue or stopped dispatcher
    /// is logged and swallowed, never surfaced to the approval caller.
    async fn dispatch(&self, mail: Notification) {
        match tokio::time::timeout(self.notify_timeout, self.mailer.send(mail)).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => log::warn!("Approval notification dropped: {err}"),
            Err(_) => log::warn!(
                "Approval notification timed out after {:?}",
                self.notify_timeout
            ),
        }
    }
}
