//! Application lifecycle.
//!
//! ```text
//! Pending ──approve──▶ Approved   (terminal)
//!    │
//!    └────withdraw───▶ Withdrawn  (terminal)
//! ```
//!
//! `Rejected` exists in the status taxonomy but no transition produces it.
//! A rejected application can still be withdrawn by its candidate.

use chrono::Utc;
use tracing::warn;

use crate::errors::AppError;
use crate::models::application::{Application, ApplicationStatus};
use crate::store::RecordStore;

/// Compare-and-set attempts before a still-movable application is reported as
/// contended.
const MAX_ATTEMPTS: usize = 3;

/// Employer-side transition. Only a pending application can be approved.
pub fn approve(current: ApplicationStatus) -> Result<ApplicationStatus, AppError> {
    match current {
        ApplicationStatus::Pending => Ok(ApplicationStatus::Approved),
        ApplicationStatus::Approved => Err(AppError::InvalidTransition(
            "This application is already approved.".to_string(),
        )),
        ApplicationStatus::Withdrawn => Err(AppError::InvalidTransition(
            "This application has been withdrawn by the candidate and can't be approved."
                .to_string(),
        )),
        ApplicationStatus::Rejected => Err(AppError::InvalidTransition(
            "A rejected application can't be approved.".to_string(),
        )),
    }
}

/// Candidate-side transition. Allowed from any non-terminal status.
pub fn withdraw(current: ApplicationStatus) -> Result<ApplicationStatus, AppError> {
    match current {
        ApplicationStatus::Approved => Err(AppError::InvalidTransition(
            "Your application was already approved.".to_string(),
        )),
        ApplicationStatus::Withdrawn => Err(AppError::InvalidTransition(
            "You already withdrew this application; the action is irreversible.".to_string(),
        )),
        ApplicationStatus::Pending | ApplicationStatus::Rejected => Ok(ApplicationStatus::Withdrawn),
    }
}

/// Applies `step` to the stored application with a compare-and-set on its
/// status. A lost race re-reads the application and re-checks `step` against
/// the status the other writer left, so a now-terminal application is refused
/// with `InvalidTransition` rather than retried.
pub async fn commit(
    store: &dyn RecordStore,
    mut application: Application,
    step: fn(ApplicationStatus) -> Result<ApplicationStatus, AppError>,
) -> Result<Application, AppError> {
    for _ in 0..MAX_ATTEMPTS {
        let next = step(application.status).map_err(|e| {
            warn!(application_id = %application.id, status = %application.status, "Transition refused");
            e
        })?;
        let now = Utc::now();
        if store
            .transition_application(application.id, application.status, next, now)
            .await?
        {
            application.status = next;
            application.updated_at = Some(now);
            return Ok(application);
        }

        warn!(application_id = %application.id, "Application changed concurrently, re-reading");
        application = store
            .application(application.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;
    }
    Err(AppError::Conflict(
        "The application is being updated by another request".to_string(),
    ))
}

#[cfg(test)]
fn is_terminal(status: ApplicationStatus) -> bool {
    matches!(
        status,
        ApplicationStatus::Approved | ApplicationStatus::Withdrawn
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    async fn stored(store: &MemoryStore, status: ApplicationStatus) -> Application {
        let mut application = Application::new(uuid::Uuid::new_v4(), uuid::Uuid::new_v4());
        application.status = status;
        store.insert_application(&application).await.unwrap();
        application
    }

    #[test]
    fn test_pending_can_be_approved() {
        assert_eq!(
            approve(ApplicationStatus::Pending).unwrap(),
            ApplicationStatus::Approved
        );
    }

    #[test]
    fn test_pending_can_be_withdrawn() {
        assert_eq!(
            withdraw(ApplicationStatus::Pending).unwrap(),
            ApplicationStatus::Withdrawn
        );
    }

    #[test]
    fn test_approve_after_withdraw_is_invalid() {
        let status = withdraw(ApplicationStatus::Pending).unwrap();
        assert!(matches!(approve(status), Err(AppError::InvalidTransition(_))));
    }

    #[test]
    fn test_withdraw_after_approve_is_invalid() {
        let status = approve(ApplicationStatus::Pending).unwrap();
        assert!(matches!(withdraw(status), Err(AppError::InvalidTransition(_))));
    }

    #[test]
    fn test_approve_twice_is_invalid() {
        let status = approve(ApplicationStatus::Pending).unwrap();
        assert!(matches!(approve(status), Err(AppError::InvalidTransition(_))));
    }

    #[test]
    fn test_rejected_only_withdrawable() {
        assert!(approve(ApplicationStatus::Rejected).is_err());
        assert_eq!(
            withdraw(ApplicationStatus::Rejected).unwrap(),
            ApplicationStatus::Withdrawn
        );
    }

    #[test]
    fn test_terminal_states_accept_no_transition() {
        for status in ApplicationStatus::ALL.iter().copied().filter(|s| is_terminal(*s)) {
            assert!(approve(status).is_err());
            assert!(withdraw(status).is_err());
        }
    }

    #[tokio::test]
    async fn test_commit_writes_next_status() {
        let store = MemoryStore::new();
        let application = stored(&store, ApplicationStatus::Pending).await;

        let approved = commit(&store, application.clone(), approve).await.unwrap();
        assert_eq!(approved.status, ApplicationStatus::Approved);
        assert!(approved.updated_at.is_some());
        let persisted = store.application(application.id).await.unwrap().unwrap();
        assert_eq!(persisted.status, ApplicationStatus::Approved);
    }

    #[tokio::test]
    async fn test_commit_after_losing_to_terminal_write_is_invalid_transition() {
        let store = MemoryStore::new();
        let application = stored(&store, ApplicationStatus::Pending).await;
        store
            .interleave_transition(application.id, ApplicationStatus::Withdrawn)
            .await;

        let err = commit(&store, application.clone(), approve).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)), "{err:?}");
        let persisted = store.application(application.id).await.unwrap().unwrap();
        assert_eq!(persisted.status, ApplicationStatus::Withdrawn);
    }

    #[tokio::test]
    async fn test_commit_retries_when_status_is_still_movable() {
        let store = MemoryStore::new();
        let application = stored(&store, ApplicationStatus::Pending).await;
        store
            .interleave_transition(application.id, ApplicationStatus::Rejected)
            .await;

        let withdrawn = commit(&store, application.clone(), withdraw).await.unwrap();
        assert_eq!(withdrawn.status, ApplicationStatus::Withdrawn);
        let persisted = store.application(application.id).await.unwrap().unwrap();
        assert_eq!(persisted.status, ApplicationStatus::Withdrawn);
    }
}
