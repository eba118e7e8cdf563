use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::connectors::LadokClient;
use crate::error::AppError;
use crate::models::RegistrationResult;
use crate::services::reconcile::refresh_overlay;
use crate::services::store::RosterStore;

#[derive(Debug, Serialize)]
pub struct RegisterSummary {
    pub ok: usize,
    pub fail: usize,
    pub message: String,
}

#[derive(Debug, PartialEq, Eq)]
enum SubmitOutcome {
    Registered,
    AlreadyRegistered,
    Rejected,
}

/// Ladok's answer, classified. "registered" is a plain success; a blocked
/// duplicate whose message mentions "already" is an idempotent re-submit
/// and counts as success too.
fn classify(result: &RegistrationResult) -> SubmitOutcome {
    if result.status.eq_ignore_ascii_case("registered") {
        SubmitOutcome::Registered
    } else if result.message.to_lowercase().contains("already") {
        SubmitOutcome::AlreadyRegistered
    } else {
        SubmitOutcome::Rejected
    }
}

/// Submits the selected rows to Ladok, one request at a time. Registration
/// writes to a shared external ledger; serializing them keeps failure
/// attribution unambiguous.
pub struct RegisterService {
    ladok: Arc<dyn LadokClient>,
    store: Arc<RwLock<RosterStore>>,
}

impl RegisterService {
    pub fn new(ladok: Arc<dyn LadokClient>, store: Arc<RwLock<RosterStore>>) -> Self {
        Self { ladok, store }
    }

    pub async fn register_selected(&self) -> Result<RegisterSummary, AppError> {
        let payloads = {
            let store = self.store.read().await;
            if store.context().is_none() {
                return Err(AppError::BadRequest(
                    "no course/module loaded, reload the roster first".to_string(),
                ));
            }
            store.eligible_payloads()
        };

        info!("registering {} results in ladok", payloads.len());

        let mut ok = 0;
        let mut fail = 0;
        let mut succeeded: Vec<String> = Vec::new();

        for payload in &payloads {
            match self.ladok.submit_result(payload).await {
                Ok(result) => match classify(&result) {
                    SubmitOutcome::Registered => {
                        ok += 1;
                        succeeded.push(payload.personnummer.clone());
                    }
                    SubmitOutcome::AlreadyRegistered => {
                        info!(
                            "result for {} was already registered, counting as success",
                            payload.personnummer
                        );
                        ok += 1;
                        succeeded.push(payload.personnummer.clone());
                    }
                    SubmitOutcome::Rejected => {
                        warn!(
                            "ladok rejected result for {}: {} {}",
                            payload.personnummer, result.status, result.message
                        );
                        fail += 1;
                    }
                },
                Err(e) => {
                    warn!("submission for {} failed: {}", payload.personnummer, e);
                    fail += 1;
                }
            }
        }

        if ok > 0 {
            self.store.write().await.mark_sent(&succeeded);

            // The optimistic update above is a guess; Ladok's roster is the
            // truth. A failed refresh leaves the guess standing until the
            // next successful pass.
            if let Err(e) = refresh_overlay(self.ladok.as_ref(), &self.store).await {
                warn!("overlay refresh after registration failed: {}", e);
            }
        }

        let message = format!("Klar: {} registrerade, {} fel", ok, fail);
        info!("{}", message);

        Ok(RegisterSummary { ok, fail, message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(status: &str, message: &str) -> RegistrationResult {
        RegistrationResult {
            resultat_id: None,
            status: status.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn registered_status_is_success_case_insensitively() {
        assert_eq!(classify(&result("registered", "")), SubmitOutcome::Registered);
        assert_eq!(classify(&result("REGISTERED", "")), SubmitOutcome::Registered);
        assert_eq!(classify(&result("Registered", "ok")), SubmitOutcome::Registered);
    }

    #[test]
    fn already_registered_message_is_success() {
        assert_eq!(
            classify(&result("blocked", "Result already registered")),
            SubmitOutcome::AlreadyRegistered
        );
        assert_eq!(
            classify(&result("DUPLICATE", "ALREADY exists")),
            SubmitOutcome::AlreadyRegistered
        );
    }

    #[test]
    fn anything_else_is_a_failure() {
        assert_eq!(classify(&result("error", "invalid grade")), SubmitOutcome::Rejected);
        assert_eq!(classify(&result("", "")), SubmitOutcome::Rejected);
    }
}
