use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;

use crate::connectors::{CanvasClient, LadokClient, StudentItsClient};
use crate::error::AppError;
use crate::services::builder::build_base_rows;
use crate::services::merge::{index_by_personnummer, local_today, merge};
use crate::services::store::RosterStore;

#[derive(Debug, Serialize)]
pub struct ReloadStats {
    pub rows: usize,
    pub with_personnummer: usize,
    pub already_sent: usize,
    pub applied: bool,
}

/// Runs full reconciliation passes: Canvas roster + StudentITS identifiers,
/// then the Ladok overlay merge, guarded against stale application.
pub struct ReconcileService {
    canvas: Arc<dyn CanvasClient>,
    studentits: Arc<dyn StudentItsClient>,
    ladok: Arc<dyn LadokClient>,
    store: Arc<RwLock<RosterStore>>,
}

impl ReconcileService {
    pub fn new(
        canvas: Arc<dyn CanvasClient>,
        studentits: Arc<dyn StudentItsClient>,
        ladok: Arc<dyn LadokClient>,
        store: Arc<RwLock<RosterStore>>,
    ) -> Self {
        Self {
            canvas,
            studentits,
            ladok,
            store,
        }
    }

    pub async fn reload(&self, kurskod: &str, modulkod: &str) -> Result<ReloadStats, AppError> {
        if kurskod.trim().is_empty() {
            return Err(AppError::BadRequest("kurskod is required".to_string()));
        }
        if modulkod.trim().is_empty() {
            return Err(AppError::BadRequest("modulkod is required".to_string()));
        }

        info!("reconciliation pass for {}/{}", kurskod, modulkod);
        self.store.write().await.begin_pass(kurskod, modulkod);

        // Roster first, overlay second; both fetches are fatal for the pass.
        let base = build_base_rows(self.canvas.as_ref(), self.studentits.as_ref(), kurskod).await?;
        let results = self.ladok.get_results(kurskod, modulkod).await?;

        let overlay = index_by_personnummer(results);
        let rows = merge(&base, &overlay, local_today());

        let stats = ReloadStats {
            rows: rows.len(),
            with_personnummer: rows.iter().filter(|r| r.personnummer.is_some()).count(),
            already_sent: rows.iter().filter(|r| r.sent).count(),
            applied: false,
        };

        let applied = self
            .store
            .write()
            .await
            .apply_pass(kurskod, modulkod, base, rows);

        info!(
            "pass for {}/{} done: {} rows, applied={}",
            kurskod, modulkod, stats.rows, applied
        );

        Ok(ReloadStats { applied, ..stats })
    }
}

/// Re-run only the Ladok overlay merge against the base rows already in the
/// store. Used after a submission batch to replace the optimistic row state
/// with server-confirmed truth.
pub async fn refresh_overlay(
    ladok: &dyn LadokClient,
    store: &RwLock<RosterStore>,
) -> Result<usize, AppError> {
    let (kurskod, modulkod, base) = {
        let store = store.read().await;
        let Some((kurskod, modulkod)) = store.context() else {
            return Err(AppError::BadRequest("no roster loaded".to_string()));
        };
        (kurskod, modulkod, store.base_rows())
    };

    let results = ladok.get_results(&kurskod, &modulkod).await?;
    let overlay = index_by_personnummer(results);
    let rows = merge(&base, &overlay, local_today());
    let count = rows.len();

    store.write().await.apply_pass(&kurskod, &modulkod, base, rows);
    Ok(count)
}
