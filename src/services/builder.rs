use std::collections::{HashMap, HashSet};

use tracing::{info, warn};

use crate::connectors::{CanvasClient, StudentItsClient};
use crate::error::AppError;
use crate::models::BaseRow;

/// Build the canonical per-student rows for a course: the Canvas roster
/// cleaned up and enriched with personnummer from StudentITS.
///
/// A roster fetch failure aborts the pass. A lookup-batch failure degrades
/// to "no identifiers resolved"; partial data beats none for the operator.
pub async fn build_base_rows(
    canvas: &dyn CanvasClient,
    studentits: &dyn StudentItsClient,
    kurskod: &str,
) -> Result<Vec<BaseRow>, AppError> {
    let roster = canvas.list_roster(kurskod).await?;

    let mut seen = HashSet::new();
    let mut cleaned = Vec::new();
    for item in roster {
        let student_id = item.student_id.trim().to_string();
        let name = item.name.trim().to_string();
        if student_id.is_empty() || name.is_empty() {
            warn!("skipping roster entry with empty id or name");
            continue;
        }
        if !seen.insert(student_id.clone()) {
            warn!("skipping duplicate roster entry: {}", student_id);
            continue;
        }
        cleaned.push((student_id, name));
    }

    let ids: Vec<String> = cleaned.iter().map(|(id, _)| id.clone()).collect();

    let pnr_map: HashMap<String, String> = match studentits.lookup_batch(&ids).await {
        Ok(map) => map,
        Err(e) => {
            warn!("personnummer batch lookup failed, continuing without identifiers: {}", e);
            HashMap::new()
        }
    };

    let rows: Vec<BaseRow> = cleaned
        .into_iter()
        .map(|(student_id, name)| {
            let personnummer = pnr_map.get(&student_id).cloned();
            BaseRow {
                student_id,
                name,
                personnummer,
            }
        })
        .collect();

    info!(
        "built {} base rows for {} ({} with personnummer)",
        rows.len(),
        kurskod,
        rows.iter().filter(|r| r.personnummer.is_some()).count()
    );

    Ok(rows)
}
