use tracing::warn;

use crate::models::{BaseRow, RegistrationPayload, RosterRow};

/// In-memory roster state for the course/module the operator is working on.
///
/// Two writers exist: the reconciliation pass (wholesale replacement) and
/// the registrar (mark_sent). Two course/module pairs are tracked
/// separately: `requested` is the staleness guard key recorded by
/// `begin_pass`, `committed` is the pair the held rows actually belong to
/// and moves only inside a successful `apply_pass`. A pass that fails in
/// flight therefore leaves the previous rows labelled with their own
/// course, never with the one that failed to load.
#[derive(Default)]
pub struct RosterStore {
    requested: Option<(String, String)>,
    committed: Option<(String, String)>,
    base: Vec<BaseRow>,
    rows: Vec<RosterRow>,
}

impl RosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record which course/module the operator asked for. Rows from any
    /// earlier in-flight pass keyed differently will be discarded.
    pub fn begin_pass(&mut self, kurskod: &str, modulkod: &str) {
        self.requested = Some((kurskod.to_string(), modulkod.to_string()));
    }

    pub fn is_current(&self, kurskod: &str, modulkod: &str) -> bool {
        self.requested
            .as_ref()
            .is_some_and(|(k, m)| k == kurskod && m == modulkod)
    }

    /// Install the result of a reconciliation pass, unless the operator has
    /// since asked for a different course/module.
    pub fn apply_pass(
        &mut self,
        kurskod: &str,
        modulkod: &str,
        base: Vec<BaseRow>,
        rows: Vec<RosterRow>,
    ) -> bool {
        if !self.is_current(kurskod, modulkod) {
            warn!(
                "discarding stale pass for {}/{} (current is {:?})",
                kurskod, modulkod, self.requested
            );
            return false;
        }
        self.committed = Some((kurskod.to_string(), modulkod.to_string()));
        self.base = base;
        self.rows = rows;
        true
    }

    /// The course/module the held rows belong to. Payload stamping and the
    /// status surface read this, never the requested pass key.
    pub fn context(&self) -> Option<(String, String)> {
        self.committed.clone()
    }

    pub fn base_rows(&self) -> Vec<BaseRow> {
        self.base.clone()
    }

    pub fn rows(&self) -> &[RosterRow] {
        &self.rows
    }

    fn row_mut(&mut self, student_id: &str) -> Option<&mut RosterRow> {
        self.rows.iter_mut().find(|r| r.student_id == student_id)
    }

    /// Flip the selection flag. Unknown rows, rows without a personnummer
    /// and already-sent rows are left untouched.
    pub fn toggle_selected(&mut self, student_id: &str) -> Option<RosterRow> {
        let row = self.row_mut(student_id)?;
        if row.personnummer.is_some() && !row.sent {
            row.selected = !row.selected;
        }
        Some(row.clone())
    }

    /// Free-form; whether the grade makes a submittable row is decided by
    /// the eligibility filter, not here.
    pub fn set_grade(&mut self, student_id: &str, grade: &str) -> Option<RosterRow> {
        let row = self.row_mut(student_id)?;
        row.grade = if grade.is_empty() {
            None
        } else {
            Some(grade.to_string())
        };
        Some(row.clone())
    }

    pub fn set_date(&mut self, student_id: &str, date: &str) -> Option<RosterRow> {
        let row = self.row_mut(student_id)?;
        row.date = date.to_string();
        Some(row.clone())
    }

    /// Payloads for every row passing the submission invariant, built for
    /// the store's current course/module.
    pub fn eligible_payloads(&self) -> Vec<RegistrationPayload> {
        let Some((kurskod, modulkod)) = self.context() else {
            return Vec::new();
        };

        self.rows
            .iter()
            .filter(|r| r.is_eligible())
            .map(|r| RegistrationPayload {
                personnummer: r.personnummer.clone().unwrap_or_default(),
                kurskod: kurskod.clone(),
                modulkod: modulkod.clone(),
                datum: r.date.clone(),
                betyg: r.grade.clone().unwrap_or_default(),
            })
            .collect()
    }

    /// Optimistic post-submission update: the matched rows are sent, their
    /// selection is cleared. The next overlay merge is authoritative.
    pub fn mark_sent(&mut self, personnummer: &[String]) {
        for row in &mut self.rows {
            let Some(pnr) = &row.personnummer else { continue };
            if personnummer.iter().any(|p| p == pnr) {
                row.sent = true;
                row.registration_status = Some("registered".to_string());
                row.selected = false;
            }
        }
    }
}
