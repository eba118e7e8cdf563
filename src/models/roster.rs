use serde::{Deserialize, Serialize};

/// One student as known to Canvas plus the resolved national identifier.
/// Built once per reconciliation pass and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseRow {
    pub student_id: String,
    pub name: String,
    /// None when the StudentITS lookup failed or found nothing.
    pub personnummer: Option<String>,
}

/// A base row annotated with Ladok state and operator-local edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterRow {
    pub student_id: String,
    pub name: String,
    pub personnummer: Option<String>,
    pub grade: Option<String>,
    /// ISO calendar date, YYYY-MM-DD.
    pub date: String,
    pub selected: bool,
    /// True only when Ladok's last known state is an affirmative
    /// registration, never from local optimism before confirmation.
    pub sent: bool,
    pub registration_status: Option<String>,
    pub registered_at: Option<String>,
}

impl RosterRow {
    /// Submission eligibility: selected, identified, graded, dated, unsent.
    pub fn is_eligible(&self) -> bool {
        self.selected
            && self.personnummer.as_deref().is_some_and(|p| !p.is_empty())
            && self.grade.as_deref().is_some_and(|g| !g.is_empty())
            && !self.date.is_empty()
            && !self.sent
    }
}
