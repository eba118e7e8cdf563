use std::collections::HashMap;

use chrono::{Local, NaiveDate};
use tracing::warn;

use crate::connectors::ladok::LadokResultEntry;
use crate::models::{BaseRow, RosterRow};

/// Today as the operator's wall calendar says, from local date components.
/// Slicing a UTC timestamp here is off by one day near midnight east or
/// west of Greenwich.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Index Ladok's module roster by personnummer. First entry wins on
/// duplicates.
pub fn index_by_personnummer(
    entries: Vec<LadokResultEntry>,
) -> HashMap<String, LadokResultEntry> {
    let mut index = HashMap::new();
    for entry in entries {
        if entry.personnummer.is_empty() {
            continue;
        }
        if index.contains_key(&entry.personnummer) {
            warn!("duplicate personnummer in ladok roster: {}", entry.personnummer);
            continue;
        }
        index.insert(entry.personnummer.clone(), entry);
    }
    index
}

/// Join the base roster against Ladok's recorded results. Rows without a
/// personnummer get no overlay. Selection always starts unset.
pub fn merge(
    base: &[BaseRow],
    overlay: &HashMap<String, LadokResultEntry>,
    today: NaiveDate,
) -> Vec<RosterRow> {
    let today = today.format("%Y-%m-%d").to_string();

    base.iter()
        .map(|b| {
            let entry = b
                .personnummer
                .as_ref()
                .and_then(|pnr| overlay.get(pnr));

            let grade = entry.and_then(|e| e.betyg.clone());
            let date = entry
                .and_then(|e| e.datum.clone())
                .unwrap_or_else(|| today.clone());
            let sent = entry.is_some_and(|e| e.is_sent());
            let registration_status = entry.and_then(|e| e.effective_status());
            let registered_at = entry.and_then(|e| e.registered_at.clone());

            RosterRow {
                student_id: b.student_id.clone(),
                name: b.name.clone(),
                personnummer: b.personnummer.clone(),
                grade,
                date,
                selected: false,
                sent,
                registration_status,
                registered_at,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use serde_json::json;

    fn base(student_id: &str, personnummer: Option<&str>) -> BaseRow {
        BaseRow {
            student_id: student_id.to_string(),
            name: format!("Student {}", student_id),
            personnummer: personnummer.map(|p| p.to_string()),
        }
    }

    fn entry(personnummer: &str) -> LadokResultEntry {
        LadokResultEntry {
            personnummer: personnummer.to_string(),
            ..Default::default()
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn overlay_grade_and_date_take_precedence() {
        let mut e = entry("900101-1234");
        e.betyg = Some("B".to_string());
        e.datum = Some("2024-02-15".to_string());
        let overlay = index_by_personnummer(vec![e]);

        let rows = merge(&[base("abcd-1", Some("900101-1234"))], &overlay, today());
        assert_eq!(rows[0].grade.as_deref(), Some("B"));
        assert_eq!(rows[0].date, "2024-02-15");
    }

    #[test]
    fn missing_overlay_defaults_to_today_and_no_grade() {
        let rows = merge(&[base("abcd-1", Some("900101-1234"))], &HashMap::new(), today());
        assert_eq!(rows[0].grade, None);
        assert_eq!(rows[0].date, "2024-03-01");
        assert!(!rows[0].sent);
        assert!(!rows[0].selected);
    }

    #[test]
    fn row_without_personnummer_gets_no_overlay() {
        let mut e = entry("900101-1234");
        e.betyg = Some("A".to_string());
        let overlay = index_by_personnummer(vec![e]);

        let rows = merge(&[base("abcd-1", None)], &overlay, today());
        assert_eq!(rows[0].grade, None);
        assert!(!rows[0].sent);
    }

    #[test]
    fn sent_requires_literal_boolean_true() {
        let cases = [
            (json!(true), true),
            (json!("true"), false),
            (json!(1), false),
            (json!(false), false),
            (json!(null), false),
        ];

        for (value, expected) in cases {
            let mut e = entry("900101-1234");
            e.sent = Some(value.clone());
            let overlay = index_by_personnummer(vec![e]);
            let rows = merge(&[base("abcd-1", Some("900101-1234"))], &overlay, today());
            assert_eq!(rows[0].sent, expected, "sent = {}", value);
        }
    }

    #[test]
    fn missing_sent_field_means_not_sent() {
        let overlay = index_by_personnummer(vec![entry("900101-1234")]);
        let rows = merge(&[base("abcd-1", Some("900101-1234"))], &overlay, today());
        assert!(!rows[0].sent);
    }

    #[test]
    fn ladok_status_preferred_over_generic_status() {
        let mut e = entry("900101-1234");
        e.status = Some("REGISTERED".to_string());
        e.ladok_status = Some("registrerad".to_string());
        let overlay = index_by_personnummer(vec![e]);

        let rows = merge(&[base("abcd-1", Some("900101-1234"))], &overlay, today());
        assert_eq!(rows[0].registration_status.as_deref(), Some("registrerad"));
    }

    #[test]
    fn generic_status_used_when_specific_absent() {
        let mut e = entry("900101-1234");
        e.status = Some("REGISTERED".to_string());
        let overlay = index_by_personnummer(vec![e]);

        let rows = merge(&[base("abcd-1", Some("900101-1234"))], &overlay, today());
        assert_eq!(rows[0].registration_status.as_deref(), Some("REGISTERED"));
    }

    #[test]
    fn duplicate_personnummer_keeps_first_entry() {
        let mut first = entry("900101-1234");
        first.betyg = Some("A".to_string());
        let mut second = entry("900101-1234");
        second.betyg = Some("F".to_string());

        let overlay = index_by_personnummer(vec![first, second]);
        assert_eq!(overlay["900101-1234"].betyg.as_deref(), Some("A"));
    }

    // Local 23:50 on March 1st at UTC+2 must stay March 1st; a UTC slice
    // of the same instant can land on the wrong day.
    #[test]
    fn date_is_local_calendar_not_utc_slice() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let local = tz.with_ymd_and_hms(2024, 3, 1, 23, 50, 0).unwrap();

        assert_eq!(local.date_naive().format("%Y-%m-%d").to_string(), "2024-03-01");

        let rows = merge(
            &[base("abcd-1", Some("900101-1234"))],
            &HashMap::new(),
            local.date_naive(),
        );
        assert_eq!(rows[0].date, "2024-03-01");
    }
}
