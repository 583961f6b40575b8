//! Reorder evaluator.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone};

use crate::dosage;
use crate::types::Drug;

/// Drugs whose supply is below the reorder threshold, in input order.
pub fn needing_reorder(drugs: &[Drug]) -> Vec<&Drug> {
    drugs.iter().filter(|d| dosage::needs_reorder(d)).collect()
}

/// Calendar quarter (1-4) of a date.
pub fn quarter_of(date: NaiveDate) -> u32 {
    (date.month() - 1) / 3 + 1
}

/// True when no drug was refilled in the quarter containing `now`.
///
/// Refill timestamps are compared as dates in `now`'s time zone. The first
/// prescription of a quarter requires the insurance card at the practice, so
/// reorder reminders call it out.
pub fn is_first_order_of_quarter<Tz: TimeZone>(drugs: &[Drug], now: &DateTime<Tz>) -> bool {
    let today = now.date_naive();
    let quarter = (today.year(), quarter_of(today));
    let tz = now.timezone();
    !drugs.iter().filter_map(|d| d.last_refilled_at).any(|refilled| {
        let refilled = refilled.with_timezone(&tz).date_naive();
        (refilled.year(), quarter_of(refilled)) == quarter
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DoseSlots, ScheduleKind};
    use chrono::{FixedOffset, Utc};

    fn drug(id: i64, per_day: f64, amount: f64) -> Drug {
        Drug {
            id,
            name: format!("drug-{id}"),
            dosage_strength: None,
            package_size: 30,
            schedule_type: ScheduleKind::Daily,
            doses: DoseSlots { morning_post_food: per_day, ..Default::default() },
            even_week_pills: None,
            odd_week_pills: None,
            current_amount: amount,
            notes: None,
            last_refilled_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_subset_preserves_order() {
        let drugs = vec![
            drug(1, 1.0, 5.0),   // reorder
            drug(2, 1.0, 100.0), // fine
            drug(3, 2.0, 20.0),  // reorder
            drug(4, 1.0, 21.0),  // exactly 3 weeks, fine
            drug(5, 0.0, 10.0),  // no consumption, reorder
        ];
        let ids: Vec<i64> = needing_reorder(&drugs).iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }

    #[test]
    fn test_empty_input() {
        assert!(needing_reorder(&[]).is_empty());
    }

    #[test]
    fn test_quarter_of() {
        let q = |m| quarter_of(NaiveDate::from_ymd_opt(2025, m, 15).unwrap());
        assert_eq!((q(1), q(3), q(4), q(6), q(7), q(9), q(10), q(12)), (1, 1, 2, 2, 3, 3, 4, 4));
    }

    #[test]
    fn test_first_order_of_quarter() {
        let today = Utc.with_ymd_and_hms(2025, 5, 20, 9, 0, 0).unwrap();
        let mut drugs = vec![drug(1, 1.0, 5.0), drug(2, 1.0, 5.0)];
        assert!(is_first_order_of_quarter(&drugs, &today));

        // refilled last quarter
        drugs[0].last_refilled_at = Some(Utc.with_ymd_and_hms(2025, 3, 31, 12, 0, 0).unwrap());
        assert!(is_first_order_of_quarter(&drugs, &today));

        // same quarter a year earlier
        drugs[1].last_refilled_at = Some(Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap());
        assert!(is_first_order_of_quarter(&drugs, &today));

        drugs[1].last_refilled_at = Some(Utc.with_ymd_and_hms(2025, 4, 2, 12, 0, 0).unwrap());
        assert!(!is_first_order_of_quarter(&drugs, &today));
    }

    #[test]
    fn test_quarter_uses_local_refill_date() {
        let berlin = FixedOffset::east_opt(2 * 3600).unwrap();
        let today = berlin.with_ymd_and_hms(2025, 4, 15, 9, 0, 0).unwrap();
        let mut drugs = vec![drug(1, 1.0, 5.0)];

        // 00:30 local on the first day of Q2 is still March 31 in UTC
        let refilled = berlin.with_ymd_and_hms(2025, 4, 1, 0, 30, 0).unwrap().with_timezone(&Utc);
        assert_eq!(refilled.date_naive(), NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
        drugs[0].last_refilled_at = Some(refilled);
        assert!(!is_first_order_of_quarter(&drugs, &today));

        // 23:30 local on March 31 is still the first quarter
        let refilled = berlin.with_ymd_and_hms(2025, 3, 31, 23, 30, 0).unwrap().with_timezone(&Utc);
        drugs[0].last_refilled_at = Some(refilled);
        assert!(is_first_order_of_quarter(&drugs, &today));
    }
}
