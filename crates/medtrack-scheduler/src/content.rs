//! Reminder text.

use chrono::NaiveDate;
use medtrack_core::dosage;
use medtrack_core::types::{DoctorVacation, Drug, ScheduleKind};
use std::fmt::Write;

pub const WEEKLY_SUBJECT: &str = "Weekly Medicine Reminder - Time to Set Up Pills";
pub const REORDER_SUBJECT: &str = "Medicine Reorder";
pub const TEST_SUBJECT: &str = "Medicine Tracker - Test Email";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderMessage {
    pub subject: String,
    pub body: String,
}

/// Extra facts for a reorder reminder.
#[derive(Debug, Clone, Default)]
pub struct ReorderContext<'a> {
    /// Doctor vacation covering today.
    pub vacation: Option<&'a DoctorVacation>,
    /// No drug has been refilled yet this quarter.
    pub first_order_of_quarter: bool,
    /// Whose prescriptions are requested.
    pub patient: Option<&'a str>,
    pub signature: Option<&'a str>,
}

/// Pill counts without a trailing `.0`.
fn pills(n: f64) -> String {
    if n.fract() == 0.0 { format!("{n:.0}") } else { format!("{n}") }
}

fn drug_block(out: &mut String, drug: &Drug, today: NaiveDate, with_package: bool) {
    let summary = dosage::compute(drug, today);
    let _ = write!(out, "• {}", drug.name);
    if let Some(strength) = &drug.dosage_strength {
        let _ = write!(out, " ({strength})");
    }
    out.push('\n');
    if with_package {
        let _ = writeln!(out, "  Package size: {} pills", drug.package_size);
    }
    match drug.schedule_type {
        ScheduleKind::WeeklyAlternating => {
            let _ = writeln!(out, "  Schedule: weekly alternating ({} week)", summary.current_week_type);
            let _ = writeln!(out, "  This week: {} pills", pills(summary.current_week_pills));
        }
        ScheduleKind::Daily => {
            let _ = writeln!(out, "  Daily: {} pill(s)", pills(summary.daily_consumption));
        }
    }
    let _ = writeln!(out, "  Pills remaining: {}", pills(drug.current_amount));
    let _ = writeln!(out, "  Days remaining: {:.1} days", summary.days_remaining);
    out.push('\n');
}

/// Weekly pill-box setup reminder over every drug.
pub fn weekly_setup(drugs: &[Drug], today: NaiveDate) -> ReminderMessage {
    let mut body = String::from("Hello! It's time to set up the medicines for the week.\n\n");
    body.push_str("Current Medicine Plan:\n");
    body.push_str(&"-".repeat(50));
    body.push_str("\n\n");
    if drugs.is_empty() {
        body.push_str("No medicines are tracked yet.\n\n");
    }
    for drug in drugs {
        drug_block(&mut body, drug, today, false);
    }
    body.push_str("Have a great week!\n");
    ReminderMessage { subject: WEEKLY_SUBJECT.into(), body }
}

/// Prescription request for the drugs running low.
pub fn reorder(drugs: &[&Drug], ctx: &ReorderContext<'_>, today: NaiveDate) -> ReminderMessage {
    let subject = match ctx.patient {
        Some(patient) => format!("{REORDER_SUBJECT} - {patient}"),
        None => REORDER_SUBJECT.to_string(),
    };

    let mut body = String::from("Hello,\n\n");
    match ctx.patient {
        Some(patient) => {
            let _ = writeln!(body, "prescriptions are needed for the following medicines for {patient}:\n");
        }
        None => body.push_str("prescriptions are needed for the following medicines:\n\n"),
    }
    for drug in drugs {
        drug_block(&mut body, drug, today, true);
    }

    if let Some(vacation) = ctx.vacation {
        let _ = write!(
            body,
            "Note: the doctor is on vacation from {} to {}",
            vacation.start_date.format("%d.%m.%Y"),
            vacation.end_date.format("%d.%m.%Y")
        );
        if let Some(notes) = vacation.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            let _ = write!(body, " ({notes})");
        }
        body.push_str(". Please arrange the prescriptions with the substitute practice.\n");
    }
    if ctx.first_order_of_quarter {
        body.push_str("First order this quarter: the insurance card has to be presented.\n");
    }

    body.push_str("\nBest regards");
    if let Some(signature) = ctx.signature {
        let _ = write!(body, "\n{signature}");
    }
    body.push('\n');

    ReminderMessage { subject, body }
}

/// Message for checking the transport configuration.
pub fn test_message() -> ReminderMessage {
    ReminderMessage {
        subject: TEST_SUBJECT.into(),
        body: "This is a test email from your medicine tracking system.\n\n\
               If you can read this, reminders will be delivered."
            .into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use medtrack_core::types::DoseSlots;

    fn drug(id: i64, name: &str) -> Drug {
        Drug {
            id,
            name: name.into(),
            dosage_strength: None,
            package_size: 30,
            schedule_type: ScheduleKind::Daily,
            doses: DoseSlots::default(),
            even_week_pills: None,
            odd_week_pills: None,
            current_amount: 0.0,
            notes: None,
            last_refilled_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn moxonidin() -> Drug {
        Drug {
            dosage_strength: Some("0.2mg".into()),
            doses: DoseSlots { morning_post_food: 2.0, evening_post_food: 1.0, ..Default::default() },
            current_amount: 9.0,
            ..drug(1, "Moxonidin")
        }
    }

    fn alternating() -> Drug {
        Drug {
            schedule_type: ScheduleKind::WeeklyAlternating,
            even_week_pills: Some(4.0),
            odd_week_pills: Some(3.0),
            current_amount: 35.0,
            ..drug(2, "L-Thyroxin")
        }
    }

    fn monday_even() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
    }

    #[test]
    fn test_weekly_blocks() {
        let msg = weekly_setup(&[moxonidin(), alternating()], monday_even());
        assert_eq!(msg.subject, WEEKLY_SUBJECT);
        assert!(msg.body.contains("• Moxonidin (0.2mg)\n  Daily: 3 pill(s)\n"));
        assert!(msg.body.contains("  Pills remaining: 9\n  Days remaining: 3.0 days\n"));
        assert!(msg.body.contains("• L-Thyroxin\n  Schedule: weekly alternating (even week)\n  This week: 4 pills\n"));
        assert!(msg.body.contains("Days remaining: 70.0 days"));
        assert!(!msg.body.contains("Package size"));
    }

    #[test]
    fn test_weekly_empty_still_has_body() {
        let msg = weekly_setup(&[], monday_even());
        assert!(msg.body.contains("No medicines are tracked yet."));
        assert!(msg.body.ends_with("Have a great week!\n"));
    }

    #[test]
    fn test_reorder_plain() {
        let mox = moxonidin();
        let msg = reorder(&[&mox], &ReorderContext::default(), monday_even());
        assert_eq!(msg.subject, REORDER_SUBJECT);
        assert!(msg.body.contains("Package size: 30 pills"));
        assert!(msg.body.contains("Days remaining: 3.0 days"));
        assert!(!msg.body.contains("vacation"));
        assert!(!msg.body.contains("insurance card"));
    }

    #[test]
    fn test_reorder_with_context() {
        let mox = moxonidin();
        let vacation = DoctorVacation {
            id: 1,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 12).unwrap(),
            notes: Some("Dr. Weber covers".into()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let ctx = ReorderContext {
            vacation: Some(&vacation),
            first_order_of_quarter: true,
            patient: Some("Dora L."),
            signature: Some("Jan"),
        };
        let msg = reorder(&[&mox], &ctx, monday_even());
        assert_eq!(msg.subject, "Medicine Reorder - Dora L.");
        assert!(msg.body.contains("following medicines for Dora L.:"));
        assert!(msg.body.contains("vacation from 02.01.2025 to 12.01.2025 (Dr. Weber covers)"));
        assert!(msg.body.contains("insurance card"));
        assert!(msg.body.ends_with("Best regards\nJan\n"));
    }

    #[test]
    fn test_pill_formatting() {
        assert_eq!(pills(3.0), "3");
        assert_eq!(pills(2.5), "2.5");
    }
}
