//! Rollover pass for recurring events.
//!
//! Recurring events are stored as ordinary one-occurrence rows; once an
//! occurrence has passed, the next run of [`rollover`] inserts the
//! following one. The pass is stateless and re-derives everything from
//! stored data, so it can be triggered any number of times: a duplicate
//! check on (title, starts_at) keeps repeat runs from inserting the same
//! occurrence twice. Two overlapping runs can still both pass that check
//! before either inserts; that window stays open here, and a unique
//! constraint on (title, starts_at) at the database would close it.

use chrono::{DateTime, Duration, Months, Utc};
use serde::Serialize;
use tracing::warn;

use crate::error::GrangeResult;
use crate::event::{NewEvent, Recurrence};
use crate::store::EventStore;

/// Outcome of one rollover pass.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RolloverOutcome {
    /// Number of newly inserted occurrence rows.
    pub created: usize,
}

/// The first occurrence on `recurrence`'s cadence from `start` that lies
/// strictly after `now`.
///
/// Daily and weekly cadences step in fixed 1- and 7-day periods. Monthly
/// candidates are `start` plus a whole number of calendar months, clamped
/// to the last day of months too short for the original day-of-month;
/// since every candidate is anchored at `start`, a January 31st event
/// lands on February 29th and then March 31st, not March 29th.
///
/// Returns `None` for [`Recurrence::None`] or on arithmetic overflow.
pub fn advance(
    start: DateTime<Utc>,
    recurrence: Recurrence,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match recurrence {
        Recurrence::None => None,
        Recurrence::Daily => advance_by_days(start, 1, now),
        Recurrence::Weekly => advance_by_days(start, 7, now),
        Recurrence::Monthly => {
            let mut months = 1u32;
            loop {
                let candidate = start.checked_add_months(Months::new(months))?;
                if candidate > now {
                    return Some(candidate);
                }
                months = months.checked_add(1)?;
            }
        }
    }
}

fn advance_by_days(
    start: DateTime<Utc>,
    days: i64,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let step = Duration::days(days);
    let mut candidate = start.checked_add_signed(step)?;
    while candidate <= now {
        candidate = candidate.checked_add_signed(step)?;
    }
    Some(candidate)
}

/// Advance every overdue recurring event to its next future occurrence.
///
/// Reads all events from `store`; a failure there aborts the whole run.
/// Per-event failures (duplicate lookup or insert) are logged and skipped
/// so one bad row cannot block the rest of the batch. Existing rows are
/// never mutated or deleted.
pub async fn rollover<S>(store: &S, now: DateTime<Utc>) -> GrangeResult<RolloverOutcome>
where
    S: EventStore + ?Sized,
{
    let events = store.list_events().await?;

    let mut created = 0;
    for event in &events {
        if event.recurrence.is_none() {
            continue;
        }
        let Some(start) = event.start_time() else {
            warn!(
                event = %event.id,
                starts_at = %event.starts_at,
                "skipping event with unparseable start timestamp"
            );
            continue;
        };
        // Only overdue occurrences roll over.
        if start > now {
            continue;
        }
        let Some(next) = advance(start, event.recurrence, now) else {
            continue;
        };

        match store.find_event(&event.title, next).await {
            Ok(Some(_)) => continue, // already rolled over
            Ok(None) => {}
            Err(err) => {
                warn!(event = %event.id, error = %err, "duplicate lookup failed, skipping event");
                continue;
            }
        }

        match store
            .insert_event(NewEvent::next_occurrence_of(event, next))
            .await
        {
            Ok(_) => created += 1,
            Err(err) => {
                warn!(event = %event.id, error = %err, "insert failed, skipping event");
            }
        }
    }

    Ok(RolloverOutcome { created })
}
