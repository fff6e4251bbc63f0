//! Event planning functions for domain events.
//!
//! Turns a batch of domain events into the dispatch runs to perform.

use paragliding_core::events::DomainEvent;

/// Sequence numbers to run the dispatcher for, in ascending order.
///
/// Every ingested track gets its own run so that a webhook with threshold T
/// fires exactly when the T-th track after its watermark arrives.
pub fn plan_dispatch(events: &[DomainEvent]) -> Vec<u64> {
    let mut seqs: Vec<u64> = events
        .iter()
        .filter_map(|event| match event {
            DomainEvent::TrackIngested { seq, .. } => Some(*seq),
            DomainEvent::TracksWiped { .. } => None,
        })
        .collect();
    seqs.sort_unstable();
    seqs.dedup();
    seqs
}

/// Number of tracks removed by wipes in the batch.
pub fn wiped_count(events: &[DomainEvent]) -> u64 {
    events
        .iter()
        .map(|event| match event {
            DomainEvent::TracksWiped { previous_count } => *previous_count,
            DomainEvent::TrackIngested { .. } => 0,
        })
        .sum()
}
