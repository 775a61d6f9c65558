//! Change tracking for pipeline runs.
//!
//! Transforms record what they did instead of logging it: every structural or type
//! change appends an [`Event`] to the unit's [`EventLog`]. The log is append-only and
//! writable through a shared reference, so a transform borrowing the context immutably
//! can still record. After a run, per-kind counts summarize what the pipeline achieved
//! on a unit.

use strum::{EnumCount, EnumIter, IntoEnumIterator};

/// Kinds of changes transforms record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, EnumCount, EnumIter)]
pub enum EventKind {
    /// A variable's declared type was narrowed and its uses retyped.
    VariableRetyped,
    /// A single-use variable's value expression was inlined into its use site.
    ExpressionInlined,
    /// A side-effect-free assignment to an unused variable was removed.
    DeadAssignmentRemoved,
}

/// One recorded change.
#[derive(Debug)]
pub struct Event {
    /// What changed.
    pub kind: EventKind,
    /// Name of the transform that made the change.
    pub transform: &'static str,
    /// Human-readable detail.
    pub message: String,
}

/// Append-only log of changes made to one compilation unit.
#[derive(Default)]
pub struct EventLog {
    events: boxcar::Vec<Event>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: boxcar::Vec::new(),
        }
    }

    /// Records a change.
    pub fn record(&self, kind: EventKind, transform: &'static str, message: impl Into<String>) {
        self.events.push(Event {
            kind,
            transform,
            message: message.into(),
        });
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.count()
    }

    /// Returns `true` when nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates the recorded events in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().map(|(_, event)| event)
    }

    /// Count of recorded events per kind, covering every kind (zeroes included).
    #[must_use]
    pub fn counts(&self) -> Vec<(EventKind, usize)> {
        let mut counts = vec![0usize; EventKind::COUNT];
        for event in self.iter() {
            counts[event.kind as usize] += 1;
        }
        EventKind::iter().zip(counts).collect()
    }
}
