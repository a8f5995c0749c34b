use std::collections::HashSet;

use thiserror::Error as ThisError;

use civica_data::{AttendanceRecord, AttendanceState};

#[derive(ThisError, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("attendance cannot move from {from} to {to}")]
    IllegalTransition {
        from: AttendanceState,
        to: AttendanceState,
    },
    #[error("selection is empty, nothing to confirm")]
    EmptySelection,
}

/// Roster counts. The three buckets always sum to `total`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterCounts {
    pub total: usize,
    pub confirmed: usize,
    pub attended: usize,
    pub no_show: usize,
}

/// An event roster partitioned by attendance state.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub confirmed: Vec<AttendanceRecord>,
    pub attended: Vec<AttendanceRecord>,
    pub no_show: Vec<AttendanceRecord>,
    pub counts: RosterCounts,
}

/// Partition a roster by current state.
pub fn reconcile(records: &[AttendanceRecord]) -> Roster {
    let mut roster = Roster::default();
    for record in records {
        match record.state {
            AttendanceState::Confirmed => roster.confirmed.push(record.clone()),
            AttendanceState::Attended => roster.attended.push(record.clone()),
            AttendanceState::NoShow => roster.no_show.push(record.clone()),
        }
    }
    roster.counts = RosterCounts {
        total: records.len(),
        confirmed: roster.confirmed.len(),
        attended: roster.attended.len(),
        no_show: roster.no_show.len(),
    };
    roster
}

/// The transitions of the attendance state machine. Anything not
/// expressible here is not a legal state change.
pub trait Transition: Sized {
    /// confirmed -> attended
    fn mark_attended(self) -> Result<Self, Error>;
    /// confirmed -> no_show
    fn mark_no_show(self) -> Result<Self, Error>;
    /// attended | no_show -> confirmed
    fn revert(self) -> Result<Self, Error>;
}

impl Transition for AttendanceRecord {
    fn mark_attended(self) -> Result<Self, Error> {
        match self.state {
            AttendanceState::Confirmed => Ok(Self {
                state: AttendanceState::Attended,
                ..self
            }),
            from => Err(Error::IllegalTransition {
                from,
                to: AttendanceState::Attended,
            }),
        }
    }

    fn mark_no_show(self) -> Result<Self, Error> {
        match self.state {
            AttendanceState::Confirmed => Ok(Self {
                state: AttendanceState::NoShow,
                ..self
            }),
            from => Err(Error::IllegalTransition {
                from,
                to: AttendanceState::NoShow,
            }),
        }
    }

    fn revert(self) -> Result<Self, Error> {
        match self.state {
            AttendanceState::Attended | AttendanceState::NoShow => Ok(Self {
                state: AttendanceState::Confirmed,
                ..self
            }),
            from => Err(Error::IllegalTransition {
                from,
                to: AttendanceState::Confirmed,
            }),
        }
    }
}

/// Bulk confirmed -> attended for the selected ids. Selected records
/// that are not in `confirmed` are left alone (a no-op, not an
/// error), ids matching nothing are ignored. Returns only the
/// records that changed; an empty selection is rejected.
pub fn confirm_selected(
    ids: &HashSet<u32>,
    records: &[AttendanceRecord],
) -> Result<Vec<AttendanceRecord>, Error> {
    if ids.is_empty() {
        return Err(Error::EmptySelection);
    }
    let updated = records
        .iter()
        .filter(|r| ids.contains(&r.id) && r.state == AttendanceState::Confirmed)
        .cloned()
        .map(|r| AttendanceRecord {
            state: AttendanceState::Attended,
            ..r
        })
        .collect();
    Ok(updated)
}
