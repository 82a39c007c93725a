//! State carried across the calls of one export run

use crate::ddl::ConstraintSet;

/// Mutable state of one export run.
///
/// Create one per run and pass it to every exporter call that needs it. The
/// exporter itself holds only the immutable options.
#[derive(Debug, Default)]
pub struct DumpSession {
    constraints: ConstraintSet,
    saved_time_zone: Option<String>,
}

impl DumpSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constraints collected from the tables dumped so far
    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    pub fn constraints_mut(&mut self) -> &mut ConstraintSet {
        &mut self.constraints
    }

    /// Session time zone in effect before the header switched to UTC
    pub fn saved_time_zone(&self) -> Option<&str> {
        self.saved_time_zone.as_deref()
    }

    pub(crate) fn save_time_zone(&mut self, time_zone: String) {
        self.saved_time_zone = Some(time_zone);
    }

    pub(crate) fn take_saved_time_zone(&mut self) -> Option<String> {
        self.saved_time_zone.take()
    }
}
