//! The session store boundary.
//!
//! [`SessionStore`] is the append-only log of completed intervals. Aggregate
//! statistics are always derived from the log itself.

use std::collections::HashSet;

use chrono::{DateTime, Local, Utc};

use super::interval::FocusInterval;
use super::stats::{FocusStats, DEFAULT_WEEKLY_GOAL_MINUTES};
use crate::error::StudyFocusError;

/// Persistence for completed focus intervals.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore {
    /// Append an interval. Appending an id that is already stored is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StudyFocusError::Persistence` if the write fails.
    fn append(&mut self, interval: &FocusInterval) -> Result<(), StudyFocusError>;

    /// Intervals whose `date` falls in `[start, end)`.
    ///
    /// # Errors
    ///
    /// Returns `StudyFocusError::Persistence` if the read fails.
    fn query_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FocusInterval>, StudyFocusError>;

    /// Every stored interval, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StudyFocusError::Persistence` if the read fails.
    fn all(&self) -> Result<Vec<FocusInterval>, StudyFocusError>;

    /// Remove every stored interval, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns `StudyFocusError::Persistence` if the write fails.
    fn clear(&mut self) -> Result<usize, StudyFocusError>;

    /// Aggregate statistics over the whole log, as of today.
    ///
    /// # Errors
    ///
    /// Returns `StudyFocusError::Persistence` if the read fails.
    fn compute_stats(&self) -> Result<FocusStats, StudyFocusError> {
        let intervals = self.all()?;
        Ok(FocusStats::from_intervals(
            &intervals,
            Local::now().date_naive(),
            DEFAULT_WEEKLY_GOAL_MINUTES,
        ))
    }
}

impl<S: SessionStore + ?Sized> SessionStore for Box<S> {
    fn append(&mut self, interval: &FocusInterval) -> Result<(), StudyFocusError> {
        (**self).append(interval)
    }

    fn query_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FocusInterval>, StudyFocusError> {
        (**self).query_by_date_range(start, end)
    }

    fn all(&self) -> Result<Vec<FocusInterval>, StudyFocusError> {
        (**self).all()
    }

    fn clear(&mut self) -> Result<usize, StudyFocusError> {
        (**self).clear()
    }

    fn compute_stats(&self) -> Result<FocusStats, StudyFocusError> {
        (**self).compute_stats()
    }
}

/// Keep the intervals of `intervals` that fall in `[start, end)`.
pub(crate) fn in_range(
    intervals: impl IntoIterator<Item = FocusInterval>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<FocusInterval> {
    intervals
        .into_iter()
        .filter(|i| i.date >= start && i.date < end)
        .collect()
}

/// In-process store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    intervals: Vec<FocusInterval>,
    ids: HashSet<String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored intervals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn append(&mut self, interval: &FocusInterval) -> Result<(), StudyFocusError> {
        if self.ids.insert(interval.id.clone()) {
            self.intervals.push(interval.clone());
        }
        Ok(())
    }

    fn query_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FocusInterval>, StudyFocusError> {
        Ok(in_range(self.intervals.iter().cloned(), start, end))
    }

    fn all(&self) -> Result<Vec<FocusInterval>, StudyFocusError> {
        Ok(self.intervals.clone())
    }

    fn clear(&mut self) -> Result<usize, StudyFocusError> {
        let removed = self.intervals.len();
        self.intervals.clear();
        self.ids.clear();
        Ok(removed)
    }
}
