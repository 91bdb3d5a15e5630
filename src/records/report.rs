//! Per-load bookkeeping of kept and dropped rows.

use serde::Serialize;
use std::fmt;

/// Why a row was rejected while loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropReason {
    MissingRegion,
    MissingTimestamp,
    UnparseableTimestamp,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DropReason::MissingRegion => "missing region",
            DropReason::MissingTimestamp => "missing timestamp",
            DropReason::UnparseableTimestamp => "unparseable timestamp",
        };
        f.write_str(text)
    }
}

/// Counts gathered while turning CSV objects into readings.
///
/// Rows without a region or a usable timestamp cannot be placed in a region's
/// ordered sequence, so they are dropped and counted here instead of failing the load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub objects_read: usize,
    /// Objects in a directory source that could not be read or parsed and were skipped.
    pub objects_failed: usize,
    pub rows_read: usize,
    pub rows_kept: usize,
    pub missing_region: usize,
    pub missing_timestamp: usize,
    pub unparseable_timestamp: usize,
}

impl LoadReport {
    pub fn rows_dropped(&self) -> usize {
        self.missing_region + self.missing_timestamp + self.unparseable_timestamp
    }

    pub(crate) fn record_drop(&mut self, reason: DropReason) {
        match reason {
            DropReason::MissingRegion => self.missing_region += 1,
            DropReason::MissingTimestamp => self.missing_timestamp += 1,
            DropReason::UnparseableTimestamp => self.unparseable_timestamp += 1,
        }
    }

    pub(crate) fn merge(&mut self, other: &LoadReport) {
        self.objects_read += other.objects_read;
        self.objects_failed += other.objects_failed;
        self.rows_read += other.rows_read;
        self.rows_kept += other.rows_kept;
        self.missing_region += other.missing_region;
        self.missing_timestamp += other.missing_timestamp;
        self.unparseable_timestamp += other.unparseable_timestamp;
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} objects ({} failed), {} rows read, {} kept, {} dropped \
             ({} missing region, {} missing timestamp, {} unparseable timestamp)",
            self.objects_read,
            self.objects_failed,
            self.rows_read,
            self.rows_kept,
            self.rows_dropped(),
            self.missing_region,
            self.missing_timestamp,
            self.unparseable_timestamp
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_adds_every_counter() {
        let mut total = LoadReport {
            objects_read: 1,
            rows_read: 10,
            rows_kept: 9,
            missing_region: 1,
            ..Default::default()
        };
        let mut other = LoadReport {
            objects_read: 1,
            rows_read: 5,
            rows_kept: 3,
            ..Default::default()
        };
        other.record_drop(DropReason::MissingTimestamp);
        other.record_drop(DropReason::UnparseableTimestamp);

        total.merge(&other);

        assert_eq!(total.objects_read, 2);
        assert_eq!(total.rows_read, 15);
        assert_eq!(total.rows_kept, 12);
        assert_eq!(total.rows_dropped(), 3);
        assert_eq!(total.rows_read, total.rows_kept + total.rows_dropped());
    }

    #[test]
    fn display_mentions_failed_objects() {
        let report = LoadReport {
            objects_read: 1,
            objects_failed: 1,
            rows_read: 1,
            rows_kept: 1,
            ..Default::default()
        };
        let text = report.to_string();
        assert!(text.starts_with("1 objects (1 failed), 1 rows read, 1 kept, 0 dropped"));
    }
}
