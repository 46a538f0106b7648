//! Run context management.
//!
//! Provides run identity and request parameters for logging.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::logging::structured::LogContext;

const SECONDS_PER_DAY: i64 = 86_400;

/// Context for one invocation.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub nid: String,
    pub start: i64,
    pub started_at: DateTime<Utc>,
}

impl RunContext {
    pub fn new(nid: &str, start: i64) -> Self {
        let run_id = format!("run-{}", &Uuid::new_v4().to_string()[..8]);

        Self {
            run_id,
            nid: nid.to_string(),
            start,
            started_at: Utc::now(),
        }
    }

    /// The requested day start as a UTC datetime, if representable.
    pub fn day_start(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.start, 0)
    }

    /// True when `start` falls exactly on a UTC midnight.
    pub fn is_day_aligned(&self) -> bool {
        self.start.rem_euclid(SECONDS_PER_DAY) == 0
    }

    pub fn log_context(&self) -> LogContext {
        LogContext::new(&self.run_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_format() {
        let ctx = RunContext::new("64865", 1_700_000_000);
        assert!(ctx.run_id.starts_with("run-"));
        assert_eq!(ctx.run_id.len(), 12);
        assert_eq!(format!("{}", ctx.log_context()), format!("[run={}]", ctx.run_id));
    }

    #[test]
    fn test_day_alignment() {
        assert!(RunContext::new("1", 1_704_067_200).is_day_aligned());
        assert!(!RunContext::new("1", 1_704_067_201).is_day_aligned());
    }

    #[test]
    fn test_day_start_rendering() {
        let ctx = RunContext::new("1", 1_704_067_200);
        assert_eq!(
            ctx.day_start().map(|d| d.to_rfc3339()),
            Some("2024-01-01T00:00:00+00:00".to_string())
        );
    }
}
