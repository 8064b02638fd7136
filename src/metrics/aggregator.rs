use super::types::{ChildMetrics, ParentMetrics, ReleaseTracking};
use crate::calendar::duration::round2;
use crate::calendar::WorkCalendar;
use crate::issues::{ChildIssue, ParentIssue};
use chrono::NaiveDateTime;

/// Rolls child durations up into parent productivity metrics.
///
/// `now` stands in for unset start/end dates. It is fixed at construction
/// so aggregating the same input twice gives the same numbers.
#[derive(Debug, Clone, Copy)]
pub struct MetricsAggregator<'a> {
    calendar: &'a WorkCalendar,
    now: NaiveDateTime,
}

impl<'a> MetricsAggregator<'a> {
    pub fn new(calendar: &'a WorkCalendar, now: NaiveDateTime) -> Self {
        Self { calendar, now }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    pub fn child_metrics(&self, child: ChildIssue) -> ChildMetrics {
        let process_time = self.calendar.business_duration(
            child.record.start_at.or_now(self.now),
            child.record.end_at.or_now(self.now),
        );
        ChildMetrics {
            issue: child,
            process_time,
        }
    }

    pub fn aggregate(
        &self,
        parent: ParentIssue,
        children: Vec<ChildIssue>,
    ) -> (ParentMetrics, Vec<ChildMetrics>) {
        let children: Vec<ChildMetrics> = children
            .into_iter()
            .map(|child| self.child_metrics(child))
            .collect();
        let total_time_spent: f64 = children.iter().map(|child| child.process_time).sum();

        let story_point = parent.story_point;
        let process_time = if total_time_spent != 0.0 && story_point != 0.0 {
            round2(total_time_spent / story_point)
        } else {
            0.0
        };

        let end = parent.record.end_at.or_now(self.now);
        let cycle_time = round2(
            self.calendar
                .business_duration(parent.record.start_at.or_now(self.now), end),
        );
        let cycle_time_per_point = if cycle_time != 0.0 && story_point != 0.0 {
            round2(cycle_time / story_point)
        } else if cycle_time != 0.0 {
            cycle_time
        } else {
            0.0
        };

        // Creation has no fallback: an unset creation date means no lead time
        let lead_time = round2(
            self.calendar
                .business_duration_opt(parent.created_at.wall_clock(), Some(end)),
        );

        let metrics = ParentMetrics {
            issue: parent,
            time_spent: round2(total_time_spent),
            process_time,
            cycle_time,
            cycle_time_per_point,
            lead_time,
            release: ReleaseTracking::default(),
        };

        (metrics, children)
    }
}
