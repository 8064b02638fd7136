use super::types::{ChildMetrics, ParentMetrics};
use crate::calendar::duration::round2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sprint-level roll-up of the enriched records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SprintSummary {
    pub parent_count: usize,
    pub child_count: usize,
    pub total_story_points: f64,
    pub total_time_spent: f64,
    /// Mean over parents that have a process time
    pub average_process_time: Option<f64>,
    pub average_cycle_time_per_point: Option<f64>,
    pub average_lead_time: Option<f64>,
    pub hours_by_assignee: BTreeMap<String, f64>,
    pub hours_by_category: BTreeMap<String, f64>,
    /// Parents skipped because their children could not be fetched
    pub failed_parents: Vec<String>,
}

impl SprintSummary {
    pub fn from_metrics(parents: &[ParentMetrics], children: &[ChildMetrics]) -> Self {
        let mut hours_by_assignee = BTreeMap::new();
        let mut hours_by_category = BTreeMap::new();
        for child in children {
            *hours_by_assignee
                .entry(child.issue.record.assignee.clone())
                .or_insert(0.0) += child.process_time;
            *hours_by_category
                .entry(child.issue.category.clone())
                .or_insert(0.0) += child.process_time;
        }
        hours_by_assignee.values_mut().for_each(|h| *h = round2(*h));
        hours_by_category.values_mut().for_each(|h| *h = round2(*h));

        Self {
            parent_count: parents.len(),
            child_count: children.len(),
            total_story_points: parents.iter().map(|p| p.issue.story_point).sum(),
            total_time_spent: round2(parents.iter().map(|p| p.time_spent).sum()),
            average_process_time: nonzero_mean(parents.iter().map(|p| p.process_time)),
            average_cycle_time_per_point: nonzero_mean(
                parents.iter().map(|p| p.cycle_time_per_point),
            ),
            average_lead_time: nonzero_mean(parents.iter().map(|p| p.lead_time)),
            hours_by_assignee,
            hours_by_category,
            failed_parents: Vec::new(),
        }
    }

    pub fn with_failures(mut self, failed_parents: Vec<String>) -> Self {
        self.failed_parents = failed_parents;
        self
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn format_report(&self) -> String {
        let mut output = String::new();

        output.push_str("📊 SPRINT METRICS SUMMARY\n");
        output.push_str("=========================\n");
        output.push_str(&format!("📋 Parent issues: {}\n", self.parent_count));
        output.push_str(&format!("🧩 Child issues: {}\n", self.child_count));
        output.push_str(&format!("🎯 Story points: {}\n", self.total_story_points));
        output.push_str(&format!("⏱️  Time spent: {:.2} h\n", self.total_time_spent));
        output.push_str(&format!(
            "⚙️  Avg process time: {}\n",
            format_hours(self.average_process_time, "h/pt")
        ));
        output.push_str(&format!(
            "🔁 Avg cycle time per point: {}\n",
            format_hours(self.average_cycle_time_per_point, "h/pt")
        ));
        output.push_str(&format!(
            "📦 Avg lead time: {}\n",
            format_hours(self.average_lead_time, "h")
        ));

        if !self.hours_by_assignee.is_empty() {
            output.push_str("\n👥 HOURS BY ASSIGNEE:\n");
            for (assignee, hours) in &self.hours_by_assignee {
                output.push_str(&format!("   • {assignee}: {hours:.2} h\n"));
            }
        }

        if !self.hours_by_category.is_empty() {
            output.push_str("\n🏷️  HOURS BY CATEGORY:\n");
            for (category, hours) in &self.hours_by_category {
                output.push_str(&format!("   • {category}: {hours:.2} h\n"));
            }
        }

        if !self.failed_parents.is_empty() {
            output.push_str(&format!(
                "\n⚠️  Skipped {} parent(s): {}\n",
                self.failed_parents.len(),
                self.failed_parents.join(", ")
            ));
        }

        output
    }
}

fn nonzero_mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .filter(|v| *v != 0.0)
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| round2(sum / count as f64))
}

fn format_hours(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v:.2} {unit}"),
        None => "n/a".to_string(),
    }
}
