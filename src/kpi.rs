//! Schedule quality metrics (KPIs).
//!
//! Computes machine-level performance indicators from a timed schedule.
//! Machines are read from the `_M<m>` suffix of node ids; untimed entries
//! and product nodes are ignored.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Schedule makespan, else latest finish |
//! | Busy time | Sum of processing time per machine |
//! | Idle time | Makespan minus busy time, per machine |
//! | Utilization | Busy time / makespan, per machine |
//! | Avg Flow Time | Mean completion time of jobs (all released at 0) |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{parse_machine_id, Schedule};

/// Schedule performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleKpi {
    /// Latest completion time.
    pub makespan: f64,
    /// Busy time per machine (1-based index).
    pub busy_by_machine: BTreeMap<usize, f64>,
    /// Idle time per machine within the makespan.
    pub idle_by_machine: BTreeMap<usize, f64>,
    /// Utilization per machine (0.0..1.0).
    pub utilization_by_machine: BTreeMap<usize, f64>,
    /// Mean machine utilization (0.0..1.0).
    pub avg_utilization: f64,
    /// Mean job completion time.
    pub avg_flow_time: f64,
}

impl ScheduleKpi {
    /// Computes KPIs from a timed schedule.
    pub fn calculate(schedule: &Schedule) -> Self {
        let mut busy_by_machine: BTreeMap<usize, f64> = BTreeMap::new();
        let mut completion_by_job: BTreeMap<String, f64> = BTreeMap::new();
        let mut latest_finish = 0.0f64;

        for entry in &schedule.nodes {
            let Some(finish) = entry.finish else {
                continue;
            };
            latest_finish = latest_finish.max(finish);
            let Some((job, machine)) = parse_machine_id(&entry.id) else {
                continue;
            };
            *busy_by_machine.entry(machine).or_default() += entry.duration();
            let completion = completion_by_job.entry(job.to_ascii_lowercase()).or_default();
            *completion = completion.max(finish);
        }

        let makespan = schedule.makespan.unwrap_or(latest_finish);

        let utilization_by_machine: BTreeMap<usize, f64> = busy_by_machine
            .iter()
            .map(|(&m, &busy)| {
                let u = if makespan > 0.0 { busy / makespan } else { 0.0 };
                (m, u)
            })
            .collect();
        let idle_by_machine = busy_by_machine
            .iter()
            .map(|(&m, &busy)| (m, (makespan - busy).max(0.0)))
            .collect();

        let avg_utilization = if utilization_by_machine.is_empty() {
            0.0
        } else {
            utilization_by_machine.values().sum::<f64>() / utilization_by_machine.len() as f64
        };

        let avg_flow_time = if completion_by_job.is_empty() {
            0.0
        } else {
            completion_by_job.values().sum::<f64>() / completion_by_job.len() as f64
        };

        Self {
            makespan,
            busy_by_machine,
            idle_by_machine,
            utilization_by_machine,
            avg_utilization,
            avg_flow_time,
        }
    }

    /// Whether the schedule meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_makespan: f64, min_utilization: f64) -> bool {
        self.makespan <= max_makespan && self.avg_utilization >= min_utilization
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScheduledNode;

    fn scenario_schedule() -> Schedule {
        // J2 then J1 on two machines, makespan 7.
        let mut s = Schedule::new("test");
        s.push(ScheduledNode::timed("J2_M1", 0.0, 1.0));
        s.push(ScheduledNode::timed("J2_M2", 1.0, 5.0));
        s.push(ScheduledNode::timed("J1_M1", 1.0, 4.0));
        s.push(ScheduledNode::timed("J1_M2", 5.0, 7.0));
        s.with_makespan(7.0)
    }

    #[test]
    fn test_kpi_basic() {
        let kpi = ScheduleKpi::calculate(&scenario_schedule());
        assert_eq!(kpi.makespan, 7.0);
        assert_eq!(kpi.busy_by_machine[&1], 4.0);
        assert_eq!(kpi.busy_by_machine[&2], 6.0);
        assert_eq!(kpi.idle_by_machine[&1], 3.0);
        assert_eq!(kpi.idle_by_machine[&2], 1.0);
        assert!((kpi.avg_utilization - 10.0 / 14.0).abs() < 1e-10);
        // J2 completes at 5, J1 at 7.
        assert!((kpi.avg_flow_time - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_makespan_falls_back_to_latest_finish() {
        let mut s = scenario_schedule();
        s.makespan = None;
        s.push(ScheduledNode::new("UNTIMED_M1"));
        let kpi = ScheduleKpi::calculate(&s);
        assert_eq!(kpi.makespan, 7.0);
        assert_eq!(kpi.busy_by_machine[&1], 4.0);
    }

    #[test]
    fn test_kpi_empty() {
        let kpi = ScheduleKpi::calculate(&Schedule::new("empty"));
        assert_eq!(kpi.makespan, 0.0);
        assert!(kpi.busy_by_machine.is_empty());
        assert_eq!(kpi.avg_utilization, 0.0);
        assert_eq!(kpi.avg_flow_time, 0.0);
    }

    #[test]
    fn test_meets_thresholds() {
        let kpi = ScheduleKpi::calculate(&scenario_schedule());
        assert!(kpi.meets_thresholds(7.0, 0.7));
        assert!(!kpi.meets_thresholds(6.9, 0.0));
        assert!(!kpi.meets_thresholds(10.0, 0.9));
    }
}
