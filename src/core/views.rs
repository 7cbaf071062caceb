use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::resources::DEFAULT_LOW_STOCK_THRESHOLD;
use crate::domain::model::{RepairRequest, RequestPriority, RequestStatus, Resource};

// Dashboard projections: pure functions over store slices, recomputed on
// every call. Nothing here caches or mutates.

#[derive(Debug, Clone, Serialize)]
pub struct StatusCount {
    pub status: RequestStatus,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriorityCount {
    pub priority: RequestPriority,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceUsage {
    pub id: String,
    pub name: String,
    pub used: u32,
    pub available: u32,
    pub quantity: u32,
    pub unit: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyActivity {
    pub year: i32,
    pub month: u32,
    pub submitted: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub total_requests: usize,
    pub completion_rate_percent: u8,
    pub status_counts: Vec<StatusCount>,
    pub priority_counts: Vec<PriorityCount>,
    pub resource_utilization: Vec<ResourceUsage>,
    pub low_stock: Vec<ResourceUsage>,
    pub monthly_activity: Vec<MonthlyActivity>,
}

/// Request counts per status, zero-count statuses included so charts always
/// show the full axis.
pub fn status_histogram(requests: &[RepairRequest]) -> Vec<StatusCount> {
    RequestStatus::ALL
        .iter()
        .map(|&status| StatusCount {
            status,
            count: requests.iter().filter(|r| r.status == status).count(),
        })
        .collect()
}

/// Request counts per priority; unprioritized requests are not counted.
pub fn priority_histogram(requests: &[RepairRequest]) -> Vec<PriorityCount> {
    RequestPriority::ALL
        .iter()
        .map(|&priority| PriorityCount {
            priority,
            count: requests
                .iter()
                .filter(|r| r.priority == Some(priority))
                .count(),
        })
        .collect()
}

/// Completed share as a rounded percentage; 0 for an empty store.
pub fn completion_rate(requests: &[RepairRequest]) -> u8 {
    if requests.is_empty() {
        return 0;
    }
    let completed = requests
        .iter()
        .filter(|r| r.status == RequestStatus::Completed)
        .count();
    (completed as f64 / requests.len() as f64 * 100.0).round() as u8
}

pub fn resource_utilization(resources: &[Resource]) -> Vec<ResourceUsage> {
    resources
        .iter()
        .map(|r| ResourceUsage {
            id: r.id.clone(),
            name: r.name.clone(),
            used: r.used(),
            available: r.available,
            quantity: r.quantity,
            unit: r.unit.clone(),
        })
        .collect()
}

/// Per calendar month of submission: how many requests arrived, and how many
/// of those are completed today.
pub fn monthly_activity(requests: &[RepairRequest]) -> Vec<MonthlyActivity> {
    let mut months: BTreeMap<(i32, u32), (usize, usize)> = BTreeMap::new();
    for request in requests {
        let key = (request.submitted_at.year(), request.submitted_at.month());
        let entry = months.entry(key).or_insert((0, 0));
        entry.0 += 1;
        if request.status == RequestStatus::Completed {
            entry.1 += 1;
        }
    }
    months
        .into_iter()
        .map(|((year, month), (submitted, completed))| MonthlyActivity {
            year,
            month,
            submitted,
            completed,
        })
        .collect()
}

pub fn dashboard_snapshot(requests: &[RepairRequest], resources: &[Resource]) -> DashboardSnapshot {
    let low_stock = resources
        .iter()
        .filter(|r| r.is_low_stock(DEFAULT_LOW_STOCK_THRESHOLD))
        .map(|r| ResourceUsage {
            id: r.id.clone(),
            name: r.name.clone(),
            used: r.used(),
            available: r.available,
            quantity: r.quantity,
            unit: r.unit.clone(),
        })
        .collect();

    DashboardSnapshot {
        total_requests: requests.len(),
        completion_rate_percent: completion_rate(requests),
        status_counts: status_histogram(requests),
        priority_counts: priority_histogram(requests),
        resource_utilization: resource_utilization(resources),
        low_stock,
        monthly_activity: monthly_activity(requests),
    }
}
