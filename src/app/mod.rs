pub mod export;
pub mod report;

use std::path::{Path, PathBuf};

use chrono::{Duration, Utc};

use crate::config::seed::SeedConfig;
use crate::core::portal::Portal;
use crate::domain::model::{
    RequestDraft, RequestPatch, RequestPriority, RequestStatus, ResourceAllocation, ResourceDraft,
    ResourceKind, UserDraft, UserRole, WorkOrderDraft,
};
use crate::domain::ports::{Clock, IdGen, SequentialIds, SystemClock};
use crate::utils::error::Result;
use crate::utils::validation::Validate;

/// Builds a portal from a validated seed file. Seeded state is trusted
/// bootstrap data, but every store still checks its own invariants.
pub fn portal_from_seed(seed: SeedConfig) -> Result<Portal<SystemClock, SequentialIds>> {
    seed.validate()?;
    tracing::info!(portal = %seed.portal.name, "loading seed data");

    let mut portal = Portal::new();
    for user in seed.users {
        portal.seed_user(user)?;
    }
    for resource in seed.resources {
        portal.seed_resource(resource)?;
    }
    for request in seed.requests {
        portal.seed_request(request)?;
    }
    for order in seed.work_orders {
        portal.seed_work_order(order)?;
    }
    Ok(portal)
}

/// Small built-in data set used when no seed file is given: one actor per
/// role, a stocked inventory, and a few requests in different stages.
pub fn demo_portal() -> Result<Portal<SystemClock, SequentialIds>> {
    let mut portal = Portal::new();

    let resident = portal.register_user(UserDraft {
        name: "John Resident".to_string(),
        email: "resident@example.com".to_string(),
        role: UserRole::Resident,
        phone: Some("555-1234".to_string()),
        address: Some("123 City Ave".to_string()),
    })?;
    let supervisor = portal.register_user(UserDraft {
        name: "Sarah Supervisor".to_string(),
        email: "supervisor@example.com".to_string(),
        role: UserRole::Supervisor,
        phone: Some("555-5678".to_string()),
        address: None,
    })?;
    let admin = portal.register_user(UserDraft {
        name: "Alex Admin".to_string(),
        email: "admin@example.com".to_string(),
        role: UserRole::Administrator,
        phone: Some("555-9012".to_string()),
        address: None,
    })?;
    portal.register_user(UserDraft {
        name: "Mayor Thompson".to_string(),
        email: "mayor@example.com".to_string(),
        role: UserRole::Mayor,
        phone: Some("555-3456".to_string()),
        address: None,
    })?;

    let asphalt = portal.add_resource(
        &admin,
        ResourceDraft {
            name: "Asphalt".to_string(),
            kind: ResourceKind::Material,
            quantity: 5000,
            available: 4000,
            unit: "kg".to_string(),
        },
    )?;
    let workers = portal.add_resource(
        &admin,
        ResourceDraft {
            name: "Road Workers".to_string(),
            kind: ResourceKind::Manpower,
            quantity: 50,
            available: 30,
            unit: "workers".to_string(),
        },
    )?;
    portal.add_resource(
        &admin,
        ResourceDraft {
            name: "Asphalt Paver".to_string(),
            kind: ResourceKind::Equipment,
            quantity: 5,
            available: 2,
            unit: "machines".to_string(),
        },
    )?;

    let pothole = portal.create_request(
        &resident,
        RequestDraft {
            title: "Large pothole on Main Street".to_string(),
            description: "About 2 feet wide and 6 inches deep, near the Oak Avenue intersection."
                .to_string(),
            location: "Main Street & Oak Avenue".to_string(),
            latitude: Some(40.7128),
            longitude: Some(-74.006),
            images: vec![],
        },
    )?;
    let street_light = portal.create_request(
        &resident,
        RequestDraft {
            title: "Broken street light on Park Road".to_string(),
            description: "The light near house number 142 is out; the area is dark at night."
                .to_string(),
            location: "142 Park Road".to_string(),
            latitude: None,
            longitude: None,
            images: vec![],
        },
    )?;

    portal.update_request(
        &supervisor,
        &pothole,
        RequestPatch {
            status: Some(RequestStatus::Inspected),
            priority: Some(RequestPriority::High),
            inspection_notes: Some("Severe pothole, high risk of vehicle damage.".to_string()),
            ..Default::default()
        },
    )?;
    portal.update_request(
        &supervisor,
        &street_light,
        RequestPatch {
            priority: Some(RequestPriority::Medium),
            ..Default::default()
        },
    )?;

    let start = Utc::now() + Duration::days(1);
    portal.create_work_order(
        &supervisor,
        WorkOrderDraft {
            request_id: pothole,
            title: "Repair pothole on Main Street".to_string(),
            description: "Fill and compact the pothole near the intersection.".to_string(),
            assigned_to: vec!["worker1".to_string(), "worker2".to_string()],
            start_date: start,
            end_date: None,
            resources: vec![
                ResourceAllocation {
                    resource_id: asphalt,
                    quantity: 50,
                },
                ResourceAllocation {
                    resource_id: workers,
                    quantity: 3,
                },
            ],
        },
    )?;

    Ok(portal)
}

#[derive(Debug)]
pub struct ReportPaths {
    pub report: PathBuf,
    pub dashboard: PathBuf,
    pub requests_csv: PathBuf,
}

/// Writes the text report, the JSON dashboard snapshot and the request CSV
/// into `out_dir`.
pub fn write_reports<C: Clock, G: IdGen>(
    portal: &Portal<C, G>,
    out_dir: &Path,
) -> Result<ReportPaths> {
    std::fs::create_dir_all(out_dir)?;
    let snapshot = portal.dashboard();

    let report_path = out_dir.join("report.txt");
    std::fs::write(&report_path, report::render(&snapshot))?;

    let dashboard_path = out_dir.join("dashboard.json");
    std::fs::write(&dashboard_path, export::dashboard_json(&snapshot)?)?;

    let csv_path = out_dir.join("requests.csv");
    std::fs::write(&csv_path, export::requests_csv(portal.all_requests())?)?;

    tracing::debug!(out_dir = %out_dir.display(), "reports written");
    Ok(ReportPaths {
        report: report_path,
        dashboard: dashboard_path,
        requests_csv: csv_path,
    })
}
