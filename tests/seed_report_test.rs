use roadworks::app;
use roadworks::domain::model::{RequestDraft, RequestStatus};
use roadworks::SeedConfig;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

const SEED: &str = r#"
[portal]
name = "cityroad"
description = "Road repair tracking"
version = "1.0.0"

[[users]]
id = "user1"
name = "John Resident"
email = "resident@example.com"
role = "resident"

[[users]]
id = "user2"
name = "Sarah Supervisor"
email = "supervisor@example.com"
role = "supervisor"

[[resources]]
id = "res1"
name = "Asphalt"
kind = "material"
quantity = 5000
available = 750
unit = "kg"

[[resources]]
id = "res2"
name = "Road Workers"
kind = "manpower"
quantity = 50
available = 12
unit = "workers"

[[requests]]
id = "req1"
title = "Large pothole on Main Street"
description = "About 2 feet wide and 6 inches deep."
location = "Main Street & Oak Avenue"
submitted_by = "user1"
submitted_at = "2025-04-15T10:30:00Z"
status = "in_progress"
priority = "high"
estimated_completion_date = "2025-04-25T17:00:00Z"

[[requests]]
id = "req2"
title = "Damaged guardrail on Highway 7"
description = "Guardrail hanging into the road after exit 23."
location = "Highway 7 Westbound"
submitted_by = "user1"
submitted_at = "2025-04-05T16:20:00Z"
status = "completed"
priority = "high"

[[work_orders]]
id = "wo1"
request_id = "req1"
title = "Repair pothole on Main Street"
description = "Fill and compact large pothole"
assigned_to = ["worker1", "worker2"]
start_date = "2025-04-20T08:00:00Z"
status = "in_progress"

[[work_orders.resources]]
resource_id = "res1"
quantity = 50
"#;

#[test]
fn seed_file_builds_a_working_portal() {
    let mut seed_file = NamedTempFile::new().unwrap();
    seed_file.write_all(SEED.as_bytes()).unwrap();

    let seed = SeedConfig::from_file(seed_file.path()).unwrap();
    let mut portal = app::portal_from_seed(seed).unwrap();

    assert_eq!(portal.users().len(), 2);
    assert_eq!(portal.all_requests().len(), 2);
    assert_eq!(portal.work_orders_for_request("req1").len(), 1);

    // Generated ids continue past the seeded ones.
    let new_id = portal
        .create_request(
            "user1",
            RequestDraft {
                title: "Clogged drain".to_string(),
                description: "Flooding when it rains".to_string(),
                location: "Elm Street & River Road".to_string(),
                latitude: None,
                longitude: None,
                images: vec![],
            },
        )
        .unwrap();
    assert_eq!(new_id, "req3");
    assert_eq!(
        portal.request("req3").unwrap().status,
        RequestStatus::Pending
    );
}

#[test]
fn dangling_seed_references_are_rejected() {
    let broken = SEED.replace("request_id = \"req1\"", "request_id = \"req9\"");
    let seed = SeedConfig::from_toml_str(&broken).unwrap();
    assert!(app::portal_from_seed(seed).is_err());
}

#[test]
fn reports_land_in_the_output_directory() {
    let seed = SeedConfig::from_toml_str(SEED).unwrap();
    let portal = app::portal_from_seed(seed).unwrap();

    let out_dir = TempDir::new().unwrap();
    let paths = app::write_reports(&portal, out_dir.path()).unwrap();

    let report = std::fs::read_to_string(&paths.report).unwrap();
    assert!(report.contains("Total requests: 2"));
    // One of two requests is completed.
    assert!(report.contains("Completion rate: 50%"));
    // Asphalt sits at 15% and is flagged.
    assert!(report.contains("Asphalt (15% remaining)"));

    let csv = std::fs::read_to_string(&paths.requests_csv).unwrap();
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().starts_with("id,title,location,status"));
    assert!(csv.contains("req1,Large pothole on Main Street"));
    assert_eq!(csv.lines().count(), 3);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&paths.dashboard).unwrap()).unwrap();
    assert_eq!(json["total_requests"], 2);
    assert_eq!(json["completion_rate_percent"], 50);
    assert_eq!(json["low_stock"][0]["id"], "res1");
}

#[test]
fn demo_portal_is_self_consistent() {
    let portal = app::demo_portal().unwrap();

    assert_eq!(portal.users().len(), 4);
    assert!(!portal.all_requests().is_empty());

    // The demo work order moved its request into execution.
    let in_progress = portal
        .all_requests()
        .iter()
        .filter(|r| r.status == RequestStatus::InProgress)
        .count();
    assert_eq!(in_progress, 1);

    let resident_id = portal.authenticate("resident@example.com").unwrap().id.clone();
    let own = portal.requests_for(&resident_id).unwrap();
    assert_eq!(own.len(), portal.all_requests().len());
}
