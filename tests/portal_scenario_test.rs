use chrono::{Duration, NaiveDate, TimeZone, Utc};
use roadworks::domain::model::{
    NotificationKind, RequestDraft, RequestPatch, RequestPriority, RequestStatus,
    ResourceAllocation, ResourceDraft, ResourceKind, TaskDraft, TaskKind, UserDraft, UserRole,
    WorkOrderDraft, WorkOrderStatus,
};
use roadworks::{FixedClock, Portal, PortalError, SequentialIds};

struct Actors {
    resident: String,
    supervisor: String,
    admin: String,
    mayor: String,
}

fn portal_with_actors() -> (Portal<FixedClock, SequentialIds>, Actors) {
    let clock = FixedClock(Utc.with_ymd_and_hms(2025, 4, 15, 10, 30, 0).unwrap());
    let mut portal = Portal::with_parts(clock, SequentialIds::new());

    let mut register = |name: &str, email: &str, role| {
        portal
            .register_user(UserDraft {
                name: name.to_string(),
                email: email.to_string(),
                role,
                phone: None,
                address: None,
            })
            .unwrap()
    };
    let resident = register("John Resident", "resident@example.com", UserRole::Resident);
    let supervisor = register(
        "Sarah Supervisor",
        "supervisor@example.com",
        UserRole::Supervisor,
    );
    let admin = register("Alex Admin", "admin@example.com", UserRole::Administrator);
    let mayor = register("Mayor Thompson", "mayor@example.com", UserRole::Mayor);

    (
        portal,
        Actors {
            resident,
            supervisor,
            admin,
            mayor,
        },
    )
}

fn pothole_draft() -> RequestDraft {
    RequestDraft {
        title: "Pothole".to_string(),
        description: "Large pothole near the intersection".to_string(),
        location: "Main St".to_string(),
        latitude: None,
        longitude: None,
        images: vec![],
    }
}

#[test]
fn submitted_request_starts_pending_and_notifies_supervisors() {
    let (mut portal, actors) = portal_with_actors();

    let id = portal
        .create_request(&actors.resident, pothole_draft())
        .unwrap();

    let request = portal.request(&id).unwrap();
    assert_eq!(request.status, RequestStatus::Pending);
    assert_eq!(request.submitted_by, actors.resident);

    let second = portal
        .create_request(&actors.resident, pothole_draft())
        .unwrap();
    assert_ne!(id, second);

    // The supervisor role was notified about both submissions.
    let feed = portal.notifications_for(&actors.supervisor).unwrap();
    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0].title, "New Repair Request");
    assert_eq!(
        feed[0].link_to.as_deref(),
        Some(format!("/supervisor/requests/{}", id).as_str())
    );
    // Other roles do not see the supervisor-role entries.
    assert!(portal.notifications_for(&actors.mayor).unwrap().is_empty());
}

#[test]
fn create_request_requires_title_description_location() {
    let (mut portal, actors) = portal_with_actors();

    let mut draft = pothole_draft();
    draft.location = "  ".to_string();
    let err = portal.create_request(&actors.resident, draft);
    assert!(matches!(err, Err(PortalError::ValidationError { .. })));

    let err = portal.create_request("ghost", pothole_draft());
    assert!(matches!(err, Err(PortalError::NotFound { .. })));
}

#[test]
fn resident_listing_is_scoped_to_own_requests() {
    let (mut portal, actors) = portal_with_actors();
    portal
        .create_request(&actors.resident, pothole_draft())
        .unwrap();

    let second_resident = portal
        .register_user(UserDraft {
            name: "Rita Resident".to_string(),
            email: "rita@example.com".to_string(),
            role: UserRole::Resident,
            phone: None,
            address: None,
        })
        .unwrap();
    portal
        .create_request(&second_resident, pothole_draft())
        .unwrap();

    assert_eq!(portal.requests_for(&actors.resident).unwrap().len(), 1);
    assert_eq!(portal.requests_for(&second_resident).unwrap().len(), 1);
    // Non-resident roles see the full set.
    assert_eq!(portal.requests_for(&actors.supervisor).unwrap().len(), 2);
    assert_eq!(portal.requests_for(&actors.mayor).unwrap().len(), 2);
}

#[test]
fn status_change_notifies_the_submitter_exactly_once() {
    let (mut portal, actors) = portal_with_actors();
    let id = portal
        .create_request(&actors.resident, pothole_draft())
        .unwrap();

    let before = portal.notifications_for(&actors.resident).unwrap().len();
    portal
        .update_request(
            &actors.supervisor,
            &id,
            RequestPatch {
                status: Some(RequestStatus::Inspected),
                priority: Some(RequestPriority::High),
                ..Default::default()
            },
        )
        .unwrap();

    let feed = portal.notifications_for(&actors.resident).unwrap();
    assert_eq!(feed.len(), before + 1);
    let latest = feed.last().unwrap();
    assert_eq!(latest.title, "Request Status Updated");
    assert!(latest.message.contains("inspected"));
    assert_eq!(
        latest.link_to.as_deref(),
        Some(format!("/requests/{}", id).as_str())
    );

    // A patch that does not change the status emits nothing.
    portal
        .update_request(
            &actors.supervisor,
            &id,
            RequestPatch {
                inspection_notes: Some("needs asphalt".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(
        portal.notifications_for(&actors.resident).unwrap().len(),
        before + 1
    );
}

#[test]
fn request_updates_are_role_gated_and_explicit_about_missing_ids() {
    let (mut portal, actors) = portal_with_actors();
    let id = portal
        .create_request(&actors.resident, pothole_draft())
        .unwrap();

    let err = portal.update_request(
        &actors.resident,
        &id,
        RequestPatch {
            status: Some(RequestStatus::Inspected),
            ..Default::default()
        },
    );
    assert!(matches!(err, Err(PortalError::Forbidden { .. })));

    let err = portal.update_request(&actors.supervisor, "req999", RequestPatch::default());
    assert!(matches!(err, Err(PortalError::NotFound { .. })));
}

#[test]
fn work_order_allocates_resources_and_moves_the_request() {
    let (mut portal, actors) = portal_with_actors();
    let request_id = portal
        .create_request(&actors.resident, pothole_draft())
        .unwrap();
    let asphalt = portal
        .add_resource(
            &actors.admin,
            ResourceDraft {
                name: "Asphalt".to_string(),
                kind: ResourceKind::Material,
                quantity: 5000,
                available: 4000,
                unit: "kg".to_string(),
            },
        )
        .unwrap();

    let start = Utc.with_ymd_and_hms(2025, 4, 20, 8, 0, 0).unwrap();
    let order_id = portal
        .create_work_order(
            &actors.supervisor,
            WorkOrderDraft {
                request_id: request_id.clone(),
                title: "Repair pothole".to_string(),
                description: "Fill and compact".to_string(),
                assigned_to: vec!["worker1".to_string()],
                start_date: start,
                end_date: None,
                resources: vec![ResourceAllocation {
                    resource_id: asphalt.clone(),
                    quantity: 50,
                }],
            },
        )
        .unwrap();

    let request = portal.request(&request_id).unwrap();
    assert_eq!(request.status, RequestStatus::InProgress);
    assert_eq!(
        request.estimated_completion_date,
        Some(start + Duration::days(7))
    );
    assert_eq!(portal.resource(&asphalt).unwrap().available, 3950);
    assert_eq!(portal.work_orders_for_request(&request_id).len(), 1);

    // The submitter heard about the in_progress transition.
    let feed = portal.notifications_for(&actors.resident).unwrap();
    assert!(feed
        .iter()
        .any(|n| n.message.contains("in_progress") && n.title == "Request Status Updated"));

    // Completing the order returns the allocation to the pool.
    portal
        .set_work_order_status(&actors.supervisor, &order_id, WorkOrderStatus::Completed)
        .unwrap();
    assert_eq!(portal.resource(&asphalt).unwrap().available, 4000);
    let order = portal.work_order(&order_id).unwrap();
    assert_eq!(order.status, WorkOrderStatus::Completed);
    assert!(order.end_date.is_some());

    // Completed orders stay completed.
    let err = portal.set_work_order_status(
        &actors.supervisor,
        &order_id,
        WorkOrderStatus::InProgress,
    );
    assert!(matches!(err, Err(PortalError::ValidationError { .. })));
}

#[test]
fn overdrawn_work_order_is_rejected_without_side_effects() {
    let (mut portal, actors) = portal_with_actors();
    let request_id = portal
        .create_request(&actors.resident, pothole_draft())
        .unwrap();
    let paver = portal
        .add_resource(
            &actors.admin,
            ResourceDraft {
                name: "Asphalt Paver".to_string(),
                kind: ResourceKind::Equipment,
                quantity: 5,
                available: 2,
                unit: "machines".to_string(),
            },
        )
        .unwrap();

    let err = portal.create_work_order(
        &actors.supervisor,
        WorkOrderDraft {
            request_id: request_id.clone(),
            title: "Repave".to_string(),
            description: "Needs three pavers".to_string(),
            assigned_to: vec![],
            start_date: Utc.with_ymd_and_hms(2025, 4, 20, 8, 0, 0).unwrap(),
            end_date: None,
            resources: vec![ResourceAllocation {
                resource_id: paver.clone(),
                quantity: 3,
            }],
        },
    );
    assert!(matches!(
        err,
        Err(PortalError::InsufficientResources {
            requested: 3,
            available: 2,
            ..
        })
    ));

    // Nothing moved: no allocation, no order, request still pending.
    assert_eq!(portal.resource(&paver).unwrap().available, 2);
    assert!(portal.work_orders_for_request(&request_id).is_empty());
    assert_eq!(
        portal.request(&request_id).unwrap().status,
        RequestStatus::Pending
    );
}

#[test]
fn allocation_crossing_the_threshold_alerts_administrators() {
    let (mut portal, actors) = portal_with_actors();
    let request_id = portal
        .create_request(&actors.resident, pothole_draft())
        .unwrap();
    let asphalt = portal
        .add_resource(
            &actors.admin,
            ResourceDraft {
                name: "Asphalt".to_string(),
                kind: ResourceKind::Material,
                quantity: 100,
                available: 30,
                unit: "kg".to_string(),
            },
        )
        .unwrap();

    portal
        .create_work_order(
            &actors.supervisor,
            WorkOrderDraft {
                request_id,
                title: "Patch".to_string(),
                description: "Small patch".to_string(),
                assigned_to: vec![],
                start_date: Utc.with_ymd_and_hms(2025, 4, 20, 8, 0, 0).unwrap(),
                end_date: None,
                resources: vec![ResourceAllocation {
                    resource_id: asphalt,
                    quantity: 15,
                }],
            },
        )
        .unwrap();

    let feed = portal.notifications_for(&actors.admin).unwrap();
    let alert = feed
        .iter()
        .find(|n| n.title == "Resource Alert")
        .expect("administrators should be alerted");
    assert_eq!(alert.kind, NotificationKind::Warning);
    assert!(alert.message.contains("Asphalt"));
    assert!(alert.message.contains("15% remaining"));

    let low = portal.low_stock(0.2);
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].name, "Asphalt");
}

#[test]
fn resource_management_is_admin_only() {
    let (mut portal, actors) = portal_with_actors();

    let err = portal.add_resource(
        &actors.supervisor,
        ResourceDraft {
            name: "Gravel".to_string(),
            kind: ResourceKind::Material,
            quantity: 10,
            available: 10,
            unit: "t".to_string(),
        },
    );
    assert!(matches!(err, Err(PortalError::Forbidden { .. })));
}

#[test]
fn scheduling_a_linked_task_moves_the_request_to_scheduled() {
    let (mut portal, actors) = portal_with_actors();
    let request_id = portal
        .create_request(&actors.resident, pothole_draft())
        .unwrap();

    let date = NaiveDate::from_ymd_opt(2025, 4, 23).unwrap();
    portal
        .schedule_task(
            &actors.supervisor,
            TaskDraft {
                title: "Inspect pothole".to_string(),
                request_id: Some(request_id.clone()),
                date,
                start: "09:00".to_string(),
                end: "11:00".to_string(),
                assignees: vec!["John Doe".to_string()],
                kind: TaskKind::Inspection,
            },
        )
        .unwrap();

    let request = portal.request(&request_id).unwrap();
    assert_eq!(request.status, RequestStatus::Scheduled);
    assert!(request.estimated_completion_date.is_some());
    assert_eq!(portal.tasks_on(date).len(), 1);

    // A dangling request link is tolerated; only the task is recorded.
    portal
        .schedule_task(
            &actors.supervisor,
            TaskDraft {
                title: "Survey unknown site".to_string(),
                request_id: Some("req999".to_string()),
                date,
                start: "13:00".to_string(),
                end: "16:00".to_string(),
                assignees: vec![],
                kind: TaskKind::Maintenance,
            },
        )
        .unwrap();
    assert_eq!(portal.tasks_on(date).len(), 2);
}

#[test]
fn notification_read_flags_are_per_user() {
    let (mut portal, actors) = portal_with_actors();
    let id = portal
        .create_request(&actors.resident, pothole_draft())
        .unwrap();
    portal
        .update_request(
            &actors.supervisor,
            &id,
            RequestPatch {
                status: Some(RequestStatus::Inspected),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(portal.unread_notifications(&actors.resident).unwrap(), 1);
    let notif_id = portal.notifications_for(&actors.resident).unwrap()[0]
        .id
        .clone();

    // Another user cannot mark someone else's notification.
    let err = portal.mark_notification_read(&actors.mayor, &notif_id);
    assert!(matches!(err, Err(PortalError::Forbidden { .. })));

    portal
        .mark_notification_read(&actors.resident, &notif_id)
        .unwrap();
    assert_eq!(portal.unread_notifications(&actors.resident).unwrap(), 0);

    // Supervisor feed is untouched.
    assert_eq!(portal.unread_notifications(&actors.supervisor).unwrap(), 1);
    portal
        .mark_all_notifications_read(&actors.supervisor)
        .unwrap();
    assert_eq!(portal.unread_notifications(&actors.supervisor).unwrap(), 0);
}

#[test]
fn full_scenario_from_submission_to_work_order() {
    let (mut portal, actors) = portal_with_actors();

    // Resident reports a pothole.
    let request_id = portal
        .create_request(&actors.resident, pothole_draft())
        .unwrap();
    assert_eq!(
        portal.request(&request_id).unwrap().status,
        RequestStatus::Pending
    );

    // Supervisor inspects it; the submitter is told, with a link back.
    portal
        .update_request(
            &actors.supervisor,
            &request_id,
            RequestPatch {
                status: Some(RequestStatus::Inspected),
                ..Default::default()
            },
        )
        .unwrap();
    let feed = portal.notifications_for(&actors.resident).unwrap();
    assert_eq!(
        feed.last().unwrap().link_to.as_deref(),
        Some(format!("/requests/{}", request_id).as_str())
    );

    // Work order creation drives the request into execution.
    let workers = portal
        .add_resource(
            &actors.admin,
            ResourceDraft {
                name: "Road Workers".to_string(),
                kind: ResourceKind::Manpower,
                quantity: 50,
                available: 40,
                unit: "workers".to_string(),
            },
        )
        .unwrap();
    portal
        .create_work_order(
            &actors.supervisor,
            WorkOrderDraft {
                request_id: request_id.clone(),
                title: "Repair pothole".to_string(),
                description: "Fill and compact".to_string(),
                assigned_to: vec!["worker1".to_string(), "worker2".to_string()],
                start_date: Utc.with_ymd_and_hms(2025, 4, 24, 8, 0, 0).unwrap(),
                end_date: Some(Utc.with_ymd_and_hms(2025, 4, 24, 17, 0, 0).unwrap()),
                resources: vec![ResourceAllocation {
                    resource_id: workers,
                    quantity: 3,
                }],
            },
        )
        .unwrap();

    let request = portal.request(&request_id).unwrap();
    assert_eq!(request.status, RequestStatus::InProgress);
    assert_eq!(
        request.estimated_completion_date,
        Some(Utc.with_ymd_and_hms(2025, 4, 24, 17, 0, 0).unwrap())
    );

    // The dashboard sees the in-progress request.
    let snapshot = portal.dashboard();
    assert_eq!(snapshot.total_requests, 1);
    assert_eq!(snapshot.completion_rate_percent, 0);
    let in_progress = snapshot
        .status_counts
        .iter()
        .find(|c| c.status == RequestStatus::InProgress)
        .unwrap();
    assert_eq!(in_progress.count, 1);
}
