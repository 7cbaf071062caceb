use chrono::{Duration, NaiveDate, NaiveTime};

use crate::core::directory::Directory;
use crate::core::notifications::NotificationFeed;
use crate::core::requests::RequestStore;
use crate::core::resources::{ResourceInventory, DEFAULT_LOW_STOCK_THRESHOLD};
use crate::core::schedule::SchedulePlanner;
use crate::core::views::{self, DashboardSnapshot};
use crate::core::work_orders::WorkOrderStore;
use crate::domain::model::{
    Notification, NotificationKind, ProfilePatch, Recipient, RepairRequest, RequestDraft,
    RequestPatch, RequestStatus, Resource, ResourceDraft, ResourcePatch, ScheduledTask, Session,
    TaskDraft, User, UserDraft, UserRole, WorkOrder, WorkOrderDraft, WorkOrderStatus,
};
use crate::domain::ports::{Clock, IdGen, SequentialIds, SystemClock};
use crate::utils::error::{PortalError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_time_of_day};

/// A work order without an explicit end date blocks out one week, matching
/// the portal's historical default.
pub const DEFAULT_WORK_ORDER_DURATION_DAYS: i64 = 7;

/// The service object owning every entity collection. All mutations resolve
/// the acting user and check its role here, so the invariants hold no matter
/// which entry point calls in.
pub struct Portal<C: Clock, G: IdGen> {
    clock: C,
    ids: G,
    directory: Directory,
    requests: RequestStore,
    work_orders: WorkOrderStore,
    inventory: ResourceInventory,
    feed: NotificationFeed,
    planner: SchedulePlanner,
}

impl Portal<SystemClock, SequentialIds> {
    pub fn new() -> Self {
        Self::with_parts(SystemClock, SequentialIds::new())
    }
}

impl Default for Portal<SystemClock, SequentialIds> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock, G: IdGen> Portal<C, G> {
    pub fn with_parts(clock: C, ids: G) -> Self {
        Self {
            clock,
            ids,
            directory: Directory::new(),
            requests: RequestStore::new(),
            work_orders: WorkOrderStore::new(),
            inventory: ResourceInventory::new(),
            feed: NotificationFeed::new(),
            planner: SchedulePlanner::new(),
        }
    }

    // ---- identity & session ----

    pub fn register_user(&mut self, draft: UserDraft) -> Result<String> {
        let id = self.ids.next("user");
        let id = self.directory.register(id, draft)?;
        tracing::info!(user_id = %id, "user registered");
        Ok(id)
    }

    pub fn authenticate(&self, email: &str) -> Option<&User> {
        self.directory.find_by_email(email)
    }

    pub fn session(&self, actor_id: &str) -> Result<Session> {
        self.directory.session(actor_id)
    }

    pub fn update_profile(&mut self, actor_id: &str, patch: ProfilePatch) -> Result<()> {
        self.directory.update_profile(actor_id, patch)
    }

    pub fn users(&self) -> &[User] {
        self.directory.all()
    }

    // ---- repair requests ----

    pub fn create_request(&mut self, actor_id: &str, draft: RequestDraft) -> Result<String> {
        let session = self.directory.session(actor_id)?;
        validate_non_empty_string("title", &draft.title)?;
        validate_non_empty_string("description", &draft.description)?;
        validate_non_empty_string("location", &draft.location)?;

        let id = self.ids.next("req");
        let now = self.clock.now();
        self.requests.insert(RepairRequest {
            id: id.clone(),
            title: draft.title.clone(),
            description: draft.description,
            location: draft.location,
            latitude: draft.latitude,
            longitude: draft.longitude,
            submitted_by: session.user_id,
            submitted_at: now,
            status: RequestStatus::Pending,
            priority: None,
            images: draft.images,
            estimated_completion_date: None,
            assigned_to: None,
            inspection_notes: None,
            resources_required: None,
        })?;

        self.notify(
            Recipient::Role(UserRole::Supervisor),
            "New Repair Request",
            format!(
                "A new repair request has been submitted: \"{}\"",
                draft.title
            ),
            NotificationKind::Info,
            Some(format!("/supervisor/requests/{}", id)),
        );
        tracing::info!(request_id = %id, "repair request submitted");
        Ok(id)
    }

    pub fn update_request(&mut self, actor_id: &str, id: &str, patch: RequestPatch) -> Result<()> {
        let session = self.directory.session(actor_id)?;
        self.require_role(
            &session,
            &[UserRole::Supervisor, UserRole::Administrator],
            "update repair requests",
        )?;

        let (title, submitted_by) = {
            let request = self.requests.get(id).ok_or_else(|| PortalError::NotFound {
                entity: "repair request",
                id: id.to_string(),
            })?;
            (request.title.clone(), request.submitted_by.clone())
        };

        if let Some(new_status) = self.requests.apply(id, patch)? {
            self.notify_status_change(&submitted_by, &title, id, new_status);
            tracing::info!(request_id = %id, status = %new_status, "request status updated");
        }
        Ok(())
    }

    pub fn request(&self, id: &str) -> Option<&RepairRequest> {
        self.requests.get(id)
    }

    pub fn all_requests(&self) -> &[RepairRequest] {
        self.requests.all()
    }

    pub fn requests_for(&self, actor_id: &str) -> Result<Vec<&RepairRequest>> {
        let session = self.directory.session(actor_id)?;
        Ok(self.requests.list_for(&session))
    }

    // ---- work orders ----

    pub fn create_work_order(&mut self, actor_id: &str, draft: WorkOrderDraft) -> Result<String> {
        let session = self.directory.session(actor_id)?;
        self.require_role(
            &session,
            &[UserRole::Supervisor, UserRole::Administrator],
            "create work orders",
        )?;
        validate_non_empty_string("title", &draft.title)?;
        validate_non_empty_string("description", &draft.description)?;

        let (status, title, submitted_by, submitted_at) = {
            let request =
                self.requests
                    .get(&draft.request_id)
                    .ok_or_else(|| PortalError::NotFound {
                        entity: "repair request",
                        id: draft.request_id.clone(),
                    })?;
            (
                request.status,
                request.title.clone(),
                request.submitted_by.clone(),
                request.submitted_at,
            )
        };
        if status != RequestStatus::InProgress
            && !status.can_transition_to(RequestStatus::InProgress)
        {
            return Err(PortalError::InvalidTransition {
                from: status,
                to: RequestStatus::InProgress,
            });
        }

        if let Some(end) = draft.end_date {
            if end < draft.start_date {
                return Err(PortalError::ValidationError {
                    field: "end_date".to_string(),
                    reason: "work order end cannot precede its start".to_string(),
                });
            }
        }
        let estimated_completion = draft
            .end_date
            .unwrap_or(draft.start_date + Duration::days(DEFAULT_WORK_ORDER_DURATION_DAYS));
        if estimated_completion < submitted_at {
            return Err(PortalError::ValidationError {
                field: "start_date".to_string(),
                reason: "work cannot complete before the request was submitted".to_string(),
            });
        }

        // Validate every allocation before touching the inventory, so a
        // failing line leaves nothing half-allocated.
        for alloc in &draft.resources {
            let resource =
                self.inventory
                    .get(&alloc.resource_id)
                    .ok_or_else(|| PortalError::NotFound {
                        entity: "resource",
                        id: alloc.resource_id.clone(),
                    })?;
            if alloc.quantity > resource.available {
                return Err(PortalError::InsufficientResources {
                    resource: resource.name.clone(),
                    requested: alloc.quantity,
                    available: resource.available,
                });
            }
        }
        for alloc in &draft.resources {
            let was_low = self
                .inventory
                .get(&alloc.resource_id)
                .map(|r| r.is_low_stock(DEFAULT_LOW_STOCK_THRESHOLD))
                .unwrap_or(false);
            self.inventory.allocate(&alloc.resource_id, alloc.quantity)?;
            self.alert_if_newly_low(&alloc.resource_id, was_low);
        }

        let id = self.ids.next("wo");
        self.work_orders.insert(WorkOrder {
            id: id.clone(),
            request_id: draft.request_id.clone(),
            title: draft.title,
            description: draft.description,
            assigned_to: draft.assigned_to,
            start_date: draft.start_date,
            end_date: draft.end_date,
            status: WorkOrderStatus::Pending,
            resources: draft.resources,
        })?;

        if self
            .requests
            .set_status(&draft.request_id, RequestStatus::InProgress)?
        {
            self.notify_status_change(
                &submitted_by,
                &title,
                &draft.request_id,
                RequestStatus::InProgress,
            );
        }
        self.requests
            .set_estimated_completion(&draft.request_id, estimated_completion)?;

        tracing::info!(work_order_id = %id, request_id = %draft.request_id, "work order created");
        Ok(id)
    }

    pub fn work_order(&self, id: &str) -> Option<&WorkOrder> {
        self.work_orders.get(id)
    }

    pub fn work_orders_for_request(&self, request_id: &str) -> Vec<&WorkOrder> {
        self.work_orders.for_request(request_id)
    }

    pub fn set_work_order_status(
        &mut self,
        actor_id: &str,
        id: &str,
        status: WorkOrderStatus,
    ) -> Result<()> {
        let session = self.directory.session(actor_id)?;
        self.require_role(
            &session,
            &[UserRole::Supervisor, UserRole::Administrator],
            "update work orders",
        )?;

        let (current, allocations) = {
            let order = self
                .work_orders
                .get(id)
                .ok_or_else(|| PortalError::NotFound {
                    entity: "work order",
                    id: id.to_string(),
                })?;
            (order.status, order.resources.clone())
        };
        if current == status {
            return Ok(());
        }
        if current == WorkOrderStatus::Completed {
            return Err(PortalError::ValidationError {
                field: "status".to_string(),
                reason: "completed work orders cannot be reopened".to_string(),
            });
        }

        // Completion hands the allocated units back to the pool.
        if status == WorkOrderStatus::Completed {
            for alloc in &allocations {
                self.inventory.release(&alloc.resource_id, alloc.quantity)?;
            }
        }

        let now = self.clock.now();
        let order = self.work_orders.get_mut(id)?;
        order.status = status;
        if status == WorkOrderStatus::Completed && order.end_date.is_none() {
            order.end_date = Some(now);
        }
        tracing::info!(work_order_id = %id, status = %status, "work order status updated");
        Ok(())
    }

    // ---- resource inventory ----

    pub fn add_resource(&mut self, actor_id: &str, draft: ResourceDraft) -> Result<String> {
        let session = self.directory.session(actor_id)?;
        self.require_role(&session, &[UserRole::Administrator], "manage resources")?;
        let id = self.ids.next("res");
        let id = self.inventory.add(id, draft)?;
        tracing::info!(resource_id = %id, "resource added");
        Ok(id)
    }

    pub fn update_resource(&mut self, actor_id: &str, id: &str, patch: ResourcePatch) -> Result<()> {
        let session = self.directory.session(actor_id)?;
        self.require_role(&session, &[UserRole::Administrator], "manage resources")?;

        let was_low = self
            .inventory
            .get(id)
            .map(|r| r.is_low_stock(DEFAULT_LOW_STOCK_THRESHOLD))
            .unwrap_or(false);
        self.inventory.update(id, patch)?;
        self.alert_if_newly_low(id, was_low);
        Ok(())
    }

    pub fn resources(&self) -> &[Resource] {
        self.inventory.all()
    }

    pub fn resource(&self, id: &str) -> Option<&Resource> {
        self.inventory.get(id)
    }

    pub fn low_stock(&self, threshold: f64) -> Vec<&Resource> {
        self.inventory.low_stock(threshold)
    }

    // ---- notifications ----

    pub fn notifications_for(&self, actor_id: &str) -> Result<Vec<&Notification>> {
        let session = self.directory.session(actor_id)?;
        Ok(self.feed.feed_for(&session))
    }

    pub fn unread_notifications(&self, actor_id: &str) -> Result<usize> {
        let session = self.directory.session(actor_id)?;
        Ok(self.feed.unread_count_for(&session))
    }

    pub fn mark_notification_read(&mut self, actor_id: &str, id: &str) -> Result<()> {
        let session = self.directory.session(actor_id)?;
        self.feed.mark_read(&session, id)
    }

    pub fn mark_all_notifications_read(&mut self, actor_id: &str) -> Result<()> {
        let session = self.directory.session(actor_id)?;
        self.feed.mark_all_read_for(&session);
        Ok(())
    }

    // ---- scheduling ----

    pub fn schedule_task(&mut self, actor_id: &str, draft: TaskDraft) -> Result<String> {
        let session = self.directory.session(actor_id)?;
        self.require_role(
            &session,
            &[UserRole::Supervisor, UserRole::Administrator],
            "schedule tasks",
        )?;
        validate_non_empty_string("title", &draft.title)?;
        let start = validate_time_of_day("start", &draft.start)?;
        let end = validate_time_of_day("end", &draft.end)?;

        let id = self.ids.next("task");
        self.planner.insert(ScheduledTask {
            id: id.clone(),
            title: draft.title,
            request_id: draft.request_id.clone(),
            date: draft.date,
            start,
            end,
            assignees: draft.assignees,
            kind: draft.kind,
        })?;

        // The request link is loose: an unknown id is kept as-is, and a
        // request that already moved past Scheduled keeps its status.
        if let Some(request_id) = draft.request_id {
            let linked = self.requests.get(&request_id).map(|r| {
                (
                    r.status,
                    r.title.clone(),
                    r.submitted_by.clone(),
                    r.submitted_at,
                )
            });
            if let Some((status, title, submitted_by, submitted_at)) = linked {
                if status.can_transition_to(RequestStatus::Scheduled) {
                    let end_of_day = NaiveTime::from_hms_opt(17, 0, 0).unwrap_or(NaiveTime::MIN);
                    let eta = draft.date.and_time(end_of_day).and_utc();
                    if eta >= submitted_at {
                        self.requests.set_estimated_completion(&request_id, eta)?;
                    }
                    if self
                        .requests
                        .set_status(&request_id, RequestStatus::Scheduled)?
                    {
                        self.notify_status_change(
                            &submitted_by,
                            &title,
                            &request_id,
                            RequestStatus::Scheduled,
                        );
                    }
                }
            }
        }

        tracing::info!(task_id = %id, "task scheduled");
        Ok(id)
    }

    pub fn tasks_on(&self, date: NaiveDate) -> Vec<&ScheduledTask> {
        self.planner.on_date(date)
    }

    // ---- derived views ----

    pub fn dashboard(&self) -> DashboardSnapshot {
        views::dashboard_snapshot(self.requests.all(), self.inventory.all())
    }

    // ---- seeding (trusted bootstrap; invariants still checked) ----

    pub fn seed_user(&mut self, user: User) -> Result<()> {
        self.ids.reserve("user", &user.id);
        self.directory.insert(user)
    }

    pub fn seed_resource(&mut self, resource: Resource) -> Result<()> {
        self.ids.reserve("res", &resource.id);
        self.inventory.insert(resource)
    }

    pub fn seed_request(&mut self, request: RepairRequest) -> Result<()> {
        if self.directory.find(&request.submitted_by).is_none() {
            return Err(PortalError::NotFound {
                entity: "user",
                id: request.submitted_by.clone(),
            });
        }
        self.ids.reserve("req", &request.id);
        self.requests.insert(request)
    }

    pub fn seed_work_order(&mut self, order: WorkOrder) -> Result<()> {
        if self.requests.get(&order.request_id).is_none() {
            return Err(PortalError::NotFound {
                entity: "repair request",
                id: order.request_id.clone(),
            });
        }
        self.ids.reserve("wo", &order.id);
        self.work_orders.insert(order)
    }

    // ---- internals ----

    fn require_role(
        &self,
        session: &Session,
        allowed: &[UserRole],
        action: &'static str,
    ) -> Result<()> {
        if allowed.contains(&session.role) {
            Ok(())
        } else {
            Err(PortalError::Forbidden {
                role: session.role,
                action,
            })
        }
    }

    fn notify(
        &mut self,
        recipient: Recipient,
        title: &str,
        message: String,
        kind: NotificationKind,
        link_to: Option<String>,
    ) -> String {
        let id = self.ids.next("notif");
        let now = self.clock.now();
        self.feed
            .append(id, recipient, title, message, kind, link_to, now)
    }

    fn notify_status_change(
        &mut self,
        submitted_by: &str,
        title: &str,
        request_id: &str,
        status: RequestStatus,
    ) {
        self.notify(
            Recipient::User(submitted_by.to_string()),
            "Request Status Updated",
            format!(
                "Your repair request \"{}\" status has changed to {}.",
                title, status
            ),
            NotificationKind::Info,
            Some(format!("/requests/{}", request_id)),
        );
    }

    fn alert_if_newly_low(&mut self, resource_id: &str, was_low: bool) {
        let crossed = self.inventory.get(resource_id).and_then(|res| {
            if !was_low && res.is_low_stock(DEFAULT_LOW_STOCK_THRESHOLD) {
                let percent = if res.quantity == 0 {
                    0
                } else {
                    (res.available as f64 / res.quantity as f64 * 100.0).round() as u32
                };
                Some((res.name.clone(), percent))
            } else {
                None
            }
        });
        if let Some((name, percent)) = crossed {
            tracing::warn!(resource = %name, percent, "resource stock dropped below threshold");
            self.notify(
                Recipient::Role(UserRole::Administrator),
                "Resource Alert",
                format!(
                    "Low inventory alert: {} stock is below threshold ({}% remaining)",
                    name, percent
                ),
                NotificationKind::Warning,
                Some("/admin/resources".to_string()),
            );
        }
    }
}
