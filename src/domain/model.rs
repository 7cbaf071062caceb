use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Resident,
    Supervisor,
    Administrator,
    Mayor,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UserRole::Resident => "resident",
            UserRole::Supervisor => "supervisor",
            UserRole::Administrator => "administrator",
            UserRole::Mayor => "mayor",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Inspected,
    Scheduled,
    InProgress,
    Completed,
    Rejected,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 6] = [
        RequestStatus::Pending,
        RequestStatus::Inspected,
        RequestStatus::Scheduled,
        RequestStatus::InProgress,
        RequestStatus::Completed,
        RequestStatus::Rejected,
    ];

    pub fn is_terminal(self) -> bool {
        matches!(self, RequestStatus::Completed | RequestStatus::Rejected)
    }

    /// Position on the forward path. Rejected sits outside the path.
    fn rank(self) -> u8 {
        match self {
            RequestStatus::Pending => 0,
            RequestStatus::Inspected => 1,
            RequestStatus::Scheduled => 2,
            RequestStatus::InProgress => 3,
            RequestStatus::Completed => 4,
            RequestStatus::Rejected => 5,
        }
    }

    /// Forward-only transition table: a request may skip stages but never
    /// move backward, and terminal states accept no further transitions.
    /// Rejected is reachable from any non-terminal state.
    pub fn can_transition_to(self, next: RequestStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        if next == RequestStatus::Rejected {
            return true;
        }
        next.rank() > self.rank()
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Inspected => "inspected",
            RequestStatus::Scheduled => "scheduled",
            RequestStatus::InProgress => "in_progress",
            RequestStatus::Completed => "completed",
            RequestStatus::Rejected => "rejected",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestPriority {
    Low,
    Medium,
    High,
    Emergency,
}

impl RequestPriority {
    pub const ALL: [RequestPriority; 4] = [
        RequestPriority::Low,
        RequestPriority::Medium,
        RequestPriority::High,
        RequestPriority::Emergency,
    ];
}

impl fmt::Display for RequestPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RequestPriority::Low => "low",
            RequestPriority::Medium => "medium",
            RequestPriority::High => "high",
            RequestPriority::Emergency => "emergency",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderStatus {
    Pending,
    InProgress,
    Completed,
    Delayed,
}

impl fmt::Display for WorkOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WorkOrderStatus::Pending => "pending",
            WorkOrderStatus::InProgress => "in_progress",
            WorkOrderStatus::Completed => "completed",
            WorkOrderStatus::Delayed => "delayed",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Manpower,
    Equipment,
    Material,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceKind::Manpower => "manpower",
            ResourceKind::Equipment => "equipment",
            ResourceKind::Material => "material",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Warning,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Inspection,
    Repair,
    Maintenance,
}

/// Who a notification is addressed to. Broadcast entries are visible to
/// everyone; role entries reach every user holding that role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recipient {
    Broadcast,
    User(String),
    Role(UserRole),
}

impl Recipient {
    pub fn includes(&self, user_id: &str, role: UserRole) -> bool {
        match self {
            Recipient::Broadcast => true,
            Recipient::User(id) => id == user_id,
            Recipient::Role(r) => *r == role,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Resolved actor used by every role-gated operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourcesRequired {
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub manpower: u32,
    #[serde(default)]
    pub equipment: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepairRequest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub submitted_by: String,
    pub submitted_at: DateTime<Utc>,
    pub status: RequestStatus,
    pub priority: Option<RequestPriority>,
    #[serde(default)]
    pub images: Vec<String>,
    pub estimated_completion_date: Option<DateTime<Utc>>,
    pub assigned_to: Option<String>,
    pub inspection_notes: Option<String>,
    pub resources_required: Option<ResourcesRequired>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceAllocation {
    pub resource_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkOrder {
    pub id: String,
    pub request_id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub assigned_to: Vec<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: WorkOrderStatus,
    #[serde(default)]
    pub resources: Vec<ResourceAllocation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub name: String,
    pub kind: ResourceKind,
    pub quantity: u32,
    pub available: u32,
    pub unit: String,
}

impl Resource {
    pub fn used(&self) -> u32 {
        self.quantity - self.available
    }

    /// Multiplication form keeps zero-quantity rows out without dividing.
    pub fn is_low_stock(&self, threshold: f64) -> bool {
        (self.available as f64) < threshold * (self.quantity as f64)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub recipient: Recipient,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub kind: NotificationKind,
    pub link_to: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub id: String,
    pub title: String,
    pub request_id: Option<String>,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub assignees: Vec<String>,
    pub kind: TaskKind,
}

#[derive(Debug, Clone)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RequestDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RequestPatch {
    pub status: Option<RequestStatus>,
    pub priority: Option<RequestPriority>,
    pub assigned_to: Option<String>,
    pub inspection_notes: Option<String>,
    pub estimated_completion_date: Option<DateTime<Utc>>,
    pub resources_required: Option<ResourcesRequired>,
}

#[derive(Debug, Clone)]
pub struct WorkOrderDraft {
    pub request_id: String,
    pub title: String,
    pub description: String,
    pub assigned_to: Vec<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub resources: Vec<ResourceAllocation>,
}

#[derive(Debug, Clone)]
pub struct ResourceDraft {
    pub name: String,
    pub kind: ResourceKind,
    pub quantity: u32,
    pub available: u32,
    pub unit: String,
}

#[derive(Debug, Clone, Default)]
pub struct ResourcePatch {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub quantity: Option<u32>,
    pub available: Option<u32>,
}

/// Task times arrive as "HH:MM" strings, matching how the scheduling form
/// captures them; they are parsed and validated on the way in.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub request_id: Option<String>,
    pub date: NaiveDate,
    pub start: String,
    pub end: String,
    pub assignees: Vec<String>,
    pub kind: TaskKind,
}
