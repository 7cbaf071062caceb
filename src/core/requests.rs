use chrono::{DateTime, Utc};

use crate::domain::model::{RepairRequest, RequestPatch, RequestStatus, Session, UserRole};
use crate::utils::error::{PortalError, Result};

/// The set of repair requests. Pure collection logic; notifications and
/// authorization are handled by the portal wrapping this store.
#[derive(Debug, Default)]
pub struct RequestStore {
    requests: Vec<RepairRequest>,
}

impl RequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> &[RepairRequest] {
        &self.requests
    }

    pub fn get(&self, id: &str) -> Option<&RepairRequest> {
        self.requests.iter().find(|r| r.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut RepairRequest> {
        self.requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| PortalError::NotFound {
                entity: "repair request",
                id: id.to_string(),
            })
    }

    /// Residents see their own submissions; every other role sees the full
    /// set. Recomputed on each call.
    pub fn list_for(&self, session: &Session) -> Vec<&RepairRequest> {
        self.requests
            .iter()
            .filter(|r| session.role != UserRole::Resident || r.submitted_by == session.user_id)
            .collect()
    }

    pub fn insert(&mut self, request: RepairRequest) -> Result<()> {
        if self.get(&request.id).is_some() {
            return Err(PortalError::ValidationError {
                field: "requests.id".to_string(),
                reason: format!("duplicate request id {}", request.id),
            });
        }
        if let Some(date) = request.estimated_completion_date {
            if date < request.submitted_at {
                return Err(PortalError::ValidationError {
                    field: "estimated_completion_date".to_string(),
                    reason: "estimated completion cannot precede submission".to_string(),
                });
            }
        }
        self.requests.push(request);
        Ok(())
    }

    /// Shallow merge of the patch. Returns the new status when the patch
    /// actually changed it, so the caller can notify the submitter.
    pub fn apply(&mut self, id: &str, patch: RequestPatch) -> Result<Option<RequestStatus>> {
        let request = self.get_mut(id)?;

        if let Some(date) = patch.estimated_completion_date {
            if date < request.submitted_at {
                return Err(PortalError::ValidationError {
                    field: "estimated_completion_date".to_string(),
                    reason: "estimated completion cannot precede submission".to_string(),
                });
            }
        }

        let mut changed = None;
        if let Some(next) = patch.status {
            if next != request.status {
                if !request.status.can_transition_to(next) {
                    return Err(PortalError::InvalidTransition {
                        from: request.status,
                        to: next,
                    });
                }
                request.status = next;
                changed = Some(next);
            }
        }

        if let Some(priority) = patch.priority {
            request.priority = Some(priority);
        }
        if let Some(assigned) = patch.assigned_to {
            request.assigned_to = Some(assigned);
        }
        if let Some(notes) = patch.inspection_notes {
            request.inspection_notes = Some(notes);
        }
        if let Some(date) = patch.estimated_completion_date {
            request.estimated_completion_date = Some(date);
        }
        if let Some(required) = patch.resources_required {
            request.resources_required = Some(required);
        }

        Ok(changed)
    }

    /// Moves the request to `next` through the transition table. Returns
    /// false when the request is already there.
    pub fn set_status(&mut self, id: &str, next: RequestStatus) -> Result<bool> {
        let request = self.get_mut(id)?;
        if request.status == next {
            return Ok(false);
        }
        if !request.status.can_transition_to(next) {
            return Err(PortalError::InvalidTransition {
                from: request.status,
                to: next,
            });
        }
        request.status = next;
        Ok(true)
    }

    pub fn set_estimated_completion(&mut self, id: &str, date: DateTime<Utc>) -> Result<()> {
        let request = self.get_mut(id)?;
        if date < request.submitted_at {
            return Err(PortalError::ValidationError {
                field: "estimated_completion_date".to_string(),
                reason: "estimated completion cannot precede submission".to_string(),
            });
        }
        request.estimated_completion_date = Some(date);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request(id: &str, submitted_by: &str, status: RequestStatus) -> RepairRequest {
        RepairRequest {
            id: id.to_string(),
            title: format!("Request {}", id),
            description: "desc".to_string(),
            location: "Main St".to_string(),
            latitude: None,
            longitude: None,
            submitted_by: submitted_by.to_string(),
            submitted_at: Utc.with_ymd_and_hms(2025, 4, 15, 10, 30, 0).unwrap(),
            status,
            priority: None,
            images: vec![],
            estimated_completion_date: None,
            assigned_to: None,
            inspection_notes: None,
            resources_required: None,
        }
    }

    #[test]
    fn resident_sees_only_own_requests() {
        let mut store = RequestStore::new();
        store
            .insert(request("req1", "user1", RequestStatus::Pending))
            .unwrap();
        store
            .insert(request("req2", "user9", RequestStatus::Pending))
            .unwrap();

        let resident = Session {
            user_id: "user1".to_string(),
            role: UserRole::Resident,
        };
        let supervisor = Session {
            user_id: "user2".to_string(),
            role: UserRole::Supervisor,
        };

        let own = store.list_for(&resident);
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].id, "req1");
        assert_eq!(store.list_for(&supervisor).len(), 2);
    }

    #[test]
    fn apply_reports_status_change_once() {
        let mut store = RequestStore::new();
        store
            .insert(request("req1", "user1", RequestStatus::Pending))
            .unwrap();

        let changed = store
            .apply(
                "req1",
                RequestPatch {
                    status: Some(RequestStatus::Inspected),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(changed, Some(RequestStatus::Inspected));

        // Setting the same status again is a no-op, not a transition.
        let unchanged = store
            .apply(
                "req1",
                RequestPatch {
                    status: Some(RequestStatus::Inspected),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(unchanged, None);
    }

    #[test]
    fn apply_rejects_backward_transition() {
        let mut store = RequestStore::new();
        store
            .insert(request("req1", "user1", RequestStatus::InProgress))
            .unwrap();

        let err = store.apply(
            "req1",
            RequestPatch {
                status: Some(RequestStatus::Pending),
                ..Default::default()
            },
        );
        assert!(matches!(err, Err(PortalError::InvalidTransition { .. })));
    }

    #[test]
    fn apply_unknown_id_is_not_found() {
        let mut store = RequestStore::new();
        let err = store.apply("ghost", RequestPatch::default());
        assert!(matches!(err, Err(PortalError::NotFound { .. })));
    }

    #[test]
    fn estimated_completion_cannot_precede_submission() {
        let mut store = RequestStore::new();
        store
            .insert(request("req1", "user1", RequestStatus::Pending))
            .unwrap();

        let too_early = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
        assert!(store.set_estimated_completion("req1", too_early).is_err());

        let fine = Utc.with_ymd_and_hms(2025, 4, 25, 17, 0, 0).unwrap();
        store.set_estimated_completion("req1", fine).unwrap();
        assert_eq!(
            store.get("req1").unwrap().estimated_completion_date,
            Some(fine)
        );
    }
}
