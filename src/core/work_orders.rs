use crate::domain::model::WorkOrder;
use crate::utils::error::{PortalError, Result};

/// Scheduled units of labor, each linked to one repair request. Allocation
/// side effects live in the portal; this store only holds the orders.
#[derive(Debug, Default)]
pub struct WorkOrderStore {
    orders: Vec<WorkOrder>,
}

impl WorkOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> &[WorkOrder] {
        &self.orders
    }

    pub fn get(&self, id: &str) -> Option<&WorkOrder> {
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Result<&mut WorkOrder> {
        self.orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| PortalError::NotFound {
                entity: "work order",
                id: id.to_string(),
            })
    }

    pub fn for_request(&self, request_id: &str) -> Vec<&WorkOrder> {
        self.orders
            .iter()
            .filter(|o| o.request_id == request_id)
            .collect()
    }

    pub fn insert(&mut self, order: WorkOrder) -> Result<()> {
        if self.get(&order.id).is_some() {
            return Err(PortalError::ValidationError {
                field: "work_orders.id".to_string(),
                reason: format!("duplicate work order id {}", order.id),
            });
        }
        self.orders.push(order);
        Ok(())
    }
}
