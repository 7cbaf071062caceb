use crate::domain::model::{Resource, ResourceDraft, ResourcePatch};
use crate::utils::error::{PortalError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_stock_bounds};

/// Fraction of total stock below which a resource counts as low.
pub const DEFAULT_LOW_STOCK_THRESHOLD: f64 = 0.2;

/// Materials, manpower and equipment tracked by total and available
/// quantity. The `available <= quantity` invariant is enforced here, not at
/// the UI boundary.
#[derive(Debug, Default)]
pub struct ResourceInventory {
    resources: Vec<Resource>,
}

impl ResourceInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> &[Resource] {
        &self.resources
    }

    pub fn get(&self, id: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Resource> {
        self.resources
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| PortalError::NotFound {
                entity: "resource",
                id: id.to_string(),
            })
    }

    pub fn add(&mut self, id: String, draft: ResourceDraft) -> Result<String> {
        validate_non_empty_string("name", &draft.name)?;
        validate_non_empty_string("unit", &draft.unit)?;
        validate_stock_bounds("available", draft.available, draft.quantity)?;

        self.resources.push(Resource {
            id: id.clone(),
            name: draft.name,
            kind: draft.kind,
            quantity: draft.quantity,
            available: draft.available,
            unit: draft.unit,
        });
        Ok(id)
    }

    /// Direct insert for seed data; bounds are still checked.
    pub fn insert(&mut self, resource: Resource) -> Result<()> {
        if self.get(&resource.id).is_some() {
            return Err(PortalError::ValidationError {
                field: "resources.id".to_string(),
                reason: format!("duplicate resource id {}", resource.id),
            });
        }
        validate_stock_bounds("available", resource.available, resource.quantity)?;
        self.resources.push(resource);
        Ok(())
    }

    /// Shallow merge; any merge that would break `available <= quantity` is
    /// rejected before anything mutates.
    pub fn update(&mut self, id: &str, patch: ResourcePatch) -> Result<()> {
        let resource = self.get_mut(id)?;

        let quantity = patch.quantity.unwrap_or(resource.quantity);
        let available = patch.available.unwrap_or(resource.available);
        validate_stock_bounds("available", available, quantity)?;

        if let Some(name) = patch.name {
            validate_non_empty_string("name", &name)?;
            resource.name = name;
        }
        if let Some(unit) = patch.unit {
            validate_non_empty_string("unit", &unit)?;
            resource.unit = unit;
        }
        resource.quantity = quantity;
        resource.available = available;
        Ok(())
    }

    /// Takes `quantity` units out of the available pool.
    pub fn allocate(&mut self, id: &str, quantity: u32) -> Result<()> {
        let resource = self.get_mut(id)?;
        if quantity > resource.available {
            return Err(PortalError::InsufficientResources {
                resource: resource.name.clone(),
                requested: quantity,
                available: resource.available,
            });
        }
        resource.available -= quantity;
        Ok(())
    }

    /// Returns previously allocated units, clamped so the invariant holds
    /// even if quantities were adjusted in between.
    pub fn release(&mut self, id: &str, quantity: u32) -> Result<()> {
        let resource = self.get_mut(id)?;
        resource.available = resource
            .available
            .saturating_add(quantity)
            .min(resource.quantity);
        Ok(())
    }

    pub fn low_stock(&self, threshold: f64) -> Vec<&Resource> {
        self.resources
            .iter()
            .filter(|r| r.is_low_stock(threshold))
            .collect()
    }
}
