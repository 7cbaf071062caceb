use crate::domain::model::{ProfilePatch, Session, User, UserDraft};
use crate::utils::error::{PortalError, Result};
use crate::utils::validation::validate_non_empty_string;

/// Registered users. Id and role are immutable after registration; profile
/// fields move through `update_profile` only.
#[derive(Debug, Default)]
pub struct Directory {
    users: Vec<User>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> &[User] {
        &self.users
    }

    pub fn find(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn find_by_email(&self, email: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
    }

    /// Resolves an actor id into a session. Every role-gated operation goes
    /// through this, so authorization lives in the store layer.
    pub fn session(&self, actor_id: &str) -> Result<Session> {
        self.find(actor_id)
            .map(|u| Session {
                user_id: u.id.clone(),
                role: u.role,
            })
            .ok_or_else(|| PortalError::NotFound {
                entity: "user",
                id: actor_id.to_string(),
            })
    }

    pub fn register(&mut self, id: String, draft: UserDraft) -> Result<String> {
        validate_non_empty_string("name", &draft.name)?;
        validate_non_empty_string("email", &draft.email)?;
        if self.find_by_email(&draft.email).is_some() {
            return Err(PortalError::ValidationError {
                field: "email".to_string(),
                reason: format!("an account already exists for {}", draft.email),
            });
        }

        self.users.push(User {
            id: id.clone(),
            name: draft.name,
            email: draft.email,
            role: draft.role,
            phone: draft.phone,
            address: draft.address,
        });
        Ok(id)
    }

    /// Direct insert for seed data; still rejects duplicate ids and emails.
    pub fn insert(&mut self, user: User) -> Result<()> {
        if self.find(&user.id).is_some() {
            return Err(PortalError::ValidationError {
                field: "users.id".to_string(),
                reason: format!("duplicate user id {}", user.id),
            });
        }
        if self.find_by_email(&user.email).is_some() {
            return Err(PortalError::ValidationError {
                field: "users.email".to_string(),
                reason: format!("duplicate email {}", user.email),
            });
        }
        self.users.push(user);
        Ok(())
    }

    pub fn update_profile(&mut self, actor_id: &str, patch: ProfilePatch) -> Result<()> {
        let user = self
            .users
            .iter_mut()
            .find(|u| u.id == actor_id)
            .ok_or_else(|| PortalError::NotFound {
                entity: "user",
                id: actor_id.to_string(),
            })?;

        if let Some(name) = patch.name {
            validate_non_empty_string("name", &name)?;
            user.name = name;
        }
        if let Some(phone) = patch.phone {
            user.phone = Some(phone);
        }
        if let Some(address) = patch.address {
            user.address = Some(address);
        }
        Ok(())
    }
}
