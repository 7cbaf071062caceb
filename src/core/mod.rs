pub mod directory;
pub mod notifications;
pub mod portal;
pub mod requests;
pub mod resources;
pub mod schedule;
pub mod views;
pub mod work_orders;

pub use crate::domain::model::{Session, UserRole};
pub use crate::domain::ports::{Clock, IdGen, SequentialIds, SystemClock};
pub use crate::utils::error::Result;
pub use portal::Portal;
