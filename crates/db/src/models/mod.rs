//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A safe `Serialize` response struct where the row carries secrets
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod course;
pub mod lesson;
pub mod payment;
pub mod session;
pub mod subscription;
pub mod user;
