//! Well-known permission group name constants.
//!
//! These must match the seed data in the `groups` table migration.

pub const GROUP_MODERATORS: &str = "moderators";
