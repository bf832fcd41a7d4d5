// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "moderation/mod.rs"]
pub mod moderation;

#[path = "packaging/mod.rs"]
pub mod packaging;
