// Core moderation module - approving and archiving events through the admin API.

pub mod moderation_config;
pub mod moderation_models;
pub mod moderation_report;
pub mod moderation_service;

pub use moderation_config::*;
pub use moderation_models::*;
pub use moderation_report::ConsoleReporter;
pub use moderation_service::*;
