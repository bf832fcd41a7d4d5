// Moderation infra layer.
// - `moderation_api_client.rs` talks to the events admin HTTP API.

#[path = "moderation_api_client.rs"]
pub mod moderation_api_client;

pub use moderation_api_client::ModerationApiClient;
