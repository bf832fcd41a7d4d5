// Configuration for a moderation run.
//
// Every value can be overridden from the environment; a `.env` file is loaded
// by the binary before this runs, same as the bot does for its tokens. The
// admin credential is baked in at build time from `EVENTS_ADMIN_PASSWORD` and
// a runtime variable of the same name takes precedence.

use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://events-blkout.vercel.app/api";
pub const DEFAULT_PUBLIC_URL: &str = "https://events-blkout.vercel.app";

pub const ENV_API_BASE: &str = "EVENTS_API_BASE";
pub const ENV_ADMIN_PASSWORD: &str = "EVENTS_ADMIN_PASSWORD";
pub const ENV_PUBLIC_URL: &str = "EVENTS_PUBLIC_URL";
pub const ENV_TO_APPROVE: &str = "EVENTS_TO_APPROVE";
pub const ENV_TO_ARCHIVE: &str = "EVENTS_TO_ARCHIVE";

/// Credential captured when the binary was compiled.
pub const BUILT_IN_ADMIN_PASSWORD: Option<&str> = option_env!("EVENTS_ADMIN_PASSWORD");

/// Community events with dates from Nov 22, 2025 onwards.
pub const DEFAULT_EVENTS_TO_APPROVE: &[&str] = &[
    "03fa28be-2b44-4d47-a318-7135842256ac", // Sistermatic Xmas Party
    "4d79fb2a-0e64-4c9e-b89e-ed593ac40ac3", // Shaded Writers
    "7cb852cf-1388-483b-a443-0f5a0b6f4faf", // Word Benders
    "18da95f8-8136-4b1e-8e23-6994773cc272", // SEASONED @ STUDIO 338
    "f2c749e5-6392-446d-84f8-4175e638de49", // World AIDS Day Special
    "eff2defa-93e9-45f4-95e1-71ead692837f", // HIV Nude Exhibit
    "114b2123-7a5b-459f-830f-b333fe18d3b3", // Collaboration Panel
];

/// Test submissions, duplicates and events from 2024.
pub const DEFAULT_EVENTS_TO_ARCHIVE: &[&str] = &[
    "c802b244-2df6-4f56-9ad2-8f4c403268c2", // Duplicate SEASONED
    "3ed7e9a9-4a3f-4a22-b445-9436b1754c15", // Test Event from Extension
    "8bd3eabe-1a98-462f-9daa-2cfe69ecc0f6", // Test
    "a08c2ff1-638f-4dc6-ae33-5cc2123334f6", // Test Form Event
    "6110be4b-680d-4234-8caa-19b984a44071", // Community Test Event
    "8990b608-a670-4e91-8bb8-cef0ae0b4609", // Extension Test
    "11ce1723-c286-4c7c-9c5e-ddbd4c995526", // Test Event
    "10dd3598-a96a-4185-8124-405cfe72aac1", // Test Event
    "203595c7-7dc6-4e3d-b514-76830ada56ff", // Final Test Event
    "68c0091a-d2d7-402c-a86a-b5349d90085b", // Another Test Event (2024)
    "5330da7a-bba3-41cc-8f3a-3caab661427d", // Test Community Event (2024)
    "eb9926d1-89ef-4409-9011-62a81fbecb40", // High Priority Event (2024)
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct ModerationConfig {
    /// API root without a trailing slash
    pub base_url: String,
    /// Sent as `x-admin-password`
    pub admin_password: String,
    /// Where moderated events show up, printed at the end of a run
    pub public_url: String,
    pub approve_ids: Vec<String>,
    pub archive_ids: Vec<String>,
}

impl ModerationConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let admin_password = lookup(ENV_ADMIN_PASSWORD)
            .filter(|v| !v.is_empty())
            .or_else(|| BUILT_IN_ADMIN_PASSWORD.map(str::to_string))
            .unwrap_or_default();
        if admin_password.is_empty() {
            // The API will answer 401 for every event; the run still completes.
            tracing::warn!("No admin password configured, requests will be unauthenticated");
        }

        let base_url = parse_url(
            ENV_API_BASE,
            lookup(ENV_API_BASE).unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        )?;
        let public_url = parse_url(
            ENV_PUBLIC_URL,
            lookup(ENV_PUBLIC_URL).unwrap_or_else(|| DEFAULT_PUBLIC_URL.to_string()),
        )?;

        let approve_ids = lookup(ENV_TO_APPROVE)
            .map(|v| parse_id_list(&v))
            .unwrap_or_else(|| to_owned_list(DEFAULT_EVENTS_TO_APPROVE));
        let archive_ids = lookup(ENV_TO_ARCHIVE)
            .map(|v| parse_id_list(&v))
            .unwrap_or_else(|| to_owned_list(DEFAULT_EVENTS_TO_ARCHIVE));

        Ok(Self {
            base_url,
            admin_password,
            public_url,
            approve_ids,
            archive_ids,
        })
    }

    /// Full URL of the moderate-content endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/moderate-content", self.base_url)
    }
}

fn parse_url(key: &'static str, raw: String) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::Invalid {
            key,
            reason: format!("expected an http(s) URL, got {:?}", raw),
        });
    }
    Ok(trimmed.to_string())
}

/// Split a comma-separated list, trimming whitespace and dropping blanks.
pub fn parse_id_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

fn to_owned_list(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}
