// Approves upcoming community events and archives test submissions on the
// events calendar.
//
// Configuration comes from the environment (or a `.env` file):
// - EVENTS_ADMIN_PASSWORD (falls back to the value present at build time)
// - EVENTS_API_BASE, EVENTS_PUBLIC_URL, EVENTS_TO_APPROVE, EVENTS_TO_ARCHIVE (optional)
//
// The exit code is always 0; failures are reported in the trace and the log.

use std::io::Write;

use anyhow::Context;
use events_admin::core::moderation::{
    ConsoleReporter, ModerationClient, ModerationConfig, ModerationService,
};
use events_admin::infra::moderation::ModerationApiClient;
use tracing_subscriber::fmt::MakeWriter;

/// Diagnostics go to their own writer so they never interleave with the
/// progress lines on stdout.
fn log_subscriber<W>(make_writer: W) -> impl tracing::Subscriber + Send + Sync + 'static
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::fmt().with_writer(make_writer).finish()
}

/// Banner, both lists, then the summary. Hands the writer back when done.
async fn moderate_all<C, W>(config: &ModerationConfig, service: &ModerationService<C>, out: W) -> W
where
    C: ModerationClient,
    W: Write,
{
    let mut reporter = ConsoleReporter::new(out);
    reporter.banner();

    let summary = service
        .run_all(&config.approve_ids, &config.archive_ids, &mut reporter)
        .await;

    reporter.summary(&summary, &config.public_url);
    reporter.into_inner()
}

async fn run() -> anyhow::Result<()> {
    let config = ModerationConfig::from_env().context("Failed to load moderation config")?;
    let client = ModerationApiClient::from_config(&config)
        .context("Failed to create moderation API client")?;
    let service = ModerationService::new(client);

    moderate_all(&config, &service, std::io::stdout()).await;
    Ok(())
}

#[tokio::main]
async fn main() {
    // Initialize logging so we can see what's happening
    if let Err(e) = tracing::subscriber::set_global_default(log_subscriber(std::io::stderr)) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    if let Err(e) = run().await {
        tracing::error!("{:#}", e);
        eprintln!("❌ Error: {:#}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use events_admin::core::moderation::{ModerationAction, ModerationError};
    use std::sync::{Arc, Mutex};

    /// Every request is refused, like an unreachable API.
    struct UnreachableClient;

    #[async_trait]
    impl ModerationClient for UnreachableClient {
        async fn moderate(
            &self,
            _event_id: &str,
            _action: ModerationAction,
        ) -> Result<bool, ModerationError> {
            Err(ModerationError::Transport("connection refused".to_string()))
        }
    }

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[tokio::test]
    async fn test_logs_stay_out_of_the_trace() {
        let logs = SharedBuffer::default();
        let sink = logs.clone();
        let _guard = tracing::subscriber::set_default(log_subscriber(move || sink.clone()));

        let config = ModerationConfig::from_lookup(|_| None).unwrap();
        let service = ModerationService::new(UnreachableClient);

        let out = moderate_all(&config, &service, Vec::new()).await;
        let trace = String::from_utf8(out).unwrap();

        assert!(logs.contents().contains("Moderation failed"));
        assert!(!trace.contains("WARN"));
        assert!(trace.contains(
            "Approving event 03fa28be...   ❌ Error: Request failed: connection refused\n✗ Failed\n"
        ));
    }

    #[tokio::test]
    async fn test_run_without_environment_prints_summary() {
        let config = ModerationConfig::from_lookup(|_| None).unwrap();
        let service = ModerationService::new(UnreachableClient);

        let out = moderate_all(&config, &service, Vec::new()).await;
        let trace = String::from_utf8(out).unwrap();

        assert!(trace.starts_with("🎯 BLKOUT Events Calendar - Event Approval Script\n"));
        assert!(trace.contains("✅ Successfully approved 0/7 events"));
        assert!(trace.contains("🗑️  Successfully archived 0/12 test events"));
        assert!(trace.contains("📊 SUMMARY"));
        assert!(trace.contains("   https://events-blkout.vercel.app\n"));
    }
}
