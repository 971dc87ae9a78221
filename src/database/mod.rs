mod connect;
mod loader;
mod resync;
mod schema;
mod severity;

pub use connect::*;
pub use loader::*;
pub use resync::*;
pub use schema::*;
pub use severity::*;

use crate::dump::Dump;

/// Run both bootstrap phases in order.
///
/// Phase 1 replays the dump under the [`Lenient`] policy; phase 2
/// reconciles sequence counters and is reached only when replay
/// finished without a fatal error. Not safe to run concurrently with
/// itself; run-once semantics belong to the deployment environment.
pub async fn bootstrap() -> anyhow::Result<()> {
    let client = db().await?;
    let dump = Dump::read()?;
    let report = client
        .restore(dump, &Lenient)
        .await
        .map_err(|e| anyhow::anyhow!("bulk load aborted: {}", e))?;
    log::info!(
        "dump loaded ({} executed, {} tolerated, {} rows copied)",
        report.executed,
        report.tolerated,
        report.copied
    );
    client.reconcile(BINDINGS).await?;
    log::info!("bootstrap complete");
    Ok(())
}
