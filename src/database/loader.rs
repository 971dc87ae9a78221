use super::*;
use crate::dump::Dump;
use crate::dump::Statement;
use futures::SinkExt;
use std::sync::Arc;
use tokio_postgres::Client;
use tokio_postgres::Error as E;

/// Tally of a full dump replay. Informational; the loader's contract
/// is only overall success or fatal failure.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    /// Statements the server accepted.
    pub executed: usize,
    /// Statements rejected but tolerated under the policy.
    pub tolerated: usize,
    /// Rows streamed through COPY blocks.
    pub copied: u64,
}

/// Load defines the error-tolerant dump replay interface.
///
/// Statements execute one at a time in dump order on a single
/// connection; ordering is load-bearing and never parallelized.
/// No transaction wraps the replay, so a fatal abort leaves the
/// database in a detectable partially-loaded state.
#[async_trait::async_trait]
pub trait Load: Send + Sync {
    async fn restore(&self, dump: Dump, policy: &dyn Tolerance) -> Result<Report, E>;
}

#[async_trait::async_trait]
impl Load for Client {
    async fn restore(&self, dump: Dump, policy: &dyn Tolerance) -> Result<Report, E> {
        log::info!("replaying dump ({} statements)", dump.len());
        let mut report = Report::default();
        for ref statement in dump {
            let result = match statement {
                Statement::Sql(sql) => self.simple_query(sql).await.map(|_| 0),
                Statement::Copy { command, data } => feed(self, command, data).await,
            };
            match result {
                Ok(rows) => {
                    report.executed += 1;
                    report.copied += rows;
                }
                Err(e) => match policy.severity(&e) {
                    Severity::Tolerated => {
                        report.tolerated += 1;
                        log::warn!("tolerated ({}): {}", statement.preview(), e);
                    }
                    Severity::Fatal => {
                        log::error!("fatal ({}): {}", statement.preview(), e);
                        return Err(e);
                    }
                },
            }
        }
        Ok(report)
    }
}

#[async_trait::async_trait]
impl Load for Arc<Client> {
    async fn restore(&self, dump: Dump, policy: &dyn Tolerance) -> Result<Report, E> {
        self.as_ref().restore(dump, policy).await
    }
}

/// Stream one COPY block's inline data through the COPY protocol.
async fn feed(client: &Client, command: &str, data: &str) -> Result<u64, E> {
    let sink = client.copy_in(command).await?;
    futures::pin_mut!(sink);
    sink.send(bytes::Bytes::copy_from_slice(data.as_bytes()))
        .await?;
    sink.finish().await
}
