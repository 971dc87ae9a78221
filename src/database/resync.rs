use super::*;
use std::sync::Arc;
use tokio_postgres::Client;
use tokio_postgres::Error as E;

/// Resync defines sequence reconciliation over just-loaded data.
///
/// Dump rows arrive with explicit primary keys, so each serial
/// sequence is still at its initial state and the next API insert
/// would collide. Reconciliation sets every counter to the maximum
/// key actually present. Failures here are never tolerated: a missed
/// counter is a future uniqueness violation, not a cosmetic problem.
#[async_trait::async_trait]
pub trait Resync: Send + Sync {
    /// Fail fast when a configured table or sequence is absent,
    /// before any counter is touched.
    async fn validate(&self, bindings: &[Binding]) -> anyhow::Result<()>;
    /// Apply one binding's counter; returns the value set.
    async fn resync(&self, binding: &Binding) -> Result<i64, E>;
    /// Validate, then apply every binding in declaration order.
    /// Pure function of current table contents; rerunning is safe.
    async fn reconcile(&self, bindings: &[Binding]) -> anyhow::Result<()>;
}

#[async_trait::async_trait]
impl Resync for Client {
    async fn validate(&self, bindings: &[Binding]) -> anyhow::Result<()> {
        const SQL: &str = "SELECT to_regclass($1)::text";
        for binding in bindings {
            for name in [binding.table, binding.sequence] {
                self.query_one(SQL, &[&name])
                    .await
                    .map_err(|e| anyhow::anyhow!("lookup {}: {}", name, e))?
                    .get::<_, Option<String>>(0)
                    .ok_or_else(|| anyhow::anyhow!("missing relation {} ({})", name, binding))?;
            }
        }
        Ok(())
    }

    async fn resync(&self, binding: &Binding) -> Result<i64, E> {
        let sql = restart(binding);
        Ok(self.query_one(&sql, &[]).await?.get::<_, i64>(0))
    }

    async fn reconcile(&self, bindings: &[Binding]) -> anyhow::Result<()> {
        self.validate(bindings).await?;
        for binding in bindings {
            let value = self
                .resync(binding)
                .await
                .map_err(|e| anyhow::anyhow!("resync {}: {}", binding, e))?;
            log::info!("sequence {} set to {}", binding.sequence, value);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Resync for Arc<Client> {
    async fn validate(&self, bindings: &[Binding]) -> anyhow::Result<()> {
        self.as_ref().validate(bindings).await
    }
    async fn resync(&self, binding: &Binding) -> Result<i64, E> {
        self.as_ref().resync(binding).await
    }
    async fn reconcile(&self, bindings: &[Binding]) -> anyhow::Result<()> {
        self.as_ref().reconcile(bindings).await
    }
}

/// SQL to reset one sequence against its table.
///
/// setval treats the value as last-issued, so the next nextval returns
/// one past the maximum loaded key. A sequence cannot be set below its
/// minimum, hence the fallback to 1 (not 0) for an empty table.
pub fn restart(binding: &Binding) -> String {
    format!(
        "SELECT setval('{s}', COALESCE((SELECT MAX({c}) FROM {t}), 1))",
        s = binding.sequence,
        c = binding.column,
        t = binding.table,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restart_renders_setval_over_max_key() {
        let binding = Binding {
            table: "pokemon",
            column: "id",
            sequence: "pokemon_id_seq",
        };
        assert_eq!(
            restart(&binding),
            "SELECT setval('pokemon_id_seq', COALESCE((SELECT MAX(id) FROM pokemon), 1))"
        );
    }

    #[test]
    fn restart_renders_every_configured_binding() {
        for binding in BINDINGS {
            let sql = restart(binding);
            assert!(sql.contains(binding.sequence), "{}", sql);
            assert!(sql.contains(binding.table), "{}", sql);
        }
    }
}
