use tokio_postgres::Error as E;
use tokio_postgres::error::Severity as Reported;

/// Classification of a failed dump statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The server rejected the statement but the session survives;
    /// replay continues with the next statement.
    Tolerated,
    /// The session itself is gone; replay aborts immediately and
    /// reconciliation never runs.
    Fatal,
}

/// Statement-level error policy for dump replay, pluggable per engine.
///
/// Separates "ignore this class of error" from generic suppression:
/// the loader reports every failure to the policy and acts only on
/// the returned [`Severity`].
pub trait Tolerance: Send + Sync {
    fn severity(&self, error: &E) -> Severity;
}

/// The Postgres policy, matching psql's default ON_ERROR behavior.
///
/// Dumps carry ownership and grant statements from the environment
/// that exported them; replayed elsewhere those roles do not exist
/// and the server rejects the statements one at a time. Any failure
/// the server itself reports at ERROR severity is therefore
/// tolerated. Everything else is fatal: FATAL/PANIC reports abort the
/// session, and errors without a server report (lost connection,
/// protocol failure) mean there is no session left to continue on.
pub struct Lenient;

impl Tolerance for Lenient {
    fn severity(&self, error: &E) -> Severity {
        if error.is_closed() {
            return Severity::Fatal;
        }
        match error.as_db_error() {
            None => Severity::Fatal,
            // fall back to the raw field when the server predates
            // the nonlocalized severity (V) protocol field
            Some(db) => match (db.parsed_severity(), db.severity()) {
                (Some(Reported::Error), _) => Severity::Tolerated,
                (None, "ERROR") => Severity::Tolerated,
                _ => Severity::Fatal,
            },
        }
    }
}
