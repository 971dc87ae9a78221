use super::*;

/// Default dump location inside the deployment image.
pub const DUMP: &str = "data/dump.sql";

/// A parsed SQL dump: an ordered sequence of executable statements.
/// Consumed once by the loader; reading it has no side effects.
pub struct Dump(Vec<Statement>);

impl Dump {
    /// Resolve the dump location, honoring the DUMP_PATH override.
    pub fn path() -> String {
        std::env::var("DUMP_PATH").unwrap_or_else(|_| DUMP.to_string())
    }

    /// Read and parse the dump at the deployment path.
    pub fn read() -> anyhow::Result<Self> {
        let ref path = Self::path();
        log::info!("reading dump ({})", path);
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("read dump {}: {}", path, e))?;
        Ok(Self::from(text.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Dump {
    fn from(text: &str) -> Self {
        Self(Statement::split(text))
    }
}

impl IntoIterator for Dump {
    type Item = Statement;
    type IntoIter = std::vec::IntoIter<Statement>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
