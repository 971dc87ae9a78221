mod dump;
mod statement;

pub use dump::*;
pub use statement::*;
