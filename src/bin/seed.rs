//! Bootstrap Binary
//!
//! Seeds the database from the deployment dump, then reconciles
//! every sequence counter with the loaded rows.
//!
//! No flags; configuration comes from the environment (DB_URL or
//! DB_HOST/DB_PORT/DB_USER/DB_PASS/DB_NAME, and DUMP_PATH).

use pokeseed::*;

#[tokio::main]
async fn main() {
    log();
    kys();
    if let Err(e) = database::bootstrap().await {
        log::error!("bootstrap failed: {:#}", e);
        std::process::exit(1);
    }
}
