use std::sync::Arc;

use finquote::{Endpoints, Finquote};
use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .try_init();
}

/// A live client, or a mock-backed one when `FINQUOTE_EXAMPLES_USE_MOCK` is set.
pub fn get_client() -> Result<Finquote, finquote::FinquoteError> {
    if std::env::var("FINQUOTE_EXAMPLES_USE_MOCK").is_ok() {
        println!("--- (Using mock transport for CI) ---");
        let endpoints = Endpoints::with_base_url("http://mock.invalid");
        let transport = finquote_mock::MockTransport::provider(&endpoints);
        Finquote::builder()
            .endpoints(endpoints)
            .transport(Arc::new(transport))
            .build()
    } else {
        Finquote::new()
    }
}
