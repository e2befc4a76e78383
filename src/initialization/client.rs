//! HTTP client initialization.

use std::time::Duration;

use reqwest::ClientBuilder;

use crate::error_handling::InitializationError;

/// Initializes the HTTP client used for all provider calls.
///
/// Every request through this client is bounded by `timeout_secs`; a
/// provider that stops answering costs one timeout and surfaces as a network
/// error, it never hangs the calling flow.
///
/// # Errors
///
/// Returns an `InitializationError` if client creation fails.
pub fn init_client(timeout_secs: u64) -> Result<reqwest::Client, InitializationError> {
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_client_builds() {
        let client = init_client(10);
        assert!(client.is_ok(), "client with a sane timeout should build");
    }
}
