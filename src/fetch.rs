//! HTTP fetch for tab pages.
//!
//! The reconstructor never performs I/O itself; this module is the fetch
//! collaborator that hands it raw HTML. Transport failures and non-2xx
//! statuses are reported as typed errors so callers can keep them distinct
//! from the reconstructor's "no chord blocks found" outcome.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use thiserror::Error;

const USER_AGENT: &str = concat!("ukutabs-extract/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: StatusCode },
}

/// Build the shared blocking client used for all page fetches.
pub fn build_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
}

/// Fetch one page and return its body on a 2xx response.
pub fn fetch_page(client: &Client, url: &str) -> Result<String, FetchError> {
    let transport = |source| FetchError::Transport {
        url: url.to_string(),
        source,
    };

    let response = client.get(url).send().map_err(transport)?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }
    response.text().map_err(transport)
}
