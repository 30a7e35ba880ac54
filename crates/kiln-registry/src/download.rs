//! Fetching index documents over HTTP.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;

use kiln_util::errors::KilnError;

use crate::source::IndexFormat;

const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_millis(250);

/// A fetched document and the format its `Content-Type` announced.
#[derive(Debug)]
pub struct Fetched {
    pub body: String,
    pub format: Option<IndexFormat>,
}

/// Build the blocking client used for index downloads.
pub fn build_client(timeout: Duration) -> miette::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("kiln/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| {
            KilnError::Network {
                message: format!("Failed to create HTTP client: {e}"),
            }
            .into()
        })
}

/// GET `url` as text, retrying on 5xx responses, timeouts and connection
/// failures. Other statuses fail at once.
pub fn fetch_text(client: &Client, url: &str) -> miette::Result<Fetched> {
    let mut last_err = String::new();

    for attempt in 0..MAX_ATTEMPTS {
        if attempt > 0 {
            tracing::debug!(url, attempt, "retrying index download");
            std::thread::sleep(RETRY_DELAY * attempt);
        }

        match client.get(url).send() {
            Ok(resp) => {
                let status = resp.status();
                if status.is_server_error() {
                    last_err = format!("HTTP {status} from {url}");
                    continue;
                }
                if !status.is_success() {
                    return Err(KilnError::Network {
                        message: format!("HTTP {status} fetching {url}"),
                    }
                    .into());
                }

                let format = resp
                    .headers()
                    .get(CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .and_then(IndexFormat::from_content_type);
                let body = resp.text().map_err(|e| KilnError::Network {
                    message: format!("Failed to read response from {url}: {e}"),
                })?;
                return Ok(Fetched { body, format });
            }
            Err(e) if e.is_timeout() || e.is_connect() => {
                last_err = e.to_string();
            }
            Err(e) => {
                return Err(KilnError::Network {
                    message: format!("Request to {url} failed: {e}"),
                }
                .into());
            }
        }
    }

    Err(KilnError::Network {
        message: format!("Failed after {MAX_ATTEMPTS} attempts for {url}: {last_err}"),
    }
    .into())
}
