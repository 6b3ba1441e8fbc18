//! Blocking POM downloads from Maven repositories.

use std::time::Duration;

use depcov_util::errors::DepcovError;
use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::repository::MavenRepository;

const ATTEMPTS: u32 = 3;
const BACKOFF: Duration = Duration::from_millis(500);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Build the blocking client shared by all repository lookups.
pub fn build_client() -> miette::Result<Client> {
    let client = Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("depcov/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| DepcovError::Network {
            message: format!("Cannot initialise HTTP client: {e}"),
        })?;
    Ok(client)
}

/// Result of one request.
enum Fetch {
    Found(String),
    Missing,
    Transient(String),
}

/// Fetch `url` from `repo` as text.
///
/// `Ok(None)` means the repository does not have the file (HTTP 404).
/// Timeouts, refused connections and 5xx responses are retried with a
/// growing delay; any other failure is returned immediately.
pub fn download_text(
    client: &Client,
    repo: &MavenRepository,
    url: &str,
) -> miette::Result<Option<String>> {
    let mut reason = String::new();
    for attempt in 1..=ATTEMPTS {
        if attempt > 1 {
            std::thread::sleep(BACKOFF * (attempt - 1));
        }
        match fetch_once(client, repo, url)? {
            Fetch::Found(body) => return Ok(Some(body)),
            Fetch::Missing => return Ok(None),
            Fetch::Transient(why) => {
                tracing::debug!("{url}: attempt {attempt}/{ATTEMPTS} failed: {why}");
                reason = why;
            }
        }
    }
    Err(DepcovError::Network {
        message: format!("Giving up on {url} after {ATTEMPTS} attempts: {reason}"),
    }
    .into())
}

fn fetch_once(
    client: &Client,
    repo: &MavenRepository,
    url: &str,
) -> miette::Result<Fetch> {
    let response = match repo.authorize(client.get(url)).send() {
        Ok(response) => response,
        Err(e) if e.is_timeout() || e.is_connect() => {
            return Ok(Fetch::Transient(e.to_string()))
        }
        Err(e) => {
            return Err(DepcovError::Network {
                message: format!("GET {url}: {e}"),
            }
            .into())
        }
    };

    match response.status() {
        StatusCode::NOT_FOUND => Ok(Fetch::Missing),
        status if status.is_server_error() => Ok(Fetch::Transient(format!("HTTP {status}"))),
        status if !status.is_success() => Err(DepcovError::Network {
            message: format!("GET {url}: HTTP {status}"),
        }
        .into()),
        _ => {
            let body = response.text().map_err(|e| DepcovError::Network {
                message: format!("GET {url}: unreadable body: {e}"),
            })?;
            Ok(Fetch::Found(body))
        }
    }
}
