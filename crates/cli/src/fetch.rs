//! Downloading --url snapshot sources. One GET, no retries: the scheduled
//! job runs again next cycle, and the idempotency ledger makes re-fetching
//! a committed period free.

use std::time::Duration;

use url::Url;

use crate::exit_codes::EXIT_FETCH;
use crate::CliError;

const USER_AGENT: &str = concat!("medreg/", env!("CARGO_PKG_VERSION"));

/// Fetch the snapshot bytes behind `raw_url`. Returns the filename taken
/// from the last URL path segment (period derivation reads it) plus the
/// body bytes.
pub fn fetch_url(raw_url: &str, timeout: Duration) -> Result<(String, Vec<u8>), CliError> {
    let parsed = Url::parse(raw_url)
        .map_err(|e| CliError::usage(format!("invalid url {}: {}", raw_url, e)))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(CliError::usage(format!(
            "unsupported url scheme '{}'",
            parsed.scheme()
        )));
    }
    let name = source_name(&parsed);

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| CliError::fetch(format!("failed to build HTTP client: {}", e)))?;

    let response = client
        .get(parsed)
        .send()
        .map_err(|e| CliError::fetch(format!("GET {} failed: {}", raw_url, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(CliError::fetch(format!(
            "GET {} returned HTTP {}",
            raw_url,
            status.as_u16()
        )));
    }

    let bytes = response
        .bytes()
        .map_err(|e| CliError::fetch(format!("reading body of {} failed: {}", raw_url, e)))?;
    Ok((name, bytes.to_vec()))
}

fn source_name(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .unwrap_or("download")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn downloads_body_and_derives_name_from_path() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/opendata/DLP20240301.zip");
            then.status(200).body(b"zip bytes");
        });

        let (name, bytes) = fetch_url(
            &server.url("/opendata/DLP20240301.zip"),
            Duration::from_secs(5),
        )
        .unwrap();

        mock.assert();
        assert_eq!(name, "DLP20240301.zip");
        assert_eq!(bytes, b"zip bytes");
    }

    #[test]
    fn non_success_status_is_a_fetch_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/gone.csv");
            then.status(404);
        });

        let err = fetch_url(&server.url("/gone.csv"), Duration::from_secs(5)).unwrap_err();
        assert_eq!(err.code, EXIT_FETCH);
        assert!(err.message.contains("HTTP 404"));
    }

    #[test]
    fn bare_host_url_falls_back_to_generic_name() {
        let url = Url::parse("https://example.test/").unwrap();
        assert_eq!(source_name(&url), "download");
    }

    #[test]
    fn non_http_scheme_is_a_usage_error() {
        let err = fetch_url("ftp://example.test/a.csv", Duration::from_secs(5)).unwrap_err();
        assert_eq!(err.code, crate::exit_codes::EXIT_USAGE);
    }
}
