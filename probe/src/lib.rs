#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::io::Write;

use webhook_probe_http::{GenericClient, StatusCode};

pub mod config;

pub const DEFAULT_WEBHOOK_URL: &str =
    "https://h2sa-ai.app.n8n.cloud/webhook/6061f158-0fdc-4929-acdf-c580bb70d0ff";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),
}

/// Result of a single probe. Rendering it with `Display` yields the exact
/// text printed to stdout, without the trailing newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The server answered with a 2xx status.
    Success { status: StatusCode, body: String },
    /// The server answered, but with a non-2xx status.
    HttpError { status: StatusCode, reason: String },
    /// No response was obtained at all.
    UrlError { reason: String },
}

impl Outcome {
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Success { status, .. } | Self::HttpError { status, .. } => Some(*status),
            Self::UrlError { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    fn url_error(error: &webhook_probe_http::Error) -> Self {
        let reason = error.transport_reason();
        let reason = if reason.trim().is_empty() {
            format!("{error:?}")
        } else {
            reason
        };

        Self::UrlError { reason }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success { status, body } => write!(f, "Status: {status}\nResponse: {body}"),
            Self::HttpError { status, reason } => write!(f, "HTTP Error: {status} - {reason}"),
            Self::UrlError { reason } => write!(f, "URL Error: {reason}"),
        }
    }
}

/// Issues one GET to `url` and classifies what happened.
///
/// Never fails: every failure mode is folded into the returned [`Outcome`].
pub async fn probe(client: &(impl GenericClient + ?Sized), url: &str) -> Outcome {
    log::debug!("probe: sending GET url={url}");

    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            log::debug!("probe: no response: {e:?}");
            return Outcome::url_error(&e);
        }
    };

    let status = response.status();
    log::debug!("probe: received status={status}");

    if !status.is_success() {
        return Outcome::HttpError {
            status,
            reason: response.reason().unwrap_or_default(),
        };
    }

    match response.text().await {
        Ok(body) => {
            log::debug!("probe: read body len={}", body.len());
            Outcome::Success { status, body }
        }
        Err(e) => {
            log::debug!("probe: failed to read body: {e:?}");
            Outcome::url_error(&e)
        }
    }
}

/// Probes `url` and writes the rendered [`Outcome`] to `out`.
///
/// # Errors
///
/// * If writing to `out` fails
pub async fn run(
    client: &(impl GenericClient + ?Sized),
    url: &str,
    out: &mut impl Write,
) -> Result<Outcome, Error> {
    log::info!("run: probing url={url}");

    let outcome = probe(client, url).await;
    log::info!("run: outcome={outcome:?}");

    writeln!(out, "{outcome}")?;
    out.flush()?;

    Ok(outcome)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use webhook_probe_http::simulator::{SimulatedResponse, SimulatorClient};

    use super::*;

    const URL: &str = "http://webhook.test/hook";

    async fn rendered(client: &SimulatorClient) -> (Outcome, String) {
        let mut out = Vec::new();
        let outcome = run(client, URL, &mut out).await.unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test_log::test(tokio::test)]
    async fn ok_response_prints_status_and_body() {
        let client =
            SimulatorClient::new().with_response(SimulatedResponse::new(200).with_body("ok"));

        let (outcome, out) = rendered(&client).await;

        assert!(outcome.is_success());
        assert_eq!(out, "Status: 200\nResponse: ok\n");
    }

    #[test_log::test(tokio::test)]
    async fn not_found_prints_code_and_reason() {
        let client = SimulatorClient::new().with_response(SimulatedResponse::new(404));

        let (_, out) = rendered(&client).await;

        assert_eq!(out, "HTTP Error: 404 - Not Found\n");
    }

    #[test_log::test(tokio::test)]
    async fn server_error_prints_code_and_reason() {
        let client = SimulatorClient::new()
            .with_response(SimulatedResponse::new(500).with_body("stack trace here"));

        let (outcome, out) = rendered(&client).await;

        assert_eq!(outcome.status().map(|x| x.as_u16()), Some(500));
        assert_eq!(out, "HTTP Error: 500 - Internal Server Error\n");
    }

    #[test_log::test(tokio::test)]
    async fn server_supplied_reason_is_used_when_present() {
        let client = SimulatorClient::new()
            .with_response(SimulatedResponse::new(404).with_reason("Webhook Not Registered"));

        let (_, out) = rendered(&client).await;

        assert_eq!(out, "HTTP Error: 404 - Webhook Not Registered\n");
    }

    #[test_log::test(tokio::test)]
    async fn unregistered_status_has_empty_reason() {
        let client = SimulatorClient::new().with_response(SimulatedResponse::new(599));

        let (_, out) = rendered(&client).await;

        assert_eq!(out, "HTTP Error: 599 - \n");
    }

    #[test_log::test(tokio::test)]
    async fn transport_failure_prints_url_error() {
        let client = SimulatorClient::new().with_error("Name or service not known");

        let (outcome, out) = rendered(&client).await;

        assert_eq!(outcome.status(), None);
        assert_eq!(out, "URL Error: Name or service not known\n");
    }

    #[test_log::test(tokio::test)]
    async fn empty_transport_reason_falls_back_to_debug_text() {
        let client = SimulatorClient::new().with_error("");

        let (_, out) = rendered(&client).await;

        assert!(out.starts_with("URL Error: "));
        assert!(out.trim_end().len() > "URL Error: ".len());
    }

    #[test_log::test(tokio::test)]
    async fn invalid_utf8_body_is_decoded_lossily() {
        let client = SimulatorClient::new()
            .with_response(SimulatedResponse::new(200).with_body(&b"caf\xe9"[..]));

        let (_, out) = rendered(&client).await;

        assert_eq!(out, "Status: 200\nResponse: caf\u{fffd}\n");
    }

    #[test_log::test(tokio::test)]
    async fn probe_issues_exactly_one_get_per_call() {
        let client = SimulatorClient::new()
            .with_response(SimulatedResponse::new(200).with_body("ok"))
            .with_response(SimulatedResponse::new(200).with_body("ok"));

        let (first, first_out) = rendered(&client).await;
        let (second, second_out) = rendered(&client).await;

        assert_eq!(first, second);
        assert_eq!(first_out, second_out);

        let requests = client.requests();
        assert_eq!(requests.len(), 2);
        assert!(
            requests
                .iter()
                .all(|x| x.method == webhook_probe_http::Method::Get && x.url == URL)
        );
    }

    #[test_log::test]
    fn display_renders_each_outcome_kind() {
        let status = |x: u16| StatusCode::try_from(x).unwrap();

        assert_eq!(
            Outcome::Success {
                status: status(204),
                body: String::new(),
            }
            .to_string(),
            "Status: 204\nResponse: "
        );
        assert_eq!(
            Outcome::HttpError {
                status: status(403),
                reason: "Forbidden".to_string(),
            }
            .to_string(),
            "HTTP Error: 403 - Forbidden"
        );
        assert_eq!(
            Outcome::UrlError {
                reason: "timed out".to_string(),
            }
            .to_string(),
            "URL Error: timed out"
        );
    }
}
