//! Data source adapter: one GET against the users endpoint.
//!
//! The response body is validated before it becomes the working set: it must
//! be a JSON array, elements that do not decode into a [`UserRecord`] are
//! dropped, and so are elements repeating an id seen earlier in the array.
use std::collections::HashSet;

use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::model::UserRecord;

/// Users listing used when no endpoint is configured.
pub const DEFAULT_ENDPOINT: &str = "https://api.escuelajs.co/api/v1/users";

const USER_AGENT: &str = concat!("user-dashboard/", env!("CARGO_PKG_VERSION"));

/// Outcome of a fetch as delivered to the event loop.
pub type FetchResult = Result<Vec<UserRecord>, FetchError>;

/// Validated records plus how many array elements were dropped.
#[derive(Debug, Default)]
pub struct Decoded {
    pub records: Vec<UserRecord>,
    pub skipped: usize,
}

pub struct UsersSource {
    client: reqwest::Client,
    endpoint: reqwest::Url,
}

impl UsersSource {
    /// Build an adapter with a default HTTP client.
    pub fn new(endpoint: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(FetchError::Client)?;
        Self::with_client(client, endpoint)
    }

    /// Build an adapter around an existing client.
    pub fn with_client(client: reqwest::Client, endpoint: &str) -> Result<Self, FetchError> {
        let endpoint = parse_endpoint(endpoint)?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Fetch and validate the full users listing.
    pub async fn fetch_users(&self) -> FetchResult {
        let url = self.endpoint.as_str().to_string();
        info!(endpoint = %url, "fetching users");
        let resp = self
            .client
            .get(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })?;
        let decoded = decode_users(&body)?;
        info!(
            count = decoded.records.len(),
            skipped = decoded.skipped,
            "fetched users"
        );
        Ok(decoded.records)
    }

    /// Run [`fetch_users`](Self::fetch_users) on the tokio runtime and hand back
    /// a receiver for its result.
    ///
    /// Dropping the receiver before the fetch finishes discards the result.
    pub fn spawn_fetch(self) -> oneshot::Receiver<FetchResult> {
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let result = self.fetch_users().await;
            if tx.send(result).is_err() {
                debug!("users fetch finished after the screen closed");
            }
        });
        rx
    }
}

fn parse_endpoint(endpoint: &str) -> Result<reqwest::Url, FetchError> {
    let invalid = |reason: String| FetchError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason,
    };
    let url = reqwest::Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme {other:?}"))),
    }
}

/// Validate a users response body.
pub fn decode_users(body: &[u8]) -> Result<Decoded, FetchError> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    let serde_json::Value::Array(items) = value else {
        return Err(FetchError::Schema("expected a JSON array of users".into()));
    };

    let mut out = Decoded::default();
    let mut seen = HashSet::new();
    for (index, item) in items.into_iter().enumerate() {
        let record: UserRecord = match serde_json::from_value(item) {
            Ok(r) => r,
            Err(e) => {
                warn!(index, error = %e, "skipping malformed user record");
                out.skipped += 1;
                continue;
            }
        };
        if !seen.insert(record.id.clone()) {
            warn!(index, id = %record.id, "skipping user record with duplicate id");
            out.skipped += 1;
            continue;
        }
        out.records.push(record);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserId;

    #[test]
    fn decode_keeps_order_and_ignores_extra_fields() {
        let body = br#"[
            {"id": 1, "name": "Ann", "email": "a@x.com", "role": "admin", "avatar": "x"},
            {"id": "b2", "name": "Bob", "email": "b@x.com"}
        ]"#;
        let decoded = decode_users(body).unwrap();
        assert_eq!(decoded.skipped, 0);
        assert_eq!(decoded.records.len(), 2);
        assert_eq!(decoded.records[0].id, UserId::Number(1));
        assert_eq!(decoded.records[1].id, UserId::Text("b2".into()));
    }

    #[test]
    fn decode_skips_records_missing_required_fields() {
        let body = br#"[
            {"id": 1, "name": "Ann"},
            {"name": "NoId", "email": "n@x.com"},
            {"id": 3, "name": "Cy", "email": "c@x.com"},
            {"id": 4, "name": null, "email": "d@x.com"}
        ]"#;
        let decoded = decode_users(body).unwrap();
        assert_eq!(decoded.skipped, 3);
        assert_eq!(decoded.records, vec![UserRecord::new(3, "Cy", "c@x.com")]);
    }

    #[test]
    fn decode_drops_duplicate_ids() {
        let body = br#"[
            {"id": 1, "name": "Ann", "email": "a@x.com"},
            {"id": 1, "name": "Ann again", "email": "a2@x.com"}
        ]"#;
        let decoded = decode_users(body).unwrap();
        assert_eq!(decoded.skipped, 1);
        assert_eq!(decoded.records[0].name, "Ann");
    }

    #[test]
    fn decode_rejects_non_array_bodies() {
        assert!(matches!(
            decode_users(br#"{"users": []}"#),
            Err(FetchError::Schema(_))
        ));
        assert!(matches!(decode_users(b"not json"), Err(FetchError::Decode(_))));
    }

    #[test]
    fn endpoint_must_be_http() {
        assert!(UsersSource::new("ftp://example.com/users").is_err());
        assert!(UsersSource::new("not a url").is_err());
        let src = UsersSource::new(DEFAULT_ENDPOINT).unwrap();
        assert_eq!(src.endpoint(), DEFAULT_ENDPOINT);
    }
}
