use crate::TournamentInfo;
use crate::ingest::map_tournament;
use crate::wire::{WireTournament, WireTournamentList};
use log::debug;
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const DEMO_BRACKET_JSON: &str = include_str!("../../fixtures/demo_double_elim.json");

/// Client for the wrestling REST API.
///
/// The client hands back bracket payloads as raw JSON: structural checks belong
/// to the validator, so a malformed feed still reaches the user as a list of
/// validation errors instead of a parse failure.
#[derive(Debug, Clone)]
pub struct WrestlingApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network(e, _) | ApiError::Api(e, _) | ApiError::Parsing(e, _) => Some(e),
            ApiError::NotFound(_) | ApiError::Other(_) => None,
        }
    }
}

impl WrestlingApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("matbracket/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List the tournaments the API knows about. Entries without an id are skipped.
    pub async fn fetch_tournaments(&self) -> ApiResult<Vec<TournamentInfo>> {
        let url = format!("{}/tournaments", self.base_url);
        let raw: WireTournamentList = self.get(&url).await?;
        Ok(raw.into_vec().into_iter().filter_map(map_tournament).collect())
    }

    /// Fetch one tournament's bracket payload (`{ tournament, matches }`) untouched.
    ///
    /// A 4xx answer yields `Value::Null`, which the validator reports as
    /// missing tournament data.
    pub async fn fetch_bracket(&self, tournament_id: &str) -> ApiResult<Value> {
        let url = format!("{}/tournaments/{tournament_id}/bracket", self.base_url);
        self.get::<Value>(&url).await
    }

    async fn get<T: Default + serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => {
                if e.status().map(|s| s.is_client_error()).unwrap_or(false) {
                    debug!("{url} answered {:?}; treating as empty", e.status());
                    Ok(T::default())
                } else {
                    Err(ApiError::Api(e, url.to_owned()))
                }
            }
        }
    }
}

/// Load a bracket snapshot saved to disk in the API's format.
pub fn load_bracket_file(path: impl AsRef<Path>) -> ApiResult<Value> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| ApiError::NotFound(format!("could not read {}: {e}", path.display())))?;
    serde_json::from_str(&content)
        .map_err(|e| ApiError::Other(format!("invalid bracket json at {}: {e}", path.display())))
}

/// The bundled double-elimination demo bracket, used when no API is configured.
pub fn demo_bracket() -> ApiResult<Value> {
    serde_json::from_str(DEMO_BRACKET_JSON)
        .map_err(|e| ApiError::Other(format!("invalid embedded demo bracket json: {e}")))
}

/// Read the `tournament` header out of a snapshot, for sources that have no
/// tournament listing of their own.
pub fn tournament_header(payload: &Value) -> Option<TournamentInfo> {
    payload
        .get("tournament")
        .and_then(WireTournament::from_header)
        .and_then(map_tournament)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[test]
    fn demo_bracket_parses_and_has_header() {
        let demo = demo_bracket().expect("demo bracket should parse");
        assert_eq!(demo["matches"].as_array().map(Vec::len), Some(14));
        let header = tournament_header(&demo).expect("demo has a tournament header");
        assert_eq!(header.id, "2002");
        assert_eq!(header.weight_class.as_deref(), Some("157"));
    }

    #[test]
    fn tournament_header_of_garbage_is_none() {
        assert!(tournament_header(&Value::Null).is_none());
        assert!(tournament_header(&serde_json::json!({ "matches": "x" })).is_none());
    }

    #[test]
    fn load_bracket_file_reports_missing_files() {
        let err = load_bracket_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn load_bracket_file_reads_fixture() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../fixtures/single_elim_8.json");
        let value = load_bracket_file(path).expect("fixture should load");
        assert_eq!(value["matches"].as_array().map(Vec::len), Some(7));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        assert_eq!(WrestlingApi::new("http://localhost:8000/api/").base_url(), "http://localhost:8000/api");
    }

    #[tokio::test]
    async fn fetch_bracket_returns_raw_payload() {
        let mut server = Server::new_async().await;
        let body = std::fs::read_to_string(concat!(env!("CARGO_MANIFEST_DIR"), "/../fixtures/single_elim_8.json"))
            .expect("fixture readable");
        let mock = server
            .mock("GET", "/tournaments/1001/bracket")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let api = WrestlingApi::new(server.url());
        let payload = api.fetch_bracket("1001").await.expect("fetch should succeed");
        mock.assert_async().await;
        assert_eq!(payload["tournament"]["name"], "Keystone Classic");
        assert_eq!(payload["matches"].as_array().map(Vec::len), Some(7));
    }

    #[tokio::test]
    async fn fetch_bracket_client_error_becomes_null() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/tournaments/404/bracket")
            .with_status(404)
            .create_async()
            .await;

        let api = WrestlingApi::new(server.url());
        let payload = api.fetch_bracket("404").await.expect("4xx is not an error");
        assert_eq!(payload, Value::Null);
    }

    #[tokio::test]
    async fn fetch_bracket_server_error_is_api_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/tournaments/5/bracket")
            .with_status(503)
            .create_async()
            .await;

        let api = WrestlingApi::new(server.url());
        let err = api.fetch_bracket("5").await.unwrap_err();
        assert!(matches!(err, ApiError::Api(_, _)), "got {err}");
    }

    #[tokio::test]
    async fn fetch_tournaments_accepts_bare_and_wrapped_lists() {
        let mut server = Server::new_async().await;
        let bare = server
            .mock("GET", "/tournaments")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": 1, "name": "Ironman", "year": 2024}, {"name": "no id"}]"#)
            .create_async()
            .await;
        let api = WrestlingApi::new(server.url());
        let list = api.fetch_tournaments().await.expect("list should parse");
        bare.assert_async().await;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, "1");
        assert_eq!(list[0].year, Some(2024));

        let mut server = Server::new_async().await;
        let _wrapped = server
            .mock("GET", "/tournaments")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"tournaments": [{"id": "abc", "name": "Super 32", "weight_class": "132", "division": "HS"}]}"#)
            .create_async()
            .await;
        let api = WrestlingApi::new(server.url());
        let list = api.fetch_tournaments().await.expect("wrapped list should parse");
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].title(), "Super 32 HS 132");
    }

    #[tokio::test]
    async fn malformed_json_is_a_parsing_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/tournaments")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{not json")
            .create_async()
            .await;
        let api = WrestlingApi::new(server.url());
        let err = api.fetch_tournaments().await.unwrap_err();
        assert!(matches!(err, ApiError::Parsing(_, _)), "got {err}");
    }
}
