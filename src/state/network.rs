use crate::state::app_settings::BracketSource;
use crate::state::messages::{NetworkRequest, NetworkResponse};
use log::{debug, error, info};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use wrestling_api::client::{self, ApiError, ApiResult, WrestlingApi};

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

pub struct NetworkWorker {
    source: BracketSource,
    client: Option<WrestlingApi>,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        source: BracketSource,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        let client = match &source {
            BracketSource::Api { base_url } => Some(WrestlingApi::new(base_url.clone())),
            BracketSource::File(_) | BracketSource::Demo => None,
        };
        Self {
            source,
            client,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let result = match request {
                NetworkRequest::LoadTournaments => self.handle_load_tournaments().await,
                NetworkRequest::LoadBracket { tournament_id } => {
                    self.handle_load_bracket(tournament_id).await
                }
            };

            debug!("network request complete");
            self.stop_loading_animation(result.is_ok()).await;

            let response = result.unwrap_or_else(|err| NetworkResponse::Error {
                message: err.to_string(),
            });

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_load_tournaments(&self) -> ApiResult<NetworkResponse> {
        let tournaments = match &self.client {
            Some(api) => {
                debug!("listing tournaments from {}", api.base_url());
                api.fetch_tournaments().await?
            }
            // Single-snapshot sources list whatever their header names.
            None => {
                let payload = self.read_snapshot()?;
                client::tournament_header(&payload).into_iter().collect()
            }
        };
        info!("{} tournament(s) available", tournaments.len());
        Ok(NetworkResponse::TournamentsLoaded { tournaments })
    }

    async fn handle_load_bracket(&self, tournament_id: Option<String>) -> ApiResult<NetworkResponse> {
        let payload = match &self.client {
            Some(api) => {
                let Some(id) = tournament_id.as_deref() else {
                    return Err(ApiError::Other("no tournament selected".into()));
                };
                debug!("loading bracket for tournament {id}");
                api.fetch_bracket(id).await?
            }
            None => self.read_snapshot()?,
        };
        Ok(NetworkResponse::BracketLoaded { tournament_id, payload })
    }

    fn read_snapshot(&self) -> ApiResult<Value> {
        match &self.source {
            BracketSource::File(path) => {
                debug!("reading bracket snapshot {}", path.display());
                client::load_bracket_file(path)
            }
            BracketSource::Demo => client::demo_bracket(),
            BracketSource::Api { base_url } => Err(ApiError::Other(format!(
                "{base_url} is served over the network, not from a snapshot"
            ))),
        }
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worker(source: BracketSource) -> (NetworkWorker, mpsc::Sender<NetworkRequest>, mpsc::Receiver<NetworkResponse>) {
        let (req_tx, req_rx) = mpsc::channel(4);
        let (resp_tx, resp_rx) = mpsc::channel(64);
        (NetworkWorker::new(source, req_rx, resp_tx), req_tx, resp_rx)
    }

    async fn next_payload(responses: &mut mpsc::Receiver<NetworkResponse>) -> NetworkResponse {
        loop {
            match responses.recv().await {
                Some(NetworkResponse::LoadingStateChanged { .. }) => continue,
                Some(other) => return other,
                None => panic!("worker hung up"),
            }
        }
    }

    #[tokio::test]
    async fn demo_source_lists_its_header_and_loads_bracket() {
        let (worker, requests, mut responses) = worker(BracketSource::Demo);
        let task = tokio::spawn(worker.run());

        requests.send(NetworkRequest::LoadTournaments).await.unwrap();
        match next_payload(&mut responses).await {
            NetworkResponse::TournamentsLoaded { tournaments } => {
                assert_eq!(tournaments.len(), 1);
                assert_eq!(tournaments[0].id, "2002");
            }
            other => panic!("unexpected response {other:?}"),
        }

        requests
            .send(NetworkRequest::LoadBracket { tournament_id: Some("2002".into()) })
            .await
            .unwrap();
        match next_payload(&mut responses).await {
            NetworkResponse::BracketLoaded { tournament_id, payload } => {
                assert_eq!(tournament_id.as_deref(), Some("2002"));
                assert_eq!(payload["matches"].as_array().map(Vec::len), Some(14));
            }
            other => panic!("unexpected response {other:?}"),
        }
        task.abort();
    }

    #[tokio::test]
    async fn missing_file_becomes_error_response() {
        let (worker, requests, mut responses) =
            worker(BracketSource::File("/nope/bracket.json".into()));
        let task = tokio::spawn(worker.run());

        requests.send(NetworkRequest::LoadBracket { tournament_id: None }).await.unwrap();
        match next_payload(&mut responses).await {
            NetworkResponse::Error { message } => assert!(message.contains("/nope/bracket.json")),
            other => panic!("unexpected response {other:?}"),
        }
        task.abort();
    }

    #[tokio::test]
    async fn api_source_needs_a_tournament_id() {
        let (worker, requests, mut responses) =
            worker(BracketSource::Api { base_url: "http://127.0.0.1:9".into() });
        let task = tokio::spawn(worker.run());

        requests.send(NetworkRequest::LoadBracket { tournament_id: None }).await.unwrap();
        match next_payload(&mut responses).await {
            NetworkResponse::Error { message } => assert!(message.contains("no tournament selected")),
            other => panic!("unexpected response {other:?}"),
        }
        task.abort();
    }
}
