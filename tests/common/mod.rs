//! Test driver running the controller against real worker tasks and an
//! in-memory gateway.

#![allow(dead_code)]

use conda_browse::domain::{PackageVersion, Platform, Record};
use conda_browse::gateway::MemoryGateway;
use conda_browse::worker::{CatalogWorker, WorkerResponse};
use conda_browse::{handle_event, initialize, Action, Config, ControllerState, Event};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

const RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);

pub fn record(name: &str, version: &str, build: &str) -> Record {
    Record {
        name: name.to_string(),
        version: PackageVersion::new(version),
        build: build.to_string(),
        file_name: format!("{name}-{version}-{build}.conda"),
        license: Some("BSD-3-Clause".to_string()),
        depends: vec!["python >=3.12".to_string()],
        ..Record::default()
    }
}

/// conda-forge: linux-64, osx-64 and noarch. bioconda: linux-64 and noarch.
pub fn gateway() -> MemoryGateway {
    MemoryGateway::new()
        .with_records(
            "conda-forge",
            Platform::Linux64,
            vec![
                record("numpy", "1.26.4", "py312h1_0"),
                record("numpy", "2.0.0", "py312h2_0"),
                record("pandas", "2.2.2", "py312h3_0"),
                record("scipy", "1.13.0", "py312h4_0"),
            ],
        )
        .with_records("conda-forge", Platform::Osx64, vec![record("zlib", "1.3.1", "h5_0")])
        .with_records(
            "conda-forge",
            Platform::NoArch,
            vec![record("requests", "2.32.3", "pyhd8ed1ab_0"), record("tzdata", "2024a", "h0c530f3_0")],
        )
        .with_records("bioconda", Platform::Linux64, vec![record("bwa", "0.7.18", "he4a0461_0")])
        .with_records("bioconda", Platform::NoArch, vec![record("samtools", "1.20", "h50ea8bc_0")])
}

pub fn config(download_dir: &Path) -> Config {
    Config {
        platforms: vec![Platform::Linux64, Platform::NoArch],
        download_dir: download_dir.to_path_buf(),
        ..Config::default()
    }
}

/// Serves `body` once over plain HTTP and returns its URL.
pub async fn serve_once(body: &'static [u8]) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buffer = [0_u8; 1024];
        while !request.windows(4).any(|window| window == b"\r\n\r\n") {
            let read = socket.read(&mut buffer).await.unwrap();
            if read == 0 {
                return;
            }
            request.extend_from_slice(&buffer[..read]);
        }
        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(body).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    format!("http://{address}/artifact")
}

/// Controller plus worker, with responses delivered on demand.
pub struct Harness {
    pub state: ControllerState,
    worker: Arc<CatalogWorker<MemoryGateway>>,
    responses_tx: UnboundedSender<WorkerResponse>,
    responses_rx: UnboundedReceiver<WorkerResponse>,
    in_flight: usize,
}

impl Harness {
    /// Initializes the controller and issues the initial catalog load.
    pub fn start(gateway: MemoryGateway, config: &Config) -> Self {
        let worker = CatalogWorker::new(gateway, Duration::from_secs(5))
            .unwrap()
            .with_current_platform(Platform::Linux64);
        let (mut state, actions) = initialize(config);
        state.current_platform = Platform::Linux64;

        let (responses_tx, responses_rx) = mpsc::unbounded_channel();
        let mut harness = Self {
            state,
            worker: Arc::new(worker),
            responses_tx,
            responses_rx,
            in_flight: 0,
        };
        harness.execute(actions);
        harness
    }

    fn execute(&mut self, actions: Vec<Action>) {
        for action in actions {
            if let Action::PostToWorker(message) = action {
                self.in_flight += 1;
                self.worker.dispatch(message, self.responses_tx.clone());
            }
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn send(&mut self, event: Event) {
        let (_, actions) = handle_event(&mut self.state, &event).unwrap();
        self.execute(actions);
    }

    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.send(Event::Char(c));
        }
    }

    /// Waits for the next worker response without applying it.
    pub async fn next_response(&mut self) -> WorkerResponse {
        let response = tokio::time::timeout(RESPONSE_TIMEOUT, self.responses_rx.recv())
            .await
            .expect("worker response timed out")
            .expect("response channel closed");
        self.in_flight -= 1;
        response
    }

    /// Applies the next worker response.
    pub async fn deliver_next(&mut self) {
        let response = self.next_response().await;
        self.send(Event::WorkerResponse(response));
    }

    /// Applies responses until no request is in flight.
    pub async fn settle(&mut self) {
        while self.in_flight > 0 {
            self.deliver_next().await;
        }
    }

    pub fn detail(&self) -> &str {
        &self.state.detail_text
    }
}
