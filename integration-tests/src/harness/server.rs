use crate::harness::config::{load_fixture, patch_log_source};
use crate::harness::{CapturedEvent, FixtureResolver, ViewerStream, init_test_tracing};
use arcwatch_core::conf::ArcwatchConfig;
use arcwatch_core::server::{HealthReport, build};
use reqwest::blocking::{Client, RequestBuilder};
use std::net::TcpStream;
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};
use std::thread;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;

pub const FORWARDED_FOR: &str = "x-forwarded-for";

/// Handle to a running arcwatch test server. Dropping it shuts the server down.
pub struct TestServer {
    base_url: String,
    stream_path: String,
    client: Client,
    async_client: reqwest::Client,
    stop: Option<oneshot::Sender<()>>,
}

impl TestServer {
    /// Start an instance from `fixtures/config/<fixture>.hcl`.
    ///
    /// The listener is bound on an ephemeral port before the server starts,
    /// so tests can run in parallel.
    pub fn start(fixture: &str) -> Self {
        Self::start_with_config(load_fixture(fixture))
    }

    /// Like [`start`](Self::start), tailing `log_file` as the access log.
    pub fn start_tailing(fixture: &str, log_file: &Path) -> Self {
        Self::start_with_config(patch_log_source(load_fixture(fixture), log_file))
    }

    pub fn start_with_config(cfg: ArcwatchConfig) -> Self {
        // Initialize tracing (this must happen first).
        let events = events();
        init_test_tracing(events.clone());

        let listener =
            std::net::TcpListener::bind("127.0.0.1:0").expect("failed to bind test listener");
        listener
            .set_nonblocking(true)
            .expect("failed to make listener non-blocking");
        let port = listener.local_addr().unwrap().port();

        let stream_path = cfg.server.stream_path.clone();
        let (stop, stopped) = oneshot::channel::<()>();

        // Run server in background thread with its own runtime
        thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(2)
                .enable_all()
                .build()
                .expect("failed to build server runtime");

            rt.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener)
                    .expect("failed to adopt test listener");

                let app = build(cfg, Arc::new(FixtureResolver));
                app.serve(listener, async {
                    let _ = stopped.await;
                })
                .await
                .expect("arcwatch server failed");
            });
        });

        let base_url = format!("http://127.0.0.1:{port}");

        // Wait for server to accept connections
        wait_for_server(&base_url);

        let client = Client::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .expect("failed to build client");

        let async_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .expect("failed to build async client");

        Self {
            base_url,
            stream_path,
            client,
            async_client,
            stop: Some(stop),
        }
    }

    /// Convenience helper for GET requests.
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(format!("{}{}", self.base_url, path))
    }

    /// GET `path` as if `client_ip` were the visitor (via the trusted local proxy).
    pub fn get_as(&self, path: &str, client_ip: &str) -> RequestBuilder {
        self.get(path).header(FORWARDED_FOR, client_ip)
    }

    /// Async variant of [`get_as`](Self::get_as), for use inside a runtime.
    pub async fn visit(&self, path: &str, client_ip: Option<&str>) -> reqwest::StatusCode {
        let mut req = self.async_client.get(format!("{}{}", self.base_url, path));
        if let Some(ip) = client_ip {
            req = req.header(FORWARDED_FOR, ip);
        }
        req.send().await.expect("request failed").status()
    }

    pub async fn health(&self) -> HealthReport {
        self.async_client
            .get(format!("{}/healthz", self.base_url))
            .send()
            .await
            .expect("health request failed")
            .json()
            .await
            .expect("health body is not a HealthReport")
    }

    /// Poll `/healthz` until the history holds `len` events (or panic).
    pub async fn wait_for_history(&self, len: usize) {
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            let health = self.health().await;
            if health.history == len {
                return;
            }
            if Instant::now() > deadline {
                panic!("history never reached {len} (last: {})", health.history);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    pub async fn connect_viewer(&self) -> ViewerStream {
        ViewerStream::connect(&self.ws_url()).await
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn ws_url(&self) -> String {
        format!(
            "ws://{}{}",
            self.base_url.strip_prefix("http://").unwrap(),
            self.stream_path
        )
    }

    pub fn captured_events(&self) -> Vec<CapturedEvent> {
        events().lock().unwrap().clone()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

/// Poll until the server responds (or panic).
fn wait_for_server(listen_addr: &str) {
    let addr = listen_addr.strip_prefix("http://").unwrap_or(listen_addr);

    let deadline = Instant::now() + Duration::from_secs(2);

    loop {
        match TcpStream::connect(addr) {
            Ok(_) => return,
            Err(_) => {
                if Instant::now() > deadline {
                    panic!("server failed to start at {}", listen_addr);
                }
                thread::sleep(Duration::from_millis(25));
            }
        }
    }
}

static EVENTS: OnceLock<Arc<Mutex<Vec<CapturedEvent>>>> = OnceLock::new();

fn events() -> Arc<Mutex<Vec<CapturedEvent>>> {
    EVENTS
        .get_or_init(|| Arc::new(Mutex::new(Vec::new())))
        .clone()
}
