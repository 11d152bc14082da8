/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use std::error::Error;
use std::sync::{Arc, Mutex};
use std::thread::Builder;
use std::time::Duration;

/* Custom libraries */
use crate::config::EngineConfig;
use crate::engine::{ElevatorEngine, EngineError};
use crate::shared::{Command, Direction, Rider};

/**
 * Polling HTTP realization of the engine contract.
 *
 * Each protocol operation maps to a GET against a fixed relative endpoint
 * under the configured base address. `next_command` blocks on its round
 * trip (bounded by connect and read timeouts); all other operations hand
 * their URL to a small pool of worker threads and return immediately.
 *
 * A transport error, wherever it happens, is latched: every operation
 * except `reset` first checks the latch and fails with the stored message
 * without touching the network, until a later successful interaction clears
 * it. Worker failures therefore surface on the next latch-checked call,
 * never on the call that caused them.
 *
 * # Fields
 * - `client`:           Blocking HTTP client with the configured timeouts.
 * - `next_command_url`: Precomputed `nextCommand` endpoint.
 * - `entered_url`:      Precomputed `userHasEntered` endpoint.
 * - `exited_url`:       Precomputed `userHasExited` endpoint.
 * - `call_url`:         Base for `call` requests; query added per request.
 * - `go_url`:           Base for `go` requests; query added per request.
 * - `reset_url`:        Base for `reset` requests; query added per request.
 * - `job_tx`:           Queue feeding the fire-and-forget workers.
 * - `transport_error`:  The latch, shared with the workers.
 */
pub struct HttpEngine {
    client: Client,
    next_command_url: Url,
    entered_url: Url,
    exited_url: Url,
    call_url: Url,
    go_url: Url,
    reset_url: Url,
    job_tx: cbc::Sender<Url>,
    transport_error: Arc<Mutex<Option<String>>>,
}

impl HttpEngine {
    pub fn new(config: &EngineConfig) -> Result<HttpEngine, EngineError> {
        let mut address = config.server_address.clone();
        if !address.ends_with('/') {
            address.push('/');
        }
        let server = Url::parse(&address).map_err(|e| {
            EngineError::Transport(format!("Invalid engine address \"{}\": {}", address, e))
        })?;

        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.read_timeout_ms))
            .build()
            .map_err(|e| EngineError::Transport(e.to_string()))?;

        let transport_error = Arc::new(Mutex::new(None));
        let (job_tx, job_rx) = cbc::unbounded::<Url>();

        // Worker threads for the fire-and-forget notifications
        for n in 0..config.workers.max(1) {
            let job_rx = job_rx.clone();
            let client = client.clone();
            let transport_error = Arc::clone(&transport_error);
            let worker_thread = Builder::new().name(format!("engine_worker_{}", n));
            worker_thread
                .spawn(move || {
                    while let Ok(url) = job_rx.recv() {
                        let outcome = match client.get(url.clone()).send() {
                            Ok(response) if response.status().is_success() => None,
                            Ok(response) => Some(classify_status(&url, response.status())),
                            Err(e) => Some(classify_send_error(&url, &e)),
                        };
                        if let Some(message) = &outcome {
                            warn!("engine request {} failed: {}", url, message);
                        }
                        set_latch(&transport_error, outcome);
                    }
                })
                .map_err(|e| EngineError::Transport(e.to_string()))?;
        }

        Ok(HttpEngine {
            client,
            next_command_url: join(&server, "nextCommand")?,
            entered_url: join(&server, "userHasEntered")?,
            exited_url: join(&server, "userHasExited")?,
            call_url: join(&server, "call")?,
            go_url: join(&server, "go")?,
            reset_url: join(&server, "reset")?,
            job_tx,
            transport_error,
        })
    }

    fn check_transport_error(&self) -> Result<(), EngineError> {
        let latch = lock(&self.transport_error);
        match &*latch {
            Some(message) => Err(EngineError::Transport(message.clone())),
            None => Ok(()),
        }
    }

    /// Hands the request to a worker; the caller never observes its outcome.
    fn fire_and_forget(&self, url: Url) {
        debug!("{}", url);
        let _ = self.job_tx.send(url);
    }
}

impl ElevatorEngine for HttpEngine {
    fn next_command(&self) -> Result<Command, EngineError> {
        self.check_transport_error()?;
        debug!("{}", self.next_command_url);

        let response = self
            .client
            .get(self.next_command_url.clone())
            .send()
            .map_err(|e| {
                let message = classify_send_error(&self.next_command_url, &e);
                set_latch(&self.transport_error, Some(message.clone()));
                EngineError::Transport(message)
            })?;

        if !response.status().is_success() {
            let message = classify_status(&self.next_command_url, response.status());
            set_latch(&self.transport_error, Some(message.clone()));
            return Err(EngineError::Transport(message));
        }

        let body = response.text().map_err(|e| {
            let message = classify_send_error(&self.next_command_url, &e);
            set_latch(&self.transport_error, Some(message.clone()));
            EngineError::Transport(message)
        })?;

        // The body arrived; the transport is fine even if the token is not.
        set_latch(&self.transport_error, None);

        let token = body.lines().next().unwrap_or("");
        match token.parse::<Command>() {
            Ok(command) => {
                debug!("{} {}", self.next_command_url, command);
                Ok(command)
            }
            Err(()) => Err(EngineError::Protocol(format!(
                "Command \"{}\" is not a valid command; \
                 valid commands are [UP|DOWN|OPEN|CLOSE|NOTHING] with case sensitive",
                token
            ))),
        }
    }

    fn call(&self, at_floor: i32, to: Direction) -> Result<(), EngineError> {
        self.check_transport_error()?;
        let mut url = self.call_url.clone();
        url.query_pairs_mut()
            .append_pair("atFloor", &at_floor.to_string())
            .append_pair("to", &to.to_string());
        self.fire_and_forget(url);
        Ok(())
    }

    fn go(&self, floor_to_go: i32) -> Result<(), EngineError> {
        self.check_transport_error()?;
        let mut url = self.go_url.clone();
        url.query_pairs_mut()
            .append_pair("floorToGo", &floor_to_go.to_string());
        self.fire_and_forget(url);
        Ok(())
    }

    fn rider_entered(&self, _rider: &Rider) -> Result<(), EngineError> {
        self.check_transport_error()?;
        self.fire_and_forget(self.entered_url.clone());
        Ok(())
    }

    fn rider_exited(&self, _rider: &Rider) -> Result<(), EngineError> {
        self.check_transport_error()?;
        self.fire_and_forget(self.exited_url.clone());
        Ok(())
    }

    fn reset(&self, cause: &str) -> Result<(), EngineError> {
        // No latch check: reset must always be attempted.
        let mut url = self.reset_url.clone();
        url.query_pairs_mut().append_pair("cause", cause);
        self.fire_and_forget(url);
        Ok(())
    }
}

/***************************************/
/*          Private helpers            */
/***************************************/

fn join(server: &Url, path: &str) -> Result<Url, EngineError> {
    server
        .join(path)
        .map_err(|e| EngineError::Transport(format!("Invalid endpoint \"{}\": {}", path, e)))
}

fn lock(latch: &Mutex<Option<String>>) -> std::sync::MutexGuard<'_, Option<String>> {
    latch.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn set_latch(latch: &Mutex<Option<String>>, value: Option<String>) {
    *lock(latch) = value;
}

fn url_without_query(url: &Url) -> String {
    let mut stripped = format!("{}://", url.scheme());
    stripped.push_str(url.host_str().unwrap_or_default());
    if let Some(port) = url.port() {
        stripped.push_str(&format!(":{}", port));
    }
    stripped.push_str(url.path());
    stripped
}

fn classify_status(url: &Url, status: StatusCode) -> String {
    if status == StatusCode::NOT_FOUND {
        format!("Resource \"{}\" is not found", url_without_query(url))
    } else {
        format!(
            "Server returned HTTP response code: {} for URL: {}",
            status.as_u16(),
            url_without_query(url)
        )
    }
}

fn classify_send_error(url: &Url, err: &reqwest::Error) -> String {
    if is_dns_failure(err) {
        format!(
            "IP address of \"{}\" could not be determined",
            url.host_str().unwrap_or_default()
        )
    } else {
        err.to_string()
    }
}

fn is_dns_failure(err: &reqwest::Error) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        let message = cause.to_string();
        if message.contains("dns error") || message.contains("failed to lookup address") {
            return true;
        }
        source = cause.source();
    }
    false
}
