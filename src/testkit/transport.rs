//! Scripted HTTP transport.
//!
//! Responses are registered per request key: the URL path followed by the
//! query pairs sorted by name, with the `datasource` pair left out, e.g.
//! `/markets/10000002/orders/?order_type=sell&page=2`. Unregistered keys
//! answer 404.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use url::Url;

use crate::error::FetchError;
use crate::port::{HttpRequest, HttpResponse, HttpTransport};

/// Base URL the scripted transport is normally paired with.
pub fn base_url() -> Url {
    Url::parse("http://esi.test/").expect("static test URL")
}

/// Request key used to match scripted responses.
pub fn key_of(url: &Url) -> String {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(name, _)| name != "datasource")
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();
    pairs.sort();

    if pairs.is_empty() {
        url.path().to_string()
    } else {
        let query: Vec<String> = pairs
            .into_iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        format!("{}?{}", url.path(), query.join("&"))
    }
}

#[derive(Default)]
struct Route {
    queued: VecDeque<Result<HttpResponse, FetchError>>,
    sticky: Option<Result<HttpResponse, FetchError>>,
}

/// Deterministic test double for the market API.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, Route>>,
    requests: Mutex<Vec<HttpRequest>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    latency: Option<Duration>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every response, so concurrent requests overlap.
    pub fn with_latency_ms(mut self, millis: u64) -> Self {
        self.latency = Some(Duration::from_millis(millis));
        self
    }

    /// Answer `key` with `response` until replaced.
    pub fn respond(&self, key: &str, response: HttpResponse) {
        self.routes.lock().entry(key.to_string()).or_default().sticky = Some(Ok(response));
    }

    pub fn respond_ok(&self, key: &str, body: impl Into<String>) {
        self.respond(key, HttpResponse::ok(body));
    }

    pub fn respond_status(&self, key: &str, status: u16, body: impl Into<String>) {
        self.respond(
            key,
            HttpResponse {
                status,
                ..HttpResponse::ok(body)
            },
        );
    }

    /// Fail `key` with a transport-level error until replaced.
    pub fn fail(&self, key: &str, error: FetchError) {
        self.routes.lock().entry(key.to_string()).or_default().sticky = Some(Err(error));
    }

    /// Answer the next request for `key` with `response`, ahead of the
    /// sticky answer.
    pub fn respond_once(&self, key: &str, response: HttpResponse) {
        self.routes
            .lock()
            .entry(key.to_string())
            .or_default()
            .queued
            .push_back(Ok(response));
    }

    /// Total requests received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received for one key.
    pub fn calls_to(&self, key: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|request| key_of(&request.url) == key)
            .count()
    }

    /// Every request received, in arrival order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Highest number of requests observed in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn answer(&self, key: &str) -> Result<HttpResponse, FetchError> {
        let mut routes = self.routes.lock();
        let Some(route) = routes.get_mut(key) else {
            return Ok(HttpResponse {
                status: 404,
                ..HttpResponse::ok(format!("no scripted response for {key}"))
            });
        };
        if let Some(next) = route.queued.pop_front() {
            return next;
        }
        route.sticky.clone().unwrap_or_else(|| {
            Ok(HttpResponse {
                status: 404,
                ..HttpResponse::ok("exhausted")
            })
        })
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        let key = key_of(&request.url);
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request);

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.answer(&key)
    }
}
