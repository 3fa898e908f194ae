use std::{
    collections::BTreeMap,
    fmt,
    sync::atomic::{AtomicU64, Ordering},
    time::Instant,
};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{Mutex, watch};

use crate::{debug, spotify::ApiClient, warning};

#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Number(i64),
    /// Fractional number; sent with Rust's shortest round-trip formatting.
    Float(f64),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::Number(n) => write!(f, "{}", n),
            ParamValue::Float(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Number(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Number(value.into())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

/// Query parameters of a resource fetch.
///
/// Keys are kept sorted, so two parameter sets compare equal exactly when
/// they hold the same pairs, regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchParams(BTreeMap<String, ParamValue>);

impl FetchParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }
}

/// What a view renders: the latest list and whether a fetch is running.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceView<T> {
    pub data: Vec<T>,
    pub is_loading: bool,
}

impl<T> Default for ResourceView<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            is_loading: false,
        }
    }
}

/// Extracts the item list from a response body.
///
/// Accepts `{"items": [...]}` or a bare array. Any other shape yields an
/// empty list; items that fail to deserialize are an error.
pub fn normalize_items<T: DeserializeOwned>(body: Value) -> Result<Vec<T>, serde_json::Error> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    items.into_iter().map(serde_json::from_value).collect()
}

#[derive(Debug, Clone, PartialEq)]
struct ResourceRequest {
    endpoint: String,
    params: FetchParams,
}

/// Fetches a list resource and tracks its loading state.
///
/// [`request`](ResourceFetcher::request) issues a fetch only when the
/// endpoint or the parameters differ from the previous call. Failures never
/// leave this type: they are logged and the view shows an empty list.
///
/// Fetches are numbered. When a newer fetch has been issued, the response of
/// an older one is dropped on arrival, so the view always reflects the most
/// recent request. The older HTTP request itself is not aborted.
pub struct ResourceFetcher<T> {
    client: ApiClient,
    current: Mutex<Option<ResourceRequest>>,
    generation: AtomicU64,
    view: watch::Sender<ResourceView<T>>,
}

impl<T> ResourceFetcher<T>
where
    T: DeserializeOwned + Clone + Send + Sync,
{
    pub fn new(client: ApiClient) -> Self {
        let (view, _) = watch::channel(ResourceView::default());
        Self {
            client,
            current: Mutex::new(None),
            generation: AtomicU64::new(0),
            view,
        }
    }

    pub fn view(&self) -> ResourceView<T> {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ResourceView<T>> {
        self.view.subscribe()
    }

    /// Number of fetches issued so far.
    pub fn fetch_count(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Fetches `endpoint` with `params` unless that exact pair was the last
    /// one requested. Returns whether a fetch was issued.
    pub async fn request(&self, endpoint: &str, params: FetchParams) -> bool {
        let next = ResourceRequest {
            endpoint: endpoint.to_string(),
            params,
        };

        let seq = {
            let mut current = self.current.lock().await;
            if current.as_ref() == Some(&next) {
                return false;
            }
            *current = Some(next.clone());
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };

        self.run(next, seq).await;
        true
    }

    /// Re-issues the last request. Returns `false` if nothing was requested yet.
    pub async fn refresh(&self) -> bool {
        let (request, seq) = {
            let current = self.current.lock().await;
            let Some(request) = current.clone() else {
                return false;
            };
            (request, self.generation.fetch_add(1, Ordering::SeqCst) + 1)
        };

        self.run(request, seq).await;
        true
    }

    async fn run(&self, request: ResourceRequest, seq: u64) {
        self.view.send_modify(|view| view.is_loading = true);
        let started = Instant::now();

        let result = match self
            .client
            .get_value(&request.endpoint, &request.params)
            .await
        {
            Ok(body) => normalize_items::<T>(body).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        let elapsed = started.elapsed().as_millis();

        let data = match result {
            Ok(items) => {
                debug!(
                    "API call to {} took {}ms ({} items)",
                    request.endpoint,
                    elapsed,
                    items.len()
                );
                items
            }
            Err(e) => {
                warning!(
                    "Error fetching data from {} after {}ms: {}",
                    request.endpoint,
                    elapsed,
                    e
                );
                Vec::new()
            }
        };

        let applied = self.view.send_if_modified(|view| {
            if self.generation.load(Ordering::SeqCst) != seq {
                return false;
            }
            *view = ResourceView {
                data,
                is_loading: false,
            };
            true
        });

        if !applied {
            debug!(
                "Dropped stale response from {} (superseded by a newer request)",
                request.endpoint
            );
        }
    }
}
