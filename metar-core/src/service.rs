use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use parking_lot::Mutex;
use reqwest::Client;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::{
    config::ServiceConfig,
    decode::decode,
    error::{MetarError, truncate_body},
    model::{QueryResult, StationRecord},
    report::{Delimiter, format_report, join_raw},
    request::RequestBuilder,
};

#[derive(Debug, Default)]
struct CacheSlot {
    /// Ticket of the fetch that produced `result`.
    ticket: u64,
    result: Option<QueryResult>,
}

/// Fetches, decodes and formats METAR observations, keeping the last
/// successful result.
///
/// Construct one explicitly and share it behind an [`Arc`]; there is no
/// process-wide instance.
#[derive(Debug)]
pub struct WeatherService {
    http: Client,
    builder: RequestBuilder,
    use_cache: bool,
    cache: Mutex<CacheSlot>,
    next_ticket: AtomicU64,
}

impl WeatherService {
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    pub fn with_client(config: ServiceConfig, http: Client) -> Self {
        Self {
            http,
            builder: RequestBuilder::new(config.base_url, config.api_key),
            use_cache: config.use_cache,
            cache: Mutex::new(CacheSlot::default()),
            next_ticket: AtomicU64::new(0),
        }
    }

    pub fn uses_cache(&self) -> bool {
        self.use_cache
    }

    /// Full multi-line report for a comma-separated station list.
    #[instrument(skip(self), level = "info")]
    pub async fn request_weather(&self, station_list: &str) -> Result<String, MetarError> {
        let records = self.fetch_records(station_list).await?;
        Ok(format_report(&records))
    }

    /// Only the raw METAR lines, joined with `delimiter`.
    #[instrument(skip(self), level = "info")]
    pub async fn request_raw(
        &self,
        station_list: &str,
        delimiter: Delimiter,
    ) -> Result<String, MetarError> {
        let records = self.fetch_records(station_list).await?;
        Ok(join_raw(&records, delimiter))
    }

    /// Decoded records, from the cache when enabled and the query matches.
    pub async fn fetch_records(&self, station_list: &str) -> Result<Vec<StationRecord>, MetarError> {
        let request = self.builder.build(station_list)?;
        let query = request.url().to_string();

        if self.use_cache {
            let cached = {
                let slot = self.cache.lock();
                slot.result.as_ref().filter(|r| r.query == query).map(|r| r.records.clone())
            };
            if let Some(records) = cached {
                tracing::debug!(%query, "serving METAR records from cache");
                return Ok(records);
            }
        }

        let ticket = self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1;

        let response = self.http.execute(request).await.map_err(|e| {
            tracing::warn!(%query, error = %e, "METAR request failed");
            MetarError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%query, %status, "METAR request returned non-success status");
            return Err(MetarError::Status { status, body: truncate_body(&body) });
        }

        let body = response.bytes().await?;
        let records = decode(&body).inspect_err(|e| {
            tracing::warn!(%query, error = %e, "discarding undecodable METAR response");
        })?;

        tracing::info!(%query, count = records.len(), "fetched METAR records");
        self.store(ticket, QueryResult::new(query, records.clone()));

        Ok(records)
    }

    /// Overwrite the cache unless a later-issued fetch already has.
    fn store(&self, ticket: u64, result: QueryResult) {
        let mut slot = self.cache.lock();
        if ticket < slot.ticket {
            tracing::debug!(ticket, current = slot.ticket, "stale METAR result not cached");
            return;
        }
        slot.ticket = ticket;
        slot.result = Some(result);
    }

    /// Snapshot of the last successful result.
    pub fn cached(&self) -> Option<QueryResult> {
        self.cache.lock().result.clone()
    }

    pub fn clear_cache(&self) {
        self.cache.lock().result = None;
    }

    /// Run [`Self::request_weather`] on a background task and hand the
    /// outcome to `callback`, unless the returned handle is cancelled first.
    ///
    /// The callback runs on a runtime worker thread; callers owning
    /// presentation state must forward the result themselves.
    pub fn spawn_request<F>(
        self: &Arc<Self>,
        station_list: impl Into<String>,
        callback: F,
    ) -> RequestHandle
    where
        F: FnOnce(Result<String, MetarError>) + Send + 'static,
    {
        let station_list = station_list.into();
        let token = CancellationToken::new();
        let guard = token.clone();
        let service = Arc::clone(self);

        let task = tokio::spawn(async move {
            let result = service.request_weather(&station_list).await;
            if guard.is_cancelled() {
                tracing::debug!(%station_list, "request cancelled; dropping result");
                return false;
            }
            callback(result);
            true
        });

        RequestHandle { token, task }
    }
}

/// Caller-owned handle for a request started with [`WeatherService::spawn_request`].
///
/// Cancelling does not abort the network call; it only stops the result
/// from being delivered.
#[derive(Debug)]
pub struct RequestHandle {
    token: CancellationToken,
    task: JoinHandle<bool>,
}

impl RequestHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait for the request to finish. Returns `true` if the callback ran.
    /// A callback that panicked is logged and reported as not delivered.
    pub async fn join(self) -> bool {
        match self.task.await {
            Ok(delivered) => delivered,
            Err(e) => {
                tracing::warn!(error = %e, "weather request task did not complete");
                false
            }
        }
    }
}
