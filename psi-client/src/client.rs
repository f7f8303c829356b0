//! # Synchronous Client API
//!
//! Purpose: Expose a compact, blocking API for opening a session with a PSI
//! service and querying batches of items against it.
//!
//! ## Design Principles
//! 1. **Facade Pattern**: `PsiClient` hides the engine's flags and buffers.
//! 2. **Exclusive Access**: Session-changing calls take `&mut self`; callers
//!    that share a client across threads serialize access themselves.
//! 3. **Fail Fast**: Malformed input is rejected before the engine is called.
//! 4. **Live Status**: Connection state is always read from the engine.

use tracing::{debug, warn};

use psi_common::{Endpoint, Item, MatchResult, PsiError, PsiResult, MAX_BATCH_LEN};
use psi_engine::PsiEngine;

use crate::config::ClientConfig;

/// Receiver client driving a single engine session.
///
/// Connection lifecycle:
///
/// ```text
/// Disconnected --connect ok-------> Connected
/// Connected    --disconnect-------> Disconnected
/// Connected    --connect failure--> Disconnected
/// Disconnected --disconnect-------> Disconnected
/// ```
///
/// Cleanup is never automatic: after a failed query the session stays as the
/// engine left it until the caller disconnects.
pub struct PsiClient<E> {
    engine: E,
    config: ClientConfig,
    // Endpoint of the last successful connect.
    endpoint: Option<Endpoint>,
}

impl<E: PsiEngine> PsiClient<E> {
    /// Creates a disconnected client with the default configuration.
    pub fn new(engine: E) -> Self {
        Self::with_config(engine, ClientConfig::default())
    }

    /// Creates a disconnected client with a custom configuration.
    pub fn with_config(engine: E, config: ClientConfig) -> Self {
        PsiClient {
            engine,
            config,
            endpoint: None,
        }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Borrows the engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Consumes the client and returns its engine, session included.
    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Opens a session with the PSI service at `address:port`.
    ///
    /// # Errors
    /// - `InvalidArgument` when `address` is blank or `port` is 0.
    /// - `Connection` when the engine refuses. The client is left disconnected.
    pub fn connect(&mut self, address: &str, port: u16) -> PsiResult<()> {
        let endpoint = Endpoint::new(address, port)?;
        self.connect_endpoint(endpoint)
    }

    /// Opens a session with the endpoint named in the configuration.
    pub fn connect_configured(&mut self) -> PsiResult<()> {
        let endpoint = self.config.endpoint()?;
        self.connect_endpoint(endpoint)
    }

    fn connect_endpoint(&mut self, endpoint: Endpoint) -> PsiResult<()> {
        if self.engine.connect(&endpoint.address, endpoint.port) {
            debug!(%endpoint, "receiver connected");
            self.endpoint = Some(endpoint);
            return Ok(());
        }

        // A refused connect must not leave an earlier session behind.
        self.engine.disconnect();
        self.endpoint = None;
        warn!(%endpoint, "receiver could not connect");
        Err(PsiError::Connection {
            endpoint: endpoint.to_string(),
        })
    }

    /// Closes the session. Does nothing when already disconnected.
    pub fn disconnect(&mut self) {
        self.engine.disconnect();
        if let Some(endpoint) = self.endpoint.take() {
            debug!(%endpoint, "receiver disconnected");
        }
    }

    /// Live session status as reported by the engine.
    pub fn is_connected(&self) -> bool {
        self.engine.is_connected()
    }

    /// Endpoint of the current session, if the engine still reports it live.
    pub fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_ref().filter(|_| self.engine.is_connected())
    }

    /// Queries membership for every item in one round trip.
    ///
    /// The result has one entry per input item, in input order. Duplicates
    /// are queried as given. Absent items carry label 0.
    ///
    /// # Errors
    /// - `InvalidArgument` when the batch exceeds `max_batch_len` or the
    ///   engine's count limit.
    /// - `NotConnected` when `require_connection` is set and no session is live.
    /// - `Query` when the engine reports failure. No partial results are kept.
    pub fn query<I>(&mut self, items: I) -> PsiResult<Vec<MatchResult>>
    where
        I: IntoIterator<Item = Item>,
    {
        self.query_opt(Some(items))
    }

    /// Like `query`, for callers bridging a nullable item source.
    ///
    /// `None` fails with `InvalidArgument` before the engine is called.
    pub fn query_opt<I>(&mut self, items: Option<I>) -> PsiResult<Vec<MatchResult>>
    where
        I: IntoIterator<Item = Item>,
    {
        let items = items.ok_or_else(|| PsiError::invalid_argument("items must not be null"))?;
        let items: Vec<Item> = items.into_iter().collect();
        self.check_batch_len(items.len())?;

        if items.is_empty() {
            return Ok(Vec::new());
        }

        if self.config.require_connection && !self.engine.is_connected() {
            return Err(PsiError::NotConnected);
        }

        let count = items.len();
        let mut presence = vec![0i32; count];
        let mut labels = vec![0u64; count];
        if !self.engine.batch_query(&items, &mut presence, &mut labels) {
            warn!(count, "receiver query failed");
            return Err(PsiError::Query { count });
        }

        let results: Vec<MatchResult> = presence
            .iter()
            .zip(&labels)
            .map(|(&flag, &label)| MatchResult::from_raw(flag, label))
            .collect();
        debug!(
            count,
            matched = results.iter().filter(|result| result.present).count(),
            "receiver query completed"
        );
        Ok(results)
    }

    /// Queries `items` and keeps only the matches, as `(item, label)` pairs in
    /// input order.
    pub fn intersect<I>(&mut self, items: I) -> PsiResult<Vec<(Item, u64)>>
    where
        I: IntoIterator<Item = Item>,
    {
        let items: Vec<Item> = items.into_iter().collect();
        let results = self.query(items.iter().copied())?;
        Ok(items
            .into_iter()
            .zip(results)
            .filter_map(|(item, result)| result.label().map(|label| (item, label)))
            .collect())
    }

    fn check_batch_len(&self, len: usize) -> PsiResult<()> {
        let limit = self
            .config
            .max_batch_len
            .map_or(MAX_BATCH_LEN, |max| max.min(MAX_BATCH_LEN));
        if len > limit {
            return Err(PsiError::invalid_argument(format!(
                "batch of {} items exceeds limit of {}",
                len, limit
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psi_engine::{MemoryEngine, MemorySender};

    fn client() -> (MemorySender, PsiClient<MemoryEngine>) {
        let sender = MemorySender::bind(Endpoint::new("127.0.0.1", 1212).unwrap());
        let client = PsiClient::new(sender.receiver());
        (sender, client)
    }

    #[test]
    fn connect_rejects_bad_arguments_locally() {
        let (_, mut client) = client();
        assert!(matches!(
            client.connect("", 1212),
            Err(PsiError::InvalidArgument { .. })
        ));
        assert!(matches!(
            client.connect("127.0.0.1", 0),
            Err(PsiError::InvalidArgument { .. })
        ));
        assert!(!client.is_connected());
    }

    #[test]
    fn endpoint_tracks_live_session() {
        let (sender, mut client) = client();
        assert!(client.endpoint().is_none());
        client.connect("127.0.0.1", 1212).unwrap();
        assert_eq!(client.endpoint(), Some(sender.endpoint()));

        sender.drop_sessions();
        assert!(client.endpoint().is_none());
    }

    #[test]
    fn batch_limit_is_enforced_before_engine() {
        let (sender, client) = client();
        let mut client = PsiClient::with_config(
            client.into_engine(),
            ClientConfig {
                max_batch_len: Some(2),
                ..ClientConfig::default()
            },
        );
        client.connect("127.0.0.1", 1212).unwrap();

        let err = client.query([1, 2, 3]).unwrap_err();
        assert!(matches!(err, PsiError::InvalidArgument { .. }));
        assert_eq!(sender.round_trips(), 0);
        assert_eq!(client.query([1, 2]).unwrap().len(), 2);
    }

    #[test]
    fn intersect_keeps_matches_in_order() {
        let (sender, mut client) = client();
        sender.insert(30, 3);
        sender.insert(10, 1);
        client.connect("127.0.0.1", 1212).unwrap();

        let matches = client.intersect([10, 20, 30, 10]).unwrap();
        assert_eq!(matches, vec![(10, 1), (30, 3), (10, 1)]);
    }
}
