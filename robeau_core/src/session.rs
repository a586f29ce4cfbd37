//! Session lifecycle.

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use robeau_graph::QuerySource;

use crate::engine::Engine;
use crate::error::EngineError;
use crate::expiry::spawn_expiry_loop;

/// A running conversation: the engine plus its background expiry loop.
pub struct Session {
    engine: Arc<Engine>,
    shutdown_tx: watch::Sender<bool>,
    stopped_rx: watch::Receiver<bool>,
    expiry: JoinHandle<Result<(), EngineError>>,
}

impl Session {
    /// Start a session. Must be called from within a tokio runtime.
    pub fn start(engine: Engine) -> Self {
        let engine = Arc::new(engine);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (stopped_tx, stopped_rx) = watch::channel(false);
        let expiry = spawn_expiry_loop(Arc::clone(&engine), shutdown_rx, stopped_tx);
        info!(id = %engine.id(), "Session started");

        Self {
            engine,
            shutdown_tx,
            stopped_rx,
            expiry,
        }
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    /// Process one input on the blocking pool and return its outputs.
    pub async fn process(
        &self,
        text: impl Into<String>,
        source: QuerySource,
    ) -> Result<Vec<String>, EngineError> {
        let engine = Arc::clone(&self.engine);
        let text = text.into();
        tokio::task::spawn_blocking(move || engine.process(&text, source)).await?
    }

    /// Resolves once the expiry loop has stopped, either on shutdown or on a
    /// fatal error. [`Session::shutdown`] returns that error.
    pub async fn stopped(&self) {
        let mut stopped_rx = self.stopped_rx.clone();
        let _ = stopped_rx.wait_for(|stopped| *stopped).await;
    }

    /// Stop the expiry loop and wait for it to finish.
    ///
    /// Returns the fatal error that ended the loop early, if any.
    pub async fn shutdown(self) -> Result<(), EngineError> {
        // The loop also stops if the receiver is already gone
        let _ = self.shutdown_tx.send(true);
        let outcome = self.expiry.await?;
        info!(id = %self.engine.id(), ok = outcome.is_ok(), "Session ended");
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::events::{event_channel, EngineEvent};
    use robeau_graph::{Edge, EdgeParams, GraphError, GraphStore, Label, MemoryGraph};
    use std::time::Duration;

    fn fast_config() -> EngineConfig {
        EngineConfig {
            tick_interval_ms: 10,
            ..EngineConfig::default()
        }
    }

    #[tokio::test]
    async fn test_session_processes_input() {
        let mut graph = MemoryGraph::new();
        graph.connect(
            (Label::Prompt, "hello"),
            "TRIGGERS",
            (Label::Response, "hi there"),
            EdgeParams::default(),
        );

        let session = Session::start(Engine::new(Arc::new(graph), fast_config()));
        let outputs = session.process("hello", QuerySource::User).await.unwrap();
        assert_eq!(outputs, vec!["hi there"]);

        session.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_background_loop_fires_initiation() {
        let mut graph = MemoryGraph::new();
        graph
            .connect(
                (Label::Prompt, "wait for it"),
                "INITIATES",
                (Label::Response, "surprise!"),
                EdgeParams {
                    duration: Some(0.05),
                    ..Default::default()
                },
            )
            .connect(
                (Label::Prompt, "wait for it"),
                "TRIGGERS",
                (Label::Response, "waiting..."),
                EdgeParams::default(),
            );

        let (tx, mut rx) = event_channel();
        let engine = Engine::new(Arc::new(graph), fast_config()).with_events(tx);
        let session = Session::start(engine);

        let outputs = session.process("wait for it", QuerySource::User).await.unwrap();
        assert_eq!(outputs, vec!["waiting..."]);
        assert_eq!(rx.recv().await.unwrap().text(), "waiting...");

        let fired = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("initiation should fire")
            .unwrap();
        assert_eq!(
            fired,
            EngineEvent::Output {
                text: "surprise!".into()
            }
        );
        assert!(session.engine().state().lock().is_empty());

        session.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_expired_lock_is_removed_in_background() {
        let session = Session::start(Engine::new(Arc::new(MemoryGraph::new()), fast_config()));
        session
            .engine()
            .state()
            .lock()
            .add_lock("door", Some(Duration::from_millis(30)));

        let state = Arc::clone(session.engine().state());
        tokio::time::timeout(Duration::from_secs(5), async move {
            while state.lock().is_locked("door") {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("lock should expire");

        session.shutdown().await.unwrap();
    }

    /// Serves the wrapped graph for user prompts only; engine responses hit
    /// an unreachable backend.
    struct ResponsesOffline(MemoryGraph);

    impl GraphStore for ResponsesOffline {
        fn edges_of(&self, text: &str, label: Label) -> Result<Vec<Edge>, GraphError> {
            if label == Label::Response {
                return Err(GraphError::Unavailable("connection refused".into()));
            }
            self.0.edges_of(text, label)
        }
    }

    #[tokio::test]
    async fn test_background_store_failure_stops_session() {
        let mut graph = MemoryGraph::new();
        graph.connect(
            (Label::Prompt, "remind me"),
            "INITIATES",
            (Label::Response, "reminder"),
            EdgeParams {
                duration: Some(0.02),
                ..Default::default()
            },
        );

        let store = ResponsesOffline(graph);
        let session = Session::start(Engine::new(Arc::new(store), fast_config()));
        let outputs = session.process("remind me", QuerySource::User).await.unwrap();
        assert!(outputs.is_empty());

        tokio::time::timeout(Duration::from_secs(5), session.stopped())
            .await
            .expect("loop should stop on the store failure");

        let err = session.shutdown().await.unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, EngineError::Store(GraphError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_shutdown_joins_loop() {
        let session = Session::start(Engine::new(Arc::new(MemoryGraph::new()), fast_config()));
        tokio::time::timeout(Duration::from_secs(5), session.shutdown())
            .await
            .expect("loop should stop promptly")
            .unwrap();
    }
}
