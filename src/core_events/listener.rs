use crate::core_ftpcommand::ftpcommand::FtpRequest;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use log::debug;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Server snapshot handed to `on_start` and `on_stop`.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub name: String,
    pub local_addr: SocketAddr,
}

/// Session snapshot handed to the per-connection hooks.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub remote_addr: SocketAddr,
    pub local_addr: SocketAddr,
    pub username: Option<String>,
    pub is_logged_in: bool,
    pub current_dir: String,
    pub connect_at: DateTime<Local>,
    pub last_access_at: DateTime<Local>,
}

/// Lifecycle notifications. Every hook defaults to a no-op so a listener only
/// overrides what it cares about.
#[async_trait]
pub trait FtpListener: Send + Sync {
    async fn on_start(&self, _server: &ServerInfo) {}

    async fn on_connect(&self, _session: &SessionInfo) {}

    async fn before_command(&self, _session: &SessionInfo, _request: &FtpRequest) {}

    /// `reply_code` is the last reply written while handling `request`, or 0.
    async fn after_command(&self, _session: &SessionInfo, _request: &FtpRequest, _reply_code: u16) {}

    async fn on_disconnect(&self, _session: &SessionInfo) {}

    async fn on_stop(&self, _server: &ServerInfo) {}
}

/// Named listeners of one server instance.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: RwLock<HashMap<String, Arc<dyn FtpListener>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` under `name`, replacing any previous one.
    pub async fn add(&self, name: &str, listener: Arc<dyn FtpListener>) {
        let mut listeners = self.listeners.write().await;
        if listeners.insert(name.to_string(), listener).is_some() {
            debug!("Replaced listener: {}", name);
        }
    }

    pub async fn remove(&self, name: &str) -> bool {
        self.listeners.write().await.remove(name).is_some()
    }

    pub async fn len(&self) -> usize {
        self.listeners.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.listeners.read().await.is_empty()
    }

    // The read lock is released before any hook runs, so a hook may register
    // or remove listeners itself.
    async fn snapshot(&self) -> Vec<Arc<dyn FtpListener>> {
        self.listeners.read().await.values().cloned().collect()
    }

    pub async fn on_start(&self, server: &ServerInfo) {
        for listener in self.snapshot().await {
            listener.on_start(server).await;
        }
    }

    pub async fn on_connect(&self, session: &SessionInfo) {
        for listener in self.snapshot().await {
            listener.on_connect(session).await;
        }
    }

    pub async fn before_command(&self, session: &SessionInfo, request: &FtpRequest) {
        for listener in self.snapshot().await {
            listener.before_command(session, request).await;
        }
    }

    pub async fn after_command(&self, session: &SessionInfo, request: &FtpRequest, reply_code: u16) {
        for listener in self.snapshot().await {
            listener.after_command(session, request, reply_code).await;
        }
    }

    pub async fn on_disconnect(&self, session: &SessionInfo) {
        for listener in self.snapshot().await {
            listener.on_disconnect(session).await;
        }
    }

    pub async fn on_stop(&self, server: &ServerInfo) {
        for listener in self.snapshot().await {
            listener.on_stop(server).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl FtpListener for Recorder {
        async fn on_start(&self, server: &ServerInfo) {
            self.events.lock().unwrap().push(format!("start {}", server.name));
        }

        async fn after_command(&self, _session: &SessionInfo, request: &FtpRequest, reply_code: u16) {
            self.events
                .lock()
                .unwrap()
                .push(format!("after {} {}", request.command, reply_code));
        }
    }

    struct Counter(AtomicUsize);

    #[async_trait]
    impl FtpListener for Counter {
        async fn on_stop(&self, _server: &ServerInfo) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn server_info() -> ServerInfo {
        ServerInfo {
            name: "test".to_string(),
            local_addr: "127.0.0.1:21".parse().unwrap(),
        }
    }

    fn session_info() -> SessionInfo {
        SessionInfo {
            remote_addr: "127.0.0.1:40000".parse().unwrap(),
            local_addr: "127.0.0.1:21".parse().unwrap(),
            username: None,
            is_logged_in: false,
            current_dir: "/".to_string(),
            connect_at: Local::now(),
            last_access_at: Local::now(),
        }
    }

    #[tokio::test]
    async fn test_add_and_remove() {
        let registry = ListenerRegistry::new();
        assert!(registry.is_empty().await);

        registry.add("rec", Arc::new(Recorder::default())).await;
        registry.add("rec", Arc::new(Recorder::default())).await;
        assert_eq!(registry.len().await, 1);

        assert!(registry.remove("rec").await);
        assert!(!registry.remove("rec").await);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_fan_out() {
        let registry = ListenerRegistry::new();
        let recorder = Arc::new(Recorder::default());
        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        registry.add("rec", recorder.clone()).await;
        registry.add("count", counter.clone()).await;

        registry.on_start(&server_info()).await;
        registry
            .after_command(&session_info(), &FtpRequest::parse("NOOP"), 200)
            .await;
        registry.on_stop(&server_info()).await;
        registry.on_stop(&server_info()).await;

        let events = recorder.events.lock().unwrap().clone();
        assert_eq!(events, vec!["start test", "after NOOP 200"]);
        assert_eq!(counter.0.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_removed_listener_is_not_notified() {
        let registry = ListenerRegistry::new();
        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        registry.add("count", counter.clone()).await;
        registry.remove("count").await;

        registry.on_stop(&server_info()).await;
        assert_eq!(counter.0.load(Ordering::SeqCst), 0);
    }
}
