//! Shared helpers for clinic-core integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use clinic_core::{
    ApiRequest, ApiResponse, MemoryStorage, RequestPolicy, SessionStore, StorageError,
    StoredSession, TokenStorage, Transport, TransportError,
};

/// Transport that replays queued responses and records every request.
#[derive(Default)]
pub struct StubTransport {
    responses: Mutex<VecDeque<Result<ApiResponse, TransportError>>>,
    requests: Mutex<Vec<ApiRequest>>,
    calls: AtomicUsize,
}

impl StubTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, status: u16, body: Value) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(ApiResponse::json(status, &body)));
    }

    pub fn respond_text(&self, status: u16, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(ApiResponse::new(status, body)));
    }

    pub fn fail(&self, error: TransportError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> ApiRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ApiResponse::new(500, "no stubbed response")))
    }
}

/// A store and policy wired to `transport` with in-memory storage.
pub fn setup(
    transport: &Arc<StubTransport>,
) -> (SessionStore, RequestPolicy, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let session = SessionStore::new(transport.clone(), storage.clone());
    let policy = RequestPolicy::new(session.clone());
    (session, policy, storage)
}

/// How a [`FaultyStorage`] misbehaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Every write and clear fails with an I/O error.
    Broken,
    /// Loads report an undecodable record.
    Corrupt,
    /// Works, but `clear` yields to the scheduler before touching the slot.
    SlowClear,
}

/// Storage wrapping a [`MemoryStorage`] with an injected fault.
pub struct FaultyStorage {
    slot: MemoryStorage,
    fault: Fault,
}

impl FaultyStorage {
    pub fn new(fault: Fault) -> Arc<Self> {
        Arc::new(Self {
            slot: MemoryStorage::new(),
            fault,
        })
    }

    /// Faulty storage already holding `session`.
    pub fn seeded(fault: Fault, session: StoredSession) -> Arc<Self> {
        Arc::new(Self {
            slot: MemoryStorage::with_session(session),
            fault,
        })
    }

    pub fn snapshot(&self) -> Option<StoredSession> {
        self.slot.snapshot()
    }

    fn disk_full() -> StorageError {
        StorageError::Io {
            path: "session.json".into(),
            message: "disk full".into(),
        }
    }
}

#[async_trait]
impl TokenStorage for FaultyStorage {
    async fn load(&self) -> Result<Option<StoredSession>, StorageError> {
        match self.fault {
            Fault::Corrupt => Err(StorageError::Corrupt {
                message: "expected value at line 1 column 1".into(),
            }),
            _ => self.slot.load().await,
        }
    }

    async fn save(&self, session: &StoredSession) -> Result<(), StorageError> {
        match self.fault {
            Fault::Broken => Err(Self::disk_full()),
            _ => self.slot.save(session).await,
        }
    }

    async fn clear(&self) -> Result<(), StorageError> {
        match self.fault {
            Fault::Broken => Err(Self::disk_full()),
            Fault::SlowClear => {
                tokio::task::yield_now().await;
                self.slot.clear().await
            }
            Fault::Corrupt => self.slot.clear().await,
        }
    }
}
