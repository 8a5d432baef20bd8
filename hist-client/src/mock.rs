//! Mock collaborators for testing.
//!
//! Allows scripting authority state and capturing dispatched calls for
//! verification.

use std::collections::{BTreeSet, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mirrorhist_types::{GoRequest, HistoryError, ReloadFlags};

use crate::admission::{AdmissionControl, Caller};
use crate::authority::HistoryAuthority;
use crate::gateway::HistoryGateway;

/// Scripted co-located authority for tests.
///
/// Allows setting the store position and interaction data, capturing
/// dispatched calls, and injecting failures.
#[derive(Debug, Default)]
pub struct MockAuthority {
    inner: Arc<Mutex<MockAuthorityInner>>,
}

#[derive(Debug, Default)]
struct MockAuthorityInner {
    index: i32,
    count: i32,
    interactive: BTreeSet<i32>,
    goto_calls: Vec<i32>,
    interaction_queries: Vec<i32>,
    reload_calls: Vec<ReloadFlags>,
    requested_index: Option<i32>,
    fail_next_goto: Option<String>,
    fail_next_reload: Option<String>,
}

impl MockAuthority {
    /// Create a new mock authority at index 0 with an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the store's current index and entry count.
    pub fn set_position(&self, index: i32, count: i32) {
        let mut inner = self.inner.lock().unwrap();
        inner.index = index;
        inner.count = count;
    }

    /// Record user interaction at the given index.
    pub fn mark_interactive(&self, index: i32) {
        let mut inner = self.inner.lock().unwrap();
        inner.interactive.insert(index);
    }

    /// Get all indices `goto_index` was called with.
    pub fn goto_calls(&self) -> Vec<i32> {
        let inner = self.inner.lock().unwrap();
        inner.goto_calls.clone()
    }

    /// Get all indices the interaction query was consulted for.
    pub fn interaction_queries(&self) -> Vec<i32> {
        let inner = self.inner.lock().unwrap();
        inner.interaction_queries.clone()
    }

    /// Get all flags `reload` was called with.
    pub fn reload_calls(&self) -> Vec<ReloadFlags> {
        let inner = self.inner.lock().unwrap();
        inner.reload_calls.clone()
    }

    /// Get the index seeded by a delegated resolution, if any.
    pub fn requested_index(&self) -> Option<i32> {
        let inner = self.inner.lock().unwrap();
        inner.requested_index
    }

    /// Cause the next `goto_index` to fail with the given error.
    pub fn fail_next_goto(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_goto = Some(error.to_string());
    }

    /// Cause the next `reload` to fail with the given error.
    pub fn fail_next_reload(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_reload = Some(error.to_string());
    }

    /// Clear all scripted state and captured calls.
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        *inner = MockAuthorityInner::default();
    }
}

impl Clone for MockAuthority {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl HistoryAuthority for MockAuthority {
    fn get_index(&self) -> i32 {
        self.inner.lock().unwrap().index
    }

    fn get_count(&self) -> i32 {
        self.inner.lock().unwrap().count
    }

    fn reload(&self, flags: ReloadFlags) -> Result<(), HistoryError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(error) = inner.fail_next_reload.take() {
            return Err(HistoryError::Authority(error));
        }
        inner.reload_calls.push(flags);
        Ok(())
    }

    fn goto_index(&self, index: i32) -> Result<(), HistoryError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(error) = inner.fail_next_goto.take() {
            return Err(HistoryError::Authority(error));
        }
        inner.goto_calls.push(index);
        Ok(())
    }

    fn has_user_interaction_at_index(&self, index: i32) -> bool {
        let mut inner = self.inner.lock().unwrap();
        inner.interaction_queries.push(index);
        inner.interactive.contains(&index)
    }

    fn set_requested_index(&self, index: i32) {
        let mut inner = self.inner.lock().unwrap();
        inner.requested_index = Some(index);
    }
}

/// Scripted delegated gateway for tests.
///
/// Captures epoch-tagged requests and answers them from a queue of
/// scripted resolutions.
#[derive(Debug, Default)]
pub struct MockGateway {
    inner: Arc<Mutex<MockGatewayInner>>,
}

#[derive(Debug, Default)]
struct MockGatewayInner {
    go_requests: Vec<GoRequest>,
    resolutions: VecDeque<i32>,
    reload_requests: Vec<ReloadFlags>,
    fail_next_go: Option<String>,
    fail_next_reload: Option<String>,
}

impl MockGateway {
    /// Create a new mock gateway with no scripted resolutions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the resolved index returned by the next `request_go`.
    pub fn queue_resolution(&self, index: i32) {
        let mut inner = self.inner.lock().unwrap();
        inner.resolutions.push_back(index);
    }

    /// Get all captured go requests, in dispatch order.
    pub fn go_requests(&self) -> Vec<GoRequest> {
        let inner = self.inner.lock().unwrap();
        inner.go_requests.clone()
    }

    /// Get all captured reload requests.
    pub fn reload_requests(&self) -> Vec<ReloadFlags> {
        let inner = self.inner.lock().unwrap();
        inner.reload_requests.clone()
    }

    /// Cause the next `request_go` to fail with the given error.
    pub fn fail_next_go(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_go = Some(error.to_string());
    }

    /// Cause the next `request_reload` to fail with the given error.
    pub fn fail_next_reload(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_reload = Some(error.to_string());
    }

    /// Clear all scripted state and captured requests.
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        *inner = MockGatewayInner::default();
    }
}

impl Clone for MockGateway {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl HistoryGateway for MockGateway {
    async fn request_go(&self, request: GoRequest) -> Result<i32, HistoryError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(error) = inner.fail_next_go.take() {
            return Err(HistoryError::Authority(error));
        }
        inner.go_requests.push(request);
        inner
            .resolutions
            .pop_front()
            .ok_or_else(|| HistoryError::OperationFailed("no resolution scripted".into()))
    }

    async fn request_reload(&self, flags: ReloadFlags) -> Result<(), HistoryError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(error) = inner.fail_next_reload.take() {
            return Err(HistoryError::Authority(error));
        }
        inner.reload_requests.push(flags);
        Ok(())
    }
}

/// Admission control that rejects every caller.
#[derive(Debug, Default, Clone, Copy)]
pub struct DenyingAdmission;

impl AdmissionControl for DenyingAdmission {
    fn check_admission(&self, caller: &Caller) -> Result<(), HistoryError> {
        Err(HistoryError::AdmissionRejected(format!(
            "navigation rate limit exceeded for {caller:?}"
        )))
    }
}
