//! SessionHistory - the caller-facing history facade.
//!
//! This module provides [`SessionHistory`], the primary API for reading a
//! navigation history's position and issuing offset navigations against
//! it.
//!
//! # Architecture
//!
//! SessionHistory keeps the pure accounting (from hist-core) behind a
//! mutex and routes navigations to the bound authority variant: a
//! co-located store is called synchronously, a delegated gateway is
//! reached from a spawned task that re-enters state through a weak handle.
//! All mutation and every deferred callback run on the same logical
//! thread, so the lock is only ever held for short, non-reentrant
//! sections.

use std::fmt;
use std::sync::{Arc, Mutex, Weak};

use mirrorhist_core::{resolver, EpochCounter, LocalHistoryView};
use mirrorhist_types::{ChangeId, Epoch, GoRequest, HistoryError, ReloadFlags};

use crate::admission::{AdmissionControl, Caller, UnlimitedAdmission};
use crate::authority::HistoryAuthority;
use crate::gateway::HistoryGateway;

/// Where navigations are sent.
///
/// Fixed at construction or wholesale rebinding; every dispatch site
/// matches on this exhaustively.
#[derive(Clone)]
pub enum AuthorityBinding {
    /// The authoritative store lives in this execution context.
    Local(Arc<dyn HistoryAuthority>),
    /// The authoritative store is reached through a gateway.
    Delegated {
        /// Transport to the remote authority.
        gateway: Arc<dyn HistoryGateway>,
        /// Optional co-located mirror that receives the requested index
        /// once a delegated resolution arrives.
        store: Option<Arc<dyn HistoryAuthority>>,
    },
}

impl AuthorityBinding {
    fn has_user_interaction_at(&self, index: i32) -> bool {
        match self {
            AuthorityBinding::Local(store) => store.has_user_interaction_at_index(index),
            AuthorityBinding::Delegated { store, .. } => store
                .as_ref()
                .is_some_and(|store| store.has_user_interaction_at_index(index)),
        }
    }
}

impl fmt::Debug for AuthorityBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthorityBinding::Local(_) => f.write_str("Local"),
            AuthorityBinding::Delegated { store, .. } => f
                .debug_struct("Delegated")
                .field("store", &store.is_some())
                .finish(),
        }
    }
}

/// A navigation admitted but not yet executed.
#[derive(Debug)]
struct QueuedNavigation {
    id: u64,
    offset: i32,
    require_user_interaction: bool,
    caller: Caller,
}

struct HistoryState {
    binding: Option<AuthorityBinding>,
    view: LocalHistoryView,
    epoch: EpochCounter,
    queue: Vec<QueuedNavigation>,
    next_queue_id: u64,
}

impl HistoryState {
    fn binding(&self) -> Result<AuthorityBinding, HistoryError> {
        self.binding
            .clone()
            .ok_or_else(|| HistoryError::OperationFailed("no history authority bound".into()))
    }

    /// Current (index, count), from the store when it is co-located and
    /// ledger accounting is off, otherwise from the local projection.
    fn position(&self) -> (i32, i32) {
        match &self.binding {
            Some(AuthorityBinding::Local(store)) if !self.view.async_accounting() => {
                (store.get_index(), store.get_count())
            }
            _ => (self.view.effective_index(), self.view.effective_length()),
        }
    }
}

/// The caller-facing session-history facade.
///
/// One instance per navigation context. Reads (`count`, `index`,
/// `can_go`) are synchronous, non-blocking, and side-effect free;
/// navigations either call the co-located store directly or hand an
/// epoch-tagged request to the delegated gateway.
pub struct SessionHistory {
    state: Arc<Mutex<HistoryState>>,
    admission: Arc<dyn AdmissionControl>,
}

impl SessionHistory {
    /// Create a facade with unlimited admission.
    pub fn new(binding: AuthorityBinding) -> Self {
        Self::with_admission(binding, Arc::new(UnlimitedAdmission))
    }

    /// Create a facade with an explicit admission gate.
    pub fn with_admission(binding: AuthorityBinding, admission: Arc<dyn AdmissionControl>) -> Self {
        Self {
            state: Arc::new(Mutex::new(HistoryState {
                binding: Some(binding),
                view: LocalHistoryView::new(),
                epoch: EpochCounter::new(),
                queue: Vec::new(),
                next_queue_id: 0,
            })),
            admission,
        }
    }

    /// Number of history entries.
    ///
    /// Answered from the local projection unless the authority is
    /// co-located and ledger accounting is off, in which case the store is
    /// queried directly.
    pub fn count(&self) -> i32 {
        self.state.lock().unwrap().position().1
    }

    /// Index of the current history entry.
    pub fn index(&self) -> i32 {
        self.state.lock().unwrap().position().0
    }

    /// Check whether `index() + offset` lands on an existing entry.
    pub fn can_go(&self, offset: i32) -> bool {
        let (index, count) = self.state.lock().unwrap().position();
        resolver::can_go(index, count, offset)
    }

    /// Navigate by `offset` steps.
    ///
    /// With `require_user_interaction` set (valid only for offsets of -1
    /// or 1), entries without recorded user interaction are skipped, never
    /// scanning past either end of the list. The resolved target is
    /// dispatched to the bound authority tagged with the current epoch.
    pub fn go(&self, offset: i32, require_user_interaction: bool) -> Result<(), HistoryError> {
        run_go(&self.state, offset, require_user_interaction)
    }

    /// Queue a navigation for execution on a later scheduling turn.
    ///
    /// The admission gate is consulted first; a refusal is returned
    /// unchanged and nothing is queued. Once executed, the request has the
    /// same semantics as [`go`](Self::go); failures at that point are
    /// logged and dropped.
    pub fn async_go(
        &self,
        offset: i32,
        require_user_interaction: bool,
        caller: Caller,
    ) -> Result<(), HistoryError> {
        tracing::debug!(offset, ?caller, "history async go");
        self.admission.check_admission(&caller)?;

        let id = {
            let mut guard = self.state.lock().unwrap();
            let id = guard.next_queue_id;
            guard.next_queue_id += 1;
            guard.queue.push(QueuedNavigation {
                id,
                offset,
                require_user_interaction,
                caller,
            });
            id
        };

        let state = Arc::downgrade(&self.state);
        tokio::spawn(async move {
            let Some(state) = state.upgrade() else {
                return;
            };
            let claimed = {
                let mut guard = state.lock().unwrap();
                let at = guard.queue.iter().position(|nav| nav.id == id);
                at.map(|at| guard.queue.remove(at))
            };
            // A missing entry means the navigation was cancelled.
            let Some(nav) = claimed else {
                return;
            };
            tracing::debug!(
                offset = nav.offset,
                caller = ?nav.caller,
                "executing queued history navigation"
            );
            if let Err(err) = run_go(&state, nav.offset, nav.require_user_interaction) {
                tracing::debug!("queued history navigation failed: {err}");
            }
        });
        Ok(())
    }

    /// Reload the current entry.
    ///
    /// Routed like navigations: the co-located store is called directly
    /// and its result returned verbatim; a delegated reload awaits only
    /// admission of the request, not its completion.
    pub async fn reload(&self, flags: ReloadFlags) -> Result<(), HistoryError> {
        let binding = self.state.lock().unwrap().binding()?;
        match binding {
            AuthorityBinding::Local(store) => store.reload(flags),
            AuthorityBinding::Delegated { gateway, .. } => gateway.request_reload(flags).await,
        }
    }

    /// Record a speculative index/length change; returns the id an
    /// authoritative confirmation will quote back.
    pub fn add_pending_history_change(&self, index_delta: i32, length_delta: i32) -> ChangeId {
        let mut guard = self.state.lock().unwrap();
        guard.view.add_pending_change(index_delta, length_delta)
    }

    /// Record the speculative change for navigating forward by one entry,
    /// truncating any forward entries.
    pub fn add_pending_history_change_for_forward_nav(&self) -> ChangeId {
        let mut guard = self.state.lock().unwrap();
        let (index, count) = guard.position();
        let index_delta = 1;
        let length_delta = index
            .wrapping_add(index_delta)
            .wrapping_sub(count.wrapping_sub(1));
        guard.view.add_pending_change(index_delta, length_delta)
    }

    /// Apply an authoritative confirmation of index and length.
    ///
    /// Overwrites the confirmed position and removes every pending change
    /// matching `id`; an unknown id only performs the overwrite.
    pub fn set_index_and_length(&self, index: i32, length: i32, id: ChangeId) {
        tracing::debug!(index, length, %id, "history confirmation");
        self.state
            .lock()
            .unwrap()
            .view
            .set_index_and_length(index, length, id);
    }

    /// Toggle ledger accounting for a co-located authority.
    ///
    /// Fails when the authority is delegated or none is bound. Enabling
    /// seeds the projection from the store and clears pending changes;
    /// disabling resets the projection to its unseeded state. Requesting
    /// the current mode is a no-op.
    pub fn set_async_mode(&self, enable: bool) -> Result<(), HistoryError> {
        let mut guard = self.state.lock().unwrap();
        let store = match &guard.binding {
            Some(AuthorityBinding::Local(store)) => Arc::clone(store),
            _ => {
                return Err(HistoryError::OperationFailed(
                    "async length accounting requires a co-located authority".into(),
                ))
            }
        };
        if guard.view.async_accounting() == enable {
            return Ok(());
        }
        if enable {
            let index = store.get_index();
            let length = store.get_count();
            guard.view.enable_async(index, length);
        } else {
            guard.view.disable_async();
        }
        Ok(())
    }

    /// Discard every queued navigation that has not started executing.
    ///
    /// Clears the whole queue regardless of which navigation each request
    /// belongs to; requests already handed to an authority cannot be
    /// unwound.
    pub fn remove_pending_history_navigations(&self) {
        let mut guard = self.state.lock().unwrap();
        tracing::debug!(
            pending = guard.queue.len(),
            "removing pending history navigations"
        );
        guard.queue.clear();
    }

    /// Replace the authority binding wholesale.
    ///
    /// Resets the local projection and discards queued navigations; the
    /// epoch counter is retained so markers stay monotonic across
    /// rebinds.
    pub fn rebind(&self, binding: AuthorityBinding) {
        let mut guard = self.state.lock().unwrap();
        guard.binding = Some(binding);
        guard.view = LocalHistoryView::new();
        guard.queue.clear();
    }

    /// Detach from any authority.
    ///
    /// Subsequent navigations and mode toggles fail; reads fall back to
    /// the unseeded projection.
    pub fn unbind(&self) {
        let mut guard = self.state.lock().unwrap();
        guard.binding = None;
        guard.view = LocalHistoryView::new();
        guard.queue.clear();
    }

    /// The epoch that would tag a request dispatched now.
    pub fn current_epoch(&self) -> Epoch {
        self.state.lock().unwrap().epoch.current()
    }

    /// Number of queued, not-yet-executed navigations.
    pub fn pending_navigation_count(&self) -> usize {
        self.state.lock().unwrap().queue.len()
    }

    /// Number of unconfirmed speculative changes.
    pub fn pending_change_count(&self) -> usize {
        self.state.lock().unwrap().view.pending_change_count()
    }
}

impl fmt::Debug for SessionHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.state.lock().unwrap();
        f.debug_struct("SessionHistory")
            .field("binding", &guard.binding)
            .field("epoch", &guard.epoch.current())
            .field("pending_navigations", &guard.queue.len())
            .finish()
    }
}

fn overflow_error() -> HistoryError {
    HistoryError::OperationFailed("history offset overflow".into())
}

/// Full `go` semantics, shared by the synchronous entry point and queued
/// navigations.
fn run_go(
    state: &Arc<Mutex<HistoryState>>,
    offset: i32,
    require_user_interaction: bool,
) -> Result<(), HistoryError> {
    if require_user_interaction && offset != -1 && offset != 1 {
        return Err(HistoryError::InvalidArgument(
            "require_user_interaction is only valid with an offset of -1 or 1".into(),
        ));
    }

    let (binding, start, count, epoch, schedule_bump) = {
        let mut guard = state.lock().unwrap();
        let binding = guard.binding()?;
        let (index, count) = guard.position();
        tracing::debug!(offset, index, "history go");
        let start = index.checked_add(offset).ok_or_else(overflow_error)?;
        let schedule_bump = guard.epoch.schedule_bump();
        (binding, start, count, guard.epoch.current(), schedule_bump)
    };

    if schedule_bump {
        spawn_epoch_bump(Arc::downgrade(state));
    }

    let candidate = resolver::scan_from(start, offset, count, require_user_interaction, |index| {
        binding.has_user_interaction_at(index)
    })
    .map_err(|err| HistoryError::OperationFailed(err.to_string()))?;

    dispatch(state, &binding, candidate, offset, epoch)
}

/// Commit the coalesced epoch bump once the current turn has finished.
fn spawn_epoch_bump(state: Weak<Mutex<HistoryState>>) {
    tokio::spawn(async move {
        if let Some(state) = state.upgrade() {
            state.lock().unwrap().epoch.commit_bump();
        }
    });
}

fn dispatch(
    state: &Arc<Mutex<HistoryState>>,
    binding: &AuthorityBinding,
    candidate: i32,
    offset: i32,
    epoch: Epoch,
) -> Result<(), HistoryError> {
    match binding {
        AuthorityBinding::Local(store) => store.goto_index(candidate),
        AuthorityBinding::Delegated { gateway, store } => {
            tracing::debug!(candidate, offset, %epoch, "delegating history go");
            let gateway = Arc::clone(gateway);
            let store = store.clone();
            let view = Arc::downgrade(state);
            tokio::spawn(async move {
                match gateway.request_go(GoRequest { offset, epoch }).await {
                    Ok(resolved) => {
                        // The view may have been discarded while the
                        // request was in flight.
                        if view.upgrade().is_none() {
                            return;
                        }
                        if let Some(store) = store {
                            store.set_requested_index(resolved);
                        }
                    }
                    Err(err) => {
                        tracing::debug!("delegated history go failed: {err}");
                    }
                }
            });
            Ok(())
        }
    }
}
