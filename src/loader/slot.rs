use std::sync::{Arc, OnceLock};
use tokio::sync::watch;

use crate::vm::{VmError, VmModule};

static GLOBAL_SLOT: OnceLock<Arc<ModuleSlot>> = OnceLock::new();

#[derive(Clone)]
enum SlotState {
    Empty,
    Attaching,
    Attached(Arc<dyn VmModule>),
}

/// Outcome of [`ModuleSlot::claim`].
pub enum Claim {
    /// A handle already exists.
    Existing(Arc<dyn VmModule>),
    /// Caller owns the attach and must `publish` or `abandon`.
    Owner,
    /// Another caller is attaching; use `wait_attached`.
    InFlight,
}

/// Holder of the attached module handle.
///
/// The handle is published once and never detached. While an attach is in
/// flight the slot carries a marker so that concurrent or later mounts wait
/// for it instead of attaching again.
pub struct ModuleSlot {
    state: watch::Sender<SlotState>,
}

impl Default for ModuleSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleSlot {
    pub fn new() -> Self {
        let (state, _) = watch::channel(SlotState::Empty);
        Self { state }
    }

    /// The slot shared by every view in this process.
    pub fn global() -> Arc<Self> {
        Arc::clone(GLOBAL_SLOT.get_or_init(|| Arc::new(Self::new())))
    }

    pub fn handle(&self) -> Option<Arc<dyn VmModule>> {
        match &*self.state.borrow() {
            SlotState::Attached(handle) => Some(Arc::clone(handle)),
            _ => None,
        }
    }

    pub fn is_attaching(&self) -> bool {
        matches!(&*self.state.borrow(), SlotState::Attaching)
    }

    /// Checks for a handle and, if there is none and nobody is attaching,
    /// marks the slot as attaching on behalf of the caller.
    pub fn claim(&self) -> Claim {
        let mut claim = Claim::InFlight;
        self.state.send_if_modified(|state| match state {
            SlotState::Empty => {
                *state = SlotState::Attaching;
                claim = Claim::Owner;
                true
            }
            SlotState::Attaching => false,
            SlotState::Attached(handle) => {
                claim = Claim::Existing(Arc::clone(handle));
                false
            }
        });
        claim
    }

    /// Stores the handle and wakes waiters.
    pub fn publish(&self, handle: Arc<dyn VmModule>) {
        self.state.send_replace(SlotState::Attached(handle));
    }

    /// Clears the attach marker after a failed attach so a later mount may retry.
    pub fn abandon(&self) {
        self.state.send_if_modified(|state| {
            if matches!(state, SlotState::Attaching) {
                *state = SlotState::Empty;
                true
            } else {
                false
            }
        });
    }

    /// Waits until an in-flight attach publishes its handle.
    ///
    /// Fails if the attach is abandoned.
    pub async fn wait_attached(&self) -> Result<Arc<dyn VmModule>, VmError> {
        let mut rx = self.state.subscribe();
        loop {
            let current = rx.borrow_and_update().clone();
            match current {
                SlotState::Attached(handle) => return Ok(handle),
                SlotState::Empty => return Err(abandoned()),
                SlotState::Attaching => {}
            }
            if rx.changed().await.is_err() {
                return Err(abandoned());
            }
        }
    }
}

fn abandoned() -> VmError {
    VmError::ResourceLoad {
        resource: "module".to_string(),
        reason: "attach abandoned by another view".to_string(),
    }
}
