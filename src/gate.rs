//! Per-action invocation gating
//!
//! Each UI action owns one gate: at most one orchestrator invocation in
//! flight at a time (a mutual-exclusion flag, not a queue), plus a
//! generation counter so a late-arriving result from a screen the user
//! has left can be detected and dropped instead of applied stale.
//! In-flight calls are never cancelled; they run to completion and their
//! token simply stops being current.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct InvocationGate {
    busy: AtomicBool,
    generation: AtomicU64,
}

/// Held for the duration of one orchestrator invocation; releases the
/// busy flag on drop.
#[derive(Debug)]
pub struct InvocationToken<'a> {
    gate: &'a InvocationGate,
    generation: u64,
}

impl InvocationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the gate for one invocation. Returns `None` while another
    /// invocation is in flight; the caller treats that as a disabled
    /// control, not a queue slot.
    pub fn try_begin(&self) -> Option<InvocationToken<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;

        Some(InvocationToken {
            gate: self,
            generation: self.generation.load(Ordering::Acquire),
        })
    }

    /// Mark every outstanding token stale, e.g. when the user navigates
    /// away from the view that started the call.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }
}

impl InvocationToken<'_> {
    /// Whether a result produced under this token may still be applied.
    pub fn is_current(&self) -> bool {
        self.generation == self.gate.generation.load(Ordering::Acquire)
    }
}

impl Drop for InvocationToken<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}
