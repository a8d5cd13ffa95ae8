//! Cycle state machine
//!
//! One measurement cycle runs through
//!
//! ```text
//! UpdateConfigFromServer → WaitForNtpSync → FirmwareVersionCheck
//!        ↑                                          │
//!        │                                          ▼
//!     SendData ← EvalSensorStatus ← ReadSensors ⇄ WaitForTimeout
//! ```
//!
//! plus `Error`, which any state can fault into. Faulting stores the
//! interrupted state in `return_state`; the Error handler later resumes there
//! or restarts the cycle. [`StateMachine`] only does the bookkeeping, the
//! actions live in [`controller`].

pub mod context;
pub mod controller;

pub use context::DeviceContext;
pub use controller::{CycleController, StepOutcome};

use core::fmt;

/// Control-loop states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CycleState {
    /// Ask the server for configuration and apply the answer
    UpdateConfigFromServer,
    /// Sync wall-clock time once per UTC day
    WaitForNtpSync,
    /// Compare running firmware with the server's
    FirmwareVersionCheck,
    /// Wait for the next sample tick
    WaitForTimeout,
    /// Take one sample tick
    ReadSensors,
    /// Finalize averages and evaluate the index
    EvalSensorStatus,
    /// Store and upload the record
    SendData,
    /// Bounded recovery from a cycle fault
    Error,
}

impl CycleState {
    /// First state after boot and after a restart
    pub const INITIAL: CycleState = CycleState::UpdateConfigFromServer;

    /// Every state in cycle order, Error last
    pub const ALL: [CycleState; 8] = [
        CycleState::UpdateConfigFromServer,
        CycleState::WaitForNtpSync,
        CycleState::FirmwareVersionCheck,
        CycleState::WaitForTimeout,
        CycleState::ReadSensors,
        CycleState::EvalSensorStatus,
        CycleState::SendData,
        CycleState::Error,
    ];

    /// Short name for logs and the display
    pub const fn name(&self) -> &'static str {
        match self {
            CycleState::UpdateConfigFromServer => "update-config",
            CycleState::WaitForNtpSync => "ntp-sync",
            CycleState::FirmwareVersionCheck => "firmware-check",
            CycleState::WaitForTimeout => "wait",
            CycleState::ReadSensors => "read-sensors",
            CycleState::EvalSensorStatus => "evaluate",
            CycleState::SendData => "send",
            CycleState::Error => "error",
        }
    }
}

impl fmt::Display for CycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Current / next / previous / return state plus the entry flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateMachine {
    current: CycleState,
    next: CycleState,
    prev: CycleState,
    return_state: CycleState,
    first_transition: bool,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    /// Machine at [`CycleState::INITIAL`], about to enter it
    pub const fn new() -> Self {
        Self {
            current: CycleState::INITIAL,
            next: CycleState::INITIAL,
            prev: CycleState::INITIAL,
            return_state: CycleState::INITIAL,
            first_transition: true,
        }
    }

    /// Active state
    pub const fn current(&self) -> CycleState {
        self.current
    }

    /// State requested by the last action
    pub const fn next(&self) -> CycleState {
        self.next
    }

    /// State that was active before the current one
    pub const fn prev(&self) -> CycleState {
        self.prev
    }

    /// State interrupted by the last fault
    pub const fn return_state(&self) -> CycleState {
        self.return_state
    }

    /// Whether the current state has not run yet
    pub const fn is_first_transition(&self) -> bool {
        self.first_transition
    }

    /// Consume the entry flag; true exactly once per entry
    pub fn enter(&mut self) -> bool {
        core::mem::replace(&mut self.first_transition, false)
    }

    /// Move to `next`
    pub fn advance(&mut self, next: CycleState) {
        self.next = next;
        if next == self.current {
            return;
        }
        log_debug!("state {} -> {}", self.current, next);
        self.prev = self.current;
        self.current = next;
        self.first_transition = true;
    }

    /// Divert into Error, remembering where to come back to
    pub fn fault(&mut self) {
        if self.current == CycleState::Error {
            return;
        }
        self.return_state = self.current;
        self.advance(CycleState::Error);
    }

    /// Leave Error for the interrupted state
    pub fn resume(&mut self) {
        self.advance(self.return_state);
    }

    /// Leave Error for the start of a fresh cycle
    pub fn restart(&mut self) {
        self.return_state = CycleState::INITIAL;
        self.advance(CycleState::INITIAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_flag_consumed_once() {
        let mut machine = StateMachine::new();
        assert!(machine.enter());
        assert!(!machine.enter());

        machine.advance(CycleState::WaitForNtpSync);
        assert!(machine.is_first_transition());
        assert_eq!(machine.prev(), CycleState::UpdateConfigFromServer);
    }

    #[test]
    fn staying_keeps_entry_consumed() {
        let mut machine = StateMachine::new();
        machine.enter();
        machine.advance(CycleState::UpdateConfigFromServer);
        assert!(!machine.is_first_transition());
    }

    #[test]
    fn fault_resumes_at_interrupted_state() {
        for state in CycleState::ALL {
            if state == CycleState::Error {
                continue;
            }
            let mut machine = StateMachine::new();
            machine.advance(state);
            machine.enter();

            machine.fault();
            assert_eq!(machine.current(), CycleState::Error);
            assert_eq!(machine.return_state(), state);
            assert_eq!(machine.prev(), state);

            machine.resume();
            assert_eq!(machine.current(), state);
            assert!(machine.is_first_transition());
        }
    }

    #[test]
    fn restart_goes_to_initial() {
        let mut machine = StateMachine::new();
        machine.advance(CycleState::SendData);
        machine.fault();
        machine.restart();
        assert_eq!(machine.current(), CycleState::INITIAL);
    }

    #[test]
    fn fault_in_error_keeps_return_state() {
        let mut machine = StateMachine::new();
        machine.advance(CycleState::ReadSensors);
        machine.fault();
        machine.fault();
        assert_eq!(machine.return_state(), CycleState::ReadSensors);
    }
}
