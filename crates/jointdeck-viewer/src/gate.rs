//! Readiness gate for the load pipeline.
//!
//! Startup has two waits stacked on one another: the viewer scaffold must
//! register, and then the robot must finish loading. [`ReadyGate`] tracks
//! both deadlines as a small state machine driven by the app's elapsed time.
//! It settles exactly once, either through [`resolve`](ReadyGate::resolve) /
//! [`fail`](ReadyGate::fail) when the load pipeline delivers an outcome, or
//! through a timeout event from [`poll`](ReadyGate::poll). A settled gate
//! emits nothing further, so late results and deadline ticks cannot fight
//! over the viewer status.

use std::time::Duration;

use bevy::prelude::*;

// ---------------------------------------------------------------------------
// Phases and events
// ---------------------------------------------------------------------------

/// Which wait the gate is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase {
    /// Never polled.
    Idle,
    /// Waiting for the viewer scaffold to register.
    AwaitingRegistration,
    /// Waiting for the robot to finish loading.
    AwaitingRobot,
    /// Resolved, failed, or timed out. Terminal.
    Settled,
}

/// Emitted by [`ReadyGate::poll`] on phase transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateEvent {
    /// The viewer scaffold registered; the robot wait begins now.
    Registered,
    /// The scaffold never registered within its deadline.
    RegistrationTimedOut,
    /// The robot did not arrive within its deadline.
    LoadTimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GateState {
    Idle,
    AwaitingRegistration { deadline: Duration },
    AwaitingRobot { deadline: Duration },
    Settled,
}

// ---------------------------------------------------------------------------
// ReadyGate
// ---------------------------------------------------------------------------

/// Deadline tracker for viewer registration and robot load.
#[derive(Debug, Resource)]
pub struct ReadyGate {
    registration_timeout: Duration,
    load_timeout: Duration,
    state: GateState,
}

impl ReadyGate {
    /// Default deadline for the viewer scaffold to register.
    pub const REGISTRATION_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default deadline for the robot to finish loading, measured from the
    /// moment registration is observed.
    pub const LOAD_TIMEOUT: Duration = Duration::from_secs(30);

    #[must_use]
    pub const fn new(registration_timeout: Duration, load_timeout: Duration) -> Self {
        Self {
            registration_timeout,
            load_timeout,
            state: GateState::Idle,
        }
    }

    /// Advance the gate by one observation.
    ///
    /// `elapsed` is monotonic app time; `registered` is whether the viewer
    /// scaffold exists. Deadlines are armed lazily: the registration deadline
    /// on the first poll, the load deadline when registration is first
    /// observed. Returns a [`GateEvent`] on transitions, [`None`] otherwise.
    /// Registration observed on the same poll as an expired deadline wins
    /// over the timeout.
    pub fn poll(&mut self, elapsed: Duration, registered: bool) -> Option<GateEvent> {
        match self.state {
            GateState::Idle => {
                if registered {
                    self.state = GateState::AwaitingRobot {
                        deadline: elapsed + self.load_timeout,
                    };
                    Some(GateEvent::Registered)
                } else {
                    self.state = GateState::AwaitingRegistration {
                        deadline: elapsed + self.registration_timeout,
                    };
                    None
                }
            }
            GateState::AwaitingRegistration { deadline } => {
                if registered {
                    self.state = GateState::AwaitingRobot {
                        deadline: elapsed + self.load_timeout,
                    };
                    Some(GateEvent::Registered)
                } else if elapsed >= deadline {
                    self.state = GateState::Settled;
                    Some(GateEvent::RegistrationTimedOut)
                } else {
                    None
                }
            }
            GateState::AwaitingRobot { deadline } => {
                if elapsed >= deadline {
                    self.state = GateState::Settled;
                    Some(GateEvent::LoadTimedOut)
                } else {
                    None
                }
            }
            GateState::Settled => None,
        }
    }

    /// Settle the gate: the robot is ready. Safe to call in any phase; the
    /// robot being in hand always beats a pending deadline.
    pub fn resolve(&mut self) {
        self.state = GateState::Settled;
    }

    /// Settle the gate: the load failed. No timeout will fire afterwards.
    pub fn fail(&mut self) {
        self.state = GateState::Settled;
    }

    #[must_use]
    pub const fn phase(&self) -> GatePhase {
        match self.state {
            GateState::Idle => GatePhase::Idle,
            GateState::AwaitingRegistration { .. } => GatePhase::AwaitingRegistration,
            GateState::AwaitingRobot { .. } => GatePhase::AwaitingRobot,
            GateState::Settled => GatePhase::Settled,
        }
    }

    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self.state, GateState::Settled)
    }

    #[must_use]
    pub const fn registration_timeout(&self) -> Duration {
        self.registration_timeout
    }

    #[must_use]
    pub const fn load_timeout(&self) -> Duration {
        self.load_timeout
    }
}

impl Default for ReadyGate {
    fn default() -> Self {
        Self::new(Self::REGISTRATION_TIMEOUT, Self::LOAD_TIMEOUT)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
