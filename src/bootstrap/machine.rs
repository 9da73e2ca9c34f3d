use shellboot_protocol::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootState {
    WaitingForBridge,
    Fetching,
    Applying,
    NoBridgeFallback,
    Ready,
}

impl BootState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WaitingForBridge => "waiting_for_bridge",
            Self::Fetching => "fetching",
            Self::Applying => "applying",
            Self::NoBridgeFallback => "no_bridge_fallback",
            Self::Ready => "ready",
        }
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::WaitingForBridge, Self::Fetching)
                | (Self::WaitingForBridge, Self::NoBridgeFallback)
                | (Self::Fetching, Self::Applying)
                | (Self::Fetching, Self::NoBridgeFallback)
                | (Self::Applying, Self::Ready)
                | (Self::NoBridgeFallback, Self::Ready)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    BridgeWaitTimedOut,
    FetchFailed { code: String },
    /// Boot was cut short (error, panic or cancellation) before it could
    /// release the UI itself.
    Interrupted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootPath {
    Bridge,
    Fallback(FallbackReason),
}

impl BootPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bridge => "bridge",
            Self::Fallback(FallbackReason::BridgeWaitTimedOut) => "fallback_bridge_wait_timeout",
            Self::Fallback(FallbackReason::FetchFailed { .. }) => "fallback_fetch_failed",
            Self::Fallback(FallbackReason::Interrupted) => "fallback_interrupted",
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct BootMachine {
    current: BootState,
    history: Vec<BootState>,
}

impl BootMachine {
    pub(crate) fn new() -> Self {
        Self {
            current: BootState::WaitingForBridge,
            history: vec![BootState::WaitingForBridge],
        }
    }

    pub(crate) fn current(&self) -> BootState {
        self.current
    }

    pub(crate) fn history(&self) -> &[BootState] {
        &self.history
    }

    pub(crate) fn advance(&mut self, next: BootState) -> AppResult<()> {
        if !self.current.can_transition_to(next) {
            return Err(
                AppError::new("boot_state_transition_invalid", "启动状态流转非法")
                    .with_context("from", self.current.as_str())
                    .with_context("to", next.as_str()),
            );
        }

        tracing::debug!(
            event = "boot_state_changed",
            from = self.current.as_str(),
            to = next.as_str()
        );
        self.current = next;
        self.history.push(next);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/bootstrap/machine_tests.rs"]
mod tests;
