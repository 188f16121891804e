use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::capture::CapabilityMissing;

/// Decoded payload handed back to the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub raw_value: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    UserAborted,
    PermissionDenied,
    CapabilityMissing(CapabilityMissing),
}

/// Terminal outcome of a scan session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanOutcome {
    Decoded(ScanResult),
    Cancelled(CancelReason),
}

impl ScanOutcome {
    /// The decoded text, if the scan succeeded.
    pub fn raw_value(&self) -> Option<&str> {
        match self {
            ScanOutcome::Decoded(result) => Some(&result.raw_value),
            ScanOutcome::Cancelled(_) => None,
        }
    }
}

/// Receiving end of a session's result channel.
///
/// Yields at most one outcome. `None` means the session was torn down
/// without producing one.
#[derive(Debug)]
pub struct ScanReceiver {
    rx: Receiver<ScanOutcome>,
}

impl ScanReceiver {
    pub(crate) fn new(rx: Receiver<ScanOutcome>) -> Self {
        Self { rx }
    }

    /// Block until the session produces an outcome or is torn down.
    pub fn recv(&self) -> Option<ScanOutcome> {
        self.rx.recv().ok()
    }

    /// Non-blocking poll. `Ok(None)` means no outcome yet.
    pub fn try_recv(&self) -> Result<Option<ScanOutcome>, Disconnected> {
        match self.rx.try_recv() {
            Ok(outcome) => Ok(Some(outcome)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(Disconnected),
        }
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<ScanOutcome>, Disconnected> {
        match self.rx.recv_timeout(timeout) {
            Ok(outcome) => Ok(Some(outcome)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(Disconnected),
        }
    }
}

/// The session ended without producing an outcome.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("scan session ended without an outcome")]
pub struct Disconnected;
