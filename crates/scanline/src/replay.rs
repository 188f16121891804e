//! Scripted session replays.
//!
//! A replay script lists platform lifecycle callbacks and detection events in
//! the order they arrive. [`run_replay`] pushes them through a
//! [`ScanSession`] backed by a [`SimulatedFactory`] and records what the
//! session did with each one.

use std::{fs, path::Path};

use log::info;
use scanline_core::{Resolution, ViewfinderGeometry};
use serde::{Deserialize, Serialize};

use crate::capture::{CapabilityMissing, CaptureState, SimulatedFactory, StartOutcome};
use crate::session::{DetectionEvent, DetectionVerdict, ScanOutcome, ScanSession, SessionPhase};
use crate::{ConfigError, ScanConfig};

fn default_true() -> bool {
    true
}

/// One input to a scan session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    SurfaceCreated,
    SurfaceDestroyed,
    Resume {
        #[serde(default = "default_true")]
        service_available: bool,
    },
    Pause,
    Permission {
        granted: bool,
    },
    Detection(DetectionEvent),
    Cancel,
    Destroy,
}

/// Device description plus the events to replay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayScript {
    pub screen: Resolution,
    pub preview: Resolution,
    #[serde(default = "default_true")]
    pub has_camera: bool,
    /// Number of initial capture start attempts that fail.
    #[serde(default)]
    pub start_failures: usize,
    /// Make detector construction fail with this reason.
    #[serde(default)]
    pub detector_unavailable: Option<CapabilityMissing>,
    pub events: Vec<SessionEvent>,
}

impl ReplayScript {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Serializable view of a [`StartOutcome`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StartSummary {
    Waiting,
    Started,
    AlreadyActive,
    Failed { reason: String },
}

impl From<StartOutcome> for StartSummary {
    fn from(outcome: StartOutcome) -> Self {
        match outcome {
            StartOutcome::Waiting => StartSummary::Waiting,
            StartOutcome::Started => StartSummary::Started,
            StartOutcome::AlreadyActive => StartSummary::AlreadyActive,
            StartOutcome::Failed(err) => StartSummary::Failed {
                reason: err.to_string(),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayStep {
    pub index: usize,
    pub event: SessionEvent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<StartSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<DetectionVerdict>,
    pub phase: SessionPhase,
    pub capture: CaptureState,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayReport {
    pub screen: Resolution,
    pub preview: Resolution,
    pub viewfinder: ViewfinderGeometry,
    pub steps: Vec<ReplayStep>,
    pub starts: usize,
    pub failed_starts: usize,
    #[serde(default)]
    pub outcome: Option<ScanOutcome>,
}

impl ReplayReport {
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Run `script` through a fresh session configured by `config`.
pub fn run_replay(script: &ReplayScript, config: &ScanConfig) -> ReplayReport {
    let mut factory = SimulatedFactory::new(script.preview);
    if let Some(reason) = script.detector_unavailable {
        factory = factory.unavailable(reason);
    }
    let stats = factory.stats();
    stats.fail_next_starts(script.start_failures);

    let (session, rx) = ScanSession::new(script.screen, config, script.has_camera);
    let mut steps = Vec::with_capacity(script.events.len());

    for (index, event) in script.events.iter().enumerate() {
        let mut start = None;
        let mut verdict = None;
        match event {
            SessionEvent::SurfaceCreated => start = Some(session.on_surface_created()),
            SessionEvent::SurfaceDestroyed => session.on_surface_destroyed(),
            SessionEvent::Resume { service_available } => {
                start = Some(session.on_resume(*service_available))
            }
            SessionEvent::Pause => session.on_pause(),
            SessionEvent::Permission { granted } => {
                start = Some(session.on_permission_result(*granted, &factory))
            }
            SessionEvent::Detection(detection) => verdict = Some(session.on_detection(detection)),
            SessionEvent::Cancel => {
                session.cancel();
            }
            SessionEvent::Destroy => session.on_destroy(),
        }

        steps.push(ReplayStep {
            index,
            event: event.clone(),
            start: start.map(StartSummary::from),
            verdict,
            phase: session.phase(),
            capture: session.capture_state(),
        });
    }

    let outcome = rx.try_recv().unwrap_or(None);
    info!(
        "replayed {} events, {} capture starts, outcome: {outcome:?}",
        steps.len(),
        stats.starts()
    );

    ReplayReport {
        screen: script.screen,
        preview: script.preview,
        viewfinder: session.viewfinder(),
        steps,
        starts: stats.starts(),
        failed_starts: stats.failed_starts(),
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"{
        "screen": {"width": 1920, "height": 1080},
        "preview": {"width": 1600, "height": 1024},
        "events": [
            {"event": "permission", "granted": true},
            {"event": "resume"},
            {"event": "surface_created"},
            {"event": "detection", "bounds": {"left": 100, "top": 400, "right": 300, "bottom": 560}, "raw_value": "edge"},
            {"event": "detection", "bounds": {"left": 500, "top": 400, "right": 800, "bottom": 560}, "raw_value": "hit"},
            {"event": "detection", "bounds": {"left": 500, "top": 400, "right": 800, "bottom": 560}, "raw_value": "again"},
            {"event": "pause"},
            {"event": "destroy"}
        ]
    }"#;

    #[test]
    fn script_parses_with_defaults() {
        let script: ReplayScript = serde_json::from_str(SCRIPT).unwrap();
        assert!(script.has_camera);
        assert_eq!(script.start_failures, 0);
        assert_eq!(
            script.events[1],
            SessionEvent::Resume {
                service_available: true
            }
        );
    }

    #[test]
    fn replay_records_each_step() {
        let script: ReplayScript = serde_json::from_str(SCRIPT).unwrap();
        let report = run_replay(&script, &ScanConfig::default());

        assert_eq!(report.starts, 1);
        assert_eq!(report.steps[2].start, Some(StartSummary::Started));
        assert_eq!(report.steps[3].verdict, Some(DetectionVerdict::Rejected));
        assert_eq!(report.steps[4].verdict, Some(DetectionVerdict::Accepted));
        assert_eq!(report.steps[5].verdict, Some(DetectionVerdict::Ignored));
        assert_eq!(report.steps[7].phase, SessionPhase::Closed);
        assert_eq!(
            report.outcome.as_ref().and_then(|o| o.raw_value()),
            Some("hit")
        );
    }

    #[test]
    fn failed_start_is_reported() {
        let mut script: ReplayScript = serde_json::from_str(SCRIPT).unwrap();
        script.start_failures = 1;
        let report = run_replay(&script, &ScanConfig::default());

        assert_eq!(report.failed_starts, 1);
        assert_eq!(report.starts, 0);
        assert!(matches!(
            report.steps[2].start,
            Some(StartSummary::Failed { .. })
        ));
        assert_eq!(report.steps[4].verdict, Some(DetectionVerdict::Unready));
        assert_eq!(report.outcome, None);
    }
}
