//! Replay of volatile lighting settings after a power event
//!
//! The controller forgets colour and idle timeout across suspend. On resume
//! the retained values are sent again. Brightness and boot effect are not
//! replayed.

use tracing::{error, info};

use crate::codec::{encode_color, encode_timeout, DchuTransportExt};
use crate::control::XmgDevice;
use crate::error::DriverError;

/// Setting re-issued on resume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayedSetting {
    Color,
    Timeout,
}

/// What a resume pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResumeReport {
    pub replayed: Vec<ReplayedSetting>,
    pub failed: Vec<(ReplayedSetting, DriverError)>,
}

impl ResumeReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

impl XmgDevice {
    /// Re-issue retained colour and timeout. Never fails; errors are logged
    /// and collected in the report.
    pub fn resume(&self) -> ResumeReport {
        let state = self.state.lock();
        let mut report = ResumeReport::default();

        if state.color != 0 {
            let result = encode_color(state.color)
                .and_then(|cmd| self.transport.send_cmd(&cmd).map_err(DriverError::from));
            record(&mut report, ReplayedSetting::Color, result);
        }
        if state.timeout != 0 {
            let result = encode_timeout(state.timeout)
                .and_then(|cmd| self.transport.send_cmd(&cmd).map_err(DriverError::from));
            record(&mut report, ReplayedSetting::Timeout, result);
        }

        info!(
            "Resume: replayed {:?}, {} failure(s)",
            report.replayed,
            report.failed.len()
        );
        report
    }
}

fn record(report: &mut ResumeReport, setting: ReplayedSetting, result: Result<(), DriverError>) {
    match result {
        Ok(()) => report.replayed.push(setting),
        Err(e) => {
            error!("Failed to restore {setting:?} on resume: {e}");
            report.failed.push((setting, e));
        }
    }
}
