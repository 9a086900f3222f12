//! # Daybrief
//!
//! Application layer - wiring and process entry point.
//!
//! This crate contains:
//! - Application context (dependency injection)
//! - Logging initialisation
//! - Exit status mapping for a finished run
//!
//! ## Architecture
//! - Depends on `domain`, `core` and `infra`
//! - Wires the Graph adapters into the core pipeline
//! - The binary runs exactly one batch and exits

pub mod context;
pub mod utils;

pub use context::{escalate_configuration_error, AppContext};

use daybrief_domain::RunReport;

/// Every member was delivered.
pub const EXIT_OK: u8 = 0;
/// The run finished but at least one member was not fully delivered, or the
/// run aborted on a token or roster failure.
pub const EXIT_RUN_INCOMPLETE: u8 = 1;
/// The run never started.
pub const EXIT_CONFIG_ERROR: u8 = 2;

/// Process exit status for a finished run.
pub fn exit_status(report: &RunReport) -> u8 {
    if report.is_clean() {
        EXIT_OK
    } else {
        EXIT_RUN_INCOMPLETE
    }
}

#[cfg(test)]
mod tests {
    use daybrief_domain::{ChannelKind, DeliveryOutcome, MemberReport};

    use super::*;

    fn member(outcomes: Vec<DeliveryOutcome>) -> MemberReport {
        MemberReport {
            member_id: "u-1".into(),
            display_name: "Ana Souza".into(),
            outcomes,
            conflicts: 0,
            focus_blocks: 0,
            fetch_error: None,
            escalated: false,
        }
    }

    #[test]
    fn clean_run_exits_zero() {
        let mut report = RunReport::start();
        report.members.push(member(vec![DeliveryOutcome::delivered(ChannelKind::Email)]));
        report.finish();
        assert_eq!(exit_status(&report), EXIT_OK);
    }

    #[test]
    fn failed_channel_or_abort_exits_non_zero() {
        let mut partial = RunReport::start();
        partial.members.push(member(vec![
            DeliveryOutcome::delivered(ChannelKind::Email),
            DeliveryOutcome::failed(ChannelKind::Chat, "503"),
        ]));
        assert_eq!(exit_status(&partial), EXIT_RUN_INCOMPLETE);

        let mut aborted = RunReport::start();
        aborted.abort("roster is empty");
        assert_eq!(exit_status(&aborted), EXIT_RUN_INCOMPLETE);
    }
}
