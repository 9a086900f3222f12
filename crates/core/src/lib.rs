//! # Daybrief Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The schedule analysis engine (conflicts and focus blocks)
//! - Port/adapter interfaces (traits) for every remote collaborator
//! - The notification orchestrator and batch driver
//!
//! ## Architecture Principles
//! - Only depends on `daybrief-domain`
//! - No HTTP, SMTP or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod digest;
pub mod schedule;

pub use digest::{
    escalate_best_effort, AccessToken, BatchDriver, DeliveryChannel, Digest, DirectoryGateway,
    EscalationNotice, Escalator, NotificationOrchestrator, TokenProvider,
};
pub use schedule::{
    detect_conflicts, suggest_focus_blocks, DayWindow, ScheduleAnalysis, ScheduleAnalyzer,
};
