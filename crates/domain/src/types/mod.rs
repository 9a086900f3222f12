//! Domain types and models

pub mod analysis;
pub mod event;
pub mod member;
pub mod report;

pub use analysis::{AllDayPolicy, ConflictPair, ConflictSummary, FocusBlock, WorkWindow};
pub use event::{Attendee, Event, Interval, Organizer};
pub use member::{DirectoryEntry, Member, SkipReason};
pub use report::{
    ChannelKind, DeliveryOutcome, MemberReport, MemberStatus, RunReport, SkippedMember,
};
