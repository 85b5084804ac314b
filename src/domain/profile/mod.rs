//! Profile module - stored communication preferences.
//!
//! A profile captures how a user wants to be spoken to and what tends to
//! precede a crisis for them. The core never writes profiles; it renders
//! them into a personalization fragment appended to agent system prompts.

pub mod fragment;
pub mod profile;

pub use fragment::{personalize, PersonalizationFragment};
pub use profile::{
    CommunicationGuidelines, ContactMethod, CrisisSignals, Profile, SupportContact, Tone,
    MAX_SUPPORT_CIRCLE,
};
