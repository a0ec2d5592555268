//! Builds a short personal profile from a few console prompts.
//!
//! [`collect_profile`] asks for a name, a birth year and any number of
//! hobbies, and returns a [`Profile`] whose `Display` output is the printed
//! summary.

mod profile;

pub use profile::{
    DEFAULT_CURRENT_YEAR, HobbyEntry, LifeStage, Profile, STOP_TOKEN, age_in, collect_profile,
    parse_hobby,
};
