//! Domain models for storage and API.

pub mod profile;
pub mod session;
pub mod stats;

pub use profile::{FastingGoal, ProfileUpdate, UserProfile};
pub use session::{FastingSession, SessionStatus};
pub use stats::FastingStats;
