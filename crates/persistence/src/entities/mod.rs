//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod feedback;
pub mod invitation;
pub mod user;

pub use feedback::{FeedbackEntity, FeedbackWithGiverEntity};
pub use invitation::{InvitationEntity, InvitationStatusDb};
pub use user::UserEntity;
