//! Repository implementations for database operations.

pub mod invitation;
pub mod user;

pub use invitation::{generate_invitation_token, InvitationError, InvitationRepository};
pub use user::UserRepository;
