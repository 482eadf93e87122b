//! Domain models for Feedback Hub.

pub mod chat;
pub mod feedback;
pub mod invitation;
pub mod user;

pub use chat::{render_transcript, ChatMessage, ChatReply, ChatRequest, ChatRole};
pub use feedback::{
    FeedbackResponse, ListFeedbackResponse, SubmitFeedbackRequest, SubmitFeedbackResponse,
};
pub use invitation::{
    is_valid_token_format, CreateInvitationsRequest, CreateInvitationsResponse, InvitationStatus,
    InvitationSummary, ListInvitationsResponse, PublicInvitationInfo, RecipientOutcome,
};
pub use user::{
    LoginRequest, RegisterRequest, TokensResponse, UpdateProfileRequest, UserResponse,
};
