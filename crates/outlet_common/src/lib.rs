//! Outlet Common - types shared by outletd and outletctl
//!
//! Holds the outlet record, the HTTP request/response bodies, the chat
//! conversation log and the 5 km service-area overlap computation.

pub mod api;
pub mod conversation;
pub mod outlet;
pub mod overlap;

pub use api::{ErrorBody, HealthResponse, QueryRequest, QueryResponse};
pub use conversation::{Conversation, ConversationEntry, Role};
pub use outlet::{Outlet, Position};
pub use overlap::{
    is_within_radius, overlap_pairs, overlapping_positions, overlapping_positions_within,
    OverlapPair, SERVICE_RADIUS_KM, SERVICE_RADIUS_M,
};
