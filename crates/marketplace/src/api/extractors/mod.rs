//! Custom request extractors.

mod client_ip;
mod maybe_user;
mod validated_json;

pub use client_ip::{client_ip, ClientIp};
pub use maybe_user::MaybeUser;
pub use validated_json::ValidatedJson;
