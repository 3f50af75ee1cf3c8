// This module re-exports important pieces for convenience,
// so we can "use crate::models::*" easily.
pub mod token;
pub mod user;

pub use token::{Claims, CodecError, TokenCodec};
pub use user::User;
