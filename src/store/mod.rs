pub mod base;
pub mod cookie_store;
pub mod file_store;

// Re-export the primary store items so code outside can do
// "use crate::store::{TokenStore, create_store};"
pub use base::{create_store, TokenSink, TokenStore};
pub use cookie_store::CookieSink;
pub use file_store::FileSink;
