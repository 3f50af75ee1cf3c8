pub mod interceptor;

pub use interceptor::ApiClient;
