pub mod http_provider;
pub mod provider;

pub use http_provider::HttpProvider;
pub use provider::AssignmentProvider;
