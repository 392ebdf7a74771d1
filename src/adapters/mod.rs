// Adapters layer: concrete implementations of the domain ports for external systems.

pub mod connectivity;
pub mod http;
pub mod s3;

pub use connectivity::{wait_until_connected, TcpProbe};
pub use http::{build_http_client, RetryPolicy, RetryingHttpClient};
pub use s3::{build_s3_client, R2Store};
