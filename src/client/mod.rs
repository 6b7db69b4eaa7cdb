pub mod http;
pub mod traits;

pub use http::{HttpConfig, HttpPortalClient};
pub use traits::{ClientError, ClientResult, PortalClient};
