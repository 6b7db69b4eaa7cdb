pub mod location;
pub mod uri;

pub use location::{Location, Navigator};
pub use uri::{format_deep_link, parse_deep_link, UriError};
