//! Upstream plumbing for Congress data: the Congress.gov JSON client, the
//! House Clerk and Senate LIS roll-call XML feeds, payload unwrapping, and the
//! JSON resource types those endpoints return.

mod client;
mod errors;
mod feeds;
pub mod types;
pub mod unwrap;
pub mod xml;

pub use self::client::Client;
pub use self::errors::{Error, RetryClass};
pub use self::feeds::{FeedClient, HOUSE_BASE_URL, SENATE_BASE_URL};
pub use self::unwrap::{unwrap_payload, Unwrapped};
pub use self::xml::{XmlElement, XmlError};
