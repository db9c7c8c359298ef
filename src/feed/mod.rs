// Remote menu feed module.
// HTTP client plus payload parsing and image URL resolution.

pub mod client;
pub mod types;

pub use client::{FeedClient, MenuFeed};
