/// Client for the hosted vegetation imagery service.
///
/// All image math (filtering, differencing, compositing, rendering) runs
/// server-side. This module builds lazy request descriptions
/// ([`collection::CollectionQuery`]) and materializes them through an
/// explicit, blocking [`session::Session`].
pub mod collection;
pub mod config;
pub mod error;
pub mod session;
