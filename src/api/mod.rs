//! Catalog transport for Subsonic compatible servers.
//!
//! - [`auth`]: salted MD5 request tokens
//! - [`SubsonicApi`]: REST client, also the engine's [`CatalogSource`](crate::engine::CatalogSource)

pub mod auth;
pub mod subsonic;

pub use subsonic::SubsonicApi;
