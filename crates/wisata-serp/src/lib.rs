//! Location resolution on top of the `SerpAPI` Google Maps engine.
//!
//! [`SerpClient`] is the only component that talks to the network. The
//! resolvers interpret its loosely-typed payloads:
//!
//! - [`AddressResolver`] turns an address into a [`wisata_core::GeocodeResult`].
//! - [`LocalityResolver`] turns a coordinate into a locality name, never failing.
//! - [`PlaceSearch`] turns a coordinate and query into a [`wisata_core::SearchPage`].

pub mod client;
pub mod error;
pub mod geocode;
pub mod payload;
pub mod places;
pub mod reverse;
pub mod service;

pub use client::{QueryWeight, SearchQuery, SerpClient, SerpConfig};
pub use error::{GatewayError, ResolverError};
pub use geocode::AddressResolver;
pub use places::{PlaceSearch, PlaceSearchRequest};
pub use reverse::{LocalityResolver, DEFAULT_LOCALITY};
pub use service::LocationService;
