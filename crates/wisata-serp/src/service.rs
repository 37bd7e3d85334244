//! Facade bundling the three resolvers behind one shared client.

use std::sync::Arc;

use wisata_core::{AppConfig, Gazetteer, GeocodeResult, SearchPage};

use crate::client::{SerpClient, SerpConfig};
use crate::error::{GatewayError, ResolverError};
use crate::geocode::AddressResolver;
use crate::places::{PlaceSearch, PlaceSearchRequest};
use crate::reverse::LocalityResolver;

/// The public operations consumed by the HTTP and CLI layers.
///
/// Cloning is cheap; all clones share one [`SerpClient`] and [`Gazetteer`].
#[derive(Clone)]
pub struct LocationService {
    addresses: AddressResolver,
    localities: LocalityResolver,
    places: PlaceSearch,
}

impl LocationService {
    #[must_use]
    pub fn new(
        client: Arc<SerpClient>,
        gazetteer: Arc<Gazetteer>,
        image_proxy_base: impl Into<String>,
    ) -> Self {
        Self {
            addresses: AddressResolver::new(Arc::clone(&client), gazetteer),
            localities: LocalityResolver::new(Arc::clone(&client)),
            places: PlaceSearch::new(client, image_proxy_base),
        }
    }

    /// Builds the service from loaded application config.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] if the HTTP client cannot be constructed.
    pub fn from_app_config(config: &AppConfig, gazetteer: Gazetteer) -> Result<Self, GatewayError> {
        let client = SerpClient::new(SerpConfig::from_app_config(config))?;
        Ok(Self::new(
            Arc::new(client),
            Arc::new(gazetteer),
            config.image_proxy_base_url.clone(),
        ))
    }

    /// See [`AddressResolver::resolve`].
    ///
    /// # Errors
    ///
    /// Propagates [`ResolverError`] from the address resolver.
    pub async fn resolve_address(&self, address: &str) -> Result<GeocodeResult, ResolverError> {
        self.addresses.resolve(address).await
    }

    /// See [`LocalityResolver::resolve_locality`].
    pub async fn resolve_locality(&self, latitude: f64, longitude: f64) -> String {
        self.localities.resolve_locality(latitude, longitude).await
    }

    /// See [`PlaceSearch::search`].
    ///
    /// # Errors
    ///
    /// Propagates [`ResolverError`] from the place search.
    pub async fn search_places(
        &self,
        request: &PlaceSearchRequest,
    ) -> Result<SearchPage, ResolverError> {
        self.places.search(request).await
    }
}
