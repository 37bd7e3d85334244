//! Thumbnail URL rewriting for clients that need same-origin images.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use wisata_core::{ImageDelivery, Place};

/// RFC 3986 unreserved characters stay as-is; everything else is encoded.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Builds `<proxy_base>?url=<encoded original>`.
#[must_use]
pub fn proxied_url(proxy_base: &str, original: &str) -> String {
    let separator = if proxy_base.contains('?') { '&' } else { '?' };
    let encoded = utf8_percent_encode(original, QUERY_VALUE);
    format!("{proxy_base}{separator}url={encoded}")
}

/// Rewrites `thumbnail_url` through the proxy when `delivery` asks for it.
/// `original_thumbnail_url` is never touched.
pub fn apply_image_delivery(places: &mut [Place], delivery: ImageDelivery, proxy_base: &str) {
    if delivery == ImageDelivery::Direct {
        return;
    }
    for place in places {
        if let Some(original) = place.original_thumbnail_url.as_deref() {
            place.thumbnail_url = Some(proxied_url(proxy_base, original));
        }
    }
}
