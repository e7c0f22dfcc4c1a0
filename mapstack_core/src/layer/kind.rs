// Copyright 2026 the Mapstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer variants and their capabilities.
//!
//! Every [`Layer`](super::Layer) carries exactly one [`LayerKind`]. The
//! capabilities the registry needs from a variant (combinability, clustering,
//! the type of physical unit it renders through) are answered here by
//! pattern matching over the closed set of variants.

use alloc::string::String;
use alloc::vec::Vec;

use crate::unit::UnitKind;

/// Connection parameters of a WMS service.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WmsSource {
    /// Service endpoint.
    pub url: String,
    /// WMS `LAYERS` requested by this layer.
    pub layers: Vec<String>,
    /// Image format, e.g. `image/png`.
    pub format: String,
    /// Whether the service is asked for transparent images.
    pub transparent: bool,
    /// Requested projection, if not the map's.
    pub projection: Option<String>,
}

impl WmsSource {
    /// Returns whether `other` talks to the same service with the same
    /// request parameters, ignoring the requested `LAYERS`.
    #[must_use]
    pub fn same_service(&self, other: &Self) -> bool {
        self.url == other.url
            && self.format == other.format
            && self.transparent == other.transparent
            && self.projection == other.projection
    }
}

/// Connection parameters of a WMTS service.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WmtsSource {
    /// Service endpoint or tile URL template.
    pub url: String,
    /// Published layer identifier.
    pub layer: String,
    /// Tile matrix set identifier.
    pub matrix_set: String,
    /// Tile format.
    pub format: String,
}

/// Source of a vector tile layer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VectorTileSource {
    /// Tile URL template.
    pub url: String,
}

/// Source of a GeoJSON based layer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GeoJsonSource {
    /// Where features are loaded from. `None` for purely client-side data.
    pub url: Option<String>,
    /// Projection of the served data.
    pub data_projection: Option<String>,
    /// Whether point features are clustered.
    pub clustered: bool,
}

/// Source of a SensorThings telemetry layer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SensorSource {
    /// SensorThings API base URL.
    pub url: String,
    /// Whether locations are clustered.
    pub clustered: bool,
}

/// The closed set of layer variants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayerKind {
    /// Untiled WMS, one image per view.
    SingleTileWms(WmsSource),
    /// Tiled WMS.
    TiledWms(WmsSource),
    /// WMTS tiles.
    Wmts(WmtsSource),
    /// Vector tiles.
    VectorTile(VectorTileSource),
    /// GeoJSON loaded once.
    StaticGeoJson(GeoJsonSource),
    /// GeoJSON reloaded on demand, optionally clustered.
    DynamicGeoJson(GeoJsonSource),
    /// GeoJSON reloaded for the current bounding box.
    BboxGeoJson(GeoJsonSource),
    /// Features supplied by client code.
    Feature,
    /// SensorThings telemetry locations.
    SensorThings(SensorSource),
}

impl LayerKind {
    /// Returns whether a layer of this kind may share its physical unit with
    /// a subsequently added layer of kind `other`.
    ///
    /// Tiled and single-tile WMS layers combine with the same variant talking
    /// to the same service. Dynamic GeoJSON layers combine when they load the
    /// same URL with the same clustering. Nothing else combines.
    #[must_use]
    pub fn is_combinable(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::SingleTileWms(a), Self::SingleTileWms(b))
            | (Self::TiledWms(a), Self::TiledWms(b)) => a.same_service(b),
            (Self::DynamicGeoJson(a), Self::DynamicGeoJson(b)) => {
                a.url.is_some() && a.url == b.url && a.clustered == b.clustered
            }
            _ => false,
        }
    }

    /// Returns whether features of this layer are clustered.
    #[must_use]
    pub fn is_clustered(&self) -> bool {
        match self {
            Self::StaticGeoJson(source)
            | Self::DynamicGeoJson(source)
            | Self::BboxGeoJson(source) => source.clustered,
            Self::SensorThings(source) => source.clustered,
            _ => false,
        }
    }

    /// Returns the type of physical unit this layer renders through.
    #[must_use]
    pub fn unit_kind(&self) -> UnitKind {
        match self {
            Self::SingleTileWms(_) => UnitKind::Image,
            Self::TiledWms(_) | Self::Wmts(_) => UnitKind::Tile,
            Self::VectorTile(_) => UnitKind::VectorTile,
            _ if self.is_clustered() => UnitKind::Cluster,
            _ => UnitKind::Vector,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn wms(url: &str, layer: &str) -> WmsSource {
        WmsSource {
            url: url.into(),
            layers: vec![layer.into()],
            format: "image/png".into(),
            transparent: true,
            projection: None,
        }
    }

    fn geojson(url: Option<&str>, clustered: bool) -> GeoJsonSource {
        GeoJsonSource {
            url: url.map(Into::into),
            data_projection: None,
            clustered,
        }
    }

    #[test]
    fn wms_same_service_combines() {
        let a = LayerKind::TiledWms(wms("https://a.example/wms", "roads"));
        let b = LayerKind::TiledWms(wms("https://a.example/wms", "rivers"));
        assert!(a.is_combinable(&b));
    }

    #[test]
    fn wms_variants_do_not_mix() {
        let a = LayerKind::TiledWms(wms("https://a.example/wms", "roads"));
        let b = LayerKind::SingleTileWms(wms("https://a.example/wms", "rivers"));
        assert!(!a.is_combinable(&b));
    }

    #[test]
    fn wms_different_format_does_not_combine() {
        let a = LayerKind::SingleTileWms(wms("https://a.example/wms", "roads"));
        let mut other = wms("https://a.example/wms", "rivers");
        other.format = "image/jpeg".into();
        let b = LayerKind::SingleTileWms(other);
        assert!(!a.is_combinable(&b));
    }

    #[test]
    fn dynamic_geojson_requires_same_url_and_clustering() {
        let a = LayerKind::DynamicGeoJson(geojson(Some("/poi"), true));
        let b = LayerKind::DynamicGeoJson(geojson(Some("/poi"), true));
        let c = LayerKind::DynamicGeoJson(geojson(Some("/poi"), false));
        let d = LayerKind::DynamicGeoJson(geojson(None, true));
        assert!(a.is_combinable(&b));
        assert!(!a.is_combinable(&c));
        assert!(!d.is_combinable(&d.clone()));
    }

    #[test]
    fn vector_layers_never_combine() {
        let a = LayerKind::StaticGeoJson(geojson(Some("/x"), false));
        assert!(!a.is_combinable(&a.clone()));
        assert!(!LayerKind::Feature.is_combinable(&LayerKind::Feature));
    }

    #[test]
    fn unit_kind_follows_variant() {
        assert_eq!(
            LayerKind::SingleTileWms(WmsSource::default()).unit_kind(),
            UnitKind::Image
        );
        assert_eq!(
            LayerKind::Wmts(WmtsSource::default()).unit_kind(),
            UnitKind::Tile
        );
        assert_eq!(
            LayerKind::DynamicGeoJson(geojson(None, true)).unit_kind(),
            UnitKind::Cluster
        );
        assert_eq!(LayerKind::Feature.unit_kind(), UnitKind::Vector);
    }
}
