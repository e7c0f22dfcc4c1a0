// Copyright 2026 the Mapstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registry configuration and layer configuration records.
//!
//! [`RegistryConfig`] tunes the registry itself. [`LayerConfig`],
//! [`GroupConfig`], and [`DrawLayerConfig`] are the records an application
//! reads from its map configuration (typically JSON via `serde_json`); a
//! [`LayerFactory`] turns them into [`Layer`] values that
//! [`Registry::init_background_layers`](crate::registry::Registry::init_background_layers)
//! and friends hand to the registry.

use alloc::string::String;
use alloc::vec::Vec;

use core::fmt;

use kurbo::Rect;
use serde::Deserialize;

use crate::layer::{
    GeoJsonSource, Layer, LayerKind, SensorSource, VectorTileSource, WmsSource, WmtsSource,
};

/// Projection of features served for draw layers.
pub const DRAW_LAYER_PROJECTION: &str = "EPSG:25832";

/// Configuration for a [`Registry`](crate::registry::Registry).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegistryConfig {
    /// Distance in pixels within which clustered features are merged.
    pub cluster_distance: f64,
}

impl RegistryConfig {
    /// The default configuration.
    pub const DEFAULT: Self = Self {
        cluster_distance: 50.0,
    };

    /// Returns the default configuration with a different cluster distance.
    #[must_use]
    pub const fn with_cluster_distance(cluster_distance: f64) -> Self {
        Self { cluster_distance }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A single layer as described in map configuration.
///
/// `type` selects the variant: `wms`, `tiledwms`, `wmts`, `vectortile`,
/// `static_geojson` (alias `digitize`), `dynamic_geojson`, `bbox_geojson`,
/// `feature`, or `sensorthings`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LayerConfig {
    /// Variant selector.
    #[serde(rename = "type")]
    pub kind: String,
    /// Lookup name.
    #[serde(default)]
    pub name: Option<String>,
    /// Display title.
    #[serde(default)]
    pub title: Option<String>,
    /// Initial visibility.
    #[serde(default)]
    pub visible: bool,
    /// Service or data URL.
    #[serde(default)]
    pub url: Option<String>,
    /// WMS `LAYERS`.
    #[serde(default)]
    pub layers: Vec<String>,
    /// WMTS layer identifier.
    #[serde(default)]
    pub layer: Option<String>,
    /// Image or tile format.
    #[serde(default = "default_format")]
    pub format: String,
    /// Whether WMS images are requested transparent.
    #[serde(default = "default_true")]
    pub transparent: bool,
    /// Requested projection for WMS requests.
    #[serde(default)]
    pub projection: Option<String>,
    /// WMTS tile matrix set.
    #[serde(default)]
    pub matrix_set: Option<String>,
    /// Projection of served GeoJSON.
    #[serde(default)]
    pub data_projection: Option<String>,
    /// Whether point features are clustered.
    #[serde(default)]
    pub clustered: bool,
    /// Data extent as `[min_x, min_y, max_x, max_y]`.
    #[serde(default)]
    pub extent: Option<[f64; 4]>,
    /// Whether the layer comes from a read-only catalog.
    #[serde(default)]
    pub catalog_layer: bool,
    /// Whether the layer is listed in layer switchers.
    #[serde(default = "default_true")]
    pub display_in_switcher: bool,
}

/// An overlay group as described in map configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GroupConfig {
    /// Group name.
    pub name: String,
    /// Display title.
    #[serde(default)]
    pub title: Option<String>,
    /// Member layers, top first.
    #[serde(default)]
    pub layers: Vec<LayerConfig>,
    /// One visible member at a time.
    #[serde(default)]
    pub single_select: bool,
    /// Showing a member hides other single-select groups.
    #[serde(default)]
    pub single_select_group: bool,
    /// Whether the group comes from a read-only catalog.
    #[serde(default)]
    pub catalog_layer: bool,
}

/// A user-editable draw layer as described in map configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DrawLayerConfig {
    /// Lookup name.
    pub name: String,
    /// Display title.
    #[serde(default)]
    pub title: Option<String>,
    /// Where features are loaded from and saved to.
    #[serde(default)]
    pub url: Option<String>,
    /// Geometry type the layer accepts, e.g. `Point`.
    #[serde(default)]
    pub geom_type: Option<String>,
}

fn default_format() -> String {
    "image/png".into()
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a configuration record could not be turned into a layer or group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FactoryError {
    /// The `type` of a layer record is not supported.
    UnknownType(String),
    /// A field the variant needs is missing.
    MissingSource {
        /// Name of the offending layer, if it has one.
        layer: Option<String>,
        /// The missing field.
        field: &'static str,
    },
    /// None of a group's member records produced a layer.
    EmptyGroup(String),
}

impl fmt::Display for FactoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownType(kind) => write!(f, "unknown layer type `{kind}`"),
            Self::MissingSource { layer, field } => match layer {
                Some(name) => write!(f, "layer `{name}` is missing `{field}`"),
                None => write!(f, "unnamed layer is missing `{field}`"),
            },
            Self::EmptyGroup(name) => write!(f, "group `{name}` has no usable layers"),
        }
    }
}

impl core::error::Error for FactoryError {}

impl FactoryError {
    /// Returns the name of the record the error refers to, if known.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::UnknownType(_) => None,
            Self::MissingSource { layer, .. } => layer.as_deref(),
            Self::EmptyGroup(name) => Some(name),
        }
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Turns configuration records into layers.
pub trait LayerFactory {
    /// Builds a layer from a layer record.
    fn build_layer(&self, config: &LayerConfig) -> Result<Layer, FactoryError>;

    /// Builds an editable draw layer.
    ///
    /// Draw layers are static GeoJSON in [`DRAW_LAYER_PROJECTION`], editable,
    /// saveable, and hidden from layer switchers.
    fn build_draw_layer(&self, config: &DrawLayerConfig) -> Result<Layer, FactoryError> {
        let url = config.url.clone().ok_or_else(|| FactoryError::MissingSource {
            layer: Some(config.name.clone()),
            field: "url",
        })?;
        let mut layer = Layer::new(LayerKind::StaticGeoJson(GeoJsonSource {
            url: Some(url),
            data_projection: Some(DRAW_LAYER_PROJECTION.into()),
            clustered: false,
        }))
        .with_name(config.name.clone())
        .with_display_in_switcher(false)
        .with_editing(true, true);
        if let Some(title) = &config.title {
            layer = layer.with_title(title.clone());
        }
        Ok(layer)
    }
}

/// The default [`LayerFactory`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ConfigFactory;

impl ConfigFactory {
    fn required(
        config: &LayerConfig,
        value: Option<&String>,
        field: &'static str,
    ) -> Result<String, FactoryError> {
        value.cloned().ok_or_else(|| FactoryError::MissingSource {
            layer: config.name.clone(),
            field,
        })
    }

    fn wms(config: &LayerConfig) -> Result<WmsSource, FactoryError> {
        Ok(WmsSource {
            url: Self::required(config, config.url.as_ref(), "url")?,
            layers: config.layers.clone(),
            format: config.format.clone(),
            transparent: config.transparent,
            projection: config.projection.clone(),
        })
    }

    fn geojson(config: &LayerConfig) -> GeoJsonSource {
        GeoJsonSource {
            url: config.url.clone(),
            data_projection: config.data_projection.clone(),
            clustered: config.clustered,
        }
    }
}

impl LayerFactory for ConfigFactory {
    fn build_layer(&self, config: &LayerConfig) -> Result<Layer, FactoryError> {
        let kind = match config.kind.as_str() {
            "wms" => LayerKind::SingleTileWms(Self::wms(config)?),
            "tiledwms" => LayerKind::TiledWms(Self::wms(config)?),
            "wmts" => LayerKind::Wmts(WmtsSource {
                url: Self::required(config, config.url.as_ref(), "url")?,
                layer: Self::required(config, config.layer.as_ref(), "layer")?,
                matrix_set: config.matrix_set.clone().unwrap_or_default(),
                format: config.format.clone(),
            }),
            "vectortile" => LayerKind::VectorTile(VectorTileSource {
                url: Self::required(config, config.url.as_ref(), "url")?,
            }),
            "static_geojson" | "digitize" => LayerKind::StaticGeoJson(Self::geojson(config)),
            "dynamic_geojson" => LayerKind::DynamicGeoJson(Self::geojson(config)),
            "bbox_geojson" => LayerKind::BboxGeoJson(Self::geojson(config)),
            "feature" => LayerKind::Feature,
            "sensorthings" => LayerKind::SensorThings(SensorSource {
                url: Self::required(config, config.url.as_ref(), "url")?,
                clustered: config.clustered,
            }),
            other => return Err(FactoryError::UnknownType(other.into())),
        };

        let mut layer = Layer::new(kind)
            .with_visible(config.visible)
            .with_catalog_layer(config.catalog_layer)
            .with_display_in_switcher(config.display_in_switcher);
        if let Some(name) = &config.name {
            layer = layer.with_name(name.clone());
        }
        if let Some(title) = &config.title {
            layer = layer.with_title(title.clone());
        }
        if let Some([x0, y0, x1, y1]) = config.extent {
            layer = layer.with_extent(Rect::new(x0, y0, x1, y1));
        }
        Ok(layer)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use super::*;

    fn parse(json: &str) -> LayerConfig {
        serde_json::from_str(json).expect("valid layer record")
    }

    #[test]
    fn default_cluster_distance() {
        assert_eq!(RegistryConfig::default().cluster_distance, 50.0);
    }

    #[test]
    fn wms_record_builds_single_tile_layer() {
        let config = parse(
            r#"{"type": "wms", "name": "roads", "url": "https://wms.example", "layers": ["roads"], "visible": true}"#,
        );
        let layer = ConfigFactory.build_layer(&config).unwrap();
        assert_eq!(layer.name(), Some("roads"));
        assert!(layer.visible());
        match layer.kind() {
            LayerKind::SingleTileWms(source) => {
                assert_eq!(source.format, "image/png");
                assert!(source.transparent);
                assert_eq!(source.layers, vec!["roads".to_string()]);
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn digitize_is_static_geojson() {
        let config = parse(r#"{"type": "digitize", "name": "sketch"}"#);
        let layer = ConfigFactory.build_layer(&config).unwrap();
        assert!(matches!(layer.kind(), LayerKind::StaticGeoJson(_)));
    }

    #[test]
    fn extent_becomes_rect() {
        let config = parse(r#"{"type": "bbox_geojson", "extent": [0.0, 1.0, 10.0, 11.0]}"#);
        let layer = ConfigFactory.build_layer(&config).unwrap();
        assert_eq!(layer.extent(), Some(Rect::new(0.0, 1.0, 10.0, 11.0)));
    }

    #[test]
    fn unknown_type_is_rejected() {
        let config = parse(r#"{"type": "kml", "name": "x"}"#);
        assert_eq!(
            ConfigFactory.build_layer(&config).unwrap_err(),
            FactoryError::UnknownType("kml".into())
        );
    }

    #[test]
    fn wms_without_url_is_rejected() {
        let config = parse(r#"{"type": "tiledwms", "name": "roads"}"#);
        let err = ConfigFactory.build_layer(&config).unwrap_err();
        assert_eq!(err.name(), Some("roads"));
        assert_eq!(err.to_string(), "layer `roads` is missing `url`");
    }

    #[test]
    fn draw_layer_defaults() {
        let config: DrawLayerConfig =
            serde_json::from_str(r#"{"name": "notes", "url": "/draw/notes", "geom_type": "Point"}"#)
                .unwrap();
        let layer = ConfigFactory.build_draw_layer(&config).unwrap();
        assert!(layer.editable());
        assert!(layer.saveable());
        assert!(!layer.display_in_switcher());
        match layer.kind() {
            LayerKind::StaticGeoJson(source) => {
                assert_eq!(source.data_projection.as_deref(), Some(DRAW_LAYER_PROJECTION));
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn draw_layer_without_url_is_rejected() {
        let config = DrawLayerConfig {
            name: "notes".into(),
            ..DrawLayerConfig::default()
        };
        assert!(ConfigFactory.build_draw_layer(&config).is_err());
    }

    #[test]
    fn group_record_parses_members() {
        let config: GroupConfig = serde_json::from_str(
            r#"{"name": "cadastre", "single_select": true, "layers": [{"type": "feature", "name": "a"}]}"#,
        )
        .unwrap();
        assert_eq!(config.layers.len(), 1);
        assert!(config.single_select);
        assert!(!config.catalog_layer);
    }
}
