// Copyright 2026 the Mapstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction from layer lists and configuration records.

use alloc::vec::Vec;

use crate::config::{
    DrawLayerConfig, FactoryError, GroupConfig, LayerConfig, LayerFactory, RegistryConfig,
};
use crate::layer::{Category, Group, GroupId, Layer, LayerId};
use crate::surface::Surface;
use crate::trace::{WarningEvent, WarningKind};

use super::Registry;

/// The outcome of turning a batch of configuration records into entities.
///
/// `ids` keep the order of the records that produced them. Rejected records
/// are reported in `errors` and otherwise skipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Loaded<T> {
    /// Handles of the created layers or groups.
    pub ids: Vec<T>,
    /// Records that could not be turned into an entity.
    pub errors: Vec<FactoryError>,
}

impl<T> Default for Loaded<T> {
    fn default() -> Self {
        Self {
            ids: Vec::new(),
            errors: Vec::new(),
        }
    }
}

impl<T> Loaded<T> {
    /// Returns whether every record was accepted.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

impl<S: Surface> Registry<S> {
    /// Creates a registry populated from an initial layer list.
    ///
    /// Each layer goes to the list named by its [`Category`]. Overlay layers
    /// keep their list order, first on top. Afterwards exactly one background
    /// layer is visible: the first visible one, or the first one if none is.
    #[must_use]
    pub fn with_layers(config: RegistryConfig, layers: impl IntoIterator<Item = Layer>) -> Self {
        let mut registry = Self::with_config(config);
        for layer in layers {
            let category = layer.category();
            let id = registry.create_layer(layer);
            match category {
                Category::Background => {
                    registry.add_background_layer(id, None);
                }
                Category::Overlay => {
                    let index = registry.overlay_layers.len();
                    registry.add_overlay_layer(id, Some(index));
                }
                Category::System => {
                    let index = registry.system_layers.len();
                    registry.add_system_layer(id, Some(index));
                }
            }
        }
        registry.settle_background_layers();
        registry.restack();
        registry
    }

    /// Creates background layers from configuration records.
    ///
    /// The layers are stored but not added; feed the returned ids to
    /// [`add_background_layer`](Self::add_background_layer).
    pub fn init_background_layers(
        &mut self,
        factory: &impl LayerFactory,
        records: &[LayerConfig],
    ) -> Loaded<LayerId> {
        let mut loaded = Loaded::default();
        for record in records {
            match factory.build_layer(record) {
                Ok(layer) => loaded
                    .ids
                    .push(self.create_layer(layer.with_category(Category::Background))),
                Err(err) => self.reject(&mut loaded.errors, err, None),
            }
        }
        loaded
    }

    /// Creates overlay groups, with their member layers, from configuration
    /// records.
    ///
    /// Every overlay record describes a group. Member records that cannot be
    /// built are skipped; a group left without members is not created. Feed
    /// the returned ids to [`add_overlay_layer`](Self::add_overlay_layer).
    pub fn init_overlay_layers(
        &mut self,
        factory: &impl LayerFactory,
        records: &[GroupConfig],
    ) -> Loaded<GroupId> {
        let mut loaded = Loaded::default();
        for record in records {
            let mut members = Vec::new();
            for member in &record.layers {
                match factory.build_layer(member) {
                    Ok(layer) => members.push(layer),
                    Err(err) => {
                        self.reject(&mut loaded.errors, err, Some(record.name.as_str()));
                    }
                }
            }
            if members.is_empty() {
                let err = FactoryError::EmptyGroup(record.name.clone());
                self.reject(&mut loaded.errors, err, None);
                continue;
            }

            let ids: Vec<LayerId> = members
                .into_iter()
                .map(|layer| self.create_layer(layer.with_category(Category::Overlay)))
                .collect();
            let mut group = Group::new(record.name.clone())
                .with_layers(ids)
                .with_selection(record.single_select, record.single_select_group)
                .with_catalog_layer(record.catalog_layer);
            if let Some(title) = &record.title {
                group = group.with_title(title.clone());
            }
            loaded.ids.push(self.create_group(group));
        }
        loaded
    }

    /// Creates draw layers from configuration records.
    ///
    /// Draw layers are overlay layers; feed the returned ids to
    /// [`add_overlay_layer`](Self::add_overlay_layer).
    pub fn init_draw_layers(
        &mut self,
        factory: &impl LayerFactory,
        records: &[DrawLayerConfig],
    ) -> Loaded<LayerId> {
        let mut loaded = Loaded::default();
        for record in records {
            match factory.build_draw_layer(record) {
                Ok(layer) => loaded
                    .ids
                    .push(self.create_layer(layer.with_category(Category::Overlay))),
                Err(err) => self.reject(&mut loaded.errors, err, None),
            }
        }
        loaded
    }

    /// Leaves exactly one background layer visible.
    fn settle_background_layers(&mut self) {
        let Some(&first) = self.background_layers.first() else {
            return;
        };
        let active = self
            .background_layers
            .iter()
            .copied()
            .find(|&id| self.layers.get(id).is_some_and(Layer::visible))
            .unwrap_or(first);
        self.activate_background_layer(active);
    }

    fn reject(&mut self, errors: &mut Vec<FactoryError>, err: FactoryError, group: Option<&str>) {
        self.tracer.warning(&WarningEvent {
            kind: WarningKind::RejectedRecord,
            name: err.name(),
            group,
        });
        errors.push(err);
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::vec;

    use kurbo::Rect;

    use super::*;
    use crate::config::ConfigFactory;
    use crate::layer::{GeoJsonSource, LayerKind, UnitId, WmsSource};
    use crate::unit::RenderUnit;
    use crate::zorder::OverlayEntry;

    struct NoSurface;

    impl Surface for NoSurface {
        fn add_unit(&mut self, _id: UnitId, _unit: &RenderUnit) {}
        fn remove_unit(&mut self, _id: UnitId) {}
    }

    fn base(name: &str, visible: bool) -> Layer {
        Layer::new(LayerKind::SingleTileWms(WmsSource {
            url: format!("https://{name}.example/wms"),
            layers: vec![name.into()],
            format: "image/png".into(),
            transparent: false,
            projection: None,
        }))
        .with_name(name)
        .with_visible(visible)
        .with_category(Category::Background)
    }

    fn overlay(name: &str) -> Layer {
        Layer::new(LayerKind::StaticGeoJson(GeoJsonSource::default())).with_name(name)
    }

    fn records(json: &str) -> Vec<GroupConfig> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn first_visible_background_wins() {
        let reg: Registry<NoSurface> = Registry::with_layers(
            RegistryConfig::default(),
            [base("osm", false), base("aerial", true), base("topo", true)],
        );
        let aerial = reg.layer_by_name("aerial");
        assert_eq!(reg.active_background_layer(), aerial);
        let visible = reg
            .background_layers()
            .iter()
            .filter(|&&id| reg.layer(id).is_some_and(Layer::visible))
            .count();
        assert_eq!(visible, 1);
    }

    #[test]
    fn first_background_is_shown_when_none_visible() {
        let reg: Registry<NoSurface> = Registry::with_layers(
            RegistryConfig::default(),
            [base("osm", false), base("aerial", false)],
        );
        assert_eq!(reg.active_background_layer(), reg.layer_by_name("osm"));
    }

    #[test]
    fn overlay_layers_keep_list_order() {
        let reg: Registry<NoSurface> = Registry::with_layers(
            RegistryConfig::default(),
            [overlay("a"), overlay("b"), overlay("c")],
        );
        let names: Vec<_> = reg
            .overlay_layers()
            .iter()
            .map(|e| match *e {
                OverlayEntry::Layer(id) => reg.layer(id).and_then(Layer::name).unwrap_or_default(),
                OverlayEntry::Group(_) => "",
            })
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
        let z = reg.z_order();
        let top = reg.layer_by_name("a").and_then(|id| reg.layer(id)?.unit());
        assert_eq!(top.and_then(|u| z.get(u)), Some(2));
    }

    #[test]
    fn overlay_records_become_collapsed_groups() {
        let mut reg: Registry<NoSurface> = Registry::new();
        let loaded = reg.init_overlay_layers(
            &ConfigFactory,
            &records(
                r#"[{
                    "name": "water",
                    "title": "Water",
                    "single_select": true,
                    "layers": [
                        {"type": "static_geojson", "name": "rivers"},
                        {"type": "heatmap", "name": "bogus"},
                        {"type": "static_geojson", "name": "lakes", "extent": [0, 0, 10, 10]}
                    ]
                }]"#,
            ),
        );
        assert_eq!(loaded.ids.len(), 1);
        assert_eq!(loaded.errors, [FactoryError::UnknownType("heatmap".into())]);

        let group = reg.group(loaded.ids[0]).unwrap();
        assert!(group.collapsed());
        assert!(group.single_select());
        assert_eq!(group.title(), Some("Water"));
        assert_eq!(group.layers().len(), 2);
        let lakes = reg.layer(group.layers()[1]).unwrap();
        assert_eq!(lakes.extent(), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert_eq!(lakes.category(), Category::Overlay);
    }

    #[test]
    fn group_without_usable_members_is_not_created() {
        let mut reg: Registry<NoSurface> = Registry::new();
        let loaded = reg.init_overlay_layers(
            &ConfigFactory,
            &records(r#"[{"name": "broken", "layers": [{"type": "heatmap"}]}]"#),
        );
        assert!(loaded.ids.is_empty());
        assert_eq!(
            loaded.errors.last(),
            Some(&FactoryError::EmptyGroup("broken".into()))
        );
        assert!(!loaded.is_clean());
    }

    #[test]
    fn background_records_are_tagged_background() {
        let mut reg: Registry<NoSurface> = Registry::new();
        let records: Vec<LayerConfig> = serde_json::from_str(
            r#"[{"type": "wms", "name": "osm", "url": "https://osm.example/wms", "layers": ["osm"]}]"#,
        )
        .unwrap();
        let loaded = reg.init_background_layers(&ConfigFactory, &records);
        assert!(loaded.is_clean());
        let id = loaded.ids[0];
        assert_eq!(reg.layer(id).unwrap().category(), Category::Background);
        assert!(reg.background_layers().is_empty(), "init must not add");
        assert!(reg.add_background_layer(id, None));
    }

    #[test]
    fn draw_layers_are_editable_overlays() {
        let mut reg: Registry<NoSurface> = Registry::new();
        let loaded = reg.init_draw_layers(
            &ConfigFactory,
            &[DrawLayerConfig {
                name: "sketch".into(),
                title: None,
                url: Some("/draw".into()),
                geom_type: None,
            }],
        );
        let layer = reg.layer(loaded.ids[0]).unwrap();
        assert!(layer.editable());
        assert!(layer.saveable());
        assert!(!layer.display_in_switcher());
        assert_eq!(layer.category(), Category::Overlay);
    }
}
