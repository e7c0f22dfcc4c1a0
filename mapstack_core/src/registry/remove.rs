// Copyright 2026 the Mapstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer and group removal.

use alloc::borrow::ToOwned;

use crate::dirty;
use crate::layer::{Category, GroupId, LayerId};
use crate::surface::Surface;
use crate::trace::{GroupEvent, LayerEvent};
use crate::zorder::OverlayEntry;

use super::Registry;

impl<S: Surface> Registry<S> {
    /// Removes an overlay layer or group.
    ///
    /// Removing a group removes all of its members. Removing a grouped layer
    /// takes it out of its group, and a group left without members is
    /// removed as well. Units left without constituents are detached and
    /// dropped; shared units stay attached for their remaining layers.
    ///
    /// Names of removed group members (unless they are catalog layers) and
    /// of removed groups (unless the group is a catalog group) are appended
    /// to [`deleted_overlay_layers`](Self::deleted_overlay_layers).
    ///
    /// Returns `false` if the entry is not an overlay layer or group of this
    /// registry.
    pub fn remove_overlay_layer(&mut self, entry: impl Into<OverlayEntry>) -> bool {
        let removed = match entry.into() {
            OverlayEntry::Group(g) => self.remove_group(g),
            OverlayEntry::Layer(id) => self.remove_overlay_member(id),
        };
        if removed {
            self.restack();
        }
        removed
    }

    /// Removes a system layer. Returns `false` if it is not one.
    pub fn remove_system_layer(&mut self, id: LayerId) -> bool {
        let Some(pos) = self.system_layers.iter().position(|&l| l == id) else {
            return false;
        };
        self.system_layers.remove(pos);
        self.release_layer(id);
        self.finish_removal(id, Category::System);
        self.flush_surface();
        true
    }

    /// Removes overlay layers and groups by name.
    ///
    /// Each name is resolved against the layer index first, then the group
    /// index. Returns the number of entries removed.
    pub fn delete_layers<T: AsRef<str>>(&mut self, names: &[T]) -> usize {
        let mut removed = 0;
        for name in names {
            let name = name.as_ref();
            let done = if let Some(id) = self.layer_by_name(name) {
                self.remove_overlay_layer(id)
            } else if let Some(g) = self.group_by_name(name) {
                self.remove_overlay_layer(g)
            } else {
                false
            };
            if done {
                removed += 1;
            }
        }
        removed
    }

    fn remove_overlay_member(&mut self, id: LayerId) -> bool {
        let Some(layer) = self.layers.get(id) else {
            return false;
        };
        if !layer.registered || layer.category != Category::Overlay {
            return false;
        }
        let catalog_layer = layer.catalog_layer();
        let name = layer.name().map(str::to_owned);

        let direct = self
            .overlay_layers
            .iter()
            .position(|&e| e == OverlayEntry::Layer(id));
        let group = self.overlay_layers.iter().find_map(|&e| match e {
            OverlayEntry::Group(g) if self.groups.get(g).is_some_and(|g| g.layers.contains(&id)) => {
                Some(g)
            }
            _ => None,
        });
        if direct.is_none() && group.is_none() {
            return false;
        }

        if let Some(pos) = direct {
            self.overlay_layers.remove(pos);
        }
        self.release_layer(id);

        if let Some(g) = group {
            let now_empty = match self.groups.get_mut(g) {
                Some(group) => {
                    group.layers.retain(|&l| l != id);
                    group.layers.is_empty()
                }
                None => false,
            };
            if !catalog_layer && let Some(name) = name {
                self.deleted_overlay_layers.push(name);
            }
            if now_empty {
                self.remove_group(g);
            }
        }

        self.finish_removal(id, Category::Overlay);
        true
    }

    fn remove_group(&mut self, g: GroupId) -> bool {
        let Some(pos) = self
            .overlay_layers
            .iter()
            .position(|&e| e == OverlayEntry::Group(g))
        else {
            return false;
        };
        self.overlay_layers.remove(pos);

        let Some(group) = self.groups.remove(g) else {
            return false;
        };
        if self.name_groups.get(group.name()) == Some(&g) {
            self.name_groups.remove(group.name());
        }
        if !group.catalog_layer() {
            self.deleted_overlay_layers.push(group.name().to_owned());
        }

        for &id in group.layers() {
            self.release_layer(id);
            if !group.catalog_layer()
                && let Some(name) = self.layers.get(id).and_then(|l| l.name())
            {
                self.deleted_overlay_layers.push(name.to_owned());
            }
            self.finish_removal(id, Category::Overlay);
        }

        self.tracer.group_removed(&GroupEvent {
            group: g,
            name: group.name(),
            members: group.layers().len(),
        });
        true
    }

    /// Detaches a layer from its unit and the indices, leaving the layer
    /// itself in storage.
    ///
    /// A unit left without constituents is detached and dropped. Otherwise
    /// the unit forgets the layer, and a sole remaining constituent is no
    /// longer marked combined.
    fn release_layer(&mut self, id: LayerId) {
        self.added_layers.retain(|&l| l != id);
        let Some(layer) = self.layers.get_mut(id) else {
            return;
        };
        layer.registered = false;
        layer.combined = false;
        let unit_id = layer.unit.take();
        if let Some(name) = layer.name()
            && self.name_layers.get(name) == Some(&id)
        {
            self.name_layers.remove(name);
        }

        let Some(unit_id) = unit_id else {
            return;
        };
        let Some(unit) = self.units.get_mut(unit_id) else {
            return;
        };
        unit.layers.retain(|&l| l != id);
        if unit.layers.is_empty() {
            self.drop_unit(unit_id);
            return;
        }
        if unit.last_layer == id
            && let Some(&last) = unit.layers.last()
        {
            unit.last_layer = last;
        }
        let sole = (unit.layers.len() == 1).then(|| unit.layers[0]);
        let attached = unit.attached;
        if attached {
            self.units.mark(unit_id, dirty::MEMBERSHIP);
        }
        if let Some(sole) = sole
            && let Some(layer) = self.layers.get_mut(sole)
        {
            layer.combined = false;
        }
        self.refresh_unit_visibility(unit_id);
    }

    /// Runs the remove handlers for a released layer and frees its slot.
    fn finish_removal(&mut self, id: LayerId, category: Category) {
        if let Some(layer) = self.layers.get(id) {
            for handler in &mut self.remove_handlers {
                handler(layer);
            }
            self.tracer.layer_removed(&LayerEvent {
                layer: id,
                name: layer.name(),
                category,
            });
        }
        let _ = self.layers.remove(id);
    }
}

#[cfg(test)]
mod tests {
    use alloc::borrow::ToOwned;
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use crate::layer::{GeoJsonSource, Group, Layer, LayerKind, UnitId};
    use crate::registry::Registry;
    use crate::surface::Surface;
    use crate::unit::RenderUnit;
    use crate::zorder::OverlayEntry;

    #[derive(Default)]
    struct Log {
        added: Vec<UnitId>,
        removed: Vec<UnitId>,
    }

    struct LogSurface(Rc<RefCell<Log>>);

    impl Surface for LogSurface {
        fn add_unit(&mut self, id: UnitId, _unit: &RenderUnit) {
            self.0.borrow_mut().added.push(id);
        }

        fn remove_unit(&mut self, id: UnitId) {
            self.0.borrow_mut().removed.push(id);
        }
    }

    fn vector(name: &str) -> Layer {
        Layer::new(LayerKind::StaticGeoJson(GeoJsonSource::default())).with_name(name)
    }

    fn dynamic(name: &str) -> Layer {
        Layer::new(LayerKind::DynamicGeoJson(GeoJsonSource {
            url: Some("/poi".into()),
            data_projection: None,
            clustered: false,
        }))
        .with_name(name)
    }

    #[test]
    fn removing_absent_entries_returns_false() {
        let mut reg: Registry<LogSurface> = Registry::new();
        let a = reg.create_layer(vector("a"));
        let g = reg.create_group(Group::new("g"));
        assert!(!reg.remove_overlay_layer(a));
        assert!(!reg.remove_overlay_layer(g));
        assert!(!reg.remove_system_layer(a));
    }

    #[test]
    fn standalone_layer_removal_detaches_unit() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut reg: Registry<LogSurface> = Registry::new();
        reg.register_surface(LogSurface(Rc::clone(&log)));
        let a = reg.create_layer(vector("a"));
        reg.add_overlay_layer(a, None);
        let unit = reg.layer(a).and_then(Layer::unit).unwrap();

        assert!(reg.remove_overlay_layer(a));
        assert_eq!(log.borrow().removed, vec![unit]);
        assert!(reg.overlay_layers().is_empty());
        assert!(reg.layer_by_name("a").is_none());
        assert!(reg.layer(a).is_none(), "removed handle must be stale");
        assert!(reg.attached_units().is_empty());
    }

    #[test]
    fn last_member_removal_prunes_group() {
        let mut reg: Registry<LogSurface> = Registry::new();
        let a = reg.create_layer(vector("a"));
        let g = reg.create_group(Group::new("g").with_layers([a]));
        reg.add_overlay_layer(g, None);

        assert!(reg.remove_overlay_layer(a));
        assert!(reg.overlay_layers().is_empty());
        assert!(reg.group_by_name("g").is_none());
        assert_eq!(reg.deleted_overlay_layers(), &["a", "g"]);
    }

    #[test]
    fn group_removal_logs_members_after_group() {
        let mut reg: Registry<LogSurface> = Registry::new();
        let a = reg.create_layer(vector("a"));
        let b = reg.create_layer(vector("b"));
        let g = reg.create_group(Group::new("g").with_layers([a, b]));
        reg.add_overlay_layer(g, None);

        assert!(reg.remove_overlay_layer(g));
        assert_eq!(reg.deleted_overlay_layers(), &["g", "a", "b"]);
        assert!(reg.layer_by_name("a").is_none());
        reg.reset_deleted_overlay_layers();
        assert!(reg.deleted_overlay_layers().is_empty());
    }

    #[test]
    fn catalog_group_is_not_logged() {
        let mut reg: Registry<LogSurface> = Registry::new();
        let a = reg.create_layer(vector("a"));
        let g = reg.create_group(Group::new("g").with_layers([a]).with_catalog_layer(true));
        reg.add_overlay_layer(g, None);
        reg.remove_overlay_layer(g);
        assert!(reg.deleted_overlay_layers().is_empty());
    }

    #[test]
    fn shared_unit_survives_partial_removal() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut reg: Registry<LogSurface> = Registry::new();
        reg.register_surface(LogSurface(Rc::clone(&log)));
        let a = reg.create_layer(dynamic("a"));
        let b = reg.create_layer(dynamic("b"));
        let g = reg.create_group(Group::new("g").with_layers([a, b]));
        reg.add_overlay_layer(g, None);
        let unit = reg.layer(a).and_then(Layer::unit).unwrap();
        assert_eq!(reg.layer(b).and_then(Layer::unit), Some(unit));

        assert!(reg.remove_overlay_layer(a));
        assert!(log.borrow().removed.is_empty());
        assert_eq!(reg.unit(unit).unwrap().layers(), &[b]);
        assert!(!reg.layer(b).unwrap().combined());

        assert!(reg.remove_overlay_layer(b));
        assert_eq!(log.borrow().removed, vec![unit]);
        assert!(reg.unit(unit).is_none());
        assert!(reg.overlay_layers().is_empty());
    }

    #[test]
    fn remove_handlers_see_each_member() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut reg: Registry<LogSurface> = Registry::new();
        let sink = Rc::clone(&seen);
        reg.register_remove_layer_handler(move |layer| {
            sink.borrow_mut().push(layer.name().unwrap_or_default().to_owned());
        });
        let a = reg.create_layer(vector("a"));
        let b = reg.create_layer(vector("b"));
        let g = reg.create_group(Group::new("g").with_layers([a, b]));
        reg.add_overlay_layer(g, None);
        reg.remove_overlay_layer(g);
        assert_eq!(*seen.borrow(), ["a", "b"]);
    }

    #[test]
    fn delete_layers_resolves_layers_then_groups() {
        let mut reg: Registry<LogSurface> = Registry::new();
        let a = reg.create_layer(vector("a"));
        let b = reg.create_layer(vector("b"));
        let g = reg.create_group(Group::new("g").with_layers([b]));
        reg.add_overlay_layer(a, None);
        reg.add_overlay_layer(g, None);

        assert_eq!(reg.delete_layers(&["a", "g", "missing"]), 2);
        assert!(reg.overlay_layers().is_empty());
    }

    #[test]
    fn stale_name_index_is_not_cleared_by_older_layer() {
        let mut reg: Registry<LogSurface> = Registry::new();
        let old = reg.create_layer(vector("dup"));
        let new = reg.create_layer(vector("dup"));
        reg.add_overlay_layer(old, None);
        reg.add_overlay_layer(new, None);
        assert_eq!(reg.layer_by_name("dup"), Some(new));

        reg.remove_overlay_layer(old);
        assert_eq!(reg.layer_by_name("dup"), Some(new));
        assert_eq!(reg.overlay_layers(), &[OverlayEntry::Layer(new)]);
    }

    #[test]
    fn system_layer_removal() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut reg: Registry<LogSurface> = Registry::new();
        let s = reg.create_layer(vector("markers"));
        reg.add_system_layer(s, None);
        reg.register_surface(LogSurface(Rc::clone(&log)));
        assert_eq!(log.borrow().added.len(), 1);

        assert!(reg.remove_system_layer(s));
        assert_eq!(log.borrow().removed.len(), 1);
        assert!(reg.system_layers().is_empty());
        assert!(reg.added_layers().is_empty());
    }
}
