//! Inspection panel for the selected entity: activity toggle, parent
//! navigation, and one section per attached component.
//!
//! Component kinds are resolved once when the entity's components are
//! enumerated; the known kinds get fixed layouts, everything else falls
//! back to reflection-driven field editing.

use std::any::TypeId;
use std::collections::HashSet;
use std::panic::{AssertUnwindSafe, catch_unwind};

use avian3d::prelude::{Collider, ColliderDisabled, Sensor};
use bevy::ecs::relationship::Relationship;
use bevy::prelude::*;
use bevy::reflect::{PartialReflect, ReflectMut, ReflectRef};
use bevy_egui::egui;

use crate::fields;
use crate::fsm::StateMachine;
use crate::settings::InspectorSettings;
use crate::shell::InspectorState;
use crate::toggles::ToggleMap;
use crate::ui::theme::colors;
use crate::world::{FieldVisibility, StaticGeometry, entity_label, field_visibility};

/// Per-component expansion flags for the inspected entity. Changing the
/// selection clears every flag so state never leaks between entities.
#[derive(Resource, Default)]
pub struct ComponentToggles {
    owner: Option<Entity>,
    pub map: ToggleMap<TypeId>,
}

impl ComponentToggles {
    /// Reset the flags whenever the inspected entity changes.
    pub fn sync(&mut self, selected: Option<Entity>) {
        if self.owner != selected {
            self.map.clear();
            self.owner = selected;
        }
    }
}

/// Component types known to reject mutable reflection; probed once, then
/// rendered read-only without another panic check.
#[derive(Resource, Default)]
pub struct ImmutableComponentCache {
    immutable_types: HashSet<TypeId>,
}

/// Capability tag resolved once per component at enumeration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ComponentKind {
    Node,
    Machine,
    Light,
    Collider,
    Generic,
}

struct ComponentEntry {
    kind: ComponentKind,
    type_id: Option<TypeId>,
    name: String,
}

/// Deferred mutations collected while the panel draws.
enum PanelOp {
    Deselect,
    Select(Entity),
    SetActive(bool),
    OpenGraph(Entity),
}

/// Draw the inspection panel for the current selection.
pub fn draw_inspection_panel(world: &mut World, ctx: &egui::Context) {
    let Some(entity) = world.resource::<InspectorState>().selected else {
        return;
    };
    if world.get_entity(entity).is_err() {
        // The host despawned it between frames.
        world.resource_mut::<InspectorState>().selected = None;
        return;
    }

    let mut ops: Vec<PanelOp> = Vec::new();

    egui::SidePanel::right("inspection_panel")
        .default_width(340.0)
        .show(ctx, |ui| {
            let label = entity_label(world.get::<Name>(entity), entity);
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(&label)
                        .strong()
                        .color(colors::TEXT_PRIMARY),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Close").clicked() {
                        ops.push(PanelOp::Deselect);
                    }
                });
            });
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                if let Some(child_of) = world.get::<ChildOf>(entity) {
                    let parent = child_of.get();
                    if ui.button("Parent").clicked() {
                        ops.push(PanelOp::Select(parent));
                    }
                }

                if let Some(visibility) = world.get::<Visibility>(entity).copied() {
                    let mut active = visibility != Visibility::Hidden;
                    if ui.checkbox(&mut active, "Active").changed() {
                        ops.push(PanelOp::SetActive(active));
                    }
                }

                let (mut show_public, mut show_non_public) = {
                    let settings = world.resource::<InspectorSettings>();
                    (settings.show_public, settings.show_non_public)
                };
                ui.horizontal(|ui| {
                    let mut changed = ui.checkbox(&mut show_public, "Public").changed();
                    changed |= ui.checkbox(&mut show_non_public, "Non-public").changed();
                    if changed {
                        let mut settings = world.resource_mut::<InspectorSettings>();
                        settings.show_public = show_public;
                        settings.show_non_public = show_non_public;
                        settings.save();
                    }
                });
                ui.separator();

                for entry in enumerate_components(world, entity) {
                    match entry.kind {
                        ComponentKind::Node => node_section(ui, world, entity),
                        ComponentKind::Machine => machine_section(ui, world, entity, &mut ops),
                        ComponentKind::Light => light_section(ui, world, entity),
                        ComponentKind::Collider => collider_section(ui, world, entity),
                        ComponentKind::Generic => {
                            generic_section(ui, world, entity, &entry, show_public, show_non_public)
                        }
                    }
                    ui.add_space(2.0);
                }
            });
        });

    for op in ops {
        match op {
            PanelOp::Deselect => world.resource_mut::<InspectorState>().selected = None,
            PanelOp::Select(target) => {
                world.resource_mut::<InspectorState>().selected = Some(target)
            }
            PanelOp::SetActive(active) => {
                if let Some(mut visibility) = world.get_mut::<Visibility>(entity) {
                    *visibility = if active {
                        Visibility::Inherited
                    } else {
                        Visibility::Hidden
                    };
                }
            }
            PanelOp::OpenGraph(target) => {
                let id = world
                    .resource_mut::<crate::sessions::SessionRegistry>()
                    .open_or_focus(target);
                debug!("graph editor session {id} for {target:?}");
            }
        }
    }
}

/// Resolve each attached component to its capability tag, once.
fn enumerate_components(world: &World, entity: Entity) -> Vec<ComponentEntry> {
    let registry = world.resource::<AppTypeRegistry>().clone();
    let registry = registry.read();
    let Ok(infos) = world.inspect_entity(entity) else {
        return Vec::new();
    };

    infos
        .map(|info| {
            let type_id = info.type_id();
            let kind = match type_id {
                Some(id) if id == TypeId::of::<Transform>() => ComponentKind::Node,
                Some(id) if id == TypeId::of::<StateMachine>() => ComponentKind::Machine,
                Some(id)
                    if id == TypeId::of::<PointLight>()
                        || id == TypeId::of::<SpotLight>()
                        || id == TypeId::of::<DirectionalLight>() =>
                {
                    ComponentKind::Light
                }
                Some(id) if id == TypeId::of::<Collider>() => ComponentKind::Collider,
                _ => ComponentKind::Generic,
            };
            let name = type_id
                .and_then(|id| registry.get(id))
                .map(|r| r.type_info().type_path_table().short_path().to_string())
                .unwrap_or_else(|| format!("{:?}", info.name()));
            ComponentEntry {
                kind,
                type_id,
                name,
            }
        })
        .collect()
}

fn section_header(ui: &mut egui::Ui, name: &str) {
    ui.label(
        egui::RichText::new(name)
            .strong()
            .color(colors::TEXT_PRIMARY),
    );
}

/// Transform section: position, rotation as Euler degrees, scale. Any
/// scale edit means the entity's geometry can no longer be assumed
/// static, so the marker comes off.
fn node_section(ui: &mut egui::Ui, world: &mut World, entity: Entity) {
    let mut scale_touched = false;

    {
        let Some(mut transform) = world.get_mut::<Transform>(entity) else {
            return;
        };
        section_header(ui, "Transform");
        ui.label(
            egui::RichText::new(format!("{entity:?}"))
                .small()
                .color(colors::TEXT_MUTED),
        );

        let mut translation = transform.translation;
        if vector_row(ui, "Position", &mut translation) {
            transform.translation = translation;
        }

        let (x, y, z) = transform.rotation.to_euler(EulerRot::XYZ);
        let mut euler = Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees());
        if vector_row(ui, "Rotation", &mut euler) {
            transform.rotation = Quat::from_euler(
                EulerRot::XYZ,
                euler.x.to_radians(),
                euler.y.to_radians(),
                euler.z.to_radians(),
            );
        }

        let mut scale = transform.scale;
        if vector_row(ui, "Scale", &mut scale) {
            transform.scale = scale;
            scale_touched = true;
        }
    }

    if scale_touched {
        world.entity_mut(entity).remove::<StaticGeometry>();
    }
}

/// Three axis fields sharing the numeric parse-or-keep policy.
fn vector_row(ui: &mut egui::Ui, name: &str, value: &mut Vec3) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(name).color(colors::TEXT_SECONDARY));
        changed |= axis_field(ui, "X", colors::AXIS_X, &mut value.x);
        changed |= axis_field(ui, "Y", colors::AXIS_Y, &mut value.y);
        changed |= axis_field(ui, "Z", colors::AXIS_Z, &mut value.z);
    });
    changed
}

fn axis_field(ui: &mut egui::Ui, axis: &str, color: egui::Color32, value: &mut f32) -> bool {
    ui.label(egui::RichText::new(axis).color(color).strong());
    let mut text = value.to_string();
    if ui
        .add(egui::TextEdit::singleline(&mut text).desired_width(56.0))
        .changed()
    {
        return fields::commit::<f32>(value, &text, "number").unwrap_or(false);
    }
    false
}

fn machine_section(ui: &mut egui::Ui, world: &mut World, entity: Entity, ops: &mut Vec<PanelOp>) {
    let Some(machine) = world.get::<StateMachine>(entity) else {
        return;
    };
    section_header(ui, "StateMachine");
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(&machine.name).color(colors::TEXT_SECONDARY));
        ui.label(
            egui::RichText::new(format!("{} states", machine.states.len()))
                .small()
                .color(colors::TEXT_MUTED),
        );
        if ui.button("Edit graph").clicked() {
            ops.push(PanelOp::OpenGraph(entity));
        }
    });
}

fn light_section(ui: &mut egui::Ui, world: &mut World, entity: Entity) {
    if let Some(mut light) = world.get_mut::<PointLight>(entity) {
        section_header(ui, "PointLight");
        fields::edit_field(ui, "intensity", &mut light.intensity);
        fields::edit_field(ui, "shadow bias", &mut light.shadow_depth_bias);
    } else if let Some(mut light) = world.get_mut::<SpotLight>(entity) {
        section_header(ui, "SpotLight");
        fields::edit_field(ui, "intensity", &mut light.intensity);
        fields::edit_field(ui, "shadow bias", &mut light.shadow_depth_bias);
    } else if let Some(mut light) = world.get_mut::<DirectionalLight>(entity) {
        section_header(ui, "DirectionalLight");
        fields::edit_field(ui, "illuminance", &mut light.illuminance);
        fields::edit_field(ui, "shadow bias", &mut light.shadow_depth_bias);
    }
}

fn collider_section(ui: &mut egui::Ui, world: &mut World, entity: Entity) {
    if world.get::<Collider>(entity).is_none() {
        return;
    }
    section_header(ui, "Collider");
    let enabled = world.get::<ColliderDisabled>(entity).is_none();
    let sensor = world.get::<Sensor>(entity).is_some();
    fields::readonly_field(ui, "enabled", if enabled { "true" } else { "false" });
    fields::readonly_field(ui, "sensor", if sensor { "true" } else { "false" });
}

/// Reflection fallback for everything without a fixed layout.
fn generic_section(
    ui: &mut egui::Ui,
    world: &mut World,
    entity: Entity,
    entry: &ComponentEntry,
    show_public: bool,
    show_non_public: bool,
) {
    let Some(type_id) = entry.type_id else {
        ui.label(egui::RichText::new(&entry.name).color(colors::TEXT_MUTED));
        return;
    };

    let expanded = world.resource::<ComponentToggles>().map.get(&type_id);
    ui.horizontal(|ui| {
        let glyph = if expanded { "v" } else { ">" };
        if ui
            .add(egui::Button::new(glyph).min_size(egui::vec2(18.0, 0.0)))
            .clicked()
        {
            world.resource_mut::<ComponentToggles>().map.toggle(type_id);
        }
        ui.label(egui::RichText::new(&entry.name).color(colors::TEXT_PRIMARY));
    });
    if !expanded {
        return;
    }

    ui.indent(("component_fields", type_id), |ui| {
        reflected_fields(ui, world, entity, type_id, show_public, show_non_public);
    });
}

fn reflected_fields(
    ui: &mut egui::Ui,
    world: &mut World,
    entity: Entity,
    type_id: TypeId,
    show_public: bool,
    show_non_public: bool,
) {
    let registry = world.resource::<AppTypeRegistry>().clone();
    let registry = registry.read();
    let Some(registration) = registry.get(type_id) else {
        fields::fallback_label(ui, "(not registered for reflection)");
        return;
    };
    let Some(reflect_component) = registration.data::<ReflectComponent>().cloned() else {
        fields::fallback_label(ui, "(no component reflection)");
        return;
    };

    let known_immutable = world
        .resource::<ImmutableComponentCache>()
        .immutable_types
        .contains(&type_id);
    let mutable = !known_immutable && probe_mutable(world, entity, &reflect_component);
    if !mutable && !known_immutable {
        world
            .resource_mut::<ImmutableComponentCache>()
            .immutable_types
            .insert(type_id);
    }

    let shows = |visibility: FieldVisibility| match visibility {
        FieldVisibility::Public => show_public,
        FieldVisibility::NonPublic => show_non_public,
    };

    if mutable {
        let Some(mut reflected) = reflect_component.reflect_mut(world.entity_mut(entity)) else {
            return;
        };
        let value: &mut dyn PartialReflect = reflected.as_partial_reflect_mut();
        match value.reflect_mut() {
            ReflectMut::Struct(s) => {
                for index in 0..s.field_len() {
                    if !shows(field_visibility(registration, index)) {
                        continue;
                    }
                    let name = s.name_at(index).unwrap_or("?").to_string();
                    match s.field_at_mut(index) {
                        Some(field) => {
                            fields::edit_field(ui, &name, field);
                        }
                        None => {
                            fields::fallback_label(ui, &name);
                        }
                    }
                }
            }
            _ => {
                // Non-struct components get a value-level control.
                fields::edit_value(ui, value);
            }
        }
    } else {
        let Some(reflected) = reflect_component.reflect(world.entity(entity)) else {
            return;
        };
        ui.label(
            egui::RichText::new("(read-only)")
                .small()
                .color(colors::ACCENT_ORANGE),
        );
        match reflected.as_partial_reflect().reflect_ref() {
            ReflectRef::Struct(s) => {
                for index in 0..s.field_len() {
                    if !shows(field_visibility(registration, index)) {
                        continue;
                    }
                    let name = s.name_at(index).unwrap_or("?");
                    match s.field_at(index) {
                        Some(field) => {
                            fields::readonly_field(ui, name, &fields::display_string(field))
                        }
                        None => {
                            fields::fallback_label(ui, name);
                        }
                    }
                }
            }
            _ => {
                ui.label(
                    egui::RichText::new(fields::display_string(
                        reflected.as_partial_reflect(),
                    ))
                    .color(colors::TEXT_MUTED),
                );
            }
        }
    }
}

/// Whether the component accepts mutable reflection. Immutable component
/// types panic inside `reflect_mut`, so the first probe per type runs
/// under `catch_unwind` and the result is cached.
fn probe_mutable(world: &mut World, entity: Entity, reflect: &ReflectComponent) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        let _ = reflect.reflect_mut(world.entity_mut(entity));
    }))
    .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changing_selection_clears_component_toggles() {
        let mut world = World::new();
        let first = world.spawn_empty().id();
        let second = world.spawn_empty().id();

        let mut toggles = ComponentToggles::default();
        toggles.sync(Some(first));
        toggles.map.set(TypeId::of::<Transform>(), true);

        // Same selection keeps the flags.
        toggles.sync(Some(first));
        assert!(toggles.map.get(&TypeId::of::<Transform>()));

        // A new selection starts from the default collapsed state.
        toggles.sync(Some(second));
        assert!(!toggles.map.get(&TypeId::of::<Transform>()));
        assert!(toggles.map.is_empty());
    }

    #[test]
    fn reselecting_after_navigation_starts_collapsed() {
        let mut world = World::new();
        let first = world.spawn_empty().id();
        let second = world.spawn_empty().id();

        let mut toggles = ComponentToggles::default();
        toggles.sync(Some(first));
        toggles.map.set(TypeId::of::<Transform>(), true);
        toggles.sync(Some(second));
        toggles.sync(Some(first));
        assert!(!toggles.map.get(&TypeId::of::<Transform>()));
    }
}
