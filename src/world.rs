//! Glue between the overlay and the host world: marker components and
//! small helpers for reading entities the way the panels need them.

use bevy::prelude::*;
use bevy::reflect::TypeRegistration;
use bevy::reflect::serde::SerializationData;

/// Marks geometry the host treats as immovable (baked bounds, merged
/// colliders, and the like). Editing an entity's scale at runtime
/// invalidates that assumption, so the inspection panel removes this
/// marker on any scale edit.
#[derive(Component, Default, Reflect)]
#[reflect(Component)]
pub struct StaticGeometry;

/// Which class of reflected fields a component section is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldVisibility {
    Public,
    NonPublic,
}

/// Classify one struct field of a registered type.
///
/// Fields the type excludes from serialization are the non-public class;
/// everything else reflected is public.
pub fn field_visibility(registration: &TypeRegistration, index: usize) -> FieldVisibility {
    match registration.data::<SerializationData>() {
        Some(data) if data.is_field_skipped(index) => FieldVisibility::NonPublic,
        _ => FieldVisibility::Public,
    }
}

/// Display name for an entity: its `Name` when present, otherwise the id.
pub fn entity_label(name: Option<&Name>, entity: Entity) -> String {
    name.map(|n| n.as_str().to_string())
        .unwrap_or_else(|| format!("Entity {entity:?}"))
}

/// Display name for a weakly-held entity, failing when the host has
/// despawned it since the last tick.
pub fn live_entity_label(world: &World, entity: Entity) -> Result<String, crate::fields::FieldError> {
    if world.get_entity(entity).is_err() {
        return Err(crate::fields::FieldError::Stale);
    }
    Ok(entity_label(world.get::<Name>(entity), entity))
}
