//! Top-level plugin and the per-frame driver.
//!
//! The whole overlay draws from one exclusive system so a single failure
//! boundary can wrap the frame: a panic anywhere in the pass is caught,
//! logged, and the rest of that frame's overlay dropped. The host never
//! sees the failure.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use bevy::prelude::*;
use bevy_egui::{EguiContext, EguiPlugin, EguiPrimaryContextPass, PrimaryEguiContext, egui};

use crate::fsm::StateMachine;
use crate::sessions::SessionRegistry;
use crate::settings::InspectorSettings;
use crate::ui::find_object::FindState;
use crate::ui::hierarchy::HierarchyState;
use crate::ui::inspector::{ComponentToggles, ImmutableComponentCache};
use crate::ui::theme::ThemeApplied;
use crate::ui::{find_object, graph_editor, hierarchy, inspector, theme};
use crate::world::StaticGeometry;

/// Overlay visibility and the currently inspected entity.
///
/// `visible` is the host-facing switch; pinned graph-editor windows keep
/// rendering while it is off.
#[derive(Resource, Default)]
pub struct InspectorState {
    pub visible: bool,
    pub selected: Option<Entity>,
}

impl InspectorState {
    /// Point the inspection panel at an entity.
    pub fn inspect(&mut self, entity: Entity) {
        self.selected = Some(entity);
    }
}

/// Adds the runtime inspector overlay to an app.
pub struct RuntimeInspectorPlugin;

impl Plugin for RuntimeInspectorPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<EguiPlugin>() {
            app.add_plugins(EguiPlugin::default());
        }
        app.insert_resource(InspectorSettings::load())
            .init_resource::<InspectorState>()
            .init_resource::<HierarchyState>()
            .init_resource::<ComponentToggles>()
            .init_resource::<ImmutableComponentCache>()
            .init_resource::<SessionRegistry>()
            .init_resource::<FindState>()
            .init_resource::<ThemeApplied>()
            .register_type::<StateMachine>()
            .register_type::<StaticGeometry>()
            .add_systems(Update, (theme::apply_theme, handle_hotkeys))
            .add_systems(EguiPrimaryContextPass, inspector_tick);
    }
}

/// F9 toggles the overlay; Ctrl+F opens the quick-find palette while the
/// overlay is up.
fn handle_hotkeys(
    keys: Res<ButtonInput<KeyCode>>,
    mut state: ResMut<InspectorState>,
    mut find: ResMut<FindState>,
) {
    if keys.just_pressed(KeyCode::F9) {
        state.visible = !state.visible;
        info!(
            "Inspector overlay: {}",
            if state.visible { "ON" } else { "OFF" }
        );
    }
    let ctrl = keys.pressed(KeyCode::ControlLeft) || keys.pressed(KeyCode::ControlRight);
    if state.visible && ctrl && keys.just_pressed(KeyCode::KeyF) {
        find.request_open();
    }
}

/// Per-frame overlay pass under the failure boundary.
pub fn inspector_tick(world: &mut World) {
    if let Err(payload) = catch_unwind(AssertUnwindSafe(|| run_tick(world))) {
        error!("inspector frame aborted: {}", panic_message(&*payload));
    }
}

fn run_tick(world: &mut World) {
    let Some(ctx) = primary_context(world) else {
        return;
    };

    sync_selection(world);

    let visible = world.resource::<InspectorState>().visible;
    if visible {
        hierarchy::draw_hierarchy(world, &ctx);
        find_object::draw_find_palette(world, &ctx);
        // Either panel may have just changed the selection; re-sync so
        // the inspection panel starts from default toggles.
        sync_selection(world);
        inspector::draw_inspection_panel(world, &ctx);
    }

    // Pinned sessions render even while the shell is hidden.
    graph_editor::draw_graph_windows(world, &ctx, visible);
}

/// Drop a selection the host despawned and keep per-component toggles
/// scoped to the current selection.
fn sync_selection(world: &mut World) {
    let selected = world.resource::<InspectorState>().selected;
    let selected = match selected {
        Some(entity) if world.get_entity(entity).is_err() => {
            world.resource_mut::<InspectorState>().selected = None;
            None
        }
        other => other,
    };
    world.resource_mut::<ComponentToggles>().sync(selected);
}

fn primary_context(world: &mut World) -> Option<egui::Context> {
    let mut query = world.query_filtered::<&mut EguiContext, With<PrimaryEguiContext>>();
    let mut context = query.single_mut(world).ok()?;
    Some(context.get_mut().clone())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_messages_unwrap_common_payloads() {
        let boxed: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(&*boxed), "boom");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("still boom"));
        assert_eq!(panic_message(&*boxed), "still boom");
        let boxed: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(&*boxed), "non-string panic payload");
    }
}
