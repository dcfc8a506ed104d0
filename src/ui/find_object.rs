//! Quick-find palette: fuzzy search over every named entity, selecting
//! straight into the inspection panel.

use bevy::ecs::system::SystemState;
use bevy::prelude::*;
use bevy_egui::egui;
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::shell::InspectorState;
use crate::ui::theme::colors;

#[derive(Resource, Default)]
pub struct FindState {
    pub open: bool,
    pub query: String,
    pub selected_index: usize,
    just_opened: bool,
}

impl FindState {
    pub fn request_open(&mut self) {
        self.open = true;
        self.query.clear();
        self.selected_index = 0;
        self.just_opened = true;
    }
}

/// Candidate entry for the palette.
pub struct FindEntry {
    pub entity: Entity,
    pub name: String,
}

/// Score and sort entries against the query; an empty query keeps the
/// original order.
pub fn filter_entries<'a>(entries: &'a [FindEntry], query: &str) -> Vec<(&'a FindEntry, i64)> {
    if query.is_empty() {
        return entries.iter().map(|e| (e, 0i64)).collect();
    }
    let matcher = SkimMatcherV2::default();
    let mut results: Vec<(&FindEntry, i64)> = entries
        .iter()
        .filter_map(|e| matcher.fuzzy_match(&e.name, query).map(|score| (e, score)))
        .collect();
    results.sort_by(|a, b| b.1.cmp(&a.1));
    results
}

/// Draw the palette window when open.
pub fn draw_find_palette(world: &mut World, ctx: &egui::Context) {
    let mut system_state: SystemState<(
        Query<(Entity, &Name)>,
        ResMut<FindState>,
        ResMut<InspectorState>,
    )> = SystemState::new(world);
    let (named, mut state, mut inspector) = system_state.get_mut(world);

    if !state.open {
        return;
    }

    let entries: Vec<FindEntry> = named
        .iter()
        .map(|(entity, name)| FindEntry {
            entity,
            name: name.as_str().to_string(),
        })
        .collect();
    let filtered = filter_entries(&entries, &state.query);

    if !filtered.is_empty() {
        state.selected_index = state.selected_index.min(filtered.len() - 1);
    }

    let enter = ctx.input(|i| i.key_pressed(egui::Key::Enter));
    let escape = ctx.input(|i| i.key_pressed(egui::Key::Escape));
    let down = ctx.input(|i| i.key_pressed(egui::Key::ArrowDown));
    let up = ctx.input(|i| i.key_pressed(egui::Key::ArrowUp));

    let mut should_close = escape;
    let mut pick: Option<Entity> = None;

    if enter {
        if let Some((entry, _)) = filtered.get(state.selected_index) {
            pick = Some(entry.entity);
        }
        should_close = true;
    }
    if down && !filtered.is_empty() {
        state.selected_index = (state.selected_index + 1).min(filtered.len() - 1);
    }
    if up {
        state.selected_index = state.selected_index.saturating_sub(1);
    }

    egui::Window::new("Find Entity")
        .collapsible(false)
        .resizable(false)
        .title_bar(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([380.0, 280.0])
        .show(ctx, |ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut state.query)
                    .hint_text("Search entities...")
                    .desired_width(f32::INFINITY),
            );
            if state.just_opened {
                response.request_focus();
                state.just_opened = false;
            }
            ui.separator();

            egui::ScrollArea::vertical().max_height(220.0).show(ui, |ui| {
                if filtered.is_empty() {
                    ui.label(egui::RichText::new("No matches").color(colors::TEXT_MUTED));
                }
                for (index, (entry, _)) in filtered.iter().enumerate() {
                    let is_selected = index == state.selected_index;
                    let response = ui.selectable_label(
                        is_selected,
                        egui::RichText::new(&entry.name).color(if is_selected {
                            colors::TEXT_PRIMARY
                        } else {
                            colors::TEXT_SECONDARY
                        }),
                    );
                    if response.clicked() {
                        pick = Some(entry.entity);
                        should_close = true;
                    }
                    if is_selected {
                        response.scroll_to_me(Some(egui::Align::Center));
                    }
                }
            });

            ui.separator();
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new("Enter selects, Esc closes")
                        .small()
                        .color(colors::TEXT_MUTED),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new(format!("{} entities", entries.len()))
                            .small()
                            .color(colors::TEXT_MUTED),
                    );
                });
            });
        });

    if let Some(entity) = pick {
        inspector.selected = Some(entity);
    }
    if should_close {
        state.open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<FindEntry> {
        let mut world = World::new();
        ["Door", "Window", "DoorFrame"]
            .into_iter()
            .map(|name| FindEntry {
                entity: world.spawn_empty().id(),
                name: name.to_string(),
            })
            .collect()
    }

    #[test]
    fn empty_query_keeps_every_entry_in_order() {
        let entries = entries();
        let filtered = filter_entries(&entries, "");
        let names: Vec<&str> = filtered.iter().map(|(e, _)| e.name.as_str()).collect();
        assert_eq!(names, ["Door", "Window", "DoorFrame"]);
    }

    #[test]
    fn query_drops_non_matches() {
        let entries = entries();
        let filtered = filter_entries(&entries, "door");
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|(e, _)| e.name.contains("Door")));
    }
}
