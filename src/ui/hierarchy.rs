//! Searchable, collapsible tree over the live world.
//!
//! Search recomputes a cached root set: an empty keyword lists the
//! parentless entities; a non-empty keyword lists every entity whose name
//! matches, at any depth, flattening ancestry into a plain result list.
//! That flattening is deliberate and pinned by tests.

use bevy::ecs::system::SystemState;
use bevy::prelude::*;
use bevy_egui::egui;

use crate::settings::InspectorSettings;
use crate::shell::InspectorState;
use crate::toggles::ToggleMap;
use crate::ui::find_object::FindState;
use crate::ui::theme::colors;
use crate::world::entity_label;

/// Width reserved for the expand toggle so leaf rows line up.
const TOGGLE_WIDTH: f32 = 18.0;

/// Hierarchy panel state: the cached search results and per-entity
/// expansion flags. Expansion is cleared on every search.
#[derive(Resource, Default)]
pub struct HierarchyState {
    pub search: String,
    pub roots: Vec<Entity>,
    pub expanded: ToggleMap<Entity>,
    searched: bool,
}

/// One row snapshot used by the search pass.
pub struct HierarchyEntry {
    pub entity: Entity,
    pub name: String,
    pub has_parent: bool,
}

/// Substring match with optional case folding.
pub fn name_contains(name: &str, keyword: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        name.contains(keyword)
    } else {
        name.to_lowercase().contains(&keyword.to_lowercase())
    }
}

/// Exclusion filter: a non-empty filter hides any entry whose name
/// contains it, regardless of search state.
pub fn is_excluded(name: &str, filter: &str) -> bool {
    !filter.is_empty() && name.contains(filter)
}

/// Recompute the root set for a search.
///
/// Results are sorted ascending by name with ordinal (byte-wise)
/// comparison.
pub fn search_roots(
    entries: &[HierarchyEntry],
    keyword: &str,
    case_sensitive: bool,
) -> Vec<Entity> {
    let mut matched: Vec<&HierarchyEntry> = if keyword.is_empty() {
        entries.iter().filter(|e| !e.has_parent).collect()
    } else {
        entries
            .iter()
            .filter(|e| name_contains(&e.name, keyword, case_sensitive))
            .collect()
    };
    matched.sort_by(|a, b| a.name.cmp(&b.name));
    matched.into_iter().map(|e| e.entity).collect()
}

type EntityRow<'a> = (
    Entity,
    Option<&'a Name>,
    Option<&'a ChildOf>,
    Option<&'a Children>,
);

/// Draw the hierarchy side panel.
pub fn draw_hierarchy(world: &mut World, ctx: &egui::Context) {
    let mut system_state: SystemState<(
        Query<EntityRow>,
        ResMut<HierarchyState>,
        ResMut<InspectorState>,
        ResMut<InspectorSettings>,
        ResMut<FindState>,
    )> = SystemState::new(world);
    let (entities, mut state, mut inspector, mut settings, mut find) =
        system_state.get_mut(world);

    let mut run_search = !state.searched;
    let mut clicked: Option<Entity> = None;

    egui::SidePanel::left("inspector_hierarchy")
        .default_width(320.0)
        .show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new("Hierarchy")
                        .strong()
                        .color(colors::TEXT_PRIMARY),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Find").clicked() {
                        find.request_open();
                    }
                });
            });

            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut state.search)
                        .hint_text("Search by name...")
                        .desired_width(220.0),
                );
                if ui.button("Search").clicked() {
                    run_search = true;
                }
            });

            ui.horizontal(|ui| {
                if ui
                    .checkbox(&mut settings.case_sensitive, "Case sensitive")
                    .changed()
                {
                    settings.save();
                }
                ui.label(egui::RichText::new("Hide:").color(colors::TEXT_SECONDARY));
                let response = ui.add(
                    egui::TextEdit::singleline(&mut settings.exclude_filter).desired_width(90.0),
                );
                if response.lost_focus() {
                    settings.save();
                }
            });
            ui.separator();

            if run_search {
                let entries: Vec<HierarchyEntry> = entities
                    .iter()
                    .map(|(entity, name, parent, _)| HierarchyEntry {
                        entity,
                        name: entity_label(name, entity),
                        has_parent: parent.is_some(),
                    })
                    .collect();
                state.roots = search_roots(&entries, &state.search, settings.case_sensitive);
                state.expanded.clear();
                state.searched = true;
            }

            let roots = state.roots.clone();
            egui::ScrollArea::vertical().show(ui, |ui| {
                for root in roots {
                    draw_row(
                        ui,
                        root,
                        &entities,
                        &mut state.expanded,
                        &settings.exclude_filter,
                        inspector.selected,
                        &mut clicked,
                    );
                }
            });

            ui.separator();
            ui.label(
                egui::RichText::new(format!("{} entities", entities.iter().count()))
                    .small()
                    .color(colors::TEXT_MUTED),
            );
        });

    if let Some(entity) = clicked {
        inspector.selected = Some(entity);
    }
}

/// Draw one row and, when expanded, its children. Entities that vanished
/// since the last search are skipped.
fn draw_row(
    ui: &mut egui::Ui,
    entity: Entity,
    entities: &Query<EntityRow>,
    expanded: &mut ToggleMap<Entity>,
    exclude: &str,
    selected: Option<Entity>,
    clicked: &mut Option<Entity>,
) {
    let Ok((entity, name, _, children)) = entities.get(entity) else {
        return;
    };
    let label = entity_label(name, entity);
    if is_excluded(&label, exclude) {
        return;
    }

    let child_list: Vec<Entity> = children
        .map(|c| c.iter().collect())
        .unwrap_or_default();

    ui.horizontal(|ui| {
        if child_list.is_empty() {
            // Placeholder keeps leaves aligned with toggle buttons.
            ui.add_enabled(
                false,
                egui::Button::new(" ").min_size(egui::vec2(TOGGLE_WIDTH, 0.0)),
            );
        } else {
            let open = expanded.get(&entity);
            let glyph = if open { "v" } else { ">" };
            if ui
                .add(egui::Button::new(glyph).min_size(egui::vec2(TOGGLE_WIDTH, 0.0)))
                .clicked()
            {
                expanded.toggle(entity);
            }
        }

        let is_selected = selected == Some(entity);
        let color = if is_selected {
            colors::TEXT_PRIMARY
        } else {
            colors::TEXT_SECONDARY
        };
        if ui
            .selectable_label(is_selected, egui::RichText::new(&label).color(color))
            .clicked()
        {
            *clicked = Some(entity);
        }
    });

    if !child_list.is_empty() && expanded.get(&entity) {
        ui.indent(("hierarchy_children", entity), |ui| {
            for child in child_list {
                draw_row(ui, child, entities, expanded, exclude, selected, clicked);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Vec<HierarchyEntry> {
        let mut world = World::new();
        let mut entry = |name: &str, has_parent: bool| HierarchyEntry {
            entity: world.spawn_empty().id(),
            name: name.to_string(),
            has_parent,
        };
        vec![
            entry("Alpha", false),
            entry("beta", false),
            entry("Gamma", false),
            entry("beta child", true),
            entry("Foo", true),
            entry("foo", false),
        ]
    }

    fn names(entries: &[HierarchyEntry], result: &[Entity]) -> Vec<String> {
        result
            .iter()
            .map(|entity| {
                entries
                    .iter()
                    .find(|e| e.entity == *entity)
                    .unwrap()
                    .name
                    .clone()
            })
            .collect()
    }

    #[test]
    fn empty_keyword_lists_parentless_entities_in_ordinal_order() {
        let entries = fixture();
        let result = search_roots(&entries, "", false);
        // Ordinal comparison puts uppercase before lowercase.
        assert_eq!(names(&entries, &result), ["Alpha", "Gamma", "beta", "foo"]);
    }

    #[test]
    fn keyword_flattens_ancestry_into_matches_at_any_depth() {
        let entries = fixture();
        let result = search_roots(&entries, "beta", true);
        assert_eq!(names(&entries, &result), ["beta", "beta child"]);
    }

    #[test]
    fn case_insensitive_matches_are_a_superset_of_sensitive_ones() {
        let entries = fixture();
        let sensitive = search_roots(&entries, "foo", true);
        let insensitive = search_roots(&entries, "foo", false);
        assert_eq!(names(&entries, &sensitive), ["foo"]);
        assert_eq!(names(&entries, &insensitive), ["Foo", "foo"]);
        assert!(sensitive.iter().all(|e| insensitive.contains(e)));
    }

    #[test]
    fn exclusion_filter_hides_matching_names() {
        assert!(is_excluded("itemx_4", "itemx"));
        assert!(!is_excluded("player", "itemx"));
        // Empty filter hides nothing.
        assert!(!is_excluded("itemx_4", ""));
    }
}
