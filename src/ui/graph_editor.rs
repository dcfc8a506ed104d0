//! One window per open graph-editor session: a graph overview pane next
//! to a tabbed detail pane, plus the window-level session actions.
//!
//! Mutations that would conflict with the draw borrow (closing or cloning
//! sessions, navigating the inspection panel) are collected as ops during
//! the draw and applied afterwards.

use bevy::prelude::*;
use bevy_egui::egui;

use crate::fields;
use crate::fsm::{ActionValue, OwnerTarget, StateMachine, Transition, Variable};
use crate::sessions::{DetailTab, GraphSession, SessionId, SessionRegistry};
use crate::shell::InspectorState;
use crate::ui::theme::colors;
use crate::world::{entity_label, live_entity_label};

enum SessionOp {
    Close(SessionId),
    Clone(SessionId),
    Inspect(Entity),
}

/// Draw every session that is pinned or, when the shell is visible, all
/// of them.
pub fn draw_graph_windows(world: &mut World, ctx: &egui::Context, shell_visible: bool) {
    let Some(mut registry) = world.remove_resource::<SessionRegistry>() else {
        return;
    };
    registry.prune_detached();
    let mut ops: Vec<SessionOp> = Vec::new();

    for session in registry.iter_mut() {
        if !session.pinned && !shell_visible {
            continue;
        }
        draw_session(world, ctx, session, &mut ops);
    }

    world.insert_resource(registry);

    for op in ops {
        match op {
            SessionOp::Close(id) => world.resource_mut::<SessionRegistry>().close(id),
            SessionOp::Clone(id) => {
                world.resource_mut::<SessionRegistry>().clone_session(id);
            }
            SessionOp::Inspect(entity) => {
                world.resource_mut::<InspectorState>().selected = Some(entity);
            }
        }
    }
}

fn draw_session(
    world: &mut World,
    ctx: &egui::Context,
    session: &mut GraphSession,
    ops: &mut Vec<SessionOp>,
) {
    let Some(target) = session.target else {
        return;
    };

    // The machine lives in the host world; it can vanish between frames.
    let mut machine = world.get::<StateMachine>(target).cloned();
    let owner = match world.get_entity(target) {
        Ok(entity) => entity_label(entity.get::<Name>(), target),
        Err(_) => "(missing entity)".to_string(),
    };
    let title = match &machine {
        Some(m) => format!("Graph Editor {} - {} ({owner})", session.id, m.name),
        None => format!("Graph Editor {}", session.id),
    };

    egui::Window::new(title)
        .id(egui::Id::new(("graph_session", session.id)))
        .default_size([720.0, 460.0])
        .show(ctx, |ui| {
            let Some(machine) = machine.as_mut() else {
                ui.label(
                    egui::RichText::new("State machine no longer available")
                        .color(colors::TEXT_MUTED),
                );
                if ui.button("Close").clicked() {
                    ops.push(SessionOp::Close(session.id));
                }
                return;
            };

            ui.horizontal_top(|ui| {
                graph_pane(ui, session, machine);
                ui.separator();
                ui.vertical(|ui| {
                    tab_row(ui, session);
                    ui.separator();
                    match session.tab {
                        DetailTab::State => state_tab(ui, world, session, machine, ops),
                        DetailTab::Variables => variables_tab(ui, world, session, machine, ops),
                        DetailTab::Events => events_tab(ui, session, machine),
                    }
                });
            });

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Close").clicked() {
                    ops.push(SessionOp::Close(session.id));
                }
                if ui
                    .button(if session.pinned { "Unpin" } else { "Pin" })
                    .clicked()
                {
                    session.pinned = !session.pinned;
                }
                if ui.button("Clone").clicked() {
                    ops.push(SessionOp::Clone(session.id));
                }
                if ui.button("Inspect owner").clicked() {
                    ops.push(SessionOp::Inspect(target));
                }
            });
        });

    // Write edits back; untouched frames leave change detection alone.
    if let Some(edited) = machine {
        if let Some(mut current) = world.get_mut::<StateMachine>(target) {
            if *current != edited {
                *current = edited;
            }
        }
    }
}

/// Overview of every state with its outgoing transitions. Clicking a
/// state toggles focus; clicking a transition follows it when its target
/// resolves.
fn graph_pane(ui: &mut egui::Ui, session: &mut GraphSession, machine: &StateMachine) {
    let pane_width = (ui.available_width() * 0.4).max(180.0);
    let mut toggle_request: Option<String> = None;
    let mut follow_request: Option<String> = None;

    let output = egui::ScrollArea::vertical()
        .id_salt(("graph_pane", session.id))
        .max_height(360.0)
        .show(ui, |ui| {
            ui.set_width(pane_width);
            for state in &machine.states {
                let is_active = machine.active.as_deref() == Some(state.name.as_str());
                let is_focused = session.focus.as_deref() == Some(state.name.as_str());
                let color = match (is_focused, is_active) {
                    (true, true) => colors::STATE_FOCUSED_ACTIVE,
                    (true, false) => colors::STATE_FOCUSED,
                    (false, true) => colors::STATE_ACTIVE,
                    (false, false) => colors::STATE_IDLE,
                };
                let name = if is_focused {
                    format!("{} (edited)", state.name)
                } else {
                    state.name.clone()
                };
                if ui
                    .button(egui::RichText::new(name).color(color).strong())
                    .clicked()
                {
                    toggle_request = Some(state.name.clone());
                }
                for transition in &state.transitions {
                    if ui
                        .small_button(format!("{} -> {}", transition.event, transition.target))
                        .clicked()
                    {
                        follow_request = Some(transition.target.clone());
                    }
                }
                ui.add_space(6.0);
            }
        });
    session.graph_scroll = output.state.offset.y;

    if let Some(name) = toggle_request {
        session.toggle_focus(&name);
    }
    if let Some(target) = follow_request {
        session.follow(machine, &target);
    }
}

fn tab_row(ui: &mut egui::Ui, session: &mut GraphSession) {
    ui.horizontal(|ui| {
        for (tab, label) in [
            (DetailTab::State, "State"),
            (DetailTab::Variables, "Variables"),
            (DetailTab::Events, "Events"),
        ] {
            // Switching tabs never touches focus or history.
            if ui.selectable_label(session.tab == tab, label).clicked() {
                session.tab = tab;
            }
        }
    });
}

/// Focused state in edit mode; otherwise the host's running state as a
/// preview; otherwise nothing.
fn state_tab(
    ui: &mut egui::Ui,
    world: &World,
    session: &mut GraphSession,
    machine: &mut StateMachine,
    ops: &mut Vec<SessionOp>,
) {
    let (name, editing) = match session.focus.clone() {
        Some(name) => (name, true),
        None => match machine.active.clone() {
            Some(name) => (name, false),
            None => return,
        },
    };

    let mut go_back = false;
    ui.horizontal(|ui| {
        if session.has_previous() && ui.button("<").clicked() {
            go_back = true;
        }
        let caption = if editing {
            format!("{name} - edit")
        } else {
            format!("{name} - running preview")
        };
        ui.label(
            egui::RichText::new(caption).color(if editing {
                colors::TEXT_PRIMARY
            } else {
                colors::TEXT_MUTED
            }),
        );
    });
    if go_back {
        session.back();
        return;
    }

    let mut follow_request: Option<String> = None;
    let mut area = egui::ScrollArea::vertical().id_salt(("state_detail", session.id));
    if let Some(offset) = session.restore_state_scroll.take() {
        area = area.vertical_scroll_offset(offset);
    }
    let output = area.max_height(320.0).show(ui, |ui| {
        let variables = machine.variables.clone();
        let Some(state) = machine.state_mut(&name) else {
            ui.label(egui::RichText::new("(state not found)").color(colors::TEXT_MUTED));
            return;
        };
        let transitions = state.transitions.clone();

        for action in &mut state.actions {
            ui.label(
                egui::RichText::new(&action.name)
                    .strong()
                    .color(colors::TEXT_PRIMARY),
            );
            for field in &mut action.fields {
                match &mut field.value {
                    ActionValue::Bool(v) => {
                        fields::edit_field(ui, &field.name, v);
                    }
                    ActionValue::Int(v) => {
                        fields::edit_field(ui, &field.name, v);
                    }
                    ActionValue::Float(v) => {
                        fields::edit_field(ui, &field.name, v);
                    }
                    ActionValue::Text(v) => {
                        fields::edit_field(ui, &field.name, v);
                    }
                    ActionValue::Owner(owner) => {
                        owner_field(ui, world, &field.name, owner, ops);
                    }
                    ActionValue::Event(event) => {
                        event_field(ui, &field.name, event, &transitions, &mut follow_request);
                    }
                    ActionValue::Var(reference) => {
                        let value = variables
                            .value_of(reference)
                            .unwrap_or_else(|| "(undeclared)".to_string());
                        fields::readonly_field(
                            ui,
                            &field.name,
                            &format!("{}({}) = {}", reference.kind.tag(), reference.name, value),
                        );
                    }
                    ActionValue::Opaque(text) => {
                        fields::readonly_field(ui, &field.name, text);
                    }
                }
            }
            ui.add_space(4.0);
        }
    });
    session.state_scroll = output.state.offset.y;

    if let Some(target) = follow_request {
        session.follow(machine, &target);
    }
}

/// Owner-reference field: a link to the referenced entity, the owner
/// marker, or a placeholder for unset/despawned targets.
fn owner_field(
    ui: &mut egui::Ui,
    world: &World,
    name: &str,
    owner: &OwnerTarget,
    ops: &mut Vec<SessionOp>,
) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(name).color(colors::TEXT_SECONDARY));
        match owner {
            OwnerTarget::UseOwner => {
                ui.label(egui::RichText::new("Use owner").color(colors::TEXT_MUTED));
            }
            OwnerTarget::Target(None) => {
                ui.label(egui::RichText::new("(none)").color(colors::TEXT_MUTED));
            }
            OwnerTarget::Target(Some(entity)) => match live_entity_label(world, *entity) {
                Ok(label) => {
                    if ui.link(label).clicked() {
                        ops.push(SessionOp::Inspect(*entity));
                    }
                }
                Err(_) => {
                    ui.label(egui::RichText::new("(missing)").color(colors::TEXT_MUTED));
                }
            },
        }
    });
}

/// Event-reference field: resolve the event to this state's outgoing
/// transition; clicking follows the transition's target.
fn event_field(
    ui: &mut egui::Ui,
    name: &str,
    event: &str,
    transitions: &[Transition],
    follow_request: &mut Option<String>,
) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(name).color(colors::TEXT_SECONDARY));
        match transitions.iter().find(|t| t.event == event) {
            Some(transition) => {
                if ui
                    .button(format!("{} -> {}", event, transition.target))
                    .clicked()
                {
                    *follow_request = Some(transition.target.clone());
                }
            }
            None => {
                ui.label(
                    egui::RichText::new(format!("{event} (no transition)"))
                        .color(colors::TEXT_MUTED),
                );
            }
        }
    });
}

/// Every declared variable grouped by kind. Scalars edit in place;
/// geometric kinds display; entity references navigate.
fn variables_tab(
    ui: &mut egui::Ui,
    world: &World,
    session: &mut GraphSession,
    machine: &mut StateMachine,
    ops: &mut Vec<SessionOp>,
) {
    if machine.variables.is_empty() {
        ui.label(egui::RichText::new("No variables declared").color(colors::TEXT_MUTED));
        return;
    }

    let output = egui::ScrollArea::vertical()
        .id_salt(("variables", session.id))
        .max_height(320.0)
        .show(ui, |ui| {
            let vars = &mut machine.variables;
            for variable in &mut vars.floats {
                var_row(ui, "FLOAT", &variable.name, |ui| {
                    fields::edit_value(ui, &mut variable.value);
                });
            }
            for variable in &mut vars.ints {
                var_row(ui, "INT", &variable.name, |ui| {
                    fields::edit_value(ui, &mut variable.value);
                });
            }
            for variable in &mut vars.bools {
                var_row(ui, "BOOL", &variable.name, |ui| {
                    fields::edit_value(ui, &mut variable.value);
                });
            }
            for variable in &mut vars.texts {
                var_row(ui, "TEXT", &variable.name, |ui| {
                    fields::edit_value(ui, &mut variable.value);
                });
            }
            for variable in &vars.vec2s {
                display_var_row(ui, "VEC2", variable, |v| format!("({}, {})", v.x, v.y));
            }
            for variable in &vars.vec3s {
                display_var_row(ui, "VEC3", variable, |v| {
                    format!("({}, {}, {})", v.x, v.y, v.z)
                });
            }
            for variable in &vars.quats {
                display_var_row(ui, "QUAT", variable, |v| format!("{v:?}"));
            }
            for variable in &vars.rects {
                display_var_row(ui, "RECT", variable, |v| format!("{v:?}"));
            }
            for variable in &vars.colors {
                display_var_row(ui, "COLOR", variable, |v| format!("{v:?}"));
            }
            for variable in &vars.entities {
                var_row(ui, "ENTITY", &variable.name, |ui| match variable.value {
                    None => {
                        ui.label(egui::RichText::new("(none)").color(colors::TEXT_MUTED));
                    }
                    Some(entity) => match live_entity_label(world, entity) {
                        Ok(label) => {
                            if ui.link(label).clicked() {
                                ops.push(SessionOp::Inspect(entity));
                            }
                        }
                        Err(_) => {
                            ui.label(egui::RichText::new("(missing)").color(colors::TEXT_MUTED));
                        }
                    },
                });
            }
        });
    session.vars_scroll = output.state.offset.y;
}

fn var_row(ui: &mut egui::Ui, tag: &str, name: &str, value: impl FnOnce(&mut egui::Ui)) {
    ui.horizontal(|ui| {
        ui.add_sized(
            [56.0, 18.0],
            egui::Label::new(egui::RichText::new(tag).small().color(colors::ACCENT_BLUE)),
        );
        ui.add_sized(
            [120.0, 18.0],
            egui::Label::new(egui::RichText::new(name).color(colors::TEXT_SECONDARY)),
        );
        value(ui);
    });
}

fn display_var_row<T>(
    ui: &mut egui::Ui,
    tag: &str,
    variable: &Variable<T>,
    fmt: impl Fn(&T) -> String,
) {
    var_row(ui, tag, &variable.name, |ui| {
        ui.label(egui::RichText::new(fmt(&variable.value)).color(colors::TEXT_MUTED));
    });
}

/// Declared events with their global flag, then every global transition
/// with a clickable target.
fn events_tab(ui: &mut egui::Ui, session: &mut GraphSession, machine: &StateMachine) {
    let mut follow_request: Option<String> = None;

    let output = egui::ScrollArea::vertical()
        .id_salt(("events", session.id))
        .max_height(320.0)
        .show(ui, |ui| {
            if machine.events.is_empty() {
                ui.label(egui::RichText::new("No events declared").color(colors::TEXT_MUTED));
            }
            for event in &machine.events {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(&event.name).color(colors::TEXT_PRIMARY));
                    if event.global {
                        ui.label(
                            egui::RichText::new("GLOBAL")
                                .small()
                                .color(colors::ACCENT_ORANGE),
                        );
                    }
                });
            }

            ui.separator();
            ui.label(
                egui::RichText::new("Global transitions")
                    .strong()
                    .color(colors::TEXT_PRIMARY),
            );
            if machine.global_transitions.is_empty() {
                ui.label(egui::RichText::new("none").color(colors::TEXT_MUTED));
            }
            for transition in &machine.global_transitions {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(format!("on {} set state to", transition.event))
                            .color(colors::TEXT_SECONDARY),
                    );
                    if ui.button(&transition.target).clicked() {
                        follow_request = Some(transition.target.clone());
                    }
                });
            }
        });
    session.events_scroll = output.state.offset.y;

    if let Some(target) = follow_request {
        session.follow(machine, &target);
    }
}
