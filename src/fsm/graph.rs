use bevy::prelude::*;

use super::variables::{VariableKind, Variables};

/// Declarative structure of one state machine.
///
/// Attach to any entity; the graph editor finds it there and identifies
/// the graph by its owning entity.
#[derive(Component, Clone, Debug, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct StateMachine {
    pub name: String,
    /// Name of the state the host reports as currently running.
    /// Host-written; the editor only previews it.
    pub active: Option<String>,
    pub states: Vec<State>,
    pub events: Vec<EventDef>,
    pub global_transitions: Vec<GlobalTransition>,
    pub variables: Variables,
}

impl StateMachine {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Resolve a state by name. Transitions naming a state that does not
    /// exist resolve to `None` and render as inert labels.
    pub fn state(&self, name: &str) -> Option<&State> {
        self.states.iter().find(|s| s.name == name)
    }

    pub fn state_mut(&mut self, name: &str) -> Option<&mut State> {
        self.states.iter_mut().find(|s| s.name == name)
    }

    /// The host-reported running state, if it resolves.
    pub fn active_state(&self) -> Option<&State> {
        self.active.as_deref().and_then(|name| self.state(name))
    }

    pub fn with_state(mut self, state: State) -> Self {
        self.states.push(state);
        self
    }

    pub fn with_event(mut self, name: impl Into<String>, global: bool) -> Self {
        self.events.push(EventDef {
            name: name.into(),
            global,
        });
        self
    }

    pub fn with_global_transition(
        mut self,
        event: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.global_transitions.push(GlobalTransition {
            event: event.into(),
            target: target.into(),
        });
        self
    }
}

/// One node in the graph: ordered outgoing transitions plus the ordered
/// actions the host runs while the state is active.
#[derive(Clone, Debug, Default, PartialEq, Reflect)]
pub struct State {
    pub name: String,
    pub transitions: Vec<Transition>,
    pub actions: Vec<Action>,
}

impl State {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_transition(mut self, event: impl Into<String>, target: impl Into<String>) -> Self {
        self.transitions.push(Transition {
            event: event.into(),
            target: target.into(),
        });
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Linear search for the transition fired by `event`.
    pub fn transition_for(&self, event: &str) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.event == event)
    }
}

/// Edge from a state: when `event` fires, go to the state named `target`.
#[derive(Clone, Debug, PartialEq, Reflect)]
pub struct Transition {
    pub event: String,
    pub target: String,
}

/// A declared event the graph reacts to.
#[derive(Clone, Debug, PartialEq, Reflect)]
pub struct EventDef {
    pub name: String,
    /// Global events can be raised from outside the owning machine.
    pub global: bool,
}

/// Transition taken on `event` from any state.
#[derive(Clone, Debug, PartialEq, Reflect)]
pub struct GlobalTransition {
    pub event: String,
    pub target: String,
}

/// One unit of behavior inside a state, exposing its parameters as named
/// fields the editor can render and edit.
#[derive(Clone, Debug, Default, PartialEq, Reflect)]
pub struct Action {
    pub name: String,
    pub fields: Vec<ActionField>,
}

impl Action {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: ActionValue) -> Self {
        self.fields.push(ActionField {
            name: name.into(),
            value,
        });
        self
    }
}

#[derive(Clone, Debug, PartialEq, Reflect)]
pub struct ActionField {
    pub name: String,
    pub value: ActionValue,
}

/// Closed set of action parameter kinds. Scalars edit through the shared
/// field editor; the reference kinds get structural handling (links,
/// transition lookups) in the graph editor.
#[derive(Clone, Debug, PartialEq, Reflect)]
pub enum ActionValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Text(String),
    /// Which entity the action operates on.
    Owner(OwnerTarget),
    /// An event this action can raise, rendered as a link to the
    /// transition it would fire from the current state.
    Event(String),
    /// Reference to a declared graph variable.
    Var(VariableRef),
    /// Anything the editor has no structure for; display only.
    Opaque(String),
}

/// Target of an owner-reference field.
#[derive(Clone, Debug, PartialEq, Reflect)]
pub enum OwnerTarget {
    /// The entity owning the machine.
    UseOwner,
    /// An explicit entity, possibly unset or despawned.
    Target(Option<Entity>),
}

/// Name plus declared kind of a referenced graph variable.
#[derive(Clone, Debug, PartialEq, Reflect)]
pub struct VariableRef {
    pub kind: VariableKind,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn door() -> StateMachine {
        StateMachine::new("Door")
            .with_state(
                State::new("Closed")
                    .with_transition("OPEN", "Open")
                    .with_transition("LOCK", "Locked"),
            )
            .with_state(State::new("Open").with_transition("CLOSE", "Closed"))
            .with_event("OPEN", false)
            .with_event("RESET", true)
            .with_global_transition("RESET", "Closed")
    }

    #[test]
    fn resolves_states_by_name() {
        let machine = door();
        assert!(machine.state("Open").is_some());
        assert!(machine.state("Locked").is_none());
    }

    #[test]
    fn dangling_transition_target_resolves_to_none() {
        let machine = door();
        let closed = machine.state("Closed").unwrap();
        let locked = closed.transition_for("LOCK").unwrap();
        assert!(machine.state(&locked.target).is_none());
    }

    #[test]
    fn active_state_follows_host_report() {
        let mut machine = door();
        assert!(machine.active_state().is_none());
        machine.active = Some("Open".into());
        assert_eq!(machine.active_state().unwrap().name, "Open");
        machine.active = Some("Gone".into());
        assert!(machine.active_state().is_none());
    }

    #[test]
    fn transition_lookup_is_linear_first_match() {
        let state = State::new("S")
            .with_transition("E", "A")
            .with_transition("E", "B");
        assert_eq!(state.transition_for("E").unwrap().target, "A");
        assert!(state.transition_for("X").is_none());
    }
}
