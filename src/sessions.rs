//! Graph-editor sessions and the registry that owns them.
//!
//! A session is one open editor window over a state machine: its own
//! focus, one level of back history, active tab, pin flag, and scroll
//! offsets. Sessions on the same machine share the machine (last write
//! wins) but never navigation state.

use bevy::prelude::*;

use crate::fsm::StateMachine;

/// Registry-scoped window identity. Monotonic, never reused while the
/// registry lives, so a stale id can always be told apart from a new
/// window that happens to sit in the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Detail pane tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailTab {
    #[default]
    State,
    Variables,
    Events,
}

/// The single remembered focus: the state that was focused plus the
/// state-detail scroll position at the moment focus moved away.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorFocus {
    pub state: String,
    pub scroll: f32,
}

/// One open graph-editor window.
#[derive(Debug)]
pub struct GraphSession {
    pub id: SessionId,
    /// Entity owning the edited machine; `None` means the session is
    /// detached and will be pruned.
    pub target: Option<Entity>,
    /// Focused state name, resolved against the machine on every use.
    pub focus: Option<String>,
    previous: Option<PriorFocus>,
    pub tab: DetailTab,
    pub pinned: bool,
    pub graph_scroll: f32,
    pub state_scroll: f32,
    pub vars_scroll: f32,
    pub events_scroll: f32,
    /// One-shot scroll restore applied by the next state-detail render.
    pub restore_state_scroll: Option<f32>,
}

impl GraphSession {
    fn new(id: SessionId, target: Entity) -> Self {
        Self {
            id,
            target: Some(target),
            focus: None,
            previous: None,
            tab: DetailTab::State,
            pinned: false,
            graph_scroll: 0.0,
            state_scroll: 0.0,
            vars_scroll: 0.0,
            events_scroll: 0.0,
            restore_state_scroll: None,
        }
    }

    /// Move focus, remembering where we were. Always lands on the State
    /// tab so a click in the graph shows the clicked state's detail.
    pub fn focus(&mut self, next: Option<String>) {
        if let Some(old) = self.focus.take() {
            self.previous = Some(PriorFocus {
                state: old,
                scroll: self.state_scroll,
            });
        }
        self.focus = next;
        self.state_scroll = 0.0;
        self.tab = DetailTab::State;
    }

    /// Graph-pane click: focus the state, or collapse if it already has
    /// focus. Collapsing still records history.
    pub fn toggle_focus(&mut self, state: &str) {
        if self.focus.as_deref() == Some(state) {
            self.focus(None);
        } else {
            self.focus(Some(state.to_string()));
        }
    }

    /// Follow a transition label: focus the target only when it resolves
    /// in the machine. A dangling target name is an inert click.
    pub fn follow(&mut self, machine: &StateMachine, target: &str) {
        if machine.state(target).is_some() {
            self.focus(Some(target.to_string()));
        }
    }

    /// Whether a back step is available this frame.
    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Pop the remembered focus, restoring its scroll position. History
    /// is exactly one level deep: a second call is a no-op.
    pub fn back(&mut self) -> bool {
        let Some(prior) = self.previous.take() else {
            return false;
        };
        self.focus = Some(prior.state);
        self.state_scroll = prior.scroll;
        self.restore_state_scroll = Some(prior.scroll);
        self.tab = DetailTab::State;
        true
    }
}

/// Owns every open graph-editor session and the id counter.
#[derive(Resource, Debug, Default)]
pub struct SessionRegistry {
    sessions: Vec<GraphSession>,
    next_id: u64,
}

impl SessionRegistry {
    /// Open a fresh session on the machine owned by `target`.
    pub fn open(&mut self, target: Entity) -> SessionId {
        let id = SessionId(self.next_id);
        self.next_id += 1;
        self.sessions.push(GraphSession::new(id, target));
        id
    }

    /// Reuse an existing session on `target` when one is open, otherwise
    /// open one. Used by the inspection panel's edit action.
    pub fn open_or_focus(&mut self, target: Entity) -> SessionId {
        if let Some(session) = self.sessions.iter().find(|s| s.target == Some(target)) {
            session.id
        } else {
            self.open(target)
        }
    }

    /// Remove a session. Closing an id that is already gone is a no-op.
    pub fn close(&mut self, id: SessionId) {
        self.sessions.retain(|s| s.id != id);
    }

    /// Open a brand-new session on the same machine: new id, empty
    /// focus and history, independent of the original from here on.
    pub fn clone_session(&mut self, id: SessionId) -> Option<SessionId> {
        let target = self.get(id)?.target?;
        Some(self.open(target))
    }

    pub fn get(&self, id: SessionId) -> Option<&GraphSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: SessionId) -> Option<&mut GraphSession> {
        self.sessions.iter_mut().find(|s| s.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GraphSession> {
        self.sessions.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut GraphSession> {
        self.sessions.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop sessions that detached from their machine.
    pub fn prune_detached(&mut self) {
        self.sessions.retain(|s| s.target.is_some());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fsm::State;

    fn machine() -> StateMachine {
        StateMachine::new("Door")
            .with_state(State::new("A").with_transition("GO", "C"))
            .with_state(State::new("B"))
    }

    fn entities(count: usize) -> Vec<Entity> {
        let mut world = World::new();
        (0..count).map(|_| world.spawn_empty().id()).collect()
    }

    fn entity(index: usize) -> Entity {
        entities(index + 1)[index]
    }

    #[test]
    fn ids_are_never_reused_after_close() {
        let mut registry = SessionRegistry::default();
        let first = registry.open(entity(1));
        registry.close(first);
        let second = registry.open(entity(1));
        assert_ne!(first, second);
        assert!(registry.get(first).is_none());
    }

    #[test]
    fn close_twice_is_a_noop() {
        let mut registry = SessionRegistry::default();
        let id = registry.open(entity(1));
        registry.close(id);
        registry.close(id);
        assert!(registry.is_empty());
    }

    #[test]
    fn clone_shares_target_with_fresh_navigation() {
        let mut registry = SessionRegistry::default();
        let original = registry.open(entity(3));
        registry.get_mut(original).unwrap().focus(Some("A".into()));
        registry.get_mut(original).unwrap().focus(Some("B".into()));

        let cloned = registry.clone_session(original).unwrap();
        assert_ne!(original, cloned);

        let clone = registry.get(cloned).unwrap();
        assert_eq!(clone.target, Some(entity(3)));
        assert_eq!(clone.focus, None);
        assert!(!clone.has_previous());

        // The original keeps its own navigation.
        assert_eq!(registry.get(original).unwrap().focus.as_deref(), Some("B"));
    }

    #[test]
    fn open_or_focus_reuses_an_open_session() {
        let mut registry = SessionRegistry::default();
        let id = registry.open(entity(4));
        assert_eq!(registry.open_or_focus(entity(4)), id);
        assert_eq!(registry.len(), 1);
        registry.close(id);
        assert_ne!(registry.open_or_focus(entity(4)), id);
    }

    #[test]
    fn back_restores_one_level_then_stops() {
        let mut registry = SessionRegistry::default();
        let id = registry.open(entity(1));
        let session = registry.get_mut(id).unwrap();

        session.focus(Some("S1".into()));
        session.state_scroll = 42.0;
        session.focus(Some("S2".into()));

        assert!(session.back());
        assert_eq!(session.focus.as_deref(), Some("S1"));
        assert_eq!(session.state_scroll, 42.0);
        assert_eq!(session.restore_state_scroll, Some(42.0));

        // Depth is exactly one.
        assert!(!session.back());
        assert_eq!(session.focus.as_deref(), Some("S1"));
    }

    #[test]
    fn first_focus_has_nothing_to_go_back_to() {
        let mut registry = SessionRegistry::default();
        let id = registry.open(entity(1));
        let session = registry.get_mut(id).unwrap();
        session.focus(Some("S1".into()));
        assert!(!session.has_previous());
    }

    #[test]
    fn collapsing_focus_still_records_history() {
        let mut registry = SessionRegistry::default();
        let id = registry.open(entity(1));
        let session = registry.get_mut(id).unwrap();
        session.focus(Some("A".into()));
        session.toggle_focus("A");
        assert_eq!(session.focus, None);
        assert!(session.has_previous());
        assert!(session.back());
        assert_eq!(session.focus.as_deref(), Some("A"));
    }

    #[test]
    fn focus_lands_on_state_tab_and_tabs_keep_focus() {
        let mut registry = SessionRegistry::default();
        let id = registry.open(entity(1));
        let session = registry.get_mut(id).unwrap();
        session.tab = DetailTab::Events;
        session.focus(Some("A".into()));
        assert_eq!(session.tab, DetailTab::State);

        session.tab = DetailTab::Variables;
        assert_eq!(session.focus.as_deref(), Some("A"));
        assert!(!session.has_previous());
    }

    #[test]
    fn sessions_share_the_machine_but_not_navigation() {
        use crate::fsm::Variable;

        let mut world = World::new();
        let target = world.spawn(machine()).id();

        let mut registry = SessionRegistry::default();
        let first = registry.open(target);
        let second = registry.open(target);
        registry.get_mut(first).unwrap().focus(Some("A".into()));

        // Edit the graph the way the variables tab does: through the
        // component, not the session.
        world
            .get_mut::<StateMachine>(target)
            .unwrap()
            .variables
            .floats
            .push(Variable::new("speed", 2.0));

        // Both sessions resolve the same machine on their next render.
        let machine = world.get::<StateMachine>(target).unwrap();
        assert_eq!(machine.variables.floats[0].value, 2.0);
        assert_eq!(registry.get(first).unwrap().target, Some(target));
        assert_eq!(registry.get(second).unwrap().target, Some(target));

        // Navigation stays per session.
        assert_eq!(registry.get(first).unwrap().focus.as_deref(), Some("A"));
        assert_eq!(registry.get(second).unwrap().focus, None);
    }

    #[test]
    fn following_a_dangling_transition_is_inert() {
        let machine = machine();
        let mut registry = SessionRegistry::default();
        let id = registry.open(entity(1));
        let session = registry.get_mut(id).unwrap();
        session.focus(Some("A".into()));

        // "GO" points at "C", which does not exist.
        session.follow(&machine, "C");
        assert_eq!(session.focus.as_deref(), Some("A"));

        session.follow(&machine, "B");
        assert_eq!(session.focus.as_deref(), Some("B"));
    }
}
