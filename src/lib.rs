//! # Bevy Runtime Inspector
//!
//! An in-process, immediate-mode inspector overlay for running Bevy
//! apps: browse the live entity hierarchy, edit component fields through
//! reflection, and navigate/edit `StateMachine` graphs in independent
//! editor windows while the game keeps running.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bevy::prelude::*;
//! use bevy_runtime_inspector::RuntimeInspectorPlugin;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(RuntimeInspectorPlugin)
//!         .run();
//! }
//! ```
//!
//! Press `F9` in game to toggle the overlay, `Ctrl+F` for the quick-find
//! palette. Attach a [`StateMachine`] component to any entity to make its
//! graph editable from the inspection panel.
//!
//! The overlay never owns the world: entities, components, and machines
//! belong to the host, every handle is revalidated each frame, and a
//! failure anywhere in the overlay costs at most one frame of overlay
//! rendering.

pub mod fields;
pub mod fsm;
pub mod sessions;
pub mod settings;
pub mod shell;
pub mod toggles;
pub mod ui;
pub mod world;

pub use fsm::{
    Action, ActionField, ActionValue, EventDef, GlobalTransition, OwnerTarget, State, StateMachine,
    Transition, Variable, VariableKind, VariableRef, Variables,
};
pub use sessions::{DetailTab, GraphSession, SessionId, SessionRegistry};
pub use settings::InspectorSettings;
pub use shell::{InspectorState, RuntimeInspectorPlugin};
pub use toggles::ToggleMap;
pub use world::StaticGeometry;
