//! Standalone demo: a small scene with two state machines to poke at.
//!
//! Run it, press F9, and inspect away.

use avian3d::prelude::Collider;
use bevy::prelude::*;
use bevy_runtime_inspector::{
    Action, ActionValue, InspectorState, OwnerTarget, RuntimeInspectorPlugin, State, StateMachine,
    StaticGeometry, Variable, VariableKind, VariableRef,
};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Runtime Inspector Demo".to_string(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(RuntimeInspectorPlugin)
        .add_systems(Startup, (setup_scene, show_overlay))
        .add_systems(Update, drive_machines)
        .run();
}

fn show_overlay(mut state: ResMut<InspectorState>) {
    state.visible = true;
}

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Name::new("Camera"),
        Camera3d::default(),
        Transform::from_xyz(4.0, 5.0, 9.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: 9_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(3.0, 8.0, 3.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        Name::new("Lamp"),
        PointLight {
            intensity: 600_000.0,
            ..default()
        },
        Transform::from_xyz(-3.0, 3.5, 1.0),
    ));

    commands.spawn((
        Name::new("Ground"),
        StaticGeometry,
        Collider::cuboid(12.0, 0.2, 12.0),
        Mesh3d(meshes.add(Cuboid::new(12.0, 0.2, 12.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.35, 0.38, 0.35),
            ..default()
        })),
        Transform::from_xyz(0.0, -0.1, 0.0),
    ));

    let door = commands
        .spawn((
            Name::new("Door"),
            door_machine(),
            Mesh3d(meshes.add(Cuboid::new(1.2, 2.4, 0.15))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.55, 0.35, 0.2),
                ..default()
            })),
            Transform::from_xyz(0.0, 1.2, 0.0),
        ))
        .id();

    commands.spawn((
        Name::new("Handle"),
        ChildOf(door),
        Mesh3d(meshes.add(Sphere::new(0.08))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.8, 0.75, 0.3),
            ..default()
        })),
        Transform::from_xyz(0.45, 0.0, 0.12),
    ));

    commands.spawn((
        Name::new("Elevator"),
        elevator_machine(door),
        Mesh3d(meshes.add(Cuboid::new(1.8, 2.2, 1.8))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.4, 0.45, 0.6),
            ..default()
        })),
        Transform::from_xyz(3.2, 1.1, -2.0),
    ));
}

fn door_machine() -> StateMachine {
    let mut machine = StateMachine::new("Door")
        .with_state(
            State::new("Closed")
                .with_transition("OPEN", "Open")
                .with_action(
                    Action::new("PlaySound")
                        .with_field("clip", ActionValue::Text("door_shut".into()))
                        .with_field("volume", ActionValue::Float(0.8))
                        .with_field("target", ActionValue::Owner(OwnerTarget::UseOwner)),
                ),
        )
        .with_state(
            State::new("Open")
                .with_transition("CLOSE", "Closed")
                .with_action(
                    Action::new("SwingTo")
                        .with_field(
                            "angle",
                            ActionValue::Var(VariableRef {
                                kind: VariableKind::Float,
                                name: "open_angle".into(),
                            }),
                        )
                        .with_field("finished", ActionValue::Event("CLOSE".into()))
                        .with_field("eased", ActionValue::Bool(true)),
                ),
        )
        .with_event("OPEN", false)
        .with_event("CLOSE", false)
        .with_event("RESET", true)
        .with_global_transition("RESET", "Closed");
    machine.active = Some("Closed".into());
    machine
        .variables
        .floats
        .push(Variable::new("open_angle", 110.0));
    machine
        .variables
        .texts
        .push(Variable::new("last_user", "nobody".to_string()));
    machine
}

fn elevator_machine(door: Entity) -> StateMachine {
    let mut machine = StateMachine::new("Elevator")
        .with_state(
            State::new("Idle")
                .with_transition("CALL", "Moving")
                .with_action(
                    Action::new("WatchDoor")
                        .with_field("door", ActionValue::Owner(OwnerTarget::Target(Some(door))))
                        .with_field("poll_rate", ActionValue::Int(4)),
                ),
        )
        // "Maintenance" has no matching state on purpose; the editor
        // shows the dangling target as an inert label.
        .with_state(
            State::new("Moving")
                .with_transition("ARRIVED", "Idle")
                .with_transition("FAULT", "Maintenance"),
        )
        .with_event("CALL", false)
        .with_event("ARRIVED", false);
    machine.active = Some("Idle".into());
    machine
        .variables
        .ints
        .push(Variable::new("floor", 1));
    machine
        .variables
        .bools
        .push(Variable::new("doors_locked", false));
    machine
        .variables
        .entities
        .push(Variable::new("linked_door", Some(door)));
    machine
}

/// Stand-in behavior engine: flips each machine's reported state so the
/// running-state preview and graph colors have something to show.
fn drive_machines(time: Res<Time>, mut machines: Query<&mut StateMachine>) {
    let phase = (time.elapsed_secs() as u64 / 5) % 2;
    for mut machine in &mut machines {
        let next = match machine.name.as_str() {
            "Door" => Some(if phase == 0 { "Closed" } else { "Open" }),
            "Elevator" => Some(if phase == 0 { "Idle" } else { "Moving" }),
            _ => None,
        };
        let next = next.map(str::to_string);
        if machine.active != next {
            machine.active = next;
        }
    }
}
