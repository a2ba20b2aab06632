//! Snapshot round-trips over the whole state roster: N ticks, save,
//! restore into a fresh instance, one more tick. The two instances must
//! produce the same displacement.

mod common;

use bevy::{
    math::{Vec2, Vec3},
    transform::components::Transform,
};
use bevy_motion_graph_core::{
    context::{CharacterBody, ControllerFrame},
    graph::GraphTemplate,
    parameter::{
        ParamValue, SwitchValue, TransformHandle,
        refs::{FloatRef, SwitchRef, TransformRef},
    },
    persistence::GraphSnapshot,
    shared_data::DataValue,
};
use bevy_motion_graph_states::prelude::*;
use common::MockEnv;

const DT: f32 = 1. / 60.;

fn held() -> ParamValue {
    ParamValue::Switch(SwitchValue {
        on: true,
        was_on: true,
    })
}

fn roster_template() -> GraphTemplate {
    GraphTemplate::new()
        .with_parameter("charge", ParamValue::Float(0.7))
        .unwrap()
        .with_parameter("crouch", held())
        .unwrap()
        .with_parameter("thrust", held())
        .unwrap()
        .with_parameter("climb", held())
        .unwrap()
        .with_parameter("descend", held())
        .unwrap()
        .with_parameter("ladder", ParamValue::Transform(Some(TransformHandle(7))))
        .unwrap()
        .with_parameter("anchor", ParamValue::Transform(Some(TransformHandle(1))))
        .unwrap()
        .with_parameter("source", ParamValue::Transform(Some(TransformHandle(3))))
        .unwrap()
        .with_state("idle", IdleState::new())
        .unwrap()
        .with_state("movement", MovementState::new(DataValue::literal(6.)))
        .unwrap()
        .with_state(
            "crouch_movement",
            CrouchMovementState::new(DataValue::literal(6.), SwitchRef::named("crouch")),
        )
        .unwrap()
        .with_state("slide", SlideState::new())
        .unwrap()
        .with_state("push_off", PushOffState::new(DataValue::literal(5.)))
        .unwrap()
        .with_state(
            "push_off_extended",
            PushOffExtendedState::new(DataValue::literal(5.)),
        )
        .unwrap()
        .with_state("dodge", DodgeState::new(DataValue::literal(8.)))
        .unwrap()
        .with_state("falling", FallingState::new(DataValue::literal(4.)))
        .unwrap()
        .with_state("jump", JumpState::new(FloatRef::named("charge")))
        .unwrap()
        .with_state(
            "impulse",
            ImpulseState::new(DataValue::literal(Vec3::new(0., 5., 0.))),
        )
        .unwrap()
        .with_state("glide", GlideState::new(DataValue::literal(5.)))
        .unwrap()
        .with_state(
            "jetpack",
            JetpackState::new(DataValue::literal(5.), SwitchRef::named("thrust")),
        )
        .unwrap()
        .with_state("fly", FlyState::new(DataValue::literal(6.)))
        .unwrap()
        .with_state(
            "fly_up",
            FlyUpState::new(DataValue::literal(3.), SwitchRef::named("climb")),
        )
        .unwrap()
        .with_state(
            "fly_down",
            FlyDownState::new(DataValue::literal(3.), SwitchRef::named("descend")),
        )
        .unwrap()
        .with_state("ladder_climb", LadderClimbState::new(DataValue::literal(2.)))
        .unwrap()
        .with_state(
            "contact_ladder",
            ContactLadderState::new(DataValue::literal(2.), TransformRef::named("ladder")),
        )
        .unwrap()
        .with_state("wall_run", WallRunState::new(DataValue::literal(6.)))
        .unwrap()
        .with_state("wall_dash", WallDashState::new(DataValue::literal(10.)))
        .unwrap()
        .with_state(
            "mantle",
            MantleState::new(DataValue::literal(1.), DataValue::literal(0.5)),
        )
        .unwrap()
        .with_state("wall_cling", WallClingState::new(DataValue::literal(1.)))
        .unwrap()
        .with_state("surface_swim", SurfaceSwimState::new(DataValue::literal(3.)))
        .unwrap()
        .with_state(
            "underwater_swim",
            UnderwaterSwimState::new(DataValue::literal(4.)),
        )
        .unwrap()
        .with_state("stroke_swim", StrokeSwimState::new(DataValue::literal(4.)))
        .unwrap()
        .with_state("tread_water", TreadWaterState::new())
        .unwrap()
        .with_state("null", NullState::new())
        .unwrap()
        .with_state("dash", DashState::new(DataValue::literal(12.)))
        .unwrap()
        .with_state("grapple", GrappleState::new(TransformRef::named("anchor")))
        .unwrap()
        .with_state(
            "repulse",
            RepulseState::new(DataValue::literal(6.), TransformRef::named("source")),
        )
        .unwrap()
        .with_state("frozen", FrozenState::new())
        .unwrap()
}

fn world() -> (ControllerFrame, MockEnv) {
    let mut env = MockEnv::default();
    env.wall = Some((Vec3::new(0., 0., -0.6), Vec3::Z));
    env.water_height = Some(0.5);
    env.transforms.insert(7, Transform::from_xyz(0., 0., -0.5));
    env.transforms.insert(1, Transform::from_xyz(0., 5., -5.));
    env.transforms.insert(3, Transform::from_xyz(0., 0., -2.));

    let frame = ControllerFrame {
        input_move: Vec2::new(0.5, 1.),
        aim_forward: Vec3::new(0.3, -0.2, -1.).normalize(),
        ..Default::default()
    };
    (frame, env)
}

#[test]
fn every_state_survives_a_mid_flight_snapshot() {
    let template = roster_template();
    let (frame, env) = world();
    let names: Vec<String> = template.state_names().map(str::to_string).collect();
    assert_eq!(names.len(), 30);

    for name in &names {
        let mut original = template.instantiate().unwrap();
        let mut body = CharacterBody::default();
        original.enter(name, &frame, &mut body, &env).unwrap();
        for _ in 0..3 {
            original.tick(DT, &frame, &mut body, &env);
        }

        let snapshot = original.save();
        let mut restored = template.instantiate().unwrap();
        restored.restore(&snapshot);
        assert_eq!(restored.active_name(), Some(name.as_str()), "state {name}");

        let mut body_a = body;
        let mut body_b = body;
        let out_a = original.tick(DT, &frame, &mut body_a, &env).unwrap();
        let out_b = restored.tick(DT, &frame, &mut body_b, &env).unwrap();
        assert!(
            (out_a.move_vector - out_b.move_vector).length() < 1e-5,
            "state {name}: {:?} vs {:?}",
            out_a.move_vector,
            out_b.move_vector,
        );
        assert_eq!(out_a.completed, out_b.completed, "state {name}");
    }
}

#[test]
fn snapshot_survives_binary_encoding() {
    let template = roster_template();
    let (frame, env) = world();

    let mut original = template.instantiate().unwrap();
    let mut body = CharacterBody::default();
    original.enter("movement", &frame, &mut body, &env).unwrap();
    for _ in 0..5 {
        original.tick(DT, &frame, &mut body, &env);
    }

    let bytes = original.save().to_bytes().unwrap();
    let snapshot = GraphSnapshot::from_bytes(&bytes).unwrap();
    let mut restored = template.instantiate().unwrap();
    restored.restore(&snapshot);

    let mut body_a = body;
    let mut body_b = body;
    let out_a = original.tick(DT, &frame, &mut body_a, &env).unwrap();
    let out_b = restored.tick(DT, &frame, &mut body_b, &env).unwrap();
    assert!((out_a.move_vector - out_b.move_vector).length() < 1e-5);
}
