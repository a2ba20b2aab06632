use bevy::math::Vec3;
use bevy_motion_graph_core::{
    context::{ControllerFrame, StateContext},
    motion_state::MotionState,
    parameter::refs::Remappable,
    persistence::{PropertyReader, PropertyWriter, keys},
    shared_data::DataValue,
};

/// How the aim direction feeds into climb speed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LadderAimMode {
    /// Forward input always climbs up.
    #[default]
    Ignore,
    /// Forward input climbs down when looking below the horizon.
    AbsoluteFlip,
    /// Climb speed scales smoothly with aim pitch.
    Proportional,
    /// Blend of facing alignment with the ladder and aim pitch.
    HeadingPitch,
}

impl LadderAimMode {
    fn to_index(self) -> i32 {
        match self {
            Self::Ignore => 0,
            Self::AbsoluteFlip => 1,
            Self::Proportional => 2,
            Self::HeadingPitch => 3,
        }
    }

    fn from_index(index: i32) -> Self {
        match index {
            1 => Self::AbsoluteFlip,
            2 => Self::Proportional,
            3 => Self::HeadingPitch,
            _ => Self::Ignore,
        }
    }
}

/// Climb along a ladder-local curved coordinate: a straight section of
/// `straight_height`, then a quarter-circle cap of `cap_radius` that rolls
/// the character over the lip. Positions are continuous across the seam,
/// so crossing it never produces a visible snap.
///
/// The ladder frame (foot position and inward facing) is captured at
/// entry. Completes past the top of the cap or below the foot.
#[derive(Clone, Debug)]
pub struct LadderClimbState {
    climb_speed: DataValue<f32>,
    straight_height: DataValue<f32>,
    cap_radius: DataValue<f32>,
    aim_mode: LadderAimMode,

    base: Vec3,
    inward: Vec3,
    arc: f32,
    move_vector: Vec3,
    completed: bool,
}

impl LadderClimbState {
    pub const BASE: &'static str = "base";
    pub const INWARD: &'static str = "inward";
    pub const ARC: &'static str = "arc";
    pub const AIM_MODE: &'static str = "aimMode";

    pub fn new(climb_speed: DataValue<f32>) -> Self {
        Self {
            climb_speed,
            straight_height: DataValue::literal(3.),
            cap_radius: DataValue::literal(0.5),
            aim_mode: LadderAimMode::default(),
            base: Vec3::ZERO,
            inward: Vec3::ZERO,
            arc: 0.,
            move_vector: Vec3::ZERO,
            completed: false,
        }
    }

    pub fn with_geometry(
        mut self,
        straight_height: DataValue<f32>,
        cap_radius: DataValue<f32>,
    ) -> Self {
        self.straight_height = straight_height;
        self.cap_radius = cap_radius;
        self
    }

    pub fn with_aim_mode(mut self, aim_mode: LadderAimMode) -> Self {
        self.aim_mode = aim_mode;
        self
    }

    /// Total length of the curved coordinate, foot to top of cap.
    fn full_length(&self) -> f32 {
        self.straight_height.get() + self.cap_radius.get() * std::f32::consts::FRAC_PI_2
    }

    /// World position for an arc-length coordinate along the ladder.
    /// Below the seam this runs straight up the face; past it, around a
    /// quarter circle whose center sits `cap_radius` inward of the lip.
    fn position_at(&self, arc: f32, up: Vec3) -> Vec3 {
        let height = self.straight_height.get();
        let radius = self.cap_radius.get();
        if arc <= height || radius <= 1e-4 {
            return self.base + up * arc;
        }
        let theta = ((arc - height) / radius).min(std::f32::consts::FRAC_PI_2);
        let center = self.base + up * height + self.inward * radius;
        center - self.inward * radius * theta.cos() + up * radius * theta.sin()
    }

    fn climb_input(&self, frame: &ControllerFrame, up: Vec3) -> f32 {
        let forward_input = frame.input_move.y.clamp(-1., 1.);
        match self.aim_mode {
            LadderAimMode::Ignore => forward_input,
            LadderAimMode::AbsoluteFlip => {
                if frame.aim_pitch < 0. {
                    -forward_input
                } else {
                    forward_input
                }
            }
            LadderAimMode::Proportional => {
                let blend = (frame.aim_pitch / std::f32::consts::FRAC_PI_2).clamp(-1., 1.);
                forward_input * blend
            }
            LadderAimMode::HeadingPitch => {
                let alignment = frame.flat_forward(up).dot(self.inward);
                let pitch = (frame.aim_pitch / std::f32::consts::FRAC_PI_2).clamp(-1., 1.);
                forward_input * ((alignment + pitch) * 0.5).clamp(-1., 1.)
            }
        }
    }
}

impl MotionState for LadderClimbState {
    fn move_vector(&self) -> Vec3 {
        self.move_vector
    }

    fn completed(&self) -> bool {
        self.completed
    }

    fn apply_gravity(&self) -> bool {
        false
    }

    fn apply_grounding_force(&self) -> bool {
        false
    }

    fn ignore_platform_move(&self) -> bool {
        true
    }

    fn on_enter(&mut self, ctx: StateContext) {
        self.base = ctx.frame.position;
        self.inward = ctx.frame.flat_forward(ctx.body.up);
        self.arc = 0.;
        self.completed = false;
        self.move_vector = Vec3::ZERO;
        ctx.body.velocity = Vec3::ZERO;
    }

    fn update(&mut self, ctx: StateContext) {
        if self.completed {
            self.move_vector = Vec3::ZERO;
            return;
        }

        let up = ctx.body.up;
        let input = self.climb_input(ctx.frame, up);
        let previous = self.position_at(self.arc, up);
        let next_arc = self.arc + input * self.climb_speed.get() * ctx.dt;

        if next_arc >= self.full_length() || next_arc < 0. {
            self.completed = true;
        }
        self.arc = next_arc.clamp(0., self.full_length());

        let position = self.position_at(self.arc, up);
        self.move_vector = position - previous;
        ctx.body.velocity = if ctx.dt > 0. {
            self.move_vector / ctx.dt
        } else {
            Vec3::ZERO
        };
    }

    fn on_exit(&mut self) {
        self.base = Vec3::ZERO;
        self.inward = Vec3::ZERO;
        self.arc = 0.;
        self.move_vector = Vec3::ZERO;
        self.completed = false;
    }

    fn reference_fields(&mut self) -> Vec<&mut dyn Remappable> {
        vec![
            &mut self.climb_speed,
            &mut self.straight_height,
            &mut self.cap_radius,
        ]
    }

    fn write_properties(&self, writer: &mut dyn PropertyWriter) {
        writer.write_vec3(keys::MOVE_VECTOR, self.move_vector);
        writer.write_bool(keys::COMPLETED, self.completed);
        writer.write_vec3(Self::BASE, self.base);
        writer.write_vec3(Self::INWARD, self.inward);
        writer.write_f32(Self::ARC, self.arc);
        writer.write_i32(Self::AIM_MODE, self.aim_mode.to_index());
    }

    fn read_properties(&mut self, reader: &dyn PropertyReader) {
        self.move_vector = reader.read_vec3(keys::MOVE_VECTOR, self.move_vector);
        self.completed = reader.read_bool(keys::COMPLETED, self.completed);
        self.base = reader.read_vec3(Self::BASE, self.base);
        self.inward = reader.read_vec3(Self::INWARD, self.inward);
        self.arc = reader.read_f32(Self::ARC, self.arc);
        self.aim_mode = LadderAimMode::from_index(
            reader.read_i32(Self::AIM_MODE, self.aim_mode.to_index()),
        );
    }

    fn display_name(&self) -> String {
        "Ladder Climb".into()
    }
}

#[cfg(test)]
mod tests {
    use bevy::math::Vec2;

    use super::*;
    use crate::testing::Harness;

    const DT: f32 = 1. / 60.;

    fn climbing_harness() -> Harness {
        let mut harness = Harness::new();
        harness.frame.input_move = Vec2::new(0., 1.);
        harness
    }

    #[test]
    fn straight_section_climbs_vertically() {
        let mut harness = climbing_harness();
        let mut state = LadderClimbState::new(DataValue::literal(2.));
        state.on_enter(harness.ctx(DT));
        state.update(harness.ctx(DT));
        let step = state.move_vector();
        assert!((step.y - 2. * DT).abs() < 1e-5);
        assert!(step.x.abs() < 1e-6 && step.z.abs() < 1e-6);
    }

    #[test]
    fn position_is_continuous_across_the_cap_seam() {
        let harness = climbing_harness();
        let mut state = LadderClimbState::new(DataValue::literal(2.))
            .with_geometry(DataValue::literal(1.), DataValue::literal(0.5));
        state.base = harness.frame.position;
        state.inward = Vec3::NEG_Z;

        // Walk the coordinate through the seam in per-tick increments; each
        // step must move at most one tick of climb and never jump.
        let ds = 2. * DT;
        let mut arc = 0.8;
        let mut previous = state.position_at(arc, Vec3::Y);
        while arc < 1.4 {
            arc += ds;
            let next = state.position_at(arc, Vec3::Y);
            let step = (next - previous).length();
            assert!(step <= ds * 1.01, "discontinuity at arc {arc}: step {step}");
            assert!(step > ds * 0.9);
            previous = next;
        }
    }

    #[test]
    fn cap_turns_motion_inward() {
        let mut harness = climbing_harness();
        let mut state = LadderClimbState::new(DataValue::literal(2.))
            .with_geometry(DataValue::literal(0.1), DataValue::literal(0.5));
        state.on_enter(harness.ctx(DT));

        let mut inward_travel = 0.;
        for _ in 0..30 {
            state.update(harness.ctx(DT));
            // Facing -Z at entry, so inward is -Z.
            inward_travel += -state.move_vector().z;
        }
        assert!(inward_travel > 0.1);
    }

    #[test]
    fn topping_out_completes() {
        let mut harness = climbing_harness();
        let mut state = LadderClimbState::new(DataValue::literal(4.))
            .with_geometry(DataValue::literal(0.5), DataValue::literal(0.25));
        state.on_enter(harness.ctx(DT));
        for _ in 0..60 {
            state.update(harness.ctx(DT));
        }
        assert!(state.completed());
    }

    #[test]
    fn absolute_flip_descends_when_looking_down() {
        let mut harness = climbing_harness();
        harness.frame.aim_pitch = -0.5;
        let mut state = LadderClimbState::new(DataValue::literal(2.))
            .with_aim_mode(LadderAimMode::AbsoluteFlip);
        state.on_enter(harness.ctx(DT));
        state.update(harness.ctx(DT));
        // First step down from the foot completes immediately.
        assert!(state.completed());
        assert!(state.move_vector().y <= 0.);
    }

    #[test]
    fn proportional_mode_scales_with_pitch() {
        let mut harness = climbing_harness();
        harness.frame.aim_pitch = std::f32::consts::FRAC_PI_4;
        let mut state = LadderClimbState::new(DataValue::literal(2.))
            .with_aim_mode(LadderAimMode::Proportional);
        state.on_enter(harness.ctx(DT));
        state.update(harness.ctx(DT));
        assert!((state.move_vector().y - 2. * 0.5 * DT).abs() < 1e-5);
    }
}
