use bevy::math::Vec3;
use bevy_motion_graph_core::{
    context::StateContext,
    maths::spring,
    motion_state::MotionState,
    parameter::refs::Remappable,
    persistence::{PropertyReader, PropertyWriter, keys},
    shared_data::DataValue,
};

/// Surface swimming with a stroke cadence. A phase timer alternates
/// between a stroke window at full speed and a recovery window at reduced
/// speed, producing the surge-and-coast rhythm of a real swimmer. The
/// timer only runs while there is input; idling resets it so the next
/// push always starts with a stroke.
#[derive(Clone, Debug)]
pub struct StrokeSwimState {
    swim_speed: DataValue<f32>,
    stroke_duration: DataValue<f32>,
    recovery_duration: DataValue<f32>,
    /// Speed multiplier during the recovery window.
    recovery_multiplier: DataValue<f32>,
    damping: DataValue<f32>,

    phase_time: f32,
    velocity: Vec3,
    smoothing: Vec3,
    move_vector: Vec3,
    completed: bool,
}

impl StrokeSwimState {
    pub const SMOOTHING: &'static str = "smoothing";

    pub fn new(swim_speed: DataValue<f32>) -> Self {
        Self {
            swim_speed,
            stroke_duration: DataValue::literal(0.8),
            recovery_duration: DataValue::literal(0.5),
            recovery_multiplier: DataValue::literal(0.35),
            damping: DataValue::literal(0.6),
            phase_time: 0.,
            velocity: Vec3::ZERO,
            smoothing: Vec3::ZERO,
            move_vector: Vec3::ZERO,
            completed: false,
        }
    }

    pub fn with_cadence(
        mut self,
        stroke_duration: DataValue<f32>,
        recovery_duration: DataValue<f32>,
    ) -> Self {
        self.stroke_duration = stroke_duration;
        self.recovery_duration = recovery_duration;
        self
    }

    /// Speed multiplier for the current point in the stroke cycle.
    fn cadence_multiplier(&self) -> f32 {
        if self.phase_time < self.stroke_duration.get() {
            1.
        } else {
            self.recovery_multiplier.get()
        }
    }
}

impl MotionState for StrokeSwimState {
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

    fn on_enter(&mut self, ctx: StateContext) {
        self.phase_time = 0.;
        self.velocity = ctx.body.planar_velocity();
        self.smoothing = Vec3::ZERO;
        self.completed = false;
        self.move_vector = ctx.body.velocity * ctx.dt;
    }

    fn update(&mut self, ctx: StateContext) {
        if ctx
            .environment
            .water_surface_height(ctx.frame.position)
            .is_none()
        {
            self.completed = true;
            self.move_vector = ctx.body.velocity * ctx.dt;
            return;
        }

        let up = ctx.body.up;
        let has_input = ctx.frame.input_move.length_squared() > 1e-4;
        let target = if has_input {
            let cycle = self.stroke_duration.get() + self.recovery_duration.get();
            self.phase_time = (self.phase_time + ctx.dt) % cycle.max(1e-4);
            ctx.frame.move_direction(up) * self.swim_speed.get() * self.cadence_multiplier()
        } else {
            self.phase_time = 0.;
            Vec3::ZERO
        };

        let smooth_time = spring::damping_time(self.damping.get());
        self.velocity = spring::smooth_damp_vec3(
            self.velocity,
            target,
            &mut self.smoothing,
            smooth_time,
            f32::MAX,
            ctx.dt,
        );
        ctx.body.velocity = self.velocity + up * ctx.body.vertical_speed();
        self.move_vector = self.velocity * ctx.dt;
    }

    fn on_exit(&mut self) {
        self.phase_time = 0.;
        self.velocity = Vec3::ZERO;
        self.smoothing = Vec3::ZERO;
        self.move_vector = Vec3::ZERO;
        self.completed = false;
    }

    fn reference_fields(&mut self) -> Vec<&mut dyn Remappable> {
        vec![
            &mut self.swim_speed,
            &mut self.stroke_duration,
            &mut self.recovery_duration,
            &mut self.recovery_multiplier,
            &mut self.damping,
        ]
    }

    fn write_properties(&self, writer: &mut dyn PropertyWriter) {
        writer.write_vec3(keys::MOVE_VECTOR, self.move_vector);
        writer.write_bool(keys::COMPLETED, self.completed);
        writer.write_f32(keys::PHASE, self.phase_time);
        writer.write_vec3(keys::VELOCITY, self.velocity);
        writer.write_vec3(Self::SMOOTHING, self.smoothing);
    }

    fn read_properties(&mut self, reader: &dyn PropertyReader) {
        self.move_vector = reader.read_vec3(keys::MOVE_VECTOR, self.move_vector);
        self.completed = reader.read_bool(keys::COMPLETED, self.completed);
        self.phase_time = reader.read_f32(keys::PHASE, self.phase_time);
        self.velocity = reader.read_vec3(keys::VELOCITY, self.velocity);
        self.smoothing = reader.read_vec3(Self::SMOOTHING, self.smoothing);
    }

    fn display_name(&self) -> String {
        "Stroke Swim".into()
    }
}
