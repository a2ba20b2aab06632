use bevy::math::Vec3;
use bevy_motion_graph_core::{
    context::StateContext,
    maths::spring,
    motion_state::MotionState,
    parameter::refs::Remappable,
    persistence::{PropertyReader, PropertyWriter, keys},
    shared_data::DataValue,
};

/// Free flight along the full aim direction. Forward input follows the
/// camera pitch, so looking up and pushing forward climbs; strafe stays in
/// the horizontal plane. Velocity is critically damped toward the target.
#[derive(Clone, Debug)]
pub struct FlyState {
    fly_speed: DataValue<f32>,
    damping: DataValue<f32>,

    velocity: Vec3,
    smoothing: Vec3,
    move_vector: Vec3,
}

impl FlyState {
    pub const VELOCITY: &'static str = "velocity";
    pub const SMOOTHING: &'static str = "smoothing";

    pub fn new(fly_speed: DataValue<f32>) -> Self {
        Self {
            fly_speed,
            damping: DataValue::literal(0.4),
            velocity: Vec3::ZERO,
            smoothing: Vec3::ZERO,
            move_vector: Vec3::ZERO,
        }
    }

    pub fn with_damping(mut self, damping: DataValue<f32>) -> Self {
        self.damping = damping;
        self
    }
}

impl MotionState for FlyState {
    fn move_vector(&self) -> Vec3 {
        self.move_vector
    }

    fn apply_gravity(&self) -> bool {
        false
    }

    fn apply_grounding_force(&self) -> bool {
        false
    }

    fn on_enter(&mut self, ctx: StateContext) {
        self.velocity = ctx.body.velocity;
        self.smoothing = Vec3::ZERO;
        self.move_vector = self.velocity * ctx.dt;
    }

    fn update(&mut self, ctx: StateContext) {
        let forward = ctx.frame.aim_forward.normalize_or_zero();
        let right = ctx.frame.flat_right(ctx.body.up);
        let input = ctx.frame.input_move;
        let scale = ctx.frame.input_scale.clamp(0., 1.);
        let direction = (forward * input.y + right * input.x).normalize_or_zero();
        let target = direction * self.fly_speed.get() * input.length().min(1.) * scale;

        let smooth_time = spring::damping_time(self.damping.get());
        self.velocity = spring::smooth_damp_vec3(
            self.velocity,
            target,
            &mut self.smoothing,
            smooth_time,
            f32::MAX,
            ctx.dt,
        );
        ctx.body.velocity = self.velocity;
        self.move_vector = self.velocity * ctx.dt;
    }

    fn on_exit(&mut self) {
        self.velocity = Vec3::ZERO;
        self.smoothing = Vec3::ZERO;
        self.move_vector = Vec3::ZERO;
    }

    fn reference_fields(&mut self) -> Vec<&mut dyn Remappable> {
        vec![&mut self.fly_speed, &mut self.damping]
    }

    fn write_properties(&self, writer: &mut dyn PropertyWriter) {
        writer.write_vec3(keys::MOVE_VECTOR, self.move_vector);
        writer.write_bool(keys::COMPLETED, self.completed());
        writer.write_vec3(Self::VELOCITY, self.velocity);
        writer.write_vec3(Self::SMOOTHING, self.smoothing);
    }

    fn read_properties(&mut self, reader: &dyn PropertyReader) {
        self.move_vector = reader.read_vec3(keys::MOVE_VECTOR, self.move_vector);
        self.velocity = reader.read_vec3(Self::VELOCITY, self.velocity);
        self.smoothing = reader.read_vec3(Self::SMOOTHING, self.smoothing);
    }

    fn display_name(&self) -> String {
        "Fly".into()
    }
}
