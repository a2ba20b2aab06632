use bevy::math::Vec3;
use bevy_motion_graph_core::{
    context::StateContext,
    maths::spring,
    motion_state::MotionState,
    parameter::refs::Remappable,
    persistence::{PropertyReader, PropertyWriter, keys},
    shared_data::DataValue,
};

/// Swim along the water surface. The body rides at `head_offset` below the
/// surface; the tracked surface height is blended over ticks so a wave
/// raising the water lifts the character smoothly instead of snapping it.
/// Completes when the water disappears under the character.
#[derive(Clone, Debug)]
pub struct SurfaceSwimState {
    swim_speed: DataValue<f32>,
    /// Height of the body origin relative to the surface (negative keeps
    /// the head above water).
    head_offset: DataValue<f32>,
    damping: DataValue<f32>,
    /// Per-tick blend factor for surface height deltas, in [0,1].
    surface_blend: DataValue<f32>,
    /// Gain converting height error into vertical speed, 1/s.
    vertical_gain: DataValue<f32>,

    tracked_surface: f32,
    velocity: Vec3,
    smoothing: Vec3,
    move_vector: Vec3,
    completed: bool,
}

impl SurfaceSwimState {
    pub const TRACKED_SURFACE: &'static str = "trackedSurface";
    pub const SMOOTHING: &'static str = "smoothing";

    pub fn new(swim_speed: DataValue<f32>) -> Self {
        Self {
            swim_speed,
            head_offset: DataValue::literal(-1.2),
            damping: DataValue::literal(0.6),
            surface_blend: DataValue::literal(0.15),
            vertical_gain: DataValue::literal(4.),
            tracked_surface: 0.,
            velocity: Vec3::ZERO,
            smoothing: Vec3::ZERO,
            move_vector: Vec3::ZERO,
            completed: false,
        }
    }

    pub fn with_head_offset(mut self, head_offset: DataValue<f32>) -> Self {
        self.head_offset = head_offset;
        self
    }
}

impl MotionState for SurfaceSwimState {
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
        self.tracked_surface = ctx
            .environment
            .water_surface_height(ctx.frame.position)
            .unwrap_or_else(|| ctx.frame.position.dot(ctx.body.up));
        self.velocity = ctx.body.planar_velocity();
        self.smoothing = Vec3::ZERO;
        self.completed = false;
        self.move_vector = ctx.body.velocity * ctx.dt;
    }

    fn update(&mut self, ctx: StateContext) {
        let Some(surface) = ctx.environment.water_surface_height(ctx.frame.position) else {
            self.completed = true;
            self.move_vector = ctx.body.velocity * ctx.dt;
            return;
        };

        // Chase the real surface instead of jumping to it.
        let blend = self.surface_blend.get().clamp(0., 1.);
        self.tracked_surface += (surface - self.tracked_surface) * blend;

        let up = ctx.body.up;
        let target_height = self.tracked_surface + self.head_offset.get();
        let height_error = target_height - ctx.frame.position.dot(up);
        let vertical = height_error * self.vertical_gain.get();

        let target = ctx.frame.move_direction(up) * self.swim_speed.get();
        let smooth_time = spring::damping_time(self.damping.get());
        self.velocity = spring::smooth_damp_vec3(
            self.velocity,
            target,
            &mut self.smoothing,
            smooth_time,
            f32::MAX,
            ctx.dt,
        );

        ctx.body.velocity = self.velocity + up * vertical;
        self.move_vector = ctx.body.velocity * ctx.dt;
    }

    fn on_exit(&mut self) {
        self.tracked_surface = 0.;
        self.velocity = Vec3::ZERO;
        self.smoothing = Vec3::ZERO;
        self.move_vector = Vec3::ZERO;
        self.completed = false;
    }

    fn reference_fields(&mut self) -> Vec<&mut dyn Remappable> {
        vec![
            &mut self.swim_speed,
            &mut self.head_offset,
            &mut self.damping,
            &mut self.surface_blend,
            &mut self.vertical_gain,
        ]
    }

    fn write_properties(&self, writer: &mut dyn PropertyWriter) {
        writer.write_vec3(keys::MOVE_VECTOR, self.move_vector);
        writer.write_bool(keys::COMPLETED, self.completed);
        writer.write_f32(Self::TRACKED_SURFACE, self.tracked_surface);
        writer.write_vec3(keys::VELOCITY, self.velocity);
        writer.write_vec3(Self::SMOOTHING, self.smoothing);
    }

    fn read_properties(&mut self, reader: &dyn PropertyReader) {
        self.move_vector = reader.read_vec3(keys::MOVE_VECTOR, self.move_vector);
        self.completed = reader.read_bool(keys::COMPLETED, self.completed);
        self.tracked_surface = reader.read_f32(Self::TRACKED_SURFACE, self.tracked_surface);
        self.velocity = reader.read_vec3(keys::VELOCITY, self.velocity);
        self.smoothing = reader.read_vec3(Self::SMOOTHING, self.smoothing);
    }

    fn display_name(&self) -> String {
        "Surface Swim".into()
    }
}
