use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Interpolation applied *entering* a keyframe, i.e. between the previous key and this one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum ShapeKind {
    TCB = 0,
    Hermite = 1,
    Bezier1D = 2,
    Linear = 3,
    Stepped = 4,
    Bezier2D = 5,
}

/// How a curve continues before its first and after its last keyframe.
///
/// The on-disk values leave room for the behaviors (reset, repeat, oscillate, offset repeat) we don't support.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum ExtrapolationKind {
    #[default]
    Constant = 1,
    Linear = 5,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Keyframe {
    /// in frames
    pub time: f32,
    pub value: f32,
    pub shape: ShapeKind,
    pub tension: f32,
    pub continuity: f32,
    pub bias: f32,
    /// Explicit tangents/control values for Hermite and Bezier shapes
    pub params: [f32; 4],
}

impl Keyframe {
    pub fn new(time: f32, value: f32, shape: ShapeKind) -> Self {
        Keyframe {
            time,
            value,
            shape,
            tension: 0.0,
            continuity: 0.0,
            bias: 0.0,
            params: [0.0; 4],
        }
    }

    pub fn with_tcb(mut self, tension: f32, continuity: f32, bias: f32) -> Self {
        self.tension = tension;
        self.continuity = continuity;
        self.bias = bias;
        self
    }

    pub fn with_params(mut self, params: [f32; 4]) -> Self {
        self.params = params;
        self
    }
}

/// A single animated scalar channel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Envelope {
    pub behavior: ExtrapolationKind,
    pub keyframes: Vec<Keyframe>,
}

impl Envelope {
    pub fn new(behavior: ExtrapolationKind, keyframes: Vec<Keyframe>) -> Self {
        Envelope { behavior, keyframes }
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// `(first.time, last.time)`, or `None` for an empty envelope.
    pub fn time_range(&self) -> Option<(f32, f32)> {
        Some((self.keyframes.first()?.time, self.keyframes.last()?.time))
    }

    /// Keyframes have to be ordered by time, equal times are allowed.
    pub fn is_ordered(&self) -> bool {
        self.keyframes.windows(2).all(|pair| pair[0].time <= pair[1].time)
    }
}
