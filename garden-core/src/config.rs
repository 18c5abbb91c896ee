use crate::smash::SmashMethod;

/// Parameters of a growth run that are not part of the genome.
///
/// ### Fields
/// - `step_len` - Distance an agent moves per emitted circle.
/// - `color_drift` - Per-step channel drift at `*_changes == 255`; the
///   drift is `(changes / 255 - 0.5) * color_drift`.
/// - `tropism` - Multiplier on the `down` gene when biasing the heading
///   toward `+y`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrowthConfig {
    pub step_len: f32,
    pub color_drift: f32,
    pub tropism: f32,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            step_len: 1.0,
            color_drift: 2.0,
            tropism: 0.01,
        }
    }
}

/// How two genomes are combined: which method, with what blend weight and
/// how many mutations afterwards.
///
/// `weight` is the probability of inheriting from the first parent for
/// [`SmashMethod::Probabilistic`] and the first parent's share for
/// [`SmashMethod::WeightedAverage`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmashConfig {
    pub method: SmashMethod,
    pub weight: f64,
    pub mutations: usize,
}

impl Default for SmashConfig {
    fn default() -> Self {
        Self {
            method: SmashMethod::Probabilistic,
            weight: 0.5,
            mutations: 0,
        }
    }
}
