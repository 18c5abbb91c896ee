//! Crossover ("smashing") and mutation of plant genomes.
//!
//! Every operator works cell by cell over the gene table of two genomes of
//! the same shape and is followed by [`mutate`]. Operators take the RNG as
//! `&mut dyn RngCore` so they fit the fixed [`SmashFn`] signature used by
//! [`SmashMethod::resolve`].

use rand::{Rng, RngCore};
use thiserror::Error;
use tracing::debug;

use crate::config::SmashConfig;
use crate::genome::{AgentGenom, DEFAULT_GENERATIONS, GENE_COUNT, Gene, PlantGenom};

#[derive(Debug, Error, PartialEq)]
pub enum SmashError {
    #[error("cannot smash a {left}-generation genome with a {right}-generation genome")]
    ShapeMismatch { left: usize, right: usize },
    #[error("average weight {0} must be between 0.0 and 1.0")]
    InvalidWeight(f64),
    #[error("inheritance probability {0} must be between 0.0 and 1.0")]
    InvalidProbability(f64),
}

/// Signature shared by the two-parent operators.
pub type SmashFn =
    fn(&PlantGenom, &PlantGenom, f64, usize, &mut dyn RngCore) -> Result<PlantGenom, SmashError>;

/// The available crossover methods.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SmashMethod {
    /// Each cell comes from one parent, picked at random. See [`probabilistic`].
    #[default]
    Probabilistic,
    /// Each cell is a weighted mean of both parents. See [`average`].
    WeightedAverage,
}

const SMASH_TABLE: [(SmashMethod, SmashFn); 2] = [
    (SmashMethod::Probabilistic, probabilistic),
    (SmashMethod::WeightedAverage, average),
];

impl SmashMethod {
    pub const ALL: [SmashMethod; 2] = [SmashMethod::Probabilistic, SmashMethod::WeightedAverage];

    /// The operator implementing this method.
    pub fn resolve(self) -> SmashFn {
        SMASH_TABLE[self as usize].1
    }

    pub fn label(self) -> &'static str {
        match self {
            SmashMethod::Probabilistic => "Probabilistic",
            SmashMethod::WeightedAverage => "Weighted average",
        }
    }
}

fn check_shape(g1: &PlantGenom, g2: &PlantGenom) -> Result<(), SmashError> {
    if g1.len() != g2.len() {
        return Err(SmashError::ShapeMismatch {
            left: g1.len(),
            right: g2.len(),
        });
    }
    Ok(())
}

/// Builds a genome of the same shape as `g1` and `g2` from a per-cell rule.
fn combine(
    g1: &PlantGenom,
    g2: &PlantGenom,
    mut cell: impl FnMut(i32, i32) -> i32,
) -> PlantGenom {
    let agents = g1
        .agents()
        .iter()
        .zip(g2.agents())
        .map(|(a, b)| {
            let (a, b) = (a.to_row(), b.to_row());
            AgentGenom::from_row(std::array::from_fn(|i| cell(a[i], b[i])))
        })
        .collect();
    PlantGenom::new(agents)
}

/// Replaces `mutations` random cells with the matching cells of a freshly
/// random genome.
///
/// Coordinates are drawn with replacement, so the result differs from
/// `genom` in at most `mutations` cells.
pub fn mutate(genom: &PlantGenom, mutations: usize, rng: &mut dyn RngCore) -> PlantGenom {
    let generations = genom.len();
    if mutations == 0 || generations == 0 {
        return genom.clone();
    }

    let donor = PlantGenom::random(generations, rng);
    let mut agents = genom.clone().into_agents();
    for _ in 0..mutations {
        let generation = rng.random_range(0..generations);
        let gene = Gene::ALL[rng.random_range(0..GENE_COUNT)];
        agents[generation].set(gene, donor.agents()[generation].get(gene));
    }
    PlantGenom::new(agents)
}

/// Per cell, inherits from `g1` with probability `probability`, otherwise
/// from `g2`; then applies [`mutate`].
///
/// The draw is uniform on `(0, 1]` and `g2` wins when it exceeds
/// `probability`, so `1.0` always copies `g1` and `0.0` always copies `g2`.
pub fn probabilistic(
    g1: &PlantGenom,
    g2: &PlantGenom,
    probability: f64,
    mutations: usize,
    rng: &mut dyn RngCore,
) -> Result<PlantGenom, SmashError> {
    if !(0.0..=1.0).contains(&probability) {
        return Err(SmashError::InvalidProbability(probability));
    }
    check_shape(g1, g2)?;

    let smashed = combine(g1, g2, |a, b| {
        let u = 1.0 - rng.random::<f64>();
        if u > probability { b } else { a }
    });
    Ok(mutate(&smashed, mutations, rng))
}

/// Per cell, `weight * g1 + (1 - weight) * g2` truncated toward zero; then
/// applies [`mutate`].
pub fn average(
    g1: &PlantGenom,
    g2: &PlantGenom,
    weight: f64,
    mutations: usize,
    rng: &mut dyn RngCore,
) -> Result<PlantGenom, SmashError> {
    if !(0.0..=1.0).contains(&weight) {
        return Err(SmashError::InvalidWeight(weight));
    }
    check_shape(g1, g2)?;

    let smashed = combine(g1, g2, |a, b| {
        (weight * a as f64 + (1.0 - weight) * b as f64) as i32
    });
    Ok(mutate(&smashed, mutations, rng))
}

/// Combines two genomes with the configured method.
pub fn smash(
    g1: &PlantGenom,
    g2: &PlantGenom,
    cfg: &SmashConfig,
    rng: &mut dyn RngCore,
) -> Result<PlantGenom, SmashError> {
    debug!(
        method = cfg.method.label(),
        weight = cfg.weight,
        mutations = cfg.mutations,
        "smashing genomes"
    );
    (cfg.method.resolve())(g1, g2, cfg.weight, cfg.mutations, rng)
}

/// Folds [`smash`] over `genomes` from the left.
///
/// An empty slice yields [`PlantGenom::empty`] with the canonical number of
/// generations; a single genome is returned unchanged.
pub fn mass_smash(
    genomes: &[PlantGenom],
    cfg: &SmashConfig,
    rng: &mut dyn RngCore,
) -> Result<PlantGenom, SmashError> {
    let Some((first, rest)) = genomes.split_first() else {
        return Ok(PlantGenom::empty(DEFAULT_GENERATIONS));
    };

    let op = cfg.method.resolve();
    debug!(
        genomes = genomes.len(),
        method = cfg.method.label(),
        "mass smash"
    );
    rest.iter().try_fold(first.clone(), |acc, genom| {
        op(&acc, genom, cfg.weight, cfg.mutations, &mut *rng)
    })
}
