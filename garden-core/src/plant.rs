//! Growth of a whole plant.
//!
//! A [`Plant`] keeps the *frontier*: the ordered list of agents that are
//! still growing. Each call to [`Plant::get_circles`] yields one circle per
//! frontier agent and then rebuilds the frontier: agents with steps left
//! stay, dead agents are replaced by their heirs. Growth ends when the
//! frontier is empty.
//!
//! Termination follows from two bounds: every agent's `length` strictly
//! decreases per step, and every heir is one generation deeper than its
//! parent, while [`PlantGenom::evolve`] refuses generations past the
//! template's length.

use std::sync::Arc;

use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, trace};

use crate::agent::{Agent, spawn_branches};
use crate::config::GrowthConfig;
use crate::genome::{AgentGenom, PlantGenom};
use crate::math::{UP, Vec2};
use crate::types::Circle;

/// Builds the generation-0 frontier for `template`.
///
/// Generation 0 is evolved from the all-zero neutral genome at `start_pos`,
/// heading [`UP`], exactly like any later branch point.
pub fn seed_agents<R: rand::Rng + ?Sized>(
    template: &Arc<PlantGenom>,
    start_pos: Vec2,
    rng: &mut R,
) -> Vec<Agent> {
    let neutral = AgentGenom::default();
    match template.evolve(0, &neutral, rng) {
        Some(genom) => spawn_branches(genom, template, 0, start_pos, UP),
        None => Vec::new(),
    }
}

/// Rough number of circles a plant grown from `template` will emit.
///
/// Sums, per generation, the stored `length` (at least 1) times the number
/// of agents expected at that depth. Length deviation and early deaths are
/// ignored, so this is only good for progress reporting.
pub fn estimate_total(template: &PlantGenom) -> u64 {
    let mut agents: u64 = 1;
    let mut total: u64 = 0;
    for genom in template.agents() {
        agents = agents.saturating_mul(genom.number_branches.max(0) as u64);
        total = total.saturating_add(agents.saturating_mul(genom.length.max(1) as u64));
    }
    total
}

/// One growth run of a plant.
///
/// The template genome is shared read-only with every agent; the RNG is
/// owned by the plant, so two plants built with the same seed, template and
/// config emit identical circle streams.
#[derive(Debug)]
pub struct Plant {
    template: Arc<PlantGenom>,
    frontier: Vec<Agent>,
    start_pos: Vec2,
    cfg: GrowthConfig,
    rng: StdRng,
    drawn: u64,
    total: u64,
}

impl Plant {
    /// Creates a plant with the default config and an OS-seeded RNG.
    pub fn new(template: impl Into<Arc<PlantGenom>>, start_pos: Vec2) -> Self {
        Self::with_config(
            template,
            start_pos,
            GrowthConfig::default(),
            StdRng::from_os_rng(),
        )
    }

    /// Creates a plant with the default config and a reproducible RNG.
    pub fn with_seed(template: impl Into<Arc<PlantGenom>>, start_pos: Vec2, seed: u64) -> Self {
        Self::with_config(
            template,
            start_pos,
            GrowthConfig::default(),
            StdRng::seed_from_u64(seed),
        )
    }

    pub fn with_config(
        template: impl Into<Arc<PlantGenom>>,
        start_pos: Vec2,
        cfg: GrowthConfig,
        mut rng: StdRng,
    ) -> Self {
        let template = template.into();
        let frontier = seed_agents(&template, start_pos, &mut rng);
        let total = estimate_total(&template);

        debug!(
            generations = template.len(),
            frontier = frontier.len(),
            total,
            "plant seeded"
        );

        Self {
            template,
            frontier,
            start_pos,
            cfg,
            rng,
            drawn: 0,
            total,
        }
    }

    #[inline]
    pub fn is_growing(&self) -> bool {
        !self.frontier.is_empty()
    }

    /// Returns the lazy stream of circles for one growth step.
    ///
    /// The iterator yields one circle per frontier agent, in frontier
    /// order. When it is exhausted, or dropped early, the frontier is
    /// rebuilt: surviving agents first, in their previous order, then the
    /// heirs of the agents that died, grouped by parent in frontier order
    /// and by branch index within a parent. Agents the iterator never
    /// reached are kept as they are.
    pub fn get_circles(&mut self) -> Circles<'_> {
        Circles {
            plant: self,
            next: 0,
            committed: false,
        }
    }

    /// Runs growth to completion (or for at most `max_steps` steps) and
    /// collects every circle.
    pub fn grow_to_end(&mut self, max_steps: usize) -> Vec<Circle> {
        let mut circles = Vec::new();
        for _ in 0..max_steps {
            if !self.is_growing() {
                break;
            }
            circles.extend(self.get_circles());
        }
        circles
    }

    /// Circles emitted so far.
    #[inline]
    pub fn drawn(&self) -> u64 {
        self.drawn
    }

    /// Estimated number of circles for the whole run; never below
    /// [`Plant::drawn`].
    #[inline]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Fraction of the estimated total drawn so far, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if !self.is_growing() || self.total == 0 {
            return 1.0;
        }
        (self.drawn as f64 / self.total as f64).min(1.0) as f32
    }

    #[inline]
    pub fn start_pos(&self) -> Vec2 {
        self.start_pos
    }

    #[inline]
    pub fn template(&self) -> &Arc<PlantGenom> {
        &self.template
    }

    #[inline]
    pub fn frontier(&self) -> &[Agent] {
        &self.frontier
    }

    #[inline]
    pub fn config(&self) -> &GrowthConfig {
        &self.cfg
    }

    /// Replaces the dead agents among the first `visited` frontier entries
    /// with their heirs.
    fn advance(&mut self, visited: usize) {
        let frontier = std::mem::take(&mut self.frontier);
        let mut survivors = Vec::with_capacity(frontier.len());
        let mut heirs = Vec::new();

        for (i, agent) in frontier.into_iter().enumerate() {
            if i >= visited || agent.is_live() {
                survivors.push(agent);
            } else {
                heirs.extend(agent.get_heirs(&mut self.rng));
            }
        }

        trace!(
            survivors = survivors.len(),
            heirs = heirs.len(),
            drawn = self.drawn,
            "frontier advanced"
        );

        survivors.append(&mut heirs);
        self.frontier = survivors;

        if self.frontier.is_empty() {
            debug!(drawn = self.drawn, "plant finished growing");
        }
    }
}

/// Iterator returned by [`Plant::get_circles`].
///
/// Finite and single-use: once it has run (or been dropped) the plant has
/// moved on to the next step.
#[derive(Debug)]
pub struct Circles<'a> {
    plant: &'a mut Plant,
    next: usize,
    committed: bool,
}

impl Circles<'_> {
    fn commit(&mut self) {
        if !self.committed {
            self.committed = true;
            self.plant.advance(self.next);
        }
    }
}

impl Iterator for Circles<'_> {
    type Item = Circle;

    fn next(&mut self) -> Option<Circle> {
        if self.committed {
            return None;
        }

        let plant = &mut *self.plant;
        if self.next < plant.frontier.len() {
            let circle = plant.frontier[self.next].get_circle(&plant.cfg, &mut plant.rng);
            self.next += 1;
            plant.drawn += 1;
            plant.total = plant.total.max(plant.drawn);
            return Some(circle);
        }

        self.commit();
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = if self.committed {
            0
        } else {
            self.plant.frontier.len() - self.next
        };
        (left, Some(left))
    }
}

impl Drop for Circles<'_> {
    fn drop(&mut self) {
        self.commit();
    }
}
