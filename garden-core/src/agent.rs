//! A single growing tip of a plant.

use std::sync::Arc;

use glam::Vec3;
use rand::Rng;
use tracing::trace;

use crate::config::GrowthConfig;
use crate::genome::{AgentGenom, PlantGenom};
use crate::math::{Color, Rotate, UP, Vec2};
use crate::types::{Circle, Generation};

/// One growing tip.
///
/// The agent owns a private copy of its generation's genes and mutates it
/// in place as it grows: `length` counts down the remaining steps, `size`
/// and the color channels drift every step. The template genome is only
/// read, when the agent dies and its heirs are evolved.
#[derive(Clone, Debug)]
pub struct Agent {
    genom: AgentGenom,
    template: Arc<PlantGenom>,
    generation: Generation,
    pos: Vec2,
    heading: Vec2,
    /// Fractional color; `genom.{red,green,blue}` is its truncation.
    tint: Vec3,
}

impl Agent {
    pub fn new(
        genom: AgentGenom,
        template: Arc<PlantGenom>,
        generation: Generation,
        pos: Vec2,
        heading: Vec2,
    ) -> Self {
        let tint = Vec3::new(genom.red as f32, genom.green as f32, genom.blue as f32)
            .clamp(Vec3::ZERO, Vec3::splat(255.0));
        Self {
            genom,
            template,
            generation,
            pos,
            heading: heading.normalize_or(UP),
            tint,
        }
    }

    #[inline]
    pub fn genom(&self) -> &AgentGenom {
        &self.genom
    }

    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn heading(&self) -> Vec2 {
        self.heading
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.genom.color()
    }

    /// `true` while steps remain. An agent born with `length <= 0` still
    /// emits one circle before it is replaced by its heirs.
    #[inline]
    pub fn is_live(&self) -> bool {
        self.genom.length > 0
    }

    /// Emits the circle for the current state, then advances one step.
    ///
    /// The returned circle describes the agent *before* the step. The step
    /// itself:
    /// 1. drifts each color channel by its normalized `*_changes` gene;
    /// 2. adds `size_changes` to `size`;
    /// 3. turns the heading by `turn` degrees plus a uniform random angle
    ///    within `±random_turn` degrees, then bends it toward `+y` by `down`;
    /// 4. moves `step_len` along the new heading;
    /// 5. decrements `length`.
    pub fn get_circle<R: Rng + ?Sized>(&mut self, cfg: &GrowthConfig, rng: &mut R) -> Circle {
        let circle = Circle::new(self.pos, self.genom.size as f32, self.genom.color());

        let changes = Vec3::new(
            self.genom.red_changes as f32,
            self.genom.green_changes as f32,
            self.genom.blue_changes as f32,
        );
        let drift = (changes / 255.0 - Vec3::splat(0.5)) * cfg.color_drift;
        self.tint = (self.tint + drift).clamp(Vec3::ZERO, Vec3::splat(255.0));
        self.genom.red = self.tint.x as i32;
        self.genom.green = self.tint.y as i32;
        self.genom.blue = self.tint.z as i32;

        self.genom.size = self.genom.size.saturating_add(self.genom.size_changes);

        let mut angle = self.genom.turn as f32;
        let spread = self.genom.random_turn.unsigned_abs() as f32;
        if spread > 0.0 {
            angle += rng.random_range(-spread..=spread);
        }
        let bent = self.heading.rotate_deg(angle) + Vec2::Y * (self.genom.down as f32 * cfg.tropism);
        self.heading = bent.normalize_or(self.heading);

        self.pos += self.heading * cfg.step_len;
        self.genom.length = self.genom.length.saturating_sub(1);

        circle
    }

    /// Spawns the next generation from this agent's current state.
    ///
    /// Returns an empty list when the template has no generation past this
    /// one.
    pub fn get_heirs<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Agent> {
        let next = self.generation + 1;
        match self.template.evolve(next, &self.genom, rng) {
            Some(evolved) => spawn_branches(evolved, &self.template, next, self.pos, self.heading),
            None => {
                trace!(generation = self.generation, "lineage ended");
                Vec::new()
            }
        }
    }

    #[cfg(test)]
    fn with_heading(mut self, heading: Vec2) -> Self {
        self.heading = heading;
        self
    }
}

/// Fans `genom.number_branches` children around `axis`.
///
/// Child `i` of `n` is rotated by `angle_branches * (i - n / 2)` degrees,
/// plus half a step when `n` is even, so the fan is symmetric about the
/// axis. Each child gets its own copy of `genom`.
pub fn spawn_branches(
    genom: AgentGenom,
    template: &Arc<PlantGenom>,
    generation: Generation,
    pos: Vec2,
    axis: Vec2,
) -> Vec<Agent> {
    let n = genom.number_branches.max(0);
    let step = genom.angle_branches as f32;
    let correction = if n % 2 == 0 { step / 2.0 } else { 0.0 };

    (0..n)
        .map(|i| {
            let offset = step * (i - n / 2) as f32 + correction;
            Agent::new(
                genom,
                Arc::clone(template),
                generation,
                pos,
                axis.rotate_deg(offset),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn still_agent() -> AgentGenom {
        AgentGenom {
            length: 3,
            size: 10,
            size_changes: 2,
            red: 100,
            green: 100,
            blue: 100,
            red_changes: 255,
            green_changes: 0,
            blue_changes: 128,
            number_branches: 2,
            angle_branches: 40,
            ..AgentGenom::default()
        }
    }

    fn single(genom: AgentGenom, template: PlantGenom) -> Agent {
        Agent::new(genom, Arc::new(template), 0, Vec2::ZERO, UP)
    }

    fn assert_close(a: Vec2, b: Vec2) {
        assert!((a - b).length() < 1e-4, "{a:?} != {b:?}");
    }

    #[test]
    fn circle_reflects_state_before_step() {
        let mut rng = StdRng::seed_from_u64(0);
        let cfg = GrowthConfig::default();
        let mut agent = single(still_agent(), PlantGenom::empty(1));

        let first = agent.get_circle(&cfg, &mut rng);
        assert_eq!(first.pos, Vec2::ZERO);
        assert_eq!(first.radius, 10.0);
        assert_eq!(first.color, Color::gray(100));

        let second = agent.get_circle(&cfg, &mut rng);
        assert_close(second.pos, UP * cfg.step_len);
        assert_eq!(second.radius, 12.0);
        // red drifts +1 per step, green -1, blue barely moves.
        assert_eq!(second.color.rgb(), [101, 99, 100]);
    }

    #[test]
    fn length_counts_down_to_death() {
        let mut rng = StdRng::seed_from_u64(1);
        let cfg = GrowthConfig::default();
        let mut agent = single(still_agent(), PlantGenom::empty(1));

        let mut steps = 0;
        while agent.is_live() {
            agent.get_circle(&cfg, &mut rng);
            steps += 1;
        }
        assert_eq!(steps, 3);
        assert_eq!(agent.genom().length, 0);
    }

    #[test]
    fn agent_born_without_length_is_dead() {
        let agent = single(AgentGenom::default(), PlantGenom::empty(1));
        assert!(!agent.is_live());
    }

    #[test]
    fn turn_applies_in_full_every_step() {
        let mut rng = StdRng::seed_from_u64(2);
        let cfg = GrowthConfig::default();
        let genom = AgentGenom {
            length: 9,
            turn: 90,
            ..AgentGenom::default()
        };
        let mut agent = single(genom, PlantGenom::empty(1));

        agent.get_circle(&cfg, &mut rng);
        assert_close(agent.heading(), UP.rotate_deg(90.0));
        agent.get_circle(&cfg, &mut rng);
        assert_close(agent.heading(), UP.rotate_deg(180.0));
    }

    #[test]
    fn random_turn_spreads_over_full_range() {
        let cfg = GrowthConfig::default();
        let genom = AgentGenom {
            length: 5,
            random_turn: 80,
            ..AgentGenom::default()
        };

        let mut widest: f32 = 0.0;
        for seed in 0..500 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut agent = single(genom, PlantGenom::empty(1));
            agent.get_circle(&cfg, &mut rng);
            let deviation = UP.angle_to(agent.heading()).to_degrees().abs();
            assert!(deviation <= 80.0 + 1e-3, "turned {deviation} degrees");
            widest = widest.max(deviation);
        }
        assert!(widest > 70.0, "widest turn was {widest} degrees");
    }

    #[test]
    fn extreme_genes_saturate_instead_of_overflowing() {
        let mut rng = StdRng::seed_from_u64(7);
        let cfg = GrowthConfig::default();
        let genom = AgentGenom {
            length: i32::MIN,
            size: i32::MAX,
            size_changes: i32::MAX,
            turn: i32::MAX,
            random_turn: i32::MIN,
            down: i32::MIN,
            ..AgentGenom::default()
        };
        let mut agent = single(genom, PlantGenom::empty(1));

        agent.get_circle(&cfg, &mut rng);
        agent.get_circle(&cfg, &mut rng);
        assert_eq!(agent.genom().size, i32::MAX);
        assert_eq!(agent.genom().length, i32::MIN);
        assert!(agent.heading().is_finite());
    }

    #[test]
    fn down_bends_heading_toward_positive_y() {
        let mut rng = StdRng::seed_from_u64(3);
        let cfg = GrowthConfig::default();
        let genom = AgentGenom {
            length: 10,
            down: 30,
            ..AgentGenom::default()
        };
        let mut agent = single(genom, PlantGenom::empty(1)).with_heading(Vec2::X);

        agent.get_circle(&cfg, &mut rng);
        assert!(agent.heading().y > 0.0);
        assert!((agent.heading().length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn heirs_fan_symmetrically_for_even_count() {
        let mut rng = StdRng::seed_from_u64(4);
        let child = AgentGenom {
            length: 5,
            number_branches: 2,
            angle_branches: 40,
            ..AgentGenom::default()
        };
        let template = PlantGenom::new(vec![AgentGenom::default(), child]);
        let agent = single(AgentGenom::default(), template);

        let heirs = agent.get_heirs(&mut rng);
        assert_eq!(heirs.len(), 2);
        assert_close(heirs[0].heading(), UP.rotate_deg(-20.0));
        assert_close(heirs[1].heading(), UP.rotate_deg(20.0));
        for heir in &heirs {
            assert_eq!(heir.generation(), 1);
            assert_eq!(heir.pos(), agent.pos());
        }
    }

    #[test]
    fn heirs_fan_around_axis_for_odd_count() {
        let child = AgentGenom {
            length: 5,
            number_branches: 3,
            angle_branches: 30,
            ..AgentGenom::default()
        };
        let template = Arc::new(PlantGenom::new(vec![child]));

        let heirs = spawn_branches(child, &template, 0, Vec2::ZERO, UP);
        assert_eq!(heirs.len(), 3);
        assert_close(heirs[0].heading(), UP.rotate_deg(-30.0));
        assert_close(heirs[1].heading(), UP);
        assert_close(heirs[2].heading(), UP.rotate_deg(30.0));
    }

    #[test]
    fn heirs_own_independent_genomes() {
        let mut rng = StdRng::seed_from_u64(5);
        let cfg = GrowthConfig::default();
        let child = AgentGenom {
            length: 4,
            size: 6,
            size_changes: 3,
            number_branches: 2,
            ..AgentGenom::default()
        };
        let template = Arc::new(PlantGenom::new(vec![child]));
        let mut heirs = spawn_branches(child, &template, 0, Vec2::ZERO, UP);

        heirs[0].get_circle(&cfg, &mut rng);
        heirs[0].get_circle(&cfg, &mut rng);

        assert_eq!(heirs[0].genom().length, 2);
        assert_eq!(heirs[1].genom().length, 4);
        assert_eq!(heirs[1].genom().size, 6);
        assert_eq!(template.agents()[0], child);
    }

    #[test]
    fn no_heirs_past_last_generation() {
        let mut rng = StdRng::seed_from_u64(6);
        let template = PlantGenom::new(vec![still_agent()]);
        let agent = single(still_agent(), template);
        assert!(agent.get_heirs(&mut rng).is_empty());
    }

    #[test]
    fn negative_branch_count_spawns_nothing() {
        let genom = AgentGenom {
            number_branches: -2,
            ..AgentGenom::default()
        };
        let template = Arc::new(PlantGenom::new(vec![genom]));
        assert!(spawn_branches(genom, &template, 0, Vec2::ZERO, UP).is_empty());
    }
}
