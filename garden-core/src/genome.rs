//! Heritable trait sets.
//!
//! An [`AgentGenom`] holds the 20 integer genes of one generation; a
//! [`PlantGenom`] is the ordered list of those, indexed by generation depth.
//! Plant genomes are never modified once built: growth reads them through
//! [`PlantGenom::evolve`], which always hands back a fresh copy.

use std::ops::RangeInclusive;

use rand::Rng;
use thiserror::Error;

use crate::math::Color;
use crate::types::Generation;

/// Number of genes in an [`AgentGenom`].
pub const GENE_COUNT: usize = 20;

/// Canonical number of generations in a [`PlantGenom`].
pub const DEFAULT_GENERATIONS: usize = 9;

/// Names the genes of an [`AgentGenom`], in canonical order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gene {
    Length,
    LengthDeviation,
    Size,
    SizeFromAncestor,
    SizeFromLevel,
    SizeChanges,
    Red,
    Green,
    Blue,
    RedChanges,
    GreenChanges,
    BlueChanges,
    ColorFromAncestor,
    ColorDeviation,
    NumberBranches,
    AngleBranches,
    AngleDeviation,
    Turn,
    RandomTurn,
    Down,
}

impl Gene {
    /// Every gene, in the row order of the text format.
    pub const ALL: [Gene; GENE_COUNT] = [
        Gene::Length,
        Gene::LengthDeviation,
        Gene::Size,
        Gene::SizeFromAncestor,
        Gene::SizeFromLevel,
        Gene::SizeChanges,
        Gene::Red,
        Gene::Green,
        Gene::Blue,
        Gene::RedChanges,
        Gene::GreenChanges,
        Gene::BlueChanges,
        Gene::ColorFromAncestor,
        Gene::ColorDeviation,
        Gene::NumberBranches,
        Gene::AngleBranches,
        Gene::AngleDeviation,
        Gene::Turn,
        Gene::RandomTurn,
        Gene::Down,
    ];

    /// Row index of this gene in [`Gene::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Gene::Length => "length",
            Gene::LengthDeviation => "length_deviation",
            Gene::Size => "size",
            Gene::SizeFromAncestor => "size_from_ancestor",
            Gene::SizeFromLevel => "size_from_level",
            Gene::SizeChanges => "size_changes",
            Gene::Red => "red",
            Gene::Green => "green",
            Gene::Blue => "blue",
            Gene::RedChanges => "red_changes",
            Gene::GreenChanges => "green_changes",
            Gene::BlueChanges => "blue_changes",
            Gene::ColorFromAncestor => "color_from_ancestor",
            Gene::ColorDeviation => "color_deviation",
            Gene::NumberBranches => "number_branches",
            Gene::AngleBranches => "angle_branches",
            Gene::AngleDeviation => "angle_deviation",
            Gene::Turn => "turn",
            Gene::RandomTurn => "random_turn",
            Gene::Down => "down",
        }
    }

    /// Range [`AgentGenom::random`] draws this gene from.
    pub fn range(self) -> RangeInclusive<i32> {
        match self {
            Gene::Length => 20..=150,
            Gene::LengthDeviation => 0..=30,
            Gene::Size => 5..=80,
            Gene::SizeFromAncestor => 10..=90,
            Gene::SizeFromLevel => 5..=100,
            Gene::SizeChanges => -30..=30,
            Gene::Red | Gene::Green | Gene::Blue => 0..=255,
            Gene::RedChanges | Gene::GreenChanges | Gene::BlueChanges => 0..=255,
            Gene::ColorFromAncestor => 0..=80,
            Gene::ColorDeviation => -20..=20,
            Gene::NumberBranches => 1..=3,
            Gene::AngleBranches => 0..=120,
            Gene::AngleDeviation => 10..=30,
            Gene::Turn => -120..=120,
            Gene::RandomTurn => 0..=80,
            Gene::Down => -30..=30,
        }
    }
}

/// The trait set expressed by one generation of a plant.
///
/// `Default` is the all-zero genome, which doubles as the neutral ancestor
/// used to seed generation 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AgentGenom {
    pub length: i32,
    pub length_deviation: i32,

    pub size: i32,
    pub size_from_ancestor: i32,
    pub size_from_level: i32,
    pub size_changes: i32,

    pub red: i32,
    pub green: i32,
    pub blue: i32,
    pub red_changes: i32,
    pub green_changes: i32,
    pub blue_changes: i32,
    pub color_from_ancestor: i32,
    pub color_deviation: i32,

    pub number_branches: i32,
    pub angle_branches: i32,
    pub angle_deviation: i32,

    pub turn: i32,
    pub random_turn: i32,
    pub down: i32,
}

impl AgentGenom {
    /// Draws every gene independently and uniformly from [`Gene::range`].
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut genom = Self::default();
        for gene in Gene::ALL {
            genom.set(gene, rng.random_range(gene.range()));
        }
        genom
    }

    pub fn get(&self, gene: Gene) -> i32 {
        match gene {
            Gene::Length => self.length,
            Gene::LengthDeviation => self.length_deviation,
            Gene::Size => self.size,
            Gene::SizeFromAncestor => self.size_from_ancestor,
            Gene::SizeFromLevel => self.size_from_level,
            Gene::SizeChanges => self.size_changes,
            Gene::Red => self.red,
            Gene::Green => self.green,
            Gene::Blue => self.blue,
            Gene::RedChanges => self.red_changes,
            Gene::GreenChanges => self.green_changes,
            Gene::BlueChanges => self.blue_changes,
            Gene::ColorFromAncestor => self.color_from_ancestor,
            Gene::ColorDeviation => self.color_deviation,
            Gene::NumberBranches => self.number_branches,
            Gene::AngleBranches => self.angle_branches,
            Gene::AngleDeviation => self.angle_deviation,
            Gene::Turn => self.turn,
            Gene::RandomTurn => self.random_turn,
            Gene::Down => self.down,
        }
    }

    pub fn set(&mut self, gene: Gene, value: i32) {
        let slot = match gene {
            Gene::Length => &mut self.length,
            Gene::LengthDeviation => &mut self.length_deviation,
            Gene::Size => &mut self.size,
            Gene::SizeFromAncestor => &mut self.size_from_ancestor,
            Gene::SizeFromLevel => &mut self.size_from_level,
            Gene::SizeChanges => &mut self.size_changes,
            Gene::Red => &mut self.red,
            Gene::Green => &mut self.green,
            Gene::Blue => &mut self.blue,
            Gene::RedChanges => &mut self.red_changes,
            Gene::GreenChanges => &mut self.green_changes,
            Gene::BlueChanges => &mut self.blue_changes,
            Gene::ColorFromAncestor => &mut self.color_from_ancestor,
            Gene::ColorDeviation => &mut self.color_deviation,
            Gene::NumberBranches => &mut self.number_branches,
            Gene::AngleBranches => &mut self.angle_branches,
            Gene::AngleDeviation => &mut self.angle_deviation,
            Gene::Turn => &mut self.turn,
            Gene::RandomTurn => &mut self.random_turn,
            Gene::Down => &mut self.down,
        };
        *slot = value;
    }

    /// Gene values in canonical order.
    pub fn to_row(&self) -> [i32; GENE_COUNT] {
        Gene::ALL.map(|gene| self.get(gene))
    }

    pub fn from_row(row: [i32; GENE_COUNT]) -> Self {
        let mut genom = Self::default();
        for (gene, value) in Gene::ALL.into_iter().zip(row) {
            genom.set(gene, value);
        }
        genom
    }

    /// The expressed color, clamped into range.
    #[inline]
    pub fn color(&self) -> Color {
        Color::new(self.red, self.green, self.blue)
    }
}

/// Errors from rebuilding a [`PlantGenom`] out of a gene table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenomeShapeError {
    #[error("gene table has {found} rows, expected {expected}")]
    RowCount { expected: usize, found: usize },
    #[error("gene table row {row} ({gene}) has {found} columns, expected {expected}")]
    ColumnCount {
        row: usize,
        gene: &'static str,
        expected: usize,
        found: usize,
    },
}

/// A whole plant's genetics: one [`AgentGenom`] per generation depth.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PlantGenom {
    genom: Vec<AgentGenom>,
}

impl PlantGenom {
    pub fn new(genom: Vec<AgentGenom>) -> Self {
        Self { genom }
    }

    pub fn random<R: Rng + ?Sized>(generations: usize, rng: &mut R) -> Self {
        Self::new((0..generations).map(|_| AgentGenom::random(&mut *rng)).collect())
    }

    /// A genome of `generations` all-zero trait sets.
    ///
    /// With `number_branches == 0` everywhere, a plant grown from it has no
    /// agents at all.
    pub fn empty(generations: usize) -> Self {
        Self::new(vec![AgentGenom::default(); generations])
    }

    /// Number of generations.
    #[inline]
    pub fn len(&self) -> usize {
        self.genom.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.genom.is_empty()
    }

    #[inline]
    pub fn agents(&self) -> &[AgentGenom] {
        &self.genom
    }

    #[inline]
    pub fn get(&self, generation: Generation) -> Option<&AgentGenom> {
        self.genom.get(generation)
    }

    pub fn into_agents(self) -> Vec<AgentGenom> {
        self.genom
    }

    /// Value of one cell, indexed as in the text table; `None` past the
    /// last generation.
    #[inline]
    pub fn cell(&self, generation: Generation, gene: Gene) -> Option<i32> {
        self.genom.get(generation).map(|agent| agent.get(gene))
    }

    /// Transposed view: one row per gene, one column per generation.
    pub fn table(&self) -> Vec<Vec<i32>> {
        Gene::ALL
            .iter()
            .map(|&gene| self.genom.iter().map(|a| a.get(gene)).collect())
            .collect()
    }

    /// Inverse of [`PlantGenom::table`].
    ///
    /// The table must have exactly [`GENE_COUNT`] rows of equal length.
    pub fn from_table(table: &[Vec<i32>]) -> Result<Self, GenomeShapeError> {
        if table.len() != GENE_COUNT {
            return Err(GenomeShapeError::RowCount {
                expected: GENE_COUNT,
                found: table.len(),
            });
        }

        let generations = table[0].len();
        for (row, values) in table.iter().enumerate() {
            if values.len() != generations {
                return Err(GenomeShapeError::ColumnCount {
                    row,
                    gene: Gene::ALL[row].name(),
                    expected: generations,
                    found: values.len(),
                });
            }
        }

        let genom = (0..generations)
            .map(|column| AgentGenom::from_row(std::array::from_fn(|row| table[row][column])))
            .collect();
        Ok(Self::new(genom))
    }

    /// Derives the genes of generation `generation` from a dying parent.
    ///
    /// Returns `None` once `generation` is past the last stored generation;
    /// that ends the lineage. Otherwise the stored trait set is copied and
    /// blended with the parent's expressed genes:
    ///
    /// - `size = size_from_ancestor% * (parent.size + (size_from_level + size) / 2)`
    /// - `length = length ± parent.length_deviation` (uniform)
    /// - `angle_branches = angle_branches + parent.angle_deviation`
    /// - per channel: `color_from_ancestor% * ((parent + color_deviation) + color)`,
    ///   clamped after every step
    ///
    /// Integer sums saturate, so any imported table is safe to grow. The
    /// stored genome is never touched.
    pub fn evolve<R: Rng + ?Sized>(
        &self,
        generation: Generation,
        parent: &AgentGenom,
        rng: &mut R,
    ) -> Option<AgentGenom> {
        let mut evolved = *self.genom.get(generation)?;

        let size_percent = evolved.size_from_ancestor as f32 / 100.0;
        let level_size = (evolved.size_from_level as f32 + evolved.size as f32) / 2.0;
        evolved.size = (size_percent * (parent.size as f32 + level_size)) as i32;

        let deviation = parent.length_deviation.saturating_abs();
        evolved.length = evolved
            .length
            .saturating_add(rng.random_range(-deviation..=deviation));
        evolved.angle_branches = evolved
            .angle_branches
            .saturating_add(parent.angle_deviation);

        let inherited = Color::new(
            parent.red.saturating_add(evolved.color_deviation),
            parent.green.saturating_add(evolved.color_deviation),
            parent.blue.saturating_add(evolved.color_deviation),
        );
        let blended =
            (inherited + evolved.color()) * (evolved.color_from_ancestor as f32 / 100.0);
        let [r, g, b] = blended.rgb();
        evolved.red = r as i32;
        evolved.green = g as i32;
        evolved.blue = b as i32;

        Some(evolved)
    }
}
