//! Plain-text genome tables.
//!
//! A genome is written as one line per gene, in [`Gene::ALL`] order, each
//! line holding one integer for each of the [`DEFAULT_GENERATIONS`]
//! generations:
//!
//! ```text
//! 85	40	120	...	(length)
//! 12	0	7	...	(length_deviation)
//! ...
//! ```
//!
//! [`export_genom`] separates values with tabs and ends every line with a
//! newline; [`import_genom`] accepts any whitespace and ignores trailing
//! blank lines. For integer genomes the two are exact inverses.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::genome::{DEFAULT_GENERATIONS, GENE_COUNT, Gene, GenomeShapeError, PlantGenom};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenomeFormatError {
    #[error("genome text has {found} rows, expected {expected}")]
    RowCount { expected: usize, found: usize },
    #[error("row {row} ({gene}) is empty")]
    EmptyRow { row: usize, gene: &'static str },
    #[error("row {row} ({gene}) has {found} values, expected {expected}")]
    ColumnCount {
        row: usize,
        gene: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("row {row} ({gene}), column {column}: {token:?} is not an integer")]
    InvalidToken {
        row: usize,
        gene: &'static str,
        column: usize,
        token: String,
    },
}

impl From<GenomeShapeError> for GenomeFormatError {
    fn from(err: GenomeShapeError) -> Self {
        match err {
            GenomeShapeError::RowCount { expected, found } => Self::RowCount { expected, found },
            GenomeShapeError::ColumnCount {
                row,
                gene,
                expected,
                found,
            } => Self::ColumnCount {
                row,
                gene,
                expected,
                found,
            },
        }
    }
}

/// Writes `genom` as a tab-separated gene table.
pub fn export_genom(genom: &PlantGenom) -> String {
    let mut out = String::new();
    for row in genom.table() {
        let line: Vec<String> = row.iter().map(i32::to_string).collect();
        out.push_str(&line.join("\t"));
        out.push('\n');
    }
    out
}

/// Parses a gene table written by [`export_genom`] (or by hand).
///
/// Fails without returning a partial genome if the table does not have
/// exactly [`GENE_COUNT`] rows, if a row is empty or does not hold exactly
/// [`DEFAULT_GENERATIONS`] values, or if any value is not an `i32`.
pub fn import_genom(text: &str) -> Result<PlantGenom, GenomeFormatError> {
    let mut lines: Vec<&str> = text.lines().collect();
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }

    if lines.len() != GENE_COUNT {
        return Err(GenomeFormatError::RowCount {
            expected: GENE_COUNT,
            found: lines.len(),
        });
    }

    let mut table = Vec::with_capacity(GENE_COUNT);

    for (row, (line, gene)) in lines.iter().zip(Gene::ALL).enumerate() {
        let gene = gene.name();
        let values = line
            .split_whitespace()
            .enumerate()
            .map(|(column, token)| {
                token
                    .parse::<i32>()
                    .map_err(|_| GenomeFormatError::InvalidToken {
                        row,
                        gene,
                        column,
                        token: token.to_owned(),
                    })
            })
            .collect::<Result<Vec<i32>, _>>()?;

        if values.is_empty() {
            return Err(GenomeFormatError::EmptyRow { row, gene });
        }

        if values.len() != DEFAULT_GENERATIONS {
            return Err(GenomeFormatError::ColumnCount {
                row,
                gene,
                expected: DEFAULT_GENERATIONS,
                found: values.len(),
            });
        }

        table.push(values);
    }

    Ok(PlantGenom::from_table(&table)?)
}

impl fmt::Display for PlantGenom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&export_genom(self))
    }
}

impl FromStr for PlantGenom {
    type Err = GenomeFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        import_genom(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::AgentGenom;
    use rand::{SeedableRng, rngs::StdRng};

    fn replace_line(text: &str, index: usize, with: &str) -> String {
        text.lines()
            .enumerate()
            .map(|(i, line)| if i == index { with } else { line })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn round_trip_random_genomes() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..50 {
            let genom = PlantGenom::random(DEFAULT_GENERATIONS, &mut rng);
            let text = export_genom(&genom);
            assert_eq!(import_genom(&text), Ok(genom));
        }
    }

    #[test]
    fn export_layout_is_gene_rows_by_generation_columns() {
        let agents = (0..DEFAULT_GENERATIONS as i32)
            .map(|g| AgentGenom {
                length: 10 + g,
                down: -g,
                ..AgentGenom::default()
            })
            .collect();
        let text = export_genom(&PlantGenom::new(agents));

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), GENE_COUNT);
        assert_eq!(lines[0], "10\t11\t12\t13\t14\t15\t16\t17\t18");
        assert_eq!(lines[1], "0\t0\t0\t0\t0\t0\t0\t0\t0");
        assert_eq!(lines[19], "0\t-1\t-2\t-3\t-4\t-5\t-6\t-7\t-8");
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn import_accepts_mixed_whitespace_and_trailing_blank_lines() {
        let mut rng = StdRng::seed_from_u64(1);
        let genom = PlantGenom::random(DEFAULT_GENERATIONS, &mut rng);
        let text = export_genom(&genom).replace('\t', "  ") + "\n   \n";
        assert_eq!(import_genom(&text), Ok(genom));
    }

    #[test]
    fn display_and_from_str_use_the_table_format() {
        let mut rng = StdRng::seed_from_u64(2);
        let genom = PlantGenom::random(DEFAULT_GENERATIONS, &mut rng);
        let parsed: PlantGenom = genom.to_string().parse().unwrap();
        assert_eq!(parsed, genom);
    }

    #[test]
    fn import_rejects_wrong_row_count() {
        let text = "1 2 3\n".repeat(GENE_COUNT - 1);
        assert_eq!(
            import_genom(&text),
            Err(GenomeFormatError::RowCount {
                expected: GENE_COUNT,
                found: GENE_COUNT - 1
            })
        );
        assert_eq!(
            import_genom(""),
            Err(GenomeFormatError::RowCount {
                expected: GENE_COUNT,
                found: 0
            })
        );
    }

    #[test]
    fn import_rejects_ragged_rows() {
        let text = export_genom(&PlantGenom::empty(DEFAULT_GENERATIONS));
        let text = replace_line(&text, 2, "0 0 0 0 0 0 0 0");
        assert_eq!(
            import_genom(&text),
            Err(GenomeFormatError::ColumnCount {
                row: 2,
                gene: "size",
                expected: 9,
                found: 8
            })
        );
    }

    #[test]
    fn import_rejects_tables_of_the_wrong_width() {
        let narrow = "1 2 3 4 5\n".repeat(GENE_COUNT);
        assert_eq!(
            import_genom(&narrow),
            Err(GenomeFormatError::ColumnCount {
                row: 0,
                gene: "length",
                expected: DEFAULT_GENERATIONS,
                found: 5
            })
        );

        let wide = export_genom(&PlantGenom::empty(DEFAULT_GENERATIONS + 1));
        assert!(matches!(
            import_genom(&wide),
            Err(GenomeFormatError::ColumnCount { row: 0, found: 10, .. })
        ));
    }

    #[test]
    fn import_accepts_extreme_integers() {
        let text = export_genom(&PlantGenom::empty(DEFAULT_GENERATIONS));
        let text = replace_line(&text, 0, "2147483647 -2147483648 0 0 0 0 0 0 0");
        let genom = import_genom(&text).unwrap();
        assert_eq!(genom.cell(0, Gene::Length), Some(i32::MAX));
        assert_eq!(genom.cell(1, Gene::Length), Some(i32::MIN));
    }

    #[test]
    fn shape_errors_map_onto_format_errors() {
        let err: GenomeFormatError = GenomeShapeError::RowCount {
            expected: GENE_COUNT,
            found: 3,
        }
        .into();
        assert_eq!(
            err,
            GenomeFormatError::RowCount {
                expected: GENE_COUNT,
                found: 3
            }
        );
    }

    #[test]
    fn import_rejects_empty_row_in_the_middle() {
        let text = export_genom(&PlantGenom::empty(DEFAULT_GENERATIONS));
        let text = replace_line(&text, 5, "");
        assert_eq!(
            import_genom(&text),
            Err(GenomeFormatError::EmptyRow {
                row: 5,
                gene: "size_changes"
            })
        );
    }

    #[test]
    fn import_rejects_non_integer_tokens() {
        let text = export_genom(&PlantGenom::empty(DEFAULT_GENERATIONS));
        let text = replace_line(&text, 6, "0 0 0 1.5 0 0 0 0 0");
        assert_eq!(
            import_genom(&text),
            Err(GenomeFormatError::InvalidToken {
                row: 6,
                gene: "red",
                column: 3,
                token: "1.5".to_owned()
            })
        );
    }
}
