//! PLA (Berkeley-format) reader/writer (§6), grounded on the teacher's
//! `pla.rs` `PLAReader`/`PLAWriter` traits, re-shaped around this crate's
//! `Cube`/`TruthTable` instead of the teacher's `Cover`.
//!
//! Supports `.i`, `.o`, `.p`, `.ilb`, `.ob`, `.type`, `.e`, is whitespace
//! tolerant, and treats `#` as a line comment, matching §6. Only the `F`
//! (ON-set only) cover type is modeled: each row marks, per output column,
//! whether that cube belongs to the output's on-set (`1`) or not (`0`/`-`
//! both read as "not this row"), since this crate's cube/cover types have
//! no don't-care-output notion to round-trip `D`/`R` through.

use std::io::Write;

use crate::error::ParseError;
use crate::tt::cube::Cube;
use crate::tt::TruthTable;

#[derive(Debug, Clone, Default)]
pub struct PlaFile {
    pub num_inputs: usize,
    pub num_outputs: usize,
    pub input_labels: Vec<String>,
    pub output_labels: Vec<String>,
    pub rows: Vec<(Cube, Vec<bool>)>,
}

impl PlaFile {
    /// The `F`-type ON-set function for one output column.
    pub fn to_truth_table(&self, output: usize) -> TruthTable {
        self.rows
            .iter()
            .filter(|(_, outs)| outs[output])
            .fold(TruthTable::zero(self.num_inputs), |acc, (cube, _)| {
                acc.or(&cube.indicator(self.num_inputs))
            })
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    }
}

/// Parse a PLA-format document.
pub fn read_pla(text: &str) -> Result<PlaFile, ParseError> {
    let mut num_inputs = None;
    let mut num_outputs = None;
    let mut input_labels = Vec::new();
    let mut output_labels = Vec::new();
    let mut rows = Vec::new();

    for raw in text.lines() {
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix(".ilb") {
            input_labels = rest.split_whitespace().map(String::from).collect();
        } else if let Some(rest) = line.strip_prefix(".ob") {
            output_labels = rest.split_whitespace().map(String::from).collect();
        } else if let Some(rest) = line.strip_prefix(".i") {
            num_inputs = Some(rest.trim().parse::<usize>().map_err(|_| {
                ParseError::MalformedInput {
                    text: line.to_string(),
                }
            })?);
        } else if let Some(rest) = line.strip_prefix(".o") {
            num_outputs = Some(rest.trim().parse::<usize>().map_err(|_| {
                ParseError::MalformedInput {
                    text: line.to_string(),
                }
            })?);
        } else if line.starts_with(".p") || line.starts_with(".type") {
            // Row count and cover-type directives don't change how rows are
            // parsed (only `F` is modeled); skip them.
            continue;
        } else if line.starts_with(".e") || line.starts_with(".end") {
            break;
        } else if line.starts_with('.') {
            return Err(ParseError::UnknownGateKind {
                kind: line.to_string(),
            });
        } else {
            let mut fields = line.split_whitespace();
            let input_pattern = fields.next().ok_or_else(|| ParseError::MalformedInput {
                text: line.to_string(),
            })?;
            let output_pattern = fields.next().ok_or_else(|| ParseError::MalformedInput {
                text: line.to_string(),
            })?;
            let ni = num_inputs.ok_or_else(|| ParseError::MissingHeader {
                directive: ".i".to_string(),
            })?;
            let no = num_outputs.ok_or_else(|| ParseError::MissingHeader {
                directive: ".o".to_string(),
            })?;
            if input_pattern.len() != ni || output_pattern.len() != no {
                return Err(ParseError::MalformedInput {
                    text: line.to_string(),
                });
            }
            let cube = Cube::from_pattern(input_pattern);
            let outs: Vec<bool> = output_pattern.chars().map(|c| c == '1').collect();
            rows.push((cube, outs));
        }
    }

    let num_inputs = num_inputs.ok_or_else(|| ParseError::MissingHeader {
        directive: ".i".to_string(),
    })?;
    let num_outputs = num_outputs.ok_or_else(|| ParseError::MissingHeader {
        directive: ".o".to_string(),
    })?;
    Ok(PlaFile {
        num_inputs,
        num_outputs,
        input_labels,
        output_labels,
        rows,
    })
}

/// Write a PLA-format document.
pub fn write_pla<W: Write>(pla: &PlaFile, w: &mut W) -> std::io::Result<()> {
    writeln!(w, ".i {}", pla.num_inputs)?;
    writeln!(w, ".o {}", pla.num_outputs)?;
    if !pla.input_labels.is_empty() {
        writeln!(w, ".ilb {}", pla.input_labels.join(" "))?;
    }
    if !pla.output_labels.is_empty() {
        writeln!(w, ".ob {}", pla.output_labels.join(" "))?;
    }
    writeln!(w, ".p {}", pla.rows.len())?;
    for (cube, outs) in &pla.rows {
        let out_str: String = outs.iter().map(|&b| if b { '1' } else { '0' }).collect();
        writeln!(w, "{} {}", cube.to_pattern(), out_str)?;
    }
    writeln!(w, ".e")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "\
# a trivial 2-input, 1-output PLA
.i 2
.o 1
.ilb a b
.ob f
.p 2
01 1
10 1
.e
";

    #[test]
    fn reads_header_and_rows() {
        let pla = read_pla(EXAMPLE).unwrap();
        assert_eq!(pla.num_inputs, 2);
        assert_eq!(pla.num_outputs, 1);
        assert_eq!(pla.input_labels, vec!["a", "b"]);
        assert_eq!(pla.rows.len(), 2);
    }

    #[test]
    fn to_truth_table_matches_xor() {
        let pla = read_pla(EXAMPLE).unwrap();
        let tt = pla.to_truth_table(0);
        assert_eq!(tt, TruthTable::var(2, 0).xor(&TruthTable::var(2, 1)));
    }

    #[test]
    fn write_then_read_round_trips_the_function() {
        let pla = read_pla(EXAMPLE).unwrap();
        let mut buf = Vec::new();
        write_pla(&pla, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let reparsed = read_pla(&text).unwrap();
        assert_eq!(reparsed.to_truth_table(0), pla.to_truth_table(0));
    }

    #[test]
    fn missing_header_is_reported() {
        let text = ".p 1\n01 1\n.e\n";
        let err = read_pla(text).unwrap_err();
        assert!(matches!(err, ParseError::MissingHeader { .. }));
    }

    #[test]
    fn comments_and_whitespace_are_tolerated() {
        let text = "  .i 1   # inputs\n.o 1\n.p 1\n  1   1  \n.e\n";
        let pla = read_pla(text).unwrap();
        assert_eq!(pla.rows.len(), 1);
    }
}
