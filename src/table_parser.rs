use tracing::{debug, instrument};

use crate::table::{DailyObservation, WeatherTable, COLUMN_NAMES, MEASUREMENT_COUNT};

/// Lines at the top of the scraped block that are not data rows
pub const HEADER_LINES: usize = 2;

/// Unit suffixes the site appends to numeric cells
pub const UNIT_SUFFIXES: [&str; 4] = [" °F", " mph", " in", " %"];

/// Tokens per data row: date plus every measurement
pub const TOKENS_PER_ROW: usize = MEASUREMENT_COUNT + 1;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ParseError {
    #[error("Expected 2 header lines, found {found}")]
    MissingHeader { found: usize },

    #[error("Line {line} should be a header but parses as a data row")]
    HeaderIsData { line: usize },

    #[error("Line {line}: expected {expected} fields, found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: column '{column}' is not a number: {value:?}")]
    InvalidNumber {
        line: usize,
        column: &'static str,
        value: String,
    },
}

/// Remove every unit suffix from a line
pub fn strip_units(line: &str) -> String {
    UNIT_SUFFIXES
        .iter()
        .fold(line.to_string(), |acc, unit| acc.replace(unit, ""))
}

/// Parse the text of a monthly history table into typed rows.
///
/// The first two lines are headers and are dropped. A header line that is
/// itself a well-formed data row means a header went missing and is
/// rejected. Every remaining line must split on
/// single spaces into a date token followed by one number per column;
/// anything else is an error.
#[instrument(skip(raw), fields(raw_size = raw.len()))]
pub fn parse_table(raw: &str) -> Result<WeatherTable, ParseError> {
    let lines: Vec<&str> = raw
        .trim_end()
        .split('\n')
        .map(|l| l.trim_end_matches('\r'))
        .collect();

    if lines.len() < HEADER_LINES {
        return Err(ParseError::MissingHeader { found: lines.len() });
    }

    if let Some(idx) = lines[..HEADER_LINES]
        .iter()
        .position(|line| parse_row(0, line).is_ok())
    {
        return Err(ParseError::HeaderIsData { line: idx + 1 });
    }

    let rows = lines
        .iter()
        .enumerate()
        .skip(HEADER_LINES)
        .map(|(idx, line)| parse_row(idx + 1, line))
        .collect::<Result<Vec<_>, _>>()?;

    debug!("Parsed {} rows", rows.len());
    Ok(WeatherTable::new(rows))
}

fn parse_row(line_no: usize, line: &str) -> Result<DailyObservation, ParseError> {
    let stripped = strip_units(line);
    let tokens: Vec<&str> = stripped.split(' ').collect();

    if tokens.len() != TOKENS_PER_ROW {
        return Err(ParseError::ColumnCount {
            line: line_no,
            expected: TOKENS_PER_ROW,
            found: tokens.len(),
        });
    }

    let mut values = [0.0; MEASUREMENT_COUNT];
    for (i, token) in tokens[1..].iter().enumerate() {
        values[i] = token.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
            line: line_no,
            column: COLUMN_NAMES[i],
            value: token.to_string(),
        })?;
    }

    Ok(DailyObservation::from_values(tokens[0].to_string(), values))
}
