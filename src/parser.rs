//! Range and header parsing using nom.
//!
//! Both inputs share the `#` marker that separates a human label from a SQL
//! identifier:
//!
//! ```text
//! 企業情報#t_shop!A1:D          会社名#name
//! ───┬─── ──┬─── ─┬──          ──┬─── ─┬──
//!    │      │     └── Cells      │     └── Column
//!    │      └── Table            └── Label
//!    └── Label
//! ```

use nom::{
    bytes::complete::{is_not, take_till},
    character::complete::char,
    combinator::{opt, rest, verify},
    sequence::{pair, preceded},
    IResult,
};

use crate::error::{SheetResult, SheetSqlError};
use crate::sheet::RangeSpec;

/// Separator between a label and the identifier it carries.
pub const MARKER: char = '#';

/// Separator between the sheet name and the A1 cell range.
pub const SHEET_SEPARATOR: char = '!';

/// Parse a `<label>#<table>!<cells>` range string.
pub fn parse_range(input: &str) -> SheetResult<RangeSpec> {
    let trimmed = input.trim();

    match range_parts(trimmed) {
        Ok(("", (label, table, extra, cells))) => {
            let mut sheet = format!("{}{}{}", label, MARKER, table);
            if let Some(extra) = extra {
                sheet.push(MARKER);
                sheet.push_str(extra);
            }
            Ok(RangeSpec {
                label: label.to_string(),
                table: table.to_string(),
                sheet,
                cells: cells.to_string(),
            })
        }
        Ok((remaining, _)) => Err(SheetSqlError::invalid_range(
            trimmed,
            format!("unexpected trailing content: '{}'", remaining),
        )),
        Err(_) => Err(SheetSqlError::invalid_range(trimmed, diagnose(trimmed))),
    }
}

/// Extract the column name from a `<label>#<column>` header cell.
///
/// Returns `None` when the cell has no marker or the column part is empty.
pub fn parse_header_cell(input: &str) -> Option<&str> {
    header_column(input).ok().map(|(_, column)| column)
}

type RangeParts<'a> = (&'a str, &'a str, Option<&'a str>, &'a str);

fn range_parts(input: &str) -> IResult<&str, RangeParts<'_>> {
    let (input, label) = take_till(|c: char| c == MARKER || c == SHEET_SEPARATOR)(input)?;
    let (input, _) = char(MARKER)(input)?;
    let (input, table) = is_not("#!")(input)?;
    // Anything after a second marker stays part of the sheet name only
    let (input, extra) = opt(preceded(
        char(MARKER),
        take_till(|c: char| c == SHEET_SEPARATOR),
    ))(input)?;
    let (input, _) = char(SHEET_SEPARATOR)(input)?;
    let (input, cells) = verify(rest, |s: &str| !s.trim().is_empty())(input)?;

    Ok((input, (label, table, extra, cells)))
}

fn header_column(input: &str) -> IResult<&str, &str> {
    preceded(
        pair(take_till(|c: char| c == MARKER), char(MARKER)),
        is_not("#"),
    )(input)
}

fn diagnose(input: &str) -> &'static str {
    let Some(bang) = input.find(SHEET_SEPARATOR) else {
        return "missing '!' before the cell range";
    };
    let sheet = &input[..bang];
    match sheet.find(MARKER) {
        None => "missing '#' between label and table",
        Some(hash) if sheet[hash + 1..].is_empty() || sheet[hash + 1..].starts_with(MARKER) => {
            "empty table name"
        }
        Some(_) => "empty cell range after '!'",
    }
}
