//! CSV directory reader.
//!
//! Fields are separated by commas and records by `\n` or `\r\n`. A field
//! wrapped in double quotes may contain commas, line breaks and `""` for a
//! literal quote. Blank lines are skipped. The first record names the columns.

use winnow::{
    Parser as _,
    ascii::line_ending,
    combinator::{alt, cut_err, delimited, repeat, separated},
    error::{ContextError, ErrMode, ModalResult, StrContext, StrContextValue},
    stream::{LocatingSlice, Location, Stream},
    token::{none_of, take_till},
};

use crate::{ReadError, Row};

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError>;

/// Parse a double-quoted field, unescaping `""`.
fn quoted_field(input: &mut Input<'_>) -> IResult<String> {
    let content = repeat(0.., alt(("\"\"".value('"'), none_of('"')))).fold(
        String::new,
        |mut acc, c| {
            acc.push(c);
            acc
        },
    );

    delimited(
        '"',
        content,
        cut_err('"').context(StrContext::Expected(StrContextValue::Description(
            "closing quote",
        ))),
    )
    .parse_next(input)
}

/// Parse an unquoted field up to the next separator or line break.
fn bare_field(input: &mut Input<'_>) -> IResult<String> {
    take_till(0.., [',', '\n', '\r', '"'])
        .map(str::to_string)
        .parse_next(input)
}

fn field(input: &mut Input<'_>) -> IResult<String> {
    alt((quoted_field, bare_field)).parse_next(input)
}

fn record(input: &mut Input<'_>) -> IResult<Vec<String>> {
    separated(1.., field, ',').parse_next(input)
}

/// A record and the line it starts on.
struct Record {
    line: usize,
    fields: Vec<String>,
}

fn syntax_error(input: &Input<'_>, err: ErrMode<ContextError>, fallback: &str) -> ReadError {
    let message = match err {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => {
            let rendered = e.to_string();
            if rendered.is_empty() {
                fallback.to_string()
            } else {
                rendered
            }
        }
        ErrMode::Incomplete(_) => "unexpected end of input".to_string(),
    };
    ReadError::Syntax {
        offset: input.current_token_start(),
        message,
    }
}

fn line_at(source: &str, offset: usize) -> usize {
    source.as_bytes()[..offset]
        .iter()
        .filter(|b| **b == b'\n')
        .count()
        + 1
}

fn records(source: &str) -> Result<Vec<Record>, ReadError> {
    let mut input = LocatingSlice::new(source);
    let mut records = Vec::new();

    while input.eof_offset() > 0 {
        let start = input.current_token_start();
        let fields = record
            .parse_next(&mut input)
            .map_err(|err| syntax_error(&input, err, "malformed record"))?;
        // An empty line parses as one empty field.
        if input.current_token_start() > start {
            records.push(Record {
                line: line_at(source, start),
                fields,
            });
        }

        if input.eof_offset() > 0 {
            line_ending
                .parse_next(&mut input)
                .map_err(|err| syntax_error(&input, err, "expected `,` or end of line"))?;
        }
    }

    Ok(records)
}

/// Reads a CSV document into rows keyed by the header record.
pub(crate) fn read(source: &str) -> Result<Vec<Row>, ReadError> {
    let mut records = records(source)?.into_iter();
    let Some(header) = records.next() else {
        return Ok(Vec::new());
    };
    let columns = header
        .fields
        .into_iter()
        .map(|name| name.trim().to_string())
        .collect::<Vec<_>>();

    records
        .map(|record| {
            if record.fields.len() != columns.len() {
                return Err(ReadError::RowWidth {
                    line: record.line,
                    expected: columns.len(),
                    found: record.fields.len(),
                });
            }
            Ok(columns.iter().cloned().zip(record.fields).collect())
        })
        .collect()
}
