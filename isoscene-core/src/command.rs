/// Drawing-command language parser
use nom::{
    bytes::complete::take_while,
    character::complete::one_of,
    number::complete::double,
    sequence::preceded,
    IResult,
};

use crate::point::IsoPoint;

/// A single typed path operation with 3-axis points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    Move(IsoPoint),
    Line(IsoPoint),
    Curve { control: IsoPoint, end: IsoPoint },
}

impl PathCommand {
    /// The operation's end point (the control point is not an end point).
    pub fn point(&self) -> &IsoPoint {
        match self {
            PathCommand::Move(point) | PathCommand::Line(point) => point,
            PathCommand::Curve { end, .. } => end,
        }
    }
}

/// Parse a compact drawing-command string into typed path operations.
///
/// Grammar: `M`/`m` + 3 numbers (move), `L`/`l` + 3 numbers (line),
/// `C`/`c` + 6 numbers (curve: control point then end point). Numbers may
/// be glued to the letter, separated by whitespace or commas, negative
/// and fractional. Best-effort and infallible: an unrecognized letter, a
/// stray number where a letter is expected, or a short argument list
/// drops that one operation silently. The first operation is not
/// required to be a move.
pub fn parse_commands(input: &str) -> Vec<PathCommand> {
    let mut commands = Vec::new();
    let mut rest = input.trim_end();
    while !rest.is_empty() {
        match parse_command(rest) {
            Ok((next, command)) => {
                commands.push(command);
                rest = next;
            }
            // Malformed operation: drop one character and resync
            Err(_) => rest = skip_char(rest),
        }
    }
    commands
}

fn parse_command(input: &str) -> IResult<&str, PathCommand> {
    let (input, letter) = preceded(separator0, one_of("MmLlCc"))(input)?;
    match letter {
        'M' | 'm' => {
            let (input, point) = parse_point(input)?;
            Ok((input, PathCommand::Move(point)))
        }
        'L' | 'l' => {
            let (input, point) = parse_point(input)?;
            Ok((input, PathCommand::Line(point)))
        }
        _ => {
            let (input, control) = parse_point(input)?;
            let (input, end) = parse_point(input)?;
            Ok((input, PathCommand::Curve { control, end }))
        }
    }
}

fn parse_point(input: &str) -> IResult<&str, IsoPoint> {
    let (input, right) = preceded(separator0, double)(input)?;
    let (input, left) = preceded(separator0, double)(input)?;
    let (input, top) = preceded(separator0, double)(input)?;
    Ok((input, IsoPoint::new(right, left, top)))
}

fn separator0(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c.is_whitespace() || c == ',')(input)
}

fn skip_char(input: &str) -> &str {
    match input.chars().next() {
        Some(c) => &input[c.len_utf8()..],
        None => input,
    }
}
