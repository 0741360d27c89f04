//! Nom-based formula parser.
//!
//! Parses the arithmetic grammar directly from strings to AST: `+ - * /`,
//! unary sign, parentheses, decimal literals with optional exponent, and
//! plain A1 cell references.

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, multispace0, one_of},
    combinator::{all_consuming, opt, recognize},
    error::{Error, ErrorKind},
    multi::{fold_many0, many0},
    sequence::{delimited, pair, tuple},
    IResult,
};

use calcgrid_common::{col_from_label, Position};

use crate::ast::{BinaryOp, Expr, UnaryOp};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "parse error at position {}: {}",
            self.position, self.message
        )
    }
}

impl std::error::Error for ParseError {}

/// Skip whitespace around a token
fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn fail(input: &str) -> nom::Err<Error<&str>> {
    nom::Err::Error(Error::new(input, ErrorKind::MapRes))
}

/// Parse an unsigned decimal number (integer, float, optional exponent)
fn parse_number(input: &str) -> IResult<&str, Expr> {
    let (rest, literal) = recognize(tuple((
        take_while1(|c: char| c.is_ascii_digit()),
        opt(pair(char('.'), take_while(|c: char| c.is_ascii_digit()))),
        opt(tuple((
            one_of("eE"),
            opt(one_of("+-")),
            take_while1(|c: char| c.is_ascii_digit()),
        ))),
    )))(input)?;

    let value: f64 = literal.parse().map_err(|_| fail(input))?;
    Ok((rest, Expr::Number(value)))
}

/// Parse a cell reference (column letters followed by a 1-indexed row)
///
/// The reference only has to fit the address type here; bounds against the
/// sheet maxima are checked at evaluation time.
fn parse_cell_ref(input: &str) -> IResult<&str, Expr> {
    let (rest, letters) = take_while1(|c: char| c.is_ascii_alphabetic())(input)?;
    let (rest, digits) = take_while1(|c: char| c.is_ascii_digit())(rest)?;

    let col = col_from_label(letters).ok_or_else(|| fail(input))?;
    let row = digits
        .parse::<i64>()
        .ok()
        .filter(|&r| r >= 1 && r - 1 <= i32::MAX as i64)
        .ok_or_else(|| fail(input))?;

    Ok((rest, Expr::CellRef(Position::new((row - 1) as i32, col))))
}

fn parse_parenthesized(input: &str) -> IResult<&str, Expr> {
    delimited(char('('), parse_additive, char(')'))(input)
}

fn parse_primary(input: &str) -> IResult<&str, Expr> {
    ws(alt((parse_parenthesized, parse_number, parse_cell_ref)))(input)
}

fn parse_unary(input: &str) -> IResult<&str, Expr> {
    let (input, signs) = many0(ws(one_of("+-")))(input)?;
    let (input, mut expr) = parse_primary(input)?;
    for sign in signs.into_iter().rev() {
        let op = if sign == '-' { UnaryOp::Neg } else { UnaryOp::Pos };
        expr = Expr::unary(op, expr);
    }
    Ok((input, expr))
}

fn parse_multiplicative(input: &str) -> IResult<&str, Expr> {
    let (input, init) = parse_unary(input)?;
    fold_many0(
        pair(ws(one_of("*/")), parse_unary),
        move || init.clone(),
        |acc, (symbol, rhs)| {
            let op = if symbol == '*' {
                BinaryOp::Mul
            } else {
                BinaryOp::Div
            };
            Expr::binary(acc, op, rhs)
        },
    )(input)
}

fn parse_additive(input: &str) -> IResult<&str, Expr> {
    let (input, init) = parse_multiplicative(input)?;
    fold_many0(
        pair(ws(one_of("+-")), parse_multiplicative),
        move || init.clone(),
        |acc, (symbol, rhs)| {
            let op = if symbol == '+' {
                BinaryOp::Add
            } else {
                BinaryOp::Sub
            };
            Expr::binary(acc, op, rhs)
        },
    )(input)
}

/// Parse a complete expression, rejecting trailing input
pub fn parse_expression(input: &str) -> Result<Expr, ParseError> {
    match all_consuming(parse_additive)(input) {
        Ok((_, expr)) => Ok(expr),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(ParseError {
            message: format!("unexpected input near {:?}", truncated(e.input)),
            position: input.len() - e.input.len(),
        }),
        Err(nom::Err::Incomplete(_)) => Err(ParseError {
            message: "incomplete expression".to_string(),
            position: input.len(),
        }),
    }
}

fn truncated(input: &str) -> &str {
    let end = input
        .char_indices()
        .nth(12)
        .map(|(i, _)| i)
        .unwrap_or(input.len());
    &input[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers() {
        assert_eq!(parse_expression("42").unwrap(), Expr::Number(42.0));
        assert_eq!(parse_expression("3.14").unwrap(), Expr::Number(3.14));
        assert_eq!(parse_expression("1e3").unwrap(), Expr::Number(1000.0));
        assert_eq!(parse_expression("2.5E-1").unwrap(), Expr::Number(0.25));
    }

    #[test]
    fn test_cell_refs() {
        assert_eq!(
            parse_expression("A1").unwrap(),
            Expr::CellRef(Position::new(0, 0))
        );
        assert_eq!(
            parse_expression("zz100").unwrap(),
            Expr::CellRef(Position::new(99, 701))
        );
    }

    #[test]
    fn test_precedence() {
        let expr = parse_expression("1+2*3").unwrap();
        assert_eq!(
            expr,
            Expr::binary(
                Expr::Number(1.0),
                BinaryOp::Add,
                Expr::binary(Expr::Number(2.0), BinaryOp::Mul, Expr::Number(3.0)),
            )
        );
    }

    #[test]
    fn test_left_associativity() {
        let expr = parse_expression("1-2-3").unwrap();
        assert_eq!(
            expr,
            Expr::binary(
                Expr::binary(Expr::Number(1.0), BinaryOp::Sub, Expr::Number(2.0)),
                BinaryOp::Sub,
                Expr::Number(3.0),
            )
        );
    }

    #[test]
    fn test_parentheses_and_whitespace() {
        let expr = parse_expression(" ( 1 + 2 ) * A1 ").unwrap();
        assert_eq!(
            expr,
            Expr::binary(
                Expr::binary(Expr::Number(1.0), BinaryOp::Add, Expr::Number(2.0)),
                BinaryOp::Mul,
                Expr::CellRef(Position::new(0, 0)),
            )
        );
    }

    #[test]
    fn test_unary_signs() {
        let expr = parse_expression("-A1").unwrap();
        assert_eq!(
            expr,
            Expr::unary(UnaryOp::Neg, Expr::CellRef(Position::new(0, 0)))
        );

        let expr = parse_expression("1--2").unwrap();
        assert_eq!(
            expr,
            Expr::binary(
                Expr::Number(1.0),
                BinaryOp::Sub,
                Expr::unary(UnaryOp::Neg, Expr::Number(2.0)),
            )
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_expression("").is_err());
        assert!(parse_expression("1+").is_err());
        assert!(parse_expression("(1+2").is_err());
        assert!(parse_expression("1+2)").is_err());
        assert!(parse_expression("A").is_err());
        assert!(parse_expression("1 2").is_err());
        assert!(parse_expression("foo(1)").is_err());
    }

    #[test]
    fn test_error_position() {
        let err = parse_expression("1+2)").unwrap_err();
        assert_eq!(err.position, 3);
    }
}
