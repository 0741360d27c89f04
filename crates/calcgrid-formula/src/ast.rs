use std::fmt;

use calcgrid_common::{FormulaError, Position};

/// Abstract syntax tree for formula expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),

    /// Cell reference (e.g., A1, ZZ42); the position may lie outside the
    /// sheet bounds, in which case evaluating it yields a Ref error
    CellRef(Position),

    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },

    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    /// Get the precedence of this operator (higher = binds tighter)
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul | BinaryOp::Div => 2,
        }
    }

    /// Whether a right operand of equal precedence must keep its parentheses
    /// (subtraction and division are not associative)
    pub fn grouping_sensitive(&self) -> bool {
        matches!(self, BinaryOp::Sub | BinaryOp::Div)
    }

    pub fn symbol(&self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg, // -
    Pos, // +
}

const UNARY_PRECEDENCE: u8 = 3;
const ATOM_PRECEDENCE: u8 = 4;

impl Expr {
    /// Create a binary expression
    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Create a unary expression
    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Evaluate the expression against a cell lookup callback
    ///
    /// Lookup errors short-circuit the whole evaluation. Division by zero is
    /// not trapped here; the resulting non-finite value surfaces when the
    /// final result is checked by the caller.
    pub fn evaluate<F>(&self, lookup: &F) -> Result<f64, FormulaError>
    where
        F: Fn(Position) -> Result<f64, FormulaError>,
    {
        match self {
            Expr::Number(n) => Ok(*n),
            Expr::CellRef(pos) => {
                if !pos.is_valid() {
                    return Err(FormulaError::Ref);
                }
                lookup(*pos)
            }
            Expr::Binary { left, op, right } => {
                let left = left.evaluate(lookup)?;
                let right = right.evaluate(lookup)?;
                Ok(match op {
                    BinaryOp::Add => left + right,
                    BinaryOp::Sub => left - right,
                    BinaryOp::Mul => left * right,
                    BinaryOp::Div => left / right,
                })
            }
            Expr::Unary { op, operand } => {
                let value = operand.evaluate(lookup)?;
                Ok(match op {
                    UnaryOp::Neg => -value,
                    UnaryOp::Pos => value,
                })
            }
        }
    }

    /// Collect referenced positions in source order (duplicates included)
    pub fn collect_references(&self, out: &mut Vec<Position>) {
        match self {
            Expr::Number(_) => {}
            Expr::CellRef(pos) => out.push(*pos),
            Expr::Binary { left, right, .. } => {
                left.collect_references(out);
                right.collect_references(out);
            }
            Expr::Unary { operand, .. } => operand.collect_references(out),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Number(_) | Expr::CellRef(_) => ATOM_PRECEDENCE,
            Expr::Binary { op, .. } => op.precedence(),
            Expr::Unary { .. } => UNARY_PRECEDENCE,
        }
    }

    /// Print with only the parentheses the precedence structure requires
    fn write(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::CellRef(pos) => write!(f, "{}", pos.to_a1()),
            Expr::Binary { left, op, right } => {
                write_operand(f, left, *op, false)?;
                write!(f, "{}", op.symbol())?;
                write_operand(f, right, *op, true)
            }
            Expr::Unary { op, operand } => {
                let symbol = match op {
                    UnaryOp::Neg => '-',
                    UnaryOp::Pos => '+',
                };
                write!(f, "{}", symbol)?;
                if operand.precedence() < UNARY_PRECEDENCE {
                    write!(f, "(")?;
                    operand.write(f)?;
                    write!(f, ")")
                } else {
                    operand.write(f)
                }
            }
        }
    }
}

fn write_operand(
    f: &mut fmt::Formatter<'_>,
    child: &Expr,
    op: BinaryOp,
    is_right: bool,
) -> fmt::Result {
    let needs_parens = child.precedence() < op.precedence()
        || (is_right && child.precedence() == op.precedence() && op.grouping_sensitive());
    if needs_parens {
        write!(f, "(")?;
        child.write(f)?;
        write!(f, ")")
    } else {
        child.write(f)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f)
    }
}
