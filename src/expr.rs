//! AST-like data structures for evaluating full mathematical dice expressions.

use std::{collections::HashMap, fmt};

use crate::dice::{Dice, Roller};

/// Values for the `$name` variables of an expression. Names are case-sensitive.
pub type Bindings = HashMap<String, f64>;

/// Individual elements of a full mathematical dice expression
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Expr {
	/// Standalone number
	Num(f64),

	/// Variable looked up in the [`Bindings`] at evaluation time
	Var(String),

	/// Die roll
	Dice(Dice),

	/// Sum of two expressions
	Add(Box<Self>, Box<Self>),

	/// Difference of two expressions
	Sub(Box<Self>, Box<Self>),

	/// Product of two expressions
	Mul(Box<Self>, Box<Self>),

	/// Quotient of two expressions
	Div(Box<Self>, Box<Self>),
}

impl Expr {
	/// Evaluates the expression, rolling any dice it contains with the given roller. Operands are always evaluated left
	/// to right, so a roller with predetermined values sees the dice in the order they're written.
	///
	/// Division follows floating-point semantics: dividing by zero yields an infinity or NaN rather than an error.
	///
	/// # Errors
	/// If a variable isn't in `bindings` (or there are no bindings at all), or a set of dice can't be rolled, an error
	/// variant will be returned.
	///
	/// # Examples
	/// ```
	/// use dicemark::{dice::roller::Val as ValRoller, expr::Bindings, Expr};
	///
	/// let expr: Expr = "[[2d6]] + $str".parse()?;
	/// let bindings = Bindings::from([("str".to_owned(), 3.0)]);
	/// assert_eq!(expr.eval(&mut ValRoller(4), Some(&bindings))?, 11.0);
	/// assert!(expr.eval(&mut ValRoller(4), None).is_err());
	/// # Ok::<(), Box<dyn std::error::Error>>(())
	/// ```
	pub fn eval(&self, rng: &mut impl Roller, bindings: Option<&Bindings>) -> Result<f64, EvalError> {
		self.eval_limited(rng, bindings, None)
	}

	/// Evaluates the expression like [`Self::eval()`], refusing to roll more than `max_dice` dice for any single die
	/// roll in it.
	///
	/// # Errors
	/// Same as [`Self::eval()`], plus an error variant if any die roll has more than `max_dice` dice.
	pub fn eval_limited(
		&self,
		rng: &mut impl Roller,
		bindings: Option<&Bindings>,
		max_dice: Option<u64>,
	) -> Result<f64, EvalError> {
		Ok(match self {
			Self::Num(x) => *x,
			Self::Var(name) => bindings
				.and_then(|bindings| bindings.get(name))
				.copied()
				.ok_or_else(|| EvalError::Variable(name.clone()))?,
			Self::Dice(dice) => dice.roll(rng, bindings, max_dice)?,

			Self::Add(a, b) => a.eval_limited(rng, bindings, max_dice)? + b.eval_limited(rng, bindings, max_dice)?,
			Self::Sub(a, b) => a.eval_limited(rng, bindings, max_dice)? - b.eval_limited(rng, bindings, max_dice)?,
			Self::Mul(a, b) => a.eval_limited(rng, bindings, max_dice)? * b.eval_limited(rng, bindings, max_dice)?,
			Self::Div(a, b) => a.eval_limited(rng, bindings, max_dice)? / b.eval_limited(rng, bindings, max_dice)?,
		})
	}

	/// Checks whether the expression is deterministic (will always yield the same value with every evaluation).
	/// Numbers and variables always return `true`, dice only when they have exactly one side, and binary expressions
	/// forward the check to their children.
	#[must_use]
	pub fn is_deterministic(&self) -> bool {
		match self {
			Self::Num(..) | Self::Var(..) => true,
			Self::Dice(dice) => dice.is_deterministic(),
			Self::Add(a, b) | Self::Sub(a, b) | Self::Mul(a, b) | Self::Div(a, b) => {
				a.is_deterministic() && b.is_deterministic()
			}
		}
	}

	/// Gets the type of this expression.
	#[must_use]
	pub const fn op_type(&self) -> OpType {
		match self {
			Self::Num(..) | Self::Var(..) | Self::Dice(..) => OpType::Value,
			Self::Add(..) | Self::Sub(..) => OpType::Additive,
			Self::Mul(..) | Self::Div(..) => OpType::Multiplicative,
		}
	}

	/// Writes a binary expression, adding parentheses around operands that would otherwise regroup when reparsed.
	/// Operators associate to the left, so a right operand of the same precedence needs them too.
	fn fmt_binary(&self, f: &mut fmt::Formatter<'_>, op: char, a: &Self, b: &Self) -> fmt::Result {
		let own = self.op_type();
		if a.op_type() < own {
			write!(f, "({a})")?;
		} else {
			write!(f, "{a}")?;
		}
		write!(f, " {op} ")?;
		if b.op_type() <= own {
			write!(f, "({b})")
		} else {
			write!(f, "{b}")
		}
	}
}

impl fmt::Display for Expr {
	/// Formats the expression as text the arithmetic parser accepts. Negative numbers are written as a subtraction
	/// from zero since the grammar has no leading signs.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Num(x) if *x < 0.0 => write!(f, "(0 - {})", -x),
			Self::Num(x) => write!(f, "{x}"),
			Self::Var(name) => write!(f, "${name}"),
			Self::Dice(dice) => write!(f, "[[{dice}]]"),

			Self::Add(a, b) => self.fmt_binary(f, '+', a, b),
			Self::Sub(a, b) => self.fmt_binary(f, '-', a, b),
			Self::Mul(a, b) => self.fmt_binary(f, '*', a, b),
			Self::Div(a, b) => self.fmt_binary(f, '/', a, b),
		}
	}
}

impl From<Dice> for Expr {
	#[inline]
	fn from(dice: Dice) -> Self {
		Self::Dice(dice)
	}
}

/// Error that can occur during [`Expr::eval()`]
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum EvalError {
	/// A variable has no value in the bindings (or no bindings were given)
	#[error("variable ${0} has no value")]
	Variable(String),

	/// Dice with fewer than one side would have to be rolled
	#[error("{dice} can't be rolled with {sides} sides")]
	InvalidSides {
		/// Dice being rolled
		dice: Dice,

		/// Number of sides the dice evaluated to
		sides: f64,
	},

	/// Rolling the dice would exceed the configured maximum number of dice
	#[error("{dice} would roll {count} dice, more than the limit of {max}")]
	TooManyDice {
		/// Dice being rolled
		dice: Dice,

		/// Number of dice the count evaluated to
		count: u64,

		/// Maximum number of dice allowed
		max: u64,
	},
}

/// Operation type for an individual expression, ordered from loosest to tightest binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[expect(clippy::exhaustive_enums, reason = "There are only so many precedence levels")]
pub enum OpType {
	/// Additive operation (sum or difference)
	Additive,

	/// Multiplicative operation (product or quotient)
	Multiplicative,

	/// Single value, no operation
	Value,
}
