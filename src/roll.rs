//! Evaluating every `[[...]]` span of a message.
//!
//! Each span is parsed and evaluated on its own: a span that fails doesn't keep the others from being rolled, and a
//! failing span never produces a partial result.

use std::fmt;

use tracing::debug;

#[cfg(feature = "fastrand")]
use crate::dice::roller::FastRand;
use crate::{
	config::Config,
	dice::Roller,
	expr::{Bindings, EvalError},
	parse::{Parser, SyntaxError},
	scan::{Scanner, Span},
};

/// Successfully evaluated span
#[derive(Debug, Clone, Copy, PartialEq)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Roll<'a> {
	/// Span that was evaluated
	pub span: Span<'a>,

	/// Result of the evaluation
	pub value: f64,
}

impl fmt::Display for Roll<'_> {
	/// Formats the roll as `` `{span}` -> {value} ``.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "`{}` -> {}", self.span, self.value)
	}
}

/// Error that can occur while rolling a single expression
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
	/// The expression is malformed
	#[error(transparent)]
	Syntax(#[from] SyntaxError),

	/// The expression couldn't be evaluated
	#[error(transparent)]
	Eval(#[from] EvalError),
}

impl Error {
	/// Checks whether the error is from parsing.
	#[must_use]
	pub const fn is_syntax(&self) -> bool {
		matches!(self, Self::Syntax(..))
	}

	/// Checks whether the error is from a variable without a value.
	#[must_use]
	pub const fn is_variable(&self) -> bool {
		matches!(self, Self::Eval(EvalError::Variable(..)))
	}
}

/// Failure to roll one span of a message
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("`{span}` is not valid dice syntax: {error}")]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct SpanError<'a> {
	/// Span that failed
	pub span: Span<'a>,

	/// What went wrong
	#[source]
	pub error: Error,
}

/// Outcome of rolling one span of a message
pub type Outcome<'a> = Result<Roll<'a>, SpanError<'a>>;

/// Scans messages for spans and rolls them.
///
/// # Examples
/// ```
/// use dicemark::{dice::roller::Iter as IterRoller, Config, Engine};
///
/// let engine = Engine::new(&Config::default());
/// let mut rng = IterRoller::new([15, 3, 4]);
/// let outcomes = engine.roll_message("attack [[1d20]], damage [[ 2d6 ]] and [[2d]]", &mut rng, None);
///
/// assert_eq!(outcomes.len(), 3);
/// assert_eq!(outcomes[0].as_ref().map(|roll| roll.value), Ok(15.0));
/// assert_eq!(outcomes[1].as_ref().map(|roll| roll.value), Ok(7.0));
/// assert!(outcomes[2].as_ref().is_err_and(|err| err.error.is_syntax()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Engine {
	/// Finds spans in messages
	scanner: Scanner,

	/// Parses span contents
	parser: Parser,

	/// Maximum number of dice per die roll
	max_dice: Option<u64>,
}

impl Engine {
	/// Creates an engine with the given config.
	#[must_use]
	pub const fn new(config: &Config) -> Self {
		Self {
			scanner: Scanner::new(config.escape),
			parser: Parser::new(config),
			max_dice: config.max_dice,
		}
	}

	/// Rolls every span of the message in order of appearance.
	#[tracing::instrument(level = "debug", skip(self, rng, bindings))]
	pub fn roll_message<'a>(
		&self,
		text: &'a str,
		rng: &mut impl Roller,
		bindings: Option<&Bindings>,
	) -> Vec<Outcome<'a>> {
		self.scanner
			.spans(text)
			.into_iter()
			.map(|span| match self.roll_span(&span, rng, bindings) {
				Ok(value) => {
					debug!(expr = span.text, offset = span.offset, value, "rolled span");
					Ok(Roll { span, value })
				}
				Err(error) => {
					debug!(expr = span.text, offset = span.offset, %error, "failed to roll span");
					Err(SpanError { span, error })
				}
			})
			.collect()
	}

	/// Rolls a single expression written without the outer brackets, like `2d(4+2)`.
	///
	/// # Errors
	/// If the expression is malformed or can't be evaluated, an error variant is returned.
	///
	/// # Examples
	/// ```
	/// use dicemark::{dice::roller::Max as MaxRoller, Engine};
	///
	/// let engine = Engine::default();
	/// assert_eq!(engine.roll("2d6", &mut MaxRoller, None)?, 12.0);
	/// assert_eq!(engine.roll("2d6 + 3", &mut MaxRoller, None)?, 18.0);
	/// assert_eq!(engine.roll("[[2d6]] + 3", &mut MaxRoller, None)?, 15.0);
	/// # Ok::<(), dicemark::roll::Error>(())
	/// ```
	pub fn roll(&self, expr: &str, rng: &mut impl Roller, bindings: Option<&Bindings>) -> Result<f64, Error> {
		let value = self.parser.inline(expr)?.eval_limited(rng, bindings, self.max_dice)?;
		debug!(expr, value, "rolled expression");
		Ok(value)
	}

	/// Parses and evaluates one span.
	fn roll_span(&self, span: &Span<'_>, rng: &mut impl Roller, bindings: Option<&Bindings>) -> Result<f64, Error> {
		let expr = self.parser.expr(&span.compact())?;
		Ok(expr.eval_limited(rng, bindings, self.max_dice)?)
	}
}

impl Default for Engine {
	#[inline]
	fn default() -> Self {
		Self::new(&Config::default())
	}
}

/// Rolls every span of the message with the default config, a fresh random roller and no variables.
///
/// # Examples
/// ```
/// let outcomes = dicemark::roll_message("I roll [[1d6]] and [[$str + 1]]");
/// assert_eq!(outcomes.len(), 2);
///
/// let roll = outcomes[0].as_ref().unwrap();
/// assert_eq!(roll.span.text, "[[1d6]]");
/// assert!((1.0..=6.0).contains(&roll.value));
///
/// assert!(outcomes[1].as_ref().is_err_and(|err| err.error.is_variable()));
/// ```
#[cfg(feature = "fastrand")]
#[must_use]
pub fn roll_message(text: &str) -> Vec<Outcome<'_>> {
	Engine::default().roll_message(text, &mut FastRand::default(), None)
}

/// Rolls a single expression written without the outer brackets with the default config, a fresh random roller and no
/// variables.
///
/// # Errors
/// If the expression is malformed or can't be evaluated, an error variant is returned.
///
/// # Examples
/// ```
/// assert_eq!(dicemark::roll("(2+3)*4")?, 20.0);
/// assert_eq!(dicemark::roll("5d1")?, 5.0);
/// assert!(dicemark::roll("(2+3").is_err());
/// # Ok::<(), dicemark::roll::Error>(())
/// ```
#[cfg(feature = "fastrand")]
pub fn roll(expr: &str) -> Result<f64, Error> {
	Engine::default().roll(expr, &mut FastRand::default(), None)
}
