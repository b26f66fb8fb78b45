//! Die-roll expressions and the randomness behind them.
//!
//! [`Dice`] is the payload of [`Expr::Dice`]: both its count and its number of sides are full expressions, so rolls
//! like `2d(4+2)` or `[[1d4]]d6` are possible.
//!
//! [`Expr::Dice`]: crate::expr::Expr::Dice

pub mod roller;

use std::fmt;

pub use self::roller::Roller;
use crate::expr::{Bindings, EvalError, Expr, OpType};

/// A roll of `count` dice with `sides` sides each
#[derive(Debug, Clone, PartialEq)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Dice {
	/// Number of dice to roll
	pub count: Box<Expr>,

	/// Number of sides for each die
	pub sides: Box<Expr>,
}

impl Dice {
	/// Creates a new die roll from expressions for the count and number of sides.
	#[must_use]
	pub fn new(count: Expr, sides: Expr) -> Self {
		Self {
			count: Box::new(count),
			sides: Box::new(sides),
		}
	}

	/// Creates a new die roll with constant count and number of sides.
	///
	/// # Examples
	/// ```
	/// use dicemark::{dice::roller::Max as MaxRoller, Dice};
	///
	/// let dice = Dice::plain(3, 6);
	/// assert_eq!(dice.to_string(), "3d6");
	/// assert_eq!(dice.roll(&mut MaxRoller, None, None)?, 18.0);
	/// # Ok::<(), dicemark::expr::EvalError>(())
	/// ```
	#[must_use]
	pub fn plain(count: u32, sides: u32) -> Self {
		Self::new(Expr::Num(count.into()), Expr::Num(sides.into()))
	}

	/// Evaluates the count, then the number of sides, and rolls.
	///
	/// A number of sides of exactly 1 yields the count itself without drawing anything. Otherwise both values are
	/// truncated toward zero, and a count of zero or less yields 0.
	///
	/// # Errors
	/// Errors from evaluating the count or sides are passed through. If there is at least one die to roll but it has
	/// fewer than one side, or there are more dice than `max_dice`, an error variant is returned.
	pub fn roll(
		&self,
		rng: &mut impl Roller,
		bindings: Option<&Bindings>,
		max_dice: Option<u64>,
	) -> Result<f64, EvalError> {
		let count = self.count.eval_limited(rng, bindings, max_dice)?;
		let sides = self.sides.eval_limited(rng, bindings, max_dice)?;

		if sides == 1.0 {
			return Ok(count);
		}

		let count = count.trunc();
		if count.is_nan() || count < 1.0 {
			return Ok(0.0);
		}

		let whole_sides = sides.trunc();
		if whole_sides.is_nan() || whole_sides < 1.0 {
			return Err(EvalError::InvalidSides {
				dice: self.clone(),
				sides,
			});
		}

		// Float to int casts saturate, which is what we want for huge values
		#[expect(
			clippy::cast_possible_truncation,
			clippy::cast_sign_loss,
			reason = "Both values are whole and at least 1"
		)]
		let (count, whole_sides) = (count as u64, whole_sides as u64);

		if let Some(max) = max_dice {
			if count > max {
				return Err(EvalError::TooManyDice {
					dice: self.clone(),
					count,
					max,
				});
			}
		}

		Ok(rng.roll_sum(count, whole_sides))
	}

	/// Checks whether rolling always yields the same value, which is only the case for dice with exactly one side.
	#[must_use]
	pub fn is_deterministic(&self) -> bool {
		matches!(*self.sides, Expr::Num(sides) if sides == 1.0) && self.count.is_deterministic()
	}
}

impl Default for Dice {
	/// Creates the default dice (1d20).
	#[inline]
	fn default() -> Self {
		Self::plain(1, 20)
	}
}

impl fmt::Display for Dice {
	/// Formats the dice as `{count}d{sides}`, grouping operations in parentheses.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt_part(f, &self.count)?;
		f.write_str("d")?;
		fmt_part(f, &self.sides)
	}
}

/// Writes the count or sides of a die roll, wrapping operations in parentheses.
fn fmt_part(f: &mut fmt::Formatter<'_>, part: &Expr) -> fmt::Result {
	if part.op_type() == OpType::Value {
		write!(f, "{part}")
	} else {
		write!(f, "({part})")
	}
}
