//! Abstractions for rolling dice using various means.

use std::iter::Peekable;

#[cfg(feature = "fastrand")]
use fastrand::Rng;

/// Rolls dice - what else is there to say?
pub trait Roller {
	/// Rolls a single die, yielding a value in `1..=sides`.
	#[must_use]
	fn roll_die(&mut self, sides: u64) -> u64;

	/// Rolls `count` dice one after another and sums them.
	///
	/// # Examples
	/// ```
	/// use dicemark::dice::roller::{Iter as IterRoller, Roller};
	///
	/// let mut roller = IterRoller::new([3, 1, 6]);
	/// assert_eq!(roller.roll_sum(3, 6), 10.0);
	/// ```
	#[must_use]
	#[expect(clippy::cast_precision_loss, reason = "Sums past 2^53 are far beyond any sensible roll")]
	fn roll_sum(&mut self, count: u64, sides: u64) -> f64 {
		let mut total = 0.0;
		for _ in 0..count {
			total += self.roll_die(sides) as f64;
		}
		total
	}
}

/// Generates rolls with random values using [fastrand]. Requires the `fastrand` feature (enabled by default).
///
/// # Examples
///
/// ## Default fastrand roller
/// ```
/// use dicemark::dice::roller::{FastRand as FastRandRoller, Roller};
///
/// let mut roller = FastRandRoller::default();
/// let roll = roller.roll_die(6);
/// assert!((1..=6).contains(&roll));
/// ```
///
/// ## Manually seeded fastrand roller
/// ```
/// use dicemark::dice::roller::{FastRand as FastRandRoller, Roller};
///
/// let mut a = FastRandRoller::with_seed(0x750c38d574400);
/// let mut b = FastRandRoller::with_seed(0x750c38d574400);
/// assert_eq!(a.roll_sum(10, 20), b.roll_sum(10, 20));
/// ```
#[cfg(feature = "fastrand")]
#[derive(Debug, Clone, Default)]
pub struct FastRand(Rng);

#[cfg(feature = "fastrand")]
impl FastRand {
	/// Creates a new fastrand roller that uses the given RNG instance to generate rolls.
	#[must_use]
	#[inline]
	pub const fn new(rng: Rng) -> Self {
		Self(rng)
	}

	/// Creates a new fastrand roller that uses a pre-seeded RNG instance to generate rolls.
	#[must_use]
	#[inline]
	pub fn with_seed(seed: u64) -> Self {
		Self(Rng::with_seed(seed))
	}
}

#[cfg(feature = "fastrand")]
impl Roller for FastRand {
	/// Rolls a single die using the [`fastrand::Rng`] the roller was created with.
	#[inline]
	fn roll_die(&mut self, sides: u64) -> u64 {
		if sides > 0 {
			self.0.u64(1..=sides)
		} else {
			0
		}
	}
}

/// Generates rolls that always have a specific value.
///
/// # Examples
/// ```
/// use dicemark::dice::roller::{Roller, Val as ValRoller};
///
/// let mut roller = ValRoller(4);
/// assert_eq!(roller.roll_die(6), 4);
/// assert_eq!(roller.roll_sum(3, 20), 12.0);
/// ```
#[derive(Debug, Default, Clone)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Val(pub u64);

impl Roller for Val {
	/// Rolls a single die, always with one specific value.
	#[inline]
	fn roll_die(&mut self, _sides: u64) -> u64 {
		self.0
	}
}

/// Generates rolls that always have their max value.
///
/// # Examples
/// ```
/// use dicemark::dice::roller::{Max as MaxRoller, Roller};
///
/// let mut roller = MaxRoller;
/// assert_eq!(roller.roll_sum(4, 6), 24.0);
/// ```
#[derive(Debug, Default, Clone)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Max;

impl Roller for Max {
	/// Rolls a single die, always with the max value (same as the number of sides).
	#[inline]
	fn roll_die(&mut self, sides: u64) -> u64 {
		sides
	}
}

/// Generates rolls from an iterator of values. Mainly useful for testing purposes.
///
/// # Examples
/// ```
/// use dicemark::dice::roller::{Iter as IterRoller, Roller};
///
/// let mut roller = IterRoller::new(vec![1, 2, 3]);
/// assert_eq!(roller.roll_die(6), 1);
/// assert_eq!(roller.roll_die(6), 2);
/// assert!(roller.can_roll());
/// assert_eq!(roller.roll_die(6), 3);
/// assert!(!roller.can_roll());
/// ```
#[derive(Debug, Clone)]
pub struct Iter<I: Iterator<Item = u64>>(Peekable<I>);

impl<I: Iterator<Item = u64>> Iter<I> {
	/// Checks whether the iterator still has values available.
	#[inline]
	pub fn can_roll(&mut self) -> bool {
		self.0.peek().is_some()
	}

	/// Creates a new roller that uses the given iterator to provide roll values.
	#[must_use]
	#[inline]
	pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
		Self(iter.into_iter().peekable())
	}
}

impl<I: Iterator<Item = u64>> Roller for Iter<I> {
	/// Rolls a die with the value from the next iteration.
	///
	/// # Panics
	/// If the iterator has finished, this will panic.
	#[inline]
	#[expect(
		clippy::expect_used,
		reason = "Mostly for testing, otherwise manual checking of can_roll() is expected"
	)]
	fn roll_die(&mut self, _sides: u64) -> u64 {
		self.0.next().expect("iterator is finished")
	}
}
