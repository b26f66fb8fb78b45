//! Settings shared by the tokenizer, parser and evaluator.

/// Character that suppresses a keyword when placed directly in front of it
pub const DEFAULT_ESCAPE: char = '\\';

/// Default maximum nesting of parentheses and die rolls
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default maximum number of dice rolled by a single die expression
pub const DEFAULT_MAX_DICE: u64 = 10_000;

/// Settings for parsing and evaluating expressions.
///
/// # Examples
/// ```
/// use dicemark::Config;
///
/// let config = Config::default();
/// assert_eq!(config.escape, '\\');
/// assert_eq!(config.max_depth, Some(64));
/// assert_eq!(config.max_dice, Some(10_000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct Config {
	/// Escape character for keywords
	pub escape: char,

	/// Maximum nesting depth of groups and die rolls, or [`None`] for no limit
	pub max_depth: Option<usize>,

	/// Maximum number of dice a single die expression may roll, or [`None`] for no limit
	pub max_dice: Option<u64>,
}

impl Config {
	/// Creates a new config builder, starting from the defaults.
	#[must_use]
	#[inline]
	pub fn builder() -> Builder {
		Builder::default()
	}
}

impl Default for Config {
	fn default() -> Self {
		Self {
			escape: DEFAULT_ESCAPE,
			max_depth: Some(DEFAULT_MAX_DEPTH),
			max_dice: Some(DEFAULT_MAX_DICE),
		}
	}
}

/// Builds a [`Config`] with a fluent interface.
///
/// # Examples
/// ```
/// use dicemark::Config;
///
/// let config = Config::builder().escape('!').max_depth(None).max_dice(Some(100)).build();
/// assert_eq!(config.escape, '!');
/// assert_eq!(config.max_depth, None);
/// assert_eq!(config.max_dice, Some(100));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder(Config);

impl Builder {
	/// Sets the escape character.
	#[must_use]
	pub const fn escape(mut self, escape: char) -> Self {
		self.0.escape = escape;
		self
	}

	/// Sets the maximum nesting depth.
	#[must_use]
	pub const fn max_depth(mut self, max_depth: Option<usize>) -> Self {
		self.0.max_depth = max_depth;
		self
	}

	/// Sets the maximum number of dice per die expression.
	#[must_use]
	pub const fn max_dice(mut self, max_dice: Option<u64>) -> Self {
		self.0.max_dice = max_dice;
		self
	}

	/// Finalizes the config.
	#[must_use]
	pub const fn build(self) -> Config {
		self.0
	}
}
