//! Recursive-descent parsing of arithmetic and die expressions.
//!
//! Arithmetic text is split with the arithmetic keywords, groups (`(...)`, `[[...]]`) are parsed recursively,
//! operators written directly after another operator are repaired, and what remains is reduced in two passes:
//! products and quotients first, then sums and differences, both left to right.
//!
//! Die text is split at its first `d` outside of nested rolls, and both sides are parsed as arithmetic.

use std::{borrow::Cow, str::FromStr};

use crate::{
	config::Config,
	dice::Dice,
	expr::Expr,
	token::{Keyword, Lexeme, Token, Tokenizer},
};

/// Parses an arithmetic expression using the default configuration.
///
/// # Errors
/// If the text isn't a well-formed expression, an error variant is returned.
///
/// # Examples
/// ```
/// use dicemark::{dice::roller::Max as MaxRoller, parse};
///
/// let expr = parse::expr("(2+3)*[[2d6]]")?;
/// assert_eq!(expr.to_string(), "(2 + 3) * [[2d6]]");
/// assert_eq!(expr.eval(&mut MaxRoller, None)?, 60.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn expr(text: &str) -> Result<Expr, SyntaxError> {
	Parser::default().expr(text)
}

/// Parses a die expression (the text between a roll's brackets) using the default configuration.
///
/// # Errors
/// If the text isn't a well-formed die expression, an error variant is returned.
pub fn dice(text: &str) -> Result<Dice, SyntaxError> {
	Parser::default().dice(text)
}

/// Parses the contents of a `[[...]]` span using the default configuration. See [`Parser::inline()`].
///
/// # Errors
/// If the text isn't a well-formed die expression, an error variant is returned.
pub fn inline(text: &str) -> Result<Expr, SyntaxError> {
	Parser::default().inline(text)
}

/// Parser for arithmetic and die expressions.
///
/// All whitespace is removed from the text before parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parser {
	/// Tokenizer for arithmetic expressions
	arithmetic: Tokenizer,

	/// Tokenizer for die expressions
	dice: Tokenizer,

	/// Maximum nesting depth of arithmetic expressions
	max_depth: Option<usize>,
}

impl Parser {
	/// Creates a parser using the escape character and nesting limit from the given config.
	#[must_use]
	pub const fn new(config: &Config) -> Self {
		Self {
			arithmetic: Tokenizer::arithmetic(config.escape),
			dice: Tokenizer::dice(config.escape),
			max_depth: config.max_depth,
		}
	}

	/// Parses an arithmetic expression.
	///
	/// # Errors
	/// If the text isn't a well-formed expression, an error variant is returned.
	pub fn expr(&self, text: &str) -> Result<Expr, SyntaxError> {
		self.parse_expr(&compact(text), 0)
	}

	/// Parses a die expression such as `2d6`, `d20` or `[[1d4]]d(2+4)`. Everything after the `d` is the number of
	/// sides, so `1d20+4` rolls a single 24-sided die.
	///
	/// # Errors
	/// If the text isn't a well-formed die expression, an error variant is returned.
	pub fn dice(&self, text: &str) -> Result<Dice, SyntaxError> {
		self.parse_dice(&compact(text), 0)
	}

	/// Parses the contents of a `[[...]]` span, which is a die expression. Text without a `d` is still accepted and
	/// treated as dice with a single side, so `2+3` evaluates to 5 just like `[[2+3]]` does in a message.
	///
	/// # Errors
	/// If the text isn't a well-formed die expression, an error variant is returned.
	///
	/// # Examples
	/// ```
	/// use dicemark::{dice::roller::Val as ValRoller, parse::Parser};
	///
	/// let parser = Parser::default();
	/// assert_eq!(parser.inline("2+3*4")?.eval(&mut ValRoller(1), None)?, 14.0);
	/// assert_eq!(parser.inline("[[1d4]]d6")?.eval(&mut ValRoller(3), None)?, 9.0);
	/// # Ok::<(), Box<dyn std::error::Error>>(())
	/// ```
	pub fn inline(&self, text: &str) -> Result<Expr, SyntaxError> {
		self.dice(text).map(Expr::Dice)
	}

	/// Parses an arithmetic expression nested `depth` levels deep.
	fn parse_expr(&self, text: &str, depth: usize) -> Result<Expr, SyntaxError> {
		let depth = depth + 1;
		if let Some(max) = self.max_depth {
			if depth > max {
				return Err(SyntaxError::TooDeep {
					expr: text.to_owned(),
					max,
				});
			}
		}

		let lexemes = self.arithmetic.tokenize(text);
		if lexemes.is_empty() {
			return Err(SyntaxError::Empty(text.to_owned()));
		}

		let items = self.group(text, &lexemes, depth)?;
		let items = repair_elisions(text, items)?;
		reduce(text, items)
	}

	/// Parses a die expression nested `depth` levels deep.
	fn parse_dice(&self, text: &str, depth: usize) -> Result<Dice, SyntaxError> {
		let mut nesting: isize = 0;
		let mut split = None;
		for lexeme in self.dice.tokenize(text) {
			match lexeme.token {
				Token::Keyword(Keyword::OpenRoll) => nesting += 1,
				Token::Keyword(Keyword::CloseRoll) => nesting -= 1,
				Token::Keyword(Keyword::Die) if nesting == 0 => {
					split = Some(lexeme);
					break;
				}
				_ => {}
			}
		}

		let (count, sides) = match split {
			Some(die) => (&text[..die.offset], &text[die.end()..]),
			None => (text, "1"),
		};
		if sides.is_empty() {
			return Err(SyntaxError::MissingSides(text.to_owned()));
		}
		let count = if count.is_empty() { "1" } else { count };

		Ok(Dice::new(
			self.parse_expr(count, depth)?,
			self.parse_expr(sides, depth)?,
		))
	}

	/// Turns lexemes into a flat list of operands and operators, parsing groups and variables along the way.
	fn group(&self, text: &str, lexemes: &[Lexeme<'_>], depth: usize) -> Result<Vec<Item>, SyntaxError> {
		let mut items = Vec::with_capacity(lexemes.len());
		let last = lexemes.len() - 1;
		let mut idx = 0;

		while let Some(lexeme) = lexemes.get(idx) {
			match lexeme.token {
				Token::Keyword(Keyword::LeftParen) => {
					let close = matching(lexemes, idx, Keyword::LeftParen, Keyword::RightParen)
						.ok_or_else(|| SyntaxError::UnbalancedParens(text.to_owned()))?;
					let inner = &text[lexeme.end()..lexemes[close].offset];
					items.push(Item::Operand(self.parse_expr(inner, depth)?));
					idx = close;
				}
				Token::Keyword(Keyword::RightParen) => return Err(SyntaxError::UnbalancedParens(text.to_owned())),

				Token::Keyword(Keyword::OpenRoll) => {
					let close = matching(lexemes, idx, Keyword::OpenRoll, Keyword::CloseRoll)
						.ok_or_else(|| SyntaxError::UnbalancedBrackets(text.to_owned()))?;
					let inner = &text[lexeme.end()..lexemes[close].offset];
					items.push(Item::Operand(Expr::Dice(self.parse_dice(inner, depth)?)));
					idx = close;
				}
				Token::Keyword(Keyword::CloseRoll) => return Err(SyntaxError::UnbalancedBrackets(text.to_owned())),

				Token::Keyword(Keyword::Dollar) => {
					let raw = match lexemes.get(idx + 1).map(|next| next.token) {
						Some(Token::Literal(raw)) => raw,
						Some(Token::Keyword(keyword)) => {
							return Err(SyntaxError::InvalidVariable {
								expr: text.to_owned(),
								name: keyword.as_str().to_owned(),
							})
						}
						None => return Err(SyntaxError::DanglingSigil(text.to_owned())),
					};

					// Only the leading run of letters is the name
					let len = raw.find(|ch: char| !ch.is_ascii_alphabetic()).unwrap_or(raw.len());
					if len == 0 {
						return Err(SyntaxError::InvalidVariable {
							expr: text.to_owned(),
							name: raw.to_owned(),
						});
					}
					items.push(Item::Operand(Expr::Var(raw[..len].to_owned())));
					idx += 1;
				}

				Token::Keyword(keyword) => match Operator::from_keyword(keyword) {
					Some(op) if idx == 0 || idx == last => return Err(misplaced(text, op)),
					Some(op) => items.push(Item::Operator(op)),
					None => items.push(Item::Operand(self.constant(keyword.as_str())?)),
				},

				Token::Literal(raw) => items.push(Item::Operand(self.constant(raw)?)),
			}
			idx += 1;
		}

		Ok(items)
	}

	/// Parses a literal as a number.
	fn constant(&self, raw: &str) -> Result<Expr, SyntaxError> {
		let literal = self.arithmetic.unescape(raw);
		let parsed = literal.trim().parse::<f64>();
		parsed
			.map(Expr::Num)
			.map_err(|_err| SyntaxError::NotANumber(literal.into_owned()))
	}
}

impl Default for Parser {
	#[inline]
	fn default() -> Self {
		Self::new(&Config::default())
	}
}

impl FromStr for Expr {
	type Err = SyntaxError;

	/// Parses an arithmetic expression using the default configuration.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		expr(s)
	}
}

impl FromStr for Dice {
	type Err = SyntaxError;

	/// Parses a die expression using the default configuration.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		dice(s)
	}
}

/// Error that can occur while parsing an expression
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SyntaxError {
	/// There is nothing to parse
	#[error("in expression \"{0}\": nothing to evaluate")]
	Empty(String),

	/// A `(` has no matching `)`, or the other way around
	#[error("in expression \"{0}\": mismatched parentheses")]
	UnbalancedParens(String),

	/// A `[[` has no matching `]]`, or the other way around
	#[error("in expression \"{0}\": mismatched double brackets")]
	UnbalancedBrackets(String),

	/// A `$` is the last thing in the expression
	#[error("in expression \"{0}\": unexpected $ at end of input")]
	DanglingSigil(String),

	/// A `$` isn't followed by a letter
	#[error("in expression \"{expr}\": \"{name}\" is not a valid variable name (names must contain only letters)")]
	InvalidVariable {
		/// Expression being parsed
		expr: String,

		/// Text following the `$`
		name: String,
	},

	/// An operator is missing an operand
	#[error("in expression \"{expr}\": misplaced {op} operator")]
	MisplacedOperator {
		/// Expression being parsed
		expr: String,

		/// The operator
		op: char,
	},

	/// A literal isn't a number
	#[error("\"{0}\" is not a number")]
	NotANumber(String),

	/// A die expression has nothing after its `d`
	#[error("in die expression \"{0}\": die expression must have a number of sides")]
	MissingSides(String),

	/// Operands are next to each other with no operator between them
	#[error("in expression \"{0}\": more than one expression")]
	Unreduced(String),

	/// Groups are nested deeper than the configured limit
	#[error("in expression \"{expr}\": nested deeper than {max} levels")]
	TooDeep {
		/// Expression being parsed
		expr: String,

		/// Maximum nesting depth
		max: usize,
	},
}

/// Binary operators of arithmetic expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
	/// `+`
	Add,

	/// `-`
	Sub,

	/// `*`
	Mul,

	/// `/`
	Div,
}

impl Operator {
	/// Gets the operator for a keyword, if it is one.
	const fn from_keyword(keyword: Keyword) -> Option<Self> {
		match keyword {
			Keyword::Plus => Some(Self::Add),
			Keyword::Minus => Some(Self::Sub),
			Keyword::Star => Some(Self::Mul),
			Keyword::Slash => Some(Self::Div),
			_ => None,
		}
	}

	/// Gets the operator's symbol.
	const fn symbol(self) -> char {
		match self {
			Self::Add => '+',
			Self::Sub => '-',
			Self::Mul => '*',
			Self::Div => '/',
		}
	}

	/// Checks whether the operator is folded in the first reduction pass.
	const fn is_multiplicative(self) -> bool {
		matches!(self, Self::Mul | Self::Div)
	}

	/// Checks whether the operator is folded in the second reduction pass.
	const fn is_additive(self) -> bool {
		matches!(self, Self::Add | Self::Sub)
	}

	/// Builds the expression applying the operator to two operands.
	fn apply(self, a: Expr, b: Expr) -> Expr {
		let build = match self {
			Self::Add => Expr::Add as fn(_, _) -> _,
			Self::Sub => Expr::Sub as fn(_, _) -> _,
			Self::Mul => Expr::Mul as fn(_, _) -> _,
			Self::Div => Expr::Div as fn(_, _) -> _,
		};
		build(Box::new(a), Box::new(b))
	}
}

/// Element of the flat list that gets reduced into a tree
#[derive(Debug, Clone, PartialEq)]
enum Item {
	/// Fully parsed operand
	Operand(Expr),

	/// Operator still waiting for its operands
	Operator(Operator),
}

/// Removes all whitespace from the text, borrowing it when there is none.
fn compact(text: &str) -> Cow<'_, str> {
	if text.contains(char::is_whitespace) {
		Cow::Owned(text.chars().filter(|ch| !ch.is_whitespace()).collect())
	} else {
		Cow::Borrowed(text)
	}
}

/// Finds the index of the lexeme closing the group opened at `open_idx`.
fn matching(lexemes: &[Lexeme<'_>], open_idx: usize, open: Keyword, close: Keyword) -> Option<usize> {
	let mut depth: usize = 0;
	for (idx, lexeme) in lexemes.iter().enumerate().skip(open_idx) {
		match lexeme.token.keyword() {
			Some(keyword) if keyword == open => depth += 1,
			Some(keyword) if keyword == close => {
				depth -= 1;
				if depth == 0 {
					return Some(idx);
				}
			}
			_ => {}
		}
	}
	None
}

/// Repairs operators written directly after another operator.
///
/// After `+` or `-` an implicit `0` operand is inserted, so `3--2` reads as `3 - 0 - 2`. After `*` or `/` the signs
/// that follow apply to the next operand instead, so `4*-1` becomes `4 * (0 - 1)`; runs of such signs cancel out
/// pairwise. A `*` or `/` directly after another operator has no left operand and is an error.
fn repair_elisions(text: &str, items: Vec<Item>) -> Result<Vec<Item>, SyntaxError> {
	let mut repaired: Vec<Item> = Vec::with_capacity(items.len());
	let mut negate = None;

	for item in items {
		let after = match repaired.last() {
			Some(Item::Operator(prev)) => Some(*prev),
			_ => None,
		};

		match item {
			Item::Operator(op) => match (after, negate) {
				(_, Some(negative)) => negate = Some(sign(text, op, negative)?),
				(Some(prev), None) if prev.is_multiplicative() => negate = Some(sign(text, op, false)?),
				(Some(..), None) if op.is_multiplicative() => return Err(misplaced(text, op)),
				(Some(..), None) => {
					repaired.push(Item::Operand(Expr::Num(0.0)));
					repaired.push(Item::Operator(op));
				}
				(None, None) => repaired.push(Item::Operator(op)),
			},
			Item::Operand(expr) => {
				let expr = if negate.take() == Some(true) {
					Expr::Sub(Box::new(Expr::Num(0.0)), Box::new(expr))
				} else {
					expr
				};
				repaired.push(Item::Operand(expr));
			}
		}
	}

	Ok(repaired)
}

/// Applies a sign that belongs to the next operand, yielding whether that operand ends up negated.
fn sign(text: &str, op: Operator, negative: bool) -> Result<bool, SyntaxError> {
	match op {
		Operator::Add => Ok(negative),
		Operator::Sub => Ok(!negative),
		Operator::Mul | Operator::Div => Err(misplaced(text, op)),
	}
}

/// Reduces the flat list to a single expression, products and quotients first.
fn reduce(text: &str, items: Vec<Item>) -> Result<Expr, SyntaxError> {
	let items = fold(text, items, Operator::is_multiplicative)?;
	let mut items = fold(text, items, Operator::is_additive)?.into_iter();

	match (items.next(), items.next()) {
		(Some(Item::Operand(expr)), None) => Ok(expr),
		(Some(Item::Operator(op)), _) => Err(misplaced(text, op)),
		_ => Err(SyntaxError::Unreduced(text.to_owned())),
	}
}

/// Folds every `operand operator operand` triple whose operator is selected by `pass` into one operand, left to right.
fn fold(text: &str, items: Vec<Item>, pass: fn(Operator) -> bool) -> Result<Vec<Item>, SyntaxError> {
	let mut folded: Vec<Item> = Vec::with_capacity(items.len());
	let mut items = items.into_iter();

	while let Some(item) = items.next() {
		match item {
			Item::Operator(op) if pass(op) => {
				let Some(Item::Operand(a)) = folded.pop() else {
					return Err(misplaced(text, op));
				};
				let Some(Item::Operand(b)) = items.next() else {
					return Err(misplaced(text, op));
				};
				folded.push(Item::Operand(op.apply(a, b)));
			}
			item => folded.push(item),
		}
	}

	Ok(folded)
}

/// Builds the error for an operator missing an operand.
fn misplaced(text: &str, op: Operator) -> SyntaxError {
	SyntaxError::MisplacedOperator {
		expr: text.to_owned(),
		op: op.symbol(),
	}
}
