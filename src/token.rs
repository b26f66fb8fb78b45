//! Splitting expression text into keywords and literal runs.
//!
//! The tokenizer knows nothing about numbers or names: everything that isn't one of its keywords ends up in a
//! [`Token::Literal`], and the parser decides what the literal means.

use std::{borrow::Cow, fmt};

use crate::config::DEFAULT_ESCAPE;

/// Keywords recognized by the tokenizers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "The grammar's keyword set is fixed")]
pub enum Keyword {
	/// `+`
	Plus,

	/// `-`
	Minus,

	/// `*`
	Star,

	/// `/`
	Slash,

	/// `(`
	LeftParen,

	/// `)`
	RightParen,

	/// `[[`, opening a die roll
	OpenRoll,

	/// `]]`, closing a die roll
	CloseRoll,

	/// `$`, prefix of a variable name
	Dollar,

	/// `d`, separating the die count from the number of sides
	Die,
}

impl Keyword {
	/// Gets the source text of the keyword.
	#[must_use]
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Plus => "+",
			Self::Minus => "-",
			Self::Star => "*",
			Self::Slash => "/",
			Self::LeftParen => "(",
			Self::RightParen => ")",
			Self::OpenRoll => "[[",
			Self::CloseRoll => "]]",
			Self::Dollar => "$",
			Self::Die => "d",
		}
	}

	/// Checks whether the keyword is one of the four arithmetic operators.
	#[must_use]
	pub const fn is_operator(self) -> bool {
		matches!(self, Self::Plus | Self::Minus | Self::Star | Self::Slash)
	}
}

impl fmt::Display for Keyword {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Keywords of arithmetic expressions
pub const ARITHMETIC_KEYWORDS: &[Keyword] = &[
	Keyword::Plus,
	Keyword::Minus,
	Keyword::Star,
	Keyword::Slash,
	Keyword::LeftParen,
	Keyword::RightParen,
	Keyword::OpenRoll,
	Keyword::CloseRoll,
	Keyword::Dollar,
];

/// Keywords of die expressions. Brackets are included so that a `d` inside a nested roll can be told apart from the
/// one separating count and sides.
pub const DICE_KEYWORDS: &[Keyword] = &[Keyword::OpenRoll, Keyword::CloseRoll, Keyword::Die];

/// Keywords delimiting spans in free-form text
pub const SPAN_KEYWORDS: &[Keyword] = &[Keyword::OpenRoll, Keyword::CloseRoll];

/// Single unit of tokenized text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[expect(clippy::exhaustive_enums, reason = "Text is either a keyword or it isn't")]
pub enum Token<'a> {
	/// Keyword from the tokenizer's set
	Keyword(Keyword),

	/// Run of text between keywords, exactly as it appears in the source (escape characters included)
	Literal(&'a str),
}

impl<'a> Token<'a> {
	/// Gets the source text of the token.
	#[must_use]
	pub const fn as_str(&self) -> &'a str {
		match self {
			Self::Keyword(keyword) => keyword.as_str(),
			Self::Literal(raw) => *raw,
		}
	}

	/// Gets the keyword of the token, if it is one.
	#[must_use]
	pub const fn keyword(&self) -> Option<Keyword> {
		match self {
			Self::Keyword(keyword) => Some(*keyword),
			Self::Literal(..) => None,
		}
	}
}

/// [`Token`] along with its byte offset in the tokenized text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Lexeme<'a> {
	/// The token
	pub token: Token<'a>,

	/// Byte offset of the token's first character
	pub offset: usize,
}

impl Lexeme<'_> {
	/// Gets the byte offset just past the token's last character.
	#[must_use]
	pub const fn end(&self) -> usize {
		self.offset + self.token.as_str().len()
	}
}

/// Splits text into [`Lexeme`]s over a fixed keyword set.
///
/// Keywords directly preceded by the escape character are not treated as keywords and stay part of the surrounding
/// literal. When keywords could be found at several positions, the earliest one wins; if two start at the same
/// position, the one listed first in the set wins.
///
/// # Examples
/// ```
/// use dicemark::token::{Keyword, Token, Tokenizer};
///
/// let tokenizer = Tokenizer::arithmetic('\\');
/// let tokens: Vec<_> = tokenizer.tokenize("(4+5er342)*6").into_iter().map(|lex| lex.token).collect();
/// assert_eq!(
/// 	tokens,
/// 	[
/// 		Token::Keyword(Keyword::LeftParen),
/// 		Token::Literal("4"),
/// 		Token::Keyword(Keyword::Plus),
/// 		Token::Literal("5er342"),
/// 		Token::Keyword(Keyword::RightParen),
/// 		Token::Keyword(Keyword::Star),
/// 		Token::Literal("6"),
/// 	]
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tokenizer {
	/// Keywords to split on
	keywords: &'static [Keyword],

	/// Character that suppresses a keyword following it
	escape: char,
}

impl Tokenizer {
	/// Creates a tokenizer for the given keyword set and escape character.
	#[must_use]
	pub const fn new(keywords: &'static [Keyword], escape: char) -> Self {
		Self { keywords, escape }
	}

	/// Creates a tokenizer for arithmetic expressions.
	#[must_use]
	#[inline]
	pub const fn arithmetic(escape: char) -> Self {
		Self::new(ARITHMETIC_KEYWORDS, escape)
	}

	/// Creates a tokenizer for die expressions.
	#[must_use]
	#[inline]
	pub const fn dice(escape: char) -> Self {
		Self::new(DICE_KEYWORDS, escape)
	}

	/// Creates a tokenizer that only splits on roll brackets.
	#[must_use]
	#[inline]
	pub const fn spans(escape: char) -> Self {
		Self::new(SPAN_KEYWORDS, escape)
	}

	/// Gets the keyword set.
	#[must_use]
	pub const fn keywords(&self) -> &'static [Keyword] {
		self.keywords
	}

	/// Gets the escape character.
	#[must_use]
	pub const fn escape(&self) -> char {
		self.escape
	}

	/// Splits the text into keywords and literals.
	#[must_use]
	pub fn tokenize<'a>(&self, text: &'a str) -> Vec<Lexeme<'a>> {
		let mut lexemes = Vec::new();
		let mut pos = 0;

		while let Some((found, keyword)) = self.find_keyword(text, pos) {
			if found > pos {
				lexemes.push(Lexeme {
					token: Token::Literal(&text[pos..found]),
					offset: pos,
				});
			}
			lexemes.push(Lexeme {
				token: Token::Keyword(keyword),
				offset: found,
			});
			pos = found + keyword.as_str().len();
		}

		if pos < text.len() {
			lexemes.push(Lexeme {
				token: Token::Literal(&text[pos..]),
				offset: pos,
			});
		}

		lexemes
	}

	/// Finds the first unescaped keyword at or after byte offset `from`.
	///
	/// The text is walked once, trying every keyword at each position.
	#[must_use]
	pub fn find_keyword(&self, text: &str, from: usize) -> Option<(usize, Keyword)> {
		let rest = text.get(from..)?;
		let mut escaped = text[..from].ends_with(self.escape);

		for (idx, ch) in rest.char_indices() {
			if !escaped {
				let tail = &rest[idx..];
				if let Some(&keyword) = self.keywords.iter().find(|keyword| tail.starts_with(keyword.as_str())) {
					return Some((from + idx, keyword));
				}
			}
			escaped = ch == self.escape;
		}

		None
	}

	/// Removes the escape characters that suppressed keywords in a literal, yielding the text it stands for.
	///
	/// # Examples
	/// ```
	/// use dicemark::token::Tokenizer;
	///
	/// let tokenizer = Tokenizer::arithmetic('\\');
	/// assert_eq!(tokenizer.unescape(r"2\+2"), "2+2");
	/// assert_eq!(tokenizer.unescape(r"\x"), r"\x");
	/// ```
	#[must_use]
	pub fn unescape<'a>(&self, raw: &'a str) -> Cow<'a, str> {
		if !raw.contains(self.escape) {
			return Cow::Borrowed(raw);
		}

		let mut text = String::with_capacity(raw.len());
		for (idx, ch) in raw.char_indices() {
			if ch == self.escape {
				let rest = &raw[idx + ch.len_utf8()..];
				if self.keywords.iter().any(|keyword| rest.starts_with(keyword.as_str())) {
					continue;
				}
			}
			text.push(ch);
		}
		Cow::Owned(text)
	}
}

impl Default for Tokenizer {
	/// Creates an arithmetic tokenizer with the default escape character.
	#[inline]
	fn default() -> Self {
		Self::arithmetic(DEFAULT_ESCAPE)
	}
}
