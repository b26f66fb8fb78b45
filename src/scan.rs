//! Locating `[[...]]` spans inside free-form text.

use std::fmt;

use crate::{
	config::DEFAULT_ESCAPE,
	token::{Keyword, Tokenizer},
};

/// Maximal balanced `[[...]]` substring of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Span<'a> {
	/// Text of the span, brackets included
	pub text: &'a str,

	/// Byte offset of the span in the scanned text
	pub offset: usize,
}

impl<'a> Span<'a> {
	/// Gets the byte offset just past the span's closing brackets.
	#[must_use]
	pub const fn end(&self) -> usize {
		self.offset + self.text.len()
	}

	/// Gets the text between the outer brackets.
	#[must_use]
	pub fn inner(&self) -> &'a str {
		self.text
			.strip_prefix(Keyword::OpenRoll.as_str())
			.and_then(|text| text.strip_suffix(Keyword::CloseRoll.as_str()))
			.unwrap_or(self.text)
	}

	/// Builds a copy of the span's text with all whitespace removed, ready to be parsed.
	///
	/// # Examples
	/// ```
	/// use dicemark::scan::Span;
	///
	/// let span = Span { text: "[[ 2d6 + 3 ]]", offset: 0 };
	/// assert_eq!(span.compact(), "[[2d6+3]]");
	/// ```
	#[must_use]
	pub fn compact(&self) -> String {
		self.text.chars().filter(|ch| !ch.is_whitespace()).collect()
	}
}

impl fmt::Display for Span<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.text)
	}
}

/// Finds the top-level `[[...]]` spans of free-form text.
///
/// Brackets are matched with a depth counter that never goes below zero, so stray `]]` are ignored and an unclosed
/// `[[` simply produces no span. Whatever is malformed inside a span is left for the parser to reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scanner {
	/// Tokenizer splitting only on roll brackets
	tokenizer: Tokenizer,
}

impl Scanner {
	/// Creates a scanner that ignores brackets preceded by the given escape character.
	#[must_use]
	pub const fn new(escape: char) -> Self {
		Self {
			tokenizer: Tokenizer::spans(escape),
		}
	}

	/// Lists the spans of the text in order of appearance.
	#[must_use]
	pub fn spans<'a>(&self, text: &'a str) -> Vec<Span<'a>> {
		let mut spans = Vec::new();
		let mut depth: usize = 0;
		let mut start = 0;
		let mut pos = 0;

		while let Some((found, keyword)) = self.tokenizer.find_keyword(text, pos) {
			pos = found + keyword.as_str().len();
			match keyword {
				Keyword::OpenRoll => {
					if depth == 0 {
						start = found;
					}
					depth += 1;
				}
				Keyword::CloseRoll => match depth {
					0 => {}
					1 => {
						depth = 0;
						spans.push(Span {
							text: &text[start..pos],
							offset: start,
						});
					}
					_ => depth -= 1,
				},
				_ => {}
			}
		}

		spans
	}
}

impl Default for Scanner {
	#[inline]
	fn default() -> Self {
		Self::new(DEFAULT_ESCAPE)
	}
}

/// Lists the `[[...]]` spans of the text using the default escape character.
///
/// # Examples
/// ```
/// let spans = dicemark::scan::spans("roll [[1d6 + [[1d4]]]] please");
/// assert_eq!(spans.len(), 1);
/// assert_eq!(spans[0].text, "[[1d6 + [[1d4]]]]");
/// assert_eq!(spans[0].offset, 5);
/// ```
#[must_use]
pub fn spans(text: &str) -> Vec<Span<'_>> {
	Scanner::default().spans(text)
}
