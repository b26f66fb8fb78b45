use crate::scan::{spans, Scanner, Span};

fn texts(message: &str) -> Vec<&str> {
	spans(message).into_iter().map(|span| span.text).collect()
}

#[test]
fn single_span() {
	assert_eq!(
		spans("I attack with [[1d20]]!"),
		[Span {
			text: "[[1d20]]",
			offset: 14,
		}]
	);
}

#[test]
fn several_spans_in_order() {
	let found = spans("[[1]] and [[2d6]] then [[$str]]");
	assert_eq!(found.len(), 3);
	assert_eq!(found[0].offset, 0);
	assert_eq!(found[1].text, "[[2d6]]");
	assert_eq!(found[1].offset, 10);
	assert_eq!(found[2].inner(), "$str");
}

#[test]
fn nested_spans_are_one_span() {
	assert_eq!(texts("roll [[1d6 + [[1d4]]]] please"), ["[[1d6 + [[1d4]]]]"]);
	assert_eq!(texts("[[[[1]]d[[2]]]]"), ["[[[[1]]d[[2]]]]"]);
}

#[test]
fn no_spans() {
	assert!(spans("").is_empty());
	assert!(spans("just talking").is_empty());
	assert!(spans("[1d6] (2d4)").is_empty());
}

#[test]
fn unclosed_span_is_ignored() {
	assert!(spans("roll [[1d4 and done").is_empty());
	assert_eq!(texts("[[1]] then [[2"), ["[[1]]"]);
}

#[test]
fn stray_closer_is_ignored() {
	assert_eq!(texts("oops]] [[3]]"), ["[[3]]"]);
}

#[test]
fn escaped_brackets_are_not_spans() {
	assert!(spans(r"not a roll: \[[1d6]]").is_empty());
	assert_eq!(Scanner::new('!').spans(r"\[[1]]").len(), 1);
}

#[test]
fn span_helpers() {
	let span = Span {
		text: "[[ 1d6 ]]",
		offset: 3,
	};
	assert_eq!(span.end(), 12);
	assert_eq!(span.inner(), " 1d6 ");
	assert_eq!(span.compact(), "[[1d6]]");
	assert_eq!(span.to_string(), "[[ 1d6 ]]");
}

#[test]
fn multibyte_text_offsets() {
	let message = "é [[2]]";
	let found = spans(message);
	assert_eq!(found.len(), 1);
	assert_eq!(&message[found[0].offset..found[0].end()], "[[2]]");
}
