use std::iter;

use crate::{
	config::Config,
	dice::roller::{FastRand as FastRandRoller, Iter as IterRoller, Max as MaxRoller, Val as ValRoller},
	expr::{Bindings, EvalError},
	parse::SyntaxError,
	roll::{self, Engine, Error, Roll},
	scan::Span,
};

#[test]
fn arithmetic() {
	assert_eq!(roll::roll("2+3*4").unwrap(), 14.0);
	assert_eq!(roll::roll("(2+3)*4").unwrap(), 20.0);
	assert_eq!(roll::roll("3+-2").unwrap(), 1.0);
	assert_eq!(roll::roll("4*-1").unwrap(), -4.0);
}

#[test]
fn single_sided_dice_draw_nothing() {
	let engine = Engine::default();
	assert_eq!(engine.roll("5d1", &mut IterRoller::new(iter::empty()), None).unwrap(), 5.0);
	assert_eq!(engine.roll("2+3", &mut IterRoller::new(iter::empty()), None).unwrap(), 5.0);
}

#[test]
fn d6_in_range() {
	for _ in 0..1000 {
		let value = roll::roll("1d6").unwrap();
		assert!((1.0..=6.0).contains(&value));
	}
}

#[test]
fn nested_count_in_range() {
	for _ in 0..1000 {
		let value = roll::roll("[[1d4]]d6").unwrap();
		assert!((1.0..=24.0).contains(&value));
	}
}

#[test]
fn nested_count_draws_in_order() {
	let engine = Engine::default();
	let mut rng = IterRoller::new([3, 2, 5, 6]);
	assert_eq!(engine.roll("[[1d4]]d6", &mut rng, None).unwrap(), 13.0);
	assert!(!rng.can_roll());
}

#[test]
fn escaped_operator() {
	assert_eq!(
		roll::roll(r"2\+2"),
		Err(Error::Syntax(SyntaxError::NotANumber("2+2".to_owned())))
	);
}

#[test]
fn unbalanced() {
	assert!(roll::roll("(2+3").unwrap_err().is_syntax());
	assert!(roll::roll("[[1d4").unwrap_err().is_syntax());
}

#[test]
fn variables() {
	let engine = Engine::default();
	let err = engine.roll("$x+1", &mut ValRoller(1), None).unwrap_err();
	assert!(err.is_variable());
	assert_eq!(err, Error::Eval(EvalError::Variable("x".to_owned())));

	let bindings = Bindings::from([("x".to_owned(), 5.0)]);
	assert_eq!(engine.roll("$x+1", &mut ValRoller(1), Some(&bindings)).unwrap(), 6.0);
}

#[test]
fn message_spans_are_isolated() {
	let engine = Engine::default();
	let message = "a [[1+1]] b [[2d]] c [[$x]] d [[3]]";
	let outcomes = engine.roll_message(message, &mut ValRoller(1), None);
	assert_eq!(outcomes.len(), 4);

	assert_eq!(
		outcomes[0],
		Ok(Roll {
			span: Span {
				text: "[[1+1]]",
				offset: 2,
			},
			value: 2.0,
		})
	);

	let err = outcomes[1].as_ref().unwrap_err();
	assert_eq!(err.span.text, "[[2d]]");
	assert_eq!(err.error, Error::Syntax(SyntaxError::MissingSides("2d".to_owned())));

	let err = outcomes[2].as_ref().unwrap_err();
	assert!(err.error.is_variable());

	assert_eq!(outcomes[3].as_ref().map(|roll| roll.value), Ok(3.0));
}

#[test]
fn message_spans_share_the_roller() {
	let engine = Engine::default();
	let mut rng = IterRoller::new([4, 1, 6]);
	let outcomes = engine.roll_message("[[1d6]] [[2d6]]", &mut rng, None);
	let values: Vec<_> = outcomes.into_iter().map(|outcome| outcome.unwrap().value).collect();
	assert_eq!(values, [4.0, 7.0]);
}

#[test]
fn message_whitespace() {
	let engine = Engine::default();
	let outcomes = engine.roll_message("[[ 2 d 6 + [[ 1 d 1 ]] ]]", &mut MaxRoller, None);
	assert_eq!(outcomes[0].as_ref().map(|roll| roll.value), Ok(14.0));
}

#[test]
fn message_without_spans() {
	assert!(roll::roll_message("no dice here").is_empty());
	assert!(roll::roll_message(r"escaped \[[1d6]]").is_empty());
}

#[test]
fn message_with_random_rolls() {
	let outcomes = roll::roll_message("[[1d20]] and [[[[1d4]]d6]]");
	assert_eq!(outcomes.len(), 2);
	let first = outcomes[0].as_ref().unwrap().value;
	let second = outcomes[1].as_ref().unwrap().value;
	assert!((1.0..=20.0).contains(&first));
	assert!((1.0..=24.0).contains(&second));
}

#[test]
fn dice_limit() {
	let engine = Engine::new(&Config::builder().max_dice(Some(3)).build());
	let outcomes = engine.roll_message("[[3d6]] [[4d6]]", &mut MaxRoller, None);
	assert_eq!(outcomes[0].as_ref().map(|roll| roll.value), Ok(18.0));
	assert!(matches!(
		outcomes[1].as_ref().unwrap_err().error,
		Error::Eval(EvalError::TooManyDice { count: 4, max: 3, .. })
	));

	let unlimited = Engine::new(&Config::builder().max_dice(None).build());
	assert_eq!(unlimited.roll("20000d1", &mut MaxRoller, None).unwrap(), 20000.0);
	assert_eq!(unlimited.roll("20000d2", &mut MaxRoller, None).unwrap(), 40000.0);
}

#[test]
fn custom_escape() {
	let engine = Engine::new(&Config::builder().escape('!').build());
	let outcomes = engine.roll_message(r"![[1]] \[[2]]", &mut MaxRoller, None);
	assert_eq!(outcomes.len(), 1);
	assert_eq!(outcomes[0].as_ref().map(|roll| roll.span.text), Ok(r"[[2]]"));
}

#[test]
fn seeded_messages_repeat() {
	let engine = Engine::default();
	let message = "[[4d20]] [[2d[[1d6]]]]";
	let a = engine.roll_message(message, &mut FastRandRoller::with_seed(7), None);
	let b = engine.roll_message(message, &mut FastRandRoller::with_seed(7), None);
	assert_eq!(a, b);
}

#[test]
fn display() {
	let engine = Engine::default();
	let outcomes = engine.roll_message("[[ 2d6 ]] then [[2d]]", &mut ValRoller(3), None);
	assert_eq!(outcomes[0].as_ref().unwrap().to_string(), "`[[ 2d6 ]]` -> 6");
	assert_eq!(
		outcomes[1].as_ref().unwrap_err().to_string(),
		"`[[2d]]` is not valid dice syntax: in die expression \"2d\": die expression must have a number of sides"
	);
}
