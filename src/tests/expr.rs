use crate::{
	dice::{
		roller::{FastRand as FastRandRoller, Iter as IterRoller, Max as MaxRoller, Val as ValRoller},
		Dice,
	},
	expr::{Bindings, EvalError, Expr, OpType},
};

fn num(x: f64) -> Box<Expr> {
	Box::new(Expr::Num(x))
}

#[test]
fn basic_addition() {
	let expr = Expr::Add(num(42.0), num(69.0));
	assert_eq!(expr.eval(&mut FastRandRoller::default(), None).unwrap(), 111.0);
}

#[test]
fn basic_subtraction() {
	let expr = Expr::Sub(num(42.0), num(69.0));
	assert_eq!(expr.eval(&mut FastRandRoller::default(), None).unwrap(), -27.0);
}

#[test]
fn basic_multiplication() {
	let expr = Expr::Mul(num(42.0), num(69.0));
	assert_eq!(expr.eval(&mut FastRandRoller::default(), None).unwrap(), 2898.0);
}

#[test]
fn basic_division() {
	let expr = Expr::Div(num(50.0), num(4.0));
	assert_eq!(expr.eval(&mut FastRandRoller::default(), None).unwrap(), 12.5);
}

#[test]
fn division_by_zero() {
	let expr = Expr::Div(num(1.0), num(0.0));
	assert_eq!(expr.eval(&mut ValRoller(1), None).unwrap(), f64::INFINITY);

	let expr = Expr::Div(num(0.0), num(0.0));
	assert!(expr.eval(&mut ValRoller(1), None).unwrap().is_nan());
}

#[test]
fn complex_math() {
	let expr = Expr::Sub(
		Box::new(Expr::Mul(
			Box::new(Expr::Sub(num(0.0), num(5.0))),
			Box::new(Expr::Add(num(3.0), num(1.0))),
		)),
		Box::new(Expr::Div(num(-4.0), num(2.0))),
	);
	assert_eq!(expr.eval(&mut ValRoller(1), None).unwrap(), -18.0);
}

#[test]
fn variables() {
	let expr = Expr::Add(Box::new(Expr::Var("x".to_owned())), num(1.0));
	let bindings = Bindings::from([("x".to_owned(), 5.0)]);
	assert_eq!(expr.eval(&mut ValRoller(1), Some(&bindings)).unwrap(), 6.0);
}

#[test]
fn missing_variable() {
	let expr = Expr::Add(Box::new(Expr::Var("x".to_owned())), num(1.0));
	assert_eq!(
		expr.eval(&mut ValRoller(1), None),
		Err(EvalError::Variable("x".to_owned()))
	);
	assert_eq!(
		expr.eval(&mut ValRoller(1), Some(&Bindings::new())),
		Err(EvalError::Variable("x".to_owned()))
	);
}

#[test]
fn variable_names_are_case_sensitive() {
	let expr = Expr::Var("str".to_owned());
	let bindings = Bindings::from([("STR".to_owned(), 3.0)]);
	assert_eq!(
		expr.eval(&mut ValRoller(1), Some(&bindings)),
		Err(EvalError::Variable("str".to_owned()))
	);
}

#[test]
fn operands_evaluate_left_to_right() {
	let expr = Expr::Add(
		Box::new(Expr::Mul(Box::new(Expr::Dice(Dice::plain(1, 6))), num(10.0))),
		Box::new(Expr::Dice(Dice::plain(1, 6))),
	);
	let mut rng = IterRoller::new([1, 6]);
	assert_eq!(expr.eval(&mut rng, None).unwrap(), 16.0);
	assert!(!rng.can_roll());
}

#[test]
fn error_stops_evaluation() {
	let expr = Expr::Add(
		Box::new(Expr::Var("x".to_owned())),
		Box::new(Expr::Dice(Dice::plain(1, 6))),
	);
	let mut rng = IterRoller::new([4]);
	assert!(expr.eval(&mut rng, None).is_err());
	assert!(rng.can_roll());
}

#[test]
fn dice_limit() {
	let expr = Expr::Dice(Dice::plain(20, 6));
	assert_eq!(expr.eval_limited(&mut MaxRoller, None, Some(20)).unwrap(), 120.0);
	assert_eq!(
		expr.eval_limited(&mut MaxRoller, None, Some(10)),
		Err(EvalError::TooManyDice {
			dice: Dice::plain(20, 6),
			count: 20,
			max: 10,
		})
	);
}

#[test]
fn dice_limit_applies_to_nested_dice() {
	let expr = Expr::Dice(Dice::new(Expr::Dice(Dice::plain(50, 1)), Expr::Num(6.0)));
	assert!(matches!(
		expr.eval_limited(&mut MaxRoller, None, Some(10)),
		Err(EvalError::TooManyDice { count: 50, .. })
	));
}

#[test]
fn determinism() {
	assert!(Expr::Num(4.0).is_deterministic());
	assert!(Expr::Var("x".to_owned()).is_deterministic());
	assert!(Expr::Add(num(1.0), Box::new(Expr::Dice(Dice::plain(5, 1)))).is_deterministic());
	assert!(!Expr::Add(num(1.0), Box::new(Expr::Dice(Dice::plain(1, 6)))).is_deterministic());
	assert!(!Expr::Dice(Dice::new(Expr::Dice(Dice::plain(1, 4)), Expr::Num(1.0))).is_deterministic());
}

#[test]
fn op_types() {
	assert_eq!(Expr::Num(1.0).op_type(), OpType::Value);
	assert_eq!(Expr::Dice(Dice::default()).op_type(), OpType::Value);
	assert_eq!(Expr::Sub(num(1.0), num(1.0)).op_type(), OpType::Additive);
	assert_eq!(Expr::Div(num(1.0), num(1.0)).op_type(), OpType::Multiplicative);
	assert!(OpType::Additive < OpType::Multiplicative);
}

#[test]
fn display() {
	let expr = Expr::Mul(
		Box::new(Expr::Add(Box::new(Expr::Var("str".to_owned())), num(2.0))),
		Box::new(Expr::Dice(Dice::plain(1, 8))),
	);
	assert_eq!(expr.to_string(), "($str + 2) * [[1d8]]");
	assert_eq!(Expr::Sub(num(1.0), num(-2.5)).to_string(), "1 - (0 - 2.5)");
	assert_eq!(Expr::Div(num(1.0), Box::new(Expr::Mul(num(2.0), num(3.0)))).to_string(), "1 / (2 * 3)");
}
