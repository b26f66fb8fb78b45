#![feature(test)]

extern crate test;

use test::Bencher;

use dicemark::{dice::roller::FastRand, Bindings, Engine};

#[bench]
fn e2e_basic(b: &mut Bencher) {
	let engine = Engine::default();
	let mut rng = FastRand::default();
	b.iter(|| engine.roll("4d8", &mut rng, None).unwrap());
}

#[bench]
fn e2e_complex(b: &mut Bencher) {
	let engine = Engine::default();
	let mut rng = FastRand::default();
	b.iter(|| engine.roll("[[4d8]]+[[2d10]]*-([[3d6]]-6/2)", &mut rng, None).unwrap());
}

#[bench]
fn e2e_message(b: &mut Bencher) {
	let engine = Engine::default();
	let bindings = Bindings::from([("str".to_owned(), 3.0)]);
	let mut rng = FastRand::default();
	b.iter(|| {
		engine.roll_message(
			"I attack with [[1d20 + $str]] and deal [[ [[1d4]]d6 ]] damage",
			&mut rng,
			Some(&bindings),
		)
	});
}
