use std::{
	io::{self, IsTerminal},
	ops::Range,
	process::ExitCode,
};

use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::Parser;
use dicemark::{
	config::{DEFAULT_ESCAPE, DEFAULT_MAX_DEPTH, DEFAULT_MAX_DICE},
	dice::roller::FastRand as FastRandRoller,
	Bindings, Config, Engine,
};
use tracing_subscriber::EnvFilter;

/// Rolls every [[...]] span of a chat message
#[derive(Parser, Debug)]
#[command(name = "dicemark", version)]
struct Cli {
	/// Message to roll. Read from stdin when omitted.
	message: Vec<String>,

	/// Treat the input as a single expression rather than a message containing [[...]] spans.
	#[arg(long)]
	expr: bool,

	/// Value for a variable, as NAME=VALUE. May be repeated.
	#[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_binding)]
	vars: Vec<(String, f64)>,

	/// Seed for the dice roller, for reproducible rolls.
	#[arg(long)]
	seed: Option<u64>,

	/// Character that stops the keyword following it from being treated as one.
	#[arg(long, default_value_t = DEFAULT_ESCAPE)]
	escape: char,

	/// Maximum nesting depth of expressions (0 for no limit).
	#[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
	max_depth: usize,

	/// Maximum number of dice in a single die roll (0 for no limit).
	#[arg(long, default_value_t = DEFAULT_MAX_DICE)]
	max_dice: u64,
}

impl Cli {
	/// Builds the engine config from the arguments.
	fn config(&self) -> Config {
		Config::builder()
			.escape(self.escape)
			.max_depth(if self.max_depth == 0 { None } else { Some(self.max_depth) })
			.max_dice(if self.max_dice == 0 { None } else { Some(self.max_dice) })
			.build()
	}

	/// Obtains the input by combining all message arguments, so that it can be left unquoted even with spaces, or
	/// reading stdin when there are none.
	fn input(&self) -> io::Result<String> {
		if !self.message.is_empty() {
			return Ok(self.message.join(" "));
		}

		let stdin = io::stdin();
		if stdin.is_terminal() {
			eprintln!("Enter a message, then end the input (Ctrl+D):");
		}
		Ok(io::read_to_string(stdin)?.trim_end().to_owned())
	}
}

fn main() -> ExitCode {
	let cli = Cli::parse();

	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
		.with_writer(io::stderr)
		.init();

	let input = match cli.input() {
		Ok(input) => input,
		Err(err) => {
			eprintln!("Unable to read input: {err}");
			return ExitCode::FAILURE;
		}
	};

	let engine = Engine::new(&cli.config());
	let bindings: Bindings = cli.vars.iter().cloned().collect();
	let mut rng = cli.seed.map_or_else(FastRandRoller::default, FastRandRoller::with_seed);

	if cli.expr {
		return match engine.roll(&input, &mut rng, Some(&bindings)) {
			Ok(value) => {
				println!("{value}");
				ExitCode::SUCCESS
			}
			Err(err) => {
				report(&input, 0..input.len(), &format!("unable to roll expression: {err}"), &err.to_string());
				ExitCode::FAILURE
			}
		};
	}

	let outcomes = engine.roll_message(&input, &mut rng, Some(&bindings));
	if outcomes.is_empty() {
		eprintln!("No [[...]] spans found in the message.");
	}

	let mut failed = false;
	for outcome in outcomes {
		match outcome {
			Ok(roll) => println!("{roll}"),
			Err(err) => {
				failed = true;
				report(&input, err.span.offset..err.span.end(), &err.to_string(), &err.error.to_string());
			}
		}
	}

	if failed {
		ExitCode::FAILURE
	} else {
		ExitCode::SUCCESS
	}
}

/// Prints an error report pointing at a byte range of the input.
fn report(input: &str, bytes: Range<usize>, message: &str, label: &str) {
	// Reports count characters, not bytes
	let start = input[..bytes.start].chars().count();
	let span = start..start + input[bytes].chars().count();

	let printed = Report::build(ReportKind::Error, ("input", span.clone()))
		.with_message(message)
		.with_label(Label::new(("input", span)).with_message(label).with_color(Color::Red))
		.finish()
		.eprint(("input", Source::from(input)));
	if let Err(err) = printed {
		eprintln!("{message} ({err})");
	}
}

/// Parses a `NAME=VALUE` variable binding.
fn parse_binding(arg: &str) -> Result<(String, f64), String> {
	let (name, value) = arg
		.split_once('=')
		.ok_or_else(|| format!("\"{arg}\" isn't in the form NAME=VALUE"))?;
	if name.is_empty() || !name.chars().all(|ch| ch.is_ascii_alphabetic()) {
		return Err(format!("\"{name}\" is not a valid variable name (names must contain only letters)"));
	}
	let value = value
		.trim()
		.parse()
		.map_err(|err| format!("\"{value}\" is not a number: {err}"))?;
	Ok((name.to_owned(), value))
}
