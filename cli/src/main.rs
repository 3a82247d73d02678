use std::env;
use std::fs;
use std::io;
use std::io::Write;
use std::process;

use npchunk::{np_chunks, preprocess, Err, Error, Grammar};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn usage(prog_name: &str) -> String {
  format!(
    r"Usage: {} [FILE] [options]

Parses the sentence in FILE, or asks for one if no FILE is given, and prints
every parse tree with its noun phrase chunks.

Options:
  -h, --help           Print this message
  -g, --grammar PATH   Read the grammar from PATH (defaults to the built-in grammar)
  -c, --chart          Print the parse chart (defaults to not printing)",
    prog_name
  )
}

fn parse(g: &Grammar, sentence: &str, print_chart: bool) -> Result<(), Err> {
  let words = preprocess(sentence);
  let words = words.iter().map(String::as_str).collect::<Vec<_>>();

  if print_chart {
    if let Ok(chart) = g.parse_chart(&words) {
      println!("chart:\n{}\n", chart);
    }
  }

  let trees = match g.parse(&words) {
    Ok(trees) => trees,
    Err(Error::Input(e)) => {
      println!("{}", e);
      return Ok(());
    }
    Err(e) => return Err(e.into()),
  };

  if trees.is_empty() {
    println!("Could not parse sentence.");
    return Ok(());
  }

  for tree in trees.iter() {
    println!("{}", tree);
    println!();
    println!("Noun Phrase Chunks");
    for np in np_chunks(tree) {
      let words = np.flatten().into_iter().map(String::as_str).collect::<Vec<_>>();
      println!("{}", words.join(" "));
    }
    println!();
  }

  Ok(())
}

struct Args {
  filename: Option<String>,
  grammar: Option<String>,
  print_chart: bool,
}

impl Args {
  fn make_error_message(msg: &str, prog_name: impl AsRef<str>) -> String {
    format!("argument error: {}.\n\n{}", msg, usage(prog_name.as_ref()))
  }

  fn parse(v: Vec<String>) -> Result<Self, String> {
    let mut iter = v.into_iter();
    let prog_name = match iter.next() {
      Some(name) => name,
      None => return Err(Self::make_error_message("bad argument vector", "npchunk")),
    };

    let mut filename: Option<String> = None;
    let mut grammar: Option<String> = None;
    let mut print_chart = false; // default to *not* printing the chart

    while let Some(o) = iter.next() {
      if o == "-h" || o == "--help" {
        println!("{}", usage(&prog_name));
        process::exit(0);
      } else if o == "-c" || o == "--chart" {
        print_chart = true;
      } else if o == "-g" || o == "--grammar" {
        match iter.next() {
          Some(path) => grammar = Some(path),
          None => return Err(Self::make_error_message("missing grammar path", prog_name)),
        }
      } else if filename.is_none() {
        filename = Some(o);
      } else {
        return Err(Self::make_error_message("invalid arguments", prog_name));
      }
    }

    Ok(Self {
      filename,
      grammar,
      print_chart,
    })
  }
}

fn read_sentence(filename: Option<&str>) -> Result<String, Err> {
  if let Some(filename) = filename {
    return Ok(fs::read_to_string(filename)?);
  }

  print!("Sentence: ");
  io::stdout().flush()?;
  let mut input = String::new();
  io::stdin().read_line(&mut input)?;
  Ok(input)
}

fn main() -> Result<(), Err> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(io::stderr)
    .init();

  let opts = match Args::parse(env::args().collect()) {
    Ok(opts) => opts,
    Err(msg) => {
      eprintln!("{}", msg);
      process::exit(255);
    }
  };

  let g = match &opts.grammar {
    Some(path) => Grammar::read_from_file(path)?,
    None => Grammar::sentences()?,
  };
  info!(start = g.start(), rules = g.rules().len(), "loaded grammar");

  let sentence = read_sentence(opts.filename.as_deref())?;
  parse(&g, &sentence, opts.print_chart)
}
