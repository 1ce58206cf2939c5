use std::error::Error;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::{info, warn};

use pronwords_core::model::alphabet::DEFAULT_ALPHABET;
use pronwords_core::model::generator::Generator;
use pronwords_core::model::pronounceable::PronounceabilityModel;
use pronwords_core::model::weights::Weights;
use pronwords_core::report::{matches, Summary};
use pronwords_core::selector::{resolve_threshold, ThresholdMode};

/// Find pronounceable words
#[derive(Parser, Debug)]
#[command(name = "pronwords", version, about)]
struct Args {
    /// Generated word length
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u64).range(1..))]
    length: u64,

    /// Generated words character set
    #[arg(short = 'c', long, default_value = DEFAULT_ALPHABET)]
    characters: String,

    /// Path to the corpus containing text to learn from ('-' for stdin)
    #[arg(short = 'i', long)]
    corpus: PathBuf,

    /// Only show words with score >= threshold
    #[arg(short = 't', long, allow_negative_numbers = true)]
    threshold: Option<f64>,

    /// Only show scores in the given percentile (0 <= p < 100)
    #[arg(short = 'p', long, allow_negative_numbers = true)]
    percentile: Option<f64>,

    /// Only print the top N words
    #[arg(long)]
    top: Option<usize>,

    /// Do not display scores
    #[arg(long)]
    hide_scores: bool,

    /// Unigram, bigram and trigram weights
    #[arg(long, default_value = "1,3,5", value_parser = parse_weights)]
    weights: Weights,
}

/// Parses `"uni,bi,tri"` into a weight triple.
fn parse_weights(s: &str) -> Result<Weights, String> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<f64>().map_err(|e| format!("'{v}': {e}")))
        .collect::<Result<Vec<_>, _>>()?;

    match values[..] {
        [unigram, bigram, trigram] => Weights::new(unigram, bigram, trigram).map_err(|e| e.to_string()),
        _ => Err(format!("expected 3 comma separated weights, got {}", values.len())),
    }
}

/// Learns the corpus, from stdin or from a file.
fn load_model(corpus: &Path) -> Result<PronounceabilityModel, Box<dyn Error>> {
    if corpus == Path::new("-") {
        let mut model = PronounceabilityModel::new();
        model.add_word_list(io::stdin().lock())?;
        return Ok(model);
    }
    Ok(PronounceabilityModel::from_corpus_file(corpus)?)
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    // Reject bad combinations before the expensive parts
    let mode = ThresholdMode::from_options(args.threshold, args.percentile, args.top)?;
    let length = usize::try_from(args.length)?;
    let mut generator = Generator::new(&args.characters, length)?;

    let model = load_model(&args.corpus)?.with_weights(args.weights);
    info!(
        "learnt {} distinct characters, {} candidates of length {} over '{}'",
        model.unigram().len(),
        generator.total().map_or_else(|| "too many".to_owned(), |t| t.to_string()),
        length,
        generator.alphabet()
    );

    let threshold = match mode {
        Some(ThresholdMode::Explicit(value)) => Some(value),
        Some(mode) => {
            match mode {
                ThresholdMode::Percentile(p) => eprint!("        // determining threshold for {p}th percentile… "),
                ThresholdMode::Top(n) => eprint!("        // determining threshold for top {n}… "),
                ThresholdMode::Explicit(_) => (),
            }
            let threshold = resolve_threshold(mode, &mut generator, &model)?;
            match threshold {
                Some(t) => eprintln!("{t}"),
                None => {
                    eprintln!("none");
                    warn!("no threshold can be formed, showing every word");
                }
            }
            threshold
        }
        None => None,
    };

    let mut out = BufWriter::new(io::stdout().lock());
    let mut summary = Summary::new(generator.total());
    for m in matches(&mut generator, &model, threshold) {
        summary.record(m.score);
        if args.hide_scores {
            writeln!(out, "{}", m.word)?;
        } else {
            writeln!(out, "{m}")?;
        }
    }
    out.flush()?;

    eprintln!();
    eprintln!("{summary}");
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
