use clap::{Parser, ValueEnum};
use env_logger::Env;
use mergetok::BpeError;
use mergetok::corpus::{DEFAULT_TRAIN_RATIO, LineFileTextSource, TextSource};
use mergetok::tokenizer::{BpeTokenizer, Tokenizer};
use mergetok::training::word_split::normalize_whitespace;
use mergetok::training::{MergeStrategy, TrainResults, TrainerOptions};
use std::path::PathBuf;

/// Pair recount strategy.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Strategy {
    /// Incremental pair index.
    Indexed,

    /// Full recount every merge.
    Rescan,
}

impl From<Strategy> for MergeStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Indexed => MergeStrategy::Indexed,
            Strategy::Rescan => MergeStrategy::Rescan,
        }
    }
}

/// Word-level BPE tokenizer trainer.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Corpus files; one text item per non-blank line.
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub input: Vec<PathBuf>,

    /// Number of merges.
    #[arg(long, default_value_t = mergetok::DEFAULT_NUM_MERGES)]
    pub num_merges: usize,

    /// Fraction of the corpus used for training; the rest is for validation.
    #[arg(long, default_value_t = DEFAULT_TRAIN_RATIO)]
    pub train_ratio: f64,

    /// Vocabulary save path.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pair recount strategy.
    #[arg(long, value_enum, default_value = "indexed")]
    pub strategy: Strategy,

    /// Print the tokenization of this text.
    #[arg(long)]
    pub show: Option<String>,

    /// Enable verbose output.
    #[arg(long, default_value = "false")]
    pub verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();
    log::debug!("{:#?}", args);

    type T = u32;

    let source = LineFileTextSource::new(args.input.clone()).with_train_ratio(args.train_ratio);

    let options = TrainerOptions::default()
        .with_num_merges(args.num_merges)
        .with_strategy(args.strategy.into());

    let t0 = std::time::Instant::now();
    let TrainResults::<T> { vocab, merges, .. } = options.train_vocab_from_source(&source)?;
    let training_duration = std::time::Instant::now().duration_since(t0);

    println!("Training Summary:");
    println!("- training_duration: {:#?}", training_duration);
    println!("- merges: {}", merges.len());
    println!("- vocab_size: {}", vocab.len());

    let tokenizer: BpeTokenizer<T> = BpeTokenizer::from_vocab(vocab);

    if let Some(path) = &args.output {
        tokenizer.save(path)?;
        println!("- vocab: {path:?}");
    }

    let validation = source.load_text_items(false)?;
    if !validation.is_empty() {
        let mut exact = 0;
        let mut unsegmentable = 0;
        let mut total_tokens = 0;
        for text in &validation {
            match tokenizer.encode(text) {
                Ok(ids) => {
                    total_tokens += ids.len();
                    if tokenizer.decode(&ids)? == normalize_whitespace(text) {
                        exact += 1;
                    }
                }
                Err(BpeError::UnsegmentableWord { .. }) => unsegmentable += 1,
                Err(err) => return Err(err.into()),
            }
        }

        println!();
        println!("Validation Summary:");
        println!("- items: {}", validation.len());
        println!("- exact round trips: {exact}");
        println!("- unsegmentable: {unsegmentable}");
        println!("- tokens: {total_tokens}");
    }

    if let Some(text) = &args.show {
        let tokens = tokenizer.tokenize(text)?;
        let ids = tokenizer.encode(text)?;

        println!();
        println!("Sample:");
        println!("- tokens: {tokens:?}");
        println!("- ids: {ids:?}");
        println!("- decoded: {:?}", tokenizer.decode(&ids)?);
    }

    Ok(())
}
