//! HSK leveler - classify and filter Chinese text by HSK level.

use clap::{Parser, Subcommand};
use hsk_leveler::config::LevelerConfig;
use hsk_leveler::dataset::SentenceTable;
use hsk_leveler::persistence::index_from_config;
use hsk_leveler::{console, vocabulary};
use hsk_leveler::{Classification, Filtered, HskLevel, LevelFilter, ReturnMode};
use serde_json::json;
use std::error::Error;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "hsk")]
#[command(about = "Classify and filter Chinese text by HSK level")]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "hsk_leveler.toml")]
    config: PathBuf,

    /// Word list (directory of level files, JSON, CSV or TSV), overrides the config
    #[arg(long)]
    vocab: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Level of a word or sentence, with a per-character breakdown
    Lookup { text: String },

    /// Level of every line of a file
    Classify { file: PathBuf },

    /// Count words per level by exact word-list membership
    Count {
        file: PathBuf,
        /// Print JSON instead of a chart
        #[arg(long)]
        json: bool,
    },

    /// Keep sentences at or below a level
    Filter {
        /// Tab separated sentences: Hanzi, Pinyin, English
        file: PathBuf,
        /// Highest level kept (defaults to the configured target level)
        #[arg(short, long)]
        level: Option<u8>,
        /// Print the positions of kept sentences instead of the sentences
        #[arg(long)]
        indices: bool,
        /// Write kept sentences here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export the character table (Hanzi,Level)
    Chars {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Characters introduced per level
    Stats,
}

fn load_config(args: &Args) -> Result<LevelerConfig, Box<dyn Error>> {
    let mut config = if args.config.exists() {
        LevelerConfig::load(&args.config)?
    } else {
        info!(path = %args.config.display(), "no config file, using defaults");
        LevelerConfig::default()
    };
    if let Some(vocab) = &args.vocab {
        config = config.with_vocabulary_path(vocab.clone());
        // An explicit word list also replaces a configured character table.
        config.char_table_path = None;
    }
    Ok(config)
}

fn read_lines(path: &Path) -> Result<Vec<String>, Box<dyn Error>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect())
}

fn output_writer(path: Option<&Path>) -> Result<Box<dyn Write>, Box<dyn Error>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    })
}

fn label(class: Classification) -> String {
    class.to_string()
}

fn parse_level(raw: u8) -> Result<HskLevel, Box<dyn Error>> {
    HskLevel::new(raw).ok_or_else(|| {
        format!("level {} is outside {}..={}", raw, HskLevel::MIN, HskLevel::MAX).into()
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    console::init(args.verbose);

    let config = load_config(&args)?;
    let index = index_from_config(&config)?;
    if index.is_empty() {
        warn!("vocabulary index is empty, every lookup will be unknown");
    }
    let filter = LevelFilter::new(&index).with_parallel_threshold(config.parallel_threshold);
    let classifier = filter.classifier();

    match &args.command {
        Command::Lookup { text } => {
            match classifier.classify_span(text) {
                Ok(class) => println!("{}: {}", text, label(class)),
                Err(e) => println!("{}", e),
            }
            for (symbol, class) in classifier.classify_symbols(text) {
                println!("  {} {}", symbol, label(class));
            }
        }
        Command::Classify { file } => {
            let spans = read_lines(file)?;
            let mut out = io::stdout().lock();
            for (span, class) in spans.iter().zip(filter.classify_column(&spans)) {
                let level = class.level().map_or("-".to_string(), |l| l.to_string());
                writeln!(out, "{}\t{}", level, span)?;
            }
        }
        Command::Count { file, json } => {
            let words = read_lines(file)?;
            if index.word_count() == 0 {
                warn!("index was built from a character table, all words count as unknown");
            }
            let counts = filter.count_by_level(&words);
            if *json {
                let rows: Vec<_> = counts
                    .most_common()
                    .into_iter()
                    .map(|(class, count)| json!({ "level": class.level().map(HskLevel::get), "count": count }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                let rows: Vec<(String, usize)> = counts
                    .iter()
                    .map(|(class, count)| (label(class), count))
                    .collect();
                console::render_chart(&mut io::stdout(), "Words per HSK level", &rows)?;
            }
        }
        Command::Filter { file, level, indices, output } => {
            let max_level = match level {
                Some(raw) => parse_level(*raw)?,
                None => config.target_level(),
            };
            let table = SentenceTable::load(file)?;
            let mut out = output_writer(output.as_deref())?;
            if *indices {
                let spans: Vec<&str> = table
                    .hanzi_cells()
                    .into_iter()
                    .map(|cell| cell.unwrap_or(""))
                    .collect();
                if let Filtered::Indices(positions) =
                    filter.filter_by_level(&spans, max_level, ReturnMode::Indices)
                {
                    for position in positions {
                        writeln!(out, "{}", position)?;
                    }
                }
                out.flush()?;
            } else {
                let kept = table.filter_by_level(&filter, max_level);
                info!(kept = kept.len(), total = table.len(), %max_level, "filtered sentences");
                kept.write_tsv(out)?;
            }
        }
        Command::Chars { output } => {
            let out = output_writer(output.as_deref())?;
            vocabulary::write_char_table(&index, out)?;
        }
        Command::Stats => {
            let rows: Vec<(String, usize)> = index
                .level_histogram()
                .into_iter()
                .map(|(level, count)| (label(Classification::Known(level)), count))
                .collect();
            println!("{} characters, {} words", index.len(), index.word_count());
            console::render_chart(&mut io::stdout(), "Characters per HSK level", &rows)?;
        }
    }

    Ok(())
}
