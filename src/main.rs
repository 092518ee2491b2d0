//! blocktype - block-by-block content type classification.
//!
//! Usage:
//!   blocktype [OPTIONS] PATH...        Classify files, directories or `-` (stdin)
//!   blocktype -b 4096 PATH             Classify every 4096 byte block
//!   blocktype -p 10 -r 7 -t JPG PATH   Sample 10% of blocks as training data
//!   blocktype -T -                     List the class table
//!   blocktype --help                   Show help

use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use blocktype_core::{ClassifyError, DEFAULT_BLOCK_SIZE, DriverConfig, InputPath};
use blocktype_model::{Engine, NgramMode, TypeTable};
use blocktype_scan::{Driver, Reporter};

#[derive(Parser)]
#[command(
    name = "blocktype",
    version,
    about = "Block-by-block content type classification",
    long_about = "blocktype classifies the content type of files, directories and standard \
                  input, either as whole streams or block by block.\n\n\
                  Pass `-` as a path to read standard input. Use -j or -t to emit training \
                  features instead of classifications."
)]
struct Cli {
    /// Files or directories to classify; `-` reads standard input
    #[arg(required_unless_present_any = ["lookup", "reduce", "list_classes"])]
    paths: Vec<PathBuf>,

    /// Classify each block of this many bytes instead of whole files
    #[arg(short = 'b', long, value_name = "SIZE")]
    block_size: Option<usize>,

    /// Percentage of blocks to sample; 100 or more samples every block
    #[arg(short = 'p', long, default_value_t = 100, value_name = "PERCENT")]
    percentage: u32,

    /// Seed for the sampling random number generator
    #[arg(short = 'r', long, short_alias = 's', default_value_t = 0)]
    seed: u32,

    /// Omit file headers (skip the first block of every input)
    #[arg(short = 'x', long)]
    skip_header: bool,

    /// Report the byte ranges of sampled blocks to stderr
    #[arg(short = 'P', long)]
    report_ranges: bool,

    /// Emit JSON features labelled with CLASS instead of classifying
    #[arg(short = 'j', long, value_name = "CLASS", conflicts_with = "train")]
    json: Option<String>,

    /// Emit liblinear training lines labelled with CLASS instead of classifying
    #[arg(short = 't', long, value_name = "CLASS")]
    train: Option<String>,

    /// Bigram mode: 0 = disjoint, 1 = overlapping, 2 = even/odd
    #[arg(short = 'n', long, default_value_t = 1, value_name = "MODE")]
    ngram: u8,

    /// File of user-defined class names, one per line
    #[arg(short = 'C', long, value_name = "FILE")]
    class_file: Option<PathBuf>,

    /// Trained model to use instead of the builtin rules
    #[arg(short = 'm', long, value_name = "FILE")]
    model: Option<PathBuf>,

    /// Feature mask to apply to extracted features
    #[arg(short = 'f', long, value_name = "FILE")]
    mask_in: Option<PathBuf>,

    /// Feature mask file written by --reduce
    #[arg(short = 'F', long, value_name = "FILE")]
    mask_out: Option<PathBuf>,

    /// Keep the N strongest model features, write them to -F and exit
    #[arg(short = 'R', long, value_name = "N", requires = "mask_out")]
    reduce: Option<usize>,

    /// Look up a type: a number prints its name, a name prints its number,
    /// `-` lists every type
    #[arg(short = 'T', long, value_name = "TYPE", allow_hyphen_values = true)]
    lookup: Option<String>,

    /// Print the class table and exit
    #[arg(long)]
    list_classes: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = Cli::parse();

    if let Some(query) = &cli.lookup {
        return run_lookup(cli.class_file.as_deref(), query);
    }
    if cli.list_classes {
        return run_list_classes(cli.class_file.as_deref());
    }
    run_classify(cli)
}

/// Log to stderr so stdout only carries results.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

/// Load the class table named on the command line, or the builtin one.
fn load_types(class_file: Option<&Path>) -> Result<TypeTable> {
    match class_file {
        Some(path) => TypeTable::from_class_file(path).wrap_err("Invalid class file"),
        None => Ok(TypeTable::builtin()),
    }
}

/// Answer a -T query.
fn run_lookup(class_file: Option<&Path>, query: &str) -> Result<()> {
    let types = load_types(class_file)?;

    if query == "-" {
        for (code, name) in types.iter().skip(1) {
            println!("{code}\t{name}");
        }
    } else if !query.is_empty() && query.bytes().all(|b| b.is_ascii_digit()) {
        match query.parse().ok().and_then(|code| types.name_for_type(code)) {
            Some(name) => println!("{name}"),
            None => eprintln!("{query}: invalid number"),
        }
    } else {
        println!("{}", types.resolve(query)?);
    }
    Ok(())
}

/// Print every class with its code.
fn run_list_classes(class_file: Option<&Path>) -> Result<()> {
    let types = load_types(class_file)?;
    println!("Classes");
    for (code, name) in types.iter() {
        println!("\t{code:2} : {name}");
    }
    Ok(())
}

/// Open the classifier and classify every input.
fn run_classify(cli: Cli) -> Result<()> {
    let mode = NgramMode::from_number(cli.ngram)
        .ok_or_else(|| eyre!("Invalid ngram mode {} (expected 0, 1 or 2)", cli.ngram))?;

    let mut engine = Engine::open(
        cli.model.as_deref(),
        cli.class_file.as_deref(),
        cli.mask_in.as_deref(),
    )
    .wrap_err("Cannot open classifier")?;
    engine.set_ngram_mode(mode);

    if let Some(top_n) = cli.reduce {
        let output = cli
            .mask_out
            .as_deref()
            .ok_or_else(|| eyre!("--reduce requires a feature mask output file (-F)"))?;
        let kept = engine
            .reduce_features(output, top_n)
            .wrap_err("Feature reduction failed")?;
        eprintln!("Kept {kept} features in {}", output.display());
        return Ok(());
    }

    if let Some(class) = &cli.json {
        let code = engine.types().resolve(class)?;
        engine.dump_json_on_classify(code, io::stdout());
    }
    if let Some(class) = &cli.train {
        let code = engine.types().resolve(class)?;
        engine.dump_nodes_on_classify(code, io::stdout());
    }

    let block_size = cli.block_size.unwrap_or(DEFAULT_BLOCK_SIZE);
    let config = DriverConfig::builder()
        .block_size(block_size)
        .block_mode(cli.block_size.is_some())
        .percentage(cli.percentage)
        .seed(cli.seed)
        .skip_header(cli.skip_header)
        .report_ranges(cli.report_ranges)
        .training(engine.is_dumping())
        .build()
        .map_err(ClassifyError::from)?;
    debug!(?config, ngram = %mode, "driver configured");

    let mut driver = Driver::new(config, &mut engine, Reporter::stdio(cli.report_ranges))?;
    for path in &cli.paths {
        let input = InputPath::parse(path);
        driver
            .process(&input)
            .wrap_err_with(|| format!("Classification of {input} failed"))?;
    }
    driver.finish()?;
    drop(driver);

    engine.stop_dumping()?;
    Ok(())
}
