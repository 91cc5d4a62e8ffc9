//! # chattopics CLI
//!
//! Command-line interface for the chattopics library.

use std::fs;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use chattopics::ChatTopicsError;
use chattopics::cli::Args;
use chattopics::core::output::write_trend_csv;
use chattopics::core::{
    EmojiTable, ReferenceData, TopicPipeline, format_parse_summary, format_top_contributors,
    format_top_words,
};
use chattopics::format::{OutputFormat, write_to_format};
use chattopics::parser::TranscriptParser;

fn main() {
    let args = <Args as ClapParser>::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_directive())),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&args) {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), ChatTopicsError> {
    let total_start = Instant::now();
    let format: OutputFormat = args.format.into();

    println!("🧵 chattopics v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Input:   {}", args.input.display());
    println!("💾 Output:  {}", args.output.display());
    println!("📄 Format:  {}", format);
    println!("🎯 Topics:  {} (seed {})", args.topics, args.seed);
    println!();

    let mut reference = ReferenceData::english();
    if let Some(path) = &args.emoji_table {
        let table = EmojiTable::from_json_str(&fs::read_to_string(path)?)?;
        println!("😀 Emoji table: {} entries from {}", table.len(), path.display());
        reference = reference.with_emoji(table);
    }

    println!("⏳ Parsing transcript...");
    let parse_start = Instant::now();
    let corpus = TranscriptParser::new().parse(&args.input)?;
    println!(
        "   Found {} records ({:.2}s)",
        corpus.len(),
        parse_start.elapsed().as_secs_f64()
    );
    print_indented(&format_parse_summary(&corpus.summary()));

    println!("🧠 Fitting topic model...");
    let fit_start = Instant::now();
    let analysis = TopicPipeline::new(args.pipeline_config(), reference).run(&corpus)?;
    println!(
        "   {} terms, {} iterations ({:.2}s)",
        analysis.vocabulary.len(),
        analysis.model.iterations(),
        fit_start.elapsed().as_secs_f64()
    );
    if let Some(warning) = analysis.model.convergence_warning() {
        println!("⚠️  {}", warning);
    }

    println!();
    println!("📚 Top words:");
    print_indented(&format_top_words(&analysis.top_words));

    println!();
    println!("👥 Top contributors:");
    print_indented(&format_top_contributors(&analysis.contributors));

    println!();
    println!("💾 Writing {}...", format);
    write_to_format(&analysis.corpus, &args.output, format)?;

    if let Some(path) = &args.trend {
        write_trend_csv(&analysis.trend, path)?;
        println!("📈 Trend table saved to {}", path.display());
        if analysis.trend.skipped_null_timestamps() > 0 {
            println!(
                "   ({} messages without a timestamp left out)",
                analysis.trend.skipped_null_timestamps()
            );
        }
    }

    if let Some(path) = &args.graph {
        fs::write(path, analysis.interactions.to_dot())?;
        println!("🕸️  Sender network saved to {}", path.display());
    }

    println!();
    println!("✅ Done! Output saved to {}", args.output.display());
    println!(
        "⚡ Total time: {:.2}s",
        total_start.elapsed().as_secs_f64()
    );

    Ok(())
}

fn print_indented(block: &str) {
    for line in block.lines() {
        println!("   {line}");
    }
}
