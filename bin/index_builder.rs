use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "index_builder")]
#[command(about = "Build a shingle index directory from a JSON-lines corpus", long_about = None)]
struct Args {
    /// Path to the corpus JSONL file
    corpus_jsonl: PathBuf,

    /// Output directory (created if absent)
    out_dir: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    match plagdex::index::build_index(&args.corpus_jsonl, &args.out_dir) {
        Ok(summary) => {
            println!(
                "[index_builder] ok docs={} post9={} skipped_bad_json={} skipped_bad_doc={} out_dir={}",
                summary.docs,
                summary.postings,
                summary.skipped_bad_json,
                summary.skipped_bad_doc,
                args.out_dir.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("[index_builder] failed: {e}");
            ExitCode::FAILURE
        }
    }
}
