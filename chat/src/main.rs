use anyhow::Result;
use clap::Parser;
use phrasebook_chat::Responder;
use phrasebook_core::Dataset;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "phrasebook-chat")]
#[command(about = "Norwegian phrasebook chat over an in-memory search index", long_about = None)]
struct Args {
    /// Dataset JSON path; the builtin dataset is used when omitted
    #[arg(long)]
    dataset: Option<PathBuf>,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let dataset = match args.dataset {
        Some(path) => Dataset::load(path)?,
        None => Dataset::builtin(),
    };
    let responder = Responder::new(dataset);
    let stats = responder.engine().stats();
    tracing::info!(records = stats.num_records, terms = stats.num_terms, "engine ready");

    println!("Hei! Спросите перевод или напишите слово (exit для выхода).");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if matches!(message, "exit" | "quit" | "выход") {
            break;
        }
        println!("{}", responder.respond(message));
    }
    Ok(())
}
