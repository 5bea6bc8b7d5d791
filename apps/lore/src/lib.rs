use std::{
	io::{self, BufRead, Write},
	path::PathBuf,
};

use clap::{Parser, Subcommand};
use color_eyre::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use lore_service::LoreService;

#[derive(Debug, Parser)]
#[command(
	version = lore_cli::VERSION,
	rename_all = "kebab",
	styles = lore_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Normalize chat exports and documents into knowledge items.
	Ingest,
	/// Embed the ingested items and rebuild the semantic index.
	Index,
	/// Answer a single question and exit.
	Ask {
		question: String,
		/// Print the full response, evidence included, as JSON.
		#[arg(long)]
		json: bool,
	},
	/// Interactive question loop.
	Repl,
}

pub async fn run(args: Args) -> Result<()> {
	let config = lore_config::load(&args.config)?;
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	let service = LoreService::new(config)?;

	match args.command {
		Command::Ingest => {
			let report = service.ingest().await?;

			println!(
				"Ingested {} messages into {} threads and {} documents ({} skipped).",
				report.messages, report.threads, report.documents, report.skipped_documents
			);
		},
		Command::Index => {
			let report = service.build_index().await?;

			println!("Indexed {} items in {} batches.", report.items, report.batches);
		},
		Command::Ask { question, json } => {
			let response = service.ask(&question).await?;

			if json {
				println!("{}", serde_json::to_string_pretty(&response)?);
			} else {
				println!("{}", response.answer);
			}
		},
		Command::Repl => repl(&service).await?,
	}

	Ok(())
}

/// One question per line; `quit` exits. A failed question is reported and
/// the loop keeps going.
async fn repl(service: &LoreService) -> Result<()> {
	println!("Customer Success Knowledge Base Search");
	println!("=====================================");
	println!("Type 'quit' to exit");
	println!();

	let stdin = io::stdin();
	let mut lines = stdin.lock().lines();

	loop {
		print!("What would you like to know? ");
		io::stdout().flush()?;

		let Some(line) = lines.next() else {
			break;
		};
		let question = line?;

		if question.trim().eq_ignore_ascii_case("quit") {
			break;
		}
		if question.trim().is_empty() {
			continue;
		}

		match service.ask(&question).await {
			Ok(response) => {
				println!("\nResponse:");
				println!("---------");
				println!("{}\n", response.answer);
			},
			Err(err) => {
				error!("Question failed: {err}");
				println!("Error: {err}\n");
			},
		}
	}

	Ok(())
}
