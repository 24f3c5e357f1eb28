mod board;
mod documents;
mod feed;
mod models;
mod offers;
mod theme;
mod tui;

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "pursuit")]
#[command(about = "Job application pipeline - browse offers, apply on a kanban board, generate documents")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the kanban board
    Board {
        /// Seed for offer ordering and feed timing (deterministic runs)
        #[arg(long)]
        seed: Option<u64>,

        /// Simulated document-generation delay in seconds (default 3)
        #[arg(long)]
        delay: Option<u64>,
    },

    /// List the bundled job offers
    Offers,

    /// Print generated documents for an offer
    Generate {
        /// Offer number from the `offers` listing
        number: usize,

        /// Print only the resume
        #[arg(long)]
        resume_only: bool,

        /// Print only the cover letter
        #[arg(long, conflicts_with = "resume_only")]
        cover_only: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Board {
        seed: None,
        delay: None,
    }) {
        Commands::Board { seed, delay } => {
            let delay = delay
                .map(Duration::from_secs)
                .unwrap_or(documents::GENERATION_DELAY);
            tui::run_board(seed, delay)?;
        }

        Commands::Offers => {
            let all = offers::load_offers()?;
            println!(
                "{:<4} {:<12} {:<28} {:<12} {:>10} {:>8}",
                "#", "COMPANY", "POSITION", "POSTED", "RECRUITERS", "HMS"
            );
            println!("{}", "-".repeat(80));
            for (i, offer) in all.iter().enumerate() {
                println!(
                    "{:<4} {:<12} {:<28} {:<12} {:>10} {:>8}",
                    i + 1,
                    truncate(&offer.company, 12),
                    truncate(&offer.position, 28),
                    offer.posted_date.to_string(),
                    offer.recruiters.len(),
                    offer.hiring_managers.len()
                );
            }
        }

        Commands::Generate {
            number,
            resume_only,
            cover_only,
        } => {
            let all = offers::load_offers()?;
            let offer = number
                .checked_sub(1)
                .and_then(|i| all.get(i))
                .ok_or_else(|| {
                    anyhow!(
                        "No offer #{}. Run `pursuit offers` to list them.",
                        number
                    )
                })?;

            if !cover_only {
                println!("{}", documents::generate_resume(offer));
            }
            if !resume_only && !cover_only {
                println!("\n{}\n", "=".repeat(60));
            }
            if !resume_only {
                println!("{}", documents::generate_cover_letter(offer));
            }
        }
    }

    Ok(())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
