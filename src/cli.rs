use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "seat-race analysis and athlete rating backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the backend server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Rebuild a team's ratings by replaying its full session history
    Recalculate {
        /// Team whose ratings to rebuild
        #[arg(short, long)]
        team_id: i64,
        /// Rating series: combined, combined_port, combined_starboard, combined_cox
        #[arg(short, long, default_value = "combined")]
        rating_type: String,
    },
    /// Print a team's current rankings
    Rankings {
        /// Team to rank
        #[arg(short, long)]
        team_id: i64,
        /// Rating series: combined, combined_port, combined_starboard, combined_cox
        #[arg(short, long, default_value = "combined")]
        rating_type: String,
        /// Hide athletes with fewer races than this
        #[arg(short, long, default_value_t = 0)]
        min_races: i64,
    },
}
