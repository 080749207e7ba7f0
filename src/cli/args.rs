//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::domain::EntryId;

/// Assemble printable medication handouts: pick medications, attach directions, render and print
#[derive(Parser, Debug)]
#[command(name = "medhandout")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Project directory holding data/medications.json (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse the medication catalog
    Meds {
        #[command(subcommand)]
        command: MedsCommands,
    },

    /// Add a medication to the treatment plan
    Add {
        /// Medication name or alias (interactive picker if omitted)
        #[arg(short, long)]
        med: Option<String>,
        /// Directions, e.g. "Take 1 tablet twice daily"
        #[arg(short, long, default_value = "")]
        directions: String,
        /// Instructions, e.g. "Take with food"
        #[arg(short, long, default_value = "")]
        instructions: String,
        /// Free-text notes
        #[arg(short, long, default_value = "")]
        notes: String,
    },

    /// Remove an entry from the treatment plan
    Remove {
        /// Entry id (see `list`)
        id: EntryId,
    },

    /// Empty the treatment plan and erase the saved draft
    Clear,

    /// Show the treatment plan as a tree
    List,

    /// Render the plan as HTML
    Show {
        /// Render the compact summary list instead of the handout
        #[arg(long)]
        summary: bool,
    },

    /// Produce the printable handout
    Print {
        /// Write the document to this file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
        /// Print without asking when the plan is empty
        #[arg(short, long)]
        yes: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Show status
    Info,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum MedsCommands {
    /// List catalog medications
    List,

    /// Resolve a name or alias to a medication
    Find {
        /// Name or alias, matched exactly ignoring case
        text: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
