use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "favz")]
#[command(about = "Keep a list of favorite books", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a book to favorites
    #[command(alias = "a")]
    Add {
        title: String,
        author: String,

        /// Why the book was recommended
        #[arg(short, long)]
        reason: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(short, long)]
        subcategory: Option<String>,
    },

    /// Remove one or more favorites
    #[command(alias = "rm")]
    Remove {
        /// Indexes from `favz list` or favorite ids (e.g. 1 3 VC1B)
        #[arg(required = true, num_args = 1..)]
        selectors: Vec<String>,
    },

    /// List favorites, newest first
    #[command(alias = "ls")]
    List {
        #[arg(long)]
        json: bool,
    },

    /// List favorites grouped by category
    #[command(alias = "g")]
    Grouped {
        #[arg(long)]
        json: bool,
    },

    /// Check whether a book is a favorite
    Check {
        title: String,
        author: String,

        #[arg(long)]
        json: bool,
    },

    /// Print the id a book would be stored under
    Id { title: String, author: String },

    /// Import books from JSON files
    Import {
        #[arg(required = true, num_args = 1..)]
        paths: Vec<std::path::PathBuf>,
    },

    /// Reload favorites, repairing corrupt data, and report what was found
    Doctor {
        #[arg(long)]
        json: bool,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (storage-key, quota-bytes, other-label)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}
