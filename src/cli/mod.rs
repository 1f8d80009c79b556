pub mod analytics;
pub mod categories;
pub mod demo;
pub mod init;
pub mod tx;
pub mod users;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tally", about = "Personal finance tracking and analytics CLI.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up tally: choose a data directory and initialize the database.
    Init {
        /// Path for tally data (default: ~/.local/share/tally)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Manage users.
    Users {
        #[command(subcommand)]
        command: UsersCommands,
    },
    /// Manage categories.
    Categories {
        #[command(subcommand)]
        command: CategoriesCommands,
    },
    /// Record and list transactions.
    Tx {
        #[command(subcommand)]
        command: TxCommands,
    },
    /// Income, expenses and balance for a period.
    Summary {
        /// User name
        #[arg(long)]
        user: String,
        /// Start date: YYYY-MM-DD (default: all time)
        #[arg(long)]
        from: Option<String>,
        /// End date: YYYY-MM-DD (default: present)
        #[arg(long)]
        to: Option<String>,
        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Per-category totals and shares for one transaction kind.
    Breakdown {
        /// User name
        #[arg(long)]
        user: String,
        /// Transaction kind: income or expense
        #[arg(long, default_value = "expense")]
        kind: String,
        /// Start date: YYYY-MM-DD (default: all time)
        #[arg(long)]
        from: Option<String>,
        /// End date: YYYY-MM-DD (default: present)
        #[arg(long)]
        to: Option<String>,
        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Month-by-month income, expense and balance.
    Trends {
        /// User name
        #[arg(long)]
        user: String,
        /// Trailing window in calendar months
        #[arg(long, default_value_t = 6)]
        months: u32,
        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Categories whose current-month spending is unusually high.
    Anomalies {
        /// User name
        #[arg(long)]
        user: String,
        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Narrative summary of the current month.
    Insights {
        /// User name
        #[arg(long)]
        user: String,
        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load sample data (user, transactions) to explore tally.
    Demo,
}

#[derive(Subcommand)]
pub enum UsersCommands {
    /// Add a new user.
    Add {
        /// User name (must be unique)
        name: String,
    },
    /// List users.
    List,
}

#[derive(Subcommand)]
pub enum CategoriesCommands {
    /// Add a category, shared by default or owned by a user.
    Add {
        /// Category name
        name: String,
        /// Category kind: income, expense or both
        #[arg(long)]
        kind: String,
        /// Owning user (omit for a shared category)
        #[arg(long)]
        user: Option<String>,
    },
    /// List shared categories plus a user's own.
    List {
        /// User name (omit to list only shared categories)
        #[arg(long)]
        user: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum TxCommands {
    /// Record a transaction.
    Add {
        /// User name
        #[arg(long)]
        user: String,
        /// Short description
        #[arg(long)]
        title: String,
        /// Positive amount in dollars
        #[arg(long)]
        amount: f64,
        /// Transaction kind: income or expense
        #[arg(long)]
        kind: String,
        /// Category name
        #[arg(long)]
        category: String,
        /// Date: YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// List a user's transactions.
    List {
        /// User name
        #[arg(long)]
        user: String,
        /// Start date: YYYY-MM-DD
        #[arg(long)]
        from: Option<String>,
        /// End date: YYYY-MM-DD
        #[arg(long)]
        to: Option<String>,
    },
}
