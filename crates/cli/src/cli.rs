//! Argument definitions for the `bookshelf` binary.

use bookshelf_client::{BookId, Column, SortDirection, SortSpec};
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "bookshelf",
    version,
    about = "Bookshelf catalog: run the API server or manage books against it"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// API root used by the `books` commands (overrides `client.api_base_url`).
    #[arg(long = "api-url", value_name = "URL", env = "BOOKSHELF_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Log output format (overrides `telemetry.log_format`).
    #[arg(long = "log-format", value_enum, global = true)]
    pub log_format: Option<LogFormatArg>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API until interrupted.
    Serve,

    /// Print the merged OpenAPI document.
    Openapi,

    /// List the genres offered by the book form.
    Genres,

    /// Manage books on a running server.
    Books {
        #[command(subcommand)]
        command: BooksCommand,
    },
}

#[derive(Subcommand)]
pub enum BooksCommand {
    /// Show one page of the catalog table.
    List(ListArgs),

    /// Show a single book.
    Show {
        #[arg(value_name = "ID")]
        id: BookId,
    },

    /// Add a book.
    Create(CreateArgs),

    /// Overwrite every field of a book.
    Replace {
        #[arg(value_name = "ID")]
        id: BookId,

        #[command(flatten)]
        fields: CreateArgs,
    },

    /// Change some fields of a book; omitted fields keep their values.
    Edit {
        #[arg(value_name = "ID")]
        id: BookId,

        #[command(flatten)]
        fields: EditArgs,
    },

    /// Delete a book.
    Delete {
        #[arg(value_name = "ID")]
        id: BookId,

        /// Skip the confirmation prompt.
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Args)]
pub struct ListArgs {
    /// Case-insensitive text matched against every column.
    #[arg(long)]
    pub filter: Option<String>,

    /// Sort column, optionally with a direction: `title`, `title:desc`.
    #[arg(long, value_parser = parse_sort)]
    pub sort: Option<SortSpec>,

    /// One-based page number.
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page (defaults to `client.page_size`).
    #[arg(long = "page-size")]
    pub page_size: Option<usize>,
}

#[derive(Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub author: String,

    #[arg(long)]
    pub genre: String,

    #[arg(long)]
    pub description: String,

    /// Publication date, `YYYY-MM-DD`.
    #[arg(long = "published-date")]
    pub published_date: String,
}

#[derive(Args)]
pub struct EditArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub author: Option<String>,

    #[arg(long)]
    pub genre: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Publication date, `YYYY-MM-DD`.
    #[arg(long = "published-date")]
    pub published_date: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Json,
}

fn parse_sort(raw: &str) -> Result<SortSpec, String> {
    let (name, direction) = match raw.split_once(':') {
        Some((name, direction)) => (name, Some(direction)),
        None => (raw, None),
    };

    let column = match name.to_ascii_lowercase().as_str() {
        "id" => Column::Id,
        "title" => Column::Title,
        "author" => Column::Author,
        "genre" => Column::Genre,
        "description" => Column::Description,
        "published-date" | "publisheddate" | "published_date" => Column::PublishedDate,
        other => return Err(format!("unknown sort column '{other}'")),
    };

    let direction = match direction.map(str::to_ascii_lowercase).as_deref() {
        None => column.first_direction(),
        Some("asc") => SortDirection::Asc,
        Some("desc") => SortDirection::Desc,
        Some(other) => return Err(format!("unknown sort direction '{other}'; use asc or desc")),
    };

    Ok(SortSpec { column, direction })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_defaults_to_the_column_first_direction() {
        let spec = parse_sort("id").unwrap();
        assert_eq!(spec.direction, SortDirection::Desc);

        let spec = parse_sort("Title").unwrap();
        assert_eq!(spec.column, Column::Title);
        assert_eq!(spec.direction, SortDirection::Asc);
    }

    #[test]
    fn sort_accepts_explicit_direction() {
        let spec = parse_sort("publishedDate:desc").unwrap();
        assert_eq!(spec.column, Column::PublishedDate);
        assert_eq!(spec.direction, SortDirection::Desc);
    }

    #[test]
    fn action_and_unknown_columns_are_rejected() {
        assert!(parse_sort("action").is_err());
        assert!(parse_sort("title:sideways").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
