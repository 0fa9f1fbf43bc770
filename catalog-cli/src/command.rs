use crate::render::render_product;
use catalog_engine::{CatalogEngine, Sort};
use catalog_types::ProductId;
use std::str::FromStr;
use thiserror::Error;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `filter <category>` or `filter all`.
    Filter(Option<String>),
    Sort(Sort),
    /// `search <term>`; a bare `search` clears the term.
    Search(String),
    Next,
    Prev,
    Page(u32),
    Refresh,
    Clear,
    Show(ProductId),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command `{0}`, try `help`")]
    Unknown(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word {
            "filter" => match rest {
                "" => return Err(CommandError::MissingArgument("filter")),
                "all" => Command::Filter(None),
                category => Command::Filter(Some(category.to_string())),
            },
            "sort" => Command::Sort(
                rest.parse()
                    .map_err(|e: catalog_engine::EngineError| {
                        CommandError::InvalidArgument(e.to_string())
                    })?,
            ),
            "search" => Command::Search(rest.to_string()),
            "next" | "n" => Command::Next,
            "prev" | "p" => Command::Prev,
            "page" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument("page"));
                }
                Command::Page(rest.parse().map_err(|_| {
                    CommandError::InvalidArgument(format!("`{rest}` is not a page number"))
                })?)
            }
            "refresh" => Command::Refresh,
            "clear" => Command::Clear,
            "show" => Command::Show(
                ProductId::new(rest).map_err(|_| CommandError::MissingArgument("show"))?,
            ),
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

const HELP: &str = "\
commands:
  filter <category>|all   narrow to one category
  sort name|name-desc|price-asc|price-desc
  search [term]           filter the current page by name or description
  next | prev | page <n>  navigate
  refresh                 reload, re-counting products
  clear                   reset filter, sort and search
  show <id>               product details
  quit";

/// Applies a command to the engine. Returns a message for the user, if any;
/// state changes are reported through the engine's subscription instead.
pub async fn execute(engine: &CatalogEngine, command: Command) -> anyhow::Result<Option<String>> {
    let message = match command {
        Command::Filter(category) => {
            engine.set_filter(category).await;
            None
        }
        Command::Sort(sort) => {
            engine.set_sort(sort).await;
            None
        }
        Command::Search(term) => {
            engine.set_search_term(term);
            None
        }
        Command::Next => {
            (!engine.go_to_next_page().await).then(|| "already on the last page".to_string())
        }
        Command::Prev => {
            (!engine.go_to_previous_page().await).then(|| "already on the first page".to_string())
        }
        Command::Page(page) => {
            (!engine.go_to_page(page).await).then(|| format!("page {page} is out of range"))
        }
        Command::Refresh => {
            engine.refresh().await;
            None
        }
        Command::Clear => {
            engine.clear_all().await;
            None
        }
        Command::Show(id) => Some(match engine.product(&id).await? {
            Some(product) => render_product(&product),
            None => format!("no product with id {id}"),
        }),
        Command::Help => Some(HELP.to_string()),
        Command::Quit => None,
    };
    Ok(message)
}
