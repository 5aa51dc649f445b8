use directory_core::{FilterKind, Msg, SortKey};

pub const HELP: &str = "\
commands:
  search <text>            filter by name or email (empty clears)
  sort first|last|email    choose the sort field
  filter all|gmail|a       all users, gmail users, names starting with A
  more                     show more rows, fetching a page if needed
  next                     fetch the next server page
  reload                   start over from page 1
  help                     show this text
  quit                     leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Msg),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),
    #[error("{command} expects one of: {expected}")]
    BadArgument {
        command: &'static str,
        expected: &'static str,
    },
}

/// Parses one line of terminal input. A blank line just redraws.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let msg = match word.to_ascii_lowercase().as_str() {
        "" => Msg::NoOp,
        "search" | "/" => Msg::SearchChanged(rest.to_string()),
        "sort" => Msg::SortChanged(parse_sort_key(rest)?),
        "filter" => Msg::FilterChanged(parse_filter_kind(rest)?),
        "more" | "m" => Msg::MoreRequested,
        "next" | "n" => Msg::LoadNextRequested,
        "reload" | "r" => Msg::ReloadRequested,
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" | "q" => return Ok(Command::Quit),
        _ => return Err(CommandError::Unknown(word.to_string())),
    };
    Ok(Command::Dispatch(msg))
}

fn parse_sort_key(arg: &str) -> Result<SortKey, CommandError> {
    match arg.to_ascii_lowercase().as_str() {
        "first" | "first_name" => Ok(SortKey::FirstName),
        "last" | "last_name" => Ok(SortKey::LastName),
        "email" => Ok(SortKey::Email),
        _ => Err(CommandError::BadArgument {
            command: "sort",
            expected: "first, last, email",
        }),
    }
}

fn parse_filter_kind(arg: &str) -> Result<FilterKind, CommandError> {
    match arg.to_ascii_lowercase().as_str() {
        "all" => Ok(FilterKind::All),
        "gmail" => Ok(FilterKind::GmailOnly),
        "a" | "first_letter_a" => Ok(FilterKind::FirstLetterA),
        _ => Err(CommandError::BadArgument {
            command: "filter",
            expected: "all, gmail, a",
        }),
    }
}
