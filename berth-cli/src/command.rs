use berth_core::date::{self, DateError};
use berth_core::FieldId;
use chrono::NaiveDate;

/// One line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Field(FieldId, String),
    Select(Vec<NaiveDate>),
    Submit,
    Held,
    Reload,
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Empty input")]
    Empty,
    #[error("Unknown command: {0}")]
    Unknown(String),
    #[error(transparent)]
    Date(#[from] DateError),
}

pub const HELP: &str = "\
commands:
  name <text>            set the name field
  boat <text>            set the boat field
  email <text>           set the email field
  select <date>...       toggle dates (YYYY-MM-DD); no dates clears the selection
  held                   list dates already booked
  submit                 send the booking
  reload                 retry fetching availability
  help                   show this text
  quit";

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    match verb {
        "" => Err(CommandError::Empty),
        "name" => Ok(Command::Field(FieldId::Name, rest.to_string())),
        "boat" => Ok(Command::Field(FieldId::Boat, rest.to_string())),
        "email" => Ok(Command::Field(FieldId::Email, rest.to_string())),
        "select" => {
            let dates = rest
                .split_whitespace()
                .map(date::parse)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Command::Select(dates))
        }
        "submit" => Ok(Command::Submit),
        "held" => Ok(Command::Held),
        "reload" => Ok(Command::Reload),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}
