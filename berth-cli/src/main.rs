mod command;
mod terminal;

use anyhow::Context;
use berth_client::{AppConfig, HttpBookingApi};
use berth_core::{date, BookingWorkflow, SubmitOutcome, WorkflowError};
use command::{Command, HELP};
use std::io::Write;
use std::sync::Arc;
use terminal::{TerminalPicker, TerminalView};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type Session = BookingWorkflow<TerminalView, TerminalPicker>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "berth=info,berth_core=info,berth_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::load().context("Failed to load config")?;
    tracing::info!(api = %config.api.base_url, "Starting booking session");

    let api = Arc::new(HttpBookingApi::new(&config.api));
    let mut session: Session = BookingWorkflow::new(
        config.booking,
        config.messages,
        api,
        TerminalView::new(),
        TerminalPicker::new(),
    )
    .context("Invalid booking configuration")?;

    session.load().await?;
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}", session.view().prompt());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match command::parse(&line) {
            Ok(command) => command,
            Err(command::CommandError::Empty) => continue,
            Err(err) => {
                println!("{}", err);
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }
        if let Err(err) = dispatch(&mut session, command).await {
            println!("{}", err);
        }
    }

    Ok(())
}

async fn dispatch(session: &mut Session, command: Command) -> Result<(), WorkflowError> {
    match command {
        Command::Field(field, content) => session.field_changed(field, &content)?,
        Command::Select(clicked) => {
            if session.picker().config().is_none() {
                println!("calendar is not available yet");
                return Ok(());
            }
            let selection = if clicked.is_empty() {
                session.picker_mut().clear();
                Vec::new()
            } else {
                let styled: Vec<_> =
                    clicked.into_iter().map(|d| (d, session.date_style(d))).collect();
                let (selection, rejected) = session.picker_mut().pick(styled);
                for (date, reason) in rejected {
                    println!("skipped {}: {:?}", date::to_display(date), reason);
                }
                selection
            };
            session.select_dates(selection)?;
        }
        Command::Submit => {
            if let SubmitOutcome::Conflict { .. } = session.submit().await? {
                let shown: Vec<String> = session
                    .picker()
                    .selection()
                    .iter()
                    .map(|d| date::to_display(*d))
                    .collect();
                println!("calendar now shows: {}", shown.join(", "));
            }
        }
        Command::Held => {
            for key in session.availability().held_keys() {
                let holder = session.availability().holder(key.date()).unwrap_or_default();
                println!("  {} {}", key, holder);
            }
        }
        Command::Reload => session.load().await?,
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
    Ok(())
}
