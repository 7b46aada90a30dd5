//! Interactive mode: each typed line stands in for an edit of the address box.

use std::sync::Arc;

use storefinder_core::{AppConfig, LatLng};
use storefinder_locator::{Controller, ControllerSettings, Geocoder, MapView, RouteService};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::commands::OsmLocator;
use crate::terminal::TerminalView;

const HELP: &str = "\
Type an address to see suggestions.
  :search [ADDRESS]  search the typed (or given) address
  :pick N            search suggestion N
  :dismiss           close the suggestion list
  :help              show this help
  :quit              exit";

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Command {
    /// The address box now holds this text.
    Input(String),
    Search(Option<String>),
    /// 1-based, as printed.
    Pick(usize),
    Dismiss,
    Help,
    Quit,
    Invalid(String),
}

pub(crate) fn parse_line(line: &str) -> Command {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix(':') else {
        return Command::Input(line.trim_end_matches(['\r', '\n']).to_owned());
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    match name {
        "search" | "s" => Command::Search((!arg.is_empty()).then(|| arg.to_owned())),
        "pick" | "p" => match arg.parse::<usize>() {
            Ok(n) if n >= 1 => Command::Pick(n),
            _ => Command::Invalid(format!("expected a suggestion number, got '{arg}'")),
        },
        "dismiss" | "d" => Command::Dismiss,
        "help" | "h" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => Command::Invalid(format!("unknown command ':{other}'")),
    }
}

/// The address box as the prompt sees it, plus the controller it drives.
struct Prompt<G, R, V> {
    controller: Controller<G, R, V>,
    /// Text a bare `:search` uses: the last typed line or picked suggestion.
    current: String,
}

impl<G, R, V> Prompt<G, R, V>
where
    G: Geocoder + 'static,
    R: RouteService + 'static,
    V: MapView + 'static,
{
    fn new(controller: Controller<G, R, V>) -> Self {
        Self {
            controller,
            current: String::new(),
        }
    }

    /// Applies one command. Returns `false` once the user asked to quit.
    async fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Input(text) => {
                self.controller.on_input(&text).await;
                self.current = text;
            }
            Command::Search(text) => {
                if let Some(text) = text {
                    self.current = text;
                }
                self.controller.search(&self.current).await;
            }
            Command::Pick(n) => match self.controller.pick_suggestion(n - 1).await {
                Some(label) => self.current = label,
                None => println!("no suggestion {n}"),
            },
            Command::Dismiss => self.controller.dismiss_suggestions().await,
            Command::Help => println!("{HELP}"),
            Command::Quit => return false,
            Command::Invalid(message) => println!("{message}"),
        }
        true
    }
}

/// Runs until `:quit` or end of input.
///
/// # Errors
///
/// Returns an error if stdin cannot be read.
pub(crate) async fn run(
    locator: OsmLocator,
    config: &AppConfig,
    near: Option<LatLng>,
) -> anyhow::Result<()> {
    let controller = Controller::new(
        Arc::new(locator),
        TerminalView::stdout(),
        &ControllerSettings::from_app_config(config),
    );
    controller.mount().await;
    controller.locate_user(&near).await;
    println!("{HELP}");

    let mut prompt = Prompt::new(controller);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if !prompt.handle(parse_line(&line)).await {
            break;
        }
    }

    tracing::debug!("interactive session ended");
    Ok(())
}
