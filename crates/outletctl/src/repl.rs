//! REPL - conversational interface to the outlet directory
//!
//! Each line is either a slash command or a question forwarded to outletd.
//! The conversation log and the outlet cache live for the whole session and
//! are dropped when it ends.

use anyhow::Result;
use outlet_common::Conversation;
use owo_colors::OwoColorize;
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::cache::OutletCache;
use crate::chat::chat_turn;
use crate::client::CatalogApi;
use crate::config::MapConfig;
use crate::display;
use crate::map;

/// What a REPL line asks for
#[derive(Debug, PartialEq, Eq)]
pub enum Input<'a> {
    Exit,
    Refresh,
    Map,
    Overlaps,
    History,
    Question(&'a str),
    Empty,
}

pub fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    match line.to_lowercase().as_str() {
        "" => Input::Empty,
        "exit" | "quit" | "/exit" | "/quit" => Input::Exit,
        "/refresh" => Input::Refresh,
        "/map" => Input::Map,
        "/overlaps" => Input::Overlaps,
        "/history" => Input::History,
        _ => Input::Question(line),
    }
}

/// Session state: conversation log plus cached outlets
pub struct Session<'a> {
    api: &'a dyn CatalogApi,
    map_config: &'a MapConfig,
    pub conversation: Conversation,
    pub cache: OutletCache,
}

impl<'a> Session<'a> {
    pub fn new(api: &'a dyn CatalogApi, map_config: &'a MapConfig) -> Self {
        Self {
            api,
            map_config,
            conversation: Conversation::new(),
            cache: OutletCache::new(),
        }
    }

    /// Handle one line; returns false when the session should end
    pub async fn handle(&mut self, line: &str) -> bool {
        match parse_input(line) {
            Input::Empty => {}
            Input::Exit => return false,
            Input::Question(question) => {
                let reply = chat_turn(&mut self.conversation, self.api, question).await;
                display::print_reply(&reply);
            }
            Input::History => display::print_history(&self.conversation),
            Input::Refresh => {
                self.cache.invalidate();
                match self.cache.get(self.api).await {
                    Ok(outlets) => println!("Reloaded {} outlets.", outlets.len()),
                    Err(e) => println!("{} {}", "Error fetching outlet data:".red(), e),
                }
            }
            Input::Overlaps => match self.cache.get(self.api).await {
                Ok(outlets) => display::print_overlaps(outlets),
                Err(e) => println!("{} {}", "Error fetching outlet data:".red(), e),
            },
            Input::Map => {
                let path = self.map_config.output.clone();
                match self.write_map(Path::new(&path)).await {
                    Ok(()) => println!("Map written to {}", path),
                    Err(e) => println!("{} {}", "Map not written:".red(), e),
                }
            }
        }
        true
    }

    async fn write_map(&mut self, path: &Path) -> Result<()> {
        let outlets = self.cache.get(self.api).await?;
        let layers = map::build_layers(outlets, self.map_config.zoom);
        std::fs::write(path, map::render_html(&layers, self.map_config)?)?;
        Ok(())
    }
}

/// Main REPL loop over stdin
pub async fn run_repl(api: &dyn CatalogApi, map_config: &MapConfig) -> Result<()> {
    let mut session = Session::new(api, map_config);
    display::print_welcome();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{} ", "you>".blue().bold());
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                eprintln!("Error reading input: {}", e);
                continue;
            }
            None => break, // EOF
        };

        if !session.handle(&line).await {
            break;
        }
    }

    println!("Goodbye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeCatalog;
    use outlet_common::Outlet;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("  "), Input::Empty);
        assert_eq!(parse_input("QUIT"), Input::Exit);
        assert_eq!(parse_input("/refresh"), Input::Refresh);
        assert_eq!(
            parse_input(" Which outlets are in Cheras? "),
            Input::Question("Which outlets are in Cheras?")
        );
    }

    #[tokio::test]
    async fn test_session_questions_and_refresh() {
        let api = FakeCatalog::with_outlets(vec![Outlet::at("Subway KLCC", "Suria KLCC", 3.158, 101.712)])
            .with_answers(vec![Ok("It is in Suria KLCC.".to_string())]);
        let map_config = MapConfig::default();
        let mut session = Session::new(&api, &map_config);

        assert!(session.handle("Where is KLCC?").await);
        assert_eq!(session.conversation.len(), 2);

        assert!(session.handle("/overlaps").await);
        assert!(session.handle("/overlaps").await);
        assert_eq!(api.fetch_count(), 1);

        assert!(session.handle("/refresh").await);
        assert_eq!(api.fetch_count(), 2);

        assert!(!session.handle("exit").await);
        assert_eq!(api.questions(), vec!["Where is KLCC?"]);
    }

    #[tokio::test]
    async fn test_session_survives_unreachable_server() {
        let api = FakeCatalog::unreachable();
        let map_config = MapConfig::default();
        let mut session = Session::new(&api, &map_config);

        assert!(session.handle("Anyone there?").await);
        assert!(session.handle("/overlaps").await);
        assert!(session.conversation.last().unwrap().content.starts_with("API connection error"));
    }

    #[tokio::test]
    async fn test_map_command_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let api = FakeCatalog::with_outlets(vec![Outlet::at("Subway KLCC", "Suria KLCC", 3.158, 101.712)]);
        let map_config = MapConfig {
            output: dir.path().join("map.html").display().to_string(),
            ..MapConfig::default()
        };
        let mut session = Session::new(&api, &map_config);

        assert!(session.handle("/map").await);
        let html = std::fs::read_to_string(dir.path().join("map.html")).unwrap();
        assert!(html.contains("Subway KLCC"));
    }
}
