//! DucaPowr - xboard Protocol Module
//!
//! A thin CECP front end: reads commands line by line, drives the `Engine`
//! and writes replies to any `Write` sink.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use log::{debug, error, info, warn};
use rand::seq::SliceRandom;

use crate::engine::{Engine, Reply};
use crate::error::EngineError;
use crate::perft::perft;

pub const ENGINE_NAME: &str = "DucaPowr";

const FEATURES: &str = "feature sigint=0 san=0 name=DucaPowr colors=0 usermove=1 done=1";

/// Commands xboard may send that need no reply from this engine.
const IGNORED: &[&str] = &[
    "accepted", "rejected", "random", "post", "nopost", "hard", "easy", "level", "st", "time",
    "otim", "computer", "name", "rating", "white", "black", "result", "draw",
];

/// Non-empty lines of a quotes file; an unreadable file yields none.
pub fn load_quotes(path: &Path) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(text) => text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
        Err(err) => {
            warn!("cannot read quotes from {}: {}", path.display(), err);
            Vec::new()
        }
    }
}

/// xboard protocol handler
pub struct XBoard<W: Write> {
    engine: Engine,
    output: W,
    quotes: Vec<String>,
    /// In force mode the engine only records moves.
    force: bool,
    quit: bool,
}

impl<W: Write> XBoard<W> {
    pub fn new(engine: Engine, output: W) -> Self {
        let quotes = engine
            .config()
            .quotes_path
            .as_deref()
            .map(load_quotes)
            .unwrap_or_default();
        XBoard {
            engine,
            output,
            quotes,
            force: false,
            quit: false,
        }
    }

    pub fn with_quotes(mut self, quotes: Vec<String>) -> Self {
        self.quotes = quotes;
        self
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Process commands until `quit` or end of input.
    pub fn run<R: BufRead>(&mut self, input: R) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if !line.is_empty() {
                self.process_command(line)?;
            }
            if self.quit {
                break;
            }
        }
        Ok(())
    }

    pub fn process_command(&mut self, line: &str) -> io::Result<()> {
        info!("xboard -> {}", line);

        let (command, args) = match line.split_once(' ') {
            Some((command, args)) => (command, args.trim()),
            None => (line, ""),
        };

        match command {
            "xboard" => {}
            "protover" => self.send(FEATURES)?,
            "new" => {
                self.engine.new_game();
                self.force = false;
            }
            "usermove" => self.cmd_usermove(args)?,
            "go" => {
                self.force = false;
                self.engine_move()?;
            }
            "force" => self.force = true,
            "sd" => self.cmd_sd(args)?,
            "setboard" => self.cmd_setboard(args)?,
            "ping" => self.send(&format!("pong {}", args))?,
            "perft" => self.cmd_perft(args)?,
            "quit" => {
                self.engine.close();
                self.quit = true;
            }
            _ if IGNORED.contains(&command) => debug!("ignoring {}", line),
            _ => {
                warn!("unknown command {:?}", line);
                self.send(&format!("Error (unknown command): {}", command))?;
            }
        }
        Ok(())
    }

    fn send(&mut self, message: &str) -> io::Result<()> {
        info!("xboard <- {}", message);
        writeln!(self.output, "{}", message)?;
        self.output.flush()
    }

    fn cmd_usermove(&mut self, text: &str) -> io::Result<()> {
        match self.engine.user_move(text) {
            Ok(_) => {
                if !self.force {
                    self.engine_move()?;
                }
                Ok(())
            }
            Err(err @ (EngineError::Parse(_) | EngineError::IllegalMove(_))) => {
                warn!("rejected usermove {:?}: {}", text, err);
                self.send(&format!("Illegal move: {}", text))
            }
            Err(err) => self.internal_error(err),
        }
    }

    fn engine_move(&mut self) -> io::Result<()> {
        match self.engine.think() {
            Ok(Reply::Move(mv)) => self.send(&format!("move {}", mv)),
            Ok(Reply::Resign) => {
                let quote = self.quotes.choose(&mut rand::thread_rng()).cloned();
                if let Some(quote) = quote {
                    self.send(&format!("tellopponent {}", quote))?;
                }
                self.force = true;
                self.send("resign")
            }
            Err(err) => self.internal_error(err),
        }
    }

    fn cmd_sd(&mut self, args: &str) -> io::Result<()> {
        match args.parse::<u32>() {
            Ok(depth) => {
                self.engine.set_depth(depth);
                Ok(())
            }
            Err(_) => self.send(&format!("Error (bad depth): sd {}", args)),
        }
    }

    fn cmd_setboard(&mut self, fen: &str) -> io::Result<()> {
        match self.engine.set_position(fen) {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!("rejected setboard {:?}: {}", fen, err);
                self.send("tellusererror Illegal position")
            }
        }
    }

    fn cmd_perft(&mut self, args: &str) -> io::Result<()> {
        let depth = args.parse::<u32>().unwrap_or(1);
        let mut position = self.engine.position().clone();
        match perft(&mut position, depth) {
            Ok(nodes) => self.send(&format!("# perft {} {}", depth, nodes)),
            Err(err) => self.internal_error(err),
        }
    }

    /// Internal failures stop the engine; the protocol loop keeps reading.
    fn internal_error(&mut self, err: EngineError) -> io::Result<()> {
        if err == EngineError::NotRunning {
            return self.send("Error (engine closed): send new");
        }
        error!("internal error: {}", err);
        self.engine.close();
        self.send(&format!("Error (internal): {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn session(commands: &str) -> String {
        let mut config = EngineConfig::default();
        config.set_depth(1);
        let mut xboard = XBoard::new(Engine::new(config), Vec::new());
        xboard.run(commands.as_bytes()).unwrap();
        String::from_utf8(xboard.into_output()).unwrap()
    }

    #[test]
    fn handshake_announces_features() {
        let out = session("xboard\nprotover 2\n");
        assert_eq!(out, format!("{}\n", FEATURES));
    }

    #[test]
    fn ping_answers_pong() {
        assert_eq!(session("ping 7\n"), "pong 7\n");
    }

    #[test]
    fn usermove_is_answered_with_a_move() {
        let out = session("new\nusermove e2e4\n");
        assert!(out.starts_with("move "), "{}", out);
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn force_mode_only_records_moves() {
        let out = session("new\nforce\nusermove e2e4\nusermove e7e5\n");
        assert_eq!(out, "");
    }

    #[test]
    fn illegal_and_malformed_moves_are_reported() {
        let out = session("new\nforce\nusermove e2e5\nusermove xx\n");
        assert_eq!(out, "Illegal move: e2e5\nIllegal move: xx\n");
    }

    #[test]
    fn go_makes_the_engine_play_the_side_to_move() {
        let out = session("new\ngo\n");
        let line = out.lines().next().unwrap();
        let mv = line.strip_prefix("move ").unwrap();
        let from_rank = mv.as_bytes()[1];
        assert!(from_rank == b'1' || from_rank == b'2', "{}", mv);
    }

    #[test]
    fn resignation_sends_a_quote_first() {
        let mut config = EngineConfig::default();
        config.set_depth(1);
        let mut xboard = XBoard::new(Engine::new(config), Vec::new())
            .with_quotes(vec!["Nothing lasts forever.".to_string()]);
        xboard
            .run("setboard k7/8/1Q6/8/8/8/8/7K b - - 0 1\ngo\n".as_bytes())
            .unwrap();
        let out = String::from_utf8(xboard.into_output()).unwrap();
        assert_eq!(out, "tellopponent Nothing lasts forever.\nresign\n");
    }

    #[test]
    fn sd_changes_depth() {
        let mut config = EngineConfig::default();
        config.set_depth(1);
        let mut xboard = XBoard::new(Engine::new(config), Vec::new());
        xboard.run("sd 3\nsd x\n".as_bytes()).unwrap();
        assert_eq!(xboard.engine().config().depth, 3);
        let out = String::from_utf8(xboard.into_output()).unwrap();
        assert_eq!(out, "Error (bad depth): sd x\n");
    }

    #[test]
    fn quit_stops_reading() {
        let out = session("quit\nping 1\n");
        assert_eq!(out, "");
    }

    #[test]
    fn bad_setboard_and_unknown_commands() {
        let out = session("setboard nonsense\nfrobnicate\nrandom\n");
        assert_eq!(out, "tellusererror Illegal position\nError (unknown command): frobnicate\n");
    }

    #[test]
    fn perft_reports_node_count() {
        assert_eq!(session("new\nperft 2\n"), "# perft 2 400\n");
    }
}
