//! term-2048: the 2048 sliding-tile game for the terminal
//!
//! This crate provides:
//! - A square `Grid` engine with move/merge/spawn and `can_move` checks (`engine` module)
//! - A `Session` state machine driving init → playing → won/over → restart/exit
//!   (`session` module)
//! - A crossterm presenter that renders the board and reads WASD/arrow keys (`terminal` module)
//!
//! Quick start:
//! ```
//! use term_2048::engine::{Grid, Move};
//!
//! // Deterministic board with two starting tiles
//! let mut grid = Grid::seeded(4, 42).unwrap();
//! for dir in Move::ALL {
//!     if grid.can_move(dir) {
//!         grid.move_dir(dir);
//!         grid.add_random_tile();
//!         break;
//!     }
//! }
//! assert!(grid.count_empty() <= 14);
//! ```
//!
//! Scripted session (no terminal):
//! ```
//! use term_2048::session::{
//!     Command, Frame, Presenter, Session, SessionConfig, SessionError, State,
//! };
//!
//! struct Quit;
//! impl Presenter for Quit {
//!     fn render(&mut self, _frame: &Frame<'_>) -> Result<(), SessionError> { Ok(()) }
//!     fn poll_command(&mut self) -> Result<Command, SessionError> { Ok(Command::Exit) }
//! }
//!
//! let cfg = SessionConfig { seed: Some(7), ..SessionConfig::default() };
//! let mut session = Session::new(cfg, Quit).unwrap();
//! session.run().unwrap();
//! assert_eq!(session.state(), State::Exit);
//! ```
//!
pub mod config;
pub mod engine;
pub mod session;
pub mod terminal;
