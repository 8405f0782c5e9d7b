//! Game session: one Grid plus the init/playing/won/over/exit state machine.
//!
//! The session never talks to a terminal directly. It is handed a
//! [`Presenter`] that renders frames and supplies commands, so the same
//! state machine drives the interactive binary and scripted tests.

use std::io;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::{Grid, GridError, Move};

/// Session lifecycle states. `Exit` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Init,
    Playing,
    Won,
    Over,
    Exit,
}

/// The subset of states that get rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Playing,
    Won,
    Over,
}

impl State {
    /// Status to render for this state, if it is rendering-eligible.
    pub fn status(self) -> Option<Status> {
        match self {
            State::Playing => Some(Status::Playing),
            State::Won => Some(Status::Won),
            State::Over => Some(Status::Over),
            State::Init | State::Exit => None,
        }
    }
}

/// A player command, already decoded by the presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Up,
    Down,
    Left,
    Right,
    Restart,
    Exit,
}

impl Command {
    pub fn direction(self) -> Option<Move> {
        match self {
            Command::Up => Some(Move::Up),
            Command::Down => Some(Move::Down),
            Command::Left => Some(Move::Left),
            Command::Right => Some(Move::Right),
            Command::Restart | Command::Exit => None,
        }
    }
}

impl From<Move> for Command {
    fn from(m: Move) -> Self {
        match m {
            Move::Up => Command::Up,
            Move::Down => Command::Down,
            Move::Left => Command::Left,
            Move::Right => Command::Right,
        }
    }
}

/// Everything a presenter needs to draw one screen.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub size: usize,
    /// Row-major cell values, `size * size` long.
    pub cells: &'a [u32],
    pub score: u64,
    pub best_score: u64,
    pub status: Status,
}

impl<'a> Frame<'a> {
    pub fn rows(&self) -> std::slice::Chunks<'a, u32> {
        self.cells.chunks(self.size)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid board: {0}")]
    Grid(#[from] GridError),
    #[error("win target must be a power of two >= 4, got {0}")]
    WinTarget(u32),
}

/// A win target is a power of two >= 4; a 2 would be won by the opening tiles.
pub fn is_valid_win_target(target: u32) -> bool {
    target >= 4 && target.is_power_of_two()
}

/// Rendering and input capability handed to a [`Session`].
pub trait Presenter {
    /// Draw the board, score and status. Called once per entry into a
    /// rendering-eligible state, before the next command is polled.
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), SessionError>;

    /// Block until the player issues one of the six commands.
    fn poll_command(&mut self) -> Result<Command, SessionError>;
}

impl<P: Presenter + ?Sized> Presenter for &mut P {
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), SessionError> {
        (**self).render(frame)
    }

    fn poll_command(&mut self) -> Result<Command, SessionError> {
        (**self).poll_command()
    }
}

/// Fixed session parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub size: usize,
    pub win_target: u32,
    /// Seed for the tile RNG; `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { size: 4, win_target: 2048, seed: None }
    }
}

/// One full game lifecycle, including restarts, driven by a presenter.
pub struct Session<P: Presenter, R: Rng = StdRng> {
    presenter: P,
    grid: Grid<R>,
    state: State,
    win: bool,
    over: bool,
    win_target: u32,
    best_score: u64,
    games_played: u32,
}

impl<P: Presenter> Session<P, StdRng> {
    pub fn new(config: SessionConfig, presenter: P) -> Result<Self, SessionError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_grid(Grid::with_rng(config.size, rng)?, config.win_target, presenter)
    }
}

impl<P: Presenter, R: Rng> Session<P, R> {
    /// Wrap an existing grid. The session starts in `Init`, so the first
    /// `step` resets the board; use [`Session::resume`] to play `grid` as is.
    pub fn with_grid(grid: Grid<R>, win_target: u32, presenter: P) -> Result<Self, SessionError> {
        if !is_valid_win_target(win_target) {
            return Err(SessionError::WinTarget(win_target));
        }
        Ok(Session {
            presenter,
            grid,
            state: State::Init,
            win: false,
            over: false,
            win_target,
            best_score: 0,
            games_played: 0,
        })
    }

    /// Enter `Playing` on the current board without resetting it, and render.
    pub fn resume(&mut self) -> Result<(), SessionError> {
        self.win = false;
        self.over = false;
        self.enter(State::Playing)
    }

    /// Drive the state machine until `Exit`.
    pub fn run(&mut self) -> Result<(), SessionError> {
        while self.state != State::Exit {
            self.step()?;
        }
        info!(
            "session finished: games={}, best_score={}",
            self.games_played, self.best_score
        );
        Ok(())
    }

    /// Perform exactly one transition and return the new state.
    pub fn step(&mut self) -> Result<State, SessionError> {
        let next = match self.state {
            State::Init => {
                self.reset();
                State::Playing
            }
            State::Playing => {
                let command = self.presenter.poll_command()?;
                self.on_playing(command)
            }
            State::Won | State::Over => match self.presenter.poll_command()? {
                Command::Exit => State::Exit,
                _ => State::Init,
            },
            State::Exit => State::Exit,
        };
        self.enter(next)?;
        Ok(self.state)
    }

    fn on_playing(&mut self, command: Command) -> State {
        let Some(dir) = command.direction() else {
            return if command == Command::Restart { State::Init } else { State::Exit };
        };
        if !self.grid.can_move(dir) {
            debug!("ignoring blocked move {dir}");
            return State::Playing;
        }
        let gained = self.grid.move_dir(dir);
        self.grid.add_random_tile();
        self.best_score = self.best_score.max(self.grid.score());
        debug!("move {dir}: +{gained}, score={}", self.grid.score());

        self.win = self.check_win();
        self.over = self.check_over();
        if self.win {
            info!("reached {} with score {}", self.grid.max_tile(), self.grid.score());
            State::Won
        } else if self.over {
            info!("no moves left, final score {}", self.grid.score());
            State::Over
        } else {
            State::Playing
        }
    }

    fn enter(&mut self, next: State) -> Result<(), SessionError> {
        if next != self.state {
            debug!("state {:?} -> {:?}", self.state, next);
        }
        self.state = next;
        if let Some(status) = next.status() {
            let frame = Frame {
                size: self.grid.size(),
                cells: self.grid.cells(),
                score: self.grid.score(),
                best_score: self.best_score,
                status,
            };
            self.presenter.render(&frame)?;
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.grid.reset();
        self.win = false;
        self.over = false;
        self.games_played += 1;
        let n = self.grid.size();
        info!("new game #{} on a {n}x{n} board", self.games_played);
    }

    fn check_win(&self) -> bool {
        self.grid.max_tile() >= self.win_target
    }

    fn check_over(&self) -> bool {
        !self.grid.can_move_any()
    }

    pub fn state(&self) -> State { self.state }

    pub fn grid(&self) -> &Grid<R> { &self.grid }

    pub fn is_win(&self) -> bool { self.win }

    pub fn is_over(&self) -> bool { self.over }

    pub fn win_target(&self) -> u32 { self.win_target }

    /// Highest score reached during this process run.
    pub fn best_score(&self) -> u64 { self.best_score }

    pub fn games_played(&self) -> u32 { self.games_played }

    pub fn presenter(&self) -> &P { &self.presenter }

    pub fn into_presenter(self) -> P { self.presenter }
}
