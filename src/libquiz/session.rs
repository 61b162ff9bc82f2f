use log::{debug, info};
use std::fmt;

use crate::libquiz::bank::{Question, QuestionBank};
use crate::libquiz::error::Error;

/// Seconds a player gets per question unless the host overrides it.
pub const QUESTION_SECONDS: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    SinglePlayer,
    TwoPlayer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Menu,
    CategorySelect,
    AwaitingAnswer,
    ShowingFeedback,
    GameOver,
}

/// What the view shows after an answer (or a timeout) lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feedback {
    pub correct: bool,
    pub message: &'static str,
}

/// Outcome of delivering one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still counting down.
    Counting { remaining: u32 },
    /// The countdown hit zero; treated as an incorrect answer.
    Expired(Feedback),
    /// Stale or redundant tick, dropped without effect.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advanced {
    NextQuestion,
    GameOver(GameResult),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameResult {
    Finished { score: u32, total: u32 },
    Player1Wins { player1: u32, player2: u32 },
    Player2Wins { player1: u32, player2: u32 },
    Tie { player1: u32, player2: u32 },
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::Finished { score, total } => {
                write!(f, "Game Over!\nYour score: {score}/{total}")
            }
            GameResult::Player1Wins { player1, player2 } => {
                write!(f, "Player 1 wins!\nPlayer 1: {player1}\nPlayer 2: {player2}")
            }
            GameResult::Player2Wins { player1, player2 } => {
                write!(f, "Player 2 wins!\nPlayer 1: {player1}\nPlayer 2: {player2}")
            }
            GameResult::Tie { player1, player2 } => {
                write!(f, "It's a tie!\nPlayer 1: {player1}\nPlayer 2: {player2}")
            }
        }
    }
}

/// Per-game mutable state. Lives from category selection until the player
/// returns to the menu; a new game gets a fresh one.
#[derive(Debug)]
struct Session {
    mode: Mode,
    category: usize,
    question_index: usize,
    player1: u32,
    player2: u32,
    time_remaining: u32,
    timer_expired: bool,
    result: Option<GameResult>,
}

/// Drives the quiz state machine and is the single source of truth for
/// game progress. Owns no threads and no wall-clock timers: the view
/// delivers ticks and the feedback-elapsed event, and every call returns
/// synchronously. Not internally synchronized; callers serialize access.
pub struct SessionController {
    bank: QuestionBank,
    phase: Phase,
    pending_mode: Option<Mode>,
    session: Option<Session>,
    generation: u64,
    question_seconds: u32,
}

impl SessionController {
    pub fn new(bank: QuestionBank) -> SessionController {
        Self::with_question_seconds(bank, QUESTION_SECONDS)
    }

    pub fn with_question_seconds(bank: QuestionBank, question_seconds: u32) -> SessionController {
        SessionController {
            bank,
            phase: Phase::Menu,
            pending_mode: None,
            session: None,
            generation: 0,
            question_seconds: question_seconds.max(1),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current session generation. The view tags scheduled ticks with this
    /// so ticks meant for a discarded session fall through as no-ops.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn mode(&self) -> Option<Mode> {
        self.session.as_ref().map(|s| s.mode).or(self.pending_mode)
    }

    pub fn current_question(&self) -> Option<&Question> {
        let session = self.session.as_ref()?;
        self.bank.categories()[session.category]
            .questions
            .get(session.question_index)
    }

    pub fn time_remaining(&self) -> Option<u32> {
        self.session.as_ref().map(|s| s.time_remaining)
    }

    pub fn scores(&self) -> Option<(u32, u32)> {
        self.session.as_ref().map(|s| (s.player1, s.player2))
    }

    /// 1-based number of the current question and the category total.
    pub fn progress(&self) -> Option<(usize, usize)> {
        let session = self.session.as_ref()?;
        let total = self.bank.categories()[session.category].questions.len();
        Some((session.question_index + 1, total))
    }

    /// Score readout formatted for the current mode.
    pub fn score_line(&self) -> Option<String> {
        let session = self.session.as_ref()?;
        Some(match session.mode {
            Mode::TwoPlayer => format!("P1: {} | P2: {}", session.player1, session.player2),
            Mode::SinglePlayer => format!("Score: {}", session.player1),
        })
    }

    pub fn result(&self) -> Option<&GameResult> {
        self.session.as_ref().and_then(|s| s.result.as_ref())
    }

    /// Menu -> CategorySelect.
    pub fn select_mode(&mut self, mode: Mode) -> Result<(), Error> {
        if self.phase != Phase::Menu {
            return Err(Error::InvalidTransition {
                op: "select_mode",
                phase: self.phase,
            });
        }
        debug!("[Session] Mode selected: {mode:?}");
        self.pending_mode = Some(mode);
        self.phase = Phase::CategorySelect;
        Ok(())
    }

    /// CategorySelect -> AwaitingAnswer. Creates the session and returns
    /// the first question.
    pub fn select_category(&mut self, name: &str) -> Result<&Question, Error> {
        if self.phase != Phase::CategorySelect {
            return Err(Error::InvalidTransition {
                op: "select_category",
                phase: self.phase,
            });
        }
        let Some(category) = self.bank.find(name) else {
            return Err(Error::UnknownCategory(name.to_string()));
        };
        let Some(mode) = self.pending_mode.take() else {
            return Err(Error::InvalidTransition {
                op: "select_category",
                phase: self.phase,
            });
        };
        self.generation += 1;
        self.session = Some(Session {
            mode,
            category,
            question_index: 0,
            player1: 0,
            player2: 0,
            time_remaining: self.question_seconds,
            timer_expired: false,
            result: None,
        });
        self.phase = Phase::AwaitingAnswer;
        info!(
            "[Session] Game {} started: {mode:?} in '{}'",
            self.generation,
            self.bank.categories()[category].name
        );
        Ok(&self.bank.categories()[category].questions[0])
    }

    /// AwaitingAnswer -> ShowingFeedback. Stops the countdown and scores
    /// the answer. In two-player games credit alternates strictly by
    /// question index (even credits player 1, odd credits player 2),
    /// whoever pressed the button.
    pub fn submit_answer(&mut self, slot: usize) -> Result<Feedback, Error> {
        if self.phase != Phase::AwaitingAnswer {
            return Err(Error::InvalidTransition {
                op: "submit_answer",
                phase: self.phase,
            });
        }
        let Some(session) = self.session.as_mut() else {
            return Err(Error::InvalidTransition {
                op: "submit_answer",
                phase: self.phase,
            });
        };
        let question = &self.bank.categories()[session.category].questions[session.question_index];
        let options = question.kind().option_count();
        if slot >= options {
            return Err(Error::InvalidAnswerIndex {
                index: slot,
                options,
            });
        }

        let correct = question.kind().is_correct(slot);
        if correct {
            match session.mode {
                Mode::TwoPlayer => {
                    if session.question_index % 2 == 0 {
                        session.player1 += 1;
                    } else {
                        session.player2 += 1;
                    }
                }
                Mode::SinglePlayer => session.player1 += 1,
            }
        }
        debug!(
            "[Session] Question {} answered slot {slot}: correct={correct} (P1 {} / P2 {})",
            session.question_index, session.player1, session.player2
        );
        self.phase = Phase::ShowingFeedback;
        Ok(Feedback {
            correct,
            message: if correct { "Correct!" } else { "Incorrect!" },
        })
    }

    /// One second of countdown elapsed. Ticks carrying an old generation
    /// are dropped, as is a repeat tick after the timer already expired
    /// for the current question.
    pub fn on_timer_tick(&mut self, generation: u64) -> Result<TickOutcome, Error> {
        if generation != self.generation {
            debug!("[Session] Dropping stale tick for game {generation}");
            return Ok(TickOutcome::Ignored);
        }
        match self.phase {
            Phase::AwaitingAnswer => {}
            Phase::ShowingFeedback
                if self.session.as_ref().is_some_and(|s| s.timer_expired) =>
            {
                return Ok(TickOutcome::Ignored);
            }
            phase => {
                return Err(Error::InvalidTransition {
                    op: "on_timer_tick",
                    phase,
                });
            }
        }
        let Some(session) = self.session.as_mut() else {
            return Err(Error::InvalidTransition {
                op: "on_timer_tick",
                phase: self.phase,
            });
        };

        session.time_remaining = session.time_remaining.saturating_sub(1);
        if session.time_remaining > 0 {
            return Ok(TickOutcome::Counting {
                remaining: session.time_remaining,
            });
        }

        debug!(
            "[Session] Question {} timed out, no point awarded",
            session.question_index
        );
        session.timer_expired = true;
        self.phase = Phase::ShowingFeedback;
        Ok(TickOutcome::Expired(Feedback {
            correct: false,
            message: "Time's up!",
        }))
    }

    /// ShowingFeedback -> AwaitingAnswer or GameOver. Called by the view
    /// once the feedback display duration has elapsed, not by the player.
    pub fn advance(&mut self) -> Result<Advanced, Error> {
        if self.phase != Phase::ShowingFeedback {
            return Err(Error::InvalidTransition {
                op: "advance",
                phase: self.phase,
            });
        }
        let Some(session) = self.session.as_mut() else {
            return Err(Error::InvalidTransition {
                op: "advance",
                phase: self.phase,
            });
        };

        session.question_index += 1;
        session.timer_expired = false;
        let total = self.bank.categories()[session.category].questions.len();
        if session.question_index < total {
            session.time_remaining = self.question_seconds;
            self.phase = Phase::AwaitingAnswer;
            return Ok(Advanced::NextQuestion);
        }

        let result = match session.mode {
            Mode::SinglePlayer => GameResult::Finished {
                score: session.player1,
                total: total as u32,
            },
            Mode::TwoPlayer => {
                let (player1, player2) = (session.player1, session.player2);
                if player1 > player2 {
                    GameResult::Player1Wins { player1, player2 }
                } else if player2 > player1 {
                    GameResult::Player2Wins { player1, player2 }
                } else {
                    GameResult::Tie { player1, player2 }
                }
            }
        };
        info!("[Session] Game {} over: {result:?}", self.generation);
        session.result = Some(result.clone());
        self.phase = Phase::GameOver;
        Ok(Advanced::GameOver(result))
    }

    /// GameOver -> Menu. Discards the session.
    pub fn acknowledge_game_over(&mut self) -> Result<(), Error> {
        if self.phase != Phase::GameOver {
            return Err(Error::InvalidTransition {
                op: "acknowledge_game_over",
                phase: self.phase,
            });
        }
        self.reset_to_menu();
        Ok(())
    }

    /// Bail out of an in-progress game (or the category picker) back to
    /// the menu. Any ticks still scheduled for the old session become
    /// stale and are ignored.
    pub fn abandon(&mut self) -> Result<(), Error> {
        if self.phase == Phase::Menu {
            return Err(Error::InvalidTransition {
                op: "abandon",
                phase: self.phase,
            });
        }
        info!("[Session] Game abandoned, returning to menu");
        self.reset_to_menu();
        Ok(())
    }

    fn reset_to_menu(&mut self) {
        self.session = None;
        self.pending_mode = None;
        self.generation += 1;
        self.phase = Phase::Menu;
    }
}
