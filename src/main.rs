use clap::Parser;
use colored::Colorize;
use env_logger::Env;
use log::{debug, warn};
use std::io::{self, Write};
use std::process;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use text_io::read;

mod libquiz;

use crate::libquiz::bank::QuestionBank;
use crate::libquiz::error::Error;
use crate::libquiz::session::{Mode, Phase, SessionController, TickOutcome};

#[derive(Parser, Debug)]
#[command(name = "Quiz Duel")]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "15")]
    seconds: u32,
    #[arg(short, long, default_value = "1500")]
    feedback_ms: u64,
    #[arg(short, long, default_value = "error")]
    log_level: String,
}

fn main() -> Result<(), Error> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(&args.log_level)).init();

    // One thread reads stdin lines; the game loop multiplexes them against
    // the once-per-second countdown with recv_timeout. Every controller
    // call stays on this thread.
    let (tx, rx) = mpsc::channel::<String>();
    thread::spawn(move || loop {
        let line: String = read!("{}\n");
        if tx.send(line).is_err() {
            break;
        }
    });

    let mut game = SessionController::with_question_seconds(QuestionBank::builtin(), args.seconds);

    loop {
        match game.phase() {
            Phase::Menu => {
                println!();
                println!("{}", "==========> Quiz Duel <==========".cyan().bold());
                println!("  {}. Single player", "1".bold());
                println!("  {}. Two players", "2".bold());
                println!("  {}. Quit", "q".bold());
                print!("{} ", "Pick a mode:".cyan());
                io::stdout().flush().ok();

                let line = next_line(&rx);
                match line.trim() {
                    "1" => game.select_mode(Mode::SinglePlayer)?,
                    "2" => game.select_mode(Mode::TwoPlayer)?,
                    "q" => break,
                    other => {
                        println!("{}", format!("'{other}' is not a menu option.").bright_red());
                    }
                }
            }
            Phase::CategorySelect => {
                println!("{}", "Pick a category:".cyan());
                for (i, category) in game.bank().categories().iter().enumerate() {
                    println!("  {}. {}", format!("{}", i + 1).bold(), category.name);
                }
                print!("{} ", "Category (number or name, q for menu):".cyan());
                io::stdout().flush().ok();

                let line = next_line(&rx);
                let trimmed = line.trim();
                if trimmed.eq_ignore_ascii_case("q") {
                    game.abandon()?;
                    continue;
                }
                let name = match trimmed.parse::<usize>() {
                    Ok(n) if n >= 1 && n <= game.bank().categories().len() => {
                        game.bank().categories()[n - 1].name.clone()
                    }
                    _ => trimmed.to_string(),
                };
                match game.select_category(&name) {
                    Ok(_) => {}
                    Err(Error::UnknownCategory(name)) => {
                        println!("{}", format!("No category called '{name}'.").bright_red());
                    }
                    Err(err) => return Err(err),
                }
            }
            Phase::AwaitingAnswer => run_question(&mut game, &rx)?,
            Phase::ShowingFeedback => {
                thread::sleep(Duration::from_millis(args.feedback_ms));
                game.advance()?;
            }
            Phase::GameOver => {
                if let Some(result) = game.result() {
                    println!();
                    println!("{}", result.to_string().cyan().bold());
                }
                print!("{} ", "Press Enter to return to the menu.".cyan());
                io::stdout().flush().ok();
                let _ = next_line(&rx);
                game.acknowledge_game_over()?;
            }
        }
    }

    println!("{}", "Thanks for playing!".cyan());
    Ok(())
}

fn run_question(game: &mut SessionController, rx: &Receiver<String>) -> Result<(), Error> {
    // Anything typed while feedback was on screen belongs to no question.
    while rx.try_recv().is_ok() {}

    let (text, image, options) = {
        let Some(question) = game.current_question() else {
            return Ok(());
        };
        (
            question.text().to_string(),
            question.image().cloned(),
            question
                .presented_options()
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<String>>(),
        )
    };

    let (number, total) = game.progress().unwrap_or_default();
    println!();
    println!(
        "{}   {}",
        game.score_line().unwrap_or_default().cyan(),
        format!("Time: {}", game.time_remaining().unwrap_or_default()).yellow()
    );
    if game.mode() == Some(Mode::TwoPlayer) {
        let player = if (number + 1) % 2 == 0 { "Player 1" } else { "Player 2" };
        println!("{}", format!("{player}'s turn!").magenta());
    }
    println!(
        "{}{}",
        format!("{number}/{total}. ").cyan(),
        text.black().bold().on_white()
    );
    if let Some(path) = image {
        println!("{}", format!("(image: {})", path.display()).dimmed());
    }
    for (i, option) in options.iter().enumerate() {
        println!("  {}. {}", format!("{}", i + 1).bold(), option);
    }
    print!(
        "{} ",
        format!("Answer (1-{}, q to return to the menu):", options.len()).cyan()
    );
    io::stdout().flush().ok();

    let generation = game.generation();
    loop {
        match rx.recv_timeout(Duration::from_secs(1)) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.eq_ignore_ascii_case("q") {
                    println!("{}", "Back to the menu!".cyan());
                    game.abandon()?;
                    return Ok(());
                }
                let slot = match trimmed.parse::<usize>() {
                    Ok(n) if n >= 1 => n - 1,
                    _ => {
                        print!(
                            "{} ",
                            format!("Pick a number between 1 and {}:", options.len()).bright_red()
                        );
                        io::stdout().flush().ok();
                        continue;
                    }
                };
                match game.submit_answer(slot) {
                    Ok(feedback) => {
                        if feedback.correct {
                            println!("{}", feedback.message.bright_green());
                        } else {
                            println!("{}", feedback.message.bright_red());
                        }
                        return Ok(());
                    }
                    Err(Error::InvalidAnswerIndex { options: count, .. }) => {
                        print!(
                            "{} ",
                            format!("There are only {count} options available!").bright_red()
                        );
                        io::stdout().flush().ok();
                    }
                    Err(err) => return Err(err),
                }
            }
            Err(RecvTimeoutError::Timeout) => match game.on_timer_tick(generation)? {
                TickOutcome::Counting { remaining } => {
                    debug!("[View] {remaining}s left");
                    if remaining <= 5 {
                        print!("{} ", format!("{remaining}...").yellow());
                        io::stdout().flush().ok();
                    }
                }
                TickOutcome::Expired(feedback) => {
                    println!();
                    println!("{}", feedback.message.yellow().bold());
                    return Ok(());
                }
                TickOutcome::Ignored => {}
            },
            Err(RecvTimeoutError::Disconnected) => {
                warn!("[View] stdin closed, abandoning the game");
                game.abandon()?;
                return Ok(());
            }
        }
    }
}

fn next_line(rx: &Receiver<String>) -> String {
    match rx.recv() {
        Ok(line) => line,
        Err(_) => {
            warn!("[View] stdin closed, exiting");
            process::exit(0)
        }
    }
}
