use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use log::{error, info};
use masyu::{Autoplayer, Game, Location, SolverConfig};

const USAGE: &str = "usage: solver [-f] <puzzle-file> [-e|--execute] [--strategy backtrack|sat] [--step-limit N]";

const HELP: &str = "commands:
  r,c r,c        draw a line between two cells (1-based)
  undo r,c r,c   erase a line
  back           take back the last line drawn
  check          is the puzzle solved?
  show           print the board
  solve          solve and draw the missing lines
  quit";

struct Options {
    path: String,
    execute: bool,
    config: SolverConfig,
}

fn parse_args(mut args: impl Iterator<Item=String>) -> Result<Options, String> {
    let mut path = None;
    let mut execute = false;
    let mut config = SolverConfig::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-e" | "--execute" => execute = true,
            "-f" | "--file" => {
                let value = args.next().ok_or("-f needs a puzzle file")?;
                if path.replace(value).is_some() {
                    return Err("more than one puzzle file given".to_string());
                }
            }
            "--strategy" => {
                let value = args.next().ok_or("--strategy needs a value")?;
                config.strategy = value.parse().map_err(|_| format!("unknown strategy `{}`", value))?;
            }
            "--step-limit" => {
                let value = args.next().ok_or("--step-limit needs a value")?;
                config.step_limit = Some(value.parse().map_err(|_| format!("bad step limit `{}`", value))?);
            }
            flag if flag.starts_with('-') => return Err(format!("unknown flag `{}`", flag)),
            _ if path.is_none() => path = Some(arg),
            _ => return Err("more than one puzzle file given".to_string()),
        }
    }

    Ok(Options {
        path: path.ok_or("missing puzzle file")?,
        execute,
        config,
    })
}

fn parse_location(text: &str) -> Option<Location> {
    let (row, col) = text.split_once(',')?;
    Location::from_one_based(row.trim().parse().ok()?, col.trim().parse().ok()?)
}

fn parse_move(words: &[&str]) -> Option<(Location, Location)> {
    match words {
        [from, to] => Some((parse_location(from)?, parse_location(to)?)),
        _ => None,
    }
}

/// Solve from scratch and let the autoplayer draw whatever is missing. Returns whether the board ends up solved.
fn autoplay(game: &mut Game, config: &SolverConfig) -> bool {
    let solution = match game.solve(config) {
        Ok(solution) => solution,
        Err(failure) => {
            println!("{}", failure);
            return false;
        }
    };

    let mut player = Autoplayer::new(&solution);
    match player.play_all(game) {
        Ok(drawn) => info!("autoplayer drew {} lines", drawn),
        Err(e) => error!("replay failed: {}", e),
    }

    println!("{}", game);
    game.check_solved()
}

fn interactive(game: &mut Game, config: &SolverConfig) -> bool {
    println!("{}", HELP);

    let stdin = io::stdin();
    let mut input = stdin.lock().lines();
    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let line = match input.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                error!("could not read input: {}", e);
                break;
            }
            None => break,
        };

        let words = line.split_whitespace().collect::<Vec<_>>();
        match words.as_slice() {
            [] => continue,
            ["quit" | "q"] => break,
            ["show"] => print!("{}", game),
            ["check"] => println!("{}", if game.check_solved() { "solved" } else { "not solved yet" }),
            ["back"] => match game.undo_last() {
                Some(m) => println!("took back {}", m),
                None => println!("nothing to take back"),
            },
            ["solve"] => {
                autoplay(game, config);
            }
            ["undo", rest @ ..] => match parse_move(rest) {
                Some((from, to)) => match game.undo_move(from, to) {
                    Ok(_) => print!("{}", game),
                    Err(e) => println!("{}", e),
                },
                None => println!("expected `undo r,c r,c`"),
            },
            _ => match parse_move(&words) {
                Some((from, to)) => match game.make_move(from, to) {
                    Ok(_) => {
                        print!("{}", game);
                        if game.check_solved() {
                            println!("solved!");
                        }
                    }
                    Err(e) => println!("{}", e),
                },
                None => println!("{}", HELP),
            },
        }
    }

    game.check_solved()
}

fn main() -> ExitCode {
    env_logger::init();

    let options = match parse_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}\n{}", message, USAGE);
            return ExitCode::from(2);
        }
    };

    let mut game = match Game::load(&options.path) {
        Ok(game) => game,
        Err(e) => {
            eprintln!("{}: {}", options.path, e);
            return ExitCode::from(2);
        }
    };
    info!("loaded {0}x{0} puzzle from {1}", game.size(), options.path);
    println!("{}", game);

    let solved = match options.execute {
        true => autoplay(&mut game, &options.config),
        false => interactive(&mut game, &options.config),
    };

    match solved {
        true => ExitCode::SUCCESS,
        false => ExitCode::from(1),
    }
}
