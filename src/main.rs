use std::{
    io::{self, Read, Write},
    thread,
    time::Duration,
};

use clap::Parser;
use lib_2048::{
    ai::{random::RandomAi, Ai},
    Game, GameConfig,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod feedback;
mod input;
mod render;
mod stats;
mod terminal;

use input::{Key, KeyDecoder};
use render::View;
use stats::SessionStats;

#[derive(Parser, Debug)]
#[command(name = "term-2048", version, about = "Play 2048 in the terminal")]
struct Cli {
    /// Width and height of the board
    #[arg(short, long, default_value_t = 4)]
    size: usize,
    /// Tile value that counts as a win
    #[arg(short = 't', long, default_value_t = 2048)]
    win_threshold: u64,
    /// Seed for tile spawns; drawn from entropy when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Let a random player make the moves
    #[arg(short, long)]
    random: bool,
    /// Pause between random player moves, in milliseconds
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,
    /// Tracing filter, e.g. "info", "lib_2048=debug"
    #[arg(long, default_value = "warn")]
    log: String,
}

fn play_interactive(
    out: &mut impl Write,
    input: &mut impl Read,
    game: &mut Game<ChaCha8Rng>,
    rng: &mut impl Rng,
) -> anyhow::Result<SessionStats> {
    let mut decoder = KeyDecoder::new()?;
    let mut stats = SessionStats::default();
    let mut message = None;

    writeln!(out)?;
    render::draw_board(
        out,
        &View {
            board: game.board(),
            score: game.score(),
            stats: &stats,
            message: None,
        },
    )?;

    loop {
        for key in decoder.read_keys(input)? {
            match key {
                Key::Quit => {
                    stats.observe(game.score());
                    return Ok(stats);
                }
                Key::Restart => {
                    stats.record_game(game.score());
                    game.reset();
                    message = None;
                }
                Key::Move(direction) => {
                    let turn = game.play(direction)?;

                    if !turn.moved {
                        continue;
                    }

                    message = feedback::turn_message(rng, &turn, game.config().win_threshold);
                }
            }

            stats.observe(game.score());

            render::redraw_board(
                out,
                &View {
                    board: game.board(),
                    score: game.score(),
                    stats: &stats,
                    message: message.as_deref(),
                },
            )?;
        }
    }
}

fn play_random(
    out: &mut impl Write,
    game: &mut Game<ChaCha8Rng>,
    ai: &mut impl Ai,
    delay: Duration,
) -> anyhow::Result<SessionStats> {
    let mut stats = SessionStats::default();

    writeln!(out)?;
    render::draw_board(
        out,
        &View {
            board: game.board(),
            score: game.score(),
            stats: &stats,
            message: None,
        },
    )?;

    let mut turns = 0u64;

    while let Some(direction) = ai.get_next_move(game.board()) {
        game.play(direction)?;
        turns += 1;
        stats.observe(game.score());

        render::redraw_board(
            out,
            &View {
                board: game.board(),
                score: game.score(),
                stats: &stats,
                message: None,
            },
        )?;

        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }

    stats.record_game(game.score());
    info!(turns, score = game.score(), "random player finished");

    out.write_all(b"Game over\n")?;

    Ok(stats)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&cli.log))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = GameConfig {
        size: cli.size,
        win_threshold: cli.win_threshold,
    };

    let mut rng = match cli.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let mut game = Game::new(config, ChaCha8Rng::from_rng(&mut rng)?)?;

    info!(size = config.size, threshold = config.win_threshold, "starting game");

    let mut stdout = io::stdout().lock();

    let stats = if cli.random {
        let mut ai = RandomAi::new(ChaCha8Rng::from_rng(&mut rng)?);

        play_random(&mut stdout, &mut game, &mut ai, Duration::from_millis(cli.delay_ms))?
    } else {
        let stdin = io::stdin();
        let _raw_mode = terminal::RawMode::enable(&stdin)?;

        play_interactive(&mut stdout, &mut stdin.lock(), &mut game, &mut rng)?
    };

    info!(
        best = stats.best,
        games = stats.games_played,
        average = stats.average(),
        "session finished"
    );

    Ok(())
}
