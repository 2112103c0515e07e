//! Flappy Arcade entry point
//!
//! Parses the command line, sets up logging and runs either the interactive
//! terminal game or the headless autopilot.

use std::fs::File;
use std::io::{self, Stdout, Write, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute, terminal,
};

use flappy_arcade::app::{App, run_headless};
use flappy_arcade::consts::SIM_DT;
use flappy_arcade::platform::{Command, map_event};
use flappy_arcade::renderer::{self, PixelBuf};
use flappy_arcade::{Config, HighScore};

const LOG_FILE: &str = "flappy-arcade.log";

struct Options {
    config: PathBuf,
    highscore: Option<PathBuf>,
    seed: Option<u64>,
    headless: bool,
    frames: u64,
    print_config: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            config: PathBuf::from("config.json"),
            highscore: None,
            seed: None,
            headless: false,
            frames: 60 * 60,
            print_config: false,
        }
    }
}

fn print_help() {
    println!("Flappy Arcade - a forgiving Flappy Bird for the terminal\n");
    println!("Usage: flappy-arcade [options]\n");
    println!("Options:");
    println!("  --config PATH      Tunables file (default: config.json)");
    println!("  --highscore PATH   Best score file (default: highscore.txt)");
    println!("  --seed N           Seed for obstacle and enemy placement");
    println!("  --headless         Let the autopilot play without a terminal UI");
    println!("  --frames N         Ticks to simulate in headless mode (default: 3600)");
    println!("  --print-config     Print the effective configuration as JSON");
    println!("  --version          Show version information");
    println!("  --help             Show this help message");
    println!("\nKeys: SPACE/UP/click flap (and restart), R restart, M mute, Q/ESC quit");
}

fn parse_args() -> Options {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut options = Options::default();
    let mut i = 0;

    let value = |i: usize, flag: &str| -> String {
        match args.get(i + 1) {
            Some(v) => v.clone(),
            None => {
                eprintln!("{} needs a value", flag);
                std::process::exit(1);
            }
        }
    };
    let number = |text: String, flag: &str| -> u64 {
        text.parse().unwrap_or_else(|_| {
            eprintln!("{} expects a whole number, got '{}'", flag, text);
            std::process::exit(1);
        })
    };

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                options.config = PathBuf::from(value(i, "--config"));
                i += 1;
            }
            "--highscore" => {
                options.highscore = Some(PathBuf::from(value(i, "--highscore")));
                i += 1;
            }
            "--seed" => {
                options.seed = Some(number(value(i, "--seed"), "--seed"));
                i += 1;
            }
            "--frames" => {
                options.frames = number(value(i, "--frames"), "--frames");
                i += 1;
            }
            "--headless" => options.headless = true,
            "--print-config" => options.print_config = true,
            "--version" | "-v" => {
                println!("flappy-arcade {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown option: {}", other);
                eprintln!("Run 'flappy-arcade --help' for usage.");
                std::process::exit(1);
            }
        }
        i += 1;
    }
    options
}

/// Log to stderr when headless; to a file otherwise so the game screen stays clean
fn init_logging(headless: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if !headless {
        match File::create(LOG_FILE) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(_) => {
                // Nowhere safe to write while the screen is ours
                builder.filter_level(log::LevelFilter::Off);
            }
        }
    }
    builder.init();
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5eed)
}

fn main() -> io::Result<()> {
    let options = parse_args();
    init_logging(options.headless || options.print_config);

    let config = Config::load(&options.config);
    if options.print_config {
        let json = serde_json::to_string_pretty(&config).map_err(io::Error::other)?;
        println!("{}", json);
        return Ok(());
    }

    let seed = options.seed.unwrap_or_else(clock_seed);
    log::info!("Flappy Arcade starting (seed {})", seed);

    if options.headless {
        // Autopilot scores only count when a file was asked for explicitly
        let highscore = options.highscore.map(HighScore::load);
        let mut app = App::new(config, highscore, seed);
        let report = run_headless(&mut app, options.frames);
        println!(
            "{} ticks ({:.1}s), {} finished runs, scores {:?}, current {}, best {}",
            report.ticks,
            report.ticks as f32 * SIM_DT,
            report.runs,
            report.scores,
            report.current,
            report.best
        );
        return Ok(());
    }

    let highscore_path = options
        .highscore
        .unwrap_or_else(|| PathBuf::from("highscore.txt"));
    let mut app = App::new(config, Some(HighScore::load(highscore_path)), seed);
    // Before the alternate screen, so device warnings land on the normal one
    app.audio.open_output();
    run_terminal(&mut app)
}

fn enter_terminal(out: &mut Stdout) -> io::Result<()> {
    terminal::enable_raw_mode()?;
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
        EnableMouseCapture,
    )
}

fn leave_terminal(out: &mut Stdout) -> io::Result<()> {
    execute!(
        out,
        DisableMouseCapture,
        terminal::EnableLineWrap,
        cursor::Show,
        terminal::LeaveAlternateScreen,
    )?;
    terminal::disable_raw_mode()
}

fn run_terminal(app: &mut App) -> io::Result<()> {
    let mut out = stdout();
    enter_terminal(&mut out)?;
    let result = game_loop(app, &mut out);
    // Restore the terminal even when the loop failed
    let restored = leave_terminal(&mut out);
    result.and(restored)
}

fn game_loop(app: &mut App, out: &mut Stdout) -> io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut buf = PixelBuf::for_terminal(cols, rows);
    let frame_budget = app.config.frame_duration();
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();

        // Input
        while event::poll(Duration::ZERO)? {
            let Some(command) = map_event(&event::read()?) else {
                continue;
            };
            if let Command::Resize { cols, rows } = command {
                buf.resize(cols as usize, rows as usize * 2);
                execute!(out, terminal::Clear(terminal::ClearType::All))?;
            }
            if !app.handle_command(command) {
                log::info!("Quit requested");
                return Ok(());
            }
        }

        // Update
        let now = Instant::now();
        app.update((now - last).as_secs_f32());
        last = now;

        // Render
        renderer::draw(&mut buf, &app.state, &app.config);
        buf.render(out)?;
        app.audio.flush(out)?;
        out.flush()?;

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            std::thread::sleep(frame_budget - elapsed);
        }
    }
}
