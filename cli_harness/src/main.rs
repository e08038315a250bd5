//! CLI harness for soak-testing rebound_core against the computer opponent.

use clap::{Parser, ValueEnum};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rebound_core::*;
use serde::Serialize;
use std::io::{stdout, Result, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Play rebound matches headlessly and report what happened
#[derive(Parser, Debug)]
#[command(name = "cli_harness", version, about)]
struct Args {
    /// Seed for the ball and the scripted player; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many ticks
    #[arg(long, default_value_t = 150_000)]
    max_ticks: u64,

    /// Stop once this many matches have been decided
    #[arg(long)]
    matches: Option<u32>,

    /// How the scripted player moves its paddle
    #[arg(long, value_enum, default_value_t = PlayerMode::Wander)]
    player: PlayerMode,

    /// Tick on the wall clock instead of a virtual one
    #[arg(long)]
    realtime: bool,

    /// Draw the court in the terminal (implies --realtime)
    #[arg(long)]
    watch: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PlayerMode {
    /// Never touches the keys
    Idle,
    /// Holds random directions for random stretches
    Wander,
}

/// Stand-in for a human at the keyboard
struct ScriptedPlayer {
    mode: PlayerMode,
    rng: StdRng,
    hold: Option<Direction>,
    remaining: u32,
    quit: Arc<AtomicBool>,
}

impl ScriptedPlayer {
    fn new(mode: PlayerMode, seed: u64, quit: Arc<AtomicBool>) -> Self {
        Self {
            mode,
            rng: StdRng::seed_from_u64(seed.wrapping_add(1)),
            hold: None,
            remaining: 0,
            quit,
        }
    }
}

impl InputSource for ScriptedPlayer {
    fn poll(&mut self) -> std::result::Result<Controls, ServiceError> {
        if self.quit.load(Ordering::Relaxed) {
            return Ok(Controls {
                quit: true,
                ..Controls::default()
            });
        }

        if self.mode == PlayerMode::Wander {
            if self.remaining == 0 {
                self.hold = match self.rng.gen_range(0..3) {
                    0 => None,
                    1 => Some(Direction::Up),
                    _ => Some(Direction::Down),
                };
                self.remaining = self.rng.gen_range(5..40);
            }
            self.remaining -= 1;
        }

        Ok(Controls {
            up: self.hold == Some(Direction::Up),
            down: self.hold == Some(Direction::Down),
            ..Controls::default()
        })
    }
}

const FIELD_WIDTH: usize = 64;
const FIELD_HEIGHT: usize = 25;

/// Character-cell picture of the court
struct AsciiCourt {
    cells: Vec<Vec<char>>,
}

impl AsciiCourt {
    fn new() -> Self {
        let mut court = Self {
            cells: vec![vec![' '; FIELD_WIDTH]; FIELD_HEIGHT],
        };
        court.clear();
        court
    }

    fn clear(&mut self) {
        for (y, row) in self.cells.iter_mut().enumerate() {
            row.fill(' ');
            if y % 2 == 0 {
                row[FIELD_WIDTH / 2] = '┊';
            }
        }
    }

    fn column(x: i16) -> usize {
        let col = i32::from(x) * FIELD_WIDTH as i32 / i32::from(COURT_WIDTH);
        col.clamp(0, FIELD_WIDTH as i32 - 1) as usize
    }

    fn row(y: i16) -> usize {
        let row = i32::from(y) * FIELD_HEIGHT as i32 / i32::from(COURT_HEIGHT);
        row.clamp(0, FIELD_HEIGHT as i32 - 1) as usize
    }

    fn fill(&mut self, bounds: Rect, glyph: char) {
        if bounds.right() <= 0 || bounds.x >= COURT_WIDTH {
            return;
        }
        for y in Self::row(bounds.y)..=Self::row(bounds.bottom() - 1) {
            for x in Self::column(bounds.x)..=Self::column(bounds.right() - 1) {
                self.cells[y][x] = glyph;
            }
        }
    }

    fn write(&mut self, x: usize, y: usize, text: &str) {
        for (i, ch) in text.chars().enumerate() {
            if let Some(cell) = self.cells[y].get_mut(x + i) {
                *cell = ch;
            }
        }
    }

    fn draw(&mut self, sprite: &Sprite) {
        match &sprite.kind {
            SpriteKind::Ball => self.fill(sprite.bounds, '●'),
            SpriteKind::Paddle(_) => self.fill(sprite.bounds, '█'),
            SpriteKind::Label { text, .. } => {
                let (x, y) = (Self::column(sprite.bounds.x), Self::row(sprite.bounds.y));
                self.write(x, y, text);
            }
            SpriteKind::PausePanel => {
                let text = "PAUSED";
                self.write((FIELD_WIDTH - text.len()) / 2, FIELD_HEIGHT / 2, text);
            }
        }
    }

    fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.cells.iter().map(|row| row.iter().collect())
    }
}

/// Renderer that counts frames and optionally paints the court
struct TallyRenderer {
    frames: u64,
    sprites: u64,
    court: Option<AsciiCourt>,
}

impl TallyRenderer {
    fn new(watch: bool) -> Self {
        Self {
            frames: 0,
            sprites: 0,
            court: watch.then(AsciiCourt::new),
        }
    }
}

impl TextMetrics for TallyRenderer {
    fn text_width(&self, text: &str, _size: LabelSize) -> i16 {
        text.chars().count() as i16 * (COURT_WIDTH / FIELD_WIDTH as i16)
    }

    fn line_height(&self, _size: LabelSize) -> i16 {
        COURT_HEIGHT / FIELD_HEIGHT as i16
    }
}

impl Renderer for TallyRenderer {
    fn draw(&mut self, sprite: &Sprite) -> std::result::Result<(), ServiceError> {
        self.sprites += 1;
        if let Some(court) = &mut self.court {
            court.draw(sprite);
        }
        Ok(())
    }

    fn present(&mut self) -> std::result::Result<(), ServiceError> {
        self.frames += 1;
        let Some(court) = &mut self.court else {
            return Ok(());
        };

        let mut out = stdout();
        for (row, line) in court.lines().enumerate() {
            queue!(out, MoveTo(0, row as u16), Print(line))?;
        }
        out.flush()?;
        court.clear();
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy, Serialize)]
struct SoundCounts {
    bounce: u64,
    scored: u64,
    game_over: u64,
}

/// Audio sink that only counts what would have been heard
#[derive(Default)]
struct TallyAudio {
    counts: SoundCounts,
    volume: Volume,
}

impl AudioSink for TallyAudio {
    fn play(&mut self, sound: Sound) -> std::result::Result<(), ServiceError> {
        if !self.volume.is_audible() {
            return Ok(());
        }
        match sound {
            Sound::Bounce => self.counts.bounce += 1,
            Sound::Scored => self.counts.scored += 1,
            Sound::GameOver => self.counts.game_over += 1,
        }
        Ok(())
    }

    fn toggle_mute(&mut self) -> bool {
        self.volume.toggle_mute()
    }

    fn volume_up(&mut self) -> u8 {
        self.volume.up()
    }

    fn volume_down(&mut self) -> u8 {
        self.volume.down()
    }
}

#[derive(Debug, Serialize)]
struct Report {
    seed: u64,
    stats: SessionStats,
    sounds: SoundCounts,
    frames: u64,
    sprites: u64,
    final_score: [u8; 2],
    final_phase: Phase,
}

fn play<C: Clock>(args: &Args, seed: u64, clock: C, quit: Arc<AtomicBool>) -> Report {
    let config = Config {
        seed: Some(seed),
        ..Config::default()
    };
    let mut driver = Driver::new(
        config,
        TallyRenderer::new(args.watch),
        ScriptedPlayer::new(args.player, seed, quit),
        TallyAudio::default(),
        clock,
    );

    loop {
        if driver.tick() == Flow::Quit {
            break;
        }
        let stats = driver.stats();
        let enough_matches = args
            .matches
            .is_some_and(|limit| stats.matches_completed >= limit);
        if stats.ticks >= args.max_ticks || enough_matches {
            break;
        }
        driver.sleep_tick();
    }

    let stats = driver.stats();
    let final_score = driver.session().score().points();
    let final_phase = driver.session().phase();
    let (renderer, _, audio, _) = driver.into_parts();

    Report {
        seed,
        stats,
        sounds: audio.counts,
        frames: renderer.frames,
        sprites: renderer.sprites,
        final_score,
        final_phase,
    }
}

fn print_summary(report: &Report) -> Result<()> {
    let stats = &report.stats;
    let mut out = stdout();

    execute!(
        out,
        SetForegroundColor(Color::Cyan),
        Print("REBOUND SOAK RUN\n"),
        ResetColor
    )?;
    execute!(
        out,
        Print(format!(
            "Seed: {}  Ticks: {}  Frames: {}\n",
            report.seed, stats.ticks, report.frames
        ))
    )?;
    execute!(
        out,
        SetForegroundColor(Color::Yellow),
        Print(format!(
            "Matches: {}  (player {} - opponent {})\n",
            stats.matches_completed, stats.wins[0], stats.wins[1]
        )),
        ResetColor
    )?;
    execute!(
        out,
        Print(format!(
            "Points: {}  Bounces: {}  Final score: {} - {} ({:?})\n",
            stats.points,
            stats.bounces,
            report.final_score[0],
            report.final_score[1],
            report.final_phase
        ))
    )?;
    execute!(
        out,
        SetForegroundColor(Color::DarkGrey),
        Print(format!(
            "Sounds: bounce {}  scored {}  game over {}\n",
            report.sounds.bounce, report.sounds.scored, report.sounds.game_over
        )),
        ResetColor
    )?;

    if let Some(summary) = stats.play_time_summary() {
        execute!(
            out,
            SetForegroundColor(Color::Green),
            Print(format!("Simulated time: {summary}\n")),
            ResetColor
        )?;
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.watch { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, player = ?args.player, max_ticks = args.max_ticks, "harness starting");

    // Ctrl+C asks the loop to stop at the next tick boundary
    let quit = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&quit);
    ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
        .map_err(std::io::Error::other)?;

    if args.watch {
        execute!(stdout(), EnterAlternateScreen, Hide, Clear(ClearType::All))?;
    }

    let report = if args.realtime || args.watch {
        play(&args, seed, SystemClock::new(), quit)
    } else {
        play(&args, seed, VirtualClock::new(), quit)
    };

    if args.watch {
        execute!(stdout(), LeaveAlternateScreen, Show)?;
    }

    if args.json {
        let json = serde_json::to_string_pretty(&report).map_err(std::io::Error::other)?;
        println!("{json}");
    } else {
        print_summary(&report)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(player: PlayerMode) -> Args {
        Args {
            seed: Some(99),
            max_ticks: 2_000,
            matches: None,
            player,
            realtime: false,
            watch: false,
            json: true,
        }
    }

    #[test]
    fn test_quit_flag_produces_quit_control() {
        let quit = Arc::new(AtomicBool::new(false));
        let mut player = ScriptedPlayer::new(PlayerMode::Idle, 1, Arc::clone(&quit));

        assert!(!player.poll().unwrap().quit);
        quit.store(true, Ordering::Relaxed);
        assert!(player.poll().unwrap().quit);
    }

    #[test]
    fn test_wander_never_holds_both_directions() {
        let quit = Arc::new(AtomicBool::new(false));
        let mut player = ScriptedPlayer::new(PlayerMode::Wander, 5, quit);

        let mut moved = false;
        for _ in 0..500 {
            let controls = player.poll().unwrap();
            assert!(!(controls.up && controls.down));
            moved |= controls.direction().is_some();
        }
        assert!(moved);
    }

    #[test]
    fn test_ascii_court_scales_sprites() {
        let mut court = AsciiCourt::new();
        court.draw(&Sprite::new(
            SpriteKind::Ball,
            Rect::new(COURT_WIDTH - BALL_SIZE, 0, BALL_SIZE, BALL_SIZE),
        ));

        let lines: Vec<String> = court.lines().collect();
        assert_eq!(lines.len(), FIELD_HEIGHT);
        assert!(lines[0].ends_with('●'));
        assert_eq!(lines[1].chars().nth(FIELD_WIDTH / 2), Some(' '));
        assert_eq!(lines[2].chars().nth(FIELD_WIDTH / 2), Some('┊'));
    }

    #[test]
    fn test_ascii_court_skips_ball_outside_court() {
        let mut court = AsciiCourt::new();
        court.draw(&Sprite::new(
            SpriteKind::Ball,
            Rect::new(-BALL_SIZE - 2, 100, BALL_SIZE, BALL_SIZE),
        ));

        assert!(court.lines().all(|line| !line.contains('●')));
    }

    #[test]
    fn test_virtual_run_respects_tick_budget() {
        let quit = Arc::new(AtomicBool::new(false));
        let report = play(&args(PlayerMode::Wander), 99, VirtualClock::new(), quit);

        assert_eq!(report.stats.ticks, 2_000);
        assert_eq!(report.frames, 2_000);
        assert_eq!(report.sounds.bounce, u64::from(report.stats.bounces));
    }

    #[test]
    fn test_preset_quit_stops_after_one_tick() {
        let quit = Arc::new(AtomicBool::new(true));
        let report = play(&args(PlayerMode::Idle), 99, VirtualClock::new(), quit);

        assert_eq!(report.stats.ticks, 1);
        assert_eq!(report.final_phase, Phase::Idle);
    }
}
