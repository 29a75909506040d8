//! Crossterm front-end: turns key and mouse events into [`Input`]s and draws
//! the current screen as text.

use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::style::{Print, Stylize};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use slider_game::timer::format_seconds;
use slider_game::{Coord, Direction, Game, GameEvent, GameMode, GameType, Input, PlayState};
use tracing::debug;

const FRAME: Duration = Duration::from_millis(16);
const GRID_LEFT: u16 = 2;
const GRID_TOP: u16 = 6;
const CELL_WIDTH: u16 = 5;
const TITLE: &str = "Pierre's Artisan Tile Co.";

enum Action {
    Input(Input),
    Quit,
    Nothing,
}

/// Restores the terminal even when the loop bails out with an error.
struct TerminalGuard;

impl TerminalGuard {
    fn enter(stdout: &mut Stdout) -> Result<Self> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture, Hide)
            .context("failed to prepare terminal")?;
        Ok(TerminalGuard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, DisableMouseCapture, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

pub fn run(game: &mut Game) -> Result<()> {
    let mut stdout = io::stdout();
    let _guard = TerminalGuard::enter(&mut stdout)?;
    let mut last_frame = Instant::now();

    loop {
        let mut inputs = Vec::new();
        if event::poll(FRAME)? {
            loop {
                match map_event(game, event::read()?) {
                    Action::Input(input) => inputs.push(input),
                    Action::Quit => return Ok(()),
                    Action::Nothing => {}
                }
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        let now = Instant::now();
        let delta = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        game.frame(&inputs, delta);
        for event in game.drain_events() {
            give_feedback(&mut stdout, event)?;
        }
        draw(&mut stdout, game)?;
    }
}

fn give_feedback(stdout: &mut Stdout, event: GameEvent) -> Result<()> {
    debug!(?event, "game event");
    if matches!(event, GameEvent::MoveRejected | GameEvent::Failed { .. }) {
        queue!(stdout, Print('\x07'))?;
    }
    Ok(())
}

fn map_event(game: &Game, event: Event) -> Action {
    match event {
        Event::Key(key) => map_key(game, key),
        Event::Mouse(mouse) => map_mouse(game, mouse),
        _ => Action::Nothing,
    }
}

fn map_key(game: &Game, key: KeyEvent) -> Action {
    if key.code == KeyCode::Char('q')
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
    {
        return Action::Quit;
    }

    let input = match (game.game_mode(), key.code) {
        (GameMode::Menu, KeyCode::Char('f')) => Input::SetGameType(GameType::Freeplay),
        (GameMode::Menu, KeyCode::Char('c')) => Input::SetGameType(GameType::Challenge),
        (GameMode::Menu, KeyCode::Enter) => Input::SetGameMode(GameMode::Info),
        (GameMode::Info, KeyCode::Enter) => Input::SetGameMode(GameMode::Game),
        (GameMode::Info | GameMode::Game, KeyCode::Esc | KeyCode::Char('m')) => {
            Input::SetGameMode(GameMode::Menu)
        }
        (GameMode::Game, KeyCode::Up) => Input::Arrow(Direction::Up),
        (GameMode::Game, KeyCode::Down) => Input::Arrow(Direction::Down),
        (GameMode::Game, KeyCode::Left) => Input::Arrow(Direction::Left),
        (GameMode::Game, KeyCode::Right) => Input::Arrow(Direction::Right),
        (GameMode::Game, KeyCode::Char(' ') | KeyCode::Enter) => Input::StartOrReset,
        (GameMode::Game, KeyCode::Char('+') | KeyCode::Char('=')) => Input::ResizeGrid { grow: true },
        (GameMode::Game, KeyCode::Char('-')) => Input::ResizeGrid { grow: false },
        (GameMode::Game, KeyCode::Char(']')) => Input::CyclePuzzle { forward: true },
        (GameMode::Game, KeyCode::Char('[')) => Input::CyclePuzzle { forward: false },
        (GameMode::Game, KeyCode::Char('T')) if game.affordances().time_controls_visible => {
            Input::ChangeMaxTime { increase: true }
        }
        (GameMode::Game, KeyCode::Char('t')) if game.affordances().time_controls_visible => {
            Input::ChangeMaxTime { increase: false }
        }
        (GameMode::Game, KeyCode::Char('i')) => Input::ToggleInvertControls,
        (GameMode::Game, KeyCode::Char('n')) => Input::ToggleTileNumbers,
        _ => return Action::Nothing,
    };
    Action::Input(input)
}

fn map_mouse(game: &Game, mouse: MouseEvent) -> Action {
    if game.game_mode() != GameMode::Game {
        return Action::Nothing;
    }
    let cell = cell_under(game.grid().size(), mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => match cell {
            Some(cell) => Action::Input(Input::ClickTile(cell)),
            None => Action::Nothing,
        },
        MouseEventKind::Moved => Action::Input(Input::Hover(cell)),
        _ => Action::Nothing,
    }
}

fn cell_under(size: usize, column: u16, row: u16) -> Option<Coord> {
    if column < GRID_LEFT || row < GRID_TOP {
        return None;
    }
    let cell = Coord::new(
        usize::from((column - GRID_LEFT) / CELL_WIDTH),
        usize::from(row - GRID_TOP),
    );
    cell.in_bounds(size).then_some(cell)
}

fn draw(stdout: &mut Stdout, game: &Game) -> Result<()> {
    queue!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
    let lines = match game.game_mode() {
        GameMode::Menu => menu_lines(game),
        GameMode::Info => info_lines(),
        GameMode::Game => {
            draw_grid(stdout, game)?;
            game_lines(game)
        }
    };

    let grid_rows = if game.game_mode() == GameMode::Game {
        game.grid().size() as u16 + 1
    } else {
        0
    };
    for (row, line) in lines.iter().enumerate() {
        let row = row as u16;
        let row = if row < GRID_TOP { row } else { row + grid_rows };
        queue!(stdout, MoveTo(0, row), Print(line))?;
    }
    stdout.flush()?;
    Ok(())
}

fn menu_lines(game: &Game) -> Vec<String> {
    let selected = match game.game_type() {
        GameType::Freeplay => "Freeplay",
        GameType::Challenge => "Challenge",
    };
    vec![
        TITLE.to_string(),
        String::new(),
        format!("[f] Freeplay   [c] Challenge   selected: {}", selected),
        "[enter] Play   [q] Quit".to_string(),
    ]
}

fn info_lines() -> Vec<String> {
    vec![
        TITLE.to_string(),
        String::new(),
        "Slide tiles into the gap until the picture is whole again.".to_string(),
        "Arrow keys slide the tile behind the gap; clicking a tile next to it works too.".to_string(),
        "In a challenge the clock counts down, and reaching zero fails the attempt.".to_string(),
        String::new(),
        "[enter] Continue   [esc] Menu".to_string(),
    ]
}

fn game_lines(game: &Game) -> Vec<String> {
    let size = game.grid().size();
    let affordances = game.affordances();
    let mut lines = vec![
        format!("{}  ({:?})", TITLE, game.game_type()),
        format!("Size: {}x{}   Style: \"{}\"", size, size, game.puzzle().name),
        format!("Moves: {}   Time: {}", game.move_count(), game.timer().format_time(false)),
    ];
    if affordances.time_controls_visible {
        lines.push(format!(
            "Max time: {}  [t/T]",
            format_seconds(game.timer().max_challenge_time())
        ));
    } else {
        lines.push(String::new());
    }
    lines.push(format!("[space] {}", affordances.start_label));
    lines.push(String::new());

    if let Some(result) = game.result() {
        lines.extend(result.to_string().lines().map(str::to_string));
        lines.push(String::new());
    }
    let settings = if affordances.settings_enabled {
        "[+/-] size  [ [/] ] style  "
    } else {
        ""
    };
    lines.push(format!(
        "{}[i] invert ({})  [n] numbers  [m] menu  [q] quit",
        settings,
        if game.invert_controls() { "on" } else { "off" }
    ));
    lines
}

fn draw_grid(stdout: &mut Stdout, game: &Game) -> Result<()> {
    let grid = game.grid();
    let controller = game.controller();
    let show_blank = matches!(game.play_state(), PlayState::Solved | PlayState::Failed);

    for (cell, tile) in grid.cells() {
        let column = GRID_LEFT + cell.x as u16 * CELL_WIDTH;
        let row = GRID_TOP + cell.y as u16;
        queue!(stdout, MoveTo(column, row))?;

        if tile.is_blank() && !show_blank {
            continue;
        }
        let label = if controller.show_tile_numbers() {
            format!("{:^4}", tile.number())
        } else {
            let home = tile.home();
            let column_letter = char::from(b'a' + home.x as u8);
            format!("{:^4}", format!("{}{}", column_letter, home.y + 1))
        };

        let shaking = controller
            .effect_tile()
            .map_or(false, |id| grid.tile_id_at(cell) == id);
        if shaking {
            queue!(stdout, Print(label.on_red()))?;
        } else if tile.is_highlighted() {
            queue!(stdout, Print(label.reverse()))?;
        } else {
            queue!(stdout, Print(label.on_dark_grey()))?;
        }
    }
    Ok(())
}
