//! Terminal animation of how a SpanMap lays keys out in its slot array.
//!
//! Run with `cargo run --example anim`. `SPANMAP_ANIM_SPEED=2` plays twice as
//! fast; `SPANMAP_ANIM_ONCE=1` stops after one pass.

use spanmap::SpanMap;
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m\x1b[1m";
const RED: &str = "\x1b[31m\x1b[1m";
const RESET: &str = "\x1b[0m";

const MAP_LINE: usize = 3;
const STEPS_LINE: usize = 5;
const PARK_LINE: usize = 9;

struct Screen {
    out: io::Stdout,
    speed: f64,
}

impl Screen {
    fn clear(&mut self) -> io::Result<()> {
        write!(self.out, "\x1b[2J")
    }

    fn line(&mut self, line: usize, text: &str) -> io::Result<()> {
        write!(self.out, "\x1b[{line};0H\x1b[2K{text}\x1b[{PARK_LINE};0H")?;
        self.out.flush()
    }

    fn pause(&self, seconds: f64) {
        thread::sleep(Duration::from_secs_f64(seconds / self.speed));
    }
}

/// `[ 12 13 -- 11 ]`, with `highlight` colored when present.
fn render(map: &SpanMap<u64>, highlight: Option<(u64, &str)>) -> String {
    let mut out = String::from("[ ");
    for (_, slot) in map.slots() {
        match slot {
            Some((key, _)) => match highlight {
                Some((h, color)) if h == key => out.push_str(&format!("{color}{key:02}{RESET} ")),
                _ => out.push_str(&format!("{key:02} ")),
            },
            None => out.push_str("-- "),
        }
    }
    if map.capacity() == 0 {
        out.push_str("-- ");
    }
    out.push(']');
    out
}

fn step(done: bool, text: &str) -> String {
    if done {
        format!("[✓] {text}")
    } else {
        format!("{DIM}[ ]{RESET}{BOLD} {text}{RESET}")
    }
}

fn play(screen: &mut Screen) -> io::Result<()> {
    const FIRST: u64 = 11;
    const LAST: u64 = 26;
    const REMOVED: u64 = 13;
    const REUSED: u64 = 29;

    let steps = [
        format!("Set {} items starting at index {FIRST}", LAST - FIRST + 1),
        format!("Delete item at index {REMOVED}"),
        format!("Set item at index {REUSED}, where {REMOVED} used to be"),
    ];

    let mut map: SpanMap<u64> = SpanMap::new();
    screen.clear()?;
    screen.line(1, &format!("{BOLD}Visualization of how SpanMap stores items.{RESET}"))?;
    for (i, text) in steps.iter().enumerate() {
        screen.line(STEPS_LINE + i, &format!("{DIM}[ ] {text}{RESET}"))?;
    }
    screen.line(MAP_LINE, &format!("{DIM}{}{RESET}", render(&map, None)))?;
    screen.pause(1.0);

    screen.line(STEPS_LINE, &step(false, &steps[0]))?;
    for key in FIRST..=LAST {
        map.insert(key, key);
        screen.line(MAP_LINE, &render(&map, Some((key, GREEN))))?;
        screen.pause(0.5);
    }
    screen.line(MAP_LINE, &render(&map, None))?;
    screen.line(STEPS_LINE, &step(true, &steps[0]))?;

    screen.line(STEPS_LINE + 1, &step(false, &steps[1]))?;
    screen.line(MAP_LINE, &render(&map, Some((REMOVED, RED))))?;
    screen.pause(2.0);
    map.remove(REMOVED);
    screen.line(MAP_LINE, &render(&map, None))?;
    screen.line(STEPS_LINE + 1, &step(true, &steps[1]))?;
    screen.pause(1.0);

    screen.line(STEPS_LINE + 2, &step(false, &steps[2]))?;
    map.insert(REUSED, REUSED);
    screen.line(MAP_LINE, &render(&map, Some((REUSED, GREEN))))?;
    screen.pause(2.0);
    screen.line(MAP_LINE, &render(&map, None))?;
    screen.line(STEPS_LINE + 2, &step(true, &steps[2]))?;
    screen.pause(4.0);
    Ok(())
}

fn speed_from_env() -> f64 {
    match std::env::var("SPANMAP_ANIM_SPEED") {
        Ok(raw) => match raw.parse::<f64>() {
            Ok(speed) if speed > 0.0 && speed.is_finite() => speed,
            _ => {
                eprintln!("ignoring SPANMAP_ANIM_SPEED={raw:?}: expected a positive number");
                1.0
            }
        },
        Err(_) => 1.0,
    }
}

fn main() -> io::Result<()> {
    let mut screen = Screen {
        out: io::stdout(),
        speed: speed_from_env(),
    };
    let once = std::env::var_os("SPANMAP_ANIM_ONCE").is_some();

    loop {
        play(&mut screen)?;
        if once {
            return Ok(());
        }
    }
}
