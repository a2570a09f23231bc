//! Terminal I/O for the interactive form.
//!
//! [`TerminalGuard`] enters raw mode and the alternate screen and restores
//! both on drop, including on panic.

use std::io::{self, Stdout, Write};
use std::sync::OnceLock;

use clap::Args;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use fleetcast_core::Palette;

use crate::cockpit::Cockpit;
use crate::error::Result;
use crate::form::{Cmd, FormModel, Line, LineStyle, Msg};

#[derive(Debug, Clone, Args)]
pub struct FormArgs {
    /// Draw without colours.
    #[arg(long)]
    pub no_color: bool,
}

pub struct TerminalGuard {
    stdout: Stdout,
    active: bool,
}

impl TerminalGuard {
    pub fn enter() -> Result<Self> {
        install_panic_hook();
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(error) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(error.into());
        }
        tracing::debug!(target: "fleetcast.session", "terminal session started");
        Ok(Self {
            stdout,
            active: true,
        })
    }

    fn restore(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        let _ = execute!(self.stdout, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = self.stdout.flush();
        tracing::debug!(target: "fleetcast.session", "terminal session restored");
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        self.restore();
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let mut stdout = io::stdout();
            let _ = execute!(stdout, Show, LeaveAlternateScreen);
            let _ = terminal::disable_raw_mode();
            previous(info);
        }));
    });
}

/// Parse `#RRGGBB`.
pub fn hex_color(value: &str) -> Option<Color> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(Color::Rgb {
        r: channel(0..2)?,
        g: channel(2..4)?,
        b: channel(4..6)?,
    })
}

/// Foreground colour and boldness for each line style.
#[derive(Debug, Clone)]
pub struct Theme {
    title: Option<Color>,
    hint: Option<Color>,
    focused: Option<Color>,
    result: Option<Color>,
    error: Option<Color>,
}

impl Theme {
    #[must_use]
    pub fn from_palette(palette: &Palette) -> Self {
        Self {
            title: hex_color(palette.primary()),
            hint: hex_color(palette.secondary()),
            focused: hex_color(palette.accent()),
            result: hex_color(palette.primary()),
            error: Some(Color::Red),
        }
    }

    #[must_use]
    pub fn plain() -> Self {
        Self {
            title: None,
            hint: None,
            focused: None,
            result: None,
            error: None,
        }
    }

    #[must_use]
    pub fn style(&self, style: LineStyle) -> (Option<Color>, bool) {
        match style {
            LineStyle::Title => (self.title, true),
            LineStyle::Hint => (self.hint, false),
            LineStyle::Field => (None, false),
            LineStyle::Focused => (self.focused, true),
            LineStyle::Result => (self.result, true),
            LineStyle::Error => (self.error, true),
        }
    }
}

fn draw(out: &mut impl Write, lines: &[Line], theme: &Theme) -> io::Result<()> {
    queue!(out, Clear(ClearType::All))?;
    for (row, line) in lines.iter().enumerate() {
        let row = u16::try_from(row + 1).unwrap_or(u16::MAX);
        queue!(out, MoveTo(2, row))?;
        let (color, bold) = theme.style(line.style);
        if let Some(color) = color {
            queue!(out, SetForegroundColor(color))?;
        }
        if bold {
            queue!(out, SetAttribute(Attribute::Bold))?;
        }
        queue!(out, Print(&line.text), SetAttribute(Attribute::Reset), ResetColor)?;
    }
    out.flush()
}

/// Run the form until the user quits.
pub fn run_form(cockpit: &Cockpit, args: FormArgs) -> Result<()> {
    let theme = if args.no_color {
        Theme::plain()
    } else {
        Theme::from_palette(cockpit.palette())
    };
    let mut model = FormModel::new(&cockpit.context);
    let mut guard = TerminalGuard::enter()?;

    loop {
        draw(&mut guard.stdout, &model.view(), &theme)?;
        let msg = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Msg::from_key(key),
            _ => None,
        };
        let Some(msg) = msg else {
            continue;
        };
        if model.update(msg) == Cmd::Quit {
            break;
        }
    }

    guard.restore();
    Ok(())
}
