//! Interactive forecast form.
//!
//! Elm-style: [`FormModel::update`] applies a [`Msg`] and returns a [`Cmd`],
//! [`FormModel::view`] renders the current state as styled lines. Neither
//! touches the terminal; `session` owns I/O.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fleetcast_core::{ForecastContext, ForecastInputs};

use crate::options::Choices;
use crate::report::ForecastCard;

/// Form fields in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Model,
    Region,
    Year,
    Fuel,
    Transmission,
    Engine,
}

impl Field {
    pub const ALL: [Self; 6] = [
        Self::Model,
        Self::Region,
        Self::Year,
        Self::Fuel,
        Self::Transmission,
        Self::Engine,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Model => "Series",
            Self::Region => "Target Market",
            Self::Year => "Forecast Year",
            Self::Fuel => "Fuel Technology",
            Self::Transmission => "Transmission",
            Self::Engine => "Engine Size (L)",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Model => 0,
            Self::Region => 1,
            Self::Year => 2,
            Self::Fuel => 3,
            Self::Transmission => 4,
            Self::Engine => 5,
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    #[must_use]
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    FocusNext,
    FocusPrev,
    SelectNext,
    SelectPrev,
    Submit,
    Quit,
}

impl Msg {
    #[must_use]
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(Self::Quit),
                _ => None,
            };
        }
        match key.code {
            KeyCode::Down | KeyCode::Tab => Some(Self::FocusNext),
            KeyCode::Up | KeyCode::BackTab => Some(Self::FocusPrev),
            KeyCode::Right | KeyCode::Char(' ') => Some(Self::SelectNext),
            KeyCode::Left => Some(Self::SelectPrev),
            KeyCode::Enter => Some(Self::Submit),
            KeyCode::Esc | KeyCode::Char('q') => Some(Self::Quit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmd {
    None,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormStatus {
    Idle,
    Ready(ForecastCard),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Title,
    Hint,
    Field,
    Focused,
    Result,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub style: LineStyle,
    pub text: String,
}

impl Line {
    fn new(style: LineStyle, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }
}

pub struct FormModel<'a> {
    context: &'a ForecastContext,
    choices: Choices,
    selected: [usize; 6],
    focus: Field,
    status: FormStatus,
}

impl<'a> FormModel<'a> {
    #[must_use]
    pub fn new(context: &'a ForecastContext) -> Self {
        Self {
            context,
            choices: Choices::from_context(context),
            selected: [0; 6],
            focus: Field::Model,
            status: FormStatus::Idle,
        }
    }

    #[must_use]
    pub fn focus(&self) -> Field {
        self.focus
    }

    #[must_use]
    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    fn option_count(&self, field: Field) -> usize {
        match field {
            Field::Model => self.choices.models.len(),
            Field::Region => self.choices.regions.len(),
            Field::Year => self.choices.years.len(),
            Field::Fuel => self.choices.fuels.len(),
            Field::Transmission => self.choices.transmissions.len(),
            Field::Engine => self.choices.engine_sizes.len(),
        }
    }

    /// Display value of `field`'s current selection.
    #[must_use]
    pub fn value(&self, field: Field) -> String {
        let idx = self.selected[field.index()];
        let value = match field {
            Field::Model => self.choices.models.get(idx).cloned(),
            Field::Region => self.choices.regions.get(idx).cloned(),
            Field::Year => self.choices.years.get(idx).map(ToString::to_string),
            Field::Fuel => self.choices.fuels.get(idx).map(ToString::to_string),
            Field::Transmission => self.choices.transmissions.get(idx).map(ToString::to_string),
            Field::Engine => self.choices.engine_sizes.get(idx).map(ToString::to_string),
        };
        value.unwrap_or_default()
    }

    /// Move the selection of `field` to the option displayed as `value`.
    /// Returns false if no option matches.
    pub fn select(&mut self, field: Field, value: &str) -> bool {
        let previous = self.selected[field.index()];
        for idx in 0..self.option_count(field) {
            self.selected[field.index()] = idx;
            if self.value(field) == value {
                self.status = FormStatus::Idle;
                return true;
            }
        }
        self.selected[field.index()] = previous;
        false
    }

    #[must_use]
    pub fn current_inputs(&self) -> ForecastInputs {
        let idx = |field: Field| self.selected[field.index()];
        ForecastInputs::new(
            self.value(Field::Model),
            self.value(Field::Region),
            self.choices.years[idx(Field::Year)],
            self.choices.fuels[idx(Field::Fuel)],
            self.choices.transmissions[idx(Field::Transmission)],
            self.choices.engine_sizes[idx(Field::Engine)],
        )
    }

    fn cycle(&mut self, forward: bool) {
        let count = self.option_count(self.focus);
        if count == 0 {
            return;
        }
        let slot = &mut self.selected[self.focus.index()];
        *slot = if forward {
            (*slot + 1) % count
        } else {
            (*slot + count - 1) % count
        };
        // A changed selection invalidates the shown result.
        self.status = FormStatus::Idle;
    }

    fn submit(&mut self) {
        self.status = match self.context.forecast(&self.current_inputs()) {
            Ok(forecast) => {
                tracing::info!(
                    target: "fleetcast.form",
                    model = %forecast.inputs.model_name(),
                    region = %forecast.inputs.region(),
                    year = forecast.inputs.year().get(),
                    volume = forecast.result.volume,
                    revenue = forecast.result.revenue,
                    "forecast generated"
                );
                FormStatus::Ready(ForecastCard::from_forecast(&forecast))
            }
            Err(error) => {
                tracing::warn!(target: "fleetcast.form", error = %error, "forecast rejected");
                FormStatus::Failed(error.to_string())
            }
        };
    }

    pub fn update(&mut self, msg: Msg) -> Cmd {
        match msg {
            Msg::FocusNext => self.focus = self.focus.next(),
            Msg::FocusPrev => self.focus = self.focus.prev(),
            Msg::SelectNext => self.cycle(true),
            Msg::SelectPrev => self.cycle(false),
            Msg::Submit => self.submit(),
            Msg::Quit => return Cmd::Quit,
        }
        Cmd::None
    }

    #[must_use]
    pub fn view(&self) -> Vec<Line> {
        let mut lines = vec![
            Line::new(LineStyle::Title, "Strategic Planning Cockpit"),
            Line::new(LineStyle::Hint, "Spec intelligence + regional growth trend"),
            Line::new(LineStyle::Hint, ""),
        ];

        for field in Field::ALL {
            let value = self.value(field);
            if field == self.focus {
                lines.push(Line::new(
                    LineStyle::Focused,
                    format!("> {:<16} < {value} >", field.label()),
                ));
            } else {
                lines.push(Line::new(
                    LineStyle::Field,
                    format!("  {:<16}   {value}", field.label()),
                ));
            }
        }
        lines.push(Line::new(LineStyle::Hint, ""));

        match &self.status {
            FormStatus::Idle => lines.push(Line::new(
                LineStyle::Hint,
                "Press Enter to generate the strategic forecast.",
            )),
            FormStatus::Ready(card) => {
                lines.push(Line::new(LineStyle::Title, card.heading.clone()));
                lines.push(Line::new(
                    LineStyle::Result,
                    format!("  PREDICTED VOLUME   {}", card.volume),
                ));
                lines.push(Line::new(
                    LineStyle::Result,
                    format!("  EXPECTED REVENUE   {}", card.revenue),
                ));
                lines.push(Line::new(LineStyle::Hint, format!("  {}", card.growth_note)));
                lines.push(Line::new(LineStyle::Hint, card.caption.clone()));
            }
            FormStatus::Failed(message) => {
                lines.push(Line::new(LineStyle::Error, format!("error: {message}")));
            }
        }

        lines.push(Line::new(LineStyle::Hint, ""));
        lines.push(Line::new(
            LineStyle::Hint,
            "Up/Down field  Left/Right value  Enter forecast  q quit",
        ));
        lines
    }
}
