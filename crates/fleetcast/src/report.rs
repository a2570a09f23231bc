use chrono::Utc;
use fleetcast_core::format::{format_currency, format_units};
use fleetcast_core::{Artifact, Forecast, GrowthRate, Palette};
use serde::Serialize;

/// Display strings for one forecast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastCard {
    pub year: u16,
    pub model: String,
    pub region: String,
    pub heading: String,
    pub volume: String,
    pub revenue: String,
    pub caption: String,
    pub growth_note: String,
}

impl ForecastCard {
    #[must_use]
    pub fn from_forecast(forecast: &Forecast) -> Self {
        let inputs = &forecast.inputs;
        let year = inputs.year().get();
        let growth_note = match forecast.growth {
            GrowthRate::Listed { multiplier } => format!("growth x{multiplier:.3}/yr"),
            GrowthRate::Fallback { multiplier } => {
                format!("growth x{multiplier:.3}/yr (default, region not in growth table)")
            }
        };
        Self {
            year,
            model: inputs.model_name().to_string(),
            region: inputs.region().to_string(),
            heading: format!("{year} FORECAST: {}", inputs.model_name().to_uppercase()),
            volume: format_units(forecast.result.volume),
            revenue: format_currency(forecast.result.revenue),
            caption: format!(
                "*Combined outlook: spec engineering + {} market trend.",
                inputs.region()
            ),
            growth_note,
        }
    }
}

#[must_use]
pub fn now_utc_iso() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Plain-text card.
#[must_use]
pub fn render_text(card: &ForecastCard) -> String {
    let mut text = String::new();
    text.push_str(&card.heading);
    text.push('\n');
    text.push_str(&"=".repeat(card.heading.chars().count()));
    text.push('\n');
    text.push_str(&format!("  PREDICTED VOLUME   {}\n", card.volume));
    text.push_str(&format!("  EXPECTED REVENUE   {}\n", card.revenue));
    text.push_str(&format!("  {}\n", card.growth_note));
    text.push_str(&card.caption);
    text.push('\n');
    text
}

/// One row per year, for `--trend`.
#[must_use]
pub fn render_trend_text(cards: &[ForecastCard]) -> String {
    let Some(first) = cards.first() else {
        return String::new();
    };
    let mut text = format!("{} / {} outlook\n", first.model, first.region);
    text.push_str(&format!("{:<6} {:>20} {:>22}\n", "YEAR", "VOLUME", "REVENUE"));
    for card in cards {
        text.push_str(&format!(
            "{:<6} {:>20} {:>22}\n",
            card.year, card.volume, card.revenue
        ));
    }
    text.push_str(&first.caption);
    text.push('\n');
    text
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtifactRef {
    pub path: String,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForecastEntry<'a> {
    pub card: ForecastCard,
    pub forecast: &'a Forecast,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForecastDocument<'a> {
    pub status: &'static str,
    pub generated_at: String,
    pub artifact: ArtifactRef,
    pub forecasts: Vec<ForecastEntry<'a>>,
}

impl<'a> ForecastDocument<'a> {
    #[must_use]
    pub fn new(artifact: &Artifact, forecasts: &'a [Forecast]) -> Self {
        Self {
            status: "ok",
            generated_at: now_utc_iso(),
            artifact: ArtifactRef {
                path: artifact.path.display().to_string(),
                sha256: artifact.sha256.clone(),
            },
            forecasts: forecasts
                .iter()
                .map(|forecast| ForecastEntry {
                    card: ForecastCard::from_forecast(forecast),
                    forecast,
                })
                .collect(),
        }
    }
}

fn html_escape(value: &str) -> String {
    v_htmlescape::escape(value).to_string()
}

/// Standalone HTML page, one card per forecast, coloured from the artifact
/// palette.
#[must_use]
pub fn render_html(cards: &[ForecastCard], palette: &Palette) -> String {
    let mut html = String::new();

    html.push_str(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"utf-8\">\n  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n  <title>Strategic Forecast</title>\n",
    );
    html.push_str(&format!(
        "  <style>\n    body {{ background-color: {bg}; color: {primary}; font-family: sans-serif; margin: 24px; }}\n    .result-card {{ background-color: white; padding: 30px; border-radius: 15px; border: 2px solid {primary}; text-align: center; box-shadow: 0 4px 10px rgba(0,0,0,0.1); margin-bottom: 20px; }}\n    .tiles {{ display: flex; justify-content: space-around; }}\n    .tile {{ padding: 20px; border-radius: 10px; width: 45%; }}\n    .volume {{ background-color: {primary}; color: {bg}; }}\n    .revenue {{ background-color: {accent}; color: white; }}\n    .label {{ font-size: 11px; margin: 0; opacity: 0.8; }}\n    .caption {{ color: {secondary}; font-size: 11px; margin-top: 20px; font-style: italic; }}\n    .growth {{ color: {muted}; font-size: 11px; }}\n  </style>\n</head>\n<body>\n",
        bg = palette.background(),
        primary = palette.primary(),
        secondary = palette.secondary(),
        muted = palette.muted(),
        accent = palette.accent(),
    ));

    for card in cards {
        html.push_str("<section class=\"result-card\">\n");
        html.push_str(&format!("  <h2>{}</h2>\n", html_escape(&card.heading)));
        html.push_str("  <div class=\"tiles\">\n");
        html.push_str(&format!(
            "    <div class=\"tile volume\"><p class=\"label\">PREDICTED VOLUME</p><h2>{}</h2></div>\n",
            html_escape(&card.volume)
        ));
        html.push_str(&format!(
            "    <div class=\"tile revenue\"><p class=\"label\">EXPECTED REVENUE</p><h2>{}</h2></div>\n",
            html_escape(&card.revenue)
        ));
        html.push_str("  </div>\n");
        html.push_str(&format!(
            "  <p class=\"growth\">{}</p>\n",
            html_escape(&card.growth_note)
        ));
        html.push_str(&format!(
            "  <p class=\"caption\">{}</p>\n",
            html_escape(&card.caption)
        ));
        html.push_str("</section>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}
