//! Terminal output: tracing setup and level charts.
//!
//! ## Log Levels
//!
//! - **INFO**: loading and index construction
//! - **DEBUG**: batch summaries, per-symbol index inserts
//! - **WARN**: skipped input rows

use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor, Stylize};
use std::io::{self, Write};
use std::sync::OnceLock;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: OnceLock<()> = OnceLock::new();

const BAR_WIDTH: usize = 40;

/// Installs the tracing subscriber. Only the first call has effect.
///
/// `RUST_LOG` overrides the default of `hsk_leveler=info`; `verbose` lowers
/// the default to `debug`.
pub fn init(verbose: bool) {
    INIT.get_or_init(|| {
        let default_directive = if verbose {
            "hsk_leveler=debug"
        } else {
            "hsk_leveler=info"
        };
        let filter = EnvFilter::builder()
            .with_default_directive(
                default_directive
                    .parse()
                    .unwrap_or_else(|_| LevelFilter::INFO.into()),
            )
            .from_env_lossy();

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(io::stderr).with_target(false))
            .try_init();
    });
}

// Easy levels green, hard ones red, unknown grey.
fn bar_color(position: usize, rows: usize, unknown: bool) -> Color {
    if unknown {
        return Color::DarkGrey;
    }
    match position * 3 / rows.max(1) {
        0 => Color::Green,
        1 => Color::Yellow,
        _ => Color::Red,
    }
}

/// Draws a horizontal bar chart, one row per label, scaled to the largest count.
/// Rows labelled "not in HSK" are drawn in grey.
pub fn render_chart<W: Write>(
    out: &mut W,
    title: &str,
    rows: &[(String, usize)],
) -> io::Result<()> {
    let total: usize = rows.iter().map(|(_, count)| count).sum();
    let largest = rows.iter().map(|(_, count)| *count).max().unwrap_or(0);
    let label_width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);

    queue!(out, Print(format!("{}\n", title.bold())))?;
    for (position, (label, count)) in rows.iter().enumerate() {
        let length = if largest == 0 {
            0
        } else {
            (count * BAR_WIDTH).div_ceil(largest)
        };
        let share = if total == 0 {
            0.0
        } else {
            *count as f64 * 100.0 / total as f64
        };
        let color = bar_color(position, rows.len(), label == "not in HSK");
        queue!(
            out,
            Print(format!("  {:<width$} ", label, width = label_width)),
            SetForegroundColor(color),
            Print("█".repeat(length)),
            ResetColor,
            Print(format!(" {} ({:.1}%)\n", count, share)),
        )?;
    }
    queue!(out, Print(format!("  total: {}\n", total)))?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_lists_every_row() {
        let rows = vec![
            ("HSK 1".to_string(), 4),
            ("HSK 2".to_string(), 1),
            ("not in HSK".to_string(), 0),
        ];
        let mut out = Vec::new();
        render_chart(&mut out, "Levels", &rows).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Levels"));
        assert!(text.contains("HSK 1"));
        assert!(text.contains(" 4 (80.0%)"));
        assert!(text.contains(" 0 (0.0%)"));
        assert!(text.contains("total: 5"));
        assert_eq!(text.matches('█').count(), 40 + 10);
    }

    #[test]
    fn test_chart_without_rows() {
        let mut out = Vec::new();
        render_chart(&mut out, "Empty", &[]).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("total: 0"));
    }

    #[test]
    fn test_init_twice() {
        init(false);
        init(true);
    }
}
