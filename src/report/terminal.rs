//! Coloured terminal view of the dashboard surface.

use crate::models::Polarity;
use crate::surface::{layout::styled_text, slots, CloudLayout, SurfaceSnapshot};
use colored::{ColoredString, Colorize};

/// Render the whole dashboard as terminal text.
pub fn render_dashboard(snapshot: &SurfaceSnapshot) -> String {
    let mut out = String::new();

    for banner in &snapshot.banners {
        out.push_str(&format!("{} {}\n", "⚠".red().bold(), banner.message.as_str().red()));
    }
    if !snapshot.banners.is_empty() {
        out.push('\n');
    }

    out.push_str(&format!(
        "{} {}\n",
        "Year:  ".bold(),
        render_options(snapshot, slots::YEAR_SELECT)
    ));
    out.push_str(&format!(
        "{} {}\n\n",
        "Aspect:".bold(),
        render_options(snapshot, slots::ASPECT_SELECT)
    ));

    out.push_str(&format!(
        "📊 Total: {} | {} Positive: {} | {} Negative: {}\n\n",
        counter(snapshot, slots::TOTAL_COMPLAINTS),
        Polarity::Positive.emoji(),
        counter(snapshot, slots::POSITIVE_COUNT),
        Polarity::Negative.emoji(),
        counter(snapshot, slots::NEGATIVE_COUNT),
    ));

    for (polarity, slot) in [
        (Polarity::Positive, slots::POSITIVE_WORD_CLOUD),
        (Polarity::Negative, slots::NEGATIVE_WORD_CLOUD),
    ] {
        let heading = format!("{} words", polarity);
        out.push_str(&format!("{}\n", heading.as_str().bold().underline()));

        if let Some(layout) = snapshot.cloud(slot) {
            for line in render_cloud(layout) {
                out.push_str(&line);
                out.push('\n');
            }
        } else {
            let text = snapshot.text(slot).unwrap_or("-");
            out.push_str(&format!("{}\n", text.dimmed().italic()));
        }
        out.push('\n');
    }

    out
}

/// Render a cloud layout row by row in its accent colour.
pub fn render_cloud(layout: &CloudLayout) -> Vec<String> {
    if !colored::control::SHOULD_COLORIZE.should_colorize() {
        return layout.lines();
    }

    let rgb = parse_hex_color(&layout.color);
    let mut lines: Vec<String> = vec![String::new(); layout.rows()];
    let mut widths = vec![0usize; layout.rows()];

    for word in &layout.words {
        let text = styled_text(word);
        let pad = word.column.saturating_sub(widths[word.row]);
        lines[word.row].push_str(&" ".repeat(pad));
        widths[word.row] += pad + text.chars().count();

        let mut styled: ColoredString = match rgb {
            Some((r, g, b)) => text.as_str().truecolor(r, g, b),
            None => text.as_str().normal(),
        };
        if word.emphasis >= 1 {
            styled = styled.bold();
        }
        if word.rotation != 0.0 {
            styled = styled.italic();
        }
        lines[word.row].push_str(&styled.to_string());
    }

    lines
}

fn render_options(snapshot: &SurfaceSnapshot, slot: &str) -> String {
    match snapshot.options(slot) {
        Some((options, selected)) if !options.is_empty() => options
            .iter()
            .map(|o| {
                if selected == Some(o.value.as_str()) {
                    format!("[{}]", o.label).as_str().green().bold().to_string()
                } else {
                    o.label.clone()
                }
            })
            .collect::<Vec<_>>()
            .join("  "),
        _ => "(none)".dimmed().to_string(),
    }
}

fn counter(snapshot: &SurfaceSnapshot, slot: &str) -> String {
    snapshot.text(slot).unwrap_or("-").bold().to_string()
}

/// Parse `#RRGGBB` (or `RRGGBB`) into components.
pub fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let component = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((component(0)?, component(2)?, component(4)?))
}
