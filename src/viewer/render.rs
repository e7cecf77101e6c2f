//! Terminal rendering of the viewer model

use super::state::ViewerState;

const FINISHED_MESSAGE: &str = "Draft has finished. Have a nice day!";

fn show(src: &str) -> &str {
    if src.is_empty() {
        "-"
    } else {
        src
    }
}

/// Draw the whole viewer as plain text
pub fn render_text(state: &ViewerState) -> String {
    let mut out = String::new();

    out.push_str("=== Draft Viewer ===\n");
    if let Some(link) = &state.viewer_link {
        out.push_str(&format!("Viewer link: {}\n", link));
    }

    out.push_str(&format!("Hero: {}\n", show(&state.hero.src)));
    for card in &state.cards {
        out.push_str(&format!("{:<9} {}\n", card.id, show(&card.src)));
    }

    if let Some(label) = &state.num_drafted {
        out.push_str(label);
        out.push('\n');
    }

    if !state.drafted.is_empty() {
        out.push_str("Drafted:\n");
        for item in &state.drafted {
            out.push_str(&format!("  {}\n", item.images.join("  ")));
        }
    }

    if let Some(chart) = &state.chart {
        out.push_str(&chart.to_text());
    }

    if state.finished {
        out.push_str(FINISHED_MESSAGE);
        out.push('\n');
    }

    out
}
