//! HTML rendering of view models.
//!
//! Every interpolated value is escaped. Actions are emitted as
//! `data-action`/`data-id` attributes for the host page to bind; no inline
//! handlers are produced.

use crate::view::{Action, Badge, Card, CardLine, LineStyle, ListView, StatTile};
use std::fmt::Write;

/// Escapes `&`, `<`, `>`, `"` and `'`.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders a module's list container, including its empty-state element.
pub fn list_html(view: &ListView) -> String {
    let module = escape(view.module);
    let mut html = String::new();
    let display = if view.empty_state_visible { "block" } else { "none" };
    let _ = writeln!(
        html,
        r#"<div class="empty-state" data-module="{module}" style="display: {display}"></div>"#
    );
    let _ = writeln!(html, r#"<div class="row" data-module="{module}">"#);
    for card in &view.cards {
        html.push_str(&card_html(card));
    }
    html.push_str("</div>\n");
    html
}

/// Renders a single card.
pub fn card_html(card: &Card) -> String {
    let mut html = String::new();
    let id = card.id;

    let _ = writeln!(html, r#"<div class="col-md-6 mb-3" data-id="{id}">"#);
    html.push_str("<div class=\"card\"><div class=\"card-body\">\n");
    html.push_str("<div class=\"d-flex justify-content-between align-items-start mb-2\">\n<div>");
    let _ = write!(html, r#"<h5 class="mb-0">{}</h5>"#, escape(&card.title));
    if let Some(subtitle) = &card.subtitle {
        let _ = write!(html, r#"<small class="text-muted">{}</small>"#, escape(subtitle));
    }
    for tag in &card.tags {
        html.push_str(&badge_html(tag));
    }
    html.push_str("</div>");
    if let Some(badge) = &card.badge {
        html.push_str(&badge_html(badge));
    }
    html.push_str("\n</div>\n");

    for line in &card.lines {
        html.push_str(&line_html(line));
    }

    if !card.chips.is_empty() || card.chips_placeholder.is_some() {
        html.push_str("<div class=\"mb-3\">");
        for chip in &card.chips {
            let _ = write!(
                html,
                r#"<span class="badge bg-light text-dark border me-1">{}</span>"#,
                escape(chip)
            );
        }
        if card.chips.is_empty() {
            if let Some(placeholder) = &card.chips_placeholder {
                let _ = write!(
                    html,
                    r#"<span class="text-muted small">{}</span>"#,
                    escape(placeholder)
                );
            }
        }
        if let Some(more) = &card.chip_overflow {
            let _ = write!(html, r#"<small class="text-muted">{}</small>"#, escape(more));
        }
        html.push_str("</div>\n");
    }

    if !card.actions.is_empty() || !card.links.is_empty() {
        html.push_str("<div class=\"mt-3 d-flex gap-2\">");
        for (action, id) in card.bindings() {
            let _ = write!(
                html,
                r#"<button type="button" class="btn btn-sm {class}" data-action="{action}" data-id="{id}">{label}</button>"#,
                class = action_class(action),
                label = action_label(action),
            );
        }
        for link in &card.links {
            let _ = write!(
                html,
                r#"<a class="btn btn-sm btn-outline-info" href="{}">{}</a>"#,
                escape(&link.href),
                escape(&link.label)
            );
        }
        html.push_str("</div>\n");
    }

    html.push_str("</div></div>\n</div>\n");
    html
}

/// Renders a stats strip.
pub fn stats_html(tiles: &[StatTile]) -> String {
    let mut html = String::from("<div class=\"stats\">");
    for tile in tiles {
        let _ = write!(
            html,
            r#"<div class="stat"><span class="stat-value">{}</span><span class="stat-label">{}</span></div>"#,
            escape(&tile.value),
            escape(tile.label)
        );
    }
    html.push_str("</div>\n");
    html
}

fn badge_html(badge: &Badge) -> String {
    let text = escape(&badge.text);
    match (badge.tone.hex(), badge.tone.class()) {
        (Some(hex), _) => {
            format!(r#"<span class="badge" style="background-color: {hex}">{text}</span>"#)
        }
        (None, Some(class)) => format!(r#"<span class="badge bg-{class}">{text}</span>"#),
        (None, None) => format!(r#"<span class="badge">{text}</span>"#),
    }
}

fn line_html(line: &CardLine) -> String {
    let class = match line.style {
        LineStyle::Normal => "mb-2",
        LineStyle::Muted => "text-muted small",
        LineStyle::Warning => "text-warning small",
        LineStyle::Highlight => "text-primary small",
    };
    let value = escape(&line.value);
    match &line.label {
        Some(label) => format!(
            r#"<p class="{class}"><strong>{}:</strong> {value}</p>"#,
            escape(label)
        ) + "\n",
        None => format!(r#"<p class="{class}">{value}</p>"#) + "\n",
    }
}

fn action_class(action: Action) -> &'static str {
    match action {
        Action::Delete => "btn-outline-danger",
        Action::View => "btn-outline-secondary",
        Action::Edit => "btn-outline-primary",
    }
}

fn action_label(action: Action) -> &'static str {
    match action {
        Action::Delete => "Delete",
        Action::View => "View",
        Action::Edit => "Edit",
    }
}
