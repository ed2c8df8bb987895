//! Plain-text rendering of view models for the terminal.

use healthcard_model::{Card, FieldValue, FormValues, LineStyle, ListView, ModuleSchema, StatTile};
use std::fmt::Write;

const INDENT: &str = "      ";

/// The list as text, one block per card.
pub fn list_text(view: &ListView) -> String {
    if view.empty_state_visible || view.is_empty() {
        return format!("No {} records found.\n", view.module.replace('_', " "));
    }
    let mut out = String::new();
    for card in &view.cards {
        out.push_str(&card_text(card));
        out.push('\n');
    }
    out
}

pub fn card_text(card: &Card) -> String {
    let mut out = format!("#{:<5}{}", card.id.to_string(), card.title);
    if let Some(badge) = &card.badge {
        let _ = write!(out, " [{}]", badge.text);
    }
    for tag in &card.tags {
        let _ = write!(out, " [{}]", tag.text);
    }
    out.push('\n');

    if let Some(subtitle) = &card.subtitle {
        let _ = writeln!(out, "{INDENT}{subtitle}");
    }
    for line in &card.lines {
        let marker = match line.style {
            LineStyle::Warning => "! ",
            LineStyle::Highlight => "* ",
            LineStyle::Normal | LineStyle::Muted => "",
        };
        match &line.label {
            Some(label) => {
                let _ = writeln!(out, "{INDENT}{marker}{label}: {}", line.value);
            }
            None => {
                let _ = writeln!(out, "{INDENT}{marker}{}", line.value);
            }
        }
    }

    let mut chips = card.chips.clone();
    chips.extend(card.chip_overflow.clone());
    if !chips.is_empty() {
        let _ = writeln!(out, "{INDENT}{}", chips.join(", "));
    } else if let Some(placeholder) = &card.chips_placeholder {
        let _ = writeln!(out, "{INDENT}{placeholder}");
    }
    for link in &card.links {
        let _ = writeln!(out, "{INDENT}{}: {}", link.label, link.href);
    }
    out
}

/// `Label: value` pairs on one line.
pub fn stats_text(tiles: &[StatTile]) -> String {
    if tiles.is_empty() {
        return "No stats available.\n".to_string();
    }
    let parts: Vec<String> = tiles
        .iter()
        .map(|t| format!("{}: {}", t.label, t.value))
        .collect();
    format!("{}\n", parts.join(" | "))
}

/// Every field of the form in schema order, skipping blanks.
pub fn form_text(title: &str, schema: &ModuleSchema, form: &FormValues) -> String {
    let mut out = format!("{title}\n");
    for field in schema.fields {
        let value = match form.get(field.name) {
            Some(FieldValue::Text(s)) if !s.trim().is_empty() => s.clone(),
            Some(FieldValue::Flag(b)) => if *b { "Yes" } else { "No" }.to_string(),
            Some(FieldValue::List(items)) if !items.is_empty() => items.join(", "),
            _ => continue,
        };
        let _ = writeln!(out, "  {}: {value}", field.label);
    }
    for attachment in form.attachments() {
        let _ = writeln!(out, "  Document: {}", attachment.file_name);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthcard_model::{Allergy, Record, render_list};
    use serde_json::json;

    fn allergies(value: serde_json::Value) -> Vec<Allergy> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn empty_list_says_so() {
        let view = render_list::<Allergy>(&[]);
        assert_eq!(list_text(&view), "No allergy records found.\n");
    }

    #[test]
    fn cards_show_title_badge_and_lines() {
        let records = allergies(json!([
            {"id": 3, "allergen": "Peanuts", "severity": "Severe", "reaction": "Hives"}
        ]));
        let text = list_text(&render_list(&records));

        assert!(text.starts_with("#3    Peanuts [Severe]"), "{text}");
        assert!(text.contains("Hives"), "{text}");
    }

    #[test]
    fn stats_join_on_one_line() {
        let tiles = vec![StatTile::new("Total", 4), StatTile::new("Overdue", 1)];
        assert_eq!(stats_text(&tiles), "Total: 4 | Overdue: 1\n");
        assert_eq!(stats_text(&[]), "No stats available.\n");
    }

    #[test]
    fn form_skips_blank_fields() {
        let records = allergies(json!([{"id": 1, "allergen": "Dust", "category": "Environmental"}]));
        let form = records[0].to_form();
        let text = form_text("View Allergy", Allergy::schema(), &form);

        assert!(text.starts_with("View Allergy\n"));
        assert!(text.contains("  Allergen: Dust\n"));
        assert!(text.contains("  Active: Yes\n"));
        assert!(!text.contains("Reaction"));
    }
}
