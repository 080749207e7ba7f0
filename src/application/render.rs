//! Render layer: plan state to markup
//!
//! Every function here is pure. Callers re-render the full view after each
//! mutation; there is no diffing.

use chrono::NaiveDate;
use itertools::Itertools;
use termtree::Tree;

use crate::domain::{Medication, PlanEntry, TreatmentPlan};

pub const EMPTY_SUMMARY: &str =
    "No medications added yet. Select a medication above and click \"Add Medication to Plan\".";
pub const EMPTY_HANDOUT: &str = "Add medications to see your treatment plan here.";

/// Both plan views, rendered together after each mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedViews {
    /// Editable summary list
    pub summary: String,
    /// Print-oriented handout
    pub handout: String,
}

impl RenderedViews {
    pub fn of(plan: &TreatmentPlan) -> Self {
        Self {
            summary: render_summary(plan),
            handout: render_handout(plan),
        }
    }
}

/// Escape text for use in element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

/// Compact summary list with a remove control per entry.
pub fn render_summary(plan: &TreatmentPlan) -> String {
    if plan.is_empty() {
        return format!(
            r#"<div class="empty-state">{}</div>"#,
            escape_html(EMPTY_SUMMARY)
        );
    }
    plan.iter().map(summary_card).join("\n")
}

fn summary_card(entry: &PlanEntry) -> String {
    let name = escape_html(&entry.name);
    let content = entry
        .fields()
        .into_iter()
        .map(|(label, value)| {
            format!(
                "      <div><strong>{label}:</strong> {}</div>",
                escape_html(value)
            )
        })
        .join("\n");

    format!(
        r#"<div class="med-card">
  <div class="med-card-header">
    <img src="{image}" alt="{name}" />
    <div class="med-card-name">{name}</div>
    {remove}
  </div>
  <div class="med-card-content">
{content}
  </div>
</div>"#,
        image = escape_html(&entry.image),
        remove = remove_button("remove-med", entry),
    )
}

/// Print-oriented handout with a remove control per entry.
pub fn render_handout(plan: &TreatmentPlan) -> String {
    if plan.is_empty() {
        return format!(
            r#"<div class="empty-handout"><p>{}</p></div>"#,
            escape_html(EMPTY_HANDOUT)
        );
    }
    plan.iter().map(handout_block).join("\n")
}

fn handout_block(entry: &PlanEntry) -> String {
    let name = escape_html(&entry.name);
    let blocks = entry
        .fields()
        .into_iter()
        .map(|(label, value)| {
            format!(
                r#"      <div class="handout-block">
        <div class="block-title">{label}:</div>
        <div class="block-body">{}</div>
      </div>"#,
                escape_html(value)
            )
        })
        .join("\n");

    format!(
        r#"<div class="handout-medication">
  <div class="handout-header">
    <img src="{image}" alt="{name}" />
    <div class="handout-content-right">
      <div class="handout-med">{name}</div>
{blocks}
    </div>
    {remove}
  </div>
</div>"#,
        image = escape_html(&entry.image),
        remove = remove_button("remove-med-handout", entry),
    )
}

fn remove_button(class: &str, entry: &PlanEntry) -> String {
    format!(
        r#"<button class="{class}" data-remove-id="{}" title="Remove">&times;</button>"#,
        entry.id
    )
}

/// Name and image preview of the current selection.
pub fn render_selection(selected: Option<&Medication>) -> String {
    let (name, image, alt) = match selected {
        Some(med) => (
            escape_html(&med.name),
            escape_html(&med.image),
            escape_html(&med.name),
        ),
        None => (String::new(), String::new(), "Medication image".to_string()),
    };
    format!(
        r#"<div class="selection"><img id="medImage" src="{image}" alt="{alt}" /><div id="medName">{name}</div></div>"#
    )
}

/// Standalone printable page: title, date and the handout.
pub fn render_document(plan: &TreatmentPlan, title: &str, date: NaiveDate) -> String {
    let title = escape_html(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8" />
<title>{title}</title>
<style>
  body {{ font-family: sans-serif; margin: 2rem; }}
  .handout-medication {{ position: relative; border-bottom: 1px solid #ccc; padding: 1rem 0; page-break-inside: avoid; }}
  .handout-header {{ display: flex; gap: 1rem; }}
  .handout-header img {{ width: 96px; height: 96px; object-fit: contain; }}
  .handout-med {{ font-size: 1.3rem; font-weight: bold; }}
  .block-title {{ font-weight: bold; margin-top: 0.5rem; }}
  @media print {{ .remove-med-handout {{ display: none; }} }}
</style>
</head>
<body>
<header>
  <h1>{title}</h1>
  <div id="today">{today}</div>
</header>
<main id="handoutContent">
{handout}
</main>
</body>
</html>
"#,
        today = date.format("%Y-%m-%d"),
        handout = render_handout(plan),
    )
}

/// Terminal view of the plan: one node per entry, one leaf per field.
pub fn plan_tree(plan: &TreatmentPlan) -> Tree<String> {
    let root = format!("Treatment plan ({} medications)", plan.len());
    Tree::new(root).with_leaves(plan.iter().map(|entry| {
        Tree::new(format!("{} [{}]", entry.name, entry.id)).with_leaves(
            entry
                .fields()
                .into_iter()
                .map(|(label, value)| format!("{label}: {value}")),
        )
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntryForm, EntryId};

    fn plan_of(entries: &[(u64, &str, EntryForm)]) -> TreatmentPlan {
        TreatmentPlan::new(
            entries
                .iter()
                .map(|(id, name, form)| {
                    PlanEntry::new(EntryId(*id), &Medication::new(*name, "img.png", &[]), form)
                })
                .collect(),
        )
    }

    #[test]
    fn given_empty_plan_when_rendering_then_shows_placeholders() {
        let plan = TreatmentPlan::default();

        assert!(render_summary(&plan).contains("No medications added yet."));
        assert!(render_summary(&plan).contains(r#"class="empty-state""#));
        assert!(render_handout(&plan).contains(EMPTY_HANDOUT));
        assert!(render_handout(&plan).contains(r#"class="empty-handout""#));
    }

    #[test]
    fn given_entry_when_rendering_summary_then_lists_only_filled_fields() {
        let plan = plan_of(&[(42, "Ibuprofen 200 mg", EntryForm::new("Take 1 tablet", "", "With food"))]);

        let html = render_summary(&plan);

        assert!(html.contains(r#"<div class="med-card-name">Ibuprofen 200 mg</div>"#));
        assert!(html.contains("<strong>Directions:</strong> Take 1 tablet"));
        assert!(html.contains("<strong>Notes:</strong> With food"));
        assert!(!html.contains("Instructions:"));
        assert!(html.contains(r#"data-remove-id="42""#));
    }

    #[test]
    fn given_entries_when_rendering_handout_then_keeps_insertion_order() {
        let plan = plan_of(&[
            (2, "Zeta", EntryForm::new("a", "", "")),
            (1, "Alpha", EntryForm::new("", "b", "")),
        ]);

        let html = render_handout(&plan);

        let zeta = html.find("Zeta").unwrap();
        let alpha = html.find("Alpha").unwrap();
        assert!(zeta < alpha);
        assert_eq!(html.matches(r#"class="handout-medication""#).count(), 2);
        assert_eq!(html.matches(r#"class="remove-med-handout""#).count(), 2);
    }

    #[test]
    fn given_markup_in_fields_when_rendering_then_escapes() {
        let plan = plan_of(&[(1, "A&B", EntryForm::new("<script>x</script>", "", ""))]);

        let html = render_handout(&plan);

        assert!(html.contains("A&amp;B"));
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn given_no_selection_when_rendering_selection_then_clears_display() {
        let html = render_selection(None);
        assert!(html.contains(r#"src="""#));
        assert!(html.contains(r#"alt="Medication image""#));

        let med = Medication::new("Metformin 500 mg", "images/metformin-500.png", &[]);
        let html = render_selection(Some(&med));
        assert!(html.contains("images/metformin-500.png"));
        assert!(html.contains(">Metformin 500 mg<"));
    }

    #[test]
    fn given_plan_when_rendering_document_then_embeds_date_and_handout() {
        let plan = plan_of(&[(1, "Amoxicillin 500 mg", EntryForm::new("Twice daily", "", ""))]);
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();

        let html = render_document(&plan, "Clinic <Handout>", date);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<div id="today">2024-03-09</div>"#));
        assert!(html.contains("<title>Clinic &lt;Handout&gt;</title>"));
        assert!(html.contains("Twice daily"));
    }

    #[test]
    fn given_plan_when_building_tree_then_one_leaf_per_field() {
        let plan = plan_of(&[(5, "Ibuprofen 200 mg", EntryForm::new("d", "i", ""))]);

        let text = plan_tree(&plan).to_string();

        assert!(text.starts_with("Treatment plan (1 medications)"));
        assert!(text.contains("Ibuprofen 200 mg [5]"));
        assert!(text.contains("Directions: d"));
        assert!(text.contains("Instructions: i"));
        assert!(!text.contains("Notes:"));
    }
}
