//! Plain-text rendering of form sections for the shell.

use serde_json::Value;

use crate::errors::Result;
use crate::form::renderer::MemberView;
use crate::form::{CompositeView, Control, FormStore, RenderedField};

const EMPTY: &str = "-";

/// Renders every visible field of `section_id` as one line each, nested groups indented.
pub fn section_summary(store: &FormStore, section_id: &str) -> Result<String> {
    let fields = store.render_section(section_id)?;
    let mut lines = Vec::new();
    for field in &fields {
        push_field(&mut lines, field, 0);
    }
    Ok(lines.join("\n"))
}

fn push_field(lines: &mut Vec<String>, field: &RenderedField, depth: usize) {
    let indent = "  ".repeat(depth);
    let marker = if field.required { "*" } else { " " };
    match &field.control {
        Control::Group(children) => {
            lines.push(format!("{indent}{marker}{} [{}]", field.label, field.path));
            for child in children {
                push_field(lines, child, depth + 1);
            }
        }
        Control::Composite(CompositeView::Coupled(members)) => {
            lines.push(format!("{indent}{marker}{} [{}]", field.label, field.path));
            for member in members {
                lines.push(format!("{indent}    {}", member_line(member)));
            }
        }
        control => lines.push(format!(
            "{indent}{marker}{} [{}]: {}",
            field.label,
            field.path,
            control_value(control)
        )),
    }
}

fn member_line(member: &MemberView) -> String {
    let lock = if member.locked { " (locked)" } else { "" };
    format!("{} = {}{lock}", member.path.leaf(), value_text(&member.value))
}

fn or_empty(text: &str) -> String {
    if text.trim().is_empty() {
        EMPTY.to_string()
    } else {
        text.to_string()
    }
}

fn list(items: &[String]) -> String {
    if items.is_empty() {
        EMPTY.to_string()
    } else {
        items.join(", ")
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => EMPTY.to_string(),
        Value::String(text) => or_empty(text),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(value_text).collect();
            format!("[{}]", items.join(", "))
        }
        other => other.to_string(),
    }
}

pub(crate) fn control_value(control: &Control) -> String {
    match control {
        Control::Text(value) | Control::TextArea(value) | Control::Date(value) => or_empty(value),
        Control::SingleChoice { selected, .. } => or_empty(selected),
        Control::Checkboxes { checked, locked, .. } => {
            let lock = if *locked { " (locked)" } else { "" };
            format!("{}{lock}", list(checked))
        }
        Control::Tags(tags) => format!("[{}]", tags.join(", ")),
        Control::Cascading { main, sub, .. } => match (main.is_empty(), sub.is_empty()) {
            (true, _) => EMPTY.to_string(),
            (false, true) => main.clone(),
            (false, false) => format!("{main} / {sub}"),
        },
        Control::PercentageNote { percentage, details } => {
            let percentage = if percentage.is_empty() {
                EMPTY.to_string()
            } else {
                format!("{percentage}%")
            };
            if details.is_empty() {
                percentage
            } else {
                format!("{percentage} ({details})")
            }
        }
        Control::ChoiceWithOther { selected, details } => {
            if details.is_empty() {
                or_empty(selected)
            } else {
                format!("{}: {details}", or_empty(selected))
            }
        }
        Control::Group(children) => format!("{} field(s)", children.len()),
        Control::Composite(view) => composite_value(view),
    }
}

fn composite_value(view: &CompositeView) -> String {
    match view {
        CompositeView::Coupled(members) => format!("{} member(s)", members.len()),
        CompositeView::RoyaltySchedule {
            schemes,
            beneficiaries,
        } => format!("{schemes} scheme(s); beneficiaries: {}", list(beneficiaries)),
        CompositeView::Remittance(names) => format!("remittance to {}", list(names)),
        CompositeView::Contacts(count) => format!("{count} contact(s)"),
        CompositeView::ScanFile(label) => label.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_render_as_dash() {
        assert_eq!(control_value(&Control::Text(" ".into())), "-");
        assert_eq!(
            control_value(&Control::PercentageNote {
                percentage: "30".into(),
                details: "net".into()
            }),
            "30% (net)"
        );
        assert_eq!(value_text(&serde_json::json!(["a", "b"])), "[a, b]");
    }
}
