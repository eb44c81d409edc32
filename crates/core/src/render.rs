//! Plain-text views shared by the console and the CLI.

use crate::entity::EntityKind;
use crate::form::Form;
use serde_json::Value;

/// Text for one cell: strings unquoted, `null` empty, anything else as compact JSON.
pub fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Table of records with one column per bound field of `kind`.
pub fn records_table(kind: EntityKind, records: &[Value]) -> String {
    let fields = kind.fields();
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            fields
                .iter()
                .map(|f| record.get(f.as_str()).map(cell).unwrap_or_default())
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = fields.iter().map(|f| f.as_str().len()).collect();
    for row in &rows {
        for (width, text) in widths.iter_mut().zip(row) {
            *width = (*width).max(text.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = fields.iter().map(|f| f.as_str().to_owned()).collect();
    push_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    if rows.is_empty() {
        out.push_str(&format!("(no {kind} records)\n"));
    }
    out
}

/// `field: value` lines for every bound field of the form.
pub fn form_listing(form: &Form) -> String {
    let width = form
        .iter()
        .map(|(f, _)| f.as_str().len())
        .max()
        .unwrap_or(0);
    form.iter()
        .map(|(field, value)| format!("{:<width$} : {}\n", field.as_str(), cell(value)))
        .collect()
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(text, &width)| format!("{text:<width$}"))
        .collect();
    out.push_str(line.join(" | ").trim_end());
    out.push('\n');
}
