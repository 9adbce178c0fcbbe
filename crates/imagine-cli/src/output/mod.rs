use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
///
/// Tables show arrays of records one row per record with every field as a
/// column, and single records as `field | value` pairs.
pub fn render<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
        OutputFormat::Table => match serde_json::to_value(value)? {
            Value::Array(items) => Ok(record_table(&items, None)),
            Value::Object(map) => {
                let rows = map
                    .into_iter()
                    .map(|(key, value)| vec![key, cell(&value)])
                    .collect::<Vec<_>>();
                Ok(table::render_table(&["field", "value"], &rows, table_options()))
            }
            scalar => Ok(cell(&scalar)),
        },
    }
}

/// Render a list, restricting table output to `columns`. JSON formats keep
/// every field.
pub fn render_rows<T: Serialize>(
    items: &[T],
    columns: &[&str],
    format: OutputFormat,
) -> anyhow::Result<String> {
    if format != OutputFormat::Table {
        return render(items, format);
    }
    let values = items
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(record_table(&values, Some(columns)))
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

pub fn output_rows<T: Serialize>(
    items: &[T],
    columns: &[&str],
    format: OutputFormat,
) -> anyhow::Result<()> {
    let rendered = render_rows(items, columns, format)?;
    println!("{rendered}");
    Ok(())
}

/// Print the empty-state message for tables, or `[]` for machine formats.
pub fn output_empty(message: &str, format: OutputFormat) {
    match format {
        OutputFormat::Table => println!("{message}"),
        OutputFormat::Json | OutputFormat::Raw => println!("[]"),
    }
}

/// Print a section heading between tables. Machine formats get none.
pub fn heading(title: &str, format: OutputFormat) {
    if format == OutputFormat::Table {
        println!("\n{title}");
    }
}

fn table_options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn record_table(items: &[Value], columns: Option<&[&str]>) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }
    if !items.iter().all(Value::is_object) {
        let rows = items.iter().map(|item| vec![cell(item)]).collect::<Vec<_>>();
        return table::render_table(&["value"], &rows, table_options());
    }

    let headers: Vec<String> = match columns {
        Some(columns) => columns.iter().map(ToString::to_string).collect(),
        None => {
            let mut keys = Vec::<String>::new();
            for key in items.iter().filter_map(Value::as_object).flat_map(|m| m.keys()) {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
            keys
        }
    };

    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| map.get(header).map_or_else(|| String::from("-"), cell))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    table::render_table(&header_refs, &rows, table_options())
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        Value::Array(items) if items.iter().all(|item| !item.is_object() && !item.is_array()) => {
            items.iter().map(cell).collect::<Vec<_>>().join(", ")
        }
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(map) if map.is_empty() => String::from("-"),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}
