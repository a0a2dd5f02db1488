use crate::domain::Reading;

pub const DEFAULT_FORMATTER: &str = "table";

/// Renders one provider's output block.
pub trait Formatter {
    fn emit(&self, title: &str, location: &str, reading: &Reading) -> String;
}

/// Look up a formatter by its CLI name.
pub fn by_name(name: &str) -> Option<Box<dyn Formatter>> {
    match name {
        "table" => Some(Box::new(TableFormatter)),
        "plain" => Some(Box::new(PlainFormatter)),
        _ => None,
    }
}

/// The classic block output: provider banner, location, one `key: value`
/// line per present field.
pub struct PlainFormatter;

impl Formatter for PlainFormatter {
    fn emit(&self, title: &str, location: &str, reading: &Reading) -> String {
        let mut out = String::new();

        out.push_str(&format!("{title}:\n"));
        out.push_str("##########\n\n");
        out.push_str(&format!("{location}\n"));
        out.push_str("#########################\n");

        for (key, value) in reading.fields() {
            out.push_str(&format!("{key}: {value}\n"));
        }

        out.push_str("========================================\n\n");
        out
    }
}

/// Two-column box with the provider and location in the header row.
pub struct TableFormatter;

impl TableFormatter {
    fn rule(left: usize, right: usize) -> String {
        format!("+-{}-+-{}-+\n", "-".repeat(left), "-".repeat(right))
    }

    fn row(left: &str, right: &str, left_width: usize, right_width: usize) -> String {
        format!(
            "| {}{} | {}{} |\n",
            left,
            " ".repeat(left_width - left.chars().count()),
            right,
            " ".repeat(right_width - right.chars().count()),
        )
    }
}

impl Formatter for TableFormatter {
    fn emit(&self, title: &str, location: &str, reading: &Reading) -> String {
        let fields = reading.fields();

        let left_width = fields
            .iter()
            .map(|(key, _)| key.chars().count())
            .chain([title.chars().count()])
            .max()
            .unwrap_or(0);
        let right_width = fields
            .iter()
            .map(|(_, value)| value.chars().count())
            .chain([location.chars().count()])
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        out.push_str(&Self::rule(left_width, right_width));
        out.push_str(&Self::row(title, location, left_width, right_width));
        out.push_str(&Self::rule(left_width, right_width));

        for (key, value) in &fields {
            out.push_str(&Self::row(key, value, left_width, right_width));
        }

        if !fields.is_empty() {
            out.push_str(&Self::rule(left_width, right_width));
        }
        out.push('\n');

        out
    }
}
