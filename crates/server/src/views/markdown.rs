//! Markdown subset used by the generated advice.
//!
//! Every line is HTML escaped before any markup is added, so the model
//! output can never inject tags. Supported: `#` headings, `-`/`*` and
//! numbered lists, `**bold**`, `---` rules and plain paragraphs.

use super::layout::escape_html;

#[derive(Clone, Copy, PartialEq)]
enum List {
    Unordered,
    Ordered,
}

impl List {
    fn tag(self) -> &'static str {
        match self {
            Self::Unordered => "ul",
            Self::Ordered => "ol",
        }
    }
}

pub fn markdown_to_html(text: &str) -> String {
    let mut html = String::new();
    let mut open_list: Option<List> = None;

    for line in text.lines() {
        let line = line.trim();

        let item = list_item(line);
        let list = item.map(|(list, _)| list);
        if let Some(open) = open_list {
            if list != Some(open) {
                html.push_str(&format!("</{}>\n", open.tag()));
                open_list = None;
            }
        }

        if let Some((list, content)) = item {
            if open_list.is_none() {
                html.push_str(&format!("<{}>\n", list.tag()));
                open_list = Some(list);
            }
            html.push_str(&format!("<li>{}</li>\n", inline(content)));
        } else if line.is_empty() {
            continue;
        } else if let Some(heading) = heading(line) {
            html.push_str(&format!("<h4>{}</h4>\n", inline(heading)));
        } else if line == "---" || line == "***" {
            html.push_str("<hr>\n");
        } else {
            html.push_str(&format!("<p>{}</p>\n", inline(line)));
        }
    }

    if let Some(open) = open_list {
        html.push_str(&format!("</{}>\n", open.tag()));
    }

    html
}

fn list_item(line: &str) -> Option<(List, &str)> {
    if let Some(content) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return Some((List::Unordered, content));
    }

    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    line[digits..]
        .strip_prefix(". ")
        .or_else(|| line[digits..].strip_prefix(") "))
        .map(|content| (List::Ordered, content))
}

fn heading(line: &str) -> Option<&str> {
    let hashes = line.len() - line.trim_start_matches('#').len();
    if (1..=6).contains(&hashes) {
        line[hashes..].strip_prefix(' ')
    } else {
        None
    }
}

/// Escaped text with `**bold**` spans. An unpaired marker stays as text.
fn inline(text: &str) -> String {
    let escaped = escape_html(text);
    let parts: Vec<&str> = escaped.split("**").collect();
    if parts.len() < 3 {
        return escaped;
    }

    let last_marker_unpaired = parts.len() % 2 == 0;
    let mut html = String::with_capacity(escaped.len());
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            if last_marker_unpaired && i == parts.len() - 1 {
                html.push_str("**");
            } else if i % 2 == 1 {
                html.push_str("<strong>");
            } else {
                html.push_str("</strong>");
            }
        }
        html.push_str(part);
    }
    html
}
