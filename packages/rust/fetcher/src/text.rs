//! `innerText`-style rendering of parsed HTML.
//!
//! Block-level elements become line breaks, whitespace inside a line is
//! collapsed, and non-content elements (scripts, styles, templates) are
//! dropped. Zoning works line by line, so keeping section headers on their
//! own lines matters more than exact browser fidelity.

use scraper::{ElementRef, Html, Node, Selector};

/// Elements whose contents are never rendered.
const SKIPPED: &[&str] = &[
    "head", "script", "style", "noscript", "template", "svg", "iframe",
];

/// Elements rendered on their own line(s).
const BLOCKS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "summary", "table",
    "tr", "ul",
];

/// Table cells are separated by a space rather than a line break.
const CELLS: &[&str] = &["td", "th"];

/// Render the `<body>` of a document (or the whole tree if it has none).
pub fn page_text(doc: &Html) -> String {
    let body = Selector::parse("body").expect("valid selector");
    match doc.select(&body).next() {
        Some(el) => inner_text(el),
        None => inner_text(doc.root_element()),
    }
}

/// Render one element's subtree as text.
pub fn inner_text(el: ElementRef<'_>) -> String {
    let mut raw = String::new();
    walk(el, &mut raw);

    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn walk(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => push_collapsed(out, text),
            Node::Element(element) => {
                let name = element.name();
                if SKIPPED.contains(&name) {
                    continue;
                }
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };

                let block = BLOCKS.contains(&name);
                if block {
                    out.push('\n');
                } else if CELLS.contains(&name) {
                    out.push(' ');
                }
                walk(child_el, out);
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

/// Append `text`, collapsing whitespace runs to a single space.
fn push_collapsed(out: &mut String, text: &str) {
    for c in text.chars() {
        if c.is_whitespace() {
            if !out.ends_with([' ', '\n']) && !out.is_empty() {
                out.push(' ');
            }
        } else {
            out.push(c);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(html: &str) -> String {
        page_text(&Html::parse_document(html))
    }

    #[test]
    fn blocks_become_lines() {
        let html = "<body><h2>Skills</h2><p>SQL and   Python</p><div>Benefits</div></body>";
        assert_eq!(render(html), "Skills\nSQL and Python\nBenefits");
    }

    #[test]
    fn inline_elements_stay_on_the_line() {
        let html = "<body><p>Know <em>Rust</em>, <a href='#'>Go</a> and <code>C++</code>.</p></body>";
        assert_eq!(render(html), "Know Rust, Go and C++.");
    }

    #[test]
    fn scripts_and_styles_are_dropped() {
        let html = "<html><head><style>p{}</style></head><body><script>alert(1)</script><p>Kafka</p><noscript>enable js</noscript></body></html>";
        assert_eq!(render(html), "Kafka");
    }

    #[test]
    fn line_breaks_and_table_cells() {
        let html = "<body><p>Line one<br>Line two</p><table><tr><td>Tool</td><td>Airflow</td></tr></table></body>";
        assert_eq!(render(html), "Line one\nLine two\nTool Airflow");
    }
}
