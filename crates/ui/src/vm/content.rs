use std::collections::{HashMap, HashSet};

/// Render lesson markdown to sanitized HTML for `dangerous_inner_html`.
#[must_use]
pub fn markdown_to_html(input: &str) -> String {
    let mut options = pulldown_cmark::Options::empty();
    options.insert(pulldown_cmark::Options::ENABLE_STRIKETHROUGH);
    options.insert(pulldown_cmark::Options::ENABLE_TABLES);
    options.insert(pulldown_cmark::Options::ENABLE_TASKLISTS);

    let parser = pulldown_cmark::Parser::new_ext(input, options);
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    sanitize_html(&html)
}

/// Lesson content and assistant replies come from the service; strip
/// anything beyond basic formatting before it reaches the webview.
#[must_use]
pub fn sanitize_html(html: &str) -> String {
    let tags: HashSet<&str> = [
        "p", "div", "span", "br", "em", "strong", "b", "i", "code", "pre", "blockquote", "ul",
        "ol", "li", "a", "h1", "h2", "h3", "table", "thead", "tbody", "tr", "th", "td",
    ]
    .into_iter()
    .collect();

    let mut attributes: HashMap<&str, HashSet<&str>> = HashMap::new();
    attributes.insert("a", ["href"].into_iter().collect());

    ammonia::Builder::new()
        .tags(tags)
        .tag_attributes(attributes)
        .clean(html)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{markdown_to_html, sanitize_html};

    #[test]
    fn markdown_renders_headings_and_lists() {
        let html = markdown_to_html("# Сәлемдесу\n\n- сәлем\n- қалайсыз");
        assert!(html.contains("<h1>"));
        assert!(html.contains("<li>"));
        assert!(html.contains("сәлем"));
    }

    #[test]
    fn scripts_are_stripped() {
        let html = sanitize_html("<p>ok</p><script>alert(1)</script>");
        assert!(html.contains("ok"));
        assert!(!html.contains("script"));
    }

    #[test]
    fn javascript_links_are_stripped() {
        let html = markdown_to_html("[Link](javascript:alert(1))");
        assert!(html.contains("Link"));
        assert!(!html.contains("javascript:"));
    }
}
