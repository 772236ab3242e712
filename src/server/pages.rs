use crate::models::{ComparisonResult, Stem};

/// Escape text for inclusion in HTML content or a quoted attribute
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

const STYLE: &str = r#"
    body { font-family: ui-sans-serif, system-ui, -apple-system, sans-serif; margin: 24px; color: #222; }
    ul.stems { columns: 3; }
    .panels { display: flex; gap: 16px; }
    .panel { flex: 1; text-align: center; }
    .panel img { max-width: 100%; border: 1px solid #ccc; }
    .missing { padding: 48px 0; background: #f4f4f4; color: #888; }
    .charts img { max-width: 48%; }
"#;

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <title>{title}</title>
  <style>{STYLE}</style>
</head>
<body>
{body}
</body>
</html>"#,
        title = escape_html(title),
    )
}

pub fn index_page(stems: &[Stem]) -> String {
    let body = if stems.is_empty() {
        "<h1>Detection comparison</h1>\n<p>No images found.</p>".to_string()
    } else {
        let items: String = stems
            .iter()
            .map(|stem| {
                format!(
                    "  <li><a href=\"/compare/{}\">{}</a></li>\n",
                    stem.url_encoded(),
                    escape_html(stem.as_str())
                )
            })
            .collect();
        format!("<h1>Detection comparison</h1>\n<ul class=\"stems\">\n{items}</ul>")
    };
    layout("Detection comparison", &body)
}

pub fn compare_page(result: &ComparisonResult) -> String {
    let stem = escape_html(result.stem.as_str());

    let panels: String = result
        .stats
        .iter()
        .map(|(pipeline, stats)| {
            let image = match result.image_urls.get(pipeline) {
                Some(url) => format!(
                    "<img src=\"{}\" alt=\"{} {}\"/>",
                    escape_html(url),
                    pipeline,
                    stem
                ),
                None => "<div class=\"missing\">No image</div>".to_string(),
            };
            format!(
                r#"  <div class="panel">
    <h2>{pipeline}</h2>
    {image}
    <p>Detections: {count}</p>
    <p>Confidence sum: {conf:.2}</p>
  </div>
"#,
                count = stats.count,
                conf = stats.confidence_sum,
            )
        })
        .collect();

    let body = format!(
        r#"<p><a href="/">&larr; All images</a></p>
<h1>{stem}</h1>
<div class="panels">
{panels}</div>
<div class="charts">
  <img src="{counts}" alt="Detections - {stem}"/>
  <img src="{conf}" alt="Confidence Sum - {stem}"/>
</div>"#,
        counts = escape_html(&result.counts_chart_url),
        conf = escape_html(&result.confidence_chart_url),
    );
    layout(&format!("Compare {}", result.stem), &body)
}
