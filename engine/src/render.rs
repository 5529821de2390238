//! Panel markup rendering.
//!
//! Model output is untrusted text and must be neutralized before it is
//! interpolated into markup; [`escape_html`] is applied to every dynamic
//! value by construction, so no raw model text ever reaches a panel.

use std::fmt::Write;

use sage_types::ScanLevel;

use crate::present::Panel;

/// Escape `input` for safe interpolation into HTML text content.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn paragraphs(body: &str) -> String {
    let mut out = String::new();
    for line in body.lines() {
        let _ = writeln!(out, "                <p>{}</p>", escape_html(line));
    }
    out
}

/// Analysis panel: a heading plus the model output, one paragraph per line.
#[must_use]
pub(crate) fn analysis_panel(title: &str, body: &str) -> Panel {
    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        body {{ font-family: Arial, sans-serif; padding: 20px; }}
        .issue {{ margin-bottom: 20px; padding: 10px; border-left: 4px solid #f44336; }}
        .issue h3 {{ margin-top: 0; }}
    </style>
</head>
<body>
    <h2>{title}</h2>
    <div class="analysis">
{body}    </div>
</body>
</html>
"#,
        title = escape_html(title),
        body = paragraphs(body),
    );
    Panel::new(title, html)
}

/// Security-scan panel: like [`analysis_panel`] with severity styling and
/// the scan level shown in the header.
#[must_use]
pub(crate) fn security_panel(title: &str, level: &ScanLevel, body: &str) -> Panel {
    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        body {{
            font-family: Arial, sans-serif;
            padding: 20px;
            line-height: 1.6;
        }}
        .vulnerability {{
            margin-bottom: 20px;
            padding: 15px;
            border-left: 4px solid #ff4444;
            background-color: #fff5f5;
        }}
        .high {{ border-color: #ff4444; }}
        .medium {{ border-color: #ffbb33; }}
        .low {{ border-color: #00C851; }}
        .severity {{
            font-weight: bold;
            text-transform: uppercase;
            margin-bottom: 10px;
        }}
        .recommendation {{
            margin-top: 10px;
            padding: 10px;
            background-color: #f8f9fa;
        }}
    </style>
</head>
<body>
    <h2>{title}</h2>
    <p>Scan Level: {level}</p>
    <div class="analysis">
{body}    </div>
</body>
</html>
"#,
        title = escape_html(title),
        level = escape_html(level.as_str()),
        body = paragraphs(body),
    );
    Panel::new(title, html)
}

/// Wrap model documentation in a block comment for inline insertion, each
/// response line prefixed with ` * `.
#[must_use]
pub(crate) fn block_comment(documentation: &str) -> String {
    let body = documentation.split('\n').collect::<Vec<_>>().join("\n * ");
    format!("/**\n * {body}\n */\n")
}
