use std::fmt::Write;

use crate::dashboard::DashboardSnapshot;

const PLACEHOLDER: &str = "Loading...";

/// Label and value of each info box, in display order.
pub fn info_boxes(snapshot: &DashboardSnapshot) -> [(&'static str, &'static str, Option<&str>); 5] {
    [
        ("balance", "Balance (ETH)", snapshot.balance.as_deref()),
        ("block_number", "Block Number", snapshot.block_number.as_deref()),
        ("chain_id", "Chain ID", snapshot.chain_id.as_deref()),
        ("nonce", "Nonce", snapshot.nonce.as_deref()),
        ("gas_price", "Gas Price (Gwei)", snapshot.gas_price.as_deref()),
    ]
}

pub fn countdown_banner(snapshot: &DashboardSnapshot) -> Option<String> {
    match snapshot.next_fetch_in_secs {
        Some(secs) if !snapshot.loading && secs > 0 => {
            Some(format!("Next data fetch in {} seconds", secs))
        }
        _ => None,
    }
}

pub fn update_banner(snapshot: &DashboardSnapshot) -> Option<String> {
    (snapshot.update_count > 0).then(|| format!("Request #{} 🚀", snapshot.update_count))
}

/// Full HTML page for the dashboard.
pub fn render_dashboard(title: &str, snapshot: &DashboardSnapshot) -> String {
    let mut html = String::with_capacity(2048);
    let title = escape_html(title);

    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/static/css/main.css">
</head>
<body>
<main class="dashboard">
<h1>{title}</h1>
"#
    );

    let _ = writeln!(
        html,
        r#"<p id="error" class="error"{}>{}</p>"#,
        hidden(snapshot.error.is_none()),
        escape_html(snapshot.error.as_deref().unwrap_or_default())
    );

    html.push_str("<div class=\"grid\">\n");
    for (key, label, value) in info_boxes(snapshot) {
        let _ = writeln!(
            html,
            r#"<div class="info-box"><strong>{}:</strong> <span id="value-{}">{}</span></div>"#,
            escape_html(label),
            key,
            escape_html(value.unwrap_or(PLACEHOLDER))
        );
    }
    html.push_str("</div>\n");

    let _ = writeln!(
        html,
        r#"<div id="loading" class="banner loading"{}>Loading...</div>"#,
        hidden(!snapshot.loading)
    );

    let countdown = countdown_banner(snapshot);
    let _ = writeln!(
        html,
        r#"<div id="countdown" class="banner countdown"{}>{}</div>"#,
        hidden(countdown.is_none()),
        escape_html(countdown.as_deref().unwrap_or_default())
    );

    let updates = update_banner(snapshot);
    let _ = writeln!(
        html,
        r#"<div id="updates" class="banner updates"{}>{}</div>"#,
        hidden(updates.is_none()),
        escape_html(updates.as_deref().unwrap_or_default())
    );

    html.push_str(
        "</main>\n<script src=\"/static/js/dashboard.js\"></script>\n</body>\n</html>\n",
    );
    html
}

/// Plain-text rendering of the same panel, used by the one-shot CLI mode.
pub fn render_text(title: &str, snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));

    if let Some(error) = &snapshot.error {
        let _ = writeln!(out, "! {}", error);
    }

    for (_, label, value) in info_boxes(snapshot) {
        let _ = writeln!(out, "{:<18} {}", format!("{}:", label), value.unwrap_or(PLACEHOLDER));
    }

    if let Some(updates) = update_banner(snapshot) {
        let _ = writeln!(out, "{}", updates);
    }
    out
}

fn hidden(hide: bool) -> &'static str {
    if hide {
        " hidden"
    } else {
        ""
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
