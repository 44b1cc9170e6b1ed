use crate::client::short_url;
use crate::console::Console;
use crate::models::{Link, Notice, NoticeKind};

pub fn render_index(console: &Console, notice: Option<&Notice>, short_link_base: &str) -> String {
    let form = console.form();
    let (notice_type, notice_text) = match notice {
        Some(Notice {
            kind: NoticeKind::Error,
            message,
        }) => ("error", message.as_str()),
        Some(Notice {
            kind: NoticeKind::Info,
            message,
        }) => ("ok", message.as_str()),
        None => ("", ""),
    };

    let links = render_links(console, short_link_base);
    fill_template(INDEX_HTML, |key| match key {
        "NOTICE_TYPE" => Some(notice_type.to_string()),
        "NOTICE" => Some(escape_html(notice_text)),
        "FORM_LONG_URL" => Some(escape_html(&form.long_url)),
        "FORM_CUSTOM_CODE" => Some(escape_html(&form.custom_short_code)),
        "LINKS" => Some(links.clone()),
        _ => None,
    })
}

/// Substitutes `{{KEY}}` placeholders in a single left-to-right pass.
///
/// Inserted values are never scanned again, so user text that happens to
/// look like a placeholder is emitted as-is. Unknown keys are kept.
fn fill_template(template: &str, value: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = &after[..end];
                match value(key) {
                    Some(filled) => out.push_str(&filled),
                    None => {
                        out.push_str("{{");
                        out.push_str(key);
                        out.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn render_links(console: &Console, short_link_base: &str) -> String {
    let links = console.directory().links();
    if links.is_empty() {
        return r#"<li class="empty">No links yet.</li>"#.to_string();
    }

    links
        .iter()
        .map(|link| {
            let url = escape_html(&short_url(short_link_base, &link.short_code));
            match console.editor().session() {
                Some(session) if session.short_code == link.short_code => {
                    render_edit_row(&url, &session.draft_long_url)
                }
                _ => render_display_row(&url, link),
            }
        })
        .collect()
}

fn render_edit_row(short_url: &str, draft: &str) -> String {
    format!(
        r#"<li class="editing">
        <strong>{short_url}</strong>
        <form class="inline" method="post" action="/edit/save">
          <input type="url" name="long_url" value="{draft}" required />
          <button type="submit">Save</button>
        </form>
        <form class="inline" method="post" action="/edit/cancel">
          <button class="secondary" type="submit">Cancel</button>
        </form>
      </li>"#,
        draft = escape_html(draft),
    )
}

fn render_display_row(short_url: &str, link: &Link) -> String {
    format!(
        r#"<li>
        <div class="link-info">
          <a href="{short_url}" target="_blank" rel="noopener noreferrer">{short_url}</a>
          <small>{long_url}</small>
        </div>
        <form class="inline" method="post" action="/edit/start">
          <input type="hidden" name="short_code" value="{code}" />
          <button type="submit">Edit</button>
        </form>
      </li>"#,
        long_url = escape_html(&link.long_url),
        code = escape_html(&link.short_code),
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Link Console</title>
  <style>
    :root {
      --bg: #eef2f0;
      --ink: #1f2a2e;
      --muted: #66737a;
      --accent: #2f6f73;
      --card: #ffffff;
      --line: rgba(31, 42, 46, 0.1);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
      display: grid;
      justify-items: center;
      padding: 32px 16px 48px;
    }

    .app {
      width: min(900px, 100%);
      display: grid;
      gap: 24px;
    }

    section {
      background: var(--card);
      border-radius: 16px;
      border: 1px solid var(--line);
      padding: 24px;
      display: grid;
      gap: 14px;
    }

    h1,
    h2 {
      margin: 0;
    }

    label {
      display: grid;
      gap: 6px;
      font-size: 0.9rem;
      color: var(--muted);
    }

    input {
      font: inherit;
      padding: 10px 12px;
      border-radius: 8px;
      border: 1px solid var(--line);
      min-width: 0;
    }

    button {
      font: inherit;
      font-weight: 600;
      border: none;
      border-radius: 8px;
      padding: 10px 16px;
      background: var(--accent);
      color: white;
      cursor: pointer;
    }

    button.secondary {
      background: #d9e1e3;
      color: var(--ink);
    }

    ul {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 10px;
    }

    li {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
      padding: 12px 0;
      border-bottom: 1px solid var(--line);
    }

    li.empty {
      color: var(--muted);
    }

    .link-info {
      display: grid;
      gap: 4px;
    }

    .link-info small {
      color: var(--muted);
      word-break: break-all;
    }

    form.inline {
      display: flex;
      gap: 8px;
    }

    li.editing form.inline:first-of-type {
      flex: 1;
    }

    li.editing input {
      flex: 1;
    }

    .status {
      min-height: 1.2em;
      margin: 0;
    }

    .status[data-type="error"] {
      color: #b3372a;
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
    }

    #chart {
      width: 100%;
      height: 280px;
      display: block;
    }

    .chart-grid {
      stroke: var(--line);
    }

    .chart-label {
      fill: var(--muted);
      font-size: 11px;
    }

    .legend {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
      font-size: 0.9rem;
    }

    .legend span::before {
      content: "";
      display: inline-block;
      width: 10px;
      height: 10px;
      border-radius: 50%;
      margin-right: 6px;
      background: var(--swatch);
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Link Console</h1>
    </header>

    <p class="status" data-type="{{NOTICE_TYPE}}">{{NOTICE}}</p>

    <section>
      <h2>New link</h2>
      <form method="post" action="/links">
        <label>Long URL
          <input type="url" name="long_url" value="{{FORM_LONG_URL}}" placeholder="https://example.com/some/long/path" required />
        </label>
        <label>Alias (optional)
          <input type="text" name="custom_short_code" value="{{FORM_CUSTOM_CODE}}" placeholder="my-alias" />
        </label>
        <button type="submit">Shorten</button>
      </form>
    </section>

    <section>
      <h2>Links</h2>
      <ul>
      {{LINKS}}
      </ul>
    </section>

    <section>
      <h2 id="chart-title">This week</h2>
      <svg id="chart" viewBox="0 0 600 280" aria-label="Weekly visits" role="img"></svg>
      <div class="legend" id="legend"></div>
    </section>
  </main>

  <script>
    const chartEl = document.getElementById('chart');
    const legendEl = document.getElementById('legend');
    const titleEl = document.getElementById('chart-title');

    const escapeText = (value) =>
      String(value).replace(/[&<>"']/g, (ch) => `&#${ch.charCodeAt(0)};`);

    const renderChart = (chart) => {
      if (!chart.rows.length) {
        chartEl.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">No visits yet</text>';
        legendEl.innerHTML = '';
        return;
      }

      const width = 600;
      const height = 280;
      const padX = 44;
      const padY = 34;
      const top = 20;

      const values = chart.rows.flatMap((row) => chart.series.map((s) => row[s.short_code] || 0));
      const max = Math.max(1, ...values);
      const xStep = chart.rows.length > 1 ? (width - padX * 2) / (chart.rows.length - 1) : 0;
      const x = (index) => padX + index * xStep;
      const y = (value) => height - padY - (value / max) * (height - top - padY);

      let grid = '';
      for (let i = 0; i <= 4; i += 1) {
        const value = (max * i) / 4;
        grid += `<line class="chart-grid" x1="${padX}" y1="${y(value)}" x2="${width - padX}" y2="${y(value)}" />`;
        grid += `<text class="chart-label" x="${padX - 8}" y="${y(value) + 4}" text-anchor="end">${Math.round(value)}</text>`;
      }

      const lines = chart.series
        .map((s) => {
          const path = chart.rows
            .map((row, index) => `${index === 0 ? 'M' : 'L'} ${x(index).toFixed(2)} ${y(row[s.short_code] || 0).toFixed(2)}`)
            .join(' ');
          return `<path d="${path}" fill="none" stroke="${s.color}" stroke-width="2.5" />`;
        })
        .join('');

      const labels = chart.rows
        .map((row, index) => `<text class="chart-label" x="${x(index)}" y="${height - padY + 18}" text-anchor="middle">${escapeText(row.label)}</text>`)
        .join('');

      chartEl.innerHTML = `${grid}${lines}${labels}`;
      legendEl.innerHTML = chart.series
        .map((s) => `<span style="--swatch: ${s.color}">${escapeText(s.short_code)} (${s.total})</span>`)
        .join('');
      titleEl.textContent = chart.week ? `This week (${chart.week}), ${chart.total} visits` : 'This week';
    };

    fetch('/api/chart')
      .then((res) => (res.ok ? res.json() : Promise.reject(new Error('Unable to load stats'))))
      .then(renderChart)
      .catch((err) => console.error(err));
  </script>
</body>
</html>
"#;
