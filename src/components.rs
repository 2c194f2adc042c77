use super::{metrics::MetricsSnapshot, sheets::Record};
use ammonia::clean;
use std::fmt::Write;

/// Hand-rolled stylesheet; small enough that a CSS toolchain would be
/// overkill for two pages.
const STYLE: &str = r#"
    :root {
        --bg: #f6f8fb;
        --panel: #ffffff;
        --border: #d8dee8;
        --text: #1c2634;
        --muted: #5b6678;
        --accent: #2563eb;
        --danger: #b42318;
        --ok: #067647;
    }
    * { box-sizing: border-box; }
    body {
        margin: 0;
        font-family: system-ui, -apple-system, sans-serif;
        background: var(--bg);
        color: var(--text);
    }
    .layout { display: flex; min-height: 100vh; }
    .sidebar {
        width: 13rem;
        padding: 1.5rem 1rem;
        background: var(--panel);
        border-right: 1px solid var(--border);
    }
    .sidebar h1 { font-size: 1.2rem; margin: 0 0 1rem; }
    .sidebar a {
        display: block;
        padding: 0.5rem 0.75rem;
        border-radius: 6px;
        color: var(--text);
        text-decoration: none;
    }
    .sidebar a:hover { background: var(--bg); color: var(--accent); }
    .content { flex: 1; padding: 1.5rem 2rem; }
    .cards { display: flex; gap: 1rem; flex-wrap: wrap; }
    .card {
        flex: 1;
        min-width: 9rem;
        padding: 1rem;
        background: var(--panel);
        border: 1px solid var(--border);
        border-radius: 8px;
    }
    .card .label { color: var(--muted); font-size: 0.85rem; }
    .card .value { font-size: 1.8rem; font-weight: 600; }
    .charts { display: flex; gap: 1rem; flex-wrap: wrap; margin-top: 1.5rem; }
    .chart {
        background: var(--panel);
        border: 1px solid var(--border);
        border-radius: 8px;
        padding: 0.5rem;
    }
    table { border-collapse: collapse; width: 100%; margin-top: 1rem; }
    th, td {
        text-align: left;
        padding: 0.4rem 0.75rem;
        border-bottom: 1px solid var(--border);
    }
    th { color: var(--muted); font-weight: 600; }
    .banner { padding: 0.6rem 1rem; border-radius: 6px; margin-bottom: 1rem; }
    .banner.error { background: #fee4e2; color: var(--danger); }
    .banner.ok { background: #d3f3e0; color: var(--ok); }
    form.property { max-width: 26rem; display: grid; gap: 0.75rem; }
    form.property label { display: grid; gap: 0.25rem; color: var(--muted); }
    form.property input, form.property select {
        padding: 0.45rem;
        border: 1px solid var(--border);
        border-radius: 6px;
        font-size: 1rem;
    }
    form.property button {
        padding: 0.55rem;
        border: none;
        border-radius: 6px;
        background: var(--accent);
        color: white;
        font-size: 1rem;
        cursor: pointer;
    }
"#;

pub trait Component {
    /// Render the component to a HTML string. By convention, the
    /// implementation should sanitize all string properties at render-time
    fn render(&self) -> String;
}

pub struct Page<'a> {
    pub title: String,
    pub children: Box<dyn Component + 'a>,
}

impl Component for Page<'_> {
    fn render(&self) -> String {
        format!(
            r#"
            <html>
                <head>
                    <meta name="viewport" content="width=device-width, initial-scale=1.0"></meta>
                    <title>{title}</title>
                    <style>
                        {STYLE}
                    </style>
                </head>
                <body hx-boost="true">
                    {body_html}
                    <script src="https://unpkg.com/htmx.org@1.9.6"></script>
                </body>
            </html>
            "#,
            title = clean(&self.title),
            body_html = self.children.render()
        )
    }
}

/// Sidebar plus content area; every page renders inside this.
pub struct Shell {
    pub body: String,
}

impl Component for Shell {
    fn render(&self) -> String {
        let body = &self.body;
        format!(
            r#"
            <div class="layout">
                <nav class="sidebar">
                    <h1>DAVE</h1>
                    <a href="/">Overview</a>
                    <a href="/add">Add Property</a>
                </nav>
                <main class="content">
                    {body}
                </main>
            </div>
            "#
        )
    }
}

/// Outcome of the startup spreadsheet probe, shown at the top of the
/// overview: a success note, or the remembered failure.
pub struct ConnectionBanner<'a> {
    pub error: Option<&'a str>,
}

impl Component for ConnectionBanner<'_> {
    fn render(&self) -> String {
        match self.error {
            None => r#"<div class="banner ok">Spreadsheet connection OK</div>"#.to_string(),
            Some(message) => {
                let message = clean(message);
                format!(
                    r#"<div class="banner error">Spreadsheet connection failed at startup: {message}</div>"#
                )
            }
        }
    }
}

pub struct ErrorBanner<'a> {
    pub message: &'a str,
}

impl Component for ErrorBanner<'_> {
    fn render(&self) -> String {
        let message = clean(self.message);
        format!(r#"<div class="banner error">{message}</div>"#)
    }
}

pub struct MetricCards {
    pub metrics: MetricsSnapshot,
}

impl Component for MetricCards {
    fn render(&self) -> String {
        let cards = [
            ("Properties", self.metrics.property_count),
            ("Active", self.metrics.active_count),
            ("Paid", self.metrics.paid_count),
            ("Outstanding", self.metrics.outstanding_count),
        ];
        let cards = cards.iter().fold(String::new(), |mut html, (label, value)| {
            let _ = write!(
                html,
                r#"
                <div class="card">
                    <div class="label">{label}</div>
                    <div class="value">{value}</div>
                </div>
                "#
            );
            html
        });
        format!(r#"<div class="cards">{cards}</div>"#)
    }
}

/// Pie and bar side by side. Either chart can be absent (empty worksheet,
/// no numeric amounts); an absent chart is simply not rendered.
pub struct ChartsRow {
    pub pie_svg: Option<String>,
    pub bar_svg: Option<String>,
}

impl Component for ChartsRow {
    fn render(&self) -> String {
        // The SVG comes out of plotters, not out of the sheet, so it is
        // embedded as-is; running it through ammonia would strip it.
        let charts = [&self.pie_svg, &self.bar_svg]
            .iter()
            .filter_map(|svg| svg.as_ref())
            .fold(String::new(), |mut html, svg| {
                let _ = write!(html, r#"<div class="chart">{svg}</div>"#);
                html
            });
        if charts.is_empty() {
            return String::new();
        }
        format!(r#"<div class="charts">{charts}</div>"#)
    }
}

/// The raw property listing, columns in sheet-header order.
pub struct PropertyTable<'a> {
    pub records: &'a [Record],
}

impl Component for PropertyTable<'_> {
    fn render(&self) -> String {
        let first = match self.records.first() {
            Some(first) => first,
            None => return "<h2>Properties</h2><p>No properties yet.</p>".to_string(),
        };
        let header_row = first.fields().iter().fold(
            String::new(),
            |mut html, (header, _)| {
                let _ = write!(html, "<th>{}</th>", clean(header));
                html
            },
        );
        let body_rows = self.records.iter().fold(String::new(), |mut html, record| {
            let cells = record.fields().iter().fold(
                String::new(),
                |mut cells, (_, value)| {
                    let _ = write!(cells, "<td>{}</td>", clean(value));
                    cells
                },
            );
            let _ = write!(html, "<tr>{cells}</tr>");
            html
        });
        format!(
            r#"
            <h2>Properties</h2>
            <table>
                <thead><tr>{header_row}</tr></thead>
                <tbody>{body_rows}</tbody>
            </table>
            "#
        )
    }
}

/// The add-property form. Re-rendered with `error` set after a failed
/// submission; inputs reset in that case, which is acceptable here.
pub struct AddPropertyForm<'a> {
    pub error: Option<&'a str>,
}

impl Component for AddPropertyForm<'_> {
    fn render(&self) -> String {
        let error = match self.error {
            Some(message) => ErrorBanner { message }.render(),
            None => String::new(),
        };
        format!(
            r#"
            <h2>Add property</h2>
            {error}
            <form class="property" method="post" action="/add">
                <label>
                    Property ID
                    <input type="text" name="id" value="ING00" />
                </label>
                <label>
                    Address
                    <input type="text" name="address" />
                </label>
                <label>
                    Owner
                    <input type="text" name="owner" />
                </label>
                <label>
                    Status
                    <select name="status">
                        <option value="Active">Active</option>
                        <option value="Inactive">Inactive</option>
                    </select>
                </label>
                <label>
                    Next payment
                    <input type="date" name="next_payment_date" required />
                </label>
                <button>Add</button>
            </form>
            "#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::Record;

    #[test]
    fn test_metric_cards_show_all_four_counts() {
        let html = MetricCards {
            metrics: MetricsSnapshot {
                property_count: 3,
                active_count: 2,
                paid_count: 2,
                outstanding_count: 1,
            },
        }
        .render();
        for label in ["Properties", "Active", "Paid", "Outstanding"] {
            assert!(html.contains(label), "missing card {label}");
        }
    }

    #[test]
    fn test_property_table_sanitizes_sheet_values() {
        let headers = vec!["Id".to_string(), "Owner".to_string()];
        let records = vec![Record::from_row(
            &headers,
            vec!["ING01".into(), "<script>alert(1)</script>".into()],
        )];
        let html = PropertyTable { records: &records }.render();
        assert!(html.contains("ING01"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_property_table_empty() {
        let html = PropertyTable { records: &[] }.render();
        assert!(html.contains("No properties yet"));
    }

    #[test]
    fn test_form_defaults_property_id_placeholder() {
        let html = AddPropertyForm { error: None }.render();
        assert!(html.contains(r#"value="ING00""#));
        assert!(html.contains("Inactive"));
    }

    #[test]
    fn test_form_renders_submission_error_inline() {
        let html = AddPropertyForm {
            error: Some("cannot append to worksheet Properties"),
        }
        .render();
        assert!(html.contains("cannot append to worksheet Properties"));
    }

    #[test]
    fn test_charts_row_skips_absent_charts() {
        let html = ChartsRow {
            pie_svg: None,
            bar_svg: Some("<svg></svg>".to_string()),
        }
        .render();
        assert_eq!(html.matches("<svg").count(), 1);
        assert!(ChartsRow {
            pie_svg: None,
            bar_svg: None
        }
        .render()
        .is_empty());
    }

    #[test]
    fn test_connection_banner_renders_remembered_probe_error() {
        let html = ConnectionBanner {
            error: Some("cannot open spreadsheet xyz"),
        }
        .render();
        assert!(html.contains("banner error"));
        assert!(html.contains("cannot open spreadsheet xyz"));

        let ok = ConnectionBanner { error: None }.render();
        assert!(ok.contains("banner ok"));
    }

    #[test]
    fn test_shell_links_both_pages() {
        let html = Shell {
            body: String::new(),
        }
        .render();
        assert!(html.contains(r#"href="/""#));
        assert!(html.contains(r#"href="/add""#));
    }
}
