use super::{
    charts, components,
    components::Component,
    config, htmx, metrics,
    metrics::MetricsSnapshot,
    models::{AppState, Payment, Property, PropertyForm},
};
use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use futures::join;
use log::{error, warn};

/// The overview: metric cards, charts, property table. All data errors are
/// caught here at the page boundary and rendered inline; the page itself
/// always comes back 200.
pub async fn overview(State(state): State<AppState>) -> impl IntoResponse {
    overview_page(&state).await
}

async fn overview_page(state: &AppState) -> String {
    let banner = components::ConnectionBanner {
        error: state.probe_error.as_deref(),
    }
    .render();
    let content = match overview_body(state).await {
        Ok(html) => html,
        Err(err) => {
            error!("overview data load failed: {err:#}");
            components::ErrorBanner {
                message: &format!("Data load failed: {err:#}"),
            }
            .render()
        }
    };
    let body = [banner, "<h2>Overview</h2>".to_string(), content].join("\n");
    components::Page {
        title: "DAVE Dashboard".to_string(),
        children: Box::new(components::Shell { body }),
    }
    .render()
}

/// The fallible part of the overview render, separated out so failures
/// come back as values instead of being intercepted somewhere ambient.
async fn overview_body(state: &AppState) -> Result<String> {
    let (property_records, payment_records) = join!(
        state.sheets.records(config::PROPERTIES_WORKSHEET),
        state.sheets.records(config::PAYMENTS_WORKSHEET),
    );
    let property_records = property_records?;
    let payment_records = payment_records?;

    let properties: Vec<Property> =
        property_records.iter().map(Property::from_record).collect();
    let payments: Vec<Payment> = payment_records.iter().map(Payment::from_record).collect();

    let snapshot = MetricsSnapshot::compute(&properties, &payments);
    let pie_svg = match metrics::pie_spec(&properties) {
        Some(spec) => Some(charts::render_pie(&spec)?),
        None => None,
    };
    let bar_svg = match metrics::bar_spec(&payments) {
        Some(spec) => Some(charts::render_bar(&spec)?),
        None => None,
    };

    Ok([
        components::MetricCards { metrics: snapshot }.render(),
        components::ChartsRow { pie_svg, bar_svg }.render(),
        components::PropertyTable {
            records: &property_records,
        }
        .render(),
    ]
    .join("\n"))
}

pub async fn add_property_form() -> impl IntoResponse {
    components::Page {
        title: "Add Property".to_string(),
        children: Box::new(components::Shell {
            body: components::AddPropertyForm { error: None }.render(),
        }),
    }
    .render()
}

/// On success the client is told to navigate back to the overview, which
/// re-renders it against the sheet that now contains the new row. On
/// failure the form is re-rendered with the message inline; resubmitting
/// is the only retry.
pub async fn submit_property(
    State(state): State<AppState>,
    Form(form): Form<PropertyForm>,
) -> Response {
    match append_property(&state, form).await {
        Ok(()) => {
            (StatusCode::CREATED, htmx::redirect("/"), "Property added").into_response()
        }
        Err(err) => {
            warn!("property submission failed: {err:#}");
            let message = format!("{err:#}");
            components::Page {
                title: "Add Property".to_string(),
                children: Box::new(components::Shell {
                    body: components::AddPropertyForm {
                        error: Some(&message),
                    }
                    .render(),
                }),
            }
            .render()
            .into_response()
        }
    }
}

async fn append_property(state: &AppState, form: PropertyForm) -> Result<()> {
    let row = form.into_row()?;
    state
        .sheets
        .append_row(config::PROPERTIES_WORKSHEET, row)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::fake::FakeSheets;
    use std::sync::Arc;

    fn seeded_state() -> (Arc<FakeSheets>, AppState) {
        let fake = Arc::new(FakeSheets::new(vec![
            (
                config::PROPERTIES_WORKSHEET,
                vec![
                    vec!["Id", "Address", "Owner", "Status", "NextPaymentDate"],
                    vec!["ING01", "Main St 1", "Jane Doe", "Active", "2024.01.15"],
                    vec!["ING02", "Oak Ave 2", "Sam Roe", "Active", "2024.02.01"],
                    vec!["ING03", "Elm Rd 3", "Kim Lee", "Inactive", "2024.03.01"],
                ],
            ),
            (
                config::PAYMENTS_WORKSHEET,
                vec![
                    vec!["Date", "Amount", "Status"],
                    vec!["2024.01.01", "1200", "Paid"],
                    vec!["2024.02.01", "1200", "Paid"],
                    vec!["2024.03.01", "950", "Owed"],
                ],
            ),
        ]));
        let state = AppState {
            sheets: fake.clone(),
            probe_error: None,
        };
        (fake, state)
    }

    #[tokio::test]
    async fn test_overview_body_renders_metrics_charts_and_table() {
        let (_, state) = seeded_state();
        let html = overview_body(&state).await.unwrap();
        // property_count=3, active=2, paid=2, outstanding=1
        assert!(html.contains("Properties"));
        assert!(html.contains(r#"<div class="value">3</div>"#));
        assert!(html.contains(r#"<div class="value">1</div>"#));
        assert_eq!(html.matches("<svg").count(), 2);
        assert!(html.contains("Main St 1"));
    }

    #[tokio::test]
    async fn test_overview_read_path_is_idempotent() {
        let (_, state) = seeded_state();
        let first = overview_body(&state).await.unwrap();
        let second = overview_body(&state).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_overview_shows_probe_failure_banner_but_still_renders() {
        let (_, state) = seeded_state();
        let state = AppState {
            probe_error: Some("cannot open spreadsheet REPLACE_WITH_SHEET_ID".to_string()),
            ..state
        };
        let html = overview_page(&state).await;
        // degraded banner on top, the read path untouched below it
        assert!(html.contains("Spreadsheet connection failed at startup"));
        assert!(html.contains("REPLACE_WITH_SHEET_ID"));
        assert!(html.contains(r#"<div class="value">3</div>"#));
        assert!(html.contains("Main St 1"));
    }

    #[tokio::test]
    async fn test_overview_shows_connection_ok_note_after_clean_probe() {
        let (_, state) = seeded_state();
        let html = overview_page(&state).await;
        assert!(html.contains("Spreadsheet connection OK"));
        assert!(!html.contains("failed at startup"));
    }

    #[tokio::test]
    async fn test_overview_body_surfaces_fetch_errors() {
        let state = AppState {
            sheets: Arc::new(FakeSheets::failing("permission denied")),
            probe_error: None,
        };
        let err = overview_body(&state).await.unwrap_err();
        assert!(err.to_string().contains("permission denied"));
    }

    #[tokio::test]
    async fn test_overview_body_with_empty_worksheets() {
        let state = AppState {
            sheets: Arc::new(FakeSheets::new(vec![
                (config::PROPERTIES_WORKSHEET, vec![]),
                (config::PAYMENTS_WORKSHEET, vec![]),
            ])),
            probe_error: None,
        };
        let html = overview_body(&state).await.unwrap();
        // both charts skipped, zero metrics, empty table
        assert_eq!(html.matches("<svg").count(), 0);
        assert!(html.contains("No properties yet"));
    }

    #[tokio::test]
    async fn test_append_property_appends_exactly_one_formatted_row() {
        let (fake, state) = seeded_state();
        let before = fake.grid(config::PROPERTIES_WORKSHEET);
        append_property(
            &state,
            PropertyForm {
                id: "ING04".to_string(),
                address: "Pine Ct 4".to_string(),
                owner: "Ada Park".to_string(),
                status: "Active".to_string(),
                next_payment_date: "2024-04-01".to_string(),
            },
        )
        .await
        .unwrap();

        let after = fake.grid(config::PROPERTIES_WORKSHEET);
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(&after[..before.len()], &before[..]);
        assert_eq!(
            after.last().unwrap(),
            &vec!["ING04", "Pine Ct 4", "Ada Park", "Active", "2024.04.01"]
        );
    }

    #[tokio::test]
    async fn test_append_property_rejects_unparseable_date() {
        let (fake, state) = seeded_state();
        let result = append_property(
            &state,
            PropertyForm {
                id: "ING05".to_string(),
                address: String::new(),
                owner: String::new(),
                status: "Active".to_string(),
                next_payment_date: "04/01/2024".to_string(),
            },
        )
        .await;
        assert!(result.is_err());
        // nothing was written
        assert_eq!(fake.grid(config::PROPERTIES_WORKSHEET).len(), 4);
    }
}
