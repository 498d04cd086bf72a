use crate::form::ZTestForm;
use crate::pages::{self, Outcome};
use crate::{error::AppError, AppState};
use analytics::{AnalyticsError, ZTestReport};
use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection, QueryRejection},
        Query, State,
    },
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use chart::{ChartSpec, RenderError};
use configuration::ChartSettings;
use std::sync::Arc;

/// # GET /
/// The calculator form, prefilled with the configured defaults.
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(pages::calculator_page(
        &ZTestForm::from(&state.defaults),
        &Outcome::Empty,
    ))
}

/// # POST /calculate
/// Runs the test for a submitted form and renders the results page.
///
/// Invalid input re-renders the form with the message (422). A chart failure still
/// shows the computed result, with the chart error in place of the chart.
pub async fn calculate(
    State(state): State<Arc<AppState>>,
    form: Result<Form<ZTestForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Malformed calculator form.");
            let page = pages::calculator_page(
                &ZTestForm::from(&state.defaults),
                &Outcome::Failed(format!("Invalid form input: {}", rejection.body_text())),
            );
            return (StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response();
        }
    };

    match run_report(&state, &form) {
        Ok(report) => {
            let chart = render_chart(&report, &state.chart);
            if let Err(e) = &chart {
                tracing::error!(error = %e, "Failed to render chart.");
            }
            let page = pages::calculator_page(&form, &Outcome::Computed { report, chart });
            (StatusCode::OK, Html(page)).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Rejected calculator form.");
            let page = pages::calculator_page(&form, &Outcome::Failed(e.to_string()));
            (StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response()
        }
    }
}

/// # POST /api/ztest
/// JSON in, `ZTestReport` out. Unreadable bodies are reported like invalid input.
pub async fn api_ztest(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ZTestForm>, JsonRejection>,
) -> Result<Json<ZTestReport>, AppError> {
    let Json(form) = payload?;
    let report = run_report(&state, &form)?;
    Ok(Json(report))
}

/// # GET /api/ztest/chart.svg
/// The chart alone, for the inputs given in the query string.
pub async fn chart_svg(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ZTestForm>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(form) = query?;
    let report = run_report(&state, &form)?;
    let svg = render_chart(&report, &state.chart)?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}

fn run_report(state: &AppState, form: &ZTestForm) -> Result<ZTestReport, AnalyticsError> {
    let input = form.validated_input(&state.engine)?;
    state.engine.report(&input)
}

fn render_chart(report: &ZTestReport, settings: &ChartSettings) -> Result<String, RenderError> {
    let spec = ChartSpec::new(report.result.z_value, report.critical_region)
        .with_size(settings.width, settings.height)
        .with_samples(settings.samples)
        .with_x_range(settings.x_min, settings.x_max);
    chart::render_svg(&spec)
}
