//! Server-rendered HTML for the calculator.

use crate::form::ZTestForm;
use analytics::ZTestReport;
use chart::RenderError;
use core_types::TailMode;

/// What to show under the form.
#[derive(Debug)]
pub enum Outcome {
    /// Nothing submitted yet.
    Empty,
    /// The input was rejected; the message is shown to the user.
    Failed(String),
    Computed {
        report: ZTestReport,
        chart: Result<String, RenderError>,
    },
}

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 0 auto; max-width: 1280px; padding: 1rem 2rem; color: #222; }
.columns { display: flex; gap: 2rem; flex-wrap: wrap; }
.columns > section { flex: 1 1 420px; }
label { display: block; margin-top: .8rem; font-weight: bold; }
input, select { width: 100%; padding: .4rem; margin-top: .2rem; box-sizing: border-box; }
button { margin-top: 1.2rem; width: 100%; padding: .6rem; font-size: 1rem; background: #d33; color: white; border: 0; border-radius: 4px; }
.metrics { display: grid; grid-template-columns: 1fr 1fr; gap: .8rem; }
.metric { background: #f4f4f4; border-radius: 4px; padding: .6rem; }
.metric span { display: block; font-size: .8rem; color: #666; }
.error { background: #fdecea; color: #a12622; padding: .8rem; border-radius: 4px; }
.success { background: #e7f5ea; color: #1d6b2f; padding: .8rem; border-radius: 4px; }
.warning { background: #fff6e0; color: #8a5a00; padding: .8rem; border-radius: 4px; }
.info { background: #e8f1fb; color: #1c4b7a; padding: .8rem; border-radius: 4px; margin-top: .8rem; }
footer { text-align: center; color: gray; font-size: 12px; margin-top: 2rem; }
svg { max-width: 100%; height: auto; }
"#;

/// Renders the whole calculator page: the form, the results column and the chart.
pub fn calculator_page(form: &ZTestForm, outcome: &Outcome) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Z-test for a Proportion</title>\n");
    html.push_str(&format!("<style>{STYLE}</style>\n"));
    html.push_str("</head>\n<body>\n<h1>Z-test Calculator for a Proportion</h1>\n<hr>\n");

    html.push_str("<div class=\"columns\">\n");
    html.push_str(&form_section(form));
    html.push_str("<section>\n<h2>Results</h2>\n");
    html.push_str(&results_section(outcome));
    html.push_str("</section>\n</div>\n<hr>\n");

    html.push_str("<h2>Standard Normal Distribution</h2>\n");
    html.push_str(&chart_section(outcome));

    html.push_str(
        "<footer><p><b>Z-test for a proportion:</b></p>\
         <p>z = (p̂ - p₀) / √[p₀(1-p₀)/n]</p></footer>\n</body>\n</html>\n",
    );
    html
}

fn form_section(form: &ZTestForm) -> String {
    let mut options = String::new();
    for mode in TailMode::ALL {
        let selected = if mode == form.tail_mode { " selected" } else { "" };
        options.push_str(&format!(
            "<option value=\"{}\"{selected}>{}</option>",
            mode.as_str(),
            mode.label()
        ));
    }

    format!(
        r#"<section>
<h2>Input</h2>
<form method="post" action="/calculate">
<label for="observed_proportion">Observed proportion (p̂)</label>
<input type="number" id="observed_proportion" name="observed_proportion" min="0" max="1" step="0.0001" value="{observed}">
<label for="expected_proportion">Expected proportion (p₀)</label>
<input type="number" id="expected_proportion" name="expected_proportion" min="0" max="1" step="0.0001" value="{expected}">
<label for="sample_size">Sample size (n)</label>
<input type="number" id="sample_size" name="sample_size" step="1" value="{n}">
<label for="significance_level">Significance level (α)</label>
<input type="number" id="significance_level" name="significance_level" min="0.001" max="0.999" step="0.001" value="{alpha}">
<label for="tail_mode">Test type</label>
<select id="tail_mode" name="tail_mode">{options}</select>
<button type="submit">Calculate</button>
</form>
</section>
"#,
        observed = form.observed_proportion,
        expected = form.expected_proportion,
        n = form.sample_size,
        alpha = form.significance_level,
    )
}

fn results_section(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Empty => {
            "<p>Fill in the form and press <b>Calculate</b>.</p>\n".to_string()
        }
        Outcome::Failed(message) => {
            format!("<div class=\"error\">❌ {}</div>\n", escape(message))
        }
        Outcome::Computed { report, .. } => {
            let result = &report.result;
            let input = &report.input;
            let verdict_class = if result.is_significant { "success" } else { "warning" };
            let mut html = format!(
                r#"<div class="metrics">
<div class="metric"><span>Z value</span>{z}</div>
<div class="metric"><span>α level</span>{alpha}</div>
<div class="metric"><span>P-value</span>{p}</div>
<div class="metric"><span>Test type</span>{mode}</div>
<div class="metric"><span>Standard error</span>{se}</div>
<div class="metric"><span>Critical value</span>{critical}</div>
</div>
<p class="{verdict_class}"><b>{verdict}</b></p>
<div class="info"><b>Conclusion:</b> {conclusion}</div>
<details><summary>Interpreting the results</summary><ul>
"#,
                z = result.z_value,
                alpha = input.significance_level,
                p = result.p_value,
                mode = input.tail_mode,
                se = result.standard_error,
                critical = report.critical_region.label(),
                verdict = report.verdict(),
                conclusion = escape(&report.conclusion),
            );
            for line in &report.interpretation {
                html.push_str(&format!("<li>{}</li>\n", escape(line)));
            }
            html.push_str("</ul></details>\n");
            html
        }
    }
}

fn chart_section(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Computed { chart: Ok(svg), .. } => format!(
            "<figure>{svg}</figure>\n<div class=\"info\">\
             The <b>blue curve</b> is the standard normal distribution. \
             The <b>red area</b> is the critical region, where H0 is rejected. \
             The <b>green line</b> is the z value computed from your data. \
             If the green line falls in the red area, H0 is rejected.</div>\n"
        ),
        Outcome::Computed { chart: Err(e), .. } => {
            format!("<div class=\"error\">Failed to render chart: {}</div>\n", escape(&e.to_string()))
        }
        Outcome::Empty | Outcome::Failed(_) => String::new(),
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
