//! Server-side HTML for the churn analyzer page

use crate::error::PredictionError;
use crate::types::prediction::ChurnPrediction;
use crate::types::record::{CustomerFeatureRecord, FieldDomain, FieldSpec};

/// Outcome of a "Predict Churn" press
#[derive(Debug, Clone)]
pub enum PredictionOutcome {
    Success(ChurnPrediction),
    Failure(PredictionError),
}

impl From<Result<ChurnPrediction, PredictionError>> for PredictionOutcome {
    fn from(result: Result<ChurnPrediction, PredictionError>) -> Self {
        match result {
            Ok(prediction) => PredictionOutcome::Success(prediction),
            Err(e) => PredictionOutcome::Failure(e),
        }
    }
}

const PAGE_TITLE: &str = "Customer Churn Prediction";

const STYLE: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; background: #0f172a; color: #e2e8f0; }
.layout { display: flex; min-height: 100vh; }
.sidebar { width: 320px; background: #1e293b; padding: 1.5rem; box-sizing: border-box; }
.sidebar h2 { color: #cbd5e1; margin-top: 0; }
.field { margin-bottom: 1rem; }
.field label { display: flex; justify-content: space-between; font-size: 0.9rem; }
.field input, .field select { width: 100%; margin-top: 0.3rem; }
.help { font-size: 0.75rem; color: #94a3b8; }
main { flex: 1; padding: 2rem 5rem; }
h1 { color: #f8fafc; text-align: center; padding-bottom: 1rem; }
h3 { color: #cbd5e1; }
.subtitle { text-align: center; color: #94a3b8; }
table { border-collapse: collapse; background: #1e293b; border: 1px solid #334155; border-radius: 10px; display: block; overflow-x: auto; }
th, td { padding: 0.4rem 0.7rem; border-bottom: 1px solid #334155; text-align: right; white-space: nowrap; }
button.predict { width: 100%; border: none; border-radius: 10px; padding: 0.75rem 0; margin-top: 1rem; background: #2563eb; color: white; font-weight: bold; cursor: pointer; }
button.predict:hover { background: #1d4ed8; }
.banner { border-radius: 10px; padding: 1rem; margin: 1rem 0; }
.banner.success { background: #064e3b; border: 1px solid #10b981; }
.banner.error { background: #7f1d1d; border: 1px solid #ef4444; }
.banner.info { background: #1e293b; border: 1px solid #334155; border-left: 5px solid #3b82f6; }
progress { width: 100%; height: 1rem; }
"#;

/// Escape text for HTML element and attribute content
pub fn escape(text: &str) -> String {
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

/// Table form of a field value
fn display_value(spec: &FieldSpec, value: f64) -> String {
    match spec.domain {
        FieldDomain::Float { .. } => format!("{:.1}", value),
        _ => format!("{}", value as i64),
    }
}

/// Control form of a field value; reads back to the same record value
fn control_value(spec: &FieldSpec, value: f64) -> String {
    match spec.domain {
        FieldDomain::Float { .. } => format!("{}", value),
        _ => format!("{}", value as i64),
    }
}

fn head(out: &mut String) {
    out.push_str(&format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n",
        PAGE_TITLE, STYLE
    ));
}

fn render_control(out: &mut String, spec: &FieldSpec, value: f64) {
    let name = spec.name;
    let label = escape(spec.label);
    let current = control_value(spec, value);
    out.push_str("<div class=\"field\">\n");

    match spec.domain {
        FieldDomain::Integer { min, max } => {
            out.push_str(&format!(
                "<label for=\"{name}\">{label}<output>{current}</output></label>\n\
                 <input type=\"range\" id=\"{name}\" name=\"{name}\" min=\"{min}\" max=\"{max}\" step=\"1\" \
                 value=\"{current}\" oninput=\"this.previousElementSibling.lastChild.value=this.value\" \
                 onchange=\"this.form.submit()\">\n"
            ));
        }
        FieldDomain::Choice(choices) => {
            out.push_str(&format!(
                "<label for=\"{name}\">{label}</label>\n\
                 <select id=\"{name}\" name=\"{name}\" onchange=\"this.form.submit()\">\n"
            ));
            for &choice in choices {
                let selected = if choice as f64 == value { " selected" } else { "" };
                out.push_str(&format!(
                    "<option value=\"{choice}\"{selected}>{choice}</option>\n"
                ));
            }
            out.push_str("</select>\n");
        }
        FieldDomain::Float { min, max, step } => {
            out.push_str(&format!(
                "<label for=\"{name}\">{label}</label>\n\
                 <input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"{min:.1}\" max=\"{max:.1}\" \
                 step=\"{step:.1}\" value=\"{current}\" onchange=\"this.form.submit()\">\n"
            ));
        }
    }

    if let Some(help) = spec.help {
        out.push_str(&format!("<div class=\"help\">{}</div>\n", escape(help)));
    }
    out.push_str("</div>\n");
}

fn render_table(out: &mut String, record: &CustomerFeatureRecord) {
    out.push_str("<table>\n<thead><tr>");
    for (spec, _) in record.fields() {
        out.push_str(&format!("<th>{}</th>", spec.name));
    }
    out.push_str("</tr></thead>\n<tbody><tr>");
    for (spec, value) in record.fields() {
        out.push_str(&format!("<td>{}</td>", display_value(spec, value)));
    }
    out.push_str("</tr></tbody>\n</table>\n");
}

fn render_outcome(out: &mut String, outcome: &PredictionOutcome) {
    out.push_str("<section class=\"result\" id=\"result\">\n");
    match outcome {
        PredictionOutcome::Success(prediction) => {
            out.push_str("<h3>🤖 Prediction Result</h3>\n");
            let (class, icon) = if prediction.is_churn() {
                ("error", "🚨")
            } else {
                ("success", "✅")
            };
            out.push_str(&format!(
                "<div class=\"banner {class}\">{icon} Prediction: <strong>{}</strong></div>\n",
                prediction.headline()
            ));
            out.push_str(&format!(
                "<p><strong>Confidence Score (Churn Probability):</strong> <code>{}</code></p>\n",
                prediction.percentage()
            ));
            out.push_str(&format!(
                "<progress max=\"100\" value=\"{:.2}\">{}</progress>\n",
                prediction.progress(),
                prediction.percentage()
            ));
        }
        PredictionOutcome::Failure(error) => {
            out.push_str(&format!(
                "<div class=\"banner error\">{}</div>\n",
                escape(&error.to_string())
            ));
        }
    }
    out.push_str("</section>\n");
}

/// Render the interactive page for `record`, with the result area filled when
/// a prediction was requested.
pub fn render_page(record: &CustomerFeatureRecord, outcome: Option<&PredictionOutcome>) -> String {
    let mut out = String::with_capacity(8 * 1024);
    head(&mut out);

    out.push_str("<body>\n<form class=\"layout\" method=\"get\" action=\"/\" novalidate>\n");

    out.push_str("<aside class=\"sidebar\">\n<h2>Customer Input Features</h2>\n");
    for (spec, value) in record.fields() {
        render_control(&mut out, spec, value);
    }
    out.push_str("</aside>\n");

    out.push_str("<main>\n<h1>Customer Churn Analyzer 📊</h1>\n");
    out.push_str(
        "<p class=\"subtitle\">This application uses a machine learning model to predict \
         customer churn based on their data.</p>\n",
    );
    out.push_str("<h3>📝 Your Input</h3>\n<p>Here are the customer details you've provided:</p>\n");
    render_table(&mut out, record);

    out.push_str(
        "<button type=\"submit\" class=\"predict\" formaction=\"/predict\" formmethod=\"post\">\
         Predict Churn</button>\n",
    );

    if let Some(outcome) = outcome {
        render_outcome(&mut out, outcome);
    }

    out.push_str(
        "<div class=\"banner info\"><strong>How to use this app:</strong>\n<ol>\n\
         <li>Adjust the sliders and select options in the left sidebar to reflect the customer's data.</li>\n\
         <li>Click the \"Predict Churn\" button.</li>\n\
         <li>The app will display the churn prediction and the associated confidence score.</li>\n\
         </ol></div>\n",
    );

    out.push_str("</main>\n</form>\n</body>\n</html>\n");
    out
}

/// Render the page shown when the model could not be loaded. No controls.
pub fn render_halted(message: &str) -> String {
    let mut out = String::with_capacity(2 * 1024);
    head(&mut out);
    out.push_str(&format!(
        "<body>\n<main>\n<div class=\"banner error\" id=\"fatal\">{}</div>\n</main>\n</body>\n</html>\n",
        escape(message)
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::prediction::ChurnLabel;
    use crate::types::record::FIELD_SPECS;
    use crate::web::form;
    use std::collections::HashMap;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape("<a href=\"x\">'&'</a>"),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_page_has_all_controls() {
        let html = render_page(&CustomerFeatureRecord::default(), None);

        for spec in FIELD_SPECS.iter() {
            assert!(html.contains(&format!("name=\"{}\"", spec.name)), "{}", spec.name);
            assert!(html.contains(&format!("<th>{}</th>", spec.name)));
        }
        assert_eq!(html.matches("type=\"range\"").count(), 7);
        assert_eq!(html.matches("<select").count(), 5);
        assert_eq!(html.matches("type=\"number\"").count(), 1);
        assert!(html.contains("Predict Churn"));
        assert!(!html.contains("id=\"result\""));
    }

    #[test]
    fn test_defaults_rendered() {
        let html = render_page(&CustomerFeatureRecord::default(), None);

        assert!(html.contains("<td>5000</td>"));
        assert!(html.contains("<td>500.0</td>"));
        assert!(html.contains("<option value=\"4\" selected>4</option>"));
        assert!(html.contains("0 = No, 1 = Yes"));
    }

    /// Value attribute of the control named `name`
    fn control_attr(html: &str, name: &str) -> String {
        let tag_start = html.find(&format!("name=\"{}\"", name)).unwrap();
        let rest = &html[tag_start..];
        let value_start = rest.find("value=\"").unwrap() + "value=\"".len();
        let value_end = value_start + rest[value_start..].find('"').unwrap();
        rest[value_start..value_end].to_string()
    }

    #[test]
    fn test_typed_value_survives_resubmit() {
        for typed in ["1234.56", "123.25", "4999.99", "0.05"] {
            let params: HashMap<String, String> =
                [("Customer_Value".to_string(), typed.to_string())].into();
            let first = form::collect(&params);

            let html = render_page(&first, None);
            let resubmitted: HashMap<String, String> =
                [("Customer_Value".to_string(), control_attr(&html, "Customer_Value"))].into();
            let second = form::collect(&resubmitted);

            assert_eq!(second.customer_value, first.customer_value, "{}", typed);
            assert_eq!(second, first);
        }
    }

    #[test]
    fn test_table_value_rounded() {
        let record = CustomerFeatureRecord {
            customer_value: 1234.56,
            ..Default::default()
        };
        let html = render_page(&record, None);

        assert!(html.contains("<td>1234.6</td>"));
        assert_eq!(control_attr(&html, "Customer_Value"), "1234.56");
    }

    #[test]
    fn test_churn_outcome() {
        let outcome = PredictionOutcome::Success(ChurnPrediction::new(ChurnLabel::Churn, 0.912));
        let html = render_page(&CustomerFeatureRecord::default(), Some(&outcome));

        assert!(html.contains("Customer is likely to Churn"));
        assert!(html.contains("<code>91.20%</code>"));
        assert!(html.contains("<progress max=\"100\" value=\"91.20\">"));
        assert!(html.contains("banner error"));
    }

    #[test]
    fn test_stay_outcome() {
        let outcome = PredictionOutcome::Success(ChurnPrediction::new(ChurnLabel::Stay, 0.031));
        let html = render_page(&CustomerFeatureRecord::default(), Some(&outcome));

        assert!(html.contains("Customer is unlikely to Churn"));
        assert!(html.contains("<code>3.10%</code>"));
        assert!(html.contains("banner success"));
    }

    #[test]
    fn test_failure_outcome_keeps_controls() {
        let outcome = PredictionOutcome::Failure(PredictionError::new("bad <shape>"));
        let html = render_page(&CustomerFeatureRecord::default(), Some(&outcome));

        assert!(html.contains("An error occurred during prediction: bad &lt;shape&gt;"));
        assert!(html.contains("Predict Churn"));
        assert!(html.contains("name=\"Call_Failure\""));
    }

    #[test]
    fn test_halted_page_has_no_controls() {
        let html = render_halted("Error: 'model.onnx' not found.");

        assert!(html.contains("Error: &#39;model.onnx&#39; not found."));
        assert!(!html.contains("<input"));
        assert!(!html.contains("<select"));
        assert!(!html.contains("Predict Churn"));
    }
}
