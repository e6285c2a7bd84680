//! Embedded HTML views

use std::fmt::Write;

use crate::predictor::Prediction;
use crate::schema::{FeatureKind, FeatureSchema};

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Academic Stress Predictor</title>
    <style>
        body{font-family:system-ui,sans-serif;max-width:640px;margin:2rem auto;padding:0 1rem;color:#1f2933}
        label{display:block;margin-top:.75rem;font-weight:600}
        input{width:100%;padding:.4rem;margin-top:.25rem;box-sizing:border-box}
        button{margin-top:1.25rem;padding:.5rem 1.5rem}
        table{border-collapse:collapse;margin-top:1rem}
        td,th{border:1px solid #cbd2d9;padding:.3rem .8rem;text-align:left}
    </style>
</head>
<body>
"#;

const PAGE_TAIL: &str = "</body>\n</html>\n";

/// Input form with one field per schema feature
pub fn render_form(schema: &FeatureSchema) -> String {
    let mut html = String::from(PAGE_HEAD);
    html.push_str("    <h1>Academic Stress Predictor</h1>\n");
    html.push_str("    <form method=\"post\" action=\"/predict\">\n");

    for spec in &schema.features {
        let name = escape(&spec.name);
        let input = match (spec.kind, spec.bounds) {
            (FeatureKind::Numeric, Some(b)) => format!(
                r#"<input type="number" name="{name}" min="{}" max="{}" step="1" required>"#,
                b.min, b.max
            ),
            (FeatureKind::Numeric, None) => {
                format!(r#"<input type="number" name="{name}" step="1" required>"#)
            }
            (FeatureKind::Categorical, _) => {
                format!(r#"<input type="text" name="{name}" required>"#)
            }
        };
        let _ = writeln!(html, "        <label>{name}\n            {input}\n        </label>");
    }

    html.push_str("        <button type=\"submit\">Predict</button>\n");
    html.push_str("    </form>\n");
    html.push_str(PAGE_TAIL);
    html
}

/// Result page: display label and per-class probabilities to 3 decimals
pub fn render_result(prediction: &Prediction) -> String {
    let mut html = String::from(PAGE_HEAD);
    html.push_str("    <h1>Predicted stress level</h1>\n");
    let _ = writeln!(html, "    <p class=\"prediction\">{}</p>", escape(&prediction.display));

    html.push_str("    <table>\n        <tr><th>Class</th><th>Probability</th></tr>\n");
    for p in &prediction.probabilities {
        let _ = writeln!(
            html,
            "        <tr><td>{}</td><td>{:.3}</td></tr>",
            p.class, p.probability
        );
    }
    html.push_str("    </table>\n");
    html.push_str("    <p><a href=\"/\">Predict again</a></p>\n");
    html.push_str(PAGE_TAIL);
    html
}

fn escape(text: &str) -> String {
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
