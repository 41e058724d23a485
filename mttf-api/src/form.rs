use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;

use mttf_core::record::{AGE_RANGE, HUMIDITY_RANGE, MIN_QUANTITY, TEMPERATURE_RANGE};
use mttf_core::{Prediction, PredictError, PredictResult, ProductType};

use crate::error::{body_error, log_predict_error, status_for};
use crate::predict::{submit, PredictRequest};
use crate::state::AppState;

const STYLE: &str = r#"
    body { font-family: sans-serif; background-color: #f9f9f9; padding: 20px; }
    .row { display: flex; gap: 20px; margin-bottom: 16px; }
    .row label { flex: 1; display: flex; flex-direction: column; gap: 4px; }
    input, select { padding: 6px; border-radius: 5px; border: 1px solid #ccc; }
    button { background-color: #4CAF50; color: white; font-weight: bold; border: none; border-radius: 10px; padding: 10px 18px; cursor: pointer; }
    .metric-box { padding: 15px; background-color: #ffffff; border-radius: 10px; box-shadow: 0px 2px 10px rgba(0, 0, 0, 0.1); text-align: center; }
    .metric-box h1 { color: #4CAF50; }
    .error { padding: 12px; background-color: #fdecea; color: #b71c1c; border-radius: 8px; }
"#;

/// Raw form fields. Numbers arrive as text so a malformed value is reported
/// on the page like any other input error.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictForm {
    pub product_type: String,
    pub humidity: String,
    pub temperature: String,
    pub age: String,
    pub quantity: String,
}

impl Default for PredictForm {
    /// Widget defaults: first product type, every number at its minimum.
    fn default() -> Self {
        Self {
            product_type: ProductType::default().label().to_string(),
            humidity: format!("{:.1}", HUMIDITY_RANGE.0),
            temperature: format!("{:.1}", TEMPERATURE_RANGE.0),
            age: AGE_RANGE.0.to_string(),
            quantity: MIN_QUANTITY.to_string(),
        }
    }
}

impl PredictForm {
    pub fn parse(&self) -> PredictResult<PredictRequest> {
        Ok(PredictRequest {
            product_type: self.product_type.clone(),
            humidity: parse_number("Humidity", &self.humidity)?,
            temperature: parse_number("Temperature", &self.temperature)?,
            age: parse_number("Age", &self.age)?,
            quantity: parse_number("Quantity", &self.quantity)?,
        })
    }
}

fn parse_number<T: std::str::FromStr>(field: &str, raw: &str) -> PredictResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| PredictError::invalid_input(field, format!("'{}' is not a valid number", raw)))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(index)).route("/predict", post(submit_form))
}

/// GET /
async fn index() -> Html<String> {
    Html(render_page(&PredictForm::default(), None))
}

/// POST /predict
async fn submit_form(
    State(state): State<AppState>,
    payload: Result<Form<PredictForm>, FormRejection>,
) -> (StatusCode, Html<String>) {
    // An undecodable body still gets the page back, with the defaults refilled.
    let (form, outcome) = match payload {
        Ok(Form(form)) => {
            let outcome = state
                .predictor()
                .and_then(|predictor| submit(predictor, &form.parse()?))
                .map(|(_, prediction)| prediction);
            (form, outcome)
        }
        Err(rejection) => (PredictForm::default(), Err(body_error(rejection.body_text()))),
    };

    let status = match &outcome {
        Ok(prediction) => {
            tracing::debug!("Form prediction: {}", prediction);
            StatusCode::OK
        }
        Err(e) => {
            log_predict_error(e);
            status_for(e.kind())
        }
    };

    (status, Html(render_page(&form, Some(&outcome))))
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

pub fn render_page(form: &PredictForm, outcome: Option<&PredictResult<Prediction>>) -> String {
    let options: String = ProductType::ALL
        .iter()
        .map(|product| {
            let selected = if product.label() == form.product_type { " selected" } else { "" };
            format!(
                r#"<option value="{0}"{1}>{0}</option>"#,
                escape_html(product.label()),
                selected
            )
        })
        .collect();

    let result = match outcome {
        None => String::new(),
        Some(Ok(prediction)) => format!(
            r#"<div class="metric-box"><h2>Predicted MTTF</h2><h1>{}</h1></div>"#,
            escape_html(&prediction.to_string())
        ),
        Some(Err(e)) => format!(
            r#"<div class="error">Error during prediction: {}</div>"#,
            escape_html(&e.to_string())
        ),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Predictive Maintenance</title>
<style>{style}</style>
</head>
<body>
<h1>Predictive Maintenance Model</h1>
<p>Predict <strong>Mean Time to Failure (MTTF)</strong> for Industrial Equipment</p>
<h3>Enter Equipment Details</h3>
<form method="post" action="/predict">
<div class="row">
<label>Product Type<select name="product_type">{options}</select></label>
<label>Humidity (%)<input type="number" name="humidity" min="{h_min:.1}" max="{h_max:.1}" step="0.1" value="{humidity}"></label>
<label>Temperature (°C)<input type="number" name="temperature" min="{t_min:.1}" max="{t_max:.1}" step="0.1" value="{temperature}"></label>
</div>
<div class="row">
<label>Equipment Age (years)<input type="number" name="age" min="{a_min}" max="{a_max}" step="1" value="{age}"></label>
<label>Quantity<input type="number" name="quantity" min="{q_min}" step="1" value="{quantity}"></label>
</div>
<button type="submit">Predict MTTF</button>
</form>
<h3>Prediction Result</h3>
{result}
</body>
</html>
"#,
        style = STYLE,
        options = options,
        h_min = HUMIDITY_RANGE.0,
        h_max = HUMIDITY_RANGE.1,
        t_min = TEMPERATURE_RANGE.0,
        t_max = TEMPERATURE_RANGE.1,
        a_min = AGE_RANGE.0,
        a_max = AGE_RANGE.1,
        q_min = MIN_QUANTITY,
        humidity = escape_html(&form.humidity),
        temperature = escape_html(&form.temperature),
        age = escape_html(&form.age),
        quantity = escape_html(&form.quantity),
        result = result,
    )
}
