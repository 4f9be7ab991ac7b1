use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::debug;

use crate::derived::SeasonTotals;
use crate::features::{FieldSpec, FormState, FIELDS};
use crate::prediction::{PredictionService, PLACEHOLDER};
use crate::teams::{TeamDirectory, DEFAULT_TEAM};

#[derive(Clone)]
pub struct AppState {
    pub predictor: PredictionService,
    /// Form page, rendered once from the field table and team directory.
    page: Arc<str>,
}

impl AppState {
    pub fn new(predictor: PredictionService) -> Self {
        AppState {
            predictor,
            page: render_page().into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (status, Json(ErrorBody { error: error.into() }))
}

/// Build the Axum router for the form.
pub fn router(state: AppState, assets_dir: Option<&str>) -> Router {
    let mut app = Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/teams", get(teams_handler))
        .route("/api/fields", get(fields_handler))
        .route("/api/predict", post(predict_handler))
        .route("/api/derive", post(derive_handler));
    if let Some(dir) = assets_dir {
        app = app.nest_service("/assets", ServeDir::new(dir));
    }
    app.layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

async fn index_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Html(state.page.to_string())
}

/// GET /health
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "scorer": state.predictor.scorer_name(),
    }))
}

/// GET /api/teams
async fn teams_handler() -> impl IntoResponse {
    Json(TeamDirectory::global().options())
}

/// GET /api/fields
async fn fields_handler() -> impl IntoResponse {
    Json(FIELDS)
}

/// POST /api/predict
async fn predict_handler(
    State(state): State<Arc<AppState>>,
    Json(form): Json<FormState>,
) -> Result<impl IntoResponse, ApiError> {
    if let Err(e) = form.check_domains() {
        debug!("Rejected form: {}", e);
        return Err(api_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()));
    }
    state
        .predictor
        .predict(&form)
        .await
        .map(Json)
        .map_err(|e| api_error(StatusCode::BAD_GATEWAY, format!("Prediction failed: {e}")))
}

/// POST /api/derive
async fn derive_handler(
    Json(totals): Json<SeasonTotals>,
) -> Result<impl IntoResponse, ApiError> {
    totals.derive().map(Json).map_err(|e| {
        debug!("Rejected season totals: {}", e);
        api_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
    })
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn slider_html(spec: &FieldSpec) -> String {
    format!(
        r#"<label class="label" for="{key}">{label}</label>
<input type="range" id="{key}" name="{key}" min="{min}" max="{max}" step="{step}" value="{default}"
  data-readout="{readout}" data-fraction="{fraction}">
<div class="slider-display" id="{key}-display">{display}</div>
"#,
        key = spec.key,
        label = escape(spec.label),
        min = spec.min,
        max = spec.max,
        step = spec.step,
        default = spec.default,
        readout = escape(spec.readout),
        fraction = spec.fraction,
        display = escape(&spec.display(spec.default)),
    )
}

fn team_select_html() -> String {
    let options: String = TeamDirectory::global()
        .options()
        .iter()
        .map(|o| {
            let selected = if o.code == DEFAULT_TEAM { " selected" } else { "" };
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                o.code,
                selected,
                escape(o.name)
            )
        })
        .collect();
    format!(
        r#"<label class="label" for="team">Player Team:</label>
<select id="team" name="team" class="dropdown">{options}</select>
"#
    )
}

/// Season/team/age/GS first, then four-field groups, as in the printed form.
fn render_page() -> String {
    let mut groups = String::new();
    groups.push_str(r#"<div class="input-group">"#);
    groups.push_str(&slider_html(&FIELDS[0]));
    groups.push_str(&team_select_html());
    for spec in &FIELDS[1..3] {
        groups.push_str(&slider_html(spec));
    }
    groups.push_str("</div>");
    for chunk in [&FIELDS[3..7], &FIELDS[7..11], &FIELDS[11..]] {
        groups.push_str(r#"<div class="input-group">"#);
        for spec in chunk {
            groups.push_str(&slider_html(spec));
        }
        groups.push_str("</div>");
    }

    FORM_HTML
        .replace("{{INPUT_GROUPS}}", &groups)
        .replace("{{PLACEHOLDER}}", PLACEHOLDER)
}

/// Embedded single-file form (HTML + CSS + JS)
const FORM_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>NBA Salary Predictor</title>
<style>
  :root {
    --bg: #0f1117;
    --card: #1a1d27;
    --border: #2a2d3a;
    --accent: #f58426;
    --green: #00c896;
    --red: #ff4f6a;
    --text: #e0e0e0;
    --muted: #8888aa;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Poppins', 'Segoe UI', system-ui, sans-serif; }
  header { display: flex; align-items: center; gap: 1rem; padding: 1rem 2rem; border-bottom: 1px solid var(--border); }
  header img { height: 60px; }
  header h1 { font-size: 1.6rem; font-weight: 700; }
  main { padding: 1.5rem 2rem; display: grid; gap: 1.5rem; }
  .form-container { display: grid; grid-template-columns: repeat(auto-fill, minmax(260px, 1fr)); gap: 1rem; }
  .input-group { background: var(--card); border: 1px solid var(--border); border-radius: 10px; padding: 1.2rem; display: flex; flex-direction: column; gap: .35rem; }
  .label { color: var(--muted); font-size: .8rem; text-transform: uppercase; letter-spacing: .06em; margin-top: .6rem; }
  input[type=range] { width: 100%; accent-color: var(--accent); }
  .slider-display { font-size: .85rem; }
  .dropdown { background: var(--bg); color: var(--text); border: 1px solid var(--border); border-radius: 6px; padding: .4rem; }
  .action-container { display: flex; align-items: center; gap: 1.5rem; }
  .predict-button { background: var(--accent); border: none; color: #000; font-weight: 700; padding: .8rem 1.6rem; border-radius: 8px; cursor: pointer; font-size: 1rem; }
  .predict-button:disabled { opacity: .5; cursor: wait; }
  .salary-display { font-size: 1.4rem; font-weight: 700; }
  .salary-display.error { color: var(--red); font-size: 1rem; }
  .panel { background: var(--card); border: 1px solid var(--border); border-radius: 10px; padding: 1.2rem; }
  .panel h4 { margin-bottom: .8rem; }
  .panel li { margin: .5rem 0 .5rem 1.2rem; font-size: .9rem; }
  .calc { display: grid; grid-template-columns: repeat(auto-fill, minmax(150px, 1fr)); gap: .6rem; margin-top: 1rem; }
  .calc input { width: 100%; background: var(--bg); color: var(--text); border: 1px solid var(--border); border-radius: 6px; padding: .3rem; }
  .calc-result { margin-top: .8rem; font-size: .9rem; color: var(--muted); }
  footer { text-align: center; padding: 15px; margin-top: 50px; background: black; color: white; }
</style>
</head>
<body>
<header>
  <img src="/assets/logo.jpg" alt="" onerror="this.style.display='none'">
  <h1>NBA Salary Predictor</h1>
</header>

<main>
  <form class="form-container" id="form" onsubmit="return false">
{{INPUT_GROUPS}}
  </form>

  <div class="action-container">
    <button class="predict-button" id="predict-button" type="button">Predict Salary</button>
    <div class="salary-display" id="predicted-salary">{{PLACEHOLDER}}</div>
  </div>

  <div class="panel">
    <h4>NOTE: Some inputs are engineered features and need to be calculated</h4>
    <ul>
      <li><b>Shooting Efficiency</b> = (Field Goal % + Effective Field Goal %) / 2</li>
      <li><b>Weighted Efficiency (WEFF)</b> = (2·PTS + 1.5·AST + 1.2·TRB + STL + BLK − 0.5·(FGA − FG) − 0.5·(FTA − FT) − TOV) / Games</li>
      <li><b>Offensive Contribution</b> = PTS + 1.5·AST + ORB</li>
      <li><b>Defensive Contribution</b> = DRB + STL + BLK</li>
    </ul>
    <div class="calc" id="calc">
      <label>Games<input type="number" name="games" min="0"></label>
      <label>Points<input type="number" name="points" min="0"></label>
      <label>Assists<input type="number" name="assists" min="0"></label>
      <label>Off. Rebounds<input type="number" name="offensive_rebounds" min="0"></label>
      <label>Def. Rebounds<input type="number" name="defensive_rebounds" min="0"></label>
      <label>Steals<input type="number" name="steals" min="0"></label>
      <label>Blocks<input type="number" name="blocks" min="0"></label>
      <label>Turnovers<input type="number" name="turnovers" min="0"></label>
      <label>FG Made<input type="number" name="field_goals_made" min="0"></label>
      <label>FG Attempts<input type="number" name="field_goal_attempts" min="0"></label>
      <label>FT Made<input type="number" name="free_throws_made" min="0"></label>
      <label>FT Attempts<input type="number" name="free_throw_attempts" min="0"></label>
      <label>eFG %<input type="number" name="effective_field_goal_pct" min="0" max="1" step="0.01"></label>
    </div>
    <button class="predict-button" id="derive-button" type="button" style="margin-top:1rem">Calculate</button>
    <div class="calc-result" id="derive-result"></div>
  </div>
</main>

<footer>NBA Salary Predictor</footer>

<script>
const readout = el => {
  const v = Number(el.value);
  const text = el.dataset.fraction === 'true' ? v.toFixed(1) : String(v);
  document.getElementById(el.id + '-display').textContent = el.dataset.readout + ': ' + text;
};

document.querySelectorAll('input[type=range]').forEach(el => {
  el.addEventListener('input', () => readout(el));
});

function formState() {
  const state = { team: document.getElementById('team').value };
  document.querySelectorAll('input[type=range]').forEach(el => { state[el.id] = Number(el.value); });
  return state;
}

document.getElementById('predict-button').addEventListener('click', async () => {
  const btn = document.getElementById('predict-button');
  const out = document.getElementById('predicted-salary');
  btn.disabled = true;
  try {
    const r = await fetch('/api/predict', {
      method: 'POST',
      headers: { 'content-type': 'application/json' },
      body: JSON.stringify(formState()),
    });
    const body = await r.json().catch(() => ({ error: 'Unexpected response (' + r.status + ')' }));
    out.className = 'salary-display' + (r.ok ? '' : ' error');
    out.textContent = r.ok ? body.message : body.error;
  } catch (e) {
    out.className = 'salary-display error';
    out.textContent = 'Prediction failed: ' + e;
  } finally {
    btn.disabled = false;
  }
});

document.getElementById('derive-button').addEventListener('click', async () => {
  const totals = {};
  document.querySelectorAll('#calc input').forEach(el => {
    if (el.value !== '') totals[el.name] = Number(el.value);
  });
  const res = document.getElementById('derive-result');
  const r = await fetch('/api/derive', {
    method: 'POST',
    headers: { 'content-type': 'application/json' },
    body: JSON.stringify(totals),
  });
  const d = await r.json().catch(() => ({}));
  if (!r.ok) {
    res.textContent = 'Could not calculate: ' + (d.error || ('HTTP ' + r.status));
    return;
  }
  res.textContent = 'Shooting Efficiency ' + d.shooting_efficiency.toFixed(3)
    + ' · WEFF ' + d.weighted_efficiency.toFixed(2)
    + ' · Offensive Contribution ' + d.offensive_contribution.toFixed(1)
    + ' · Defensive Contribution ' + d.defensive_contribution.toFixed(1);
});
</script>
</body>
</html>"#;
