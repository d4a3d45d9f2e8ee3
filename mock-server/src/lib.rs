use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

/// Where API requests are sent instead of being answered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RedirectMode {
    /// Answer normally.
    #[default]
    Off,
    /// 303 to an HTML login page.
    Login,
    /// 303 to a path nothing serves (404).
    Missing,
    /// 303 to a host that refuses connections.
    Unreachable,
    /// 303 to a route that redirects to itself forever.
    Loop,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Module {
    pub module: String,
    pub name: String,
    pub activated: bool,
    #[serde(default)]
    pub options: Map<String, Value>,
}

#[derive(Debug)]
pub struct Site {
    pub connected: bool,
    pub user_linked: bool,
    pub modules: BTreeMap<String, Module>,
    pub settings: Map<String, Value>,
    pub dismissed_notices: Vec<String>,
    pub redirect: RedirectMode,
    pub stats_error: bool,
}

impl Default for Site {
    fn default() -> Self {
        let modules = [
            ("akismet", "Akismet", true),
            ("monitor", "Monitor", false),
            ("protect", "Protect", true),
            ("stats", "Site Stats", true),
            ("vaultpress", "VaultPress", false),
        ]
        .into_iter()
        .map(|(slug, name, activated)| {
            let module = Module {
                module: slug.to_string(),
                name: name.to_string(),
                activated,
                options: Map::new(),
            };
            (slug.to_string(), module)
        })
        .collect();

        let mut settings = Map::new();
        settings.insert("carousel_background_color".to_string(), json!("black"));
        settings.insert("comment_likes".to_string(), json!(false));
        settings.insert("infinite_scroll".to_string(), json!(true));

        Self {
            connected: true,
            user_linked: true,
            modules,
            settings,
            dismissed_notices: Vec::new(),
            redirect: RedirectMode::Off,
            stats_error: false,
        }
    }
}

pub type Db = Arc<RwLock<Site>>;

pub const LOGIN_PATH: &str = "/wp-login.php";
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:9/unreachable";

const LOGIN_PAGE: &str = "<!doctype html><html><body><form id=\"loginform\"></form></body></html>";

pub fn new_db() -> Db {
    Arc::new(RwLock::new(Site::default()))
}

pub fn app() -> Router {
    app_with_db(new_db())
}

pub fn app_with_db(db: Db) -> Router {
    let api = Router::new()
        .route("/connection", get(connection_status).post(update_connection))
        .route("/connection/url", get(connect_url))
        .route("/connection/user", post(update_user_link))
        .route("/module/all", get(list_modules))
        .route("/module/stats/data", get(stats_data))
        .route("/module/vaultpress/data", get(vaultpress_data))
        .route("/module/{slug}", get(get_module).post(update_module_options))
        .route("/module/{slug}/active", post(set_module_active))
        .route("/settings", get(get_settings).post(update_settings))
        .route("/site", get(site_data))
        .route("/notice/{notice}", post(dismiss_notice))
        .route_layer(middleware::from_fn_with_state(db.clone(), redirect_guard));

    Router::new()
        .nest("/jetpack/v4", api)
        .route(LOGIN_PATH, get(login_page))
        .route("/loop", get(redirect_loop).post(redirect_loop))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, new_db()).await
}

pub async fn serve(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_db(db)).await
}

/// WordPress REST style error body.
fn rest_error(status: StatusCode, code: &str, message: &str) -> (StatusCode, Json<Value>) {
    let body = json!({
        "code": code,
        "message": message,
        "data": { "status": status.as_u16() },
    });
    (status, Json(body))
}

async fn redirect_guard(State(db): State<Db>, request: Request, next: Next) -> Response {
    let mode = db.read().await.redirect;
    match mode {
        RedirectMode::Off => next.run(request).await,
        RedirectMode::Login => Redirect::to(LOGIN_PATH).into_response(),
        RedirectMode::Missing => Redirect::to("/gone").into_response(),
        RedirectMode::Unreachable => Redirect::to(UNREACHABLE_URL).into_response(),
        RedirectMode::Loop => Redirect::to("/loop").into_response(),
    }
}

async fn login_page() -> Html<&'static str> {
    Html(LOGIN_PAGE)
}

async fn redirect_loop() -> Redirect {
    Redirect::to("/loop")
}

// --- connection ---

#[derive(Deserialize)]
pub struct ConnectionUpdate {
    #[serde(rename = "isActive")]
    pub is_active: bool,
}

#[derive(Deserialize)]
pub struct UserLink {
    pub linked: bool,
}

async fn connection_status(State(db): State<Db>) -> Json<Value> {
    let site = db.read().await;
    Json(json!({
        "isActive": site.connected,
        "isStaging": false,
        "devMode": { "isActive": false },
    }))
}

async fn update_connection(
    State(db): State<Db>,
    Json(input): Json<ConnectionUpdate>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if input.is_active {
        return Err(rest_error(
            StatusCode::BAD_REQUEST,
            "invalid_param",
            "Use the connect URL to connect the site.",
        ));
    }
    db.write().await.connected = false;
    tracing::debug!("site disconnected");
    Ok(Json(json!({ "code": "success", "disconnected": true })))
}

async fn connect_url() -> Json<Value> {
    Json(json!("https://jetpack.wordpress.com/jetpack.authorize/1/"))
}

async fn update_user_link(
    State(db): State<Db>,
    Json(input): Json<UserLink>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if input.linked {
        return Err(rest_error(
            StatusCode::BAD_REQUEST,
            "invalid_param",
            "Users can only be unlinked here.",
        ));
    }
    db.write().await.user_linked = false;
    Ok(Json(json!({ "code": "success", "unlinked": true })))
}

// --- modules ---

#[derive(Deserialize)]
pub struct ModuleActivation {
    pub active: bool,
}

async fn list_modules(State(db): State<Db>) -> Json<BTreeMap<String, Module>> {
    Json(db.read().await.modules.clone())
}

async fn get_module(
    State(db): State<Db>,
    Path(slug): Path<String>,
) -> Result<Json<Module>, (StatusCode, Json<Value>)> {
    let site = db.read().await;
    site.modules
        .get(&slug)
        .cloned()
        .map(Json)
        .ok_or_else(|| rest_error(StatusCode::NOT_FOUND, "not_found", "The requested module was not found."))
}

async fn set_module_active(
    State(db): State<Db>,
    Path(slug): Path<String>,
    Json(input): Json<ModuleActivation>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut site = db.write().await;
    let module = site
        .modules
        .get_mut(&slug)
        .ok_or_else(|| rest_error(StatusCode::NOT_FOUND, "not_found", "The requested module was not found."))?;
    module.activated = input.active;
    tracing::debug!(slug = %slug, active = input.active, "module toggled");
    let verb = if input.active { "activated" } else { "deactivated" };
    Ok(Json(json!({
        "code": "success",
        "message": format!("The requested module was {verb}."),
    })))
}

async fn update_module_options(
    State(db): State<Db>,
    Path(slug): Path<String>,
    Json(input): Json<Map<String, Value>>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut site = db.write().await;
    let module = site
        .modules
        .get_mut(&slug)
        .ok_or_else(|| rest_error(StatusCode::NOT_FOUND, "not_found", "The requested module was not found."))?;
    module.options.extend(input);
    Ok(Json(json!({ "code": "success", "options": module.options })))
}

// --- settings ---

async fn get_settings(State(db): State<Db>) -> Json<Map<String, Value>> {
    Json(db.read().await.settings.clone())
}

async fn update_settings(
    State(db): State<Db>,
    Json(input): Json<Map<String, Value>>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut site = db.write().await;
    let unknown: Vec<&str> = input
        .keys()
        .filter(|key| !site.settings.contains_key(*key))
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        let message = format!("Invalid parameter(s): {}", unknown.join(", "));
        return Err(rest_error(StatusCode::BAD_REQUEST, "rest_invalid_param", &message));
    }
    site.settings.extend(input.clone());
    Ok(Json(json!({ "code": "success", "updated": input })))
}

// --- data endpoints ---

#[derive(Deserialize)]
pub struct StatsQuery {
    #[serde(default = "default_range")]
    pub range: String,
}

fn default_range() -> String {
    "day".to_string()
}

async fn stats_data(State(db): State<Db>, Query(query): Query<StatsQuery>) -> Json<Value> {
    if db.read().await.stats_error {
        return Json(json!({
            "general": { "response": { "errors": { "http_request_failed": ["stats unavailable"] } } },
        }));
    }
    let mut body = Map::new();
    body.insert("general".to_string(), json!({ "stats": { "visitors_today": 3 } }));
    body.insert(query.range, json!({ "data": [[ "2024-01-01", 3 ]] }));
    Json(Value::Object(body))
}

/// The data endpoints below send their payload JSON-encoded inside `data`.
fn double_encoded(data: Value) -> Json<Value> {
    Json(json!({ "code": "success", "data": data.to_string() }))
}

async fn vaultpress_data() -> Json<Value> {
    double_encoded(json!({ "backups": { "last_backup": "2024-01-01 00:00:00" } }))
}

async fn site_data(State(db): State<Db>) -> Json<Value> {
    let connected = db.read().await.connected;
    double_encoded(json!({
        "ID": 42,
        "plan": { "product_slug": "jetpack_free" },
        "is_connected": connected,
    }))
}

async fn dismiss_notice(State(db): State<Db>, Path(notice): Path<String>) -> Json<Value> {
    db.write().await.dismissed_notices.push(notice);
    Json(json!({ "success": true }))
}
