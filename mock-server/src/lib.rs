//! In-memory stand-in for the animal spotter backend.
//!
//! Serves the same routes as the real service under `/api`, plus a small
//! `/images/{file}` endpoint so `imageURL`s in seeded records resolve
//! against the server itself.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use image::{codecs::png::PngEncoder, ExtendedColorType, ImageEncoder};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Animal {
    pub name: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "timeSeen")]
    pub time_seen: i64,
    #[serde(rename = "imageURL")]
    pub image_url: String,
}

#[derive(Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Token {
    pub token: String,
}

/// Users by name, issued tokens, and sightings keyed by animal name.
#[derive(Default)]
pub struct Store {
    users: HashMap<String, String>,
    tokens: HashMap<String, String>,
    animals: BTreeMap<String, Animal>,
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
struct AppState {
    db: Db,
    images: Arc<HashMap<String, [u8; 3]>>,
}

/// Seed sightings: name, description, lat, long, time seen, image slug, colour.
const SEED: &[(&str, &str, f64, f64, i64, &str, [u8; 3])] = &[
    (
        "Red Panda",
        "Spotted napping in a rhododendron.",
        27.98,
        86.92,
        1_600_000_000,
        "red-panda",
        [200, 80, 40],
    ),
    (
        "Snow Leopard",
        "Tracks along the ridge, then a glimpse of a tail.",
        35.88,
        76.51,
        1_600_086_400,
        "snow-leopard",
        [220, 220, 210],
    ),
    (
        "Kingfisher",
        "Dove twice from the same branch.",
        51.50,
        -0.12,
        1_600_172_800,
        "kingfisher",
        [30, 120, 200],
    ),
];

/// Build the router. `public_url` is the scheme and authority clients use to
/// reach this server; seeded `imageURL`s are built from it.
pub fn app(public_url: &str) -> Router {
    let public_url = public_url.trim_end_matches('/');
    let mut store = Store::default();
    let mut images = HashMap::new();
    for &(name, description, latitude, longitude, time_seen, slug, colour) in SEED {
        store.animals.insert(
            name.to_string(),
            Animal {
                name: name.to_string(),
                description: description.to_string(),
                latitude,
                longitude,
                time_seen,
                image_url: format!("{public_url}/images/{slug}.png"),
            },
        );
        images.insert(format!("{slug}.png"), colour);
    }

    let state = AppState {
        db: Arc::new(RwLock::new(store)),
        images: Arc::new(images),
    };

    Router::new()
        .route("/api/users/signup", post(sign_up))
        .route("/api/users/login", post(login))
        .route("/api/animals/all", get(list_animals))
        .route("/api/animals/{name}", get(get_animal))
        .route("/images/{file}", get(get_image))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    axum::serve(listener, app(&format!("http://{addr}"))).await
}

async fn sign_up(State(state): State<AppState>, Json(input): Json<Credentials>) -> StatusCode {
    if input.username.is_empty() || input.password.is_empty() {
        return StatusCode::BAD_REQUEST;
    }
    let mut db = state.db.write().await;
    if db.users.contains_key(&input.username) {
        warn!(username = %input.username, "sign up for existing user");
        return StatusCode::CONFLICT;
    }
    info!(username = %input.username, "user signed up");
    db.users.insert(input.username, input.password);
    StatusCode::OK
}

async fn login(
    State(state): State<AppState>,
    Json(input): Json<Credentials>,
) -> Result<Json<Token>, StatusCode> {
    let mut db = state.db.write().await;
    if db.users.get(&input.username) != Some(&input.password) {
        warn!(username = %input.username, "rejected login");
        return Err(StatusCode::UNAUTHORIZED);
    }
    let token = Uuid::new_v4().to_string();
    db.tokens.insert(token.clone(), input.username);
    Ok(Json(Token { token }))
}

async fn list_animals(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<String>>, StatusCode> {
    let db = state.db.read().await;
    authorize(&db, &headers)?;
    Ok(Json(db.animals.keys().cloned().collect()))
}

async fn get_animal(
    State(state): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Animal>, StatusCode> {
    let db = state.db.read().await;
    authorize(&db, &headers)?;
    debug!(animal = %name, "detail lookup");
    db.animals.get(&name).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn get_image(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let colour = state.images.get(&file).ok_or(StatusCode::NOT_FOUND)?;
    let png = solid_png(*colour, 8, 8).map_err(|e| {
        warn!(file = %file, error = %e, "failed to encode image");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

/// Accept only `Authorization: Bearer <token>` for a token this server issued.
fn authorize(db: &Store, headers: &HeaderMap) -> Result<(), StatusCode> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;
    if db.tokens.contains_key(token) {
        Ok(())
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

fn solid_png(rgb: [u8; 3], width: u32, height: u32) -> Result<Vec<u8>, image::ImageError> {
    let pixels: Vec<u8> = (0..width * height).flat_map(|_| rgb).collect();
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf).write_image(&pixels, width, height, ExtendedColorType::Rgb8)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn animal_serializes_with_wire_names() {
        let animal = Animal {
            name: "Red Panda".to_string(),
            description: "...".to_string(),
            latitude: 1.0,
            longitude: 2.0,
            time_seen: 1_600_000_000,
            image_url: "http://x/y.png".to_string(),
        };
        let json = serde_json::to_value(&animal).unwrap();
        assert_eq!(json["timeSeen"], 1_600_000_000);
        assert_eq!(json["imageURL"], "http://x/y.png");
        assert!(json.get("time_seen").is_none());
    }

    #[test]
    fn credentials_reject_missing_password() {
        let result: Result<Credentials, _> = serde_json::from_str(r#"{"username":"a"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn solid_png_has_png_signature() {
        let png = solid_png([1, 2, 3], 2, 2).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn authorize_requires_issued_token() {
        let mut store = Store::default();
        store.tokens.insert("good".to_string(), "a".to_string());

        let mut headers = HeaderMap::new();
        assert_eq!(authorize(&store, &headers), Err(StatusCode::UNAUTHORIZED));

        headers.insert(header::AUTHORIZATION, "Bearer bad".parse().unwrap());
        assert_eq!(authorize(&store, &headers), Err(StatusCode::UNAUTHORIZED));

        headers.insert(header::AUTHORIZATION, "good".parse().unwrap());
        assert_eq!(authorize(&store, &headers), Err(StatusCode::UNAUTHORIZED));

        headers.insert(header::AUTHORIZATION, "Bearer good".parse().unwrap());
        assert_eq!(authorize(&store, &headers), Ok(()));
    }
}
