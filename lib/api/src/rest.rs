use actix_cors::Cors;
use actix_multipart::{Field, Multipart};
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use futures_util::StreamExt;
use lookalike_core::{CatalogQuery, FilterCondition, Product};
use lookalike_similarity::{
    apply_threshold, available_tags, Refinement, ScoredCandidate, SearchMetadata, SearchStats,
    SimilarityScorer, WeightConfig,
};
use lookalike_storage::{StorageManager, DEFAULT_CATALOG};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;
use crate::error::ApiError;

const DEFAULT_PRODUCT_LIMIT: usize = 50;
const DEFAULT_SEARCH_LIMIT: usize = 20;
const DEFAULT_MIN_SIMILARITY: f64 = 0.6;
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

type Storage = web::Data<Arc<StorageManager>>;

fn default_category() -> String {
    "all".to_string()
}

fn default_product_limit() -> usize {
    DEFAULT_PRODUCT_LIMIT
}

fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

fn default_min_similarity() -> f64 {
    DEFAULT_MIN_SIMILARITY
}

#[derive(Deserialize)]
struct ProductsQuery {
    category: Option<String>,
    #[serde(default = "default_product_limit")]
    limit: usize,
    #[serde(default)]
    skip: usize,
}

/// Everything about a search except the query image
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchParams {
    #[serde(default = "default_category")]
    category: String,
    #[serde(default = "default_search_limit")]
    limit: usize,
    #[serde(default = "default_min_similarity")]
    min_similarity: f64,
    /// Per-factor weight overrides
    #[serde(default)]
    weights: HashMap<String, f64>,
    #[serde(default)]
    refine: Option<Refinement>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            category: default_category(),
            limit: DEFAULT_SEARCH_LIMIT,
            min_similarity: DEFAULT_MIN_SIMILARITY,
            weights: HashMap::new(),
            refine: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest {
    image_url: Option<String>,
    #[serde(flatten)]
    params: SearchParams,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    success: bool,
    query_image: String,
    results: Vec<ScoredCandidate<Product>>,
    stats: SearchStats,
    metadata: SearchMetadata,
    available_tags: Vec<String>,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(
        storage: Arc<StorageManager>,
        host: &str,
        port: u16,
    ) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .wrap(Logger::default())
                .app_data(web::Data::new(storage.clone()))
                .configure(configure)
        })
        .bind((host, port))?
        .run()
        .await
    }
}

/// Register every route; storage must be registered as `web::Data<Arc<StorageManager>>`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .route("/products", web::get().to(list_products))
    .route("/products/{id}", web::get().to(get_product))
    .route("/categories", web::get().to(list_categories))
    .route("/search", web::post().to(search))
    .route("/search/upload", web::post().to(search_upload))
    .route("/seed", web::post().to(seed))
    .route("/catalog/save", web::post().to(save_catalog))
    .route("/snapshots", web::get().to(list_snapshots))
    .route("/snapshots", web::post().to(create_snapshot))
    .route("/snapshots/{name}", web::delete().to(delete_snapshot))
    .route("/snapshots/{name}/recover", web::post().to(recover_snapshot));
}

/// Run blocking work (scoring, disk IO) off the async workers
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    web::block(f)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
}

async fn list_products(
    storage: Storage,
    query: web::Query<ProductsQuery>,
) -> ActixResult<HttpResponse> {
    let query = query.into_inner();
    let filter = query.category.as_deref().and_then(FilterCondition::category);

    let products = storage.products().find(
        &CatalogQuery::new()
            .with_filter(filter)
            .skip(query.skip)
            .limit(query.limit),
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "products": products,
    })))
}

async fn get_product(
    storage: Storage,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let product = storage.products().require(&id)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "product": product,
    })))
}

async fn list_categories(storage: Storage) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "categories": storage.products().categories(),
    })))
}

/// Score the catalog against `identifier`: fetch `limit * 2` candidates,
/// rank them, keep those above `min_similarity`, then refine
fn run_search(
    storage: &StorageManager,
    identifier: String,
    params: &SearchParams,
) -> Result<SearchResponse, ApiError> {
    let start = Instant::now();

    let weights = WeightConfig::default().with_overrides(&params.weights)?;
    let filter = FilterCondition::category(&params.category);
    // "all" only widens the catalog query; the scorer still sees it
    let filtered_category = filter.is_some().then_some(params.category.as_str());
    let query_category = (!params.category.is_empty()).then_some(params.category.as_str());

    let candidates = storage.products().find(
        &CatalogQuery::new()
            .with_filter(filter)
            .limit(params.limit.saturating_mul(2)),
    );
    let total_scanned = candidates.len();

    let ranked = SimilarityScorer::new(weights).score_products(&identifier, candidates, query_category);
    let mut results = apply_threshold(ranked, params.min_similarity, params.limit);
    if let Some(refine) = params.refine.as_ref().filter(|r| !r.is_noop()) {
        results = refine.apply(results);
    }

    let stats = SearchStats::compute(&results, start.elapsed());
    info!(
        query = %identifier,
        category = filtered_category.unwrap_or("all"),
        scanned = total_scanned,
        returned = results.len(),
        search_time = stats.search_time,
        "search completed"
    );

    Ok(SearchResponse {
        success: true,
        available_tags: available_tags(&results),
        metadata: SearchMetadata::new(total_scanned, params.min_similarity, filtered_category),
        query_image: identifier,
        results,
        stats,
    })
}

async fn search(
    storage: Storage,
    req: web::Json<SearchRequest>,
) -> Result<HttpResponse, ApiError> {
    let SearchRequest { image_url, params } = req.into_inner();
    let image_url = image_url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Image URL is required".to_string()))?;

    let storage = storage.get_ref().clone();
    let response = blocking(move || run_search(&storage, image_url, &params)).await?;
    Ok(HttpResponse::Ok().json(response))
}

async fn read_field(field: &mut Field, limit: usize) -> Result<Vec<u8>, ApiError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk?;
        if data.len() + chunk.len() > limit {
            return Err(ApiError::BadRequest(format!(
                "Upload exceeds {} bytes",
                limit
            )));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

fn parse_text<T: std::str::FromStr>(name: &str, raw: &[u8]) -> Result<T, ApiError> {
    std::str::from_utf8(raw)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid value for '{}'", name)))
}

/// Search with an uploaded image. The bytes are never decoded: the upload
/// gets a fresh opaque identifier and is searched like any URL.
async fn search_upload(
    storage: Storage,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let mut params = SearchParams::default();
    let mut upload: Option<(String, usize)> = None;

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let name = field.name().unwrap_or_default().to_string();

        let is_image = field
            .content_type()
            .map(|mime| mime.type_() == "image")
            .unwrap_or(false);

        if is_image {
            let filename = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .filter(|f| !f.is_empty())
                .unwrap_or("image")
                .to_string();
            let size = read_field(&mut field, MAX_UPLOAD_BYTES).await?.len();
            upload = Some((filename, size));
            continue;
        }

        let value = read_field(&mut field, 1024).await?;
        match name.as_str() {
            "category" => params.category = parse_text(&name, &value)?,
            "limit" => params.limit = parse_text(&name, &value)?,
            "minSimilarity" => params.min_similarity = parse_text(&name, &value)?,
            "file" | "image" => {
                return Err(ApiError::BadRequest("Uploaded file must be an image".to_string()))
            }
            _ => {}
        }
    }

    let (filename, size) =
        upload.ok_or_else(|| ApiError::BadRequest("Image file is required".to_string()))?;
    let identifier = format!("upload://{}/{}", Uuid::new_v4(), filename);
    info!(identifier = %identifier, bytes = size, "image uploaded");

    let storage = storage.get_ref().clone();
    let response = blocking(move || run_search(&storage, identifier, &params)).await?;
    Ok(HttpResponse::Ok().json(response))
}

async fn seed(storage: Storage) -> Result<HttpResponse, ApiError> {
    let count = storage.seed()?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": format!("Successfully seeded {} products", count),
    })))
}

async fn save_catalog(storage: Storage) -> Result<HttpResponse, ApiError> {
    let storage = storage.get_ref().clone();
    let last_save_time = blocking(move || {
        storage.save()?;
        Ok(storage.last_save_time())
    })
    .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "lastSaveTime": last_save_time,
    })))
}

async fn list_snapshots(storage: Storage) -> Result<HttpResponse, ApiError> {
    let snapshots = storage.list_catalog_snapshots(DEFAULT_CATALOG)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "snapshots": snapshots,
    })))
}

async fn create_snapshot(storage: Storage) -> Result<HttpResponse, ApiError> {
    let storage = storage.get_ref().clone();
    let snapshot = blocking(move || Ok(storage.create_catalog_snapshot(DEFAULT_CATALOG)?)).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "snapshot": snapshot,
    })))
}

async fn delete_snapshot(
    storage: Storage,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let name = path.into_inner();

    if storage.delete_catalog_snapshot(DEFAULT_CATALOG, &name)? {
        Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
        })))
    } else {
        Err(ApiError::NotFound(format!("Snapshot not found: {}", name)))
    }
}

async fn recover_snapshot(
    storage: Storage,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let name = path.into_inner();
    let exists = storage
        .list_catalog_snapshots(DEFAULT_CATALOG)?
        .iter()
        .any(|s| s.name == name);
    if !exists {
        return Err(ApiError::NotFound(format!("Snapshot not found: {}", name)));
    }

    let storage = storage.get_ref().clone();
    let count = blocking(move || Ok(storage.recover_from_snapshot(DEFAULT_CATALOG, &name)?.count())).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": format!("Recovered {} products", count),
    })))
}
