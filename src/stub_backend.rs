//! In-memory stand-in for the product backend, speaking the same HTTP/JSON API.

pub mod product_store;

use crate::{
    errors::store_error::StoreError,
    models::product_model::{Product, ProductDraft, ProductId},
};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{body::Incoming, Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use product_store::ProductStore;
use serde::{de::DeserializeOwned, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

pub const API_BASE_PATH: &str = "/api/product";

type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

enum Target {
    Collection,
    Item(ProductId),
}

/// Accepts connections until the listener fails. Each connection is served on its own task.
pub async fn serve(listener: TcpListener, store: Arc<ProductStore>) -> std::io::Result<()> {
    info!("Stub backend serving {} on http://{}", API_BASE_PATH, listener.local_addr()?);

    loop {
        let (stream, peer) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let store = Arc::clone(&store);

        tokio::task::spawn(async move {
            let service = service_fn(move |req| handle_request(req, Arc::clone(&store)));
            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                error!("Error serving connection from {}: {:?}", peer, err);
            }
        });
    }
}

async fn handle_request(
    req: Request<Incoming>,
    store: Arc<ProductStore>,
) -> Result<Response<BoxBody>, Infallible> {
    info!("Handling request: {} {}", req.method(), req.uri());

    if req.method() == Method::OPTIONS {
        return Ok(with_cors(response(StatusCode::NO_CONTENT, empty_body())));
    }

    let response = match route(req, &store).await {
        Ok(response) => response,
        Err(err) => {
            warn!("Request failed: {}", err);
            json_response(err.status(), &serde_json::json!({ "error": err.to_string() }))
        }
    };

    Ok(with_cors(response))
}

async fn route(
    req: Request<Incoming>,
    store: &ProductStore,
) -> Result<Response<BoxBody>, StoreError> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let not_found = || StoreError::RouteNotFound {
        method: method.to_string(),
        path: path.clone(),
    };
    let target = parse_target(&path).ok_or_else(not_found)?;

    match (&method, target) {
        (&Method::GET, Target::Collection) => {
            Ok(json_response(StatusCode::OK, &store.list_products().await))
        }
        (&Method::POST, Target::Collection) => {
            let draft: ProductDraft = read_json(req).await?;
            let created = store.create_product(draft).await?;
            Ok(json_response(StatusCode::CREATED, &created))
        }
        (&Method::GET, Target::Item(id)) => {
            Ok(json_response(StatusCode::OK, &store.get_product(id).await?))
        }
        (&Method::PUT, Target::Item(id)) => {
            let product: Product = read_json(req).await?;
            let updated = store.update_product(id, product).await?;
            Ok(json_response(StatusCode::OK, &updated))
        }
        (&Method::DELETE, Target::Item(id)) => {
            store.delete_product(id).await?;
            Ok(response(StatusCode::NO_CONTENT, empty_body()))
        }
        _ => Err(not_found()),
    }
}

fn parse_target(path: &str) -> Option<Target> {
    let rest = path.strip_prefix(API_BASE_PATH)?;
    match rest.trim_end_matches('/') {
        "" => Some(Target::Collection),
        id => id.strip_prefix('/')?.parse().ok().map(Target::Item),
    }
}

async fn read_json<T: DeserializeOwned>(req: Request<Incoming>) -> Result<T, StoreError> {
    let body_bytes = req.collect().await?.to_bytes();
    Ok(serde_json::from_slice(&body_bytes)?)
}

fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Response<BoxBody> {
    match serde_json::to_vec(value) {
        Ok(body) => {
            let mut response = response(status, full_body(body));
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            response
        }
        Err(err) => {
            error!("Failed to encode response: {}", err);
            response(StatusCode::INTERNAL_SERVER_ERROR, empty_body())
        }
    }
}

fn response(status: StatusCode, body: BoxBody) -> Response<BoxBody> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
}

fn with_cors(mut response: Response<BoxBody>) -> Response<BoxBody> {
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type"));
    response
}

fn empty_body() -> BoxBody {
    Full::new(Bytes::new())
        .map_err(|never| match never {})
        .boxed()
}

fn full_body<T: Into<Bytes>>(chunk: T) -> BoxBody {
    Full::new(chunk.into())
        .map_err(|never| match never {})
        .boxed()
}
