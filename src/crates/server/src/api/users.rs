use crate::consts;
use crate::error::ApiError;
use crate::AppState;
use actix_web::{web, HttpResponse, Scope};
use application::command::collection::{CollectionArtworkCmd, CreateCollectionCmd};
use model::user::UserCollections;
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// `{"artworkId": "O1193787"}`，Cleveland 的 ID 也可以是数字
#[derive(Debug, Deserialize)]
pub struct ArtworkBody {
    #[serde(rename = "artworkId", default)]
    artwork_id: Option<Value>,
}

impl ArtworkBody {
    /// 既不是字符串也不是数字时返回空串，交给命令层校验
    fn artwork_id(&self) -> String {
        match &self.artwork_id {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CollectionBody {
    #[serde(rename = "collectionName", default)]
    collection_name: Option<Value>,
}

pub async fn list_users(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let users = state
        .get_users()
        .list()
        .await
        .map_err(|e| ApiError::from_query(e, "Failed to fetch users"))?;
    Ok(HttpResponse::Ok().json(json!({ "users": users })))
}

pub async fn get_collections(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    let result = state
        .get_users()
        .get_collections(&user_id)
        .await
        .map_err(|e| ApiError::from_query(e, "Failed to fetch collections"))?;

    let body = match result {
        UserCollections::Found {
            username,
            collections,
        } => json!({ "username": username, "collections": collections }),
        UserCollections::Empty => json!({ "msg": "No Collections Found" }),
    };
    Ok(HttpResponse::Ok().json(body))
}

pub async fn create_collection(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<CollectionBody>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    let Some(Value::String(collection_name)) = body.into_inner().collection_name else {
        return Err(ApiError::BadRequest("Invalid collection name".to_string()));
    };

    let cmd = CreateCollectionCmd {
        user_id,
        collection_name: collection_name.clone(),
    };
    let collections = state
        .collection_service()
        .create_collection(cmd)
        .await
        .map_err(|e| ApiError::from_app(e, "Failed to create collection"))?;

    Ok(HttpResponse::Created().json(json!({
        "msg": format!("Collection '{}' created", collection_name.trim()),
        "collections": collections,
    })))
}

pub async fn get_collection(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (user_id, collection_name) = path.into_inner();
    let artwork_ids = state
        .get_users()
        .get_collection(&user_id, &collection_name)
        .await
        .map_err(|e| ApiError::from_query(e, "Failed to fetch collection"))?;

    let mut body = Map::new();
    body.insert(collection_name.trim().to_string(), json!(artwork_ids));
    Ok(HttpResponse::Ok().json(Value::Object(body)))
}

pub async fn add_artwork(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    body: web::Json<ArtworkBody>,
) -> Result<HttpResponse, ApiError> {
    let (user_id, collection_name) = path.into_inner();
    let artwork_id = body.artwork_id();
    let cmd = CollectionArtworkCmd {
        user_id,
        collection_name: collection_name.clone(),
        artwork_id: artwork_id.clone(),
    };
    let collection = state
        .collection_service()
        .add_artwork(cmd)
        .await
        .map_err(|e| ApiError::from_app(e, "Failed to add artwork"))?;

    Ok(HttpResponse::Created().json(json!({
        "msg": format!("Artwork {} added to collection '{}'", artwork_id.trim(), collection_name.trim()),
        "collection": collection,
    })))
}

pub async fn remove_artwork(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    body: web::Json<ArtworkBody>,
) -> Result<HttpResponse, ApiError> {
    let (user_id, collection_name) = path.into_inner();
    let artwork_id = body.artwork_id();
    let cmd = CollectionArtworkCmd {
        user_id,
        collection_name: collection_name.clone(),
        artwork_id: artwork_id.clone(),
    };
    state
        .collection_service()
        .remove_artwork(cmd)
        .await
        .map_err(|e| ApiError::from_app(e, "Failed to remove artwork"))?;

    Ok(HttpResponse::Ok().json(json!({
        "msg": format!("Artwork {} removed from collection '{}'", artwork_id.trim(), collection_name.trim()),
    })))
}

pub fn scope() -> Scope {
    web::scope(consts::URL_PATH_USERS)
        .route("", web::get().to(list_users))
        .service(
            web::resource("/{user_id}/collections")
                .route(web::get().to(get_collections))
                .route(web::post().to(create_collection)),
        )
        .service(
            web::resource("/{user_id}/collections/{collection_name}")
                .route(web::get().to(get_collection))
                .route(web::post().to(add_artwork))
                .route(web::delete().to(remove_artwork)),
        )
}
