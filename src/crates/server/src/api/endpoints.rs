use actix_web::{web::Json, Responder};
use once_cell::sync::Lazy;
use serde_json::{json, Value};

static ENDPOINTS: Lazy<Value> = Lazy::new(|| {
    json!({
        "endpoints": {
            "GET /api": {
                "description": "serves this list of endpoints"
            },
            "GET /api/artworks": {
                "description": "serves a page of artworks merged from the Victoria and Albert Museum and the Cleveland Museum of Art",
                "queries": ["page", "limit", "search", "sortBy"],
                "exampleResponse": {
                    "records": [{
                        "id": "O1193787",
                        "title": "Dish",
                        "artist": "Unknown",
                        "img_url": "https://framemark.vam.ac.uk/collections/2006AM6763/full/!100,100/0/default.jpg",
                        "medium": "Unknown",
                        "dimensions": "Unknown",
                        "techniques": [],
                        "summary": "No description available",
                        "source": "Victoria and Albert Museum"
                    }],
                    "currentPage": 1,
                    "totalPages": 20,
                    "totalRecords": 200
                }
            },
            "GET /api/artworks/:id": {
                "description": "serves a single artwork; numeric ids are looked up at the Cleveland Museum of Art, others at the Victoria and Albert Museum"
            },
            "GET /api/users": {
                "description": "serves all users with their collections"
            },
            "GET /api/users/:userId/collections": {
                "description": "serves every collection of a user"
            },
            "POST /api/users/:userId/collections": {
                "description": "creates an empty collection",
                "exampleBody": { "collectionName": "favourites" }
            },
            "GET /api/users/:userId/collections/:collectionName": {
                "description": "serves the artwork ids in one collection"
            },
            "POST /api/users/:userId/collections/:collectionName": {
                "description": "adds an artwork to a collection",
                "exampleBody": { "artworkId": "O1193787" }
            },
            "DELETE /api/users/:userId/collections/:collectionName": {
                "description": "removes an artwork from a collection",
                "exampleBody": { "artworkId": "O1193787" }
            }
        }
    })
});

pub async fn get_endpoints() -> impl Responder {
    Json(&*ENDPOINTS)
}
