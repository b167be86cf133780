pub const URL_PATH_API: &str = "/api";
pub const URL_PATH_ARTWORKS: &str = "/artworks";
pub const URL_PATH_USERS: &str = "/users";
