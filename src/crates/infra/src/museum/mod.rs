//! 上游博物馆 API 客户端
//!
//! 两个客户端共享同一个 `reqwest::Client`，不设置超时也不重试；
//! 任一错误都直接交给调用方。

pub mod cleveland;
pub mod vam;

use application::query::dao::SourceError;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const UNKNOWN: &str = "Unknown";

/// 构建共享的 HTTP 客户端
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder().user_agent(user_agent).build()
}

/// GET 并解析 JSON；404 映射为 NotFound，其它非 2xx 映射为 Status
pub(crate) async fn get_json<T, Q>(client: &Client, url: &str, query: &Q) -> Result<T, SourceError>
where
    T: DeserializeOwned,
    Q: Serialize + ?Sized,
{
    debug!("GET {}", url);
    let response = client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| SourceError::Transport(e.to_string()))?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(SourceError::NotFound);
    }
    if !status.is_success() {
        return Err(SourceError::Status(status.as_u16()));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| SourceError::Decode(e.to_string()))
}

/// 返回第一个非空（去掉空白后）的候选值
pub(crate) fn first_non_empty<'a, I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}
