use crate::query::dao::{ArtworkSource, SourceQuery};
use crate::query::shared::{contains_ignore_case, SortKeyNormalizer};
use crate::query::QueryError;
use log::{debug, error};
use model::artwork::{Artwork, ArtworkPage, SortKey};
use std::sync::Arc;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const INVALID_QUERY_PARAMETERS: &str = "Invalid query parameters";

/// 作品列表查询的原始参数（未校验）
#[derive(Debug, Clone, Default)]
pub struct ArtworkQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
}

/// 校验后的分页请求
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub sort_by: Option<SortKey>,
}

impl PageRequest {
    pub fn parse(query: ArtworkQuery) -> Result<Self, QueryError> {
        let page = positive_or_default(query.page.as_deref(), DEFAULT_PAGE)?;
        let limit = positive_or_default(query.limit.as_deref(), DEFAULT_LIMIT)?;
        let sort_by = match query.sort_by.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(key) => Some(
                key.parse::<SortKey>()
                    .map_err(|_| QueryError::InvalidInput(INVALID_QUERY_PARAMETERS.to_string()))?,
            ),
        };
        let search = query
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            page,
            limit,
            search,
            sort_by,
        })
    }

    /// 当前页第一条记录在合并列表中的下标
    pub fn offset(&self) -> usize {
        (self.page as usize - 1).saturating_mul(self.limit as usize)
    }
}

/// 缺省时用默认值；给出但不是正整数时报错
fn positive_or_default(raw: Option<&str>, default: u32) -> Result<u32, QueryError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse::<u32>()
            .ok()
            .filter(|v| *v > 0)
            .ok_or_else(|| QueryError::InvalidInput(INVALID_QUERY_PARAMETERS.to_string())),
    }
}

/// 跨两个博物馆的作品聚合查询
///
/// 两个上游并发请求，合并后依次：过滤无图记录、按标题/作者搜索、排序、分页。
#[derive(Clone)]
pub struct GetArtworks {
    primary: Arc<dyn ArtworkSource>,
    secondary: Arc<dyn ArtworkSource>,
    normalizer: Arc<dyn SortKeyNormalizer>,
    max_window: u32,
}

impl GetArtworks {
    pub fn new(
        primary: Arc<dyn ArtworkSource>,
        secondary: Arc<dyn ArtworkSource>,
        normalizer: Arc<dyn SortKeyNormalizer>,
        max_window: u32,
    ) -> Self {
        Self {
            primary,
            secondary,
            normalizer,
            max_window: max_window.max(1),
        }
    }

    pub async fn handle(&self, query: ArtworkQuery) -> Result<ArtworkPage, QueryError> {
        let request = PageRequest::parse(query)?;
        // 每页都取同样大小的窗口，合并排序后的列表和总数才与页码无关
        let source_query = SourceQuery {
            search: request.search.clone(),
            window: self.max_window,
        };
        debug!("fetching artworks {:?}", source_query);

        let (mut records, secondary) = futures::try_join!(
            self.fetch(self.primary.as_ref(), &source_query),
            self.fetch(self.secondary.as_ref(), &source_query),
        )?;
        records.extend(secondary);

        paginate(records, &request, self.normalizer.as_ref())
    }

    async fn fetch(
        &self,
        source: &dyn ArtworkSource,
        query: &SourceQuery,
    ) -> Result<Vec<Artwork>, QueryError> {
        source.search(query).await.map_err(|e| {
            error!("Error fetching data from {}: {}", source.label(), e);
            QueryError::UpstreamError(format!("{}: {}", source.label(), e))
        })
    }
}

/// 对合并后的记录过滤、排序并切出请求的页
pub fn paginate(
    records: Vec<Artwork>,
    request: &PageRequest,
    normalizer: &dyn SortKeyNormalizer,
) -> Result<ArtworkPage, QueryError> {
    let needle = request.search.as_ref().map(|s| s.to_lowercase());
    let mut records: Vec<Artwork> = records
        .into_iter()
        .filter(Artwork::has_image)
        .filter(|a| match &needle {
            Some(n) => contains_ignore_case(&a.title, n) || contains_ignore_case(&a.artist, n),
            None => true,
        })
        .collect();

    if let Some(key) = request.sort_by {
        // sort_by_cached_key 是稳定排序，键相同时保留上游顺序
        records.sort_by_cached_key(|a| normalizer.normalize(key.field(a)));
    }

    let total_records = records.len();
    let offset = request.offset();
    if offset >= total_records {
        return Err(QueryError::NotFound("Page not found".to_string()));
    }

    let limit = request.limit as usize;
    let total_pages = total_records.div_ceil(limit) as u32;
    let records = records.into_iter().skip(offset).take(limit).collect();

    Ok(ArtworkPage {
        records,
        current_page: request.page,
        total_pages,
        total_records,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::query::dao::SourceError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    pub(crate) fn artwork(id: &str, title: &str, artist: &str, img: &str, source: &str) -> Artwork {
        Artwork {
            id: id.to_string(),
            title: title.to_string(),
            artist: artist.to_string(),
            img_url: img.to_string(),
            medium: "Unknown".to_string(),
            dimensions: "Unknown".to_string(),
            techniques: vec!["Unknown".to_string()],
            summary: "No summary available".to_string(),
            source: source.to_string(),
        }
    }

    /// 固定返回数据的假数据源，记录收到的查询
    pub(crate) struct FakeSource {
        pub label: &'static str,
        pub numeric_ids: bool,
        pub records: Vec<Artwork>,
        pub fail: bool,
        pub queries: Mutex<Vec<SourceQuery>>,
    }

    impl FakeSource {
        pub(crate) fn new(label: &'static str, numeric_ids: bool, records: Vec<Artwork>) -> Self {
            Self {
                label,
                numeric_ids,
                records,
                fail: false,
                queries: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing(label: &'static str, numeric_ids: bool) -> Self {
            Self {
                fail: true,
                ..Self::new(label, numeric_ids, vec![])
            }
        }
    }

    #[async_trait]
    impl ArtworkSource for FakeSource {
        fn label(&self) -> &'static str {
            self.label
        }

        fn accepts_id(&self, id: &str) -> bool {
            id.chars().all(|c| c.is_ascii_digit()) == self.numeric_ids
        }

        async fn search(&self, query: &SourceQuery) -> Result<Vec<Artwork>, SourceError> {
            self.queries.lock().unwrap().push(query.clone());
            if self.fail {
                return Err(SourceError::Status(503));
            }
            Ok(self
                .records
                .iter()
                .take(query.window as usize)
                .cloned()
                .collect())
        }

        async fn fetch_by_id(&self, id: &str) -> Result<Artwork, SourceError> {
            if self.fail {
                return Err(SourceError::Transport("connection reset".to_string()));
            }
            self.records
                .iter()
                .find(|a| a.id == id)
                .cloned()
                .ok_or(SourceError::NotFound)
        }
    }

    pub(crate) struct LowercaseNormalizer;

    impl SortKeyNormalizer for LowercaseNormalizer {
        fn normalize(&self, value: &str) -> String {
            value.trim().to_lowercase()
        }
    }

    fn query(page: Option<&str>, limit: Option<&str>) -> ArtworkQuery {
        ArtworkQuery {
            page: page.map(String::from),
            limit: limit.map(String::from),
            ..Default::default()
        }
    }

    fn vam_records(n: usize) -> Vec<Artwork> {
        (0..n)
            .map(|i| artwork(&format!("O{}", i), &format!("V&A {}", i), "Maker", "https://img/v", "V&A"))
            .collect()
    }

    fn cma_records(n: usize) -> Vec<Artwork> {
        (0..n)
            .map(|i| artwork(&i.to_string(), &format!("CMA {}", i), "Painter", "https://img/c", "CMA"))
            .collect()
    }

    fn service(primary: FakeSource, secondary: FakeSource) -> GetArtworks {
        GetArtworks::new(
            Arc::new(primary),
            Arc::new(secondary),
            Arc::new(LowercaseNormalizer),
            100,
        )
    }

    #[test]
    fn defaults_apply_when_absent() {
        let req = PageRequest::parse(query(None, None)).unwrap();
        assert_eq!((req.page, req.limit), (1, 10));
        let req = PageRequest::parse(query(Some(""), Some(" 5 "))).unwrap();
        assert_eq!((req.page, req.limit), (1, 5));
    }

    #[test]
    fn invalid_page_or_limit_is_rejected() {
        for (page, limit) in [
            (Some("0"), None),
            (None, Some("0")),
            (Some("abc"), Some("xyz")),
            (Some("-1"), None),
            (Some("1.5"), None),
            (None, Some("10abc")),
        ] {
            let err = PageRequest::parse(query(page, limit)).unwrap_err();
            assert!(
                matches!(&err, QueryError::InvalidInput(msg) if msg == INVALID_QUERY_PARAMETERS),
                "page={:?} limit={:?}",
                page,
                limit
            );
        }
    }

    #[test]
    fn unknown_sort_key_is_rejected() {
        let mut q = query(None, None);
        q.sort_by = Some("date".to_string());
        assert!(PageRequest::parse(q).is_err());
    }

    #[tokio::test]
    async fn merges_both_sources_and_respects_limit() {
        let svc = service(
            FakeSource::new("V&A", false, vam_records(4)),
            FakeSource::new("CMA", true, cma_records(4)),
        );
        let page = svc.handle(query(Some("1"), Some("5"))).await.unwrap();
        assert_eq!(page.records.len(), 5);
        assert_eq!(page.total_records, 8);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.records[0].source, "V&A");
        assert_eq!(page.records[4].source, "CMA");

        let page = svc.handle(query(Some("2"), Some("5"))).await.unwrap();
        assert_eq!(page.records.len(), 3);
        assert_eq!(page.current_page, 2);
    }

    #[tokio::test]
    async fn every_page_sees_the_same_window() {
        let primary = Arc::new(FakeSource::new("V&A", false, vam_records(50)));
        let secondary = Arc::new(FakeSource::new("CMA", true, cma_records(50)));
        let svc = GetArtworks::new(primary.clone(), secondary.clone(), Arc::new(LowercaseNormalizer), 25);

        let first = svc.handle(query(Some("1"), Some("10"))).await.unwrap();
        let last = svc.handle(query(Some("5"), Some("10"))).await.unwrap();
        assert_eq!(first.total_records, 50);
        assert_eq!(first.total_pages, 5);
        assert_eq!(last.total_pages, first.total_pages);
        assert_eq!(last.total_records, first.total_records);
        assert_eq!(last.records.len(), 10);

        let err = svc.handle(query(Some("6"), Some("10"))).await.unwrap_err();
        assert!(matches!(err, QueryError::NotFound(_)));

        let windows: Vec<u32> = primary.queries.lock().unwrap().iter().map(|q| q.window).collect();
        assert_eq!(windows, vec![25, 25, 25]);
        assert_eq!(secondary.queries.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn sorted_pages_do_not_overlap() {
        let many = |label: &'static str, numeric: bool| {
            let records = (0..30)
                .map(|i| {
                    let id = if numeric { format!("{}", i) } else { format!("O{}", i) };
                    // 上游按标题倒序返回，两家的标题交错
                    artwork(&id, &format!("t{:02}", 60 - i * 2 - numeric as usize), "x", "https://i", label)
                })
                .collect();
            FakeSource::new(label, numeric, records)
        };
        let svc = service(many("V&A", false), many("CMA", true));

        let mut seen: Vec<String> = Vec::new();
        let mut total_pages = None;
        for page in 1..=6 {
            let mut q = query(Some(&page.to_string()), Some("10"));
            q.sort_by = Some("title".to_string());
            let result = svc.handle(q).await.unwrap();
            assert_eq!(*total_pages.get_or_insert(result.total_pages), result.total_pages);
            for record in result.records {
                assert!(!seen.contains(&record.title), "{} repeated", record.title);
                seen.push(record.title);
            }
        }

        assert_eq!(seen.len(), 60);
        let mut sorted = seen.clone();
        sorted.sort();
        assert_eq!(seen, sorted);
    }

    #[tokio::test]
    async fn page_beyond_results_is_not_found() {
        let svc = service(
            FakeSource::new("V&A", false, vam_records(2)),
            FakeSource::new("CMA", true, cma_records(1)),
        );
        let err = svc.handle(query(Some("2"), Some("3"))).await.unwrap_err();
        assert!(matches!(err, QueryError::NotFound(_)));
    }

    #[tokio::test]
    async fn upstream_failure_fails_the_request() {
        let svc = service(
            FakeSource::new("V&A", false, vam_records(2)),
            FakeSource::failing("CMA", true),
        );
        let err = svc.handle(query(None, None)).await.unwrap_err();
        assert!(matches!(err, QueryError::UpstreamError(msg) if msg.starts_with("CMA")));
    }

    #[tokio::test]
    async fn search_forwards_term_and_filters_locally() {
        let primary = Arc::new(FakeSource::new(
            "V&A",
            false,
            vec![
                artwork("O1", "Sunflowers", "Someone", "https://a", "V&A"),
                artwork("O2", "Teapot", "Unknown", "https://b", "V&A"),
            ],
        ));
        let secondary = Arc::new(FakeSource::new(
            "CMA",
            true,
            vec![artwork("7", "Portrait", "Vincent van Gogh", "https://c", "CMA")],
        ));
        let svc = GetArtworks::new(primary.clone(), secondary, Arc::new(LowercaseNormalizer), 100);

        let mut q = query(None, None);
        q.search = Some(" SUN ".to_string());
        let page = svc.handle(q).await.unwrap();
        let ids: Vec<&str> = page.records.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["O1"]);
        assert_eq!(
            primary.queries.lock().unwrap()[0].search.as_deref(),
            Some("SUN")
        );

        let mut q = query(None, None);
        q.search = Some("gogh".to_string());
        let page = svc.handle(q).await.unwrap();
        assert_eq!(page.records[0].id, "7");
    }

    #[test]
    fn records_without_images_are_dropped() {
        let records = vec![
            artwork("O1", "A", "x", "", "V&A"),
            artwork("O2", "B", "x", "  ", "V&A"),
            artwork("3", "C", "x", "https://c", "CMA"),
        ];
        let req = PageRequest::parse(query(None, None)).unwrap();
        let page = paginate(records, &req, &LowercaseNormalizer).unwrap();
        assert_eq!(page.total_records, 1);
        assert_eq!(page.records[0].id, "3");
    }

    #[test]
    fn sorts_by_normalized_key_and_is_stable() {
        let records = vec![
            artwork("1", "banana", "Zed", "i", "CMA"),
            artwork("2", "Apple", "amy", "i", "CMA"),
            artwork("3", "cherry", "Amy", "i", "CMA"),
        ];
        let mut q = query(None, None);
        q.sort_by = Some("title".to_string());
        let req = PageRequest::parse(q.clone()).unwrap();
        let page = paginate(records.clone(), &req, &LowercaseNormalizer).unwrap();
        let ids: Vec<&str> = page.records.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1", "3"]);

        q.sort_by = Some("artist".to_string());
        let req = PageRequest::parse(q).unwrap();
        let page = paginate(records, &req, &LowercaseNormalizer).unwrap();
        let ids: Vec<&str> = page.records.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "1"]);
    }

    #[test]
    fn empty_result_is_not_found() {
        let req = PageRequest::parse(query(None, None)).unwrap();
        let err = paginate(vec![], &req, &LowercaseNormalizer).unwrap_err();
        assert!(matches!(err, QueryError::NotFound(_)));
    }
}
