/// 排序键规范化接口
///
/// 查询服务只依赖此 trait，具体的去重音、大小写折叠由基础设施层实现。
pub trait SortKeyNormalizer: Send + Sync {
    fn normalize(&self, value: &str) -> String;
}

/// 不区分大小写的子串匹配
pub fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}
