use unidecode::unidecode;

use application::query::shared::SortKeyNormalizer;
use once_cell::sync::Lazy;
use std::collections::HashMap;

static UTF8_TO_ASCII: Lazy<HashMap<char, char>> = Lazy::new(|| {
    let mut map = HashMap::new();
    // 单引号替换
    for c in "‘’‛′`".chars() {
        map.insert(c, '\'');
    }
    // 双引号替换
    for c in "＂〃ˮײ″‶˶ʺ“”˝‟".chars() {
        map.insert(c, '"');
    }
    // 连字符替换
    for c in "‐–—−―".chars() {
        map.insert(c, '-');
    }
    map
});

/// 清理字符串，将特殊的 UTF-8 字符替换为对应的 ASCII 字符
pub fn clear(name: &str) -> String {
    name.chars()
        .map(|c| UTF8_TO_ASCII.get(&c).copied().unwrap_or(c))
        .collect()
}

/// 清理字符串用于排序：先折叠引号和连字符，再移除重音符号，最后转换为小写
pub fn sanitize(original_value: &str) -> String {
    let cleared = clear(original_value.trim());
    unidecode(&cleared).trim().to_lowercase()
}

#[derive(Debug, Default, Clone)]
pub struct SortKeyNormalizerImpl;

impl SortKeyNormalizerImpl {
    pub fn new() -> Self {
        Self
    }
}

impl SortKeyNormalizer for SortKeyNormalizerImpl {
    fn normalize(&self, value: &str) -> String {
        sanitize(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents_and_case() {
        assert_eq!(sanitize("  Édouard Manet "), "edouard manet");
        assert_eq!(sanitize("Ángel"), sanitize("angel"));
    }

    #[test]
    fn folds_typographic_punctuation() {
        assert_eq!(sanitize("“Night” — study"), "\"night\" - study");
        assert_eq!(sanitize("Painter’s Wife"), "painter's wife");
    }

    #[test]
    fn sorting_with_normalized_keys() {
        let normalizer = SortKeyNormalizerImpl::new();
        let mut titles = vec!["Zebra", "école", "Apple"];
        titles.sort_by_cached_key(|t| normalizer.normalize(t));
        assert_eq!(titles, vec!["Apple", "école", "Zebra"]);
    }
}
