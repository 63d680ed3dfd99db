//! 模糊匹配服务 - 业务能力层
//!
//! 只负责"近似字符串匹配"能力，不关心流程。
//!
//! 采用 token-sort 相似度：先把两个字符串小写化、去掉标点、按空白切分、
//! 逐词排序后重组，再计算归一化编辑距离（替换计两步的 indel 口径）。
//! 词序因此不影响得分，能抵御题干换序改写。

use crate::error::MatchError;
use crate::models::question::MatchResult;

/// 在候选集中查找与查询串最相似的候选
///
/// 纯函数：相同输入必然产生相同输出，无任何副作用。
///
/// # 参数
/// - `query`: 查询串（通常是转写出的题干）
/// - `candidates`: 有序候选列表（通常是题库的全部题目文本）
///
/// # 返回
/// 返回最佳候选及其 [0, 100] 分数；并列时取输入顺序中最先达到
/// 最高分的候选（稳定选择）。候选集为空时返回 `EmptyCandidateSet`。
pub fn best_match(query: &str, candidates: &[&str]) -> Result<MatchResult, MatchError> {
    if candidates.is_empty() {
        return Err(MatchError::EmptyCandidateSet);
    }

    let normalized_query = token_sort_normalize(query);

    let mut best_index = 0;
    let mut best_score = 0u8;

    for (index, candidate) in candidates.iter().enumerate() {
        let score = similarity_score(&normalized_query, &token_sort_normalize(candidate));
        // 严格大于：并列时保留先出现的候选
        if index == 0 || score > best_score {
            best_index = index;
            best_score = score;
        }
    }

    Ok(MatchResult {
        index: best_index,
        candidate: candidates[best_index].to_string(),
        score: best_score,
    })
}

/// 计算两个字符串的 token-sort 相似度分数，范围 [0, 100]
pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    similarity_score(&token_sort_normalize(a), &token_sort_normalize(b))
}

/// token-sort 归一化：小写、标点折叠为空白、按空白切分、逐词排序、单空格重组
fn token_sort_normalize(s: &str) -> String {
    let cleaned: String = s
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let mut tokens: Vec<&str> = cleaned.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// 归一化编辑距离相似度，缩放为 [0, 100] 整数
///
/// 距离采用替换计两步的口径（等价于插入/删除距离），
/// 相似度 = (总长 - 距离) / 总长，与原始模糊匹配库的打分一致
fn similarity_score(a: &str, b: &str) -> u8 {
    if a == b {
        return 100;
    }
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let a_len = a.chars().count();
    let b_len = b.chars().count();
    let distance = indel_distance(a, b);
    let total = a_len + b_len;
    let similarity = (total - distance) as f64 / total as f64;

    (similarity * 100.0).round() as u8
}

/// 计算编辑距离（按 Unicode 字符，替换成本 2，滚动双行 DP）
fn indel_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0usize; b_chars.len() + 1];

    for (i, a_ch) in a_chars.iter().enumerate() {
        curr[0] = i + 1;
        for (j, b_ch) in b_chars.iter().enumerate() {
            let cost = if a_ch == b_ch { 0 } else { 2 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indel_distance() {
        assert_eq!(indel_distance("", "abc"), 3);
        assert_eq!(indel_distance("abc", ""), 3);
        assert_eq!(indel_distance("abc", "abc"), 0);
        // 一次替换按 2 计（删除 + 插入）
        assert_eq!(indel_distance("abc", "abd"), 2);
        assert_eq!(indel_distance("kitten", "sitting"), 5);
    }

    #[test]
    fn test_score_range_and_membership() {
        let candidates = ["What is 2+2?", "Capital of France?", "Speed of light?"];
        let result = best_match("2 + 2 equals what?", &candidates).unwrap();

        assert!(result.score <= 100);
        assert!(candidates.contains(&result.candidate.as_str()));
        assert_eq!(candidates[result.index], result.candidate);
    }

    #[test]
    fn test_identical_strings_score_100() {
        assert_eq!(token_sort_ratio("What is 2+2?", "What is 2+2?"), 100);
    }

    #[test]
    fn test_token_order_invariance() {
        // 词序打乱后与同一候选的分数不变
        let candidate = "the mitochondria is the powerhouse of the cell";
        let a = token_sort_ratio("the mitochondria is the powerhouse of the cell", candidate);
        let b = token_sort_ratio("powerhouse of the cell the mitochondria is the", candidate);
        assert_eq!(a, b);
        assert_eq!(a, 100);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(token_sort_ratio("Hello World", "hello world"), 100);
    }

    #[test]
    fn test_deterministic() {
        let candidates = ["alpha beta", "beta gamma", "gamma delta"];
        let first = best_match("beta alpha", &candidates).unwrap();
        for _ in 0..10 {
            assert_eq!(best_match("beta alpha", &candidates).unwrap(), first);
        }
    }

    #[test]
    fn test_tie_break_first_wins() {
        // 两个相同的候选并列最高分，必须选中第一个
        let candidates = ["same text", "same text", "other"];
        let result = best_match("same text", &candidates).unwrap();
        assert_eq!(result.index, 0);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_empty_candidate_set() {
        let candidates: [&str; 0] = [];
        assert_eq!(
            best_match("anything", &candidates).unwrap_err(),
            MatchError::EmptyCandidateSet
        );
    }

    #[test]
    fn test_disjoint_strings_score_low() {
        let score = token_sort_ratio("abcdefgh", "12345678");
        assert_eq!(score, 0);
    }

    #[test]
    fn test_empty_query_scores_zero_against_nonempty() {
        let candidates = ["some question"];
        let result = best_match("", &candidates).unwrap();
        assert_eq!(result.score, 0);
        assert_eq!(result.index, 0);
    }

    #[test]
    fn test_high_overlap_scores_above_threshold() {
        // 高词重叠的改写应稳定超过阈值 60
        let score = token_sort_ratio("2 + 2 equals what?", "What is 2+2?");
        assert_eq!(score, 77);
    }

    #[test]
    fn test_punctuation_ignored() {
        assert_eq!(token_sort_ratio("What is 2+2?", "what is 2 2"), 100);
    }
}
