//! 未定義語に対する訂正候補の提案を提供するモジュール
//!
//! レキシコンの全語彙を候補として、編集距離（Levenshtein距離）の昇順、
//! 同点の場合は同じ長さの単語間の位置別不一致数（Hamming距離）の昇順で
//! ランク付けします。長さが異なる単語間のHamming距離は定義されないため、
//! 最悪値として扱われます。

use strsim::{hamming, levenshtein};

/// リゾルバが操作者に提示する候補の最大数
pub const MAX_CANDIDATES: usize = 5;

/// 未定義語に対する1つの訂正候補
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// レキシコン中の単語
    pub word: String,
    /// 未定義語とのLevenshtein距離
    pub levenshtein: usize,
    /// 同じ長さの場合のHamming距離。長さが異なる場合は `None`
    pub hamming: Option<usize>,
}

/// 語彙から訂正候補をランク付けして返します
///
/// 第一キーはLevenshtein距離の昇順、第二キーはHamming距離の昇順
/// （`None` は最悪値）、同点は単語の辞書順で安定化されます。
///
/// # 引数
///
/// * `word` - 未定義語（正規化済み）
/// * `vocabulary` - 候補となる語彙
/// * `limit` - 返す候補の最大数
///
/// # 戻り値
///
/// ランク順の候補リスト。語彙が空の場合は空のリスト
pub fn suggest<'a, I>(word: &str, vocabulary: I, limit: usize) -> Vec<Candidate>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut candidates: Vec<Candidate> = vocabulary
        .into_iter()
        .map(|key| Candidate {
            word: key.to_string(),
            levenshtein: levenshtein(word, key),
            hamming: hamming(word, key).ok(),
        })
        .collect();
    candidates.sort_by(|a, b| {
        (a.levenshtein, a.hamming.unwrap_or(usize::MAX), a.word.as_str()).cmp(&(
            b.levenshtein,
            b.hamming.unwrap_or(usize::MAX),
            b.word.as_str(),
        ))
    });
    candidates.truncate(limit);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typo_ranks_first() {
        let vocabulary = ["gracias", "buenas", "tardes", "excelente"];
        let candidates = suggest("grasias", vocabulary, MAX_CANDIDATES);

        assert_eq!(candidates[0].word, "gracias");
        assert_eq!(candidates[0].levenshtein, 1);
        assert_eq!(candidates[0].hamming, Some(1));
    }

    #[test]
    fn test_hamming_breaks_levenshtein_ties() {
        // Both are at Levenshtein 1 from "cosa"; only the equal-length
        // candidate has a Hamming distance and must come first.
        let candidates = suggest("cosa", ["casa", "cosas"], 5);
        assert_eq!(candidates[0].word, "casa");
        assert_eq!(candidates[0].hamming, Some(1));
        assert_eq!(candidates[1].word, "cosas");
        assert_eq!(candidates[1].hamming, None);
    }

    #[test]
    fn test_limit_is_applied() {
        let vocabulary = ["a", "b", "c", "d", "e", "f", "g"];
        assert_eq!(suggest("x", vocabulary, 5).len(), 5);
    }

    #[test]
    fn test_empty_vocabulary() {
        assert!(suggest("algo", [], 5).is_empty());
    }

    #[test]
    fn test_ties_are_deterministic() {
        let a = suggest("oso", ["uso", "eso"], 5);
        let b = suggest("oso", ["eso", "uso"], 5);
        assert_eq!(a, b);
        assert_eq!(a[0].word, "eso");
    }
}
