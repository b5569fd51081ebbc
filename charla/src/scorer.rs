//! レキシコンに基づく感情スコアリングを提供するモジュール
//!
//! トークン列を一度だけ走査し、各トークンの重みを合計スコアと
//! カテゴリ別の内訳に集計します。どのカテゴリにも属さないトークンは
//! ここでは無視されます（未定義語として [`crate::resolver`] が扱います）。

use std::fmt;

use crate::lexicon::Lexicon;

/// 会話全体の極性
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// 合計スコアが正
    Positive,
    /// 合計スコアが負
    Negative,
    /// 合計スコアがゼロ
    Neutral,
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
        };
        f.write_str(name)
    }
}

/// 感情スコアリングの集計結果
///
/// ヒットリストは重複を除去しません。同じ単語が3回出現すれば3回
/// 数えられます。`top_pos_words` / `top_neg_words` は極値の重みを持つ
/// すべての単語を含みます（同点は全員勝者）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentimentSummary {
    /// ポジティブとネガティブの重みの総和（ニュートラルは寄与しない）
    pub total: i32,

    /// ポジティブヒットの数
    pub pos_count: usize,
    /// ポジティブヒットした単語（出現順、重複あり）
    pub pos_words: Vec<String>,
    /// 最大のポジティブ重みを持つ単語（同点を含む）
    pub top_pos_words: Vec<String>,
    /// 最大のポジティブ重み。ヒットがない場合は 0
    pub top_pos_weight: i32,

    /// ネガティブヒットの数
    pub neg_count: usize,
    /// ネガティブヒットした単語（出現順、重複あり）
    pub neg_words: Vec<String>,
    /// 最小（最も負）のネガティブ重みを持つ単語（同点を含む）
    pub top_neg_words: Vec<String>,
    /// 最小のネガティブ重み。ヒットがない場合は 0
    pub top_neg_weight: i32,

    /// ニュートラルヒットの数
    pub neut_count: usize,
    /// ニュートラルヒットした単語（出現順、重複あり）
    pub neut_words: Vec<String>,
}

impl SentimentSummary {
    /// 合計スコアから会話全体の極性を判定します
    pub fn polarity(&self) -> Polarity {
        match self.total {
            t if t > 0 => Polarity::Positive,
            t if t < 0 => Polarity::Negative,
            _ => Polarity::Neutral,
        }
    }
}

/// トークン列をレキシコンに対してスコアリングします
///
/// トークンごとにポジティブ・ネガティブ・ニュートラルの順で照合し、
/// 最初に一致したカテゴリに集計します。空のトークン列はすべてゼロの
/// 集計結果になります。
///
/// # 引数
///
/// * `tokens` - 正規化済みトークンの列
/// * `lexicon` - 照合に使用するレキシコン
///
/// # 戻り値
///
/// 集計結果の [`SentimentSummary`]
pub fn score<I, S>(tokens: I, lexicon: &Lexicon) -> SentimentSummary
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut summary = SentimentSummary::default();
    let mut pos_hits: Vec<(String, i32)> = vec![];
    let mut neg_hits: Vec<(String, i32)> = vec![];

    for token in tokens {
        let token = token.as_ref();
        if let Some(&weight) = lexicon.positives().get(token) {
            summary.total += weight;
            pos_hits.push((token.to_string(), weight));
        } else if let Some(&weight) = lexicon.negatives().get(token) {
            summary.total += weight;
            neg_hits.push((token.to_string(), weight));
        } else if lexicon.neutrals().contains_key(token) {
            summary.neut_words.push(token.to_string());
        }
    }

    summary.pos_count = pos_hits.len();
    summary.neg_count = neg_hits.len();
    summary.neut_count = summary.neut_words.len();

    if let Some(top) = pos_hits.iter().map(|&(_, w)| w).max() {
        summary.top_pos_weight = top;
        summary.top_pos_words = pos_hits
            .iter()
            .filter(|&&(_, w)| w == top)
            .map(|(word, _)| word.clone())
            .collect();
    }
    if let Some(top) = neg_hits.iter().map(|&(_, w)| w).min() {
        summary.top_neg_weight = top;
        summary.top_neg_words = neg_hits
            .iter()
            .filter(|&&(_, w)| w == top)
            .map(|(word, _)| word.clone())
            .collect();
    }

    summary.pos_words = pos_hits.into_iter().map(|(word, _)| word).collect();
    summary.neg_words = neg_hits.into_iter().map(|(word, _)| word).collect();

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::Lexicon;

    fn lexicon() -> Lexicon {
        Lexicon::from_reader(
            r#"{
                "positivos": {"excelente": 3, "bueno": 1, "genial": 3},
                "negativos": {"terrible": -3, "lento": -1},
                "neutros": {"servicio": 0}
            }"#
            .as_bytes(),
        )
        .unwrap()
    }

    #[test]
    fn test_balanced_text() {
        let lexicon = lexicon();
        let tokens = ["el", "servicio", "fue", "excelente", "y", "terrible"];
        let summary = score(tokens, &lexicon);

        assert_eq!(summary.total, 0);
        assert_eq!(summary.polarity(), Polarity::Neutral);
        assert_eq!(summary.top_pos_words, ["excelente"]);
        assert_eq!(summary.top_pos_weight, 3);
        assert_eq!(summary.top_neg_words, ["terrible"]);
        assert_eq!(summary.top_neg_weight, -3);
        assert_eq!(summary.neut_words, ["servicio"]);
    }

    #[test]
    fn test_repeated_hits_count_each_time() {
        let lexicon = lexicon();
        let summary = score(["bueno", "bueno", "bueno", "lento"], &lexicon);

        assert_eq!(summary.total, 2);
        assert_eq!(summary.pos_count, 3);
        assert_eq!(summary.pos_words, ["bueno", "bueno", "bueno"]);
        assert_eq!(summary.neg_count, 1);
    }

    #[test]
    fn test_ties_are_inclusive() {
        let lexicon = lexicon();
        let summary = score(["excelente", "genial", "bueno"], &lexicon);

        assert_eq!(summary.top_pos_weight, 3);
        assert_eq!(summary.top_pos_words, ["excelente", "genial"]);
    }

    #[test]
    fn test_total_equals_sum_of_hit_weights() {
        let lexicon = lexicon();
        let tokens = ["excelente", "lento", "servicio", "bueno", "desconocida"];
        let summary = score(tokens, &lexicon);

        let expected: i32 = summary
            .pos_words
            .iter()
            .chain(summary.neg_words.iter())
            .map(|w| lexicon.weight_of(w).unwrap())
            .sum();
        assert_eq!(summary.total, expected);
        assert_eq!(summary.total, 3);
    }

    #[test]
    fn test_empty_tokens() {
        let lexicon = lexicon();
        let summary = score(std::iter::empty::<&str>(), &lexicon);
        assert_eq!(summary, SentimentSummary::default());
        assert_eq!(summary.polarity(), Polarity::Neutral);
    }

    #[test]
    fn test_unknown_tokens_are_ignored() {
        let lexicon = lexicon();
        let summary = score(["nada", "conocido", "aqui"], &lexicon);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.pos_count, 0);
        assert_eq!(summary.neg_count, 0);
        assert_eq!(summary.neut_count, 0);
    }
}
