//! 入力テキストの正規化とトークン化を提供するモジュール
//!
//! このモジュールは、会話テキストを解析の前段階として正規化するための
//! 関数群を提供します。正規化は以下の手順で行われます:
//!
//! 1. 小文字化
//! 2. NFD分解によるダイアクリティカルマーク（アクセント記号）の除去
//! 3. `[a-z]+` の最長一致によるトークンの抽出
//!
//! 数字、句読点、対象アルファベット以外の文字はすべてトークンの区切りとして
//! 扱われます。正規化は純粋な処理であり、副作用を持ちません。

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// テキストからダイアクリティカルマークを除去します
///
/// テキストをNFD形式に分解し、結合文字（Unicodeカテゴリ Mn）をすべて
/// 取り除いた文字列を返します。例えばスペイン語の `"á"` は `"a"` に、
/// `"ñ"` は `"n"` になります。
///
/// # 引数
///
/// * `text` - 処理対象のテキスト
///
/// # 戻り値
///
/// ダイアクリティカルマークを含まない文字列
pub fn strip_diacritics(text: &str) -> String {
    text.nfd().filter(|&ch| !is_combining_mark(ch)).collect()
}

/// テキストを小文字化し、ダイアクリティカルマークを除去します
///
/// レキシコンの照合とパターンマッチングの前提となる正規形を生成します。
/// トークンの等価性は、この正規形での文字列一致として定義されます。
///
/// # 引数
///
/// * `text` - 処理対象のテキスト
///
/// # 戻り値
///
/// 正規化された文字列
pub fn fold(text: &str) -> String {
    strip_diacritics(&text.to_lowercase())
}

/// 正規化済みテキストからトークンを順に返すイテレータ
///
/// トークンは正規形テキスト中の `[a-z]+` の最長一致であり、元テキストでの
/// 出現順に返されます。重複は除去されません（スコアリングでは同じ単語の
/// 複数回の出現をそれぞれ数えます）。
///
/// イテレータは遅延評価であり、[`Tokens::new`] で再生成するか `clone` する
/// ことで繰り返し走査できます。
///
/// # 例
///
/// ```
/// use charla::normalizer::Tokens;
///
/// let tokens: Vec<String> = Tokens::new("¡Hola! El año 2024, fue *excelente*.").collect();
/// assert_eq!(tokens, ["hola", "el", "ano", "fue", "excelente"]);
/// ```
#[derive(Clone, Debug)]
pub struct Tokens {
    folded: String,
    pos: usize,
}

impl Tokens {
    /// テキストを正規化し、トークンのイテレータを生成します
    ///
    /// # 引数
    ///
    /// * `text` - トークン化する生テキスト
    pub fn new(text: &str) -> Self {
        Self {
            folded: fold(text),
            pos: 0,
        }
    }
}

impl Iterator for Tokens {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.folded.as_bytes();
        let mut i = self.pos;
        // ASCII bytes never occur inside a multi-byte UTF-8 sequence, so
        // scanning byte-wise for [a-z] runs is sound.
        while i < bytes.len() && !bytes[i].is_ascii_lowercase() {
            i += 1;
        }
        if i == bytes.len() {
            self.pos = i;
            return None;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_lowercase() {
            i += 1;
        }
        self.pos = i;
        Some(self.folded[start..i].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_diacritics() {
        assert_eq!(strip_diacritics("atención"), "atencion");
        assert_eq!(strip_diacritics("años"), "anos");
        assert_eq!(strip_diacritics("pésimo"), "pesimo");
        assert_eq!(strip_diacritics("plain"), "plain");
    }

    #[test]
    fn test_fold_lowercases_and_strips() {
        assert_eq!(fold("Qué Tal"), "que tal");
        assert_eq!(fold("ADIÓS"), "adios");
    }

    #[test]
    fn test_tokens_order_and_duplicates() {
        let tokens: Vec<String> = Tokens::new("bueno, bueno; 123 bueno").collect();
        assert_eq!(tokens, ["bueno", "bueno", "bueno"]);
    }

    #[test]
    fn test_tokens_separators() {
        let tokens: Vec<String> = Tokens::new("e-mail: juan.pérez@example.com").collect();
        assert_eq!(tokens, ["e", "mail", "juan", "perez", "example", "com"]);
    }

    #[test]
    fn test_tokens_non_target_scripts_dropped() {
        let tokens: Vec<String> = Tokens::new("京都 hola 東京").collect();
        assert_eq!(tokens, ["hola"]);
    }

    #[test]
    fn test_tokens_empty_input() {
        assert_eq!(Tokens::new("").count(), 0);
        assert_eq!(Tokens::new("1234 --- ¡¿?!").count(), 0);
    }

    #[test]
    fn test_tokens_restartable() {
        let tokens = Tokens::new("uno dos");
        let first: Vec<String> = tokens.clone().collect();
        let second: Vec<String> = tokens.collect();
        assert_eq!(first, second);
    }
}
