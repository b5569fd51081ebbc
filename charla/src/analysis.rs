//! 解析の実行とレポートの組み立てを行うモジュール
//!
//! レキシコンとプロトコルルールを借用する [`Analyzer`] が、会話テキストを
//! 一度の実行で感情スコアリング・プロトコル分類・未定義語の抽出にかけ、
//! 不変の [`AnalysisReport`] を生成します。

use std::fs;
use std::path::Path;

use crate::errors::{CharlaError, Result};
use crate::lexicon::Lexicon;
use crate::normalizer::Tokens;
use crate::protocol::{ProtocolReport, ProtocolRules};
use crate::resolver;
use crate::scorer::{self, SentimentSummary};

/// 1回の解析で生成される不変のレポート
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisReport {
    /// 感情スコアリングの集計結果
    pub sentiment: SentimentSummary,
    /// プロトコル分類の結果
    pub protocol: ProtocolReport,
    /// 未定義語のリスト（重複除去・辞書順）
    pub undefined: Vec<String>,
}

/// 会話テキストの解析器
///
/// レキシコンとルールセットを借用し、テキストごとにレポートを生成します。
/// 同じテキストと同じレキシコンに対する再実行は、同一のレポートを
/// 生成します。
///
/// # 例
///
/// ```
/// use charla::{Analyzer, Lexicon, ProtocolRules};
///
/// let lexicon = Lexicon::from_reader(
///     r#"{"positivos": {"excelente": 3}, "negativos": {}, "neutros": {}}"#.as_bytes(),
/// )?;
/// let rules = ProtocolRules::spanish_call_center();
/// let analyzer = Analyzer::new(&lexicon, &rules);
///
/// let report = analyzer.analyze("Hola, buenas tardes.\nFue excelente.\nGracias por su tiempo.");
/// assert_eq!(report.sentiment.total, 3);
/// assert!(report.protocol.greeting_ok);
/// assert!(report.protocol.farewell_ok);
/// # Ok::<(), charla::errors::CharlaError>(())
/// ```
pub struct Analyzer<'a> {
    lexicon: &'a Lexicon,
    rules: &'a ProtocolRules,
}

impl<'a> Analyzer<'a> {
    /// 新しい解析器を生成します
    ///
    /// # 引数
    ///
    /// * `lexicon` - 照合に使用するレキシコン
    /// * `rules` - プロトコル検査のルールセット
    pub fn new(lexicon: &'a Lexicon, rules: &'a ProtocolRules) -> Self {
        Self { lexicon, rules }
    }

    /// 会話テキストを解析してレポートを生成します
    ///
    /// # 引数
    ///
    /// * `text` - 生の会話テキスト
    pub fn analyze(&self, text: &str) -> AnalysisReport {
        let sentiment = scorer::score(Tokens::new(text), self.lexicon);
        let protocol = self.rules.classify(text);
        let undefined = resolver::undefined_words(Tokens::new(text), self.lexicon);
        AnalysisReport {
            sentiment,
            protocol,
            undefined,
        }
    }

    /// 会話テキストファイルを読み込んで解析します
    ///
    /// # 引数
    ///
    /// * `path` - 会話テキストファイルのパス
    ///
    /// # エラー
    ///
    /// ファイルが存在しない場合は [`CharlaError::TranscriptNotFound`]、
    /// 読み込みに失敗した場合はI/Oエラーを返します。
    pub fn analyze_file<P>(&self, path: P) -> Result<AnalysisReport>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CharlaError::TranscriptNotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        Ok(self.analyze(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon() -> Lexicon {
        Lexicon::from_reader(
            r#"{
                "positivos": {"excelente": 3, "gracias": 1},
                "negativos": {"terrible": -3},
                "neutros": {"servicio": 0}
            }"#
            .as_bytes(),
        )
        .unwrap()
    }

    #[test]
    fn test_analyze_end_to_end() {
        let lexicon = lexicon();
        let rules = ProtocolRules::spanish_call_center();
        let analyzer = Analyzer::new(&lexicon, &rules);

        let text = "Hola, buenas tardes.\n\
                    El servicio fue excelente y terrible.\n\
                    Gracias por su tiempo.";
        let report = analyzer.analyze(text);

        assert_eq!(report.sentiment.total, 1);
        assert!(report.protocol.greeting_ok);
        assert!(report.protocol.farewell_ok);
        assert_eq!(report.protocol.rude_occurrences, ["terrible"]);
        assert_eq!(
            report.undefined,
            ["buenas", "el", "fue", "hola", "por", "su", "tardes", "tiempo", "y"]
        );
    }

    #[test]
    fn test_analyze_is_idempotent() {
        let lexicon = lexicon();
        let rules = ProtocolRules::spanish_call_center();
        let analyzer = Analyzer::new(&lexicon, &rules);

        let text = "Buenos dias.\nFue terrible.\nHasta luego.";
        assert_eq!(analyzer.analyze(text), analyzer.analyze(text));
    }

    #[test]
    fn test_missing_transcript() {
        let lexicon = lexicon();
        let rules = ProtocolRules::spanish_call_center();
        let analyzer = Analyzer::new(&lexicon, &rules);

        let dir = tempfile::tempdir().unwrap();
        let result = analyzer.analyze_file(dir.path().join("missing.txt"));
        assert!(matches!(result, Err(CharlaError::TranscriptNotFound(_))));
    }
}
