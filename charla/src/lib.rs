//! # Charla
//!
//! Charlaは、コールセンターの文字起こし会話を対象とした、レキシコン
//! ベースの感情分析と応対プロトコル検査の実装です。
//!
//! ## 概要
//!
//! このライブラリは、会話テキストを正規化・トークン化し、管理された
//! レキシコン（単語→重み）に対して感情スコアを集計するとともに、
//! 挨拶・本人確認・丁寧さ・締めの挨拶という4つの応対フェーズの遵守を
//! 正規表現パターンで検査します。
//!
//! さらに、レキシコンに存在しない「未定義語」を対話的に解決する
//! ワークフローを提供します。未定義語は、新しい語彙としてレキシコンに
//! 分類されるか、編集距離に基づく候補への置換として会話テキストに
//! 書き戻されます。
//!
//! ## 主な機能
//!
//! - **正規化**: ダイアクリティカルマーク除去と小文字化によるトークン抽出
//! - **感情スコアリング**: カテゴリ別の集計と同点を含む極値の抽出
//! - **プロトコル検査**: 構築時に設定されるルールセットによる4フェーズ判定
//! - **対話的レキシコン整備**: 編集距離による候補提案と安全なファイル書き換え
//!
//! ## 使用例
//!
//! ```
//! use charla::{Analyzer, Lexicon, ProtocolRules};
//!
//! let lexicon = Lexicon::from_reader(
//!     r#"{
//!         "positivos": {"excelente": 3},
//!         "negativos": {"terrible": -3},
//!         "neutros": {}
//!     }"#
//!     .as_bytes(),
//! )?;
//! let rules = ProtocolRules::spanish_call_center();
//! let analyzer = Analyzer::new(&lexicon, &rules);
//!
//! let report = analyzer.analyze(
//!     "Hola, buenas tardes.\n\
//!      El servicio fue excelente y terrible.\n\
//!      Gracias por su tiempo.",
//! );
//! assert_eq!(report.sentiment.total, 0);
//! assert_eq!(report.sentiment.top_pos_words, ["excelente"]);
//! assert!(report.protocol.greeting_ok);
//! assert!(report.protocol.farewell_ok);
//! # Ok::<(), charla::errors::CharlaError>(())
//! ```

/// 解析の実行とレポートの組み立て
pub mod analysis;

/// エラー型の定義
pub mod errors;

/// レキシコン（単語→重み）ストア
pub mod lexicon;

/// 入力テキストの正規化とトークン化
pub mod normalizer;

/// 会話プロトコルの検査
pub mod protocol;

/// 未定義語の対話的解決
pub mod resolver;

/// 感情スコアリング
pub mod scorer;

/// 訂正候補の提案
pub mod suggest;

#[cfg(test)]
mod tests;

// Re-exports
pub use analysis::{AnalysisReport, Analyzer};
pub use lexicon::{Category, Lexicon};
pub use protocol::{ProtocolReport, ProtocolRules};
pub use resolver::{ConsoleDialogue, Dialogue, Session, SessionSummary};
pub use scorer::{Polarity, SentimentSummary};

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
