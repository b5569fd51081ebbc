//! レキシコン（単語→重み）ストアを管理するモジュール
//!
//! このモジュールは、感情分析に使用される単語と重みの対応表を管理します。
//! レキシコンは3つの互いに素なカテゴリに分割されます:
//!
//! - ポジティブ: 重み +1〜+3
//! - ネガティブ: 重み -3〜-1
//! - ニュートラル: 重み 0
//!
//! バックエンドの文書はJSON形式で、`positivos`・`negativos`・`neutros` の
//! 3つのトップレベルフィールドを持ちます。それ以外のトップレベルフィールドは
//! 読み込み時に保持され、保存時にそのまま書き戻されます。
//!
//! # カテゴリ間の一意性について
//!
//! このストアは純粋な格納庫であり、[`Lexicon::insert`] はカテゴリ間の
//! 重複チェックを行いません。「1つの単語は高々1つのカテゴリに属する」という
//! 不変条件の維持は、変更を行う唯一の呼び出し元であるリゾルバ
//! ([`crate::resolver::Session`]) の責務です。

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use crate::errors::{CharlaError, Result};

/// レキシコンのカテゴリ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// ポジティブな単語（重み +1〜+3）
    Positive,
    /// ネガティブな単語（重み -3〜-1）
    Negative,
    /// ニュートラルな単語（重み 0）
    Neutral,
}

impl Category {
    /// 指定された重みがこのカテゴリで許容されるかどうかを返します
    ///
    /// # 引数
    ///
    /// * `weight` - 検査する重み
    ///
    /// # 戻り値
    ///
    /// 許容範囲内の場合は `true`
    pub fn admits(self, weight: i32) -> bool {
        match self {
            Self::Positive => (1..=3).contains(&weight),
            Self::Negative => (-3..=-1).contains(&weight),
            Self::Neutral => weight == 0,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        };
        f.write_str(name)
    }
}

/// バックエンドJSON文書の表現
///
/// カテゴリはソート順で書き出すため `BTreeMap` を使用します。
/// 未知のトップレベルフィールドは `extra` に退避され、保存時に
/// そのまま書き戻されます。
#[derive(Serialize, Deserialize)]
struct LexiconDocument {
    #[serde(default)]
    positivos: BTreeMap<String, i32>,
    #[serde(default)]
    negativos: BTreeMap<String, i32>,
    #[serde(default)]
    neutros: BTreeMap<String, i32>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// 単語→重みのインメモリストア
///
/// 解析の開始時に一度読み込まれ、対話セッション中にリゾルバによってのみ
/// 変更され、セッション終了時に一度だけ保存されます。
pub struct Lexicon {
    positives: HashMap<String, i32>,
    negatives: HashMap<String, i32>,
    neutrals: HashMap<String, i32>,
    extra: Map<String, Value>,
}

impl Lexicon {
    /// 空のレキシコンを生成します
    pub fn new() -> Self {
        Self {
            positives: HashMap::new(),
            negatives: HashMap::new(),
            neutrals: HashMap::new(),
            extra: Map::new(),
        }
    }

    /// JSON文書ファイルからレキシコンを読み込みます
    ///
    /// # 引数
    ///
    /// * `path` - レキシコン文書のパス
    ///
    /// # エラー
    ///
    /// ファイルが存在しない場合は [`CharlaError::LexiconNotFound`]、
    /// JSONが不正な場合は [`CharlaError::InvalidFormat`] を返します。
    pub fn from_path<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CharlaError::LexiconNotFound(path.to_path_buf()));
        }
        let file = File::open(path)?;
        let lexicon = Self::from_reader(BufReader::new(file))?;
        log::debug!(
            "loaded lexicon from {}: {} positive, {} negative, {} neutral",
            path.display(),
            lexicon.positives.len(),
            lexicon.negatives.len(),
            lexicon.neutrals.len(),
        );
        Ok(lexicon)
    }

    /// リーダーからレキシコンを読み込みます
    ///
    /// 欠落しているカテゴリフィールドは空のマッピングとして扱われます。
    ///
    /// # 引数
    ///
    /// * `rdr` - JSON文書を供給するリーダー
    ///
    /// # エラー
    ///
    /// JSONが不正な場合、またはカテゴリの値が整数マップでない場合は
    /// [`CharlaError::InvalidFormat`] を返します。
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let doc: LexiconDocument = serde_json::from_reader(rdr)
            .map_err(|e| CharlaError::invalid_format("lexicon", e.to_string()))?;
        Ok(Self {
            positives: doc.positivos.into_iter().collect(),
            negatives: doc.negativos.into_iter().collect(),
            neutrals: doc.neutros.into_iter().collect(),
            extra: doc.extra,
        })
    }

    /// レキシコンをJSON文書としてファイルに保存します
    ///
    /// 文書全体を上書きしますが、読み込み時に保持した3カテゴリ以外の
    /// トップレベルフィールドはそのまま書き戻されます。書き込みは同一
    /// ディレクトリ内の一時ファイルに行い、完了後にリネームで置き換えます。
    ///
    /// # 引数
    ///
    /// * `path` - 保存先のパス
    ///
    /// # エラー
    ///
    /// I/Oエラー、または一時ファイルの永続化に失敗した場合にエラーを返します。
    pub fn save<P>(&self, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        self.write(&mut tmp)?;
        tmp.flush()?;
        tmp.persist(path)?;
        log::debug!("saved lexicon to {}", path.display());
        Ok(())
    }

    /// レキシコンをJSON文書としてライターに書き出します
    ///
    /// カテゴリ内の単語はソート順で出力されるため、同じ内容の保存結果は
    /// バイト単位で一致します。
    ///
    /// # 引数
    ///
    /// * `wtr` - 書き込み先のライター
    pub fn write<W>(&self, wtr: W) -> Result<()>
    where
        W: Write,
    {
        let doc = LexiconDocument {
            positivos: self.positives.iter().map(|(k, v)| (k.clone(), *v)).collect(),
            negativos: self.negatives.iter().map(|(k, v)| (k.clone(), *v)).collect(),
            neutros: self.neutrals.iter().map(|(k, v)| (k.clone(), *v)).collect(),
            extra: self.extra.clone(),
        };
        let mut wtr = BufWriter::new(wtr);
        serde_json::to_writer_pretty(&mut wtr, &doc)?;
        wtr.flush()?;
        Ok(())
    }

    /// 単語が属するカテゴリを返します
    ///
    /// # 引数
    ///
    /// * `word` - 正規化済みの単語
    ///
    /// # 戻り値
    ///
    /// いずれかのカテゴリに属する場合はそのカテゴリ、どれにも属さない場合は
    /// `None`
    pub fn category_of(&self, word: &str) -> Option<Category> {
        if self.positives.contains_key(word) {
            Some(Category::Positive)
        } else if self.negatives.contains_key(word) {
            Some(Category::Negative)
        } else if self.neutrals.contains_key(word) {
            Some(Category::Neutral)
        } else {
            None
        }
    }

    /// 単語の重みを返します
    ///
    /// ニュートラルの単語は重み 0 を返します。どのカテゴリにも属さない
    /// 単語は `None` を返します。
    pub fn weight_of(&self, word: &str) -> Option<i32> {
        self.positives
            .get(word)
            .or_else(|| self.negatives.get(word))
            .or_else(|| self.neutrals.get(word))
            .copied()
    }

    /// 単語がいずれかのカテゴリに属するかどうかを返します
    pub fn contains(&self, word: &str) -> bool {
        self.category_of(word).is_some()
    }

    /// 全カテゴリの単語の和集合を返すイテレータを取得します
    ///
    /// 候補提案の語彙として使用されます。順序は保証されません。
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.positives
            .keys()
            .chain(self.negatives.keys())
            .chain(self.neutrals.keys())
            .map(String::as_str)
    }

    /// 登録されている単語の総数を返します
    pub fn len(&self) -> usize {
        self.positives.len() + self.negatives.len() + self.neutrals.len()
    }

    /// レキシコンが空かどうかを返します
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// ポジティブカテゴリへの参照を返します
    pub fn positives(&self) -> &HashMap<String, i32> {
        &self.positives
    }

    /// ネガティブカテゴリへの参照を返します
    pub fn negatives(&self) -> &HashMap<String, i32> {
        &self.negatives
    }

    /// ニュートラルカテゴリへの参照を返します
    pub fn neutrals(&self) -> &HashMap<String, i32> {
        &self.neutrals
    }

    /// 単語を指定カテゴリに挿入します
    ///
    /// # 注意
    ///
    /// このメソッドは他カテゴリとの重複や重みの範囲を検査しません。
    /// 呼び出し側（リゾルバ）が挿入前に [`Lexicon::contains`] と
    /// [`Category::admits`] で検証する必要があります。
    ///
    /// # 引数
    ///
    /// * `word` - 正規化済みの単語
    /// * `category` - 挿入先カテゴリ
    /// * `weight` - 単語の重み
    pub fn insert(&mut self, word: String, category: Category, weight: i32) {
        let map = match category {
            Category::Positive => &mut self.positives,
            Category::Negative => &mut self.negatives,
            Category::Neutral => &mut self.neutrals,
        };
        map.insert(word, weight);
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "version": 2,
        "positivos": {"excelente": 3, "bueno": 1},
        "negativos": {"terrible": -3},
        "neutros": {"servicio": 0},
        "comment": "curated by QA"
    }"#;

    #[test]
    fn test_from_reader() {
        let lexicon = Lexicon::from_reader(DOC.as_bytes()).unwrap();
        assert_eq!(lexicon.len(), 4);
        assert_eq!(lexicon.weight_of("excelente"), Some(3));
        assert_eq!(lexicon.weight_of("terrible"), Some(-3));
        assert_eq!(lexicon.weight_of("servicio"), Some(0));
        assert_eq!(lexicon.weight_of("ausente"), None);
        assert_eq!(lexicon.category_of("bueno"), Some(Category::Positive));
        assert_eq!(lexicon.category_of("terrible"), Some(Category::Negative));
        assert_eq!(lexicon.category_of("servicio"), Some(Category::Neutral));
    }

    #[test]
    fn test_missing_categories_default_empty() {
        let lexicon = Lexicon::from_reader(r#"{"positivos": {"bien": 2}}"#.as_bytes()).unwrap();
        assert_eq!(lexicon.len(), 1);
        assert!(lexicon.negatives().is_empty());
        assert!(lexicon.neutrals().is_empty());
    }

    #[test]
    fn test_malformed_document() {
        let result = Lexicon::from_reader(r#"{"positivos": ["not", "a", "map"]}"#.as_bytes());
        assert!(result.is_err());
        let result = Lexicon::from_reader(r#"{"positivos": {"bien": "two"}}"#.as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Lexicon::from_path(dir.path().join("missing.json"));
        assert!(matches!(result, Err(CharlaError::LexiconNotFound(_))));
    }

    #[test]
    fn test_save_preserves_foreign_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let mut lexicon = Lexicon::from_reader(DOC.as_bytes()).unwrap();
        lexicon.insert("malo".to_string(), Category::Negative, -1);
        lexicon.save(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], 2);
        assert_eq!(value["comment"], "curated by QA");
        assert_eq!(value["negativos"]["malo"], -1);
        assert_eq!(value["negativos"]["terrible"], -3);
    }

    #[test]
    fn test_save_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.json");
        let b = dir.path().join("b.json");

        let lexicon = Lexicon::from_reader(DOC.as_bytes()).unwrap();
        lexicon.save(&a).unwrap();
        lexicon.save(&b).unwrap();

        assert_eq!(
            std::fs::read_to_string(&a).unwrap(),
            std::fs::read_to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_insert_is_unchecked_storage() {
        // Cross-category uniqueness is the resolver's responsibility.
        let mut lexicon = Lexicon::new();
        lexicon.insert("raro".to_string(), Category::Positive, 2);
        lexicon.insert("raro".to_string(), Category::Negative, -2);
        assert_eq!(lexicon.len(), 2);
    }

    #[test]
    fn test_category_admits() {
        assert!(Category::Positive.admits(1));
        assert!(Category::Positive.admits(3));
        assert!(!Category::Positive.admits(0));
        assert!(!Category::Positive.admits(4));
        assert!(Category::Negative.admits(-1));
        assert!(Category::Negative.admits(-3));
        assert!(!Category::Negative.admits(0));
        assert!(!Category::Negative.admits(-4));
        assert!(Category::Neutral.admits(0));
        assert!(!Category::Neutral.admits(1));
    }
}
