//! 未定義語を対話的に解決するモジュール
//!
//! 解析でどのカテゴリにも属さなかったトークン（未定義語）のワークリストを、
//! 操作者との対話を通じて1語ずつ解決します。各反復は次の3状態を辿ります:
//!
//! 1. **選択**: ワークリストを提示し、操作者が語を選ぶかセッションを終える
//! 2. **有効性**: 選んだ語が正しい語彙かどうかを操作者が申告する
//! 3. **分類** または **候補提案**:
//!    - 正しい語彙であればカテゴリと重みを指定してレキシコンに追加する
//!    - 誤記であれば編集距離に基づく候補から置換先を選び、会話テキスト
//!      ファイル内の出現をすべて書き換える
//!
//! 語がワークリストから取り除かれるのは、分類の成功または置換の成功の
//! 場合だけです。それ以外の経路（無効な入力、範囲外の重み、カテゴリの
//! 重複、候補の省略）では、ワークリスト・レキシコン・ファイルのいずれも
//! 変更されません。操作者の入力エラーはループの外へ伝播しません。
//!
//! 入力の解釈（[`Selection`] など）は純粋な関数として分離されており、
//! 対話チャネル（[`Dialogue`]）なしでテストできます。

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::errors::Result;
use crate::lexicon::{Category, Lexicon};
use crate::suggest;

/// トークン列から未定義語のリストを作成します
///
/// レキシコンのどのカテゴリにも属さないトークンを、重複を除去して
/// 辞書順にソートした形で返します。
///
/// # 引数
///
/// * `tokens` - 正規化済みトークンの列
/// * `lexicon` - 照合に使用するレキシコン
pub fn undefined_words<I, S>(tokens: I, lexicon: &Lexicon) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut words: Vec<String> = tokens
        .into_iter()
        .filter(|t| !lexicon.contains(t.as_ref()))
        .map(|t| t.as_ref().to_string())
        .collect();
    words.sort_unstable();
    words.dedup();
    words
}

/// 対話チャネルの抽象境界
///
/// リゾルバはこのトレイトを通じてのみ操作者とやり取りします。
/// 本番では [`ConsoleDialogue`] が標準入出力に接続し、テストでは
/// スクリプト化された実装を使用します。
pub trait Dialogue {
    /// 操作者にメッセージを表示します
    fn say(&mut self, message: &str);

    /// 操作者に入力を促し、1行の応答を読み取ります
    ///
    /// # 戻り値
    ///
    /// 応答の文字列。入力が閉じられた場合（EOF）は `None`
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

/// 標準入出力に接続された対話チャネル
pub struct ConsoleDialogue;

impl Dialogue for ConsoleDialogue {
    fn say(&mut self, message: &str) {
        println!("{message}");
    }

    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        print!("{prompt}");
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
    }
}

/// 選択プロンプトへの入力の解釈結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// 空入力: セッションまたは候補選択を終える
    Finish,
    /// 有効な番号: 0始まりのインデックス
    Pick(usize),
    /// 数値でない、または範囲外の入力
    Invalid,
}

impl Selection {
    /// 1始まりの番号入力を解釈します
    ///
    /// # 引数
    ///
    /// * `input` - 操作者の入力
    /// * `len` - 提示したリストの長さ
    pub fn parse(input: &str, len: usize) -> Self {
        let input = input.trim();
        if input.is_empty() {
            return Self::Finish;
        }
        match input.parse::<usize>() {
            Ok(n) if (1..=len).contains(&n) => Self::Pick(n - 1),
            _ => Self::Invalid,
        }
    }
}

/// 有効性プロンプトへの入力を解釈します
///
/// `y` / `yes`（大文字小文字を問わない）のみを肯定とみなします。
pub fn is_yes(input: &str) -> bool {
    matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// カテゴリプロンプトへの入力を解釈します
pub fn parse_category(input: &str) -> Option<Category> {
    match input.trim().to_ascii_lowercase().as_str() {
        "p" => Some(Category::Positive),
        "n" => Some(Category::Negative),
        "u" => Some(Category::Neutral),
        _ => None,
    }
}

/// 重み入力の失敗理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightError {
    /// 整数として解釈できない
    NotANumber,
    /// カテゴリの許容範囲外
    OutOfRange,
}

/// 重みプロンプトへの入力を解釈します
///
/// # 引数
///
/// * `input` - 操作者の入力
/// * `category` - 挿入先カテゴリ（許容範囲を定める）
pub fn parse_weight(input: &str, category: Category) -> Result<i32, WeightError> {
    let weight: i32 = input.trim().parse().map_err(|_| WeightError::NotANumber)?;
    if category.admits(weight) {
        Ok(weight)
    } else {
        Err(WeightError::OutOfRange)
    }
}

/// セッションの結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// レキシコンに分類された語の数
    pub classified: usize,
    /// 候補への置換で解決された語の数
    pub replaced: usize,
    /// 未解決のまま残った語の数
    pub remaining: usize,
}

/// 未定義語の対話的解決セッション
///
/// レキシコンを可変参照で借用し、会話テキストのパスを保持します。
/// 分類の成功はメモリ上のレキシコンのみを変更します（ディスクへの保存は
/// セッション終了後に呼び出し側が行います）。置換の成功は会話テキスト
/// ファイルを即座に書き換えます。
pub struct Session<'a> {
    lexicon: &'a mut Lexicon,
    queue: Vec<String>,
    transcript: PathBuf,
}

impl<'a> Session<'a> {
    /// 新しいセッションを生成します
    ///
    /// # 引数
    ///
    /// * `lexicon` - 変更対象のレキシコン
    /// * `undefined` - 未定義語のワークリスト（[`undefined_words`] の結果）
    /// * `transcript` - 置換対象の会話テキストファイルのパス
    pub fn new<P>(lexicon: &'a mut Lexicon, undefined: Vec<String>, transcript: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            lexicon,
            queue: undefined,
            transcript: transcript.into(),
        }
    }

    /// 現在のワークリストを返します
    pub fn queue(&self) -> &[String] {
        &self.queue
    }

    /// 対話ループを実行します
    ///
    /// ワークリストが空になるか、操作者が選択プロンプトで空入力または
    /// EOFによってセッションを終えるまで反復します。
    ///
    /// # 置換に関する既知の制限
    ///
    /// 候補の受け入れによる置換は、ファイル全体に対するリテラルな
    /// 部分文字列置換です。トークン境界を考慮しないため、他の単語の
    /// 内部に埋め込まれた同じ文字列も書き換わります。
    ///
    /// # 引数
    ///
    /// * `dialogue` - 対話チャネル
    ///
    /// # エラー
    ///
    /// 会話テキストの読み書きなどI/Oに失敗した場合にエラーを返します。
    /// 操作者の入力エラーはここには含まれず、ループ内で報告されます。
    pub fn run<D>(&mut self, dialogue: &mut D) -> Result<SessionSummary>
    where
        D: Dialogue,
    {
        let mut classified = 0;
        let mut replaced = 0;

        while !self.queue.is_empty() {
            dialogue.say("\nPending undefined words:");
            for (i, word) in self.queue.iter().enumerate() {
                dialogue.say(&format!("  {}. {}", i + 1, word));
            }
            let Some(input) = dialogue.ask("\nSelect a word number (ENTER to finish): ")? else {
                break;
            };
            let index = match Selection::parse(&input, self.queue.len()) {
                Selection::Finish => {
                    dialogue.say("Session finished.");
                    break;
                }
                Selection::Invalid => {
                    dialogue.say("  Invalid selection.");
                    continue;
                }
                Selection::Pick(index) => index,
            };

            let word = self.queue[index].clone();
            dialogue.say(&format!("\nProcessing '{word}'"));

            let Some(answer) = dialogue.ask("  Is this a valid word? [y/N]: ")? else {
                break;
            };
            if is_yes(&answer) {
                if self.classify(&word, dialogue)? {
                    classified += 1;
                    // Removal is by identity, not by the displayed index.
                    self.queue.retain(|w| w != &word);
                }
            } else if self.substitute(&word, dialogue)? {
                replaced += 1;
                self.queue.retain(|w| w != &word);
            }
        }

        Ok(SessionSummary {
            classified,
            replaced,
            remaining: self.queue.len(),
        })
    }

    /// 分類状態: 語をレキシコンに追加します
    ///
    /// 厳密に成功した場合のみ `true` を返します。
    fn classify<D>(&mut self, word: &str, dialogue: &mut D) -> Result<bool>
    where
        D: Dialogue,
    {
        let Some(input) = dialogue.ask("  [p]ositive, [n]egative or ne[u]tral? ")? else {
            return Ok(false);
        };
        let Some(category) = parse_category(&input) else {
            dialogue.say("  Invalid category. The word stays pending.");
            return Ok(false);
        };

        let weight = match category {
            Category::Neutral => 0,
            Category::Positive | Category::Negative => {
                let prompt = if category == Category::Positive {
                    "    Weight (+1 to +3): "
                } else {
                    "    Weight (-1 to -3): "
                };
                let Some(raw) = dialogue.ask(prompt)? else {
                    return Ok(false);
                };
                match parse_weight(&raw, category) {
                    Ok(weight) => weight,
                    Err(WeightError::NotANumber) => {
                        dialogue.say("    Invalid weight. The word stays pending.");
                        return Ok(false);
                    }
                    Err(WeightError::OutOfRange) => {
                        dialogue.say("    Weight out of range. The word stays pending.");
                        return Ok(false);
                    }
                }
            }
        };

        if let Some(existing) = self.lexicon.category_of(word) {
            dialogue.say(&format!(
                "    '{word}' already exists in the {existing} category. The word stays pending.",
            ));
            return Ok(false);
        }

        self.lexicon.insert(word.to_string(), category, weight);
        log::info!("classified '{word}' as {category} with weight {weight}");
        dialogue.say(&format!("    Added '{word}' to {category} ({weight:+})."));
        Ok(true)
    }

    /// 候補提案状態: 置換先を選んで会話テキストを書き換えます
    ///
    /// 厳密に成功した場合のみ `true` を返します。
    fn substitute<D>(&mut self, word: &str, dialogue: &mut D) -> Result<bool>
    where
        D: Dialogue,
    {
        dialogue.say("  Not a valid word. Looking for close matches...\n");
        let candidates = suggest::suggest(word, self.lexicon.words(), suggest::MAX_CANDIDATES);
        if candidates.is_empty() {
            dialogue.say("  The lexicon has no words to suggest. The word stays pending.");
            return Ok(false);
        }
        for (i, candidate) in candidates.iter().enumerate() {
            let hamming = candidate
                .hamming
                .map(|h| format!(", Hamming={h}"))
                .unwrap_or_default();
            dialogue.say(&format!(
                "    {}. {} (Lev={}{})",
                i + 1,
                candidate.word,
                candidate.levenshtein,
                hamming,
            ));
        }
        let Some(choice) = dialogue.ask("\n  Pick a candidate number (ENTER to skip): ")? else {
            return Ok(false);
        };
        match Selection::parse(&choice, candidates.len()) {
            Selection::Pick(index) => {
                let replacement = &candidates[index].word;
                dialogue.say(&format!(
                    "  Replacing '{word}' with '{replacement}' in the transcript...",
                ));
                replace_literal(&self.transcript, word, replacement)?;
                dialogue.say("    Transcript updated.");
                Ok(true)
            }
            _ => {
                dialogue.say("  Skipped. The word stays pending.");
                Ok(false)
            }
        }
    }
}

/// ファイル内のリテラルな部分文字列をすべて置換します
///
/// ファイル全体を読み込み、置換後の内容を同一ディレクトリ内の一時
/// ファイルに書き出してからリネームで置き換えます。
fn replace_literal(path: &Path, needle: &str, replacement: &str) -> Result<()> {
    let content = fs::read_to_string(path)?;
    let rewritten = content.replace(needle, replacement);
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(rewritten.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path)?;
    log::info!(
        "replaced '{}' with '{}' in {}",
        needle,
        replacement,
        path.display(),
    );
    Ok(())
}
