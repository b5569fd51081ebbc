//! 会話テキストを解析するユーティリティ
//!
//! このバイナリは、コールセンターの会話テキストをレキシコンに対して
//! 解析し、感情スコア・プロトコル遵守・未定義語のレポートを出力します。
//! 未定義語がある場合は対話的な解決セッションを開始し、セッション終了後に
//! 更新されたレキシコンを保存します。

use std::error::Error;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use charla::{AnalysisReport, Analyzer, ConsoleDialogue, Lexicon, ProtocolRules, Session};

use clap::Parser;

/// コマンドライン引数
#[derive(Parser, Debug)]
#[clap(
    name = "analyze",
    about = "Scores a call-center transcript against the lexicon and checks the service protocol"
)]
struct Args {
    /// Transcript file to analyze.
    transcript: PathBuf,

    /// Lexicon document (JSON).
    #[clap(short = 'l', long, default_value = "tokens.json")]
    lexicon: PathBuf,

    /// Print the report without starting the interactive session.
    #[clap(long)]
    no_interact: bool,
}

/// メイン関数
///
/// レキシコンをロードし、会話テキストを解析してレポートを出力します。
/// 未定義語が残っていれば対話セッションを実行し、レキシコンを保存します。
///
/// # 戻り値
///
/// 実行が成功した場合は `Ok(())`、エラーが発生した場合はエラー情報
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    eprintln!("Loading the lexicon...");
    let mut lexicon = Lexicon::from_path(&args.lexicon)?;
    let rules = ProtocolRules::spanish_call_center();

    let report = Analyzer::new(&lexicon, &rules).analyze_file(&args.transcript)?;
    print_report(&report)?;

    if report.undefined.is_empty() {
        println!("\nNo undefined words to process.");
        return Ok(());
    }
    if args.no_interact {
        return Ok(());
    }

    let mut dialogue = ConsoleDialogue;
    let mut session = Session::new(&mut lexicon, report.undefined.clone(), &args.transcript);
    let summary = session.run(&mut dialogue)?;

    lexicon.save(&args.lexicon)?;
    println!(
        "\n>> Lexicon '{}' updated ({} classified, {} replaced, {} still pending).",
        args.lexicon.display(),
        summary.classified,
        summary.replaced,
        summary.remaining,
    );

    Ok(())
}

/// レポートを標準出力に整形して出力します
fn print_report(report: &AnalysisReport) -> std::io::Result<()> {
    let out = std::io::stdout();
    let mut out = BufWriter::new(out.lock());
    let s = &report.sentiment;
    let p = &report.protocol;

    writeln!(
        out,
        "\nOverall sentiment: {} ({:+})",
        s.polarity(),
        s.total
    )?;
    writeln!(
        out,
        "Positive words ({}): {}",
        s.pos_count,
        join(&s.pos_words)
    )?;
    writeln!(
        out,
        "Most positive words (weight {:+}): {}",
        s.top_pos_weight,
        join(&s.top_pos_words)
    )?;
    writeln!(
        out,
        "Negative words ({}): {}",
        s.neg_count,
        join(&s.neg_words)
    )?;
    writeln!(
        out,
        "Most negative words (weight {:+}): {}",
        s.top_neg_weight,
        join(&s.top_neg_words)
    )?;
    writeln!(
        out,
        "Neutral words ({}): {}",
        s.neut_count,
        join(&s.neut_words)
    )?;

    writeln!(out, "\n--- Protocol phases ---")?;
    writeln!(out, "Greeting phase: {}", verdict(p.greeting_ok))?;
    writeln!(out, "Identification: {}", verdict(p.identification_ok))?;
    let rude = if p.rude_occurrences.is_empty() {
        "None".to_string()
    } else {
        p.rude_occurrences.join(", ")
    };
    writeln!(out, "Rude words: {rude}")?;
    writeln!(out, "Polite farewell: {}", verdict(p.farewell_ok))?;

    writeln!(
        out,
        "\nUndefined words ({}): {}",
        report.undefined.len(),
        join(&report.undefined)
    )?;
    out.flush()
}

fn join(words: &[String]) -> String {
    if words.is_empty() {
        "-".to_string()
    } else {
        words.join(", ")
    }
}

fn verdict(ok: bool) -> &'static str {
    if ok {
        "OK"
    } else {
        "Missing"
    }
}
