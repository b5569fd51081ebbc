//! 生の会話テキストを発話単位に分割するユーティリティ
//!
//! このバイナリは、2話者の生の文字起こしテキストから奇数番目
//! （1番目・3番目・…）の発話だけを抽出します。`Speaker <n>  <hh:mm>`
//! 形式のヘッダ行と `Transcribed by <url>` のトレーラ行は取り除かれ、
//! 発話内の改行は単一のスペースに畳まれて、1発話が1行として出力されます。
//! 出力ファイルが解析器（analyze）の入力になります。

use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use regex::Regex;

use clap::Parser;

/// コマンドライン引数
#[derive(Parser, Debug)]
#[clap(
    name = "segment",
    about = "Extracts the odd-numbered speaker turns from a raw transcript"
)]
struct Args {
    /// Raw dual-speaker transcript.
    #[clap(short = 'i', long)]
    transcript_in: PathBuf,

    /// File to which the extracted turns are output, one turn per line.
    #[clap(short = 'o', long)]
    turns_out: PathBuf,
}

/// メイン関数
///
/// 入力の文字起こしテキストから奇数番目の発話を抽出し、
/// 出力ファイルに1発話1行で書き出します。
///
/// # 戻り値
///
/// 実行が成功した場合は `Ok(())`、エラーが発生した場合はエラー情報
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    eprintln!("Segmenting the transcript...");
    let reader = BufReader::new(File::open(&args.transcript_in)?);
    let turns = extract_odd_turns(reader)?;

    let mut out = BufWriter::new(File::create(&args.turns_out)?);
    for turn in &turns {
        writeln!(out, "{turn}")?;
    }
    out.flush()?;

    eprintln!("Wrote {} turns to {}", turns.len(), args.turns_out.display());
    Ok(())
}

/// 奇数番目の発話の本文を抽出します
///
/// `Speaker <n>  <hh:mm>` で始まる行が発話の区切りです。奇数番目の発話に
/// 属する非空行が連結され、発話内の改行は単一スペースに畳まれます。
/// 本文が空の発話は出力に含まれません。
///
/// # 引数
///
/// * `reader` - 生の文字起こしテキストを供給するリーダー
fn extract_odd_turns<R>(reader: R) -> Result<Vec<String>, Box<dyn Error>>
where
    R: BufRead,
{
    let speaker = Regex::new(r"^Speaker\s+\d+\s+\d{1,2}:\d{2}")?;
    let trailer = Regex::new(r"(?i)^transcribed by ")?;

    let mut count = 0usize;
    let mut include = false;
    let mut turns: Vec<String> = vec![];

    for line in reader.lines() {
        let line = line?;
        if trailer.is_match(&line) {
            continue;
        }
        if speaker.is_match(&line) {
            count += 1;
            include = count % 2 == 1;
            if include {
                turns.push(String::new());
            }
            continue;
        }
        if include && !line.trim().is_empty() {
            if let Some(turn) = turns.last_mut() {
                if !turn.is_empty() {
                    turn.push(' ');
                }
                turn.push_str(line.trim());
            }
        }
    }

    turns.retain(|turn| !turn.is_empty());
    Ok(turns)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = "\
Speaker 1  0:01
Hola, buenas tardes.
Le atiende Maria.

Speaker 2  0:09
Buenas tardes, llamo por un reclamo.

Speaker 1  0:15
Con gusto le ayudo,
indiqueme su numero de documento.

Speaker 2  0:31
Es el 12345678.

Transcribed by https://otter.ai
";

    #[test]
    fn test_odd_turns_only() {
        let turns = extract_odd_turns(RAW.as_bytes()).unwrap();
        assert_eq!(
            turns,
            [
                "Hola, buenas tardes. Le atiende Maria.",
                "Con gusto le ayudo, indiqueme su numero de documento.",
            ]
        );
    }

    #[test]
    fn test_trailer_is_dropped_case_insensitively() {
        let raw = "Speaker 1  0:01\nHola.\nTRANSCRIBED BY https://otter.ai\n";
        let turns = extract_odd_turns(raw.as_bytes()).unwrap();
        assert_eq!(turns, ["Hola."]);
    }

    #[test]
    fn test_empty_turns_are_skipped() {
        let raw = "Speaker 1  0:01\n\nSpeaker 2  0:05\nAlgo.\nSpeaker 1  0:09\nGracias.\n";
        let turns = extract_odd_turns(raw.as_bytes()).unwrap();
        assert_eq!(turns, ["Gracias."]);
    }

    #[test]
    fn test_no_headers_yields_nothing() {
        let turns = extract_odd_turns("texto suelto sin encabezados\n".as_bytes()).unwrap();
        assert!(turns.is_empty());
    }
}
