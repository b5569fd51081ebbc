//! 会話プロトコルの遵守を検査するモジュール
//!
//! コールセンターの応対には、挨拶・本人確認・丁寧さ・締めの挨拶という
//! 4つのフェーズが期待されます。このモジュールは、各フェーズに対応する
//! 正規表現パターンの順序付き集合を会話テキストに適用して、遵守状況を
//! 判定します。
//!
//! パターン集合はプロセス全体の定数ではなく、構築時に設定として
//! [`ProtocolRules`] にまとめられ、分類器に明示的に渡されます。これにより
//! テストや別ルールセットを分離して扱えます。
//!
//! パターンはコンパイル前にテキストと同じ正規化（小文字化と
//! ダイアクリティカルマーク除去）を通されるため、アクセント付きの
//! 表記揺れもマッチします。

use regex::Regex;

use crate::errors::{CharlaError, Result};
use crate::normalizer;

/// 挨拶フェーズのパターン
const GREETINGS: &[&str] = &[
    // Basic openings
    r"\bhola\b",
    r"\bbuen[oa]s?\b",
    r"\bbuenos dias\b",
    r"\bbuenas tardes\b",
    r"\bbuenas noches\b",
    r"\bfeliz dia\b",
    r"\bfeliz jornada\b",
    // Formal openings
    r"\bestimad[ao]s?\b",
    r"\bsaludos cordiales\b",
    r"\bbienvenid[oa]s?\b",
    r"\bgracias por llamar\b",
    r"\bgracias por contactar\b",
    r"\bgracias por comunicarse\b",
    r"\bgracias por elegirnos\b",
    r"\bgracias por su preferencia\b",
    r"\bles saluda\b",
    r"\besta es la linea de\b",
    r"\blínea de atencion\b",
    r"\bes un placer atenderle\b",
    r"\bmucho gusto en atenderle\b",
    // Opening questions
    r"\ben que puedo ayudarle\b",
    r"\bcomo puedo ayudarle\b",
    r"\ben que le podemos ayudar\b",
    r"\b¿?en que puedo asistirle\b",
    r"\b¿?en que le puedo servir\b",
    // Informal variants
    r"\bque tal\b",
    r"\bqué tal\b",
    r"\bholas\b",
];

/// 本人確認フェーズのパターン
const IDENTIFICATIONS: &[&str] = &[
    // Document numbers
    r"\bnumero de documento\b",
    r"\bnumero de cedula\b",
    r"\bdni\b",
    r"\bci\b",
    r"\bdocumento de identidad\b",
    // Accounts and customer ids
    r"\bnumero de cuenta\b",
    r"\bnumero de cliente\b",
    r"\bcodigo de cliente\b",
    r"\breferencia de cliente\b",
    r"\bcodigo de usuario\b",
    r"\bnumero de orden\b",
    // Personal data
    r"\bnombre completo\b",
    r"\bnombre y apellido\b",
    r"\bapellido\b",
    r"\bfecha de nacimiento\b",
    r"\bnumero de telefono\b",
    r"\btelefono celular\b",
    r"\bwhatsapp\b",
    r"\bcorreo electr[oó]nico\b",
    r"\bdireccion\b",
    // Ways of asking for it
    r"\bpuede (?:darme|facilitarme|proporcionarme) su (?:numero de )?(?:documento|cedula|dni|ci|numero de cliente)\b",
    r"\bpodria (?:darme|facilitarme|proporcionarme) su (?:numero de )?(?:documento|cedula|dni|ci|numero de cliente)\b",
    r"\bconfirmar su (?:numero de )?(?:documento|cedula|dni|ci)\b",
    r"\bpara verificar su identidad\b",
    r"\bpara confirmar su cuenta\b",
];

/// 丁寧な応対に現れてはならない語のパターン
const RUDE_WORDS: &[&str] = &[
    // Common insults
    r"\btonto\b",
    r"\bidiota\b",
    r"\best[úu]pido\b",
    r"\bimb[ée]cil\b",
    r"\bpendejo\b",
    r"\btarado\b",
    r"\bgilipollas\b",
    r"\bmaldito\b",
    r"\bcabr[oó]n\b",
    r"\bco[ñn]o\b",
    r"\bmierda\b",
    // Disparaging terms
    r"\bpat[ée]tico\b",
    r"\bdespreciable\b",
    r"\bestupidez\b",
    r"\bmediocre\b",
    r"\babsurdo\b",
    r"\batroz\b",
    r"\bhorrible\b",
    r"\bdesastroso\b",
    r"\bp[eé]simo\b",
    r"\bdefectuoso\b",
    r"\bdeficiente\b",
    r"\bineficiente\b",
    r"\binsuficiente\b",
    r"\bincompetente\b",
    r"\bfraudulento\b",
    r"\bterrible\b",
    r"\blamentable\b",
    r"\brepugnante\b",
    r"\bvergonzoso\b",
];

/// 締めの挨拶フェーズのパターン
const FAREWELLS: &[&str] = &[
    r"gracias por su tiempo\b",
    r"gracias por llamar al servicio de atencion al cliente\b",
    r"gracias por contactar con nosotros\b",
    r"gracias por comunicarse con nosotros\b",
    r"gracias por elegirnos\b",
    r"muchas gracias\b",
    r"muchas gracias por su preferencia\b",
    r"ha sido un placer atenderle\b",
    r"estamos a su disposicion\b",
    r"quedo a sus ordenes\b",
    r"quedo a su disposicion\b",
    r"no dude en contactarnos\b",
    r"hasta luego\b",
    r"hasta pronto\b",
    r"hasta la proxima\b",
    r"hasta manana\b",
    r"hasta mañana\b",
    r"nos vemos\b",
    r"nos mantenemos en contacto\b",
    r"que tenga un buen dia\b",
    r"que tenga un excelente dia\b",
    r"le deseamos un buen dia\b",
    r"que disfrute el resto de su dia\b",
    r"que pase un buen dia\b",
    r"feliz dia\b",
    r"adios\b",
    r"adiós\b",
];

/// プロトコル分類の結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtocolReport {
    /// 最初の非空行が挨拶パターンにマッチしたかどうか
    pub greeting_ok: bool,
    /// テキスト全体のどこかで本人確認パターンにマッチしたかどうか
    pub identification_ok: bool,
    /// マッチした失礼な語の出現（パターン順、次にマッチ順）
    pub rude_occurrences: Vec<String>,
    /// 最後の非空行が締めの挨拶パターンにマッチしたかどうか
    pub farewell_ok: bool,
}

/// プロトコル検査のルールセット
///
/// 4フェーズそれぞれの順序付きパターン集合を、正規化してコンパイル済みの
/// 状態で保持します。一度構築すれば読み取り専用です。
///
/// # 例
///
/// ```
/// use charla::protocol::ProtocolRules;
///
/// let rules = ProtocolRules::spanish_call_center();
/// let report = rules.classify("Hola, buenas tardes.\nGracias por su tiempo.");
/// assert!(report.greeting_ok);
/// assert!(report.farewell_ok);
/// ```
pub struct ProtocolRules {
    greeting: Vec<Regex>,
    identification: Vec<Regex>,
    rudeness: Vec<Regex>,
    farewell: Vec<Regex>,
}

impl ProtocolRules {
    /// パターン文字列のリストからルールセットを構築します
    ///
    /// 各パターンは正規化（小文字化・ダイアクリティカルマーク除去）された
    /// うえでコンパイルされます。パターンの順序は保持されます。
    ///
    /// # 引数
    ///
    /// * `greeting` - 挨拶フェーズのパターン
    /// * `identification` - 本人確認フェーズのパターン
    /// * `rudeness` - 失礼な語のパターン
    /// * `farewell` - 締めの挨拶フェーズのパターン
    ///
    /// # エラー
    ///
    /// パターンが正規表現としてコンパイルできない場合は
    /// [`CharlaError::InvalidArgument`] を返します。
    pub fn from_patterns(
        greeting: &[&str],
        identification: &[&str],
        rudeness: &[&str],
        farewell: &[&str],
    ) -> Result<Self> {
        Ok(Self {
            greeting: compile_set("greeting", greeting)?,
            identification: compile_set("identification", identification)?,
            rudeness: compile_set("rudeness", rudeness)?,
            farewell: compile_set("farewell", farewell)?,
        })
    }

    /// スペイン語コールセンター向けの組み込みルールセットを構築します
    pub fn spanish_call_center() -> Self {
        Self::from_patterns(GREETINGS, IDENTIFICATIONS, RUDE_WORDS, FAREWELLS)
            .expect("the built-in pattern sets are valid regexes")
    }

    /// 会話テキストのプロトコル遵守を分類します
    ///
    /// テキスト全体を正規化したうえで、非空行に分割して判定します:
    ///
    /// - 挨拶: 最初の非空行がいずれかのパターンにマッチ
    /// - 本人確認: テキスト全体のどこかでいずれかのパターンにマッチ
    /// - 失礼な語: テキスト全体でのすべてのマッチを収集
    ///   （同じ出現箇所が複数パターンにマッチした場合はパターンごとに記録）
    /// - 締めの挨拶: 最後の非空行がいずれかのパターンにマッチ
    ///
    /// 非空行が1つもない場合、挨拶と締めの挨拶は `false` になります。
    ///
    /// # 引数
    ///
    /// * `raw_text` - 生の会話テキスト
    ///
    /// # 戻り値
    ///
    /// 分類結果の [`ProtocolReport`]
    pub fn classify(&self, raw_text: &str) -> ProtocolReport {
        let clean = normalizer::fold(raw_text);
        let lines: Vec<&str> = clean
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let first = lines.first().copied().unwrap_or("");
        let last = lines.last().copied().unwrap_or("");

        let greeting_ok = !first.is_empty() && self.greeting.iter().any(|p| p.is_match(first));
        let identification_ok = self.identification.iter().any(|p| p.is_match(&clean));
        let rude_occurrences = self
            .rudeness
            .iter()
            .flat_map(|p| p.find_iter(&clean))
            .map(|m| m.as_str().to_string())
            .collect();
        let farewell_ok = !last.is_empty() && self.farewell.iter().any(|p| p.is_match(last));

        ProtocolReport {
            greeting_ok,
            identification_ok,
            rude_occurrences,
            farewell_ok,
        }
    }
}

/// 1フェーズ分のパターンを正規化してコンパイルします
fn compile_set(phase: &'static str, patterns: &[&str]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(&normalizer::fold(p))
                .map_err(|e| CharlaError::invalid_argument(phase, e.to_string()))
        })
        .collect()
}
