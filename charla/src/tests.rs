//! Charlaのテストモジュール群
//!
//! 対話セッションのように複数コンポーネントにまたがる動作を検証する
//! テストを含みます。
