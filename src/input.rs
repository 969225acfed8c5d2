//! 翻訳データの入力定義
pub mod bundle;
pub mod translation;
