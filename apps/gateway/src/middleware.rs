//! # ミドルウェア
//!
//! ゲートウェイ用のミドルウェアを提供する。
//!
//! Request ID・トレーシング・Canonical Log Line は tower-http と
//! `venturelens_shared` のレイヤーを使うため、ここには置かない。

mod cache_control;

pub use cache_control::no_cache;
