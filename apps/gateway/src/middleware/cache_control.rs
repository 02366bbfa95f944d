//! # キャッシュ制御ミドルウェア
//!
//! 分析結果やセッションを含むレスポンスが中間キャッシュやブラウザに
//! 残らないよう、`Cache-Control: no-store` を全レスポンスに設定する。
//! ストリーミングレスポンスにも同じく付与される（ヘッダー確定時点で設定するため）。

use axum::{
    extract::Request,
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};

/// レスポンスに `Cache-Control: no-store` を付与する
///
/// ハンドラが独自に設定した値も上書きする。
pub async fn no_cache(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
