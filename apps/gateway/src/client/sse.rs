//! # Server-Sent Events パーサー
//!
//! モデルプロバイダのストリーミング応答（`text/event-stream`）を
//! イベント単位に切り出す。
//!
//! ネットワークチャンクの境界はイベント境界とも UTF-8 の文字境界とも
//! 一致しないため、バイト列のままバッファし、空行（イベント終端）が
//! 揃った時点で初めて文字列にデコードする。

use bytes::{Buf, BytesMut};

/// SSE イベント
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SseEvent {
    /// `event:` フィールド（未指定なら空）
    pub event: String,
    /// `data:` フィールド（複数行は `\n` で連結）
    pub data:  String,
}

/// バイトチャンクを受け取り、完結した [`SseEvent`] を返すパーサー
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: BytesMut,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// チャンクを追加し、完結したイベントを取り出す
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some((end, delimiter_len)) = find_event_boundary(&self.buffer) {
            let raw = self.buffer.split_to(end);
            self.buffer.advance(delimiter_len);
            if let Some(event) = parse_event(&String::from_utf8_lossy(&raw)) {
                events.push(event);
            }
        }
        events
    }

    /// ストリーム終了時に、終端の空行が無いまま残ったイベントを取り出す
    pub fn finish(&mut self) -> Option<SseEvent> {
        let rest = std::mem::take(&mut self.buffer);
        parse_event(String::from_utf8_lossy(&rest).trim_end())
    }
}

/// 最初のイベント終端（空行）の位置と区切りのバイト長を返す
fn find_event_boundary(buffer: &[u8]) -> Option<(usize, usize)> {
    const DELIMITERS: [&[u8]; 3] = [b"\r\n\r\n", b"\n\n", b"\r\r"];

    DELIMITERS
        .iter()
        .filter_map(|delimiter| {
            buffer
                .windows(delimiter.len())
                .position(|window| window == *delimiter)
                .map(|pos| (pos, delimiter.len()))
        })
        .min_by_key(|(pos, _)| *pos)
}

/// `\r\n`、`\n`、`\r` のいずれも行末として扱う
fn split_lines(raw: &str) -> impl Iterator<Item = &str> {
    raw.split("\r\n").flat_map(|line| line.split(['\n', '\r']))
}

fn parse_event(raw: &str) -> Option<SseEvent> {
    let mut event = SseEvent::default();
    let mut data_lines: Vec<&str> = Vec::new();

    for line in split_lines(raw) {
        // コメント行
        if line.starts_with(':') {
            continue;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => event.event = value.to_string(),
            "data" => data_lines.push(value),
            _ => {}
        }
    }

    if data_lines.is_empty() && event.event.is_empty() {
        return None;
    }
    event.data = data_lines.join("\n");
    Some(event)
}
