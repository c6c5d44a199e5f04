//! A `yaml_rust2`-driven front end that lowers YAML into the shared
//! [`ParseEvent`] stream with byte spans (§4.1).
//!
//! `yaml_rust2::parser::Parser` already solves the hard part — YAML's
//! indentation-sensitive block grammar, flow collections, anchors and
//! aliases — and exposes it through [`MarkedEventReceiver`], a callback
//! trait built for exactly this kind of span-aware consumer. Scalar
//! *end* offsets are not given directly by the crate, since a scalar's
//! on-the-wire width (quoting, folding, escaping) only matters to the
//! scanner; we derive them as the start of the next sibling event,
//! trimmed of trailing whitespace, which is the span a reader would
//! actually want highlighted.
//!
//! Anchor *names* are resolved by the crate to small integer ids before
//! they ever reach the receiver; we key our anchor table by `a<id>`
//! rather than by the original `&name` text, which is sufficient since
//! nothing downstream cares about the spelling of an anchor, only which
//! pointer it denotes.

use yaml_rust2::parser::Event as YamlEvent;
use yaml_rust2::parser::MarkedEventReceiver;
use yaml_rust2::parser::Parser as YamlParser;
use yaml_rust2::scanner::Marker;
use yaml_rust2::scanner::TScalarStyle;

use crate::error::ParseError;
use crate::events::ParseEvent;
use crate::events::ScalarKind;
use crate::span::Span;

/// Parses a YAML document into the shared event stream.
pub fn parse(text: &str) -> (Vec<ParseEvent>, Vec<ParseError>) {
    let mut receiver = RawCollector::default();
    let mut parser = YamlParser::new(text.chars());
    if let Err(e) = parser.load(&mut receiver, false) {
        let span = marker_span(Some(*e.marker()), text.len() as u32);
        let mut events = lower(&receiver.events, text);
        events.push(ParseEvent::DocEnd);
        return (events, vec![ParseError::new(e.to_string(), span)]);
    }

    let mut events = lower(&receiver.events, text);
    events.push(ParseEvent::DocEnd);
    (events, Vec::new())
}

fn marker_span(marker: Option<Marker>, doc_len: u32) -> Span {
    match marker {
        Some(m) => {
            let start = m.index() as u32;
            Span::new(start, (start + 1).min(doc_len))
        }
        None => Span::new(doc_len, doc_len),
    }
}

#[derive(Default)]
struct RawCollector {
    events: Vec<(YamlEvent, Marker)>,
}

impl MarkedEventReceiver for RawCollector {
    fn on_event(&mut self, ev: YamlEvent, mark: Marker) {
        self.events.push((ev, mark));
    }
}

/// Converts the raw `(Event, Marker)` stream (which includes the
/// `StreamStart`/`StreamEnd`/`DocumentStart`/`DocumentEnd` bookkeeping
/// events) into the shared [`ParseEvent`] stream.
fn lower(raw: &[(YamlEvent, Marker)], text: &str) -> Vec<ParseEvent> {
    let mut out = Vec::new();
    // Every map value and sequence/map element needs a best-effort end
    // offset; we look ahead to the next event's start marker for that.
    for (i, (event, marker)) in raw.iter().enumerate() {
        let next_start = raw.get(i + 1).map(|(_, m)| m.index() as u32);
        match event {
            YamlEvent::StreamStart
            | YamlEvent::StreamEnd
            | YamlEvent::DocumentStart
            | YamlEvent::DocumentEnd
            | YamlEvent::Nothing => {}
            YamlEvent::MappingStart(anchor_id, _tag) => {
                out.push(ParseEvent::MapStart {
                    span: Span::new(marker.index() as u32, marker.index() as u32 + 1),
                    anchor: anchor_name(*anchor_id),
                });
            }
            YamlEvent::MappingEnd => {
                let idx = marker.index() as u32;
                out.push(ParseEvent::MapEnd {
                    span: Span::new(idx, idx + 1),
                });
            }
            YamlEvent::SequenceStart(anchor_id, _tag) => {
                out.push(ParseEvent::SeqStart {
                    span: Span::new(marker.index() as u32, marker.index() as u32 + 1),
                    anchor: anchor_name(*anchor_id),
                });
            }
            YamlEvent::SequenceEnd => {
                let idx = marker.index() as u32;
                out.push(ParseEvent::SeqEnd {
                    span: Span::new(idx, idx + 1),
                });
            }
            YamlEvent::Scalar(value, style, anchor_id, _tag) => {
                let start = marker.index() as u32;
                let end = trimmed_end(text, start, next_start.unwrap_or(text.len() as u32));
                out.push(ParseEvent::Scalar {
                    kind: infer_scalar_kind(value, *style),
                    text: value.clone(),
                    span: Span::new(start, end),
                    anchor: anchor_name(*anchor_id),
                    alias: None,
                });
            }
            YamlEvent::Alias(anchor_id) => {
                let start = marker.index() as u32;
                let end = trimmed_end(text, start, next_start.unwrap_or(text.len() as u32));
                out.push(ParseEvent::Scalar {
                    kind: ScalarKind::Null,
                    text: format!("*a{anchor_id}"),
                    span: Span::new(start, end),
                    anchor: None,
                    alias: Some(format!("a{anchor_id}")),
                });
            }
        }
    }

    insert_keys(&out)
}

/// A bare scalar at the start of a mapping entry is a key; `yaml_rust2`
/// does not distinguish keys from values in its event stream (both are
/// just `Scalar`/container events alternating), so the distinction is
/// reconstructed here from position within the parent `MapStart`/`MapEnd`
/// pair: even-indexed children (0-based) of a mapping are keys.
fn insert_keys(events: &[ParseEvent]) -> Vec<ParseEvent> {
    let mut out = Vec::with_capacity(events.len());
    let mut map_depth_counters: Vec<u32> = Vec::new();
    let mut container_kind_stack: Vec<bool> = Vec::new(); // true = map

    let mut i = 0;
    while i < events.len() {
        let event = &events[i];
        match event {
            ParseEvent::MapStart { .. } => {
                bump_parent_counter(&mut map_depth_counters);
                container_kind_stack.push(true);
                map_depth_counters.push(0);
                out.push(event.clone());
            }
            ParseEvent::MapEnd { .. } => {
                container_kind_stack.pop();
                map_depth_counters.pop();
                out.push(event.clone());
            }
            ParseEvent::SeqStart { .. } => {
                bump_parent_counter(&mut map_depth_counters);
                container_kind_stack.push(false);
                map_depth_counters.push(0);
                out.push(event.clone());
            }
            ParseEvent::SeqEnd { .. } => {
                container_kind_stack.pop();
                map_depth_counters.pop();
                out.push(event.clone());
            }
            _ => {
                let in_map = container_kind_stack.last().copied().unwrap_or(false);
                if in_map {
                    let counter = map_depth_counters.last_mut().expect("map frame present");
                    let is_key = *counter % 2 == 0;
                    *counter += 1;
                    if is_key {
                        if let ParseEvent::Scalar { text, span, .. } = event {
                            out.push(ParseEvent::Key {
                                text: text.clone(),
                                span: *span,
                            });
                            i += 1;
                            continue;
                        }
                    }
                    out.push(event.clone());
                } else {
                    if let Some(counter) = map_depth_counters.last_mut() {
                        *counter += 1;
                    }
                    out.push(event.clone());
                }
            }
        }
        i += 1;
    }

    out
}

/// A container consumed as a map value (or a seq element) still occupies
/// one slot in its parent frame's key/value alternation, exactly like a
/// scalar does; this mirrors `ir.rs`'s `finish_container`, which bumps the
/// parent `Frame::index` the same way when a nested container closes.
/// Skipped when there is no parent frame (the document's own root
/// container).
fn bump_parent_counter(map_depth_counters: &mut [u32]) {
    if let Some(counter) = map_depth_counters.last_mut() {
        *counter += 1;
    }
}

fn anchor_name(id: usize) -> Option<String> {
    if id == 0 {
        None
    } else {
        Some(format!("a{id}"))
    }
}

fn infer_scalar_kind(text: &str, style: TScalarStyle) -> ScalarKind {
    if style != TScalarStyle::Plain {
        return ScalarKind::String;
    }
    match text {
        "null" | "~" | "" => ScalarKind::Null,
        "true" | "false" => ScalarKind::Boolean,
        _ if text.parse::<f64>().is_ok() => ScalarKind::Number,
        _ => ScalarKind::String,
    }
}

fn trimmed_end(text: &str, start: u32, upper_bound: u32) -> u32 {
    let upper_bound = upper_bound.max(start);
    let slice = &text[start as usize..upper_bound as usize];
    let trimmed_len = slice.trim_end().len() as u32;
    start + trimmed_len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_mapping_keys() {
        let (events, errors) = parse("a: 1\nb: true\n");
        assert!(errors.is_empty());
        assert!(events.iter().any(|e| matches!(e, ParseEvent::Key { text, .. } if text == "a")));
        assert!(events.iter().any(|e| matches!(e, ParseEvent::Key { text, .. } if text == "b")));
    }

    #[test]
    fn quoted_scalar_is_always_a_string() {
        let (events, _) = parse("a: \"123\"\n");
        let scalar = events.iter().find_map(|e| match e {
            ParseEvent::Scalar { kind, text, .. } if text == "123" => Some(*kind),
            _ => None,
        });
        assert_eq!(scalar, Some(ScalarKind::String));
    }

    #[test]
    fn plain_scalar_infers_number() {
        let (events, _) = parse("a: 123\n");
        let scalar = events.iter().find_map(|e| match e {
            ParseEvent::Scalar { kind, text, .. } if text == "123" => Some(*kind),
            _ => None,
        });
        assert_eq!(scalar, Some(ScalarKind::Number));
    }

    #[test]
    fn sibling_key_after_a_container_valued_key_stays_a_key() {
        let (events, errors) = parse(
            "paths:\n  /x:\n    get:\n      responses: {}\ninfo:\n  title: t\n",
        );
        assert!(errors.is_empty());
        assert!(events.iter().any(|e| matches!(e, ParseEvent::Key { text, .. } if text == "paths")));
        assert!(events.iter().any(|e| matches!(e, ParseEvent::Key { text, .. } if text == "info")));
        assert!(events.iter().any(|e| matches!(e, ParseEvent::Key { text, .. } if text == "title")));
        assert!(!events.iter().any(|e| matches!(e, ParseEvent::Scalar { text, .. } if text == "info")));
    }
}
