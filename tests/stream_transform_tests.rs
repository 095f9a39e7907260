//! Tests for stream transforms.

mod common;

use futures::StreamExt;
use pretty_assertions::assert_eq;

use common::{event, stream_of, tool_delta};
use unillm::accumulator::IndexPolicy;
use unillm::error::UnillmError;
use unillm::generation::collect_stream;
use unillm::provider::PartialResponseStream;
use unillm::stream_transform::{CoalesceTextTransform, FilterTransform, StreamTransform};
use unillm::types::*;

async fn drain(stream: PartialResponseStream) -> Vec<PartialModelResponse> {
    stream.map(|item| item.unwrap()).collect().await
}

fn texts(events: &[PartialModelResponse]) -> Vec<String> {
    events
        .iter()
        .flat_map(|e| e.deltas.iter())
        .filter_map(|d| match &d.part {
            PartDelta::Text(t) => Some(t.text.clone()),
            _ => None,
        })
        .collect()
}

fn mixed_events() -> Vec<PartialModelResponse> {
    vec![
        event(ContentDelta::at(0, PartDelta::text("Hel"))),
        event(ContentDelta::at(0, PartDelta::text("lo "))),
        event(ContentDelta::at(0, PartDelta::text("there"))),
        event(ContentDelta::at(1, tool_delta(Some("tc"), Some("f"), Some("{}")))),
        event(ContentDelta::at(2, PartDelta::text("Bye"))),
        PartialModelResponse::from_usage(ModelUsage::new(4, 2)),
    ]
}

#[tokio::test]
async fn filter_transform_keeps_matching_deltas_and_usage() {
    let transform = FilterTransform::new(|d: &ContentDelta| matches!(d.part, PartDelta::Text(_)));
    let events = drain(transform.transform(stream_of(mixed_events()))).await;

    assert_eq!(texts(&events), vec!["Hel", "lo ", "there", "Bye"]);
    assert!(events
        .iter()
        .all(|e| e.deltas.iter().all(|d| matches!(d.part, PartDelta::Text(_)))));
    assert_eq!(events.last().and_then(|e| e.usage.clone()), Some(ModelUsage::new(4, 2)));
}

#[tokio::test]
async fn coalesce_merges_adjacent_text_until_threshold() {
    let transform = CoalesceTextTransform::new(6);
    let events = drain(transform.transform(stream_of(mixed_events()))).await;

    // "Hel" + "lo " reaches the threshold, "there" is flushed by the tool call.
    assert_eq!(texts(&events), vec!["Hello ", "there", "Bye"]);
}

#[tokio::test]
async fn coalesce_does_not_change_materialized_result() {
    let plain = collect_stream(stream_of(mixed_events()), IndexPolicy::Explicit, None, None)
        .await
        .unwrap();
    let coalesced = collect_stream(
        CoalesceTextTransform::new(64).transform(stream_of(mixed_events())),
        IndexPolicy::Explicit,
        None,
        None,
    )
    .await
    .unwrap();
    assert_eq!(coalesced, plain);
}

#[tokio::test]
async fn coalesce_flushes_before_forwarding_an_error() {
    let inner: PartialResponseStream = Box::pin(futures::stream::iter(vec![
        Ok(event(ContentDelta::at(0, PartDelta::text("a")))),
        Err(UnillmError::Stream("dropped".into())),
    ]));
    let items: Vec<_> = CoalesceTextTransform::new(100)
        .transform(inner)
        .collect()
        .await;

    assert_eq!(items.len(), 2);
    assert!(matches!(&items[0], Ok(p) if texts(std::slice::from_ref(p)) == vec!["a"]));
    assert!(matches!(items[1], Err(UnillmError::Stream(_))));
}

#[tokio::test]
async fn coalesce_leaves_unindexed_text_alone() {
    let events = drain(
        CoalesceTextTransform::new(100).transform(stream_of(vec![
            event(ContentDelta::unindexed(PartDelta::text("a"))),
            event(ContentDelta::unindexed(PartDelta::text("b"))),
        ])),
    )
    .await;
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.deltas[0].index.is_none()));
}

#[tokio::test]
async fn coalesce_threshold_counts_characters() {
    // Four characters, eight bytes: below a threshold of five.
    let events = drain(
        CoalesceTextTransform::new(5).transform(stream_of(vec![
            event(ContentDelta::at(0, PartDelta::text("éé"))),
            event(ContentDelta::at(0, PartDelta::text("éé"))),
            event(ContentDelta::at(0, PartDelta::text("!"))),
            event(ContentDelta::at(0, PartDelta::text("x"))),
        ])),
    )
    .await;
    assert_eq!(texts(&events), vec!["éééé!", "x"]);
}
