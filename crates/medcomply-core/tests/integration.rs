//! Integration tests for search and classification orchestration.
//!
//! Requests are simulated with tasks that sleep for different durations on a
//! paused clock, so completions arrive out of issue order.

use std::time::Duration;

use medcomply_api::{ClassifyResponse, MatchedRule, MessageId, MessageRecord, Physician, PhysicianId};
use medcomply_core::{
    ClassificationStatus, DirectorySearch, Generation, MessageFilter, MessageSearch, SearchPhase,
    SelectionBridge,
};
use tokio::sync::mpsc;

fn record(id: i64) -> MessageRecord {
    MessageRecord {
        message_id: MessageId(id),
        physician_id: PhysicianId(101),
        channel: "email".into(),
        direction: "outbound".into(),
        timestamp: "2024-03-05T09:30:00".into(),
        message_text: format!("message {id}"),
        campaign_id: None,
        topic: None,
        compliance_tag: None,
        sentiment: None,
        delivery_status: None,
        response_latency_sec: None,
    }
}

fn response(id: i64, rules: usize) -> ClassifyResponse {
    ClassifyResponse {
        message_id: MessageId(id),
        message_text: format!("message {id}"),
        compliance_version: "v1".into(),
        matched_rules: (0..rules)
            .map(|n| MatchedRule {
                id: format!("R{n}"),
                name: format!("Rule {n}"),
                result_type: "flag".into(),
                result_text: "Off-label claim".into(),
                matched_keywords: vec!["cure".into()],
            })
            .collect(),
    }
}

fn loaded(ids: &[i64]) -> MessageSearch {
    let mut search = MessageSearch::new(MessageFilter::default());
    search.set_physician_id("101");
    let ticket = search.search().unwrap();
    search.apply_results(ticket.generation(), Ok(ids.iter().copied().map(record).collect()));
    search
}

#[tokio::test(start_paused = true)]
async fn concurrent_classifications_complete_out_of_order() {
    let mut search = loaded(&[1, 2, 3]);
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Message 1 is slowest and message 3 fails first.
    for (id, delay_ms) in [(1_i64, 300_u64), (2, 200), (3, 100)] {
        let ticket = search.classify(MessageId(id)).unwrap();
        let tx = tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            let result = if id == 3 {
                Err("status 500".to_string())
            } else {
                Ok(response(id, usize::try_from(id).unwrap()))
            };
            let _ = tx.send((ticket, result));
        });
    }
    drop(tx);
    assert_eq!(search.classification().in_flight(), 3);

    let mut order = Vec::new();
    while let Some((ticket, result)) = rx.recv().await {
        order.push(ticket.message_id());
        assert!(search.apply_classification(ticket, result));
    }
    assert_eq!(order, vec![MessageId(3), MessageId(2), MessageId(1)]);

    match search.classification_status(MessageId(1)) {
        ClassificationStatus::Succeeded(r) => assert_eq!(r.matched_rules.len(), 1),
        other => panic!("unexpected status {other:?}"),
    }
    match search.classification_status(MessageId(2)) {
        ClassificationStatus::Succeeded(r) => assert_eq!(r.matched_rules.len(), 2),
        other => panic!("unexpected status {other:?}"),
    }
    assert!(matches!(
        search.classification_status(MessageId(3)),
        ClassificationStatus::Failed(_)
    ));
    let notice = search.classification().notice().unwrap();
    assert_eq!(notice.message_id, MessageId(3));
    assert_eq!(search.classification().in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn late_search_response_is_superseded() {
    let mut search = MessageSearch::default();
    let (tx, mut rx) = mpsc::unbounded_channel::<(Generation, Vec<MessageRecord>)>();

    search.set_physician_id("101");
    let first = search.search().unwrap();
    search.set_physician_id("102");
    let second = search.search().unwrap();

    for (generation, delay_ms, ids) in [
        (first.generation(), 500_u64, vec![1_i64, 2]),
        (second.generation(), 50, vec![7]),
    ] {
        let tx = tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            let _ = tx.send((generation, ids.into_iter().map(record).collect()));
        });
    }
    drop(tx);

    let mut applied = Vec::new();
    while let Some((generation, messages)) = rx.recv().await {
        applied.push(search.apply_results(generation, Ok(messages)));
    }
    assert_eq!(applied, vec![true, false]);
    assert_eq!(search.phase(), &SearchPhase::Results);
    assert_eq!(search.messages().len(), 1);
    assert_eq!(search.messages()[0].message_id, MessageId(7));
    assert_eq!(
        search.summary().as_deref(),
        Some("Results for: Physician ID 102 Messages")
    );
}

#[tokio::test(start_paused = true)]
async fn classification_from_replaced_results_is_dropped() {
    let mut search = loaded(&[1]);
    let ticket = search.classify(MessageId(1)).unwrap();

    let pending = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(250)).await;
        (ticket, Ok::<_, String>(response(1, 0)))
    });

    // A new search replaces the result set before the classification lands.
    let next = search.search().unwrap();
    search.apply_results(next.generation(), Ok(vec![record(1)]));

    let (ticket, result) = pending.await.unwrap();
    assert!(!search.apply_classification(ticket, result));
    assert_eq!(
        search.classification_status(MessageId(1)),
        &ClassificationStatus::NotStarted
    );
}

#[test]
fn physician_selection_flows_into_message_search() {
    let mut directory = DirectorySearch::new();
    let mut messages = MessageSearch::new(MessageFilter::default());
    let mut bridge = SelectionBridge::new();

    directory.set_state("NY");
    let ticket = directory.search();
    directory.apply_results(
        ticket.generation(),
        Ok(vec![Physician {
            physician_id: PhysicianId(101),
            npi: "1003000126".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            specialty: "Oncology".into(),
            state: "NY".into(),
            consent_opt_in: true,
            preferred_channel: "email".into(),
        }]),
    );

    directory.select(PhysicianId(101));
    assert!(bridge.propagate(directory.selected(), &mut messages));
    assert!(!bridge.propagate(directory.selected(), &mut messages));

    let ticket = messages.search().unwrap();
    assert_eq!(ticket.query().to_query_string(), "physician_id=101");
}
