#[path = "common.rs"]
mod common;

use thermoq::core::queue::MessageQueue;
use thermoq::QueueManager;

#[test]
fn dequeue_on_fresh_queue_is_none() {
    common::init_logging();

    let mut mgr = QueueManager::new();
    assert!(mgr.is_empty());
    assert!(mgr.dequeue().is_none());
    assert!(mgr.is_empty());
}

#[test]
fn twelve_messages_into_ten_slots() {
    common::init_logging();

    let mut mgr = QueueManager::with_capacity(10);
    for i in 0..12 {
        mgr.enqueue(&format!("home/living/hvac/t/sensor/n{i}"), &format!("payload-{i}"));
    }
    assert!(mgr.capacity() > 10);
    assert_eq!(mgr.len(), 12);

    for i in 0..12 {
        let msg = mgr.dequeue().expect("message lost during growth");
        assert_eq!(msg.topic(), format!("home/living/hvac/t/sensor/n{i}"));
        assert_eq!(msg.payload(), format!("payload-{i}"));
    }
    assert!(mgr.is_empty());
}

#[test]
fn is_empty_tracks_live_messages() {
    let mut mgr = QueueManager::with_capacity(3);
    assert!(mgr.is_empty());

    mgr.enqueue("t", "1");
    mgr.enqueue("t", "2");
    assert!(!mgr.is_empty());

    mgr.dequeue();
    assert!(!mgr.is_empty());
    mgr.dequeue();
    assert!(mgr.is_empty());

    mgr.enqueue("t", "3");
    assert!(!mgr.is_empty());
}

#[test]
fn interleaved_traffic_stays_fifo_across_growth() {
    let mut q = MessageQueue::with_capacity(2);
    let mut expected = std::collections::VecDeque::new();
    let mut next = 0u32;

    // Enqueue three, dequeue one, repeatedly, so the window keeps wrapping
    // while the buffer grows underneath it.
    for _ in 0..40 {
        for _ in 0..3 {
            q.enqueue("t", &next.to_string());
            expected.push_back(next.to_string());
            next += 1;
        }
        let got = q.dequeue().unwrap();
        assert_eq!(Some(got.payload().to_string()), expected.pop_front());
        assert_eq!(q.len(), expected.len());
    }

    while let Some(msg) = q.dequeue() {
        assert_eq!(Some(msg.payload().to_string()), expected.pop_front());
    }
    assert!(expected.is_empty());
    assert!(q.capacity().is_power_of_two());
}

#[test]
fn caller_buffers_can_be_reused_after_enqueue() {
    let mut mgr = QueueManager::new();
    let mut topic = String::from("first/topic");
    let mut payload = String::from("first");
    mgr.enqueue(&topic, &payload);

    topic.clear();
    topic.push_str("second/topic");
    payload.clear();
    payload.push_str("second");
    mgr.enqueue(&topic, &payload);
    drop(topic);
    drop(payload);

    let a = mgr.dequeue().unwrap();
    let b = mgr.dequeue().unwrap();
    assert_eq!((a.topic(), a.payload()), ("first/topic", "first"));
    assert_eq!((b.topic(), b.payload()), ("second/topic", "second"));
}
