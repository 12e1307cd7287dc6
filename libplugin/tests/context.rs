use libplugin::builtin::{Flipper, Uppercaser};
use libplugin::{
    PluginContext, PluginError, Transform, TransformError, WorkHook, END_OF_STREAM,
};
use std::borrow::Cow;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

fn queue_size(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

fn recording_hook(store: &Arc<Mutex<Vec<String>>>) -> WorkHook {
    let store = Arc::clone(store);
    Arc::new(move |item: &str| {
        store.lock().unwrap().push(item.to_owned());
        Ok(())
    })
}

#[test]
fn empty_name_is_rejected() {
    let err = PluginContext::new("", Arc::new(Uppercaser)).unwrap_err();
    assert!(matches!(err, PluginError::InvalidName));
}

#[test]
fn operations_require_init() {
    let plugin = PluginContext::new("uppercaser", Arc::new(Uppercaser)).unwrap();

    assert!(matches!(
        plugin.place_work("x").unwrap_err(),
        PluginError::NotInitialized
    ));
    assert!(matches!(
        plugin.wait_finished().unwrap_err(),
        PluginError::NotInitialized
    ));
    assert!(matches!(
        plugin.attach(recording_hook(&Arc::default())).unwrap_err(),
        PluginError::NotInitialized
    ));
    assert!(matches!(
        plugin.fini().unwrap_err(),
        PluginError::NotInitialized
    ));
}

#[test]
fn double_init_is_rejected() {
    let plugin = PluginContext::new("uppercaser", Arc::new(Uppercaser)).unwrap();
    plugin.init(queue_size(4)).unwrap();

    assert!(matches!(
        plugin.init(queue_size(4)).unwrap_err(),
        PluginError::AlreadyInitialized
    ));

    plugin.fini().unwrap();
}

#[test]
fn transforms_and_forwards_in_order() {
    let received = Arc::new(Mutex::new(Vec::new()));
    let plugin = PluginContext::new("uppercaser", Arc::new(Uppercaser)).unwrap();
    plugin.init(queue_size(4)).unwrap();
    plugin.attach(recording_hook(&received)).unwrap();

    plugin.place_work("abc").unwrap();
    plugin.place_work("def").unwrap();
    plugin.place_work(END_OF_STREAM).unwrap();
    plugin.wait_finished().unwrap();

    assert_eq!(*received.lock().unwrap(), ["ABC", "DEF", END_OF_STREAM]);
    plugin.fini().unwrap();
}

#[test]
fn sentinel_forwarded_exactly_once_and_closes_the_queue() {
    let received = Arc::new(Mutex::new(Vec::new()));
    let plugin = PluginContext::new("flipper", Arc::new(Flipper)).unwrap();
    plugin.init(queue_size(4)).unwrap();
    plugin.attach(recording_hook(&received)).unwrap();

    plugin.place_work(END_OF_STREAM).unwrap();
    plugin.wait_finished().unwrap();

    // The stage has seen the sentinel; its queue no longer accepts work.
    assert!(matches!(
        plugin.place_work("late").unwrap_err(),
        PluginError::QueueClosed
    ));
    assert!(matches!(
        plugin.place_work(END_OF_STREAM).unwrap_err(),
        PluginError::QueueClosed
    ));

    let ends = received
        .lock()
        .unwrap()
        .iter()
        .filter(|s| *s == END_OF_STREAM)
        .count();
    assert_eq!(ends, 1);

    plugin.fini().unwrap();
}

#[test]
fn second_attach_keeps_existing_wiring() {
    let first = Arc::new(Mutex::new(Vec::new()));
    let second = Arc::new(Mutex::new(Vec::new()));

    let plugin = PluginContext::new("uppercaser", Arc::new(Uppercaser)).unwrap();
    plugin.init(queue_size(4)).unwrap();
    plugin.attach(recording_hook(&first)).unwrap();
    plugin.attach(recording_hook(&second)).unwrap();

    plugin.place_work("abc").unwrap();
    plugin.place_work(END_OF_STREAM).unwrap();
    plugin.wait_finished().unwrap();

    assert_eq!(*first.lock().unwrap(), ["ABC", END_OF_STREAM]);
    assert!(second.lock().unwrap().is_empty());

    plugin.fini().unwrap();
}

#[test]
fn attach_after_finish_is_ignored() {
    let plugin = PluginContext::new("uppercaser", Arc::new(Uppercaser)).unwrap();
    plugin.init(queue_size(4)).unwrap();

    plugin.place_work(END_OF_STREAM).unwrap();
    plugin.wait_finished().unwrap();

    // Logged, non-fatal, and the late hook never receives anything.
    let late = Arc::new(Mutex::new(Vec::new()));
    plugin.attach(recording_hook(&late)).unwrap();
    assert!(late.lock().unwrap().is_empty());

    plugin.fini().unwrap();
}

#[test]
fn fini_without_sentinel_drains_and_joins() {
    let plugin = PluginContext::new("uppercaser", Arc::new(Uppercaser)).unwrap();
    plugin.init(queue_size(4)).unwrap();
    plugin.place_work("abc").unwrap();

    // No sentinel: fini closes the queue; the consumer drains and exits.
    plugin.fini().unwrap();
}

#[test]
fn reinit_after_fini() {
    let received = Arc::new(Mutex::new(Vec::new()));
    let plugin = PluginContext::new("uppercaser", Arc::new(Uppercaser)).unwrap();

    plugin.init(queue_size(2)).unwrap();
    plugin.place_work(END_OF_STREAM).unwrap();
    plugin.wait_finished().unwrap();
    plugin.fini().unwrap();

    // A finalized context starts a fresh lifetime.
    plugin.init(queue_size(2)).unwrap();
    plugin.attach(recording_hook(&received)).unwrap();
    plugin.place_work("again").unwrap();
    plugin.place_work(END_OF_STREAM).unwrap();
    plugin.wait_finished().unwrap();
    plugin.fini().unwrap();

    assert_eq!(*received.lock().unwrap(), ["AGAIN", END_OF_STREAM]);
}

#[test]
fn two_stage_chain() {
    let received = Arc::new(Mutex::new(Vec::new()));

    let upper = Arc::new(PluginContext::new("uppercaser", Arc::new(Uppercaser)).unwrap());
    let flip = Arc::new(PluginContext::new("flipper", Arc::new(Flipper)).unwrap());
    upper.init(queue_size(4)).unwrap();
    flip.init(queue_size(4)).unwrap();

    let downstream = Arc::clone(&flip);
    let hook: WorkHook = Arc::new(move |item: &str| downstream.place_work(item));
    upper.attach(hook).unwrap();
    flip.attach(recording_hook(&received)).unwrap();

    upper.place_work("abc").unwrap();
    upper.place_work(END_OF_STREAM).unwrap();

    upper.wait_finished().unwrap();
    flip.wait_finished().unwrap();

    assert_eq!(*received.lock().unwrap(), ["CBA", END_OF_STREAM]);

    upper.fini().unwrap();
    flip.fini().unwrap();
}

struct Failing;

impl Transform for Failing {
    fn apply<'a>(&self, _input: &'a str) -> Result<Cow<'a, str>, TransformError> {
        Err(TransformError::new("transform failed"))
    }
}

// One failing item must not poison the stage: later items still flow.
#[test]
fn transform_failure_skips_the_item_only() {
    let received = Arc::new(Mutex::new(Vec::new()));
    let plugin = PluginContext::new("failing", Arc::new(Failing)).unwrap();
    plugin.init(queue_size(4)).unwrap();
    plugin.attach(recording_hook(&received)).unwrap();

    plugin.place_work("dropped").unwrap();
    plugin.place_work(END_OF_STREAM).unwrap();
    plugin.wait_finished().unwrap();

    assert_eq!(*received.lock().unwrap(), [END_OF_STREAM]);
    plugin.fini().unwrap();
}
