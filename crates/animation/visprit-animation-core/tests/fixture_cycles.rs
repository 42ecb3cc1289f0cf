use visprit_animation_core::{
    ActionPhase, AnimationConfig, ElementSnapshot, ScrollSample, Stage, TriggerKind, Viewport,
};
use visprit_test_fixtures::configs;

const VIEW: Viewport = Viewport {
    width: 1024.0,
    height: 768.0,
};

const NONE: [ElementSnapshot; 0] = [];

fn fixture(name: &str) -> AnimationConfig {
    configs::load(name).unwrap_or_else(|e| panic!("fixture {name}: {e:#}"))
}

fn stage_with(name: &str) -> (Stage, visprit_animation_core::ElementId) {
    let kind = configs::trigger(name)
        .unwrap()
        .and_then(|k| TriggerKind::parse(&k))
        .expect("fixture names its trigger");
    let mut stage = Stage::new();
    let id = stage.add_element();
    stage.attach(id, kind, fixture(name)).unwrap();
    (stage, id)
}

fn sample(scroll_y: f64, previous_scroll_y: f64, viewport: Viewport) -> ScrollSample {
    ScrollSample {
        scroll_y,
        previous_scroll_y,
        viewport,
    }
}

#[test]
fn every_tagged_fixture_attaches() {
    for name in configs::keys() {
        let Some(kind) = configs::trigger(&name).unwrap() else {
            continue;
        };
        let mut stage = Stage::new();
        let id = stage.add_element();
        let kind = TriggerKind::parse(&kind).unwrap();
        stage
            .attach(id, kind, fixture(&name))
            .unwrap_or_else(|e| panic!("{name}: {e}"));
    }
}

/// it should fade early and slide up from below once peeked
#[test]
fn glance_fade_up() {
    let (mut stage, id) = stage_with("glance-fade-up");
    // 16% of the element hangs below the fold; the fixture needs 20%.
    let el = ElementSnapshot::at(600.0, 200.0);
    let cycle = stage.glance(id, &el, &NONE, VIEW).unwrap().unwrap();

    assert_eq!(cycle.playbacks.len(), 2);
    let fade = &cycle.playbacks[0];
    assert_eq!(fade.timing.duration, 400.0);
    assert_eq!(fade.keyframes[0].opacity, Some(0.0));

    let tread = &cycle.playbacks[1];
    assert_eq!(tread.keyframes[0].transform.as_deref(), Some("translateY(-40px)"));
    assert_eq!(tread.keyframes[0].opacity, Some(0.0));
    assert_eq!(tread.keyframes[1].transform.as_deref(), Some("translateY(0px)"));
    assert_eq!(tread.keyframes[1].opacity, Some(1.0));
    assert_eq!(tread.timing.delay, Some(100.0));
    assert_eq!(tread.timing.easing, "cubic-bezier(0.33, 1, 0.68, 1)");
    assert_eq!(cycle.duration, 800.0);

    stage.finish(id, TriggerKind::Glance).unwrap();
    assert!(stage.glance(id, &el, &NONE, VIEW).unwrap().is_none());
}

#[test]
fn glance_cascade_oscillates_odd_targets() {
    let (mut stage, id) = stage_with("glance-cascade-oscillate");
    let el = ElementSnapshot::at(100.0, 300.0);
    let targets = vec![ElementSnapshot::at(100.0, 50.0); 3];
    let cycle = stage.glance(id, &el, &targets, VIEW).unwrap().unwrap();

    let first = &cycle.playbacks[0].keyframes[0];
    let second = &cycle.playbacks[1].keyframes[0];
    assert_eq!(first.transform.as_deref(), Some("translateX(30px)"));
    assert_eq!(first.clip_path.as_deref(), Some("inset(0% 0% 0% 60%)"));
    assert_eq!(second.transform.as_deref(), Some("translateX(-30px)"));
    assert_eq!(second.clip_path.as_deref(), Some("inset(0% 60% 0% 0%)"));
    assert_eq!(cycle.playbacks[2].timing.delay, Some(260.0));
    assert_eq!(cycle.duration, 500.0);
}

#[test]
fn glance_counter_ticks_to_end() {
    let (mut stage, id) = stage_with("glance-counter");
    let mut el = ElementSnapshot::at(100.0, 40.0);
    el.text = Some("12,500+".into());
    el.tag = Some("h3".into());
    let cycle = stage.glance(id, &el, &NONE, VIEW).unwrap().unwrap();

    assert!(cycle.playbacks.is_empty());
    assert_eq!(cycle.duration, 1500.0);
    let mut counter = cycle.counters[0].counter.clone();
    assert_eq!(counter.delay, Some(200.0));
    assert_eq!(counter.tick(1000.0).text, "0+");
    assert_eq!(counter.tick(1750.0).text, "6,250+");
    let end = counter.tick(2600.0);
    assert_eq!(end.text, "12,500+");
    assert!(end.done);
}

#[test]
fn glance_elastic_zoom_settles_on_rest() {
    let (mut stage, id) = stage_with("glance-elastic-zoom");
    let el = ElementSnapshot::at(0.0, 100.0);
    let cycle = stage.glance(id, &el, &NONE, VIEW).unwrap().unwrap();

    assert_eq!(cycle.playbacks.len(), 1);
    let frames = &cycle.playbacks[0].keyframes;
    assert_eq!(frames[0].transform.as_deref(), Some("rotate(8deg) scale(1.25)"));
    assert_eq!(
        frames.last().and_then(|s| s.transform.as_deref()),
        Some("rotate(0deg) scale(1)")
    );
    assert_eq!(cycle.playbacks[0].timing.easing, "linear");
    assert!(cycle.duration >= 600.0);
    assert_eq!(cycle.duration, cycle.playbacks[0].timing.duration);
}

/// it should follow the crank and clamp at rest past the origin
#[test]
fn scroll_parallax_dampers_below_rest() {
    let (mut stage, id) = stage_with("scroll-parallax");
    let el = ElementSnapshot::at(600.0, 100.0);
    let cycle = stage
        .scroll(id, &el, &NONE, sample(0.0, 0.0, VIEW))
        .unwrap()
        .unwrap();
    assert_eq!(
        cycle.playbacks[0].keyframes[0].transform.as_deref(),
        Some("translateY(150px)")
    );
    assert_eq!(cycle.playbacks[0].timing.delay, None);
    assert_eq!(cycle.kind, TriggerKind::Scroll);

    // Distance was measured on the first sample; only the offset moves now.
    let visible = ElementSnapshot::at(100.0, 100.0);
    let cycle = stage
        .scroll(id, &visible, &NONE, sample(1000.0, 0.0, VIEW))
        .unwrap()
        .unwrap();
    assert_eq!(
        cycle.playbacks[0].keyframes[0].transform.as_deref(),
        Some("translateY(0px)")
    );

    let narrow = Viewport {
        width: 600.0,
        height: 768.0,
    };
    assert!(stage
        .scroll(id, &visible, &NONE, sample(1000.0, 990.0, narrow))
        .unwrap()
        .is_none());
    assert!(!stage.is_busy(id).unwrap());
}

#[test]
fn scroll_reveal_waits_for_activation() {
    let (mut stage, id) = stage_with("scroll-reveal-clip");
    // Origin line at 30% of 768px; the element starts below it.
    let el = ElementSnapshot::at(500.0, 100.0);
    assert!(stage
        .scroll(id, &el, &NONE, sample(0.0, 0.0, VIEW))
        .unwrap()
        .is_none());
    assert!(stage
        .scroll(id, &el, &NONE, sample(100.0, 0.0, VIEW))
        .unwrap()
        .is_none());
    let cycle = stage
        .scroll(id, &el, &NONE, sample(400.0, 100.0, VIEW))
        .unwrap()
        .unwrap();
    assert!(cycle.playbacks[0].keyframes[0]
        .clip_path
        .as_deref()
        .is_some_and(|c| c.starts_with("inset(")));
}

#[test]
fn action_hover_tilt_round_trip() {
    let (mut stage, id) = stage_with("action-hover-tilt");
    let events = stage.action_events(id).unwrap();
    assert_eq!(events.enter, "mouseenter");
    assert_eq!(events.exit, Some("mouseleave"));

    let el = ElementSnapshot::at(0.0, 100.0);
    let cycle = stage.action(id, ActionPhase::In, &el, &NONE).unwrap().unwrap();
    let tilt = cycle.playbacks[0].keyframes[0].transform.clone().unwrap();
    assert!(tilt.starts_with("rotateY(-12deg) scale("), "{tilt}");
    assert_eq!(cycle.duration, 250.0);
    assert!(cycle.follow_up.is_none());
    stage.finish(id, TriggerKind::Action).unwrap();

    let cycle = stage.action(id, ActionPhase::Out, &el, &NONE).unwrap().unwrap();
    let back = &cycle.playbacks[0];
    assert_eq!(back.keyframes[0].transform.as_deref(), Some("rotateY(0deg) scale(1)"));
    assert_eq!(back.timing.duration, 400.0);
    assert_eq!(back.timing.easing, "cubic-bezier(0.34, 1.56, 0.64, 1)");
}

#[test]
fn action_click_toggles_elastic() {
    let (mut stage, id) = stage_with("action-click-toggle");
    assert_eq!(stage.action_events(id).unwrap().enter, "mousedown");
    assert_eq!(stage.action_events(id).unwrap().exit, None);

    let rest = ElementSnapshot::at(0.0, 60.0);
    let cycle = stage.action(id, ActionPhase::In, &rest, &NONE).unwrap().unwrap();
    let frames = &cycle.playbacks[0].keyframes;
    assert_eq!(frames[0].transform.as_deref(), Some("translateY(0px)"));
    assert_eq!(
        frames.last().and_then(|s| s.transform.as_deref()),
        Some("translateY(10px)")
    );
    stage.finish(id, TriggerKind::Action).unwrap();

    let mut pressed = rest.clone();
    pressed.transform = Some("matrix(1, 0, 0, 1, 0, 10)".into());
    let cycle = stage.action(id, ActionPhase::In, &pressed, &NONE).unwrap().unwrap();
    let frames = &cycle.playbacks[0].keyframes;
    assert_eq!(frames[0].transform.as_deref(), Some("translateY(10px)"));
    assert_eq!(
        frames.last().and_then(|s| s.transform.as_deref()),
        Some("translateY(0px)")
    );
}

#[test]
fn compact_attribute_fixture_parses() {
    let text = configs::strx("plain-attribute").unwrap();
    let config = AnimationConfig::from_strx(&text);
    assert_eq!(config.to_strx(), text);

    let mut stage = Stage::new();
    let id = stage.add_element();
    stage.attach(id, TriggerKind::Glance, config).unwrap();
    let targets = vec![ElementSnapshot::at(10.0, 10.0); 2];
    let cycle = stage
        .glance(id, &ElementSnapshot::at(10.0, 30.0), &targets, VIEW)
        .unwrap()
        .unwrap();
    let first = &cycle.playbacks[0];
    assert_eq!(first.keyframes[0].transform.as_deref(), Some("translateX(-24px)"));
    // A zero delay is not spread across targets.
    assert_eq!(cycle.playbacks[1].timing.delay, Some(0.0));
    assert_eq!(first.timing.easing, "cubic-bezier(0.5, 1, 0.89, 1)");
}
