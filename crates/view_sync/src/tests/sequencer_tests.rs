use super::*;
use crate::testing::{FakeEntity, FakeScene, RecordingViews, ViewCall};
use shared::domain::SliceViewName;

fn id(value: &str) -> EntityId {
    EntityId::from(value)
}

#[test]
fn existing_volume_becomes_background_before_attach() {
    let mut scene = FakeScene::default();
    scene.add(FakeEntity::volume("X"));
    let mut reactor = SceneReactor::new(RecordingViews::default());

    let report = InitializationSequencer::default()
        .run(&scene, &mut reactor)
        .expect("startup");

    assert_eq!(report.startup_volume, Some(Reaction::Background(id("X"))));
    assert!(report.layout_applied);
    assert_eq!(report.replaced_layout, Some(ViewLayout::Initial));
    assert_eq!(reactor.registry().backend().camera_resets(), 1);
    assert_eq!(reactor.registry().backend().layout, ViewLayout::FourUp);

    reactor.attach(&mut scene);
    scene.add(FakeEntity::volume("Y"));
    assert_eq!(
        reactor.process_pending(&mut scene),
        vec![Reaction::Foreground(id("Y"))]
    );
    assert_eq!(reactor.ledger().background(), Some(&id("X")));
    assert_eq!(reactor.registry().backend().camera_resets(), 1);
}

#[test]
fn empty_scene_only_enables_planes_and_layout() {
    let scene = FakeScene::default();
    let mut views = RecordingViews::default();
    views.extra_scene_views.push(SliceViewName::from("Compare1"));
    let mut reactor = SceneReactor::new(views);

    let report = InitializationSequencer::default()
        .run(&scene, &mut reactor)
        .expect("startup");

    assert!(report.startup_volume.is_none());
    assert_eq!(report.planes.applied.len(), 4);
    assert_eq!(reactor.registry().backend().camera_resets(), 0);
    assert_eq!(
        reactor.registry().backend().calls.last(),
        Some(&ViewCall::Layout(ViewLayout::FourUp))
    );
    assert!(reactor.ledger().is_empty());
}

#[test]
fn scalar_volume_is_preferred_over_earlier_generic_volume() {
    let mut scene = FakeScene::default();
    scene.add(FakeEntity::new("vector", &[Capability::Volume]));
    scene.add(FakeEntity::volume("ct"));
    let mut reactor = SceneReactor::new(RecordingViews::default());

    let report = InitializationSequencer::default()
        .run(&scene, &mut reactor)
        .expect("startup");

    assert_eq!(report.startup_volume, Some(Reaction::Background(id("ct"))));
}

#[test]
fn generic_volume_is_used_when_no_scalar_exists() {
    let mut scene = FakeScene::default();
    scene.add(FakeEntity::markup("F"));
    scene.add(FakeEntity::new("vector", &[Capability::Volume]));
    let mut reactor = SceneReactor::new(RecordingViews::default());

    let report = InitializationSequencer::new(ViewLayout::Conventional)
        .run(&scene, &mut reactor)
        .expect("startup");

    assert_eq!(
        report.startup_volume,
        Some(Reaction::Background(id("vector")))
    );
    assert_eq!(reactor.registry().backend().layout, ViewLayout::Conventional);
}

#[test]
fn refuses_to_run_once_attached() {
    let mut scene = FakeScene::default();
    let mut reactor = SceneReactor::new(RecordingViews::default());
    reactor.attach(&mut scene);

    let err = InitializationSequencer::default()
        .run(&scene, &mut reactor)
        .expect_err("attached");
    assert_eq!(err, StartupError::AlreadyAttached);
    assert!(reactor.registry().backend().calls.is_empty());
}
