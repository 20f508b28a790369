use super::*;
use crate::compile::painter::compile_frame;
use crate::scene::model::SceneState;

#[test]
fn records_one_call_per_op() {
    let mut state = SceneState::new(7, 0.0);
    let tick = state.advance(16.0);
    let plan = compile_frame(&state, tick, 1.0);

    let mut backend = RecordingBackend::new(SurfaceDesc::scene(1.0)).unwrap();
    backend.render_plan(&plan).unwrap();

    assert_eq!(backend.frames(), 1);
    assert_eq!(backend.draw_count(), plan.ops.len());
    assert_eq!(backend.calls().first(), Some(&SurfaceCall::Clear));
    assert_eq!(backend.calls().last(), Some(&SurfaceCall::Finish));
}

#[test]
fn readback_is_transparent_and_sized() {
    let mut backend = RecordingBackend::new(SurfaceDesc::scene(0.5)).unwrap();
    let frame = backend.readback_rgba8().unwrap();
    assert_eq!((frame.width, frame.height), (480, 270));
    assert!(frame.data.iter().all(|&b| b == 0));
}

#[test]
fn draw_classification() {
    assert!(!SurfaceCall::Clear.is_draw());
    assert!(!SurfaceCall::Finish.is_draw());
    assert!(SurfaceCall::StrokePath(Layer::Road).is_draw());
}
