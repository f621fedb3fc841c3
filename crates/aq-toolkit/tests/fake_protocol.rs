use aq_core::StatusCode;
use aq_toolkit::fakes::{CallKind, ScriptedToolkit};
use aq_toolkit::{DemandModel, Project, Toolkit};

fn scratch_input(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let inp = dir.path().join("net.inp");
    std::fs::write(&inp, "[TITLE]\n[END]\n").unwrap();
    inp
}

#[test]
fn saved_hydraulics_can_be_reused() {
    let dir = tempfile::tempdir().unwrap();
    let inp = scratch_input(&dir);
    let rpt = dir.path().join("net.rpt");
    let out = dir.path().join("net.bin");
    let hyd = dir.path().join("net.hyd");

    let toolkit = ScriptedToolkit::new().with_output_artifact(vec![1, 2, 3]);

    let mut first = toolkit.create_project().unwrap();
    assert_eq!(first.open(&inp, &rpt, &out), StatusCode::OK);
    assert_eq!(
        first.set_demand_model(&DemandModel::pressure_driven(17.75, 21.96)),
        StatusCode::OK
    );
    assert_eq!(first.solve_hydraulics(), StatusCode::OK);
    assert_eq!(first.save_hydraulics_file(&hyd), StatusCode::OK);
    assert_eq!(first.solve_quality(), StatusCode::OK);
    assert_eq!(first.close(), StatusCode::OK);
    assert!(hyd.exists());
    assert_eq!(std::fs::read(&out).unwrap(), vec![1, 2, 3]);

    let mut second = toolkit.create_project().unwrap();
    assert_eq!(second.open(&inp, &rpt, &out), StatusCode::OK);
    assert_eq!(second.use_hydraulics_file(&hyd), StatusCode::OK);
    assert_eq!(second.solve_quality(), StatusCode::OK);
    assert_eq!(second.close(), StatusCode::OK);

    assert_eq!(toolkit.count(CallKind::Close), 2);
}

#[test]
fn quality_without_hydraulics_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let inp = scratch_input(&dir);
    let out = dir.path().join("net.bin");

    let toolkit = ScriptedToolkit::new();
    let mut project = toolkit.create_project().unwrap();
    assert_eq!(project.open(&inp, &inp, &out), StatusCode::OK);
    let code = project.solve_quality();
    assert_eq!(code, StatusCode(104));
    assert!(code.is_fatal());
}

#[test]
fn foreign_hydraulics_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let inp = scratch_input(&dir);
    let out = dir.path().join("net.bin");
    let hyd = dir.path().join("other.hyd");
    std::fs::write(&hyd, b"not a hydraulics file").unwrap();

    let toolkit = ScriptedToolkit::new();
    let mut project = toolkit.create_project().unwrap();
    project.open(&inp, &inp, &out);
    assert_eq!(project.use_hydraulics_file(&hyd), StatusCode(306));
    assert_eq!(
        project.use_hydraulics_file(&dir.path().join("missing.hyd")),
        StatusCode(305)
    );
}

#[test]
fn missing_input_fails_open() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.inp");
    let toolkit = ScriptedToolkit::new();
    let mut project = toolkit.create_project().unwrap();
    assert_eq!(project.open(&missing, &missing, &missing), StatusCode(302));
    // Project never opened, so later stages have no network.
    assert_eq!(project.solve_hydraulics(), StatusCode(102));
}
