//! End to end tests of the follower's tick loop.

use comms_if::{
    eqpt::{ActuatorDems, PlatformSensData},
    msg::{CommandMsg, InboundMsg, LeaderMsg},
};
use follower_lib::{
    follower_ctrl::{FollowerCtrl, FollowerMode, InitData, Params},
    persist::{FileBacking, DEFAULT_CONFIG},
    target_est::TickRate,
};
use nalgebra::{Isometry3, Point3, Vector3};
use std::path::PathBuf;
use util::module::State;

// ---- HELPERS ----

fn sens() -> PlatformSensData {
    PlatformSensData {
        position_m: Vector3::new(0.0, 0.0, 0.0),
        gravity_ms2: Vector3::new(0.0, -9.81, 0.0),
        under_control: false,
    }
}

fn leader_pose() -> Isometry3<f64> {
    Isometry3::new(Vector3::new(250.0, 12.0, -40.0), Vector3::new(0.0, 0.4, 0.0))
}

fn storage_dir(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("follower_tick_loop_{}_{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&path);
    std::fs::create_dir_all(&path).unwrap();
    path
}

fn ctrl_with_files(dir: &PathBuf, params: Params) -> FollowerCtrl {
    let mut ctrl = FollowerCtrl::default();
    ctrl.init(InitData {
        params,
        volatile_backing: Box::new(FileBacking::new(dir.join("volatile.txt"))),
        config_backing: Box::new(FileBacking::new(dir.join("configs.txt"))),
    })
    .unwrap();
    ctrl
}

fn target(out: Option<ActuatorDems>) -> Vector3<f64> {
    match out {
        Some(ActuatorDems::Update { target_m }) => target_m,
        o => panic!("Expected an update demand, got {:?}", o),
    }
}

// ---- TESTS ----

#[test]
fn extrapolates_stale_leader() {
    let dir = storage_dir("extrapolate");
    let mut ctrl = ctrl_with_files(&dir, Params::default());

    // Run 40 ticks without a leader
    for _ in 0..40 {
        assert_eq!(ctrl.proc(&sens()).unwrap().0, None);
    }
    assert_eq!(ctrl.mode(), FollowerMode::Idle);

    let velocity_ms = Vector3::new(3.0, 0.0, -1.5);
    let msg = LeaderMsg {
        pose: leader_pose(),
        velocity_ms,
        source_id: None,
    };
    ctrl.on_messages(Some(&msg), None, None).unwrap();
    assert_eq!(ctrl.state().leader.updated(), 40);

    // Ten ticks later, with no fresh message
    for _ in 0..10 {
        ctrl.proc(&sens()).unwrap();
    }
    assert_eq!(ctrl.state().runtime, 50);

    let offset_m = Vector3::new(50.0, 0.0, 0.0);
    let expected = leader_pose().transform_point(&Point3::from(offset_m)).coords
        + velocity_ms * (10.0 * (1.0 / 60.0));

    let target_m = target(ctrl.proc(&sens()).unwrap().0);
    assert!((target_m - expected).norm() < 1e-9);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn state_survives_restart() {
    let dir = storage_dir("restart");

    {
        let mut ctrl = ctrl_with_files(&dir, Params::default());
        ctrl.on_direct_cmd("setoffset;-20;0;15", None).unwrap();
        ctrl.on_direct_cmd("save;left", None).unwrap();
        ctrl.on_direct_cmd("setoffset;20;0;15", None).unwrap();
        ctrl.on_direct_cmd("save;right", None).unwrap();
        ctrl.on_direct_cmd("load;left", None).unwrap();
        ctrl.on_direct_cmd("stop", None).unwrap();
    }

    let ctrl = ctrl_with_files(&dir, Params::default());
    let state = ctrl.state();

    assert!(state.disabled);
    assert_eq!(ctrl.scheduled(), None);
    assert_eq!(state.active_config, "left");
    assert_eq!(state.offset_m, Vector3::new(-20.0, 0.0, 15.0));
    assert_eq!(state.configs.get("right"), Some(Vector3::new(20.0, 0.0, 15.0)));
    assert_eq!(state.configs.get(DEFAULT_CONFIG), Some(Vector3::new(50.0, 0.0, 0.0)));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn corrupt_volatile_reverts() {
    let dir = storage_dir("corrupt");
    std::fs::write(dir.join("volatile.txt"), "1;left;-20;oops;15").unwrap();
    std::fs::write(dir.join("configs.txt"), "default 50 0 0\nleft -20 0 15\n").unwrap();

    let ctrl = ctrl_with_files(&dir, Params::default());

    assert!(!ctrl.state().disabled);
    assert_eq!(ctrl.state().active_config, DEFAULT_CONFIG);
    assert!(!ctrl.state().configs.contains("left"));
    assert_eq!(
        std::fs::read_to_string(dir.join("volatile.txt")).unwrap(),
        "0;default;50;0;0"
    );
    assert_eq!(
        std::fs::read_to_string(dir.join("configs.txt")).unwrap(),
        "default 50 0 0\n"
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn starthere_holds_position() {
    let dir = storage_dir("starthere");
    let params = Params {
        tick_rate: TickRate::Update10,
        ..Params::default()
    };
    let mut ctrl = ctrl_with_files(&dir, params);

    // Decode the leader message as it would arrive off the wire
    let wire = InboundMsg::from(LeaderMsg {
        pose: leader_pose(),
        velocity_ms: Vector3::zeros(),
        source_id: Some(99),
    })
    .to_json()
    .unwrap();
    let leader = InboundMsg::from_json(&wire).unwrap().leader().unwrap();

    let position_m = Vector3::new(230.0, 12.0, -10.0);
    let cmd = CommandMsg {
        addressees: String::new(),
        cmd: String::from("starthere"),
    };
    ctrl.on_messages(Some(&leader), Some(&cmd), Some(&position_m))
        .unwrap();

    let mut input = sens();
    input.position_m = position_m;
    let target_m = target(ctrl.proc(&input).unwrap().0);

    assert!((target_m - position_m).norm() < 1e-9);
    assert_eq!(ctrl.scheduled(), Some(TickRate::Update10));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn self_echo_forgets_leader() {
    let dir = storage_dir("echo");
    let params = Params {
        entity_id: 1234,
        ..Params::default()
    };
    let mut ctrl = ctrl_with_files(&dir, params);

    let mut msg = LeaderMsg {
        pose: leader_pose(),
        velocity_ms: Vector3::zeros(),
        source_id: Some(77),
    };
    ctrl.on_messages(Some(&msg), None, None).unwrap();
    assert!(ctrl.proc(&sens()).unwrap().0.is_some());

    msg.source_id = Some(1234);
    ctrl.on_messages(Some(&msg), None, None).unwrap();

    let (out, report) = ctrl.proc(&sens()).unwrap();
    assert_eq!(out, None);
    assert!(!report.leader_known);
    assert_eq!(ctrl.mode(), FollowerMode::Idle);

    let _ = std::fs::remove_dir_all(&dir);
}
