//! Property tests for persistence and the command processor.

use follower_lib::{
    cmd_processor::{self, Cmd},
    data_store::FollowerState,
    follower_ctrl::{FollowerCtrl, InitData, Params},
    persist::{self, ConfigStore, MemBacking, VolatileState},
};
use nalgebra::Vector3;
use proptest::prelude::*;
use util::module::State;

// ---- STRATEGIES ----

fn arb_coord() -> impl Strategy<Value = f64> {
    prop_oneof![
        -1.0e6..1.0e6f64,
        (-1000i32..1000).prop_map(f64::from),
        Just(0.0),
        Just(-0.0),
        Just(0.1),
    ]
}

fn arb_offset() -> impl Strategy<Value = Vector3<f64>> {
    (arb_coord(), arb_coord(), arb_coord()).prop_map(|(x, y, z)| Vector3::new(x, y, z))
}

fn arb_name() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_-]{1,12}"
}

/// Commands which only touch the offset.
fn arb_offset_cmd() -> impl Strategy<Value = Cmd> {
    prop_oneof![
        (
            proptest::option::of(arb_coord()),
            proptest::option::of(arb_coord()),
            proptest::option::of(arb_coord())
        )
            .prop_map(|(x, y, z)| Cmd::SetOffset([x, y, z])),
        arb_offset().prop_map(Cmd::AddOffset),
    ]
}

// ---- PERSISTENCE ----

proptest! {
    /// Any volatile state survives being written and read back exactly.
    #[test]
    fn volatile_round_trip(
        disabled in any::<bool>(),
        name in arb_name(),
        offset_m in arb_offset()
    ) {
        let state = VolatileState { disabled, active_config: name, offset_m };
        let parsed = VolatileState::parse(&state.to_text()).unwrap();

        prop_assert_eq!(parsed, state);
    }

    /// Any set of named configurations survives being written and read back exactly.
    #[test]
    fn config_round_trip(
        default_m in arb_offset(),
        entries in proptest::collection::btree_map(arb_name(), arb_offset(), 0..8)
    ) {
        let mut store = ConfigStore::new(default_m);
        for (name, offset_m) in entries.iter() {
            store.insert(name, *offset_m);
        }

        let parsed = ConfigStore::parse(&store.to_text(), default_m).unwrap();

        prop_assert_eq!(parsed, store);
    }

    /// Corrupting any single numeric field of a stored configuration makes the whole load fail,
    /// and the follower falls back to the defaults wholesale.
    #[test]
    fn corrupt_config_reverts_wholesale(
        entries in proptest::collection::btree_map(arb_name(), arb_offset(), 1..6),
        corrupt_idx in any::<prop::sample::Index>(),
        field in 1usize..4
    ) {
        let default_m = Vector3::new(50.0, 0.0, 0.0);
        let mut store = ConfigStore::new(default_m);
        for (name, offset_m) in entries.iter() {
            store.insert(name, *offset_m);
        }

        let mut lines: Vec<String> = store.to_text().lines().map(String::from).collect();
        let idx = corrupt_idx.index(lines.len());
        let mut fields: Vec<String> = lines[idx].split(' ').map(String::from).collect();
        fields[field] = String::from("1.2.3");
        lines[idx] = fields.join(" ");
        let text = lines.join("\n");

        let active = entries.keys().next().unwrap().clone();
        let volatile = MemBacking::new(&format!("1;{};1;2;3", active));
        let configs = MemBacking::new(&text);

        prop_assert!(persist::load(&volatile, &configs, default_m).is_err());

        let mut ctrl = FollowerCtrl::default();
        ctrl.init(InitData {
            params: Params::default(),
            volatile_backing: Box::new(volatile.clone()),
            config_backing: Box::new(configs.clone())
        }).unwrap();

        let fresh = FollowerState::new(default_m);
        prop_assert_eq!(ctrl.state().volatile(), fresh.volatile());
        prop_assert_eq!(&ctrl.state().configs, &fresh.configs);
        prop_assert_eq!(volatile.contents(), fresh.volatile().to_text());
        prop_assert_eq!(configs.contents(), fresh.configs.to_text());
    }
}

// ---- COMMANDS ----

proptest! {
    /// `save` then `load` restores the saved offset whatever happens in between.
    #[test]
    fn save_load_restores_offset(
        start_m in arb_offset(),
        name in arb_name(),
        cmds in proptest::collection::vec(arb_offset_cmd(), 0..10)
    ) {
        let mut state = FollowerState::new(Vector3::new(50.0, 0.0, 0.0));
        state.offset_m = start_m;

        cmd_processor::exec(&mut state, &Cmd::Save(Some(name.clone())), None).unwrap();
        for cmd in cmds.iter() {
            cmd_processor::exec(&mut state, cmd, None).unwrap();
        }
        cmd_processor::exec(&mut state, &Cmd::Load(name.clone()), None).unwrap();

        prop_assert_eq!(state.offset_m, start_m);
        prop_assert_eq!(state.active_config, name);
    }

    /// `reset` always returns to the compiled defaults.
    #[test]
    fn reset_restores_defaults(
        offset_m in arb_offset(),
        name in arb_name(),
        disabled in any::<bool>()
    ) {
        let default_m = Vector3::new(50.0, 0.0, 0.0);
        let mut state = FollowerState::new(default_m);
        state.configs.insert(&name, offset_m);
        state.configs.insert(persist::DEFAULT_CONFIG, offset_m);
        state.active_config = name;
        state.offset_m = offset_m;
        state.disabled = disabled;

        cmd_processor::exec(&mut state, &Cmd::Reset, None).unwrap();

        prop_assert!(!state.disabled);
        prop_assert_eq!(state.active_config.as_str(), persist::DEFAULT_CONFIG);
        prop_assert_eq!(state.offset_m, default_m);
        prop_assert_eq!(state.configs.get(persist::DEFAULT_CONFIG), Some(default_m));
    }

    /// Names containing whitespace are never accepted by `save`.
    #[test]
    fn whitespace_names_rejected(
        head in "[a-z]{1,6}",
        ws in "[ \t\n]",
        tail in "[a-z]{0,6}"
    ) {
        let cmd_str = format!("save;{}{}{}", head, ws, tail);
        prop_assert!(Cmd::parse(&cmd_str).is_err());
    }

    /// Commands addressed elsewhere never change anything.
    #[test]
    fn unaddressed_commands_ignored(
        others in proptest::collection::vec("Drone[2-9]", 1..4),
        cmd in prop_oneof![
            Just("stop"),
            Just("reset"),
            Just("setoffset;1;2;3"),
            Just("addoffset;5;0;0"),
            Just("save;elsewhere")
        ]
    ) {
        let addressees = others.join(";");
        prop_assert!(!cmd_processor::is_addressed_to(&addressees, "Drone1"));
        let with_self = format!("{};Drone1", addressees);
        prop_assert!(cmd_processor::is_addressed_to(&with_self, "Drone1"));

        let mut ctrl = FollowerCtrl::default();
        let volatile = MemBacking::new("");
        let configs = MemBacking::new("");
        ctrl.init(InitData {
            params: Params::default(),
            volatile_backing: Box::new(volatile.clone()),
            config_backing: Box::new(configs.clone())
        }).unwrap();

        let before = (volatile.contents(), configs.contents(), ctrl.state().volatile());

        let msg = comms_if::msg::CommandMsg { addressees, cmd: cmd.to_string() };
        let out = ctrl.on_messages(None, Some(&msg), None).unwrap();

        prop_assert_eq!(out, None);
        prop_assert_eq!(before, (volatile.contents(), configs.contents(), ctrl.state().volatile()));
    }
}
