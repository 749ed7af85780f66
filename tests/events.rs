use std::rc::Rc;

use serde_json::json;

use goldleaf::context::GameContext;
use goldleaf::events::{get_event_instance, parse_event};
use goldleaf::world::chars::ItemSlot;
use goldleaf::world::{FieldChar, InteractableObject, MainChar, TileEvent};

fn context_with_world() -> Rc<GameContext> {
    let ctx = GameContext::new();
    ctx.world.add_main_char(MainChar::new("mia", "Mia").with_items(vec![ItemSlot {
        key_name: "herb".to_owned(),
        index: 0,
        quantity: 3,
        equipped: false,
        broken: false,
    }]));
    ctx.world.add_npc(FieldChar::new("innkeeper"));
    ctx.world.add_interactable(InteractableObject::new("pillar"));
    ctx.world.add_tile_event(TileEvent::new(Some("door"), 4, 9));
    ctx
}

fn build(ctx: &Rc<GameContext>, descriptor: serde_json::Value) -> Rc<goldleaf::events::GameEvent> {
    let descriptor = parse_event(&descriptor.to_string()).expect("descriptor must parse");
    get_event_instance(ctx, &descriptor)
}

fn pump(ctx: &Rc<GameContext>, steps: u32, dt_ms: f32) {
    for _ in 0..steps {
        ctx.update(dt_ms);
    }
}

// ── Base lifecycle & registry ────────────────────────────────────────────────

#[test]
fn inactive_event_does_not_fire() {
    let ctx = context_with_world();
    let event = build(
        &ctx,
        json!({"type": "camera_shake", "active": false}),
    );
    event.fire(None);
    assert!(!ctx.camera.borrow().is_shaking());

    event.set_active(true);
    event.fire(None);
    assert!(ctx.camera.borrow().is_shaking());
}

#[test]
fn labeled_event_is_resolvable_by_key() {
    let ctx = context_with_world();
    let event = build(&ctx, json!({"type": "camera_shake", "key_name": "quake"}));
    let found = ctx.events.get_labeled_event("quake").expect("registered on construction");
    assert_eq!(found.id(), event.id());

    event.destroy();
    assert!(ctx.events.get_labeled_event("quake").is_none());
}

#[test]
fn registry_last_writer_wins() {
    let ctx = context_with_world();
    let stale = build(&ctx, json!({"type": "camera_shake", "key_name": "quake"}));
    let live = build(&ctx, json!({"type": "camera_shake", "key_name": "quake"}));

    // Destroying the stale owner must not evict the live registration.
    stale.destroy();
    let found = ctx.events.get_labeled_event("quake").expect("live event still registered");
    assert_eq!(found.id(), live.id());
}

#[test]
fn destroy_releases_nested_children() {
    let ctx = context_with_world();
    let event = build(
        &ctx,
        json!({
            "type": "item_check",
            "char_key_name": "mia",
            "check_type": "has_item",
            "item_key_name": "herb",
            "check_ok_events": [{"type": "camera_shake", "key_name": "nested"}]
        }),
    );
    assert!(ctx.events.get_labeled_event("nested").is_some(), "children register eagerly");
    event.destroy();
    assert!(ctx.events.get_labeled_event("nested").is_none());
}

// ── Value-Set ────────────────────────────────────────────────────────────────

#[test]
fn set_value_writes_storage() {
    let ctx = context_with_world();
    let event = build(
        &ctx,
        json!({
            "type": "set_value",
            "value": {"type": "storage", "key_name": "bridge_open", "value": true}
        }),
    );
    event.fire(None);
    assert_eq!(ctx.storage.get_bool("bridge_open"), Some(true));
}

#[test]
fn set_value_resyncs_origin_npc_storage_flags() {
    let ctx = context_with_world();
    let npc = ctx.world.npc_by_label("innkeeper").unwrap();
    npc.borrow_mut().storage_keys.insert("active".to_owned(), "innkeeper_present".to_owned());

    let event = build(
        &ctx,
        json!({
            "type": "set_value",
            "check_npc_storage_values": true,
            "value": {"type": "storage", "key_name": "innkeeper_present", "value": false}
        }),
    );
    event.fire(Some(&npc));
    assert!(!npc.borrow().active, "origin NPC re-reads its storage-bound flags");
}

#[test]
fn set_value_writes_dotted_path_on_char() {
    let ctx = context_with_world();
    let event = build(
        &ctx,
        json!({
            "type": "set_value",
            "value": {
                "type": "game_info",
                "target": "char",
                "key_name": "mia",
                "property": "flags.met_kraden",
                "value": true
            }
        }),
    );
    event.fire(None);
    let mia = ctx.world.get_char("mia").unwrap();
    assert_eq!(mia.borrow().props["flags"]["met_kraden"], json!(true));
}

#[test]
fn set_value_unknown_char_is_skipped() {
    let ctx = context_with_world();
    let event = build(
        &ctx,
        json!({
            "type": "set_value",
            "value": {
                "type": "game_info",
                "target": "char",
                "key_name": "nobody",
                "property": "hp",
                "value": 1
            }
        }),
    );
    // Content error: logged and skipped, never a panic.
    event.fire(None);
}

// ── Item-Check ───────────────────────────────────────────────────────────────

fn item_check_descriptor(check_type: &str, extra: serde_json::Value) -> serde_json::Value {
    let mut descriptor = json!({
        "type": "item_check",
        "char_key_name": "mia",
        "check_type": check_type,
        "check_ok_events": [
            {"type": "set_value", "value": {"type": "storage", "key_name": "branch", "value": "ok"}}
        ],
        "check_fail_events": [
            {"type": "set_value", "value": {"type": "storage", "key_name": "branch", "value": "fail"}}
        ]
    });
    descriptor.as_object_mut().unwrap().extend(extra.as_object().unwrap().clone());
    descriptor
}

#[test]
fn quantity_check_matching_fires_ok_branch() {
    let ctx = context_with_world();
    let event = build(
        &ctx,
        item_check_descriptor("quantity_check", json!({"item_key_name": "herb", "quantity": 3})),
    );
    event.fire(None);
    assert_eq!(ctx.storage.get("branch"), Some(json!("ok")));
}

#[test]
fn quantity_check_mismatch_fires_fail_branch() {
    let ctx = context_with_world();
    let event = build(
        &ctx,
        item_check_descriptor("quantity_check", json!({"item_key_name": "herb", "quantity": 1})),
    );
    event.fire(None);
    assert_eq!(ctx.storage.get("branch"), Some(json!("fail")));
}

#[test]
fn has_item_for_missing_key_fires_fail_branch() {
    let ctx = context_with_world();
    let event =
        build(&ctx, item_check_descriptor("has_item", json!({"item_key_name": "mythril_bag"})));
    event.fire(None);
    assert_eq!(ctx.storage.get("branch"), Some(json!("fail")));
}

#[test]
fn quantity_check_on_unresolved_slot_fails_open() {
    let ctx = context_with_world();
    let event = build(
        &ctx,
        item_check_descriptor("quantity_check", json!({"item_key_name": "mythril_bag", "quantity": 1})),
    );
    event.fire(None);
    assert_eq!(ctx.storage.get("branch"), Some(json!("fail")));
}

#[test]
fn item_check_by_slot_index() {
    let ctx = context_with_world();
    let event = build(&ctx, item_check_descriptor("has_item", json!({"slot_index": 0})));
    event.fire(None);
    assert_eq!(ctx.storage.get("branch"), Some(json!("ok")));
}

#[test]
fn item_check_unknown_char_fires_neither_branch() {
    let ctx = context_with_world();
    let mut descriptor = item_check_descriptor("has_item", json!({"item_key_name": "herb"}));
    descriptor["char_key_name"] = json!("nobody");
    let event = build(&ctx, descriptor);
    event.fire(None);
    assert!(ctx.storage.get("branch").is_none());
}

// ── Collision-Toggle ─────────────────────────────────────────────────────────

#[test]
fn io_collision_disable_and_enable() {
    let ctx = context_with_world();
    let disable = build(
        &ctx,
        json!({"type": "io_collision", "io_label": "pillar", "control": "disable"}),
    );
    disable.fire(None);
    let pillar = ctx.world.interactable_by_label("pillar").unwrap();
    assert!(!pillar.borrow().collision_active);

    let enable =
        build(&ctx, json!({"type": "io_collision", "io_label": "pillar", "control": "enable"}));
    enable.fire(None);
    assert!(pillar.borrow().collision_active);
}

#[test]
fn io_collision_remove_is_permanent() {
    let ctx = context_with_world();
    let remove =
        build(&ctx, json!({"type": "io_collision", "io_label": "pillar", "control": "remove"}));
    remove.fire(None);

    let enable =
        build(&ctx, json!({"type": "io_collision", "io_label": "pillar", "control": "enable"}));
    enable.fire(None);
    let pillar = ctx.world.interactable_by_label("pillar").unwrap();
    assert!(pillar.borrow().body_removed);
    assert!(!pillar.borrow().collision_active, "a removed body stays non-colliding");
}

// ── Particle-Burst ───────────────────────────────────────────────────────────

#[test]
fn particles_hold_running_counter_for_lifetime() {
    let ctx = context_with_world();
    let event = build(
        &ctx,
        json!({
            "type": "particles",
            "layer": "over",
            "emitters": [
                {"x": 10.0, "y": 10.0, "lifetime_ms": 100},
                {"x": 40.0, "y": 10.0, "lifetime_ms": 200}
            ]
        }),
    );
    event.fire(None);
    assert_eq!(ctx.events.events_running_count(), 1);
    assert!(ctx.is_busy());

    pump(&ctx, 1, 100.0);
    assert_eq!(ctx.events.events_running_count(), 1, "one emitter still alive");

    pump(&ctx, 1, 100.0);
    assert_eq!(ctx.events.events_running_count(), 0);
    assert_eq!(ctx.events.callback_count(), 0, "render callback removed on completion");
}

#[test]
fn particles_render_callback_draws_each_frame() {
    let ctx = context_with_world();
    let event = build(
        &ctx,
        json!({
            "type": "particles",
            "layer": "middle",
            "emitters": [{"x": 10.0, "y": 10.0, "count": 5, "lifetime_ms": 100}]
        }),
    );
    event.fire(None);
    pump(&ctx, 1, 16.0);
    assert_eq!(ctx.stage.particle_count(goldleaf::stage::ParticleLayer::Middle), 5);
}

#[test]
fn particles_with_no_emitters_balance_the_counter() {
    let ctx = context_with_world();
    let event = build(&ctx, json!({"type": "particles", "emitters": []}));
    event.fire(None);
    assert_eq!(ctx.events.events_running_count(), 0, "sync resolution still balances");
}

#[test]
fn repeated_async_fires_return_counter_to_zero() {
    let ctx = context_with_world();
    let event = build(
        &ctx,
        json!({
            "type": "particles",
            "emitters": [{"x": 0.0, "y": 0.0, "lifetime_ms": 50}]
        }),
    );
    for _ in 0..3 {
        event.fire(None);
        pump(&ctx, 4, 25.0);
    }
    assert_eq!(ctx.events.events_running_count(), 0);
}

// ── Party-Join/Leave ─────────────────────────────────────────────────────────

#[test]
fn party_join_without_dialog_finishes_immediately() {
    let ctx = context_with_world();
    let event = build(
        &ctx,
        json!({
            "type": "party_join",
            "char_key_name": "mia",
            "show_dialog": false,
            "finish_events": [
                {"type": "set_value", "value": {"type": "storage", "key_name": "joined", "value": true}}
            ]
        }),
    );
    event.fire(None);

    assert!(ctx.world.party_contains("mia"));
    assert_eq!(ctx.storage.get_bool("joined"), Some(true));
    assert_eq!(ctx.events.events_running_count(), 0, "no dialog, no async portion");
    assert_eq!(ctx.stage.graphic_count(), 0, "no dialog box opened");
    assert_eq!(ctx.audio.bgm_pause_count(), 0);
    assert_eq!(ctx.audio.bgm_resume_count(), 0);
}

#[test]
fn party_leave_fires_finish_events_without_dialog() {
    let ctx = context_with_world();
    let mia = ctx.world.get_char("mia").unwrap();
    ctx.world.add_to_party(&mia);

    let event = build(
        &ctx,
        json!({
            "type": "party_join",
            "char_key_name": "mia",
            "join": false,
            "finish_events": [
                {"type": "set_value", "value": {"type": "storage", "key_name": "left", "value": true}}
            ]
        }),
    );
    event.fire(None);
    assert!(!ctx.world.party_contains("mia"));
    assert_eq!(ctx.storage.get_bool("left"), Some(true));
}

#[test]
fn party_join_dialog_flow_runs_to_completion() {
    let ctx = context_with_world();
    let event = build(
        &ctx,
        json!({
            "type": "party_join",
            "char_key_name": "mia",
            "finish_events": [
                {"type": "set_value", "value": {"type": "storage", "key_name": "joined", "value": true}}
            ]
        }),
    );
    event.fire(None);

    assert!(ctx.world.party_contains("mia"));
    assert_eq!(ctx.events.events_running_count(), 1, "dialog holds the busy counter");
    assert_eq!(ctx.audio.se_log(), ["misc/party_join"]);
    assert_eq!(ctx.audio.bgm_pause_count(), 1);
    assert_eq!(ctx.audio.bgm_resume_count(), 1, "stinger completion resumes the BGM");
    assert_eq!(ctx.controls.binding_count(), 1);
    assert!(ctx.storage.get("joined").is_none(), "finish waits for the dialog");

    // Open + reveal the single page.
    pump(&ctx, 60, 20.0);
    assert_eq!(ctx.events.events_running_count(), 1);

    // Confirm closes the dialog and fires the finish chain.
    ctx.controls.press_confirm();
    pump(&ctx, 60, 20.0);
    assert_eq!(ctx.storage.get_bool("joined"), Some(true));
    assert_eq!(ctx.events.events_running_count(), 0);
    assert_eq!(ctx.controls.binding_count(), 0, "confirm binding detached on finish");
    assert_eq!(ctx.stage.graphic_count(), 0);
    assert_eq!(ctx.stage.text_count(), 0);
}

#[test]
fn party_join_confirm_is_ignored_while_revealing() {
    let ctx = context_with_world();
    let event = build(&ctx, json!({"type": "party_join", "char_key_name": "mia"}));
    event.fire(None);

    // Window still opening; a confirm press must not skip the page.
    ctx.controls.press_confirm();
    pump(&ctx, 60, 20.0);
    assert_eq!(ctx.events.events_running_count(), 1, "dialog still up after early press");

    ctx.controls.press_confirm();
    pump(&ctx, 60, 20.0);
    assert_eq!(ctx.events.events_running_count(), 0);
}

#[test]
fn party_join_unknown_char_is_skipped() {
    let ctx = context_with_world();
    let event = build(&ctx, json!({"type": "party_join", "char_key_name": "nobody"}));
    event.fire(None);
    assert_eq!(ctx.events.events_running_count(), 0);
    assert_eq!(ctx.world.party_len(), 0);
}

// ── Tile-Event-Reconfigure ───────────────────────────────────────────────────

#[test]
fn tile_event_manage_all_directions_shorthand() {
    let ctx = context_with_world();
    let event = build(
        &ctx,
        json!({"type": "tile_event_manage", "tile_event_label": "door", "directions": "all"}),
    );
    event.fire(None);
    let door = ctx.world.tile_event_by_label("door").unwrap();
    assert!(door.borrow().is_active());
    for direction in goldleaf::world::Direction::ALL {
        assert!(door.borrow().is_active_at(direction));
    }
}

#[test]
fn tile_event_manage_specific_directions_and_layers() {
    let ctx = context_with_world();
    build(
        &ctx,
        json!({"type": "tile_event_manage", "tile_event_label": "door", "directions": "all"}),
    )
    .fire(None);

    let event = build(
        &ctx,
        json!({
            "type": "tile_event_manage",
            "tile_event_label": "door",
            "activate": false,
            "directions": ["up", "down"],
            "collision_layers": [1, 2],
            "pos_x": 7
        }),
    );
    event.fire(None);

    let door = ctx.world.tile_event_by_label("door").unwrap();
    let door = door.borrow();
    assert!(!door.is_active_at(goldleaf::world::Direction::Up));
    assert!(!door.is_active_at(goldleaf::world::Direction::Down));
    assert!(door.is_active_at(goldleaf::world::Direction::Left));
    assert_eq!(door.collision_layers, vec![1, 2]);
    assert_eq!(door.position.x, 7);
    assert_eq!(door.position.y, 9, "unspecified axis keeps its value");
}

#[test]
fn tile_event_manage_unknown_label_is_skipped() {
    let ctx = context_with_world();
    let event = build(
        &ctx,
        json!({"type": "tile_event_manage", "tile_event_label": "ghost", "directions": "all"}),
    );
    event.fire(None);
}

// ── Char/NPC Activation-Toggle ───────────────────────────────────────────────

#[test]
fn char_activation_toggles_labeled_npc() {
    let ctx = context_with_world();
    let event = build(
        &ctx,
        json!({
            "type": "char_activation",
            "target": "npc",
            "npc_label": "innkeeper",
            "activate": false
        }),
    );
    event.fire(None);
    let npc = ctx.world.npc_by_label("innkeeper").unwrap();
    assert!(!npc.borrow().active);
    assert!(!npc.borrow().visible);
}

#[test]
fn char_activation_falls_back_to_origin() {
    let ctx = context_with_world();
    let npc = ctx.world.npc_by_label("innkeeper").unwrap();
    let event = build(
        &ctx,
        json!({
            "type": "char_activation",
            "target": "npc",
            "npc_label": "missing_label",
            "activate": false
        }),
    );
    event.fire(Some(&npc));
    assert!(!npc.borrow().active, "unresolved target falls back to the firing origin");
}

#[test]
fn char_activation_hero_target() {
    let ctx = context_with_world();
    let event =
        build(&ctx, json!({"type": "char_activation", "target": "hero", "activate": false}));
    event.fire(None);
    assert!(!ctx.world.hero().borrow().active);
}

// ── Camera-Shake ─────────────────────────────────────────────────────────────

#[test]
fn camera_shake_enable_and_disable() {
    let ctx = context_with_world();
    build(&ctx, json!({"type": "camera_shake"})).fire(None);
    assert!(ctx.camera.borrow().is_shaking());

    pump(&ctx, 3, 16.0);
    assert!(ctx.camera.borrow().shake_offset.length() > 0.0);

    build(&ctx, json!({"type": "camera_shake", "enable": false})).fire(None);
    assert!(!ctx.camera.borrow().is_shaking());
    assert_eq!(ctx.camera.borrow().shake_offset, glam::Vec2::ZERO);
}
