#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Edge-case tests for the rewriting engine
//! Boundary conditions for trackers, remap tables, the pipeline, and chains

use entity_rewriter::prelude::*;
use std::sync::Arc;

fn varint(field_id: u8, v: i32) -> MetadataItem {
    MetadataItem::new(field_id, MetaValue::VarInt(v))
}

fn hop(from: u32, to: u32) -> ProtocolHopBuilder {
    ProtocolHop::builder(ProtocolVersion(from), ProtocolVersion(to))
}

// ============================================================================
// REMAP TABLE EDGE CASES
// ============================================================================

#[test]
fn test_remap_boundary_codes() {
    let h = hop(2, 1)
        .register_entity_remap(0, u16::MAX)
        .register_entity_remap(u16::MAX, 0)
        .build();
    assert_eq!(h.translate_entity(0), u16::MAX);
    assert_eq!(h.translate_entity(u16::MAX), 0);
    assert_eq!(h.translate_entity(1), 1);
}

#[test]
fn test_remap_overwrite_keeps_latest() {
    let h = hop(2, 1)
        .register_object_remap(60, 61)
        .register_object_remap(60, 62)
        .build();
    assert_eq!(h.translate_object(60), 62);
    assert_eq!(h.remaps().table(Namespace::Object).len(), 1);
}

#[test]
fn test_remap_to_self_is_explicit_but_identity() {
    let h = hop(2, 1).register_entity_remap(5, 5).build();
    assert!(h.remaps().table(Namespace::Entity).contains(5));
    assert_eq!(h.translate_entity(5), 5);
}

// ============================================================================
// TRACKER EDGE CASES
// ============================================================================

#[test]
fn test_negative_entity_ids_are_tracked() {
    let h = hop(2, 1).register_entity_remap(50, 10).build();
    let mut conn = ConnectionContext::new(1);
    h.track(&mut conn, -1, false, 50);
    assert_eq!(h.resolve_outgoing_type_code(&conn, -1, 0), 10);
}

#[test]
fn test_respawn_with_different_namespace() {
    let h = hop(2, 1)
        .register_entity_remap(2, 20)
        .register_object_remap(2, 30)
        .build();
    let mut conn = ConnectionContext::new(1);

    h.track(&mut conn, 4, false, 2);
    assert_eq!(h.resolve_outgoing_type_code(&conn, 4, 2), 20);

    h.track(&mut conn, 4, true, 2);
    assert_eq!(h.resolve_outgoing_type_code(&conn, 4, 2), 30);
}

#[test]
fn test_untrack_unknown_is_noop() {
    let h = hop(2, 1).build();
    let mut conn = ConnectionContext::new(1);
    assert_eq!(h.untrack(&mut conn, 42), None);
}

#[test]
fn test_untrack_on_idle_hop_creates_no_tracker() {
    let spawned = hop(3, 2).build();
    let idle = hop(2, 1).build();
    let mut conn = ConnectionContext::new(1);
    spawned.track(&mut conn, 1, false, 50);

    assert_eq!(idle.untrack(&mut conn, 1), None);
    assert!(idle.tracker(&conn).is_none());
    assert_eq!(spawned.lookup(&conn, 1), Some(EntityType::entity(50)));
}

#[test]
fn test_hops_on_one_connection_keep_their_own_tracker_config() {
    let lenient = hop(3, 2).build();
    let strict = hop(2, 1)
        .tracker_config(TrackerConfig {
            initial_capacity: 0,
            warn_threshold: 2,
        })
        .build();
    let chain = ProtocolChain::builder()
        .push(lenient)
        .push(strict)
        .build()
        .unwrap();
    let mut conn = ConnectionContext::new(1);

    for id in 0..3 {
        chain.on_spawn(&mut conn, id, EntityType::entity(1));
    }

    let first = chain.hops()[0].tracker(&conn).unwrap();
    let second = chain.hops()[1].tracker(&conn).unwrap();
    assert_eq!(first.warn_threshold(), TrackerConfig::default().warn_threshold);
    assert!(!first.has_warned());
    assert_eq!(second.warn_threshold(), 2);
    assert!(second.has_warned());
}

#[test]
fn test_destroy_before_any_spawn() {
    let chain = ProtocolChain::builder().push(hop(2, 1).build()).build().unwrap();
    let mut conn = ConnectionContext::new(1);
    chain.on_destroy(&mut conn, &[1, 2, 3]);
    assert_eq!(chain.hops()[0].lookup(&conn, 1), None);
}

// ============================================================================
// PIPELINE EDGE CASES
// ============================================================================

#[test]
fn test_empty_batch() {
    let h = hop(2, 1)
        .register_fn("drop", |_, _| Ok(StageOutcome::Drop))
        .build();
    let conn = ConnectionContext::new(1);
    assert!(h.process(&conn, 1, Vec::new()).is_empty());
    assert_eq!(h.metrics().snapshot().batches, 1);
}

#[test]
fn test_every_item_dropped() {
    let h = hop(2, 1)
        .register_fn("drop", |_, _| Ok(StageOutcome::Drop))
        .build();
    let conn = ConnectionContext::new(1);
    let items: Vec<_> = (0..16).map(|i| varint(i, i as i32)).collect();
    assert!(h.process(&conn, 1, items).is_empty());
    assert_eq!(h.metrics().snapshot().items_dropped, 16);
}

#[test]
fn test_duplicate_field_ids_are_preserved() {
    let h = hop(2, 1).build();
    let conn = ConnectionContext::new(1);
    let items = vec![varint(3, 1), varint(3, 2), varint(3, 3)];
    assert_eq!(h.process(&conn, 1, items.clone()), items);
}

#[test]
fn test_replace_can_retag_field() {
    // Item-stack re-encoding: slot carried as a varint id in the older version
    let h = hop(2, 1)
        .register_fn("slot-to-id", |_, item| match &item.value {
            MetaValue::Slot(Some(stack)) => Ok(StageOutcome::Replace(
                item.replace_value(MetaValue::VarInt(stack.item_id)),
            )),
            MetaValue::Slot(None) => Ok(StageOutcome::Replace(
                item.replace_value(MetaValue::VarInt(0)),
            )),
            _ => Ok(StageOutcome::Keep),
        })
        .build();
    let conn = ConnectionContext::new(1);
    let out = h.process(
        &conn,
        1,
        vec![MetadataItem::new(6, MetaValue::Slot(Some(ItemStack::new(280, 1))))],
    );
    assert_eq!(out, vec![varint(6, 280)]);
    assert_eq!(out[0].type_tag, TypeTag::VarInt);
}

#[test]
fn test_inconsistent_input_item_is_not_rejected_by_core() {
    // The core only validates what stages produce
    let h = hop(2, 1).build();
    let conn = ConnectionContext::new(1);
    let odd = MetadataItem::with_tag(1, TypeTag::Slot, MetaValue::Byte(1));
    assert_eq!(h.process(&conn, 1, vec![odd.clone()]), vec![odd]);
}

#[test]
fn test_mistagged_replacement_drops_item() {
    let sink = Arc::new(RecordingSink::new());
    let h = hop(2, 1)
        .diagnostics(DiagnosticsConfig::verbose())
        .sink(sink.clone())
        .register_fn("mistag", |_, item| {
            Ok(StageOutcome::Replace(MetadataItem::with_tag(
                item.field_id,
                TypeTag::BlockState,
                MetaValue::Float(1.0),
            )))
        })
        .build();
    let conn = ConnectionContext::new(1);
    assert!(h.process(&conn, 1, vec![varint(0, 1)]).is_empty());
    assert!(sink.drain()[0].error.contains("mistag"));
}

#[test]
fn test_panicking_stage_does_not_escape() {
    let h = hop(2, 1)
        .register_fn("panics-on-3", |_, item| {
            if item.field_id == 3 {
                panic!("corrupt field");
            }
            Ok(StageOutcome::Keep)
        })
        .build();
    let conn = ConnectionContext::new(1);
    let out = h.process(&conn, 1, vec![varint(1, 1), varint(3, 3), varint(5, 5)]);
    assert_eq!(out, vec![varint(1, 1), varint(5, 5)]);
    assert_eq!(h.metrics().snapshot().transform_failures, 1);
}

#[test]
fn test_quiet_diagnostics_still_drop() {
    let sink = Arc::new(RecordingSink::new());
    let h = hop(2, 1)
        .sink(sink.clone())
        .register_fn("fail", |_, _| Err(RewriteError::transform("always")))
        .build();
    let conn = ConnectionContext::new(1);
    assert!(h.process(&conn, 1, vec![varint(0, 0)]).is_empty());
    assert!(sink.is_empty());
}

#[test]
fn test_unknown_entity_context_is_untyped() {
    let h = hop(2, 1)
        .register_fn("requires-type", |ctx, _| {
            if ctx.entity_type.is_none() {
                Ok(StageOutcome::Drop)
            } else {
                Ok(StageOutcome::Keep)
            }
        })
        .build();
    let conn = ConnectionContext::new(1);
    assert!(h.process(&conn, 404, vec![varint(0, 0)]).is_empty());
}

// ============================================================================
// CHAIN EDGE CASES
// ============================================================================

#[test]
fn test_single_hop_chain() {
    let chain = ProtocolChain::builder()
        .push(hop(5, 4).register_entity_remap(1, 2).build())
        .build()
        .unwrap();
    let mut conn = ConnectionContext::new(1);
    assert_eq!(chain.on_spawn(&mut conn, 1, EntityType::entity(1)), EntityType::entity(2));
    assert_eq!(chain.source(), ProtocolVersion(5));
    assert_eq!(chain.target(), ProtocolVersion(4));
}

#[test]
fn test_upgrade_direction_chain() {
    // Chains are direction-agnostic: contiguity is all that is checked
    let chain = ProtocolChain::builder()
        .push(hop(1, 2).build())
        .push(hop(2, 3).build())
        .build();
    assert!(chain.is_ok());
}

#[test]
fn test_round_trip_chain_rejected() {
    // 3->2->3->2 would make the last hop overwrite the first hop's records
    let result = ProtocolChain::builder()
        .push(hop(3, 2).register_entity_remap(50, 40).build())
        .push(hop(2, 3).register_entity_remap(40, 77).build())
        .push(hop(3, 2).build())
        .build();
    assert!(matches!(result, Err(RewriteError::DuplicateHop { .. })));
}

#[test]
fn test_shared_hop_in_two_chains() {
    let shared = Arc::new(hop(3, 2).register_entity_remap(9, 8).build());
    let a = ProtocolChain::builder().push(shared.clone()).build().unwrap();
    let b = ProtocolChain::builder()
        .push(shared)
        .push(hop(2, 1).register_entity_remap(8, 7).build())
        .build()
        .unwrap();

    let mut conn_a = ConnectionContext::new(1);
    let mut conn_b = ConnectionContext::new(2);
    assert_eq!(a.on_spawn(&mut conn_a, 1, EntityType::entity(9)), EntityType::entity(8));
    assert_eq!(b.on_spawn(&mut conn_b, 1, EntityType::entity(9)), EntityType::entity(7));
}

#[test]
fn test_object_spawn_uses_object_table_at_every_hop() {
    let chain = ProtocolChain::builder()
        .push(hop(3, 2).register_object_remap(10, 11).register_entity_remap(10, 99).build())
        .push(hop(2, 1).register_object_remap(11, 12).build())
        .build()
        .unwrap();
    let mut conn = ConnectionContext::new(1);
    assert_eq!(chain.on_spawn(&mut conn, 1, EntityType::object(10)), EntityType::object(12));
}
