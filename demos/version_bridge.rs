//! Example: Bridging a modern server to an older client
//!
//! Builds a two-hop chain (v404 -> v401 -> v340), spawns a few entities, and
//! rewrites their metadata the way a proxy would for each outgoing packet.
//!
//! Run with: `cargo run --example version_bridge`

#![allow(clippy::uninlined_format_args)]

use entity_rewriter::config::RewriterConfig;
use entity_rewriter::prelude::*;
use entity_rewriter::utils::init_logging;

const MINECART: TypeCode = 10;
const ITEM_FRAME: TypeCode = 71;
const SKELETON_NEW: TypeCode = 70;
const SKELETON_OLD: TypeCode = 51;

/// v404 -> v401: block states shift, minecart block field moves from 10 to 9
fn modern_hop() -> ProtocolHop {
    ProtocolHop::builder(ProtocolVersion(404), ProtocolVersion(401))
        .register_entity_remap(SKELETON_NEW, 60)
        .register_fn("block-state-shift", |_, item| match item.value {
            MetaValue::BlockState(id) if id >= 1_000 => Ok(StageOutcome::Replace(
                item.replace_value(MetaValue::BlockState(id - 3)),
            )),
            _ => Ok(StageOutcome::Keep),
        })
        .register_fn("minecart-block-field", |ctx, item| {
            if ctx.is_object_of(MINECART) && item.field_id == 10 {
                let mut moved = item.clone();
                moved.field_id = 9;
                return Ok(StageOutcome::Replace(moved));
            }
            Ok(StageOutcome::Keep)
        })
        .build()
}

/// v401 -> v340: slots lose their NBT, unknown fields are stripped
fn legacy_hop() -> ProtocolHop {
    ProtocolHop::builder(ProtocolVersion(401), ProtocolVersion(340))
        .register_entity_remap(60, SKELETON_OLD)
        .register_object_remap(ITEM_FRAME, 18)
        .register_fn("strip-nbt", |_, item| match &item.value {
            MetaValue::Slot(Some(stack)) if stack.nbt.is_some() => {
                let mut stack = stack.clone();
                stack.nbt = None;
                Ok(StageOutcome::Replace(
                    item.replace_value(MetaValue::Slot(Some(stack))),
                ))
            }
            _ => Ok(StageOutcome::Keep),
        })
        .register_fn("drop-new-fields", |_, item| match item.field_id {
            id if id >= 14 => Ok(StageOutcome::Drop),
            _ => Ok(StageOutcome::Keep),
        })
        .register_fn("reject-direction", |_, item| match item.value {
            MetaValue::Direction(_) => Err(RewriteError::transform("direction unsupported")),
            _ => Ok(StageOutcome::Keep),
        })
        .build()
}

fn main() -> Result<()> {
    let config = RewriterConfig::from_env()?;
    init_logging(&config.logging)?;

    println!("=== Version Bridge Demo ===\n");

    let chain = ProtocolChain::builder()
        .push(modern_hop())
        .push(legacy_hop())
        .build()?;
    println!("Chain: {} -> {}\n", chain.source(), chain.target());

    let mut conn = ConnectionContext::new(1);

    // 1. Spawns
    let skeleton = chain.on_spawn(&mut conn, 100, EntityType::entity(SKELETON_NEW));
    let minecart = chain.on_spawn(&mut conn, 101, EntityType::object(MINECART));
    let frame = chain.on_spawn(&mut conn, 102, EntityType::object(ITEM_FRAME));
    println!("1. SPAWNS");
    println!("   - skeleton   {} -> {}", SKELETON_NEW, skeleton.type_code());
    println!("   - minecart   {} -> {}", MINECART, minecart.type_code());
    println!("   - item frame {} -> {}", ITEM_FRAME, frame.type_code());
    println!();

    // 2. Metadata
    println!("2. METADATA");
    let minecart_meta = chain.on_metadata(
        &conn,
        101,
        vec![
            MetadataItem::new(0, MetaValue::Byte(0)),
            MetadataItem::new(10, MetaValue::VarInt(1_042)),
            MetadataItem::new(11, MetaValue::BlockState(2_000)),
        ],
    );
    println!("   - minecart: {:?}", minecart_meta);

    let mut sword = ItemStack::new(276, 1);
    sword.nbt = Some(vec![0x0a, 0x00, 0x00]);
    let frame_meta = chain.on_metadata(
        &conn,
        102,
        vec![
            MetadataItem::new(6, MetaValue::Slot(Some(sword))),
            MetadataItem::new(7, MetaValue::VarInt(2)),
            MetadataItem::new(8, MetaValue::Direction(3)),
            MetadataItem::new(14, MetaValue::Boolean(true)),
        ],
    );
    println!("   - item frame: {:?}", frame_meta);
    println!();

    // 3. Destroy
    chain.on_destroy(&mut conn, &[100, 101, 102]);
    let unknown = chain.on_metadata(&conn, 101, vec![MetadataItem::new(10, MetaValue::VarInt(1))]);
    println!("3. AFTER DESTROY");
    println!("   - minecart field 10 no longer moved: {:?}", unknown);
    println!();

    for hop in chain.hops() {
        hop.metrics().log_metrics(&hop.id().to_string());
        let snapshot = hop.metrics().snapshot();
        println!(
            "{}: {} batches, {} in, {} out, {} failures",
            hop.id(),
            snapshot.batches,
            snapshot.items_in,
            snapshot.items_out(),
            snapshot.transform_failures
        );
    }

    Ok(())
}
