#![no_main]

use entity_rewriter::prelude::*;
use libfuzzer_sys::fuzz_target;

// Byte 0 picks the spawn type, the rest become (field_id, value) pairs
fuzz_target!(|data: &[u8]| {
    let Some((&spawn, rest)) = data.split_first() else {
        return;
    };

    let hop = ProtocolHop::builder(ProtocolVersion(2), ProtocolVersion(1))
        .sink(std::sync::Arc::new(NullSink))
        .register_entity_remap(u16::from(spawn), 10)
        .register_fn("mistag-odd", |_, item| match item.value {
            MetaValue::Byte(b) if b % 2 != 0 => Ok(StageOutcome::Replace(MetadataItem::with_tag(
                item.field_id,
                TypeTag::Float,
                MetaValue::Byte(b),
            ))),
            _ => Ok(StageOutcome::Keep),
        })
        .register_fn("reject-ff", |_, item| match item.field_id {
            0xff => Err(RewriteError::transform("field 0xff")),
            _ => Ok(StageOutcome::Keep),
        })
        .build();

    let mut conn = ConnectionContext::new(0);
    hop.track(&mut conn, 1, spawn & 1 == 1, u16::from(spawn));

    let items: Vec<_> = rest
        .chunks_exact(2)
        .map(|pair| MetadataItem::new(pair[0], MetaValue::Byte(pair[1] as i8)))
        .collect();
    let count = items.len();

    let out = hop.process(&conn, 1, items);
    assert!(out.len() <= count);
    assert!(out.iter().all(MetadataItem::is_consistent));
});
