//! Error isolation around a single stage call.
//!
//! Stages are opaque callbacks supplied by hop authors. Whatever goes wrong inside
//! one of them (a returned error, a panic, or a replacement whose value does not
//! match its declared tag) is turned into a [`RewriteError`] here so the pipeline
//! can omit the item and move on. Stages only receive shared references, so a
//! failed call cannot leave other items or connections half-modified.
//!
//! Panic containment relies on the default `panic = "unwind"` strategy.
//!
//! A contained panic still passes through the process panic hook before
//! `catch_unwind` returns, so the default hook prints a "thread ... panicked"
//! line to stderr regardless of diagnostic verbosity. The library never
//! replaces the hook; hosts that want stage panics silent (or routed to their
//! logger) install their own with [`std::panic::set_hook`].

use crate::core::entity::EntityContext;
use crate::core::metadata::MetadataItem;
use crate::error::{constants, Result, RewriteError};
use crate::protocol::stage::{MetaStage, StageOutcome};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Run one stage on one item, converting every failure mode into an `Err`
///
/// A panicking stage is reported here as [`RewriteError::StagePanicked`], but
/// the process panic hook has already run by then. Output from that hook is
/// the host's concern.
pub fn run_isolated(
    stage: &dyn MetaStage,
    ctx: &EntityContext,
    item: &MetadataItem,
) -> Result<StageOutcome> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| stage.transform(ctx, item)))
        .map_err(|payload| RewriteError::StagePanicked {
            stage: stage.name().to_string(),
            message: panic_message(payload.as_ref()),
        })??;

    if let StageOutcome::Replace(ref replacement) = outcome {
        if !replacement.is_consistent() {
            return Err(RewriteError::InvalidReplacement {
                stage: stage.name().to_string(),
                field_id: replacement.field_id,
                tag: replacement.type_tag,
                found: replacement.value.type_tag(),
            });
        }
    }

    Ok(outcome)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        constants::MSG_OPAQUE_PANIC.to_string()
    }
}
