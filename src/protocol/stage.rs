//! Metadata stage contract.
//!
//! A stage is one field transform contributed by a protocol hop. It looks at one
//! metadata item (plus what the tracker knows about its entity) and answers with
//! a [`StageOutcome`]. Intentional removal is an outcome, not an error; `Err` is
//! reserved for values the stage could not make sense of.

use crate::core::entity::EntityContext;
use crate::core::metadata::MetadataItem;
use crate::error::Result;

/// What a stage decided to do with one item
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome {
    /// Pass the item on unchanged
    Keep,
    /// Pass this item on instead
    Replace(MetadataItem),
    /// Remove the item from the packet; later stages do not see it
    Drop,
}

/// One registered field transform
pub trait MetaStage: Send + Sync {
    fn transform(&self, ctx: &EntityContext, item: &MetadataItem) -> Result<StageOutcome>;

    /// Name used in diagnostics
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// A closure with a name attached
pub struct FnStage<F> {
    name: String,
    f: F,
}

impl<F> MetaStage for FnStage<F>
where
    F: Fn(&EntityContext, &MetadataItem) -> Result<StageOutcome> + Send + Sync,
{
    fn transform(&self, ctx: &EntityContext, item: &MetadataItem) -> Result<StageOutcome> {
        (self.f)(ctx, item)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<F> std::fmt::Debug for FnStage<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnStage").field("name", &self.name).finish()
    }
}

/// Wrap a closure as a named stage
pub fn stage_fn<F>(name: impl Into<String>, f: F) -> FnStage<F>
where
    F: Fn(&EntityContext, &MetadataItem) -> Result<StageOutcome> + Send + Sync,
{
    FnStage {
        name: name.into(),
        f,
    }
}
