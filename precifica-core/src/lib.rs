//! precifica-core: deterministic price derivation for professional-services
//! quotes.
//!
//! The crate is one pure pipeline ([`derive_breakdown`]) plus the state
//! container ([`QuoteState`]) that keeps a derived breakdown in sync with a
//! mutable input bundle. Persistence, transport and UI live with the caller.

pub mod currency;
pub mod error;
pub mod model;
pub mod pricing;
pub mod state;

pub use currency::CurrencyFormat;
pub use error::PricingError;
pub use model::{
    DeliveryTier, ExtraCosts, ExtraCostsPatch, FinalAdjustments, FinalAdjustmentsPatch,
    OfficeCosts, OfficeCostsPatch, ProjectInfo, ProjectInfoPatch, QuoteInput, Task, TaskDraft,
    TaskId, TaskPatch, TechnicalAdjustments, TechnicalAdjustmentsPatch,
};
pub use pricing::{derive_breakdown, Breakdown};
pub use state::QuoteState;
