//! Input records for quote pricing: tasks, overhead, ad-hoc costs,
//! adjustments and project metadata.
//!
//! Percent fields hold human-readable numbers (`30.0` means 30%); conversion
//! to fractions happens only inside the derivation stages.

use serde::{Deserialize, Deserializer, Serialize};

/// Container-assigned task identifier, unique within one bundle.
pub type TaskId = u32;

/// Patch fields that can clear a reference need absent and null kept apart:
/// absent leaves the field alone, null clears it. Plain `Option<Option<_>>`
/// folds both into the outer `None`.
fn clearable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Coerce a monetary or percent input before use.
///
/// Non-finite and negative values count as zero. Stored input is left as
/// given; only the derivation reads through this.
pub(crate) fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// A billable unit of work.
///
/// `collaborator_id` is a weak reference into an external roster; the engine
/// never resolves it. The hourly rate is whatever the caller settled on,
/// either inherited from the collaborator or overridden per task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub description: String,
    pub collaborator_id: Option<String>,
    /// Hours worked, >= 0.
    pub hours: f64,
    /// Rate in currency units per hour, >= 0.
    pub hourly_rate: f64,
}

impl Task {
    pub(crate) fn from_draft(id: TaskId, draft: TaskDraft) -> Self {
        Self {
            id,
            description: draft.description,
            collaborator_id: draft.collaborator_id,
            hours: draft.hours,
            hourly_rate: draft.hourly_rate,
        }
    }

    /// Labor cost of this task alone.
    pub fn labor_cost(&self) -> f64 {
        sanitize(self.hours) * sanitize(self.hourly_rate)
    }
}

/// A task before the container assigns its id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskDraft {
    pub description: String,
    pub collaborator_id: Option<String>,
    pub hours: f64,
    pub hourly_rate: f64,
}

impl TaskDraft {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_collaborator(mut self, id: impl Into<String>) -> Self {
        self.collaborator_id = Some(id.into());
        self
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.hours = hours;
        self
    }

    pub fn with_rate(mut self, hourly_rate: f64) -> Self {
        self.hourly_rate = hourly_rate;
        self
    }
}

/// Field-wise update for a task. `None` leaves the field untouched;
/// `collaborator_id: Some(None)` clears the assignment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskPatch {
    pub description: Option<String>,
    #[serde(deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub collaborator_id: Option<Option<String>>,
    pub hours: Option<f64>,
    pub hourly_rate: Option<f64>,
}

impl TaskPatch {
    pub(crate) fn apply(self, task: &mut Task) {
        if let Some(v) = self.description {
            task.description = v;
        }
        if let Some(v) = self.collaborator_id {
            task.collaborator_id = v;
        }
        if let Some(v) = self.hours {
            task.hours = v;
        }
        if let Some(v) = self.hourly_rate {
            task.hourly_rate = v;
        }
    }
}

/// Monthly office overhead and the hours it spreads over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfficeCosts {
    pub fixed_monthly: f64,
    pub variable_monthly: f64,
    pub productive_hours_month: f64,
}

impl OfficeCosts {
    /// Effective overhead per productive hour. Zero when no productive hours
    /// are configured.
    pub fn hourly_rate(&self) -> f64 {
        let hours = sanitize(self.productive_hours_month);
        if hours > 0.0 {
            (sanitize(self.fixed_monthly) + sanitize(self.variable_monthly)) / hours
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfficeCostsPatch {
    pub fixed_monthly: Option<f64>,
    pub variable_monthly: Option<f64>,
    pub productive_hours_month: Option<f64>,
}

impl OfficeCostsPatch {
    pub(crate) fn apply(self, costs: &mut OfficeCosts) {
        if let Some(v) = self.fixed_monthly {
            costs.fixed_monthly = v;
        }
        if let Some(v) = self.variable_monthly {
            costs.variable_monthly = v;
        }
        if let Some(v) = self.productive_hours_month {
            costs.productive_hours_month = v;
        }
    }
}

/// Ad-hoc cost categories, summed without weighting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtraCosts {
    pub site_visit: f64,
    pub transport: f64,
    pub printing: f64,
    pub regulatory_fees: f64,
    pub other_services: f64,
}

impl ExtraCosts {
    pub fn total(&self) -> f64 {
        sanitize(self.site_visit)
            + sanitize(self.transport)
            + sanitize(self.printing)
            + sanitize(self.regulatory_fees)
            + sanitize(self.other_services)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtraCostsPatch {
    pub site_visit: Option<f64>,
    pub transport: Option<f64>,
    pub printing: Option<f64>,
    pub regulatory_fees: Option<f64>,
    pub other_services: Option<f64>,
}

impl ExtraCostsPatch {
    pub(crate) fn apply(self, costs: &mut ExtraCosts) {
        if let Some(v) = self.site_visit {
            costs.site_visit = v;
        }
        if let Some(v) = self.transport {
            costs.transport = v;
        }
        if let Some(v) = self.printing {
            costs.printing = v;
        }
        if let Some(v) = self.regulatory_fees {
            costs.regulatory_fees = v;
        }
        if let Some(v) = self.other_services {
            costs.other_services = v;
        }
    }
}

/// Risk surcharges as percentages of base cost. Additive: 10% + 10% means
/// 20% of base, never 1.1 × 1.1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicalAdjustments {
    pub complexity_percent: f64,
    pub contingency_percent: f64,
    pub client_difficulty_percent: f64,
    pub extras_percent: f64,
}

impl TechnicalAdjustments {
    pub fn combined_percent(&self) -> f64 {
        sanitize(self.complexity_percent)
            + sanitize(self.contingency_percent)
            + sanitize(self.client_difficulty_percent)
            + sanitize(self.extras_percent)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicalAdjustmentsPatch {
    pub complexity_percent: Option<f64>,
    pub contingency_percent: Option<f64>,
    pub client_difficulty_percent: Option<f64>,
    pub extras_percent: Option<f64>,
}

impl TechnicalAdjustmentsPatch {
    pub(crate) fn apply(self, adj: &mut TechnicalAdjustments) {
        if let Some(v) = self.complexity_percent {
            adj.complexity_percent = v;
        }
        if let Some(v) = self.contingency_percent {
            adj.contingency_percent = v;
        }
        if let Some(v) = self.client_difficulty_percent {
            adj.client_difficulty_percent = v;
        }
        if let Some(v) = self.extras_percent {
            adj.extras_percent = v;
        }
    }
}

/// Margin and deducted-from-final rates.
///
/// `tax_percent` and `card_fee_percent` are percentages of the *final* price
/// (gross-up semantics), not surcharges on the pre-tax value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinalAdjustments {
    pub profit_percent: f64,
    pub tax_percent: f64,
    pub card_fee_percent: f64,
}

impl FinalAdjustments {
    /// Combined share of the final price that taxes and fees take.
    pub fn deducted_percent(&self) -> f64 {
        sanitize(self.tax_percent) + sanitize(self.card_fee_percent)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinalAdjustmentsPatch {
    pub profit_percent: Option<f64>,
    pub tax_percent: Option<f64>,
    pub card_fee_percent: Option<f64>,
}

impl FinalAdjustmentsPatch {
    pub(crate) fn apply(self, adj: &mut FinalAdjustments) {
        if let Some(v) = self.profit_percent {
            adj.profit_percent = v;
        }
        if let Some(v) = self.tax_percent {
            adj.tax_percent = v;
        }
        if let Some(v) = self.card_fee_percent {
            adj.card_fee_percent = v;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryTier {
    #[default]
    Basic,
    Standard,
    Premium,
}

/// Descriptive project metadata. Only `area_m2` feeds the derivation (the
/// per-square-meter unit price); the rest rides along for display and export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectInfo {
    pub name: String,
    pub project_type: String,
    pub area_m2: f64,
    pub city: String,
    pub delivery_tier: DeliveryTier,
    /// Weak reference into an external client registry.
    pub client_id: Option<String>,
    pub urgent: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectInfoPatch {
    pub name: Option<String>,
    pub project_type: Option<String>,
    pub area_m2: Option<f64>,
    pub city: Option<String>,
    pub delivery_tier: Option<DeliveryTier>,
    #[serde(deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub client_id: Option<Option<String>>,
    pub urgent: Option<bool>,
}

impl ProjectInfoPatch {
    pub(crate) fn apply(self, info: &mut ProjectInfo) {
        if let Some(v) = self.name {
            info.name = v;
        }
        if let Some(v) = self.project_type {
            info.project_type = v;
        }
        if let Some(v) = self.area_m2 {
            info.area_m2 = v;
        }
        if let Some(v) = self.city {
            info.city = v;
        }
        if let Some(v) = self.delivery_tier {
            info.delivery_tier = v;
        }
        if let Some(v) = self.client_id {
            info.client_id = v;
        }
        if let Some(v) = self.urgent {
            info.urgent = v;
        }
    }
}

/// The complete set of mutable pricing inputs for one quote.
///
/// `Default` is the all-zero, empty bundle; every construction site gets a
/// fresh value rather than a shared module-level default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteInput {
    pub project: ProjectInfo,
    pub tasks: Vec<Task>,
    pub office_costs: OfficeCosts,
    pub extra_costs: ExtraCosts,
    pub technical_adjustments: TechnicalAdjustments,
    pub final_adjustments: FinalAdjustments,
    /// Percentage taken off the fully loaded final value, after gross-up.
    pub discount_percent: f64,
}
