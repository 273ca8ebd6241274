//! Quote state container.
//!
//! Owns the authoritative [`QuoteInput`] and re-derives the [`Breakdown`]
//! after every mutation, whole, before control returns. The breakdown a
//! reader sees always matches the bundle as last mutated; there is no
//! deferred or scheduled recompute. Single-writer by construction: callers
//! that fan mutations out across threads must serialize them.

use log::{debug, warn};

use crate::error::PricingError;
use crate::model::{
    ExtraCostsPatch, FinalAdjustmentsPatch, OfficeCostsPatch, ProjectInfoPatch, QuoteInput, Task,
    TaskDraft, TaskId, TaskPatch, TechnicalAdjustmentsPatch,
};
use crate::pricing::{derive_breakdown, Breakdown};

#[derive(Debug, Clone)]
pub struct QuoteState {
    input: QuoteInput,
    breakdown: Result<Breakdown, PricingError>,
}

impl Default for QuoteState {
    fn default() -> Self {
        Self::new(QuoteInput::default())
    }
}

impl QuoteState {
    pub fn new(input: QuoteInput) -> Self {
        let breakdown = derive_breakdown(&input);
        Self { input, breakdown }
    }

    /// Replace the whole bundle, discarding all prior inputs and ids.
    pub fn reset(&mut self, input: QuoteInput) {
        self.input = input;
        self.recompute();
    }

    pub fn input(&self) -> &QuoteInput {
        &self.input
    }

    /// The breakdown for the current bundle, or the fatal condition that
    /// keeps it undefined. Stays `Err` until a mutation fixes the rates.
    pub fn breakdown(&self) -> Result<&Breakdown, PricingError> {
        self.breakdown.as_ref().map_err(|e| *e)
    }

    pub fn update_project_info(&mut self, patch: ProjectInfoPatch) {
        patch.apply(&mut self.input.project);
        self.recompute();
    }

    /// Append a task, assigning `max(existing id) + 1` (1 for an empty list).
    ///
    /// Removing the highest-numbered task frees its id for the next add;
    /// callers that persist task references across removals must not rely on
    /// ids being retired forever.
    pub fn add_task(&mut self, draft: TaskDraft) -> TaskId {
        let id = self
            .input
            .tasks
            .iter()
            .map(|t| t.id)
            .max()
            .map_or(1, |max| max + 1);
        debug!("add task {id}: {}", draft.description);
        self.input.tasks.push(Task::from_draft(id, draft));
        self.recompute();
        id
    }

    /// Merge fields into the matching task. Unknown ids are ignored.
    pub fn update_task(&mut self, id: TaskId, patch: TaskPatch) {
        if let Some(task) = self.input.tasks.iter_mut().find(|t| t.id == id) {
            patch.apply(task);
            self.recompute();
        }
    }

    /// Remove the matching task. Unknown ids are ignored, so removal is
    /// idempotent.
    pub fn remove_task(&mut self, id: TaskId) {
        let before = self.input.tasks.len();
        self.input.tasks.retain(|t| t.id != id);
        if self.input.tasks.len() != before {
            self.recompute();
        }
    }

    pub fn update_office_costs(&mut self, patch: OfficeCostsPatch) {
        patch.apply(&mut self.input.office_costs);
        self.recompute();
    }

    pub fn update_extra_costs(&mut self, patch: ExtraCostsPatch) {
        patch.apply(&mut self.input.extra_costs);
        self.recompute();
    }

    pub fn update_technical_adjustments(&mut self, patch: TechnicalAdjustmentsPatch) {
        patch.apply(&mut self.input.technical_adjustments);
        self.recompute();
    }

    pub fn update_final_adjustments(&mut self, patch: FinalAdjustmentsPatch) {
        patch.apply(&mut self.input.final_adjustments);
        self.recompute();
    }

    /// Replace the discount outright; it is a scalar, not a record.
    pub fn set_discount(&mut self, percent: f64) {
        self.input.discount_percent = percent;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.breakdown = derive_breakdown(&self.input);
        if let Err(e) = &self.breakdown {
            warn!("quote undefined: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FinalAdjustments;

    fn draft(hours: f64, rate: f64) -> TaskDraft {
        TaskDraft::new("work").with_hours(hours).with_rate(rate)
    }

    #[test]
    fn ids_start_at_one_and_count_up() {
        let mut state = QuoteState::default();
        assert_eq!(state.add_task(draft(1.0, 10.0)), 1);
        assert_eq!(state.add_task(draft(2.0, 10.0)), 2);
        assert_eq!(state.add_task(draft(3.0, 10.0)), 3);
    }

    #[test]
    fn removing_a_middle_task_keeps_ids_advancing() {
        let mut state = QuoteState::default();
        state.add_task(draft(1.0, 10.0));
        state.add_task(draft(2.0, 10.0));
        state.add_task(draft(3.0, 10.0));

        state.remove_task(2);
        // Highest surviving id is 3, so the next add gets 4.
        assert_eq!(state.add_task(draft(4.0, 10.0)), 4);
    }

    #[test]
    fn removing_the_highest_task_reissues_its_id() {
        let mut state = QuoteState::default();
        state.add_task(draft(1.0, 10.0));
        let top = state.add_task(draft(2.0, 10.0));

        state.remove_task(top);
        assert_eq!(state.add_task(draft(5.0, 10.0)), top);
    }

    #[test]
    fn unknown_ids_are_silent_no_ops() {
        let mut state = QuoteState::default();
        state.add_task(draft(2.0, 100.0));

        state.update_task(
            99,
            TaskPatch {
                hours: Some(50.0),
                ..TaskPatch::default()
            },
        );
        state.remove_task(99);
        state.remove_task(99);

        let b = state.breakdown().unwrap();
        assert_eq!(b.total_hours, 2.0);
        assert_eq!(b.total_tasks_cost, 200.0);
    }

    #[test]
    fn every_mutation_is_visible_immediately() {
        let mut state = QuoteState::default();
        assert_eq!(state.breakdown().unwrap().final_value, 0.0);

        let id = state.add_task(draft(10.0, 100.0));
        assert_eq!(state.breakdown().unwrap().final_value, 1000.0);

        state.update_task(
            id,
            TaskPatch {
                hourly_rate: Some(150.0),
                ..TaskPatch::default()
            },
        );
        assert_eq!(state.breakdown().unwrap().final_value, 1500.0);

        state.update_office_costs(OfficeCostsPatch {
            fixed_monthly: Some(1600.0),
            productive_hours_month: Some(160.0),
            ..OfficeCostsPatch::default()
        });
        assert_eq!(state.breakdown().unwrap().total_office_cost, 100.0);

        state.remove_task(id);
        assert_eq!(state.breakdown().unwrap().final_value, 0.0);
    }

    #[test]
    fn add_then_remove_restores_the_previous_totals() {
        let mut state = QuoteState::default();
        state.add_task(draft(10.0, 100.0));
        let before = state.breakdown().unwrap().clone();

        let id = state.add_task(draft(6.0, 80.0));
        state.remove_task(id);

        assert_eq!(state.breakdown().unwrap(), &before);
    }

    #[test]
    fn discount_replaces_instead_of_accumulating() {
        let mut state = QuoteState::default();
        state.add_task(draft(10.0, 100.0));

        state.set_discount(10.0);
        assert_eq!(state.breakdown().unwrap().discounted_final_value, 900.0);

        state.set_discount(5.0);
        assert_eq!(state.breakdown().unwrap().discounted_final_value, 950.0);
    }

    #[test]
    fn fatal_rate_surfaces_until_corrected() {
        let mut state = QuoteState::default();
        state.add_task(draft(10.0, 100.0));

        state.update_final_adjustments(FinalAdjustmentsPatch {
            tax_percent: Some(80.0),
            card_fee_percent: Some(25.0),
            ..FinalAdjustmentsPatch::default()
        });
        assert_eq!(
            state.breakdown().unwrap_err(),
            PricingError::DeductionRateTooHigh { percent: 105.0 }
        );

        // The bundle itself still holds the rejected rates.
        assert_eq!(state.input().final_adjustments.tax_percent, 80.0);

        state.update_final_adjustments(FinalAdjustmentsPatch {
            tax_percent: Some(11.0),
            card_fee_percent: Some(0.0),
            ..FinalAdjustmentsPatch::default()
        });
        assert!(state.breakdown().is_ok());
    }

    #[test]
    fn reset_swaps_the_whole_bundle() {
        let mut state = QuoteState::default();
        state.add_task(draft(10.0, 100.0));
        state.set_discount(20.0);

        state.reset(QuoteInput {
            final_adjustments: FinalAdjustments {
                profit_percent: 50.0,
                ..FinalAdjustments::default()
            },
            ..QuoteInput::default()
        });

        assert!(state.input().tasks.is_empty());
        assert_eq!(state.input().discount_percent, 0.0);
        assert_eq!(state.breakdown().unwrap().final_value, 0.0);
        // Ids restart with the new bundle.
        assert_eq!(state.add_task(draft(1.0, 10.0)), 1);
    }
}
