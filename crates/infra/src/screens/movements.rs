use std::sync::Arc;

use chrono::{DateTime, Utc};

use stockdesk_core::{DomainResult, MovementId};
use stockdesk_feedback::{DialogHost, EditOutcome, EditRequest, Notification};
use stockdesk_inventory::{MovementDraft, MovementFilter, MovementSummary, StockMovement};
use stockdesk_query::NoSort;
use stockdesk_query::aggregate::distinct_sorted;

use crate::config::Config;
use crate::read_model::Repository;
use crate::screens::{EntityScreen, Feedback, Outcome, ScreenRecord};

impl ScreenRecord for StockMovement {
    const PLURAL: &'static str = "movements";

    fn display_name(&self) -> &str {
        &self.reference
    }
}

/// Stock movement log, newest first.
pub struct MovementsScreen<R> {
    list: EntityScreen<StockMovement, MovementFilter, NoSort, R>,
    dialog: Arc<dyn DialogHost<MovementDraft>>,
    /// Recorded as the author of new movements and the approver of pending ones.
    user: String,
}

impl<R: Repository<StockMovement>> MovementsScreen<R> {
    pub fn new(
        store: R,
        feedback: Feedback,
        dialog: Arc<dyn DialogHost<MovementDraft>>,
        user: impl Into<String>,
        config: &Config,
    ) -> Self {
        Self {
            list: EntityScreen::new(store, MovementFilter::default(), NoSort, feedback, config.page_size),
            dialog,
            user: user.into(),
        }
    }

    pub fn list(&self) -> &EntityScreen<StockMovement, MovementFilter, NoSort, R> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut EntityScreen<StockMovement, MovementFilter, NoSort, R> {
        &mut self.list
    }

    /// Open the record-movement form; the saved movement goes to the top.
    pub fn record(&mut self, now: DateTime<Utc>) -> DomainResult<Outcome> {
        let EditOutcome::Saved(draft) = self.dialog.open(EditRequest::Create).wait() else {
            return Ok(Outcome::Cancelled);
        };
        let movement = draft
            .into_movement(MovementId::new(), self.user.clone(), now)
            .inspect_err(|e| {
                self.list.feedback().notify(Notification::warning(e.to_string()));
            })?;
        tracing::info!(
            reference = %movement.reference,
            kind = movement.kind.slug(),
            quantity = movement.quantity,
            status = ?movement.status,
            "movement recorded"
        );
        self.list.prepend(movement, now)?;
        self.list.feedback().success("Stock movement recorded successfully");
        Ok(Outcome::Applied(1))
    }

    pub fn approve(&mut self, id: &MovementId, now: DateTime<Utc>) -> DomainResult<()> {
        let approver = self.user.clone();
        let (movement, ()) = self.list.modify(id, now, |m| m.approve(approver))?;
        self.list
            .feedback()
            .success(format!("Movement {} approved", movement.reference));
        Ok(())
    }

    pub fn reject(&mut self, id: &MovementId, now: DateTime<Utc>) -> DomainResult<()> {
        let (movement, ()) = self.list.modify(id, now, StockMovement::reject)?;
        self.list
            .feedback()
            .success(format!("Movement {} rejected", movement.reference));
        Ok(())
    }

    /// Puts a pending `-COPY` of the movement at the top.
    pub fn duplicate(&mut self, id: &MovementId, now: DateTime<Utc>) -> DomainResult<MovementId> {
        let original = self.list.get(id)?;
        let copy = original.duplicate(MovementId::new(), now);
        let copy_id = copy.id;
        self.list.prepend(copy, now)?;
        self.list
            .feedback()
            .success(format!("Movement {} duplicated", original.reference));
        Ok(copy_id)
    }

    pub fn delete(&mut self, id: &MovementId, now: DateTime<Utc>) -> DomainResult<Outcome> {
        self.list.delete(id, now)
    }

    pub fn summary(&self, now: DateTime<Utc>) -> MovementSummary {
        MovementSummary::compute(&self.list.store().list(), now)
    }

    pub fn locations(&self) -> Vec<String> {
        distinct_sorted(&self.list.store().list(), |m| m.location.clone())
    }

    pub fn users(&self) -> Vec<String> {
        distinct_sorted(&self.list.store().list(), |m| m.user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use stockdesk_core::Money;
    use stockdesk_feedback::{InMemoryNotifier, ScriptedConfirm, ScriptedDialog};
    use stockdesk_inventory::{MovementStatus, MovementType};
    use stockdesk_query::{DateBucket, FacetSet};

    use crate::read_model::InMemoryRepository;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 20, 15, 0, 0).unwrap()
    }

    fn draft(kind: MovementType, reference: &str) -> MovementDraft {
        MovementDraft {
            kind: Some(kind),
            item_name: "Widget Pro".into(),
            item_sku: "WDG-PRO-001".into(),
            current_stock: 20,
            quantity: 5,
            location: Some("A-1-01".into()),
            from_location: None,
            to_location: None,
            reference: reference.into(),
            reason: None,
            cost: Some(Money::from_cents(7995)),
            notes: None,
        }
    }

    fn seeded(n: u128, kind: MovementType, days_ago: i64) -> StockMovement {
        draft(kind, &format!("REF-{n}"))
            .into_movement(MovementId::from_u128(n), "John Smith", now() - Duration::days(days_ago))
            .unwrap()
    }

    fn screen(
        outcomes: Vec<EditOutcome<MovementDraft>>,
    ) -> (MovementsScreen<InMemoryRepository<StockMovement>>, Arc<InMemoryNotifier>) {
        let store = InMemoryRepository::with_records([
            seeded(1, MovementType::Inbound, 0),
            seeded(2, MovementType::Adjustment, 1),
            seeded(3, MovementType::Outbound, 12),
        ]);
        let notifier = Arc::new(InMemoryNotifier::new());
        let feedback = Feedback::new(notifier.clone(), Arc::new(ScriptedConfirm::new([true])));
        let mut screen = MovementsScreen::new(
            store,
            feedback,
            Arc::new(ScriptedDialog::new(outcomes)),
            "Jane Doe",
            &Config::default(),
        );
        screen.list_mut().refresh(now());
        (screen, notifier)
    }

    #[test]
    fn recorded_movement_is_prepended_and_signed() {
        let (mut screen, notifier) = screen(vec![EditOutcome::Saved(draft(MovementType::Damage, "DMG-9"))]);
        assert_eq!(screen.record(now()).unwrap(), Outcome::Applied(1));
        let top = &screen.list().rows()[0];
        assert_eq!(top.reference, "DMG-9");
        assert_eq!(top.quantity, -5);
        assert_eq!(top.status, MovementStatus::Pending);
        assert_eq!(top.user, "Jane Doe");
        assert_eq!(notifier.last().unwrap().message, "Stock movement recorded successfully");
    }

    #[test]
    fn invalid_draft_is_reported() {
        let mut bad = draft(MovementType::Inbound, "");
        bad.quantity = 0;
        let (mut screen, notifier) = screen(vec![EditOutcome::Saved(bad)]);
        assert!(screen.record(now()).is_err());
        assert_eq!(screen.list().store().len(), 3);
        assert_eq!(notifier.history().len(), 1);
    }

    #[test]
    fn approve_pending_only() {
        let (mut screen, _) = screen(vec![]);
        screen.approve(&MovementId::from_u128(2), now()).unwrap();
        let approved = screen.list().get(&MovementId::from_u128(2)).unwrap();
        assert_eq!(approved.status, MovementStatus::Completed);
        assert_eq!(approved.approved_by.as_deref(), Some("Jane Doe"));
        assert!(screen.reject(&MovementId::from_u128(1), now()).is_err());
    }

    #[test]
    fn duplicate_goes_to_top_as_pending() {
        let (mut screen, _) = screen(vec![]);
        let id = screen.duplicate(&MovementId::from_u128(3), now()).unwrap();
        let rows = screen.list().rows();
        assert_eq!(rows[0].id, id);
        assert_eq!(rows[0].reference, "REF-3-COPY");
        assert_eq!(rows[0].status, MovementStatus::Pending);
    }

    #[test]
    fn type_and_week_filters() {
        let (mut screen, _) = screen(vec![]);
        screen.list_mut().update_filter(
            |f| {
                f.types = FacetSet::new([MovementType::Inbound, MovementType::Outbound]);
                f.date = Some(DateBucket::Week);
            },
            now(),
        );
        let refs: Vec<_> = screen.list().rows().into_iter().map(|m| m.reference).collect();
        assert_eq!(refs, vec!["REF-1"]);
    }

    #[test]
    fn delete_and_summary() {
        let (mut screen, _) = screen(vec![]);
        assert_eq!(screen.delete(&MovementId::from_u128(1), now()).unwrap(), Outcome::Applied(1));
        let s = screen.summary(now());
        assert_eq!(s.today_count, 0);
        assert_eq!(s.pending_adjustments, 1);
        assert_eq!(screen.users(), vec!["John Smith"]);
        assert_eq!(screen.locations(), vec!["A-1-01"]);
    }
}
