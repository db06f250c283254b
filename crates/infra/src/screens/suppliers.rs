use std::sync::Arc;

use chrono::{DateTime, Utc};

use stockdesk_core::{DomainResult, SupplierId};
use stockdesk_feedback::{DialogHost, EditOutcome, EditRequest, Notification};
use stockdesk_parties::{
    Supplier, SupplierDraft, SupplierFilter, SupplierSort, SupplierStatus, SupplierSummary,
};

use crate::config::Config;
use crate::read_model::Repository;
use crate::screens::{EntityScreen, Feedback, Outcome, ScreenRecord};

impl ScreenRecord for Supplier {
    const PLURAL: &'static str = "suppliers";

    fn display_name(&self) -> &str {
        &self.name
    }
}

pub struct SuppliersScreen<R> {
    list: EntityScreen<Supplier, SupplierFilter, SupplierSort, R>,
    dialog: Arc<dyn DialogHost<SupplierDraft>>,
}

impl<R: Repository<Supplier>> SuppliersScreen<R> {
    pub fn new(
        store: R,
        feedback: Feedback,
        dialog: Arc<dyn DialogHost<SupplierDraft>>,
        config: &Config,
    ) -> Self {
        Self {
            list: EntityScreen::new(
                store,
                SupplierFilter::default(),
                SupplierSort::default(),
                feedback,
                config.page_size,
            ),
            dialog,
        }
    }

    pub fn list(&self) -> &EntityScreen<Supplier, SupplierFilter, SupplierSort, R> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut EntityScreen<Supplier, SupplierFilter, SupplierSort, R> {
        &mut self.list
    }

    pub fn clear_filters(&mut self, now: DateTime<Utc>) {
        self.list.set_sort(SupplierSort::default(), now);
        self.list.set_filter(SupplierFilter::default(), now);
    }

    pub fn add_supplier(&mut self, now: DateTime<Utc>) -> DomainResult<Outcome> {
        let EditOutcome::Saved(draft) = self.dialog.open(EditRequest::Create).wait() else {
            return Ok(Outcome::Cancelled);
        };
        let supplier = draft.into_supplier(SupplierId::new(), now).inspect_err(|e| {
            self.list.feedback().notify(Notification::warning(e.to_string()));
        })?;
        let name = supplier.name.clone();
        self.list.insert(supplier, now)?;
        tracing::info!(name = %name, "supplier added");
        self.list.feedback().success(format!("{name} added successfully"));
        Ok(Outcome::Applied(1))
    }

    pub fn edit_supplier(&mut self, id: &SupplierId, now: DateTime<Utc>) -> DomainResult<Outcome> {
        let current = self.list.get(id)?;
        let request = EditRequest::Edit(SupplierDraft {
            name: current.name.clone(),
            company: current.company.clone(),
            email: current.email.clone(),
            phone: current.phone.clone(),
            location: current.location.clone(),
            rating: current.rating,
        });
        let EditOutcome::Saved(draft) = self.dialog.open(request).wait() else {
            return Ok(Outcome::Cancelled);
        };
        let feedback = self.list.feedback().clone();
        let (supplier, ()) = self
            .list
            .modify(id, now, |s| draft.apply_to(s, now))
            .inspect_err(|e| feedback.notify(Notification::warning(e.to_string())))?;
        feedback.success(format!("{} updated successfully", supplier.name));
        Ok(Outcome::Applied(1))
    }

    pub fn toggle_status(&mut self, id: &SupplierId, now: DateTime<Utc>) -> DomainResult<SupplierStatus> {
        let (supplier, status) = self.list.modify(id, now, |s| Ok(s.toggle_status(now)))?;
        let verb = if status == SupplierStatus::Active { "activated" } else { "deactivated" };
        self.list
            .feedback()
            .success(format!("{} {verb} successfully", supplier.name));
        Ok(status)
    }

    pub fn duplicate(&mut self, id: &SupplierId, now: DateTime<Utc>) -> DomainResult<SupplierId> {
        let original = self.list.get(id)?;
        let copy = original.duplicate(SupplierId::new(), now);
        let copy_id = copy.id;
        self.list.insert(copy, now)?;
        self.list
            .feedback()
            .success(format!("{} duplicated successfully", original.name));
        Ok(copy_id)
    }

    pub fn delete(&mut self, id: &SupplierId, now: DateTime<Utc>) -> DomainResult<Outcome> {
        self.list.delete(id, now)
    }

    pub fn bulk_activate(&mut self, now: DateTime<Utc>) -> DomainResult<Outcome> {
        self.bulk_set_status(SupplierStatus::Active, "activated", now)
    }

    pub fn bulk_deactivate(&mut self, now: DateTime<Utc>) -> DomainResult<Outcome> {
        self.bulk_set_status(SupplierStatus::Inactive, "deactivated", now)
    }

    fn bulk_set_status(
        &mut self,
        status: SupplierStatus,
        verb: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Outcome> {
        self.list.bulk_update(
            now,
            |s| {
                s.set_status(status, now);
                true
            },
            |_| format!("Selected suppliers {verb}"),
        )
    }

    pub fn bulk_delete(&mut self, now: DateTime<Utc>) -> DomainResult<Outcome> {
        self.list.bulk_delete(now)
    }

    pub fn summary(&self) -> SupplierSummary {
        SupplierSummary::compute(&self.list.store().list())
    }
}
