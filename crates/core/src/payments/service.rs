//! Allocation orchestration against the document store.

use std::collections::HashMap;
use std::sync::Arc;

use tally_shared::error::{CoreError, CoreResult};
use tally_shared::types::{AllocationId, MinorUnits, PaymentId};
use tracing::info;

use super::types::{NewPayment, Payment, PaymentAllocation};
use crate::documents::lifecycle;
use crate::documents::types::{Document, DocumentId};
use crate::store::scope::TenantScope;
use crate::store::traits::{DocumentStore, ReportCache};

/// Creates payments and splits them across invoices and bills.
pub struct PaymentService {
    documents: Arc<dyn DocumentStore>,
    cache: Arc<dyn ReportCache>,
}

impl PaymentService {
    /// Creates the service over the document store and report cache.
    pub fn new(documents: Arc<dyn DocumentStore>, cache: Arc<dyn ReportCache>) -> Self {
        Self { documents, cache }
    }

    /// Validates and inserts a new payment.
    pub async fn create(&self, scope: &TenantScope, payment: NewPayment) -> CoreResult<Payment> {
        if !payment.amount.is_positive() {
            return Err(CoreError::validation(format!(
                "payment amount {} is not positive",
                payment.amount
            )));
        }
        self.documents.insert_payment(scope, payment).await
    }

    /// Allocates a slice of a payment to a document.
    ///
    /// The payment's direction must match the target kind, and the amount
    /// must fit within both the payment's unallocated balance and the
    /// document's outstanding balance. A rejected allocation creates no row.
    pub async fn allocate(
        &self,
        scope: &TenantScope,
        payment_id: PaymentId,
        target: DocumentId,
        amount: MinorUnits,
    ) -> CoreResult<PaymentAllocation> {
        let payment = self.find_payment(scope, payment_id).await?;
        if payment.direction.target_kind() != target.kind() {
            return Err(CoreError::validation(format!(
                "{:?} payment cannot allocate to a {:?}",
                payment.direction,
                target.kind()
            )));
        }
        if !amount.is_positive() {
            return Err(CoreError::validation(format!(
                "allocation amount {amount} is not positive"
            )));
        }
        let unallocated = payment.unallocated()?;
        if amount > unallocated {
            return Err(CoreError::conflict(format!(
                "amount {amount} exceeds unallocated balance {unallocated}"
            )));
        }

        let doc = self.find_document(scope, target).await?;
        let patch = lifecycle::apply_payment(&doc, amount)?;
        let allocation = PaymentAllocation {
            id: AllocationId::new(),
            payment_id,
            document_id: target,
            amount,
        };
        self.documents
            .commit_allocation(scope, allocation.clone(), patch)
            .await?;

        self.cache.invalidate(scope);
        info!(payment = %payment_id, document = %target, %amount, "allocated payment");
        Ok(allocation)
    }

    /// Removes an allocation, rolling its amount back off the document.
    pub async fn deallocate(
        &self,
        scope: &TenantScope,
        payment_id: PaymentId,
        allocation_id: AllocationId,
    ) -> CoreResult<()> {
        let payment = self.find_payment(scope, payment_id).await?;
        let allocation = payment
            .allocations
            .iter()
            .find(|a| a.id == allocation_id)
            .ok_or_else(|| CoreError::not_found(format!("allocation {allocation_id}")))?;

        let doc = self.find_document(scope, allocation.document_id).await?;
        let patch = lifecycle::reverse_payment(&doc, allocation.amount)?;
        self.documents
            .remove_allocation(scope, allocation_id, patch)
            .await?;

        self.cache.invalidate(scope);
        info!(payment = %payment_id, allocation = %allocation_id, "deallocated payment");
        Ok(())
    }

    /// Soft-deletes a payment, reversing every allocation first, all in one
    /// transaction.
    pub async fn delete(&self, scope: &TenantScope, payment_id: PaymentId) -> CoreResult<()> {
        let payment = self.find_payment(scope, payment_id).await?;

        // A payment may hold several allocations against one document, so
        // the rollback is computed per document over the summed amount.
        let mut per_document: HashMap<DocumentId, i64> = HashMap::new();
        for allocation in &payment.allocations {
            *per_document.entry(allocation.document_id).or_default() += allocation.amount.value();
        }
        let mut patches = Vec::with_capacity(per_document.len());
        for (document_id, amount) in per_document {
            let doc = self.find_document(scope, document_id).await?;
            patches.push(lifecycle::reverse_payment(&doc, MinorUnits::new(amount))?);
        }

        self.documents
            .delete_payment(scope, payment_id, patches)
            .await?;
        self.cache.invalidate(scope);
        info!(payment = %payment_id, "deleted payment");
        Ok(())
    }

    async fn find_payment(&self, scope: &TenantScope, id: PaymentId) -> CoreResult<Payment> {
        self.documents
            .find_payment(scope, id)
            .await?
            .filter(|p| p.deleted_at.is_none())
            .ok_or_else(|| CoreError::not_found(format!("payment {id}")))
    }

    async fn find_document(&self, scope: &TenantScope, id: DocumentId) -> CoreResult<Document> {
        self.documents
            .find_document(scope, id)
            .await?
            .ok_or_else(|| CoreError::not_found(format!("{id}")))
    }
}
