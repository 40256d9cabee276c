//! Catalog collaborator interface.
//!
//! The checkout core does not store products. It consults the catalog for
//! two things only: variant existence and the declared attribute-value
//! domain used to validate a selection at add-to-cart time. Prices are
//! snapshotted by the caller and never re-fetched at checkout.

use checkout_core::cart::AttributeSelection;
use checkout_core::error::CheckoutError;
use checkout_core::ids::VariantId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A purchasable variant as known to the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariantRecord {
    /// Variant identifier.
    pub id: VariantId,
    /// Display name, copied into cart and order snapshots.
    pub name: String,
    /// Declared attribute domain: option name -> allowed values.
    pub options: BTreeMap<String, BTreeSet<String>>,
}

impl VariantRecord {
    /// Create a variant with no configurable options.
    pub fn new(id: VariantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            options: BTreeMap::new(),
        }
    }

    /// Declare an option and its allowed values.
    pub fn with_option(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.options
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Validate a chosen attribute selection against the declared domain.
    ///
    /// Every chosen option must exist and every chosen value must be in
    /// that option's allowed set.
    pub fn validate_selection(
        &self,
        selection: &AttributeSelection,
    ) -> Result<(), CheckoutError> {
        for (option, value) in selection {
            let allowed = self
                .options
                .get(option)
                .map(|values| values.contains(value))
                .unwrap_or(false);
            if !allowed {
                return Err(CheckoutError::InvalidAttributeSelection {
                    variant: self.id.to_string(),
                    option: option.clone(),
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Read access to the external catalog service.
pub trait Catalog: Send + Sync {
    /// Look up a variant, or `None` if it does not exist.
    fn variant(&self, id: &VariantId) -> Option<VariantRecord>;
}

/// In-memory catalog for tests and embedding.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    variants: HashMap<VariantId, VariantRecord>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a variant.
    pub fn insert(&mut self, record: VariantRecord) {
        self.variants.insert(record.id.clone(), record);
    }
}

impl Catalog for StaticCatalog {
    fn variant(&self, id: &VariantId) -> Option<VariantRecord> {
        self.variants.get(id).cloned()
    }
}
