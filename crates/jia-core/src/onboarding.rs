//! Onboarding form controller for creating a customer record.

use crate::cache::CacheControl;
use crate::validation::{FormField, validate_draft, validate_field};
use jia_client::{CustomerStore, StoreError};
use jia_protocol::{Customer, CustomerDraft, ExtractedCard};
use log::{info, warn};
use std::collections::BTreeMap;

/// Transient outcome banner shown above the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    /// Creation succeeded; the form is about to close.
    Success(String),
    /// Creation failed; the form stays open for retry.
    Error(String),
}

/// Editable draft plus its validation and submission state.
///
/// The store-assigned identifier and creation timestamp are never part of
/// the editable draft.
#[derive(Debug, Default)]
pub struct OnboardingForm {
    draft: CustomerDraft,
    errors: BTreeMap<FormField, String>,
    banner: Option<Banner>,
}

impl OnboardingForm {
    /// Open a blank form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a form prefilled from extracted card data.
    pub fn with_prefill(card: &ExtractedCard) -> Self {
        Self {
            draft: card.to_draft(),
            errors: BTreeMap::new(),
            banner: None,
        }
    }

    /// Current draft values.
    pub fn draft(&self) -> &CustomerDraft {
        &self.draft
    }

    /// Field-scoped validation errors from the last `validate` call.
    pub fn errors(&self) -> &BTreeMap<FormField, String> {
        &self.errors
    }

    /// Outcome banner from the last submission, if any.
    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// Set one field from user input; blank input clears optional fields.
    ///
    /// Editing a field clears that field's error only.
    pub fn set_field(&mut self, field: FormField, value: &str) {
        let trimmed = value.trim();
        match field {
            FormField::Name => self.draft.name = trimmed.to_string(),
            FormField::Company => self.draft.company = non_blank(trimmed),
            FormField::GstNumber => self.draft.gst_number = non_blank(trimmed),
            FormField::PanNumber => self.draft.pan_number = non_blank(trimmed),
            FormField::Address => self.draft.address = non_blank(trimmed),
            FormField::EmailAddress => self.draft.email_address = non_blank(trimmed),
            FormField::PhoneNumber => self.draft.phone_number = non_blank(trimmed),
        }
        self.errors.remove(&field);
    }

    /// Current value of one field, for rendering.
    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.draft.name,
            FormField::Company => self.draft.company.as_deref().unwrap_or_default(),
            FormField::GstNumber => self.draft.gst_number.as_deref().unwrap_or_default(),
            FormField::PanNumber => self.draft.pan_number.as_deref().unwrap_or_default(),
            FormField::Address => self.draft.address.as_deref().unwrap_or_default(),
            FormField::EmailAddress => self.draft.email_address.as_deref().unwrap_or_default(),
            FormField::PhoneNumber => self.draft.phone_number.as_deref().unwrap_or_default(),
        }
    }

    /// Re-validate one field as the user edits it.
    pub fn validate_one(&mut self, field: FormField) {
        let value = self.field(field).to_string();
        match validate_field(field, &value) {
            Some(message) => {
                self.errors.insert(field, message);
            }
            None => {
                self.errors.remove(&field);
            }
        }
    }

    /// Validate the whole draft; returns true when submittable.
    pub fn validate(&mut self) -> bool {
        self.errors = validate_draft(&self.draft);
        self.errors.is_empty()
    }

    /// Validate and submit the draft to the store.
    ///
    /// An invalid draft never reaches the store. On success the read
    /// caches are invalidated and the success banner is set; on store
    /// failure the error banner is set and the draft is left untouched
    /// for retry.
    pub async fn submit(
        &mut self,
        store: &dyn CustomerStore,
        caches: &CacheControl,
    ) -> Option<Customer> {
        self.banner = None;
        if !self.validate() {
            warn!(
                "onboarding draft failed validation (fields={:?})",
                self.errors.keys().map(FormField::as_str).collect::<Vec<_>>()
            );
            return None;
        }
        match store.create_customer(&self.draft).await {
            Ok(created) => {
                info!(
                    "customer created (id={}, name={})",
                    created.id, created.name
                );
                caches.invalidate();
                self.banner = Some(Banner::Success(format!(
                    "Customer '{}' created successfully.",
                    created.name
                )));
                Some(created)
            }
            Err(err) => {
                warn!("customer creation failed (err={err})");
                let message = match &err {
                    StoreError::Validation(detail) => format!("Could not create customer: {detail}"),
                    StoreError::Unavailable(detail) => {
                        format!("Store is unavailable, please retry: {detail}")
                    }
                };
                self.banner = Some(Banner::Error(message));
                None
            }
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::OnboardingForm;
    use crate::validation::FormField;
    use jia_protocol::ExtractedCard;
    use pretty_assertions::assert_eq;

    #[test]
    fn prefill_seeds_fields_from_extracted_card() {
        let card = ExtractedCard {
            name: Some("Wayne Enterprises".to_string()),
            gst_number: Some("06AABCW5896P1Z3".to_string()),
            ..ExtractedCard::default()
        };
        let form = OnboardingForm::with_prefill(&card);
        assert_eq!(form.field(FormField::Name), "Wayne Enterprises");
        assert_eq!(form.field(FormField::GstNumber), "06AABCW5896P1Z3");
        assert_eq!(form.field(FormField::Company), "");
    }

    #[test]
    fn editing_a_field_clears_only_its_error() {
        let mut form = OnboardingForm::new();
        form.set_field(FormField::GstNumber, "BADGST");
        assert!(!form.validate());
        assert!(form.errors().contains_key(&FormField::Name));
        assert!(form.errors().contains_key(&FormField::GstNumber));

        form.set_field(FormField::GstNumber, "27AADCA0425P1Z7");
        assert!(!form.errors().contains_key(&FormField::GstNumber));
        assert!(form.errors().contains_key(&FormField::Name));
    }

    #[test]
    fn validate_one_updates_a_single_field() {
        let mut form = OnboardingForm::new();
        form.set_field(FormField::EmailAddress, "not-an-email");
        form.validate_one(FormField::EmailAddress);
        assert!(form.errors().contains_key(&FormField::EmailAddress));
        assert!(!form.errors().contains_key(&FormField::Name));

        form.set_field(FormField::EmailAddress, "contact@acme.example");
        form.validate_one(FormField::EmailAddress);
        assert!(form.errors().is_empty());
    }

    #[test]
    fn blank_optional_input_clears_the_value() {
        let mut form = OnboardingForm::new();
        form.set_field(FormField::Company, "Acme Corp");
        assert_eq!(form.draft().company.as_deref(), Some("Acme Corp"));
        form.set_field(FormField::Company, "   ");
        assert_eq!(form.draft().company, None);
    }
}
