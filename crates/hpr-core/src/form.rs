//! Admin form state and client-side validation.

use std::collections::BTreeMap;

use crate::collection::FormSchema;
use crate::content::{ContentItem, ItemId};
use crate::error::{HprError, Result};

/// An image file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }
}

/// The contents of an admin create/update form.
///
/// `editing` is `Some` while an existing item is being edited; submitting then
/// updates that item instead of creating a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentForm {
    pub editing: Option<ItemId>,
    pub fields: BTreeMap<String, String>,
    pub image: Option<ImageUpload>,
}

impl ContentForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-fills the form from an existing item for editing.
    ///
    /// Only the schema's text fields are copied; the stored image is kept on the
    /// server unless a new one is attached.
    pub fn edit(item: &ContentItem, schema: &FormSchema) -> Self {
        let fields = schema
            .required_fields
            .iter()
            .filter_map(|&name| item.text(name).map(|value| (name.to_string(), value)))
            .collect();
        Self {
            editing: item.id.clone(),
            fields,
            image: None,
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn with_image(mut self, image: ImageUpload) -> Self {
        self.image = Some(image);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Clears the form after a successful submit.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Checks the form against `schema`, listing every missing input.
    pub fn validate(&self, schema: &FormSchema) -> Result<()> {
        let mut missing: Vec<String> = schema
            .required_fields
            .iter()
            .filter(|&&name| self.get(name).is_none_or(|v| v.trim().is_empty()))
            .map(|name| name.to_string())
            .collect();

        let needs_image = schema.image_required_on_create && !self.is_editing();
        if needs_image && self.image.as_ref().is_none_or(|img| img.bytes.is_empty()) {
            missing.push("image".to_string());
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(HprError::validation(missing))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Collection;

    fn jpeg() -> ImageUpload {
        ImageUpload::new("site.jpg", "image/jpeg", vec![0xff, 0xd8])
    }

    #[test]
    fn test_create_requires_image() {
        let schema = Collection::Projects.form_schema();
        let form = ContentForm::new()
            .with_field("title", "Ring Road")
            .with_field("description", "Phase 2");

        let err = form.validate(&schema).unwrap_err();
        assert!(matches!(err, HprError::Validation { ref missing } if missing == &["image"]));

        assert!(form.with_image(jpeg()).validate(&schema).is_ok());
    }

    #[test]
    fn test_update_keeps_existing_image() {
        let schema = Collection::Testimonials.form_schema();
        let item = ContentItem::new("9")
            .with_field("name", "Ravi")
            .with_field("message", "Great work");

        let form = ContentForm::edit(&item, &schema);
        assert!(form.is_editing());
        assert_eq!(form.get("name"), Some("Ravi"));
        assert!(form.validate(&schema).is_ok());
    }

    #[test]
    fn test_blank_fields_are_missing() {
        let schema = Collection::HeroCarousel.form_schema();
        let form = ContentForm::new()
            .with_field("heading", "   ")
            .with_image(jpeg());

        match form.validate(&schema).unwrap_err() {
            HprError::Validation { missing } => {
                assert_eq!(missing, vec!["heading".to_string(), "subheading".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_reset_clears_editing_state() {
        let mut form = ContentForm::new().with_field("title", "x");
        form.editing = Some(ItemId::new("1"));
        form.reset();
        assert_eq!(form, ContentForm::default());
    }
}
