use crate::{
    errors::form_error::FormError,
    forms::{
        validation::{primary_error, FieldError, FieldRule, FieldValue},
        FormVariant,
    },
    models::product_model::ProductDraft,
};

pub const NAME: &str = "name";
pub const DESCRIPTION: &str = "description";
pub const PRICE: &str = "price";
pub const STOCK_QUANTITY: &str = "stockQuantity";
pub const CATEGORY: &str = "category";
pub const IMAGE_URL: &str = "imageUrl";

/// One form control: a named value, the rules it must satisfy, and whether the user touched it.
#[derive(Debug, Clone)]
pub struct FormField {
    name: &'static str,
    initial: FieldValue,
    value: FieldValue,
    rules: Vec<FieldRule>,
    touched: bool,
}

impl FormField {
    pub fn text(name: &'static str) -> Self {
        Self::with_initial(name, FieldValue::Text(String::new()))
    }

    pub fn number(name: &'static str, initial: f64) -> Self {
        Self::with_initial(name, FieldValue::Number(Some(initial)))
    }

    fn with_initial(name: &'static str, initial: FieldValue) -> Self {
        Self {
            name,
            value: initial.clone(),
            initial,
            rules: Vec::new(),
            touched: false,
        }
    }

    pub fn rule(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn is_number(&self) -> bool {
        matches!(self.initial, FieldValue::Number(_))
    }

    pub fn errors(&self) -> Vec<FieldError> {
        self.rules
            .iter()
            .filter_map(|rule| rule.check(&self.value))
            .collect()
    }
}

/// Validated product form built from a pluggable set of field rules.
#[derive(Debug, Clone)]
pub struct ProductForm {
    variant: FormVariant,
    fields: Vec<FormField>,
}

impl ProductForm {
    pub fn new(variant: FormVariant) -> Self {
        let mut fields = vec![
            FormField::text(NAME)
                .rule(FieldRule::Required)
                .rule(FieldRule::MinLength(3)),
            FormField::text(DESCRIPTION).rule(FieldRule::Required),
            FormField::number(PRICE, 0.0)
                .rule(FieldRule::Required)
                .rule(FieldRule::Min(0.0)),
        ];

        if variant == FormVariant::Catalog {
            fields.push(
                FormField::number(STOCK_QUANTITY, 0.0)
                    .rule(FieldRule::Required)
                    .rule(FieldRule::Integer)
                    .rule(FieldRule::Min(0.0))
                    .rule(FieldRule::Max(f64::from(i32::MAX))),
            );
            fields.push(FormField::text(CATEGORY).rule(FieldRule::Required));
            fields.push(FormField::text(IMAGE_URL));
        }

        Self::with_fields(variant, fields)
    }

    pub fn with_fields(variant: FormVariant, fields: Vec<FormField>) -> Self {
        Self { variant, fields }
    }

    pub fn variant(&self) -> FormVariant {
        self.variant
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    fn field(&self, name: &str) -> Result<&FormField, FormError> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .ok_or_else(|| FormError::UnknownField {
                name: name.to_string(),
            })
    }

    fn field_mut(&mut self, name: &str) -> Result<&mut FormField, FormError> {
        self.fields
            .iter_mut()
            .find(|field| field.name == name)
            .ok_or_else(|| FormError::UnknownField {
                name: name.to_string(),
            })
    }

    pub fn value(&self, name: &str) -> Result<&FieldValue, FormError> {
        Ok(&self.field(name)?.value)
    }

    pub fn set_text(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        let field = self.field_mut(name)?;
        if field.is_number() {
            return Err(FormError::WrongKind {
                name: name.to_string(),
                expected: "number",
            });
        }
        field.value = FieldValue::Text(value.into());
        field.touched = true;
        Ok(())
    }

    pub fn set_number(&mut self, name: &str, value: Option<f64>) -> Result<(), FormError> {
        let field = self.field_mut(name)?;
        if !field.is_number() {
            return Err(FormError::WrongKind {
                name: name.to_string(),
                expected: "text",
            });
        }
        field.value = FieldValue::Number(value);
        field.touched = true;
        Ok(())
    }

    /// Sets a field from raw user input. Unparseable or non-finite numbers count as empty.
    pub fn set_input(&mut self, name: &str, raw: &str) -> Result<(), FormError> {
        if self.field(name)?.is_number() {
            let trimmed = raw.trim();
            let number = if trimmed.is_empty() {
                None
            } else {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|number| number.is_finite())
            };
            self.set_number(name, number)
        } else {
            self.set_text(name, raw)
        }
    }

    pub fn errors(&self, name: &str) -> Result<Vec<FieldError>, FormError> {
        Ok(self.field(name)?.errors())
    }

    pub fn is_valid(&self) -> bool {
        self.fields.iter().all(|field| field.errors().is_empty())
    }

    /// Invalid and touched, the condition for highlighting a control.
    pub fn is_invalid(&self, name: &str) -> bool {
        self.field(name)
            .map(|field| field.touched && !field.errors().is_empty())
            .unwrap_or(false)
    }

    /// Message for the field's most relevant error, or an empty string when it is valid.
    pub fn error_message(&self, name: &str) -> String {
        self.field(name)
            .ok()
            .and_then(|field| {
                let errors = field.errors();
                primary_error(&errors).map(|error| error.message(field.name))
            })
            .unwrap_or_default()
    }

    /// Messages for every invalid field, in form order.
    pub fn error_messages(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|field| self.error_message(field.name))
            .filter(|message| !message.is_empty())
            .collect()
    }

    pub fn mark_all_touched(&mut self) {
        for field in &mut self.fields {
            field.touched = true;
        }
    }

    /// Restores every field to its initial value and clears touched state.
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.value = field.initial.clone();
            field.touched = false;
        }
    }

    pub fn to_draft(&self) -> Result<ProductDraft, FormError> {
        let invalid: Vec<String> = self
            .fields
            .iter()
            .filter(|field| !field.errors().is_empty())
            .map(|field| field.name.to_string())
            .collect();
        if !invalid.is_empty() {
            return Err(FormError::Invalid { fields: invalid });
        }

        let text = |name: &str| -> Option<String> {
            self.field(name)
                .ok()
                .and_then(|field| field.value.as_text())
                .map(str::to_string)
        };
        let number = |name: &str| -> Option<f64> {
            self.field(name).ok().and_then(|field| field.value.as_number())
        };

        Ok(ProductDraft {
            name: text(NAME).unwrap_or_default(),
            description: text(DESCRIPTION).unwrap_or_default(),
            price: number(PRICE).unwrap_or_default(),
            // Integer and range rules already passed.
            stock_quantity: number(STOCK_QUANTITY).map(|quantity| quantity as i32),
            category: text(CATEGORY),
            image_url: text(IMAGE_URL).filter(|url| !url.is_empty()),
            created_date: None,
        })
    }
}
