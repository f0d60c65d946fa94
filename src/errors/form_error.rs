use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum FormError {
    #[error("Unknown form field: {name}")]
    UnknownField { name: String },

    #[error("Field {name} does not hold a {expected} value")]
    WrongKind { name: String, expected: &'static str },

    #[error("Invalid fields: {}", .fields.join(", "))]
    Invalid { fields: Vec<String> },
}
