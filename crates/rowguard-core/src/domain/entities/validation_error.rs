use thiserror::Error;

use crate::domain::{entities::record::Record, error::DomainError};

/// A violation attached to one field of one record.
///
/// Borrows the offending record for `'r`; the record must outlive every error
/// that points at it. Display yields the stored message unchanged.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ValidationError<'r> {
    resource: &'r dyn Record,
    column: String,
    message: String,
}

impl<'r> ValidationError<'r> {
    pub fn new(
        resource: &'r dyn Record,
        column: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            resource,
            column: column.into(),
            message: message.into(),
        }
    }

    pub fn resource(&self) -> &'r dyn Record {
        self.resource
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Stable identifier `"{Model}_{PrimaryKey}_{Column}"`.
    ///
    /// Composite keys render as `[a b]`.
    ///
    /// # Errors
    ///
    /// Structural errors from [`Record::primary_key_values`] when the
    /// resource has no readable primary key.
    pub fn label(&self) -> Result<String, DomainError> {
        let key = self.resource.primary_key()?;
        Ok(format!(
            "{}_{}_{}",
            self.resource.model_name(),
            key,
            self.column
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use super::*;
    use crate::domain::{FieldValue, ModelSchema, Rule};

    static ACCOUNT: LazyLock<ModelSchema> = LazyLock::new(|| {
        ModelSchema::builder("Account")
            .primary_key("ID")
            .field("Email", [Rule::Email])
            .build()
            .unwrap()
    });

    static MEMBERSHIP: LazyLock<ModelSchema> = LazyLock::new(|| {
        ModelSchema::builder("Membership")
            .primary_key("UserID")
            .primary_key("GroupID")
            .build()
            .unwrap()
    });

    static NOTE: LazyLock<ModelSchema> =
        LazyLock::new(|| ModelSchema::builder("Note").column("Body").build().unwrap());

    #[derive(Debug)]
    struct Account {
        id: i64,
    }

    impl Record for Account {
        fn schema(&self) -> &ModelSchema {
            &ACCOUNT
        }
        fn value(&self, field: &str) -> Option<FieldValue> {
            match field {
                "ID" => Some(self.id.into()),
                "Email" => Some("".into()),
                _ => None,
            }
        }
    }

    #[derive(Debug)]
    struct Membership;

    impl Record for Membership {
        fn schema(&self) -> &ModelSchema {
            &MEMBERSHIP
        }
        fn value(&self, field: &str) -> Option<FieldValue> {
            match field {
                "UserID" => Some(FieldValue::Int(7)),
                "GroupID" => Some(FieldValue::Int(3)),
                _ => None,
            }
        }
    }

    #[derive(Debug)]
    struct Note;

    impl Record for Note {
        fn schema(&self) -> &ModelSchema {
            &NOTE
        }
        fn value(&self, field: &str) -> Option<FieldValue> {
            (field == "Body").then(|| "text".into())
        }
    }

    #[test]
    fn display_is_message_verbatim() {
        let account = Account { id: 1 };
        let err = ValidationError::new(&account, "Email", "Email is not a valid email address");
        assert_eq!(err.to_string(), "Email is not a valid email address");
        assert_eq!(err.column(), "Email");
    }

    #[test]
    fn label_single_key() {
        let account = Account { id: 42 };
        let err = ValidationError::new(&account, "Email", "bad");
        assert_eq!(err.label().unwrap(), "Account_42_Email");
    }

    #[test]
    fn label_composite_key() {
        let membership = Membership;
        let err = ValidationError::new(&membership, "Role", "bad");
        assert_eq!(err.label().unwrap(), "Membership_[7 3]_Role");
    }

    #[test]
    fn label_without_primary_key_is_structural_error() {
        let note = Note;
        let err = ValidationError::new(&note, "Body", "bad");
        assert!(matches!(
            err.label(),
            Err(DomainError::MissingPrimaryKey { .. })
        ));
    }
}
