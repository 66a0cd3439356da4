//! Strongly typed identifiers for the aggregates handled by the core.
//!
//! Each identifier wraps a UUID so the compiler rejects cross-wiring a
//! course identifier into a quiz lookup. All of them serialise as plain
//! UUID strings.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            Serialize, Deserialize, ToSchema,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Wrap an existing UUID.
            pub const fn new(value: Uuid) -> Self {
                Self(value)
            }

            /// Generate a fresh random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Borrow the underlying UUID.
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

uuid_id! {
    /// Identifier of a user aggregate.
    UserId
}

uuid_id! {
    /// Identifier of a course record (owned by the course catalogue,
    /// referenced here only as a snapshot key).
    CourseId
}

uuid_id! {
    /// Identifier of a quiz definition.
    QuizId
}

uuid_id! {
    /// Identifier of a question inside a quiz.
    QuestionId
}

uuid_id! {
    /// Identifier of an enrollment or renewal request.
    EnrollmentRequestId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialise_as_plain_uuid_strings() {
        let id = UserId::random();
        let value = serde_json::to_value(id).expect("serialise id");
        assert_eq!(value, serde_json::json!(id.as_uuid().to_string()));
    }

    #[test]
    fn ids_round_trip_through_json() {
        let id = QuizId::random();
        let text = serde_json::to_string(&id).expect("serialise");
        let back: QuizId = serde_json::from_str(&text).expect("deserialise");
        assert_eq!(back, id);
    }
}
