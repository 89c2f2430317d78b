//! # Attribute Values
//!
//! Optional and computed attributes carry three states: a known value, a value
//! the registry has yet to assign, and an explicit absence. A plain `Option`
//! collapses the last two, which loses the "keep the server-assigned value"
//! rule for computed attributes.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Value of an optional or computed attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeValue<T> {
    /// Value is set
    Known(T),
    /// Value will be assigned by the registry and is learned on the next read
    Unknown,
    /// Value is not set
    Null,
}

impl<T> Default for AttributeValue<T> {
    fn default() -> Self {
        Self::Null
    }
}

impl<T> AttributeValue<T> {
    /// Optional attribute: an absent value stays null
    pub fn optional(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Known)
    }

    /// Optional + computed attribute: an absent value becomes unknown
    pub fn computed(value: Option<T>) -> Self {
        value.map_or(Self::Unknown, Self::Known)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the known value
    pub fn known(&self) -> Option<&T> {
        match self {
            Self::Known(v) => Some(v),
            Self::Unknown | Self::Null => None,
        }
    }

    /// Resolve an unknown value from prior state
    ///
    /// Known and null values are kept as they are. An unknown value takes the
    /// prior value when the prior value is known, and stays unknown otherwise.
    #[must_use]
    pub fn or_prior(self, prior: &Self) -> Self
    where
        T: Clone,
    {
        match (self, prior) {
            (Self::Unknown, Self::Known(v)) => Self::Known(v.clone()),
            (value, _) => value,
        }
    }
}

impl<T: Serialize> Serialize for AttributeValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Persisted state cannot hold unknowns; they are written as null and
        // resolved by the next read.
        self.known().serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for AttributeValue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::optional)
    }
}
