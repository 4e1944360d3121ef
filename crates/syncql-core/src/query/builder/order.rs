use derive_more::Display;

///
/// OrderDirection
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, Hash, PartialEq)]
pub enum OrderDirection {
    #[default]
    #[display("asc")]
    Asc,
    #[display("desc")]
    Desc,
}

impl OrderDirection {
    #[must_use]
    pub const fn is_desc(self) -> bool {
        matches!(self, Self::Desc)
    }
}

///
/// OrderKey
/// One level of sort precedence, by caller-facing field name.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OrderKey {
    pub field: String,
    pub direction: OrderDirection,
}

impl OrderKey {
    #[must_use]
    pub fn new(field: impl AsRef<str>, direction: OrderDirection) -> Self {
        Self {
            field: field.as_ref().to_string(),
            direction,
        }
    }

    #[must_use]
    pub fn asc(field: impl AsRef<str>) -> Self {
        Self::new(field, OrderDirection::Asc)
    }

    #[must_use]
    pub fn desc(field: impl AsRef<str>) -> Self {
        Self::new(field, OrderDirection::Desc)
    }
}
