use crate::{
    config::CompilerConfig,
    error::ErrorClass,
    model::EntityKind,
    obs::sink::{self, MetricsEvent},
    query::{
        QueryError,
        builder::order::{OrderDirection, OrderKey},
        compose::{compose_params, is_reserved_parameter},
        expr::{BinaryOp, Expr},
    },
};
use std::{collections::BTreeMap, fmt, marker::PhantomData};

///
/// QuerySpec
///
/// Accumulated state of a query description. This is what the composer
/// consumes; it holds caller-facing names only and no rendered text.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuerySpec {
    /// AND-accumulated filter predicate.
    pub predicate: Option<Expr>,
    /// Ordering keys in precedence order.
    pub order: Vec<OrderKey>,
    /// Projected fields; empty means every field.
    pub selection: Vec<String>,
    pub skip: Option<u64>,
    pub top: Option<u64>,
    pub include_total_count: bool,
    pub include_deleted: bool,
    /// Extra non-OData parameters, emitted after the standard ones.
    pub parameters: BTreeMap<String, String>,
}

impl QuerySpec {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            predicate: None,
            order: Vec::new(),
            selection: Vec::new(),
            skip: None,
            top: None,
            include_total_count: false,
            include_deleted: false,
            parameters: BTreeMap::new(),
        }
    }
}

///
/// QueryBuilder
///
/// Typed, value-semantics query description for entity `E`.
///
/// Every call consumes the builder and returns the updated description,
/// so intermediate descriptions can be cloned and branched freely.
/// Nothing is rendered until `compose`; composing is idempotent.
///

pub struct QueryBuilder<E: EntityKind> {
    spec: QuerySpec,
    _marker: PhantomData<fn() -> E>,
}

impl<E: EntityKind> QueryBuilder<E> {
    /// Create an empty description.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            spec: QuerySpec::new(),
            _marker: PhantomData,
        }
    }

    // ------------------------------------------------------------------
    // Filtering
    // ------------------------------------------------------------------

    /// Add a predicate, AND-ing it onto any existing one.
    ///
    /// Successive calls nest to the left: `((a and b) and c)`.
    pub fn filter(mut self, predicate: impl Into<Expr>) -> Result<Self, QueryError> {
        let predicate = predicate.into();
        if !predicate.is_boolean() {
            return Err(Self::reject(QueryError::NonBooleanFilter {
                found: predicate.ty(),
            }));
        }
        predicate.check_constant().map_err(Self::reject_expr)?;

        self.spec.predicate = match self.spec.predicate.take() {
            Some(existing) => {
                Some(Expr::binary(BinaryOp::And, existing, predicate).map_err(Self::reject_expr)?)
            }
            None => Some(predicate),
        };

        Ok(self)
    }

    // ------------------------------------------------------------------
    // Ordering
    // ------------------------------------------------------------------

    /// Replace the ordering with a single key.
    #[must_use]
    pub fn order_by_key(mut self, key: OrderKey) -> Self {
        self.spec.order.clear();
        self.spec.order.push(key);
        self
    }

    /// Append a key; on an empty ordering this equals `order_by_key`.
    #[must_use]
    pub fn then_by_key(mut self, key: OrderKey) -> Self {
        self.spec.order.push(key);
        self
    }

    #[must_use]
    pub fn order_by_direction(self, field: impl AsRef<str>, direction: OrderDirection) -> Self {
        self.order_by_key(OrderKey::new(field, direction))
    }

    #[must_use]
    pub fn then_by_direction(self, field: impl AsRef<str>, direction: OrderDirection) -> Self {
        self.then_by_key(OrderKey::new(field, direction))
    }

    #[must_use]
    pub fn order_by(self, field: impl AsRef<str>) -> Self {
        self.order_by_direction(field, OrderDirection::Asc)
    }

    #[must_use]
    pub fn order_by_desc(self, field: impl AsRef<str>) -> Self {
        self.order_by_direction(field, OrderDirection::Desc)
    }

    #[must_use]
    pub fn then_by(self, field: impl AsRef<str>) -> Self {
        self.then_by_direction(field, OrderDirection::Asc)
    }

    #[must_use]
    pub fn then_by_desc(self, field: impl AsRef<str>) -> Self {
        self.then_by_direction(field, OrderDirection::Desc)
    }

    // ------------------------------------------------------------------
    // Shaping
    // ------------------------------------------------------------------

    /// Replace the projected field list.
    #[must_use]
    pub fn select<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: AsRef<str>,
    {
        self.spec.selection = fields
            .into_iter()
            .map(|field| field.as_ref().to_string())
            .collect();
        self
    }

    /// Set or replace the number of rows to skip.
    pub fn skip(mut self, n: i64) -> Result<Self, QueryError> {
        self.spec.skip = Some(Self::page_bound("skip", n)?);

        Ok(self)
    }

    /// Set or replace the maximum number of rows to return.
    pub fn take(mut self, n: i64) -> Result<Self, QueryError> {
        self.spec.top = Some(Self::page_bound("take", n)?);

        Ok(self)
    }

    #[must_use]
    pub const fn include_total_count(mut self, enabled: bool) -> Self {
        self.spec.include_total_count = enabled;
        self
    }

    #[must_use]
    pub const fn include_deleted_items(mut self, enabled: bool) -> Self {
        self.spec.include_deleted = enabled;
        self
    }

    /// Add or replace a custom query parameter.
    ///
    /// Keys starting with `$` or `__` belong to the service grammar and
    /// are rejected.
    pub fn with_parameter(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, QueryError> {
        let key = key.into();
        if is_reserved_parameter(&key) {
            return Err(Self::reject(QueryError::ReservedParameter { key }));
        }

        self.spec.parameters.insert(key, value.into());

        Ok(self)
    }

    // ------------------------------------------------------------------
    // Finalization
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    #[must_use]
    pub fn build(self) -> QuerySpec {
        self.spec
    }

    /// Compose the wire query string with the default compiler limits.
    pub fn compose(&self) -> Result<String, QueryError> {
        self.compose_with(&CompilerConfig::default())
    }

    /// Compose the wire query string.
    pub fn compose_with(&self, config: &CompilerConfig) -> Result<String, QueryError> {
        let params = compose_params(&self.spec, E::MODEL, config).map_err(Self::reject)?;

        sink::record(MetricsEvent::Compose {
            entity: E::MODEL.entity_name,
            params: params.len() as u64,
            filter_nodes: self.spec.predicate.as_ref().map_or(0, Expr::node_count) as u64,
        });

        Ok(params.join("&"))
    }

    // ------------------------------------------------------------------
    // Internal helpers
    // ------------------------------------------------------------------

    fn page_bound(param: &'static str, n: i64) -> Result<u64, QueryError> {
        u64::try_from(n).map_err(|_| Self::reject(QueryError::InvalidPageBound { param, value: n }))
    }

    fn reject_expr(err: crate::query::ExprError) -> QueryError {
        Self::reject(QueryError::Expr(err))
    }

    fn reject(err: QueryError) -> QueryError {
        let class: ErrorClass = err.class();
        sink::record(MetricsEvent::Reject {
            entity: E::MODEL.entity_name,
            class,
        });

        err
    }
}

// ----------------------------------------------------------------------
// Boundary traits
// ----------------------------------------------------------------------

impl<E: EntityKind> Clone for QueryBuilder<E> {
    fn clone(&self) -> Self {
        Self {
            spec: self.spec.clone(),
            _marker: PhantomData,
        }
    }
}

impl<E: EntityKind> Default for QueryBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EntityKind> fmt::Debug for QueryBuilder<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("entity", &E::MODEL.entity_name)
            .field("spec", &self.spec)
            .finish()
    }
}
