//! Module: query::compose
//! Responsibility: assemble the wire query string from an accumulated
//! query description.
//! Does not own: predicate rendering rules (see `query::expr::render`).
//! Boundary: pure; either the whole string or an error, never a prefix.


use crate::{
    config::CompilerConfig,
    model::EntityModel,
    query::{QueryError, builder::QuerySpec, expr::Renderer},
};
use url::form_urlencoded::byte_serialize;

// Parameter names, in emission order.
pub const INCLUDE_DELETED: &str = "__includedeleted";
pub const COUNT: &str = "$count";
pub const FILTER: &str = "$filter";
pub const ORDER_BY: &str = "$orderby";
pub const SELECT: &str = "$select";
pub const SKIP: &str = "$skip";
pub const TOP: &str = "$top";

/// Custom parameter keys that would collide with the service grammar.
#[must_use]
pub fn is_reserved_parameter(key: &str) -> bool {
    key.is_empty() || key.starts_with('$') || key.starts_with("__")
}

/// Compose the `&`-joined query string for `spec`.
///
/// Returns an empty string when nothing is active.
pub fn compose(
    spec: &QuerySpec,
    model: &EntityModel,
    config: &CompilerConfig,
) -> Result<String, QueryError> {
    Ok(compose_params(spec, model, config)?.join("&"))
}

/// Compose the individual `key=value` parameters in emission order.
pub fn compose_params(
    spec: &QuerySpec,
    model: &EntityModel,
    config: &CompilerConfig,
) -> Result<Vec<String>, QueryError> {
    if let Some(predicate) = &spec.predicate
        && !predicate.is_boolean()
    {
        return Err(QueryError::NonBooleanFilter {
            found: predicate.ty(),
        });
    }

    let renderer = Renderer::new(model).with_max_depth(config.max_filter_depth);
    let mut params = Vec::new();

    if spec.include_deleted {
        params.push(format!("{INCLUDE_DELETED}=true"));
    }

    if spec.include_total_count {
        params.push(format!("{COUNT}=true"));
    }

    if let Some(predicate) = &spec.predicate {
        params.push(format!("{FILTER}={}", renderer.render(predicate)?));
    }

    if !spec.order.is_empty() {
        if spec.order.len() > config.max_order_keys {
            return Err(QueryError::TooManyOrderKeys {
                count: spec.order.len(),
                max: config.max_order_keys,
            });
        }

        let mut keys = Vec::with_capacity(spec.order.len());
        for key in &spec.order {
            let wire = renderer.resolve_field(&key.field)?;
            keys.push(if key.direction.is_desc() {
                format!("{wire} desc")
            } else {
                wire.into_owned()
            });
        }
        params.push(format!("{ORDER_BY}={}", keys.join(",")));
    }

    if !spec.selection.is_empty() {
        let fields = spec
            .selection
            .iter()
            .map(|field| renderer.resolve_field(field))
            .collect::<Result<Vec<_>, _>>()?;
        params.push(format!("{SELECT}={}", fields.join(",")));
    }

    if let Some(skip) = spec.skip {
        params.push(format!("{SKIP}={skip}"));
    }

    if let Some(top) = spec.top {
        if let Some(max) = config.max_top
            && top > max
        {
            return Err(QueryError::TopLimitExceeded { top, max });
        }
        params.push(format!("{TOP}={top}"));
    }

    // BTreeMap iteration is already sorted by key.
    for (key, value) in &spec.parameters {
        if is_reserved_parameter(key) {
            return Err(QueryError::ReservedParameter { key: key.clone() });
        }
        params.push(format!("{}={}", encode(key), encode(value)));
    }

    Ok(params)
}

fn encode(raw: &str) -> String {
    byte_serialize(raw.as_bytes()).collect()
}
