use crate::{
    model::{EntityFieldModel, EntityKind, EntityModel},
    query::FieldRef,
    value::ScalarType,
};

///
/// TestMovie
/// Movie table used across unit tests.
///

pub(crate) struct TestMovie;

pub(crate) const MOVIE_FIELDS: &[EntityFieldModel] = &[
    EntityFieldModel::new("id", ScalarType::Text),
    EntityFieldModel::new("best_picture_winner", ScalarType::Bool),
    EntityFieldModel::new("duration", ScalarType::Int),
    EntityFieldModel::new("mpaa_rating", ScalarType::Text).renamed("rating"),
    EntityFieldModel::new("release_date", ScalarType::Timestamp),
    EntityFieldModel::new("title", ScalarType::Text),
    EntityFieldModel::new("year", ScalarType::Int),
    EntityFieldModel::new("updated_at", ScalarType::Timestamp),
    EntityFieldModel::new("score", ScalarType::Float64),
];

pub(crate) const MOVIE_MODEL: &EntityModel = &EntityModel::new("movie", MOVIE_FIELDS);

impl EntityKind for TestMovie {
    const MODEL: &'static EntityModel = MOVIE_MODEL;
}

impl TestMovie {
    pub(crate) const BEST_PICTURE_WINNER: FieldRef =
        FieldRef::new("best_picture_winner", ScalarType::Bool);
    pub(crate) const DURATION: FieldRef = FieldRef::new("duration", ScalarType::Int);
    pub(crate) const MPAA_RATING: FieldRef = FieldRef::new("mpaa_rating", ScalarType::Text);
    pub(crate) const RELEASE_DATE: FieldRef =
        FieldRef::new("release_date", ScalarType::Timestamp);
    pub(crate) const TITLE: FieldRef = FieldRef::new("title", ScalarType::Text);
    pub(crate) const YEAR: FieldRef = FieldRef::new("year", ScalarType::Int);
    pub(crate) const SCORE: FieldRef = FieldRef::new("score", ScalarType::Float64);
}
